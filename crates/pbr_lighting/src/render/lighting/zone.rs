//! Zone environment: radiance and fog

use crate::foundation::colour::Colour;

/// Ambient radiance of a zone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Radiance {
    /// Radiance colour (sRGB)
    pub colour: Colour,
    /// Radiance energy
    pub energy: f32,
    /// Ambient term
    pub ambient: f32,
}

impl Default for Radiance {
    fn default() -> Self {
        Self {
            colour: Colour::BLACK,
            energy: 1.0,
            ambient: 0.0,
        }
    }
}

/// Depth and height fog of a zone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    /// Whether fog is rendered at all
    pub enabled: bool,
    /// Fog density
    pub density: f32,
    /// Fog colour (sRGB)
    pub colour: Colour,
    /// Depth fog
    pub depth: bool,
    /// Distance where depth fog starts
    pub depth_begin: f32,
    /// Depth fog falloff exponent
    pub depth_curve: f32,
    /// Height fog
    pub height: bool,
    /// Height where height fog is thickest
    pub height_min: f32,
    /// Height where height fog vanishes
    pub height_max: f32,
    /// Height fog falloff exponent
    pub height_curve: f32,
    /// Light transmittance through fog
    pub transmit: bool,
    /// Transmittance falloff exponent
    pub transmit_curve: f32,
}

impl Default for Fog {
    fn default() -> Self {
        Self {
            enabled: false,
            density: 0.01,
            colour: Colour::WHITE,
            depth: false,
            depth_begin: 0.0,
            depth_curve: 1.0,
            height: false,
            height_min: 0.0,
            height_max: 1.0,
            height_curve: 1.0,
            transmit: false,
            transmit_curve: 1.0,
        }
    }
}

/// Environment of one zone
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Zone {
    /// Ambient radiance
    pub radiance: Radiance,
    /// Fog
    pub fog: Fog,
}

impl Zone {
    /// vec4 count of one record
    pub const TEXELS: usize = Self::RADIANCE_TEXELS + Self::FOG_TEXELS;
    /// vec4 count of the radiance part
    pub const RADIANCE_TEXELS: usize = 2;
    /// vec4 count of the fog part
    pub const FOG_TEXELS: usize = 4;

    /// Create a zone with fog switched on
    #[must_use]
    pub fn with_fog(mut self, colour: Colour, density: f32) -> Self {
        self.fog.enabled = true;
        self.fog.colour = colour;
        self.fog.density = density;
        self
    }

    /// Radiance rows: `[colour.rgb, energy] [ambient, -, -, -]`
    pub fn radiance_texels(&self) -> [[f32; 4]; Self::RADIANCE_TEXELS] {
        let radiance = &self.radiance;
        let colour = radiance.colour.to_linear();
        [
            [colour.r, colour.g, colour.b, radiance.energy],
            [radiance.ambient, 0.0, 0.0, 0.0],
        ]
    }

    /// Fog rows: `[colour.rgb, density] [depth, depth_begin, depth_curve, height]
    /// [height_min, height_max, height_curve, transmit] [transmit_curve, enabled, -, -]`
    pub fn fog_texels(&self) -> [[f32; 4]; Self::FOG_TEXELS] {
        let fog = &self.fog;
        let colour = fog.colour.to_linear();
        let flag = |value: bool| if value { 1.0 } else { 0.0 };
        [
            [colour.r, colour.g, colour.b, fog.density],
            [flag(fog.depth), fog.depth_begin, fog.depth_curve, flag(fog.height)],
            [fog.height_min, fog.height_max, fog.height_curve, flag(fog.transmit)],
            [fog.transmit_curve, flag(fog.enabled), 0.0, 0.0],
        ]
    }

    /// Append the record's vec4 rows
    pub fn write_texels(&self, out: &mut Vec<[f32; 4]>) {
        out.extend(self.radiance_texels());
        out.extend(self.fog_texels());
    }
}
