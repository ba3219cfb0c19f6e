//! GPU layouts of per-frame light data
//!
//! These structs mirror the shader side exactly: every record is a whole
//! number of vec4 so it can be uploaded as a uniform array or as texture rows
//! without repacking. Padding fields are explicit so the types stay `Pod`.

use bytemuck::{Pod, Zeroable};

use super::light::LightType;
use super::{MAX_FORWARD_LIGHTS, MAX_SHADOWS};

/// Number of columns in zone light tables, one per light type plus a spare
pub const LIGHT_TYPE_SLOTS: usize = 4;

/// View-space snapshot of one light
///
/// Layout (4 vec4):
/// `[position.xyz, range] [energy.rgb, specular] [direction.xyz, attenuation]
/// [spot_attenuation, spot_cutoff, -, -]`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GpuLight {
    /// Position in view space
    pub position: [f32; 3],
    /// Light range
    pub range: f32,
    /// Linear colour multiplied by energy
    pub energy: [f32; 3],
    /// Specular contribution
    pub specular: f32,
    /// Direction in view space, normalized
    pub direction: [f32; 3],
    /// Distance attenuation exponent
    pub attenuation: f32,
    /// Angular attenuation exponent
    pub spot_attenuation: f32,
    /// Cosine of the spot cone half-angle
    pub spot_cutoff: f32,
    /// Padding to a whole vec4
    pub _padding: [f32; 2],
}

impl GpuLight {
    /// vec4 count of one record
    pub const TEXELS: usize = 4;

    /// Record as vec4 rows
    pub fn texels(&self) -> [[f32; 4]; Self::TEXELS] {
        bytemuck::cast(*self)
    }
}

/// Shadow parameters of one light, parallel to [`GpuLight`]
///
/// Layout (2 vec4): `[matrix, bias, radius, -] [atlas_offset.xy, atlas_scale.xy]`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GpuLightShadow {
    /// First shadow matrix slot; `MAX_SHADOWS` means none assigned
    pub matrix: f32,
    /// Depth bias
    pub bias: f32,
    /// Filter radius
    pub radius: f32,
    /// Padding to a whole vec4
    pub _padding: f32,
    /// Offset of the light's region in the shadow atlas
    pub atlas_offset: [f32; 2],
    /// Scale of the light's region in the shadow atlas
    pub atlas_scale: [f32; 2],
}

impl GpuLightShadow {
    /// vec4 count of one record
    pub const TEXELS: usize = 2;

    /// Shadow record for a light without an assigned shadow slot
    pub fn unassigned(bias: f32) -> Self {
        Self {
            matrix: MAX_SHADOWS as f32,
            bias,
            radius: 1.0,
            _padding: 0.0,
            atlas_offset: [0.0; 2],
            atlas_scale: [0.0; 2],
        }
    }

    /// Record as vec4 rows
    pub fn texels(&self) -> [[f32; 4]; Self::TEXELS] {
        bytemuck::cast(*self)
    }
}

/// Light count and index table of one zone
///
/// Column `t` of `light_indices` lists, in insertion order, the indices of the
/// frame's [`GpuLight`] records whose type has column `t`. Only the first
/// `light_counts[t]` rows of a column are meaningful.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneLights {
    /// Total number of lights binned in the zone
    pub light_count: u16,
    /// Number of lights per type column
    pub light_counts: [u32; LIGHT_TYPE_SLOTS],
    /// `[row][type column]` → light index
    pub light_indices: Vec<[u32; LIGHT_TYPE_SLOTS]>,
}

impl Default for ZoneLights {
    fn default() -> Self {
        Self {
            light_count: 0,
            light_counts: [0; LIGHT_TYPE_SLOTS],
            light_indices: vec![[0; LIGHT_TYPE_SLOTS]; MAX_FORWARD_LIGHTS],
        }
    }
}

impl ZoneLights {
    /// vec4 count of one record: header, counts, then one row per light slot
    pub const TEXELS: usize = 2 + MAX_FORWARD_LIGHTS;

    /// Forget the binned lights; stale index rows are left in place
    pub fn reset(&mut self) {
        self.light_count = 0;
        self.light_counts = [0; LIGHT_TYPE_SLOTS];
    }

    /// Append light `index` to the column of `light_type`
    ///
    /// Lights past the table capacity are dropped.
    pub fn push(&mut self, light_type: LightType, index: usize) {
        let column = light_type.index();
        let row = self.light_counts[column] as usize;
        if let Some(slot) = self.light_indices.get_mut(row) {
            slot[column] = index as u32;
            self.light_counts[column] += 1;
        }
    }

    /// Indices of the lights binned for a type, in insertion order
    pub fn indices(&self, light_type: LightType) -> impl Iterator<Item = usize> + '_ {
        let column = light_type.index();
        self.light_indices[..self.light_counts[column] as usize]
            .iter()
            .map(move |row| row[column] as usize)
    }

    /// Sum of the per-type counts
    pub fn binned(&self) -> u32 {
        self.light_counts.iter().sum()
    }

    /// Append the record's vec4 rows
    pub fn write_texels(&self, out: &mut Vec<[f32; 4]>) {
        out.push([f32::from(self.light_count), 0.0, 0.0, 0.0]);
        out.push(self.light_counts.map(|count| count as f32));
        out.extend(self.light_indices.iter().map(|row| row.map(|index| index as f32)));
    }
}
