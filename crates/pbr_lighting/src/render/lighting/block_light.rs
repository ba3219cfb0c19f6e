//! Forward lighting render block
//!
//! [`BlockLight`] snapshots the lights of each render request into view-space
//! [`GpuLight`] records, bins them by type into the zone light table, and
//! makes the result available to shaders for every pass and draw.
//!
//! Per request:
//! - `begin_render` classifies direct lights, builds the snapshot and packs
//!   texture-encoded data
//! - `submit_pass` uploads uniform-encoded data or binds samplers on the view
//! - `submit_element` binds the packed textures on the draw encoder

use crate::core::config::LightingConfig;
use crate::foundation::math::{transform_direction, transform_point, utils::deg_to_rad, Mat4};
use crate::render::backend::{EncoderId, TextureHandle};
use crate::render::block::{GfxContext, RenderBlock};
use crate::render::frame::{BlendMode, DrawElement, Pass, Render};
use crate::render::shader::{base_options, ShaderBlock, ShaderDefine, ShaderVersion, BASE_BLOCK};
use crate::render::{GpuEncoding, RenderResult};

use super::gpu::{GpuLight, GpuLightShadow, ZoneLights};
use super::light::{Light, LightType};
use super::zone::Zone;
use super::{MAX_FORWARD_LIGHTS, MAX_SHADOWS};

/// Shader options of the lighting block
pub mod options {
    /// The environment has fog
    pub const FOG: u32 = 0;
    /// A direct light is active for the pass
    pub const DIRECT_LIGHT: u32 = 1;
    /// Option names, by index
    pub const NAMES: &[&str] = &["FOG", "DIRECT_LIGHT"];
}

/// Encodings resolved at block init
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightEncodings {
    /// Light and shadow records
    pub lights: GpuEncoding,
    /// Zone environment
    pub zones: GpuEncoding,
    /// Zone light table
    pub zone_lights: GpuEncoding,
}

/// Render block feeding per-frame light data to forward shaders
#[derive(Debug)]
pub struct BlockLight {
    index: usize,
    config: LightingConfig,
    encodings: Option<LightEncodings>,

    direct_lights: Vec<usize>,
    direct_light_index: usize,
    direct_light: Option<usize>,

    light_capacity: usize,
    gpu_lights: Vec<GpuLight>,
    gpu_shadows: Vec<GpuLightShadow>,
    light_count: u16,
    zone: ZoneLights,
    env: Zone,

    lights_texture: Option<TextureHandle>,
    zones_texture: Option<TextureHandle>,
    zone_lights_texture: Option<TextureHandle>,
}

impl BlockLight {
    /// Create a lighting block
    pub fn new(config: LightingConfig) -> Self {
        Self {
            index: 0,
            config,
            encodings: None,
            direct_lights: Vec::new(),
            direct_light_index: 0,
            direct_light: None,
            light_capacity: MAX_FORWARD_LIGHTS,
            gpu_lights: Vec::with_capacity(MAX_FORWARD_LIGHTS),
            gpu_shadows: Vec::with_capacity(MAX_FORWARD_LIGHTS),
            light_count: 0,
            zone: ZoneLights::default(),
            env: Zone::default(),
            lights_texture: None,
            zones_texture: None,
            zone_lights_texture: None,
        }
    }

    /// Encodings in use, `None` before init
    pub const fn encodings(&self) -> Option<LightEncodings> {
        self.encodings
    }

    /// View-space light records of the current request
    pub fn gpu_lights(&self) -> &[GpuLight] {
        &self.gpu_lights
    }

    /// Shadow records, parallel to [`Self::gpu_lights`]
    pub fn gpu_shadows(&self) -> &[GpuLightShadow] {
        &self.gpu_shadows
    }

    /// Light table of the (single) zone
    pub const fn zone(&self) -> &ZoneLights {
        &self.zone
    }

    /// Lights a snapshot keeps, lowered at init when uniform arrays are small
    pub const fn light_capacity(&self) -> usize {
        self.light_capacity
    }

    /// Number of lights in the snapshot
    pub const fn light_count(&self) -> u16 {
        self.light_count
    }

    /// Shot indices of the direct lights, in shot order
    pub fn direct_lights(&self) -> &[usize] {
        &self.direct_lights
    }

    /// Shot index of the active direct light
    pub const fn direct_light(&self) -> Option<usize> {
        self.direct_light
    }

    /// Packed light texture, once created
    pub const fn lights_texture(&self) -> Option<TextureHandle> {
        self.lights_texture
    }

    /// Packed zone texture, once created
    pub const fn zones_texture(&self) -> Option<TextureHandle> {
        self.zones_texture
    }

    /// Packed zone light table texture, once created
    pub const fn zone_lights_texture(&self) -> Option<TextureHandle> {
        self.zone_lights_texture
    }

    /// Build the view-space snapshot and zone table of `lights`
    ///
    /// Lights past [`Self::light_capacity`] (at most [`MAX_FORWARD_LIGHTS`])
    /// are dropped.
    pub fn setup_lights(&mut self, lights: &[&Light], view: &Mat4) {
        if lights.len() > self.light_capacity {
            log::trace!(
                "BlockLight: {} lights in shot, keeping the first {}",
                lights.len(),
                self.light_capacity
            );
        }
        let lights = &lights[..lights.len().min(self.light_capacity)];

        self.zone.reset();
        self.gpu_lights.clear();
        self.gpu_shadows.clear();

        for (index, light) in lights.iter().enumerate() {
            let position = transform_point(view, &light.position());
            let direction = transform_direction(view, &light.direction());
            let energy = light.colour.to_linear().to_vec3() * light.energy;

            self.gpu_lights.push(GpuLight {
                position: position.into(),
                range: light.range,
                energy: energy.into(),
                specular: light.specular,
                direction: direction.into(),
                attenuation: light.attenuation,
                spot_attenuation: light.spot_attenuation,
                spot_cutoff: deg_to_rad(light.spot_angle).cos(),
                _padding: [0.0; 2],
            });

            self.zone.push(light.light_type, index);
        }

        self.gpu_shadows
            .extend(lights.iter().map(|light| GpuLightShadow::unassigned(light.shadow_bias)));

        self.light_count = lights.len() as u16;
        self.zone.light_count = self.light_count;
    }

    fn classify(&mut self, lights: &[&Light]) {
        self.direct_lights.clear();
        self.direct_lights.extend(
            lights
                .iter()
                .enumerate()
                .filter(|(_, light)| light.light_type == LightType::Direct)
                .map(|(index, _)| index),
        );
        self.direct_light = self.direct_lights.get(self.direct_light_index).copied();
    }

    fn upload_lights(&mut self, ctx: &mut GfxContext) -> RenderResult<()> {
        if ctx.gpu.lights.encoding() == Some(GpuEncoding::Texture) {
            ctx.gpu.lights.pack(
                ctx.backend.as_mut(),
                &mut self.lights_texture,
                &self.gpu_lights,
                &self.gpu_shadows,
            )?;
        }
        if ctx.gpu.zone_lights.encoding() == Some(GpuEncoding::Texture) {
            ctx.gpu.zone_lights.pack(
                ctx.backend.as_mut(),
                &mut self.zone_lights_texture,
                std::slice::from_ref(&self.zone),
            )?;
        }
        Ok(())
    }

    fn upload_zones(&mut self, ctx: &mut GfxContext) -> RenderResult<()> {
        if ctx.gpu.zones.encoding() == Some(GpuEncoding::Texture) {
            ctx.gpu.zones.pack(
                ctx.backend.as_mut(),
                &mut self.zones_texture,
                std::slice::from_ref(&self.env),
            )?;
        }
        Ok(())
    }

    fn commit_lights(&self, ctx: &mut GfxContext, encoder: EncoderId) {
        ctx.gpu.lights.commit(ctx.backend.as_mut(), encoder, self.lights_texture);
        ctx.gpu
            .zone_lights
            .commit(ctx.backend.as_mut(), encoder, self.zone_lights_texture);
    }

    fn commit_zones(&self, ctx: &mut GfxContext, encoder: EncoderId) {
        ctx.gpu.zones.commit(ctx.backend.as_mut(), encoder, self.zones_texture);
    }
}

impl RenderBlock for BlockLight {
    fn shader_block(&self) -> ShaderBlock {
        ShaderBlock {
            options: options::NAMES,
            defines: vec![
                ShaderDefine {
                    name: "MAX_LIGHTS",
                    value: self.light_capacity.to_string(),
                },
                ShaderDefine {
                    name: "MAX_SHADOWS",
                    value: MAX_SHADOWS.to_string(),
                },
            ],
        }
    }

    fn index(&self) -> usize {
        self.index
    }

    fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    fn init_block(&mut self, ctx: &mut GfxContext) -> RenderResult<()> {
        let caps = ctx.backend.caps();
        let encodings = LightEncodings {
            lights: self.config.lights.resolve(&caps),
            zones: self.config.zones.resolve(&caps),
            zone_lights: self.config.zone_lights.resolve(&caps),
        };
        log::debug!("BlockLight: encodings {:?}", encodings);

        ctx.gpu.lights.init(ctx.backend.as_mut(), encodings.lights)?;
        ctx.gpu.zones.init(ctx.backend.as_mut(), encodings.zones)?;
        ctx.gpu.zone_lights.init(ctx.backend.as_mut(), encodings.zone_lights)?;

        self.light_capacity = ctx.gpu.lights.capacity().min(MAX_FORWARD_LIGHTS);
        self.encodings = Some(encodings);
        Ok(())
    }

    fn begin_render(&mut self, ctx: &mut GfxContext, render: &Render<'_>) -> RenderResult<()> {
        let lights = &render.shot.lights;

        self.classify(lights);
        self.setup_lights(lights, &render.camera.view);
        self.env = render.env.copied().unwrap_or_default();

        self.upload_lights(ctx)?;
        self.upload_zones(ctx)?;

        self.direct_light_index = 0;
        self.direct_light = self.direct_lights.first().copied();

        log::trace!(
            "BlockLight: {} lights ({} direct, {} point, {} spot)",
            self.light_count,
            self.zone.light_counts[LightType::Direct.index()],
            self.zone.light_counts[LightType::Point.index()],
            self.zone.light_counts[LightType::Spot.index()]
        );
        Ok(())
    }

    fn num_passes(&self) -> usize {
        if self.config.multiple_direct_lights {
            self.direct_lights.len().max(1)
        } else {
            1
        }
    }

    fn begin_pass(&mut self, _ctx: &mut GfxContext, _render: &Render<'_>, pass: &mut Pass) -> RenderResult<()> {
        if !self.config.multiple_direct_lights {
            return Ok(());
        }

        self.direct_light_index = pass.sub_pass;
        self.direct_light = self.direct_lights.get(pass.sub_pass).copied();
        if pass.sub_pass > 0 {
            pass.blend = BlendMode::Add;
        }
        Ok(())
    }

    fn options(&self, render: &Render<'_>, version: &mut ShaderVersion) {
        if render.camera.clustered {
            version.set_option(BASE_BLOCK, base_options::CLUSTERED, true);
        }

        if render.fog_enabled() {
            version.set_option(self.index, options::FOG, true);
        }

        let cull = self.direct_light.is_none();
        if !cull {
            version.set_option(self.index, options::DIRECT_LIGHT, true);
        }
    }

    fn submit_pass(&mut self, ctx: &mut GfxContext, render: &Render<'_>, pass: &Pass) -> RenderResult<()> {
        let backend = ctx.backend.as_mut();

        match ctx.gpu.zone_lights.encoding() {
            Some(GpuEncoding::Uniform) => ctx.gpu.zone_lights.upload(backend, pass.view, &self.zone)?,
            _ => ctx.gpu.zone_lights.bind(backend, pass.view)?,
        }

        match ctx.gpu.zones.encoding() {
            Some(GpuEncoding::Uniform) => ctx.gpu.zones.upload(backend, pass.view, &self.env)?,
            _ => ctx.gpu.zones.bind(backend, pass.view)?,
        }

        match ctx.gpu.lights.encoding() {
            Some(GpuEncoding::Uniform) => {
                ctx.gpu
                    .lights
                    .upload(backend, pass.view, &self.gpu_lights, &self.gpu_shadows)?;
            }
            _ => ctx.gpu.lights.bind(backend, pass.view)?,
        }

        if let Some(clusters) = render.camera.active_clusters() {
            clusters.submit_pass(backend, pass.view);
        }
        Ok(())
    }

    fn submit_element(
        &mut self,
        ctx: &mut GfxContext,
        render: &Render<'_>,
        _element: &DrawElement<'_>,
        pass: &Pass,
    ) -> RenderResult<()> {
        if let Some(clusters) = render.camera.active_clusters() {
            clusters.submit_encoder(ctx.backend.as_mut(), pass.encoder);
        }

        self.commit_zones(ctx, pass.encoder);
        self.commit_lights(ctx, pass.encoder);
        Ok(())
    }
}
