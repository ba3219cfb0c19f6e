//! GPU packing of lighting data
//!
//! A [`GpuState<T>`] turns a collection of `T` records into a GPU resource and
//! uploads it. Two encodings exist, picked once per data kind when the
//! pipeline is set up:
//!
//! ```text
//! Uniform:  records ──► vec4 uniform arrays, set on each pass's view
//! Texture:  records ──► RGBA32F texture (one row per record),
//!                       sampler set on the view, texture bound per draw
//! ```
//!
//! Both encodings share the same vec4 record layout, so shaders read the same
//! values either way. [`GpuStates`] owns one packer per data kind for the
//! lifetime of the pipeline.

use std::marker::PhantomData;

use crate::render::backend::{
    EncoderId, GfxBackend, TextureDesc, TextureFormat, TextureHandle, TextureSampler, UniformHandle,
    UniformKind, ViewId,
};
use crate::render::{RenderError, RenderResult};

use super::gpu::{GpuLight, GpuLightShadow, ZoneLights};
use super::zone::Zone;
use super::{MAX_FORWARD_LIGHTS, MAX_SHADOWS, MAX_ZONES};

/// How a kind of lighting data reaches the GPU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GpuEncoding {
    /// Fixed-size vec4 uniform arrays
    Uniform,
    /// Float texture addressed by record index
    Texture,
}

/// A kind of record a [`GpuState`] can pack
pub trait GpuRecord {
    /// Debug label of the packed texture
    const LABEL: &'static str;
    /// Sampler uniform name in texture encoding
    const SAMPLER: &'static str;
    /// Sampler stage in texture encoding
    const STAGE: TextureSampler;
    /// vec4 rows per record in texture encoding (texture width)
    const TEXELS: usize;
    /// Records per texture (texture height)
    const CAPACITY: usize;
    /// Uniform arrays in uniform encoding
    const UNIFORMS: &'static [UniformArray];
}

/// A vec4 uniform array of fixed-stride records
///
/// The array is created with room for `records` records, or as many as fit
/// the backend's uniform array limit if that is smaller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformArray {
    /// Uniform name
    pub name: &'static str,
    /// Records wanted
    pub records: usize,
    /// vec4 per record
    pub stride: usize,
}

impl UniformArray {
    const fn new(name: &'static str, records: usize, stride: usize) -> Self {
        Self { name, records, stride }
    }

    /// Records that fit an array of at most `max_vec4` elements
    pub const fn fit(&self, max_vec4: usize) -> usize {
        let fit = max_vec4 / self.stride;
        if fit < self.records {
            fit
        } else {
            self.records
        }
    }
}

impl GpuRecord for GpuLight {
    const LABEL: &'static str = "lights";
    const SAMPLER: &'static str = "s_lights";
    const STAGE: TextureSampler = TextureSampler::Lights;
    const TEXELS: usize = GpuLight::TEXELS + GpuLightShadow::TEXELS;
    const CAPACITY: usize = MAX_FORWARD_LIGHTS;
    const UNIFORMS: &'static [UniformArray] = &[
        UniformArray::new("u_lights", MAX_FORWARD_LIGHTS, GpuLight::TEXELS),
        UniformArray::new("u_shadows", MAX_SHADOWS, GpuLightShadow::TEXELS),
    ];
}

impl GpuRecord for Zone {
    const LABEL: &'static str = "zones";
    const SAMPLER: &'static str = "s_zones";
    const STAGE: TextureSampler = TextureSampler::Zones;
    const TEXELS: usize = Zone::TEXELS;
    const CAPACITY: usize = MAX_ZONES;
    const UNIFORMS: &'static [UniformArray] = &[
        UniformArray::new("u_radiance", 1, Zone::RADIANCE_TEXELS),
        UniformArray::new("u_fog", 1, Zone::FOG_TEXELS),
    ];
}

impl GpuRecord for ZoneLights {
    const LABEL: &'static str = "zone_lights";
    const SAMPLER: &'static str = "s_zone_lights";
    const STAGE: TextureSampler = TextureSampler::ZoneLights;
    const TEXELS: usize = ZoneLights::TEXELS;
    const CAPACITY: usize = MAX_ZONES;
    const UNIFORMS: &'static [UniformArray] = &[UniformArray::new("u_zone_lights", 1, ZoneLights::TEXELS)];
}

/// Packer and uploader for one kind of record
#[derive(Debug)]
pub struct GpuState<T> {
    encoding: Option<GpuEncoding>,
    capacity: usize,
    uniforms: Vec<(UniformHandle, usize)>,
    sampler: Option<UniformHandle>,
    texels: Vec<[f32; 4]>,
    _record: PhantomData<fn() -> T>,
}

impl<T: GpuRecord> Default for GpuState<T> {
    fn default() -> Self {
        Self {
            encoding: None,
            capacity: T::CAPACITY,
            uniforms: Vec::new(),
            sampler: None,
            texels: Vec::new(),
            _record: PhantomData,
        }
    }
}

impl<T: GpuRecord> GpuState<T> {
    /// Create the GPU uniforms this state needs for `encoding`
    ///
    /// Only the first call has an effect; the encoding cannot change afterwards.
    /// Uniform arrays are shrunk to the backend's array limit, which lowers
    /// [`Self::capacity`].
    pub fn init(&mut self, backend: &mut dyn GfxBackend, encoding: GpuEncoding) -> RenderResult<()> {
        if let Some(current) = self.encoding {
            log::trace!("GpuState<{}> already initialized ({:?})", T::LABEL, current);
            return Ok(());
        }

        match encoding {
            GpuEncoding::Uniform => {
                let max_vec4 = usize::from(backend.caps().max_uniform_array);
                let mut fitted = Vec::with_capacity(T::UNIFORMS.len());
                for array in T::UNIFORMS {
                    let records = array.fit(max_vec4);
                    if records == 0 {
                        return Err(RenderError::ResourceCreationFailed(format!(
                            "{}: {} vec4 per record exceeds the uniform array limit of {}",
                            array.name, array.stride, max_vec4
                        )));
                    }
                    if records < array.records {
                        log::warn!(
                            "GpuState<{}>: {} holds {} of {} records (uniform array limit {})",
                            T::LABEL,
                            array.name,
                            records,
                            array.records,
                            max_vec4
                        );
                    }
                    fitted.push((array, records));
                }

                for &(array, records) in &fitted {
                    let len = records * array.stride;
                    let count = u16::try_from(len)
                        .map_err(|_| RenderError::ResourceCreationFailed(format!("{}: {} vec4", array.name, len)))?;
                    let handle = backend.create_uniform(array.name, UniformKind::Vec4, count)?;
                    self.uniforms.push((handle, len));
                }
                if let Some(&(_, records)) = fitted.first() {
                    self.capacity = records.min(T::CAPACITY);
                }
            }
            GpuEncoding::Texture => {
                self.sampler = Some(backend.create_uniform(T::SAMPLER, UniformKind::Sampler, 1)?);
            }
        }

        log::debug!("GpuState<{}> initialized with {:?} encoding", T::LABEL, encoding);
        self.encoding = Some(encoding);
        Ok(())
    }

    /// Encoding chosen at init, `None` before
    pub const fn encoding(&self) -> Option<GpuEncoding> {
        self.encoding
    }

    /// Records one upload or pack can carry
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Texture descriptor used in texture encoding
    pub const fn texture_desc() -> TextureDesc {
        TextureDesc {
            label: T::LABEL,
            width: T::TEXELS as u16,
            height: T::CAPACITY as u16,
            format: TextureFormat::Rgba32F,
        }
    }

    /// Point the view's sampler uniform at this state's sampler stage
    pub fn bind(&self, backend: &mut dyn GfxBackend, view: ViewId) -> RenderResult<()> {
        self.require(GpuEncoding::Texture)?;
        if let Some(sampler) = self.sampler {
            backend.set_view_uniform(view, sampler, &[[f32::from(T::STAGE.stage()), 0.0, 0.0, 0.0]]);
        }
        Ok(())
    }

    /// Bind the packed texture for the next draw on an encoder
    ///
    /// Does nothing in uniform encoding or before the first pack.
    pub fn commit(&self, backend: &mut dyn GfxBackend, encoder: EncoderId, texture: Option<TextureHandle>) {
        if self.encoding == Some(GpuEncoding::Texture) {
            if let Some(texture) = texture {
                backend.set_texture(encoder, T::STAGE.stage(), texture);
            }
        }
    }

    fn require(&self, expected: GpuEncoding) -> RenderResult<()> {
        match self.encoding {
            Some(encoding) if encoding == expected => Ok(()),
            Some(encoding) => Err(RenderError::RenderingFailed(format!(
                "GpuState<{}> uses {:?} encoding, {:?} requested",
                T::LABEL,
                encoding,
                expected
            ))),
            None => Err(RenderError::NotInitialized(format!("GpuState<{}>", T::LABEL))),
        }
    }

    /// Write the scratch texels into the texture, creating it on first use
    ///
    /// Rows past the capacity are dropped; missing rows are zero filled.
    fn write_texture(&mut self, backend: &mut dyn GfxBackend, texture: &mut Option<TextureHandle>) -> RenderResult<()> {
        let desc = Self::texture_desc();
        self.texels.resize(T::TEXELS * T::CAPACITY, [0.0; 4]);

        let handle = match *texture {
            Some(handle) => handle,
            None => {
                let handle = backend.create_texture(&desc)?;
                *texture = Some(handle);
                handle
            }
        };

        backend.update_texture(handle, bytemuck::cast_slice(&self.texels))
    }

    /// Set one uniform array per declared uniform, truncated to its created size
    fn write_uniforms(&self, backend: &mut dyn GfxBackend, view: ViewId, arrays: &[&[[f32; 4]]]) {
        for (&(uniform, len), data) in self.uniforms.iter().zip(arrays) {
            backend.set_view_uniform(view, uniform, &data[..data.len().min(len)]);
        }
    }
}

impl GpuState<GpuLight> {
    /// Pack lights and their shadow parameters into a texture
    ///
    /// Row `i` holds light `i` followed by shadow `i`.
    pub fn pack(
        &mut self,
        backend: &mut dyn GfxBackend,
        texture: &mut Option<TextureHandle>,
        lights: &[GpuLight],
        shadows: &[GpuLightShadow],
    ) -> RenderResult<()> {
        self.require(GpuEncoding::Texture)?;

        self.texels.clear();
        for (index, light) in lights.iter().take(MAX_FORWARD_LIGHTS).enumerate() {
            let shadow = shadows.get(index).copied().unwrap_or_default();
            self.texels.extend(light.texels());
            self.texels.extend(shadow.texels());
        }

        self.write_texture(backend, texture)
    }

    /// Upload lights and shadows as uniform arrays of a view
    pub fn upload(
        &mut self,
        backend: &mut dyn GfxBackend,
        view: ViewId,
        lights: &[GpuLight],
        shadows: &[GpuLightShadow],
    ) -> RenderResult<()> {
        self.require(GpuEncoding::Uniform)?;

        let light_texels: Vec<[f32; 4]> = lights.iter().flat_map(GpuLight::texels).collect();
        let shadow_texels: Vec<[f32; 4]> = shadows.iter().flat_map(GpuLightShadow::texels).collect();
        self.write_uniforms(backend, view, &[light_texels.as_slice(), shadow_texels.as_slice()]);
        Ok(())
    }
}

impl GpuState<Zone> {
    /// Pack zone environments into a texture, one row per zone
    pub fn pack(&mut self, backend: &mut dyn GfxBackend, texture: &mut Option<TextureHandle>, zones: &[Zone]) -> RenderResult<()> {
        self.require(GpuEncoding::Texture)?;

        self.texels.clear();
        for zone in zones.iter().take(MAX_ZONES) {
            zone.write_texels(&mut self.texels);
        }

        self.write_texture(backend, texture)
    }

    /// Upload a zone environment as radiance and fog uniforms of a view
    pub fn upload(&mut self, backend: &mut dyn GfxBackend, view: ViewId, zone: &Zone) -> RenderResult<()> {
        self.require(GpuEncoding::Uniform)?;
        self.write_uniforms(backend, view, &[&zone.radiance_texels()[..], &zone.fog_texels()[..]]);
        Ok(())
    }
}

impl GpuState<ZoneLights> {
    /// Pack zone light tables into a texture, one row per zone
    pub fn pack(
        &mut self,
        backend: &mut dyn GfxBackend,
        texture: &mut Option<TextureHandle>,
        zones: &[ZoneLights],
    ) -> RenderResult<()> {
        self.require(GpuEncoding::Texture)?;

        self.texels.clear();
        for zone in zones.iter().take(MAX_ZONES) {
            zone.write_texels(&mut self.texels);
        }

        self.write_texture(backend, texture)
    }

    /// Upload a zone light table as a uniform array of a view
    pub fn upload(&mut self, backend: &mut dyn GfxBackend, view: ViewId, zone: &ZoneLights) -> RenderResult<()> {
        self.require(GpuEncoding::Uniform)?;

        self.texels.clear();
        zone.write_texels(&mut self.texels);
        let texels = std::mem::take(&mut self.texels);
        self.write_uniforms(backend, view, &[texels.as_slice()]);
        self.texels = texels;
        Ok(())
    }
}

/// One packer per kind of lighting data, shared by every frame of a pipeline
#[derive(Debug, Default)]
pub struct GpuStates {
    /// Light and shadow records
    pub lights: GpuState<GpuLight>,
    /// Zone environments
    pub zones: GpuState<Zone>,
    /// Zone light tables
    pub zone_lights: GpuState<ZoneLights>,
}
