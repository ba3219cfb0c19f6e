//! Backend abstraction traits for the rendering system
//!
//! This module defines the trait a graphics backend implements to serve the
//! render pipeline. The pipeline only ever needs a small slice of a graphics
//! API: create uniforms and textures, set uniforms per view or per encoder,
//! bind textures on an encoder, and submit draws.

use bitflags::bitflags;
use slotmap::new_key_type;

use crate::render::RenderResult;

new_key_type! {
    /// Handle to a uniform created by the backend
    pub struct UniformHandle;
    /// Handle to a texture created by the backend
    pub struct TextureHandle;
}

/// Identifier of a view (one GPU submission scope)
pub type ViewId = u16;

/// Identifier of a command encoder acquired for the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EncoderId(pub u16);

bitflags! {
    /// Optional backend features the pipeline can take advantage of
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BackendFeatures: u32 {
        /// RGBA32F textures can be created, updated and sampled with point fetches
        const TEXTURE_FLOAT = 1 << 0;
        /// Several encoders can record commands concurrently
        const MULTIPLE_ENCODERS = 1 << 1;
    }
}

/// Backend capabilities, queried once at pipeline setup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendCaps {
    /// Supported optional features
    pub features: BackendFeatures,
    /// Maximum number of encoders per frame
    pub max_encoders: u32,
    /// Maximum element count of a uniform array
    pub max_uniform_array: u16,
}

impl Default for BackendCaps {
    fn default() -> Self {
        Self {
            features: BackendFeatures::all(),
            max_encoders: 8,
            max_uniform_array: 256,
        }
    }
}

impl BackendCaps {
    /// Whether float textures can be used to carry lighting data
    pub const fn supports_float_textures(&self) -> bool {
        self.features.contains(BackendFeatures::TEXTURE_FLOAT)
    }
}

/// Kind of a uniform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformKind {
    /// Texture sampler slot
    Sampler,
    /// Array of vec4
    Vec4,
}

/// Texture formats the pipeline creates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    /// Four 32-bit float channels
    Rgba32F,
}

impl TextureFormat {
    /// Size of one texel in bytes
    pub const fn texel_size(self) -> usize {
        match self {
            Self::Rgba32F => 16,
        }
    }
}

/// Description of a 2D texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureDesc {
    /// Debug label
    pub label: &'static str,
    /// Width in texels
    pub width: u16,
    /// Height in texels
    pub height: u16,
    /// Texel format
    pub format: TextureFormat,
}

impl TextureDesc {
    /// Size of the whole texture in bytes
    pub const fn byte_size(&self) -> usize {
        self.width as usize * self.height as usize * self.format.texel_size()
    }
}

/// Fixed sampler stages used by the lighting pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TextureSampler {
    /// Cluster record / light index textures
    Clusters = 11,
    /// Zone environment texture
    Zones = 12,
    /// Light records texture
    Lights = 13,
    /// Zone light table texture
    ZoneLights = 14,
}

impl TextureSampler {
    /// Sampler stage index
    pub const fn stage(self) -> u8 {
        self as u8
    }
}

/// A draw call handed to the backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    /// Index of the drawn item in the shot
    pub item: usize,
    /// Shader option masks of the program variant, one per shader block
    pub program: [u32; crate::render::shader::MAX_SHADER_BLOCKS],
    /// Blend additively onto previous sub-passes
    pub additive: bool,
}

/// Main rendering backend trait
///
/// Resource creation is fallible; setting state is not, matching graphics
/// APIs where invalid handles are a programming error caught by validation.
pub trait GfxBackend {
    /// Capabilities of the device behind this backend
    fn caps(&self) -> BackendCaps;

    /// Create a named uniform holding `count` elements of `kind`
    fn create_uniform(&mut self, name: &str, kind: UniformKind, count: u16) -> RenderResult<UniformHandle>;

    /// Create a texture
    fn create_texture(&mut self, desc: &TextureDesc) -> RenderResult<TextureHandle>;

    /// Replace the whole contents of a texture
    fn update_texture(&mut self, texture: TextureHandle, data: &[u8]) -> RenderResult<()>;

    /// Release a texture
    fn destroy_texture(&mut self, texture: TextureHandle);

    /// Set a uniform for every draw of a view
    fn set_view_uniform(&mut self, view: ViewId, uniform: UniformHandle, data: &[[f32; 4]]);

    /// Bind a texture to a sampler stage for the next draw recorded on an encoder
    fn set_texture(&mut self, encoder: EncoderId, stage: u8, texture: TextureHandle);

    /// Acquire `count` encoders for the frame, returns how many were granted
    fn begin_encoders(&mut self, count: u32) -> RenderResult<u32>;

    /// Release the encoders acquired for the frame
    fn end_encoders(&mut self);

    /// Mark a view as used this frame even if nothing is drawn
    fn touch(&mut self, view: ViewId);

    /// Submit a draw on an encoder to a view
    fn submit(&mut self, encoder: EncoderId, view: ViewId, draw: &DrawCall);
}
