//! # Pipeline Configuration
//!
//! Configuration for the render pipeline and the lighting block. Everything is
//! serializable (TOML or RON through [`Config`]) and every field has a default,
//! so partial files are accepted.
//!
//! ```toml
//! threaded = true
//! max_encoders = 4
//!
//! [lighting]
//! lights = "texture"
//! zones = "auto"
//! zone_lights = "uniform"
//! multiple_direct_lights = false
//! ```

use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError};
use crate::render::{BackendCaps, GpuEncoding};

/// How one kind of lighting data should reach the GPU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingPreference {
    /// Pick from backend capabilities at startup
    #[default]
    Auto,
    /// Always use fixed-size uniform arrays
    Uniform,
    /// Always use float textures
    Texture,
}

impl EncodingPreference {
    /// Resolve the preference against what the backend supports
    ///
    /// `Auto` prefers textures when float textures are available. An explicit
    /// `Texture` on a backend without float textures degrades to uniforms.
    pub fn resolve(self, caps: &BackendCaps) -> GpuEncoding {
        let textures = caps.supports_float_textures();
        match self {
            Self::Uniform => GpuEncoding::Uniform,
            Self::Auto | Self::Texture if textures => GpuEncoding::Texture,
            Self::Texture => {
                log::warn!("Float textures unsupported by backend, packing lights as uniforms");
                GpuEncoding::Uniform
            }
            Self::Auto => GpuEncoding::Uniform,
        }
    }
}

/// Lighting block configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Encoding of the per-light records and their shadow parameters
    pub lights: EncodingPreference,
    /// Encoding of the zone environment (radiance and fog)
    pub zones: EncodingPreference,
    /// Encoding of the zone light count and index table
    pub zone_lights: EncodingPreference,
    /// Accumulate every direct light in its own additive sub-pass
    ///
    /// Off by default: only the first direct light of the shot is honoured.
    pub multiple_direct_lights: bool,
}

impl Config for LightingConfig {}

/// Render pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Acquire several command encoders per frame for parallel recording
    pub threaded: bool,
    /// Upper bound on encoders acquired per frame in threaded mode
    pub max_encoders: u32,
    /// Lighting block settings
    pub lighting: LightingConfig,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            threaded: false,
            max_encoders: 4,
            lighting: LightingConfig::default(),
        }
    }
}

impl Config for RendererConfig {}
