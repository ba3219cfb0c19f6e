//! Forward lighting
//!
//! Scene lights, their GPU snapshot, zone environments and the render block
//! wiring them into the pipeline.

pub mod block_light;
pub mod gpu;
pub mod gpu_state;
pub mod light;
pub mod zone;

#[cfg(test)]
mod tests;

pub use block_light::{BlockLight, LightEncodings};
pub use gpu::{GpuLight, GpuLightShadow, ZoneLights, LIGHT_TYPE_SLOTS};
pub use gpu_state::{GpuEncoding, GpuRecord, GpuState, GpuStates, UniformArray};
pub use light::{Light, LightType};
pub use zone::{Fog, Radiance, Zone};

/// Maximum number of lights in a forward snapshot
pub const MAX_FORWARD_LIGHTS: usize = 64;

/// Maximum number of shadow matrix slots
pub const MAX_SHADOWS: usize = 32;

/// Maximum number of light zones
pub const MAX_ZONES: usize = 1;
