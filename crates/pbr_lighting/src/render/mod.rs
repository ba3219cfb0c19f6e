//! # Rendering System
//!
//! Backend-agnostic render pipeline built from render blocks.
//!
//! ## Architecture
//!
//! - **Renderer**: owns the backend, the blocks and the shading-mode table
//! - **Render blocks**: pipeline stages hooking into every render request
//! - **Lighting**: the forward lighting block and its GPU packers
//! - **Backend**: the [`GfxBackend`] trait, implemented outside the crate for
//!   real graphics APIs and by [`backends::RecordingBackend`] in memory

use thiserror::Error;

pub mod backend;
pub mod backends;
pub mod block;
pub mod camera;
pub mod frame;
pub mod lighting;
pub mod pipeline;
pub mod shader;

pub use backend::{
    BackendCaps, BackendFeatures, DrawCall, EncoderId, GfxBackend, TextureDesc, TextureFormat,
    TextureHandle, TextureSampler, UniformHandle, UniformKind, ViewId,
};
pub use block::{GfxContext, RenderBlock};
pub use camera::{Camera, LightClusters};
pub use frame::{BlendMode, DrawElement, Item, Pass, Render, RenderFrame, Scene, Shot};
pub use lighting::GpuEncoding;
pub use pipeline::{RenderFunc, Renderer, Shading};
pub use shader::{ShaderBlock, ShaderDefine, ShaderVersion};

/// High-level rendering error types
///
/// Backend failures are reported through these variants so callers never see
/// graphics API specific error types.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Pipeline or block initialization failed
    #[error("Renderer initialization failed: {0}")]
    InitializationFailed(String),

    /// A GPU state was used before `init`
    #[error("Not initialized: {0}")]
    NotInitialized(String),

    /// A rendering operation failed during execution
    #[error("Rendering failed: {0}")]
    RenderingFailed(String),

    /// GPU resource creation failed
    #[error("Resource creation failed: {0}")]
    ResourceCreationFailed(String),

    /// A handle does not refer to a live resource
    #[error("Invalid handle: {0}")]
    InvalidHandle(String),

    /// No render function registered for a shading mode
    #[error("No renderer registered for {0:?} shading")]
    MissingRenderer(Shading),

    /// Backend-specific error
    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
