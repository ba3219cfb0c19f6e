//! # PBR Lighting
//!
//! Per-frame forward lighting for a PBR render pipeline: light classification,
//! zone binning, GPU packing and per-pass / per-draw binding.
//!
//! ## Features
//!
//! - **Light block**: a render block that snapshots the frame's lights into
//!   GPU-ready records once per frame and binds them for every pass and draw
//! - **Two GPU encodings**: uniform arrays or float textures, chosen once at
//!   startup from backend capabilities
//! - **Backend agnostic**: the graphics API sits behind [`render::GfxBackend`]
//! - **Shading-mode dispatch**: render functions registered per shading mode
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pbr_lighting::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = RecordingBackend::new(BackendCaps::default());
//!     let mut renderer = Renderer::new(Box::new(backend), RendererConfig::default());
//!     renderer.add_block(BlockLight::new(LightingConfig::default()))?;
//!     renderer.init_pipeline()?;
//!
//!     let mut scene = Scene::default();
//!     scene.lights.push(Light::direct(Vec3::new(-0.3, -1.0, -0.5), Colour::WHITE, 1.0));
//!     let camera = Camera::look_at(Vec3::new(0.0, 2.0, 8.0), Vec3::zeros(), Vec3::y());
//!
//!     renderer.begin_frame()?;
//!     let shot = Shot::gather(&scene);
//!     renderer.render(Shading::Shaded, &shot, &camera, Some(&scene.env))?;
//!     renderer.end_frame()?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;
pub mod config;
pub mod foundation;
pub mod render;

/// Common imports for pipeline users
pub mod prelude {
    pub use crate::{
        core::config::{EncodingPreference, LightingConfig, RendererConfig},
        foundation::{
            colour::Colour,
            math::{Mat4, Quat, Transform, Vec3},
        },
        render::{
            backends::RecordingBackend,
            lighting::{BlockLight, Light, LightType, Zone},
            BackendCaps, Camera, GfxBackend, Item, RenderError, RenderResult, Renderer, Scene,
            Shading, Shot,
        },
    };
}
