//! Backend implementations for the render module
//!
//! Only the in-memory recording backend ships with the crate; GPU backends
//! implement [`GfxBackend`](crate::render::GfxBackend) in their own crates.

pub mod recording;

pub use recording::{Command, RecordedTexture, RecordedUniform, RecordingBackend};
