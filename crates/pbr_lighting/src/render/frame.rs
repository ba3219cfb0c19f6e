//! Per-frame render request types
//!
//! A [`Scene`] owns lights, items and the environment. Each render request
//! gathers a [`Shot`] of borrowed references from it; blocks and render
//! functions only ever see the shot, never the scene.

use crate::foundation::math::Mat4;
use crate::render::backend::{EncoderId, ViewId};
use crate::render::camera::Camera;
use crate::render::lighting::{Light, Zone};
use crate::render::pipeline::Shading;

/// A drawable scene item
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Model to world matrix
    pub transform: Mat4,
    /// Hidden items are left out of shots
    pub visible: bool,
}

impl Default for Item {
    fn default() -> Self {
        Self {
            transform: Mat4::identity(),
            visible: true,
        }
    }
}

/// Scene contents owned by the application
#[derive(Debug, Clone, Default)]
pub struct Scene {
    /// Lights, in authoring order
    pub lights: Vec<Light>,
    /// Drawable items
    pub items: Vec<Item>,
    /// Scene environment
    pub env: Zone,
}

/// Scene elements gathered for one render request
#[derive(Debug, Clone, Default)]
pub struct Shot<'a> {
    /// Lights affecting the request, in scene order
    pub lights: Vec<&'a Light>,
    /// Items to draw
    pub items: Vec<&'a Item>,
}

impl<'a> Shot<'a> {
    /// Gather enabled lights and visible items from a scene
    pub fn gather(scene: &'a Scene) -> Self {
        Self {
            lights: scene.lights.iter().filter(|light| light.enabled).collect(),
            items: scene.items.iter().filter(|item| item.visible).collect(),
        }
    }
}

/// Frame timing shared by every render request of a frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenderFrame {
    /// Frame counter
    pub frame: u64,
    /// Time since startup in seconds
    pub time: f64,
    /// Duration of the previous frame in seconds
    pub delta_time: f32,
}

/// One render request: what to draw, from where, in which environment
#[derive(Debug, Clone, Copy)]
pub struct Render<'a> {
    /// Shading mode of the request
    pub shading: Shading,
    /// Gathered scene elements
    pub shot: &'a Shot<'a>,
    /// Viewing camera
    pub camera: &'a Camera,
    /// Environment, if any
    pub env: Option<&'a Zone>,
    /// Frame timing
    pub frame: RenderFrame,
    /// View the request renders into
    pub view: ViewId,
}

impl Render<'_> {
    /// Whether the environment asks for fog
    pub fn fog_enabled(&self) -> bool {
        self.env.is_some_and(|env| env.fog.enabled)
    }
}

/// Blending of a pass onto its target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlendMode {
    /// Overwrite the target
    #[default]
    Replace,
    /// Add onto the previous sub-pass
    Add,
}

/// One GPU submission scope within a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pass {
    /// Target view
    pub view: ViewId,
    /// Encoder recording the pass
    pub encoder: EncoderId,
    /// Sub-pass number when a block asks for several passes
    pub sub_pass: usize,
    /// Blend mode of the pass
    pub blend: BlendMode,
}

impl Pass {
    /// First sub-pass on a view
    pub const fn new(view: ViewId, encoder: EncoderId) -> Self {
        Self {
            view,
            encoder,
            sub_pass: 0,
            blend: BlendMode::Replace,
        }
    }
}

/// One draw within a pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawElement<'a> {
    /// Index of the item in the shot
    pub index: usize,
    /// The drawn item
    pub item: &'a Item,
}
