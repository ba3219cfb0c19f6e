//! Render blocks: pluggable stages of the render pipeline
//!
//! A render block contributes a shader block (options and defines) and hooks
//! into every step of a render request. The pipeline drives blocks in this
//! order:
//!
//! ```text
//! init_block                              once, at pipeline setup
//! begin_frame                             once per frame
//! begin_render                            once per render request
//!   for each sub-pass:
//!     begin_pass -> options -> submit_pass
//!       for each item: submit_element -> draw
//! ```

use crate::render::backend::GfxBackend;
use crate::render::frame::{DrawElement, Pass, Render, RenderFrame};
use crate::render::lighting::GpuStates;
use crate::render::shader::{ShaderBlock, ShaderVersion};
use crate::render::RenderResult;

/// Graphics state shared by every block of a pipeline
pub struct GfxContext {
    /// Graphics backend
    pub backend: Box<dyn GfxBackend>,
    /// GPU packers of the lighting data
    pub gpu: GpuStates,
}

impl GfxContext {
    /// Wrap a backend with fresh, uninitialized GPU states
    pub fn new(backend: Box<dyn GfxBackend>) -> Self {
        Self {
            backend,
            gpu: GpuStates::default(),
        }
    }
}

impl std::fmt::Debug for GfxContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GfxContext")
            .field("caps", &self.backend.caps())
            .field("gpu", &self.gpu)
            .finish()
    }
}

/// A stage of the render pipeline
///
/// Every hook has an empty default so blocks only implement what they need.
pub trait RenderBlock {
    /// Shader options and defines contributed by this block
    fn shader_block(&self) -> ShaderBlock;

    /// Shader block index assigned at registration
    fn index(&self) -> usize;

    /// Store the shader block index assigned at registration
    fn set_index(&mut self, index: usize);

    /// Create GPU resources
    fn init_block(&mut self, _ctx: &mut GfxContext) -> RenderResult<()> {
        Ok(())
    }

    /// Start of a frame
    fn begin_frame(&mut self, _frame: &RenderFrame) {}

    /// Start of a render request, before any pass
    fn begin_render(&mut self, _ctx: &mut GfxContext, _render: &Render<'_>) -> RenderResult<()> {
        Ok(())
    }

    /// Number of sub-passes this block needs for the current request
    fn num_passes(&self) -> usize {
        1
    }

    /// Start of a sub-pass
    fn begin_pass(&mut self, _ctx: &mut GfxContext, _render: &Render<'_>, _pass: &mut Pass) -> RenderResult<()> {
        Ok(())
    }

    /// Switch on the shader options this block needs for the pass
    fn options(&self, _render: &Render<'_>, _version: &mut ShaderVersion) {}

    /// Bind per-pass state
    fn submit_pass(&mut self, _ctx: &mut GfxContext, _render: &Render<'_>, _pass: &Pass) -> RenderResult<()> {
        Ok(())
    }

    /// Bind per-draw state
    fn submit_element(
        &mut self,
        _ctx: &mut GfxContext,
        _render: &Render<'_>,
        _element: &DrawElement<'_>,
        _pass: &Pass,
    ) -> RenderResult<()> {
        Ok(())
    }
}
