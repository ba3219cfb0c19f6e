//! Render pipeline
//!
//! [`Renderer`] owns the graphics context, the render blocks and a table of
//! render functions keyed by [`Shading`] mode. Each frame is bracketed by
//! [`Renderer::begin_frame`] and [`Renderer::end_frame`]; any number of
//! render requests can be issued in between, each into its own view.

use std::collections::HashMap;
use std::time::Instant;

use crate::core::config::RendererConfig;
use crate::render::backend::{BackendFeatures, DrawCall, EncoderId, GfxBackend, ViewId};
use crate::render::block::{GfxContext, RenderBlock};
use crate::render::camera::Camera;
use crate::render::frame::{BlendMode, DrawElement, Pass, Render, RenderFrame, Shot};
use crate::render::lighting::Zone;
use crate::render::shader::{base_options, ShaderBlock, ShaderVersion, MAX_SHADER_BLOCKS};
use crate::render::{RenderError, RenderResult};

/// Shading modes a render request can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shading {
    /// Edges only
    Wireframe,
    /// Unlit surfaces
    Solid,
    /// Lit surfaces
    Shaded,
    /// Clear the target, draw nothing
    Clear,
}

/// A render function, run for every request of its shading mode
pub type RenderFunc = fn(&mut Renderer, &Render<'_>) -> RenderResult<()>;

/// Block-based render pipeline
pub struct Renderer {
    ctx: GfxContext,
    blocks: Vec<Box<dyn RenderBlock>>,
    renderers: HashMap<Shading, RenderFunc>,
    config: RendererConfig,
    frame: RenderFrame,
    encoders: u32,
    next_view: ViewId,
    started: Instant,
    last_frame: Instant,
}

impl Renderer {
    /// Create a pipeline over a backend
    ///
    /// Blocks are added with [`Self::add_block`], then the pipeline is set up
    /// with [`Self::init_pipeline`].
    pub fn new(backend: Box<dyn GfxBackend>, config: RendererConfig) -> Self {
        let now = Instant::now();
        Self {
            ctx: GfxContext::new(backend),
            blocks: Vec::new(),
            renderers: HashMap::new(),
            config,
            frame: RenderFrame::default(),
            encoders: 0,
            next_view: 0,
            started: now,
            last_frame: now,
        }
    }

    /// Register a block, returns its shader block index
    pub fn add_block<B: RenderBlock + 'static>(&mut self, mut block: B) -> RenderResult<usize> {
        let index = self.blocks.len() + 1;
        if index >= MAX_SHADER_BLOCKS {
            return Err(RenderError::InitializationFailed(format!(
                "too many render blocks, at most {} are supported",
                MAX_SHADER_BLOCKS - 1
            )));
        }

        block.set_index(index);
        self.blocks.push(Box::new(block));
        Ok(index)
    }

    /// Initialize every block and install the built-in render functions
    pub fn init_pipeline(&mut self) -> RenderResult<()> {
        for block in &mut self.blocks {
            block.init_block(&mut self.ctx)?;
        }

        self.set_renderer(Shading::Solid, render_solid);
        self.set_renderer(Shading::Shaded, render_solid);
        self.set_renderer(Shading::Clear, render_clear);

        log::info!("Render pipeline initialized with {} blocks", self.blocks.len());
        Ok(())
    }

    /// Register the render function of a shading mode
    pub fn set_renderer(&mut self, shading: Shading, renderer: RenderFunc) {
        self.renderers.insert(shading, renderer);
    }

    /// Render function of a shading mode
    pub fn renderer(&self, shading: Shading) -> RenderResult<RenderFunc> {
        self.renderers
            .get(&shading)
            .copied()
            .ok_or(RenderError::MissingRenderer(shading))
    }

    /// Shader blocks of the pipeline, by index
    pub fn shader_blocks(&self) -> Vec<ShaderBlock> {
        let base = ShaderBlock {
            options: base_options::NAMES,
            defines: Vec::new(),
        };
        std::iter::once(base)
            .chain(self.blocks.iter().map(|block| block.shader_block()))
            .collect()
    }

    /// Graphics context shared by the blocks
    pub const fn context(&self) -> &GfxContext {
        &self.ctx
    }

    /// Pipeline configuration
    pub const fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Timing of the current frame
    pub const fn frame(&self) -> RenderFrame {
        self.frame
    }

    /// Encoders acquired for the current frame, 0 outside a frame
    pub const fn encoders(&self) -> u32 {
        self.encoders
    }

    /// Start a frame: advance timing, notify blocks, acquire encoders
    pub fn begin_frame(&mut self) -> RenderResult<()> {
        let now = Instant::now();
        self.frame.frame += 1;
        self.frame.time = now.duration_since(self.started).as_secs_f64();
        self.frame.delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.next_view = 0;

        for block in &mut self.blocks {
            block.begin_frame(&self.frame);
        }

        let caps = self.ctx.backend.caps();
        let requested = if self.config.threaded && caps.features.contains(BackendFeatures::MULTIPLE_ENCODERS) {
            self.config.max_encoders.min(caps.max_encoders).max(1)
        } else {
            1
        };
        self.encoders = self.ctx.backend.begin_encoders(requested)?;

        log::trace!("Frame {}: {} encoders", self.frame.frame, self.encoders);
        Ok(())
    }

    /// Run the render function of `shading` for one request, into a fresh view
    pub fn render(&mut self, shading: Shading, shot: &Shot<'_>, camera: &Camera, env: Option<&Zone>) -> RenderResult<()> {
        if self.encoders == 0 {
            return Err(RenderError::RenderingFailed("render requested outside of a frame".into()));
        }

        let func = self.renderer(shading)?;
        let view = self.next_view;
        self.next_view = self.next_view.wrapping_add(1);

        let render = Render {
            shading,
            shot,
            camera,
            env,
            frame: self.frame,
            view,
        };
        func(self, &render)
    }

    /// Finish a frame, releasing its encoders
    pub fn end_frame(&mut self) -> RenderResult<()> {
        if self.encoders == 0 {
            return Err(RenderError::RenderingFailed("end_frame without begin_frame".into()));
        }
        self.ctx.backend.end_encoders();
        self.encoders = 0;
        Ok(())
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("ctx", &self.ctx)
            .field("blocks", &self.blocks.len())
            .field("shadings", &self.renderers.keys().collect::<Vec<_>>())
            .field("config", &self.config)
            .field("frame", &self.frame)
            .finish_non_exhaustive()
    }
}

/// Draw every shot item with every block bound, once per sub-pass
///
/// Draws are spread over the frame's encoders round robin.
pub fn render_solid(renderer: &mut Renderer, render: &Render<'_>) -> RenderResult<()> {
    let Renderer { ctx, blocks, encoders, .. } = renderer;
    let encoders = (*encoders).max(1);

    for block in blocks.iter_mut() {
        block.begin_render(ctx, render)?;
    }

    let passes = blocks.iter().map(|block| block.num_passes()).max().unwrap_or(1);
    for sub_pass in 0..passes {
        let mut pass = Pass {
            sub_pass,
            ..Pass::new(render.view, EncoderId(0))
        };

        for block in blocks.iter_mut() {
            block.begin_pass(ctx, render, &mut pass)?;
        }

        let mut version = ShaderVersion::new();
        for block in blocks.iter() {
            block.options(render, &mut version);
        }

        for block in blocks.iter_mut() {
            block.submit_pass(ctx, render, &pass)?;
        }

        for (index, item) in render.shot.items.iter().enumerate() {
            let element = DrawElement { index, item };
            let draw_pass = Pass {
                encoder: EncoderId((index % encoders as usize) as u16),
                ..pass
            };

            for block in blocks.iter_mut() {
                block.submit_element(ctx, render, &element, &draw_pass)?;
            }

            let draw = DrawCall {
                item: index,
                program: version.masks(),
                additive: pass.blend == BlendMode::Add,
            };
            ctx.backend.submit(draw_pass.encoder, pass.view, &draw);
        }
    }

    log::trace!(
        "render_solid: view {}, {} items x {} passes",
        render.view,
        render.shot.items.len(),
        passes
    );
    Ok(())
}

/// Clear the view without drawing
pub fn render_clear(renderer: &mut Renderer, render: &Render<'_>) -> RenderResult<()> {
    renderer.ctx.backend.touch(render.view);
    Ok(())
}
