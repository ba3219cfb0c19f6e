//! In-memory backend that records every command
//!
//! Resources live in slot maps and keep their last contents, so callers can
//! read back exactly what was uploaded. Per-frame commands are appended to a
//! log read back through [`RecordingBackend::commands`].

use slotmap::SlotMap;

use crate::render::backend::{
    BackendCaps, DrawCall, EncoderId, GfxBackend, TextureDesc, TextureHandle, UniformHandle,
    UniformKind, ViewId,
};
use crate::render::{RenderError, RenderResult};

/// A uniform created on the recording backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedUniform {
    /// Uniform name
    pub name: String,
    /// Element kind
    pub kind: UniformKind,
    /// Element count
    pub count: u16,
}

/// A texture created on the recording backend
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedTexture {
    /// Creation parameters
    pub desc: TextureDesc,
    /// Last uploaded contents
    pub data: Vec<u8>,
    /// Number of updates received
    pub updates: usize,
}

impl RecordedTexture {
    /// Contents read back as RGBA32F texels, row major
    pub fn texels(&self) -> Vec<[f32; 4]> {
        self.data
            .chunks_exact(16)
            .map(|texel| {
                let mut out = [0.0; 4];
                for (channel, bytes) in out.iter_mut().zip(texel.chunks_exact(4)) {
                    *channel = f32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
                }
                out
            })
            .collect()
    }
}

/// One recorded backend command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `set_view_uniform`
    ViewUniform {
        /// Target view
        view: ViewId,
        /// Uniform set
        uniform: UniformHandle,
        /// Uploaded vec4 values
        data: Vec<[f32; 4]>,
    },
    /// `set_texture`
    Texture {
        /// Target encoder
        encoder: EncoderId,
        /// Sampler stage
        stage: u8,
        /// Bound texture
        texture: TextureHandle,
    },
    /// `touch`
    Touch {
        /// Touched view
        view: ViewId,
    },
    /// `submit`
    Submit {
        /// Recording encoder
        encoder: EncoderId,
        /// Target view
        view: ViewId,
        /// Submitted draw
        draw: DrawCall,
    },
}

/// Backend storing resources in memory and logging commands
#[derive(Debug)]
pub struct RecordingBackend {
    caps: BackendCaps,
    uniforms: SlotMap<UniformHandle, RecordedUniform>,
    textures: SlotMap<TextureHandle, RecordedTexture>,
    commands: Vec<Command>,
    active_encoders: u32,
}

impl RecordingBackend {
    /// Create a backend reporting the given capabilities
    pub fn new(caps: BackendCaps) -> Self {
        Self {
            caps,
            uniforms: SlotMap::with_key(),
            textures: SlotMap::with_key(),
            commands: Vec::new(),
            active_encoders: 0,
        }
    }

    /// Recorded commands, oldest first
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Look up a uniform by name
    pub fn uniform_named(&self, name: &str) -> Option<(UniformHandle, &RecordedUniform)> {
        self.uniforms.iter().find(|(_, uniform)| uniform.name == name)
    }

    /// Number of uniforms created
    pub fn uniform_count(&self) -> usize {
        self.uniforms.len()
    }

    /// Texture created by the backend
    pub fn texture(&self, handle: TextureHandle) -> Option<&RecordedTexture> {
        self.textures.get(handle)
    }

    /// Number of live textures
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Last data set on a view for the named uniform
    pub fn view_uniform(&self, view: ViewId, name: &str) -> Option<&[[f32; 4]]> {
        let (handle, _) = self.uniform_named(name)?;
        self.commands.iter().rev().find_map(|command| match command {
            Command::ViewUniform { view: v, uniform, data } if *v == view && *uniform == handle => {
                Some(data.as_slice())
            }
            _ => None,
        })
    }

    /// Texture bindings recorded on an encoder, in order
    pub fn texture_bindings(&self, encoder: EncoderId) -> Vec<(u8, TextureHandle)> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                Command::Texture { encoder: e, stage, texture } if *e == encoder => Some((*stage, *texture)),
                _ => None,
            })
            .collect()
    }

    /// Draws submitted so far
    pub fn draws(&self) -> Vec<(EncoderId, ViewId, DrawCall)> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                Command::Submit { encoder, view, draw } => Some((*encoder, *view, *draw)),
                _ => None,
            })
            .collect()
    }

    /// Encoders currently acquired
    pub const fn active_encoders(&self) -> u32 {
        self.active_encoders
    }
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new(BackendCaps::default())
    }
}

impl GfxBackend for RecordingBackend {
    fn caps(&self) -> BackendCaps {
        self.caps
    }

    fn create_uniform(&mut self, name: &str, kind: UniformKind, count: u16) -> RenderResult<UniformHandle> {
        if count == 0 || count > self.caps.max_uniform_array {
            return Err(RenderError::ResourceCreationFailed(format!(
                "uniform {name}: array size {count} outside 1..={}",
                self.caps.max_uniform_array
            )));
        }

        log::trace!("RecordingBackend: uniform {} ({:?} x{})", name, kind, count);
        Ok(self.uniforms.insert(RecordedUniform {
            name: name.to_owned(),
            kind,
            count,
        }))
    }

    fn create_texture(&mut self, desc: &TextureDesc) -> RenderResult<TextureHandle> {
        if desc.width == 0 || desc.height == 0 {
            return Err(RenderError::ResourceCreationFailed(format!(
                "texture {}: empty extent {}x{}",
                desc.label, desc.width, desc.height
            )));
        }

        log::trace!("RecordingBackend: texture {} {}x{}", desc.label, desc.width, desc.height);
        Ok(self.textures.insert(RecordedTexture {
            desc: *desc,
            data: vec![0; desc.byte_size()],
            updates: 0,
        }))
    }

    fn update_texture(&mut self, texture: TextureHandle, data: &[u8]) -> RenderResult<()> {
        let record = self
            .textures
            .get_mut(texture)
            .ok_or_else(|| RenderError::InvalidHandle(format!("{texture:?}")))?;

        if data.len() != record.desc.byte_size() {
            return Err(RenderError::BackendError(format!(
                "texture {}: update of {} bytes, expected {}",
                record.desc.label,
                data.len(),
                record.desc.byte_size()
            )));
        }

        record.data.copy_from_slice(data);
        record.updates += 1;
        Ok(())
    }

    fn destroy_texture(&mut self, texture: TextureHandle) {
        self.textures.remove(texture);
    }

    fn set_view_uniform(&mut self, view: ViewId, uniform: UniformHandle, data: &[[f32; 4]]) {
        self.commands.push(Command::ViewUniform {
            view,
            uniform,
            data: data.to_vec(),
        });
    }

    fn set_texture(&mut self, encoder: EncoderId, stage: u8, texture: TextureHandle) {
        self.commands.push(Command::Texture { encoder, stage, texture });
    }

    fn begin_encoders(&mut self, count: u32) -> RenderResult<u32> {
        if self.active_encoders != 0 {
            return Err(RenderError::BackendError("encoders already acquired this frame".into()));
        }
        self.active_encoders = count.clamp(1, self.caps.max_encoders.max(1));
        Ok(self.active_encoders)
    }

    fn end_encoders(&mut self) {
        self.active_encoders = 0;
    }

    fn touch(&mut self, view: ViewId) {
        self.commands.push(Command::Touch { view });
    }

    fn submit(&mut self, encoder: EncoderId, view: ViewId, draw: &DrawCall) {
        self.commands.push(Command::Submit {
            encoder,
            view,
            draw: *draw,
        });
    }
}
