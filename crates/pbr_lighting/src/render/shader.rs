//! Shader variant selection
//!
//! Every render block owns a shader block: a list of named boolean options and
//! preprocessor defines. A [`ShaderVersion`] carries one option mask per block
//! and identifies the program variant used for a pass.

/// Maximum number of shader blocks in a pipeline
pub const MAX_SHADER_BLOCKS: usize = 8;

/// Index of the base shader block, owned by the pipeline itself
pub const BASE_BLOCK: usize = 0;

/// Options of the base shader block
pub mod base_options {
    /// Lights are fetched through the camera's light clusters
    pub const CLUSTERED: u32 = 0;
    /// Option names of the base block, by index
    pub const NAMES: &[&str] = &["CLUSTERED"];
}

/// A preprocessor define injected into every program using a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderDefine {
    /// Define name
    pub name: &'static str,
    /// Define value
    pub value: String,
}

/// Options and defines contributed by a render block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderBlock {
    /// Option names, the position is the option index
    pub options: &'static [&'static str],
    /// Defines
    pub defines: Vec<ShaderDefine>,
}

impl ShaderBlock {
    /// Index of a named option
    pub fn option_index(&self, name: &str) -> Option<u32> {
        self.options.iter().position(|option| *option == name).map(|index| index as u32)
    }
}

/// Option masks selecting one program variant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ShaderVersion {
    options: [u32; MAX_SHADER_BLOCKS],
}

impl ShaderVersion {
    /// Version with every option off
    pub const fn new() -> Self {
        Self {
            options: [0; MAX_SHADER_BLOCKS],
        }
    }

    /// Switch option `option` of block `block` on or off
    ///
    /// # Panics
    /// Panics if `block` is not below [`MAX_SHADER_BLOCKS`] or `option` is not below 32.
    pub fn set_option(&mut self, block: usize, option: u32, enabled: bool) {
        let mask = 1u32 << option;
        if enabled {
            self.options[block] |= mask;
        } else {
            self.options[block] &= !mask;
        }
    }

    /// Whether option `option` of block `block` is on
    pub fn has_option(&self, block: usize, option: u32) -> bool {
        self.options.get(block).is_some_and(|mask| mask & (1u32 << option) != 0)
    }

    /// Option mask of one block
    pub fn block_options(&self, block: usize) -> u32 {
        self.options.get(block).copied().unwrap_or(0)
    }

    /// All option masks
    pub const fn masks(&self) -> [u32; MAX_SHADER_BLOCKS] {
        self.options
    }
}
