//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types and operations
//! - sRGB colour handling
//! - Logging utilities

pub mod colour;
pub mod logging;
pub mod math;
