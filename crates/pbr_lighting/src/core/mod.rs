//! Core configuration shared by the pipeline and its blocks

pub mod config;
