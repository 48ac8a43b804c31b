//! Canvas rendering module
//!
//! This module contains:
//! - Drawing constants shared by all canvas layers
//! - Pixmap rendering using tiny-skia
//! - Label rasterization using cosmic-text

pub mod geometry;
pub mod image;
pub mod text;
