//! Pure domain types with minimal dependencies
//!
//! Geometry and committed polygon types. Nothing here knows about
//! rendering, prompts or the command loop.

pub mod annotation;
pub mod geometry;

pub use annotation::*;
pub use geometry::*;
