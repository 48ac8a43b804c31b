//! Annotator message handling
//!
//! This module provides:
//! - Message handlers that apply toolbar and pointer input to the state
//! - User feedback for each handled message

pub mod handlers;

pub use handlers::{Notice, handle_msg};
