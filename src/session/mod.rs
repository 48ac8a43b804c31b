//! Drawing session management
//!
//! This module contains:
//! - The annotator state machine and its operations
//! - Message types for toolbar and pointer input
//! - The modal prompt contract
//! - Text command parsing for the driver

pub mod commands;
pub mod messages;
pub mod prompt;
pub mod state;
