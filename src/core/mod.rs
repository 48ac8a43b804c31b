//! Core application module
//!
//! This module contains:
//! - Application entry point and the command loop
//! - Command line arguments
//! - The console that answers prompts from the input stream

pub mod app;
pub mod cli;
pub mod console;
