//! Command line arguments

use std::path::PathBuf;

use clap::Parser;

use crate::config::PolymarkConfig;

/// Draw polygons, snap their sides to typed lengths and measure their area
#[derive(Parser, Debug, Default)]
#[command(name = "polymark", version, about)]
pub struct Cli {
    /// Read commands from FILE instead of standard input
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// Directory for Save as PNG (defaults to the configured save location)
    #[arg(long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Canvas width in pixels
    #[arg(long, value_name = "N")]
    pub width: Option<u32>,

    /// Canvas height in pixels
    #[arg(long, value_name = "N")]
    pub height: Option<u32>,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the effective configuration back to the config file
    #[arg(long)]
    pub save_config: bool,
}

impl Cli {
    /// Apply command line overrides on top of the loaded config
    pub fn apply(&self, config: &mut PolymarkConfig) {
        if let Some(width) = self.width {
            config.canvas_width = width;
        }
        if let Some(height) = self.height {
            config.canvas_height = height;
        }
    }
}
