//! Configuration persistence for polymark settings

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::domain::Units;

/// Serializable color representation for config storage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for ShapeColor {
    fn default() -> Self {
        // Marker red
        Self {
            r: 1.0,
            g: 0.0,
            b: 0.0,
        }
    }
}

impl ShapeColor {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Convert to RGBA bytes (0-255)
    pub fn to_rgba_u8(self) -> [u8; 4] {
        [
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            255,
        ]
    }
}

impl From<ShapeColor> for tiny_skia::Color {
    fn from(c: ShapeColor) -> Self {
        let [r, g, b, a] = c.to_rgba_u8();
        tiny_skia::Color::from_rgba8(r, g, b, a)
    }
}

/// Save location for exported images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SaveLocation {
    #[default]
    Pictures,
    Documents,
    /// Current working directory
    WorkingDir,
}

impl SaveLocation {
    /// Resolve to a directory, falling back to the home folder layout
    pub fn dir(self) -> Option<PathBuf> {
        match self {
            SaveLocation::Pictures => {
                dirs::picture_dir().or_else(|| dirs::home_dir().map(|h| h.join("Pictures")))
            }
            SaveLocation::Documents => {
                dirs::document_dir().or_else(|| dirs::home_dir().map(|h| h.join("Documents")))
            }
            SaveLocation::WorkingDir => std::env::current_dir().ok(),
        }
    }
}

/// Colors used to draw the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: ShapeColor,
    pub grid: ShapeColor,
    pub marker: ShapeColor,
    pub edge: ShapeColor,
    pub polygon_stroke: ShapeColor,
    pub polygon_fill: ShapeColor,
    pub selection: ShapeColor,
    pub text: ShapeColor,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: ShapeColor::rgb(1.0, 1.0, 1.0),
            // #ddd
            grid: ShapeColor::rgb(0.867, 0.867, 0.867),
            marker: ShapeColor::default(),
            edge: ShapeColor::rgb(0.0, 0.0, 0.0),
            polygon_stroke: ShapeColor::rgb(0.0, 0.0, 1.0),
            // light yellow
            polygon_fill: ShapeColor::rgb(1.0, 1.0, 0.878),
            selection: ShapeColor::rgb(1.0, 0.55, 0.0),
            text: ShapeColor::rgb(0.0, 0.0, 0.0),
        }
    }
}

/// Application configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolymarkConfig {
    /// Canvas width in pixels
    #[serde(default = "default_canvas_size")]
    pub canvas_width: u32,
    /// Canvas height in pixels
    #[serde(default = "default_canvas_size")]
    pub canvas_height: u32,
    /// Grid spacing in pixels (0 disables the grid)
    #[serde(default = "default_grid_size")]
    pub grid_size: u32,
    /// Unit used for prompted lengths and for labels
    #[serde(default)]
    pub units: Units,
    /// Where exported images go when no explicit path is given
    #[serde(default)]
    pub save_location: SaveLocation,
    /// File name of the exported image
    #[serde(default = "default_export_file_name")]
    pub export_file_name: String,
    /// Drawing colors
    #[serde(default)]
    pub palette: Palette,
}

fn default_canvas_size() -> u32 {
    600
}

fn default_grid_size() -> u32 {
    10
}

fn default_export_file_name() -> String {
    "canvas.png".to_string()
}

impl PolymarkConfig {
    /// Directory name under the platform config dir
    pub const ID: &'static str = "polymark";

    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::ID).join("config.json"))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::default_path) else {
            log::warn!("No config directory available, using defaults");
            return Self::default();
        };
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::read(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {:?}", err);
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        anyhow::ensure!(
            config.units.is_valid(),
            "Invalid pixels_per_unit {} in {}, it must be a positive number",
            config.units.pixels_per_unit,
            path.display()
        );
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self, path: Option<&Path>) -> anyhow::Result<PathBuf> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(Self::default_path)
            .context("No config directory available")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(path)
    }
}

impl Default for PolymarkConfig {
    fn default() -> Self {
        Self {
            canvas_width: default_canvas_size(),
            canvas_height: default_canvas_size(),
            grid_size: default_grid_size(),
            units: Units::default(),
            save_location: SaveLocation::Pictures,
            export_file_name: default_export_file_name(),
            palette: Palette::default(),
        }
    }
}
