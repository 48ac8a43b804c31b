//! Message types for the annotator
//!
//! One message per toolbar button and per pointer event. The command loop
//! builds these from text; a windowed host would build them from clicks.

use std::path::PathBuf;

use crate::domain::Point;

// ============================================================================
// Toolbar
// ============================================================================

/// The six toolbar buttons
#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarMsg {
    /// Start Drawing
    StartDrawing,
    /// Create Polygon
    CreatePolygon,
    /// Clear Canvas
    ClearCanvas,
    /// Undo
    Undo,
    /// Delete Selected Polygon
    DeleteSelected,
    /// Save as PNG, optionally to an explicit path
    SaveAsPng(Option<PathBuf>),
}

// ============================================================================
// Pointer
// ============================================================================

/// Pointer events over the canvas, in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerMsg {
    Move(Point),
    Down(Point),
}

/// Top-level message
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Toolbar(ToolbarMsg),
    Pointer(PointerMsg),
    /// Print the committed polygons
    List,
}

impl Msg {
    pub fn start_drawing() -> Self {
        Self::Toolbar(ToolbarMsg::StartDrawing)
    }
    pub fn create_polygon() -> Self {
        Self::Toolbar(ToolbarMsg::CreatePolygon)
    }
    pub fn clear_canvas() -> Self {
        Self::Toolbar(ToolbarMsg::ClearCanvas)
    }
    pub fn undo() -> Self {
        Self::Toolbar(ToolbarMsg::Undo)
    }
    pub fn delete_selected() -> Self {
        Self::Toolbar(ToolbarMsg::DeleteSelected)
    }
    pub fn save_as_png(path: Option<PathBuf>) -> Self {
        Self::Toolbar(ToolbarMsg::SaveAsPng(path))
    }

    pub fn pointer_move(x: f64, y: f64) -> Self {
        Self::Pointer(PointerMsg::Move(Point::new(x, y)))
    }
    pub fn pointer_down(x: f64, y: f64) -> Self {
        Self::Pointer(PointerMsg::Down(Point::new(x, y)))
    }
}
