//! Shared drawing constants
//!
//! Sizes are in canvas pixels.

/// Session point markers
pub mod marker {
    /// Marker circle radius
    pub const RADIUS: f32 = 5.0;
}

/// Line widths
pub mod stroke {
    /// Session edges and the preview edge
    pub const EDGE: f32 = 1.0;
    /// Grid lines
    pub const GRID: f32 = 1.0;
    /// Committed polygon outline
    pub const POLYGON: f32 = 1.0;
    /// Outline of the selected polygon
    pub const SELECTED: f32 = 3.0;
}

/// Label font sizes
pub mod text {
    /// Name and area label at the centroid
    pub const AREA_FONT_SIZE: f32 = 16.0;
    /// Edge length labels
    pub const EDGE_FONT_SIZE: f32 = 14.0;
    /// Line height as a multiple of font size
    pub const LINE_HEIGHT: f32 = 1.2;
}

/// Grid line offsets along one axis, `0, step, 2*step, ...` below `extent`
pub fn grid_offsets(extent: u32, step: u32) -> impl Iterator<Item = f32> {
    let step = step.max(1) as usize;
    (0..extent).step_by(step).map(|v| v as f32)
}
