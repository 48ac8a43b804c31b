//! Canvas rendering using tiny-skia
//!
//! Draws the whole canvas into a pixmap: grid, committed polygons with their
//! labels, then the session in progress on top.

use image::RgbaImage;
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use super::geometry::{self, marker, stroke, text};
use crate::config::{Palette, PolymarkConfig, ShapeColor};
use crate::domain::{Point, Polygon};
use crate::session::state::{AnnotationState, DrawingSession};

/// What to include besides the committed drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    /// Fill with the palette background first (opaque output)
    pub opaque_background: bool,
    /// Draw the rubber-band edge to the pointer
    pub preview: bool,
    /// Highlight the selected polygon
    pub selection: bool,
}

impl RenderOptions {
    /// Settings for Save as PNG
    pub fn export() -> Self {
        Self {
            opaque_background: true,
            preview: false,
            selection: false,
        }
    }
}

fn paint(color: ShapeColor) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.into());
    paint.anti_alias = true;
    paint
}

fn line_stroke(width: f32) -> Stroke {
    Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    }
}

fn pt(p: Point) -> (f32, f32) {
    (p.x as f32, p.y as f32)
}

/// Render the canvas
///
/// Returns `None` for a zero-sized canvas.
pub fn render_canvas(
    state: &AnnotationState,
    config: &PolymarkConfig,
    options: RenderOptions,
) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(config.canvas_width, config.canvas_height)?;
    let palette = &config.palette;

    if options.opaque_background {
        pixmap.fill(palette.background.into());
    }
    draw_grid(&mut pixmap, config.grid_size, palette.grid);

    for polygon in state.polygons.values() {
        let selected = options.selection && state.selected == Some(polygon.id);
        draw_polygon(&mut pixmap, polygon, palette, selected);
    }
    for polygon in state.polygons.values() {
        draw_polygon_labels(&mut pixmap, polygon, palette.text);
    }

    if let Some(session) = state.session() {
        draw_session(&mut pixmap, session, palette, options.preview);
    }

    Some(pixmap)
}

/// Background grid lines every `step` pixels
fn draw_grid(pixmap: &mut Pixmap, step: u32, color: ShapeColor) {
    if step == 0 {
        return;
    }
    let (width, height) = (pixmap.width(), pixmap.height());
    let mut pb = PathBuilder::new();
    // Half-pixel offset keeps one-pixel lines on a single pixel row/column
    for x in geometry::grid_offsets(width, step) {
        pb.move_to(x + 0.5, 0.0);
        pb.line_to(x + 0.5, height as f32);
    }
    for y in geometry::grid_offsets(height, step) {
        pb.move_to(0.0, y + 0.5);
        pb.line_to(width as f32, y + 0.5);
    }
    let Some(path) = pb.finish() else {
        return;
    };
    pixmap.stroke_path(
        &path,
        &paint(color),
        &line_stroke(stroke::GRID),
        Transform::identity(),
        None,
    );
}

fn polygon_path(points: &[Point]) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    let (x, y) = pt(*first);
    pb.move_to(x, y);
    for p in rest {
        let (x, y) = pt(*p);
        pb.line_to(x, y);
    }
    pb.close();
    pb.finish()
}

fn draw_polygon(pixmap: &mut Pixmap, polygon: &Polygon, palette: &Palette, selected: bool) {
    let Some(path) = polygon_path(&polygon.points) else {
        return;
    };
    pixmap.fill_path(
        &path,
        &paint(palette.polygon_fill),
        FillRule::EvenOdd,
        Transform::identity(),
        None,
    );

    let (color, width) = if selected {
        (palette.selection, stroke::SELECTED)
    } else {
        (palette.polygon_stroke, stroke::POLYGON)
    };
    pixmap.stroke_path(
        &path,
        &paint(color),
        &line_stroke(width),
        Transform::identity(),
        None,
    );
}

fn draw_polygon_labels(pixmap: &mut Pixmap, polygon: &Polygon, color: ShapeColor) {
    super::text::draw_label(pixmap, &polygon.label, text::AREA_FONT_SIZE, color);
    for label in &polygon.edge_labels {
        super::text::draw_label(pixmap, label, text::EDGE_FONT_SIZE, color);
    }
}

fn draw_segment(pixmap: &mut Pixmap, a: Point, b: Point, color: ShapeColor) {
    let mut pb = PathBuilder::new();
    let (x0, y0) = pt(a);
    let (x1, y1) = pt(b);
    pb.move_to(x0, y0);
    pb.line_to(x1, y1);
    let Some(path) = pb.finish() else {
        return;
    };
    pixmap.stroke_path(
        &path,
        &paint(color),
        &line_stroke(stroke::EDGE),
        Transform::identity(),
        None,
    );
}

/// Edges, markers and the preview edge of the session in progress
fn draw_session(pixmap: &mut Pixmap, session: &DrawingSession, palette: &Palette, preview: bool) {
    for (a, b) in session.edges() {
        draw_segment(pixmap, a, b, palette.edge);
    }
    if preview && let Some((from, pointer)) = session.preview_edge() {
        draw_segment(pixmap, from, pointer, palette.edge);
    }

    let marker_paint = paint(palette.marker);
    for p in &session.points {
        let (x, y) = pt(*p);
        if let Some(circle) = PathBuilder::from_circle(x, y, marker::RADIUS) {
            pixmap.fill_path(
                &circle,
                &marker_paint,
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }
}

/// Copy a pixmap into an RGBA image, undoing premultiplied alpha
pub fn pixmap_to_rgba(pixmap: &Pixmap) -> Option<RgbaImage> {
    let data: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), data)
}
