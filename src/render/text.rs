//! Label rasterization with cosmic-text
//!
//! Labels are laid out once per draw and blitted into the pixmap centered on
//! their anchor point. Multi-line labels (name + area) are centered per line.

use std::sync::Mutex;

use cosmic_text::{Align, Attrs, Buffer, Color, Family, FontSystem, Metrics, Shaping, SwashCache};
use tiny_skia::{Paint, Pixmap, Rect, Transform};

use super::geometry::text::LINE_HEIGHT;
use crate::config::ShapeColor;
use crate::domain::Label;

// Font discovery is slow; share one font system for the whole process
lazy_static::lazy_static! {
    static ref FONT_SYSTEM: Mutex<FontSystem> = Mutex::new(FontSystem::new());
    static ref SWASH_CACHE: Mutex<SwashCache> = Mutex::new(SwashCache::new());
}

/// Width of the layout box; labels are short so this never wraps in practice
const LAYOUT_WIDTH: f32 = 1024.0;

/// Draw a label centered on its position
pub fn draw_label(pixmap: &mut Pixmap, label: &Label, font_size: f32, color: ShapeColor) {
    if label.text.is_empty() {
        return;
    }
    let (Ok(mut font_system), Ok(mut swash_cache)) = (FONT_SYSTEM.lock(), SWASH_CACHE.lock())
    else {
        log::error!("Font system lock poisoned, skipping label {:?}", label.text);
        return;
    };

    let metrics = Metrics::new(font_size, font_size * LINE_HEIGHT);
    let mut buffer = Buffer::new(&mut font_system, metrics);
    buffer.set_size(&mut font_system, Some(LAYOUT_WIDTH), None);
    buffer.set_text(
        &mut font_system,
        &label.text,
        &Attrs::new().family(Family::SansSerif),
        Shaping::Advanced,
        Some(Align::Center),
    );
    buffer.shape_until_scroll(&mut font_system, false);

    // Bounds of the laid out text inside the layout box
    let mut min_x = f32::MAX;
    let mut max_x = f32::MIN;
    let mut height = 0.0f32;
    for run in buffer.layout_runs() {
        for glyph in run.glyphs.iter() {
            min_x = min_x.min(glyph.x);
            max_x = max_x.max(glyph.x + glyph.w);
        }
        height = height.max(run.line_top + run.line_height);
    }
    if min_x > max_x {
        // No glyphs, e.g. no fonts installed
        log::debug!("Label {:?} produced no glyphs", label.text);
        return;
    }

    let origin_x = label.position.x as f32 - (min_x + max_x) / 2.0;
    let origin_y = label.position.y as f32 - height / 2.0;
    let [r, g, b, _] = color.to_rgba_u8();

    buffer.draw(
        &mut font_system,
        &mut swash_cache,
        Color::rgb(r, g, b),
        |x, y, w, h, glyph_color| {
            if glyph_color.a() == 0 {
                return;
            }
            let Some(rect) = Rect::from_xywh(
                origin_x + x as f32,
                origin_y + y as f32,
                w as f32,
                h as f32,
            ) else {
                return;
            };
            let mut paint = Paint::default();
            paint.set_color_rgba8(
                glyph_color.r(),
                glyph_color.g(),
                glyph_color.b(),
                glyph_color.a(),
            );
            pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Point;

    fn fonts_available() -> bool {
        FONT_SYSTEM
            .lock()
            .map(|fs| fs.db().faces().next().is_some())
            .unwrap_or(false)
    }

    fn white_canvas() -> Pixmap {
        let mut pixmap = Pixmap::new(200, 100).unwrap();
        pixmap.fill(tiny_skia::Color::WHITE);
        pixmap
    }

    fn is_white(pixmap: &Pixmap, x: u32, y: u32) -> bool {
        let c = pixmap.pixel(x, y).unwrap().demultiply();
        (c.red(), c.green(), c.blue()) == (255, 255, 255)
    }

    #[test]
    fn test_label_is_drawn_around_anchor() {
        if !fonts_available() {
            eprintln!("no fonts installed, skipping label rasterization");
            return;
        }
        let mut pixmap = white_canvas();
        let label = Label {
            text: "Area: 100.00 sq ft".to_string(),
            position: Point::new(100.0, 50.0),
        };
        draw_label(&mut pixmap, &label, 16.0, ShapeColor::rgb(0.0, 0.0, 0.0));

        let inked: Vec<(u32, u32)> = (0..100)
            .flat_map(|y| (0..200).map(move |x| (x, y)))
            .filter(|&(x, y)| !is_white(&pixmap, x, y))
            .collect();
        assert!(!inked.is_empty(), "label left the canvas blank");
        // Text is centered on the anchor
        assert!(inked.iter().any(|&(x, _)| x < 100));
        assert!(inked.iter().any(|&(x, _)| x > 100));
        assert!(
            inked.iter().all(|&(_, y)| y.abs_diff(50) < 20),
            "ink far from the anchor line"
        );
    }

    #[test]
    fn test_empty_label_draws_nothing() {
        let mut pixmap = white_canvas();
        let label = Label {
            text: String::new(),
            position: Point::new(100.0, 50.0),
        };
        draw_label(&mut pixmap, &label, 16.0, ShapeColor::rgb(0.0, 0.0, 0.0));
        assert!(pixmap.pixels().iter().all(|p| p.red() == 255 && p.alpha() == 255));
    }
}
