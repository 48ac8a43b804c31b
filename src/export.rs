//! Save as PNG
//!
//! The canvas is composited over the opaque background color, encoded as
//! RGBA8 PNG and written to disk. The annotator state is not modified.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use image::RgbaImage;

use crate::config::PolymarkConfig;
use crate::render::image::{RenderOptions, pixmap_to_rgba, render_canvas};
use crate::session::state::AnnotationState;

/// Default output path: the configured file name in the save location
pub fn get_img_path(config: &PolymarkConfig) -> Option<PathBuf> {
    let mut path = config.save_location.dir()?;
    path.push(&config.export_file_name);
    Some(path)
}

/// Render the canvas for export
pub fn render_export(
    state: &AnnotationState,
    config: &PolymarkConfig,
) -> anyhow::Result<RgbaImage> {
    let pixmap = render_canvas(state, config, RenderOptions::export()).with_context(|| {
        format!(
            "Invalid canvas size {}x{}",
            config.canvas_width, config.canvas_height
        )
    })?;
    pixmap_to_rgba(&pixmap).context("Rendered pixmap has an unexpected size")
}

/// Export the canvas as PNG
///
/// Writes to `path` when given, otherwise to [`get_img_path`]. Missing parent
/// directories are created. Returns the path written.
pub fn export_png(
    state: &AnnotationState,
    config: &PolymarkConfig,
    path: Option<&Path>,
) -> anyhow::Result<PathBuf> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => get_img_path(config).context("No directory available to save the image")?,
    };
    let img = render_export(state, config)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    save_rgba(&img, &path)?;
    log::info!("Saved canvas to {}", path.display());
    Ok(path)
}

pub fn save_rgba(img: &RgbaImage, path: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = io::BufWriter::new(file);
    write_png(&mut writer, img).with_context(|| format!("Failed to encode {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SaveLocation;
    use crate::domain::Point;
    use crate::session::prompt::ScriptedPrompt;

    fn config(width: u32, height: u32) -> PolymarkConfig {
        PolymarkConfig {
            canvas_width: width,
            canvas_height: height,
            ..PolymarkConfig::default()
        }
    }

    fn decode(bytes: &[u8]) -> (png::OutputInfo, Vec<u8>) {
        let decoder = png::Decoder::new(io::Cursor::new(bytes));
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size().unwrap()];
        let info = reader.next_frame(&mut buf).unwrap();
        buf.truncate(info.buffer_size());
        (info, buf)
    }

    #[test]
    fn test_export_writes_opaque_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("plan.png");

        let mut state = AnnotationState::default();
        state.begin_drawing();
        let mut prompt = ScriptedPrompt::cancelling();
        for (x, y) in [(10.0, 10.0), (50.0, 10.0), (30.0, 40.0)] {
            state.add_point(Point::new(x, y), &mut prompt).unwrap();
        }
        state.commit_polygon(&mut prompt).unwrap();

        let written = export_png(&state, &config(64, 48), Some(&path)).unwrap();
        assert_eq!(written, path);

        let bytes = std::fs::read(&path).unwrap();
        let (info, pixels) = decode(&bytes);
        assert_eq!((info.width, info.height), (64, 48));
        assert_eq!(info.color_type, png::ColorType::Rgba);
        assert!(pixels.chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn test_export_does_not_change_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AnnotationState::default();
        state.begin_drawing();
        state
            .add_point(Point::new(5.0, 5.0), &mut ScriptedPrompt::cancelling())
            .unwrap();
        state.preview_edge(Point::new(20.0, 20.0));
        let before = state.session().cloned();

        export_png(&state, &config(32, 32), Some(&dir.path().join("a.png"))).unwrap();
        assert_eq!(state.session().cloned(), before);
        assert!(state.is_drawing());
    }

    #[test]
    fn test_default_path_uses_file_name() {
        let config = PolymarkConfig {
            save_location: SaveLocation::WorkingDir,
            ..PolymarkConfig::default()
        };
        let path = get_img_path(&config).unwrap();
        assert_eq!(path.file_name().unwrap(), "canvas.png");
        assert_eq!(path.parent().unwrap(), std::env::current_dir().unwrap());
    }

    #[test]
    fn test_zero_sized_canvas_is_an_error() {
        let state = AnnotationState::default();
        assert!(render_export(&state, &config(0, 10)).is_err());
    }
}
