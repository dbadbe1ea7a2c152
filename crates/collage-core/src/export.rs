use crate::config::OutputFormat;
use crate::error::{CollageError, Result};
use crate::model::CollageLayout;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use serde::Serialize;
use serde_json::{json, Value};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

/// Encode `canvas` to `path`. JPEG honours `quality` (1..=100); PNG ignores it.
/// Missing parent directories are created.
pub fn save_canvas(
    canvas: &RgbImage,
    path: &Path,
    format: OutputFormat,
    quality: u8,
) -> Result<()> {
    let fail = |reason: String| CollageError::OutputWrite {
        path: path.to_path_buf(),
        reason,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| fail(e.to_string()))?;
    }
    let file = File::create(path).map_err(|e| fail(e.to_string()))?;
    let mut writer = BufWriter::new(file);
    let (w, h) = canvas.dimensions();
    let res = match format.resolve(path) {
        OutputFormat::Png => PngEncoder::new(&mut writer).write_image(
            canvas.as_raw(),
            w,
            h,
            ExtendedColorType::Rgb8,
        ),
        _ => JpegEncoder::new_with_quality(&mut writer, quality.clamp(1, 100)).write_image(
            canvas.as_raw(),
            w,
            h,
            ExtendedColorType::Rgb8,
        ),
    };
    res.map_err(|e| fail(e.to_string()))?;
    writer
        .into_inner()
        .map_err(|e| fail(e.error().to_string()))?
        .sync_all()
        .map_err(|e| fail(e.to_string()))?;
    Ok(())
}

/// Serialize a layout as `{ canvas, grid, placements }`.
pub fn to_json<K: ToString + Serialize>(layout: &CollageLayout<K>) -> Value {
    let placements: Vec<Value> = layout
        .placements
        .iter()
        .map(|p| {
            json!({
                "index": p.index,
                "key": p.key.to_string(),
                "cell": {"col": p.cell.col, "row": p.cell.row},
                "frame": {"x": p.rect.x, "y": p.rect.y, "w": p.rect.w, "h": p.rect.h},
                "sourceSize": {"w": p.source_size.0, "h": p.source_size.1},
                "resized": p.resized,
                "label": p.label,
            })
        })
        .collect();
    json!({
        "canvas": {"w": layout.width, "h": layout.height},
        "grid": &layout.grid,
        "placements": placements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn writes_png_and_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let canvas = RgbImage::from_pixel(8, 6, Rgb([200, 10, 10]));
        let png = dir.path().join("nested/out.png");
        save_canvas(&canvas, &png, OutputFormat::Auto, 90).unwrap();
        let back = image::open(&png).unwrap().to_rgb8();
        assert_eq!(back, canvas);

        let jpg = dir.path().join("out.jpg");
        save_canvas(&canvas, &jpg, OutputFormat::Auto, 80).unwrap();
        assert_eq!(image::image_dimensions(&jpg).unwrap(), (8, 6));
    }

    #[test]
    fn unwritable_path_is_output_error() {
        let dir = tempfile::tempdir().unwrap();
        // a regular file where a directory is expected
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let target = blocker.join("out.jpg");
        let canvas = RgbImage::new(2, 2);
        match save_canvas(&canvas, &target, OutputFormat::Jpeg, 90) {
            Err(CollageError::OutputWrite { path, .. }) => assert_eq!(path, target),
            other => panic!("expected OutputWrite, got {other:?}"),
        }
    }
}
