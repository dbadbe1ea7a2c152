use collage_core::error::CollageError;
use collage_core::prelude::*;
use image::{Rgb, RgbImage};

#[test]
fn composes_files_from_disk_to_png() {
    let dir = tempfile::tempdir().unwrap();
    let mut tiles = Vec::new();
    for (i, c) in [[255u8, 0, 0], [0, 255, 0], [0, 0, 255]].iter().enumerate() {
        let p = dir.path().join(format!("{i}.png"));
        RgbImage::from_pixel(12, 8, Rgb(*c)).save(&p).unwrap();
        tiles.push(InputTile::from_path(p));
    }
    let cfg = LayoutConfig::builder()
        .tile_size(12, 8)
        .cols(2)
        .padding(3)
        .gap(1)
        .build();
    let out_path = dir.path().join("out/collage.png");
    let layout = Composer::new(cfg).compose_to_file(&tiles, &out_path).unwrap();

    let img = image::open(&out_path).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (layout.width, layout.height));
    assert_eq!(img.dimensions(), (3 * 2 + 24 + 1, 3 * 2 + 16 + 1));
    assert_eq!(*img.get_pixel(3, 3), Rgb([255, 0, 0]));
    assert_eq!(*img.get_pixel(3 + 13, 3), Rgb([0, 255, 0]));
    assert_eq!(*img.get_pixel(3, 3 + 9), Rgb([0, 0, 255]));

    let json = collage_core::to_json(&layout);
    assert_eq!(json["placements"].as_array().unwrap().len(), 3);
    assert_eq!(json["canvas"]["w"], layout.width);
    assert_eq!(json["grid"]["cols"], 2);
}

#[test]
fn failed_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("collage.jpg");
    let tiles = vec![InputTile::from_path(dir.path().join("absent.jpg"))];
    let res = Composer::new(LayoutConfig::default()).compose_to_file(&tiles, &out_path);
    assert!(matches!(res, Err(CollageError::TileLoad { .. })));
    assert!(!out_path.exists());
}

#[test]
fn jpeg_quality_changes_encoding() {
    let dir = tempfile::tempdir().unwrap();
    let mut canvas = RgbImage::new(64, 64);
    for (x, y, px) in canvas.enumerate_pixels_mut() {
        *px = Rgb([(x * 4) as u8, (y * 4) as u8, ((x ^ y) * 4) as u8]);
    }
    let lo = dir.path().join("lo.jpg");
    let hi = dir.path().join("hi.jpg");
    save_canvas(&canvas, &lo, OutputFormat::Auto, 10).unwrap();
    save_canvas(&canvas, &hi, OutputFormat::Auto, 95).unwrap();
    let lo_len = std::fs::metadata(&lo).unwrap().len();
    let hi_len = std::fs::metadata(&hi).unwrap().len();
    assert!(lo_len < hi_len, "q10={lo_len} q95={hi_len}");
}
