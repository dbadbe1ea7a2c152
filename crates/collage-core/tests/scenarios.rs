use collage_core::error::CollageError;
use collage_core::prelude::*;
use image::{DynamicImage, Rgb, RgbImage};

fn solid(key: &str, w: u32, h: u32, c: [u8; 3]) -> InputTile {
    InputTile::from_image(key, DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb(c))))
}

fn cfg(cols: u32, offset: u32) -> LayoutConfig {
    LayoutConfig::builder()
        .tile_size(16, 24)
        .cols(cols)
        .offset(offset)
        .padding(5)
        .gap(2)
        .build()
}

#[test]
fn five_tiles_in_one_row() {
    let tiles: Vec<_> = (0..5).map(|i| solid(&format!("t{i}"), 16, 24, [i * 40, 0, 0])).collect();
    let out = compose(&tiles, cfg(5, 0)).unwrap();
    assert_eq!(out.layout.grid.rows, 1);
    assert_eq!(out.canvas.width(), 2 * 5 + 5 * 16 + 4 * 2);
    assert_eq!(out.canvas.height(), 2 * 5 + 24);
}

#[test]
fn offset_skips_leading_cells() {
    let tiles: Vec<_> = (0..7).map(|i| solid(&format!("t{i}"), 16, 24, [0, i * 30, 0])).collect();
    let out = compose(&tiles, cfg(5, 2)).unwrap();
    let l = &out.layout;
    assert_eq!(l.grid.rows, 2);
    assert_eq!(l.placements[0].cell, Cell { col: 2, row: 0 });
    assert_eq!(l.placements[4].cell, Cell { col: 1, row: 1 });
    assert_eq!(l.empty_cells(), 3);

    // first two cells stay background
    let white = Rgb([255, 255, 255]);
    assert_eq!(*out.canvas.get_pixel(5, 5), white);
    assert_eq!(*out.canvas.get_pixel(5 + 18, 5), white);
    assert_eq!(*out.canvas.get_pixel(5 + 2 * 18, 5), Rgb([0, 0, 0]));
}

#[test]
fn zero_cols_fails_before_loading_anything() {
    // the tile path does not exist; a config error must win
    let tiles = vec![InputTile::from_path("does/not/exist.jpg")];
    match compose(&tiles, cfg(0, 0)) {
        Err(CollageError::InvalidConfig(msg)) => assert!(msg.contains("cols")),
        Err(other) => panic!("expected InvalidConfig, got {other}"),
        Ok(_) => panic!("expected InvalidConfig"),
    }
}

#[test]
fn default_label_for_index_three() {
    assert_eq!(Numbering::default().label(3), "4");
}

#[test]
fn missing_tile_aborts_with_its_key() {
    let tiles = vec![
        solid("ok", 16, 24, [1, 1, 1]),
        InputTile::from_path("missing/tile.jpg"),
        solid("never", 16, 24, [2, 2, 2]),
    ];
    let mut seen = 0;
    let res = Composer::new(cfg(3, 0))
        .with_progress(|_| seen += 1)
        .compose(&tiles);
    match res {
        Err(CollageError::TileLoad { key, .. }) => assert_eq!(key, "missing/tile.jpg"),
        Err(other) => panic!("expected TileLoad, got {other}"),
        Ok(_) => panic!("expected TileLoad"),
    }
    assert_eq!(seen, 2);
}

#[test]
fn undersized_resized_tile_is_anchored_top_left() {
    let c = LayoutConfig::builder()
        .tile_size(20, 20)
        .cols(1)
        .padding(0)
        .gap(0)
        .resize(true)
        .bgcolor(Color::BLACK)
        .build();
    let out = compose(&[solid("wide", 40, 10, [200, 200, 200])], c).unwrap();
    let p = &out.layout.placements[0];
    assert!(p.resized);
    assert_eq!(p.rect, Rect::new(0, 0, 20, 5));
    let px = out.canvas.get_pixel(10, 2);
    assert!(px.0.iter().all(|&v| v.abs_diff(200) <= 1), "got {px:?}");
    // below the resized tile the background shows through
    assert_eq!(*out.canvas.get_pixel(10, 15), Rgb([0, 0, 0]));
}

#[test]
fn oversized_tile_without_resize_is_clipped() {
    let c = LayoutConfig::builder().tile_size(10, 10).cols(1).padding(0).gap(0).build();
    let out = compose(&[solid("big", 30, 30, [7, 7, 7])], c).unwrap();
    assert_eq!(out.canvas.dimensions(), (10, 10));
    assert_eq!(out.layout.placements[0].rect, Rect::new(0, 0, 30, 30));
    assert!(!out.layout.placements[0].resized);
}

#[test]
fn compose_is_deterministic() {
    let make = || {
        (0..6)
            .map(|i| solid(&format!("t{i}"), 30 + i as u32, 20, [i * 20, 100, 50]))
            .collect::<Vec<_>>()
    };
    let c = LayoutConfig::builder().tile_size(16, 16).cols(4).resize(true).build();
    let a = compose(&make(), c.clone()).unwrap();
    let b = compose(&make(), c).unwrap();
    assert_eq!(a.canvas, b.canvas);
    assert_eq!(a.layout, b.layout);
}

#[test]
fn plan_layout_agrees_with_compose() {
    let sizes = vec![("a", 16, 24), ("b", 40, 10), ("c", 8, 60), ("d", 16, 24)];
    let c = LayoutConfig::builder()
        .tile_size(16, 24)
        .cols(3)
        .offset(1)
        .resize(true)
        .build();
    let planned = plan_layout(&sizes, &c).unwrap();
    let tiles: Vec<_> = sizes
        .iter()
        .map(|(k, w, h)| solid(k, *w, *h, [0, 0, 0]))
        .collect();
    let composed = compose(&tiles, c).unwrap().layout;
    assert_eq!((planned.width, planned.height), (composed.width, composed.height));
    for (p, q) in planned.placements.iter().zip(&composed.placements) {
        assert_eq!(p.key, q.key);
        assert_eq!(p.cell, q.cell);
        assert_eq!(p.rect, q.rect, "rect mismatch for {}", p.key);
        assert_eq!(p.resized, q.resized);
    }
}

#[test]
fn write_without_font_is_rejected() {
    let c = LayoutConfig::builder().write(true).build();
    assert!(matches!(
        compose(&[solid("a", 1, 1, [0, 0, 0])], c),
        Err(CollageError::InvalidConfig(_))
    ));
}

#[test]
fn unreadable_font_is_reported() {
    let c = LayoutConfig::builder().font("no/such/font.ttf").build();
    assert!(matches!(
        compose(&[solid("a", 1, 1, [0, 0, 0])], c),
        Err(CollageError::Font { .. })
    ));
}

#[test]
fn empty_canvas_is_rejected_before_encoding() {
    let c = LayoutConfig::builder().tile_size(16, 24).cols(3).padding(0).build();
    match compose(&[], c) {
        Err(CollageError::InvalidConfig(msg)) => assert!(msg.contains("empty")),
        Err(other) => panic!("expected InvalidConfig, got {other}"),
        Ok(_) => panic!("expected InvalidConfig"),
    }
    // padding alone still yields a drawable canvas
    let c = LayoutConfig::builder().tile_size(16, 24).cols(3).padding(2).build();
    let out = compose(&[], c).unwrap();
    assert_eq!(out.canvas.dimensions(), (4 + 3 * 16 + 2 * 2, 4));
}
