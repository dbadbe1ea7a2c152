use image::RgbImage;

/// Copy `src` into `canvas` with its top-left at (dx, dy), replacing pixels.
/// Anything falling outside the canvas is clipped.
///
/// Returns the number of pixels actually written.
pub fn paste_rgb(src: &RgbImage, canvas: &mut RgbImage, dx: u32, dy: u32) -> u64 {
    let (cw, ch) = canvas.dimensions();
    let (sw, sh) = src.dimensions();
    if dx >= cw || dy >= ch {
        return 0;
    }
    let rw = sw.min(cw - dx);
    let rh = sh.min(ch - dy);

    for yy in 0..rh {
        for xx in 0..rw {
            let px = *src.get_pixel(xx, yy);
            canvas.put_pixel(dx + xx, dy + yy, px);
        }
    }
    rw as u64 * rh as u64
}
