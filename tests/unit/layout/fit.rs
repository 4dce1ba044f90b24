use super::*;

fn canvas(w: u32, h: u32) -> Canvas {
    Canvas::new(w, h).unwrap()
}

#[test]
fn wide_image_fills_width() {
    assert_eq!(fit_dimensions(1600, 400, canvas(800, 600)), (800, 200));
    assert_eq!(center_offset((800, 200), canvas(800, 600)), (0, 200));
}

#[test]
fn tall_image_fills_height() {
    assert_eq!(fit_dimensions(300, 1200, canvas(800, 600)), (150, 600));
    assert_eq!(center_offset((150, 600), canvas(800, 600)), (325, 0));
}

#[test]
fn small_image_is_upscaled() {
    assert_eq!(fit_dimensions(40, 30, canvas(800, 600)), (800, 600));
}

#[test]
fn odd_remainders_are_floored() {
    assert_eq!(center_offset((3, 2), canvas(6, 5)), (1, 1));
}

#[test]
fn extreme_aspect_ratio_keeps_one_pixel() {
    let (w, h) = fit_dimensions(10_000, 1, canvas(100, 100));
    assert_eq!((w, h), (100, 1));
}

#[test]
fn aspect_ratio_within_rounding() {
    for (sw, sh) in [(1920u32, 1080u32), (333, 777), (1000, 999), (7, 3)] {
        let c = canvas(800, 600);
        let (w, h) = fit_dimensions(sw, sh, c);
        assert!(w <= c.width && h <= c.height);
        assert!(w + 1 >= c.width || h + 1 >= c.height);
        let src = f64::from(sw) / f64::from(sh);
        let lo = f64::from(w) / f64::from(h + 1);
        let hi = f64::from(w + 1) / f64::from(h);
        assert!(lo <= src + 1e-9 && src <= hi + 1e-9, "{sw}x{sh} -> {w}x{h}");
    }
}

#[test]
fn fit_output_is_exact_canvas_with_white_bars() {
    let src = image::RgbImage::from_pixel(40, 10, image::Rgb([255, 0, 0]));
    let out = fit_to_canvas(&src, canvas(40, 40)).unwrap();
    assert_eq!((out.width, out.height), (40, 40));
    assert_eq!(out.data.len(), 40 * 40 * 3);

    // Letterbox bars above and below, content centered.
    assert_eq!(out.pixel(20, 0), Rgb8::WHITE);
    assert_eq!(out.pixel(20, 39), Rgb8::WHITE);
    assert_eq!(out.pixel(20, 20), Rgb8::new(255, 0, 0));
}

#[test]
fn fit_same_size_copies_pixels() {
    let src = image::RgbImage::from_fn(4, 4, |x, y| image::Rgb([x as u8 * 10, y as u8 * 10, 7]));
    let out = fit_to_canvas(&src, canvas(4, 4)).unwrap();
    assert_eq!(out.data, src.into_raw());
}

#[test]
fn fit_rejects_zero_canvas() {
    let src = image::RgbImage::new(4, 4);
    assert!(fit_to_canvas(&src, Canvas { width: 0, height: 4 }).is_err());
}
