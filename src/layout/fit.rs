use image::imageops::{self, FilterType};

use crate::foundation::{
    core::{Canvas, FrameRgb, Rgb8},
    error::GifweaveResult,
};

/// Letterbox color behind every fitted image.
pub const LETTERBOX_COLOR: Rgb8 = Rgb8::WHITE;

/// Largest size with the source aspect ratio that fits inside `canvas`.
///
/// `scale = min(W / w, H / h)` and each side is floored. A side that would floor to 0 is clamped
/// to 1 so extreme aspect ratios still produce a visible sliver.
pub fn fit_dimensions(src_width: u32, src_height: u32, canvas: Canvas) -> (u32, u32) {
    if src_width == 0 || src_height == 0 {
        return (0, 0);
    }
    let sw = f64::from(src_width);
    let sh = f64::from(src_height);
    let scale = (f64::from(canvas.width) / sw).min(f64::from(canvas.height) / sh);

    let w = ((sw * scale).floor() as u32).clamp(1, canvas.width);
    let h = ((sh * scale).floor() as u32).clamp(1, canvas.height);
    (w, h)
}

/// Top-left offset that centers an `inner` sized box on `canvas` (floored).
pub fn center_offset(inner: (u32, u32), canvas: Canvas) -> (u32, u32) {
    (
        canvas.width.saturating_sub(inner.0) / 2,
        canvas.height.saturating_sub(inner.1) / 2,
    )
}

/// Scale `img` proportionally with a Lanczos filter and center it on a white `canvas`.
///
/// The output is always exactly `canvas` sized and never crops the source.
#[tracing::instrument(level = "trace", skip(img), fields(src_w = img.width(), src_h = img.height()))]
pub fn fit_to_canvas(img: &image::RgbImage, canvas: Canvas) -> GifweaveResult<FrameRgb> {
    canvas.validate()?;

    let (w, h) = fit_dimensions(img.width(), img.height(), canvas);
    let mut bg = image::RgbImage::from_pixel(
        canvas.width,
        canvas.height,
        image::Rgb(LETTERBOX_COLOR.to_array()),
    );
    if w == 0 || h == 0 {
        return Ok(FrameRgb::from_rgb_image(bg));
    }

    let (x, y) = center_offset((w, h), canvas);
    if (w, h) == img.dimensions() {
        imageops::replace(&mut bg, img, i64::from(x), i64::from(y));
    } else {
        let resized = imageops::resize(img, w, h, FilterType::Lanczos3);
        imageops::replace(&mut bg, &resized, i64::from(x), i64::from(y));
    }

    Ok(FrameRgb::from_rgb_image(bg))
}

#[cfg(test)]
#[path = "../../tests/unit/layout/fit.rs"]
mod tests;
