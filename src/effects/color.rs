use image::imageops::{self, FilterType};

use crate::foundation::core::{FrameRgb, RGB_CHANNELS, Rgb8};

/// Side of the thumbnail the average is taken over.
const SAMPLE_SIDE: u32 = 50;

/// Mean color of a frame, measured on a 50x50 bicubic thumbnail with integer (floor) averaging.
///
/// An alternative to the fixed white fade color; the default export does not use it.
pub fn average_color(frame: &FrameRgb) -> Rgb8 {
    if frame.data.is_empty() {
        return Rgb8::default();
    }
    let thumb = imageops::resize(
        &frame.to_rgb_image(),
        SAMPLE_SIDE,
        SAMPLE_SIDE,
        FilterType::CatmullRom,
    );

    let mut sum = [0u64; RGB_CHANNELS];
    for px in thumb.pixels() {
        for (s, &c) in sum.iter_mut().zip(px.0.iter()) {
            *s += u64::from(c);
        }
    }
    let n = u64::from(SAMPLE_SIDE * SAMPLE_SIDE);
    Rgb8::new((sum[0] / n) as u8, (sum[1] / n) as u8, (sum[2] / n) as u8)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/color.rs"]
mod tests;
