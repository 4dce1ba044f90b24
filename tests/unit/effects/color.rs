use super::*;
use crate::foundation::core::Canvas;

#[test]
fn solid_frame_averages_to_itself() {
    let c = Rgb8::new(12, 130, 250);
    let f = FrameRgb::filled(Canvas::new(120, 80).unwrap(), c);
    assert_eq!(average_color(&f), c);
}

#[test]
fn half_black_half_white_is_mid_gray() {
    let img = image::RgbImage::from_fn(100, 100, |x, _| {
        if x < 50 {
            image::Rgb([0, 0, 0])
        } else {
            image::Rgb([255, 255, 255])
        }
    });
    let avg = average_color(&FrameRgb::from_rgb_image(img));
    for ch in avg.to_array() {
        assert!((120..=135).contains(&ch), "{avg:?}");
    }
}
