use super::*;
use crate::foundation::core::Canvas;

fn solid(w: u32, h: u32, c: Rgb8) -> FrameRgb {
    FrameRgb::filled(Canvas::new(w, h).unwrap(), c)
}

#[test]
fn cross_fade_emits_exactly_steps_frames() {
    let a = solid(2, 2, Rgb8::new(0, 0, 0));
    let b = solid(2, 2, Rgb8::new(200, 100, 50));
    for steps in [1u32, 2, 7, 15] {
        let frames = cross_fade(&a, &b, steps).unwrap();
        assert_eq!(frames.len(), steps as usize);
        assert!(frames.iter().all(|f| f.width == 2 && f.height == 2));
    }
}

#[test]
fn cross_fade_starts_at_a_and_never_reaches_b() {
    let a = solid(3, 1, Rgb8::new(10, 20, 30));
    let b = solid(3, 1, Rgb8::new(210, 220, 230));
    let frames = cross_fade(&a, &b, 4).unwrap();

    assert_eq!(frames[0], a);
    assert_ne!(frames[3], b);
    // alpha = 3/4: 10*0.25 + 210*0.75 = 160
    assert_eq!(frames[3].pixel(0, 0), Rgb8::new(160, 170, 180));
}

#[test]
fn cross_fade_truncates_instead_of_rounding() {
    let a = solid(1, 1, Rgb8::new(0, 0, 0));
    let b = solid(1, 1, Rgb8::new(255, 255, 255));
    let frames = cross_fade(&a, &b, 4).unwrap();
    // 255 * 0.25 = 63.75
    assert_eq!(frames[1].pixel(0, 0), Rgb8::new(63, 63, 63));

    let c = solid(1, 1, Rgb8::new(1, 1, 1));
    let frames = cross_fade(&a, &c, 2).unwrap();
    // 0.5 truncates to 0
    assert_eq!(frames[1].pixel(0, 0), Rgb8::new(0, 0, 0));
}

#[test]
fn cross_fade_rejects_mismatched_sizes_and_zero_steps() {
    let a = solid(2, 2, Rgb8::BLACK);
    let b = solid(3, 2, Rgb8::BLACK);
    assert!(matches!(
        cross_fade(&a, &b, 3),
        Err(GifweaveError::Configuration(_))
    ));
    assert!(matches!(
        cross_fade(&a, &a, 0),
        Err(GifweaveError::Configuration(_))
    ));
}

#[test]
fn fade_in_starts_at_color_and_approaches_frame() {
    let f = solid(2, 1, Rgb8::new(0, 100, 200));
    let frames = fade(&f, 5, FadeMode::In, Rgb8::WHITE).unwrap();
    assert_eq!(frames.len(), 5);
    assert_eq!(frames[0], solid(2, 1, Rgb8::WHITE));

    // Red channel falls from 255 toward 0, blue from 255 toward 200.
    let reds: Vec<u8> = frames.iter().map(|fr| fr.pixel(0, 0).r).collect();
    assert!(reds.windows(2).all(|w| w[0] >= w[1]));
    let blues: Vec<u8> = frames.iter().map(|fr| fr.pixel(0, 0).b).collect();
    assert!(blues.windows(2).all(|w| w[0] >= w[1]));
    assert!(frames[4].pixel(0, 0).r > 0);
}

#[test]
fn fade_out_is_time_reverse_of_fade_in() {
    let f = solid(1, 1, Rgb8::new(40, 80, 120));
    let fin = fade(&f, 4, FadeMode::In, Rgb8::WHITE).unwrap();
    let fout = fade(&f, 4, FadeMode::Out, Rgb8::WHITE).unwrap();

    assert_eq!(fout[0], f);
    // out[k] has weight 1 - k/4 == in[4 - k] weight for k >= 1
    for k in 1..4 {
        assert_eq!(fout[k], fin[4 - k]);
    }
}

#[test]
fn fade_defaults_to_black() {
    let f = solid(1, 1, Rgb8::new(90, 90, 90));
    let frames = fade_black(&f, 2, FadeMode::In).unwrap();
    assert_eq!(frames[0].pixel(0, 0), Rgb8::BLACK);
    assert_eq!(frames[1].pixel(0, 0), Rgb8::new(45, 45, 45));
}

#[test]
fn fade_rejects_zero_steps() {
    let f = solid(1, 1, Rgb8::BLACK);
    assert!(fade(&f, 0, FadeMode::Out, Rgb8::WHITE).is_err());
}

#[test]
fn lerp_into_checks_lengths() {
    let mut dst = vec![0u8; 3];
    assert!(lerp_into(&mut dst, &[1, 2, 3], &[4, 5], 0.5).is_err());
    lerp_into(&mut dst, &[0, 10, 20], &[100, 110, 120], 0.5).unwrap();
    assert_eq!(dst, vec![50, 60, 70]);
}
