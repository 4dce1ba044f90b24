use crate::foundation::{
    core::{FrameRgb, RGB_CHANNELS, Rgb8, ensure_same_size},
    error::{GifweaveError, GifweaveResult},
};

/// Direction of a solid-color fade at a sequence boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FadeMode {
    /// Emerges from the fade color toward the frame.
    In,
    /// Recedes from the frame toward the fade color.
    Out,
}

impl FadeMode {
    /// Weight of the frame (as opposed to the fade color) at step `i` of `steps`.
    pub fn frame_weight(self, i: u32, steps: u32) -> f64 {
        let t = step_alpha(i, steps);
        match self {
            Self::In => t,
            Self::Out => 1.0 - t,
        }
    }
}

/// Linear progress `i / steps`. Never reaches 1 for `i < steps`.
pub fn step_alpha(i: u32, steps: u32) -> f64 {
    f64::from(i) / f64::from(steps)
}

pub(crate) fn ensure_steps(steps: u32) -> GifweaveResult<()> {
    if steps == 0 {
        return Err(GifweaveError::configuration(
            "transition step count must be >= 1",
        ));
    }
    Ok(())
}

/// `a * (1 - alpha) + b * alpha`, truncated to u8.
#[inline]
fn mix(a: u8, b: u8, alpha: f64) -> u8 {
    (f64::from(a) * (1.0 - alpha) + f64::from(b) * alpha) as u8
}

/// Blend two equal-length RGB8 buffers into `dst`.
pub fn lerp_into(dst: &mut [u8], a: &[u8], b: &[u8], alpha: f64) -> GifweaveResult<()> {
    if dst.len() != a.len() || dst.len() != b.len() {
        return Err(GifweaveError::configuration(
            "lerp_into expects equal-length rgb8 buffers",
        ));
    }
    for ((d, &a), &b) in dst.iter_mut().zip(a).zip(b) {
        *d = mix(a, b, alpha);
    }
    Ok(())
}

/// Blend an RGB8 buffer against a solid color into `dst`: `frame * weight + color * (1 - weight)`.
pub fn lerp_color_into(
    dst: &mut [u8],
    frame: &[u8],
    color: Rgb8,
    weight: f64,
) -> GifweaveResult<()> {
    if dst.len() != frame.len() || !dst.len().is_multiple_of(RGB_CHANNELS) {
        return Err(GifweaveError::configuration(
            "lerp_color_into expects equal-length rgb8 buffers",
        ));
    }
    let c = color.to_array();
    for (d, px) in dst
        .chunks_exact_mut(RGB_CHANNELS)
        .zip(frame.chunks_exact(RGB_CHANNELS))
    {
        for ch in 0..RGB_CHANNELS {
            d[ch] = mix(c[ch], px[ch], weight);
        }
    }
    Ok(())
}

/// Intermediate frames of a linear cross-fade from `a` to `b`.
///
/// Returns exactly `steps` frames with `alpha = i / steps`. Frame 0 equals `a`; `b` itself is never
/// emitted at full weight, so callers show it as the next frame.
pub fn cross_fade(a: &FrameRgb, b: &FrameRgb, steps: u32) -> GifweaveResult<Vec<FrameRgb>> {
    ensure_steps(steps)?;
    ensure_same_size(a, b)?;

    let mut out = Vec::with_capacity(steps as usize);
    for i in 0..steps {
        let mut data = vec![0u8; a.data.len()];
        lerp_into(&mut data, &a.data, &b.data, step_alpha(i, steps))?;
        out.push(FrameRgb {
            width: a.width,
            height: a.height,
            data,
        });
    }
    Ok(out)
}

/// Frames fading `frame` in from, or out to, a solid `color`.
///
/// Returns exactly `steps` frames. For [`FadeMode::In`] frame 0 is exactly `color`; for
/// [`FadeMode::Out`] frame 0 is exactly `frame`.
pub fn fade(
    frame: &FrameRgb,
    steps: u32,
    mode: FadeMode,
    color: Rgb8,
) -> GifweaveResult<Vec<FrameRgb>> {
    ensure_steps(steps)?;

    let mut out = Vec::with_capacity(steps as usize);
    for i in 0..steps {
        let mut data = vec![0u8; frame.data.len()];
        lerp_color_into(&mut data, &frame.data, color, mode.frame_weight(i, steps))?;
        out.push(FrameRgb {
            width: frame.width,
            height: frame.height,
            data,
        });
    }
    Ok(out)
}

/// [`fade`] toward black.
pub fn fade_black(frame: &FrameRgb, steps: u32, mode: FadeMode) -> GifweaveResult<Vec<FrameRgb>> {
    fade(frame, steps, mode, Rgb8::default())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blend.rs"]
mod tests;
