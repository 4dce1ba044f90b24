use crate::{
    effects::blend::{ensure_steps, step_alpha},
    foundation::{
        core::{FrameRgb, RGB_CHANNELS, Rgb8, ensure_same_size},
        error::GifweaveResult,
    },
};

/// Direction the outgoing frame travels in a slide transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideDir {
    /// Outgoing frame exits to the left.
    Left,
    /// Outgoing frame exits to the right.
    Right,
    /// Outgoing frame exits upward.
    Up,
    /// Outgoing frame exits downward.
    Down,
}

impl SlideDir {
    /// Paste offsets of the outgoing and incoming frame at `progress`, truncated toward zero.
    pub fn offsets(self, width: u32, height: u32, progress: f64) -> ((i64, i64), (i64, i64)) {
        let w = f64::from(width);
        let h = f64::from(height);
        let rest = 1.0 - progress;
        match self {
            Self::Right => (((w * progress) as i64, 0), ((-w * rest) as i64, 0)),
            Self::Left => (((-w * progress) as i64, 0), ((w * rest) as i64, 0)),
            Self::Down => ((0, (h * progress) as i64), (0, (-h * rest) as i64)),
            Self::Up => ((0, (-h * progress) as i64), (0, (h * rest) as i64)),
        }
    }
}

/// Copy `src` onto `dst` with its top-left corner at `(ox, oy)`, clipping to `dst`.
pub fn paste_clipped(dst: &mut FrameRgb, src: &FrameRgb, ox: i64, oy: i64) {
    let dw = i64::from(dst.width);
    let dh = i64::from(dst.height);
    let x0 = ox.max(0);
    let x1 = (ox + i64::from(src.width)).min(dw);
    if x0 >= x1 {
        return;
    }
    let span = (x1 - x0) as usize * RGB_CHANNELS;
    let src_x = (x0 - ox) as usize * RGB_CHANNELS;
    let dst_x = x0 as usize * RGB_CHANNELS;

    let (src_stride, dst_stride) = (src.stride(), dst.stride());
    for sy in 0..i64::from(src.height) {
        let dy = oy + sy;
        if dy < 0 || dy >= dh {
            continue;
        }
        let s = sy as usize * src_stride + src_x;
        let d = dy as usize * dst_stride + dst_x;
        dst.data[d..d + span].copy_from_slice(&src.data[s..s + span]);
    }
}

/// Frames of `a` sliding out in `dir` while `b` slides in from the opposite edge.
///
/// Both frames are painted over a solid `background`, `a` first, so `b` wins where they overlap.
/// Not used by the default export; available for callers that want a slide instead of a fade.
pub fn slide(
    a: &FrameRgb,
    b: &FrameRgb,
    steps: u32,
    dir: SlideDir,
    background: Rgb8,
) -> GifweaveResult<Vec<FrameRgb>> {
    ensure_steps(steps)?;
    ensure_same_size(a, b)?;

    let mut out = Vec::with_capacity(steps as usize);
    for i in 0..steps {
        let ((ax, ay), (bx, by)) = dir.offsets(a.width, a.height, step_alpha(i, steps));
        let mut frame = FrameRgb::filled(a.canvas(), background);
        paste_clipped(&mut frame, a, ax, ay);
        paste_clipped(&mut frame, b, bx, by);
        out.push(frame);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/slide.rs"]
mod tests;
