use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::{
    assets::decode::{ImageLoader, verify_and_load},
    effects::blend::{FadeMode, cross_fade, fade},
    foundation::{
        core::{Canvas, FrameRgb, Rgb8},
        error::{GifweaveError, GifweaveResult},
    },
    layout::fit::fit_to_canvas,
    timeline::store::SourceItem,
};

/// Duration of every fade-in and fade-out frame.
pub const FADE_FRAME_MS: u32 = 40;
/// Floor applied to each cross-fade frame duration.
pub const MIN_TRANSITION_FRAME_MS: u32 = 20;
/// Color faded from at the start and to at the end.
pub const TRANSITION_COLOR: Rgb8 = Rgb8::WHITE;
/// Frames per fade and cross-fade when not configured.
pub const DEFAULT_TRANSITION_STEPS: u32 = 15;

/// Knobs for one export.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExportOpts {
    /// Size of every output frame; sources are letterboxed onto it.
    pub canvas: Canvas,
    /// Frames per fade and per cross-fade.
    pub transition_steps: u32,
}

impl Default for ExportOpts {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            transition_steps: DEFAULT_TRANSITION_STEPS,
        }
    }
}

impl ExportOpts {
    /// Fail on an empty canvas or zero transition steps.
    pub fn validate(&self) -> GifweaveResult<()> {
        self.canvas.validate()?;
        if self.transition_steps == 0 {
            return Err(GifweaveError::configuration(
                "transition_steps must be >= 1",
            ));
        }
        Ok(())
    }
}

/// Cooperative cancellation flag shared between an export and whoever started it.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; every clone observes it.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether [`CancelToken::cancel`] has been called.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// `Err(Cancelled)` once cancelled.
    pub fn check(&self) -> GifweaveResult<()> {
        if self.is_cancelled() {
            return Err(GifweaveError::Cancelled);
        }
        Ok(())
    }
}

/// What a [`Segment`] shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentKind {
    /// Fade from the transition color into the first item.
    FadeIn,
    /// The fitted frame of item `item`, shown for its hold duration.
    Hold {
        /// Index of the item.
        item: usize,
    },
    /// Cross-fade from item `from` to item `from + 1`.
    CrossFade {
        /// Index of the outgoing item.
        from: usize,
    },
    /// Fade from the last item out to the transition color.
    FadeOut,
}

/// A run of consecutive output frames sharing one duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Segment {
    /// What the frames show.
    #[serde(flatten)]
    pub kind: SegmentKind,
    /// Number of frames.
    pub frames: u32,
    /// Duration of each frame.
    pub frame_ms: u32,
}

impl Segment {
    /// Duration of the whole segment.
    pub fn total_ms(&self) -> u64 {
        u64::from(self.frames) * u64::from(self.frame_ms)
    }
}

/// Per-frame duration of a cross-fade between two items.
///
/// A third of the mean of both hold durations, split evenly over `steps` frames with floor
/// division at each step, and never below [`MIN_TRANSITION_FRAME_MS`].
pub fn transition_frame_ms(hold_a: u32, hold_b: u32, steps: u32) -> u32 {
    let base = (u64::from(hold_a) + u64::from(hold_b)) / 2;
    let per_frame = base / 3 / u64::from(steps.max(1));
    (per_frame as u32).max(MIN_TRANSITION_FRAME_MS)
}

/// Timing layout of an export: fade-in, then each item's hold frame followed by a cross-fade to
/// the next item, then fade-out.
pub fn plan(items: &[SourceItem], steps: u32) -> GifweaveResult<Vec<Segment>> {
    if items.is_empty() {
        return Err(GifweaveError::configuration(
            "sequence is empty; add at least one image",
        ));
    }
    if steps == 0 {
        return Err(GifweaveError::configuration(
            "transition_steps must be >= 1",
        ));
    }

    let mut out = Vec::with_capacity(items.len() * 2 + 1);
    out.push(Segment {
        kind: SegmentKind::FadeIn,
        frames: steps,
        frame_ms: FADE_FRAME_MS,
    });
    for (i, item) in items.iter().enumerate() {
        out.push(Segment {
            kind: SegmentKind::Hold { item: i },
            frames: 1,
            frame_ms: item.hold_ms,
        });
        if let Some(next) = items.get(i + 1) {
            out.push(Segment {
                kind: SegmentKind::CrossFade { from: i },
                frames: steps,
                frame_ms: transition_frame_ms(item.hold_ms, next.hold_ms, steps),
            });
        }
    }
    out.push(Segment {
        kind: SegmentKind::FadeOut,
        frames: steps,
        frame_ms: FADE_FRAME_MS,
    });
    Ok(out)
}

/// One output frame and how long it is shown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedFrame {
    /// Pixels.
    pub frame: FrameRgb,
    /// Display time.
    pub duration_ms: u32,
}

/// Fully expanded output: frames and their durations, index for index.
#[derive(Clone, Debug)]
pub struct Timeline {
    /// Size shared by every frame.
    pub canvas: Canvas,
    /// Output frames in display order.
    pub frames: Vec<FrameRgb>,
    /// Display time of `frames[i]`.
    pub durations_ms: Vec<u32>,
    /// The plan the frames were built from.
    pub segments: Vec<Segment>,
}

impl Timeline {
    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether there are no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Total play time of one loop.
    pub fn total_ms(&self) -> u64 {
        self.durations_ms.iter().map(|&d| u64::from(d)).sum()
    }

    /// Frames paired with their durations.
    pub fn iter(&self) -> impl Iterator<Item = (&FrameRgb, u32)> + '_ {
        self.frames.iter().zip(self.durations_ms.iter().copied())
    }

    /// Consume into owned [`RenderedFrame`]s.
    pub fn into_rendered(self) -> Vec<RenderedFrame> {
        self.frames
            .into_iter()
            .zip(self.durations_ms)
            .map(|(frame, duration_ms)| RenderedFrame { frame, duration_ms })
            .collect()
    }
}

/// Expand `items` into every output frame and its duration.
pub fn assemble(
    items: &[SourceItem],
    loader: &dyn ImageLoader,
    opts: &ExportOpts,
) -> GifweaveResult<Timeline> {
    assemble_cancellable(items, loader, opts, &CancelToken::new())
}

/// [`assemble`] that gives up with [`GifweaveError::Cancelled`] once `cancel` is set.
///
/// The token is polled before each item is decoded and before each segment is synthesized.
/// Nothing is returned on failure.
#[tracing::instrument(skip_all, fields(items = items.len(), steps = opts.transition_steps))]
pub fn assemble_cancellable(
    items: &[SourceItem],
    loader: &dyn ImageLoader,
    opts: &ExportOpts,
    cancel: &CancelToken,
) -> GifweaveResult<Timeline> {
    opts.validate()?;
    let segments = plan(items, opts.transition_steps)?;
    let canvases = fit_all(items, loader, opts.canvas, cancel)?;

    let steps = opts.transition_steps;
    let total: usize = segments.iter().map(|s| s.frames as usize).sum();
    let mut frames = Vec::with_capacity(total);
    let mut durations_ms = Vec::with_capacity(total);

    let last = canvases.len() - 1;
    for seg in &segments {
        cancel.check()?;
        let produced = match seg.kind {
            SegmentKind::FadeIn => fade(&canvases[0], steps, FadeMode::In, TRANSITION_COLOR)?,
            SegmentKind::Hold { item } => vec![canvases[item].clone()],
            SegmentKind::CrossFade { from } => {
                cross_fade(&canvases[from], &canvases[from + 1], steps)?
            }
            SegmentKind::FadeOut => {
                fade(&canvases[last], steps, FadeMode::Out, TRANSITION_COLOR)?
            }
        };
        tracing::trace!(kind = ?seg.kind, frames = produced.len(), frame_ms = seg.frame_ms, "segment");
        durations_ms.extend(std::iter::repeat_n(seg.frame_ms, produced.len()));
        frames.extend(produced);
    }

    let timeline = Timeline {
        canvas: opts.canvas,
        frames,
        durations_ms,
        segments,
    };
    tracing::info!(
        frames = timeline.len(),
        total_ms = timeline.total_ms(),
        "assembled timeline"
    );
    Ok(timeline)
}

fn fit_all(
    items: &[SourceItem],
    loader: &dyn ImageLoader,
    canvas: Canvas,
    cancel: &CancelToken,
) -> GifweaveResult<Vec<FrameRgb>> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        cancel.check()?;
        let fitted = verify_and_load(loader, &item.path)
            .and_then(|img| fit_to_canvas(&img, canvas))
            .map_err(|e| GifweaveError::export(&item.display_name, e))?;
        tracing::debug!(name = %item.display_name, "fitted source");
        out.push(fitted);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/assemble.rs"]
mod tests;
