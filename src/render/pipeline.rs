use std::path::PathBuf;

use crate::{
    assets::decode::ImageLoader,
    encode::{
        gif::{GifSink, GifSinkOpts},
        sink::{FrameSink, SinkConfig},
    },
    foundation::error::GifweaveResult,
    timeline::{
        assemble::{CancelToken, ExportOpts, Timeline, assemble_cancellable},
        store::Sequence,
    },
};

/// Options for [`render_to_gif`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderToGifOpts {
    /// Canvas and transition settings.
    pub export: ExportOpts,
    /// Encoder settings.
    pub gif: GifSinkOpts,
}

/// Summary of a finished render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Source items rendered.
    pub sources: usize,
    /// Frames handed to the sink.
    pub frames: usize,
    /// Sum of all frame durations.
    pub total_ms: u64,
}

/// Assemble `seq` and stream every frame into `sink`.
///
/// Works from a snapshot of `seq` taken on entry. If anything fails after the sink has begun, the
/// sink is aborted, so sinks that write on `end` leave nothing behind.
#[tracing::instrument(skip_all, fields(items = seq.len()))]
pub fn render_to_sink(
    seq: &Sequence,
    loader: &dyn ImageLoader,
    opts: &ExportOpts,
    sink: &mut dyn FrameSink,
    cancel: &CancelToken,
) -> GifweaveResult<RenderStats> {
    let items = seq.snapshot();
    let timeline = assemble_cancellable(&items, loader, opts, cancel)?;

    sink.begin(SinkConfig {
        width: timeline.canvas.width,
        height: timeline.canvas.height,
        frame_count: timeline.len(),
    })?;
    if let Err(err) = push_all(&timeline, sink, cancel) {
        sink.abort();
        return Err(err);
    }

    Ok(RenderStats {
        sources: items.len(),
        frames: timeline.len(),
        total_ms: timeline.total_ms(),
    })
}

fn push_all(
    timeline: &Timeline,
    sink: &mut dyn FrameSink,
    cancel: &CancelToken,
) -> GifweaveResult<()> {
    for (frame, duration_ms) in timeline.iter() {
        cancel.check()?;
        sink.push_frame(frame, duration_ms)?;
    }
    sink.end()
}

/// Render `seq` to an animated GIF at `out_path`.
pub fn render_to_gif(
    seq: &Sequence,
    loader: &dyn ImageLoader,
    out_path: impl Into<PathBuf>,
    opts: RenderToGifOpts,
) -> GifweaveResult<RenderStats> {
    render_to_gif_cancellable(seq, loader, out_path, opts, &CancelToken::new())
}

/// [`render_to_gif`] with a cancellation token. A cancelled render writes no file.
pub fn render_to_gif_cancellable(
    seq: &Sequence,
    loader: &dyn ImageLoader,
    out_path: impl Into<PathBuf>,
    opts: RenderToGifOpts,
    cancel: &CancelToken,
) -> GifweaveResult<RenderStats> {
    let mut sink = GifSink::new(out_path, opts.gif)?;
    // Reject an unencodable canvas before any image is decoded.
    opts.export.validate()?;
    GifSink::check_canvas(opts.export.canvas)?;
    render_to_sink(seq, loader, &opts.export, &mut sink, cancel)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
