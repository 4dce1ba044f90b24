//! gifweave turns an ordered list of still images into an animated GIF with smooth transitions.
//!
//! # Pipeline overview
//!
//! 1. **Collect**: build a [`Sequence`] of [`SourceItem`]s (path + hold duration). Images are
//!    decoded once on [`Sequence::add`] so broken files are rejected up front.
//! 2. **Fit**: every image is scaled with a Lanczos filter and letterboxed onto a white canvas
//!    ([`fit_to_canvas`]).
//! 3. **Assemble**: a white fade-in, each image's hold frame, a linear [`cross_fade`] between
//!    neighbours and a white fade-out are expanded into a [`Timeline`] of frames and durations.
//! 4. **Encode**: frames stream into a [`FrameSink`]; [`GifSink`] writes an infinitely looping GIF
//!    and only touches the output path once encoding has succeeded.
//!
//! Transition timing: fade frames last [`FADE_FRAME_MS`]; each cross-fade frame lasts a third of
//! the mean of the neighbouring hold durations divided by the step count, but at least
//! [`MIN_TRANSITION_FRAME_MS`] (see [`transition_frame_ms`]).
//!
//! ```no_run
//! use gifweave::{FsImageLoader, RenderToGifOpts, Sequence, render_to_gif};
//!
//! let mut seq = Sequence::new();
//! seq.add("a.png", 1000)?;
//! seq.add("b.jpg", 500)?;
//! render_to_gif(&seq, &FsImageLoader, "out.gif", RenderToGifOpts::default())?;
//! # Ok::<(), gifweave::GifweaveError>(())
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod composition;
mod effects;
mod encode;
mod foundation;
mod layout;
mod render;
mod timeline;

pub use assets::decode::{FsImageLoader, ImageLoader, InMemoryLoader, display_name, verify_and_load};
pub use composition::manifest::{Manifest, ManifestItem};
pub use effects::blend::{FadeMode, cross_fade, fade, fade_black, lerp_color_into, lerp_into, step_alpha};
pub use effects::color::average_color;
pub use effects::slide::{SlideDir, paste_clipped, slide};
pub use encode::gif::{GifSink, GifSinkOpts, MAX_DIMENSION, MAX_FRAME_MS, ensure_parent_dir};
pub use encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use foundation::core::{Canvas, FrameRgb, RGB_CHANNELS, Rgb8, ensure_same_size};
pub use foundation::error::{GifweaveError, GifweaveResult};
pub use layout::fit::{LETTERBOX_COLOR, center_offset, fit_dimensions, fit_to_canvas};
pub use render::pipeline::{
    RenderStats, RenderToGifOpts, render_to_gif, render_to_gif_cancellable, render_to_sink,
};
pub use timeline::assemble::{
    CancelToken, DEFAULT_TRANSITION_STEPS, ExportOpts, FADE_FRAME_MS, MIN_TRANSITION_FRAME_MS,
    RenderedFrame, Segment, SegmentKind, TRANSITION_COLOR, Timeline, assemble,
    assemble_cancellable, plan, transition_frame_ms,
};
pub use timeline::store::{DEFAULT_HOLD_MS, MAX_HOLD_MS, Sequence, SourceItem};
