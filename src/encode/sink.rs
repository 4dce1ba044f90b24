use crate::foundation::core::FrameRgb;
use crate::foundation::error::{GifweaveError, GifweaveResult};

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Number of frames that will be pushed.
    pub frame_count: usize,
}

/// Consumer of rendered frames in display order.
///
/// Ordering contract: `push_frame` is called once per output frame, in order, between one `begin`
/// and one `end`. If rendering fails after `begin`, `abort` is called instead of `end`.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> GifweaveResult<()>;
    /// Push the next frame and how long it is displayed.
    fn push_frame(&mut self, frame: &FrameRgb, duration_ms: u32) -> GifweaveResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> GifweaveResult<()>;
    /// Discard everything pushed so far.
    fn abort(&mut self) {}
}

pub(crate) fn check_frame_size(cfg: &SinkConfig, frame: &FrameRgb) -> GifweaveResult<()> {
    if frame.width != cfg.width || frame.height != cfg.height {
        return Err(GifweaveError::encode(format!(
            "frame size mismatch: got {}x{}, expected {}x{}",
            frame.width, frame.height, cfg.width, cfg.height
        )));
    }
    Ok(())
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameRgb, u32)>,
    finished: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames with their durations.
    pub fn frames(&self) -> &[(FrameRgb, u32)] {
        &self.frames
    }

    /// Durations of the captured frames, in push order.
    pub fn durations_ms(&self) -> Vec<u32> {
        self.frames.iter().map(|(_, d)| *d).collect()
    }

    /// Whether `end` has been called since the last `begin`.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> GifweaveResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.frames.reserve(cfg.frame_count);
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, frame: &FrameRgb, duration_ms: u32) -> GifweaveResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| GifweaveError::encode("push_frame called before begin"))?;
        check_frame_size(&cfg, frame)?;
        self.frames.push((frame.clone(), duration_ms));
        Ok(())
    }

    fn end(&mut self) -> GifweaveResult<()> {
        self.finished = true;
        Ok(())
    }

    fn abort(&mut self) {
        self.frames.clear();
        self.finished = false;
    }
}
