use super::*;
use crate::{
    assets::decode::InMemoryLoader,
    encode::sink::InMemorySink,
    foundation::{
        core::{Canvas, FrameRgb},
        error::GifweaveError,
    },
};

fn loader() -> InMemoryLoader {
    InMemoryLoader::new()
        .with("a.png", image::RgbImage::from_pixel(16, 12, image::Rgb([10, 20, 30])))
        .with("b.png", image::RgbImage::from_pixel(12, 16, image::Rgb([200, 100, 0])))
}

fn seq(l: &InMemoryLoader) -> Sequence {
    let mut s = Sequence::new();
    s.add_with(l, "a.png", 1000).unwrap();
    s.add_with(l, "b.png", 500).unwrap();
    s
}

fn opts() -> ExportOpts {
    ExportOpts {
        canvas: Canvas::new(8, 6).unwrap(),
        transition_steps: 4,
    }
}

#[test]
fn streams_every_frame_in_order() {
    let l = loader();
    let mut sink = InMemorySink::new();
    let stats = render_to_sink(&seq(&l), &l, &opts(), &mut sink, &CancelToken::new()).unwrap();

    assert_eq!(stats.sources, 2);
    assert_eq!(stats.frames, 2 + 4 + 8);
    assert_eq!(sink.frames().len(), stats.frames);
    assert!(sink.is_finished());

    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height, cfg.frame_count), (8, 6, 14));

    let durations = sink.durations_ms();
    assert_eq!(&durations[..4], &[40; 4]);
    assert_eq!(durations[4], 1000);
    assert_eq!(&durations[5..9], &[62; 4]);
    assert_eq!(durations[9], 500);
    assert_eq!(&durations[10..], &[40; 4]);
    assert_eq!(stats.total_ms, durations.iter().map(|&d| u64::from(d)).sum::<u64>());
}

#[test]
fn empty_sequence_never_begins_the_sink() {
    let l = loader();
    let mut sink = InMemorySink::new();
    let err = render_to_sink(&Sequence::new(), &l, &opts(), &mut sink, &CancelToken::new())
        .unwrap_err();
    assert!(matches!(err, GifweaveError::Configuration(_)));
    assert!(sink.config().is_none());
}

struct FailingSink {
    accepted: usize,
    aborted: bool,
}

impl FrameSink for FailingSink {
    fn begin(&mut self, _cfg: SinkConfig) -> GifweaveResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, _frame: &FrameRgb, _duration_ms: u32) -> GifweaveResult<()> {
        if self.accepted == 3 {
            return Err(GifweaveError::encode("disk full"));
        }
        self.accepted += 1;
        Ok(())
    }

    fn end(&mut self) -> GifweaveResult<()> {
        Ok(())
    }

    fn abort(&mut self) {
        self.aborted = true;
    }
}

#[test]
fn sink_failure_aborts_the_sink() {
    let l = loader();
    let mut sink = FailingSink {
        accepted: 0,
        aborted: false,
    };
    let err = render_to_sink(&seq(&l), &l, &opts(), &mut sink, &CancelToken::new()).unwrap_err();
    assert!(matches!(err, GifweaveError::Encode(_)));
    assert!(sink.aborted);
}

#[test]
fn cancellation_before_start_produces_nothing() {
    let l = loader();
    let mut sink = InMemorySink::new();
    let cancel = CancelToken::new();
    cancel.cancel();
    let err = render_to_sink(&seq(&l), &l, &opts(), &mut sink, &cancel).unwrap_err();
    assert!(matches!(err, GifweaveError::Cancelled));
    assert!(sink.frames().is_empty());
}

struct CountingLoader {
    inner: InMemoryLoader,
    loads: std::sync::atomic::AtomicUsize,
}

impl ImageLoader for CountingLoader {
    fn verify(&self, path: &std::path::Path) -> GifweaveResult<()> {
        self.inner.verify(path)
    }

    fn load(&self, path: &std::path::Path) -> GifweaveResult<image::RgbImage> {
        self.loads.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.inner.load(path)
    }
}

#[test]
fn oversized_gif_canvas_is_rejected_before_decoding() {
    let l = loader();
    let s = seq(&l);
    let counting = CountingLoader {
        inner: l,
        loads: Default::default(),
    };
    let out = PathBuf::from("target")
        .join("unit_pipeline")
        .join("oversized.gif");

    let opts = RenderToGifOpts {
        export: ExportOpts {
            canvas: Canvas::new(65_536, 2).unwrap(),
            transition_steps: 1,
        },
        gif: GifSinkOpts::default(),
    };
    let err = render_to_gif(&s, &counting, &out, opts).unwrap_err();
    assert!(matches!(err, GifweaveError::Configuration(_)));
    assert_eq!(counting.loads.load(std::sync::atomic::Ordering::SeqCst), 0);
    assert!(!out.exists());
}
