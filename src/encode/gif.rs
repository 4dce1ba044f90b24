use std::{
    fs::{File, OpenOptions},
    io::{BufWriter, Read, Seek, SeekFrom},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use image::{
    Delay, Frame, RgbaImage,
    codecs::gif::{GifEncoder, Repeat},
};

use crate::{
    encode::sink::{FrameSink, SinkConfig, check_frame_size},
    foundation::{
        core::{Canvas, FrameRgb, RGB_CHANNELS},
        error::{GifweaveError, GifweaveResult},
    },
};

/// Largest width or height a GIF logical screen can describe.
pub const MAX_DIMENSION: u32 = u16::MAX as u32;

/// Longest frame delay a GIF can store: 65535 units of 10 ms.
pub const MAX_FRAME_MS: u32 = u16::MAX as u32 * 10;

const GIF_TRAILER: u8 = 0x3B;

/// Encoder settings for [`GifSink`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GifSinkOpts {
    /// Replace an existing file at the output path.
    pub overwrite: bool,
    /// Palette quantization speed, 1 (best) to 30 (fastest).
    pub speed: i32,
}

impl Default for GifSinkOpts {
    fn default() -> Self {
        Self {
            overwrite: true,
            speed: 10,
        }
    }
}

impl GifSinkOpts {
    /// Fail unless `speed` is within the encoder's range.
    pub fn validate(&self) -> GifweaveResult<()> {
        if !(1..=30).contains(&self.speed) {
            return Err(GifweaveError::configuration(format!(
                "gif speed must be in 1..=30 (got {})",
                self.speed
            )));
        }
        Ok(())
    }
}

/// Create the parent directory of `path` if it is missing.
pub fn ensure_parent_dir(path: &Path) -> GifweaveResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

struct Active {
    cfg: SinkConfig,
    encoder: GifEncoder<BufWriter<File>>,
    /// Second handle on the partial file, used to verify it after the encoder is dropped.
    file: File,
    pushed: usize,
}

/// Writes an infinitely looping animated GIF with per-frame delays.
///
/// Frames are encoded straight into a hidden sibling of `out_path`, which is renamed over
/// `out_path` on [`FrameSink::end`]. A failed or aborted export removes the partial file and
/// leaves no output behind.
pub struct GifSink {
    out_path: PathBuf,
    opts: GifSinkOpts,
    active: Option<Active>,
}

impl GifSink {
    /// Create a sink for `out_path`. Nothing is written until [`FrameSink::begin`].
    pub fn new(out_path: impl Into<PathBuf>, opts: GifSinkOpts) -> GifweaveResult<Self> {
        opts.validate()?;
        Ok(Self {
            out_path: out_path.into(),
            opts,
            active: None,
        })
    }

    /// Destination path of the finished GIF.
    pub fn out_path(&self) -> &Path {
        &self.out_path
    }

    /// Fail unless `canvas` fits inside a GIF logical screen.
    pub fn check_canvas(canvas: Canvas) -> GifweaveResult<()> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(GifweaveError::configuration(
                "gif width/height must be non-zero",
            ));
        }
        if canvas.width > MAX_DIMENSION || canvas.height > MAX_DIMENSION {
            return Err(GifweaveError::configuration(format!(
                "gif dimensions are limited to {MAX_DIMENSION}x{MAX_DIMENSION} (got {}x{})",
                canvas.width, canvas.height
            )));
        }
        Ok(())
    }

    fn partial_path(&self) -> PathBuf {
        let name = self
            .out_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "out.gif".to_string());
        self.out_path.with_file_name(format!(".{name}.partial"))
    }

    fn discard_partial(&self) {
        let partial = self.partial_path();
        if let Err(e) = std::fs::remove_file(&partial)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!(path = %partial.display(), error = %e, "failed to remove partial gif");
        }
    }

    fn finish(&self, active: Active) -> GifweaveResult<usize> {
        let Active {
            encoder,
            mut file,
            pushed,
            ..
        } = active;
        // Dropping the encoder writes the trailer and flushes the buffered writer, swallowing
        // errors; the trailer check below catches a short write.
        drop(encoder);

        let partial = self.partial_path();
        file.sync_all()
            .with_context(|| format!("failed to sync '{}'", partial.display()))?;
        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1))
            .and_then(|_| file.read_exact(&mut last))
            .with_context(|| format!("failed to verify '{}'", partial.display()))?;
        if last[0] != GIF_TRAILER {
            return Err(GifweaveError::encode(format!(
                "'{}' is truncated (missing gif trailer)",
                partial.display()
            )));
        }
        drop(file);

        std::fs::rename(&partial, &self.out_path).with_context(|| {
            format!("failed to move gif into '{}'", self.out_path.display())
        })?;
        Ok(pushed)
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> GifweaveResult<()> {
        Self::check_canvas(Canvas {
            width: cfg.width,
            height: cfg.height,
        })?;
        if !self.opts.overwrite && self.out_path.exists() {
            return Err(GifweaveError::configuration(format!(
                "output file '{}' already exists",
                self.out_path.display()
            )));
        }

        ensure_parent_dir(&self.out_path)?;
        let partial = self.partial_path();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&partial)
            .with_context(|| format!("failed to create '{}'", partial.display()))?;
        let writer = file
            .try_clone()
            .with_context(|| format!("failed to open '{}'", partial.display()))?;

        let mut encoder = GifEncoder::new_with_speed(BufWriter::new(writer), self.opts.speed);
        if let Err(e) = encoder.set_repeat(Repeat::Infinite) {
            drop(encoder);
            self.discard_partial();
            return Err(GifweaveError::encode(format!(
                "failed to set gif loop mode: {e}"
            )));
        }

        tracing::debug!(
            width = cfg.width,
            height = cfg.height,
            frames = cfg.frame_count,
            out = %self.out_path.display(),
            "gif encode started"
        );
        self.active = Some(Active {
            cfg,
            encoder,
            file,
            pushed: 0,
        });
        Ok(())
    }

    fn push_frame(&mut self, frame: &FrameRgb, duration_ms: u32) -> GifweaveResult<()> {
        let Some(active) = self.active.as_mut() else {
            return Err(GifweaveError::encode("gif sink is not started"));
        };
        check_frame_size(&active.cfg, frame)?;
        if duration_ms > MAX_FRAME_MS {
            return Err(GifweaveError::encode(format!(
                "frame {} lasts {duration_ms} ms; gif delays are limited to {MAX_FRAME_MS} ms",
                active.pushed
            )));
        }

        let rgba = rgb_to_rgba(frame)?;
        let delay = Delay::from_numer_denom_ms(duration_ms, 1);
        active
            .encoder
            .encode_frame(Frame::from_parts(rgba, 0, 0, delay))
            .map_err(|e| {
                GifweaveError::encode(format!("failed to encode frame {}: {e}", active.pushed))
            })?;
        active.pushed += 1;
        Ok(())
    }

    fn end(&mut self) -> GifweaveResult<()> {
        let Some(active) = self.active.take() else {
            return Err(GifweaveError::encode("gif sink is not started"));
        };
        match self.finish(active) {
            Ok(pushed) => {
                tracing::info!(
                    frames = pushed,
                    out = %self.out_path.display(),
                    "wrote gif"
                );
                Ok(())
            }
            Err(err) => {
                self.discard_partial();
                Err(err)
            }
        }
    }

    fn abort(&mut self) {
        if let Some(active) = self.active.take() {
            drop(active);
            self.discard_partial();
            tracing::debug!(out = %self.out_path.display(), "gif encode aborted");
        }
    }
}

fn rgb_to_rgba(frame: &FrameRgb) -> GifweaveResult<RgbaImage> {
    let mut out = Vec::with_capacity(frame.data.len() / RGB_CHANNELS * 4);
    for px in frame.data.chunks_exact(RGB_CHANNELS) {
        out.extend_from_slice(&[px[0], px[1], px[2], 255]);
    }
    RgbaImage::from_raw(frame.width, frame.height, out)
        .ok_or_else(|| GifweaveError::encode("rgb frame buffer has the wrong length"))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
