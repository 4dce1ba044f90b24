use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use crate::foundation::error::{GifweaveError, GifweaveResult};

/// Source of decoded still images.
///
/// `verify` is the cheap check used before committing to a full decode (format sniffing and header
/// parsing only). `load` returns the image normalized to RGB8: palette images are expanded and any
/// alpha channel is dropped without compositing.
pub trait ImageLoader {
    /// Check that `path` holds a decodable, non-empty image without decoding the pixels.
    fn verify(&self, path: &Path) -> GifweaveResult<()>;

    /// Decode `path` to RGB8.
    fn load(&self, path: &Path) -> GifweaveResult<image::RgbImage>;
}

/// Loads images from the filesystem with format detection by content.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsImageLoader;

impl ImageLoader for FsImageLoader {
    fn verify(&self, path: &Path) -> GifweaveResult<()> {
        let name = display_name(path);
        let (w, h) = open_reader(path)?
            .into_dimensions()
            .map_err(|e| GifweaveError::decode(&name, e))?;
        if w == 0 || h == 0 {
            return Err(GifweaveError::decode(name, "image has zero width or height"));
        }
        Ok(())
    }

    fn load(&self, path: &Path) -> GifweaveResult<image::RgbImage> {
        let dyn_img = open_reader(path)?
            .decode()
            .map_err(|e| GifweaveError::decode(display_name(path), e))?;
        Ok(dyn_img.to_rgb8())
    }
}

fn open_reader(path: &Path) -> GifweaveResult<image::ImageReader<std::io::BufReader<std::fs::File>>> {
    let name = display_name(path);
    image::ImageReader::open(path)
        .map_err(|e| GifweaveError::decode(&name, e))?
        .with_guessed_format()
        .map_err(|e| GifweaveError::decode(name, e))
}

/// Serves pre-decoded images keyed by path. Useful for tests and for embedding callers that
/// already hold pixels in memory.
#[derive(Clone, Debug, Default)]
pub struct InMemoryLoader {
    images: BTreeMap<PathBuf, image::RgbImage>,
}

impl InMemoryLoader {
    /// Create an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `img` under `path`.
    pub fn insert(&mut self, path: impl Into<PathBuf>, img: image::RgbImage) {
        self.images.insert(path.into(), img);
    }

    /// Builder form of [`InMemoryLoader::insert`].
    pub fn with(mut self, path: impl Into<PathBuf>, img: image::RgbImage) -> Self {
        self.insert(path, img);
        self
    }

    fn lookup(&self, path: &Path) -> GifweaveResult<&image::RgbImage> {
        self.images
            .get(path)
            .ok_or_else(|| GifweaveError::decode(display_name(path), "no such image"))
    }
}

impl ImageLoader for InMemoryLoader {
    fn verify(&self, path: &Path) -> GifweaveResult<()> {
        let img = self.lookup(path)?;
        if img.width() == 0 || img.height() == 0 {
            return Err(GifweaveError::decode(
                display_name(path),
                "image has zero width or height",
            ));
        }
        Ok(())
    }

    fn load(&self, path: &Path) -> GifweaveResult<image::RgbImage> {
        self.lookup(path).cloned()
    }
}

/// Human-readable label for a source path: its final component, or the whole path when it has
/// none (e.g. `..` or `/`).
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Verify then decode, as one step.
pub fn verify_and_load(loader: &dyn ImageLoader, path: &Path) -> GifweaveResult<image::RgbImage> {
    loader.verify(path)?;
    loader.load(path)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
