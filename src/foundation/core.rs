use crate::foundation::error::{GifweaveError, GifweaveResult};

/// Bytes per pixel of every frame buffer in this crate (tightly packed RGB8).
pub const RGB_CHANNELS: usize = 3;

/// Output frame size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a canvas, rejecting zero dimensions.
    pub fn new(width: u32, height: u32) -> GifweaveResult<Self> {
        let canvas = Self { width, height };
        canvas.validate()?;
        Ok(canvas)
    }

    /// Fail unless both dimensions are non-zero.
    pub fn validate(self) -> GifweaveResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GifweaveError::configuration(format!(
                "canvas width/height must be non-zero (got {}x{})",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// `width * height`.
    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// Straight (opaque) RGB8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Rgb8 {
    /// `#000000`.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// `#ffffff`.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels as `[r, g, b]`.
    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Rgb8 {
    fn default() -> Self {
        Self::BLACK
    }
}

/// A fixed-size RGB8 pixel buffer, row-major, stride `width * 3`.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameRgb {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 3` bytes.
    pub data: Vec<u8>,
}

impl FrameRgb {
    /// A frame of `canvas` size painted with `color`.
    pub fn filled(canvas: Canvas, color: Rgb8) -> Self {
        let data = color.to_array().repeat(canvas.pixel_count());
        Self {
            width: canvas.width,
            height: canvas.height,
            data,
        }
    }

    /// Wrap an existing buffer, checking its length.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> GifweaveResult<Self> {
        let expected = width as usize * height as usize * RGB_CHANNELS;
        if data.len() != expected {
            return Err(GifweaveError::configuration(format!(
                "rgb8 buffer for {width}x{height} must be {expected} bytes (got {})",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Size of this frame.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * RGB_CHANNELS
    }

    /// Color at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Rgb8 {
        let i = y as usize * self.stride() + x as usize * RGB_CHANNELS;
        Rgb8::new(self.data[i], self.data[i + 1], self.data[i + 2])
    }

    /// Copy into an [`image::RgbImage`].
    pub fn to_rgb_image(&self) -> image::RgbImage {
        // Length is an invariant of every constructor.
        image::RgbImage::from_raw(self.width, self.height, self.data.clone())
            .unwrap_or_else(|| image::RgbImage::new(self.width, self.height))
    }

    /// Take ownership of an [`image::RgbImage`]'s pixels.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }
}

impl std::fmt::Debug for FrameRgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameRgb")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Fail with a configuration error unless both frames share identical dimensions.
pub fn ensure_same_size(a: &FrameRgb, b: &FrameRgb) -> GifweaveResult<()> {
    if a.width != b.width || a.height != b.height {
        return Err(GifweaveError::configuration(format!(
            "frame sizes differ: {}x{} vs {}x{}",
            a.width, a.height, b.width, b.height
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
