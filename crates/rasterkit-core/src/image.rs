//! Core pixel-buffer types shared by the codecs and the transform engine.
//!
//! # Buffer layout
//!
//! A [`PixelImage`] owns a flat byte buffer in row-major order with 3 or 4
//! channels per pixel. The layout follows the BMP on-disk convention:
//!
//! - Rows are stored bottom row first.
//! - Bytes within a pixel are ordered B, G, R and optionally A.
//!
//! The GIF codec translates to and from this layout, so every transform can
//! operate on the buffer without knowing which format produced it.

use thiserror::Error;

/// Errors for direct pixel access.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PixelError {
    /// The requested coordinates fall outside the image.
    #[error("pixel ({x}, {y}) is outside the {width}x{height} image")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

/// An immutable pixel value with red, green and blue channels and an
/// optional alpha channel.
///
/// Alpha is `Some` only for pixels read from 4-channel images. Writing a
/// color without alpha into a 4-channel image leaves the stored alpha byte
/// untouched; writing a color with alpha into a 3-channel image drops it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: Option<u8>,
}

impl Color {
    /// Create an opaque 3-channel color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: None }
    }

    /// Create a 4-channel color.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a: Some(a) }
    }
}

/// A decoded raster image: flat byte buffer plus dimensions and channel
/// count.
///
/// Invariant: `data.len() == width * height * channels` at all times. The
/// only way to change dimensions is [`PixelImage::replace_buffer`], which
/// swaps buffer and dimensions together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelImage {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl PixelImage {
    /// Create a zero-filled image.
    pub fn new(width: u32, height: u32, channels: u8) -> Self {
        debug_assert!(
            channels == 3 || channels == 4,
            "channel count must be 3 or 4"
        );
        let len = width as usize * height as usize * channels as usize;
        Self {
            width,
            height,
            channels,
            data: vec![0; len],
        }
    }

    /// Create an image from an existing buffer.
    ///
    /// The caller guarantees `data.len() == width * height * channels`.
    pub fn from_raw(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Self {
        debug_assert!(
            channels == 3 || channels == 4,
            "channel count must be 3 or 4"
        );
        debug_assert_eq!(
            data.len(),
            width as usize * height as usize * channels as usize,
            "pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            channels,
            data,
        }
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of channels per pixel (3 or 4).
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// The raw pixel buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the image, returning the raw buffer.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.data.len()
    }

    /// Check if this is an empty image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Byte offset of the pixel at `(x, y)`.
    ///
    /// Callers must have bounds-checked `x` and `y` already.
    fn offset(&self, x: u32, y: u32) -> usize {
        self.channels as usize * (y as usize * self.width as usize + x as usize)
    }

    fn check_bounds(&self, x: u32, y: u32) -> Result<(), PixelError> {
        if x >= self.width || y >= self.height {
            return Err(PixelError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Read the pixel at `(x, y)`.
    ///
    /// Returns a color with alpha for 4-channel images and without for
    /// 3-channel images.
    ///
    /// # Errors
    ///
    /// Returns [`PixelError::OutOfBounds`] if `x >= width` or `y >= height`.
    pub fn get_pixel(&self, x: u32, y: u32) -> Result<Color, PixelError> {
        self.check_bounds(x, y)?;
        let i = self.offset(x, y);
        let a = if self.channels == 4 {
            Some(self.data[i + 3])
        } else {
            None
        };
        Ok(Color {
            r: self.data[i + 2],
            g: self.data[i + 1],
            b: self.data[i],
            a,
        })
    }

    /// Write the pixel at `(x, y)`.
    ///
    /// On 4-channel images the stored alpha byte is replaced only when
    /// `color.a` is `Some`; on 3-channel images alpha is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`PixelError::OutOfBounds`] if `x >= width` or `y >= height`.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) -> Result<(), PixelError> {
        self.check_bounds(x, y)?;
        let i = self.offset(x, y);
        self.data[i] = color.b;
        self.data[i + 1] = color.g;
        self.data[i + 2] = color.r;
        if let (4, Some(a)) = (self.channels, color.a) {
            self.data[i + 3] = a;
        }
        Ok(())
    }

    /// Atomically swap the pixel buffer and dimensions.
    ///
    /// The channel count is unchanged. The caller guarantees
    /// `data.len() == width * height * channels`.
    pub fn replace_buffer(&mut self, data: Vec<u8>, width: u32, height: u32) {
        debug_assert_eq!(
            data.len(),
            width as usize * height as usize * self.channels as usize,
            "pixel buffer size mismatch"
        );
        self.data = data;
        self.width = width;
        self.height = height;
    }
}
