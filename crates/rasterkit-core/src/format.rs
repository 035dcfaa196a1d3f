//! File-format dispatch.
//!
//! Transforms operate uniformly on [`PixelImage`]; only decode and encode
//! are polymorphic over format. The closed [`ImageFormat`] variant selects
//! the codec, typically from a file extension.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::decode::{decode_bmp, decode_gif, DecodeError};
use crate::encode::{encode_bmp, encode_gif, EncodeError};
use crate::image::PixelImage;

/// The image file formats this library reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Bmp,
    Gif,
}

impl ImageFormat {
    /// Select a format from a file extension (case-insensitive).
    pub fn from_extension(extension: &str) -> Option<Self> {
        if extension.eq_ignore_ascii_case("bmp") {
            Some(ImageFormat::Bmp)
        } else if extension.eq_ignore_ascii_case("gif") {
            Some(ImageFormat::Gif)
        } else {
            None
        }
    }

    /// Select a format from a file path's extension.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Decode a byte stream in this format.
    pub fn decode(self, bytes: &[u8]) -> Result<PixelImage, DecodeError> {
        match self {
            ImageFormat::Bmp => decode_bmp(bytes),
            ImageFormat::Gif => decode_gif(bytes),
        }
    }

    /// Encode an image in this format.
    pub fn encode(self, image: &PixelImage) -> Result<Vec<u8>, EncodeError> {
        match self {
            ImageFormat::Bmp => Ok(encode_bmp(image)),
            ImageFormat::Gif => encode_gif(image),
        }
    }
}

/// Load an image, choosing the codec from the path's extension.
///
/// # Errors
///
/// Returns [`DecodeError::InvalidFormat`] for an unrecognized extension,
/// otherwise whatever the selected decoder returns.
pub fn load(path: impl AsRef<Path>) -> Result<PixelImage, DecodeError> {
    let path = path.as_ref();
    let format = ImageFormat::from_path(path).ok_or_else(|| {
        DecodeError::InvalidFormat(format!("unrecognized file extension: {}", path.display()))
    })?;
    let bytes = std::fs::read(path)?;
    format.decode(&bytes)
}

/// Save an image, choosing the codec from the path's extension.
///
/// The byte stream is built in full before the write, so no partial file is
/// left on failure.
///
/// # Errors
///
/// Returns [`EncodeError::UnsupportedFeature`] for an unrecognized
/// extension, otherwise whatever the selected encoder returns.
pub fn save(image: &PixelImage, path: impl AsRef<Path>) -> Result<(), EncodeError> {
    let path = path.as_ref();
    let format = ImageFormat::from_path(path).ok_or_else(|| {
        EncodeError::UnsupportedFeature(format!(
            "unrecognized file extension: {}",
            path.display()
        ))
    })?;
    let bytes = format.encode(image)?;
    std::fs::write(path, bytes)?;
    Ok(())
}
