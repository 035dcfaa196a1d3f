//! Binary image encoding for the BMP and GIF formats.
//!
//! Encoders build the complete byte stream in memory before anything
//! touches the filesystem, so a failed save never leaves a truncated file
//! behind.

mod bmp;
mod gif;

use thiserror::Error;

pub use bmp::{encode_bmp, save_bmp};
pub use gif::{encode_gif, encode_gif_with, save_gif, ColorTableKind};

/// Errors for image encoding operations.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The image cannot be represented by the requested encoder
    /// configuration.
    #[error("unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// Width or height is zero.
    #[error("invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// I/O error while writing the file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
