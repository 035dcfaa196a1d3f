//! Pixel-buffer transform engine: crop, flip, rotations, grayscale,
//! inversion and resize.
//!
//! Every transform mutates a [`PixelImage`](crate::image::PixelImage) in
//! place and installs its output buffer atomically, so a caller never
//! observes an inconsistent width/height/buffer-length triple. Channel count
//! is preserved by all transforms; alpha rides along through the geometric
//! ones and is interpolated like any other channel during resize.
//!
//! # Coordinate System
//!
//! Transforms address the buffer directly: row 0 is the first stored row
//! (the bottom row in BMP terms). Because every operation here is defined
//! relative to the buffer, the on-screen orientation is irrelevant.

mod color;
mod crop;
mod resize;
mod rotation;

use thiserror::Error;

pub use color::{grayscale, inverse};
pub use crop::crop;
pub use resize::{resize, Interpolation};
pub use rotation::{flip, rotate_clockwise, rotate_counterclockwise};

/// Errors for transform preconditions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransformError {
    /// A crop region extends past the image bounds.
    #[error(
        "crop region at ({x0}, {y0}) with size {width}x{height} exceeds the \
         {image_width}x{image_height} image"
    )]
    OutOfRange {
        x0: u32,
        y0: u32,
        width: u32,
        height: u32,
        image_width: u32,
        image_height: u32,
    },

    /// A resize source or target has a zero dimension.
    #[error("invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },
}
