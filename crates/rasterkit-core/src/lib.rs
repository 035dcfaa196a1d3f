//! Rasterkit Core - Image processing library
//!
//! This crate provides the core image processing functionality for
//! Rasterkit: BMP and GIF codecs (with a self-contained LZW
//! implementation) and in-place pixel-buffer transforms such as crop,
//! flip, rotation, resize, grayscale and inversion.
//!
//! Images live in a [`PixelImage`] buffer that keeps the BMP on-disk
//! convention: rows bottom-first, bytes per pixel in B, G, R[, A] order.
//! Decoders from every format normalize into this layout and encoders
//! translate back out of it, so the transforms never care where the
//! pixels came from.

pub mod decode;
pub mod encode;
pub mod format;
pub mod image;
pub mod lzw;
pub mod transform;

pub use decode::{decode_bmp, decode_gif, load_bmp, load_gif, DecodeError};
pub use encode::{
    encode_bmp, encode_gif, encode_gif_with, save_bmp, save_gif, ColorTableKind, EncodeError,
};
pub use format::{load, save, ImageFormat};
pub use image::{Color, PixelError, PixelImage};
pub use transform::{
    crop, flip, grayscale, inverse, resize, rotate_clockwise, rotate_counterclockwise,
    Interpolation, TransformError,
};
