//! BMP decoding.
//!
//! Supports the classic layout: 14-byte file header, 40-byte
//! BITMAPINFOHEADER, uncompressed 24- or 32-bit pixel data with rows padded
//! to a multiple of 4 bytes. Pixel rows arrive bottom-first in B, G, R[, A]
//! order, which is exactly the [`PixelImage`] buffer layout, so decoding is
//! a straight copy with the padding stripped.

use std::fs;
use std::path::Path;

use crate::image::PixelImage;

use super::{ByteReader, DecodeError};

/// The `BM` magic, little-endian.
const BMP_SIGNATURE: u16 = 0x4D42;

/// Decode a BMP byte stream into a [`PixelImage`].
///
/// # Errors
///
/// - [`DecodeError::InvalidFormat`] for a bad signature or nonsensical
///   header fields.
/// - [`DecodeError::UnsupportedFeature`] for bit depths other than 24/32,
///   compressed pixel data or top-down row order.
/// - [`DecodeError::CorruptedData`] if the pixel array is truncated.
pub fn decode_bmp(bytes: &[u8]) -> Result<PixelImage, DecodeError> {
    let mut r = ByteReader::new(bytes);

    // File header.
    let signature = r.u16_le().map_err(|_| bad_header("file too short"))?;
    if signature != BMP_SIGNATURE {
        return Err(bad_header("bad signature, expected BM"));
    }
    let _file_size = r.u32_le().map_err(|_| bad_header("file too short"))?;
    let _reserved = r.u32_le().map_err(|_| bad_header("file too short"))?;
    let data_offset = r.u32_le().map_err(|_| bad_header("file too short"))?;

    // Info header.
    let header_size = r.u32_le().map_err(|_| bad_header("file too short"))?;
    if header_size < 40 {
        return Err(bad_header("info header too small"));
    }
    let width = r.i32_le().map_err(|_| bad_header("file too short"))?;
    let height = r.i32_le().map_err(|_| bad_header("file too short"))?;
    let _planes = r.u16_le().map_err(|_| bad_header("file too short"))?;
    let bits_per_pixel = r.u16_le().map_err(|_| bad_header("file too short"))?;
    let compression = r.u32_le().map_err(|_| bad_header("file too short"))?;
    // image_size, resolutions and color counts are recomputed on encode.

    if compression != 0 {
        return Err(DecodeError::UnsupportedFeature(
            "compressed BMP pixel data".into(),
        ));
    }
    let channels: u8 = match bits_per_pixel {
        24 => 3,
        32 => 4,
        other => {
            return Err(DecodeError::UnsupportedFeature(format!(
                "{other} bits per pixel, expected 24 or 32"
            )))
        }
    };
    if width <= 0 {
        return Err(bad_header("non-positive width"));
    }
    if height < 0 {
        return Err(DecodeError::UnsupportedFeature(
            "top-down BMP row order".into(),
        ));
    }
    if height == 0 {
        return Err(bad_header("zero height"));
    }

    let width = width as u32;
    let height = height as u32;
    let row_len = width as usize * channels as usize;
    let padding = (4 - row_len % 4) % 4;

    r.seek(data_offset as usize)
        .map_err(|_| bad_header("pixel data offset past end of file"))?;

    // The claimed dimensions must fit in the remaining bytes before any
    // buffer is allocated for them. The final row's padding may be absent.
    let required = (row_len + padding)
        .checked_mul(height as usize)
        .map(|n| n - padding)
        .ok_or_else(|| DecodeError::CorruptedData("pixel array size overflows".into()))?;
    if bytes.len().saturating_sub(data_offset as usize) < required {
        return Err(DecodeError::CorruptedData(
            "pixel array shorter than the declared dimensions".into(),
        ));
    }

    let mut data = Vec::with_capacity(row_len * height as usize);
    if padding == 0 {
        data.extend_from_slice(r.take(row_len * height as usize)?);
    } else {
        for y in 0..height {
            data.extend_from_slice(r.take(row_len)?);
            // The last row's padding may legitimately be absent.
            if y + 1 < height {
                r.skip(padding)?;
            } else {
                let _ = r.skip(padding);
            }
        }
    }

    Ok(PixelImage::from_raw(width, height, channels, data))
}

/// Read and decode a BMP file.
///
/// # Errors
///
/// Everything [`decode_bmp`] returns, plus [`DecodeError::Io`] if the file
/// cannot be read.
pub fn load_bmp(path: impl AsRef<Path>) -> Result<PixelImage, DecodeError> {
    let bytes = fs::read(path)?;
    decode_bmp(&bytes)
}

fn bad_header(detail: &str) -> DecodeError {
    DecodeError::InvalidFormat(format!("not a valid BMP file: {detail}"))
}
