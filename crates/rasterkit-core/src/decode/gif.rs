//! GIF decoding.
//!
//! Handles the GIF87a/89a block structure: header, logical screen
//! descriptor, global color table, then a sequence of blocks until the
//! trailer. Extension blocks are skipped; the first image descriptor is
//! decoded (LZW) and returned. Local color tables and interlacing are not
//! implemented and are rejected explicitly.
//!
//! GIF stores rows top-first with R, G, B color entries; the decoder
//! translates into the bottom-first B, G, R buffer layout of
//! [`PixelImage`].

use std::fs;
use std::path::Path;

use crate::image::PixelImage;
use crate::lzw;

use super::{ByteReader, DecodeError};

const IMAGE_SEPARATOR: u8 = 0x2C;
const EXTENSION_INTRODUCER: u8 = 0x21;
const TRAILER: u8 = 0x3B;

/// Decode a GIF byte stream into a [`PixelImage`].
///
/// Only the first image block is decoded; anything after it is ignored.
/// The result is always a 3-channel image.
///
/// # Errors
///
/// - [`DecodeError::InvalidFormat`] for a bad signature, unknown version or
///   malformed block structure.
/// - [`DecodeError::UnsupportedFeature`] for local color tables,
///   interlacing or a missing global color table.
/// - [`DecodeError::CorruptedData`] for truncated blocks, malformed LZW
///   data or out-of-range color indices.
pub fn decode_gif(bytes: &[u8]) -> Result<PixelImage, DecodeError> {
    let mut r = ByteReader::new(bytes);

    let signature = r.take(3).map_err(|_| bad_header("file too short"))?;
    if signature != b"GIF" {
        return Err(bad_header("bad signature, expected GIF"));
    }
    let version = r.take(3).map_err(|_| bad_header("file too short"))?;
    if version != b"87a" && version != b"89a" {
        return Err(bad_header("unknown version, expected 87a or 89a"));
    }

    // Logical screen descriptor.
    let _canvas_width = r.u16_le()?;
    let _canvas_height = r.u16_le()?;
    let packed = r.u8()?;
    let _background_index = r.u8()?;
    let _aspect_ratio = r.u8()?;

    // Global color table: 2^(exponent + 1) RGB entries, in file order.
    // Code indices are positional, so the table is kept verbatim even if
    // an encoder padded it with duplicate entries.
    let mut color_table: Vec<[u8; 3]> = Vec::new();
    if packed & 0x80 != 0 {
        let size = 1usize << ((packed & 0x07) + 1);
        for _ in 0..size {
            let entry = r.take(3)?;
            color_table.push([entry[0], entry[1], entry[2]]);
        }
    }

    loop {
        match r.u8()? {
            EXTENSION_INTRODUCER => {
                let _label = r.u8()?;
                skip_sub_blocks(&mut r)?;
            }
            IMAGE_SEPARATOR => return decode_image(&mut r, &color_table),
            TRAILER => {
                return Err(DecodeError::InvalidFormat(
                    "GIF contains no image data".into(),
                ))
            }
            other => {
                return Err(DecodeError::InvalidFormat(format!(
                    "unexpected GIF block 0x{other:02X}"
                )))
            }
        }
    }
}

/// Read and decode a GIF file.
///
/// # Errors
///
/// Everything [`decode_gif`] returns, plus [`DecodeError::Io`] if the file
/// cannot be read.
pub fn load_gif(path: impl AsRef<Path>) -> Result<PixelImage, DecodeError> {
    let bytes = fs::read(path)?;
    decode_gif(&bytes)
}

fn decode_image(r: &mut ByteReader, color_table: &[[u8; 3]]) -> Result<PixelImage, DecodeError> {
    let _left = r.u16_le()?;
    let _top = r.u16_le()?;
    let width = r.u16_le()? as u32;
    let height = r.u16_le()? as u32;
    let packed = r.u8()?;

    if packed & 0x80 != 0 {
        return Err(DecodeError::UnsupportedFeature(
            "GIF local color tables".into(),
        ));
    }
    if packed & 0x40 != 0 {
        return Err(DecodeError::UnsupportedFeature("interlaced GIF".into()));
    }
    if color_table.is_empty() {
        return Err(DecodeError::UnsupportedFeature(
            "GIF without a global color table".into(),
        ));
    }
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidFormat(
            "GIF image has a zero dimension".into(),
        ));
    }

    let min_code_size = r.u8()?;
    if !(2..=8).contains(&min_code_size) {
        return Err(DecodeError::CorruptedData(format!(
            "invalid LZW minimum code size {min_code_size}"
        )));
    }

    // Concatenate the length-prefixed sub-blocks into one code stream.
    let mut compressed = Vec::new();
    loop {
        let len = r.u8()?;
        if len == 0 {
            break;
        }
        compressed.extend_from_slice(r.take(len as usize)?);
    }

    let pixel_count = width as usize * height as usize;
    let indices = lzw::decompress(&compressed, min_code_size, pixel_count)?;
    if indices.len() != pixel_count {
        return Err(DecodeError::CorruptedData(format!(
            "expected {} pixels, LZW stream produced {}",
            pixel_count,
            indices.len()
        )));
    }

    let mut data = vec![0u8; pixel_count * 3];
    for (i, &index) in indices.iter().enumerate() {
        let [red, green, blue] = *color_table.get(index as usize).ok_or_else(|| {
            DecodeError::CorruptedData(format!("color index {index} outside the table"))
        })?;
        let x = i % width as usize;
        // GIF rows are top-first; the buffer is bottom-first.
        let y = height as usize - 1 - i / width as usize;
        let offset = 3 * (y * width as usize + x);
        data[offset] = blue;
        data[offset + 1] = green;
        data[offset + 2] = red;
    }

    Ok(PixelImage::from_raw(width, height, 3, data))
}

fn skip_sub_blocks(r: &mut ByteReader) -> Result<(), DecodeError> {
    loop {
        let len = r.u8()?;
        if len == 0 {
            return Ok(());
        }
        r.skip(len as usize)?;
    }
}

fn bad_header(detail: &str) -> DecodeError {
    DecodeError::InvalidFormat(format!("not a valid GIF file: {detail}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode_gif;
    use crate::image::Color;

    /// 2x2 image with four distinct colors.
    fn four_color_image() -> PixelImage {
        let mut img = PixelImage::new(2, 2, 3);
        img.set_pixel(0, 0, Color::rgb(255, 0, 0)).unwrap();
        img.set_pixel(1, 0, Color::rgb(0, 255, 0)).unwrap();
        img.set_pixel(0, 1, Color::rgb(0, 0, 255)).unwrap();
        img.set_pixel(1, 1, Color::rgb(255, 255, 255)).unwrap();
        img
    }

    #[test]
    fn test_round_trip_four_colors() {
        let img = four_color_image();
        let bytes = encode_gif(&img).unwrap();
        let decoded = decode_gif(&bytes).unwrap();
        assert_eq!(decoded, img);
    }

    #[test]
    fn test_decode_rejects_bad_signature() {
        let mut bytes = encode_gif(&four_color_image()).unwrap();
        bytes[0] = b'J';
        assert!(matches!(
            decode_gif(&bytes),
            Err(DecodeError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_decode_rejects_unknown_version() {
        let mut bytes = encode_gif(&four_color_image()).unwrap();
        bytes[3..6].copy_from_slice(b"90a");
        assert!(matches!(
            decode_gif(&bytes),
            Err(DecodeError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_decode_accepts_87a_version() {
        let mut bytes = encode_gif(&four_color_image()).unwrap();
        bytes[3..6].copy_from_slice(b"87a");
        assert!(decode_gif(&bytes).is_ok());
    }

    #[test]
    fn test_decode_rejects_local_color_table() {
        let mut bytes = encode_gif(&four_color_image()).unwrap();
        // Image descriptor starts right after the 13-byte header/LSD and
        // the 4-entry color table; its packed field is byte 9 of the block.
        let descriptor = 13 + 4 * 3;
        bytes[descriptor + 9] |= 0x80;
        assert!(matches!(
            decode_gif(&bytes),
            Err(DecodeError::UnsupportedFeature(_))
        ));
    }

    #[test]
    fn test_decode_rejects_interlaced_image() {
        let mut bytes = encode_gif(&four_color_image()).unwrap();
        let descriptor = 13 + 4 * 3;
        bytes[descriptor + 9] |= 0x40;
        assert!(matches!(
            decode_gif(&bytes),
            Err(DecodeError::UnsupportedFeature(_))
        ));
    }

    #[test]
    fn test_decode_skips_extension_blocks() {
        let encoded = encode_gif(&four_color_image()).unwrap();
        // Splice a graphic control extension between the color table and
        // the image descriptor.
        let descriptor = 13 + 4 * 3;
        let mut bytes = encoded[..descriptor].to_vec();
        bytes.extend_from_slice(&[0x21, 0xF9, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00]);
        bytes.extend_from_slice(&encoded[descriptor..]);

        let decoded = decode_gif(&bytes).unwrap();
        assert_eq!(decoded, four_color_image());
    }

    #[test]
    fn test_decode_truncated_sub_block() {
        let bytes = encode_gif(&four_color_image()).unwrap();
        let truncated = &bytes[..bytes.len() - 4];
        assert!(matches!(
            decode_gif(truncated),
            Err(DecodeError::CorruptedData(_))
        ));
    }

    #[test]
    fn test_decode_trailer_without_image() {
        // Header, LSD without a color table, immediate trailer.
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"GIF89a");
        bytes.extend_from_slice(&[0, 0, 0, 0, 0x00, 0, 0]);
        bytes.push(TRAILER);
        assert!(matches!(
            decode_gif(&bytes),
            Err(DecodeError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_decode_pixel_count_mismatch() {
        let mut bytes = encode_gif(&four_color_image()).unwrap();
        // Claim a taller image than the LZW stream provides.
        let descriptor = 13 + 4 * 3;
        bytes[descriptor + 7..descriptor + 9].copy_from_slice(&3u16.to_le_bytes());
        assert!(matches!(
            decode_gif(&bytes),
            Err(DecodeError::CorruptedData(_))
        ));
    }

    #[test]
    fn test_decode_stream_longer_than_dimensions() {
        // Shrink the declared height so the LZW stream expands past the
        // pixel count; decompression must stop at the bound.
        let mut bytes = encode_gif(&four_color_image()).unwrap();
        let descriptor = 13 + 4 * 3;
        bytes[descriptor + 7..descriptor + 9].copy_from_slice(&1u16.to_le_bytes());
        assert!(matches!(
            decode_gif(&bytes),
            Err(DecodeError::CorruptedData(_))
        ));
    }
}
