//! GIF encoding.
//!
//! Writes a GIF89a file with a single image backed by the global color
//! table: header, logical screen descriptor, color table, image descriptor,
//! LZW-compressed pixel data in 255-byte sub-blocks, trailer.
//!
//! # Color table policy
//!
//! The table is built in first-seen scan order (top row first, left to
//! right), which fixes the LZW code index of every color deterministically.
//! A table whose distinct-color count is not a power of two is padded to
//! the next power of two in `[2, 256]` by repeating the entry at index 0;
//! padding entries are never referenced by the pixel stream.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::image::PixelImage;
use crate::lzw;

use super::EncodeError;

const IMAGE_SEPARATOR: u8 = 0x2C;
const TRAILER: u8 = 0x3B;
const MAX_SUB_BLOCK: usize = 255;

/// Which color table the encoder attaches to the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorTableKind {
    /// One table in the logical screen descriptor, shared by all images.
    #[default]
    Global,
    /// A per-image table. Not implemented; requesting it is an error.
    Local,
}

/// Encode a [`PixelImage`] as GIF bytes using the global color table.
///
/// Alpha is dropped for 4-channel images; GIF has no alpha channel.
///
/// # Errors
///
/// - [`EncodeError::InvalidDimensions`] for an empty image.
/// - [`EncodeError::UnsupportedFeature`] if the image has more than 256
///   distinct colors or a dimension beyond the format's 16-bit limit.
pub fn encode_gif(image: &PixelImage) -> Result<Vec<u8>, EncodeError> {
    encode_gif_with(image, ColorTableKind::Global)
}

/// Encode a [`PixelImage`] as GIF bytes with an explicit color-table
/// policy.
///
/// # Errors
///
/// Everything [`encode_gif`] returns, plus [`EncodeError::UnsupportedFeature`]
/// when a local color table is requested.
pub fn encode_gif_with(
    image: &PixelImage,
    color_table: ColorTableKind,
) -> Result<Vec<u8>, EncodeError> {
    if color_table == ColorTableKind::Local {
        return Err(EncodeError::UnsupportedFeature(
            "GIF local color tables".into(),
        ));
    }
    if image.is_empty() {
        return Err(EncodeError::InvalidDimensions {
            width: image.width(),
            height: image.height(),
        });
    }
    if image.width() > u16::MAX as u32 || image.height() > u16::MAX as u32 {
        return Err(EncodeError::UnsupportedFeature(format!(
            "{}x{} exceeds the 65535-pixel GIF dimension limit",
            image.width(),
            image.height()
        )));
    }

    let (mut table, indices) = build_color_table(image)?;

    // Pad to a power-of-two size in [2, 256]; the exponent goes into the
    // logical screen descriptor.
    let table_size = table.len().next_power_of_two().max(2);
    let first = table[0];
    table.resize(table_size, first);
    let exponent = (table_size.trailing_zeros() - 1) as u8;

    // Smallest code width that covers every index, floored at 2 per the
    // GIF specification.
    let min_code_size = (table_size.trailing_zeros() as u8).max(2);

    let width = image.width() as u16;
    let height = image.height() as u16;

    let mut bytes = Vec::new();

    // Header.
    bytes.extend_from_slice(b"GIF89a");

    // Logical screen descriptor: bit 7 of the packed field flags the
    // global color table, bits 0-2 carry the size exponent.
    bytes.extend_from_slice(&width.to_le_bytes());
    bytes.extend_from_slice(&height.to_le_bytes());
    bytes.push(0x80 | exponent);
    bytes.push(0); // background color index
    bytes.push(0); // pixel aspect ratio

    for entry in &table {
        bytes.extend_from_slice(entry);
    }

    // Image descriptor.
    bytes.push(IMAGE_SEPARATOR);
    bytes.extend_from_slice(&0u16.to_le_bytes()); // left
    bytes.extend_from_slice(&0u16.to_le_bytes()); // top
    bytes.extend_from_slice(&width.to_le_bytes());
    bytes.extend_from_slice(&height.to_le_bytes());
    bytes.push(0); // no local table, not interlaced

    bytes.push(min_code_size);
    let compressed = lzw::compress(&indices, min_code_size);
    for chunk in compressed.chunks(MAX_SUB_BLOCK) {
        bytes.push(chunk.len() as u8);
        bytes.extend_from_slice(chunk);
    }
    bytes.push(0); // block terminator

    bytes.push(TRAILER);
    Ok(bytes)
}

/// Encode and write a GIF file.
///
/// The byte stream is built in full before the write, so no partial file is
/// left on failure.
///
/// # Errors
///
/// Everything [`encode_gif`] returns, plus [`EncodeError::Io`] if the file
/// cannot be written.
pub fn save_gif(image: &PixelImage, path: impl AsRef<Path>) -> Result<(), EncodeError> {
    let bytes = encode_gif(image)?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Collect the distinct colors of `image` in first-seen scan order and map
/// every pixel to its table index.
///
/// The scan runs in GIF order: top row first, left to right. Because the
/// buffer stores rows bottom-first, that means iterating stored rows in
/// reverse.
fn build_color_table(image: &PixelImage) -> Result<(Vec<[u8; 3]>, Vec<u8>), EncodeError> {
    let width = image.width() as usize;
    let height = image.height() as usize;
    let channels = image.channels() as usize;
    let data = image.data();

    let mut lookup: HashMap<[u8; 3], u8> = HashMap::new();
    let mut table: Vec<[u8; 3]> = Vec::new();
    let mut indices = Vec::with_capacity(width * height);

    for y in (0..height).rev() {
        for x in 0..width {
            let i = channels * (y * width + x);
            // Buffer bytes are B, G, R; the table stores R, G, B.
            let rgb = [data[i + 2], data[i + 1], data[i]];
            let index = match lookup.get(&rgb) {
                Some(&index) => index,
                None => {
                    if table.len() == 256 {
                        return Err(EncodeError::UnsupportedFeature(
                            "more than 256 distinct colors".into(),
                        ));
                    }
                    let index = table.len() as u8;
                    table.push(rgb);
                    lookup.insert(rgb, index);
                    index
                }
            };
            indices.push(index);
        }
    }

    Ok((table, indices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_gif;
    use crate::image::Color;

    fn two_color_image(width: u32, height: u32) -> PixelImage {
        let mut img = PixelImage::new(width, height, 3);
        for y in 0..height {
            for x in 0..width {
                let c = if (x + y) % 2 == 0 {
                    Color::rgb(255, 255, 255)
                } else {
                    Color::rgb(0, 0, 0)
                };
                img.set_pixel(x, y, c).unwrap();
            }
        }
        img
    }

    #[test]
    fn test_header_and_screen_descriptor() {
        let bytes = encode_gif(&two_color_image(4, 3)).unwrap();

        assert_eq!(&bytes[0..6], b"GIF89a");
        assert_eq!(u16::from_le_bytes(bytes[6..8].try_into().unwrap()), 4);
        assert_eq!(u16::from_le_bytes(bytes[8..10].try_into().unwrap()), 3);
        // Global table flag set, exponent 0 for a 2-entry table.
        assert_eq!(bytes[10], 0x80);
        assert_eq!(*bytes.last().unwrap(), TRAILER);
    }

    #[test]
    fn test_color_table_is_first_seen_order() {
        // Top row of the checkerboard starts white, so white gets index 0.
        let bytes = encode_gif(&two_color_image(4, 4)).unwrap();
        assert_eq!(&bytes[13..16], &[255, 255, 255]);
        assert_eq!(&bytes[16..19], &[0, 0, 0]);
    }

    #[test]
    fn test_table_padded_to_power_of_two() {
        let mut img = two_color_image(3, 1);
        img.set_pixel(2, 0, Color::rgb(9, 9, 9)).unwrap();

        let bytes = encode_gif(&img).unwrap();
        // 3 distinct colors pad to 4 entries; exponent 1.
        assert_eq!(bytes[10], 0x81);
        // The padding entry repeats index 0 (white).
        assert_eq!(&bytes[13 + 9..13 + 12], &[255, 255, 255]);
    }

    #[test]
    fn test_minimum_code_size_floor() {
        let bytes = encode_gif(&two_color_image(4, 4)).unwrap();
        // Descriptor block is 10 bytes after the 2-entry table.
        let mcs = bytes[13 + 6 + 10];
        assert_eq!(mcs, 2);
    }

    #[test]
    fn test_local_color_table_rejected() {
        let err = encode_gif_with(&two_color_image(2, 2), ColorTableKind::Local).unwrap_err();
        assert!(matches!(err, EncodeError::UnsupportedFeature(_)));
    }

    #[test]
    fn test_empty_image_rejected() {
        let img = PixelImage::new(0, 0, 3);
        assert!(matches!(
            encode_gif(&img),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_too_many_colors_rejected() {
        // 17x16 = 272 unique colors.
        let mut img = PixelImage::new(17, 16, 3);
        for y in 0..16 {
            for x in 0..17 {
                let v = y * 17 + x;
                img.set_pixel(x, y, Color::rgb((v % 256) as u8, (v / 256) as u8, 0))
                    .unwrap();
            }
        }
        assert!(matches!(
            encode_gif(&img),
            Err(EncodeError::UnsupportedFeature(_))
        ));
    }

    #[test]
    fn test_round_trip_checkerboard() {
        let img = two_color_image(8, 8);
        let decoded = decode_gif(&encode_gif(&img).unwrap()).unwrap();
        assert_eq!(decoded, img);
    }

    #[test]
    fn test_round_trip_alpha_dropped() {
        let mut img = PixelImage::new(2, 2, 4);
        img.set_pixel(0, 0, Color::rgba(1, 2, 3, 77)).unwrap();
        img.set_pixel(1, 1, Color::rgba(4, 5, 6, 200)).unwrap();

        let decoded = decode_gif(&encode_gif(&img).unwrap()).unwrap();
        assert_eq!(decoded.channels(), 3);
        assert_eq!(decoded.get_pixel(0, 0).unwrap(), Color::rgb(1, 2, 3));
        assert_eq!(decoded.get_pixel(1, 1).unwrap(), Color::rgb(4, 5, 6));
    }

    #[test]
    fn test_large_stream_splits_sub_blocks() {
        // 64x64 of pseudo-random 4-color noise compresses poorly enough to
        // exceed one 255-byte sub-block.
        let mut img = PixelImage::new(64, 64, 3);
        for y in 0..64 {
            for x in 0..64 {
                let v = ((x * 7 + y * 13 + (x * y) % 5) % 4) as u8;
                img.set_pixel(x, y, Color::rgb(v * 60, v * 40, v * 20))
                    .unwrap();
            }
        }

        let bytes = encode_gif(&img).unwrap();
        // Sub-block region: after header (6), LSD (7), table (12),
        // descriptor (10) and the min-code-size byte.
        let first_len = bytes[6 + 7 + 12 + 10 + 1];
        assert_eq!(first_len as usize, MAX_SUB_BLOCK);

        let decoded = decode_gif(&bytes).unwrap();
        assert_eq!(decoded, img);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
