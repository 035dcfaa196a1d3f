//! BMP encoding.

use std::fs;
use std::path::Path;

use crate::image::PixelImage;

use super::EncodeError;

const FILE_HEADER_SIZE: u32 = 14;
const INFO_HEADER_SIZE: u32 = 40;

/// Encode a [`PixelImage`] as BMP bytes.
///
/// Header fields (`data_offset`, `file_size`, `image_size`) are recomputed
/// from the current buffer; rows are zero-padded to the next multiple of 4
/// bytes. The buffer already holds rows bottom-first in B, G, R[, A] order,
/// so pixel data is written as-is apart from the padding.
pub fn encode_bmp(image: &PixelImage) -> Vec<u8> {
    let channels = image.channels() as usize;
    let row_len = image.width() as usize * channels;
    let padding = (4 - row_len % 4) % 4;

    let data_offset = FILE_HEADER_SIZE + INFO_HEADER_SIZE;
    let image_size = ((row_len + padding) * image.height() as usize) as u32;
    let file_size = data_offset + image_size;

    let mut bytes = Vec::with_capacity(file_size as usize);

    // File header.
    bytes.extend_from_slice(&0x4D42u16.to_le_bytes()); // "BM"
    bytes.extend_from_slice(&file_size.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes()); // reserved
    bytes.extend_from_slice(&data_offset.to_le_bytes());

    // Info header.
    bytes.extend_from_slice(&INFO_HEADER_SIZE.to_le_bytes());
    bytes.extend_from_slice(&(image.width() as i32).to_le_bytes());
    bytes.extend_from_slice(&(image.height() as i32).to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // planes
    bytes.extend_from_slice(&(image.channels() as u16 * 8).to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes()); // compression
    bytes.extend_from_slice(&image_size.to_le_bytes());
    bytes.extend_from_slice(&0i32.to_le_bytes()); // x pixels per meter
    bytes.extend_from_slice(&0i32.to_le_bytes()); // y pixels per meter
    bytes.extend_from_slice(&0u32.to_le_bytes()); // colors used
    bytes.extend_from_slice(&0u32.to_le_bytes()); // colors important

    if padding == 0 {
        bytes.extend_from_slice(image.data());
    } else {
        let pad = [0u8; 3];
        for row in image.data().chunks_exact(row_len) {
            bytes.extend_from_slice(row);
            bytes.extend_from_slice(&pad[..padding]);
        }
    }

    bytes
}

/// Encode and write a BMP file.
///
/// The byte stream is built in full before the write, so no partial file is
/// left on failure.
///
/// # Errors
///
/// Returns [`EncodeError::Io`] if the file cannot be written.
pub fn save_bmp(image: &PixelImage, path: impl AsRef<Path>) -> Result<(), EncodeError> {
    fs::write(path, encode_bmp(image))?;
    Ok(())
}


// ============================================================================
// Property-Based Tests
// ============================================================================
