//! Binary image decoding for the BMP and GIF formats.
//!
//! Both decoders parse headers with explicit little-endian reads at known
//! offsets instead of overlaying packed structs, which sidesteps padding
//! and alignment portability issues entirely.
//!
//! # Examples
//!
//! ```ignore
//! use rasterkit_core::decode::decode_bmp;
//!
//! let bytes = std::fs::read("photo.bmp").unwrap();
//! let image = decode_bmp(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width(), image.height());
//! ```

mod bmp;
mod gif;

use thiserror::Error;

use crate::lzw::LzwError;

pub use bmp::{decode_bmp, load_bmp};
pub use gif::{decode_gif, load_gif};

/// Errors for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The byte stream is not the expected format (bad signature or an
    /// unparseable header).
    #[error("invalid or unsupported image format: {0}")]
    InvalidFormat(String),

    /// The format is recognized but uses a feature this decoder does not
    /// implement.
    #[error("unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// The stream is structurally valid but its data is inconsistent or
    /// truncated.
    #[error("corrupted or incomplete image data: {0}")]
    CorruptedData(String),

    /// I/O error while reading the file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<LzwError> for DecodeError {
    fn from(err: LzwError) -> Self {
        DecodeError::CorruptedData(err.to_string())
    }
}

/// Cursor over a byte slice with little-endian field reads.
pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn take(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| DecodeError::CorruptedData("unexpected end of data".into()))?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub(crate) fn skip(&mut self, len: usize) -> Result<(), DecodeError> {
        self.take(len).map(|_| ())
    }

    pub(crate) fn seek(&mut self, pos: usize) -> Result<(), DecodeError> {
        if pos > self.data.len() {
            return Err(DecodeError::CorruptedData("unexpected end of data".into()));
        }
        self.pos = pos;
        Ok(())
    }

    pub(crate) fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    pub(crate) fn u16_le(&mut self) -> Result<u16, DecodeError> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub(crate) fn u32_le(&mut self) -> Result<u32, DecodeError> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub(crate) fn i32_le(&mut self) -> Result<i32, DecodeError> {
        let bytes = self.take(4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_reader_little_endian_fields() {
        let data = [0x42, 0x4D, 0x01, 0x02, 0x03, 0x04, 0xFF];
        let mut r = ByteReader::new(&data);
        assert_eq!(r.u16_le().unwrap(), 0x4D42);
        assert_eq!(r.u32_le().unwrap(), 0x0403_0201);
        assert_eq!(r.u8().unwrap(), 0xFF);
        assert!(r.u8().is_err());
    }

    #[test]
    fn test_byte_reader_seek_and_skip() {
        let data = [0u8, 1, 2, 3, 4];
        let mut r = ByteReader::new(&data);
        r.skip(2).unwrap();
        assert_eq!(r.u8().unwrap(), 2);
        r.seek(0).unwrap();
        assert_eq!(r.u8().unwrap(), 0);
        assert!(r.seek(6).is_err());
    }

    #[test]
    fn test_byte_reader_take_overflow() {
        let data = [0u8; 4];
        let mut r = ByteReader::new(&data);
        assert!(r.take(usize::MAX).is_err());
    }
}
