//! GIF-flavoured LZW compression over color-index streams.
//!
//! The code table starts with one root entry per possible index
//! (`0..2^min_code_size`) plus two reserved codes: the clear code
//! (`2^min_code_size`) and the end-of-information code (clear + 1). Codes
//! are packed LSB-first with a variable width that starts at
//! `min_code_size + 1` bits and grows as the table fills, capped at 12 bits.
//! When the table is full the compressor emits a clear code and starts over,
//! which is exactly what the decompressor expects.

use std::collections::HashMap;

use thiserror::Error;

/// Codes never exceed 12 bits on the wire.
const MAX_CODE_WIDTH: u32 = 12;
/// Maximum number of code table entries (2^12).
const MAX_TABLE_LEN: usize = 1 << MAX_CODE_WIDTH;

/// Errors produced while decompressing an LZW stream.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LzwError {
    /// The stream ended before the end-of-information code.
    #[error("compressed stream ended before the end-of-information code")]
    UnexpectedEof,

    /// The stream referenced a code that was never defined.
    #[error("compressed stream references unknown code {0}")]
    UnknownCode(u16),

    /// The decompressed output grew past the caller's expected length.
    #[error("decompressed data exceeds the expected {0} indices")]
    OutputTooLong(usize),
}

/// Writes variable-width codes LSB-first into a byte stream.
struct BitWriter {
    bytes: Vec<u8>,
    acc: u32,
    bits: u32,
}

impl BitWriter {
    fn new() -> Self {
        Self {
            bytes: Vec::new(),
            acc: 0,
            bits: 0,
        }
    }

    fn write(&mut self, code: u16, width: u32) {
        self.acc |= (code as u32) << self.bits;
        self.bits += width;
        while self.bits >= 8 {
            self.bytes.push(self.acc as u8);
            self.acc >>= 8;
            self.bits -= 8;
        }
    }

    fn finish(mut self) -> Vec<u8> {
        if self.bits > 0 {
            self.bytes.push(self.acc as u8);
        }
        self.bytes
    }
}

/// Reads variable-width codes LSB-first from a byte stream.
struct BitReader<'a> {
    data: &'a [u8],
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, bit_pos: 0 }
    }

    fn read(&mut self, width: u32) -> Option<u16> {
        let mut value: u32 = 0;
        for i in 0..width {
            let byte = self.bit_pos / 8;
            if byte >= self.data.len() {
                return None;
            }
            let bit = (self.data[byte] >> (self.bit_pos % 8)) & 1;
            value |= (bit as u32) << i;
            self.bit_pos += 1;
        }
        Some(value as u16)
    }
}

fn root_table(clear_code: u16) -> HashMap<Vec<u8>, u16> {
    (0..clear_code).map(|i| (vec![i as u8], i)).collect()
}

fn root_strings(clear_code: u16) -> Vec<Vec<u8>> {
    let mut dict: Vec<Vec<u8>> = (0..clear_code).map(|i| vec![i as u8]).collect();
    // Placeholder slots so table positions line up with code values.
    dict.push(Vec::new()); // clear code
    dict.push(Vec::new()); // end-of-information code
    dict
}

/// Compress a stream of color-table indices.
///
/// Every index must be below `2^min_code_size`. The returned bytes are the
/// packed code stream without sub-block framing; the GIF encoder splits
/// them into 255-byte sub-blocks.
pub fn compress(indices: &[u8], min_code_size: u8) -> Vec<u8> {
    let clear_code: u16 = 1 << min_code_size;
    let end_code: u16 = clear_code + 1;
    let initial_width = min_code_size as u32 + 1;

    let mut writer = BitWriter::new();
    let mut width = initial_width;
    let mut table = root_table(clear_code);
    let mut next_code = end_code + 1;

    writer.write(clear_code, width);

    let mut buffer: Vec<u8> = Vec::new();
    for &index in indices {
        buffer.push(index);
        if table.contains_key(&buffer) {
            continue;
        }

        // Emit the longest known prefix and record its extension.
        let prefix = &buffer[..buffer.len() - 1];
        writer.write(table[prefix], width);

        if (next_code as usize) < MAX_TABLE_LEN {
            table.insert(buffer.clone(), next_code);
            if u32::from(next_code) == (1 << width) && width < MAX_CODE_WIDTH {
                width += 1;
            }
            next_code += 1;
        } else {
            writer.write(clear_code, width);
            table = root_table(clear_code);
            next_code = end_code + 1;
            width = initial_width;
        }

        buffer.clear();
        buffer.push(index);
    }

    if !buffer.is_empty() {
        writer.write(table[&buffer], width);
    }
    // The decompressor defines one more entry after the final data code; if
    // that entry lands exactly on a width boundary it expects the
    // end-of-information code one bit wider.
    if u32::from(next_code) == (1 << width) && width < MAX_CODE_WIDTH {
        width += 1;
    }
    writer.write(end_code, width);
    writer.finish()
}

/// Decompress a packed code stream back into color-table indices.
///
/// `data` is the concatenation of all sub-block payloads of one image.
/// `max_len` bounds the output (the caller knows how many indices the
/// stream may legitimately produce), so a small hostile stream cannot
/// expand without limit.
///
/// # Errors
///
/// Returns [`LzwError::UnexpectedEof`] if the stream ends before the
/// end-of-information code, [`LzwError::UnknownCode`] if a code outside
/// the table is referenced and [`LzwError::OutputTooLong`] once the output
/// would exceed `max_len`.
pub fn decompress(data: &[u8], min_code_size: u8, max_len: usize) -> Result<Vec<u8>, LzwError> {
    let clear_code: u16 = 1 << min_code_size;
    let end_code: u16 = clear_code + 1;
    let initial_width = min_code_size as u32 + 1;

    let mut reader = BitReader::new(data);
    let mut width = initial_width;
    let mut dict = root_strings(clear_code);
    let mut prev: Option<u16> = None;
    let mut output = Vec::new();

    loop {
        let code = reader.read(width).ok_or(LzwError::UnexpectedEof)?;

        if code == clear_code {
            dict = root_strings(clear_code);
            width = initial_width;
            prev = None;
            continue;
        }
        if code == end_code {
            break;
        }

        let entry: Vec<u8> = if (code as usize) < dict.len() {
            let seq = &dict[code as usize];
            if seq.is_empty() {
                return Err(LzwError::UnknownCode(code));
            }
            seq.clone()
        } else if code as usize == dict.len() {
            // The cScSc case: the code being defined right now.
            let p = prev.ok_or(LzwError::UnknownCode(code))?;
            let mut seq = dict[p as usize].clone();
            seq.push(seq[0]);
            seq
        } else {
            return Err(LzwError::UnknownCode(code));
        };

        if let Some(p) = prev {
            if dict.len() < MAX_TABLE_LEN {
                let mut seq = dict[p as usize].clone();
                seq.push(entry[0]);
                dict.push(seq);
                if dict.len() == (1 << width) && width < MAX_CODE_WIDTH {
                    width += 1;
                }
            }
        }

        if output.len() + entry.len() > max_len {
            return Err(LzwError::OutputTooLong(max_len));
        }
        output.extend_from_slice(&entry);
        prev = Some(code);
    }

    Ok(output)
}
