//! LSB-first bit writer over any [`std::io::Write`] sink.

use std::io::Write;

use crate::{
    bits::{BITS_IN_BYTE, right_bits},
    errors::WriteError,
    text::TextEncoding,
};

/// Packs bits into bytes and pushes every completed byte to the sink.
///
/// The writer owns its sink. Pass `&mut sink` to keep using the sink after the
/// writer is gone, or hand it over by value and get it back with
/// [`BitWriter::into_inner`].
///
/// A trailing partial byte is only emitted by [`BitWriter::flush`].
pub struct BitWriter<W: Write> {
    sink: W,
    encoding: TextEncoding,
    acc: u8,
    valid: u32,
}

impl<W: Write> BitWriter<W> {
    pub fn new(sink: W) -> Self {
        Self::with_encoding(sink, TextEncoding::default())
    }

    pub fn with_encoding(sink: W, encoding: TextEncoding) -> Self {
        BitWriter {
            sink,
            encoding,
            acc: 0,
            valid: 0,
        }
    }

    /// Number of bits held in the partial byte, in `0..8`.
    pub fn pending_bits(&self) -> u32 {
        self.valid
    }

    fn emit(&mut self) -> Result<(), WriteError> {
        self.sink.write_all(&[self.acc])?;
        self.acc = 0;
        self.valid = 0;
        Ok(())
    }

    pub fn write_bit(&mut self, bit: bool) -> Result<(), WriteError> {
        if bit {
            self.acc |= 1 << self.valid;
        }

        self.valid += 1;
        if self.valid == BITS_IN_BYTE {
            self.emit()?;
        }

        Ok(())
    }

    /// Writes the low `bit_count` bits of `value`.
    pub fn write_byte(&mut self, value: u8, bit_count: u32) -> Result<(), WriteError> {
        if bit_count > BITS_IN_BYTE {
            return Err(WriteError::InvalidBitWidth {
                requested: bit_count,
                capacity: BITS_IN_BYTE,
            });
        }

        let room = BITS_IN_BYTE - self.valid;
        let take = room.min(bit_count);

        self.acc |= right_bits(value, take) << self.valid;
        self.valid += take;

        if self.valid == BITS_IN_BYTE {
            self.emit()?;

            // The value straddled the byte boundary: its high bits start the next byte.
            let rest = bit_count - take;
            if rest != 0 {
                self.acc = right_bits(value >> take, rest);
                self.valid = rest;
            }
        }

        Ok(())
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), WriteError> {
        self.write_byte(value, BITS_IN_BYTE)
    }

    /// Writes the first `bit_count` bits of `bytes`, low byte first.
    ///
    /// Every byte of the buffer is walked; once `bit_count` bits are out the
    /// remaining bytes are written with a zero width.
    pub fn write_bits(&mut self, bytes: &[u8], bit_count: u32) -> Result<(), WriteError> {
        let capacity = (bytes.len() as u64 * BITS_IN_BYTE as u64).min(u32::MAX as u64) as u32;
        if bit_count > capacity {
            return Err(WriteError::InvalidBitWidth {
                requested: bit_count,
                capacity,
            });
        }

        let mut remaining = bit_count;
        for &b in bytes {
            let n = remaining.min(BITS_IN_BYTE);
            self.write_byte(b, n)?;
            remaining -= n;
        }

        Ok(())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), WriteError> {
        for &b in bytes {
            self.write_u8(b)?;
        }

        Ok(())
    }

    pub fn write_bool(&mut self, value: bool, bit_count: u32) -> Result<(), WriteError> {
        self.write_bits(&[value as u8], bit_count)
    }

    pub fn write_i16(&mut self, value: i16, bit_count: u32) -> Result<(), WriteError> {
        self.write_bits(&value.to_le_bytes(), bit_count)
    }

    pub fn write_i32(&mut self, value: i32, bit_count: u32) -> Result<(), WriteError> {
        self.write_bits(&value.to_le_bytes(), bit_count)
    }

    pub fn write_i64(&mut self, value: i64, bit_count: u32) -> Result<(), WriteError> {
        self.write_bits(&value.to_le_bytes(), bit_count)
    }

    pub fn write_f32(&mut self, value: f32, bit_count: u32) -> Result<(), WriteError> {
        self.write_bits(&value.to_le_bytes(), bit_count)
    }

    pub fn write_f64(&mut self, value: f64, bit_count: u32) -> Result<(), WriteError> {
        self.write_bits(&value.to_le_bytes(), bit_count)
    }

    // Natural-width shortcuts: the full storage size of each type.

    pub fn write_bool_natural(&mut self, value: bool) -> Result<(), WriteError> {
        self.write_bool(value, BITS_IN_BYTE)
    }

    pub fn write_i16_natural(&mut self, value: i16) -> Result<(), WriteError> {
        self.write_i16(value, i16::BITS)
    }

    pub fn write_i32_natural(&mut self, value: i32) -> Result<(), WriteError> {
        self.write_i32(value, i32::BITS)
    }

    pub fn write_i64_natural(&mut self, value: i64) -> Result<(), WriteError> {
        self.write_i64(value, i64::BITS)
    }

    pub fn write_f32_natural(&mut self, value: f32) -> Result<(), WriteError> {
        self.write_f32(value, u32::BITS)
    }

    pub fn write_f64_natural(&mut self, value: f64) -> Result<(), WriteError> {
        self.write_f64(value, u64::BITS)
    }

    /// Writes `text` as exactly `bit_count` bits of its encoded bytes.
    ///
    /// Short text is padded with NUL bytes, long text is cut at `bit_count`.
    /// UTF-8 text is cut on a character boundary.
    pub fn write_str(&mut self, text: &str, bit_count: u32) -> Result<(), WriteError> {
        let mut bytes = self.encoding.encode_fitted(text, bit_count)?;

        let needed = bit_count.div_ceil(BITS_IN_BYTE) as usize;
        if bytes.len() < needed {
            bytes.resize(needed, 0);
        }

        self.write_bits(&bytes, bit_count)
    }

    /// Emits the partial byte (zero padded) and flushes the sink.
    pub fn flush(&mut self) -> Result<(), WriteError> {
        if self.valid != 0 {
            self.emit()?;
        }

        self.sink.flush()?;
        Ok(())
    }

    /// Flushes and returns the sink.
    pub fn into_inner(mut self) -> Result<W, WriteError> {
        self.flush()?;
        Ok(self.sink)
    }
}
