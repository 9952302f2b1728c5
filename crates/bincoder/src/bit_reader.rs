//! LSB-first bit reader over any [`std::io::Read`] source.

use std::io::{ErrorKind, Read};

use crate::{
    bits::{BITS_IN_BYTE, right_bits},
    errors::ReadError,
    text::TextEncoding,
};

/// Pulls bytes from the source on demand and serves them bit by bit.
///
/// Bits that were pulled but not yet consumed stay in the reader between calls.
/// Reads take an `enforce` flag: a strict read fails with
/// [`ReadError::TruncatedStream`] when the source runs dry, a non-strict read
/// returns what is left and leaves the reader exhausted.
pub struct BitReader<R: Read> {
    source: R,
    encoding: TextEncoding,
    acc: u8,
    valid: u32,
    exhausted: bool,
}

impl<R: Read> BitReader<R> {
    pub fn new(source: R) -> Self {
        Self::with_encoding(source, TextEncoding::default())
    }

    pub fn with_encoding(source: R, encoding: TextEncoding) -> Self {
        BitReader {
            source,
            encoding,
            acc: 0,
            valid: 0,
            exhausted: false,
        }
    }

    /// True once a non-strict read ran past the end of the source.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Returns the source. Bits already pulled into the reader are dropped.
    pub fn into_inner(self) -> R {
        self.source
    }

    fn next_byte(&mut self) -> Result<Option<u8>, ReadError> {
        let mut buf = [0u8; 1];
        loop {
            match self.source.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Reads one bit. Returns `None` at the end of the source.
    pub fn try_read_bit(&mut self) -> Result<Option<bool>, ReadError> {
        if self.exhausted {
            return Ok(None);
        }

        if self.valid == 0 {
            match self.next_byte()? {
                Some(b) => {
                    self.acc = b;
                    self.valid = BITS_IN_BYTE;
                }
                None => return Ok(None),
            }
        }

        let bit = self.acc & 1 == 1;
        self.acc >>= 1;
        self.valid -= 1;

        Ok(Some(bit))
    }

    /// Reads up to `bit_count` (at most 8) bits.
    ///
    /// Returns the bits and how many were actually read. The count is only
    /// short for a non-strict read at the end of the source.
    pub fn read_bits(&mut self, bit_count: u32, enforce: bool) -> Result<(u8, u32), ReadError> {
        if bit_count > BITS_IN_BYTE {
            return Err(ReadError::InvalidBitWidth {
                requested: bit_count,
                capacity: BITS_IN_BYTE,
            });
        }

        if bit_count == 0 {
            return Ok((0, 0));
        }

        if self.exhausted {
            if enforce {
                return Err(ReadError::TruncatedStream {
                    requested: bit_count,
                    available: 0,
                });
            }
            return Ok((0, 0));
        }

        if self.valid >= bit_count {
            let result = right_bits(self.acc, bit_count);
            // bit_count may be 8 here, which would overflow a u8 shift.
            self.acc = ((self.acc as u16) >> bit_count) as u8;
            self.valid -= bit_count;
            return Ok((result, bit_count));
        }

        let Some(next) = self.next_byte()? else {
            if enforce {
                return Err(ReadError::TruncatedStream {
                    requested: bit_count,
                    available: self.valid,
                });
            }

            log::debug!(
                "source ended with {} of {} requested bits",
                self.valid,
                bit_count
            );

            let result = (right_bits(self.acc, self.valid), self.valid);
            self.acc = 0;
            self.valid = 0;
            self.exhausted = true;
            return Ok(result);
        };

        // Splice the new byte above the held bits, hand out the low bit_count
        // bits and keep the rest for the next call.
        let mut combined = self.acc as u16 | (next as u16) << self.valid;
        let result = right_bits(combined as u8, bit_count);
        combined >>= bit_count;

        self.valid = self.valid + BITS_IN_BYTE - bit_count;
        self.acc = combined as u8;

        Ok((result, bit_count))
    }

    pub fn read_byte(&mut self, bit_count: u32, enforce: bool) -> Result<u8, ReadError> {
        Ok(self.read_bits(bit_count, enforce)?.0)
    }

    pub fn read_u8(&mut self) -> Result<u8, ReadError> {
        self.read_byte(BITS_IN_BYTE, true)
    }

    /// Fills `buf` with `bit_count` bits, one byte per position, low byte first.
    ///
    /// Stops at the first short read and returns the total number of bits read.
    pub fn read_into(
        &mut self,
        buf: &mut [u8],
        bit_count: u32,
        enforce: bool,
    ) -> Result<u32, ReadError> {
        let capacity = (buf.len() as u64 * BITS_IN_BYTE as u64).min(u32::MAX as u64) as u32;
        if bit_count > capacity {
            return Err(ReadError::InvalidBitWidth {
                requested: bit_count,
                capacity,
            });
        }

        let mut total = 0;
        for slot in buf.iter_mut() {
            let want = (bit_count - total).min(BITS_IN_BYTE);
            if want == 0 {
                break;
            }

            let (b, n) = self.read_bits(want, enforce)?;
            *slot = b;
            total += n;

            if n < want {
                break;
            }
        }

        Ok(total)
    }

    fn read_array<const N: usize>(
        &mut self,
        bit_count: u32,
        enforce: bool,
    ) -> Result<[u8; N], ReadError> {
        let mut buf = [0u8; N];
        self.read_into(&mut buf, bit_count, enforce)?;
        Ok(buf)
    }

    pub fn read_bool(&mut self, bit_count: u32, enforce: bool) -> Result<bool, ReadError> {
        Ok(self.read_array::<1>(bit_count, enforce)?[0] != 0)
    }

    pub fn read_i16(&mut self, bit_count: u32, enforce: bool) -> Result<i16, ReadError> {
        Ok(i16::from_le_bytes(self.read_array(bit_count, enforce)?))
    }

    pub fn read_i32(&mut self, bit_count: u32, enforce: bool) -> Result<i32, ReadError> {
        Ok(i32::from_le_bytes(self.read_array(bit_count, enforce)?))
    }

    pub fn read_i64(&mut self, bit_count: u32, enforce: bool) -> Result<i64, ReadError> {
        Ok(i64::from_le_bytes(self.read_array(bit_count, enforce)?))
    }

    pub fn read_f32(&mut self, bit_count: u32, enforce: bool) -> Result<f32, ReadError> {
        Ok(f32::from_le_bytes(self.read_array(bit_count, enforce)?))
    }

    pub fn read_f64(&mut self, bit_count: u32, enforce: bool) -> Result<f64, ReadError> {
        Ok(f64::from_le_bytes(self.read_array(bit_count, enforce)?))
    }

    // Natural-width shortcuts. Like `read_u8` these are strict reads.

    pub fn read_bool_natural(&mut self) -> Result<bool, ReadError> {
        self.read_bool(BITS_IN_BYTE, true)
    }

    pub fn read_i16_natural(&mut self) -> Result<i16, ReadError> {
        self.read_i16(i16::BITS, true)
    }

    pub fn read_i32_natural(&mut self) -> Result<i32, ReadError> {
        self.read_i32(i32::BITS, true)
    }

    pub fn read_i64_natural(&mut self) -> Result<i64, ReadError> {
        self.read_i64(i64::BITS, true)
    }

    pub fn read_f32_natural(&mut self) -> Result<f32, ReadError> {
        self.read_f32(u32::BITS, true)
    }

    pub fn read_f64_natural(&mut self) -> Result<f64, ReadError> {
        self.read_f64(u64::BITS, true)
    }

    /// Reads a `bit_count`-bit string and strips its trailing NUL padding.
    pub fn read_string(&mut self, bit_count: u32, enforce: bool) -> Result<String, ReadError> {
        let mut buf = vec![0u8; bit_count.div_ceil(BITS_IN_BYTE) as usize];
        self.read_into(&mut buf, bit_count, enforce)?;

        let end = buf.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        self.encoding.decode(&buf[..end])
    }
}
