//! Low-level bit helpers shared by [crate::bit_writer::BitWriter] and
//! [crate::bit_reader::BitReader].
//!
//! Bits are addressed LSB-first: bit 0 of a stream is the low bit of its first byte.

/// Number of bits in one byte.
pub const BITS_IN_BYTE: u32 = 8;

/// Mask selecting the low `count` bits of a byte. `count` is clamped to 8.
#[inline]
pub fn low_mask(count: u32) -> u8 {
    if count >= BITS_IN_BYTE {
        0xFF
    } else {
        (1u8 << count) - 1
    }
}

/// Keeps only the low `count` bits of `b`.
#[inline]
pub fn right_bits(b: u8, count: u32) -> u8 {
    b & low_mask(count)
}

/// Number of bytes needed to hold `bits` bits.
#[inline]
pub fn bytes_for_bits(bits: u64) -> usize {
    bits.div_ceil(BITS_IN_BYTE as u64) as usize
}

/// Sign-extends the low `bits` of `value` to a full `i64`.
pub fn sign_extend(value: u64, bits: u32) -> i64 {
    if bits == 0 || bits >= 64 {
        return value as i64;
    }

    let shift = 64 - bits;
    ((value << shift) as i64) >> shift
}
