//! Text encodings used by string fields.
//!
//! A [`TextEncoding`] turns a `str` into the bytes that get bit-packed, and turns
//! unpacked bytes back into a `String`.

use crate::errors::{ReadError, WriteError};

/// Character encoding for string fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// UTF-8. Any valid UTF-8 byte sequence is accepted.
    #[default]
    Utf8,
    /// ASCII. Every byte must be in 0..=0x7F.
    Ascii,
    /// ISO-8859-1. Every byte maps to the code point of the same value.
    Latin1,
}

impl TextEncoding {
    /// Encodes `text` into bytes.
    pub fn encode(self, text: &str) -> Result<Vec<u8>, WriteError> {
        match self {
            TextEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
            TextEncoding::Ascii => text
                .chars()
                .map(|c| {
                    if c.is_ascii() {
                        Ok(c as u8)
                    } else {
                        Err(WriteError::Unencodable(c))
                    }
                })
                .collect(),
            TextEncoding::Latin1 => text
                .chars()
                .map(|c| u8::try_from(c).map_err(|_| WriteError::Unencodable(c)))
                .collect(),
        }
    }

    /// Encodes `text` for a field of `bit_count` bits.
    ///
    /// UTF-8 text that does not fit is cut before the first character that would
    /// lose bits, so whatever is stored decodes again. A one-byte character may
    /// still land in the trailing partial byte. The other encodings use one byte
    /// per character and are cut by the writer.
    pub fn encode_fitted(self, text: &str, bit_count: u32) -> Result<Vec<u8>, WriteError> {
        let mut bytes = self.encode(text)?;
        if self == TextEncoding::Utf8 {
            bytes.truncate(utf8_fit(text, bit_count));
        }
        Ok(bytes)
    }

    /// Decodes `bytes` into a string.
    pub fn decode(self, bytes: &[u8]) -> Result<String, ReadError> {
        match self {
            TextEncoding::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|_| ReadError::InvalidText(self)),
            TextEncoding::Ascii => {
                if !bytes.is_ascii() {
                    return Err(ReadError::InvalidText(self));
                }
                Ok(bytes.iter().map(|&b| b as char).collect())
            }
            TextEncoding::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
        }
    }
}

/// Byte length of the longest prefix of `text` that survives a cut at `bit_count` bits.
fn utf8_fit(text: &str, bit_count: u32) -> usize {
    let room = bit_count as usize;
    let mut end = 0;

    for (start, c) in text.char_indices() {
        let next = start + c.len_utf8();
        if next * 8 <= room || (c.is_ascii() && start * 8 < room) {
            end = next;
        } else {
            break;
        }
    }

    end
}
