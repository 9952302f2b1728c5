//! Codec-wide configuration.

use crate::text::TextEncoding;

/// Settings shared by every encode and decode call of a [crate::Bincoder].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    /// Encoding used for string fields.
    pub encoding: TextEncoding,
}

impl Config {
    pub fn new(encoding: TextEncoding) -> Self {
        Config { encoding }
    }
}

#[cfg(feature = "serde")]
impl From<&crate::serde::SchemaDef> for Config {
    fn from(value: &crate::serde::SchemaDef) -> Self {
        Config {
            encoding: value.encoding.map(Into::into).unwrap_or_default(),
        }
    }
}
