//! Error types for field compilation, bit writing and bit reading.

use std::io;

use thiserror::Error;

use crate::value::TypeTag;

/// Errors produced when compiling a [crate::field::Field] into a [crate::compiled::CompiledField].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Field has neither a type tag nor a typed accessor.
    #[error("field `{0}` has no type")]
    UntypedField(String),
    /// Type tag has no codec mapping (e.g. an enum backed by a float).
    #[error("field `{field}`: {tag:?} is not a supported data type")]
    UnsupportedType { field: String, tag: TypeTag },
    /// Getter, setter and explicit tag disagree about the field type.
    #[error("field `{field}`: accessor type {found:?} does not match {expected:?}")]
    TypeMismatch {
        field: String,
        expected: TypeTag,
        found: TypeTag,
    },
    /// String fields have no natural width and must declare one.
    #[error("field `{0}` needs an explicit bit width")]
    MissingBitWidth(String),
    /// Declared width is larger than the natural width of the type.
    #[error("field `{field}`: {bits} bits exceeds the {max} bits of its type")]
    InvalidBitWidth { field: String, bits: u32, max: u32 },
    /// Sign extension was requested on a non-integer field.
    #[error("field `{0}` cannot be sign-extended")]
    InvalidSignExtension(String),
    /// Two fields share the same processing order.
    #[error("fields `{first}` and `{second}` share order {order}")]
    DuplicateOrder {
        order: i32,
        first: String,
        second: String,
    },
    /// A layout override names a field that does not exist.
    #[error("layout names unknown field `{0}`")]
    UnknownField(String),
}

/// Errors produced while packing values into a [crate::bit_writer::BitWriter].
#[derive(Debug, Error)]
pub enum WriteError {
    /// Bit count is larger than the value or buffer being written.
    #[error("cannot write {requested} bits from a {capacity}-bit value")]
    InvalidBitWidth { requested: u32, capacity: u32 },
    /// Field has no getter.
    #[error("field `{0}` does not have a getter")]
    MissingCapability(String),
    /// Getter produced no value.
    #[error("field `{0}` is null")]
    NullValue(String),
    /// Getter produced a value whose type differs from the field's tag.
    #[error("field `{field}`: expected {expected:?} value")]
    TypeMismatch { field: String, expected: TypeTag },
    /// Character cannot be represented by the configured text encoding.
    #[error("{0:?} cannot be encoded")]
    Unencodable(char),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Errors produced while unpacking values from a [crate::bit_reader::BitReader].
#[derive(Debug, Error)]
pub enum ReadError {
    /// Bit count is larger than the target value or buffer.
    #[error("cannot read {requested} bits into a {capacity}-bit value")]
    InvalidBitWidth { requested: u32, capacity: u32 },
    /// A strict read hit the end of the source.
    #[error("stream ended with {available} of {requested} bits available")]
    TruncatedStream { requested: u32, available: u32 },
    /// Field has no setter.
    #[error("field `{0}` does not have a setter")]
    MissingCapability(String),
    /// Decoded value is not valid for the field (e.g. unknown enum discriminant).
    #[error("{0}")]
    InvalidValue(String),
    /// Decoded bytes are not valid for the configured text encoding.
    #[error("invalid {0:?} text")]
    InvalidText(crate::text::TextEncoding),
    #[error(transparent)]
    Io(#[from] io::Error),
}
