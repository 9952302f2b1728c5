//! Type tags and the dynamically typed [`Value`] that flows between field
//! accessors and the bit reader/writer.

use crate::errors::ReadError;

/// Declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    Byte,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    /// Stored as one byte holding 0 or 1.
    Bool,
    /// Text in the codec's [crate::text::TextEncoding]. Has no natural width.
    String,
    /// Fieldless enum carried as its underlying integer.
    Enum(&'static TypeTag),
}

impl TypeTag {
    /// Bits implied by the storage size of the type, `None` for strings.
    pub fn natural_bits(self) -> Option<u32> {
        match self {
            TypeTag::Byte | TypeTag::Bool => Some(8),
            TypeTag::Int16 => Some(16),
            TypeTag::Int32 | TypeTag::Float32 => Some(32),
            TypeTag::Int64 | TypeTag::Float64 => Some(64),
            TypeTag::String => None,
            TypeTag::Enum(underlying) => underlying.natural_bits(),
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            TypeTag::Byte | TypeTag::Int16 | TypeTag::Int32 | TypeTag::Int64
        )
    }

    /// Tag the bit reader/writer actually handles: enums resolve to their integer.
    pub fn storage(self) -> TypeTag {
        match self {
            TypeTag::Enum(underlying) => *underlying,
            tag => tag,
        }
    }
}

/// A field value on its way into or out of the bitstream.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Byte(u8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Bool(bool),
    Str(String),
}

impl Value {
    /// Storage tag of this value.
    pub fn tag(&self) -> TypeTag {
        match self {
            Value::Byte(_) => TypeTag::Byte,
            Value::Int16(_) => TypeTag::Int16,
            Value::Int32(_) => TypeTag::Int32,
            Value::Int64(_) => TypeTag::Int64,
            Value::Float32(_) => TypeTag::Float32,
            Value::Float64(_) => TypeTag::Float64,
            Value::Bool(_) => TypeTag::Bool,
            Value::Str(_) => TypeTag::String,
        }
    }

    /// Integer payload widened to `i64`, `None` for non-integers.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Byte(v) => Some(v as i64),
            Value::Int16(v) => Some(v as i64),
            Value::Int32(v) => Some(v as i64),
            Value::Int64(v) => Some(v),
            _ => None,
        }
    }

    /// Builds an integer value of tag `tag` from the low bits of `raw`.
    pub(crate) fn from_i64(tag: TypeTag, raw: i64) -> Option<Value> {
        match tag {
            TypeTag::Byte => Some(Value::Byte(raw as u8)),
            TypeTag::Int16 => Some(Value::Int16(raw as i16)),
            TypeTag::Int32 => Some(Value::Int32(raw as i32)),
            TypeTag::Int64 => Some(Value::Int64(raw)),
            _ => None,
        }
    }
}

/// Rust types that can back a field.
///
/// Implemented for `u8`, `i16`, `i32`, `i64`, `f32`, `f64`, `bool`, `String`,
/// `Option<T>` (where `None` is a null value) and, through [crate::bit_enum!],
/// for fieldless enums.
pub trait FieldValue: Sized {
    const TAG: TypeTag;

    /// `None` when the value is absent.
    fn into_value(self) -> Option<Value>;

    fn from_value(value: Value) -> Result<Self, ReadError>;
}

fn mismatch(expected: TypeTag, value: &Value) -> ReadError {
    ReadError::InvalidValue(format!("expected {:?}, got {:?}", expected, value))
}

macro_rules! impl_field_value {
    ($ty:ty, $tag:ident, $variant:ident) => {
        impl FieldValue for $ty {
            const TAG: TypeTag = TypeTag::$tag;

            fn into_value(self) -> Option<Value> {
                Some(Value::$variant(self))
            }

            fn from_value(value: Value) -> Result<Self, ReadError> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(mismatch(Self::TAG, &other)),
                }
            }
        }
    };
}

impl_field_value!(u8, Byte, Byte);
impl_field_value!(i16, Int16, Int16);
impl_field_value!(i32, Int32, Int32);
impl_field_value!(i64, Int64, Int64);
impl_field_value!(f32, Float32, Float32);
impl_field_value!(f64, Float64, Float64);
impl_field_value!(bool, Bool, Bool);
impl_field_value!(String, String, Str);

impl<T: FieldValue> FieldValue for Option<T> {
    const TAG: TypeTag = T::TAG;

    fn into_value(self) -> Option<Value> {
        self.and_then(FieldValue::into_value)
    }

    fn from_value(value: Value) -> Result<Self, ReadError> {
        T::from_value(value).map(Some)
    }
}
