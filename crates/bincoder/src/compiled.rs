use std::io::{Read, Write};

use crate::{
    bit_reader::BitReader,
    bit_writer::BitWriter,
    bits::sign_extend,
    errors::{CompileError, ReadError, WriteError},
    field::{Field, Getter, Setter},
    value::{TypeTag, Value},
};

/// A validated [Field] with its bit width resolved.
pub struct CompiledField<R> {
    pub name: String,
    pub order: i32,
    pub tag: TypeTag,
    /// Bits this field takes in the stream.
    pub width: u32,
    pub sign_extend: bool,
    getter: Option<Getter<R>>,
    setter: Option<Setter<R>>,
}

impl<R> TryFrom<Field<R>> for CompiledField<R> {
    type Error = CompileError;

    fn try_from(value: Field<R>) -> Result<Self, Self::Error> {
        let tag = value
            .declared_tag()
            .ok_or_else(|| CompileError::UntypedField(value.name.clone()))?;

        let accessor_tags = [
            value.getter.as_ref().and_then(|(tag, _)| *tag),
            value.setter.as_ref().and_then(|(tag, _)| *tag),
        ];
        for found in accessor_tags.into_iter().flatten() {
            if found != tag {
                return Err(CompileError::TypeMismatch {
                    field: value.name,
                    expected: tag,
                    found,
                });
            }
        }

        if let TypeTag::Enum(underlying) = tag {
            if !underlying.is_integer() {
                return Err(CompileError::UnsupportedType {
                    field: value.name,
                    tag,
                });
            }
        }

        let width = match (tag.natural_bits(), value.bits) {
            (None, 0) => return Err(CompileError::MissingBitWidth(value.name)),
            (None, bits) => bits,
            (Some(natural), 0) => natural,
            (Some(natural), bits) if bits > natural => {
                return Err(CompileError::InvalidBitWidth {
                    field: value.name,
                    bits,
                    max: natural,
                });
            }
            (Some(_), bits) => bits,
        };

        if value.sign_extend && !tag.storage().is_integer() {
            return Err(CompileError::InvalidSignExtension(value.name));
        }

        Ok(CompiledField {
            name: value.name,
            order: value.order,
            tag,
            width,
            sign_extend: value.sign_extend,
            getter: value.getter.map(|(_, get)| get),
            setter: value.setter.map(|(_, set)| set),
        })
    }
}

impl<R> CompiledField<R> {
    /// Reads the field out of `record` and packs it into `writer`.
    pub fn encode<W: Write>(&self, record: &R, writer: &mut BitWriter<W>) -> Result<(), WriteError> {
        let get = self
            .getter
            .as_ref()
            .ok_or_else(|| WriteError::MissingCapability(self.name.clone()))?;

        let value = get(record).ok_or_else(|| WriteError::NullValue(self.name.clone()))?;

        let storage = self.tag.storage();
        if value.tag() != storage {
            return Err(WriteError::TypeMismatch {
                field: self.name.clone(),
                expected: storage,
            });
        }

        log::trace!("encode `{}`: {:?} in {} bits", self.name, value, self.width);

        let bits = self.width;
        match value {
            Value::Byte(v) => writer.write_byte(v, bits),
            Value::Int16(v) => writer.write_i16(v, bits),
            Value::Int32(v) => writer.write_i32(v, bits),
            Value::Int64(v) => writer.write_i64(v, bits),
            Value::Float32(v) => writer.write_f32(v, bits),
            Value::Float64(v) => writer.write_f64(v, bits),
            Value::Bool(v) => writer.write_bool(v, bits),
            Value::Str(v) => writer.write_str(&v, bits),
        }
    }

    /// Unpacks the field from `reader` and stores it into `record`.
    pub fn decode<S: Read>(&self, reader: &mut BitReader<S>, record: &mut R) -> Result<(), ReadError> {
        let set = self
            .setter
            .as_ref()
            .ok_or_else(|| ReadError::MissingCapability(self.name.clone()))?;

        let value = self.read_value(reader)?;

        log::trace!("decode `{}`: {:?} from {} bits", self.name, value, self.width);

        set(record, value)
    }

    fn read_value<S: Read>(&self, reader: &mut BitReader<S>) -> Result<Value, ReadError> {
        let bits = self.width;
        let storage = self.tag.storage();

        let value = match storage {
            TypeTag::Byte => Value::Byte(reader.read_byte(bits, true)?),
            TypeTag::Int16 => Value::Int16(reader.read_i16(bits, true)?),
            TypeTag::Int32 => Value::Int32(reader.read_i32(bits, true)?),
            TypeTag::Int64 => Value::Int64(reader.read_i64(bits, true)?),
            TypeTag::Float32 => Value::Float32(reader.read_f32(bits, true)?),
            TypeTag::Float64 => Value::Float64(reader.read_f64(bits, true)?),
            TypeTag::Bool => Value::Bool(reader.read_bool(bits, true)?),
            TypeTag::String => Value::Str(reader.read_string(bits, true)?),
            // Enums never nest; compile rejects a non-integer underlying tag.
            TypeTag::Enum(_) => {
                return Err(ReadError::InvalidValue(format!(
                    "field `{}` has nested enum type",
                    self.name
                )));
            }
        };

        if !self.sign_extend {
            return Ok(value);
        }

        // The reader zero-fills above the stored width; replicate the sign bit instead.
        let Some(raw) = value.as_i64() else {
            return Ok(value);
        };
        let extended = sign_extend(raw as u64, bits);
        Ok(Value::from_i64(storage, extended).unwrap_or(value))
    }
}

impl<R> std::fmt::Debug for CompiledField<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledField")
            .field("name", &self.name)
            .field("order", &self.order)
            .field("tag", &self.tag)
            .field("width", &self.width)
            .field("sign_extend", &self.sign_extend)
            .finish()
    }
}
