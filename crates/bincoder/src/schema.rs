//! Bincoder: compiled, ordered set of fields used to pack records into bytes and back.

use std::io::{Read, Write};

use crate::{
    bit_reader::BitReader,
    bit_writer::BitWriter,
    bits::bytes_for_bits,
    compiled::CompiledField,
    config::Config,
    errors::{CompileError, ReadError, WriteError},
    field::Field,
};

/// Codec for records of type `R`. Use [Bincoder::compile] to build it from
/// [Field]s, then [Bincoder::encode] and [Bincoder::decode].
///
/// A `Bincoder` never changes after compilation; every call opens its own bit
/// reader or writer, so one instance can serve many threads at once.
pub struct Bincoder<R> {
    /// Compiled fields in ascending order.
    fields: Vec<CompiledField<R>>,
    factory: Box<dyn Fn() -> R + Send + Sync>,
    config: Config,
    record_bits: u64,
}

impl<R> Bincoder<R> {
    /// Compiles `fields` into a codec. `factory` produces the empty record each
    /// decode fills in. Fails if any field is invalid or two fields share an order.
    pub fn compile<F>(fields: Vec<Field<R>>, factory: F) -> Result<Self, CompileError>
    where
        F: Fn() -> R + Send + Sync + 'static,
    {
        let mut compiled_fields: Vec<CompiledField<R>> = Vec::with_capacity(fields.len());

        for field in fields {
            compiled_fields.push(field.try_into()?);
        }

        compiled_fields.sort_by_key(|field| field.order);

        if let Some(pair) = compiled_fields
            .windows(2)
            .find(|pair| pair[0].order == pair[1].order)
        {
            return Err(CompileError::DuplicateOrder {
                order: pair[0].order,
                first: pair[0].name.clone(),
                second: pair[1].name.clone(),
            });
        }

        let record_bits: u64 = compiled_fields
            .iter()
            .map(|field| field.width as u64)
            .sum();

        log::debug!(
            "compiled {} fields into a {}-bit record",
            compiled_fields.len(),
            record_bits
        );

        Ok(Bincoder {
            fields: compiled_fields,
            factory: Box::new(factory),
            config: Config::default(),
            record_bits,
        })
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Compiled fields in encoding order.
    pub fn fields(&self) -> impl Iterator<Item = &CompiledField<R>> {
        self.fields.iter()
    }

    /// Total packed width of one record.
    pub fn record_bits(&self) -> u64 {
        self.record_bits
    }

    /// Encoded size of one record in bytes.
    pub fn record_len(&self) -> usize {
        bytes_for_bits(self.record_bits)
    }

    pub fn encode(&self, record: &R) -> Result<Vec<u8>, WriteError> {
        let mut out = Vec::with_capacity(self.record_len());
        self.encode_to(record, &mut out)?;
        Ok(out)
    }

    /// Encodes `record` into `sink`. Pass `&mut sink` to keep using it afterwards.
    pub fn encode_to<W: Write>(&self, record: &R, sink: W) -> Result<(), WriteError> {
        let mut writer = BitWriter::with_encoding(sink, self.config.encoding);

        for field in &self.fields {
            field.encode(record, &mut writer)?;
        }

        writer.flush()
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<R, ReadError> {
        self.decode_from(bytes)
    }

    /// Decodes one record from `source`. Pass `&mut source` to keep reading from it afterwards.
    pub fn decode_from<S: Read>(&self, source: S) -> Result<R, ReadError> {
        let mut reader = BitReader::with_encoding(source, self.config.encoding);
        let mut record = (self.factory)();

        for field in &self.fields {
            field.decode(&mut reader, &mut record)?;
        }

        Ok(record)
    }
}

impl<R> std::fmt::Debug for Bincoder<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bincoder")
            .field("fields", &self.fields)
            .field("config", &self.config)
            .field("record_bits", &self.record_bits)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{ReadError, TypeTag, text::TextEncoding};

    use super::*;

    crate::bit_enum! {
        enum Greeting: u8 {
            Hello = 0,
            World = 1,
        }
    }

    #[derive(Debug, PartialEq)]
    struct Test {
        a: u8,
        b: Greeting,
        c: i32,
    }

    fn test_fields() -> Vec<Field<Test>> {
        vec![
            Field::new("a", 1)
                .bits(3)
                .accessors(|t: &Test| t.a, |t: &mut Test, v| t.a = v),
            Field::new("b", 0)
                .bits(1)
                .accessors(|t: &Test| t.b, |t: &mut Test, v| t.b = v),
            Field::new("c", 2).accessors(|t: &Test| t.c, |t: &mut Test, v| t.c = v),
        ]
    }

    fn empty_test() -> Test {
        Test {
            a: 0,
            b: Greeting::Hello,
            c: 0,
        }
    }

    #[test]
    fn test_encode() {
        let bincoder = Bincoder::compile(test_fields(), empty_test).unwrap();
        let bytes = bincoder
            .encode(&Test {
                a: 7,
                b: Greeting::World,
                c: 7,
            })
            .unwrap();
        assert_eq!(bytes, vec![127, 0, 0, 0, 0]);
    }

    #[test]
    fn test_decode() {
        let bincoder = Bincoder::compile(test_fields(), empty_test).unwrap();
        let decoded = bincoder.decode(&[127, 0, 0, 0, 0]).unwrap();
        assert_eq!(
            decoded,
            Test {
                a: 7,
                b: Greeting::World,
                c: 7
            }
        );
    }

    #[test]
    fn test_fields_are_sorted() {
        let bincoder = Bincoder::compile(test_fields(), empty_test).unwrap();
        let names: Vec<&str> = bincoder.fields().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(bincoder.record_bits(), 36);
        assert_eq!(bincoder.record_len(), 5);
    }

    #[test]
    fn test_enum_tag() {
        let bincoder = Bincoder::compile(test_fields(), empty_test).unwrap();
        let b = bincoder.fields().next().unwrap();
        assert_eq!(b.tag, TypeTag::Enum(&TypeTag::Byte));
        assert_eq!(b.width, 1);
    }

    #[test]
    fn test_duplicate_order() {
        let mut fields = test_fields();
        fields.push(Field::new("d", 1).getter(|t: &Test| t.a));
        assert_eq!(
            Bincoder::compile(fields, empty_test).unwrap_err(),
            CompileError::DuplicateOrder {
                order: 1,
                first: "a".to_string(),
                second: "d".to_string()
            }
        );
    }

    #[test]
    fn test_empty_schema() {
        let bincoder = Bincoder::<Test>::compile(vec![], empty_test).unwrap();
        assert_eq!(bincoder.encode(&empty_test()).unwrap(), Vec::<u8>::new());
        assert_eq!(bincoder.decode(&[]).unwrap(), empty_test());
    }

    #[test]
    fn test_decode_truncated() {
        let bincoder = Bincoder::compile(test_fields(), empty_test).unwrap();
        assert!(matches!(
            bincoder.decode(&[127, 0, 0]),
            Err(ReadError::TruncatedStream { .. })
        ));
    }

    #[test]
    fn test_decode_unknown_discriminant() {
        let fields = vec![
            Field::new("b", 0)
                .bits(2)
                .accessors(|t: &Test| t.b, |t: &mut Test, v| t.b = v),
        ];
        let bincoder = Bincoder::compile(fields, empty_test).unwrap();
        assert!(matches!(
            bincoder.decode(&[0b10]),
            Err(ReadError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_decode_keeps_trailing_bytes_in_source() {
        let bincoder = Bincoder::compile(test_fields(), empty_test).unwrap();
        let data = [127u8, 0, 0, 0, 0, 42];
        let mut source = &data[..];

        bincoder.decode_from(&mut source).unwrap();
        assert_eq!(source, &[42]);
    }

    #[test]
    fn test_with_config() {
        let bincoder = Bincoder::compile(test_fields(), empty_test)
            .unwrap()
            .with_config(Config::new(TextEncoding::Latin1));
        assert_eq!(bincoder.config().encoding, TextEncoding::Latin1);
    }
}
