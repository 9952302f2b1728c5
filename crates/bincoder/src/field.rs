//! Declaration of record fields used to build a [crate::Bincoder].

use crate::{
    errors::ReadError,
    value::{FieldValue, TypeTag, Value},
};

/// Reads a field's current value out of a record. `None` is a null value.
pub type Getter<R> = Box<dyn Fn(&R) -> Option<Value> + Send + Sync>;

/// Stores a decoded value into a record.
pub type Setter<R> = Box<dyn Fn(&mut R, Value) -> Result<(), ReadError> + Send + Sync>;

/// A single field of record type `R`: where it goes in the stream, how many
/// bits it takes and how to get and set it.
///
/// ```
/// use bincoder::field::Field;
///
/// #[derive(Default)]
/// struct Player {
///     level: u8,
/// }
///
/// let level = Field::new("level", 0)
///     .bits(6)
///     .accessors(|p: &Player| p.level, |p: &mut Player, v| p.level = v);
/// assert_eq!(level.declared_bits(), 6);
/// ```
pub struct Field<R> {
    /// Name used in diagnostics.
    pub name: String,
    /// Fields are packed in ascending order. Must be unique per record type.
    pub order: i32,
    pub(crate) bits: u32,
    pub(crate) sign_extend: bool,
    pub(crate) tag: Option<TypeTag>,
    // Typed accessors carry the tag of their Rust type, raw ones carry none.
    pub(crate) getter: Option<(Option<TypeTag>, Getter<R>)>,
    pub(crate) setter: Option<(Option<TypeTag>, Setter<R>)>,
}

impl<R> Field<R> {
    pub fn new(name: impl Into<String>, order: i32) -> Self {
        Field {
            name: name.into(),
            order,
            bits: 0,
            sign_extend: false,
            tag: None,
            getter: None,
            setter: None,
        }
    }

    /// Number of bits the field takes. 0 (the default) uses the natural width of its type.
    pub fn bits(mut self, bits: u32) -> Self {
        self.bits = bits;
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Treat the top stored bit of an integer field narrower than its type as a sign bit.
    pub fn sign_extend(mut self) -> Self {
        self.sign_extend = true;
        self
    }

    /// Declares the field type explicitly. Needed only with raw accessors.
    pub fn tag(mut self, tag: TypeTag) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn declared_bits(&self) -> u32 {
        self.bits
    }

    /// Type declared by the tag or, failing that, by the accessors.
    pub fn declared_tag(&self) -> Option<TypeTag> {
        self.tag
            .or(self.getter.as_ref().and_then(|(tag, _)| *tag))
            .or(self.setter.as_ref().and_then(|(tag, _)| *tag))
    }

    pub fn getter<T, F>(mut self, get: F) -> Self
    where
        T: FieldValue,
        F: Fn(&R) -> T + Send + Sync + 'static,
    {
        let get: Getter<R> = Box::new(move |record: &R| get(record).into_value());
        self.getter = Some((Some(T::TAG), get));
        self
    }

    pub fn setter<T, F>(mut self, set: F) -> Self
    where
        T: FieldValue,
        F: Fn(&mut R, T) + Send + Sync + 'static,
    {
        let set: Setter<R> = Box::new(move |record: &mut R, value: Value| {
            set(record, T::from_value(value)?);
            Ok(())
        });
        self.setter = Some((Some(T::TAG), set));
        self
    }

    pub fn accessors<T, G, S>(self, get: G, set: S) -> Self
    where
        T: FieldValue,
        G: Fn(&R) -> T + Send + Sync + 'static,
        S: Fn(&mut R, T) + Send + Sync + 'static,
    {
        self.getter(get).setter(set)
    }

    /// Untyped getter. The field type comes from [`Field::tag`].
    pub fn raw_getter<F>(mut self, get: F) -> Self
    where
        F: Fn(&R) -> Option<Value> + Send + Sync + 'static,
    {
        let get: Getter<R> = Box::new(get);
        self.getter = Some((None, get));
        self
    }

    /// Untyped setter. The field type comes from [`Field::tag`].
    pub fn raw_setter<F>(mut self, set: F) -> Self
    where
        F: Fn(&mut R, Value) -> Result<(), ReadError> + Send + Sync + 'static,
    {
        let set: Setter<R> = Box::new(set);
        self.setter = Some((None, set));
        self
    }
}

impl<R> std::fmt::Debug for Field<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("order", &self.order)
            .field("bits", &self.bits)
            .field("tag", &self.declared_tag())
            .field("getter", &self.getter.is_some())
            .field("setter", &self.setter.is_some())
            .finish()
    }
}
