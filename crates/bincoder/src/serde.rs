//! JSON‑deserializable record layout.
//!
//! Accessors live in code, but the layout of a record (field order and bit
//! widths) and the codec configuration can ship as data, for example a layout
//! file next to your application. A [`SchemaDef`] is applied on top of the
//! [`Field`]s given to [`Bincoder::compile_with_def`].

use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    errors::CompileError,
    field::Field,
    schema::Bincoder,
    text::TextEncoding,
};

/// Text encoding for string fields.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum EncodingDef {
    Utf8,
    Ascii,
    Latin1,
}

impl From<EncodingDef> for TextEncoding {
    fn from(value: EncodingDef) -> Self {
        match value {
            EncodingDef::Utf8 => TextEncoding::Utf8,
            EncodingDef::Ascii => TextEncoding::Ascii,
            EncodingDef::Latin1 => TextEncoding::Latin1,
        }
    }
}

/// Top‑level layout: optional configuration plus per-field overrides.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SchemaDef {
    /// Encoding for string fields; UTF‑8 when absent.
    #[serde(default)]
    pub encoding: Option<EncodingDef>,
    /// Overrides, matched to fields by name. Fields not listed keep their declaration.
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

/// Layout override for a single field.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FieldDef {
    /// Name of the [`Field`] to override.
    pub name: String,
    /// New processing order.
    #[serde(default)]
    pub order: Option<i32>,
    /// New bit width; 0 selects the natural width.
    #[serde(default)]
    pub bits: Option<u32>,
}

impl SchemaDef {
    /// Applies the overrides to `fields`. Fails on a name that matches no field.
    pub fn apply<R>(&self, fields: &mut [Field<R>]) -> Result<(), CompileError> {
        for def in &self.fields {
            let field = fields
                .iter_mut()
                .find(|field| field.name == def.name)
                .ok_or_else(|| CompileError::UnknownField(def.name.clone()))?;

            if let Some(order) = def.order {
                field.order = order;
            }
            if let Some(bits) = def.bits {
                field.bits = bits;
            }
        }

        Ok(())
    }
}

impl<R> Bincoder<R> {
    /// Like [`Bincoder::compile`], with order, widths and encoding taken from `def`.
    pub fn compile_with_def<F>(
        mut fields: Vec<Field<R>>,
        def: &SchemaDef,
        factory: F,
    ) -> Result<Self, CompileError>
    where
        F: Fn() -> R + Send + Sync + 'static,
    {
        def.apply(&mut fields)?;
        Ok(Bincoder::compile(fields, factory)?.with_config(Config::from(def)))
    }
}
