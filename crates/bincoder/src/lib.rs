//! # bincoder
//!
//! Packs records into dense bitstreams where every field takes an arbitrary
//! number of bits, and unpacks them again.
//!
//! Declare each field of a record as a [`Field`] with its processing order,
//! bit width and accessors, compile them into a [`Bincoder`], then encode and
//! decode. Fields are packed in ascending order, least-significant bit first,
//! with the last byte zero padded.
//!
//! ## Example
//!
//! ```
//! use bincoder::{Bincoder, Field};
//!
//! bincoder::bit_enum! {
//!     pub enum Greeting: u8 {
//!         Hello = 0,
//!         World = 1,
//!     }
//! }
//!
//! #[derive(Debug, PartialEq)]
//! struct Test {
//!     a: u8,
//!     b: Greeting,
//!     c: i32,
//! }
//!
//! let fields = vec![
//!     Field::new("b", 0).bits(1).accessors(|t: &Test| t.b, |t: &mut Test, v| t.b = v),
//!     Field::new("a", 1).bits(3).accessors(|t: &Test| t.a, |t: &mut Test, v| t.a = v),
//!     Field::new("c", 2).accessors(|t: &Test| t.c, |t: &mut Test, v| t.c = v),
//! ];
//! let bincoder = Bincoder::compile(fields, || Test { a: 0, b: Greeting::Hello, c: 0 }).unwrap();
//!
//! let record = Test { a: 7, b: Greeting::World, c: 7 };
//! let bytes = bincoder.encode(&record).unwrap();
//! assert_eq!(bytes, vec![127, 0, 0, 0, 0]);
//! assert_eq!(bincoder.decode(&bytes).unwrap(), record);
//! ```

pub mod bit_reader;
pub mod bit_writer;
pub mod bits;
pub mod compiled;
pub mod config;
pub mod errors;
pub mod field;
mod macros;
pub mod schema;
#[cfg(feature = "serde")]
pub mod serde;
pub mod text;
pub mod value;

pub use bit_reader::BitReader;
pub use bit_writer::BitWriter;
pub use config::Config;
pub use errors::{CompileError, ReadError, WriteError};
pub use field::Field;
pub use schema::Bincoder;
pub use text::TextEncoding;
pub use value::{FieldValue, TypeTag, Value};
