//! # multiform
//!
//! A pluggable serialization framework built around an explicit
//! encode/decode contract instead of reflection or derive macros.
//!
//! ## How it works
//!
//! Every serializable type is described by a static [`Descriptor`] (a
//! [`Kind`] plus ordered element names) and driven by a hand-written
//! [`ValueSerializer`] that walks the value through the [`Encoder`] and
//! [`Decoder`] traits. Output formats implement those traits once and
//! gain support for every described type; types write one serializer and
//! gain support for every format.
//!
//! Four backends ship with the crate:
//!
//! - [`json`] — the primary text backend, with a tokenizer, a mode
//!   machine for nested structure, and forced-string rendering of map
//!   keys
//! - [`binary`] — fixed-width big-endian wire format, fully positional
//! - [`keyvalue`] — a simple `{name:value, …}` text rendering
//! - [`mapping`] — flattens values into an in-memory map from dotted
//!   paths to scalars
//!
//! ## Key Features
//!
//! - **Explicit contract**: no derive macros, no runtime reflection;
//!   serializers are ordinary values you compose
//! - **Format plurality**: one serializer drives text, binary, and
//!   in-memory backends unchanged
//! - **Structural hooks with defaults**: backends override only what
//!   their format needs; a positional backend like [`binary`] implements
//!   nothing but the value reads and writes
//! - **Comprehensive error reporting**: every failure is a typed
//!   [`Error`] naming what was expected and what was found
//!
//! ## Quick Start
//!
//! ```rust
//! use multiform::{
//!     json, Decoder, Descriptor, Encoder, Error, Kind, NextElement, Result, ValueSerializer,
//! };
//!
//! #[derive(Debug, PartialEq)]
//! struct City {
//!     id: i32,
//!     name: String,
//! }
//!
//! static CITY: Descriptor = Descriptor::new("City", Kind::Object, &["id", "name"]);
//!
//! struct CitySerializer;
//!
//! impl ValueSerializer for CitySerializer {
//!     type Value = City;
//!
//!     fn descriptor(&self) -> &'static Descriptor {
//!         &CITY
//!     }
//!
//!     fn encode<E: Encoder>(&self, encoder: &mut E, value: &City) -> Result<()> {
//!         encoder.begin_composite(&CITY, &[])?;
//!         if encoder.begin_element(&CITY, 0)? {
//!             encoder.encode_i32(value.id)?;
//!         }
//!         if encoder.begin_element(&CITY, 1)? {
//!             encoder.encode_str(&value.name)?;
//!         }
//!         encoder.end_composite(&CITY)
//!     }
//!
//!     fn decode<D: Decoder>(&self, decoder: &mut D) -> Result<City> {
//!         decoder.begin_composite(&CITY, &[])?;
//!         let (mut id, mut name) = (None, None);
//!         loop {
//!             match decoder.next_element(&CITY)? {
//!                 NextElement::All => {
//!                     id = Some(decoder.decode_i32()?);
//!                     name = Some(decoder.decode_str()?);
//!                     break;
//!                 }
//!                 NextElement::Index(0) => id = Some(decoder.decode_i32()?),
//!                 NextElement::Index(1) => name = Some(decoder.decode_str()?),
//!                 NextElement::Index(_) | NextElement::Done => break,
//!             }
//!         }
//!         decoder.end_composite(&CITY)?;
//!         Ok(City {
//!             id: id.ok_or_else(|| Error::custom("missing field `id`"))?,
//!             name: name.ok_or_else(|| Error::custom("missing field `name`"))?,
//!         })
//!     }
//! }
//!
//! let city = City { id: 1, name: "New York".to_string() };
//! let text = json::to_string(&CitySerializer, &city).unwrap();
//! assert_eq!(text, r#"{"id":1,"name":"New York"}"#);
//! assert_eq!(json::from_str(&CitySerializer, &text).unwrap(), city);
//! ```
//!
//! ## Composing serializers
//!
//! Primitive serializers and the [`serializers::OptionSerializer`],
//! [`serializers::ListSerializer`], [`serializers::SetSerializer`], and
//! [`serializers::MapSerializer`] combinators cover the common shapes:
//!
//! ```rust
//! use multiform::json;
//! use multiform::serializers::{I32Serializer, ListSerializer, OptionSerializer};
//!
//! let serializer = ListSerializer(OptionSerializer(I32Serializer));
//! let text = json::to_string(&serializer, &vec![Some(1), None, Some(3)]).unwrap();
//! assert_eq!(text, "[1,null,3]");
//! ```
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Proper error propagation with `Result` types throughout
//! - No panics in the public API

pub mod binary;
pub mod de;
pub mod error;
pub mod json;
pub mod keyvalue;
pub mod mapping;
pub mod schema;
pub mod ser;
pub mod serializers;
pub mod value;

pub use de::{Decoder, NextElement};
pub use error::{Error, Result};
pub use schema::{Descriptor, Kind};
pub use ser::Encoder;
pub use serializers::ValueSerializer;
pub use value::Value;
