//! The structured encode contract.
//!
//! A value serializer drives an [`Encoder`] in strict depth-first order:
//! `begin_composite`, then per element `begin_element` followed by exactly
//! one value write (or a nested composite), then `end_composite`. Format
//! backends implement this trait; value serializers call it. Dispatch is
//! static, chosen at the call site.
//!
//! The structural hooks have defaults that suit backends without
//! delimiters: the binary backend, for example, implements only the
//! primitive writes and inherits "write every element, no separators".
//!
//! ## Element suppression
//!
//! [`Encoder::begin_element`] returns whether the element's value should
//! actually be written. Collection serializers announce their size as
//! element 0; a self-describing text format answers `false` there because
//! its delimiters already carry that information, while the binary backend
//! answers `true` and uses the size during decode.

use crate::error::Result;
use crate::schema::Descriptor;

/// A format backend's write surface.
pub trait Encoder {
    /// Opens a composite scope. `type_args` carries the descriptors of
    /// generic type arguments (item type for lists, key then value type
    /// for maps) so the backend can pick its delimiter policy.
    fn begin_composite(&mut self, _desc: &Descriptor, _type_args: &[&Descriptor]) -> Result<()> {
        Ok(())
    }

    /// Closes the innermost composite scope.
    fn end_composite(&mut self, _desc: &Descriptor) -> Result<()> {
        Ok(())
    }

    /// Announces the element at `index` and returns whether its value
    /// should be written. Backends emit separators and keys here.
    fn begin_element(&mut self, _desc: &Descriptor, _index: usize) -> Result<bool> {
        Ok(true)
    }

    /// Marks a nullable slot as holding a present value. Only backends
    /// whose representation cannot distinguish presence structurally (the
    /// binary backend) emit anything here.
    fn encode_not_null_mark(&mut self) -> Result<()> {
        Ok(())
    }

    /// Writes the null value for a nullable slot holding nothing.
    fn encode_null(&mut self) -> Result<()>;

    fn encode_bool(&mut self, v: bool) -> Result<()>;
    fn encode_i8(&mut self, v: i8) -> Result<()>;
    fn encode_i16(&mut self, v: i16) -> Result<()>;
    fn encode_i32(&mut self, v: i32) -> Result<()>;
    fn encode_i64(&mut self, v: i64) -> Result<()>;
    fn encode_f32(&mut self, v: f32) -> Result<()>;
    fn encode_f64(&mut self, v: f64) -> Result<()>;
    fn encode_char(&mut self, v: char) -> Result<()>;
    fn encode_str(&mut self, v: &str) -> Result<()>;

    /// Writes an enumerated value. The default renders the variant's
    /// declared name as a string, which every backend round-trips.
    fn encode_enum(&mut self, desc: &Descriptor, variant: usize) -> Result<()> {
        match desc.element_name(variant) {
            Some(name) => self.encode_str(&name),
            None => Err(crate::error::Error::custom(format!(
                "variant index {variant} out of range for {}",
                desc.name()
            ))),
        }
    }
}
