//! The structured decode contract.
//!
//! Decode is the structural mirror of encode: the value serializer opens a
//! composite, then loops on [`Decoder::next_element`] until the backend
//! answers [`NextElement::Done`], reading one value per announced index.
//!
//! Self-describing formats (JSON, key-value text) drive the loop from
//! their delimiters and keys. Formats with no structure of their own
//! answer [`NextElement::All`] — the default — which tells the serializer
//! that elements arrive in declared order with nothing to dispatch on: it
//! reads the collection size element and then exactly that many items.

use crate::error::{Error, Result};
use crate::schema::Descriptor;

/// Answer of [`Decoder::next_element`], directing the decode loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextElement {
    /// All elements follow in declared order; there will be no further
    /// per-element dispatch for this composite.
    All,
    /// The element at this index is next.
    Index(usize),
    /// The composite has no more elements.
    Done,
}

/// A format backend's read surface.
pub trait Decoder {
    /// Opens a composite scope, consuming the opening delimiter if the
    /// backend's mode for this descriptor has one.
    fn begin_composite(&mut self, _desc: &Descriptor, _type_args: &[&Descriptor]) -> Result<()> {
        Ok(())
    }

    /// Closes the innermost composite scope, consuming the closing
    /// delimiter if there is one.
    fn end_composite(&mut self, _desc: &Descriptor) -> Result<()> {
        Ok(())
    }

    /// Reports which element comes next, consuming any separator and key
    /// in front of it.
    fn next_element(&mut self, _desc: &Descriptor) -> Result<NextElement> {
        Ok(NextElement::All)
    }

    /// Whether the not-yet-consumed value at the current position is
    /// null. Must not consume a token in lookahead-based backends; the
    /// binary backend consumes its presence mark byte here instead.
    fn peek_is_null(&mut self) -> Result<bool> {
        Ok(false)
    }

    /// Consumes the null value announced by [`Decoder::peek_is_null`].
    fn decode_null(&mut self) -> Result<()> {
        Ok(())
    }

    fn decode_bool(&mut self) -> Result<bool>;
    fn decode_i8(&mut self) -> Result<i8>;
    fn decode_i16(&mut self) -> Result<i16>;
    fn decode_i32(&mut self) -> Result<i32>;
    fn decode_i64(&mut self) -> Result<i64>;
    fn decode_f32(&mut self) -> Result<f32>;
    fn decode_f64(&mut self) -> Result<f64>;
    fn decode_char(&mut self) -> Result<char>;
    fn decode_str(&mut self) -> Result<String>;

    /// Reads an enumerated value and resolves it to its variant index.
    /// The default reads the variant name as a string, mirroring
    /// [`crate::ser::Encoder::encode_enum`].
    fn decode_enum(&mut self, desc: &Descriptor) -> Result<usize> {
        let name = self.decode_str()?;
        desc.element_index(&name)
            .ok_or_else(|| Error::malformed(desc.name(), name))
    }
}
