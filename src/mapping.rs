//! The in-memory mapping backend.
//!
//! Flattens a value tree into an insertion-ordered map from dotted
//! element paths to scalar [`Value`]s, and reconstructs a value from such
//! a map. A street with a nested city becomes
//!
//! ```text
//! "id"        => Int(2)
//! "name"      => Str("Broadway")
//! "city.id"   => Int(1)
//! "city.name" => Str("New York")
//! ```
//!
//! Collections contribute their size element (`"cities.size"`) and
//! positional segments (`"cities.0.name"`), following
//! [`Descriptor::element_name`](crate::schema::Descriptor::element_name).
//!
//! A null slot is represented by the **absence** of its path: encode
//! inserts nothing, and `peek_is_null` probes whether any key lives at or
//! under the slot's path. That makes a nullable field holding nothing
//! distinguishable from one holding a value without a null sentinel.
//!
//! Decode is driven by the descriptor alone: `next_element` deals out
//! declared indices in order (collections bound themselves by their size
//! entry), so this backend also exercises the positional half of the
//! contract without any text to parse.

use indexmap::IndexMap;

use crate::de::{Decoder, NextElement};
use crate::error::{Error, Result};
use crate::schema::{Descriptor, Kind};
use crate::ser::Encoder;
use crate::serializers::ValueSerializer;
use crate::value::Value;

/// Flattens a value into an ordered path→scalar map.
pub fn to_map<S: ValueSerializer>(
    serializer: &S,
    value: &S::Value,
) -> Result<IndexMap<String, Value>> {
    let mut encoder = MappingEncoder::new();
    serializer.encode(&mut encoder, value)?;
    Ok(encoder.into_map())
}

/// Reconstructs a value from a flattened path→scalar map.
pub fn from_map<S: ValueSerializer>(
    serializer: &S,
    map: &IndexMap<String, Value>,
) -> Result<S::Value> {
    let mut decoder = MappingDecoder::new(map);
    serializer.decode(&mut decoder)
}

fn compose(path: &[String], leaf: &str) -> String {
    if path.is_empty() {
        leaf.to_string()
    } else {
        let mut key = path.join(".");
        key.push('.');
        key.push_str(leaf);
        key
    }
}

/// Contract writer that records scalars under dotted paths.
pub struct MappingEncoder {
    map: IndexMap<String, Value>,
    path: Vec<String>,
    pending: Option<String>,
    /// Whether each open composite contributed a path segment. The root
    /// composite has no announcing element and contributes none.
    pushed: Vec<bool>,
}

impl MappingEncoder {
    pub fn new() -> Self {
        MappingEncoder {
            map: IndexMap::new(),
            path: Vec::new(),
            pending: None,
            pushed: Vec::new(),
        }
    }

    pub fn into_map(self) -> IndexMap<String, Value> {
        self.map
    }

    fn put(&mut self, value: Value) -> Result<()> {
        let name = self.pending.take().unwrap_or_default();
        self.map.insert(compose(&self.path, &name), value);
        Ok(())
    }
}

impl Default for MappingEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder for MappingEncoder {
    fn begin_composite(&mut self, _desc: &Descriptor, _type_args: &[&Descriptor]) -> Result<()> {
        match self.pending.take() {
            Some(segment) => {
                self.path.push(segment);
                self.pushed.push(true);
            }
            None => self.pushed.push(false),
        }
        Ok(())
    }

    fn end_composite(&mut self, _desc: &Descriptor) -> Result<()> {
        if self.pushed.pop() == Some(true) {
            self.path.pop();
        }
        Ok(())
    }

    fn begin_element(&mut self, desc: &Descriptor, index: usize) -> Result<bool> {
        let name = desc.element_name(index).ok_or_else(|| {
            Error::custom(format!(
                "element index {index} out of range for {}",
                desc.name()
            ))
        })?;
        self.pending = Some(name.into_owned());
        Ok(true)
    }

    fn encode_null(&mut self) -> Result<()> {
        // Absence is the null encoding.
        self.pending.take();
        Ok(())
    }

    fn encode_bool(&mut self, v: bool) -> Result<()> {
        self.put(Value::Bool(v))
    }

    fn encode_i8(&mut self, v: i8) -> Result<()> {
        self.put(Value::Int(v as i64))
    }

    fn encode_i16(&mut self, v: i16) -> Result<()> {
        self.put(Value::Int(v as i64))
    }

    fn encode_i32(&mut self, v: i32) -> Result<()> {
        self.put(Value::Int(v as i64))
    }

    fn encode_i64(&mut self, v: i64) -> Result<()> {
        self.put(Value::Int(v))
    }

    fn encode_f32(&mut self, v: f32) -> Result<()> {
        self.put(Value::Float(v as f64))
    }

    fn encode_f64(&mut self, v: f64) -> Result<()> {
        self.put(Value::Float(v))
    }

    fn encode_char(&mut self, v: char) -> Result<()> {
        self.put(Value::Char(v))
    }

    fn encode_str(&mut self, v: &str) -> Result<()> {
        self.put(Value::Str(v.to_string()))
    }
}

struct MapFrame {
    /// One past the highest element index this composite can deal out.
    limit: usize,
    next: usize,
    pushed: bool,
}

/// Descriptor-driven reader over a flattened map.
pub struct MappingDecoder<'a> {
    map: &'a IndexMap<String, Value>,
    path: Vec<String>,
    pending: Option<String>,
    frames: Vec<MapFrame>,
}

impl<'a> MappingDecoder<'a> {
    pub fn new(map: &'a IndexMap<String, Value>) -> Self {
        MappingDecoder {
            map,
            path: Vec::new(),
            pending: None,
            frames: Vec::new(),
        }
    }

    fn get(&mut self) -> Result<&'a Value> {
        let name = self.pending.take().unwrap_or_default();
        let key = compose(&self.path, &name);
        self.map
            .get(&key)
            .ok_or_else(|| Error::unexpected_eof(format!("entry `{key}`")))
    }

    fn typed<T>(&mut self, expected: &str, convert: impl FnOnce(&Value) -> Option<T>) -> Result<T> {
        let value = self.get()?;
        convert(value).ok_or_else(|| Error::malformed(expected, value.to_string()))
    }
}

impl Decoder for MappingDecoder<'_> {
    fn begin_composite(&mut self, desc: &Descriptor, _type_args: &[&Descriptor]) -> Result<()> {
        let pushed = match self.pending.take() {
            Some(segment) => {
                self.path.push(segment);
                true
            }
            None => false,
        };
        let limit = match desc.kind() {
            Kind::List | Kind::Set | Kind::Map => {
                let key = compose(&self.path, "size");
                match self.map.get(&key) {
                    Some(Value::Int(n)) if *n >= 0 => *n as usize + 1,
                    Some(other) => {
                        return Err(Error::malformed("a collection size", other.to_string()))
                    }
                    None => return Err(Error::unexpected_eof(format!("entry `{key}`"))),
                }
            }
            _ => desc.element_count(),
        };
        self.frames.push(MapFrame {
            limit,
            next: 0,
            pushed,
        });
        Ok(())
    }

    fn end_composite(&mut self, _desc: &Descriptor) -> Result<()> {
        let frame = self
            .frames
            .pop()
            .ok_or_else(|| Error::custom("end_composite without matching begin_composite"))?;
        if frame.pushed {
            self.path.pop();
        }
        Ok(())
    }

    fn next_element(&mut self, desc: &Descriptor) -> Result<NextElement> {
        let frame = self
            .frames
            .last_mut()
            .ok_or_else(|| Error::custom("element read outside any composite scope"))?;
        if frame.next >= frame.limit {
            return Ok(NextElement::Done);
        }
        let index = frame.next;
        frame.next += 1;
        let name = desc.element_name(index).ok_or_else(|| {
            Error::custom(format!(
                "element index {index} out of range for {}",
                desc.name()
            ))
        })?;
        self.pending = Some(name.into_owned());
        Ok(NextElement::Index(index))
    }

    fn peek_is_null(&mut self) -> Result<bool> {
        let name = self.pending.clone().unwrap_or_default();
        let key = compose(&self.path, &name);
        if self.map.contains_key(&key) {
            return Ok(false);
        }
        let prefix = format!("{key}.");
        Ok(!self.map.keys().any(|k| k.starts_with(&prefix)))
    }

    fn decode_null(&mut self) -> Result<()> {
        self.pending.take();
        Ok(())
    }

    fn decode_bool(&mut self) -> Result<bool> {
        self.typed("bool", Value::as_bool)
    }

    fn decode_i8(&mut self) -> Result<i8> {
        let n = self.typed("i8", Value::as_i64)?;
        i8::try_from(n).map_err(|_| Error::malformed("i8", n.to_string()))
    }

    fn decode_i16(&mut self) -> Result<i16> {
        let n = self.typed("i16", Value::as_i64)?;
        i16::try_from(n).map_err(|_| Error::malformed("i16", n.to_string()))
    }

    fn decode_i32(&mut self) -> Result<i32> {
        let n = self.typed("i32", Value::as_i64)?;
        i32::try_from(n).map_err(|_| Error::malformed("i32", n.to_string()))
    }

    fn decode_i64(&mut self) -> Result<i64> {
        self.typed("i64", Value::as_i64)
    }

    fn decode_f32(&mut self) -> Result<f32> {
        Ok(self.typed("f32", Value::as_f64)? as f32)
    }

    fn decode_f64(&mut self) -> Result<f64> {
        self.typed("f64", Value::as_f64)
    }

    fn decode_char(&mut self) -> Result<char> {
        self.typed("char", Value::as_char)
    }

    fn decode_str(&mut self) -> Result<String> {
        self.typed("a string", |v| v.as_str().map(str::to_string))
    }
}
