//! Static value-shape descriptors.
//!
//! A [`Descriptor`] is the immutable schema for one value type (or one
//! generic instantiation): its [`Kind`] plus an ordered sequence of named
//! element slots. Value serializers hold a `&'static Descriptor` and pass
//! it to every contract call; format backends consult it for delimiter
//! policy and name lookup.
//!
//! Element **order** is authoritative: it is the encode order and the
//! positional decode order for every backend. Element **names** exist only
//! so key-oriented formats can look an element up; they never reorder
//! anything.
//!
//! ## Examples
//!
//! ```rust
//! use multiform::schema::{Descriptor, Kind};
//!
//! static CITY: Descriptor = Descriptor::new("City", Kind::Object, &["id", "name"]);
//!
//! assert_eq!(CITY.element_index("name"), Some(1));
//! assert_eq!(CITY.element_name(0).as_deref(), Some("id"));
//! ```

use std::borrow::Cow;

/// The structural category of a value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// A composite with a fixed set of named elements.
    Object,
    /// An ordered sequence of homogeneous items.
    List,
    /// An unordered collection of distinct items.
    Set,
    /// A collection of key/value pairs.
    Map,
    /// One key/value pair inside a map.
    MapEntry,
    /// A closed set of named variants.
    Enum,
    /// A single scalar value.
    Primitive,
}

/// Immutable schema for one value type.
///
/// Composite kinds carry their declared element names; collection kinds
/// synthesize element names on demand (see [`Descriptor::element_name`]).
/// Descriptors are plain statics, supplied explicitly alongside a value's
/// serializer. There is no discovery mechanism.
#[derive(Debug)]
pub struct Descriptor {
    name: &'static str,
    kind: Kind,
    elements: &'static [&'static str],
}

impl Descriptor {
    /// Creates a descriptor. For [`Kind::Object`] and [`Kind::Enum`] the
    /// slice holds the declared element or variant names in authoritative
    /// order; collection kinds pass an empty slice.
    pub const fn new(name: &'static str, kind: Kind, elements: &'static [&'static str]) -> Self {
        Descriptor {
            name,
            kind,
            elements,
        }
    }

    /// The type name, used in diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Number of declared elements. Meaningful for [`Kind::Object`],
    /// [`Kind::Enum`], and [`Kind::MapEntry`]; collections size themselves
    /// through their size element instead.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// The name of the element at `index`, or `None` if out of range.
    ///
    /// Collection kinds follow the ordered-element protocol: element 0 is
    /// the collection size and is named `"size"`, and the item at
    /// collection position `i` is element `i + 1`, named `"i"`. Other
    /// kinds answer from their declared element slice.
    pub fn element_name(&self, index: usize) -> Option<Cow<'static, str>> {
        match self.kind {
            Kind::List | Kind::Set | Kind::Map => {
                if index == 0 {
                    Some(Cow::Borrowed("size"))
                } else {
                    Some(Cow::Owned((index - 1).to_string()))
                }
            }
            _ => self.elements.get(index).map(|name| Cow::Borrowed(*name)),
        }
    }

    /// Resolves an element name back to its index; the inverse of
    /// [`Descriptor::element_name`].
    pub fn element_index(&self, name: &str) -> Option<usize> {
        match self.kind {
            Kind::List | Kind::Set | Kind::Map => {
                if name == "size" {
                    Some(0)
                } else {
                    name.parse::<usize>().ok().map(|i| i + 1)
                }
            }
            _ => self.elements.iter().position(|n| *n == name),
        }
    }
}

/// Shared descriptor for every list instantiation; the item type travels
/// separately as a type-argument descriptor.
pub static LIST: Descriptor = Descriptor::new("List", Kind::List, &[]);

/// Shared descriptor for every set instantiation.
pub static SET: Descriptor = Descriptor::new("Set", Kind::Set, &[]);

/// Shared descriptor for every map instantiation; key and value types
/// travel as type-argument descriptors.
pub static MAP: Descriptor = Descriptor::new("Map", Kind::Map, &[]);

/// Descriptor for one key/value pair of a map.
pub static MAP_ENTRY: Descriptor = Descriptor::new("MapEntry", Kind::MapEntry, &["key", "value"]);

pub static BOOL: Descriptor = Descriptor::new("bool", Kind::Primitive, &[]);
pub static INT8: Descriptor = Descriptor::new("i8", Kind::Primitive, &[]);
pub static INT16: Descriptor = Descriptor::new("i16", Kind::Primitive, &[]);
pub static INT32: Descriptor = Descriptor::new("i32", Kind::Primitive, &[]);
pub static INT64: Descriptor = Descriptor::new("i64", Kind::Primitive, &[]);
pub static FLOAT32: Descriptor = Descriptor::new("f32", Kind::Primitive, &[]);
pub static FLOAT64: Descriptor = Descriptor::new("f64", Kind::Primitive, &[]);
pub static CHAR: Descriptor = Descriptor::new("char", Kind::Primitive, &[]);
pub static STRING: Descriptor = Descriptor::new("String", Kind::Primitive, &[]);
