//! Shared fixture types and their hand-written serializers.

#![allow(dead_code)]

use indexmap::IndexMap;
use multiform::serializers::{
    F64Serializer, I32Serializer, ListSerializer, MapSerializer, OptionSerializer,
    StringSerializer, ValueSerializer,
};
use multiform::{Decoder, Descriptor, Encoder, Error, Kind, NextElement, Result};

fn missing(field: &str) -> Error {
    Error::custom(format!("missing field `{field}`"))
}

// ---------------------------------------------------------------------------
// City / Street

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct City {
    pub id: i32,
    pub name: String,
}

impl City {
    pub fn new(id: i32, name: &str) -> Self {
        City {
            id,
            name: name.to_string(),
        }
    }
}

pub static CITY: Descriptor = Descriptor::new("City", Kind::Object, &["id", "name"]);

#[derive(Debug, Clone, Copy, Default)]
pub struct CitySerializer;

impl ValueSerializer for CitySerializer {
    type Value = City;

    fn descriptor(&self) -> &'static Descriptor {
        &CITY
    }

    fn encode<E: Encoder>(&self, encoder: &mut E, value: &City) -> Result<()> {
        encoder.begin_composite(&CITY, &[])?;
        if encoder.begin_element(&CITY, 0)? {
            encoder.encode_i32(value.id)?;
        }
        if encoder.begin_element(&CITY, 1)? {
            encoder.encode_str(&value.name)?;
        }
        encoder.end_composite(&CITY)
    }

    fn decode<D: Decoder>(&self, decoder: &mut D) -> Result<City> {
        decoder.begin_composite(&CITY, &[])?;
        let (mut id, mut name) = (None, None);
        loop {
            match decoder.next_element(&CITY)? {
                NextElement::All => {
                    id = Some(decoder.decode_i32()?);
                    name = Some(decoder.decode_str()?);
                    break;
                }
                NextElement::Index(0) => id = Some(decoder.decode_i32()?),
                NextElement::Index(1) => name = Some(decoder.decode_str()?),
                NextElement::Index(_) | NextElement::Done => break,
            }
        }
        decoder.end_composite(&CITY)?;
        Ok(City {
            id: id.ok_or_else(|| missing("id"))?,
            name: name.ok_or_else(|| missing("name"))?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Street {
    pub id: i32,
    pub name: String,
    pub city: City,
}

pub static STREET: Descriptor = Descriptor::new("Street", Kind::Object, &["id", "name", "city"]);

#[derive(Debug, Clone, Copy, Default)]
pub struct StreetSerializer;

impl ValueSerializer for StreetSerializer {
    type Value = Street;

    fn descriptor(&self) -> &'static Descriptor {
        &STREET
    }

    fn encode<E: Encoder>(&self, encoder: &mut E, value: &Street) -> Result<()> {
        encoder.begin_composite(&STREET, &[])?;
        if encoder.begin_element(&STREET, 0)? {
            encoder.encode_i32(value.id)?;
        }
        if encoder.begin_element(&STREET, 1)? {
            encoder.encode_str(&value.name)?;
        }
        if encoder.begin_element(&STREET, 2)? {
            CitySerializer.encode(encoder, &value.city)?;
        }
        encoder.end_composite(&STREET)
    }

    fn decode<D: Decoder>(&self, decoder: &mut D) -> Result<Street> {
        decoder.begin_composite(&STREET, &[])?;
        let (mut id, mut name, mut city) = (None, None, None);
        loop {
            match decoder.next_element(&STREET)? {
                NextElement::All => {
                    id = Some(decoder.decode_i32()?);
                    name = Some(decoder.decode_str()?);
                    city = Some(CitySerializer.decode(decoder)?);
                    break;
                }
                NextElement::Index(0) => id = Some(decoder.decode_i32()?),
                NextElement::Index(1) => name = Some(decoder.decode_str()?),
                NextElement::Index(2) => city = Some(CitySerializer.decode(decoder)?),
                NextElement::Index(_) | NextElement::Done => break,
            }
        }
        decoder.end_composite(&STREET)?;
        Ok(Street {
            id: id.ok_or_else(|| missing("id"))?,
            name: name.ok_or_else(|| missing("name"))?,
            city: city.ok_or_else(|| missing("city"))?,
        })
    }
}

/// Like [`Street`] but with a nullable city.
#[derive(Debug, Clone, PartialEq)]
pub struct StreetOpt {
    pub id: i32,
    pub name: String,
    pub city: Option<City>,
}

pub static STREET_OPT: Descriptor =
    Descriptor::new("StreetOpt", Kind::Object, &["id", "name", "city"]);

#[derive(Debug, Clone, Copy, Default)]
pub struct StreetOptSerializer;

impl ValueSerializer for StreetOptSerializer {
    type Value = StreetOpt;

    fn descriptor(&self) -> &'static Descriptor {
        &STREET_OPT
    }

    fn encode<E: Encoder>(&self, encoder: &mut E, value: &StreetOpt) -> Result<()> {
        encoder.begin_composite(&STREET_OPT, &[])?;
        if encoder.begin_element(&STREET_OPT, 0)? {
            encoder.encode_i32(value.id)?;
        }
        if encoder.begin_element(&STREET_OPT, 1)? {
            encoder.encode_str(&value.name)?;
        }
        if encoder.begin_element(&STREET_OPT, 2)? {
            OptionSerializer(CitySerializer).encode(encoder, &value.city)?;
        }
        encoder.end_composite(&STREET_OPT)
    }

    fn decode<D: Decoder>(&self, decoder: &mut D) -> Result<StreetOpt> {
        decoder.begin_composite(&STREET_OPT, &[])?;
        let (mut id, mut name, mut city) = (None, None, None);
        loop {
            match decoder.next_element(&STREET_OPT)? {
                NextElement::All => {
                    id = Some(decoder.decode_i32()?);
                    name = Some(decoder.decode_str()?);
                    city = Some(OptionSerializer(CitySerializer).decode(decoder)?);
                    break;
                }
                NextElement::Index(0) => id = Some(decoder.decode_i32()?),
                NextElement::Index(1) => name = Some(decoder.decode_str()?),
                NextElement::Index(2) => {
                    city = Some(OptionSerializer(CitySerializer).decode(decoder)?)
                }
                NextElement::Index(_) | NextElement::Done => break,
            }
        }
        decoder.end_composite(&STREET_OPT)?;
        Ok(StreetOpt {
            id: id.ok_or_else(|| missing("id"))?,
            name: name.ok_or_else(|| missing("name"))?,
            city: city.ok_or_else(|| missing("city"))?,
        })
    }
}

// ---------------------------------------------------------------------------
// County

#[derive(Debug, Clone, PartialEq)]
pub struct County {
    pub name: String,
    pub cities: Vec<City>,
}

pub static COUNTY: Descriptor = Descriptor::new("County", Kind::Object, &["name", "cities"]);

#[derive(Debug, Clone, Copy, Default)]
pub struct CountySerializer;

impl ValueSerializer for CountySerializer {
    type Value = County;

    fn descriptor(&self) -> &'static Descriptor {
        &COUNTY
    }

    fn encode<E: Encoder>(&self, encoder: &mut E, value: &County) -> Result<()> {
        encoder.begin_composite(&COUNTY, &[])?;
        if encoder.begin_element(&COUNTY, 0)? {
            encoder.encode_str(&value.name)?;
        }
        if encoder.begin_element(&COUNTY, 1)? {
            ListSerializer(CitySerializer).encode(encoder, &value.cities)?;
        }
        encoder.end_composite(&COUNTY)
    }

    fn decode<D: Decoder>(&self, decoder: &mut D) -> Result<County> {
        decoder.begin_composite(&COUNTY, &[])?;
        let (mut name, mut cities) = (None, None);
        loop {
            match decoder.next_element(&COUNTY)? {
                NextElement::All => {
                    name = Some(decoder.decode_str()?);
                    cities = Some(ListSerializer(CitySerializer).decode(decoder)?);
                    break;
                }
                NextElement::Index(0) => name = Some(decoder.decode_str()?),
                NextElement::Index(1) => {
                    cities = Some(ListSerializer(CitySerializer).decode(decoder)?)
                }
                NextElement::Index(_) | NextElement::Done => break,
            }
        }
        decoder.end_composite(&COUNTY)?;
        Ok(County {
            name: name.ok_or_else(|| missing("name"))?,
            cities: cities.ok_or_else(|| missing("cities"))?,
        })
    }
}

// ---------------------------------------------------------------------------
// Attitude (enum)

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attitude {
    Positive,
    Neutral,
    Negative,
}

pub static ATTITUDE: Descriptor = Descriptor::new(
    "Attitude",
    Kind::Enum,
    &["Positive", "Neutral", "Negative"],
);

#[derive(Debug, Clone, Copy, Default)]
pub struct AttitudeSerializer;

impl ValueSerializer for AttitudeSerializer {
    type Value = Attitude;

    fn descriptor(&self) -> &'static Descriptor {
        &ATTITUDE
    }

    fn encode<E: Encoder>(&self, encoder: &mut E, value: &Attitude) -> Result<()> {
        let variant = match value {
            Attitude::Positive => 0,
            Attitude::Neutral => 1,
            Attitude::Negative => 2,
        };
        encoder.encode_enum(&ATTITUDE, variant)
    }

    fn decode<D: Decoder>(&self, decoder: &mut D) -> Result<Attitude> {
        match decoder.decode_enum(&ATTITUDE)? {
            0 => Ok(Attitude::Positive),
            1 => Ok(Attitude::Neutral),
            2 => Ok(Attitude::Negative),
            i => Err(Error::malformed("an Attitude variant", i.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// IntData

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntData {
    pub int_v: i32,
}

pub static INT_DATA: Descriptor = Descriptor::new("IntData", Kind::Object, &["int_v"]);

#[derive(Debug, Clone, Copy, Default)]
pub struct IntDataSerializer;

impl ValueSerializer for IntDataSerializer {
    type Value = IntData;

    fn descriptor(&self) -> &'static Descriptor {
        &INT_DATA
    }

    fn encode<E: Encoder>(&self, encoder: &mut E, value: &IntData) -> Result<()> {
        encoder.begin_composite(&INT_DATA, &[])?;
        if encoder.begin_element(&INT_DATA, 0)? {
            encoder.encode_i32(value.int_v)?;
        }
        encoder.end_composite(&INT_DATA)
    }

    fn decode<D: Decoder>(&self, decoder: &mut D) -> Result<IntData> {
        decoder.begin_composite(&INT_DATA, &[])?;
        let mut int_v = None;
        loop {
            match decoder.next_element(&INT_DATA)? {
                NextElement::All => {
                    int_v = Some(decoder.decode_i32()?);
                    break;
                }
                NextElement::Index(0) => int_v = Some(decoder.decode_i32()?),
                NextElement::Index(_) | NextElement::Done => break,
            }
        }
        decoder.end_composite(&INT_DATA)?;
        Ok(IntData {
            int_v: int_v.ok_or_else(|| missing("int_v"))?,
        })
    }
}

// ---------------------------------------------------------------------------
// Tree (recursive, nullable children)

#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    pub name: String,
    pub left: Option<Box<Tree>>,
    pub right: Option<Box<Tree>>,
}

impl Tree {
    pub fn leaf(name: &str) -> Self {
        Tree {
            name: name.to_string(),
            left: None,
            right: None,
        }
    }

    pub fn node(name: &str, left: Tree, right: Tree) -> Self {
        Tree {
            name: name.to_string(),
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
        }
    }
}

pub static TREE: Descriptor = Descriptor::new("Tree", Kind::Object, &["name", "left", "right"]);

#[derive(Debug, Clone, Copy, Default)]
pub struct TreeSerializer;

impl TreeSerializer {
    fn encode_child<E: Encoder>(&self, encoder: &mut E, child: &Option<Box<Tree>>) -> Result<()> {
        match child {
            Some(tree) => {
                encoder.encode_not_null_mark()?;
                self.encode(encoder, tree)
            }
            None => encoder.encode_null(),
        }
    }

    fn decode_child<D: Decoder>(&self, decoder: &mut D) -> Result<Option<Box<Tree>>> {
        if decoder.peek_is_null()? {
            decoder.decode_null()?;
            Ok(None)
        } else {
            Ok(Some(Box::new(self.decode(decoder)?)))
        }
    }
}

impl ValueSerializer for TreeSerializer {
    type Value = Tree;

    fn descriptor(&self) -> &'static Descriptor {
        &TREE
    }

    fn encode<E: Encoder>(&self, encoder: &mut E, value: &Tree) -> Result<()> {
        encoder.begin_composite(&TREE, &[])?;
        if encoder.begin_element(&TREE, 0)? {
            encoder.encode_str(&value.name)?;
        }
        if encoder.begin_element(&TREE, 1)? {
            self.encode_child(encoder, &value.left)?;
        }
        if encoder.begin_element(&TREE, 2)? {
            self.encode_child(encoder, &value.right)?;
        }
        encoder.end_composite(&TREE)
    }

    fn decode<D: Decoder>(&self, decoder: &mut D) -> Result<Tree> {
        decoder.begin_composite(&TREE, &[])?;
        let (mut name, mut left, mut right) = (None, None, None);
        loop {
            match decoder.next_element(&TREE)? {
                NextElement::All => {
                    name = Some(decoder.decode_str()?);
                    left = Some(self.decode_child(decoder)?);
                    right = Some(self.decode_child(decoder)?);
                    break;
                }
                NextElement::Index(0) => name = Some(decoder.decode_str()?),
                NextElement::Index(1) => left = Some(self.decode_child(decoder)?),
                NextElement::Index(2) => right = Some(self.decode_child(decoder)?),
                NextElement::Index(_) | NextElement::Done => break,
            }
        }
        decoder.end_composite(&TREE)?;
        Ok(Tree {
            name: name.ok_or_else(|| missing("name"))?,
            left: left.ok_or_else(|| missing("left"))?,
            right: right.ok_or_else(|| missing("right"))?,
        })
    }
}

// ---------------------------------------------------------------------------
// Menagerie (one of everything)

#[derive(Debug, Clone, PartialEq)]
pub struct Menagerie {
    pub flag: bool,
    pub small: i8,
    pub medium: i16,
    pub int_v: i32,
    pub long_v: i64,
    pub ratio: f64,
    pub initial: char,
    pub label: String,
    pub mood: Attitude,
    pub opt_int: Option<i32>,
    pub opt_label: Option<String>,
    pub numbers: Vec<i32>,
    pub sparse: Vec<Option<i32>>,
    pub opt_numbers: Option<Vec<i32>>,
    pub moods: Vec<Vec<Attitude>>,
    pub data: Vec<IntData>,
    pub ranks: IndexMap<i32, String>,
    pub tree: Tree,
}

impl Menagerie {
    /// The fixture used by the cross-backend round-trip tests.
    pub fn sample() -> Self {
        let mut ranks = IndexMap::new();
        ranks.insert(1, "first".to_string());
        ranks.insert(2, "second".to_string());
        Menagerie {
            flag: true,
            small: -7,
            medium: 300,
            int_v: 100_500,
            long_v: 5_000_000_000,
            ratio: 2.5,
            initial: 'm',
            label: "kitchen sink".to_string(),
            mood: Attitude::Neutral,
            opt_int: Some(41),
            opt_label: None,
            numbers: vec![1, 2, 3],
            sparse: vec![Some(4), None, Some(6)],
            opt_numbers: Some(vec![7, 8]),
            moods: vec![
                vec![Attitude::Positive, Attitude::Negative],
                vec![Attitude::Neutral],
            ],
            data: vec![IntData { int_v: 9 }, IntData { int_v: 10 }],
            ranks,
            tree: Tree::node("root", Tree::leaf("a"), Tree::leaf("b")),
        }
    }
}

pub static MENAGERIE: Descriptor = Descriptor::new(
    "Menagerie",
    Kind::Object,
    &[
        "flag",
        "small",
        "medium",
        "int_v",
        "long_v",
        "ratio",
        "initial",
        "label",
        "mood",
        "opt_int",
        "opt_label",
        "numbers",
        "sparse",
        "opt_numbers",
        "moods",
        "data",
        "ranks",
        "tree",
    ],
);

#[derive(Debug, Clone, Copy, Default)]
pub struct MenagerieSerializer;

impl ValueSerializer for MenagerieSerializer {
    type Value = Menagerie;

    fn descriptor(&self) -> &'static Descriptor {
        &MENAGERIE
    }

    fn encode<E: Encoder>(&self, encoder: &mut E, value: &Menagerie) -> Result<()> {
        let desc = &MENAGERIE;
        encoder.begin_composite(desc, &[])?;
        if encoder.begin_element(desc, 0)? {
            encoder.encode_bool(value.flag)?;
        }
        if encoder.begin_element(desc, 1)? {
            encoder.encode_i8(value.small)?;
        }
        if encoder.begin_element(desc, 2)? {
            encoder.encode_i16(value.medium)?;
        }
        if encoder.begin_element(desc, 3)? {
            encoder.encode_i32(value.int_v)?;
        }
        if encoder.begin_element(desc, 4)? {
            encoder.encode_i64(value.long_v)?;
        }
        if encoder.begin_element(desc, 5)? {
            encoder.encode_f64(value.ratio)?;
        }
        if encoder.begin_element(desc, 6)? {
            encoder.encode_char(value.initial)?;
        }
        if encoder.begin_element(desc, 7)? {
            encoder.encode_str(&value.label)?;
        }
        if encoder.begin_element(desc, 8)? {
            AttitudeSerializer.encode(encoder, &value.mood)?;
        }
        if encoder.begin_element(desc, 9)? {
            OptionSerializer(I32Serializer).encode(encoder, &value.opt_int)?;
        }
        if encoder.begin_element(desc, 10)? {
            OptionSerializer(StringSerializer).encode(encoder, &value.opt_label)?;
        }
        if encoder.begin_element(desc, 11)? {
            ListSerializer(I32Serializer).encode(encoder, &value.numbers)?;
        }
        if encoder.begin_element(desc, 12)? {
            ListSerializer(OptionSerializer(I32Serializer)).encode(encoder, &value.sparse)?;
        }
        if encoder.begin_element(desc, 13)? {
            OptionSerializer(ListSerializer(I32Serializer)).encode(encoder, &value.opt_numbers)?;
        }
        if encoder.begin_element(desc, 14)? {
            ListSerializer(ListSerializer(AttitudeSerializer)).encode(encoder, &value.moods)?;
        }
        if encoder.begin_element(desc, 15)? {
            ListSerializer(IntDataSerializer).encode(encoder, &value.data)?;
        }
        if encoder.begin_element(desc, 16)? {
            MapSerializer(I32Serializer, StringSerializer).encode(encoder, &value.ranks)?;
        }
        if encoder.begin_element(desc, 17)? {
            TreeSerializer.encode(encoder, &value.tree)?;
        }
        encoder.end_composite(desc)
    }

    fn decode<D: Decoder>(&self, decoder: &mut D) -> Result<Menagerie> {
        let desc = &MENAGERIE;
        decoder.begin_composite(desc, &[])?;
        let mut flag = None;
        let mut small = None;
        let mut medium = None;
        let mut int_v = None;
        let mut long_v = None;
        let mut ratio = None;
        let mut initial = None;
        let mut label = None;
        let mut mood = None;
        let mut opt_int = None;
        let mut opt_label = None;
        let mut numbers = None;
        let mut sparse = None;
        let mut opt_numbers = None;
        let mut moods = None;
        let mut data = None;
        let mut ranks = None;
        let mut tree = None;
        loop {
            let next = decoder.next_element(desc)?;
            let index = match next {
                NextElement::All => {
                    flag = Some(decoder.decode_bool()?);
                    small = Some(decoder.decode_i8()?);
                    medium = Some(decoder.decode_i16()?);
                    int_v = Some(decoder.decode_i32()?);
                    long_v = Some(decoder.decode_i64()?);
                    ratio = Some(decoder.decode_f64()?);
                    initial = Some(decoder.decode_char()?);
                    label = Some(decoder.decode_str()?);
                    mood = Some(AttitudeSerializer.decode(decoder)?);
                    opt_int = Some(OptionSerializer(I32Serializer).decode(decoder)?);
                    opt_label = Some(OptionSerializer(StringSerializer).decode(decoder)?);
                    numbers = Some(ListSerializer(I32Serializer).decode(decoder)?);
                    sparse = Some(ListSerializer(OptionSerializer(I32Serializer)).decode(decoder)?);
                    opt_numbers =
                        Some(OptionSerializer(ListSerializer(I32Serializer)).decode(decoder)?);
                    moods = Some(ListSerializer(ListSerializer(AttitudeSerializer)).decode(decoder)?);
                    data = Some(ListSerializer(IntDataSerializer).decode(decoder)?);
                    ranks = Some(MapSerializer(I32Serializer, StringSerializer).decode(decoder)?);
                    tree = Some(TreeSerializer.decode(decoder)?);
                    break;
                }
                NextElement::Index(i) => i,
                NextElement::Done => break,
            };
            match index {
                0 => flag = Some(decoder.decode_bool()?),
                1 => small = Some(decoder.decode_i8()?),
                2 => medium = Some(decoder.decode_i16()?),
                3 => int_v = Some(decoder.decode_i32()?),
                4 => long_v = Some(decoder.decode_i64()?),
                5 => ratio = Some(decoder.decode_f64()?),
                6 => initial = Some(decoder.decode_char()?),
                7 => label = Some(decoder.decode_str()?),
                8 => mood = Some(AttitudeSerializer.decode(decoder)?),
                9 => opt_int = Some(OptionSerializer(I32Serializer).decode(decoder)?),
                10 => opt_label = Some(OptionSerializer(StringSerializer).decode(decoder)?),
                11 => numbers = Some(ListSerializer(I32Serializer).decode(decoder)?),
                12 => {
                    sparse = Some(ListSerializer(OptionSerializer(I32Serializer)).decode(decoder)?)
                }
                13 => {
                    opt_numbers =
                        Some(OptionSerializer(ListSerializer(I32Serializer)).decode(decoder)?)
                }
                14 => {
                    moods =
                        Some(ListSerializer(ListSerializer(AttitudeSerializer)).decode(decoder)?)
                }
                15 => data = Some(ListSerializer(IntDataSerializer).decode(decoder)?),
                16 => ranks = Some(MapSerializer(I32Serializer, StringSerializer).decode(decoder)?),
                17 => tree = Some(TreeSerializer.decode(decoder)?),
                _ => break,
            }
        }
        decoder.end_composite(desc)?;
        Ok(Menagerie {
            flag: flag.ok_or_else(|| missing("flag"))?,
            small: small.ok_or_else(|| missing("small"))?,
            medium: medium.ok_or_else(|| missing("medium"))?,
            int_v: int_v.ok_or_else(|| missing("int_v"))?,
            long_v: long_v.ok_or_else(|| missing("long_v"))?,
            ratio: ratio.ok_or_else(|| missing("ratio"))?,
            initial: initial.ok_or_else(|| missing("initial"))?,
            label: label.ok_or_else(|| missing("label"))?,
            mood: mood.ok_or_else(|| missing("mood"))?,
            opt_int: opt_int.ok_or_else(|| missing("opt_int"))?,
            opt_label: opt_label.ok_or_else(|| missing("opt_label"))?,
            numbers: numbers.ok_or_else(|| missing("numbers"))?,
            sparse: sparse.ok_or_else(|| missing("sparse"))?,
            opt_numbers: opt_numbers.ok_or_else(|| missing("opt_numbers"))?,
            moods: moods.ok_or_else(|| missing("moods"))?,
            data: data.ok_or_else(|| missing("data"))?,
            ranks: ranks.ok_or_else(|| missing("ranks"))?,
            tree: tree.ok_or_else(|| missing("tree"))?,
        })
    }
}

// ---------------------------------------------------------------------------
// Measurements (floating point, for format-specific cases)

#[derive(Debug, Clone, PartialEq)]
pub struct Measurements {
    pub low: f64,
    pub high: f64,
}

pub static MEASUREMENTS: Descriptor =
    Descriptor::new("Measurements", Kind::Object, &["low", "high"]);

#[derive(Debug, Clone, Copy, Default)]
pub struct MeasurementsSerializer;

impl ValueSerializer for MeasurementsSerializer {
    type Value = Measurements;

    fn descriptor(&self) -> &'static Descriptor {
        &MEASUREMENTS
    }

    fn encode<E: Encoder>(&self, encoder: &mut E, value: &Measurements) -> Result<()> {
        encoder.begin_composite(&MEASUREMENTS, &[])?;
        if encoder.begin_element(&MEASUREMENTS, 0)? {
            F64Serializer.encode(encoder, &value.low)?;
        }
        if encoder.begin_element(&MEASUREMENTS, 1)? {
            F64Serializer.encode(encoder, &value.high)?;
        }
        encoder.end_composite(&MEASUREMENTS)
    }

    fn decode<D: Decoder>(&self, decoder: &mut D) -> Result<Measurements> {
        decoder.begin_composite(&MEASUREMENTS, &[])?;
        let (mut low, mut high) = (None, None);
        loop {
            match decoder.next_element(&MEASUREMENTS)? {
                NextElement::All => {
                    low = Some(decoder.decode_f64()?);
                    high = Some(decoder.decode_f64()?);
                    break;
                }
                NextElement::Index(0) => low = Some(decoder.decode_f64()?),
                NextElement::Index(1) => high = Some(decoder.decode_f64()?),
                NextElement::Index(_) | NextElement::Done => break,
            }
        }
        decoder.end_composite(&MEASUREMENTS)?;
        Ok(Measurements {
            low: low.ok_or_else(|| missing("low"))?,
            high: high.ok_or_else(|| missing("high"))?,
        })
    }
}
