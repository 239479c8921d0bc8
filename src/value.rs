//! Dynamic structured data and its explicit shape tag.
//!
//! [`Value`] is what the structured-text parsers produce and what the
//! compact-format codec consumes. It implements `Serialize` and `Deserialize`,
//! so `serde_json` and `serde_yaml` read and write it directly with key order
//! preserved.
//!
//! [`Document`] is the tagged view of a parsed value. Converters that only make
//! sense for some shapes (CSV needs rows of records) branch on the tag instead
//! of probing the value at runtime.
//!
//! ## Examples
//!
//! ```rust
//! use toon_savings::{value, Document, Shape};
//!
//! let users = value!([{"id": 1, "name": "Alice"}, {"id": 2, "name": "Bob"}]);
//! let doc = Document::classify(users);
//! assert_eq!(doc.shape(), Shape::ArrayOfRecords);
//! assert_eq!(doc.records().map(|rows| rows.len()), Some(2));
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::Map;

/// A dynamically-typed structured value.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Value>),
    Object(Map),
}

/// A numeric value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    /// Converts this number to an `i64` if it has no fractional part and fits.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toon_savings::Number;
    ///
    /// assert_eq!(Number::Integer(42).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.0).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.5).as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::Float(f) => {
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                    Some(*f as i64)
                } else {
                    None
                }
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(fl) => write!(f, "{}", fl),
        }
    }
}

impl Value {
    /// Types a raw text field the way the CSV and XML readers do.
    ///
    /// Empty fields become `Null`, `true`/`false` (any case) become booleans,
    /// integers and floats become numbers, everything else stays a string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toon_savings::{Number, Value};
    ///
    /// assert_eq!(Value::infer(""), Value::Null);
    /// assert_eq!(Value::infer("TRUE"), Value::Bool(true));
    /// assert_eq!(Value::infer("42"), Value::Number(Number::Integer(42)));
    /// assert_eq!(Value::infer("9.5"), Value::Number(Number::Float(9.5)));
    /// assert_eq!(Value::infer("Alice"), Value::from("Alice"));
    /// ```
    #[must_use]
    pub fn infer(field: &str) -> Value {
        let trimmed = field.trim();

        if trimmed.is_empty() {
            return Value::Null;
        }
        if trimmed.eq_ignore_ascii_case("true") {
            return Value::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Value::Bool(false);
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Value::Number(Number::Integer(i));
        }
        // "inf" and "NaN" parse as f64 but are words in a text field
        if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_finite() {
                return Value::Number(Number::Float(f));
            }
        }

        Value::String(field.to_string())
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns `true` for null, booleans, numbers and strings.
    #[inline]
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        !matches!(self, Value::Array(_) | Value::Object(_))
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Looks up a key when the value is an object.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|obj| obj.get(key))
    }

    /// Returns the elements as records when this is a non-empty array of objects.
    #[must_use]
    pub fn as_records(&self) -> Option<Vec<&Map>> {
        let arr = self.as_array()?;
        if arr.is_empty() {
            return None;
        }
        arr.iter().map(Value::as_object).collect()
    }

    /// Returns the shape tag of this value without taking ownership.
    #[must_use]
    pub fn shape(&self) -> Shape {
        match self {
            Value::Object(_) => Shape::Record,
            Value::Array(items) => array_shape(items),
            _ => Shape::Scalar,
        }
    }

    /// Renders scalars as plain text, the way CSV cells and XML text nodes
    /// show them. Containers render as compact JSON.
    #[must_use]
    pub fn to_plain_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            Value::Array(_) | Value::Object(_) => self.to_string(),
        }
    }
}

fn array_shape(items: &[Value]) -> Shape {
    let records = items.iter().filter(|v| v.is_object()).count();
    if records > 0 && records == items.len() {
        Shape::ArrayOfRecords
    } else if items.iter().all(Value::is_scalar) {
        Shape::ArrayOfScalars
    } else {
        Shape::MixedArray
    }
}

/// Compact JSON rendering.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

/// The shape tag of a parsed document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Null, boolean, number or string.
    Scalar,
    /// A single object.
    Record,
    /// A non-empty array whose elements are all objects.
    ArrayOfRecords,
    /// An array whose elements are all scalars (including the empty array).
    ArrayOfScalars,
    /// Any other array: nested arrays, or objects mixed with scalars.
    MixedArray,
}

impl Shape {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Shape::Scalar => "scalar",
            Shape::Record => "record",
            Shape::ArrayOfRecords => "array of records",
            Shape::ArrayOfScalars => "array of scalars",
            Shape::MixedArray => "mixed array",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed value tagged with its shape.
#[derive(Clone, Debug, PartialEq)]
pub enum Document {
    Scalar(Value),
    Record(Map),
    ArrayOfRecords(Vec<Map>),
    ArrayOfScalars(Vec<Value>),
    MixedArray(Vec<Value>),
}

impl Document {
    /// Tags a value with its shape.
    #[must_use]
    pub fn classify(value: Value) -> Self {
        match value {
            Value::Object(map) => Document::Record(map),
            Value::Array(items) => match array_shape(&items) {
                Shape::ArrayOfRecords => Document::ArrayOfRecords(
                    items
                        .into_iter()
                        .filter_map(|item| match item {
                            Value::Object(map) => Some(map),
                            _ => None,
                        })
                        .collect(),
                ),
                Shape::ArrayOfScalars => Document::ArrayOfScalars(items),
                _ => Document::MixedArray(items),
            },
            scalar => Document::Scalar(scalar),
        }
    }

    #[must_use]
    pub fn shape(&self) -> Shape {
        match self {
            Document::Scalar(_) => Shape::Scalar,
            Document::Record(_) => Shape::Record,
            Document::ArrayOfRecords(_) => Shape::ArrayOfRecords,
            Document::ArrayOfScalars(_) => Shape::ArrayOfScalars,
            Document::MixedArray(_) => Shape::MixedArray,
        }
    }

    /// Returns the rows when the document is an array of records.
    #[must_use]
    pub fn records(&self) -> Option<&[Map]> {
        match self {
            Document::ArrayOfRecords(rows) => Some(rows),
            _ => None,
        }
    }

    /// Finds tabular rows: the document itself when it is an array of
    /// records, otherwise the first field of a record that holds one.
    #[must_use]
    pub fn tabular_records(&self) -> Option<Vec<&Map>> {
        match self {
            Document::ArrayOfRecords(rows) => Some(rows.iter().collect()),
            Document::Record(map) => map.values().find_map(Value::as_records),
            _ => None,
        }
    }

    /// Converts back into an untagged value.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Document::Scalar(value) => value,
            Document::Record(map) => Value::Object(map),
            Document::ArrayOfRecords(rows) => {
                Value::Array(rows.into_iter().map(Value::Object).collect())
            }
            Document::ArrayOfScalars(items) | Document::MixedArray(items) => Value::Array(items),
        }
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        Document::classify(value)
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            Value::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Object(obj) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (k, v) in obj.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any structured value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::Integer(value)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                match i64::try_from(value) {
                    Ok(i) => Ok(Value::Number(Number::Integer(i))),
                    Err(_) => Ok(Value::Number(Number::Float(value as f64))),
                }
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::Float(value)))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Value::String(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::Array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = Map::new();
                while let Some(key) = map.next_key::<MapKey>()? {
                    let value = map.next_value()?;
                    values.insert(key.0, value);
                }
                Ok(Value::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

/// Object key that also accepts the scalar keys YAML allows (`1: one`, `true: yes`).
struct MapKey(String);

impl<'de> Deserialize<'de> for MapKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct KeyVisitor;

        impl<'de> Visitor<'de> for KeyVisitor {
            type Value = MapKey;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string, number or boolean key")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(MapKey(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(MapKey(value))
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(MapKey(value.to_string()))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(MapKey(value.to_string()))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                Ok(MapKey(value.to_string()))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(MapKey(value.to_string()))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(MapKey("null".to_string()))
            }
        }

        deserializer.deserialize_any(KeyVisitor)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(Number::Integer(value as i64))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(Number::Integer(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(Number::Integer(value as i64))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(Number::Float(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Value::Object(value)
    }
}
