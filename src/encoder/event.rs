//! event.rs
//! Loosely-typed input side of the encoder: an attribute set keyed by field name.
//!
//! Values carry their origin kind (integer vs floating-point), which the encoder
//! uses to pick metric slots. Keys outside the vocabulary are kept here but never
//! reach the wire.

use std::collections::BTreeMap;

// Field vocabulary shared by events and states.
pub const TIME: &str = "time";
pub const STATE: &str = "state";
pub const SERVICE: &str = "service";
pub const HOST: &str = "host";
pub const DESCRIPTION: &str = "description";
pub const TAGS: &str = "tags";
pub const TTL: &str = "ttl";
pub const ATTRIBUTES: &str = "attributes";
pub const METRIC: &str = "metric";
pub const ONCE: &str = "once";

/// One field value, tagged with the kind it was supplied as.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    List(Vec<String>),
    Map(BTreeMap<String, String>),
}

impl FieldValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            FieldValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Any numeric kind, widened to f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(v) => Some(*v),
            FieldValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            FieldValue::Int(0) => Some(false),
            FieldValue::Int(1) => Some(true),
            FieldValue::Text(s) if s == "true" => Some(true),
            FieldValue::Text(s) if s == "false" => Some(false),
            _ => None,
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Int(v.into())
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        FieldValue::Int(v.into())
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        FieldValue::Float(v.into())
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(v: Vec<String>) -> Self {
        FieldValue::List(v)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(v: Vec<&str>) -> Self {
        FieldValue::List(v.into_iter().map(str::to_string).collect())
    }
}

impl From<BTreeMap<String, String>> for FieldValue {
    fn from(v: BTreeMap<String, String>) -> Self {
        FieldValue::Map(v)
    }
}

/// Polymorphic metric, dispatched on the kind the value was supplied as.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    Absent,
    Int(i64),
    Float(f64),
}

impl Metric {
    /// Non-numeric values count as absent.
    pub fn from_field(value: Option<&FieldValue>) -> Self {
        match value {
            Some(FieldValue::Int(v)) => Metric::Int(*v),
            Some(FieldValue::Float(v)) => Metric::Float(*v),
            _ => Metric::Absent,
        }
    }
}

/// Attribute set describing one observation (or one state, see `build_state`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    fields: BTreeMap<String, FieldValue>,
}

impl Event {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.fields.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn metric(&self) -> Metric {
        Metric::from_field(self.get(METRIC))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Event {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut event = Event::new();
        for (k, v) in iter {
            event.insert(k, v);
        }
        event
    }
}
