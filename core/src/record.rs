//! Dynamic attribute container for partially known FlexiBee objects.
//!
//! # Design
//! The service exposes hundreds of attributes per entity and the client only
//! ever cares about a handful, so `Record` is an open, insertion-ordered map
//! from attribute name to JSON value. Unknown keys are always allowed; no
//! schema validation or coercion happens on decode. Typed records (see
//! `typed`) wrap a `Record` and convert to and from it through `WireRecord`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

/// An open mapping of attribute names to JSON values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    attributes: Map<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a decoded JSON object verbatim.
    pub fn from_map(attributes: Map<String, Value>) -> Self {
        Self { attributes }
    }

    /// Decode one JSON object from a response. Anything other than an object
    /// is a malformed response.
    pub fn from_json(value: Value) -> Result<Self, Error> {
        match value {
            Value::Object(attributes) => Ok(Self { attributes }),
            other => Err(Error::MalformedResponse(format!(
                "expected a JSON object for a record, got {other}"
            ))),
        }
    }

    /// Set an attribute, replacing any previous value under the same name.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.attributes.insert(name.to_string(), value.into());
    }

    /// Builder-style `set`.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Result<&Value, Error> {
        self.attributes
            .get(name)
            .ok_or_else(|| Error::AttributeNotFound(name.to_string()))
    }

    /// Like `get`, but the value must be a JSON string. A present value of
    /// another type is `MalformedResponse`.
    pub fn get_str(&self, name: &str) -> Result<&str, Error> {
        let value = self.get(name)?;
        value.as_str().ok_or_else(|| {
            Error::MalformedResponse(format!("attribute '{name}' is not a string: {value}"))
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.attributes.shift_remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Keep only the attributes for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.attributes.retain(|name, _| keep(name));
    }

    /// The JSON object sent for this record, without any envelope wrapper.
    pub fn to_wire_representation(&self) -> Value {
        Value::Object(self.attributes.clone())
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.attributes
    }
}

impl From<Map<String, Value>> for Record {
    fn from(attributes: Map<String, Value>) -> Self {
        Self::from_map(attributes)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            attributes: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Pretty-printed JSON with sorted keys.
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sorted: BTreeMap<&String, &Value> = self.attributes.iter().collect();
        let text = serde_json::to_string_pretty(&sorted).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

/// Conversion between a concrete record type and the generic `Record`.
///
/// `from_record` is used on the read path for every object of a response;
/// `into_record` on the write path when the record is appended to a
/// request. Typed records check their required attributes in `into_record`.
pub trait WireRecord: Sized {
    fn from_record(record: Record) -> Result<Self, Error>;

    fn into_record(self) -> Result<Record, Error>;
}

impl WireRecord for Record {
    fn from_record(record: Record) -> Result<Self, Error> {
        Ok(record)
    }

    fn into_record(self) -> Result<Record, Error> {
        Ok(self)
    }
}
