//! The `winstrom` envelope wrapped around every request and response body.
//!
//! # Wire shape
//! ```text
//! { "winstrom": { "@version": "1.0", "<resource_key>": [ {..}, {..} ] } }
//! ```
//! Responses may additionally carry `success` and `message`, and on writes
//! `stats` / `results`. Everything other than the well-known members is kept
//! in `Envelope::body`, keyed as received.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;
use crate::record::Record;

pub const ENVELOPE_KEY: &str = "winstrom";
pub const PROTOCOL_VERSION: &str = "1.0";

/// The inner mapping of a decoded envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "@version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl Envelope {
    /// The records listed under `resource_key`, in envelope order.
    ///
    /// A missing key or a non-list value is a malformed response.
    pub fn records(&self, resource_key: &str) -> Result<Vec<Record>, Error> {
        record_list(resource_key, self.body.get(resource_key).cloned())
    }

    /// Take the records under `resource_key` out of the envelope.
    pub fn into_records(mut self, resource_key: &str) -> Result<Vec<Record>, Error> {
        let list = self.body.remove(resource_key);
        record_list(resource_key, list)
    }

    /// `@version` as text; a non-string version is rendered as JSON.
    pub fn version(&self) -> String {
        self.version.as_ref().map(render).unwrap_or_default()
    }

    /// `message` as text; a non-string message is rendered as JSON.
    pub fn message(&self) -> Option<String> {
        self.message.as_ref().map(render)
    }
}

fn record_list(resource_key: &str, list: Option<Value>) -> Result<Vec<Record>, Error> {
    match list {
        Some(Value::Array(items)) => items.into_iter().map(Record::from_json).collect(),
        Some(_) => Err(Error::MalformedResponse(format!("'{resource_key}' is not a list"))),
        None => Err(Error::MalformedResponse(format!(
            "envelope has no '{resource_key}' list"
        ))),
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Serialize `records` into the envelope under `resource_key`.
///
/// Records are written in slice order, so identical input gives identical
/// output.
pub fn encode(resource_key: &str, records: &[Record]) -> Result<String, Error> {
    let list: Vec<Value> = records.iter().map(Record::to_wire_representation).collect();
    let mut inner = Map::new();
    inner.insert("@version".to_string(), Value::from(PROTOCOL_VERSION));
    inner.insert(resource_key.to_string(), Value::Array(list));
    let mut outer = Map::new();
    outer.insert(ENVELOPE_KEY.to_string(), Value::Object(inner));
    serde_json::to_string(&outer).map_err(Error::Serialization)
}

/// Parse a response body and return the inner envelope mapping.
pub fn decode(raw: &[u8]) -> Result<Envelope, Error> {
    let mut outer: Map<String, Value> = serde_json::from_slice(raw)
        .map_err(|e| Error::MalformedResponse(format!("invalid JSON: {e}")))?;
    let inner = outer
        .remove(ENVELOPE_KEY)
        .ok_or_else(|| Error::MalformedResponse(format!("missing '{ENVELOPE_KEY}' key")))?;
    serde_json::from_value(inner)
        .map_err(|e| Error::MalformedResponse(format!("invalid envelope: {e}")))
}
