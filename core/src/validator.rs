//! Checks a decoded envelope for a service-reported failure.
//!
//! An envelope fails iff it carries `success` whose text equals `"false"`
//! ignoring case. A JSON boolean `false` counts too. A missing flag means
//! success.
//!
//! A failure without `message` is reported with the remaining envelope
//! members (`errors`, `results` and the like) rendered as compact JSON.

use serde_json::Value;

use crate::envelope::Envelope;
use crate::error::Error;

const NO_MESSAGE: &str = "(no message)";

/// An envelope that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated(Envelope);

impl Validated {
    pub fn envelope(&self) -> &Envelope {
        &self.0
    }

    pub fn into_envelope(self) -> Envelope {
        self.0
    }
}

pub fn validate(envelope: Envelope) -> Result<Validated, Error> {
    if envelope.success.as_ref().is_some_and(is_false) {
        let message = envelope.message().unwrap_or_else(|| fallback_message(&envelope));
        let version = envelope.version();
        tracing::warn!(%message, %version, "service reported failure");
        return Err(Error::ServiceReportedFailure { message, version });
    }
    Ok(Validated(envelope))
}

fn fallback_message(envelope: &Envelope) -> String {
    if envelope.body.is_empty() {
        return NO_MESSAGE.to_string();
    }
    Value::Object(envelope.body.clone()).to_string()
}

fn is_false(flag: &Value) -> bool {
    match flag {
        Value::String(s) => s.eq_ignore_ascii_case("false"),
        Value::Bool(b) => !b,
        _ => false,
    }
}
