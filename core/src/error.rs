//! Error types for the FlexiBee client core.
//!
//! # Design
//! Service-reported failures get a dedicated variant carrying the remote
//! message and protocol version verbatim, because callers need both for
//! diagnostics. A non-2xx response is only reported as `HttpStatus` when its
//! body is not a `winstrom` envelope: the service sends failure envelopes
//! with 4xx statuses and those are more informative than the status code.
//! Transport errors are boxed and exposed through `source()` untouched.

/// Errors returned by the record model and the request pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The body is not valid JSON or lacks the expected envelope structure.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The envelope carried `success: "false"`.
    #[error("flexibee error: '{message}', version: '{version}'")]
    ServiceReportedFailure { message: String, version: String },

    /// A record attribute that does not exist was requested.
    #[error("attribute not found: {0}")]
    AttributeNotFound(String),

    /// Currency conversion attempted with a zero or non-numeric rate.
    #[error("invalid exchange rate: {0}")]
    InvalidRate(String),

    /// The server returned a non-2xx status without an envelope body.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The outgoing envelope could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The transport collaborator failed to perform the round-trip.
    #[error("transport failure: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Required configuration is missing.
    #[error("configuration error: {0}")]
    Config(String),

    /// An entry processor pattern is not a valid regular expression.
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}
