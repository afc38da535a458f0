//! Client core for the FlexiBee accounting REST API.
//!
//! # Overview
//! Maps partially known JSON objects to open `Record`s (and a few typed
//! wrappers), frames them in the service's `winstrom` envelope, and checks
//! responses for service-reported failures. The HTTP round-trip is done by
//! a caller-supplied `Transport` (host-does-IO), so the core stays
//! deterministic and testable.
//!
//! # Design
//! - One `Request` type for every resource kind; the kind is a `Resource`
//!   descriptor (URL segment + JSON key).
//! - Each operation is split into `build_*` and `parse_*`; `fetch` / `send`
//!   run the two around a `Transport`.
//! - Attribute filtering is a client-side projection plus an advisory
//!   `detail=custom:...` hint.
//! - Credentials and base URL travel per call in an `Endpoint`.

pub mod automation;
pub mod config;
pub mod envelope;
pub mod error;
pub mod filter;
pub mod http;
pub mod record;
pub mod request;
pub mod resource;
pub mod typed;
pub mod validator;

pub use automation::EntryProcessor;
pub use config::{Credentials, Endpoint};
pub use envelope::Envelope;
pub use error::Error;
pub use filter::AttributeFilter;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use record::{Record, WireRecord};
pub use request::Request;
pub use resource::Resource;
pub use typed::{BankTransaction, ExchangeRate, InvoiceCashPayment, KeyedRecord};
