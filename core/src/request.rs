//! One read or write against a FlexiBee resource.
//!
//! # Design
//! A single `Request` type serves every resource kind; the kind is a
//! `Resource` descriptor. Like the rest of the core, each operation is split
//! into `build_*` (produces an `HttpRequest`) and `parse_*` (consumes an
//! `HttpResponse`). `fetch` and `send` compose the two around a caller's
//! `Transport` and consume the request, which is meant for one operation.
//! No retries: a transport error ends the call.

use std::fmt;

use crate::config::Endpoint;
use crate::envelope::{self, Envelope};
use crate::error::Error;
use crate::filter::AttributeFilter;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::record::{Record, WireRecord};
use crate::resource::Resource;
use crate::validator::{self, Validated};

const JSON_CONTENT_TYPE: &str = "application/json";

/// A read (optionally filtered) or a batch write against one resource kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    resource: Resource,
    filter: Option<String>,
    records: Vec<Record>,
}

impl Request {
    pub fn new(resource: Resource) -> Self {
        Self {
            resource,
            filter: None,
            records: Vec::new(),
        }
    }

    pub fn rate() -> Self {
        Self::new(Resource::RATE)
    }

    pub fn bank() -> Self {
        Self::new(Resource::BANK)
    }

    pub fn payment_order() -> Self {
        Self::new(Resource::PAYMENT_ORDER)
    }

    pub fn received_invoice() -> Self {
        Self::new(Resource::RECEIVED_INVOICE)
    }

    pub fn cash_transaction() -> Self {
        Self::new(Resource::CASH_TRANSACTION)
    }

    /// Scope the request with a filter expression, passed through verbatim:
    /// an id (`123`, `code:EUR`) or a predicate (`datVyst >= '2015-01-01'`).
    pub fn with_filter(mut self, filter: &str) -> Self {
        self.filter = Some(filter.to_string());
        self
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Add a record to the outgoing batch. Typed records are checked for
    /// their required attributes here.
    pub fn append<R: WireRecord>(&mut self, record: R) -> Result<(), Error> {
        self.records.push(record.into_record()?);
        Ok(())
    }

    /// `<base_url>/<path>[/(<filter>)].json`
    pub fn build_url(&self, base_url: &str) -> String {
        let base_url = base_url.trim_end_matches('/');
        match &self.filter {
            Some(filter) => format!("{base_url}/{}/({filter}).json", self.resource.path),
            None => format!("{base_url}/{}.json", self.resource.path),
        }
    }

    /// The outgoing envelope with every appended record, in append order.
    pub fn to_json(&self) -> Result<String, Error> {
        envelope::encode(self.resource.key, &self.records)
    }

    /// Build the GET for a fetch. `params` override the `detail` hint
    /// derived from `attributes` when both name the same key.
    pub fn build_fetch(
        &self,
        endpoint: &Endpoint,
        params: &[(&str, &str)],
        attributes: &AttributeFilter,
    ) -> HttpRequest {
        let mut query: Vec<(String, String)> = attributes.detail_hint().into_iter().collect();
        for (key, value) in params {
            match query.iter_mut().find(|(k, _)| k == key) {
                Some(existing) => existing.1 = value.to_string(),
                None => query.push((key.to_string(), value.to_string())),
            }
        }
        HttpRequest {
            method: HttpMethod::Get,
            url: self.build_url(endpoint.base_url()),
            query,
            headers: vec![auth_header(endpoint)],
            body: None,
        }
    }

    /// Validate a fetch response and build one `R` per listed record,
    /// projected to `attributes`.
    pub fn parse_fetch<R: WireRecord>(
        &self,
        response: HttpResponse,
        attributes: &AttributeFilter,
    ) -> Result<Vec<R>, Error> {
        let envelope = read_envelope(response)?;
        envelope
            .into_records(self.resource.key)?
            .into_iter()
            .map(|record| R::from_record(attributes.project(record)))
            .collect()
    }

    /// Build the PUT carrying every appended record.
    pub fn build_send(&self, endpoint: &Endpoint, params: &[(&str, &str)]) -> Result<HttpRequest, Error> {
        Ok(HttpRequest {
            method: HttpMethod::Put,
            url: self.build_url(endpoint.base_url()),
            query: params.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            headers: vec![
                ("content-type".to_string(), JSON_CONTENT_TYPE.to_string()),
                auth_header(endpoint),
            ],
            body: Some(self.to_json()?),
        })
    }

    /// Validate a send response. The returned envelope carries the
    /// service's `stats` and `results` in `body`.
    pub fn parse_send(&self, response: HttpResponse) -> Result<Envelope, Error> {
        read_envelope(response)
    }

    /// Read the resource, keeping only `attributes` of each record (all of
    /// them when the filter is empty).
    pub fn fetch<T, R>(
        self,
        transport: &T,
        endpoint: &Endpoint,
        params: &[(&str, &str)],
        attributes: &AttributeFilter,
    ) -> Result<Vec<R>, Error>
    where
        T: Transport + ?Sized,
        R: WireRecord,
    {
        let request = self.build_fetch(endpoint, params, attributes);
        tracing::debug!(resource = self.resource.path, url = %request.url, "fetching records");
        let response = execute(transport, request)?;
        self.parse_fetch(response, attributes)
    }

    /// Write the whole batch. Either every record is accepted or the call
    /// fails as a whole.
    pub fn send<T>(self, transport: &T, endpoint: &Endpoint) -> Result<Envelope, Error>
    where
        T: Transport + ?Sized,
    {
        let request = self.build_send(endpoint, &[])?;
        tracing::debug!(
            resource = self.resource.path,
            url = %request.url,
            records = self.records.len(),
            "sending records"
        );
        let response = execute(transport, request)?;
        self.parse_send(response)
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = self.to_json().map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

fn auth_header(endpoint: &Endpoint) -> (String, String) {
    ("authorization".to_string(), endpoint.credentials().authorization_header())
}

fn execute<T: Transport + ?Sized>(transport: &T, request: HttpRequest) -> Result<HttpResponse, Error> {
    transport
        .execute(request)
        .map_err(|e| Error::Transport(Box::new(e)))
}

/// Decode and validate a response body. Envelopes are inspected regardless
/// of status because failures arrive as 4xx with a `success: "false"` body.
/// Any other non-2xx response is reported by status, envelope or not.
fn read_envelope(response: HttpResponse) -> Result<Envelope, Error> {
    let validated = envelope::decode(response.body.as_bytes())
        .and_then(|envelope| validator::validate(envelope).map(Validated::into_envelope));
    match validated {
        Err(e @ Error::ServiceReportedFailure { .. }) => Err(e),
        _ if !response.is_success() => Err(Error::HttpStatus {
            status: response.status,
            body: response.body,
        }),
        other => other,
    }
}
