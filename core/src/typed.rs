//! Record types with a known attribute set.
//!
//! Each type holds an inner `Record` and converts through `WireRecord`, so
//! typed and untyped records share one envelope contract.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::error::Error;
use crate::record::{Record, WireRecord};

/// Attribute names of the `kurz` (exchange rate) entity.
pub mod rate_attr {
    pub const CURRENCY: &str = "mena";
    pub const RATE: &str = "nbStred";
    pub const VALID_FROM: &str = "platiOdData";
    pub const AMOUNT: &str = "kurzMnozstvi";
}

pub const DEFAULT_CURRENCY: &str = "UBTC";
pub const DEFAULT_RATE_AMOUNT: u64 = 1_000_000;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Exchange rate of a foreign currency, valid from a given day.
///
/// `nbStred` is the price of `kurzMnozstvi` units of the foreign currency
/// in the base currency.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRate {
    record: Record,
}

impl ExchangeRate {
    const REQUIRED: [&'static str; 4] = [
        rate_attr::CURRENCY,
        rate_attr::RATE,
        rate_attr::VALID_FROM,
        rate_attr::AMOUNT,
    ];

    /// A rate ready to be written: currency `code:UBTC`, base amount
    /// 1,000,000. Use `with_currency` / `with_amount` to override.
    pub fn new_for_update(valid_from: NaiveDate, rate: Decimal) -> Self {
        let record = Record::new()
            .with(rate_attr::CURRENCY, currency_code(DEFAULT_CURRENCY))
            .with(rate_attr::RATE, rate.to_string())
            .with(rate_attr::VALID_FROM, valid_from.format(DATE_FORMAT).to_string())
            .with(rate_attr::AMOUNT, DEFAULT_RATE_AMOUNT);
        Self { record }
    }

    /// Set the currency by ISO code; stored as `code:<ISO>`.
    pub fn with_currency(mut self, iso: &str) -> Self {
        self.record.set(rate_attr::CURRENCY, currency_code(iso));
        self
    }

    pub fn with_amount(mut self, amount: u64) -> Self {
        self.record.set(rate_attr::AMOUNT, amount);
        self
    }

    pub fn currency(&self) -> Result<&str, Error> {
        self.record.get_str(rate_attr::CURRENCY)
    }

    pub fn valid_from(&self) -> Result<&str, Error> {
        self.record.get_str(rate_attr::VALID_FROM)
    }

    /// The rate as an exact decimal. Non-numeric values are `InvalidRate`.
    pub fn rate(&self) -> Result<Decimal, Error> {
        let value = self.record.get(rate_attr::RATE)?;
        to_decimal(value).ok_or_else(|| Error::InvalidRate(format!("{value} is not a number")))
    }

    pub fn base_amount(&self) -> Result<Decimal, Error> {
        let value = self.record.get(rate_attr::AMOUNT)?;
        to_decimal(value).ok_or_else(|| Error::InvalidRate(format!("base amount {value} is not a number")))
    }

    /// Convert `value` in the base currency to this rate's currency:
    /// `value * kurzMnozstvi / nbStred`, computed without floating point.
    pub fn convert_to_currency(&self, value: Decimal) -> Result<Decimal, Error> {
        let rate = self.rate()?;
        if rate.is_zero() {
            return Err(Error::InvalidRate("rate is zero".to_string()));
        }
        value
            .checked_mul(self.base_amount()?)
            .and_then(|scaled| scaled.checked_div(rate))
            .ok_or_else(|| Error::InvalidRate(format!("converting {value} at rate {rate} overflows")))
    }

    pub fn record(&self) -> &Record {
        &self.record
    }
}

impl WireRecord for ExchangeRate {
    fn from_record(record: Record) -> Result<Self, Error> {
        Ok(Self { record })
    }

    fn into_record(self) -> Result<Record, Error> {
        if let Some(missing) = Self::REQUIRED.iter().find(|name| !self.record.contains(name)) {
            return Err(Error::AttributeNotFound((*missing).to_string()));
        }
        Ok(self.record)
    }
}

fn currency_code(iso: &str) -> String {
    format!("code:{iso}")
}

/// The service sends numbers both as JSON numbers and as strings.
fn to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
        _ => None,
    }
}

/// A bank transaction (`banka`). Fully dynamic: automated processing needs
/// varying parts of each transaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BankTransaction {
    record: Record,
}

impl BankTransaction {
    pub fn new(record: Record) -> Self {
        Self { record }
    }

    pub fn get(&self, name: &str) -> Result<&Value, Error> {
        self.record.get(name)
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.record.set(name, value);
    }

    pub fn record(&self) -> &Record {
        &self.record
    }
}

impl WireRecord for BankTransaction {
    fn from_record(record: Record) -> Result<Self, Error> {
        Ok(Self { record })
    }

    fn into_record(self) -> Result<Record, Error> {
        Ok(self.record)
    }
}

/// A record whose wire form nests its attributes under a fixed JSON
/// identifier that is not a regular attribute name (it may contain dashes):
/// `{ "<json_id>": { ...attributes } }`.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedRecord {
    json_id: String,
    inner: Record,
}

impl KeyedRecord {
    pub fn new(json_id: &str, inner: Record) -> Self {
        Self {
            json_id: json_id.to_string(),
            inner,
        }
    }

    pub fn json_id(&self) -> &str {
        &self.json_id
    }

    pub fn inner(&self) -> &Record {
        &self.inner
    }

    /// Unwrap a decoded `{ json_id: {...} }` object. The record must have
    /// exactly one attribute holding an object.
    pub fn from_wrapped(record: Record) -> Result<Self, Error> {
        let mut entries = record.into_map().into_iter();
        match (entries.next(), entries.next()) {
            (Some((json_id, Value::Object(inner))), None) => Ok(Self {
                json_id,
                inner: Record::from_map(inner),
            }),
            _ => Err(Error::MalformedResponse(
                "keyed record must be a single-key object".to_string(),
            )),
        }
    }
}

impl WireRecord for KeyedRecord {
    fn from_record(record: Record) -> Result<Self, Error> {
        Self::from_wrapped(record)
    }

    fn into_record(self) -> Result<Record, Error> {
        let mut wrapped = Record::new();
        wrapped.set(&self.json_id, Value::Object(self.inner.into_map()));
        Ok(wrapped)
    }
}

pub const CASH_PAYMENT_KEY: &str = "hotovostni-uhrada";

/// Cash payment of a received invoice, sent through a `faktura-prijata`
/// request: `{ "id": <invoice id>, "hotovostni-uhrada": { ...items } }`.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceCashPayment {
    invoice_id: Value,
    items: Map<String, Value>,
}

impl InvoiceCashPayment {
    pub fn new(invoice_id: impl Into<Value>) -> Self {
        Self {
            invoice_id: invoice_id.into(),
            items: Map::new(),
        }
    }

    /// Add a payment item, e.g. `pokladna` or `castka`.
    pub fn with_item(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.items.insert(name.to_string(), value.into());
        self
    }

    pub fn invoice_id(&self) -> &Value {
        &self.invoice_id
    }

    pub fn item(&self, name: &str) -> Result<&Value, Error> {
        self.items
            .get(name)
            .ok_or_else(|| Error::AttributeNotFound(name.to_string()))
    }
}

impl WireRecord for InvoiceCashPayment {
    fn from_record(mut record: Record) -> Result<Self, Error> {
        let invoice_id = record
            .remove("id")
            .ok_or_else(|| Error::AttributeNotFound("id".to_string()))?;
        let items = match record.remove(CASH_PAYMENT_KEY) {
            Some(Value::Object(items)) => items,
            Some(_) | None => return Err(Error::AttributeNotFound(CASH_PAYMENT_KEY.to_string())),
        };
        Ok(Self { invoice_id, items })
    }

    fn into_record(self) -> Result<Record, Error> {
        Ok(Record::new()
            .with("id", self.invoice_id)
            .with(CASH_PAYMENT_KEY, Value::Object(self.items)))
    }
}
