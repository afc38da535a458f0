//! Client-side attribute projection plus the matching `detail` hint.
//!
//! The service treats `detail=custom:a,b` as advice and still adds extras
//! such as display strings, so the projection on the client is what
//! guarantees the attribute set of fetched records.

use crate::record::Record;

pub const DETAIL_PARAM: &str = "detail";

/// The attributes a fetch should retain. Empty means no filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeFilter {
    attributes: Vec<String>,
}

impl AttributeFilter {
    pub fn new<I, S>(attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            attributes: attributes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// `("detail", "custom:a,b,c")`, or `None` when nothing is filtered.
    pub fn detail_hint(&self) -> Option<(String, String)> {
        if self.is_empty() {
            return None;
        }
        Some((DETAIL_PARAM.to_string(), format!("custom:{}", self.attributes.join(","))))
    }

    pub fn project(&self, record: Record) -> Record {
        project(record, &self.attributes)
    }
}

/// Keep only the attributes named in `wanted`; an empty `wanted` returns the
/// record unchanged. Names the record lacks are simply absent.
pub fn project<S: AsRef<str>>(mut record: Record, wanted: &[S]) -> Record {
    if wanted.is_empty() {
        return record;
    }
    record.retain(|name| wanted.iter().any(|w| w.as_ref() == name));
    record
}
