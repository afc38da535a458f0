//! Pattern-driven accounting operations for automated entry processing.
//!
//! An `EntryProcessor` pairs a regular expression with an operation code;
//! bank transaction texts that match get booked with that operation.

use regex::{Captures, Regex};

use crate::error::Error;

#[derive(Debug, Clone)]
pub struct EntryProcessor {
    regex: Regex,
    op: String,
}

impl EntryProcessor {
    /// The pattern only matches at the start of the text.
    pub fn new(pattern: &str, op: &str) -> Result<Self, Error> {
        Ok(Self {
            regex: Regex::new(&format!("^(?:{pattern})"))?,
            op: op.to_string(),
        })
    }

    pub fn matches<'t>(&self, text: &'t str) -> Option<Captures<'t>> {
        self.regex.captures(text)
    }

    /// The operation formatted as a code reference: `code:<op>`.
    pub fn op_code(&self) -> String {
        format!("code:{}", self.op)
    }

    pub fn from_pairs<'a, I>(pairs: I) -> Result<Vec<Self>, Error>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        pairs
            .into_iter()
            .map(|(pattern, op)| Self::new(pattern, op))
            .collect()
    }
}

/// Operation code of the first processor matching `text`.
pub fn find_op(processors: &[EntryProcessor], text: &str) -> Option<String> {
    processors
        .iter()
        .find(|p| p.matches(text).is_some())
        .map(EntryProcessor::op_code)
}
