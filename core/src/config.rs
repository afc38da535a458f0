//! Connection settings passed explicitly to every call.
//!
//! Nothing here is global: callers build an `Endpoint` (by hand or from the
//! environment) and hand it to `Request::fetch` / `Request::send`.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::Error;

pub const URL_VAR: &str = "FLEXIBEE_URL";
pub const USER_VAR: &str = "FLEXIBEE_USER";
pub const PASSWORD_VAR: &str = "FLEXIBEE_PASSWORD";

/// HTTP basic authentication credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    /// Value for the `authorization` header.
    pub fn authorization_header(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {token}")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Base URL of a company's REST API plus the credentials used to reach it,
/// e.g. `https://demo.flexibee.eu/c/demo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base_url: String,
    credentials: Credentials,
}

impl Endpoint {
    pub fn new(base_url: &str, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Read `FLEXIBEE_URL`, `FLEXIBEE_USER` and `FLEXIBEE_PASSWORD`.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let var = |name: &str| lookup(name).ok_or_else(|| Error::Config(format!("{name} is not set")));
        let url = var(URL_VAR)?;
        let user = var(USER_VAR)?;
        let password = var(PASSWORD_VAR)?;
        Ok(Self::new(&url, Credentials::new(&user, &password)))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn authorization_header_is_basic_base64() {
        let creds = Credentials::new("winstrom", "winstrom");
        assert_eq!(creds.authorization_header(), "Basic d2luc3Ryb206d2luc3Ryb20=");
    }

    #[test]
    fn debug_redacts_password() {
        let creds = Credentials::new("admin", "hunter2");
        let printed = format!("{creds:?}");
        assert!(printed.contains("admin"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let endpoint = Endpoint::new("https://demo.flexibee.eu/c/demo/", Credentials::new("a", "b"));
        assert_eq!(endpoint.base_url(), "https://demo.flexibee.eu/c/demo");
    }

    #[test]
    fn from_lookup_reads_all_variables() {
        let vars: HashMap<&str, &str> = [
            (URL_VAR, "http://localhost:5434/c/firma"),
            (USER_VAR, "user"),
            (PASSWORD_VAR, "secret"),
        ]
        .into_iter()
        .collect();
        let endpoint = Endpoint::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap();
        assert_eq!(endpoint.base_url(), "http://localhost:5434/c/firma");
        assert_eq!(endpoint.credentials(), &Credentials::new("user", "secret"));
    }

    #[test]
    fn from_lookup_reports_missing_variable() {
        let err = Endpoint::from_lookup(|name| (name == URL_VAR).then(|| "http://x".to_string())).unwrap_err();
        match err {
            Error::Config(msg) => assert!(msg.contains(USER_VAR)),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
