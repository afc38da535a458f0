//! Resource kinds the client reads and writes.

/// URL path segment plus the JSON key of the record list inside the
/// envelope. For every built-in kind the two are the same string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resource {
    pub path: &'static str,
    pub key: &'static str,
}

impl Resource {
    /// Exchange rates.
    pub const RATE: Resource = Resource::same("kurz");
    /// Bank transactions.
    pub const BANK: Resource = Resource::same("banka");
    pub const PAYMENT_ORDER: Resource = Resource::same("prikaz-k-uhrade");
    pub const RECEIVED_INVOICE: Resource = Resource::same("faktura-prijata");
    pub const CASH_TRANSACTION: Resource = Resource::same("pokladni-pohyb");

    pub const ALL: [Resource; 5] = [
        Self::RATE,
        Self::BANK,
        Self::PAYMENT_ORDER,
        Self::RECEIVED_INVOICE,
        Self::CASH_TRANSACTION,
    ];

    const fn same(name: &'static str) -> Self {
        Self { path: name, key: name }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.path == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_table() {
        let paths: Vec<&str> = Resource::ALL.iter().map(|r| r.path).collect();
        assert_eq!(
            paths,
            ["kurz", "banka", "prikaz-k-uhrade", "faktura-prijata", "pokladni-pohyb"]
        );
        assert!(Resource::ALL.iter().all(|r| r.path == r.key));
    }

    #[test]
    fn from_path_lookup() {
        assert_eq!(Resource::from_path("banka"), Some(Resource::BANK));
        assert_eq!(Resource::from_path("adresar"), None);
    }
}
