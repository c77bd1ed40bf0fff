//! Ledger entities: transactions, blocks and their tags.

use serde::{Deserialize, Serialize};

use crate::TxId;

/// Arbitrary key/value metadata attached to a transaction.
///
/// Names and values are carried verbatim (commonly base64url text).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A ledger transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TxId,
    pub owner_address: String,
    pub target: Option<String>,
    /// `None` while the transaction is pending.
    pub height: Option<u64>,
    /// Unix epoch seconds.
    pub created_at: u64,
    pub tags: Vec<Tag>,
}

impl Transaction {
    /// A transaction is confirmed once it has been assigned a height.
    pub fn is_confirmed(&self) -> bool {
        self.height.is_some()
    }
}

/// A mined block. Heights are unique but may be sparse.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    pub height: Option<u64>,
    /// Unix epoch seconds.
    pub created_at: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_follows_height() {
        let mut tx = Transaction {
            id: "tx".into(),
            owner_address: "owner".into(),
            target: None,
            height: None,
            created_at: 1,
            tags: vec![Tag::new("App-Name", "demo")],
        };
        assert!(!tx.is_confirmed());
        tx.height = Some(0);
        assert!(tx.is_confirmed());
    }
}
