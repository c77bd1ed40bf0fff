//! Structured query filters for transactions and blocks.
//!
//! These records arrive from the query façade as JSON, so field names follow
//! its camelCase convention. Every field is optional; missing fields never
//! make a query fail.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DEFAULT_QUERY_LIMIT;

/// Filter on a single tag name matching any of several values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFilter {
    pub name: String,
    pub values: Vec<String>,
}

impl TagFilter {
    pub fn new<V: Into<String>>(name: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// Confirmation status window for transaction queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    /// Confirmed and pending transactions.
    Any,
    /// Only transactions with a height.
    #[default]
    Confirmed,
    /// Pending transactions are admitted alongside confirmed ones.
    Pending,
}

/// Recognized sort orders. Anything else falls back to a per-entity default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "HEIGHT_ASC")]
    HeightAsc,
    #[serde(rename = "HEIGHT_DESC")]
    HeightDesc,
}

/// Returned when a sort order string is not recognized.
#[derive(Debug, thiserror::Error)]
#[error("unknown sort order: {0}")]
pub struct UnknownSortOrder(pub String);

impl FromStr for SortOrder {
    type Err = UnknownSortOrder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HEIGHT_ASC" => Ok(Self::HeightAsc),
            "HEIGHT_DESC" => Ok(Self::HeightDesc),
            other => Err(UnknownSortOrder(other.to_string())),
        }
    }
}

/// Parse an optional sort order string, dropping unrecognized values.
fn recognized(sort_order: Option<&str>) -> Option<SortOrder> {
    sort_order.and_then(|s| s.parse().ok())
}

/// Transaction query filter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TxQueryParams {
    /// Recipient address set.
    pub to: Option<Vec<String>>,
    /// Sender (owner) address set.
    pub from: Option<Vec<String>>,
    pub id: Option<String>,
    pub ids: Option<Vec<String>>,
    pub tags: Option<Vec<TagFilter>>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    /// Left-join block columns onto each row.
    pub blocks: bool,
    pub status: TxStatus,
    /// Kept as a string so unrecognized values reach the planner's fallback.
    pub sort_order: Option<String>,
    pub min_height: Option<i64>,
    pub max_height: Option<i64>,
}

impl TxQueryParams {
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_QUERY_LIMIT)
    }

    pub fn offset(&self) -> u32 {
        self.offset.unwrap_or(0)
    }

    pub fn sort(&self) -> Option<SortOrder> {
        recognized(self.sort_order.as_deref())
    }
}

/// Block query filter.
///
/// Unlike [`TxQueryParams`], a missing limit means "no limit".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlockQueryParams {
    pub id: Option<String>,
    pub ids: Option<Vec<String>>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    /// Only blocks created strictly before this Unix timestamp.
    pub before: Option<u64>,
    pub sort_order: Option<String>,
    pub min_height: Option<i64>,
    pub max_height: Option<i64>,
}

impl BlockQueryParams {
    pub fn sort(&self) -> Option<SortOrder> {
        recognized(self.sort_order.as_deref())
    }
}

/// Returns the bound when it should be applied (present and non-negative).
pub fn height_bound(bound: Option<i64>) -> Option<u64> {
    bound.and_then(|h| u64::try_from(h).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tx_params_defaults() {
        let params = TxQueryParams::default();
        assert_eq!(params.limit(), 10);
        assert_eq!(params.offset(), 0);
        assert_eq!(params.status, TxStatus::Confirmed);
        assert!(!params.blocks);
        assert_eq!(params.sort(), None);
    }

    #[test]
    fn test_tx_params_from_json() {
        let params: TxQueryParams = serde_json::from_value(serde_json::json!({
            "tags": [{"name": "App-Name", "values": ["X"]}],
            "sortOrder": "HEIGHT_ASC",
            "status": "any",
            "minHeight": 3,
        }))
        .expect("deserialize");
        assert_eq!(params.sort(), Some(SortOrder::HeightAsc));
        assert_eq!(params.status, TxStatus::Any);
        assert_eq!(params.min_height, Some(3));
        assert_eq!(params.tags.as_deref().map(<[_]>::len), Some(1));
    }

    #[test]
    fn test_unrecognized_sort_order_is_dropped() {
        let params = TxQueryParams {
            sort_order: Some("NEWEST".into()),
            ..Default::default()
        };
        assert_eq!(params.sort(), None);
        assert!("NEWEST".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_invalid_pagination_type_rejected() {
        let result = serde_json::from_value::<TxQueryParams>(serde_json::json!({"limit": "ten"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_height_bound() {
        assert_eq!(height_bound(None), None);
        assert_eq!(height_bound(Some(-1)), None);
        assert_eq!(height_bound(Some(0)), Some(0));
        assert_eq!(height_bound(Some(42)), Some(42));
    }
}
