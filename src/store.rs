//! The storage collaborator boundary.
//!
//! The domain service talks to persistence exclusively through the
//! [`ShelterStore`] trait, which mirrors the five operations the storage
//! collaborator exposes.  [`dynamodb::DynamoStore`] is the production
//! implementation; [`memory::MemoryStore`] backs the tests and local
//! development.

/// DynamoDB-backed store.
pub mod dynamodb;

/// In-process store for tests and local development.
pub mod memory;

use crate::codec::WireRecord;

use aws_sdk_dynamodb::types::AttributeValue;

/// A tagged primary key identifying one record in a table.
#[derive(Clone, Debug, PartialEq)]
pub struct Key {
    /// The attribute name of the key.
    pub name: String,
    /// The tagged value of the key.
    pub value: AttributeValue,
}

impl Key {
    /// Builds a string-tagged key.
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: AttributeValue::S(value.into()) }
    }
}

/// An equality filter applied during a scan.
///
/// Filters are structured rather than raw expression strings; each backend
/// compiles them into whatever its wire protocol needs.
#[derive(Clone, Debug, PartialEq)]
pub struct ScanFilter {
    /// The attribute to compare.
    pub attribute: String,
    /// The tagged value the attribute must equal.
    pub value: AttributeValue,
}

/// Failures surfaced by a store implementation.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// A conditional operation found its precondition unmet, e.g. a delete
    /// against a record that does not exist.
    #[error("conditional check failed")]
    ConditionFailed,

    /// Any other backend failure.
    #[error("{0}")]
    Backend(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Returns the highest numeric id across `records`, reading `id_field` from
/// each.  Records without the field, or with a value that does not parse as a
/// decimal number, are skipped.
pub(crate) fn highest_numeric_id(records: &[WireRecord], id_field: &str) -> Option<u64> {
    records
        .iter()
        .filter_map(|record| numeric_id(record.get(id_field)?))
        .max()
}

fn numeric_id(value: &AttributeValue) -> Option<u64> {
    match value {
        AttributeValue::S(value) => value.parse().ok(),
        AttributeValue::N(value) => value.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::empty(vec![], None)]
    #[case::string_ids(
        vec![AttributeValue::S("2".to_string()), AttributeValue::S("10".to_string())],
        Some(10)
    )]
    #[case::number_ids(
        vec![AttributeValue::N("7".to_string()), AttributeValue::N("3".to_string())],
        Some(7)
    )]
    #[case::skips_non_numeric(
        vec![AttributeValue::S("old-id".to_string()), AttributeValue::S("4".to_string())],
        Some(4)
    )]
    #[case::only_invalid(vec![AttributeValue::Bool(true)], None)]
    fn test_highest_numeric_id(#[case] ids: Vec<AttributeValue>, #[case] expected: Option<u64>) {
        let records: Vec<WireRecord> = ids
            .into_iter()
            .map(|id| WireRecord::from([("shelterId".to_string(), id)]))
            .collect();
        assert_eq!(expected, highest_numeric_id(&records, "shelterId"));
    }

    #[test]
    fn test_highest_numeric_id_ignores_records_without_the_field() {
        let records = vec![WireRecord::from([(
            "name".to_string(),
            AttributeValue::S("no id".to_string()),
        )])];
        assert_eq!(None, highest_numeric_id(&records, "shelterId"));
    }
}

/// The five operations of the storage collaborator.
#[async_trait::async_trait]
pub trait ShelterStore {
    /// Returns all records in `table`, optionally restricted by an equality
    /// `filter`.  Record order is whatever the backend returns and is not
    /// guaranteed stable across calls.
    async fn scan(&self, table: &str, filter: Option<ScanFilter>) -> StoreResult<Vec<WireRecord>>;

    /// Returns the highest numeric value of `id_field` across `table`, or
    /// `None` when the table is empty or holds no valid numeric ids.
    async fn get_highest_id(&self, table: &str, id_field: &str) -> StoreResult<Option<u64>>;

    /// Writes `record` into `table`.
    async fn put(&self, table: &str, record: WireRecord) -> StoreResult<()>;

    /// Deletes the record identified by `key`, failing with
    /// [`StoreError::ConditionFailed`] when no such record exists.
    async fn delete(&self, table: &str, key: Key) -> StoreResult<()>;

    /// Applies a partial update to the record identified by `key`: the two
    /// lists pair up positionally, `attribute_paths[i]` receiving
    /// `attribute_values[i]`.  Paths may be dotted to address nested maps.
    async fn update(
        &self,
        table: &str,
        key: Key,
        attribute_paths: Vec<String>,
        attribute_values: Vec<AttributeValue>,
    ) -> StoreResult<()>;
}
