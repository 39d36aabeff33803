use crate::codec::WireRecord;
use crate::store::{Key, ScanFilter, ShelterStore, StoreError, StoreResult, highest_numeric_id};

use aws_sdk_dynamodb::types::AttributeValue;
use indexmap::IndexMap;
use std::collections;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-process [`ShelterStore`] holding records in insertion order.
///
/// Used by the service tests and handy for local development; scans return
/// records in the order they were put, which keeps assertions deterministic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<IndexMap<String, Vec<WireRecord>>>,
    update_calls: AtomicUsize,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times [`ShelterStore::update`] has been invoked, successful
    /// or not.
    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    /// Returns a copy of all records currently in `table`.
    pub fn records(&self, table: &str) -> Vec<WireRecord> {
        self.tables
            .lock()
            .expect("lock poisoned")
            .get(table)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl ShelterStore for MemoryStore {
    async fn scan(&self, table: &str, filter: Option<ScanFilter>) -> StoreResult<Vec<WireRecord>> {
        let tables = self.tables.lock().expect("lock poisoned");
        let records = tables.get(table).cloned().unwrap_or_default();
        match filter {
            Some(filter) => Ok(records
                .into_iter()
                .filter(|record| record.get(&filter.attribute) == Some(&filter.value))
                .collect()),
            None => Ok(records),
        }
    }

    async fn get_highest_id(&self, table: &str, id_field: &str) -> StoreResult<Option<u64>> {
        let tables = self.tables.lock().expect("lock poisoned");
        let records = tables.get(table).map(Vec::as_slice).unwrap_or_default();
        Ok(highest_numeric_id(records, id_field))
    }

    async fn put(&self, table: &str, record: WireRecord) -> StoreResult<()> {
        let mut tables = self.tables.lock().expect("lock poisoned");
        tables.entry(table.to_string()).or_default().push(record);
        Ok(())
    }

    async fn delete(&self, table: &str, key: Key) -> StoreResult<()> {
        let mut tables = self.tables.lock().expect("lock poisoned");
        let records = tables.entry(table.to_string()).or_default();
        let position = records
            .iter()
            .position(|record| record.get(&key.name) == Some(&key.value))
            .ok_or(StoreError::ConditionFailed)?;
        records.remove(position);
        Ok(())
    }

    async fn update(
        &self,
        table: &str,
        key: Key,
        attribute_paths: Vec<String>,
        attribute_values: Vec<AttributeValue>,
    ) -> StoreResult<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        let mut tables = self.tables.lock().expect("lock poisoned");
        let record = tables
            .entry(table.to_string())
            .or_default()
            .iter_mut()
            .find(|record| record.get(&key.name) == Some(&key.value))
            .ok_or_else(|| StoreError::Backend("no record matching key".to_string()))?;
        for (path, value) in attribute_paths.iter().zip(attribute_values) {
            apply_set(record, path, value);
        }
        Ok(())
    }
}

/// Applies one `SET` assignment, descending through dotted path components.
/// Intermediate attributes that are absent or not maps are replaced by empty
/// maps, which matches what the service's update paths expect.
fn apply_set(
    map: &mut collections::HashMap<String, AttributeValue>,
    path: &str,
    value: AttributeValue,
) {
    match path.split_once('.') {
        None => {
            map.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let nested = map
                .entry(head.to_string())
                .or_insert_with(|| AttributeValue::M(collections::HashMap::new()));
            if !matches!(nested, AttributeValue::M(_)) {
                *nested = AttributeValue::M(collections::HashMap::new());
            }
            if let AttributeValue::M(nested) = nested {
                apply_set(nested, rest, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str) -> WireRecord {
        WireRecord::from([
            ("shelterId".to_string(), AttributeValue::S(id.to_string())),
            ("name".to_string(), AttributeValue::S(name.to_string())),
        ])
    }

    #[tokio::test]
    async fn test_scan_preserves_insertion_order() {
        let store = MemoryStore::new();
        store.put("shelters", record("1", "first")).await.unwrap();
        store.put("shelters", record("2", "second")).await.unwrap();

        let records = store.scan("shelters", None).await.unwrap();
        assert_eq!(2, records.len());
        assert_eq!(Some(&AttributeValue::S("1".to_string())), records[0].get("shelterId"));
        assert_eq!(Some(&AttributeValue::S("2".to_string())), records[1].get("shelterId"));
    }

    #[tokio::test]
    async fn test_scan_with_filter() {
        let store = MemoryStore::new();
        store.put("shelters", record("1", "first")).await.unwrap();
        store.put("shelters", record("2", "second")).await.unwrap();

        let filter = ScanFilter {
            attribute: "shelterId".to_string(),
            value: AttributeValue::S("2".to_string()),
        };
        let records = store.scan("shelters", Some(filter)).await.unwrap();
        assert_eq!(1, records.len());
        assert_eq!(Some(&AttributeValue::S("second".to_string())), records[0].get("name"));
    }

    #[tokio::test]
    async fn test_delete_existing_and_missing() {
        let store = MemoryStore::new();
        store.put("shelters", record("1", "first")).await.unwrap();

        store.delete("shelters", Key::string("shelterId", "1")).await.unwrap();
        assert!(store.records("shelters").is_empty());

        assert_eq!(
            Err(StoreError::ConditionFailed),
            store.delete("shelters", Key::string("shelterId", "1")).await
        );
    }

    #[tokio::test]
    async fn test_update_applies_dotted_paths() {
        let store = MemoryStore::new();
        let mut stored = record("1", "first");
        stored.insert(
            "address".to_string(),
            AttributeValue::M(collections::HashMap::from([(
                "city".to_string(),
                AttributeValue::S("Boston".to_string()),
            )])),
        );
        store.put("shelters", stored).await.unwrap();

        store
            .update(
                "shelters",
                Key::string("shelterId", "1"),
                vec!["name".to_string(), "address.city".to_string()],
                vec![
                    AttributeValue::S("renamed".to_string()),
                    AttributeValue::S("Cambridge".to_string()),
                ],
            )
            .await
            .unwrap();

        let records = store.records("shelters");
        assert_eq!(Some(&AttributeValue::S("renamed".to_string())), records[0].get("name"));
        let AttributeValue::M(address) = records[0].get("address").unwrap() else {
            panic!("address is not a map");
        };
        assert_eq!(Some(&AttributeValue::S("Cambridge".to_string())), address.get("city"));
        assert_eq!(1, store.update_calls());
    }

    #[tokio::test]
    async fn test_update_descends_into_null_marked_days() {
        let store = MemoryStore::new();
        let mut stored = record("1", "first");
        stored.insert(
            "hours".to_string(),
            AttributeValue::M(collections::HashMap::from([(
                "Tuesday".to_string(),
                AttributeValue::Null(true),
            )])),
        );
        store.put("shelters", stored).await.unwrap();

        store
            .update(
                "shelters",
                Key::string("shelterId", "1"),
                vec!["hours.Tuesday.opening_time".to_string()],
                vec![AttributeValue::S("09:00".to_string())],
            )
            .await
            .unwrap();

        let records = store.records("shelters");
        let AttributeValue::M(hours) = records[0].get("hours").unwrap() else {
            panic!("hours is not a map");
        };
        let AttributeValue::M(tuesday) = hours.get("Tuesday").unwrap() else {
            panic!("Tuesday was not replaced by a map");
        };
        assert_eq!(Some(&AttributeValue::S("09:00".to_string())), tuesday.get("opening_time"));
    }

    #[tokio::test]
    async fn test_get_highest_id() {
        let store = MemoryStore::new();
        assert_eq!(None, store.get_highest_id("shelters", "shelterId").await.unwrap());

        store.put("shelters", record("3", "third")).await.unwrap();
        store.put("shelters", record("11", "eleventh")).await.unwrap();
        assert_eq!(Some(11), store.get_highest_id("shelters", "shelterId").await.unwrap());
    }
}
