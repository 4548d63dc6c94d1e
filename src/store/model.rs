//! Entities read from and written to the external stores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A document-store record
///
/// Every field is optional because the store is schemaless; absent fields
/// are omitted from the JSON rendering.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<i64>,
}

impl Record {
    pub fn new(created_at: DateTime<Utc>, key: impl Into<String>, total_count: i64) -> Self {
        Self {
            created_at: Some(created_at),
            key: Some(key.into()),
            total_count: Some(total_count),
        }
    }
}

/// A key-value pair held by the key-value store
///
/// Used both as the `/memory` POST body and as its success response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub key: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
}

impl MemoryEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Deserialize `null` as the type's default value
///
/// Pair with `#[serde(default)]` so an absent field and an explicit `null`
/// decode the same way.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_record_serializes_camel_case() {
        let created = Utc.with_ymd_and_hms(2016, 12, 13, 17, 8, 55).unwrap();
        let record = Record::new(created, "TAKwGc6Jr4i8Z487", 170);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["createdAt"], "2016-12-13T17:08:55Z");
        assert_eq!(json["key"], "TAKwGc6Jr4i8Z487");
        assert_eq!(json["totalCount"], 170);
    }

    #[test]
    fn test_record_omits_missing_fields() {
        let record = Record {
            key: Some("only-key".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, json!({"key": "only-key"}));
    }

    #[test]
    fn test_memory_entry_value_defaults_to_empty() {
        let entry: MemoryEntry = serde_json::from_value(json!({"key": "a"})).unwrap();
        assert_eq!(entry, MemoryEntry::new("a", ""));
    }

    #[test]
    fn test_memory_entry_null_value_is_empty() {
        let entry: MemoryEntry =
            serde_json::from_value(json!({"key": "a", "value": null})).unwrap();
        assert_eq!(entry, MemoryEntry::new("a", ""));
    }

    #[test]
    fn test_memory_entry_requires_key() {
        let result = serde_json::from_value::<MemoryEntry>(json!({"value": "v"}));
        assert!(result.is_err());
    }
}
