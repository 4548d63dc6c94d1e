//! # MongoDB Document Store
//!
//! Runs [`RecordFilter`] queries against one collection. A single deadline
//! covers the connectivity check, the find and the cursor drain; exceeding
//! it yields `StoreError::Timeout`. The client pools its connections and the
//! cursor is released when it drops, on success and on every error path.

use std::time::Duration;

use async_trait::async_trait;
use bson::{Bson, Document};
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::{Client, Collection};

use super::document::DocumentStore;
use super::error::{StoreError, StoreResult};
use super::filter::{CreatedAtEncoding, RecordFilter};
use super::model::Record;

const STORE_NAME: &str = "document store";

/// Connection settings for [`MongoDocumentStore`]
#[derive(Debug, Clone)]
pub struct MongoSettings {
    pub uri: String,
    pub database: String,
    pub collection: String,
    pub timeout: Duration,
    pub created_at_encoding: CreatedAtEncoding,
}

pub struct MongoDocumentStore {
    client: Client,
    collection: Collection<Document>,
    settings: MongoSettings,
}

impl MongoDocumentStore {
    /// Build a client for `settings.uri`
    ///
    /// Server connections are established lazily by the driver; this only
    /// parses the URI (resolving SRV records when present).
    pub async fn connect(settings: MongoSettings) -> StoreResult<Self> {
        let client = tokio::time::timeout(settings.timeout, Client::with_uri_str(&settings.uri))
            .await
            .map_err(|_| timeout(settings.timeout))?
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let collection = client
            .database(&settings.database)
            .collection::<Document>(&settings.collection);

        tracing::info!(
            database = %settings.database,
            collection = %settings.collection,
            encoding = ?settings.created_at_encoding,
            "document store client ready"
        );

        Ok(Self {
            client,
            collection,
            settings,
        })
    }

    async fn run_query(&self, filter: &RecordFilter) -> StoreResult<Vec<Record>> {
        self.client
            .database(&self.settings.database)
            .run_command(bson::doc! { "ping": 1 }, None)
            .await?;

        let query = filter.to_document(self.settings.created_at_encoding);
        let mut cursor = self.collection.find(query, None).await?;

        let mut records = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            records.push(decode_record(document)?);
        }
        Ok(records)
    }
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    async fn query(&self, filter: &RecordFilter) -> StoreResult<Vec<Record>> {
        tokio::time::timeout(self.settings.timeout, self.run_query(filter))
            .await
            .map_err(|_| timeout(self.settings.timeout))?
    }

    async fn close(&self) -> StoreResult<()> {
        tokio::time::timeout(self.settings.timeout, self.client.clone().shutdown())
            .await
            .map_err(|_| {
                StoreError::Shutdown(format!(
                    "client did not shut down within {}ms",
                    self.settings.timeout.as_millis()
                ))
            })
    }
}

fn timeout(after: Duration) -> StoreError {
    StoreError::Timeout {
        store: STORE_NAME,
        after,
    }
}

/// Decode one stored document into a [`Record`]
///
/// Absent or null fields become `None`; a field of the wrong type is a
/// decode error.
fn decode_record(document: Document) -> StoreResult<Record> {
    let created_at = match document.get("createdAt") {
        None | Some(Bson::Null) => None,
        Some(Bson::DateTime(at)) => Some(at.to_chrono()),
        Some(Bson::String(text)) => Some(parse_stored_timestamp(text).ok_or_else(|| {
            StoreError::Decode(format!("unrecognised createdAt timestamp '{}'", text))
        })?),
        Some(other) => {
            return Err(StoreError::Decode(format!(
                "createdAt has unexpected type {:?}",
                other.element_type()
            )))
        }
    };

    let key = match document.get("key") {
        None | Some(Bson::Null) => None,
        Some(Bson::String(key)) => Some(key.clone()),
        Some(other) => {
            return Err(StoreError::Decode(format!(
                "key has unexpected type {:?}",
                other.element_type()
            )))
        }
    };

    let total_count = match document.get("totalCount") {
        None | Some(Bson::Null) => None,
        Some(Bson::Int32(n)) => Some(i64::from(*n)),
        Some(Bson::Int64(n)) => Some(*n),
        Some(Bson::Double(n)) if n.fract() == 0.0 => Some(*n as i64),
        Some(other) => {
            return Err(StoreError::Decode(format!(
                "totalCount has unexpected value {}",
                other
            )))
        }
    };

    Ok(Record {
        created_at,
        key,
        total_count,
    })
}

/// Accepts RFC 3339 and the legacy `YYYY-MM-DD HH:MM:SS[.f] +0000 UTC` form
fn parse_stored_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Some(at.with_timezone(&Utc));
    }

    let trimmed = text.strip_suffix(" UTC").unwrap_or(text);
    DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f %z")
        .ok()
        .map(|at| at.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use chrono::TimeZone;

    #[test]
    fn test_decode_native_record() {
        let at = Utc.with_ymd_and_hms(2016, 12, 13, 17, 8, 55).unwrap();
        let document = doc! {
            "_id": "5ee21587e07f053f990ceafd",
            "createdAt": bson::DateTime::from_chrono(at),
            "key": "TAKwGc6Jr4i8Z487",
            "totalCount": 2892_i32,
        };

        let record = decode_record(document).unwrap();
        assert_eq!(record, Record::new(at, "TAKwGc6Jr4i8Z487", 2892));
    }

    #[test]
    fn test_decode_legacy_timestamp() {
        let document = doc! { "createdAt": "2016-01-26 00:00:00 +0000 UTC" };

        let record = decode_record(document).unwrap();
        assert_eq!(
            record.created_at,
            Some(Utc.with_ymd_and_hms(2016, 1, 26, 0, 0, 0).unwrap())
        );
        assert_eq!(record.key, None);
        assert_eq!(record.total_count, None);
    }

    #[test]
    fn test_decode_rejects_wrong_types() {
        assert!(matches!(
            decode_record(doc! { "key": 12 }),
            Err(StoreError::Decode(_))
        ));
        assert!(matches!(
            decode_record(doc! { "totalCount": "many" }),
            Err(StoreError::Decode(_))
        ));
        assert!(matches!(
            decode_record(doc! { "createdAt": "yesterday" }),
            Err(StoreError::Decode(_))
        ));
    }

    #[test]
    fn test_decode_integral_double_count() {
        let record = decode_record(doc! { "totalCount": 120.0 }).unwrap();
        assert_eq!(record.total_count, Some(120));
    }

    #[tokio::test]
    async fn test_unreachable_server_hits_deadline() {
        let settings = MongoSettings {
            uri: "mongodb://127.0.0.1:1".to_string(),
            database: "db".to_string(),
            collection: "records".to_string(),
            timeout: Duration::from_millis(300),
            created_at_encoding: CreatedAtEncoding::Native,
        };
        let store = MongoDocumentStore::connect(settings).await.unwrap();

        let day = Utc.with_ymd_and_hms(2017, 1, 1, 0, 0, 0).unwrap();
        let result = store.query(&RecordFilter::new(day, day, 0, 10)).await;

        assert_eq!(
            result,
            Err(StoreError::Timeout {
                store: "document store",
                after: Duration::from_millis(300),
            })
        );
    }

    #[tokio::test]
    async fn test_connect_rejects_malformed_uri() {
        let settings = MongoSettings {
            uri: "not-a-mongo-uri".to_string(),
            database: "db".to_string(),
            collection: "records".to_string(),
            timeout: Duration::from_secs(1),
            created_at_encoding: CreatedAtEncoding::Native,
        };

        let result = MongoDocumentStore::connect(settings).await;
        assert!(matches!(result, Err(StoreError::Connection(_))));
    }
}
