//! # Record Range Filter
//!
//! The compound filter used by `/db` queries:
//!
//! ```text
//! minCount <= totalCount <= maxCount  AND  startTime <= createdAt <= endTime
//! ```
//!
//! Both dimensions are inclusive on both ends. The filter renders to a BSON
//! query document for MongoDB and can also be evaluated in-process against a
//! [`Record`], which is how the in-memory document store applies it.

use bson::{doc, Bson, Document};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::model::Record;

/// Layout accepted for `startDate` / `endDate`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// How `createdAt` bounds are rendered into the store query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatedAtEncoding {
    /// Compare as BSON datetimes (chronological)
    #[default]
    Native,

    /// Compare against `YYYY-MM-DD HH:MM:SS +0000 UTC` strings, for
    /// collections whose `createdAt` was stored in that textual form.
    /// Ordering is lexicographic.
    LegacyString,
}

impl CreatedAtEncoding {
    fn bound(&self, at: &DateTime<Utc>) -> Bson {
        match self {
            CreatedAtEncoding::Native => Bson::DateTime(bson::DateTime::from_chrono(*at)),
            CreatedAtEncoding::LegacyString => Bson::String(legacy_timestamp(at)),
        }
    }
}

/// Legacy textual timestamp, e.g. `2016-01-26 00:00:00 +0000 UTC`
pub fn legacy_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S +0000 UTC").to_string()
}

/// Parse a `YYYY-MM-DD` date into midnight UTC of that day
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .ok()?
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
}

/// Inclusive range filter over `createdAt` and `totalCount`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFilter {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub min_count: i64,
    pub max_count: i64,
}

impl RecordFilter {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, min_count: i64, max_count: i64) -> Self {
        Self {
            start,
            end,
            min_count,
            max_count,
        }
    }

    /// Render as a MongoDB query document
    pub fn to_document(&self, encoding: CreatedAtEncoding) -> Document {
        doc! {
            "$and": [
                { "totalCount": { "$gte": self.min_count } },
                { "totalCount": { "$lte": self.max_count } },
                { "createdAt": { "$gte": encoding.bound(&self.start) } },
                { "createdAt": { "$lte": encoding.bound(&self.end) } },
            ]
        }
    }

    /// Check if a record falls inside both ranges
    ///
    /// A record missing either field never matches, as with a store-side
    /// range comparison on an absent field.
    pub fn matches(&self, record: &Record) -> bool {
        let count_ok = record
            .total_count
            .is_some_and(|c| c >= self.min_count && c <= self.max_count);
        let time_ok = record
            .created_at
            .is_some_and(|t| t >= self.start && t <= self.end);

        count_ok && time_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn filter() -> RecordFilter {
        RecordFilter::new(day(2016, 1, 26), day(2018, 2, 2), 2700, 3000)
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2016-01-26"), Some(day(2016, 1, 26)));
        assert_eq!(parse_date("2023-13-40"), None);
        assert_eq!(parse_date("26-01-2016"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_bounds_inclusive() {
        let f = filter();

        assert!(f.matches(&Record::new(day(2016, 1, 26), "a", 2700)));
        assert!(f.matches(&Record::new(day(2018, 2, 2), "b", 3000)));
        assert!(!f.matches(&Record::new(day(2016, 1, 25), "c", 2800)));
        assert!(!f.matches(&Record::new(day(2017, 1, 1), "d", 3001)));
        assert!(!f.matches(&Record::new(day(2017, 1, 1), "e", 2699)));
    }

    #[test]
    fn test_missing_fields_never_match() {
        let f = filter();
        let record = Record {
            created_at: Some(day(2017, 1, 1)),
            key: None,
            total_count: None,
        };
        assert!(!f.matches(&record));
    }

    #[test]
    fn test_native_document() {
        let document = filter().to_document(CreatedAtEncoding::Native);
        let clauses = document.get_array("$and").unwrap();

        assert_eq!(clauses.len(), 4);
        let start = clauses[2].as_document().unwrap();
        let bound = start.get_document("createdAt").unwrap().get("$gte").unwrap();
        assert_eq!(
            bound,
            &Bson::DateTime(bson::DateTime::from_chrono(day(2016, 1, 26)))
        );
    }

    #[test]
    fn test_legacy_string_document() {
        let document = filter().to_document(CreatedAtEncoding::LegacyString);
        let clauses = document.get_array("$and").unwrap();

        let end = clauses[3].as_document().unwrap();
        let bound = end.get_document("createdAt").unwrap().get_str("$lte").unwrap();
        assert_eq!(bound, "2018-02-02 00:00:00 +0000 UTC");
    }

    #[test]
    fn test_count_bounds_in_document() {
        let document = filter().to_document(CreatedAtEncoding::Native);
        let clauses = document.get_array("$and").unwrap();

        let min = clauses[0].as_document().unwrap();
        assert_eq!(
            min.get_document("totalCount").unwrap().get_i64("$gte").unwrap(),
            2700
        );
    }
}
