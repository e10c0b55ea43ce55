//! Persistent key/value store for cached fetch responses
//!
//! This module defines the `Store` trait that the cache layer talks to, the
//! `CacheRecord` type persisted per URL, and a flat-file implementation that
//! keeps the whole mapping in a single JSON document on disk.

mod flat;

pub use flat::FlatStore;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::io;

/// A cached fetch response persisted for one URL
///
/// Both fields are always written by this crate. They are optional so that
/// records produced by other writers of the same file (or edited by hand)
/// still load, and can then be recognized as malformed and evicted by the
/// next sweep instead of poisoning the whole store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheRecord {
    /// When the response was fetched, in epoch milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
    /// The parsed JSON body of the response
    ///
    /// A body of JSON `null` is a present body; only a missing `body` key
    /// makes the record malformed.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "body_present"
    )]
    pub body: Option<Value>,
}

/// Distinguishes a `body` key holding JSON `null` from an absent `body` key
fn body_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl CacheRecord {
    /// Creates a well-formed record from a fetch timestamp and parsed body
    pub fn new(timestamp: u64, body: Value) -> Self {
        Self {
            timestamp: Some(timestamp),
            body: Some(body),
        }
    }

    /// Returns `true` if the record is missing its timestamp or body
    pub fn is_malformed(&self) -> bool {
        self.timestamp.is_none() || self.body.is_none()
    }
}

/// Durable key/value storage for cache records
///
/// Keys are exact, case-sensitive URL strings. Implementations persist the
/// mapping across process runs; `save` is the durable flush the cache layer
/// calls after every mutation.
pub trait Store {
    /// Returns the record for `key`, if present
    fn get(&self, key: &str) -> Option<CacheRecord>;

    /// Inserts or replaces the record for `key`
    fn set(&mut self, key: &str, record: CacheRecord);

    /// Removes the record for `key`, if present
    fn remove(&mut self, key: &str);

    /// Returns a snapshot of every (key, record) pair
    ///
    /// The snapshot is owned, so callers may delete entries while walking it.
    fn entries(&self) -> Vec<(String, CacheRecord)>;

    /// Flushes the current contents to durable storage
    fn save(&self) -> io::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_with_both_fields_is_well_formed() {
        let record = CacheRecord::new(1_700_000_000_000, json!({"k": 1}));
        assert!(!record.is_malformed());
    }

    #[test]
    fn test_record_missing_body_is_malformed() {
        let record = CacheRecord {
            timestamp: Some(1_700_000_000_000),
            body: None,
        };
        assert!(record.is_malformed());
    }

    #[test]
    fn test_record_missing_timestamp_is_malformed() {
        let record = CacheRecord {
            timestamp: None,
            body: Some(json!([1, 2, 3])),
        };
        assert!(record.is_malformed());
    }

    #[test]
    fn test_record_deserializes_without_optional_fields() {
        let record: CacheRecord =
            serde_json::from_str(r#"{"timestamp": 123}"#).expect("Should deserialize");
        assert_eq!(record.timestamp, Some(123));
        assert!(record.body.is_none());
        assert!(record.is_malformed());
    }

    #[test]
    fn test_record_serializes_as_flat_object() {
        let record = CacheRecord::new(42, json!({"a": true}));
        let json = serde_json::to_string(&record).expect("Should serialize");
        assert_eq!(json, r#"{"timestamp":42,"body":{"a":true}}"#);
    }

    #[test]
    fn test_null_body_is_present_not_missing() {
        let record: CacheRecord =
            serde_json::from_str(r#"{"timestamp": 1, "body": null}"#).expect("Should deserialize");
        assert_eq!(record.body, Some(Value::Null));
        assert!(!record.is_malformed());
    }

    #[test]
    fn test_record_ignores_unknown_fields() {
        let record: CacheRecord =
            serde_json::from_str(r#"{"timestamp": 1, "body": null, "etag": "abc"}"#)
                .expect("Should deserialize");
        assert_eq!(record.timestamp, Some(1));
        assert_eq!(record.body, Some(Value::Null));
    }
}
