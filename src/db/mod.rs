// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Document store layer (Firestore, or in-memory for offline use and tests).

pub mod firestore;
pub mod health_data;
pub mod memory;

pub use firestore::FirestoreDb;
pub use health_data::HealthData;
pub use memory::MemoryStore;

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;

/// Collection names as constants.
pub mod collections {
    /// User profiles (keyed by uid)
    pub const USERS: &str = "users";
    pub const VITALS: &str = "vitals";
    pub const CALORIES: &str = "calories";
    pub const MEDICAL_REPORTS: &str = "medical_reports";
}

/// Auto-generated document identifier.
pub type RecordId = String;

/// Generate a new record id (20 hex chars, like the store's own auto-ids).
pub fn new_record_id() -> RecordId {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(20);
    id
}

/// Equality filter on a string field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    pub field: String,
    pub value: String,
}

impl FieldFilter {
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Sort order for a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Descending,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Ascending,
        }
    }
}

/// Schemaless document store with per-collection create and filtered queries.
///
/// Records are never updated or deleted through this interface; `merge` exists
/// only for documents keyed by a known id (the user profile).
pub trait DocumentStore: Send + Sync + 'static {
    /// Store a new document under a generated id.
    fn create<T>(&self, collection: &str, record: &T) -> impl Future<Output = Result<RecordId>> + Send
    where
        T: Serialize + DeserializeOwned + Send + Sync;

    /// All documents matching every filter, optionally sorted.
    fn query<T>(
        &self,
        collection: &str,
        filters: &[FieldFilter],
        order_by: Option<OrderBy>,
    ) -> impl Future<Output = Result<Vec<T>>> + Send
    where
        T: DeserializeOwned + Send;

    /// Fetch a document by id.
    fn get<T>(&self, collection: &str, id: &str) -> impl Future<Output = Result<Option<T>>> + Send
    where
        T: DeserializeOwned + Send;

    /// Write the record's fields into the document, creating it if needed and
    /// leaving other fields untouched.
    fn merge<T>(&self, collection: &str, id: &str, record: &T) -> impl Future<Output = Result<()>> + Send
    where
        T: Serialize + DeserializeOwned + Send + Sync;
}

/// Top-level field names of a record, used as the merge mask.
pub(crate) fn field_names<T: Serialize>(record: &T) -> Result<Vec<String>> {
    match serde_json::to_value(record).map_err(anyhow::Error::from)? {
        serde_json::Value::Object(map) => Ok(map.keys().cloned().collect()),
        _ => Err(anyhow::anyhow!("Record does not serialize to an object").into()),
    }
}
