// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process document store.
//!
//! Documents are held as JSON values, so records go through the same serde
//! round trip as with Firestore. Used for offline mode and in tests.

use crate::db::{new_record_id, Direction, DocumentStore, FieldFilter, OrderBy, RecordId};
use crate::error::{AppError, Result};
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;

/// Thread-safe in-memory document store.
#[derive(Default)]
pub struct MemoryStore {
    /// Documents per collection, in insertion order
    collections: DashMap<String, Vec<(RecordId, Value)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .get(collection)
            .map(|docs| docs.len())
            .unwrap_or(0)
    }

    /// Raw JSON of a document, for assertions on stored shapes.
    pub fn raw(&self, collection: &str, id: &str) -> Option<Value> {
        self.collections.get(collection).and_then(|docs| {
            docs.iter()
                .find(|(doc_id, _)| doc_id == id)
                .map(|(_, value)| value.clone())
        })
    }

    /// Insert a raw document, as another client might have written it.
    pub fn insert_raw(&self, collection: &str, value: Value) -> RecordId {
        let id = new_record_id();
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push((id.clone(), value));
        id
    }
}

fn to_value<T: Serialize>(record: &T) -> Result<Value> {
    serde_json::to_value(record).map_err(|e| AppError::Database(format!("Serialize failed: {}", e)))
}

fn from_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| AppError::Database(format!("Deserialize failed: {}", e)))
}

fn matches(doc: &Value, filters: &[FieldFilter]) -> bool {
    filters
        .iter()
        .all(|f| doc.get(&f.field).and_then(Value::as_str) == Some(f.value.as_str()))
}

/// Order two field values: missing first, then numbers, then strings.
fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match (a, b) {
            (Value::Number(x), Value::Number(y)) => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(Ordering::Equal),
            (Value::Number(_), _) => Ordering::Less,
            (_, Value::Number(_)) => Ordering::Greater,
            (Value::String(x), Value::String(y)) => x.cmp(y),
            _ => Ordering::Equal,
        },
    }
}

impl DocumentStore for MemoryStore {
    async fn create<T>(&self, collection: &str, record: &T) -> Result<RecordId>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        let value = to_value(record)?;
        Ok(self.insert_raw(collection, value))
    }

    async fn query<T>(
        &self,
        collection: &str,
        filters: &[FieldFilter],
        order_by: Option<OrderBy>,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send,
    {
        let mut docs: Vec<Value> = self
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, doc)| matches(doc, filters))
                    .map(|(_, doc)| doc.clone())
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = order_by {
            docs.sort_by(|a, b| {
                let ordering = compare_fields(a.get(&order.field), b.get(&order.field));
                match order.direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }

        docs.into_iter().map(from_value).collect()
    }

    async fn get<T>(&self, collection: &str, id: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        self.raw(collection, id).map(from_value).transpose()
    }

    async fn merge<T>(&self, collection: &str, id: &str, record: &T) -> Result<()>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        let Value::Object(fields) = to_value(record)? else {
            return Err(AppError::Database(
                "Merged record must be an object".to_string(),
            ));
        };

        let mut docs = self.collections.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|(doc_id, _)| doc_id == id) {
            Some((_, Value::Object(existing))) => existing.extend(fields),
            Some((_, existing)) => *existing = Value::Object(fields),
            None => docs.push((id.to_string(), Value::Object(fields))),
        }
        Ok(())
    }
}
