// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper implementing [`DocumentStore`].
//!
//! The client authenticates as the signed-in user: every request carries the
//! session's ID token, so the project's security rules see the same uid the
//! records are scoped by.

use crate::db::{field_names, new_record_id, Direction, DocumentStore, FieldFilter, OrderBy, RecordId};
use crate::error::{AppError, Result};
use crate::models::Session;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Connect to Firestore as the session's user.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn connect(project_id: &str, session: &Session) -> Result<Self> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let id_token = session.id_token.clone();
        let expiry = session.expires_at;
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(move || {
            let id_token = id_token.clone();
            async move {
                Ok(gcloud_sdk::Token {
                    token_type: "Bearer".to_string(),
                    token: gcloud_sdk::SecretValue::new(id_token.into()),
                    expiry,
                })
            }
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, uid = %session.uid, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }
}

impl From<Direction> for firestore::FirestoreQueryDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Ascending => firestore::FirestoreQueryDirection::Ascending,
            Direction::Descending => firestore::FirestoreQueryDirection::Descending,
        }
    }
}

impl DocumentStore for FirestoreDb {
    async fn create<T>(&self, collection: &str, record: &T) -> Result<RecordId>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        let id = new_record_id();

        let _: () = self
            .get_client()?
            .fluent()
            .insert()
            .into(collection)
            .document_id(&id)
            .object(record)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::debug!(collection, id = %id, "Document created");
        Ok(id)
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
        let query = self
            .get_client()?
            .fluent()
            .select()
            .from(collection);

        let query = if filters.is_empty() {
            query
        } else {
            let filters = filters.to_vec();
            query.filter(move |q| {
                q.for_all(
                    filters
                        .iter()
                        .map(|f| q.field(f.field.as_str()).eq(f.value.clone())),
                )
            })
        };

        let query = match order_by {
            Some(order) => query.order_by([(
                order.field.as_str(),
                firestore::FirestoreQueryDirection::from(order.direction),
            )]),
            None => query,
        };

        let records: Vec<T> = query
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::debug!(collection, count = records.len(), "Query complete");
        Ok(records)
    }

    async fn get<T>(&self, collection: &str, id: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collection)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn merge<T>(&self, collection: &str, id: &str, record: &T) -> Result<()>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        let fields = field_names(record)?;

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(fields)
            .in_col(collection)
            .document_id(id)
            .object(record)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
