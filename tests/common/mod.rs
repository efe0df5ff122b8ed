// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use chrono::{DateTime, FixedOffset, Utc};
use dashmap::DashMap;
use health_tracker::db::{DocumentStore, FieldFilter, FirestoreDb, MemoryStore, OrderBy, RecordId};
use health_tracker::error::{AppError, Result};
use health_tracker::models::{FoodItem, Session};
use health_tracker::services::{
    AnnotateResponse, BlobHandle, BlobStore, FeatureMode, FoodSearch, IdentityProvider,
    TextAnnotator,
};
use health_tracker::shell::{Backend, SessionClients};
use health_tracker::time_utils::Clock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection as `session`'s user.
#[allow(dead_code)]
pub async fn test_db(session: &Session) -> FirestoreDb {
    FirestoreDb::connect("demo-health-tracker", session)
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Parse an RFC3339 timestamp.
#[allow(dead_code)]
pub fn parse_time(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .expect("valid RFC3339")
        .with_timezone(&Utc)
}

/// US Pacific daylight time.
#[allow(dead_code)]
pub fn pacific() -> FixedOffset {
    FixedOffset::west_opt(7 * 3600).unwrap()
}

/// 10:00 local on Monday Oct 19 2026, Pacific.
#[allow(dead_code)]
pub fn fixed_clock() -> Clock {
    Clock::fixed(parse_time("2026-10-19T17:00:00Z"), pacific())
}

/// Calendar-day string of [`fixed_clock`]'s today.
#[allow(dead_code)]
pub const TODAY: &str = "Mon Oct 19 2026";

/// Session with an unsigned-but-decodable ID token for `uid`.
#[allow(dead_code)]
pub fn session_for(uid: &str) -> Session {
    let claims = serde_json::json!({
        "sub": uid,
        "exp": 4_102_444_800i64,
        "email": format!("{}@example.com", uid),
    });
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(b"test-secret"),
    )
    .unwrap();
    Session::from_tokens(&token, &format!("refresh-{}", uid)).unwrap()
}

#[allow(dead_code)]
pub fn food(id: u64, name: &str, calories: f64) -> FoodItem {
    FoodItem {
        id,
        name: name.to_string(),
        calories,
        protein: 1.0,
        carbs: 2.0,
        fat: 0.5,
        fiber: 0.0,
        sugar: 0.0,
    }
}

// ─── Identity ────────────────────────────────────────────────────────────────

/// Accounts kept in memory; passwords compared in plain text.
#[derive(Default)]
pub struct FakeIdentity {
    accounts: Mutex<HashMap<String, String>>,
    current: Mutex<Option<Session>>,
    pub refreshes: AtomicUsize,
}

#[allow(dead_code)]
impl FakeIdentity {
    pub fn with_account(email: &str, password: &str) -> Self {
        let identity = Self::default();
        identity
            .accounts
            .lock()
            .unwrap()
            .insert(email.to_string(), password.to_string());
        identity
    }

    pub fn set_current(&self, session: Option<Session>) {
        *self.current.lock().unwrap() = session;
    }

    fn signed_in(&self, email: &str) -> Session {
        let uid = email.split('@').next().unwrap_or(email);
        let session = session_for(uid);
        self.set_current(Some(session.clone()));
        session
    }
}

impl IdentityProvider for FakeIdentity {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Session> {
        {
            let mut accounts = self.accounts.lock().unwrap();
            if accounts.contains_key(email) {
                return Err(AppError::Auth(
                    "The email address is already in use by another account.".to_string(),
                ));
            }
            accounts.insert(email.to_string(), password.to_string());
        }
        Ok(self.signed_in(email))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let known = self.accounts.lock().unwrap().get(email).cloned();
        match known {
            Some(stored) if stored == password => Ok(self.signed_in(email)),
            _ => Err(AppError::Auth("Incorrect email or password.".to_string())),
        }
    }

    fn current_session(&self) -> Option<Session> {
        self.current.lock().unwrap().clone()
    }

    async fn refresh(&self, session: &Session) -> Result<Session> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        let refreshed = session_for(&session.uid);
        self.set_current(Some(refreshed.clone()));
        Ok(refreshed)
    }

    fn sign_out(&self) {
        self.set_current(None);
    }
}

// ─── Blob store ──────────────────────────────────────────────────────────────

/// Uploads kept in memory, keyed by path.
#[derive(Default)]
pub struct FakeBlobs {
    pub objects: DashMap<String, (Vec<u8>, String)>,
    pub fail_uploads: bool,
}

#[allow(dead_code)]
impl FakeBlobs {
    pub fn failing() -> Self {
        Self {
            fail_uploads: true,
            ..Self::default()
        }
    }
}

impl BlobStore for FakeBlobs {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<BlobHandle> {
        if self.fail_uploads {
            return Err(AppError::Storage("quota exceeded".to_string()));
        }
        self.objects
            .insert(path.to_string(), (bytes, content_type.to_string()));
        Ok(BlobHandle {
            bucket: "test-bucket".to_string(),
            name: path.to_string(),
            download_tokens: Some("tok".to_string()),
        })
    }

    fn url(&self, handle: &BlobHandle) -> Result<String> {
        Ok(format!("https://blobs.test/{}?token=tok", handle.name))
    }
}

// ─── Food search ─────────────────────────────────────────────────────────────

/// Canned search results per query. Queries listed in `held` wait for
/// `release` before answering.
#[derive(Default)]
pub struct FakeFoods {
    pub results: DashMap<String, Vec<FoodItem>>,
    pub held: DashMap<String, Arc<Notify>>,
    pub calls: AtomicUsize,
}

#[allow(dead_code)]
impl FakeFoods {
    pub fn with(query: &str, items: Vec<FoodItem>) -> Self {
        let foods = Self::default();
        foods.results.insert(query.to_string(), items);
        foods
    }

    /// Make `query` block until [`FakeFoods::release`].
    pub fn hold(&self, query: &str) {
        self.held.insert(query.to_string(), Arc::new(Notify::new()));
    }

    pub fn release(&self, query: &str) {
        if let Some(gate) = self.held.get(query) {
            gate.notify_one();
        }
    }
}

impl FoodSearch for FakeFoods {
    async fn search(&self, text: &str) -> Result<Vec<FoodItem>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.held.get(text).map(|g| g.clone());
        if let Some(gate) = gate {
            gate.notified().await;
        }
        Ok(self
            .results
            .get(text)
            .map(|items| items.clone())
            .unwrap_or_default())
    }
}

// ─── Text recognition ────────────────────────────────────────────────────────

/// Returns fixed text per mode and counts calls per mode.
#[derive(Default)]
pub struct FakeAnnotator {
    pub document_text: String,
    pub sparse_text: String,
    pub error: Option<String>,
    pub document_calls: AtomicUsize,
    pub sparse_calls: AtomicUsize,
}

#[allow(dead_code)]
impl FakeAnnotator {
    pub fn new(document_text: &str, sparse_text: &str) -> Self {
        Self {
            document_text: document_text.to_string(),
            sparse_text: sparse_text.to_string(),
            ..Self::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Self::default()
        }
    }
}

impl TextAnnotator for FakeAnnotator {
    async fn annotate(&self, _image: &[u8], mode: FeatureMode) -> Result<AnnotateResponse> {
        if let Some(message) = &self.error {
            return Err(AppError::Network(message.clone()));
        }
        let body = match mode {
            FeatureMode::Document => {
                self.document_calls.fetch_add(1, Ordering::SeqCst);
                serde_json::json!({ "fullTextAnnotation": { "text": self.document_text } })
            }
            FeatureMode::Sparse => {
                self.sparse_calls.fetch_add(1, Ordering::SeqCst);
                serde_json::json!({ "textAnnotations": [{ "description": self.sparse_text }] })
            }
        };
        Ok(serde_json::from_value(body).unwrap())
    }
}

// ─── Document store ──────────────────────────────────────────────────────────

/// In-memory store whose writes or reads can be held open mid-flight.
///
/// A held `create` waits before writing; a held `query` waits after taking its
/// snapshot. `waiting` is signalled whenever an operation reaches a held gate.
#[allow(dead_code)]
#[derive(Default)]
pub struct GatedStore {
    pub inner: MemoryStore,
    create_gate: Mutex<Option<Arc<Notify>>>,
    query_gate: Mutex<Option<Arc<Notify>>>,
    pub waiting: Notify,
}

#[allow(dead_code)]
impl GatedStore {
    pub fn hold_creates(&self) {
        *self.create_gate.lock().unwrap() = Some(Arc::new(Notify::new()));
    }

    pub fn release_creates(&self) {
        if let Some(gate) = self.create_gate.lock().unwrap().take() {
            gate.notify_one();
        }
    }

    pub fn hold_queries(&self) {
        *self.query_gate.lock().unwrap() = Some(Arc::new(Notify::new()));
    }

    pub fn release_queries(&self) {
        if let Some(gate) = self.query_gate.lock().unwrap().take() {
            gate.notify_one();
        }
    }

    async fn pass(&self, gate: &Mutex<Option<Arc<Notify>>>) {
        let held = gate.lock().unwrap().clone();
        if let Some(gate) = held {
            self.waiting.notify_one();
            gate.notified().await;
        }
    }
}

impl DocumentStore for GatedStore {
    async fn create<T>(&self, collection: &str, record: &T) -> Result<RecordId>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        self.pass(&self.create_gate).await;
        self.inner.create(collection, record).await
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
        let docs = self.inner.query(collection, filters, order_by).await?;
        self.pass(&self.query_gate).await;
        Ok(docs)
    }

    async fn get<T>(&self, collection: &str, id: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        self.inner.get(collection, id).await
    }

    async fn merge<T>(&self, collection: &str, id: &str, record: &T) -> Result<()>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        self.inner.merge(collection, id, record).await
    }
}

/// Wait for a background write to land in `collection`.
#[allow(dead_code)]
pub async fn wait_for_count(store: &MemoryStore, collection: &str, count: usize) {
    tokio::time::timeout(std::time::Duration::from_secs(2), async {
        while store.count(collection) < count {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("write never reached the store");
}

// ─── Backend ─────────────────────────────────────────────────────────────────

/// In-process backend sharing one [`MemoryStore`] across sessions.
#[derive(Default)]
pub struct TestBackend {
    pub identity: Arc<FakeIdentity>,
    pub store: Arc<MemoryStore>,
    pub blobs: Arc<FakeBlobs>,
    pub foods: Arc<FakeFoods>,
    pub annotator: Arc<FakeAnnotator>,
    pub connects: AtomicUsize,
}

impl Backend for TestBackend {
    type Identity = FakeIdentity;
    type Store = MemoryStore;
    type Blobs = FakeBlobs;
    type Foods = FakeFoods;
    type Annotator = FakeAnnotator;

    fn identity(&self) -> Arc<FakeIdentity> {
        self.identity.clone()
    }

    fn foods(&self) -> Arc<FakeFoods> {
        self.foods.clone()
    }

    fn annotator(&self) -> Arc<FakeAnnotator> {
        self.annotator.clone()
    }

    async fn connect(&self, _session: &Session) -> Result<SessionClients<MemoryStore, FakeBlobs>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(SessionClients {
            store: self.store.clone(),
            blobs: self.blobs.clone(),
        })
    }
}
