// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session-scoped data access with typed operations.
//!
//! Provides high-level operations for:
//! - Profile (the user's document in `users`)
//! - Vitals history
//! - Calorie log (per calendar day)
//! - Medical reports
//!
//! Every read is filtered by the session's uid and every write is stamped with
//! it. Query results are cached per session; writes invalidate the affected
//! entries, and screens can force a refetch with [`HealthData::invalidate`].
//!
//! Each cache slot carries a generation that every invalidation bumps. A read
//! only fills the slot if the generation it started under is still current, so
//! a query that overlapped a write never caches the pre-write snapshot.

use crate::db::{collections, DocumentStore, FieldFilter, OrderBy, RecordId};
use crate::error::Result;
use crate::models::{CalorieEntry, MedicalReport, Session, UserProfile, VitalsRecord};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Cache slots, one per distinct query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Profile,
    Vitals,
    /// Calorie log for one calendar-day string
    Calories(String),
    Reports,
}

#[derive(Clone)]
enum Cached {
    Profile(Option<UserProfile>),
    Vitals(Arc<Vec<VitalsRecord>>),
    Calories(Arc<Vec<CalorieEntry>>),
    Reports(Arc<Vec<MedicalReport>>),
}

#[derive(Default)]
struct Slot {
    generation: u64,
    value: Option<Cached>,
}

/// Cache generation observed when a read started.
#[derive(Clone, Copy, PartialEq, Eq)]
struct Stamp {
    epoch: u64,
    generation: u64,
}

/// Typed access to one user's records.
pub struct HealthData<S: DocumentStore> {
    store: Arc<S>,
    uid: String,
    cache: DashMap<CacheKey, Slot>,
    /// Bumped by `invalidate_all`, which also covers slots not yet created
    epoch: AtomicU64,
}

impl<S: DocumentStore> HealthData<S> {
    pub fn new(store: Arc<S>, session: &Session) -> Self {
        Self {
            store,
            uid: session.uid.clone(),
            cache: DashMap::new(),
            epoch: AtomicU64::new(0),
        }
    }

    /// The uid every record is scoped to.
    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Drop one cached query so the next read refetches.
    ///
    /// Reads already in flight for `key` will not cache their results.
    pub fn invalidate(&self, key: &CacheKey) {
        let mut slot = self.cache.entry(key.clone()).or_default();
        slot.generation += 1;
        slot.value = None;
    }

    /// Drop every cached query.
    pub fn invalidate_all(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        for mut slot in self.cache.iter_mut() {
            slot.generation += 1;
            slot.value = None;
        }
    }

    pub fn is_cached(&self, key: &CacheKey) -> bool {
        self.cache
            .get(key)
            .is_some_and(|slot| slot.value.is_some())
    }

    fn cached(&self, key: &CacheKey) -> Option<Cached> {
        self.cache.get(key).and_then(|slot| slot.value.clone())
    }

    fn stamp(&self, key: &CacheKey) -> Stamp {
        Stamp {
            epoch: self.epoch.load(Ordering::SeqCst),
            generation: self.cache.get(key).map_or(0, |slot| slot.generation),
        }
    }

    /// Cache a read's result unless `key` was invalidated since `started`.
    fn fill(&self, key: CacheKey, started: Stamp, value: Cached) {
        let mut slot = self.cache.entry(key).or_default();
        let current = Stamp {
            epoch: self.epoch.load(Ordering::SeqCst),
            generation: slot.generation,
        };
        if current == started {
            slot.value = Some(value);
        } else {
            tracing::debug!(uid = %self.uid, "Read overlapped a write; not cached");
        }
    }

    fn owner_filter(&self) -> FieldFilter {
        FieldFilter::eq("uid", self.uid.as_str())
    }

    // ─── Profile ─────────────────────────────────────────────────

    /// The user's profile document, if it has been saved before.
    pub async fn profile(&self) -> Result<Option<UserProfile>> {
        if let Some(Cached::Profile(profile)) = self.cached(&CacheKey::Profile) {
            return Ok(profile);
        }

        let started = self.stamp(&CacheKey::Profile);
        let profile: Option<UserProfile> = self.store.get(collections::USERS, &self.uid).await?;
        self.fill(CacheKey::Profile, started, Cached::Profile(profile.clone()));
        Ok(profile)
    }

    /// Merge the profile fields into the user's document (created if missing).
    pub async fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        self.store
            .merge(collections::USERS, &self.uid, profile)
            .await?;
        self.invalidate(&CacheKey::Profile);
        tracing::info!(uid = %self.uid, "Profile saved");
        Ok(())
    }

    // ─── Vitals ──────────────────────────────────────────────────

    /// Vitals history, newest first.
    pub async fn vitals(&self) -> Result<Arc<Vec<VitalsRecord>>> {
        if let Some(Cached::Vitals(vitals)) = self.cached(&CacheKey::Vitals) {
            return Ok(vitals);
        }

        let started = self.stamp(&CacheKey::Vitals);
        let vitals: Vec<VitalsRecord> = self
            .store
            .query(
                collections::VITALS,
                &[self.owner_filter()],
                Some(OrderBy::desc("timestamp")),
            )
            .await?;
        let vitals = Arc::new(vitals);
        self.fill(CacheKey::Vitals, started, Cached::Vitals(vitals.clone()));
        Ok(vitals)
    }

    /// Append a vitals record owned by this user.
    pub async fn add_vitals(&self, mut record: VitalsRecord) -> Result<RecordId> {
        record.uid = self.uid.clone();
        let id = self.store.create(collections::VITALS, &record).await?;
        self.invalidate(&CacheKey::Vitals);
        tracing::info!(uid = %self.uid, id = %id, "Vitals saved");
        Ok(id)
    }

    // ─── Calories ────────────────────────────────────────────────

    /// Calorie entries whose `date` equals `day` exactly.
    pub async fn calorie_log(&self, day: &str) -> Result<Arc<Vec<CalorieEntry>>> {
        let key = CacheKey::Calories(day.to_string());
        if let Some(Cached::Calories(entries)) = self.cached(&key) {
            return Ok(entries);
        }

        let started = self.stamp(&key);
        let entries: Vec<CalorieEntry> = self
            .store
            .query(
                collections::CALORIES,
                &[self.owner_filter(), FieldFilter::eq("date", day)],
                None,
            )
            .await?;
        let entries = Arc::new(entries);
        self.fill(key, started, Cached::Calories(entries.clone()));
        Ok(entries)
    }

    /// Append a calorie entry owned by this user.
    pub async fn log_calories(&self, mut entry: CalorieEntry) -> Result<RecordId> {
        entry.uid = self.uid.clone();
        let id = self.store.create(collections::CALORIES, &entry).await?;
        self.invalidate(&CacheKey::Calories(entry.date.clone()));
        tracing::info!(uid = %self.uid, id = %id, food = %entry.name, "Food logged");
        Ok(id)
    }

    // ─── Medical Reports ─────────────────────────────────────────

    /// Stored reports, newest first.
    pub async fn reports(&self) -> Result<Arc<Vec<MedicalReport>>> {
        if let Some(Cached::Reports(reports)) = self.cached(&CacheKey::Reports) {
            return Ok(reports);
        }

        let started = self.stamp(&CacheKey::Reports);
        let reports: Vec<MedicalReport> = self
            .store
            .query(
                collections::MEDICAL_REPORTS,
                &[self.owner_filter()],
                Some(OrderBy::desc("timestamp")),
            )
            .await?;
        let reports = Arc::new(reports);
        self.fill(CacheKey::Reports, started, Cached::Reports(reports.clone()));
        Ok(reports)
    }

    /// Append a medical report owned by this user.
    pub async fn add_report(&self, mut report: MedicalReport) -> Result<RecordId> {
        report.uid = self.uid.clone();
        let id = self
            .store
            .create(collections::MEDICAL_REPORTS, &report)
            .await?;
        self.invalidate(&CacheKey::Reports);
        tracing::info!(uid = %self.uid, id = %id, "Medical report saved");
        Ok(id)
    }
}
