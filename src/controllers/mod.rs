// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Screen controllers.
//!
//! Each controller owns one screen's state and actions. Actions run inside the
//! screen's [`ScreenScope`] and record their progress as an [`ActionStatus`];
//! failures also leave a [`Notice`] for the host to show as a blocking alert.
//! An action cut off by the screen closing goes back to `Idle` and returns
//! `None`. Writes still reach the store in that case.

pub mod calories;
pub mod login;
pub mod profile;
pub mod reports;
pub mod scope;
pub mod vitals;

pub use calories::CalorieController;
pub use login::{AuthMode, LoginController};
pub use profile::ProfileController;
pub use reports::ReportsController;
pub use scope::ScreenScope;
pub use vitals::VitalsController;

use crate::error::Notice;
use serde::Serialize;
use std::sync::{Mutex, MutexGuard};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Progress of one screen action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "notice", rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub enum ActionStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(Notice),
}

impl ActionStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, ActionStatus::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ActionStatus::Ready)
    }

    /// The failure notice, if the action failed.
    pub fn notice(&self) -> Option<&Notice> {
        match self {
            ActionStatus::Failed(notice) => Some(notice),
            _ => None,
        }
    }
}

/// Screen state behind a lock, shared by concurrently running actions.
#[derive(Debug, Default)]
pub(crate) struct ScreenState<T>(Mutex<T>);

impl<T> ScreenState<T> {
    pub(crate) fn new(state: T) -> Self {
        Self(Mutex::new(state))
    }

    // A panic mid-update leaves plain data behind; keep using it.
    pub(crate) fn lock(&self) -> MutexGuard<'_, T> {
        self.0.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<T> ScreenState<T> {
    /// Settle an action whose screen closed under it: its status returns to
    /// idle and its result is not applied.
    pub(crate) fn abandon(
        &self,
        status: impl FnOnce(&mut T) -> &mut ActionStatus,
    ) -> Option<ActionStatus> {
        let mut state = self.lock();
        *status(&mut *state) = ActionStatus::Idle;
        None
    }
}

impl<T: Clone> ScreenState<T> {
    pub(crate) fn snapshot(&self) -> T {
        self.lock().clone()
    }
}
