// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calorie tracker screen: food search, logging and today's totals.
//!
//! "Today" is the calendar-day string of the local clock, matched exactly
//! against each entry's stored `date`.

use crate::controllers::{ActionStatus, ScreenScope, ScreenState};
use crate::db::{DocumentStore, HealthData};
use crate::error::{AppError, Notice};
use crate::metrics::{NutrientSummary, NutrientTotals};
use crate::models::{CalorieEntry, FoodItem, Session};
use crate::services::FoodSearch;
use crate::time_utils::Clock;
use std::sync::Arc;

const ERROR_TITLE: &str = "Error";

#[derive(Debug, Clone, Default)]
pub struct CalorieState {
    pub query: String,
    pub results: Vec<FoodItem>,
    /// Today's entries, in logging order
    pub log: Vec<CalorieEntry>,
    /// Whether fiber and sugar are shown
    pub show_details: bool,
    pub load: ActionStatus,
    pub search: ActionStatus,
    pub log_food: ActionStatus,
    pub notice: Option<Notice>,
}

pub struct CalorieController<S: DocumentStore, F: FoodSearch> {
    session: Session,
    data: Arc<HealthData<S>>,
    foods: Arc<F>,
    scope: ScreenScope,
    clock: Clock,
    state: ScreenState<CalorieState>,
}

impl<S: DocumentStore, F: FoodSearch> CalorieController<S, F> {
    pub fn new(
        session: Session,
        data: Arc<HealthData<S>>,
        foods: Arc<F>,
        scope: ScreenScope,
        clock: Clock,
    ) -> Self {
        Self {
            session,
            data,
            foods,
            scope,
            clock,
            state: ScreenState::default(),
        }
    }

    pub fn state(&self) -> CalorieState {
        self.state.snapshot()
    }

    pub fn take_notice(&self) -> Option<Notice> {
        self.state.lock().notice.take()
    }

    pub fn set_query(&self, query: &str) {
        self.state.lock().query = query.to_string();
    }

    pub fn toggle_details(&self) -> bool {
        let mut state = self.state.lock();
        state.show_details = !state.show_details;
        state.show_details
    }

    /// Totals of today's log.
    pub fn summary(&self) -> NutrientSummary {
        NutrientTotals::from_entries(&self.state.lock().log).summary()
    }

    /// Fetch the entries logged today.
    pub async fn load_today(&self) -> Option<ActionStatus> {
        self.state.lock().load = ActionStatus::Loading;
        let today = self.clock.today_string();

        let Some(result) = self.scope.run(self.data.calorie_log(&today)).await else {
            return self.state.abandon(|s| &mut s.load);
        };

        let mut state = self.state.lock();
        let status = match result {
            Ok(entries) => {
                tracing::debug!(uid = %self.session.uid, day = %today, count = entries.len(), "Calorie log loaded");
                state.log = entries.as_ref().clone();
                ActionStatus::Ready
            }
            Err(e) => fail(&mut state, e),
        };
        state.load = status.clone();
        Some(status)
    }

    /// Search foods for the query text, replacing previous results.
    ///
    /// An empty query does nothing and returns the current status.
    pub async fn search(&self) -> Option<ActionStatus> {
        let query = {
            let mut state = self.state.lock();
            if state.query.is_empty() {
                return Some(state.search.clone());
            }
            state.search = ActionStatus::Loading;
            state.query.clone()
        };

        let Some(result) = self.scope.run(self.foods.search(&query)).await else {
            return self.state.abandon(|s| &mut s.search);
        };

        let mut state = self.state.lock();
        let status = match result {
            Ok(results) => {
                state.results = results;
                ActionStatus::Ready
            }
            Err(e) => fail(&mut state, e),
        };
        state.search = status.clone();
        Some(status)
    }

    /// Log a food for today and append it to the local log.
    ///
    /// The entry is stored even if the screen closes first; only the local log
    /// is left alone then.
    pub async fn log_food(&self, item: &FoodItem) -> Option<ActionStatus> {
        self.state.lock().log_food = ActionStatus::Loading;
        let entry = CalorieEntry::from_food(
            &self.session.uid,
            &self.clock.today_string(),
            item,
            self.clock.now_utc(),
        );

        let data = self.data.clone();
        let stored = entry.clone();
        let Some(result) = self
            .scope
            .commit(async move { data.log_calories(stored).await })
            .await
        else {
            return self.state.abandon(|s| &mut s.log_food);
        };

        let mut state = self.state.lock();
        let status = match result {
            Ok(_) => {
                state.log.push(entry);
                ActionStatus::Ready
            }
            Err(e) => fail(&mut state, e),
        };
        state.log_food = status.clone();
        Some(status)
    }
}

fn fail(state: &mut CalorieState, err: AppError) -> ActionStatus {
    let notice = err.notice(ERROR_TITLE);
    state.notice = Some(notice.clone());
    ActionStatus::Failed(notice)
}
