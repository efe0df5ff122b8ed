// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Vitals entry screen.

use crate::controllers::{ActionStatus, ScreenScope, ScreenState};
use crate::db::{DocumentStore, HealthData};
use crate::error::Notice;
use crate::models::{Session, UnitSystem, VitalsRecord};
use crate::time_utils::{format_utc_rfc3339, Clock};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct VitalsForm {
    pub weight: String,
    pub height: String,
    pub blood_pressure: String,
    pub unit_system: UnitSystem,
}

#[derive(Debug, Clone, Default)]
pub struct VitalsState {
    pub form: VitalsForm,
    pub save: ActionStatus,
    pub notice: Option<Notice>,
    /// Set after a successful save; the shell pops the screen
    pub done: bool,
}

pub struct VitalsController<S: DocumentStore> {
    session: Session,
    data: Arc<HealthData<S>>,
    scope: ScreenScope,
    clock: Clock,
    state: ScreenState<VitalsState>,
}

impl<S: DocumentStore> VitalsController<S> {
    pub fn new(session: Session, data: Arc<HealthData<S>>, scope: ScreenScope, clock: Clock) -> Self {
        Self {
            session,
            data,
            scope,
            clock,
            state: ScreenState::default(),
        }
    }

    pub fn state(&self) -> VitalsState {
        self.state.snapshot()
    }

    pub fn take_notice(&self) -> Option<Notice> {
        self.state.lock().notice.take()
    }

    pub fn set_weight(&self, weight: &str) {
        self.state.lock().form.weight = weight.to_string();
    }

    pub fn set_height(&self, height: &str) {
        self.state.lock().form.height = height.to_string();
    }

    pub fn set_blood_pressure(&self, blood_pressure: &str) {
        self.state.lock().form.blood_pressure = blood_pressure.to_string();
    }

    /// Switch between metric and imperial units.
    pub fn toggle_units(&self) -> UnitSystem {
        let mut state = self.state.lock();
        state.form.unit_system = state.form.unit_system.toggled();
        state.form.unit_system
    }

    /// Labels for the weight and height fields, e.g. `("kg", "cm")`.
    pub fn unit_labels(&self) -> (&'static str, &'static str) {
        let units = self.state.lock().form.unit_system;
        (units.weight_unit(), units.height_unit())
    }

    /// Label for the unit toggle.
    pub fn toggle_label(&self) -> &'static str {
        match self.state.lock().form.unit_system {
            UnitSystem::Metric => "Switch to lbs/in",
            UnitSystem::Imperial => "Switch to kg/cm",
        }
    }

    /// Append the form as a new vitals record stamped with the current time.
    ///
    /// The record is stored even if the screen closes before the write lands.
    pub async fn save(&self) -> Option<ActionStatus> {
        let record = {
            let mut state = self.state.lock();
            state.save = ActionStatus::Loading;
            VitalsRecord {
                uid: self.session.uid.clone(),
                weight: state.form.weight.clone(),
                height: state.form.height.clone(),
                blood_pressure: state.form.blood_pressure.clone(),
                unit_system: state.form.unit_system,
                timestamp: format_utc_rfc3339(self.clock.now_utc()),
            }
        };

        let data = self.data.clone();
        let Some(result) = self
            .scope
            .commit(async move { data.add_vitals(record).await })
            .await
        else {
            return self.state.abandon(|s| &mut s.save);
        };

        let mut state = self.state.lock();
        let status = match result {
            Ok(_) => {
                state.notice = Some(Notice::new("Success", "Vitals saved!"));
                state.done = true;
                ActionStatus::Ready
            }
            Err(e) => {
                let notice = e.notice("Error saving vitals");
                state.notice = Some(notice.clone());
                ActionStatus::Failed(notice)
            }
        };
        state.save = status.clone();
        Some(status)
    }
}
