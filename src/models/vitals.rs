// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Vitals model for storage and display.

use crate::models::lenient::{parse_leading_number, string_or_number};
use crate::time_utils::parse_timestamp;
use chrono::TimeZone;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Measurement system the vitals were entered in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn toggled(self) -> Self {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }

    pub fn weight_unit(self) -> &'static str {
        match self {
            UnitSystem::Metric => "kg",
            UnitSystem::Imperial => "lbs",
        }
    }

    pub fn height_unit(self) -> &'static str {
        match self {
            UnitSystem::Metric => "cm",
            UnitSystem::Imperial => "in",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Anything other than "metric" has always been displayed as imperial.
impl From<String> for UnitSystem {
    fn from(value: String) -> Self {
        if value == "metric" {
            UnitSystem::Metric
        } else {
            UnitSystem::Imperial
        }
    }
}

impl From<UnitSystem> for String {
    fn from(value: UnitSystem) -> Self {
        value.as_str().to_string()
    }
}

/// A vitals measurement, stored in the `vitals` collection.
///
/// Weight and height hold the text that was entered; see [`VitalsRecord::weight_value`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalsRecord {
    pub uid: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub weight: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub height: String,
    #[serde(rename = "bloodPressure", alias = "bp", default)]
    pub blood_pressure: String,
    #[serde(rename = "unitSystem", default)]
    pub unit_system: UnitSystem,
    /// When the vitals were saved (ISO 8601)
    #[serde(default)]
    pub timestamp: String,
}

impl VitalsRecord {
    /// Weight as a number; unparseable text reads as 0.
    pub fn weight_value(&self) -> f64 {
        parse_leading_number(&self.weight)
    }

    /// One line of history, e.g. `"10/19/2026, 8:30:00 AM — 70 kg, 175 cm, BP: 120/80"`.
    pub fn history_line<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: fmt::Display,
    {
        let when = parse_timestamp(&self.timestamp)
            .map(|t| t.with_timezone(tz).format("%-m/%-d/%Y, %-I:%M:%S %p").to_string())
            .unwrap_or_else(|| "Invalid Date".to_string());
        format!(
            "{} — {} {}, {} {}, BP: {}",
            when,
            self.weight,
            self.unit_system.weight_unit(),
            self.height,
            self.unit_system.height_unit(),
            self.blood_pressure
        )
    }
}
