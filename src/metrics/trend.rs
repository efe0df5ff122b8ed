// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weight trend for the profile chart.

use crate::models::VitalsRecord;
use crate::time_utils::parse_timestamp;
use chrono::TimeZone;
use serde::Serialize;
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Number of most recent measurements shown in the trend.
pub const TREND_POINTS: usize = 5;

/// One chart point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub struct TrendPoint {
    /// Local date, e.g. `"10/19/2026"`
    pub label: String,
    pub weight: f64,
}

/// Most recent weights in chronological order.
///
/// `newest_first` is the history as displayed (descending by timestamp).
pub fn weight_trend<Tz: TimeZone>(newest_first: &[VitalsRecord], tz: &Tz) -> Vec<TrendPoint>
where
    Tz::Offset: fmt::Display,
{
    let mut points: Vec<TrendPoint> = newest_first
        .iter()
        .take(TREND_POINTS)
        .map(|record| TrendPoint {
            label: parse_timestamp(&record.timestamp)
                .map(|t| t.with_timezone(tz).format("%-m/%-d/%Y").to_string())
                .unwrap_or_else(|| "Invalid Date".to_string()),
            weight: record.weight_value(),
        })
        .collect();
    points.reverse();
    points
}
