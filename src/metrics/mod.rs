// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Derived metrics computed from already-fetched records.
//!
//! Everything here is pure: the current instant and timezone are passed in by
//! the caller, so results are deterministic and testable.

pub mod nutrients;
pub mod streak;
pub mod trend;

pub use nutrients::{NutrientSummary, NutrientTotals};
pub use streak::{streak, STREAK_WINDOW_DAYS};
pub use trend::{weight_trend, TrendPoint, TREND_POINTS};
