// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Streak, nutrient totals and weight trend over realistic record sets.

use chrono::{Duration, Utc};
use health_tracker::metrics::{streak, weight_trend, NutrientTotals, STREAK_WINDOW_DAYS};
use health_tracker::models::{CalorieEntry, Nutrient, UnitSystem, VitalsRecord};
use health_tracker::time_utils::format_utc_rfc3339;

mod common;
use common::{pacific, parse_time};

fn vitals_at(timestamp: &str, weight: &str) -> VitalsRecord {
    VitalsRecord {
        uid: "u1".to_string(),
        weight: weight.to_string(),
        height: "175".to_string(),
        blood_pressure: "120/80".to_string(),
        unit_system: UnitSystem::Metric,
        timestamp: timestamp.to_string(),
    }
}

fn days_ago(now: chrono::DateTime<Utc>, days: i64) -> VitalsRecord {
    vitals_at(&format_utc_rfc3339(now - Duration::days(days)), "70")
}

fn entry(json: serde_json::Value) -> CalorieEntry {
    let mut doc = serde_json::json!({"uid": "u1", "date": "Mon Oct 19 2026"});
    doc.as_object_mut()
        .unwrap()
        .extend(json.as_object().unwrap().clone());
    serde_json::from_value(doc).unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// STREAK
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_streak_three_days_then_gap() {
    let now = parse_time("2026-10-19T17:00:00Z");
    let records = vec![days_ago(now, 0), days_ago(now, 1), days_ago(now, 2), days_ago(now, 4)];

    assert_eq!(streak(&records, &now.with_timezone(&pacific())), 3);
}

#[test]
fn test_streak_yesterday_only_is_zero() {
    let now = parse_time("2026-10-19T17:00:00Z");
    let records = vec![days_ago(now, 1), days_ago(now, 2)];

    assert_eq!(
        streak(&records, &now.with_timezone(&pacific())),
        0,
        "No grace period: a missing today ends the streak"
    );
}

#[test]
fn test_streak_is_capped_at_window() {
    let now = parse_time("2026-10-19T17:00:00Z");
    let records: Vec<_> = (0..150).map(|d| days_ago(now, d)).collect();

    assert_eq!(
        streak(&records, &now.with_timezone(&pacific())),
        STREAK_WINDOW_DAYS
    );

    let exactly: Vec<_> = (0..100).map(|d| days_ago(now, d)).collect();
    assert_eq!(streak(&exactly, &now.with_timezone(&pacific())), 100);
}

#[test]
fn test_streak_counts_days_not_records() {
    let now = parse_time("2026-10-19T17:00:00Z");
    let records = vec![
        vitals_at("2026-10-19T15:00:00Z", "70"),
        vitals_at("2026-10-19T16:30:00Z", "70.2"),
        vitals_at("2026-10-18T20:00:00Z", "70.1"),
    ];

    assert_eq!(streak(&records, &now.with_timezone(&pacific())), 2);
}

#[test]
fn test_streak_uses_local_day() {
    // 03:00Z on Oct 20 is still the evening of Oct 19 in Pacific time.
    let now = parse_time("2026-10-20T03:00:00Z");
    let records = vec![vitals_at("2026-10-19T16:00:00Z", "70")];

    assert_eq!(streak(&records, &now.with_timezone(&pacific())), 1);
    assert_eq!(streak(&records, &now), 0);
}

#[test]
fn test_streak_ignores_unparseable_timestamps() {
    let now = parse_time("2026-10-19T17:00:00Z");
    let records = vec![vitals_at("not a date", "70"), vitals_at("", "70")];

    assert_eq!(streak(&records, &now.with_timezone(&pacific())), 0);
    assert_eq!(streak(&[], &now), 0);
}

// ═══════════════════════════════════════════════════════════════════════════
// NUTRIENT TOTALS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_calorie_total_formats_one_decimal() {
    let log = vec![
        entry(serde_json::json!({"calories": 200})),
        entry(serde_json::json!({"calories": 150})),
    ];

    let totals = NutrientTotals::from_entries(&log);
    assert_eq!(totals.format_total(Nutrient::Calories), "350.0");
    assert_eq!(totals.len(), 2);
}

#[test]
fn test_totals_treat_bad_values_as_zero() {
    let log = vec![
        entry(serde_json::json!({"protein": "12.5g", "carbs": null})),
        entry(serde_json::json!({"protein": "abc", "carbs": 30})),
        entry(serde_json::json!({"protein": 7.46})),
    ];

    let totals = NutrientTotals::from_entries(&log);
    assert_eq!(totals.total(Nutrient::Protein), 20.0);
    assert_eq!(totals.total(Nutrient::Carbs), 30.0);
    assert_eq!(totals.format_total(Nutrient::Fiber), "0.0");
}

#[test]
fn test_macro_kcal_equivalents() {
    let log = vec![entry(serde_json::json!({"protein": 10, "carbs": 20, "fat": 5}))];

    let summary = NutrientTotals::from_entries(&log).summary();
    assert_eq!(summary.protein_kcal, "40");
    assert_eq!(summary.carbs_kcal, "80");
    assert_eq!(summary.fat_kcal, "45");
    assert_eq!(summary.fiber, "0.0");
}

#[test]
fn test_macro_kcal_non_decreasing_as_entries_are_added() {
    let amounts = [
        serde_json::json!({"protein": 3.2, "carbs": 11, "fat": 0.4}),
        serde_json::json!({"protein": -5, "carbs": "n/a", "fat": 2}),
        serde_json::json!({"protein": 0, "carbs": 8.05, "fat": 0}),
        serde_json::json!({}),
    ];

    let mut totals = NutrientTotals::default();
    let mut previous = [0.0f64; 3];
    for json in amounts {
        totals.add(&entry(json));
        let current = [
            totals.kcal_equivalent(Nutrient::Protein).unwrap(),
            totals.kcal_equivalent(Nutrient::Carbs).unwrap(),
            totals.kcal_equivalent(Nutrient::Fat).unwrap(),
        ];
        for (before, after) in previous.iter().zip(current.iter()) {
            assert!(*after >= 0.0);
            assert!(after >= before, "{} dropped to {}", before, after);
        }
        previous = current;
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// WEIGHT TREND
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_trend_takes_latest_five_oldest_first() {
    let newest_first: Vec<_> = (0..7)
        .map(|d| {
            let when = parse_time("2026-10-19T17:00:00Z") - Duration::days(d);
            vitals_at(&format_utc_rfc3339(when), &format!("{}", 70 + d))
        })
        .collect();

    let trend = weight_trend(&newest_first, &pacific());
    let weights: Vec<f64> = trend.iter().map(|p| p.weight).collect();
    assert_eq!(weights, vec![74.0, 73.0, 72.0, 71.0, 70.0]);
    assert_eq!(trend.last().unwrap().label, "10/19/2026");
    assert_eq!(trend.first().unwrap().label, "10/15/2026");
}
