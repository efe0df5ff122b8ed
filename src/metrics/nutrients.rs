// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily nutrient totals and their Atwater calorie equivalents.

use crate::models::{Nutrient, NutrientSource};
use serde::Serialize;
use std::collections::HashMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Summed nutrient amounts over one day's log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NutrientTotals {
    sums: HashMap<Nutrient, f64>,
    entries: usize,
}

impl NutrientTotals {
    /// Sum every tracked nutrient across `entries`.
    ///
    /// Negative amounts only come from bad data and are counted as zero, which
    /// keeps every total non-decreasing as entries are added.
    pub fn from_entries<'a, T, I>(entries: I) -> Self
    where
        T: NutrientSource + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let mut totals = Self::default();
        for entry in entries {
            totals.add(entry);
        }
        totals
    }

    /// Add a single entry to the running totals.
    pub fn add<T: NutrientSource>(&mut self, entry: &T) {
        for nutrient in Nutrient::ALL {
            let amount = entry.amount(nutrient);
            let amount = if amount.is_finite() && amount > 0.0 {
                amount
            } else {
                0.0
            };
            *self.sums.entry(nutrient).or_insert(0.0) += amount;
        }
        self.entries += 1;
    }

    /// Number of entries summed.
    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Total for `nutrient`, rounded to one decimal place.
    pub fn total(&self, nutrient: Nutrient) -> f64 {
        round_to_tenth(self.sums.get(&nutrient).copied().unwrap_or(0.0))
    }

    /// Total rendered with exactly one decimal, e.g. `"350.0"`.
    pub fn format_total(&self, nutrient: Nutrient) -> String {
        format!("{:.1}", self.total(nutrient))
    }

    /// kcal equivalent of a macro total (protein and carbs ×4, fat ×9).
    ///
    /// Computed from the rounded total, as displayed. `None` for nutrients
    /// without an Atwater factor.
    pub fn kcal_equivalent(&self, nutrient: Nutrient) -> Option<f64> {
        nutrient
            .atwater_factor()
            .map(|factor| self.total(nutrient) * factor)
    }

    /// Display view of all totals.
    pub fn summary(&self) -> NutrientSummary {
        let kcal = |n| {
            self.kcal_equivalent(n)
                .map(|v| format!("{:.0}", v))
                .unwrap_or_default()
        };
        NutrientSummary {
            calories: self.format_total(Nutrient::Calories),
            protein: self.format_total(Nutrient::Protein),
            carbs: self.format_total(Nutrient::Carbs),
            fat: self.format_total(Nutrient::Fat),
            fiber: self.format_total(Nutrient::Fiber),
            sugar: self.format_total(Nutrient::Sugar),
            protein_kcal: kcal(Nutrient::Protein),
            carbs_kcal: kcal(Nutrient::Carbs),
            fat_kcal: kcal(Nutrient::Fat),
        }
    }
}

/// Formatted totals for the calorie tracker's summary box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub struct NutrientSummary {
    pub calories: String,
    pub protein: String,
    pub carbs: String,
    pub fat: String,
    pub fiber: String,
    pub sugar: String,
    pub protein_kcal: String,
    pub carbs_kcal: String,
    pub fat_kcal: String,
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FoodItem;

    fn food(calories: f64, protein: f64, carbs: f64, fat: f64) -> FoodItem {
        FoodItem {
            id: 1,
            name: "test".to_string(),
            calories,
            protein,
            carbs,
            fat,
            fiber: 0.0,
            sugar: 0.0,
        }
    }

    #[test]
    fn test_total_sums_and_rounds() {
        let entries = vec![food(200.0, 10.04, 0.0, 1.0), food(150.0, 2.02, 0.0, 2.0)];
        let totals = NutrientTotals::from_entries(&entries);

        assert_eq!(totals.format_total(Nutrient::Calories), "350.0");
        assert_eq!(totals.total(Nutrient::Protein), 12.1);
        assert_eq!(totals.len(), 2);
    }

    #[test]
    fn test_empty_log_is_zero() {
        let totals = NutrientTotals::from_entries::<FoodItem, _>(&[]);
        assert!(totals.is_empty());
        for nutrient in Nutrient::ALL {
            assert_eq!(totals.format_total(nutrient), "0.0");
        }
        assert_eq!(totals.kcal_equivalent(Nutrient::Fat), Some(0.0));
    }

    #[test]
    fn test_kcal_equivalents() {
        let totals = NutrientTotals::from_entries(&[food(0.0, 10.0, 20.0, 5.0)]);
        assert_eq!(totals.kcal_equivalent(Nutrient::Protein), Some(40.0));
        assert_eq!(totals.kcal_equivalent(Nutrient::Carbs), Some(80.0));
        assert_eq!(totals.kcal_equivalent(Nutrient::Fat), Some(45.0));
        assert_eq!(totals.kcal_equivalent(Nutrient::Calories), None);
    }

    #[test]
    fn test_negative_and_nan_amounts_count_as_zero() {
        let totals = NutrientTotals::from_entries(&[food(-50.0, f64::NAN, 1.0, 0.0)]);
        assert_eq!(totals.total(Nutrient::Calories), 0.0);
        assert_eq!(totals.total(Nutrient::Protein), 0.0);
        assert_eq!(totals.total(Nutrient::Carbs), 1.0);
    }

    #[test]
    fn test_summary_formatting() {
        let summary = NutrientTotals::from_entries(&[food(95.0, 0.55, 25.1, 0.25)]).summary();
        assert_eq!(summary.calories, "95.0");
        assert_eq!(summary.protein, "0.6");
        assert_eq!(summary.protein_kcal, "2");
        assert_eq!(summary.carbs_kcal, "100");
        assert_eq!(summary.fat, "0.3");
    }
}
