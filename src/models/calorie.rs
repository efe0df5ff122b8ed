// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Food search results and calorie log entries.

use crate::models::lenient::{f64_or_zero, stored_instant, string_or_number};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// The six tracked nutrient fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub enum Nutrient {
    Calories,
    Protein,
    Carbs,
    Fat,
    Fiber,
    Sugar,
}

impl Nutrient {
    pub const ALL: [Nutrient; 6] = [
        Nutrient::Calories,
        Nutrient::Protein,
        Nutrient::Carbs,
        Nutrient::Fat,
        Nutrient::Fiber,
        Nutrient::Sugar,
    ];

    /// Stored document field name.
    pub fn field_name(self) -> &'static str {
        match self {
            Nutrient::Calories => "calories",
            Nutrient::Protein => "protein",
            Nutrient::Carbs => "carbs",
            Nutrient::Fat => "fat",
            Nutrient::Fiber => "fiber",
            Nutrient::Sugar => "sugar",
        }
    }

    /// kcal per gram (Atwater), for the macros that have a calorie equivalent.
    pub fn atwater_factor(self) -> Option<f64> {
        match self {
            Nutrient::Protein | Nutrient::Carbs => Some(4.0),
            Nutrient::Fat => Some(9.0),
            Nutrient::Calories | Nutrient::Fiber | Nutrient::Sugar => None,
        }
    }

    /// Display unit.
    pub fn unit(self) -> &'static str {
        match self {
            Nutrient::Calories => "kcal",
            _ => "g",
        }
    }
}

/// Anything carrying per-nutrient amounts.
pub trait NutrientSource {
    fn amount(&self, nutrient: Nutrient) -> f64;
}

/// A food descriptor from the nutrition search, normalized to tracked fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub struct FoodItem {
    /// Nutrition database id (FDC id)
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    pub sugar: f64,
}

impl NutrientSource for FoodItem {
    fn amount(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Calories => self.calories,
            Nutrient::Protein => self.protein,
            Nutrient::Carbs => self.carbs,
            Nutrient::Fat => self.fat,
            Nutrient::Fiber => self.fiber,
            Nutrient::Sugar => self.sugar,
        }
    }
}

/// A logged food item, stored in the `calories` collection.
///
/// `date` is the calendar-day string of the device's local clock when the entry
/// was logged. Queries for "today" match it by exact string equality, so two
/// devices in different timezones can disagree about which day an entry is on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalorieEntry {
    pub uid: String,
    #[serde(default)]
    pub date: String,
    /// Nutrition database id of the food, when logged from search
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub name: String,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub calories: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub protein: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub carbs: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub fat: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub fiber: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub sugar: f64,
    /// When the entry was logged
    #[serde(default, with = "stored_instant")]
    pub timestamp: DateTime<Utc>,
}

impl CalorieEntry {
    /// Build the entry stored when a user logs a search result.
    pub fn from_food(uid: &str, date: &str, item: &FoodItem, timestamp: DateTime<Utc>) -> Self {
        Self {
            uid: uid.to_string(),
            date: date.to_string(),
            id: Some(item.id),
            name: item.name.clone(),
            calories: item.calories,
            protein: item.protein,
            carbs: item.carbs,
            fat: item.fat,
            fiber: item.fiber,
            sugar: item.sugar,
            timestamp,
        }
    }
}

impl NutrientSource for CalorieEntry {
    fn amount(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Calories => self.calories,
            Nutrient::Protein => self.protein,
            Nutrient::Carbs => self.carbs,
            Nutrient::Fat => self.fat,
            Nutrient::Fiber => self.fiber,
            Nutrient::Sugar => self.sugar,
        }
    }
}
