// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod calorie;
pub mod lenient;
pub mod profile;
pub mod report;
pub mod session;
pub mod vitals;

pub use calorie::{CalorieEntry, FoodItem, Nutrient, NutrientSource};
pub use profile::UserProfile;
pub use report::MedicalReport;
pub use session::Session;
pub use vitals::{UnitSystem, VitalsRecord};
