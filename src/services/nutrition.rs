// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Food search against USDA FoodData Central.
//!
//! Search results carry dozens of nutrient rows per food; only the six tracked
//! fields are kept, matched by nutrient name.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::lenient::f64_or_zero;
use crate::models::{FoodItem, Nutrient};
use serde::Deserialize;
use std::future::Future;

/// Results requested per search.
pub const PAGE_SIZE: u32 = 5;

/// Nutrition lookup seam used by the calorie screen.
pub trait FoodSearch: Send + Sync + 'static {
    /// Foods matching free text, best match first.
    fn search(&self, text: &str) -> impl Future<Output = Result<Vec<FoodItem>>> + Send;
}

/// `foods/search` response body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub foods: Vec<FoodDescriptor>,
}

/// One food in a search response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodDescriptor {
    pub fdc_id: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub food_nutrients: Vec<NutrientRow>,
}

/// One nutrient amount of a food.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutrientRow {
    #[serde(default)]
    pub nutrient_name: Option<String>,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub value: f64,
    #[serde(default)]
    pub unit_name: Option<String>,
}

/// Tracked field for a nutrient name, compared case-insensitively.
pub fn tracked_nutrient(name: &str) -> Option<Nutrient> {
    match name.trim().to_lowercase().as_str() {
        "energy" => Some(Nutrient::Calories),
        "protein" => Some(Nutrient::Protein),
        "carbohydrate, by difference" => Some(Nutrient::Carbs),
        "total lipid (fat)" => Some(Nutrient::Fat),
        "fiber, total dietary" => Some(Nutrient::Fiber),
        "sugars, total including nlea" => Some(Nutrient::Sugar),
        _ => None,
    }
}

/// Normalize a search result into a [`FoodItem`]; absent nutrients are 0.
pub fn food_from_descriptor(food: &FoodDescriptor) -> FoodItem {
    let mut item = FoodItem {
        id: food.fdc_id,
        name: food.description.clone(),
        calories: 0.0,
        protein: 0.0,
        carbs: 0.0,
        fat: 0.0,
        fiber: 0.0,
        sugar: 0.0,
    };

    for row in &food.food_nutrients {
        let Some(nutrient) = row.nutrient_name.as_deref().and_then(tracked_nutrient) else {
            continue;
        };
        // Some foods list energy twice; keep the kcal row.
        if nutrient == Nutrient::Calories
            && row
                .unit_name
                .as_deref()
                .is_some_and(|unit| unit.eq_ignore_ascii_case("kj"))
        {
            continue;
        }

        let slot = match nutrient {
            Nutrient::Calories => &mut item.calories,
            Nutrient::Protein => &mut item.protein,
            Nutrient::Carbs => &mut item.carbs,
            Nutrient::Fat => &mut item.fat,
            Nutrient::Fiber => &mut item.fiber,
            Nutrient::Sugar => &mut item.sugar,
        };
        *slot = row.value;
    }

    item
}

/// Parse a `foods/search` body into normalized items.
pub fn parse_foods(body: &str) -> Result<Vec<FoodItem>> {
    let response: SearchResponse = serde_json::from_str(body)
        .map_err(|e| AppError::Network(format!("Unexpected food search response: {}", e)))?;
    Ok(response.foods.iter().map(food_from_descriptor).collect())
}

/// USDA FoodData Central client.
#[derive(Clone)]
pub struct UsdaClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl UsdaClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.usda_base_url.clone(),
            api_key: config.usda_api_key.clone(),
        }
    }
}

impl FoodSearch for UsdaClient {
    async fn search(&self, text: &str) -> Result<Vec<FoodItem>> {
        let url = format!("{}/foods/search", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("query", text.to_string()),
                ("pageSize", PAGE_SIZE.to_string()),
                ("api_key", self.api_key.clone()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Network(format!("HTTP {}: {}", status, body)));
        }

        let body = response.text().await?;
        let foods = parse_foods(&body)?;
        tracing::debug!(query = text, count = foods.len(), "Food search complete");
        Ok(foods)
    }
}
