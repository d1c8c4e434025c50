// SPDX-License-Identifier: MIT

//! Food reference data: shared nutrition records looked up by meal logging.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodCategory {
    Fruits,
    Vegetables,
    Grains,
    Protein,
    Dairy,
    Fats,
    Beverages,
    Snacks,
    Other,
}

impl Default for FoodCategory {
    fn default() -> Self {
        FoodCategory::Other
    }
}

/// Where a food record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodSource {
    UserInput,
    AiRecognition,
    BarcodeScan,
    Database,
}

impl Default for FoodSource {
    fn default() -> Self {
        FoodSource::UserInput
    }
}

/// Measurement unit for serving sizes and logged quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodUnit {
    G,
    Ml,
    Piece,
    Cup,
    Tbsp,
    Tsp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServingSize {
    pub amount: f64,
    pub unit: FoodUnit,
}

impl Default for ServingSize {
    fn default() -> Self {
        Self {
            amount: 100.0,
            unit: FoodUnit::G,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vitamins {
    #[serde(default)]
    pub a: f64,
    #[serde(default)]
    pub c: f64,
    #[serde(default)]
    pub d: f64,
    #[serde(default)]
    pub e: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Minerals {
    #[serde(default)]
    pub calcium: f64,
    #[serde(default)]
    pub iron: f64,
    #[serde(default)]
    pub potassium: f64,
}

/// Reference nutrition per 100 g of the food.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionPer100g {
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub fiber: f64,
    #[serde(default)]
    pub sugar: f64,
    /// Milligrams
    #[serde(default)]
    pub sodium: f64,
    /// Milligrams
    #[serde(default)]
    pub cholesterol: f64,
    #[serde(default)]
    pub vitamins: Vitamins,
    #[serde(default)]
    pub minerals: Minerals,
}

/// Food reference record stored in Firestore (`food_items/{id}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    /// Document id (uuid)
    pub id: String,
    pub name: String,
    /// Lowercased name for case-insensitive exact lookup and prefix search.
    /// Firestore string comparison is case-sensitive, so the normalized copy
    /// is stored alongside the display name.
    pub name_lower: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(default)]
    pub category: FoodCategory,
    #[serde(default)]
    pub serving_size: ServingSize,
    pub nutrition_per_100g: NutritionPer100g,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub source: FoodSource,
    pub created_at: String,
    pub updated_at: String,
}
