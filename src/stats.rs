//! Nutrition and activity statistics over a window of logged entries.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{ActivityLogEntry, ActivityType, MealType, NutritionLogEntry};
use crate::rounding;

/// Atwater energy factors (kcal per gram).
pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
pub const KCAL_PER_GRAM_CARBS: f64 = 4.0;
pub const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Share of macro energy coming from each macronutrient.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MacroBreakdown {
    #[serde(serialize_with = "rounding::one_decimal")]
    pub protein_percent: f64,
    #[serde(serialize_with = "rounding::one_decimal")]
    pub carbs_percent: f64,
    #[serde(serialize_with = "rounding::one_decimal")]
    pub fat_percent: f64,
}

impl MacroBreakdown {
    /// All zeros when no macro grams were logged.
    pub fn from_grams(protein_g: f64, carbs_g: f64, fat_g: f64) -> Self {
        let protein_kcal = protein_g * KCAL_PER_GRAM_PROTEIN;
        let carbs_kcal = carbs_g * KCAL_PER_GRAM_CARBS;
        let fat_kcal = fat_g * KCAL_PER_GRAM_FAT;
        let total = protein_kcal + carbs_kcal + fat_kcal;

        if total <= 0.0 {
            return Self::default();
        }

        Self {
            protein_percent: protein_kcal / total * 100.0,
            carbs_percent: carbs_kcal / total * 100.0,
            fat_percent: fat_kcal / total * 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionStats {
    #[serde(serialize_with = "rounding::whole")]
    pub total_calories: f64,
    #[serde(serialize_with = "rounding::one_decimal")]
    pub total_protein: f64,
    #[serde(serialize_with = "rounding::one_decimal")]
    pub total_carbohydrates: f64,
    #[serde(serialize_with = "rounding::one_decimal")]
    pub total_fats: f64,
    #[serde(serialize_with = "rounding::one_decimal")]
    pub total_fiber: f64,
    #[serde(serialize_with = "rounding::one_decimal")]
    pub average_daily_calories: f64,
    /// Calories per meal type
    pub meal_breakdown: BTreeMap<MealType, f64>,
    pub macro_breakdown: MacroBreakdown,
    pub total_meals: usize,
}

impl NutritionStats {
    /// `days` is the window the entries were fetched for; the average is 0 when it is 0.
    pub fn from_entries(entries: &[NutritionLogEntry], days: u32) -> Self {
        let mut meal_breakdown = BTreeMap::new();
        for entry in entries {
            *meal_breakdown.entry(entry.meal_type).or_insert(0.0) += entry.calories;
        }

        let sum = |field: fn(&NutritionLogEntry) -> Option<f64>| -> f64 {
            entries.iter().filter_map(field).sum()
        };
        let total_calories: f64 = entries.iter().map(|e| e.calories).sum();
        let total_protein = sum(|e| e.protein);
        let total_carbohydrates = sum(|e| e.carbohydrates);
        let total_fats = sum(|e| e.fats);

        Self {
            total_calories,
            total_protein,
            total_carbohydrates,
            total_fats,
            total_fiber: sum(|e| e.fiber),
            average_daily_calories: if days > 0 {
                total_calories / f64::from(days)
            } else {
                0.0
            },
            meal_breakdown,
            macro_breakdown: MacroBreakdown::from_grams(
                total_protein,
                total_carbohydrates,
                total_fats,
            ),
            total_meals: entries.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityStats {
    pub total_activities: usize,
    pub total_duration_minutes: u32,
    #[serde(serialize_with = "rounding::whole")]
    pub total_calories_burned: f64,
    /// km
    #[serde(serialize_with = "rounding::one_decimal")]
    pub total_distance: f64,
    /// Number of activities per type
    pub activity_types: BTreeMap<ActivityType, usize>,
    #[serde(serialize_with = "rounding::one_decimal")]
    pub average_duration: f64,
}

impl ActivityStats {
    pub fn from_entries(entries: &[ActivityLogEntry]) -> Self {
        let mut activity_types = BTreeMap::new();
        for entry in entries {
            *activity_types.entry(entry.activity_type).or_insert(0) += 1;
        }

        let total_duration_minutes: u32 = entries.iter().filter_map(|e| e.duration_minutes).sum();
        let total_activities = entries.len();

        Self {
            total_activities,
            total_duration_minutes,
            total_calories_burned: entries.iter().map(|e| e.calories_burned).sum(),
            total_distance: entries.iter().filter_map(|e| e.distance).sum(),
            activity_types,
            average_duration: if total_activities > 0 {
                f64::from(total_duration_minutes) / total_activities as f64
            } else {
                0.0
            },
        }
    }
}
