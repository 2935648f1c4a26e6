use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// Nullable backend columns are always emitted, so `null` must decode like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default_quantity<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_else(default_quantity))
}

/// User profile as returned by `GET /auth/profile`.
///
/// Every body-metric field is optional on the wire; `NormalizedProfile`
/// validates them before any calculation runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub id: Option<i64>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Age in years
    pub age: Option<i64>,
    /// "male", "female", anything else is treated as unspecified
    pub gender: Option<String>,
    pub height_feet: Option<f64>,
    pub height_inches: Option<f64>,
    /// Height in cm
    pub height: Option<f64>,
    pub weight_lbs: Option<f64>,
    /// Weight in kg
    pub weight: Option<f64>,
    pub target_weight_lbs: Option<f64>,
    /// One of the five `ActivityLevel` names
    pub activity_level: Option<String>,
    /// lbs/week, negative = loss, positive = gain
    pub weight_goal_rate: Option<f64>,
    /// Explicit daily calorie goal override (kcal)
    pub daily_calorie_goal: Option<f64>,
}

/// Partial profile update for `PUT /auth/profile`. Unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_feet: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_inches: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_lbs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_weight_lbs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_goal_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_calorie_goal: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Cardio,
    Strength,
    Flexibility,
    Sports,
    #[serde(other)]
    Other,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Cardio => "cardio",
            ActivityType::Strength => "strength",
            ActivityType::Flexibility => "flexibility",
            ActivityType::Sports => "sports",
            ActivityType::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Low,
    #[default]
    Moderate,
    High,
}

/// A logged workout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    pub id: Option<i64>,
    pub activity_type: ActivityType,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    /// Distance in km
    #[serde(default)]
    pub distance: Option<f64>,
    /// Calories burned (kcal), 0 when not recorded
    #[serde(default, deserialize_with = "null_as_default")]
    pub calories_burned: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub intensity: Intensity,
    pub date: NaiveDateTime,
}

/// Body of `POST /activities`.
#[derive(Debug, Clone, Serialize)]
pub struct NewActivity {
    pub activity_type: ActivityType,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    pub calories_burned: f64,
    pub intensity: Intensity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

fn default_quantity() -> f64 {
    1.0
}

/// A logged food item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionLogEntry {
    pub id: Option<i64>,
    pub meal_type: MealType,
    pub food_name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Calories (kcal)
    pub calories: f64,
    /// Protein (g)
    #[serde(default)]
    pub protein: Option<f64>,
    /// Carbohydrates (g)
    #[serde(default)]
    pub carbohydrates: Option<f64>,
    /// Fats (g)
    #[serde(default)]
    pub fats: Option<f64>,
    /// Fiber (g)
    #[serde(default)]
    pub fiber: Option<f64>,
    #[serde(default)]
    pub serving_size: Option<String>,
    #[serde(default = "default_quantity", deserialize_with = "null_as_default_quantity")]
    pub quantity: f64,
    pub date: NaiveDateTime,
}

/// Body of `POST /nutrition`.
#[derive(Debug, Clone, Serialize)]
pub struct NewNutritionEntry {
    pub meal_type: MealType,
    pub food_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub calories: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbohydrates: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fats: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiber: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serving_size: Option<String>,
    pub quantity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Active => "active",
            GoalStatus::Completed => "completed",
        }
    }
}

/// A user goal. Progress logic lives in `crate::goals`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: Option<i64>,
    pub goal_type: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub target_value: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_value: f64,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: GoalStatus,
    #[serde(default)]
    pub start_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub target_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub completed_at: Option<NaiveDateTime>,
}

/// Body of `POST /goals`.
#[derive(Debug, Clone, Serialize)]
pub struct NewGoal {
    pub goal_type: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub target_value: f64,
    pub current_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDateTime>,
}

/// Body of `PUT /goals/{id}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GoalUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<GoalStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDateTime>,
}

/// Body of `POST /goals/{id}/progress`: `{"increment": x}` or `{"current_value": x}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressUpdate {
    Increment(f64),
    CurrentValue(f64),
}

/// Result of a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserProfile,
}
