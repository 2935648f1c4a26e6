//! Profile normalization: converts the wire `UserProfile` into the metric,
//! validated inputs the energy formulas need.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CalorieError;
use crate::models::UserProfile;

/// Kilograms per pound (exact).
pub const KG_PER_LB: f64 = 0.453_592_37;

/// Centimeters per inch (exact).
pub const CM_PER_INCH: f64 = 2.54;

/// Accepted range for the weekly weight change goal (lbs/week).
pub const MIN_WEIGHT_GOAL_RATE: f64 = -2.0;
pub const MAX_WEIGHT_GOAL_RATE: f64 = 2.0;

/// Biological sex category used by the BMR constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
    /// Other or not provided
    Other,
}

impl Sex {
    /// Case-insensitive; anything other than male/female maps to `Other`.
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("male") => Sex::Male,
            Some("female") => Sex::Female,
            _ => Sex::Other,
        }
    }
}

/// Activity level for TDEE calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    LightlyActive,
    /// Moderate exercise 3-5 days/week
    ModeratelyActive,
    /// Hard exercise 6-7 days/week
    VeryActive,
    /// Very hard exercise plus a physical job
    ExtraActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::ExtraActive,
    ];

    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::LightlyActive => "lightly_active",
            ActivityLevel::ModeratelyActive => "moderately_active",
            ActivityLevel::VeryActive => "very_active",
            ActivityLevel::ExtraActive => "extra_active",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "little or no exercise",
            ActivityLevel::LightlyActive => "light exercise 1-3 days/week",
            ActivityLevel::ModeratelyActive => "moderate exercise 3-5 days/week",
            ActivityLevel::VeryActive => "hard exercise 6-7 days/week",
            ActivityLevel::ExtraActive => "very hard exercise + physical job",
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityLevel {
    type Err = CalorieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivityLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s.trim())
            .ok_or_else(|| CalorieError::InvalidProfile(format!("unknown activity level: {s}")))
    }
}

/// Validated, metric profile.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedProfile {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: u32,
    pub sex: Sex,
    pub activity_level: ActivityLevel,
    /// lbs/week; 0 when the user has not set one
    pub weight_goal_rate: f64,
    /// Present only when the override is positive
    pub daily_calorie_goal: Option<f64>,
}

impl NormalizedProfile {
    pub fn from_profile(profile: &UserProfile) -> Result<Self, CalorieError> {
        let weight_kg = weight_kg(profile)?;
        let height_cm = height_cm(profile)?;

        let age_years = match profile.age {
            Some(age) if age > 0 => u32::try_from(age)
                .map_err(|_| CalorieError::InvalidProfile(format!("age out of range: {age}")))?,
            Some(age) => {
                return Err(CalorieError::InvalidProfile(format!(
                    "age must be positive: {age}"
                )))
            }
            None => return Err(CalorieError::InvalidProfile("age is required".to_string())),
        };

        let activity_level = profile
            .activity_level
            .as_deref()
            .ok_or_else(|| CalorieError::InvalidProfile("activity level is required".to_string()))?
            .parse::<ActivityLevel>()?;

        let weight_goal_rate = profile.weight_goal_rate.unwrap_or(0.0);
        if !weight_goal_rate.is_finite()
            || !(MIN_WEIGHT_GOAL_RATE..=MAX_WEIGHT_GOAL_RATE).contains(&weight_goal_rate)
        {
            return Err(CalorieError::InvalidProfile(format!(
                "weight goal rate must be between {MIN_WEIGHT_GOAL_RATE} and {MAX_WEIGHT_GOAL_RATE} lbs/week: {weight_goal_rate}"
            )));
        }

        let daily_calorie_goal = profile
            .daily_calorie_goal
            .filter(|goal| goal.is_finite() && *goal > 0.0);

        Ok(Self {
            weight_kg,
            height_cm,
            age_years,
            sex: Sex::from_wire(profile.gender.as_deref()),
            activity_level,
            weight_goal_rate,
            daily_calorie_goal,
        })
    }
}

fn positive(value: f64, what: &str) -> Result<f64, CalorieError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(CalorieError::InvalidProfile(format!(
            "{what} must be positive: {value}"
        )))
    }
}

/// Pounds win over kilograms when both are present.
fn weight_kg(profile: &UserProfile) -> Result<f64, CalorieError> {
    match (profile.weight_lbs, profile.weight) {
        (Some(lbs), _) => Ok(positive(lbs, "weight")? * KG_PER_LB),
        (None, Some(kg)) => positive(kg, "weight"),
        (None, None) => Err(CalorieError::InvalidProfile("weight is required".to_string())),
    }
}

/// Feet/inches win over centimeters when both are present.
fn height_cm(profile: &UserProfile) -> Result<f64, CalorieError> {
    match (profile.height_feet, profile.height_inches, profile.height) {
        (Some(feet), inches, _) => {
            let total_inches = feet * 12.0 + inches.unwrap_or(0.0);
            Ok(positive(total_inches, "height")? * CM_PER_INCH)
        }
        (None, Some(inches), _) => Ok(positive(inches, "height")? * CM_PER_INCH),
        (None, None, Some(cm)) => positive(cm, "height"),
        (None, None, None) => Err(CalorieError::InvalidProfile("height is required".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric_profile() -> UserProfile {
        UserProfile {
            age: Some(30),
            gender: Some("male".to_string()),
            height: Some(180.0),
            weight: Some(80.0),
            activity_level: Some("moderately_active".to_string()),
            weight_goal_rate: Some(-1.0),
            ..Default::default()
        }
    }

    #[test]
    fn converts_imperial_units() {
        let profile = UserProfile {
            age: Some(40),
            gender: Some("Female".to_string()),
            height_feet: Some(5.0),
            height_inches: Some(6.0),
            weight_lbs: Some(150.0),
            activity_level: Some("sedentary".to_string()),
            ..Default::default()
        };

        let normalized = NormalizedProfile::from_profile(&profile).unwrap();
        assert!((normalized.weight_kg - 68.0388555).abs() < 1e-6);
        assert!((normalized.height_cm - 167.64).abs() < 1e-9);
        assert_eq!(normalized.sex, Sex::Female);
        assert_eq!(normalized.weight_goal_rate, 0.0);
    }

    #[test]
    fn keeps_metric_units() {
        let normalized = NormalizedProfile::from_profile(&metric_profile()).unwrap();
        assert_eq!(normalized.weight_kg, 80.0);
        assert_eq!(normalized.height_cm, 180.0);
        assert_eq!(normalized.age_years, 30);
        assert_eq!(normalized.activity_level, ActivityLevel::ModeratelyActive);
    }

    #[test]
    fn rejects_missing_or_non_positive_metrics() {
        let mut profile = metric_profile();
        profile.weight = None;
        assert!(matches!(
            NormalizedProfile::from_profile(&profile),
            Err(CalorieError::InvalidProfile(_))
        ));

        let mut profile = metric_profile();
        profile.height = Some(0.0);
        assert!(NormalizedProfile::from_profile(&profile).is_err());

        let mut profile = metric_profile();
        profile.age = Some(-3);
        assert!(NormalizedProfile::from_profile(&profile).is_err());
    }

    #[test]
    fn rejects_unknown_activity_level() {
        let mut profile = metric_profile();
        profile.activity_level = Some("couch_potato".to_string());
        let err = NormalizedProfile::from_profile(&profile).unwrap_err();
        assert!(err.to_string().contains("couch_potato"));

        profile.activity_level = None;
        assert!(NormalizedProfile::from_profile(&profile).is_err());
    }

    #[test]
    fn rejects_rate_outside_bounds() {
        let mut profile = metric_profile();
        profile.weight_goal_rate = Some(-2.5);
        assert!(NormalizedProfile::from_profile(&profile).is_err());

        profile.weight_goal_rate = Some(2.0);
        assert!(NormalizedProfile::from_profile(&profile).is_ok());
    }

    #[test]
    fn ignores_non_positive_override() {
        let mut profile = metric_profile();
        profile.daily_calorie_goal = Some(0.0);
        let normalized = NormalizedProfile::from_profile(&profile).unwrap();
        assert_eq!(normalized.daily_calorie_goal, None);
    }

    #[test]
    fn unspecified_sex_maps_to_other() {
        assert_eq!(Sex::from_wire(None), Sex::Other);
        assert_eq!(Sex::from_wire(Some("nonbinary")), Sex::Other);
        assert_eq!(Sex::from_wire(Some(" MALE ")), Sex::Male);
    }
}
