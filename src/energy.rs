//! BMR and TDEE using the Mifflin-St Jeor equation.
//!
//! BMR = 10 × weight_kg + 6.25 × height_cm − 5 × age + offset, where the offset
//! depends on the sex category. TDEE scales BMR by the activity multiplier.

use serde::Serialize;

use crate::error::CalorieError;
use crate::models::UserProfile;
use crate::profile::{ActivityLevel, NormalizedProfile, Sex};

/// Mifflin-St Jeor coefficients.
mod mifflin {
    pub const WEIGHT: f64 = 10.0;
    pub const HEIGHT: f64 = 6.25;
    pub const AGE: f64 = 5.0;
    pub const MALE_OFFSET: f64 = 5.0;
    pub const FEMALE_OFFSET: f64 = -161.0;
    /// Midpoint of the male and female offsets.
    pub const UNSPECIFIED_OFFSET: f64 = -78.0;
}

/// Energy expenditure for one profile snapshot, kcal/day at full precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergyExpenditure {
    pub bmr: f64,
    pub tdee: f64,
    pub activity_level: ActivityLevel,
}

pub fn sex_offset(sex: Sex) -> f64 {
    match sex {
        Sex::Male => mifflin::MALE_OFFSET,
        Sex::Female => mifflin::FEMALE_OFFSET,
        Sex::Other => mifflin::UNSPECIFIED_OFFSET,
    }
}

/// Basal Metabolic Rate in kcal/day.
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age_years: u32, sex: Sex) -> f64 {
    mifflin::WEIGHT * weight_kg + mifflin::HEIGHT * height_cm - mifflin::AGE * f64::from(age_years)
        + sex_offset(sex)
}

/// Total Daily Energy Expenditure in kcal/day.
pub fn calculate_tdee(bmr: f64, activity_level: ActivityLevel) -> f64 {
    bmr * activity_level.multiplier()
}

impl EnergyExpenditure {
    pub fn from_normalized(profile: &NormalizedProfile) -> Self {
        let bmr = calculate_bmr(
            profile.weight_kg,
            profile.height_cm,
            profile.age_years,
            profile.sex,
        );
        Self {
            bmr,
            tdee: calculate_tdee(bmr, profile.activity_level),
            activity_level: profile.activity_level,
        }
    }

    /// Normalizes and validates the wire profile, then computes BMR and TDEE.
    ///
    /// # Errors
    ///
    /// Returns `CalorieError::InvalidProfile` when weight, height or age is
    /// missing or non-positive, or the activity level is not recognized.
    pub fn from_profile(profile: &UserProfile) -> Result<Self, CalorieError> {
        NormalizedProfile::from_profile(profile).map(|p| Self::from_normalized(&p))
    }
}
