//! Daily calorie target from TDEE and the weekly weight-change goal.

use serde::Serialize;

use crate::energy::EnergyExpenditure;
use crate::error::CalorieError;
use crate::models::UserProfile;
use crate::profile::NormalizedProfile;
use crate::rounding;

/// Energy equivalent of one pound of body mass.
pub const CALORIES_PER_POUND: f64 = 3500.0;

/// Lowest computed target the resolver will hand out.
pub const DEFAULT_CALORIE_FLOOR: f64 = 1200.0;

const BMR_DESCRIPTION: &str = "Basal Metabolic Rate - calories burned at rest";
const TDEE_DESCRIPTION: &str = "Total Daily Energy Expenditure - calories burned with activity";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetPolicy {
    /// Safety floor for computed (non-override) targets, kcal/day
    pub calorie_floor: f64,
}

impl Default for TargetPolicy {
    fn default() -> Self {
        Self {
            calorie_floor: DEFAULT_CALORIE_FLOOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetDirection {
    Deficit,
    Surplus,
    Maintenance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub bmr_description: String,
    pub tdee_description: String,
    pub target_description: String,
    pub calculation_details: Vec<String>,
}

/// Derived calorie profile. Values are kept unrounded and serialized as whole kcal.
///
/// `target_calories == tdee + daily_deficit_surplus` always holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalorieProfile {
    #[serde(serialize_with = "rounding::whole")]
    pub bmr: f64,
    #[serde(serialize_with = "rounding::whole")]
    pub tdee: f64,
    #[serde(serialize_with = "rounding::whole")]
    pub daily_deficit_surplus: f64,
    /// Requested lbs/week; `None` for maintenance or an explicit override
    pub weekly_goal: Option<f64>,
    #[serde(serialize_with = "rounding::whole")]
    pub target_calories: f64,
    pub direction: TargetDirection,
    /// The explicit daily goal was used
    pub override_applied: bool,
    /// The computed target was raised to the safety floor
    pub floor_applied: bool,
    pub explanation: Explanation,
}

fn direction_of(daily_deficit_surplus: f64) -> TargetDirection {
    // Anything under half a kcal rounds to zero on display.
    if daily_deficit_surplus <= -0.5 {
        TargetDirection::Deficit
    } else if daily_deficit_surplus >= 0.5 {
        TargetDirection::Surplus
    } else {
        TargetDirection::Maintenance
    }
}

/// Resolve the daily target.
///
/// A positive `daily_calorie_goal` is used verbatim. Otherwise the target is
/// `tdee + rate × 3500 / 7`, raised to `policy.calorie_floor` if it would go lower.
pub fn resolve_target(
    energy: &EnergyExpenditure,
    weight_goal_rate: f64,
    daily_calorie_goal: Option<f64>,
    policy: &TargetPolicy,
) -> CalorieProfile {
    let tdee = energy.tdee;
    let mut details = vec![
        format!(
            "Your BMR is {:.0} calories per day based on your age, gender, height, and weight",
            energy.bmr
        ),
        format!(
            "With {}, your TDEE is {:.0} calories per day",
            energy.activity_level.description(),
            tdee
        ),
    ];

    if let Some(goal) = daily_calorie_goal.filter(|g| *g > 0.0) {
        let delta = goal - tdee;
        let direction = direction_of(delta);
        let target_description = match direction {
            TargetDirection::Deficit => format!(
                "Using your custom goal of {goal:.0} calories/day ({:.0} calorie deficit, {:.0} per week)",
                delta.abs(),
                delta.abs() * 7.0
            ),
            TargetDirection::Surplus => format!(
                "Using your custom goal of {goal:.0} calories/day ({delta:.0} calorie surplus, {:.0} per week)",
                delta * 7.0
            ),
            TargetDirection::Maintenance => {
                format!("Using your custom goal of {goal:.0} calories/day (maintenance)")
            }
        };
        details.push("Custom daily calorie goal overrides the weight-goal calculation".to_string());

        return CalorieProfile {
            bmr: energy.bmr,
            tdee,
            daily_deficit_surplus: delta,
            weekly_goal: None,
            target_calories: goal,
            direction,
            override_applied: true,
            floor_applied: false,
            explanation: explanation(target_description, details),
        };
    }

    if weight_goal_rate == 0.0 {
        details.push("No weight goal set - target is maintenance at TDEE".to_string());
        return CalorieProfile {
            bmr: energy.bmr,
            tdee,
            daily_deficit_surplus: 0.0,
            weekly_goal: None,
            target_calories: tdee,
            direction: TargetDirection::Maintenance,
            override_applied: false,
            floor_applied: false,
            explanation: explanation(
                format!("To maintain weight, eat {tdee:.0} calories/day"),
                details,
            ),
        };
    }

    let weekly = weight_goal_rate * CALORIES_PER_POUND;
    let mut daily = weekly / 7.0;
    let mut target = tdee + daily;
    let floor_applied = target < policy.calorie_floor;
    if floor_applied {
        target = policy.calorie_floor;
        daily = target - tdee;
    }

    let abs_rate = weight_goal_rate.abs();
    let goal_verb = if weight_goal_rate < 0.0 {
        details.push(format!(
            "Weight loss goal: {abs_rate} lb/week = {:.0} calories/week = {:.0} calorie deficit per day",
            weekly.abs(),
            weekly.abs() / 7.0
        ));
        "lose"
    } else {
        details.push(format!(
            "Weight gain goal: {abs_rate} lb/week = {weekly:.0} calories/week = {:.0} calorie surplus per day",
            weekly / 7.0
        ));
        "gain"
    };

    // Wording follows the clamped delta, which the floor may have flipped.
    let direction = direction_of(daily);
    let floor_note = if floor_applied {
        details.push(format!(
            "Target raised to the {:.0} calorie safety minimum",
            policy.calorie_floor
        ));
        format!(", raised to the {:.0} minimum", policy.calorie_floor)
    } else {
        String::new()
    };
    let delta_phrase = match direction {
        TargetDirection::Deficit => format!("{:.0} calorie deficit", daily.abs()),
        TargetDirection::Surplus => format!("{daily:.0} calorie surplus"),
        TargetDirection::Maintenance => "maintenance".to_string(),
    };
    let target_description = format!(
        "To {goal_verb} {abs_rate} lb/week, eat {target:.0} calories/day ({delta_phrase}{floor_note})"
    );

    CalorieProfile {
        bmr: energy.bmr,
        tdee,
        daily_deficit_surplus: daily,
        weekly_goal: Some(weight_goal_rate),
        target_calories: target,
        direction,
        override_applied: false,
        floor_applied,
        explanation: explanation(target_description, details),
    }
}

fn explanation(target_description: String, calculation_details: Vec<String>) -> Explanation {
    Explanation {
        bmr_description: BMR_DESCRIPTION.to_string(),
        tdee_description: TDEE_DESCRIPTION.to_string(),
        target_description,
        calculation_details,
    }
}

impl CalorieProfile {
    pub fn from_normalized(profile: &NormalizedProfile, policy: &TargetPolicy) -> Self {
        let energy = EnergyExpenditure::from_normalized(profile);
        resolve_target(
            &energy,
            profile.weight_goal_rate,
            profile.daily_calorie_goal,
            policy,
        )
    }

    /// Full pipeline from the wire profile.
    ///
    /// # Errors
    ///
    /// Returns `CalorieError::InvalidProfile` if the profile fails validation.
    pub fn from_profile(profile: &UserProfile, policy: &TargetPolicy) -> Result<Self, CalorieError> {
        NormalizedProfile::from_profile(profile).map(|p| Self::from_normalized(&p, policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ActivityLevel;

    fn energy(tdee: f64) -> EnergyExpenditure {
        EnergyExpenditure {
            bmr: tdee / 1.55,
            tdee,
            activity_level: ActivityLevel::ModeratelyActive,
        }
    }

    #[test]
    fn maintenance_targets_tdee() {
        for tdee in [1500.0, 2200.0, 3100.5] {
            let profile = resolve_target(&energy(tdee), 0.0, None, &TargetPolicy::default());
            assert_eq!(profile.target_calories, tdee);
            assert_eq!(profile.daily_deficit_surplus, 0.0);
            assert_eq!(profile.direction, TargetDirection::Maintenance);
            assert_eq!(profile.weekly_goal, None);
        }
    }

    #[test]
    fn one_pound_loss_is_500_below_tdee() {
        let profile = resolve_target(&energy(2400.0), -1.0, None, &TargetPolicy::default());
        assert!((profile.target_calories - 1900.0).abs() < 1.0);
        assert!((profile.daily_deficit_surplus + 500.0).abs() < 1.0);
        assert_eq!(profile.direction, TargetDirection::Deficit);
        assert_eq!(profile.weekly_goal, Some(-1.0));
        assert!(profile
            .explanation
            .target_description
            .starts_with("To lose 1 lb/week, eat 1900 calories/day"));
    }

    #[test]
    fn gain_adds_surplus() {
        let profile = resolve_target(&energy(2000.0), 0.5, None, &TargetPolicy::default());
        assert!((profile.target_calories - 2250.0).abs() < 1e-9);
        assert_eq!(profile.direction, TargetDirection::Surplus);
        assert!(profile.explanation.target_description.contains("250 calorie surplus"));
    }

    #[test]
    fn computed_target_is_floored() {
        let profile = resolve_target(&energy(1500.0), -2.0, None, &TargetPolicy::default());
        assert!(profile.floor_applied);
        assert_eq!(profile.target_calories, DEFAULT_CALORIE_FLOOR);
        assert_eq!(
            profile.target_calories,
            profile.tdee + profile.daily_deficit_surplus
        );
    }

    #[test]
    fn floor_above_tdee_reads_as_surplus() {
        let profile = resolve_target(&energy(1100.0), -1.0, None, &TargetPolicy::default());
        assert!(profile.floor_applied);
        assert_eq!(profile.target_calories, 1200.0);
        assert_eq!(profile.daily_deficit_surplus, 100.0);
        assert_eq!(profile.direction, TargetDirection::Surplus);
        assert_eq!(
            profile.explanation.target_description,
            "To lose 1 lb/week, eat 1200 calories/day (100 calorie surplus, raised to the 1200 minimum)"
        );
    }

    #[test]
    fn floor_below_tdee_keeps_deficit_wording() {
        let profile = resolve_target(&energy(1500.0), -2.0, None, &TargetPolicy::default());
        assert_eq!(profile.direction, TargetDirection::Deficit);
        assert!(profile
            .explanation
            .target_description
            .ends_with("(300 calorie deficit, raised to the 1200 minimum)"));
    }

    #[test]
    fn override_wins_and_reports_delta() {
        let profile = resolve_target(&energy(2500.0), -1.0, Some(1000.0), &TargetPolicy::default());
        assert!(profile.override_applied);
        assert!(!profile.floor_applied);
        assert_eq!(profile.target_calories, 1000.0);
        assert_eq!(profile.daily_deficit_surplus, -1500.0);
        assert_eq!(profile.weekly_goal, None);
    }

    #[test]
    fn reference_scenario_from_wire_profile() {
        let user = UserProfile {
            age: Some(30),
            gender: Some("male".to_string()),
            height: Some(180.0),
            weight: Some(80.0),
            activity_level: Some("moderately_active".to_string()),
            weight_goal_rate: Some(-1.0),
            ..Default::default()
        };

        let profile = CalorieProfile::from_profile(&user, &TargetPolicy::default()).unwrap();
        assert_eq!(profile.bmr, 1780.0);
        assert!((profile.tdee - 2759.0).abs() < 1e-9);
        assert!((profile.target_calories - 2259.0).abs() < 1.0);
    }

    #[test]
    fn serializes_whole_kcal() {
        let profile = resolve_target(&energy(2797.75), -1.0, None, &TargetPolicy::default());
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["tdee"], 2798);
        assert_eq!(json["target_calories"], 2298);
        assert_eq!(json["daily_deficit_surplus"], -500);
        assert_eq!(json["direction"], "deficit");
    }
}
