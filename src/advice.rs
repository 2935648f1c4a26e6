//! Rule-based tips derived from the daily snapshot. Deterministic, no I/O.

use chrono::NaiveTime;

use crate::balance::DailyBalanceSnapshot;
use crate::goals::WeightGoalProgress;
use crate::target::CalorieProfile;

/// Above this share of the target the day is over.
pub const OVER_TARGET_PERCENT: f64 = 100.0;
/// From this share up to and including 100% the day is close to the target.
pub const APPROACHING_TARGET_PERCENT: f64 = 90.0;
/// Below this share, late in the day, the user is likely under-eating.
pub const UNDER_EATING_PERCENT: f64 = 50.0;

pub const DEFAULT_UNDER_EATING_HOUR: u32 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvisoryConfig {
    /// Local time of day after which a low intake triggers the under-eating tip
    pub under_eating_after: NaiveTime,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            under_eating_after: NaiveTime::from_hms_opt(DEFAULT_UNDER_EATING_HOUR, 0, 0)
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeStatus {
    OverTarget,
    ApproachingTarget,
    UnderEating,
    OnTrack,
}

/// First matching rule wins.
pub fn classify_intake(percentage_consumed: f64, now: NaiveTime, config: &AdvisoryConfig) -> IntakeStatus {
    if percentage_consumed > OVER_TARGET_PERCENT {
        IntakeStatus::OverTarget
    } else if percentage_consumed >= APPROACHING_TARGET_PERCENT {
        IntakeStatus::ApproachingTarget
    } else if percentage_consumed < UNDER_EATING_PERCENT && now >= config.under_eating_after {
        IntakeStatus::UnderEating
    } else {
        IntakeStatus::OnTrack
    }
}

fn intake_tip(snapshot: &DailyBalanceSnapshot, status: IntakeStatus) -> Option<String> {
    let remaining = snapshot.remaining_calories?;
    match status {
        IntakeStatus::OverTarget => Some(format!(
            "You're {:.0} calories over your target. Consider adjusting tomorrow or adding exercise",
            remaining.abs()
        )),
        IntakeStatus::ApproachingTarget if remaining.round() <= 0.0 => {
            Some("You're right on target! Great job!".to_string())
        }
        IntakeStatus::ApproachingTarget => Some(format!(
            "You're close to your target with {remaining:.0} calories left for today"
        )),
        IntakeStatus::UnderEating => Some(format!(
            "You've only eaten {:.0}% of your target so far. Make sure you're fueling enough - {remaining:.0} calories remaining",
            snapshot.percentage_consumed
        )),
        IntakeStatus::OnTrack => {
            Some(format!("You have {remaining:.0} calories remaining for today"))
        }
    }
}

/// Build the ordered tip list.
///
/// Categories fire independently, in order: missing profile, intake status,
/// activity, weight-goal pace.
pub fn generate_tips(
    snapshot: &DailyBalanceSnapshot,
    profile: Option<&CalorieProfile>,
    weight_goal: &WeightGoalProgress,
    now: NaiveTime,
    config: &AdvisoryConfig,
) -> Vec<String> {
    let mut tips = Vec::new();

    match profile {
        Some(_) => {
            let status = classify_intake(snapshot.percentage_consumed, now, config);
            tips.extend(intake_tip(snapshot, status));
        }
        None => tips.push(
            "Complete your profile (weight, height, age, gender, activity level) to see calorie calculations"
                .to_string(),
        ),
    }

    if snapshot.calories_burned_exercise == 0.0 && snapshot.workout_count == 0 {
        tips.push("No activity logged today - even a short walk adds to your calorie burn".to_string());
    }

    if let Some(weeks) = weight_goal.weeks_to_goal {
        tips.push(format!(
            "At your current rate, you'll reach your goal in about {weeks} weeks"
        ));
    }

    tips
}
