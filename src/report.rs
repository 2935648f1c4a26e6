//! Assembles the calorie-balance result for one day.

use chrono::{NaiveDate, NaiveTime, TimeZone};
use serde::Serialize;
use tracing::{debug, warn};

use crate::advice::{generate_tips, AdvisoryConfig};
use crate::balance::{daily_balance, weekly_summary, DailyBalanceSnapshot, WeeklySummary};
use crate::goals::WeightGoalProgress;
use crate::models::{ActivityLogEntry, NutritionLogEntry, UserProfile};
use crate::target::{CalorieProfile, TargetPolicy};

/// Knobs for the policy decisions in the computation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReportSettings {
    pub target: TargetPolicy,
    pub advice: AdvisoryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalorieBalanceReport {
    /// `None` when the profile is incomplete or invalid
    pub calorie_profile: Option<CalorieProfile>,
    pub today: DailyBalanceSnapshot,
    pub user_goals: WeightGoalProgress,
    pub tips: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_issue: Option<String>,
}

fn resolve_profile(
    profile: &UserProfile,
    policy: &TargetPolicy,
) -> (Option<CalorieProfile>, Option<String>) {
    match CalorieProfile::from_profile(profile, policy) {
        Ok(calories) => (Some(calories), None),
        Err(err) => {
            warn!(user_id = ?profile.id, error = %err, "cannot derive calorie profile");
            (None, Some(err.to_string()))
        }
    }
}

/// Build the report for `today`, with `now` as the wall-clock time used by the tips.
///
/// Both are in `tz`, which also decides which day each logged entry falls on.
/// An invalid profile does not fail the report: the day is still aggregated
/// against an absent target and the issue is reported alongside.
pub fn build_report<Tz: TimeZone>(
    profile: &UserProfile,
    nutrition: &[NutritionLogEntry],
    activities: &[ActivityLogEntry],
    today: NaiveDate,
    now: NaiveTime,
    tz: &Tz,
    settings: &ReportSettings,
) -> CalorieBalanceReport {
    let (calorie_profile, profile_issue) = resolve_profile(profile, &settings.target);
    let target = calorie_profile.as_ref().map(|p| p.target_calories);

    let snapshot = daily_balance(today, tz, target, nutrition, activities);
    let user_goals = WeightGoalProgress::from_profile(profile);
    let tips = generate_tips(
        &snapshot,
        calorie_profile.as_ref(),
        &user_goals,
        now,
        &settings.advice,
    );

    debug!(
        %today,
        net_calories = snapshot.net_calories,
        percentage = snapshot.percentage_consumed,
        tips = tips.len(),
        "built calorie balance"
    );

    CalorieBalanceReport {
        calorie_profile,
        today: snapshot,
        user_goals,
        tips,
        profile_issue,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyReport {
    #[serde(flatten)]
    pub summary: WeeklySummary,
    pub calorie_profile: Option<CalorieProfile>,
}

pub fn build_weekly_report<Tz: TimeZone>(
    profile: &UserProfile,
    nutrition: &[NutritionLogEntry],
    activities: &[ActivityLogEntry],
    end: NaiveDate,
    tz: &Tz,
    settings: &ReportSettings,
) -> WeeklyReport {
    let (calorie_profile, _) = resolve_profile(profile, &settings.target);
    let target = calorie_profile.as_ref().map(|p| p.target_calories);

    WeeklyReport {
        summary: weekly_summary(end, tz, target, nutrition, activities),
        calorie_profile,
    }
}
