//! Goal progress and weight-goal pacing.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::{Goal, GoalStatus, ProgressUpdate, UserProfile};
use crate::rounding::round_to;

impl Goal {
    /// Unclamped progress, `current / target × 100`; 0 for a non-positive target.
    pub fn progress_percentage(&self) -> f64 {
        if self.target_value > 0.0 {
            self.current_value / self.target_value * 100.0
        } else {
            0.0
        }
    }

    /// Progress as shown to the user: capped at 100, one decimal.
    pub fn display_progress(&self) -> f64 {
        round_to(self.progress_percentage().min(100.0), 1)
    }

    /// Apply a progress update and complete the goal if it reached its target.
    ///
    /// The value change and the status transition happen in one call, so a
    /// goal is completed at most once. Returns `true` when this update
    /// completed it.
    pub fn apply_progress(&mut self, update: ProgressUpdate, now: NaiveDateTime) -> bool {
        match update {
            ProgressUpdate::Increment(delta) => self.current_value += delta,
            ProgressUpdate::CurrentValue(value) => self.current_value = value,
        }

        if self.status == GoalStatus::Active && self.current_value >= self.target_value {
            self.status = GoalStatus::Completed;
            self.completed_at = Some(now);
            return true;
        }
        false
    }
}

/// Body-weight goal as shown alongside the calorie balance.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeightGoalProgress {
    pub current_weight: Option<f64>,
    pub target_weight: Option<f64>,
    /// target − current (lbs), negative when losing
    pub weight_to_goal: Option<f64>,
    pub weekly_rate: Option<f64>,
    /// Weeks until a weight-loss target at the current rate, one decimal
    pub weeks_to_goal: Option<f64>,
}

impl WeightGoalProgress {
    pub fn from_profile(profile: &UserProfile) -> Self {
        let current_weight = profile.weight_lbs;
        let target_weight = profile.target_weight_lbs;
        let weekly_rate = profile.weight_goal_rate;

        let weight_to_goal = match (current_weight, target_weight) {
            (Some(current), Some(target)) => Some(target - current),
            _ => None,
        };

        // Pace is only reported while losing toward a lower target.
        let weeks_to_goal = match (weight_to_goal, weekly_rate) {
            (Some(diff), Some(rate)) if rate < 0.0 && diff < 0.0 => Some(round_to(diff / rate, 1)),
            _ => None,
        };

        Self {
            current_weight,
            target_weight,
            weight_to_goal,
            weekly_rate,
            weeks_to_goal,
        }
    }
}
