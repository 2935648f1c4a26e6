use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use reqwest::Client;
use serde::Deserialize;
use tracing::{error, info};

use crate::auth::BackendAuth;
use crate::balance::WEEK_DAYS;
use crate::config::ClientConfig;
use crate::error::{ApiError, BalanceError};
use crate::models::*;
use crate::report::{build_report, build_weekly_report, CalorieBalanceReport, ReportSettings, WeeklyReport};
use crate::rest::RestClient;
use crate::stats::{ActivityStats, NutritionStats};

#[derive(Deserialize)]
struct NutritionLogs {
    nutrition_logs: Vec<NutritionLogEntry>,
}

#[derive(Deserialize)]
struct Activities {
    activities: Vec<ActivityLogEntry>,
}

#[derive(Deserialize)]
struct Goals {
    goals: Vec<Goal>,
}

#[derive(Deserialize)]
struct NutritionCreated {
    nutrition: NutritionLogEntry,
}

#[derive(Deserialize)]
struct ActivityCreated {
    activity: ActivityLogEntry,
}

#[derive(Deserialize)]
struct GoalEnvelope {
    goal: Goal,
}

#[derive(Deserialize)]
struct ProfileUpdated {
    user: UserProfile,
}

/// Number of days to request so that entries dated `day` are included.
///
/// The backend filters by `now - days`, so one extra day covers time zone skew.
fn window_days_covering(day: NaiveDate, local_today: NaiveDate) -> u32 {
    let lag = (local_today - day).num_days().max(0);
    u32::try_from(lag + 2).unwrap_or(u32::MAX)
}

#[derive(Clone)]
pub struct FitnessClient {
    rest: RestClient,
    settings: ReportSettings,
}

impl FitnessClient {
    fn http_client(config: &ClientConfig) -> Result<Client> {
        Ok(Client::builder().timeout(config.timeout).build()?)
    }

    /// Client for a pre-issued access token.
    pub fn with_token(config: &ClientConfig, access_token: String) -> Result<Self> {
        let http = Self::http_client(config)?;
        let auth = BackendAuth::with_token(http.clone(), &config.api_url, access_token);
        Ok(Self {
            rest: RestClient::new(http, auth),
            settings: config.report_settings(),
        })
    }

    /// Sign in with email (or username) and password.
    pub async fn login(config: &ClientConfig, email: &str, password: &str) -> Result<Self> {
        let http = Self::http_client(config)?;
        let (auth, _) = BackendAuth::sign_in(http.clone(), &config.api_url, email, password).await?;
        Ok(Self {
            rest: RestClient::new(http, auth),
            settings: config.report_settings(),
        })
    }

    /// Token from the config if present, otherwise email/password login.
    pub async fn from_config(config: &ClientConfig) -> Result<Self> {
        if let Some(token) = &config.token {
            return Self::with_token(config, token.clone());
        }
        match (&config.email, &config.password) {
            (Some(email), Some(password)) => Self::login(config, email, password).await,
            _ => Err(ApiError::NotLoggedIn.into()),
        }
    }

    pub fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    // --- Profile ---

    pub async fn get_profile(&self) -> Result<UserProfile> {
        self.rest.get("auth/profile", &[]).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile> {
        let resp: ProfileUpdated = self.rest.put("auth/profile", update).await?;
        Ok(resp.user)
    }

    // --- Nutrition ---

    /// Nutrition entries from the last `days` days, optionally for one meal type.
    pub async fn get_nutrition_logs(
        &self,
        days: u32,
        meal_type: Option<MealType>,
    ) -> Result<Vec<NutritionLogEntry>> {
        let mut query = vec![("days", days.to_string())];
        if let Some(meal_type) = meal_type {
            query.push(("meal_type", meal_type.as_str().to_string()));
        }
        let resp: NutritionLogs = self.rest.get("nutrition", &query).await?;
        Ok(resp.nutrition_logs)
    }

    pub async fn log_nutrition(&self, entry: &NewNutritionEntry) -> Result<NutritionLogEntry> {
        let resp: NutritionCreated = self.rest.post("nutrition", entry).await?;
        info!(food = %resp.nutrition.food_name, calories = resp.nutrition.calories, "logged nutrition");
        Ok(resp.nutrition)
    }

    pub async fn delete_nutrition_entry(&self, id: i64) -> Result<()> {
        self.rest.delete(&format!("nutrition/{}", id)).await
    }

    // --- Activities ---

    pub async fn get_activities(
        &self,
        days: u32,
        activity_type: Option<ActivityType>,
    ) -> Result<Vec<ActivityLogEntry>> {
        let mut query = vec![("days", days.to_string())];
        if let Some(activity_type) = activity_type {
            query.push(("type", activity_type.as_str().to_string()));
        }
        let resp: Activities = self.rest.get("activities", &query).await?;
        Ok(resp.activities)
    }

    pub async fn log_activity(&self, activity: &NewActivity) -> Result<ActivityLogEntry> {
        let resp: ActivityCreated = self.rest.post("activities", activity).await?;
        info!(title = %resp.activity.title, calories = resp.activity.calories_burned, "logged activity");
        Ok(resp.activity)
    }

    pub async fn delete_activity(&self, id: i64) -> Result<()> {
        self.rest.delete(&format!("activities/{}", id)).await
    }

    // --- Goals ---

    pub async fn get_goals(&self, status: Option<GoalStatus>) -> Result<Vec<Goal>> {
        let query: Vec<(&str, String)> = status
            .map(|s| vec![("status", s.as_str().to_string())])
            .unwrap_or_default();
        let resp: Goals = self.rest.get("goals", &query).await?;
        Ok(resp.goals)
    }

    pub async fn create_goal(&self, goal: &NewGoal) -> Result<Goal> {
        let resp: GoalEnvelope = self.rest.post("goals", goal).await?;
        Ok(resp.goal)
    }

    pub async fn update_goal(&self, id: i64, update: &GoalUpdate) -> Result<Goal> {
        let resp: GoalEnvelope = self.rest.put(&format!("goals/{}", id), update).await?;
        Ok(resp.goal)
    }

    pub async fn delete_goal(&self, id: i64) -> Result<()> {
        self.rest.delete(&format!("goals/{}", id)).await
    }

    /// Record progress on a goal; the backend completes it once the target is reached.
    pub async fn update_goal_progress(&self, id: i64, update: ProgressUpdate) -> Result<Goal> {
        let resp: GoalEnvelope = self
            .rest
            .post(&format!("goals/{}/progress", id), &update)
            .await?;
        if resp.goal.status == GoalStatus::Completed {
            info!(goal_id = id, title = %resp.goal.title, "goal completed");
        }
        Ok(resp.goal)
    }

    // --- Dashboard ---

    async fn fetch_day_inputs(
        &self,
        days: u32,
    ) -> Result<(UserProfile, Vec<NutritionLogEntry>, Vec<ActivityLogEntry>)> {
        tokio::try_join!(
            self.get_profile(),
            self.get_nutrition_logs(days, None),
            self.get_activities(days, None),
        )
    }

    /// Calorie balance for `today`, evaluated at local time `now`.
    ///
    /// Backend timestamps are UTC; entries are assigned to the system's local day.
    ///
    /// The three reads run concurrently; the first failure aborts the rest and
    /// is reported as [`BalanceError::UpstreamFetch`].
    pub async fn calorie_balance(
        &self,
        today: NaiveDate,
        now: NaiveTime,
    ) -> Result<CalorieBalanceReport, BalanceError> {
        let days = window_days_covering(today, Local::now().date_naive());
        let (profile, nutrition, activities) =
            self.fetch_day_inputs(days).await.map_err(|e| {
                error!(error = %e, "calorie balance reads failed");
                BalanceError::UpstreamFetch(e.to_string())
            })?;

        Ok(build_report(
            &profile,
            &nutrition,
            &activities,
            today,
            now,
            &Local,
            &self.settings,
        ))
    }

    /// Calorie balance for the current local day.
    pub async fn calorie_balance_now(&self) -> Result<CalorieBalanceReport, BalanceError> {
        let now: NaiveDateTime = Local::now().naive_local();
        self.calorie_balance(now.date(), now.time()).await
    }

    /// Seven-day summary ending on `end`.
    pub async fn weekly_summary(&self, end: NaiveDate) -> Result<WeeklyReport, BalanceError> {
        let lag = window_days_covering(end, Local::now().date_naive());
        let days = lag + u32::try_from(WEEK_DAYS).unwrap_or(7);
        let (profile, nutrition, activities) =
            self.fetch_day_inputs(days).await.map_err(|e| {
                error!(error = %e, "weekly summary reads failed");
                BalanceError::UpstreamFetch(e.to_string())
            })?;

        Ok(build_weekly_report(
            &profile,
            &nutrition,
            &activities,
            end,
            &Local,
            &self.settings,
        ))
    }

    // --- Stats ---

    pub async fn nutrition_stats(&self, days: u32) -> Result<NutritionStats> {
        let entries = self.get_nutrition_logs(days, None).await?;
        Ok(NutritionStats::from_entries(&entries, days))
    }

    pub async fn activity_stats(&self, days: u32) -> Result<ActivityStats> {
        let entries = self.get_activities(days, None).await?;
        Ok(ActivityStats::from_entries(&entries))
    }
}
