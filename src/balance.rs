//! Daily and weekly calorie balance over already-fetched log entries.

use chrono::{Duration, NaiveDate, NaiveDateTime, TimeZone};
use serde::Serialize;

use crate::models::{ActivityLogEntry, NutritionLogEntry};
use crate::rounding;

/// Number of days covered by `weekly_summary`.
pub const WEEK_DAYS: i64 = 7;

/// One day's balance against the target. Recomputed per request, never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyBalanceSnapshot {
    pub date: NaiveDate,
    #[serde(serialize_with = "rounding::whole_opt")]
    pub target_calories: Option<f64>,
    #[serde(serialize_with = "rounding::whole")]
    pub calories_consumed: f64,
    #[serde(serialize_with = "rounding::whole")]
    pub calories_burned_exercise: f64,
    #[serde(serialize_with = "rounding::whole")]
    pub net_calories: f64,
    /// Omitted when there is no positive target
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "rounding::whole_opt"
    )]
    pub remaining_calories: Option<f64>,
    /// Unrounded; serialized to the nearest whole percent
    #[serde(serialize_with = "rounding::whole")]
    pub percentage_consumed: f64,
    pub meal_count: usize,
    pub workout_count: usize,
}

/// `net / target × 100`, or 0 when the target is missing or not positive.
pub fn percentage_of_target(net_calories: f64, target_calories: Option<f64>) -> f64 {
    match target_calories {
        Some(target) if target > 0.0 => net_calories / target * 100.0,
        _ => 0.0,
    }
}

/// Calendar day in `tz` of a backend timestamp. The backend stores naive UTC.
pub fn local_date<Tz: TimeZone>(utc: &NaiveDateTime, tz: &Tz) -> NaiveDate {
    tz.from_utc_datetime(utc).date_naive()
}

fn consumed_on<'a, Tz: TimeZone>(
    date: NaiveDate,
    tz: &'a Tz,
    nutrition: &'a [NutritionLogEntry],
) -> impl Iterator<Item = &'a NutritionLogEntry> {
    nutrition
        .iter()
        .filter(move |e| local_date(&e.date, tz) == date)
}

fn burned_on<'a, Tz: TimeZone>(
    date: NaiveDate,
    tz: &'a Tz,
    activities: &'a [ActivityLogEntry],
) -> impl Iterator<Item = &'a ActivityLogEntry> {
    activities
        .iter()
        .filter(move |e| local_date(&e.date, tz) == date)
}

/// Aggregate the entries falling on `date` in `tz` into a snapshot.
///
/// Entries on other days are ignored, so callers can pass a wider fetch window.
pub fn daily_balance<Tz: TimeZone>(
    date: NaiveDate,
    tz: &Tz,
    target_calories: Option<f64>,
    nutrition: &[NutritionLogEntry],
    activities: &[ActivityLogEntry],
) -> DailyBalanceSnapshot {
    let (calories_consumed, meal_count) = consumed_on(date, tz, nutrition)
        .fold((0.0, 0), |(sum, n), e| (sum + e.calories, n + 1));
    let (calories_burned_exercise, workout_count) = burned_on(date, tz, activities)
        .fold((0.0, 0), |(sum, n), e| (sum + e.calories_burned, n + 1));

    let net_calories = calories_consumed - calories_burned_exercise;
    let remaining_calories = target_calories
        .filter(|t| *t > 0.0)
        .map(|t| t - net_calories);

    DailyBalanceSnapshot {
        date,
        target_calories,
        calories_consumed,
        calories_burned_exercise,
        net_calories,
        remaining_calories,
        percentage_consumed: percentage_of_target(net_calories, target_calories),
        meal_count,
        workout_count,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    #[serde(serialize_with = "rounding::whole")]
    pub calories_consumed: f64,
    #[serde(serialize_with = "rounding::whole")]
    pub calories_burned: f64,
    #[serde(serialize_with = "rounding::whole")]
    pub net_calories: f64,
    #[serde(serialize_with = "rounding::whole_opt")]
    pub target_calories: Option<f64>,
    #[serde(serialize_with = "rounding::whole_opt")]
    pub remaining_calories: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyAverages {
    #[serde(serialize_with = "rounding::whole")]
    pub avg_consumed: f64,
    #[serde(serialize_with = "rounding::whole")]
    pub avg_burned: f64,
    #[serde(serialize_with = "rounding::whole")]
    pub avg_net_calories: f64,
    #[serde(serialize_with = "rounding::whole_opt")]
    pub target_calories: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySummary {
    pub period: Period,
    /// Oldest day first
    pub daily_data: Vec<DailySummary>,
    pub weekly_averages: WeeklyAverages,
}

/// Per-day balance for the seven days ending on `end` (inclusive), with averages.
pub fn weekly_summary<Tz: TimeZone>(
    end: NaiveDate,
    tz: &Tz,
    target_calories: Option<f64>,
    nutrition: &[NutritionLogEntry],
    activities: &[ActivityLogEntry],
) -> WeeklySummary {
    let start = end - Duration::days(WEEK_DAYS - 1);

    let daily_data: Vec<DailySummary> = (0..WEEK_DAYS)
        .map(|offset| {
            let day = daily_balance(
                start + Duration::days(offset),
                tz,
                target_calories,
                nutrition,
                activities,
            );
            DailySummary {
                date: day.date,
                calories_consumed: day.calories_consumed,
                calories_burned: day.calories_burned_exercise,
                net_calories: day.net_calories,
                target_calories,
                remaining_calories: day.remaining_calories,
            }
        })
        .collect();

    let total_consumed: f64 = daily_data.iter().map(|d| d.calories_consumed).sum();
    let total_burned: f64 = daily_data.iter().map(|d| d.calories_burned).sum();
    let days = WEEK_DAYS as f64;

    WeeklySummary {
        period: Period {
            start,
            end,
            days: WEEK_DAYS,
        },
        daily_data,
        weekly_averages: WeeklyAverages {
            avg_consumed: total_consumed / days,
            avg_burned: total_burned / days,
            avg_net_calories: (total_consumed - total_burned) / days,
            target_calories,
        },
    }
}
