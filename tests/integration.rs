use chrono::{Local, NaiveDate, NaiveTime, TimeZone};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

use fitness_tracker_api::config::ClientConfig;
use fitness_tracker_api::models::{GoalStatus, MealType, ProgressUpdate};
use fitness_tracker_api::{BalanceError, FitnessClient};

const TOKEN: &str = "test-token";

fn config_for(server: &ServerGuard) -> ClientConfig {
    ClientConfig {
        api_url: format!("{}/api", server.url()),
        ..ClientConfig::default()
    }
}

fn client_for(server: &ServerGuard) -> FitnessClient {
    FitnessClient::with_token(&config_for(server), TOKEN.to_string()).unwrap()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Backend timestamp (naive UTC) for a local wall-clock hour on `day`.
fn stamp(day: NaiveDate, hour: u32) -> String {
    let local = day.and_hms_opt(hour, 0, 0).unwrap();
    Local
        .from_local_datetime(&local)
        .earliest()
        .unwrap()
        .naive_utc()
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
}

fn profile_body() -> String {
    json!({
        "id": 7,
        "email": "sam@example.com",
        "username": "sam",
        "age": 30,
        "gender": "male",
        "height_feet": null,
        "height_inches": null,
        "height": 180.0,
        "weight": 80.0,
        "weight_lbs": null,
        "activity_level": "moderately_active",
        "weight_goal_rate": 0.0,
        "daily_calorie_goal": 2000
    })
    .to_string()
}

fn nutrition_body(day: NaiveDate) -> String {
    json!({
        "nutrition_logs": [
            {"id": 1, "meal_type": "breakfast", "food_name": "Oats", "calories": 600, "protein": 20, "date": stamp(day, 8)},
            {"id": 2, "meal_type": "lunch", "food_name": "Salad", "calories": 700, "date": stamp(day, 13)},
            {"id": 3, "meal_type": "dinner", "food_name": "Pasta", "calories": 500, "date": stamp(day, 19)},
            {"id": 4, "meal_type": "snack", "food_name": "Yesterday's chips", "calories": 400,
             "date": stamp(day.pred_opt().unwrap(), 22)}
        ],
        "count": 4
    })
    .to_string()
}

fn activities_body(day: NaiveDate) -> String {
    json!({
        "activities": [
            {"id": 1, "activity_type": "cardio", "title": "Run", "duration_minutes": 30,
             "distance": 5.0, "calories_burned": 300, "intensity": "high", "date": stamp(day, 7)}
        ],
        "count": 1
    })
    .to_string()
}

async fn mock_json(server: &mut ServerGuard, path: &str, body: String) -> mockito::Mock {
    server
        .mock("GET", path)
        .match_query(Matcher::Any)
        .match_header("authorization", format!("Bearer {}", TOKEN).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

#[tokio::test]
async fn profile_request_sends_bearer_token() {
    let mut server = Server::new_async().await;
    let mock = mock_json(&mut server, "/api/auth/profile", profile_body()).await;

    let profile = client_for(&server).get_profile().await.unwrap();

    mock.assert_async().await;
    assert_eq!(profile.id, Some(7));
    assert_eq!(profile.activity_level.as_deref(), Some("moderately_active"));
    assert_eq!(profile.daily_calorie_goal, Some(2000.0));
}

#[tokio::test]
async fn nutrition_logs_pass_filters_as_query() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/nutrition")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("days".into(), "3".into()),
            Matcher::UrlEncoded("meal_type".into(), "lunch".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(nutrition_body(today()))
        .create_async()
        .await;

    let logs = client_for(&server)
        .get_nutrition_logs(3, Some(MealType::Lunch))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(logs.len(), 4);
    assert_eq!(logs[0].food_name, "Oats");
    assert_eq!(logs[0].quantity, 1.0);
}

#[tokio::test]
async fn calorie_balance_joins_reads_into_report() {
    let mut server = Server::new_async().await;
    let day = today();
    let _profile = mock_json(&mut server, "/api/auth/profile", profile_body()).await;
    let _nutrition = mock_json(&mut server, "/api/nutrition", nutrition_body(day)).await;
    let _activities = mock_json(&mut server, "/api/activities", activities_body(day)).await;

    let report = client_for(&server)
        .calorie_balance(day, NaiveTime::from_hms_opt(20, 0, 0).unwrap())
        .await
        .unwrap();

    assert_eq!(report.today.date, day);
    assert_eq!(report.today.calories_consumed, 1800.0);
    assert_eq!(report.today.calories_burned_exercise, 300.0);
    assert_eq!(report.today.net_calories, 1500.0);
    assert_eq!(report.today.remaining_calories, Some(500.0));
    assert_eq!(report.today.percentage_consumed, 75.0);
    assert_eq!(report.today.meal_count, 3);
    assert_eq!(report.today.workout_count, 1);

    let calories = report.calorie_profile.as_ref().unwrap();
    assert_eq!(calories.target_calories, 2000.0);
    assert_eq!(report.tips[0], "You have 500 calories remaining for today");
}

#[tokio::test]
async fn null_activity_columns_do_not_fail_the_balance() {
    let mut server = Server::new_async().await;
    let day = today();
    let activities = json!({
        "activities": [
            {"id": 1, "activity_type": "cardio", "title": "Run", "calories_burned": 300,
             "intensity": "high", "date": stamp(day, 7)},
            {"id": 2, "activity_type": "flexibility", "title": "Yoga", "calories_burned": null,
             "intensity": null, "date": stamp(day, 9)}
        ],
        "count": 2
    })
    .to_string();
    let _profile = mock_json(&mut server, "/api/auth/profile", profile_body()).await;
    let _nutrition = mock_json(&mut server, "/api/nutrition", nutrition_body(day)).await;
    let _activities = mock_json(&mut server, "/api/activities", activities).await;

    let report = client_for(&server)
        .calorie_balance(day, NaiveTime::from_hms_opt(20, 0, 0).unwrap())
        .await
        .unwrap();

    assert_eq!(report.today.workout_count, 2);
    assert_eq!(report.today.calories_burned_exercise, 300.0);
    assert_eq!(report.today.net_calories, 1500.0);
}

#[tokio::test]
async fn failing_read_surfaces_as_upstream_fetch() {
    let mut server = Server::new_async().await;
    let day = today();
    let _profile = mock_json(&mut server, "/api/auth/profile", profile_body()).await;
    let _nutrition = mock_json(&mut server, "/api/nutrition", nutrition_body(day)).await;
    let _activities = server
        .mock("GET", "/api/activities")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let err = client_for(&server)
        .calorie_balance(day, NaiveTime::from_hms_opt(12, 0, 0).unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, BalanceError::UpstreamFetch(_)));
    assert_eq!(err.to_string(), "failed to load calorie balance");
    assert!(err.detail().contains("activities"));
}

#[tokio::test]
async fn login_then_uses_issued_token() {
    let mut server = Server::new_async().await;
    let login = server
        .mock("POST", "/api/auth/login")
        .match_body(Matcher::Json(json!({
            "email": "sam@example.com",
            "password": "hunter2"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"access_token": TOKEN, "user": {"id": 7, "email": "sam@example.com"}})
                .to_string(),
        )
        .create_async()
        .await;
    let profile = mock_json(&mut server, "/api/auth/profile", profile_body()).await;

    let config = ClientConfig {
        email: Some("sam@example.com".to_string()),
        password: Some("hunter2".to_string()),
        ..config_for(&server)
    };
    let client = FitnessClient::from_config(&config).await.unwrap();
    client.get_profile().await.unwrap();

    login.assert_async().await;
    profile.assert_async().await;
}

#[tokio::test]
async fn bad_login_is_an_error() {
    let mut server = Server::new_async().await;
    let _login = server
        .mock("POST", "/api/auth/login")
        .with_status(401)
        .with_body(json!({"error": "Invalid email/username or password"}).to_string())
        .create_async()
        .await;

    let config = ClientConfig {
        email: Some("sam@example.com".to_string()),
        password: Some("wrong".to_string()),
        ..config_for(&server)
    };
    let err = FitnessClient::from_config(&config).await.err().unwrap();
    assert!(err.to_string().contains("Not authorized"));
}

#[tokio::test]
async fn missing_credentials_is_not_logged_in() {
    let server = Server::new_async().await;
    let err = FitnessClient::from_config(&config_for(&server))
        .await
        .err()
        .unwrap();
    assert_eq!(err.to_string(), "Not logged in");
}

#[tokio::test]
async fn goal_progress_posts_increment() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/goals/3/progress")
        .match_header("authorization", format!("Bearer {}", TOKEN).as_str())
        .match_body(Matcher::Json(json!({"increment": 5.0})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "message": "Progress updated successfully",
                "goal": {
                    "id": 3,
                    "goal_type": "distance",
                    "title": "Run 50 km",
                    "target_value": 50.0,
                    "current_value": 50.0,
                    "unit": "km",
                    "status": "completed",
                    "completed_at": "2025-06-02T18:30:00"
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let goal = client_for(&server)
        .update_goal_progress(3, ProgressUpdate::Increment(5.0))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(goal.status, GoalStatus::Completed);
    assert_eq!(goal.progress_percentage(), 100.0);
    assert!(goal.completed_at.is_some());
}

#[tokio::test]
async fn delete_maps_not_found() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("DELETE", "/api/activities/99")
        .with_status(404)
        .with_body(json!({"error": "Activity not found"}).to_string())
        .create_async()
        .await;

    let err = client_for(&server).delete_activity(99).await.unwrap_err();
    assert!(err.to_string().contains("Resource not found"));
}

#[tokio::test]
async fn nutrition_stats_from_fetched_window() {
    let mut server = Server::new_async().await;
    let _nutrition = mock_json(&mut server, "/api/nutrition", nutrition_body(today())).await;

    let stats = client_for(&server).nutrition_stats(2).await.unwrap();
    assert_eq!(stats.total_calories, 2200.0);
    assert_eq!(stats.average_daily_calories, 1100.0);
    assert_eq!(stats.total_meals, 4);
    assert_eq!(stats.macro_breakdown.protein_percent, 100.0);
}
