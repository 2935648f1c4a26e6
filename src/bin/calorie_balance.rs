use anyhow::{bail, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

use fitness_tracker_api::config::ClientConfig;
use fitness_tracker_api::logging;
use fitness_tracker_api::models::{GoalStatus, ProgressUpdate};
use fitness_tracker_api::FitnessClient;

#[derive(Parser)]
#[command(name = "calorie-balance")]
#[command(about = "Calorie balance and stats from the fitness tracker backend", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend base URL
    #[arg(long, global = true, env = "FITNESS_API_URL")]
    api_url: Option<String>,

    /// Pre-issued access token
    #[arg(long, global = true, env = "FITNESS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Login email or username
    #[arg(long, global = true, env = "FITNESS_EMAIL")]
    email: Option<String>,

    /// Login password
    #[arg(long, global = true, env = "FITNESS_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Print compact JSON
    #[arg(long, global = true)]
    compact: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Calorie balance, targets and tips for a day
    Today {
        /// Day to report (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Seven-day summary ending on a day
    Week {
        /// Last day of the week (defaults to today)
        #[arg(long)]
        end: Option<NaiveDate>,
    },

    /// Nutrition totals and macro breakdown
    Nutrition {
        #[arg(long, default_value_t = 7)]
        days: u32,
    },

    /// Activity totals
    Activity {
        #[arg(long, default_value_t = 7)]
        days: u32,
    },

    /// List goals
    Goals {
        /// Only goals with this status (active or completed)
        #[arg(long)]
        status: Option<String>,
    },

    /// Record progress on a goal
    Progress {
        id: i64,

        /// Add to the current value
        #[arg(long, conflicts_with = "set")]
        increment: Option<f64>,

        /// Replace the current value
        #[arg(long)]
        set: Option<f64>,
    },
}

impl Cli {
    fn client_config(&self) -> Result<ClientConfig> {
        let mut config = ClientConfig::from_env()?;
        if let Some(url) = &self.api_url {
            config.api_url = url.clone();
        }
        if let Some(token) = &self.token {
            config.token = Some(token.clone());
        }
        if let Some(email) = &self.email {
            config.email = Some(email.clone());
        }
        if let Some(password) = &self.password {
            config.password = Some(password.clone());
        }
        Ok(config)
    }

    fn print<T: Serialize>(&self, value: &T) -> Result<()> {
        let out = if self.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        println!("{}", out);
        Ok(())
    }
}

fn parse_status(raw: &str) -> Result<GoalStatus> {
    match raw {
        "active" => Ok(GoalStatus::Active),
        "completed" => Ok(GoalStatus::Completed),
        other => bail!("unknown goal status: {other}"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init()?;

    let config = cli.client_config()?;
    debug!(api_url = %config.api_url, "starting");
    let client = FitnessClient::from_config(&config).await?;

    match &cli.command {
        Commands::Today { date } => {
            let report = match date {
                Some(day) => {
                    client
                        .calorie_balance(*day, Local::now().naive_local().time())
                        .await?
                }
                None => client.calorie_balance_now().await?,
            };
            cli.print(&report)?;
        }
        Commands::Week { end } => {
            let end = end.unwrap_or_else(|| Local::now().date_naive());
            cli.print(&client.weekly_summary(end).await?)?;
        }
        Commands::Nutrition { days } => {
            cli.print(&client.nutrition_stats(*days).await?)?;
        }
        Commands::Activity { days } => {
            cli.print(&client.activity_stats(*days).await?)?;
        }
        Commands::Goals { status } => {
            let status = status.as_deref().map(parse_status).transpose()?;
            cli.print(&client.get_goals(status).await?)?;
        }
        Commands::Progress { id, increment, set } => {
            let update = match (increment, set) {
                (Some(x), None) => ProgressUpdate::Increment(*x),
                (None, Some(x)) => ProgressUpdate::CurrentValue(*x),
                _ => bail!("pass exactly one of --increment or --set"),
            };
            cli.print(&client.update_goal_progress(*id, update).await?)?;
        }
    }

    Ok(())
}
