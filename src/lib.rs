//! Client and calorie-balance engine for the fitness tracker backend.
//!
//! The computation core (`profile`, `energy`, `target`, `balance`, `advice`,
//! `goals`, `stats`, `report`) is synchronous and never reads a clock. The
//! HTTP side (`auth`, `rest`, `client`) fetches inputs and feeds them in.

pub mod advice;
pub mod auth;
pub mod balance;
pub mod client;
pub mod config;
pub mod energy;
pub mod error;
pub mod goals;
pub mod logging;
pub mod models;
pub mod profile;
pub mod report;
pub mod rest;
pub mod rounding;
pub mod stats;
pub mod target;

pub use client::FitnessClient;
pub use config::ClientConfig;
pub use error::{ApiError, BalanceError, CalorieError};
pub use report::{build_report, CalorieBalanceReport, ReportSettings};
