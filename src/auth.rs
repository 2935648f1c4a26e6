use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::models::{LoginResponse, UserProfile};

/// Backend access tokens are issued for 24 hours.
const TOKEN_LIFETIME_HOURS: i64 = 24;

/// Re-login this long before the token actually expires.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    /// `None` for tokens supplied from outside, whose lifetime we don't know
    expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
struct Credentials {
    email: String,
    password: String,
}

/// Bearer-token state shared by every request of one client.
#[derive(Clone)]
pub struct BackendAuth {
    client: Client,
    base_url: String,
    credentials: Option<Credentials>,
    cached_token: Arc<Mutex<Option<CachedToken>>>,
}

impl BackendAuth {
    /// Use an already issued access token. It is never refreshed.
    pub fn with_token(client: Client, base_url: &str, access_token: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials: None,
            cached_token: Arc::new(Mutex::new(Some(CachedToken {
                access_token,
                expires_at: None,
            }))),
        }
    }

    /// Log in with email (or username) and password. The credentials are kept
    /// so an expired token can be replaced transparently.
    pub async fn sign_in(
        client: Client,
        base_url: &str,
        email: &str,
        password: &str,
    ) -> Result<(Self, UserProfile)> {
        let auth = Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials: Some(Credentials {
                email: email.to_string(),
                password: password.to_string(),
            }),
            cached_token: Arc::new(Mutex::new(None)),
        };
        let user = auth.login().await?;
        info!(user_id = ?user.id, "signed in to fitness backend");
        Ok((auth, user))
    }

    async fn login(&self) -> Result<UserProfile> {
        let credentials = self.credentials.as_ref().ok_or(ApiError::NotLoggedIn)?;
        let url = format!("{}/auth/login", self.base_url);

        debug!(email = %credentials.email, "logging in");
        let resp = self
            .client
            .post(&url)
            .json(&json!({
                "email": credentials.email,
                "password": credentials.password,
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!(ApiError::from_status(status, body)));
        }

        let login: LoginResponse = resp.json().await?;
        *self.cached_token.lock().await = Some(CachedToken {
            access_token: login.access_token,
            expires_at: Some(Utc::now() + Duration::hours(TOKEN_LIFETIME_HOURS)),
        });

        Ok(login.user)
    }

    pub async fn get_access_token(&self) -> Result<String> {
        {
            let cached = self.cached_token.lock().await;
            if let Some(ref token) = *cached {
                let fresh = token.expires_at.map_or(true, |expires_at| {
                    expires_at > Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS)
                });
                if fresh {
                    return Ok(token.access_token.clone());
                }
            }
        }

        debug!("access token missing or expired");
        self.login().await?;
        self.cached_token
            .lock()
            .await
            .as_ref()
            .map(|t| t.access_token.clone())
            .ok_or_else(|| anyhow!(ApiError::NotLoggedIn))
    }

    /// Drop the cached token, e.g. after the backend rejected it.
    pub async fn invalidate(&self) {
        *self.cached_token.lock().await = None;
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
