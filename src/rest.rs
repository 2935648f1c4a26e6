use anyhow::{anyhow, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::auth::BackendAuth;
use crate::error::ApiError;

/// Authenticated JSON transport for the backend REST API.
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    auth: BackendAuth,
}

impl RestClient {
    pub fn new(client: Client, auth: BackendAuth) -> Self {
        Self { client, auth }
    }

    pub fn auth(&self) -> &BackendAuth {
        &self.auth
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.auth.base_url(), path.trim_start_matches('/'))
    }

    async fn send(&self, method: &str, path: &str, req: RequestBuilder) -> Result<Response> {
        let token = self.auth.get_access_token().await?;
        debug!(method, path, "backend request");

        let resp = req.bearer_auth(&token).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            if status == reqwest::StatusCode::UNAUTHORIZED {
                self.auth.invalidate().await;
            }
            return Err(anyhow!(
                "{} {} failed: {}",
                method,
                path,
                ApiError::from_status(status, body)
            ));
        }

        Ok(resp)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let req = self.client.get(self.url(path)).query(query);
        Ok(self.send("GET", path, req).await?.json().await?)
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let req = self.client.post(self.url(path)).json(body);
        Ok(self.send("POST", path, req).await?.json().await?)
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let req = self.client.put(self.url(path)).json(body);
        Ok(self.send("PUT", path, req).await?.json().await?)
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        let req = self.client.delete(self.url(path));
        self.send("DELETE", path, req).await?;
        Ok(())
    }
}
