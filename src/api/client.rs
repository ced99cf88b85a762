//! HTTP client for the auth backend

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::{ApiError, AuthBackend, LoginResponse};
use crate::config::ApiConfig;

const VERIFY_PATH: &str = "/auth/verify";
const VALIDATE_PATH: &str = "/auth/validate";

/// Backend client built on a shared `reqwest::Client`
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct VerifyRequest<'a> {
    token: &'a str,
}

#[derive(Deserialize)]
struct ValidateResponse {
    // Only a literal `true` counts as valid
    #[serde(default)]
    valid: serde_json::Value,
}

fn transport_error(endpoint: &str, err: &reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::network(endpoint, "request timed out")
    } else {
        ApiError::network(endpoint, err.to_string())
    }
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("manager-assistant/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::network("client", e.to_string()))?;

        let base_url: String = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::new(
            &config.base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map non-success statuses to typed errors
    async fn check_status(endpoint: &str, response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::UNAUTHORIZED => Err(ApiError::unauthorized(endpoint)),
            StatusCode::FORBIDDEN => Err(ApiError::forbidden(endpoint)),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get(header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse().ok());
                Err(ApiError::rate_limited(endpoint, retry_after))
            }
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(ApiError::http(endpoint, status.as_u16(), body))
            }
        }
    }
}

#[async_trait]
impl AuthBackend for BackendClient {
    async fn exchange_token(&self, authorization_code: &str) -> Result<LoginResponse, ApiError> {
        let response = self
            .client
            .post(self.url(VERIFY_PATH))
            .json(&VerifyRequest {
                token: authorization_code,
            })
            .send()
            .await
            .map_err(|e| transport_error(VERIFY_PATH, &e))?;

        let response = Self::check_status(VERIFY_PATH, response).await?;

        let body: Option<LoginResponse> = response
            .json()
            .await
            .map_err(|e| ApiError::invalid_response(VERIFY_PATH, e.to_string()))?;

        body.ok_or_else(|| ApiError::invalid_response(VERIFY_PATH, "empty login response"))
    }

    async fn validate(&self, token: &str) -> Result<bool, ApiError> {
        let response = self
            .client
            .get(self.url(VALIDATE_PATH))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| transport_error(VALIDATE_PATH, &e))?;

        let response = Self::check_status(VALIDATE_PATH, response).await?;

        let body: ValidateResponse = response
            .json()
            .await
            .map_err(|e| ApiError::invalid_response(VALIDATE_PATH, e.to_string()))?;

        Ok(body.valid == serde_json::Value::Bool(true))
    }
}
