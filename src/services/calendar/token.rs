use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;

use super::CalendarError;

pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Refresh this long before the provider says the token expires.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Lifetimes reported beyond this are treated as this.
const MAX_TOKEN_LIFETIME_SECS: i64 = 24 * 60 * 60;

#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, CalendarError>;
}

/// A token issued out of band.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: String) -> Self {
        Self { token }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String, CalendarError> {
        if self.token.is_empty() {
            return Err(CalendarError::Auth("no access token configured".to_string()));
        }
        Ok(self.token.clone())
    }
}

struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<i64>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Exchanges an OAuth refresh token for short-lived access tokens and
/// caches the current one.
pub struct RefreshTokenProvider {
    client: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    refresh_token: String,
    cached: Mutex<Option<CachedToken>>,
}

impl RefreshTokenProvider {
    pub fn new(client_id: String, client_secret: String, refresh_token: String) -> Self {
        Self::with_token_url(GOOGLE_TOKEN_URL.to_string(), client_id, client_secret, refresh_token)
    }

    pub fn with_token_url(
        token_url: String,
        client_id: String,
        client_secret: String,
        refresh_token: String,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            token_url,
            client_id,
            client_secret,
            refresh_token,
            cached: Mutex::new(None),
        }
    }

    async fn refresh(&self) -> Result<CachedToken, CalendarError> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", self.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let resp = self.client.post(&self.token_url).form(&params).send().await?;
        let status = resp.status();
        let body: TokenResponse = resp.json().await.map_err(|e| {
            CalendarError::Auth(format!("unreadable token response ({status}): {e}"))
        })?;

        if !status.is_success() || body.error.is_some() {
            let reason = match (body.error, body.error_description) {
                (Some(error), Some(desc)) => format!("{error}: {desc}"),
                (Some(error), None) => error,
                _ => format!("HTTP {status}"),
            };
            return Err(CalendarError::Auth(reason));
        }

        let access_token = body
            .access_token
            .ok_or_else(|| CalendarError::Auth("token response missing access_token".to_string()))?;
        let expires_in = body.expires_in.unwrap_or(3600).clamp(0, MAX_TOKEN_LIFETIME_SECS);

        tracing::debug!(expires_in, "refreshed calendar access token");
        Ok(CachedToken {
            access_token,
            expires_at: Utc::now() + Duration::seconds(expires_in),
        })
    }
}

#[async_trait]
impl TokenProvider for RefreshTokenProvider {
    async fn access_token(&self) -> Result<String, CalendarError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at - Duration::seconds(EXPIRY_MARGIN_SECS) > Utc::now() {
                return Ok(token.access_token.clone());
            }
        }

        let fresh = self.refresh().await?;
        let access_token = fresh.access_token.clone();
        *cached = Some(fresh);
        Ok(access_token)
    }
}
