//! Instagram OAuth: authorization redirect, code exchange, long-lived token
//! exchange and refresh.
//!
//! The authorization URL carries no `state` parameter, so the callback cannot
//! detect forged redirects.

use crate::{
    config::InstagramConfig,
    errors::OAuthError,
    models::{LongLivedToken, ShortLivedToken},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

pub const AUTH_API_URL: &str = "https://api.instagram.com";
pub const GRAPH_API_URL: &str = crate::instagram::GRAPH_API_URL;
pub const SCOPES: &str = "user_profile,user_media";

#[derive(Debug, Clone)]
pub struct InstagramOAuth {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    auth_base: String,
    graph_base: String,
}

impl InstagramOAuth {
    pub fn new(http: reqwest::Client, config: &InstagramConfig) -> Self {
        Self::with_endpoints(http, config, AUTH_API_URL, GRAPH_API_URL)
    }

    pub fn with_endpoints(
        http: reqwest::Client,
        config: &InstagramConfig,
        auth_base: impl Into<String>,
        graph_base: impl Into<String>,
    ) -> Self {
        Self {
            http,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            auth_base: auth_base.into().trim_end_matches('/').to_string(),
            graph_base: graph_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Provider authorization page the user agent is redirected to.
    pub fn authorization_url(&self) -> Result<Url, OAuthError> {
        let url = Url::parse_with_params(
            &format!("{}/oauth/authorize", self.auth_base),
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", SCOPES),
                ("response_type", "code"),
            ],
        )?;
        Ok(url)
    }

    /// Trades an authorization code for a short-lived access token.
    pub async fn exchange_code(&self, code: &str) -> Result<ShortLivedToken, OAuthError> {
        tracing::debug!("Instagram OAuth: Exchanging authorization code");
        let response = self
            .http
            .post(format!("{}/oauth/access_token", self.auth_base))
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("grant_type", "authorization_code"),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("code", code),
            ])
            .send()
            .await?;
        parse_provider_response(response, "Failed to get access token").await
    }

    /// Trades a short-lived token for a long-lived one.
    pub async fn exchange_long_lived(&self, short_lived: &ShortLivedToken) -> Result<LongLivedToken, OAuthError> {
        tracing::debug!("Instagram OAuth: Exchanging for long-lived token");
        let response = self
            .http
            .get(format!("{}/access_token", self.graph_base))
            .query(&[
                ("grant_type", "ig_exchange_token"),
                ("client_secret", self.client_secret.as_str()),
                ("access_token", short_lived.access_token.as_str()),
            ])
            .send()
            .await?;
        parse_provider_response(response, "Failed to get long-lived token").await
    }

    /// Callback path: code, then short-lived token, then long-lived token.
    pub async fn complete_authorization(&self, code: &str) -> Result<LongLivedToken, OAuthError> {
        let short_lived = self.exchange_code(code).await?;
        let long_lived = self.exchange_long_lived(&short_lived).await?;
        tracing::info!(expires_in = ?long_lived.expires_in, "Instagram OAuth: Long-lived token obtained");
        Ok(long_lived)
    }

    /// Extends a long-lived token that has not yet expired.
    pub async fn refresh(&self, long_lived_token: &str) -> Result<LongLivedToken, OAuthError> {
        tracing::debug!("Instagram OAuth: Refreshing long-lived token");
        let response = self
            .http
            .get(format!("{}/refresh_access_token", self.graph_base))
            .query(&[
                ("grant_type", "ig_refresh_token"),
                ("access_token", long_lived_token),
            ])
            .send()
            .await?;
        let token: LongLivedToken = parse_provider_response(response, "Failed to refresh token").await?;
        tracing::info!(expires_in = ?token.expires_in, "Instagram OAuth: Token refreshed");
        Ok(token)
    }
}

/// Pulls a human readable message out of an Instagram error body, if the body is one.
///
/// Instagram uses two shapes: `{"error_type", "code", "error_message"}` on the
/// OAuth host and `{"error": {"message", ...}}` on the Graph host.
fn provider_error_message(body: &Value) -> Option<Option<String>> {
    let error_message = body.get("error_message").and_then(Value::as_str);
    let error = body.get("error");
    if error_message.is_none() && error.is_none() {
        return None;
    }
    let message = error_message
        .or_else(|| error.and_then(|e| e.get("message")).and_then(Value::as_str))
        .or_else(|| error.and_then(Value::as_str))
        .map(str::to_string);
    Some(message)
}

async fn parse_provider_response<T: DeserializeOwned>(
    response: reqwest::Response,
    fallback: &str,
) -> Result<T, OAuthError> {
    let status = response.status();
    let body: Value = match response.json().await {
        Ok(body) => body,
        Err(e) if status.is_success() => return Err(OAuthError::Transport(e)),
        Err(_) => Value::Null,
    };

    if let Some(message) = provider_error_message(&body) {
        let message = message.unwrap_or_else(|| fallback.to_string());
        tracing::warn!(%status, provider.message = %message, "Instagram OAuth: Provider reported an error");
        return Err(OAuthError::Provider(message));
    }
    if !status.is_success() {
        tracing::warn!(%status, "Instagram OAuth: Unexpected status without error body");
        return Err(OAuthError::Provider(fallback.to_string()));
    }

    serde_json::from_value(body).map_err(|e| {
        tracing::warn!(error = %e, "Instagram OAuth: Unexpected token payload");
        OAuthError::Provider(fallback.to_string())
    })
}
