use crate::{
    errors::AppError,
    instagram::DEFAULT_MEDIA_LIMIT,
    models::ContactMessage,
    AppState,
};
use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Json,
};
use serde::{Deserialize, Deserializer};
use serde_json::json;
use std::sync::Arc;

#[derive(Deserialize, Debug)]
pub struct MediaQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub limit: Option<u32>,
}

/// `?limit=` is treated the same as an absent parameter.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Handler for GET /api/instagram/media
pub async fn list_media(
    State(state): State<Arc<AppState>>,
    query: Result<Query<MediaQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(query) = query?;
    let access_token = state
        .config
        .instagram
        .access_token
        .as_deref()
        .ok_or_else(|| AppError::ConfigError("Instagram access token not configured".to_string()))?;

    let limit = query.limit.unwrap_or(DEFAULT_MEDIA_LIMIT);
    let media = state.media.get_media(access_token, limit).await?;

    tracing::info!("Handler successfully retrieved {} media items", media.len());
    Ok(Json(json!({ "success": true, "data": *media })))
}

/// Handler for POST /api/instagram/clear-cache
pub async fn clear_media_cache(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.media.clear_cache().await;
    Json(json!({ "success": true, "message": "Instagram cache cleared successfully" }))
}

/// Handler for POST /api/contact
pub async fn send_contact(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ContactMessage>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(message) = payload?;
    state.contact.send(&message).await?;
    Ok(Json(json!({ "success": true, "message": "Your message has been sent successfully!" })))
}

/// Handler for GET /api/test
pub async fn health() -> impl IntoResponse {
    Json(json!({ "message": "Backend server is running!" }))
}

/// Handler for GET /auth/instagram
pub async fn instagram_authorize(State(state): State<Arc<AppState>>) -> Result<Redirect, AppError> {
    let url = state
        .oauth
        .authorization_url()
        .map_err(|e| AppError::ConfigError(e.to_string()))?;
    tracing::info!("Redirecting to Instagram authorization page");
    Ok(Redirect::to(url.as_str()))
}

#[derive(Deserialize, Debug)]
pub struct CallbackQuery {
    pub code: Option<String>,
}

/// Handler for GET /auth/instagram/callback
pub async fn instagram_callback(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CallbackQuery>,
) -> Result<impl IntoResponse, AppError> {
    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::MissingField("Authorization code not received".to_string()))?;

    let token = state
        .oauth
        .complete_authorization(&code)
        .await
        .map_err(|e| AppError::oauth("Failed to authenticate with Instagram", e))?;

    Ok(Json(json!({
        "success": true,
        "message": "Successfully authenticated with Instagram",
        "token": token.access_token,
        "expires_in": token.expires_in,
    })))
}

/// Handler for GET /auth/instagram/refresh_token
pub async fn instagram_refresh_token(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let current = state
        .config
        .instagram
        .access_token
        .as_deref()
        .ok_or_else(|| AppError::ConfigError("Instagram access token not configured".to_string()))?;

    let token = state
        .oauth
        .refresh(current)
        .await
        .map_err(|e| AppError::oauth("Failed to refresh token", e))?;

    Ok(Json(json!({
        "success": true,
        "message": "Token refreshed successfully",
        "token": token.access_token,
        "expires_in": token.expires_in,
    })))
}

#[derive(Deserialize, Debug, Default)]
pub struct WebhookVerification {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Handler for GET /auth/webhook
pub async fn verify_webhook(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WebhookVerification>,
) -> impl IntoResponse {
    let expected = state.config.instagram.verify_token.as_deref();
    let verified = params.mode.as_deref() == Some("subscribe")
        && expected.is_some()
        && params.verify_token.as_deref() == expected;

    if verified {
        tracing::info!("WEBHOOK_VERIFIED");
        (StatusCode::OK, params.challenge.unwrap_or_default()).into_response()
    } else {
        tracing::warn!(mode = ?params.mode, "Webhook verification rejected");
        StatusCode::FORBIDDEN.into_response()
    }
}

/// Handler for POST /auth/webhook
pub async fn receive_webhook(body: String) -> impl IntoResponse {
    tracing::info!(payload = %body, "Received webhook");
    (StatusCode::OK, "EVENT_RECEIVED")
}
