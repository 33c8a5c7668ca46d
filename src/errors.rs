use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

// --- Domain/Infrastructure Errors ---

#[derive(Error, Debug)]
pub enum MediaError {
    // Callers only ever see this message; the cause is logged.
    #[error("Failed to fetch Instagram media")]
    FetchFailed(#[source] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum OAuthError {
    #[error("{0}")]
    Provider(String),

    #[error("Instagram request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid Instagram endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Could not build email: {0}")]
    Build(String),

    #[error("{0}")]
    Transport(String),
}

#[derive(Error, Debug)]
pub enum ContactError {
    #[error("All fields are required")]
    MissingFields,

    #[error(transparent)]
    Mail(#[from] MailError),
}

// --- Web Layer Error ---

#[derive(Error, Debug)]
pub enum AppError {
    // Input validation / request parsing errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("{0}")]
    MissingField(String),
    #[error("Invalid JSON body: {0}")]
    JsonRejection(#[from] JsonRejection),
    #[error("Invalid query string: {0}")]
    QueryRejection(#[from] QueryRejection),

    // Upstream/provider errors
    #[error(transparent)]
    Media(#[from] MediaError),
    #[error("{context}: {source}")]
    OAuth {
        context: &'static str,
        #[source]
        source: OAuthError,
    },
    #[error("Failed to send message. Please try again later.")]
    Mail(#[source] MailError),

    // Configuration errors
    #[error("{0}")]
    ConfigError(String),

    // Generic Internal Server Error
    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl AppError {
    pub fn oauth(context: &'static str, source: OAuthError) -> Self {
        AppError::OAuth { context, source }
    }
}

// --- Conversions from Domain Errors to AppError ---

impl From<ContactError> for AppError {
    fn from(err: ContactError) -> Self {
        match err {
            ContactError::MissingFields => AppError::MissingField(err.to_string()),
            ContactError::Mail(e) => AppError::Mail(e),
        }
    }
}

impl From<crate::config::ConfigError> for AppError {
    fn from(err: crate::config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

// --- Axum Response Implementation ---

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // (status, user-facing message, upstream detail)
        let (status, message, detail) = match &self {
            // 4xx Client Errors
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::MissingField(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::JsonRejection(e) => (StatusCode::BAD_REQUEST, format!("Invalid JSON body: {}", e.body_text()), None),
            AppError::QueryRejection(e) => (StatusCode::BAD_REQUEST, format!("Invalid query string: {}", e.body_text()), None),

            // 5xx Server Errors
            AppError::Media(e) => {
                tracing::error!(error.source = ?e, "Media fetch error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string(), None)
            }
            AppError::OAuth { context, source } => {
                tracing::error!(error.source = ?source, "Instagram OAuth error: {}", context);
                (StatusCode::INTERNAL_SERVER_ERROR, context.to_string(), Some(source.to_string()))
            }
            AppError::Mail(e) => {
                tracing::error!(error.source = ?e, "Mail transport error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string(), Some(e.to_string()))
            }
            AppError::ConfigError(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone(), None)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal server error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "An internal server error occurred".to_string(), None)
            }
        };

        tracing::warn!(error.message = %message, error.status = %status, "Responding with error");

        let mut body = serde_json::json!({ "success": false, "message": message });
        if let Some(detail) = detail {
            body["error"] = serde_json::Value::String(detail);
        }
        (status, Json(body)).into_response()
    }
}
