use std::{env, net::SocketAddr, str::FromStr, time::Duration};
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:3001/auth/instagram/callback";
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_MEDIA_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid environment variable format for {0}: {1}")]
    InvalidVar(String, String),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub instagram: InstagramConfig,
    pub mail: MailConfig,
    pub media_cache_ttl: Duration,
}

#[derive(Clone, Debug)]
pub struct InstagramConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    // Webhook handshakes are always rejected when unset.
    pub verify_token: Option<String>,
    // Used both for media listing and for the manual refresh endpoint.
    pub access_token: Option<String>,
}

#[derive(Clone, Debug)]
pub struct MailConfig {
    pub smtp_host: String,
    pub username: String,
    pub password: String,
    pub recipient: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignores errors, relies on env vars otherwise)
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| get(key).ok_or_else(|| ConfigError::MissingVar(key.into()));

        let host = get("BIND_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match get("PORT") {
            Some(raw) => u16::from_str(&raw)
                .map_err(|e| ConfigError::InvalidVar("PORT".into(), e.to_string()))?,
            None => DEFAULT_PORT,
        };
        let bind_address = SocketAddr::from_str(&format!("{}:{}", host, port))
            .map_err(|e| ConfigError::InvalidVar("BIND_HOST".into(), e.to_string()))?;

        let media_cache_ttl = match get("MEDIA_CACHE_TTL_SECS") {
            Some(raw) => u64::from_str(&raw)
                .map(Duration::from_secs)
                .map_err(|e| ConfigError::InvalidVar("MEDIA_CACHE_TTL_SECS".into(), e.to_string()))?,
            None => DEFAULT_MEDIA_CACHE_TTL,
        };

        let instagram = InstagramConfig {
            client_id: require("INSTAGRAM_CLIENT_ID")?,
            client_secret: require("INSTAGRAM_CLIENT_SECRET")?,
            redirect_uri: get("INSTAGRAM_REDIRECT_URI")
                .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
            verify_token: get("INSTAGRAM_VERIFY_TOKEN"),
            access_token: get("INSTAGRAM_ACCESS_TOKEN"),
        };

        let username = require("EMAIL_USER")?;
        let mail = MailConfig {
            smtp_host: get("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            password: require("EMAIL_PASS")?,
            recipient: get("CONTACT_RECIPIENT").unwrap_or_else(|| username.clone()),
            username,
        };

        Ok(Config {
            bind_address,
            instagram,
            mail,
            media_cache_ttl,
        })
    }
}
