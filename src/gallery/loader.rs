use super::state::GalleryState;
use crate::models::MediaItem;
use anyhow::{anyhow, Context};
use serde::Deserialize;
use std::path::Path;

pub const LOAD_ERROR_MESSAGE: &str = "Failed to load images. Please try again later.";

/// Substitute content used when the media endpoint cannot be reached.
pub trait FallbackSource: Send + Sync {
    fn fallback_items(&self) -> Option<Vec<MediaItem>>;
}

/// Leave the gallery empty on failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFallback;

impl FallbackSource for NoFallback {
    fn fallback_items(&self) -> Option<Vec<MediaItem>> {
        None
    }
}

/// A fixed list of sample posts.
#[derive(Debug, Clone, Default)]
pub struct StaticFallback {
    items: Vec<MediaItem>,
}

impl StaticFallback {
    pub fn new(items: Vec<MediaItem>) -> Self {
        Self { items }
    }

    /// Loads a JSON array of media items in the same shape the API serves.
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fallback media file '{}'", path.display()))?;
        let items = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse fallback media file '{}'", path.display()))?;
        Ok(Self { items })
    }
}

impl FallbackSource for StaticFallback {
    fn fallback_items(&self) -> Option<Vec<MediaItem>> {
        (!self.items.is_empty()).then(|| self.items.clone())
    }
}

#[derive(Deserialize, Debug)]
struct MediaEnvelope {
    success: bool,
    #[serde(default)]
    data: Vec<MediaItem>,
    #[serde(default)]
    message: Option<String>,
}

/// Fetches the processed media list for the gallery, once per page load.
pub struct GalleryLoader {
    http: reqwest::Client,
    api_base: String,
    limit: u32,
    fallback: Box<dyn FallbackSource>,
}

impl GalleryLoader {
    pub fn new(http: reqwest::Client, api_base: impl Into<String>) -> Self {
        Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            limit: crate::instagram::DEFAULT_MEDIA_LIMIT,
            fallback: Box::new(NoFallback),
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_fallback(mut self, fallback: impl FallbackSource + 'static) -> Self {
        self.fallback = Box::new(fallback);
        self
    }

    async fn fetch(&self) -> anyhow::Result<Vec<MediaItem>> {
        let envelope: MediaEnvelope = self
            .http
            .get(format!("{}/instagram/media", self.api_base))
            .query(&[("limit", self.limit)])
            .send()
            .await
            .context("Gallery: media request failed")?
            .json()
            .await
            .context("Gallery: media response was not valid JSON")?;

        if !envelope.success {
            return Err(anyhow!(envelope
                .message
                .unwrap_or_else(|| "Failed to fetch Instagram media".to_string())));
        }
        if envelope.data.is_empty() {
            return Err(anyhow!("No images found"));
        }
        Ok(envelope.data)
    }

    /// Loads the gallery. Failures leave an inline error and fall back to the
    /// configured substitute content, if any.
    pub async fn load(&self) -> GalleryState {
        match self.fetch().await {
            Ok(items) => {
                tracing::debug!(count = items.len(), "Gallery: media loaded");
                GalleryState::new(items)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load Instagram images");
                let items = self.fallback.fallback_items().unwrap_or_default();
                GalleryState::with_error(items, LOAD_ERROR_MESSAGE)
            }
        }
    }
}
