use crate::{
    cache::MediaCache,
    domain::MediaSource,
    errors::MediaError,
    models::{CarouselItem, Category, MediaItem, MediaKind, RawMedia, RawMediaPage},
};
use anyhow::Context;
use async_trait::async_trait;
use std::sync::Arc;

pub const GRAPH_API_URL: &str = "https://graph.instagram.com";
pub const DEFAULT_MEDIA_LIMIT: u32 = 12;

const MEDIA_FIELDS: &str = "id,caption,media_type,media_url,permalink,thumbnail_url,timestamp,children{id,media_type,media_url,thumbnail_url}";
const TITLE_MAX_CHARS: usize = 30;

// Checked in order; first hit wins.
const CATEGORY_TAGS: [(&str, Category); 4] = [
    ("#portrait", Category::Portrait),
    ("#automotive", Category::Automotive),
    ("#fitness", Category::Fitness),
    ("#sports", Category::Sports),
];

/// Graph API client for the `/me/media` listing.
#[derive(Debug, Clone)]
pub struct InstagramGraphClient {
    http: reqwest::Client,
    base_url: String,
}

impl InstagramGraphClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self::with_base_url(http, GRAPH_API_URL)
    }

    pub fn with_base_url(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        tracing::info!(%base_url, "Initializing InstagramGraphClient");
        Self { http, base_url }
    }
}

#[async_trait]
impl MediaSource for InstagramGraphClient {
    async fn fetch_media(&self, access_token: &str, limit: u32) -> Result<Vec<RawMedia>, MediaError> {
        tracing::debug!(limit, "Instagram: Fetching media listing");
        let limit = limit.to_string();

        let page = self
            .http
            .get(format!("{}/me/media", self.base_url))
            .query(&[
                ("fields", MEDIA_FIELDS),
                ("access_token", access_token),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .context("Instagram: media listing request failed")
            .map_err(MediaError::FetchFailed)?
            .json::<RawMediaPage>()
            .await
            .context("Instagram: media listing response was not valid JSON")
            .map_err(MediaError::FetchFailed)?;

        tracing::debug!(count = page.data.len(), "Instagram: Media listing received");
        Ok(page.data)
    }
}

/// Derives the gallery category from hashtags in the caption.
pub fn derive_category(caption: Option<&str>) -> Category {
    let caption = caption.unwrap_or_default().to_lowercase();
    CATEGORY_TAGS
        .iter()
        .find(|(tag, _)| caption.contains(tag))
        .map(|(_, category)| *category)
        .unwrap_or(Category::Portrait)
}

/// First caption line cut to 30 characters plus an ellipsis, or a numbered placeholder.
pub fn display_title(caption: Option<&str>, position: usize) -> String {
    match caption.filter(|c| !c.is_empty()) {
        Some(caption) => {
            let first_line = caption.split('\n').next().unwrap_or_default();
            let truncated: String = first_line.chars().take(TITLE_MAX_CHARS).collect();
            format!("{}...", truncated)
        }
        None => format!("Instagram Photo {}", position),
    }
}

fn to_kind(media_type: &str) -> Option<MediaKind> {
    match media_type {
        "IMAGE" => Some(MediaKind::Image),
        "CAROUSEL_ALBUM" => Some(MediaKind::Carousel),
        _ => None,
    }
}

/// Filters the raw listing down to images and carousels and converts each into a `MediaItem`.
pub fn process_media(raw: Vec<RawMedia>) -> Vec<MediaItem> {
    raw.into_iter()
        .filter_map(|item| to_kind(&item.media_type).map(|kind| (kind, item)))
        .enumerate()
        .map(|(index, (kind, item))| {
            let children = item.children.map(|c| {
                c.data
                    .into_iter()
                    .filter_map(|child| {
                        let kind = match child.media_type.as_deref() {
                            Some("VIDEO") => return None,
                            _ => MediaKind::Image,
                        };
                        Some(CarouselItem {
                            id: child.id,
                            kind,
                            url: child.media_url?,
                            thumbnail: child.thumbnail_url,
                        })
                    })
                    .collect::<Vec<_>>()
            });

            let url = item
                .media_url
                .or_else(|| children.as_ref().and_then(|c| c.first()).map(|c| c.url.clone()))
                .unwrap_or_default();

            MediaItem {
                category: derive_category(item.caption.as_deref()),
                title: display_title(item.caption.as_deref(), index + 1),
                id: item.id,
                kind,
                url,
                thumbnail: item.thumbnail_url,
                items: children.filter(|c| !c.is_empty()),
                permalink: item.permalink.unwrap_or_default(),
                caption: item.caption.unwrap_or_default(),
                timestamp: item.timestamp,
            }
        })
        .collect()
}

/// Cache-fronted media fetch path.
pub struct MediaService {
    source: Arc<dyn MediaSource>,
    cache: MediaCache,
}

impl MediaService {
    pub fn new(source: Arc<dyn MediaSource>, cache: MediaCache) -> Self {
        Self { source, cache }
    }

    /// Returns the cached list when fresh, otherwise fetches, processes and caches.
    /// A cached list is returned as-is even when `limit` differs from the original request.
    pub async fn get_media(&self, access_token: &str, limit: u32) -> Result<Arc<Vec<MediaItem>>, MediaError> {
        if let Some(items) = self.cache.get().await {
            tracing::debug!(count = items.len(), "Returning Instagram media from cache");
            return Ok(items);
        }

        tracing::info!(limit, "Fetching Instagram media from API");
        let raw = self.source.fetch_media(access_token, limit).await.map_err(|e| {
            tracing::error!(error = ?e, "Error fetching Instagram media");
            e
        })?;
        let processed = process_media(raw);
        tracing::info!(count = processed.len(), "Caching processed Instagram media");
        Ok(self.cache.put(processed).await)
    }

    pub async fn clear_cache(&self) {
        self.cache.clear().await;
        tracing::info!("Instagram cache cleared");
    }
}
