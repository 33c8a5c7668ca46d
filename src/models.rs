use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gallery categories. `All` is a filter value only; derivation never produces it.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum Category {
    All,
    Portrait,
    Automotive,
    Fitness,
    Sports,
    Architecture,
    Misc,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::All,
        Category::Portrait,
        Category::Automotive,
        Category::Fitness,
        Category::Sports,
        Category::Architecture,
        Category::Misc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::All => "All",
            Category::Portrait => "Portrait",
            Category::Automotive => "Automotive",
            Category::Fitness => "Fitness",
            Category::Sports => "Sports",
            Category::Architecture => "Architecture",
            Category::Misc => "Misc",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown category: {}", s))
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        value.parse().unwrap_or(Category::Misc)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Carousel,
}

/// One child image of a carousel post.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CarouselItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// A processed gallery post, as served by `/api/instagram/media`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MediaItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<CarouselItem>>,
    pub permalink: String,
    #[serde(default)]
    pub caption: String,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl MediaItem {
    pub fn is_carousel(&self) -> bool {
        self.kind == MediaKind::Carousel && self.items.as_ref().is_some_and(|i| !i.is_empty())
    }
}

/// Raw media object from the Graph API `/me/media` listing.
#[derive(Deserialize, Debug, Clone)]
pub struct RawMedia {
    pub id: String,
    #[serde(default)]
    pub caption: Option<String>,
    pub media_type: String,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub children: Option<RawChildren>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RawChildren {
    #[serde(default)]
    pub data: Vec<RawChild>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RawChild {
    pub id: String,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct RawMediaPage {
    #[serde(default)]
    pub data: Vec<RawMedia>,
}

/// Contact form payload. Fields are optional so that missing ones reach validation
/// instead of failing deserialization.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct ContactMessage {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Subjects offered by the contact form. The server accepts any text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactSubject {
    PortraitSession,
    AutomotiveShoot,
    FitnessPhotography,
    SportsEvent,
    Other,
}

impl ContactSubject {
    pub const ALL: [ContactSubject; 5] = [
        ContactSubject::PortraitSession,
        ContactSubject::AutomotiveShoot,
        ContactSubject::FitnessPhotography,
        ContactSubject::SportsEvent,
        ContactSubject::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContactSubject::PortraitSession => "Portrait Session",
            ContactSubject::AutomotiveShoot => "Automotive Shoot",
            ContactSubject::FitnessPhotography => "Fitness Photography",
            ContactSubject::SportsEvent => "Sports Event",
            ContactSubject::Other => "Other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

/// Short-lived token returned by the authorization code exchange.
#[derive(Deserialize, Debug, Clone)]
pub struct ShortLivedToken {
    pub access_token: String,
    #[serde(default)]
    pub user_id: Option<serde_json::Value>,
}

/// Long-lived (60 day class) token returned by the exchange and refresh grants.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LongLivedToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}
