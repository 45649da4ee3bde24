use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Image metadata stored for a project's production artwork
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredImage {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Free-form keyword string, e.g. `"prop weapon"`
    #[serde(default)]
    pub categories: String,
    #[serde(default)]
    pub ai_enhanced: bool,
    #[serde(default)]
    pub is_rendered: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub thumbnail_url: String,
}

impl StoredImage {
    pub fn created(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }

    pub fn updated(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.updated_at)
    }

    /// Case-insensitive keyword match on name or categories.
    /// `keyword` must already be lowercase.
    pub(crate) fn mentions(&self, keyword: &str) -> bool {
        self.name.to_lowercase().contains(keyword)
            || self.categories.to_lowercase().contains(keyword)
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Body of `assets/project-images/?project={id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectImagesResponse {
    pub project: String,
    #[serde(default)]
    pub images: Vec<StoredImage>,
    #[serde(default)]
    pub count: usize,
}

impl ProjectImagesResponse {
    /// Whether `count` agrees with the images actually sent.
    /// Informational only; nothing rejects an inconsistent body.
    pub fn is_consistent(&self) -> bool {
        self.count == self.images.len()
    }
}
