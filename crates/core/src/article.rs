//! Article records as returned by the content store.
//!
//! The shape mirrors the Sanity document projection used by every catalog
//! query (`_id`, `slug.current`, `mainImage.asset.url`, ...), so the same type
//! deserializes both live query results and local fixture files.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::slug::to_slug;

/// A single content item.
///
/// Records are immutable once fetched: the catalog, pagination and related
/// content functions only borrow them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub slug: SlugField,
    #[serde(default)]
    pub main_image: Option<MainImage>,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sites: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

/// Sanity stores slugs as `{ "current": "..." }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlugField {
    pub current: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainImage {
    #[serde(default)]
    pub asset: Option<ImageAsset>,
    #[serde(default)]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAsset {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Article {
    pub fn slug(&self) -> &str {
        &self.slug.current
    }

    /// Canonical path of the single-article view
    pub fn href(&self) -> String {
        format!("/articles/{}", self.slug())
    }

    /// Subcategory as a URL slug, if the article has one
    pub fn subcategory_slug(&self) -> Option<String> {
        self.subcategory
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(to_slug)
    }

    pub fn image_url(&self) -> Option<&str> {
        self.main_image
            .as_ref()
            .and_then(|image| image.asset.as_ref())
            .and_then(|asset| asset.url.as_deref())
    }

    /// Image alt text, falling back to the article title
    pub fn image_alt(&self) -> &str {
        self.main_image
            .as_ref()
            .and_then(|image| image.alt.as_deref())
            .unwrap_or(&self.title)
    }
}

/// GROQ projections return `null` for absent arrays.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Build an article with only the fields the catalog logic looks at.
///
/// Used by unit tests across the crate.
#[cfg(test)]
pub(crate) fn fixture(slug: &str, subcategory: Option<&str>, tags: &[&str]) -> Article {
    Article {
        id: format!("id-{slug}"),
        title: format!("Title {slug}"),
        subtitle: None,
        slug: SlugField {
            current: slug.to_string(),
        },
        main_image: None,
        subcategory: subcategory.map(str::to_string),
        category: Some("hospitality".to_string()),
        sites: vec!["hospitality".to_string()],
        tags: tags.iter().map(|t| t.to_string()).collect(),
        published_at: None,
        author: None,
        excerpt: None,
        body: None,
    }
}
