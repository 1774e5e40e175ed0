//! Catalog filtering over an ordered record set
//!
//! Every function takes the full set as fetched (newest first), makes a single
//! pass over it and returns borrowed records in input order. Nothing here
//! sorts, deduplicates or mutates the source.

use serde::{Deserialize, Serialize};

use crate::article::Article;

/// Error type for catalog lookups
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Article not found: {0}")]
    ArticleNotFound(String),
}

/// Site and category that select this site's records in a shared content store
///
/// An unset field matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scope {
    pub site: Option<String>,
    pub category: Option<String>,
}

impl Scope {
    pub fn new(site: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            site: Some(site.into()),
            category: Some(category.into()),
        }
    }

    /// A scope that matches every record
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_unscoped(&self) -> bool {
        self.site.is_none() && self.category.is_none()
    }

    pub fn contains(&self, article: &Article) -> bool {
        let category_matches = match &self.category {
            Some(category) => article.category.as_deref() == Some(category.as_str()),
            None => true,
        };
        let site_matches = match &self.site {
            Some(site) => article.sites.iter().any(|s| s == site),
            None => true,
        };
        category_matches && site_matches
    }
}

/// The full set, unfiltered
pub fn all(set: &[Article]) -> Vec<&Article> {
    set.iter().collect()
}

/// Records inside the given scope
pub fn in_scope<'a>(set: &'a [Article], scope: &Scope) -> Vec<&'a Article> {
    set.iter().filter(|a| scope.contains(a)).collect()
}

/// Records whose subcategory equals the display-form value exactly
///
/// An empty result is a valid outcome; the caller decides whether it means
/// "not found".
pub fn by_subcategory<'a>(set: &'a [Article], subcategory: &str) -> Vec<&'a Article> {
    set.iter()
        .filter(|a| a.subcategory.as_deref() == Some(subcategory))
        .collect()
}

/// Records carrying the tag, compared case-insensitively
pub fn by_tag<'a>(set: &'a [Article], tag: &str) -> Vec<&'a Article> {
    let wanted = tag.to_lowercase();
    set.iter()
        .filter(|a| a.tags.iter().any(|t| t.to_lowercase() == wanted))
        .collect()
}

/// The record with exactly this slug, if any
///
/// Slugs are canonical already, so no normalization is applied.
pub fn by_slug<'a>(set: &'a [Article], slug: &str) -> Option<&'a Article> {
    set.iter().find(|a| a.slug() == slug)
}

/// Single-item lookup for the article view, where absence means "not found"
pub fn require_slug<'a>(set: &'a [Article], slug: &str) -> Result<&'a Article, CatalogError> {
    by_slug(set, slug).ok_or_else(|| CatalogError::ArticleNotFound(slug.to_string()))
}

/// Unique non-empty subcategories in first-seen order
pub fn subcategories(set: &[Article]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for sub in set.iter().filter_map(|a| a.subcategory.as_deref()) {
        if !sub.trim().is_empty() && !seen.contains(&sub) {
            seen.push(sub);
        }
    }
    seen
}

/// Unique tags in first-seen order
pub fn tags(set: &[Article]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for tag in set.iter().flat_map(|a| a.tags.iter().map(String::as_str)) {
        if !tag.trim().is_empty() && !seen.contains(&tag) {
            seen.push(tag);
        }
    }
    seen
}
