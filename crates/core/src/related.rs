//! Related content for the single-article view
//!
//! Two stages, never merged: articles sharing the focal subcategory, or, when
//! that stage comes up short, the most recent articles of the whole catalog.
//! The focal article is excluded from both.

use serde::Serialize;

use crate::article::Article;

/// Number of related articles shown under an article
pub const DEFAULT_RELATED_LIMIT: usize = 3;

/// Which stage produced a related set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelatedStage {
    Primary,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Related<'a> {
    pub stage: RelatedStage,
    pub articles: Vec<&'a Article>,
}

/// Stage 1: same subcategory, focal slug excluded, input order, capped
///
/// A focal article without a subcategory has no primary matches.
pub fn primary<'a>(
    set: &'a [Article],
    subcategory: Option<&str>,
    exclude_slug: &str,
    limit: usize,
) -> Vec<&'a Article> {
    let Some(subcategory) = subcategory else {
        return Vec::new();
    };

    set.iter()
        .filter(|a| a.slug() != exclude_slug)
        .filter(|a| a.subcategory.as_deref() == Some(subcategory))
        .take(limit)
        .collect()
}

/// Stage 2: whole catalog, focal slug excluded, input order, capped
pub fn fallback<'a>(set: &'a [Article], exclude_slug: &str, limit: usize) -> Vec<&'a Article> {
    set.iter()
        .filter(|a| a.slug() != exclude_slug)
        .take(limit)
        .collect()
}

/// The fallback runs whenever the primary stage is under-filled, not only
/// when it is empty.
pub fn needs_fallback(primary_len: usize, limit: usize) -> bool {
    primary_len < limit
}

/// Resolve related articles for `focal` over the full ordered set
pub fn resolve<'a>(set: &'a [Article], focal: &Article, limit: usize) -> Related<'a> {
    let found = primary(set, focal.subcategory.as_deref(), focal.slug(), limit);

    if needs_fallback(found.len(), limit) {
        Related {
            stage: RelatedStage::Fallback,
            articles: fallback(set, focal.slug(), limit),
        }
    } else {
        Related {
            stage: RelatedStage::Primary,
            articles: found,
        }
    }
}
