use crate::prelude::*;
use hospitality_core::article::Article;
use hospitality_core::catalog::Scope;
use hospitality_core::config::ContentSection;
use hospitality_core::queries::ContentQuery;
use serde::Deserialize;
use std::cmp::Reverse;
use std::path::Path;

/// Articles loaded from a local JSON file
///
/// Accepts either a bare array of articles or a saved query response
/// (`{ "result": [...] }`). Records are ordered newest first on load, the
/// same order the content store returns.
#[derive(Debug, Clone)]
pub struct FixtureStore {
    articles: Vec<Article>,
    scope: Scope,
    strict_slug: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FixtureFile {
    Articles(Vec<Article>),
    Response { result: Vec<Article> },
}

impl FixtureStore {
    pub fn new(mut articles: Vec<Article>, scope: Scope, strict_slug: bool) -> Self {
        // Stable sort: undated records keep their relative order, after the dated ones
        articles.sort_by_key(|a| Reverse(a.published_at));
        Self {
            articles,
            scope,
            strict_slug,
        }
    }

    pub fn from_file(path: &Path, content: &ContentSection) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .wrap_err_with(|| f!("Failed to read fixture file {}", path.display()))?;
        let store = Self::from_json(&source, content)
            .wrap_err_with(|| f!("Invalid fixture file {}", path.display()))?;
        Ok(store)
    }

    pub fn from_json(source: &str, content: &ContentSection) -> Result<Self, Error> {
        let file: FixtureFile =
            serde_json::from_str(source).map_err(|e| Error::Fixture(e.to_string()))?;
        let articles = match file {
            FixtureFile::Articles(articles) => articles,
            FixtureFile::Response { result } => result,
        };
        Ok(Self::new(
            articles,
            content.scope.clone(),
            content.strict_slug,
        ))
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn fetch(&self, query: &ContentQuery) -> Vec<Article> {
        query.apply(&self.articles, &self.scope, self.strict_slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"[
        {
            "_id": "1",
            "title": "Older",
            "slug": { "current": "older" },
            "category": "hospitality",
            "sites": ["hospitality"],
            "publishedAt": "2024-01-01T00:00:00Z"
        },
        {
            "_id": "2",
            "title": "Newer",
            "slug": { "current": "newer" },
            "category": "hospitality",
            "sites": ["hospitality"],
            "publishedAt": "2024-06-01T00:00:00Z"
        },
        {
            "_id": "3",
            "title": "Elsewhere",
            "slug": { "current": "elsewhere" },
            "category": "travel",
            "sites": ["travel"],
            "publishedAt": "2024-07-01T00:00:00Z"
        }
    ]"#;

    fn slugs(articles: &[Article]) -> Vec<&str> {
        articles.iter().map(|a| a.slug()).collect()
    }

    #[test]
    fn test_from_json_orders_newest_first_and_scopes() {
        let store = FixtureStore::from_json(FIXTURE, &ContentSection::default()).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(slugs(&store.fetch(&ContentQuery::All)), vec!["newer", "older"]);
    }

    #[test]
    fn test_from_json_response_shape() {
        let wrapped = format!(r#"{{ "result": {FIXTURE} }}"#);
        let store = FixtureStore::from_json(&wrapped, &ContentSection::default()).unwrap();
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_slug_lookup_is_unscoped_by_default() {
        let store = FixtureStore::from_json(FIXTURE, &ContentSection::default()).unwrap();
        let found = store.fetch(&ContentQuery::BySlug("elsewhere".to_string()));
        assert_eq!(slugs(&found), vec!["elsewhere"]);
    }

    #[test]
    fn test_invalid_json() {
        let err = FixtureStore::from_json("{ nope", &ContentSection::default()).unwrap_err();
        assert!(matches!(err, Error::Fixture(_)));
    }
}
