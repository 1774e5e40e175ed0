//! Content store access
//!
//! The site reads articles either from the Sanity query API or from a local
//! JSON file. Both answer the same `ContentQuery` values and both return
//! records newest first.

use crate::prelude::*;
use hospitality_core::article::Article;
use hospitality_core::config::SiteConfig;
use hospitality_core::queries::ContentQuery;
use hospitality_core::related::{self, RelatedStage};

mod fixture;
mod sanity;

pub use fixture::FixtureStore;
pub use sanity::SanityClient;

#[derive(Debug, Clone)]
pub enum ContentStore {
    Sanity(SanityClient),
    Fixture(FixtureStore),
}

impl ContentStore {
    /// Pick the store from the global flags: a fixture file wins over the
    /// configured Sanity project.
    pub fn from_global(global: &crate::Global, config: &SiteConfig) -> Result<Self> {
        if let Some(path) = &global.fixture {
            let store = FixtureStore::from_file(path, &config.content)?;
            log::info!(
                "serving {} articles from fixture {}",
                store.len(),
                path.display()
            );
            return Ok(ContentStore::Fixture(store));
        }

        let client = SanityClient::new(&config.content, global.sanity_token.clone())?;
        Ok(ContentStore::Sanity(client))
    }

    pub async fn fetch(&self, query: &ContentQuery) -> Result<Vec<Article>, Error> {
        log::debug!("fetching {} query", query.name());

        let result = match self {
            ContentStore::Sanity(client) => client.fetch(query).await,
            ContentStore::Fixture(store) => Ok(store.fetch(query)),
        };

        if let Err(err) = &result {
            log::warn!("{} query failed: {err}", query.name());
        }

        result
    }

    /// Related articles for `focal`: the same-subcategory query first, the
    /// whole-catalog query when that comes back under-filled.
    ///
    /// A focal record without a subcategory skips the primary query.
    pub async fn related(
        &self,
        focal: &Article,
        limit: usize,
    ) -> Result<(Vec<Article>, RelatedStage), Error> {
        let primary = match &focal.subcategory {
            Some(subcategory) => {
                self.fetch(&ContentQuery::RelatedPrimary {
                    subcategory: Some(subcategory.clone()),
                    exclude_slug: focal.slug().to_string(),
                    limit,
                })
                .await?
            }
            None => Vec::new(),
        };

        if !related::needs_fallback(primary.len(), limit) {
            return Ok((primary, RelatedStage::Primary));
        }

        let fallback = self
            .fetch(&ContentQuery::RelatedFallback {
                exclude_slug: focal.slug().to_string(),
                limit,
            })
            .await?;

        Ok((fallback, RelatedStage::Fallback))
    }
}
