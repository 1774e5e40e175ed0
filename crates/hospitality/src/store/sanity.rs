use crate::prelude::*;
use hospitality_core::article::Article;
use hospitality_core::catalog::Scope;
use hospitality_core::config::ContentSection;
use hospitality_core::queries::{ContentQuery, GroqQuery};
use serde::Deserialize;
use std::time::Duration;

/// Client for the Sanity HTTP query API
#[derive(Debug, Clone)]
pub struct SanityClient {
    http: reqwest::Client,
    endpoint: String,
    token: Option<String>,
    scope: Scope,
    strict_slug: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    result: Option<Vec<Article>>,
}

impl SanityClient {
    pub fn new(content: &ContentSection, token: Option<String>) -> Result<Self> {
        let project_id = content
            .project_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                Error::Config(
                    "content.project_id is not set; configure it or pass --fixture".to_string(),
                )
            })?;

        let host = if content.use_cdn { "apicdn" } else { "api" };
        let endpoint = f!(
            "https://{project_id}.{host}.sanity.io/v{}/data/query/{}",
            content.api_version.trim_start_matches('v'),
            content.dataset
        );

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(content.timeout_secs))
            .build()
            .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            http,
            endpoint,
            token,
            scope: content.scope.clone(),
            strict_slug: content.strict_slug,
        })
    }

    /// Full request URL for a rendered query
    pub fn query_url(&self, groq: &GroqQuery) -> String {
        let mut url = f!("{}?query={}", self.endpoint, urlencoding::encode(&groq.query));
        for (name, value) in &groq.params {
            url.push_str(&f!(
                "&{}={}",
                urlencoding::encode(&f!("${name}")),
                urlencoding::encode(value)
            ));
        }
        url
    }

    pub async fn fetch(&self, query: &ContentQuery) -> Result<Vec<Article>, Error> {
        let groq = query.to_groq(&self.scope, self.strict_slug);
        let url = self.query_url(&groq);

        let mut request = self.http.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Upstream(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::Upstream(e.to_string()))?;

        let body: QueryResponse = response
            .json()
            .await
            .map_err(|e| Error::Upstream(f!("Failed to decode {} response: {e}", query.name())))?;

        Ok(body.result.unwrap_or_default())
    }
}
