//! Site configuration
//!
//! Parsed from TOML once at startup and never mutated. Every field has a
//! default, so an empty document is a valid configuration.
//!
//! ```toml
//! [site]
//! base_url = "https://hospitality.fyi"
//!
//! [content]
//! project_id = "abc123"
//! dataset = "production"
//!
//! [content.scope]
//! site = "hospitality"
//! category = "hospitality"
//!
//! [catalog]
//! page_size = 12
//!
//! [edge]
//! policy = "v2"
//! blocked_countries = ["RU", "CN"]
//! ```

use serde::Deserialize;

use crate::catalog::Scope;
use crate::edge::{EdgePolicy, PolicyVersion};
use crate::pagination::{Paginator, DEFAULT_PAGE_SIZE};
use crate::related::DEFAULT_RELATED_LIMIT;

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub site: SiteSection,
    pub content: ContentSection,
    pub catalog: CatalogSection,
    pub edge: EdgeSection,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    pub base_url: String,
    pub name: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            base_url: "https://hospitality.fyi".to_string(),
            name: "HOSPITALITY.FYI".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentSection {
    pub project_id: Option<String>,
    pub dataset: String,
    pub api_version: String,
    pub use_cdn: bool,
    /// Upstream fetch timeout in seconds
    pub timeout_secs: u64,
    pub scope: Scope,
    /// Apply the scope to single-article lookups as well
    pub strict_slug: bool,
}

impl Default for ContentSection {
    fn default() -> Self {
        Self {
            project_id: None,
            dataset: "production".to_string(),
            api_version: "2024-01-01".to_string(),
            use_cdn: true,
            timeout_secs: 10,
            scope: Scope::new("hospitality", "hospitality"),
            strict_slug: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogSection {
    pub page_size: usize,
    pub related_limit: usize,
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            related_limit: DEFAULT_RELATED_LIMIT,
        }
    }
}

/// Edge filter settings
///
/// `policy` picks the base rule set; each list set here replaces the
/// corresponding list of that rule set.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EdgeSection {
    pub enabled: bool,
    pub policy: PolicyVersion,
    pub country_header: String,
    pub blocked_countries: Option<Vec<String>>,
    pub min_identity_length: Option<usize>,
    pub blocked_path_prefixes: Option<Vec<String>>,
    pub exempt_path_prefixes: Option<Vec<String>>,
    pub exempt_extensions: Option<Vec<String>>,
}

impl Default for EdgeSection {
    fn default() -> Self {
        Self {
            enabled: true,
            policy: PolicyVersion::default(),
            country_header: "x-vercel-ip-country".to_string(),
            blocked_countries: None,
            min_identity_length: None,
            blocked_path_prefixes: None,
            exempt_path_prefixes: None,
            exempt_extensions: None,
        }
    }
}

impl EdgeSection {
    pub fn policy(&self) -> EdgePolicy {
        let mut policy = EdgePolicy::for_version(self.policy);
        if let Some(countries) = &self.blocked_countries {
            policy = policy.with_blocked_countries(countries);
        }
        if let Some(length) = self.min_identity_length {
            policy = policy.with_min_identity_length(length);
        }
        if let Some(prefixes) = &self.blocked_path_prefixes {
            policy = policy.with_blocked_path_prefixes(prefixes);
        }
        if let Some(prefixes) = &self.exempt_path_prefixes {
            policy = policy.with_exempt_path_prefixes(prefixes);
        }
        if let Some(extensions) = &self.exempt_extensions {
            policy = policy.with_exempt_extensions(extensions);
        }
        policy
    }
}

impl SiteConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: SiteConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "catalog.page_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.catalog.related_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "catalog.related_limit",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.content.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "content.timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        if !self.site.base_url.starts_with("http://") && !self.site.base_url.starts_with("https://")
        {
            return Err(ConfigError::Invalid {
                field: "site.base_url",
                reason: format!("expected an http(s) URL, got {:?}", self.site.base_url),
            });
        }
        if self.edge.country_header.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "edge.country_header",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn paginator(&self) -> Result<Paginator, ConfigError> {
        Paginator::new(self.catalog.page_size).map_err(|e| ConfigError::Invalid {
            field: "catalog.page_size",
            reason: e.to_string(),
        })
    }

    pub fn edge_policy(&self) -> EdgePolicy {
        self.edge.policy()
    }
}
