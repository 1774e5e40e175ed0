//! Edge request filter
//!
//! Classifies an inbound request before any page work happens. The checks run
//! in a fixed order and the first one that matches decides the outcome:
//!
//! 1. geography: blocked country -> forbidden
//! 2. client identity: missing or too short user agent -> forbidden
//! 3. exploit probe: known attack path prefix -> not found
//!
//! The identity check is perimeter hygiene against lazy bots. Short legitimate
//! user agents are rejected and well-formed fake ones pass; it is not an
//! authentication mechanism.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Outcome of the edge filter for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Allow,
    DenyForbidden,
    DenyNotFound,
}

impl Decision {
    /// HTTP status for a denial, `None` when the request continues
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Decision::Allow => None,
            Decision::DenyForbidden => Some(403),
            Decision::DenyNotFound => Some(404),
        }
    }

    /// Static body sent with a denial
    pub fn body(&self) -> Option<&'static str> {
        match self {
            Decision::Allow => None,
            Decision::DenyForbidden => Some("Access denied."),
            Decision::DenyNotFound => Some("Not found."),
        }
    }
}

/// The individual checks, in pipeline order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    Geography,
    ClientIdentity,
    ExploitPath,
}

const PIPELINE: [Check; 3] = [Check::Geography, Check::ClientIdentity, Check::ExploitPath];

/// Decision plus the check that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub decision: Decision,
    pub check: Option<Check>,
}

/// Observable request attributes
///
/// Every field may be missing; missing values never cause a panic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestAttributes<'a> {
    /// ISO-2 country code as reported by the hosting edge
    pub country: Option<&'a str>,
    /// Declared client identity (user agent), unverified
    pub client_identity: Option<&'a str>,
    pub path: &'a str,
}

/// Named, complete rule sets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyVersion {
    /// Geography only, CN and RU
    V1,
    /// Expanded country list, identity heuristic and exploit paths
    #[default]
    V2,
}

/// Edge filter rules
///
/// Country codes are held upper-case and blocked path prefixes lower-case,
/// matching how request attributes are normalized before comparison.
/// Exemptions are matched exactly as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgePolicy {
    version: PolicyVersion,
    blocked_countries: BTreeSet<String>,
    /// Zero disables the identity check
    min_identity_length: usize,
    blocked_path_prefixes: Vec<String>,
    exempt_path_prefixes: Vec<String>,
    exempt_extensions: Vec<String>,
}

const V1_COUNTRIES: &[&str] = &["CN", "RU"];
const V2_COUNTRIES: &[&str] = &["RU", "CN", "VN", "IQ", "KP", "IR"];
const V2_MIN_IDENTITY_LENGTH: usize = 10;
const V2_PATH_PREFIXES: &[&str] = &[
    "/wp-admin",
    "/wp-login",
    "/xmlrpc.php",
    "/.env",
    "/phpmyadmin",
    "/admin.php",
    "/.git",
    "/config.php",
];
const EXEMPT_PREFIXES: &[&str] = &["/_next/static", "/_next/image", "/favicon.ico"];
const EXEMPT_EXTENSIONS: &[&str] = &[".png", ".svg", ".jpg"];

impl Default for EdgePolicy {
    fn default() -> Self {
        Self::for_version(PolicyVersion::default())
    }
}

impl EdgePolicy {
    pub fn for_version(version: PolicyVersion) -> Self {
        let policy = Self {
            version,
            blocked_countries: BTreeSet::new(),
            min_identity_length: 0,
            blocked_path_prefixes: Vec::new(),
            exempt_path_prefixes: Vec::new(),
            exempt_extensions: Vec::new(),
        }
        .with_exempt_path_prefixes(EXEMPT_PREFIXES.iter().copied())
        .with_exempt_extensions(EXEMPT_EXTENSIONS.iter().copied());

        match version {
            PolicyVersion::V1 => policy.with_blocked_countries(V1_COUNTRIES.iter().copied()),
            PolicyVersion::V2 => policy
                .with_blocked_countries(V2_COUNTRIES.iter().copied())
                .with_min_identity_length(V2_MIN_IDENTITY_LENGTH)
                .with_blocked_path_prefixes(V2_PATH_PREFIXES.iter().copied()),
        }
    }

    pub fn with_blocked_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.blocked_countries = countries
            .into_iter()
            .filter_map(|c| normalize_country(c.as_ref()))
            .collect();
        self
    }

    pub fn with_min_identity_length(mut self, length: usize) -> Self {
        self.min_identity_length = length;
        self
    }

    pub fn with_blocked_path_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.blocked_path_prefixes = normalize_paths(prefixes);
        self
    }

    pub fn with_exempt_path_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exempt_path_prefixes = trim_paths(prefixes);
        self
    }

    pub fn with_exempt_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exempt_extensions = trim_paths(extensions);
        self
    }

    pub fn version(&self) -> PolicyVersion {
        self.version
    }

    pub fn blocked_countries(&self) -> impl Iterator<Item = &str> {
        self.blocked_countries.iter().map(String::as_str)
    }

    pub fn min_identity_length(&self) -> usize {
        self.min_identity_length
    }

    pub fn blocked_path_prefixes(&self) -> &[String] {
        &self.blocked_path_prefixes
    }

    /// Static assets are served without running the pipeline
    pub fn is_exempt(&self, path: &str) -> bool {
        self.exempt_path_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
            || self
                .exempt_extensions
                .iter()
                .any(|ext| path.ends_with(ext.as_str()))
    }

    /// Run the pipeline and report which check decided
    pub fn evaluate(&self, request: &RequestAttributes<'_>) -> Verdict {
        PIPELINE
            .iter()
            .find_map(|check| {
                self.run_check(*check, request).map(|decision| Verdict {
                    decision,
                    check: Some(*check),
                })
            })
            .unwrap_or(Verdict {
                decision: Decision::Allow,
                check: None,
            })
    }

    pub fn decide(&self, request: &RequestAttributes<'_>) -> Decision {
        self.evaluate(request).decision
    }

    fn run_check(&self, check: Check, request: &RequestAttributes<'_>) -> Option<Decision> {
        let matched = match check {
            Check::Geography => self.is_blocked_country(request.country),
            Check::ClientIdentity => self.is_suspicious_identity(request.client_identity),
            Check::ExploitPath => self.is_probe_path(request.path),
        };

        matched.then_some(match check {
            Check::Geography | Check::ClientIdentity => Decision::DenyForbidden,
            Check::ExploitPath => Decision::DenyNotFound,
        })
    }

    /// A missing or empty country is never blocked
    fn is_blocked_country(&self, country: Option<&str>) -> bool {
        country
            .and_then(normalize_country)
            .is_some_and(|c| self.blocked_countries.contains(&c))
    }

    /// A missing or empty identity is always suspicious while the check is on
    fn is_suspicious_identity(&self, identity: Option<&str>) -> bool {
        if self.min_identity_length == 0 {
            return false;
        }
        match identity {
            None => true,
            Some(identity) => {
                identity.is_empty() || identity.chars().count() < self.min_identity_length
            }
        }
    }

    fn is_probe_path(&self, path: &str) -> bool {
        let path = path.to_lowercase();
        self.blocked_path_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }
}

fn normalize_country(country: &str) -> Option<String> {
    let country = country.trim();
    (!country.is_empty()).then(|| country.to_ascii_uppercase())
}

fn normalize_paths<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    trim_paths(values)
        .into_iter()
        .map(|v| v.to_lowercase())
        .collect()
}

fn trim_paths<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| v.as_ref().trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}
