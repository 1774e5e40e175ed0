//! Site addresses
//!
//! Builds the canonical paths of the route surface. Listing page 1 always
//! points at `/articles`, never at `/articles/page/1`.

use serde::Serialize;

use crate::article::Article;
use crate::slug::to_slug;

pub const HOME: &str = "/";
pub const ARTICLES: &str = "/articles";

/// Path of a listing page
pub fn page_href(page: usize) -> String {
    if page <= 1 {
        ARTICLES.to_string()
    } else {
        format!("{ARTICLES}/page/{page}")
    }
}

/// Path of a subcategory listing, from its display form
pub fn subcategory_href(subcategory: &str) -> String {
    format!("{ARTICLES}/subcategory/{}", to_slug(subcategory))
}

/// Path of a tag listing, from its stored form
pub fn tag_href(tag: &str) -> String {
    format!("{ARTICLES}/tag/{}", to_slug(tag))
}

/// Parse the `{n}` segment of `/articles/page/{n}`
///
/// Anything that is not a plain decimal yields `None`, and so does a
/// leading zero: each page has exactly one address.
pub fn parse_page_segment(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if segment.len() > 1 && segment.starts_with('0') {
        return None;
    }
    segment.parse().ok()
}

/// Static legal and informational pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StaticPage {
    About,
    Privacy,
    Terms,
    Cookies,
    Disclaimer,
}

impl StaticPage {
    pub const ALL: [StaticPage; 5] = [
        StaticPage::About,
        StaticPage::Privacy,
        StaticPage::Terms,
        StaticPage::Cookies,
        StaticPage::Disclaimer,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            StaticPage::About => "/about",
            StaticPage::Privacy => "/privacy",
            StaticPage::Terms => "/terms",
            StaticPage::Cookies => "/cookies",
            StaticPage::Disclaimer => "/disclaimer",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            StaticPage::About => "About",
            StaticPage::Privacy => "Privacy Policy",
            StaticPage::Terms => "Terms of Service",
            StaticPage::Cookies => "Cookie Policy",
            StaticPage::Disclaimer => "Disclaimer",
        }
    }
}

/// A link with its label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub label: String,
    pub href: String,
}

impl Link {
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
        }
    }
}

/// Home, Articles, the subcategory when present, then the article itself
pub fn breadcrumbs(article: &Article) -> Vec<Link> {
    let mut crumbs = vec![Link::new("Home", HOME), Link::new("Articles", ARTICLES)];
    if let Some(subcategory) = article.subcategory.as_deref().filter(|s| !s.trim().is_empty()) {
        crumbs.push(Link::new(subcategory, subcategory_href(subcategory)));
    }
    crumbs.push(Link::new(article.title.clone(), article.href()));
    crumbs
}
