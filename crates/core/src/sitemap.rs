//! Sitemap generation
//!
//! Pure transformation from the scoped catalog to sitemap entries and the
//! sitemap XML document. The caller supplies "now" for pages that have no
//! modification date of their own.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::article::Article;
use crate::catalog;
use crate::routes::{self, StaticPage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl ChangeFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
            ChangeFrequency::Yearly => "yearly",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SitemapEntry {
    pub url: String,
    pub last_modified: DateTime<Utc>,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

fn entry(
    base_url: &str,
    path: &str,
    last_modified: DateTime<Utc>,
    change_frequency: ChangeFrequency,
    priority: f32,
) -> SitemapEntry {
    let url = if path == routes::HOME {
        base_url.to_string()
    } else {
        format!("{base_url}{path}")
    };
    SitemapEntry {
        url,
        last_modified,
        change_frequency,
        priority,
    }
}

fn static_page_entry(base_url: &str, page: StaticPage, now: DateTime<Utc>) -> SitemapEntry {
    let (frequency, priority) = match page {
        StaticPage::About => (ChangeFrequency::Monthly, 0.7),
        _ => (ChangeFrequency::Yearly, 0.3),
    };
    entry(base_url, page.path(), now, frequency, priority)
}

/// Build every sitemap entry
///
/// Order: home and listing root, static pages, articles, subcategory
/// listings, tag listings. Subcategories and tags appear once each, in the
/// order they are first seen in the catalog.
pub fn build(base_url: &str, set: &[Article], now: DateTime<Utc>) -> Vec<SitemapEntry> {
    let base_url = base_url.trim_end_matches('/');

    let mut entries = vec![
        entry(base_url, routes::HOME, now, ChangeFrequency::Daily, 1.0),
        entry(base_url, routes::ARTICLES, now, ChangeFrequency::Daily, 0.9),
    ];

    entries.extend(
        StaticPage::ALL
            .iter()
            .map(|page| static_page_entry(base_url, *page, now)),
    );

    entries.extend(set.iter().map(|article| {
        entry(
            base_url,
            &article.href(),
            article.published_at.unwrap_or(now),
            ChangeFrequency::Monthly,
            0.8,
        )
    }));

    entries.extend(catalog::subcategories(set).into_iter().map(|sub| {
        entry(
            base_url,
            &routes::subcategory_href(sub),
            now,
            ChangeFrequency::Weekly,
            0.6,
        )
    }));

    let mut tag_paths: Vec<String> = Vec::new();
    for tag in catalog::tags(set) {
        let path = routes::tag_href(tag);
        if !tag_paths.contains(&path) {
            tag_paths.push(path);
        }
    }
    entries.extend(
        tag_paths
            .iter()
            .map(|path| entry(base_url, path, now, ChangeFrequency::Weekly, 0.5)),
    );

    entries
}

/// Render entries as a sitemap XML document
pub fn to_xml(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for entry in entries {
        xml.push_str("<url>\n");
        xml.push_str(&format!(
            "<loc>{}</loc>\n",
            html_escape::encode_text(&entry.url)
        ));
        xml.push_str(&format!(
            "<lastmod>{}</lastmod>\n",
            entry
                .last_modified
                .to_rfc3339_opts(SecondsFormat::Millis, true)
        ));
        xml.push_str(&format!(
            "<changefreq>{}</changefreq>\n",
            entry.change_frequency.as_str()
        ));
        xml.push_str(&format!("<priority>{:.1}</priority>\n", entry.priority));
        xml.push_str("</url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}
