//! View models for each route
//!
//! Pure transformations from fetched records to the data a page needs. The
//! HTTP shell serializes these as JSON; rendering them is someone else's job.

use serde::Serialize;

use crate::article::Article;
use crate::catalog;
use crate::home::{self, HomeLayout};
use crate::pagination::PageWindow;
use crate::related::{Related, RelatedStage};
use crate::routes::{self, Link, StaticPage};

/// Compact article summary used in every listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleCard {
    pub id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub href: String,
    pub image_url: Option<String>,
    pub image_alt: String,
    pub subcategory: Option<String>,
    pub excerpt: Option<String>,
}

impl From<&Article> for ArticleCard {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id.clone(),
            title: article.title.clone(),
            subtitle: article.subtitle.clone(),
            href: article.href(),
            image_url: article.image_url().map(str::to_string),
            image_alt: article.image_alt().to_string(),
            subcategory: article.subcategory.clone(),
            excerpt: article.excerpt.clone(),
        }
    }
}

fn cards<'a>(articles: impl IntoIterator<Item = &'a Article>) -> Vec<ArticleCard> {
    articles.into_iter().map(ArticleCard::from).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginationView {
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
}

impl<T> From<&PageWindow<'_, T>> for PaginationView {
    fn from(window: &PageWindow<'_, T>) -> Self {
        Self {
            page: window.page,
            total_pages: window.total_pages,
            total_items: window.total_items,
            prev_href: window.prev_page().map(routes::page_href),
            next_href: window.next_page().map(routes::page_href),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeView {
    pub featured: Option<ArticleCard>,
    pub sub_featured: Vec<ArticleCard>,
    pub grid: Vec<ArticleCard>,
    pub more_href: Option<String>,
}

pub fn home_view(set: &[Article]) -> HomeView {
    let HomeLayout {
        featured,
        sub_featured,
        grid,
        has_more,
    } = home::layout(set);

    HomeView {
        featured: featured.map(ArticleCard::from),
        sub_featured: cards(sub_featured),
        grid: cards(grid),
        more_href: has_more.then(|| routes::ARTICLES.to_string()),
    }
}

/// The main listing, one page at a time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingView {
    pub heading: String,
    /// Subcategory filter choices across the whole catalog
    pub subcategories: Vec<Link>,
    pub articles: Vec<ArticleCard>,
    pub pagination: PaginationView,
}

pub fn listing_view(set: &[Article], window: &PageWindow<'_, Article>) -> ListingView {
    ListingView {
        heading: "Article Collection".to_string(),
        subcategories: catalog::subcategories(set)
            .into_iter()
            .map(|sub| Link::new(sub, routes::subcategory_href(sub)))
            .collect(),
        articles: cards(window.items),
        pagination: PaginationView::from(window),
    }
}

/// Which classification a filtered listing was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Subcategory,
    Tag,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredView {
    pub kind: FilterKind,
    pub heading: String,
    pub canonical: String,
    pub articles: Vec<ArticleCard>,
    pub back: Link,
}

/// Listing for a subcategory, headed by its display name
pub fn subcategory_view(display: &str, articles: &[Article]) -> FilteredView {
    FilteredView {
        kind: FilterKind::Subcategory,
        heading: display.to_string(),
        canonical: routes::subcategory_href(display),
        articles: cards(articles),
        back: Link::new("All Articles", routes::ARTICLES),
    }
}

/// Listing for a tag, headed by its display name
pub fn tag_view(display: &str, articles: &[Article]) -> FilteredView {
    FilteredView {
        kind: FilterKind::Tag,
        heading: format!("Articles tagged \"{display}\""),
        canonical: routes::tag_href(display),
        articles: cards(articles),
        back: Link::new("All Articles", routes::ARTICLES),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleView {
    pub article: Article,
    pub canonical: String,
    pub breadcrumbs: Vec<Link>,
    pub tags: Vec<Link>,
    pub related: Vec<ArticleCard>,
    pub related_stage: RelatedStage,
}

pub fn article_view(article: &Article, related: &Related<'_>) -> ArticleView {
    ArticleView {
        article: article.clone(),
        canonical: article.href(),
        breadcrumbs: routes::breadcrumbs(article),
        tags: article
            .tags
            .iter()
            .map(|tag| Link::new(tag.clone(), routes::tag_href(tag)))
            .collect(),
        related: cards(related.articles.iter().copied()),
        related_stage: related.stage,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaticPageView {
    pub page: StaticPage,
    pub title: String,
    pub canonical: String,
}

impl From<StaticPage> for StaticPageView {
    fn from(page: StaticPage) -> Self {
        Self {
            page,
            title: page.title().to_string(),
            canonical: page.path().to_string(),
        }
    }
}

/// Generic not-found page with links back into the catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotFoundView {
    pub message: String,
    pub links: Vec<Link>,
}

impl Default for NotFoundView {
    fn default() -> Self {
        Self {
            message: "Page not found".to_string(),
            links: vec![
                Link::new("Home", routes::HOME),
                Link::new("Browse Articles", routes::ARTICLES),
            ],
        }
    }
}
