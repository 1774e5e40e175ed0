use super::SharedState;
use crate::prelude::*;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use hospitality_core::catalog::{self, CatalogError};
use hospitality_core::pagination::{PageAddress, PaginationError};
use hospitality_core::queries::ContentQuery;
use hospitality_core::related::Related;
use hospitality_core::routes::{self, StaticPage};
use hospitality_core::sitemap;
use hospitality_core::slug::{self, DisplayCase};
use hospitality_core::views::{self, NotFoundView, StaticPageView};

/// Why a page could not be served
#[derive(Debug)]
pub enum PageError {
    NotFound,
    Unavailable,
}

type PageResult<T> = std::result::Result<Json<T>, PageError>;

impl From<Error> for PageError {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound(_) => PageError::NotFound,
            _ => PageError::Unavailable,
        }
    }
}

impl From<PaginationError> for PageError {
    fn from(_: PaginationError) -> Self {
        PageError::NotFound
    }
}

impl From<CatalogError> for PageError {
    fn from(_: CatalogError) -> Self {
        PageError::NotFound
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::NotFound => not_found_response(),
            PageError::Unavailable => (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({
                    "message": "Content is temporarily unavailable"
                })),
            )
                .into_response(),
        }
    }
}

fn not_found_response() -> Response {
    (StatusCode::NOT_FOUND, Json(NotFoundView::default())).into_response()
}

pub async fn not_found() -> Response {
    not_found_response()
}

pub async fn home(State(state): State<SharedState>) -> PageResult<views::HomeView> {
    let articles = state.store.fetch(&ContentQuery::All).await?;
    Ok(Json(views::home_view(&articles)))
}

pub async fn articles(State(state): State<SharedState>) -> PageResult<views::ListingView> {
    listing(&state, PageAddress::Root).await
}

pub async fn articles_page(
    State(state): State<SharedState>,
    Path(segment): Path<String>,
) -> PageResult<views::ListingView> {
    let page = routes::parse_page_segment(&segment).ok_or(PageError::NotFound)?;
    listing(&state, PageAddress::Paginated(page)).await
}

async fn listing(state: &SharedState, address: PageAddress) -> PageResult<views::ListingView> {
    let articles = state.store.fetch(&ContentQuery::All).await?;
    let window = state.paginator.window(&articles, address)?;
    Ok(Json(views::listing_view(&articles, &window)))
}

pub async fn subcategory(
    State(state): State<SharedState>,
    Path(subcategory): Path<String>,
) -> PageResult<views::FilteredView> {
    let display = slug::subcategory_query(&subcategory);
    let articles = state
        .store
        .fetch(&ContentQuery::BySubcategory(display.clone()))
        .await?;

    if articles.is_empty() {
        return Err(PageError::NotFound);
    }

    Ok(Json(views::subcategory_view(&display, &articles)))
}

pub async fn tag(
    State(state): State<SharedState>,
    Path(tag): Path<String>,
) -> PageResult<views::FilteredView> {
    let articles = state
        .store
        .fetch(&ContentQuery::ByTag(slug::tag_query(&tag)))
        .await?;

    if articles.is_empty() {
        return Err(PageError::NotFound);
    }

    let display = slug::to_display(&tag, DisplayCase::LowerCase);
    Ok(Json(views::tag_view(&display, &articles)))
}

pub async fn article(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> PageResult<views::ArticleView> {
    let found = state
        .store
        .fetch(&ContentQuery::BySlug(slug.clone()))
        .await?;
    let article = catalog::require_slug(&found, &slug)?;

    let (related, stage) = state
        .store
        .related(article, state.config.catalog.related_limit)
        .await?;
    let related = Related {
        stage,
        articles: related.iter().collect(),
    };

    Ok(Json(views::article_view(article, &related)))
}

pub async fn static_page(page: StaticPage) -> Json<StaticPageView> {
    Json(StaticPageView::from(page))
}

pub async fn sitemap_xml(State(state): State<SharedState>) -> Result<Response, PageError> {
    let articles = state.store.fetch(&ContentQuery::All).await?;
    let entries = sitemap::build(&state.config.site.base_url, &articles, chrono::Utc::now());

    Ok((
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        sitemap::to_xml(&entries),
    )
        .into_response())
}
