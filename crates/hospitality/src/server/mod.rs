use crate::prelude::{eprintln, *};
use crate::store::ContentStore;
use axum::{middleware, routing::get, Router};
use hospitality_core::config::SiteConfig;
use hospitality_core::edge::EdgePolicy;
use hospitality_core::pagination::Paginator;
use hospitality_core::routes::StaticPage;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

mod edge;
mod handlers;

#[derive(Debug, clap::Args)]
pub struct ServeOptions {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
}

/// Everything a request handler needs, built once at startup
#[derive(Debug)]
pub struct AppState {
    pub store: ContentStore,
    pub config: SiteConfig,
    pub paginator: Paginator,
    pub policy: EdgePolicy,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(store: ContentStore, config: SiteConfig) -> Result<Self> {
        let paginator = config.paginator()?;
        let policy = config.edge_policy();
        Ok(Self {
            store,
            config,
            paginator,
            policy,
        })
    }
}

pub async fn run(options: ServeOptions, global: crate::Global) -> Result<()> {
    let config = crate::config::load(global.config.as_deref())?;
    let store = ContentStore::from_global(&global, &config)?;
    let state = Arc::new(AppState::new(store, config)?);

    let addr = f!("{}:{}", options.host, options.port);

    if global.verbose {
        eprintln!("Starting {} on http://{}", state.config.site.name, addr);
        eprintln!(
            "Edge filter: {} (policy {:?})",
            if state.config.edge.enabled { "on" } else { "off" },
            state.policy.version()
        );
    }

    let app_router = router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind to {}: {}", addr, e))?;

    log::info!("listening on http://{addr}");

    axum::serve(listener, app_router)
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    Ok(())
}

/// All site routes behind the edge filter
pub fn router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/", get(handlers::home))
        .route("/articles", get(handlers::articles))
        .route("/articles/page/{page}", get(handlers::articles_page))
        .route(
            "/articles/subcategory/{subcategory}",
            get(handlers::subcategory),
        )
        .route("/articles/tag/{tag}", get(handlers::tag))
        .route("/articles/{slug}", get(handlers::article))
        .route("/sitemap.xml", get(handlers::sitemap_xml));

    for page in StaticPage::ALL {
        router = router.route(page.path(), get(move || handlers::static_page(page)));
    }

    router
        .fallback(handlers::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), edge::filter))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FixtureStore;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use hospitality_core::edge::PolicyVersion;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64)";

    fn fixture_json(n: usize) -> String {
        let articles: Vec<Value> = (0..n)
            .map(|i| {
                let sub = if i % 2 == 0 { "Leadership" } else { "Ratings Systems" };
                json!({
                    "_id": format!("id-{i}"),
                    "title": format!("Article {i}"),
                    "slug": { "current": format!("a{i}") },
                    "subcategory": sub,
                    "category": "hospitality",
                    "sites": ["hospitality"],
                    "tags": ["Fine Dining"],
                    "publishedAt": format!("2024-01-{:02}T00:00:00Z", 28 - i),
                })
            })
            .collect();
        serde_json::to_string(&articles).unwrap()
    }

    fn app_with(config: SiteConfig, n: usize) -> Router {
        let store = FixtureStore::from_json(&fixture_json(n), &config.content).unwrap();
        let state = AppState::new(ContentStore::Fixture(store), config).unwrap();
        router(Arc::new(state))
    }

    fn app() -> Router {
        app_with(SiteConfig::default(), 25)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::USER_AGENT, AGENT)
            .body(Body::empty())
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let (status, body) = send(app(), get_request(uri)).await;
        (status, serde_json::from_str(&body).unwrap())
    }

    #[tokio::test]
    async fn test_listing_pages() {
        let (status, body) = get_json("/articles").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["articles"].as_array().unwrap().len(), 12);
        assert_eq!(body["pagination"]["total_pages"], 3);
        assert_eq!(body["pagination"]["next_href"], "/articles/page/2");

        let (status, body) = get_json("/articles/page/3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["articles"].as_array().unwrap().len(), 1);
        assert_eq!(body["pagination"]["prev_href"], "/articles/page/2");
    }

    #[tokio::test]
    async fn test_listing_rejects_non_canonical_pages() {
        for uri in [
            "/articles/page/1",
            "/articles/page/0",
            "/articles/page/4",
            "/articles/page/02",
            "/articles/page/two",
        ] {
            let (status, body) = get_json(uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body["message"], "Page not found");
        }
    }

    #[tokio::test]
    async fn test_home() {
        let (status, body) = get_json("/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["featured"]["href"], "/articles/a0");
        assert_eq!(body["sub_featured"].as_array().unwrap().len(), 2);
        assert_eq!(body["more_href"], "/articles");
    }

    #[tokio::test]
    async fn test_article_with_related() {
        let (status, body) = get_json("/articles/a0").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["article"]["title"], "Article 0");

        let related = body["related"].as_array().unwrap();
        assert_eq!(related.len(), 3);
        assert!(related.iter().all(|card| card["href"] != "/articles/a0"));
        assert_eq!(body["related_stage"], "primary");
    }

    #[tokio::test]
    async fn test_unknown_article() {
        let (status, _) = get_json("/articles/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_subcategory_and_tag() {
        let (status, body) = get_json("/articles/subcategory/ratings-systems").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["heading"], "Ratings Systems");
        assert_eq!(body["articles"].as_array().unwrap().len(), 12);

        let (status, _) = get_json("/articles/subcategory/spa-design").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = get_json("/articles/tag/fine-dining").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["heading"], "Articles tagged \"fine dining\"");
        assert_eq!(body["articles"].as_array().unwrap().len(), 25);

        let (status, _) = get_json("/articles/tag/brunch").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_static_page() {
        let (status, body) = get_json("/privacy").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Privacy Policy");
    }

    #[tokio::test]
    async fn test_sitemap() {
        let response = app().oneshot(get_request("/sitemap.xml")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("application/xml"));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let xml = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(xml.contains("<loc>https://hospitality.fyi/articles/a24</loc>"));
    }

    #[tokio::test]
    async fn test_edge_blocks_country() {
        let request = Request::builder()
            .uri("/articles")
            .header(header::USER_AGENT, AGENT)
            .header("x-vercel-ip-country", "RU")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, "Access denied.");
    }

    #[tokio::test]
    async fn test_edge_requires_identity() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, "Access denied.");

        let request = Request::builder()
            .uri("/")
            .header(header::USER_AGENT, "curl/8")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(app(), request).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_edge_hides_exploit_paths() {
        let (status, body) = send(app(), get_request("/wp-admin/setup.php")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Not found.");
    }

    #[tokio::test]
    async fn test_edge_skips_static_assets() {
        let request = Request::builder()
            .uri("/logo.png")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(app(), request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_edge_asset_exemption_is_case_sensitive() {
        let request = Request::builder()
            .uri("/LOGO.PNG")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, "Access denied.");
    }

    #[tokio::test]
    async fn test_edge_accepts_non_ascii_user_agent() {
        let agent = "Mozilla/5.0 (Linux; Android 14; Teléfono) Chrome/120";
        let request = Request::builder()
            .uri("/articles")
            .header(
                header::USER_AGENT,
                header::HeaderValue::from_bytes(agent.as_bytes()).unwrap(),
            )
            .header("x-vercel-ip-country", "US")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_edge_rejects_non_utf8_user_agent() {
        let request = Request::builder()
            .uri("/articles")
            .header(
                header::USER_AGENT,
                header::HeaderValue::from_bytes(b"Mozilla/5.0 (\xff\xfe) Gecko").unwrap(),
            )
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(app(), request).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_edge_v1_policy() {
        let mut config = SiteConfig::default();
        config.edge.policy = PolicyVersion::V1;
        let app = app_with(config, 3);

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let (status, _) = send(app.clone(), request).await;
        assert_eq!(status, StatusCode::OK);

        let request = Request::builder()
            .uri("/")
            .header("x-vercel-ip-country", "vn")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(app.clone(), request).await;
        assert_eq!(status, StatusCode::OK);

        let request = Request::builder()
            .uri("/")
            .header("x-vercel-ip-country", "cn")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(app, request).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_edge_disabled() {
        let mut config = SiteConfig::default();
        config.edge.enabled = false;
        let app = app_with(config, 3);

        let request = Request::builder()
            .uri("/")
            .header("x-vercel-ip-country", "RU")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
    }
}
