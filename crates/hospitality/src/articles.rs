use crate::prelude::{println, *};
use crate::store::ContentStore;
use colored::Colorize;
use hospitality_core::catalog;
use hospitality_core::pagination::Paginator;
use hospitality_core::queries::ContentQuery;
use hospitality_core::related::Related;
use hospitality_core::slug;
use hospitality_core::views::{self, ArticleCard, ArticleView, PaginationView};
use serde::Serialize;

#[derive(Debug, clap::Parser)]
#[command(name = "articles")]
#[command(about = "Article catalog operations")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List articles one page at a time
    #[clap(name = "list")]
    List(ListOptions),

    /// Read a single article and its related articles
    #[clap(name = "read")]
    Read(ReadOptions),
}

#[derive(Debug, clap::Args, Clone)]
pub struct ListOptions {
    /// Page number (1-indexed)
    #[arg(short, long, default_value = "1")]
    page: usize,

    /// Only articles in this subcategory (URL slug, e.g. "ratings-systems")
    #[arg(long, conflicts_with = "tag")]
    subcategory: Option<String>,

    /// Only articles with this tag (URL slug, e.g. "fine-dining")
    #[arg(long)]
    tag: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct ReadOptions {
    /// Article slug
    slug: String,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
pub struct ListOutput {
    pub heading: String,
    pub articles: Vec<ArticleCard>,
    pub pagination: PaginationView,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let config = crate::config::load(global.config.as_deref())?;
    let store = ContentStore::from_global(&global, &config)?;

    if global.verbose {
        println!("Scope: {:?}", config.content.scope);
        println!();
    }

    match app.command {
        Commands::List(options) => {
            let paginator = config.paginator()?;
            list(&store, &paginator, options).await
        }
        Commands::Read(options) => {
            read(&store, config.catalog.related_limit, options).await
        }
    }
}

/// One page of the catalog, optionally filtered by subcategory or tag slug
pub async fn list_data(
    store: &ContentStore,
    paginator: &Paginator,
    subcategory: Option<&str>,
    tag: Option<&str>,
    page: usize,
) -> Result<ListOutput> {
    let (query, heading) = match (subcategory, tag) {
        (Some(sub), _) => {
            let display = slug::subcategory_query(sub);
            (ContentQuery::BySubcategory(display.clone()), display)
        }
        (None, Some(tag)) => {
            let query = slug::tag_query(tag);
            let heading = f!("Articles tagged \"{query}\"");
            (ContentQuery::ByTag(query), heading)
        }
        (None, None) => (ContentQuery::All, "Article Collection".to_string()),
    };

    let articles = store.fetch(&query).await?;
    if articles.is_empty() && query != ContentQuery::All {
        return Err(Error::NotFound(f!("no articles for {heading}")).into());
    }

    let window = paginator
        .paginate(&articles, page)
        .map_err(|e| eyre!("{e}"))?;

    Ok(ListOutput {
        heading,
        articles: window.items.iter().map(ArticleCard::from).collect(),
        pagination: PaginationView::from(&window),
    })
}

async fn list(store: &ContentStore, paginator: &Paginator, options: ListOptions) -> Result<()> {
    let data = list_data(
        store,
        paginator,
        options.subcategory.as_deref(),
        options.tag.as_deref(),
        options.page,
    )
    .await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    println!("\n{}", "=".repeat(80));
    println!("{}", data.heading.bold());
    println!("{}", "=".repeat(80));

    let mut table = new_table();
    table.add_row(prettytable::row!["#", "Slug", "Title", "Subcategory"]);
    let offset = (data.pagination.page - 1) * paginator.page_size();
    for (idx, card) in data.articles.iter().enumerate() {
        table.add_row(prettytable::row![
            offset + idx + 1,
            card.href.trim_start_matches("/articles/"),
            &card.title,
            card.subcategory.as_deref().unwrap_or("-")
        ]);
    }
    table.printstd();

    let filter = match (&options.subcategory, &options.tag) {
        (Some(sub), _) => f!(" --subcategory {sub}"),
        (None, Some(tag)) => f!(" --tag {tag}"),
        (None, None) => String::new(),
    };

    println!(
        "\nShowing page {} of {} ({} articles)",
        data.pagination.page, data.pagination.total_pages, data.pagination.total_items
    );
    if data.pagination.next_href.is_some() {
        println!(
            "  Next page: hospitality articles list{} --page {}",
            filter,
            data.pagination.page + 1
        );
    }
    if data.pagination.prev_href.is_some() {
        println!(
            "  Previous page: hospitality articles list{} --page {}",
            filter,
            data.pagination.page - 1
        );
    }
    if let Some(first) = data.articles.first() {
        println!(
            "\nTo read an article:\n  hospitality articles read {}",
            first.href.trim_start_matches("/articles/")
        );
    }
    println!();

    Ok(())
}

/// An article with its related articles, as the article page shows it
pub async fn read_data(
    store: &ContentStore,
    slug: &str,
    related_limit: usize,
) -> Result<ArticleView> {
    let found = store.fetch(&ContentQuery::BySlug(slug.to_string())).await?;
    let article =
        catalog::require_slug(&found, slug).map_err(|e| Error::NotFound(e.to_string()))?;

    let (related, stage) = store.related(article, related_limit).await?;
    let related = Related {
        stage,
        articles: related.iter().collect(),
    };

    Ok(views::article_view(article, &related))
}

async fn read(store: &ContentStore, related_limit: usize, options: ReadOptions) -> Result<()> {
    let view = read_data(store, &options.slug, related_limit).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    let article = &view.article;
    println!("\n{}", "=".repeat(80));
    println!("{}", article.title.bold());
    if let Some(subtitle) = &article.subtitle {
        println!("{}", subtitle.italic());
    }
    println!("{}", "=".repeat(80));

    let trail: Vec<&str> = view.breadcrumbs.iter().map(|l| l.label.as_str()).collect();
    println!("{}", trail.join(" / ").dimmed());

    if let Some(author) = &article.author {
        println!("Author: {author}");
    }
    if let Some(published) = &article.published_at {
        println!("Published: {}", published.format("%Y-%m-%d"));
    }
    if !view.tags.is_empty() {
        let tags: Vec<&str> = view.tags.iter().map(|l| l.label.as_str()).collect();
        println!("Tags: {}", tags.join(", "));
    }
    if let Some(excerpt) = &article.excerpt {
        println!("\n{excerpt}");
    }

    println!("\n{}", "=".repeat(80));
    println!("RELATED ({:?})", view.related_stage);
    println!("{}", "=".repeat(80));
    if view.related.is_empty() {
        println!("\nNo related articles.");
    }
    for card in &view.related {
        println!(
            "  {} {}",
            card.title.cyan(),
            f!("(hospitality articles read {})", card.href.trim_start_matches("/articles/"))
                .dimmed()
        );
    }
    println!();

    Ok(())
}
