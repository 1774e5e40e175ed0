use crate::prelude::{println, *};
use crate::store::ContentStore;
use hospitality_core::queries::ContentQuery;
use hospitality_core::sitemap;

#[derive(Debug, clap::Args)]
pub struct SitemapOptions {
    /// Print the entries as JSON instead of sitemap XML
    #[arg(long)]
    json: bool,
}

pub async fn run(options: SitemapOptions, global: crate::Global) -> Result<()> {
    let config = crate::config::load(global.config.as_deref())?;
    let store = ContentStore::from_global(&global, &config)?;

    let articles = store.fetch(&ContentQuery::All).await?;
    let entries = sitemap::build(&config.site.base_url, &articles, chrono::Utc::now());

    if global.verbose {
        println!("{} articles, {} entries", articles.len(), entries.len());
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        println!("{}", sitemap::to_xml(&entries));
    }

    Ok(())
}
