use crate::prelude::*;
use clap::Parser;
use std::path::PathBuf;

mod articles;
mod config;
mod edge;
mod error;
mod prelude;
mod server;
mod sitemap;
mod store;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Catalog server and tooling for the HOSPITALITY.FYI magazine"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Path to the TOML site configuration
    #[clap(long, env = "HOSPITALITY_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Serve articles from a local JSON file instead of the content store
    #[clap(long, env = "HOSPITALITY_FIXTURE", global = true)]
    fixture: Option<PathBuf>,

    /// Read token for private Sanity datasets
    #[clap(long, env = "SANITY_TOKEN", global = true, hide_env_values = true)]
    sanity_token: Option<String>,

    /// Whether to display additional information.
    #[clap(long, env = "HOSPITALITY_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Serve the site's routes over HTTP
    Serve(crate::server::ServeOptions),

    /// Browse the article catalog
    Articles(crate::articles::App),

    /// Inspect the edge request filter
    Edge(crate::edge::App),

    /// Print the sitemap
    Sitemap(crate::sitemap::SitemapOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Serve(options) => crate::server::run(options, app.global).await,
        SubCommands::Articles(sub_app) => crate::articles::run(sub_app, app.global).await,
        SubCommands::Edge(sub_app) => crate::edge::run(sub_app, app.global),
        SubCommands::Sitemap(options) => crate::sitemap::run(options, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
