use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use craftcatalog::{fallback, Catalog, Config, ResultSource, SearchQuery, SortField, SortOrder};

/// Command-line client for the modpack catalog
#[derive(Parser, Debug)]
#[command(name = "craftcatalog")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Catalog API key (overrides CURSEFORGE_API_KEY)
    #[arg(long, value_name = "KEY", global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search the catalog
    Search {
        /// Search term
        #[arg(default_value = "")]
        term: String,

        /// Only keep results in this category
        #[arg(long)]
        category: Option<String>,

        /// Sort field (featured, popularity, last-updated, name, author, total-downloads)
        #[arg(long, default_value = "popularity")]
        sort: SortField,

        /// Sort order (asc, desc)
        #[arg(long, default_value = "desc")]
        order: SortOrder,

        /// Results per page (max 50)
        #[arg(long, default_value_t = 20)]
        page_size: u32,

        /// Zero-based offset of the first result
        #[arg(long, default_value_t = 0)]
        index: u32,
    },
    /// Show full metadata for a modpack
    Details {
        id: i64,
    },
    /// List the files of a modpack, newest first
    Versions {
        id: i64,

        /// Only files for this game version
        #[arg(long)]
        game_version: Option<String>,
    },
    /// Probe a custom download URL
    ValidateUrl {
        url: String,
    },
    /// List sites that host modpacks
    Sites,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,hyper=warn,reqwest=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let config = Config::load(args.config.as_ref(), args.api_key.as_deref())?;
    info!(
        "Configuration loaded: base_url={} credential={}",
        config.base_url,
        config.api_key().is_some()
    );

    if let Command::Sites = args.command {
        return print_json(fallback::hosting_sites());
    }

    let catalog = Catalog::new(&config)?;
    let outcome = run(&catalog, args.command).await;
    catalog.close();
    outcome
}

async fn run(catalog: &Catalog, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Search {
            term,
            category,
            sort,
            order,
            page_size,
            index,
        } => {
            let query = SearchQuery {
                term,
                category,
                sort_field: sort,
                sort_order: order,
                page_size,
                index,
            };
            let search = catalog.search_with_source(&query).await?;
            if let ResultSource::Fallback(reason) = search.source {
                info!("Showing offline suggestions ({:?})", reason);
            }
            print_json(&search.results)
        }
        Command::Details { id } => print_json(&catalog.details(id).await?),
        Command::Versions { id, game_version } => {
            print_json(&catalog.versions(id, game_version.as_deref()).await?)
        }
        Command::ValidateUrl { url } => print_json(&catalog.validate_url(&url).await?),
        Command::Sites => print_json(fallback::hosting_sites()),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
