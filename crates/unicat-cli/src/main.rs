mod catalog;
mod identity;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use unicat_search::SortKey;

#[derive(Debug, Parser)]
#[command(name = "unicat-cli")]
#[command(about = "Unified catalog search and product URL tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search both catalogs, seller products first
    Search {
        /// Search text matched against product names
        query: String,
        /// latest, price_low or price_high
        #[arg(long, default_value = "latest")]
        sort: SortKey,
        /// 1-based page number
        #[arg(long, default_value = "1")]
        page: u32,
        /// Print the page as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List enabled seller products
    List {
        /// latest, price_low or price_high
        #[arg(long, default_value = "latest")]
        sort: SortKey,
        /// 1-based page number
        #[arg(long, default_value = "1")]
        page: u32,
        /// Print the page as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the URL slug for a product name
    Slug {
        /// Product name as stored in the catalog
        name: String,
    },
    /// Show how the server answers a product path
    Resolve {
        /// Request path, e.g. /products/SELLER_42
        path: String,
    },
    /// Split a product id into its source and numeric id
    Decode {
        /// Product id, e.g. GLOBAL_7
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Search {
            query,
            sort,
            page,
            json,
        } => catalog::run_search(&query, sort, page, json).await?,
        Commands::List { sort, page, json } => catalog::run_list(sort, page, json).await?,
        Commands::Slug { name } => println!("{}", identity::slug_line(&name)),
        Commands::Resolve { path } => {
            for line in identity::resolve_lines(&path) {
                println!("{line}");
            }
        }
        Commands::Decode { id } => println!("{}", identity::decode_line(&id)?),
    }

    Ok(())
}
