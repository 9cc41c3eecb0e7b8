mod retry;
mod scrape;
mod sink;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "zomato-cli")]
#[command(about = "Fetch restaurant listings and menus from Zomato")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the coordinates detected from this machine's public IP
    Locate,
    /// List restaurants delivering to a location
    Restaurants {
        /// Number of listing pages to fetch
        #[arg(long, default_value_t = 1)]
        pages: usize,

        #[command(flatten)]
        location: LocationArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Extract the menu of one listed restaurant
    Menu {
        /// Zero-based position of the restaurant in the listing
        #[arg(long, default_value_t = 0)]
        index: usize,

        /// Maximum number of listing pages to scan for that position
        #[arg(long, default_value_t = 3)]
        pages: usize,

        #[command(flatten)]
        location: LocationArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
}

/// Explicit coordinates; when omitted the location is detected by IP.
#[derive(Debug, Args)]
struct LocationArgs {
    /// Latitude in decimal degrees
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<String>,

    /// Longitude in decimal degrees
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<String>,
}

#[derive(Debug, Args)]
struct OutputArgs {
    /// Write the fetched data as JSON files
    #[arg(long)]
    write_json: bool,

    /// Directory for JSON output (defaults to ZOMATO_OUTPUT_DIR)
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = zomato_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Locate => scrape::run_locate(&config).await,
        Commands::Restaurants {
            pages,
            location,
            output,
        } => scrape::run_restaurants(&config, pages, &location, &output).await,
        Commands::Menu {
            index,
            pages,
            location,
            output,
        } => scrape::run_menu(&config, index, pages, &location, &output).await,
    }
}

#[cfg(test)]
mod tests;
