mod chat;
mod details;
mod output;
mod search;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "bizdir")]
#[command(about = "Search a business directory from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search for places by keyword and location
    Search(search::SearchArgs),
    /// Show opening hours, price level and reviews for one place
    Details {
        /// Business name
        #[arg(long)]
        name: String,
        /// Business address
        #[arg(long)]
        address: String,
        /// Print details as JSON
        #[arg(long)]
        json: bool,
    },
    /// Chat with the assistant; reads one message per line from stdin
    Chat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = bizdir_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Search(args) => search::run_search(&config, &args).await,
        Commands::Details {
            name,
            address,
            json,
        } => details::run_details(&config, &name, &address, json).await,
        Commands::Chat => chat::run_chat(&config).await,
    }
}
