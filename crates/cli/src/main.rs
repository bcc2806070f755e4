//! Pocketshop CLI - Inspect and edit on-device client state.
//!
//! Works against the same file-backed store the app uses, which makes it handy
//! for reproducing cart or scan history bugs from a copied data directory.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! pocket-cli cart show
//!
//! # Add two units of a product
//! pocket-cli cart add --product '{"id": "p-1", "price": "9.99"}' --quantity 2
//!
//! # Record a tracking lookup
//! pocket-cli scans add TRK123 --status in_transit
//!
//! # Print badge counts
//! pocket-cli counts
//! ```
//!
//! # Commands
//!
//! - `cart` - Show and edit the cart
//! - `favorites` - Show and edit favorites
//! - `draft` - Show, save or clear the checkout draft
//! - `scans` - Show and edit the scan history
//! - `counts` - Publish badge counts once and print them

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pocketshop_client_state::{ClientState, ClientStateConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "pocket-cli")]
#[command(author, version, about = "Pocketshop client-state tools")]
struct Cli {
    /// Data directory (overrides `POCKETSHOP_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show and edit the cart
    Cart {
        #[command(subcommand)]
        action: commands::cart::CartAction,
    },
    /// Show and edit favorites
    Favorites {
        #[command(subcommand)]
        action: commands::favorites::FavoritesAction,
    },
    /// Show, save or clear the checkout draft
    Draft {
        #[command(subcommand)]
        action: commands::draft::DraftAction,
    },
    /// Show and edit the tracking scan history
    Scans {
        #[command(subcommand)]
        action: commands::scans::ScansAction,
    },
    /// Publish badge counts once and print them
    Counts,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pocket_cli=info,pocketshop_client_state=info".into());

    // stdout is reserved for command output
    let json_layer = cli.log_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!cli.log_json)
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ClientStateConfig::from_env()?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    let state = ClientState::open(&config).await?;
    tracing::debug!(data_dir = %config.data_dir.display(), "Client state ready");

    match cli.command {
        Commands::Cart { action } => commands::cart::run(&state, action).await?,
        Commands::Favorites { action } => commands::favorites::run(&state, action).await?,
        Commands::Draft { action } => commands::draft::run(&state, action).await?,
        Commands::Scans { action } => commands::scans::run(&state, action).await?,
        Commands::Counts => commands::counts(&state).await?,
    }
    Ok(())
}
