//! Favorites commands.

use clap::Subcommand;
use pocketshop_client_state::ClientState;
use pocketshop_core::{Product, ProductIdentity};

use super::{CommandError, parse_json, print_json};

#[derive(Subcommand)]
pub enum FavoritesAction {
    /// Print the favorites, most recent first
    List,
    /// Add a product
    Add {
        /// Product record as JSON
        #[arg(long)]
        product: String,
    },
    /// Remove a product
    Remove {
        /// Product identity
        product_id: String,
    },
    /// Add the product if absent, remove it if present
    Toggle {
        /// Product record as JSON
        #[arg(long)]
        product: String,
    },
    /// Delete all favorites
    Clear,
}

/// Run a favorites subcommand.
pub async fn run(state: &ClientState, action: FavoritesAction) -> Result<(), CommandError> {
    let items = match action {
        FavoritesAction::List => state.favorites().list().await,
        FavoritesAction::Add { product } => {
            let product: Product = parse_json("product", &product)?;
            state.add_favorite(product).await?
        }
        FavoritesAction::Remove { product_id } => {
            let id = ProductIdentity::parse(product_id)?;
            state.remove_favorite(&id).await
        }
        FavoritesAction::Toggle { product } => {
            let product: Product = parse_json("product", &product)?;
            let liked = state.toggle_favorite(product).await?;
            tracing::info!(liked, "Favorite toggled");
            state.favorites().list().await
        }
        FavoritesAction::Clear => {
            state.clear_favorites().await;
            tracing::info!("Favorites cleared");
            return Ok(());
        }
    };

    print_json(&items)
}
