//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! pocket-cli cart add --product '{"id": "p-1", "price": "4.50"}' --variant '{"id": "xl"}'
//! pocket-cli cart set p-1 3
//! pocket-cli cart remove-index 0
//! ```

use clap::Subcommand;
use pocketshop_client_state::ClientState;
use pocketshop_core::{Product, ProductIdentity, Variant};

use super::{CommandError, parse_json, print_json};

#[derive(Subcommand)]
pub enum CartAction {
    /// Print the cart
    Show,
    /// Add a product (merges with an existing line for the same variant)
    Add {
        /// Product record as JSON
        #[arg(long)]
        product: String,
        /// Variant record as JSON
        #[arg(long)]
        variant: Option<String>,
        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set the quantity of a product's line (0 or less removes it)
    Set {
        /// Product identity
        product_id: String,
        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove every line for a product
    Remove {
        /// Product identity
        product_id: String,
    },
    /// Remove the line at a position
    RemoveIndex {
        /// Zero-based line index
        index: usize,
    },
    /// Delete the cart
    Clear,
}

/// Run a cart subcommand.
pub async fn run(state: &ClientState, action: CartAction) -> Result<(), CommandError> {
    let cart = match action {
        CartAction::Show => state.cart().get().await,
        CartAction::Add {
            product,
            variant,
            quantity,
        } => {
            let product: Product = parse_json("product", &product)?;
            let variant: Option<Variant> = variant
                .as_deref()
                .map(|raw| parse_json("variant", raw))
                .transpose()?;
            state.add_to_cart(product, quantity, variant).await?
        }
        CartAction::Set {
            product_id,
            quantity,
        } => {
            let id = ProductIdentity::parse(product_id)?;
            state.update_cart_quantity(&id, quantity).await
        }
        CartAction::Remove { product_id } => {
            let id = ProductIdentity::parse(product_id)?;
            state.remove_from_cart(&id).await
        }
        CartAction::RemoveIndex { index } => state.cart().remove_by_index(index).await,
        CartAction::Clear => {
            state.clear_cart().await;
            tracing::info!("Cart cleared");
            return Ok(());
        }
    };

    print_json(&cart)
}
