//! Scan history commands.

use clap::Subcommand;
use pocketshop_client_state::{ClientState, NewScan};
use pocketshop_core::OrderData;

use super::{CommandError, parse_json, print_json};

#[derive(Subcommand)]
pub enum ScansAction {
    /// Print the history, most recent first
    List,
    /// Show one entry
    Get {
        /// Tracking code
        code: String,
    },
    /// Record a lookup
    Add {
        /// Tracking code
        code: String,
        #[arg(long)]
        order_id: Option<String>,
        #[arg(long)]
        customer: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Fill an entry from a fetched order record
    Enrich {
        /// Tracking code
        code: String,
        /// Order record as JSON
        #[arg(long)]
        order: String,
    },
    /// Remove an entry
    Remove {
        /// Tracking code
        code: String,
    },
    /// Delete the history
    Clear,
}

/// Run a scan history subcommand.
pub async fn run(state: &ClientState, action: ScansAction) -> Result<(), CommandError> {
    let scans = state.scans();
    let items = match action {
        ScansAction::List => scans.list().await,
        ScansAction::Get { code } => return print_json(&scans.get(&code).await),
        ScansAction::Add {
            code,
            order_id,
            customer,
            status,
        } => {
            let scan = NewScan {
                order_id,
                customer_name: customer,
                status,
                ..NewScan::new(code)
            };
            scans.add(scan).await?
        }
        ScansAction::Enrich { code, order } => {
            let order: OrderData = parse_json("order", &order)?;
            scans.enrich_with_order_data(&code, order).await
        }
        ScansAction::Remove { code } => scans.remove(&code).await,
        ScansAction::Clear => {
            scans.clear().await;
            tracing::info!("Scan history cleared");
            return Ok(());
        }
    };

    print_json(&items)
}
