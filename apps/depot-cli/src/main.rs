//! # Depot Operator Shell
//!
//! Command-line stand-in for the inventory UI.
//!
//! ## Usage
//!
//! ```bash
//! # List warehouses, optionally searching by name and hiding empty items
//! depot list --search ware --in-stock
//!
//! # Nearest warehouse to a point (or the configured default point)
//! depot nearest --lat 39.90 --lon 116.40
//! depot nearest --all
//!
//! # Set stock for a product at a warehouse
//! depot update --warehouse 1 --product Widget --quantity 12
//!
//! # Place an order; the backend routes it
//! depot order --address "Chaoyang, Beijing" --product Widget
//!
//! # Inspect or create the config file
//! depot config show
//! depot config init
//!
//! # Any command against built-in demo data instead of the backend
//! depot --demo nearest --lat 31.2 --lon 121.5
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Initialize Logging   tracing-subscriber, RUST_LOG overrides         │
//! │  2. Load ClientConfig    defaults → client.toml → DEPOT_* env           │
//! │  3. Build Gateway        HttpGateway, or InMemoryGateway with --demo    │
//! │  4. Build Store          InventoryStore + LogEmitter                    │
//! │  5. Run Command          load_all, then the command's operation         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

use depot_core::WarehouseId;

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "depot")]
#[command(author, version, about = "Warehouse selection and inventory shell")]
pub struct Cli {
    /// Path to client.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL, overriding config and DEPOT_API_URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Use built-in demo data instead of the backend
    #[arg(long, global = true)]
    pub demo: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List warehouses and their inventory
    List {
        /// Case-insensitive name filter
        #[arg(short, long, default_value = "")]
        search: String,

        /// Hide items with zero quantity
        #[arg(long)]
        in_stock: bool,
    },
    /// Show the warehouse nearest to a delivery point
    Nearest {
        /// Latitude in decimal degrees
        #[arg(long, allow_negative_numbers = true, requires = "lon")]
        lat: Option<f64>,

        /// Longitude in decimal degrees
        #[arg(long, allow_negative_numbers = true, requires = "lat")]
        lon: Option<f64>,

        /// Rank every warehouse by distance
        #[arg(long)]
        all: bool,
    },
    /// Set the quantity of a product at a warehouse
    Update {
        /// Warehouse id
        #[arg(short, long)]
        warehouse: WarehouseId,

        /// Product name
        #[arg(short, long)]
        product: String,

        /// New quantity (whole number, zero or more)
        #[arg(short, long, allow_hyphen_values = true)]
        quantity: String,
    },
    /// Place an order
    Order {
        /// Delivery address
        #[arg(short, long)]
        address: String,

        /// Product id or name
        #[arg(short, long)]
        product: String,
    },
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli).await {
        error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=depot_client=trace` - Show trace for the client crate only
/// - Default: INFO, debug for depot crates
///
/// Logs go to stderr so command output stays clean on stdout.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,depot=debug,reqwest=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
