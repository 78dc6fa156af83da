//! Command handlers. Each loads the store, runs one operation and renders it.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use depot_client::events::StoreEventEmitter;
use depot_client::memory::demo_warehouses;
use depot_client::{
    ClientConfig, ClientError, HttpGateway, InMemoryGateway, InventoryStore, StorePhase,
    WarehouseGateway,
};
use depot_core::{Coordinate, WarehouseId};
use tracing::{debug, info, warn};

use crate::render;
use crate::{Cli, Command, ConfigAction};

type Store = InventoryStore<Arc<dyn WarehouseGateway>>;
type CliResult<T = ()> = Result<T, Box<dyn Error>>;

// =============================================================================
// Log Emitter
// =============================================================================

/// Mirrors store events into the log.
struct LogEmitter;

impl StoreEventEmitter for LogEmitter {
    fn emit_phase(&self, phase: StorePhase) {
        debug!(%phase, "Store phase");
    }

    fn emit_refreshed(&self, count: usize) {
        info!(count, "Warehouse list refreshed");
    }

    fn emit_error(&self, operation: &str, error: &ClientError) {
        warn!(operation, error = %error, retryable = error.is_retryable(), "Store operation failed");
    }
}

// =============================================================================
// Dispatch
// =============================================================================

pub async fn run(cli: Cli) -> CliResult {
    let Cli {
        config: config_path,
        api_url,
        demo,
        command,
    } = cli;
    let settings = || effective_config(config_path.clone(), api_url.clone());

    match command {
        Command::Config { action } => config_command(action, config_path.clone()),
        Command::List { search, in_stock } => {
            let store = open_store(&settings()?, demo).await?;
            let warehouses = store.view(&search, in_stock).await;
            print!("{}", render::warehouse_list(&warehouses));
            Ok(())
        }
        Command::Nearest { lat, lon, all } => {
            let config = settings()?;
            let query = query_point(lat, lon, &config)?;
            let store = open_store(&config, demo).await?;
            if all {
                let ranked = store.rank_by_distance(query).await;
                print!("{}", render::ranking(query, &ranked));
            } else {
                let best = store.optimal_warehouse(query).await?;
                print!("{}", render::optimal(query, &best));
            }
            Ok(())
        }
        Command::Update {
            warehouse,
            product,
            quantity,
        } => {
            let store = open_store(&settings()?, demo).await?;
            update(&store, warehouse, &product, &quantity).await
        }
        Command::Order { address, product } => {
            let store = open_store(&settings()?, demo).await?;
            let confirmation = store.place_order(&address, &product).await?;
            println!(
                "Order placed. Fulfilling warehouse: {}",
                confirmation.warehouse_name
            );
            Ok(())
        }
    }
}

/// Config file and environment, then the `--api-url` flag on top.
fn effective_config(path: Option<PathBuf>, api_url: Option<String>) -> Result<ClientConfig, ClientError> {
    let mut config = ClientConfig::load(path)?;
    if let Some(url) = api_url {
        config.api.base_url = url;
        config.validate()?;
    }
    Ok(config)
}

/// Builds the gateway and store, then performs the initial load.
async fn open_store(config: &ClientConfig, demo: bool) -> Result<Store, ClientError> {
    let gateway: Arc<dyn WarehouseGateway> = if demo {
        info!("Using demo data");
        Arc::new(InMemoryGateway::new(demo_warehouses()))
    } else {
        Arc::new(HttpGateway::new(config)?)
    };

    let store = InventoryStore::with_emitter(gateway, Arc::new(LogEmitter));
    store.load_all().await?;
    Ok(store)
}

/// Flags win over the configured default point.
fn query_point(lat: Option<f64>, lon: Option<f64>, config: &ClientConfig) -> CliResult<Coordinate> {
    if let (Some(lat), Some(lon)) = (lat, lon) {
        return Ok(Coordinate::new(lat, lon)?);
    }

    config.query_point()?.ok_or_else(|| {
        "no delivery point: pass --lat/--lon or set [query] in client.toml".into()
    })
}

async fn update(store: &Store, warehouse: WarehouseId, product: &str, quantity: &str) -> CliResult {
    store.update_inventory(warehouse, product, quantity).await?;

    let set = store.warehouses().await;
    match set.get(warehouse) {
        Some(w) => print!("{}", render::warehouse_list(std::slice::from_ref(w))),
        None => println!("Warehouse {} no longer listed after refresh", warehouse),
    }
    Ok(())
}

fn config_command(action: ConfigAction, path: Option<PathBuf>) -> CliResult {
    match action {
        ConfigAction::Show => {
            let config = ClientConfig::load(path.clone())?;
            match path.or_else(ClientConfig::default_config_path) {
                Some(p) => println!("# {}", p.display()),
                None => println!("# no config path available"),
            }
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Init { force } => {
            let path = path.or_else(ClientConfig::default_config_path);
            if let Some(p) = path.as_ref().filter(|p| p.exists()) {
                if !force {
                    return Err(format!(
                        "{} already exists (use --force to overwrite)",
                        p.display()
                    )
                    .into());
                }
            }
            let written = ClientConfig::default().save(path)?;
            println!("Wrote {}", written.display());
        }
    }

    Ok(())
}
