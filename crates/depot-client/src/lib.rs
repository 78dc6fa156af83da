//! # depot-client: Backend Access & Inventory Store
//!
//! Everything in Depot that performs I/O or holds cached state.
//!
//! ## Module Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         depot-client                                    │
//! │                                                                         │
//! │  store      - InventoryStore: cached set, phases, update + reconcile   │
//! │  gateway    - WarehouseGateway trait                                   │
//! │  http       - HttpGateway (reqwest, retry with backoff)                │
//! │  memory     - InMemoryGateway (tests, demo mode)                       │
//! │  protocol   - Wire DTOs and their conversion into domain types         │
//! │  events     - StoreEventEmitter for renderers                          │
//! │  config     - ClientConfig (TOML + env)                                │
//! │  error      - ClientError                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Typical Use
//! ```text
//! let config  = ClientConfig::load(None)?;
//! let gateway = HttpGateway::new(&config)?;
//! let store   = Arc::new(InventoryStore::new(gateway));
//!
//! store.load_all().await?;
//! let best = store.optimal_warehouse(query).await?;
//! store.update_inventory(best.warehouse.id, "Widget", "12").await?;
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod gateway;
pub mod http;
pub mod memory;
pub mod protocol;
pub mod store;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use events::{NoOpEmitter, StoreEventEmitter};
pub use gateway::WarehouseGateway;
pub use http::HttpGateway;
pub use memory::InMemoryGateway;
pub use store::{InventoryStore, OptimalWarehouse, StorePhase, StoreSnapshot};
