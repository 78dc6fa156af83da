//! # depot-core: Pure Warehouse Logic for Depot
//!
//! The domain model and the algorithms the inventory client runs locally:
//! great-circle distance, nearest-warehouse selection, search and stock
//! filtering, and validation of operator input.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Depot Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    depot-cli (operator shell)                   │   │
//! │  │     list ──► nearest ──► update ──► order ──► config            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                depot-client (store + gateway)                   │   │
//! │  │      InventoryStore ──► WarehouseGateway ──► HTTP backend       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ depot-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │    geo    │  │ selection │  │  filter   │  │   │
//! │  │   │ Warehouse │  │ haversine │  │  nearest  │  │  search   │  │   │
//! │  │   │ Coordinate│  │  R=6371   │  │  ranking  │  │  stocked  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO ASYNC • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Warehouse, InventoryItem, Coordinate, etc.)
//! - [`geo`] - Haversine distance
//! - [`selection`] - Nearest-warehouse selection
//! - [`filter`] - Name search and in-stock filtering
//! - [`error`] - Domain error types
//! - [`validation`] - Operator input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use depot_core::{select_optimal, Coordinate, InventoryItem, Warehouse, WarehouseId};
//!
//! let beijing = Warehouse {
//!     id: WarehouseId(1),
//!     name: "Beijing Hub".to_string(),
//!     location: "Chaoyang".to_string(),
//!     coordinate: Coordinate::new(39.9042, 116.4074).unwrap(),
//!     delivery_time_hours: 24.0,
//!     inventories: vec![InventoryItem { id: 1, product_name: "Widget".into(), quantity: 5 }],
//! };
//! let shanghai = Warehouse {
//!     id: WarehouseId(2),
//!     name: "Shanghai Hub".to_string(),
//!     coordinate: Coordinate::new(31.2304, 121.4737).unwrap(),
//!     ..beijing.clone()
//! };
//!
//! let warehouses = [beijing, shanghai];
//! let query = Coordinate::new(39.90, 116.40).unwrap();
//!
//! let best = select_optimal(&warehouses, query).unwrap();
//! assert_eq!(best.warehouse.id, WarehouseId(1));
//! assert!(best.distance_km < 1.0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod filter;
pub mod geo;
pub mod selection;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use filter::{filter_stocked, search};
pub use geo::{distance_km, EARTH_RADIUS_KM};
pub use selection::{rank_by_distance, select_optimal, Selection};
pub use types::*;
pub use validation::ValidationResult;
