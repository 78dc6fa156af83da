//! # Domain Types
//!
//! Core domain types used throughout Depot.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  WarehouseSet   │──►│    Warehouse    │──►│  InventoryItem  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  unique ids     │   │  id, name       │   │  id             │       │
//! │  │  server order   │   │  location       │   │  product_name   │       │
//! │  └─────────────────┘   │  coordinate     │   │  quantity (u32) │       │
//! │                        │  delivery hours │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   Coordinate    │   │ InventoryUpdate │   │  OrderRequest   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  lat [-90,90]   │   │  validated cmd  │   │  address        │       │
//! │  │  lon [-180,180] │   │  qty ≥ 0        │   │  product id     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::validation::{
    parse_quantity, validate_address, validate_product_id, validate_product_name,
    ValidationResult,
};

// =============================================================================
// Identifiers
// =============================================================================

/// Backend-assigned warehouse identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct WarehouseId(pub i64);

impl std::fmt::Display for WarehouseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for WarehouseId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(WarehouseId)
            .map_err(|_| ValidationError::InvalidFormat {
                field: "warehouse id".to_string(),
                reason: format!("'{}' is not a number", s),
            })
    }
}

// =============================================================================
// Coordinate
// =============================================================================

/// A point on the globe in decimal degrees.
///
/// Construction goes through [`Coordinate::new`], so every value in circulation
/// is inside the valid latitude/longitude ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

/// Unchecked wire shape of a [`Coordinate`].
#[derive(Deserialize)]
struct CoordinateParts {
    latitude: f64,
    longitude: f64,
}

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let parts = CoordinateParts::deserialize(deserializer)?;
        Coordinate::new(parts.latitude, parts.longitude).map_err(serde::de::Error::custom)
    }
}

impl Coordinate {
    /// Creates a coordinate, rejecting out-of-range or NaN components.
    ///
    /// ## Example
    /// ```rust
    /// use depot_core::Coordinate;
    ///
    /// assert!(Coordinate::new(39.9042, 116.4074).is_ok());
    /// assert!(Coordinate::new(91.0, 0.0).is_err());
    /// assert!(Coordinate::new(0.0, -180.5).is_err());
    /// ```
    pub fn new(latitude: f64, longitude: f64) -> ValidationResult<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ValidationError::OutOfRange {
                field: "latitude".to_string(),
                min: -90.0,
                max: 90.0,
            });
        }

        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ValidationError::OutOfRange {
                field: "longitude".to_string(),
                min: -180.0,
                max: 180.0,
            });
        }

        Ok(Coordinate {
            latitude,
            longitude,
        })
    }

    /// Latitude in decimal degrees.
    #[inline]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    #[inline]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

// =============================================================================
// Inventory Item
// =============================================================================

/// A product and its on-hand quantity at one warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventoryItem {
    /// Backend-assigned item id.
    pub id: i64,

    /// Product name shown to the operator.
    pub product_name: String,

    /// On-hand quantity.
    pub quantity: u32,
}

impl InventoryItem {
    /// True when at least one unit is on hand.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

// =============================================================================
// Warehouse
// =============================================================================

/// A physical stocking location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Warehouse {
    pub id: WarehouseId,

    /// Display name; this is what search matches against.
    pub name: String,

    /// Free-form location text (display only).
    pub location: String,

    pub coordinate: Coordinate,

    /// Promised delivery time in hours.
    pub delivery_time_hours: f64,

    /// Stocked items in server order.
    pub inventories: Vec<InventoryItem>,
}

impl Warehouse {
    /// Finds an item by exact product name.
    pub fn item(&self, product_name: &str) -> Option<&InventoryItem> {
        self.inventories
            .iter()
            .find(|i| i.product_name == product_name)
    }

    /// Total units across all items.
    pub fn total_units(&self) -> u64 {
        self.inventories.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Iterates over items with a positive quantity.
    pub fn in_stock_items(&self) -> impl Iterator<Item = &InventoryItem> {
        self.inventories.iter().filter(|i| i.in_stock())
    }
}

// =============================================================================
// Warehouse Set
// =============================================================================

/// The full collection of warehouses, in server order, with unique ids.
///
/// ## Invariants
/// - No two entries share a [`WarehouseId`]
/// - Order is the order the backend returned (not semantically sorted)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Warehouse>", into = "Vec<Warehouse>")]
pub struct WarehouseSet {
    warehouses: Vec<Warehouse>,
}

impl WarehouseSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set, rejecting duplicate ids.
    pub fn try_from_vec(warehouses: Vec<Warehouse>) -> ValidationResult<Self> {
        let mut seen = HashSet::with_capacity(warehouses.len());
        for warehouse in &warehouses {
            if !seen.insert(warehouse.id) {
                return Err(ValidationError::Duplicate {
                    field: "warehouse id".to_string(),
                    value: warehouse.id.to_string(),
                });
            }
        }

        Ok(WarehouseSet { warehouses })
    }

    /// Looks up a warehouse by id.
    pub fn get(&self, id: WarehouseId) -> Option<&Warehouse> {
        self.warehouses.iter().find(|w| w.id == id)
    }

    /// Returns true if a warehouse with this id is in the set.
    pub fn contains(&self, id: WarehouseId) -> bool {
        self.get(id).is_some()
    }

    pub fn as_slice(&self) -> &[Warehouse] {
        &self.warehouses
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Warehouse> {
        self.warehouses.iter()
    }

    pub fn len(&self) -> usize {
        self.warehouses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warehouses.is_empty()
    }

    pub fn into_vec(self) -> Vec<Warehouse> {
        self.warehouses
    }
}

impl TryFrom<Vec<Warehouse>> for WarehouseSet {
    type Error = ValidationError;

    fn try_from(warehouses: Vec<Warehouse>) -> Result<Self, Self::Error> {
        WarehouseSet::try_from_vec(warehouses)
    }
}

impl From<WarehouseSet> for Vec<Warehouse> {
    fn from(set: WarehouseSet) -> Self {
        set.warehouses
    }
}

impl<'a> IntoIterator for &'a WarehouseSet {
    type Item = &'a Warehouse;
    type IntoIter = std::slice::Iter<'a, Warehouse>;

    fn into_iter(self) -> Self::IntoIter {
        self.warehouses.iter()
    }
}

// =============================================================================
// Inventory Update Command
// =============================================================================

/// A validated request to set a product's stock level at a warehouse.
///
/// Built from raw operator input; holding one means the product name is
/// non-empty and the quantity parsed as a non-negative integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct InventoryUpdate {
    warehouse_id: WarehouseId,
    product_name: String,
    quantity: u32,
}

impl InventoryUpdate {
    /// Parses operator input into an update command.
    ///
    /// ## Example
    /// ```rust
    /// use depot_core::{InventoryUpdate, WarehouseId};
    ///
    /// let update = InventoryUpdate::parse(WarehouseId(1), " Widget ", "12").unwrap();
    /// assert_eq!(update.product_name(), "Widget");
    /// assert_eq!(update.quantity(), 12);
    ///
    /// assert!(InventoryUpdate::parse(WarehouseId(1), "Widget", "-1").is_err());
    /// assert!(InventoryUpdate::parse(WarehouseId(1), "", "3").is_err());
    /// ```
    pub fn parse(
        warehouse_id: WarehouseId,
        product_name: &str,
        quantity: &str,
    ) -> ValidationResult<Self> {
        validate_product_name(product_name)?;
        let quantity = parse_quantity(quantity)?;

        Ok(InventoryUpdate {
            warehouse_id,
            product_name: product_name.trim().to_string(),
            quantity,
        })
    }

    pub fn warehouse_id(&self) -> WarehouseId {
        self.warehouse_id
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

// =============================================================================
// Orders
// =============================================================================

/// An order for the backend to route to a warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderRequest {
    address: String,
    product_id: String,
}

impl OrderRequest {
    /// Validates and trims the order form fields.
    pub fn new(address: &str, product_id: &str) -> ValidationResult<Self> {
        validate_address(address)?;
        validate_product_id(product_id)?;

        Ok(OrderRequest {
            address: address.trim().to_string(),
            product_id: product_id.trim().to_string(),
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }
}

/// Backend confirmation naming the warehouse an order was routed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderConfirmation {
    pub warehouse_name: String,
}
