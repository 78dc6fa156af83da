//! # Wire Protocol
//!
//! JSON shapes exchanged with the warehouse backend and their conversion into
//! domain types.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET  /api/warehouses                                                   │
//! │       ◄── [WarehouseDto]                                                │
//! │                                                                         │
//! │  POST /api/warehouses/{id}/inventory?productName=..&quantity=..         │
//! │       ◄── any body (ignored)                                            │
//! │                                                                         │
//! │  POST /api/orders        {"address", "productId"}                       │
//! │       ◄── {"warehouseName"}                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! DTOs mirror the backend exactly (snake_case fields, signed quantities).
//! Conversion is where invariants are enforced: a negative quantity, an
//! out-of-range coordinate or a repeated warehouse id fails the whole payload.

use depot_core::{Coordinate, InventoryItem, InventoryUpdate, Warehouse, WarehouseId, WarehouseSet};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Path of the warehouse list endpoint.
pub const WAREHOUSES_PATH: &str = "api/warehouses";

/// Path of the order endpoint.
pub const ORDERS_PATH: &str = "api/orders";

/// Path of the inventory endpoint for one warehouse.
pub fn inventory_path(id: WarehouseId) -> String {
    format!("api/warehouses/{}/inventory", id)
}

// =============================================================================
// Warehouse Payloads
// =============================================================================

/// A stocked item as the backend sends it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItemDto {
    pub id: i64,
    pub product_name: String,
    pub quantity: i64,
}

/// A warehouse as the backend sends it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseDto {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Hours.
    pub delivery_time: f64,
    #[serde(default)]
    pub inventories: Vec<InventoryItemDto>,
}

impl TryFrom<InventoryItemDto> for InventoryItem {
    type Error = ClientError;

    fn try_from(dto: InventoryItemDto) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(dto.quantity).map_err(|_| {
            ClientError::InvalidPayload(format!(
                "item {} ({}) has invalid quantity {}",
                dto.id, dto.product_name, dto.quantity
            ))
        })?;

        Ok(InventoryItem {
            id: dto.id,
            product_name: dto.product_name,
            quantity,
        })
    }
}

impl TryFrom<WarehouseDto> for Warehouse {
    type Error = ClientError;

    fn try_from(dto: WarehouseDto) -> Result<Self, Self::Error> {
        let coordinate = Coordinate::new(dto.latitude, dto.longitude).map_err(|e| {
            ClientError::InvalidPayload(format!("warehouse {}: {}", dto.id, e))
        })?;

        if !dto.delivery_time.is_finite() || dto.delivery_time < 0.0 {
            return Err(ClientError::InvalidPayload(format!(
                "warehouse {} has invalid delivery time {}",
                dto.id, dto.delivery_time
            )));
        }

        let inventories = dto
            .inventories
            .into_iter()
            .map(InventoryItem::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Warehouse {
            id: WarehouseId(dto.id),
            name: dto.name,
            location: dto.location,
            coordinate,
            delivery_time_hours: dto.delivery_time,
            inventories,
        })
    }
}

impl From<&Warehouse> for WarehouseDto {
    fn from(warehouse: &Warehouse) -> Self {
        WarehouseDto {
            id: warehouse.id.0,
            name: warehouse.name.clone(),
            location: warehouse.location.clone(),
            latitude: warehouse.coordinate.latitude(),
            longitude: warehouse.coordinate.longitude(),
            delivery_time: warehouse.delivery_time_hours,
            inventories: warehouse
                .inventories
                .iter()
                .map(|item| InventoryItemDto {
                    id: item.id,
                    product_name: item.product_name.clone(),
                    quantity: i64::from(item.quantity),
                })
                .collect(),
        }
    }
}

/// Converts a full list payload, rejecting duplicate ids.
pub fn decode_warehouses(dtos: Vec<WarehouseDto>) -> Result<WarehouseSet, ClientError> {
    let warehouses = dtos
        .into_iter()
        .map(Warehouse::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    WarehouseSet::try_from_vec(warehouses).map_err(|e| ClientError::InvalidPayload(e.to_string()))
}

// =============================================================================
// Inventory Update
// =============================================================================

/// Query string of the inventory endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryQuery {
    pub product_name: String,
    pub quantity: u32,
}

impl From<&InventoryUpdate> for InventoryQuery {
    fn from(update: &InventoryUpdate) -> Self {
        InventoryQuery {
            product_name: update.product_name().to_string(),
            quantity: update.quantity(),
        }
    }
}
