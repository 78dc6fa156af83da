//! # Inventory Projections
//!
//! Search and stock filters that shape the warehouse list for display.
//!
//! ## List Screen Pipeline
//! ```text
//! WarehouseSet ──► search(term) ──► filter_stocked(only_in_stock) ──► render
//!                  (drops warehouses)  (drops items, never warehouses)
//! ```

use crate::types::Warehouse;

/// Case-insensitive substring match on warehouse name.
///
/// An empty term returns every warehouse, in input order.
///
/// ## Example
/// ```rust
/// use depot_core::{search, Coordinate, Warehouse, WarehouseId};
///
/// let make = |id, name: &str| Warehouse {
///     id: WarehouseId(id),
///     name: name.to_string(),
///     location: String::new(),
///     coordinate: Coordinate::new(0.0, 0.0).unwrap(),
///     delivery_time_hours: 0.0,
///     inventories: vec![],
/// };
/// let all = vec![make(1, "Warehouse A"), make(2, "Store B")];
///
/// let hits = search(&all, "WARE");
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].name, "Warehouse A");
/// ```
pub fn search<'a, I>(warehouses: I, term: &str) -> Vec<&'a Warehouse>
where
    I: IntoIterator<Item = &'a Warehouse>,
{
    if term.is_empty() {
        return warehouses.into_iter().collect();
    }

    let needle = term.to_lowercase();
    warehouses
        .into_iter()
        .filter(|w| w.name.to_lowercase().contains(&needle))
        .collect()
}

/// Copies the given warehouses, optionally hiding out-of-stock items.
///
/// With `only_in_stock` every returned inventory item has `quantity > 0`;
/// without it the inventories pass through untouched. Warehouses are never
/// dropped, even when all their items are filtered away.
pub fn filter_stocked<'a, I>(warehouses: I, only_in_stock: bool) -> Vec<Warehouse>
where
    I: IntoIterator<Item = &'a Warehouse>,
{
    warehouses
        .into_iter()
        .map(|warehouse| {
            if !only_in_stock {
                return warehouse.clone();
            }

            Warehouse {
                inventories: warehouse.in_stock_items().cloned().collect(),
                ..warehouse.clone_header()
            }
        })
        .collect()
}

impl Warehouse {
    /// Clone without the inventory list.
    fn clone_header(&self) -> Warehouse {
        Warehouse {
            id: self.id,
            name: self.name.clone(),
            location: self.location.clone(),
            coordinate: self.coordinate,
            delivery_time_hours: self.delivery_time_hours,
            inventories: Vec::new(),
        }
    }
}
