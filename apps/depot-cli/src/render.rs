//! Plain-text rendering of store results.

use std::fmt::Write;

use depot_client::OptimalWarehouse;
use depot_core::{Coordinate, Warehouse};

/// One block per warehouse, in the order given.
pub fn warehouse_list(warehouses: &[Warehouse]) -> String {
    if warehouses.is_empty() {
        return "No warehouses match.\n".to_string();
    }

    let mut out = String::new();
    for warehouse in warehouses {
        warehouse_block(&mut out, warehouse);
    }
    out
}

/// The optimal-pick panel.
pub fn optimal(query: Coordinate, best: &OptimalWarehouse) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Optimal warehouse for {}: {:.1} km away",
        query, best.distance_km
    );
    warehouse_block(&mut out, &best.warehouse);
    out
}

/// Every warehouse ranked by distance, nearest first.
pub fn ranking(query: Coordinate, ranked: &[OptimalWarehouse]) -> String {
    if ranked.is_empty() {
        return "No warehouses loaded.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "Warehouses by distance from {}:", query);
    for (rank, entry) in ranked.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {:<24} {:>9.1} km  [{}]",
            rank + 1,
            entry.warehouse.name,
            entry.distance_km,
            entry.warehouse.id
        );
    }
    out
}

fn warehouse_block(out: &mut String, warehouse: &Warehouse) {
    let _ = writeln!(out, "[{}] {}", warehouse.id, warehouse.name);
    if !warehouse.location.is_empty() {
        let _ = writeln!(out, "    Location: {}", warehouse.location);
    }
    let _ = writeln!(
        out,
        "    Coordinates: {}  Delivery: {} hours",
        warehouse.coordinate, warehouse.delivery_time_hours
    );

    if warehouse.inventories.is_empty() {
        let _ = writeln!(out, "    (no items)");
    }
    for item in &warehouse.inventories {
        let _ = writeln!(out, "    - {} - Quantity: {}", item.product_name, item.quantity);
    }
}
