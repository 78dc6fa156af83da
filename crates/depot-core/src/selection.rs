//! # Warehouse Selection
//!
//! Picks the warehouse closest to a resolved delivery coordinate.
//!
//! ## Selection Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  best = none, min = +∞                                                  │
//! │                                                                         │
//! │  for w in warehouses (input order):                                     │
//! │      d = distance_km(query, w.coordinate)                               │
//! │      if d < min:  best = w, min = d      (strict: ties keep earlier)    │
//! │                                                                         │
//! │  empty input ──► None                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Selection is recomputed on every call; the inputs are warehouse counts,
//! not item counts, so there is no cached selection state.

use serde::Serialize;

use crate::geo::distance_km;
use crate::types::{Coordinate, Warehouse};

/// The warehouse nearest to a query point, with its distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Selection<'a> {
    pub warehouse: &'a Warehouse,
    pub distance_km: f64,
}

/// Returns the warehouse minimising great-circle distance to `query`.
///
/// Ties resolve to the warehouse that appears first in `warehouses`.
///
/// ## Example
/// ```rust
/// use depot_core::{select_optimal, Coordinate};
///
/// assert!(select_optimal(&[], Coordinate::new(0.0, 0.0).unwrap()).is_none());
/// ```
pub fn select_optimal(warehouses: &[Warehouse], query: Coordinate) -> Option<Selection<'_>> {
    let mut best: Option<Selection<'_>> = None;
    let mut min_distance = f64::INFINITY;

    for warehouse in warehouses {
        let distance = distance_km(query, warehouse.coordinate);
        if distance < min_distance {
            min_distance = distance;
            best = Some(Selection {
                warehouse,
                distance_km: distance,
            });
        }
    }

    best
}

/// Every warehouse with its distance to `query`, nearest first.
///
/// The sort is stable, so equidistant warehouses keep their input order and
/// the head of the list always agrees with [`select_optimal`].
pub fn rank_by_distance(warehouses: &[Warehouse], query: Coordinate) -> Vec<Selection<'_>> {
    let mut ranked: Vec<Selection<'_>> = warehouses
        .iter()
        .map(|warehouse| Selection {
            warehouse,
            distance_km: distance_km(query, warehouse.coordinate),
        })
        .collect();

    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked
}
