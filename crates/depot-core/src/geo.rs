//! # Great-Circle Distance
//!
//! Haversine distance between two [`Coordinate`]s on a spherical Earth.
//!
//! ```text
//!   a = sin²(Δlat/2) + cos(lat1)·cos(lat2)·sin²(Δlon/2)
//!   c = 2·atan2(√a, √(1−a))
//!   d = R·c            R = 6371 km
//! ```

use crate::types::Coordinate;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres.
///
/// Symmetric, zero for identical points, and monotone in angular separation.
///
/// ## Example
/// ```rust
/// use depot_core::{geo::distance_km, Coordinate};
///
/// let beijing = Coordinate::new(39.9042, 116.4074).unwrap();
/// let shanghai = Coordinate::new(31.2304, 121.4737).unwrap();
///
/// let d = distance_km(beijing, shanghai);
/// assert!((1060.0..1075.0).contains(&d));
/// assert_eq!(distance_km(beijing, beijing), 0.0);
/// ```
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude().to_radians();
    let lat2 = b.latitude().to_radians();
    let d_lat = (b.latitude() - a.latitude()).to_radians();
    let d_lon = (b.longitude() - a.longitude()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push h just past 1 for near-antipodal points.
    let h = h.clamp(0.0, 1.0);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}
