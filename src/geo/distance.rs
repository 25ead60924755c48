//! Great-circle distance between coordinates

use haversine::Units;

use crate::models::Coordinates;

/// Haversine distance in kilometers.
///
/// Points are passed to the haversine formula in a canonical order so the
/// result is bit-for-bit symmetric.
#[must_use]
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let (first, second) = if (a.latitude, a.longitude) <= (b.latitude, b.longitude) {
        (a, b)
    } else {
        (b, a)
    };
    haversine::distance(first.into(), second.into(), Units::Kilometers)
}

/// Human readable distance: meters below 1 km, otherwise one decimal km
#[must_use]
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{:.0} m", km * 1000.0)
    } else {
        format!("{km:.1} km")
    }
}
