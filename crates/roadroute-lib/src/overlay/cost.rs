use std::collections::BTreeMap;

use super::config::{FareTable, TravelMode};

/// Fare per travel mode for a trip of `distance_m` metres.
///
/// Amounts are whole FCFA, truncated toward zero.
pub fn estimate_costs(distance_m: f64, fares: &FareTable) -> BTreeMap<TravelMode, u64> {
    let distance_km = distance_m / 1000.0;
    TravelMode::ALL
        .into_iter()
        .map(|mode| {
            let fare = (distance_km * fares.rate(mode)).trunc();
            // Float-to-int casts saturate, and both factors are non-negative.
            (mode, fare as u64)
        })
        .collect()
}

/// Whether a trip of `adjusted_time_s` should be split over two days.
pub fn suggest_day_split(adjusted_time_s: f64, threshold_s: f64) -> bool {
    adjusted_time_s > threshold_s
}
