//! Overlay defaults for the Benin road network.

/// Latitude (degrees north) above which rainy-season roads are degraded.
pub const SEASONAL_THRESHOLD_LAT: f64 = 9.8;

/// Extra travel time charged once for a degraded route (30 minutes).
pub const SEASONAL_PENALTY_S: f64 = 1800.0;

/// Adjusted trip time above which splitting over two days is suggested.
pub const DAY_SPLIT_THRESHOLD_S: f64 = 36_000.0;

/// Shared transport (bus, bush taxi) fare in FCFA per kilometre.
pub const SHARED_TRANSPORT_FCFA_PER_KM: f64 = 18.0;

/// Private taxi fare in FCFA per kilometre.
pub const TAXI_FCFA_PER_KM: f64 = 30.0;

/// ISO 3166-1 alpha-2 code of the covered country.
pub const HOME_COUNTRY: &str = "BJ";

/// Main road border posts as (name, latitude, longitude). Positions are
/// approximate and are snapped to the nearest graph node at query time.
pub const BORDER_CROSSINGS: &[(&str, f64, f64)] = &[
    ("Hillacondji", 6.2200, 1.6620),
    ("Seme-Krake", 6.3710, 2.7060),
    ("Malanville", 11.8660, 3.3880),
    ("Porga", 11.0480, 0.9680),
];
