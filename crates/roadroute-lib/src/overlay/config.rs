//! Overlay configuration.
//!
//! [`OverlayConfig`] can be built in code or loaded from JSON. Every field has
//! a default, so a partial document only overrides what it names:
//!
//! ```
//! use roadroute_lib::{OverlayConfig, Season};
//!
//! let config = OverlayConfig::from_json(r#"{ "season": "rainy", "border": null }"#).unwrap();
//! assert_eq!(config.season, Season::Rainy);
//! assert!(config.border.is_none());
//! assert_eq!(config.fares.taxi, 30.0);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{OverlayError, Result};
use crate::graph::Coordinate;
use crate::path::SearchLimits;
use crate::routing::SearchAlgorithm;

use super::constants::{
    BORDER_CROSSINGS, DAY_SPLIT_THRESHOLD_S, HOME_COUNTRY, SEASONAL_PENALTY_S,
    SEASONAL_THRESHOLD_LAT, SHARED_TRANSPORT_FCFA_PER_KM, TAXI_FCFA_PER_KM,
};

/// Season the trip takes place in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    #[default]
    Dry,
    Rainy,
}

/// How the rainy-season penalty interacts with the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SeasonalMode {
    /// Charge the penalty on edges entering the degraded region while
    /// searching, so equally fast routes outside it win.
    #[default]
    SearchWeighted,
    /// Leave the search alone and only annotate the chosen path.
    AnnotateOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonalConfig {
    pub mode: SeasonalMode,
    pub threshold_lat: f64,
    pub penalty_s: f64,
}

impl Default for SeasonalConfig {
    fn default() -> Self {
        Self {
            mode: SeasonalMode::SearchWeighted,
            threshold_lat: SEASONAL_THRESHOLD_LAT,
            penalty_s: SEASONAL_PENALTY_S,
        }
    }
}

/// Known road border post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorderCrossing {
    pub name: String,
    #[serde(flatten)]
    pub coordinate: Coordinate,
}

impl BorderCrossing {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            coordinate: Coordinate::new(lat, lon),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderConfig {
    /// Country the service covers; destinations elsewhere need documents.
    pub home_country: String,
    /// Reject origins outside `home_country`.
    pub restrict_origin: bool,
    pub crossings: Vec<BorderCrossing>,
}

impl Default for BorderConfig {
    fn default() -> Self {
        Self {
            home_country: HOME_COUNTRY.to_string(),
            restrict_origin: true,
            crossings: BORDER_CROSSINGS
                .iter()
                .map(|&(name, lat, lon)| BorderCrossing::new(name, lat, lon))
                .collect(),
        }
    }
}

impl BorderConfig {
    pub(crate) fn is_home(&self, country_code: &str) -> bool {
        country_code.eq_ignore_ascii_case(&self.home_country)
    }
}

/// Travel modes with a per-kilometre fare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    /// Low-cost shared transport (bus, shared taxi).
    SharedTransport,
    /// Private taxi.
    Taxi,
}

impl TravelMode {
    pub const ALL: [TravelMode; 2] = [TravelMode::SharedTransport, TravelMode::Taxi];
}

/// Fares in FCFA per kilometre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FareTable {
    pub shared_transport: f64,
    pub taxi: f64,
}

impl Default for FareTable {
    fn default() -> Self {
        Self {
            shared_transport: SHARED_TRANSPORT_FCFA_PER_KM,
            taxi: TAXI_FCFA_PER_KM,
        }
    }
}

impl FareTable {
    pub fn rate(&self, mode: TravelMode) -> f64 {
        match mode {
            TravelMode::SharedTransport => self.shared_transport,
            TravelMode::Taxi => self.taxi,
        }
    }
}

/// Business rules applied around a route computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub season: Season,
    pub seasonal: SeasonalConfig,
    /// Border handling; `None` disables it entirely.
    pub border: Option<BorderConfig>,
    pub fares: FareTable,
    pub day_split_threshold_s: f64,
    pub algorithm: SearchAlgorithm,
    pub limits: SearchLimits,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            season: Season::Dry,
            seasonal: SeasonalConfig::default(),
            border: Some(BorderConfig::default()),
            fares: FareTable::default(),
            day_split_threshold_s: DAY_SPLIT_THRESHOLD_S,
            algorithm: SearchAlgorithm::default(),
            limits: SearchLimits::default(),
        }
    }
}

impl OverlayConfig {
    /// Load a configuration from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_season(mut self, season: Season) -> Self {
        self.season = season;
        self
    }

    #[must_use]
    pub fn with_seasonal_mode(mut self, mode: SeasonalMode) -> Self {
        self.seasonal.mode = mode;
        self
    }

    #[must_use]
    pub fn with_border(mut self, border: Option<BorderConfig>) -> Self {
        self.border = border;
        self
    }

    #[must_use]
    pub fn with_algorithm(mut self, algorithm: SearchAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    #[must_use]
    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Validate ranges of every numeric setting.
    pub fn validate(&self) -> std::result::Result<(), OverlayError> {
        let threshold = self.seasonal.threshold_lat;
        if !threshold.is_finite() || !(-90.0..=90.0).contains(&threshold) {
            return Err(invalid(format!(
                "seasonal.threshold_lat must be a latitude, got {threshold}"
            )));
        }

        let non_negative = [
            ("seasonal.penalty_s", self.seasonal.penalty_s),
            ("day_split_threshold_s", self.day_split_threshold_s),
            ("fares.shared_transport", self.fares.shared_transport),
            ("fares.taxi", self.fares.taxi),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }

        if let Some(border) = &self.border {
            if border.home_country.trim().is_empty() {
                return Err(invalid("border.home_country must not be empty".to_string()));
            }
            for crossing in &border.crossings {
                let Coordinate { lat, lon } = crossing.coordinate;
                if !lat.is_finite()
                    || !lon.is_finite()
                    || !(-90.0..=90.0).contains(&lat)
                    || !(-180.0..=180.0).contains(&lon)
                {
                    return Err(invalid(format!(
                        "border crossing {} has invalid coordinate ({lat}, {lon})",
                        crossing.name
                    )));
                }
            }
        }

        Ok(())
    }
}

fn invalid(message: String) -> OverlayError {
    OverlayError::InvalidConfig { message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_is_benin_preset() {
        let config = OverlayConfig::default();
        assert_eq!(config.season, Season::Dry);
        assert_eq!(config.seasonal.threshold_lat, 9.8);
        assert_eq!(config.seasonal.penalty_s, 1800.0);
        assert_eq!(config.day_split_threshold_s, 36_000.0);
        let border = config.border.as_ref().expect("border enabled");
        assert_eq!(border.home_country, "BJ");
        assert!(border.restrict_origin);
        assert_eq!(border.crossings.len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = OverlayConfig::from_json(
            r#"{
                "seasonal": { "mode": "annotate_only" },
                "fares": { "taxi": 35.0 },
                "border": { "crossings": [ { "name": "Test", "lat": 6.2, "lon": 1.6 } ] },
                "algorithm": "dijkstra",
                "limits": { "max_settled": 500 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.seasonal.mode, SeasonalMode::AnnotateOnly);
        assert_eq!(config.seasonal.penalty_s, 1800.0);
        assert_eq!(config.fares.taxi, 35.0);
        assert_eq!(config.fares.shared_transport, 18.0);
        let border = config.border.unwrap();
        assert_eq!(border.home_country, "BJ");
        assert_eq!(border.crossings, vec![BorderCrossing::new("Test", 6.2, 1.6)]);
        assert_eq!(config.algorithm, SearchAlgorithm::Dijkstra);
        assert_eq!(config.limits.max_settled, Some(500));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = OverlayConfig::default();
        config.fares.taxi = -1.0;
        assert!(matches!(
            config.validate(),
            Err(OverlayError::InvalidConfig { .. })
        ));

        let mut config = OverlayConfig::default();
        config.seasonal.threshold_lat = f64::NAN;
        assert!(config.validate().is_err());

        let config = OverlayConfig::default().with_border(Some(BorderConfig {
            home_country: "  ".to_string(),
            ..BorderConfig::default()
        }));
        assert!(config.validate().is_err());

        let err = OverlayConfig::from_json(r#"{ "day_split_threshold_s": -5 }"#).unwrap_err();
        assert!(err.to_string().contains("day_split_threshold_s"));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{ "season": "rainy" }}"#).expect("write config");
        let config = OverlayConfig::from_path(file.path()).unwrap();
        assert_eq!(config.season, Season::Rainy);
    }
}
