//! Geolocation options.
//!
//! Geolocation restricts what visitors can do depending on the country
//! their IP address resolves to. This module holds the option types and the
//! check for the GeoLite city database that IP resolution relies on.

mod checker;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub use checker::{FileGeoLiteCityChecker, GeoLiteCityChecker};

static COUNTRY_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{2}$").expect("valid regex"));

/// Check that `code` is an ISO 3166-1 alpha-2 country code (`FR`).
#[must_use]
pub fn is_valid_country_code(code: &str) -> bool {
    COUNTRY_CODE.is_match(code)
}

/// What visitors from countries outside the allowed list may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeolocationBehaviour {
    /// Visitors cannot see the catalog.
    #[default]
    NoCatalog,
    /// Visitors can browse the catalog but cannot place orders.
    NoOrder,
}

/// What visitors whose country cannot be determined may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NaBehaviour {
    /// Visitors can browse and order.
    #[default]
    Allowed,
    /// Visitors cannot see the catalog.
    NoCatalog,
    /// Visitors can browse the catalog but cannot place orders.
    NoOrder,
}

impl GeolocationBehaviour {
    /// Integer stored in the configuration.
    #[must_use]
    pub fn to_config_value(self) -> i64 {
        match self {
            Self::NoCatalog => 0,
            Self::NoOrder => 1,
        }
    }

    /// Parse the integer stored in the configuration.
    #[must_use]
    pub fn from_config_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::NoCatalog),
            1 => Some(Self::NoOrder),
            _ => None,
        }
    }
}

impl NaBehaviour {
    /// Integer stored in the configuration.
    #[must_use]
    pub fn to_config_value(self) -> i64 {
        match self {
            Self::Allowed => -1,
            Self::NoCatalog => 0,
            Self::NoOrder => 1,
        }
    }

    /// Parse the integer stored in the configuration.
    #[must_use]
    pub fn from_config_value(value: i64) -> Option<Self> {
        match value {
            -1 => Some(Self::Allowed),
            0 => Some(Self::NoCatalog),
            1 => Some(Self::NoOrder),
            _ => None,
        }
    }
}

/// Geolocation options form data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeolocationOptions {
    /// Behaviour for visitors from countries that are not allowed.
    pub geolocation_behaviour: GeolocationBehaviour,
    /// Behaviour for visitors whose country is unknown.
    pub geolocation_na_behaviour: NaBehaviour,
    /// ISO 3166-1 alpha-2 codes of the allowed countries.
    pub geolocation_countries: Vec<String>,
}

/// Geolocation-by-IP form data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeolocationByIpAddress {
    /// Whether visitors are located by IP address.
    pub geolocation_enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_code_validation() {
        assert!(is_valid_country_code("FR"));
        assert!(!is_valid_country_code("fr"));
        assert!(!is_valid_country_code("FRA"));
        assert!(!is_valid_country_code(""));
    }

    #[test]
    fn test_behaviour_config_values() {
        for behaviour in [GeolocationBehaviour::NoCatalog, GeolocationBehaviour::NoOrder] {
            assert_eq!(
                GeolocationBehaviour::from_config_value(behaviour.to_config_value()),
                Some(behaviour)
            );
        }
        assert_eq!(GeolocationBehaviour::from_config_value(-1), None);
    }

    #[test]
    fn test_na_behaviour_config_values() {
        assert_eq!(NaBehaviour::Allowed.to_config_value(), -1);
        assert_eq!(NaBehaviour::from_config_value(1), Some(NaBehaviour::NoOrder));
        assert_eq!(NaBehaviour::from_config_value(2), None);
    }

    #[test]
    fn test_options_deserialize_missing_countries_as_empty() {
        let options: GeolocationOptions =
            serde_json::from_str(r#"{"geolocation_behaviour": "no_order"}"#).unwrap();
        assert_eq!(options.geolocation_behaviour, GeolocationBehaviour::NoOrder);
        assert_eq!(options.geolocation_na_behaviour, NaBehaviour::Allowed);
        assert!(options.geolocation_countries.is_empty());
    }

    #[test]
    fn test_by_ip_default_is_disabled() {
        assert!(!GeolocationByIpAddress::default().geolocation_enabled);
    }
}
