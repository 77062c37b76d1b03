//! Geolocation option groups.

use tracing::{info, warn};

use super::{ConfigurationStore, DataConfiguration};
use crate::error::{Error, Result};
use crate::forms::{FormError, INTERNATIONAL_NOTIFICATION_DOMAIN};
use crate::geolocation::{
    is_valid_country_code, GeolocationBehaviour, GeolocationByIpAddress, GeolocationOptions,
    NaBehaviour,
};

/// Behaviour for visitors from countries that are not allowed.
pub const GEOLOCATION_BEHAVIOUR: &str = "PS_GEOLOCATION_BEHAVIOR";
/// Behaviour for visitors whose country is unknown.
pub const GEOLOCATION_NA_BEHAVIOUR: &str = "PS_GEOLOCATION_NA_BEHAVIOR";
/// Allowed countries, `;`-separated.
pub const ALLOWED_COUNTRIES: &str = "PS_ALLOWED_COUNTRIES";
/// Whether geolocation by IP address is on (`0`/`1`).
pub const GEOLOCATION_ENABLED: &str = "PS_GEOLOCATION_ENABLED";

const COUNTRY_SEPARATOR: char = ';';

/// Geolocation options stored under `PS_GEOLOCATION_*` and `PS_ALLOWED_COUNTRIES`.
#[derive(Debug)]
pub struct GeolocationOptionsConfiguration<S> {
    store: S,
}

impl<S: ConfigurationStore> GeolocationOptionsConfiguration<S> {
    /// Create the option group over `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: ConfigurationStore> DataConfiguration for GeolocationOptionsConfiguration<S> {
    type Data = GeolocationOptions;

    fn get_configuration(&self) -> Result<GeolocationOptions> {
        let raw = self.store.get_int(
            GEOLOCATION_BEHAVIOUR,
            GeolocationBehaviour::default().to_config_value(),
        )?;
        let geolocation_behaviour = GeolocationBehaviour::from_config_value(raw).ok_or_else(|| {
            Error::invalid_configuration_value(GEOLOCATION_BEHAVIOUR, raw.to_string())
        })?;

        let raw = self.store.get_int(
            GEOLOCATION_NA_BEHAVIOUR,
            NaBehaviour::default().to_config_value(),
        )?;
        let geolocation_na_behaviour = NaBehaviour::from_config_value(raw).ok_or_else(|| {
            Error::invalid_configuration_value(GEOLOCATION_NA_BEHAVIOUR, raw.to_string())
        })?;

        let geolocation_countries = self
            .store
            .get(ALLOWED_COUNTRIES)?
            .unwrap_or_default()
            .split(COUNTRY_SEPARATOR)
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_string)
            .collect();

        Ok(GeolocationOptions {
            geolocation_behaviour,
            geolocation_na_behaviour,
            geolocation_countries,
        })
    }

    fn update_configuration(&self, data: GeolocationOptions) -> Result<Vec<FormError>> {
        if !self.validate_configuration(&data) {
            warn!(
                countries = ?data.geolocation_countries,
                "rejected geolocation options with malformed country codes"
            );
            return Ok(vec![FormError::new(
                "Country selection is invalid.",
                INTERNATIONAL_NOTIFICATION_DOMAIN,
            )]);
        }

        let countries = data
            .geolocation_countries
            .join(&COUNTRY_SEPARATOR.to_string());
        let behaviour = data.geolocation_behaviour.to_config_value().to_string();
        let na_behaviour = data.geolocation_na_behaviour.to_config_value().to_string();
        self.store.set_many(&[
            (GEOLOCATION_BEHAVIOUR, &behaviour),
            (GEOLOCATION_NA_BEHAVIOUR, &na_behaviour),
            (ALLOWED_COUNTRIES, &countries),
        ])?;

        info!(
            behaviour = ?data.geolocation_behaviour,
            na_behaviour = ?data.geolocation_na_behaviour,
            countries = %countries,
            "geolocation options updated"
        );
        Ok(Vec::new())
    }

    fn validate_configuration(&self, data: &GeolocationOptions) -> bool {
        data.geolocation_countries
            .iter()
            .all(|code| is_valid_country_code(code))
    }
}

/// Geolocation-by-IP switch stored under `PS_GEOLOCATION_ENABLED`.
#[derive(Debug)]
pub struct GeolocationByIpAddressConfiguration<S> {
    store: S,
}

impl<S: ConfigurationStore> GeolocationByIpAddressConfiguration<S> {
    /// Create the option group over `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: ConfigurationStore> DataConfiguration for GeolocationByIpAddressConfiguration<S> {
    type Data = GeolocationByIpAddress;

    fn get_configuration(&self) -> Result<GeolocationByIpAddress> {
        Ok(GeolocationByIpAddress {
            geolocation_enabled: self.store.get_int(GEOLOCATION_ENABLED, 0)? != 0,
        })
    }

    fn update_configuration(&self, data: GeolocationByIpAddress) -> Result<Vec<FormError>> {
        let value = if data.geolocation_enabled { "1" } else { "0" };
        self.store.set(GEOLOCATION_ENABLED, value)?;
        info!(enabled = data.geolocation_enabled, "geolocation by IP address updated");
        Ok(Vec::new())
    }

    fn validate_configuration(&self, _data: &GeolocationByIpAddress) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;

    /// Reads from a real store but refuses every write.
    struct ReadOnlyStore<'a>(&'a Storage);

    impl ConfigurationStore for ReadOnlyStore<'_> {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.0.get(key)
        }

        fn set(&self, key: &str, _value: &str) -> Result<()> {
            Err(Error::invalid_configuration_value(key, "read-only"))
        }

        fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
            match entries.first() {
                Some((key, value)) => self.set(key, value),
                None => Ok(()),
            }
        }

        fn remove(&self, key: &str) -> Result<bool> {
            Err(Error::invalid_configuration_value(key, "read-only"))
        }
    }

    fn options(countries: &[&str]) -> GeolocationOptions {
        GeolocationOptions {
            geolocation_behaviour: GeolocationBehaviour::NoOrder,
            geolocation_na_behaviour: NaBehaviour::NoCatalog,
            geolocation_countries: countries.iter().map(|c| (*c).to_string()).collect(),
        }
    }

    #[test]
    fn test_defaults_when_nothing_is_stored() {
        let storage = Storage::open_in_memory().unwrap();
        let configuration = GeolocationOptionsConfiguration::new(&storage);

        assert_eq!(
            configuration.get_configuration().unwrap(),
            GeolocationOptions::default()
        );
    }

    #[test]
    fn test_update_writes_store_keys() {
        let storage = Storage::open_in_memory().unwrap();
        let configuration = GeolocationOptionsConfiguration::new(&storage);

        let errors = configuration
            .update_configuration(options(&["FR", "DE"]))
            .unwrap();
        assert!(errors.is_empty());

        assert_eq!(storage.get(GEOLOCATION_BEHAVIOUR).unwrap().as_deref(), Some("1"));
        assert_eq!(storage.get(GEOLOCATION_NA_BEHAVIOUR).unwrap().as_deref(), Some("0"));
        assert_eq!(storage.get(ALLOWED_COUNTRIES).unwrap().as_deref(), Some("FR;DE"));
        assert_eq!(
            configuration.get_configuration().unwrap(),
            options(&["FR", "DE"])
        );
    }

    #[test]
    fn test_update_rejects_malformed_country_codes() {
        let storage = Storage::open_in_memory().unwrap();
        let configuration = GeolocationOptionsConfiguration::new(&storage);

        assert!(!configuration.validate_configuration(&options(&["FR", "france"])));
        let errors = configuration
            .update_configuration(options(&["FR", "france"]))
            .unwrap();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].key, "Country selection is invalid.");
        assert!(!storage.has(ALLOWED_COUNTRIES).unwrap());
    }

    #[test]
    fn test_failed_write_keeps_previous_options() {
        let storage = Storage::open_in_memory().unwrap();
        GeolocationOptionsConfiguration::new(&storage)
            .update_configuration(options(&["FR"]))
            .unwrap();

        let configuration = GeolocationOptionsConfiguration::new(ReadOnlyStore(&storage));
        let changed = GeolocationOptions {
            geolocation_behaviour: GeolocationBehaviour::NoCatalog,
            geolocation_na_behaviour: NaBehaviour::Allowed,
            geolocation_countries: vec!["DE".to_string()],
        };
        assert!(configuration.update_configuration(changed).is_err());

        assert_eq!(configuration.get_configuration().unwrap(), options(&["FR"]));
    }

    #[test]
    fn test_stored_countries_are_trimmed() {
        let storage = Storage::open_in_memory().unwrap();
        storage.set(ALLOWED_COUNTRIES, " FR ;;IT;").unwrap();

        let data = GeolocationOptionsConfiguration::new(&storage)
            .get_configuration()
            .unwrap();
        assert_eq!(data.geolocation_countries, vec!["FR", "IT"]);
    }

    #[test]
    fn test_unknown_stored_behaviour_is_an_error() {
        let storage = Storage::open_in_memory().unwrap();
        storage.set(GEOLOCATION_BEHAVIOUR, "7").unwrap();

        let err = GeolocationOptionsConfiguration::new(&storage)
            .get_configuration()
            .unwrap_err();
        assert!(err.to_string().contains(GEOLOCATION_BEHAVIOUR));
    }

    #[test]
    fn test_by_ip_address_roundtrip() {
        let storage = Storage::open_in_memory().unwrap();
        let configuration = GeolocationByIpAddressConfiguration::new(&storage);

        assert!(!configuration.get_configuration().unwrap().geolocation_enabled);

        let errors = configuration
            .update_configuration(GeolocationByIpAddress {
                geolocation_enabled: true,
            })
            .unwrap();
        assert!(errors.is_empty());
        assert_eq!(storage.get(GEOLOCATION_ENABLED).unwrap().as_deref(), Some("1"));
        assert!(configuration.get_configuration().unwrap().geolocation_enabled);
    }
}
