//! Shop configuration.
//!
//! Shop options are kept as string key/value pairs in a
//! [`ConfigurationStore`]. A [`DataConfiguration`] maps one typed group of
//! options onto its keys, validating before anything is written.

mod geolocation;

pub use geolocation::{
    GeolocationByIpAddressConfiguration, GeolocationOptionsConfiguration, ALLOWED_COUNTRIES,
    GEOLOCATION_BEHAVIOUR, GEOLOCATION_ENABLED, GEOLOCATION_NA_BEHAVIOUR,
};

use crate::error::{Error, Result};
use crate::forms::FormError;

/// Key/value storage for shop options.
pub trait ConfigurationStore {
    /// Value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Store every `(key, value)` pair, or none of them.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written. No entry is
    /// changed in that case.
    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()>;

    /// Remove `key`. Returns `false` if it was not set.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn remove(&self, key: &str) -> Result<bool>;

    /// Whether `key` holds a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn has(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Integer stored under `key`, or `default` when unset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfigurationValue`] if the stored value is not
    /// an integer.
    fn get_int(&self, key: &str, default: i64) -> Result<i64> {
        match self.get(key)? {
            None => Ok(default),
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| Error::invalid_configuration_value(key, value)),
        }
    }
}

impl<S: ConfigurationStore + ?Sized> ConfigurationStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        (**self).set_many(entries)
    }

    fn remove(&self, key: &str) -> Result<bool> {
        (**self).remove(key)
    }
}

/// Maps a typed group of options onto a [`ConfigurationStore`].
pub trait DataConfiguration {
    /// The options handled by this configuration.
    type Data;

    /// Read the current options.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or holds invalid values.
    fn get_configuration(&self) -> Result<Self::Data>;

    /// Validate and write the options.
    ///
    /// Returns validation errors; nothing is written unless the list is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn update_configuration(&self, data: Self::Data) -> Result<Vec<FormError>>;

    /// Whether `data` can be written as is.
    fn validate_configuration(&self, data: &Self::Data) -> bool;
}
