//! Form data providers for the geolocation settings page.

use tracing::{debug, warn};

use super::{FormDataProvider, FormError, INTERNATIONAL_NOTIFICATION_DOMAIN};
use crate::configuration::DataConfiguration;
use crate::error::Result;
use crate::geolocation::{GeoLiteCityChecker, GeolocationByIpAddress, GeolocationOptions};

/// Provides data for the geolocation options form.
///
/// At least one country must be allowed; an empty selection is rejected
/// before the configuration is touched. The GeoLite checker is exposed so
/// the form can warn that the options have no effect without the database.
#[derive(Debug)]
pub struct GeolocationOptionsFormDataProvider<C, G> {
    configuration: C,
    checker: G,
}

impl<C, G> GeolocationOptionsFormDataProvider<C, G>
where
    C: DataConfiguration<Data = GeolocationOptions>,
    G: GeoLiteCityChecker,
{
    /// Create a provider backed by `configuration`.
    pub fn new(configuration: C, checker: G) -> Self {
        Self {
            configuration,
            checker,
        }
    }

    /// The GeoLite database checker.
    pub fn checker(&self) -> &G {
        &self.checker
    }
}

impl<C, G> FormDataProvider for GeolocationOptionsFormDataProvider<C, G>
where
    C: DataConfiguration<Data = GeolocationOptions>,
    G: GeoLiteCityChecker,
{
    type Data = GeolocationOptions;

    fn get_data(&self) -> Result<GeolocationOptions> {
        self.configuration.get_configuration()
    }

    fn set_data(&self, data: GeolocationOptions) -> Result<Vec<FormError>> {
        if data.geolocation_countries.is_empty() {
            warn!("rejected geolocation options without any allowed country");
            return Ok(vec![FormError::new(
                "Country selection is invalid.",
                INTERNATIONAL_NOTIFICATION_DOMAIN,
            )]);
        }

        self.configuration.update_configuration(data)
    }
}

/// Provides data for the geolocation-by-IP form.
#[derive(Debug)]
pub struct GeolocationByIpAddressFormDataProvider<C, G> {
    configuration: C,
    checker: G,
}

impl<C, G> GeolocationByIpAddressFormDataProvider<C, G>
where
    C: DataConfiguration<Data = GeolocationByIpAddress>,
    G: GeoLiteCityChecker,
{
    /// Create a provider backed by `configuration`, checking the GeoLite
    /// database with `checker` before geolocation is turned on.
    pub fn new(configuration: C, checker: G) -> Self {
        Self {
            configuration,
            checker,
        }
    }

    /// The GeoLite database checker.
    pub fn checker(&self) -> &G {
        &self.checker
    }
}

impl<C, G> FormDataProvider for GeolocationByIpAddressFormDataProvider<C, G>
where
    C: DataConfiguration<Data = GeolocationByIpAddress>,
    G: GeoLiteCityChecker,
{
    type Data = GeolocationByIpAddress;

    fn get_data(&self) -> Result<GeolocationByIpAddress> {
        self.configuration.get_configuration()
    }

    fn set_data(&self, data: GeolocationByIpAddress) -> Result<Vec<FormError>> {
        if data.geolocation_enabled && !self.checker.is_available() {
            warn!("cannot enable geolocation by IP address without the GeoLite city database");
            return Ok(vec![FormError::new(
                "The geolocation database is unavailable.",
                INTERNATIONAL_NOTIFICATION_DOMAIN,
            )]);
        }

        debug!(enabled = data.geolocation_enabled, "saving geolocation by IP address");
        self.configuration.update_configuration(data)
    }
}
