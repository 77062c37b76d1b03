//! Configuration management for shopintl.
//!
//! Application settings (where the database lives, which localization
//! layers are enabled, where the GeoLite city database sits) are loaded with
//! figment from defaults, a TOML file and environment variables. Shop options
//! edited through the forms live in the database instead; see
//! [`configuration`](crate::configuration).

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::localization::is_valid_locale_code;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "shopintl";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "shop.db";

/// Default GeoLite city database file name.
const GEOLITE_CITY_FILE_NAME: &str = "GeoLite2-City.mmdb";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `SHOPINTL_`)
/// 2. TOML config file at `~/.config/shopintl/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Localization configuration.
    pub localization: LocalizationConfig,
    /// Geolocation configuration.
    pub geolocation: GeolocationConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/shopintl/shop.db`
    pub database_path: Option<PathBuf>,
}

/// Localization-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalizationConfig {
    /// Locale used when a command does not name one.
    pub default_locale: String,
    /// Keep an in-memory cache layer on top of the currency data chain.
    pub cache_enabled: bool,
    /// Fall back to built-in CLDR reference data below the database.
    pub reference_enabled: bool,
}

/// Geolocation-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeolocationConfig {
    /// Path to the GeoLite city database.
    /// Defaults to `~/.local/share/shopintl/GeoLite2-City.mmdb`
    pub geolite_city_path: Option<PathBuf>,
}

impl Default for LocalizationConfig {
    fn default() -> Self {
        Self {
            default_locale: "en-US".to_string(),
            cache_enabled: true,
            reference_enabled: true,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("SHOPINTL_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if !is_valid_locale_code(&self.localization.default_locale) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "default_locale '{}' is not a valid locale code",
                    self.localization.default_locale
                ),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the GeoLite city database path, resolving defaults if not set.
    #[must_use]
    pub fn geolite_city_path(&self) -> PathBuf {
        self.geolocation
            .geolite_city_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(GEOLITE_CITY_FILE_NAME))
    }
}
