//! `shopintl` - Currency localization and geolocation settings for a shop back office
//!
//! This library resolves localized currency data through a chain of data
//! layers (cache, shop database, built-in reference data) and provides the
//! form data providers behind the geolocation settings pages.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod configuration;
pub mod error;
pub mod forms;
pub mod geolocation;
pub mod localization;
pub mod logging;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
pub use forms::{FormDataProvider, FormError};
pub use localization::{CurrencyData, CurrencyDataChain, LocalizedCurrencyId};
pub use logging::init_logging;
pub use storage::{Storage, StorageStats};
