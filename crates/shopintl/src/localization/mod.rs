//! Currency localization data.
//!
//! Currency data (names, symbols, numeric codes, precision and display
//! patterns) is looked up through a [`CurrencyDataChain`]: an ordered stack
//! of data layers where each layer falls back to the ones below it.
//!
//! # Example
//!
//! ```
//! use shopintl::localization::{CurrencyDataChain, CurrencyReference, LocalizedCurrencyId};
//!
//! let chain = CurrencyDataChain::new().with_layer(CurrencyReference::builtin()?);
//! let id = LocalizedCurrencyId::new("EUR", "fr-FR")?;
//!
//! let data = chain.read(&id)?.expect("EUR is part of the reference data");
//! assert_eq!(data.symbol_for("fr-FR"), Some("€"));
//! # Ok::<(), shopintl::Error>(())
//! ```

mod cache;
mod currency;
mod database;
mod layer;
mod reference;

use once_cell::sync::Lazy;
use regex::Regex;

pub use cache::CurrencyCache;
pub use currency::{CurrencyData, LocalizedCurrencyId};
pub use database::{CurrencyDataProvider, CurrencyDatabase, CurrencyEntity};
pub use layer::{CurrencyDataChain, CurrencyDataLayer};
pub use reference::CurrencyReference;

use crate::config::LocalizationConfig;
use crate::error::Result;
use crate::storage::Storage;

static CURRENCY_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{3}$").expect("valid regex"));

static NUMERIC_CURRENCY_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{3}$").expect("valid regex"));

static LOCALE_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z]{2,3}(-[A-Z][a-z]{3})?(-([A-Z]{2}|[0-9]{3}))?$").expect("valid regex")
});

/// Check that `code` is an ISO 4217 alphabetic currency code (`EUR`).
#[must_use]
pub fn is_valid_currency_code(code: &str) -> bool {
    CURRENCY_CODE.is_match(code)
}

/// Check that `code` is an ISO 4217 numeric currency code (`978`).
#[must_use]
pub fn is_valid_numeric_currency_code(code: &str) -> bool {
    NUMERIC_CURRENCY_CODE.is_match(code)
}

/// Check that `code` is a locale tag such as `en`, `fr-FR`, `zh-Hant-TW` or `es-419`.
#[must_use]
pub fn is_valid_locale_code(code: &str) -> bool {
    LOCALE_CODE.is_match(code)
}

/// Build the standard currency data chain: cache, database, reference data.
///
/// The cache and reference layers are included according to `config`.
///
/// # Errors
///
/// Returns an error if the built-in reference data cannot be loaded.
pub fn default_chain<'a>(
    storage: &'a Storage,
    config: &LocalizationConfig,
) -> Result<CurrencyDataChain<'a>> {
    let mut chain = CurrencyDataChain::new();
    if config.cache_enabled {
        chain = chain.with_layer(CurrencyCache::new());
    }
    chain = chain.with_layer(CurrencyDatabase::new(storage));
    if config.reference_enabled {
        chain = chain.with_layer(CurrencyReference::builtin()?);
    }
    Ok(chain)
}
