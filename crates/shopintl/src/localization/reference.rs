//! Built-in CLDR reference data layer.
//!
//! The reference data is a small JSON extract of CLDR: per-currency numeric
//! codes, precision and localized names/symbols, plus per-locale currency
//! patterns. Locales fall back to their parent tag (`fr-CA` → `fr`).

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::trace;

use super::currency::{CurrencyData, LocalizedCurrencyId};
use super::layer::CurrencyDataLayer;
use crate::error::Result;

const BUILTIN_DATA: &str = include_str!("../../data/cldr_currencies.json");

#[derive(Debug, Clone, Deserialize)]
struct ReferenceData {
    #[serde(default)]
    patterns: BTreeMap<String, String>,
    currencies: BTreeMap<String, ReferenceCurrency>,
}

#[derive(Debug, Clone, Deserialize)]
struct ReferenceCurrency {
    numeric_iso_code: String,
    precision: u32,
    locales: BTreeMap<String, LocalizedStrings>,
}

#[derive(Debug, Clone, Deserialize)]
struct LocalizedStrings {
    name: String,
    symbol: String,
}

/// Read-only layer serving CLDR reference data.
///
/// Usually the lowest layer of a chain.
#[derive(Debug, Clone)]
pub struct CurrencyReference {
    data: ReferenceData,
}

impl CurrencyReference {
    /// Load the reference data shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded data cannot be parsed.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_DATA)
    }

    /// Load reference data from a JSON document with the built-in layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid reference data.
    pub fn from_json(json: &str) -> Result<Self> {
        let data = serde_json::from_str(json)?;
        Ok(Self { data })
    }

    /// ISO codes of every currency in the reference data.
    #[must_use]
    pub fn currency_codes(&self) -> Vec<&str> {
        self.data.currencies.keys().map(String::as_str).collect()
    }
}

/// `zh-Hant-TW` yields `zh-Hant-TW`, `zh-Hant`, `zh`.
fn locale_fallbacks(locale: &str) -> impl Iterator<Item = &str> {
    std::iter::successors(Some(locale), |&current| {
        current.rfind('-').map(|idx| &current[..idx])
    })
}

fn lookup<'m, T>(map: &'m BTreeMap<String, T>, locale: &str) -> Option<&'m T> {
    locale_fallbacks(locale).find_map(|candidate| map.get(candidate))
}

impl CurrencyDataLayer for CurrencyReference {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn is_writable(&self) -> bool {
        false
    }

    fn do_read(&self, id: &LocalizedCurrencyId) -> Result<Option<CurrencyData>> {
        let Some(currency) = self.data.currencies.get(id.currency_code()) else {
            return Ok(None);
        };
        let locale = id.locale_code();
        let Some(strings) = lookup(&currency.locales, locale) else {
            trace!(%id, "no reference strings for locale");
            return Ok(None);
        };

        let mut data = CurrencyData {
            iso_code: Some(id.currency_code().to_string()),
            numeric_iso_code: Some(currency.numeric_iso_code.clone()),
            precision: Some(currency.precision),
            ..CurrencyData::default()
        };
        data.names.insert(locale.to_string(), strings.name.clone());
        data.symbols
            .insert(locale.to_string(), strings.symbol.clone());
        if let Some(pattern) = lookup(&self.data.patterns, locale) {
            data.patterns.insert(locale.to_string(), pattern.clone());
        }

        Ok(Some(data))
    }

    fn do_write(&self, _id: &LocalizedCurrencyId, _data: &CurrencyData) -> Result<()> {
        Ok(())
    }
}
