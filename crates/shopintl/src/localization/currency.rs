//! Currency identifiers and the currency data value object.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{is_valid_currency_code, is_valid_locale_code};
use crate::error::{Error, Result};

/// Identifies one currency as seen from one locale, e.g. `EUR` in `fr-FR`.
///
/// Both parts are validated on construction. The textual form is
/// `CODE:locale` (`EUR:fr-FR`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocalizedCurrencyId {
    currency_code: String,
    locale_code: String,
}

impl LocalizedCurrencyId {
    /// Create an identifier from an ISO 4217 currency code and a locale code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Localization`] if the currency code is not three
    /// uppercase letters or the locale code is not a well-formed locale tag.
    pub fn new(currency_code: impl Into<String>, locale_code: impl Into<String>) -> Result<Self> {
        let currency_code = currency_code.into();
        let locale_code = locale_code.into();

        if !is_valid_currency_code(&currency_code) {
            return Err(Error::localization(format!(
                "invalid currency code '{currency_code}': expected three uppercase letters"
            )));
        }
        if !is_valid_locale_code(&locale_code) {
            return Err(Error::localization(format!(
                "invalid locale code '{locale_code}'"
            )));
        }

        Ok(Self {
            currency_code,
            locale_code,
        })
    }

    /// The ISO 4217 alphabetic currency code.
    #[must_use]
    pub fn currency_code(&self) -> &str {
        &self.currency_code
    }

    /// The locale code.
    #[must_use]
    pub fn locale_code(&self) -> &str {
        &self.locale_code
    }
}

impl fmt::Display for LocalizedCurrencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.currency_code, self.locale_code)
    }
}

impl FromStr for LocalizedCurrencyId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (currency, locale) = s.split_once(':').ok_or_else(|| {
            Error::localization(format!(
                "invalid localized currency id '{s}': expected CODE:locale"
            ))
        })?;
        Self::new(currency, locale)
    }
}

impl TryFrom<String> for LocalizedCurrencyId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<LocalizedCurrencyId> for String {
    fn from(id: LocalizedCurrencyId) -> Self {
        id.to_string()
    }
}

/// Localization data for one currency.
///
/// Every field is optional so that partial data from different layers can be
/// combined with [`CurrencyData::override_with`]. Names, symbols and patterns
/// are keyed by locale code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyData {
    /// ISO 4217 alphabetic code (`EUR`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso_code: Option<String>,

    /// ISO 4217 numeric code, zero padded (`978`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric_iso_code: Option<String>,

    /// Number of decimal digits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,

    /// Display names by locale.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub names: BTreeMap<String, String>,

    /// Symbols by locale.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub symbols: BTreeMap<String, String>,

    /// Display patterns by locale (`#,##0.00 ¤`).
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub patterns: BTreeMap<String, String>,
}

impl CurrencyData {
    /// Create empty currency data.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace fields of `self` with the ones present in `other`.
    ///
    /// Scalar fields are replaced when `other` has them; localized maps are
    /// merged entry by entry.
    pub fn override_with(&mut self, other: &CurrencyData) -> &mut Self {
        if other.iso_code.is_some() {
            self.iso_code.clone_from(&other.iso_code);
        }
        if other.numeric_iso_code.is_some() {
            self.numeric_iso_code.clone_from(&other.numeric_iso_code);
        }
        if other.precision.is_some() {
            self.precision = other.precision;
        }
        self.names
            .extend(other.names.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.symbols
            .extend(other.symbols.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.patterns
            .extend(other.patterns.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Display name for `locale`.
    #[must_use]
    pub fn name_for(&self, locale: &str) -> Option<&str> {
        self.names.get(locale).map(String::as_str)
    }

    /// Symbol for `locale`.
    #[must_use]
    pub fn symbol_for(&self, locale: &str) -> Option<&str> {
        self.symbols.get(locale).map(String::as_str)
    }

    /// Display pattern for `locale`.
    #[must_use]
    pub fn pattern_for(&self, locale: &str) -> Option<&str> {
        self.patterns.get(locale).map(String::as_str)
    }

    /// True when no field carries any data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
