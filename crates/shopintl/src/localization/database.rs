//! Database-backed currency data layer.
//!
//! This layer only reads: currencies in the database are maintained from the
//! back office, never by the chain.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use super::currency::{CurrencyData, LocalizedCurrencyId};
use super::layer::CurrencyDataLayer;
use crate::error::Result;

/// A currency row as stored in the database, localized for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrencyEntity {
    /// Database identifier.
    pub id: i64,
    /// ISO 4217 alphabetic code.
    pub iso_code: String,
    /// ISO 4217 numeric code.
    pub numeric_iso_code: String,
    /// Number of decimal digits.
    pub precision: u32,
    /// Name in the requested language.
    pub name: String,
    /// Symbol in the requested language.
    pub symbol: String,
    /// Custom display patterns, keyed by language id.
    pub patterns: BTreeMap<i64, String>,
}

impl CurrencyEntity {
    /// Custom display pattern for the language `lang_id`, if one is set.
    #[must_use]
    pub fn pattern(&self, lang_id: i64) -> Option<&str> {
        self.patterns.get(&lang_id).map(String::as_str)
    }
}

/// Read access to currencies and languages in the database.
pub trait CurrencyDataProvider {
    /// Find a non-deleted currency by ISO code, localized in `locale`.
    ///
    /// Returns `None` when the currency does not exist, is deleted, or has no
    /// localized strings for the language of `locale`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn currency_by_iso_code_and_locale(
        &self,
        iso_code: &str,
        locale: &str,
    ) -> Result<Option<CurrencyEntity>>;

    /// Find the id of the language using `locale` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn language_id_by_locale(&self, locale: &str) -> Result<Option<i64>>;
}

impl<P: CurrencyDataProvider + ?Sized> CurrencyDataProvider for &P {
    fn currency_by_iso_code_and_locale(
        &self,
        iso_code: &str,
        locale: &str,
    ) -> Result<Option<CurrencyEntity>> {
        (**self).currency_by_iso_code_and_locale(iso_code, locale)
    }

    fn language_id_by_locale(&self, locale: &str) -> Result<Option<i64>> {
        (**self).language_id_by_locale(locale)
    }
}

/// Read-only currency data layer over a [`CurrencyDataProvider`].
#[derive(Debug)]
pub struct CurrencyDatabase<P> {
    provider: P,
}

impl<P: CurrencyDataProvider> CurrencyDatabase<P> {
    /// Create a database layer reading through `provider`.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl<P: CurrencyDataProvider> CurrencyDataLayer for CurrencyDatabase<P> {
    fn name(&self) -> &'static str {
        "database"
    }

    fn is_writable(&self) -> bool {
        false
    }

    fn do_read(&self, id: &LocalizedCurrencyId) -> Result<Option<CurrencyData>> {
        let locale = id.locale_code();
        let Some(entity) = self
            .provider
            .currency_by_iso_code_and_locale(id.currency_code(), locale)?
        else {
            return Ok(None);
        };

        let mut data = CurrencyData {
            iso_code: Some(entity.iso_code.clone()),
            numeric_iso_code: Some(entity.numeric_iso_code.clone()),
            precision: Some(entity.precision),
            ..CurrencyData::default()
        };
        data.names.insert(locale.to_string(), entity.name.clone());
        data.symbols.insert(locale.to_string(), entity.symbol.clone());

        let pattern = self
            .provider
            .language_id_by_locale(locale)?
            .and_then(|lang_id| entity.pattern(lang_id))
            .filter(|pattern| !pattern.is_empty());
        if let Some(pattern) = pattern {
            data.patterns.insert(locale.to_string(), pattern.to_string());
        }

        debug!(%id, currency_id = entity.id, "currency read from database");
        Ok(Some(data))
    }

    fn do_write(&self, id: &LocalizedCurrencyId, _data: &CurrencyData) -> Result<()> {
        debug!(%id, "database layer is read-only, write ignored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::localization::{CurrencyCache, CurrencyDataChain};
    use crate::storage::Storage;

    fn seeded_storage() -> Storage {
        let storage = Storage::open_in_memory().unwrap();
        let fr = storage.add_language("fr-FR", "Français").unwrap();
        let en = storage.add_language("en-US", "English").unwrap();
        let eur = storage.upsert_currency("EUR", "978", 2).unwrap();
        storage
            .localize_currency(eur, fr, "euro", "€", Some("#,##0.00 ¤"))
            .unwrap();
        storage.localize_currency(eur, en, "Euro", "€", None).unwrap();
        storage
    }

    fn id(currency: &str, locale: &str) -> LocalizedCurrencyId {
        LocalizedCurrencyId::new(currency, locale).unwrap()
    }

    #[test]
    fn test_read_maps_entity_fields() {
        let storage = seeded_storage();
        let layer = CurrencyDatabase::new(&storage);

        let data = layer.do_read(&id("EUR", "fr-FR")).unwrap().unwrap();
        assert_eq!(data.iso_code.as_deref(), Some("EUR"));
        assert_eq!(data.numeric_iso_code.as_deref(), Some("978"));
        assert_eq!(data.precision, Some(2));
        assert_eq!(data.name_for("fr-FR"), Some("euro"));
        assert_eq!(data.symbol_for("fr-FR"), Some("€"));
        assert_eq!(data.pattern_for("fr-FR"), Some("#,##0.00 ¤"));
    }

    #[test]
    fn test_read_without_pattern_leaves_patterns_empty() {
        let storage = seeded_storage();
        let layer = CurrencyDatabase::new(&storage);

        let data = layer.do_read(&id("EUR", "en-US")).unwrap().unwrap();
        assert_eq!(data.name_for("en-US"), Some("Euro"));
        assert!(data.patterns.is_empty());
    }

    #[test]
    fn test_read_unknown_currency_or_language() {
        let storage = seeded_storage();
        let layer = CurrencyDatabase::new(&storage);

        assert!(layer.do_read(&id("USD", "fr-FR")).unwrap().is_none());
        assert!(layer.do_read(&id("EUR", "de-DE")).unwrap().is_none());
    }

    #[test]
    fn test_read_ignores_deleted_currency() {
        let storage = seeded_storage();
        assert!(storage.delete_currency("EUR").unwrap());

        let layer = CurrencyDatabase::new(&storage);
        assert!(layer.do_read(&id("EUR", "fr-FR")).unwrap().is_none());
    }

    #[test]
    fn test_layer_is_read_only() {
        let storage = seeded_storage();
        let layer = CurrencyDatabase::new(&storage);
        assert!(!layer.is_writable());

        let mut changed = layer.do_read(&id("EUR", "fr-FR")).unwrap().unwrap();
        changed.names.insert("fr-FR".to_string(), "EURO!".to_string());
        layer.do_write(&id("EUR", "fr-FR"), &changed).unwrap();

        let data = layer.do_read(&id("EUR", "fr-FR")).unwrap().unwrap();
        assert_eq!(data.name_for("fr-FR"), Some("euro"));
    }

    #[test]
    fn test_chain_write_does_not_touch_database() {
        let storage = seeded_storage();
        let cache = CurrencyCache::new();
        let chain = CurrencyDataChain::new()
            .with_layer(&cache)
            .with_layer(CurrencyDatabase::new(&storage));

        let mut data = CurrencyData::new();
        data.names.insert("fr-FR".to_string(), "autre".to_string());
        chain.write(&id("EUR", "fr-FR"), data).unwrap();

        assert_eq!(cache.len(), 1);
        let entity = storage
            .currency_by_iso_code_and_locale("EUR", "fr-FR")
            .unwrap()
            .unwrap();
        assert_eq!(entity.name, "euro");
    }

    /// Provider stub with a pattern registered under an unknown language.
    struct StubProvider;

    impl CurrencyDataProvider for StubProvider {
        fn currency_by_iso_code_and_locale(
            &self,
            iso_code: &str,
            _locale: &str,
        ) -> Result<Option<CurrencyEntity>> {
            Ok(Some(CurrencyEntity {
                id: 7,
                iso_code: iso_code.to_string(),
                numeric_iso_code: "999".to_string(),
                precision: 4,
                name: "Stub".to_string(),
                symbol: "S".to_string(),
                patterns: BTreeMap::from([(1, String::new()), (2, "¤0".to_string())]),
            }))
        }

        fn language_id_by_locale(&self, _locale: &str) -> Result<Option<i64>> {
            Ok(Some(1))
        }
    }

    #[test]
    fn test_empty_pattern_is_ignored() {
        let layer = CurrencyDatabase::new(StubProvider);
        let data = layer.do_read(&id("XTS", "en")).unwrap().unwrap();
        assert_eq!(data.precision, Some(4));
        assert!(data.patterns.is_empty());
    }

    #[test]
    fn test_entity_pattern_lookup() {
        let entity = StubProvider
            .currency_by_iso_code_and_locale("XTS", "en")
            .unwrap()
            .unwrap();
        assert_eq!(entity.pattern(2), Some("¤0"));
        assert_eq!(entity.pattern(3), None);
    }
}
