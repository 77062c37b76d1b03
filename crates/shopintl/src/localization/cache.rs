//! In-memory cache layer.

use std::collections::HashMap;
use std::sync::RwLock;

use super::currency::{CurrencyData, LocalizedCurrencyId};
use super::layer::CurrencyDataLayer;
use crate::error::{Error, Result};

const LAYER_NAME: &str = "cache";

/// Writable in-memory layer, meant to sit on top of a chain.
///
/// Lower layers fill it through read propagation.
#[derive(Debug, Default)]
pub struct CurrencyCache {
    entries: RwLock<HashMap<LocalizedCurrencyId, CurrencyData>>,
}

impl CurrencyCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map_or(0, |entries| entries.len())
    }

    /// True when nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached entry.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}

impl CurrencyDataLayer for CurrencyCache {
    fn name(&self) -> &'static str {
        LAYER_NAME
    }

    fn is_writable(&self) -> bool {
        true
    }

    fn do_read(&self, id: &LocalizedCurrencyId) -> Result<Option<CurrencyData>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| Error::data_layer(LAYER_NAME, "cache lock poisoned"))?;
        Ok(entries.get(id).cloned())
    }

    fn do_write(&self, id: &LocalizedCurrencyId, data: &CurrencyData) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| Error::data_layer(LAYER_NAME, "cache lock poisoned"))?;
        entries.insert(id.clone(), data.clone());
        Ok(())
    }
}

// Lets a chain borrow a cache owned elsewhere.
impl CurrencyDataLayer for &CurrencyCache {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn is_writable(&self) -> bool {
        (**self).is_writable()
    }

    fn do_read(&self, id: &LocalizedCurrencyId) -> Result<Option<CurrencyData>> {
        (**self).do_read(id)
    }

    fn do_write(&self, id: &LocalizedCurrencyId, data: &CurrencyData) -> Result<()> {
        (**self).do_write(id, data)
    }
}
