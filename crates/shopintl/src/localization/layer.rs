//! The currency data layer chain.
//!
//! A chain holds layers ordered from upper (fastest, most specific) to lower
//! (slowest, most generic). Reads go top-down and stop at the first layer
//! that knows the currency; what was found is then copied into the writable
//! layers above it. Writes go bottom-up through every writable layer.

use std::fmt;

use tracing::{debug, trace};

use super::currency::{CurrencyData, LocalizedCurrencyId};
use crate::error::Result;

/// One representation of currency data.
///
/// Implementors only deal with their own storage; falling back to other
/// layers is the job of [`CurrencyDataChain`].
pub trait CurrencyDataLayer {
    /// Short name of this layer, used in logs.
    fn name(&self) -> &'static str;

    /// Whether [`CurrencyDataChain`] may write into this layer.
    fn is_writable(&self) -> bool;

    /// Read currency data from this layer only.
    ///
    /// Returns `None` when this layer has no data for `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    fn do_read(&self, id: &LocalizedCurrencyId) -> Result<Option<CurrencyData>>;

    /// Write currency data into this layer only.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    fn do_write(&self, id: &LocalizedCurrencyId, data: &CurrencyData) -> Result<()>;
}

/// An ordered stack of currency data layers, upper layer first.
#[derive(Default)]
pub struct CurrencyDataChain<'a> {
    layers: Vec<Box<dyn CurrencyDataLayer + 'a>>,
}

impl fmt::Debug for CurrencyDataChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurrencyDataChain")
            .field("layers", &self.layer_names())
            .finish()
    }
}

impl<'a> CurrencyDataChain<'a> {
    /// Create an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Append `layer` below the layers already in the chain.
    #[must_use]
    pub fn with_layer(mut self, layer: impl CurrencyDataLayer + 'a) -> Self {
        self.layers.push(Box::new(layer));
        self
    }

    /// Names of the layers, upper layer first.
    #[must_use]
    pub fn layer_names(&self) -> Vec<&'static str> {
        self.layers.iter().map(|layer| layer.name()).collect()
    }

    /// Number of layers in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// True when the chain has no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Read currency data, falling back through the layers.
    ///
    /// The first layer returning data wins. The data is then written into
    /// every writable layer above it so the next read stops earlier.
    ///
    /// # Errors
    ///
    /// Returns an error if a layer fails to read, or if propagating the
    /// result into an upper layer fails.
    pub fn read(&self, id: &LocalizedCurrencyId) -> Result<Option<CurrencyData>> {
        for (depth, layer) in self.layers.iter().enumerate() {
            trace!(layer = layer.name(), %id, "reading currency data");
            let Some(data) = layer.do_read(id)? else {
                continue;
            };

            debug!(layer = layer.name(), %id, "currency data found");
            for upper in self.layers[..depth].iter().filter(|l| l.is_writable()) {
                trace!(layer = upper.name(), %id, "propagating currency data");
                upper.do_write(id, &data)?;
            }
            return Ok(Some(data));
        }

        debug!(%id, "currency data not found in any layer");
        Ok(None)
    }

    /// Write currency data into every writable layer, lower layers first.
    ///
    /// Read-only layers are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error as soon as one layer fails to write; layers above it
    /// are left untouched.
    pub fn write(&self, id: &LocalizedCurrencyId, data: CurrencyData) -> Result<CurrencyData> {
        for layer in self.layers.iter().rev().filter(|l| l.is_writable()) {
            trace!(layer = layer.name(), %id, "writing currency data");
            layer.do_write(id, &data)?;
        }
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;
    use crate::error::Error;

    /// Test layer recording every call it receives.
    struct RecordingLayer {
        name: &'static str,
        writable: bool,
        data: RefCell<HashMap<LocalizedCurrencyId, CurrencyData>>,
    }

    thread_local! {
        static CALLS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    }

    impl RecordingLayer {
        fn new(name: &'static str, writable: bool) -> Self {
            Self {
                name,
                writable,
                data: RefCell::new(HashMap::new()),
            }
        }

        fn holding(self, id: &LocalizedCurrencyId, data: CurrencyData) -> Self {
            self.data.borrow_mut().insert(id.clone(), data);
            self
        }
    }

    impl CurrencyDataLayer for RecordingLayer {
        fn name(&self) -> &'static str {
            self.name
        }

        fn is_writable(&self) -> bool {
            self.writable
        }

        fn do_read(&self, id: &LocalizedCurrencyId) -> Result<Option<CurrencyData>> {
            CALLS.with(|calls| calls.borrow_mut().push(format!("read:{}", self.name)));
            Ok(self.data.borrow().get(id).cloned())
        }

        fn do_write(&self, id: &LocalizedCurrencyId, data: &CurrencyData) -> Result<()> {
            CALLS.with(|calls| calls.borrow_mut().push(format!("write:{}", self.name)));
            self.data.borrow_mut().insert(id.clone(), data.clone());
            Ok(())
        }
    }

    /// Writable layer that never holds data; reads fail when `fail_reads` is set.
    struct FailingLayer {
        fail_reads: bool,
    }

    impl CurrencyDataLayer for FailingLayer {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn is_writable(&self) -> bool {
            true
        }

        fn do_read(&self, _id: &LocalizedCurrencyId) -> Result<Option<CurrencyData>> {
            if self.fail_reads {
                return Err(Error::data_layer("failing", "read failed"));
            }
            Ok(None)
        }

        fn do_write(&self, _id: &LocalizedCurrencyId, _data: &CurrencyData) -> Result<()> {
            Err(Error::data_layer("failing", "write failed"))
        }
    }

    fn take_calls() -> Vec<String> {
        CALLS.with(|calls| std::mem::take(&mut *calls.borrow_mut()))
    }

    fn eur() -> LocalizedCurrencyId {
        LocalizedCurrencyId::new("EUR", "fr-FR").unwrap()
    }

    fn eur_data() -> CurrencyData {
        CurrencyData {
            iso_code: Some("EUR".to_string()),
            ..CurrencyData::default()
        }
    }

    #[test]
    fn test_empty_chain_reads_nothing() {
        let chain = CurrencyDataChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.read(&eur()).unwrap(), None);
        assert_eq!(chain.write(&eur(), eur_data()).unwrap(), eur_data());
    }

    #[test]
    fn test_read_stops_at_first_hit() {
        take_calls();
        let chain = CurrencyDataChain::new()
            .with_layer(RecordingLayer::new("upper", false).holding(&eur(), eur_data()))
            .with_layer(RecordingLayer::new("lower", false));

        assert_eq!(chain.read(&eur()).unwrap(), Some(eur_data()));
        assert_eq!(take_calls(), vec!["read:upper"]);
    }

    #[test]
    fn test_read_falls_back_and_propagates_to_writable_upper_layers() {
        take_calls();
        let chain = CurrencyDataChain::new()
            .with_layer(RecordingLayer::new("cache", true))
            .with_layer(RecordingLayer::new("database", false))
            .with_layer(RecordingLayer::new("reference", false).holding(&eur(), eur_data()));

        assert_eq!(chain.read(&eur()).unwrap(), Some(eur_data()));
        assert_eq!(
            take_calls(),
            vec!["read:cache", "read:database", "read:reference", "write:cache"]
        );

        // Second read is served by the cache.
        assert_eq!(chain.read(&eur()).unwrap(), Some(eur_data()));
        assert_eq!(take_calls(), vec!["read:cache"]);
    }

    #[test]
    fn test_read_returns_none_when_no_layer_knows_the_id() {
        take_calls();
        let chain = CurrencyDataChain::new()
            .with_layer(RecordingLayer::new("cache", true))
            .with_layer(RecordingLayer::new("database", false));

        assert_eq!(chain.read(&eur()).unwrap(), None);
        assert_eq!(take_calls(), vec!["read:cache", "read:database"]);
    }

    #[test]
    fn test_write_goes_bottom_up_and_skips_read_only_layers() {
        take_calls();
        let chain = CurrencyDataChain::new()
            .with_layer(RecordingLayer::new("cache", true))
            .with_layer(RecordingLayer::new("database", false))
            .with_layer(RecordingLayer::new("store", true));

        chain.write(&eur(), eur_data()).unwrap();
        assert_eq!(take_calls(), vec!["write:store", "write:cache"]);
    }

    #[test]
    fn test_read_error_is_returned() {
        crate::logging::init_test_logging();
        let chain = CurrencyDataChain::new().with_layer(FailingLayer { fail_reads: true });
        let err = chain.read(&eur()).unwrap_err();
        assert!(err.to_string().contains("read failed"));
    }

    #[test]
    fn test_propagation_error_is_returned() {
        crate::logging::init_test_logging();
        let chain = CurrencyDataChain::new()
            .with_layer(FailingLayer { fail_reads: false })
            .with_layer(RecordingLayer::new("reference", false).holding(&eur(), eur_data()));

        let err = chain.read(&eur()).unwrap_err();
        assert!(err.to_string().contains("write failed"));
    }

    #[test]
    fn test_layer_names_and_debug() {
        let chain = CurrencyDataChain::new()
            .with_layer(RecordingLayer::new("cache", true))
            .with_layer(RecordingLayer::new("database", false));

        assert_eq!(chain.len(), 2);
        assert_eq!(chain.layer_names(), vec!["cache", "database"]);
        assert!(format!("{chain:?}").contains("database"));
    }
}
