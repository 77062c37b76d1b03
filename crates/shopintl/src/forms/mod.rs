//! Form data providers.
//!
//! A form data provider sits between a back-office form and the store behind
//! it: it hands the current values to the form and takes submitted values
//! back. Submissions that fail validation come back as a list of
//! [`FormError`]s; an empty list means the data was saved.

mod geolocation;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use geolocation::{GeolocationByIpAddressFormDataProvider, GeolocationOptionsFormDataProvider};

use crate::error::Result;

/// Translation domain of international settings notifications.
pub const INTERNATIONAL_NOTIFICATION_DOMAIN: &str = "Admin.International.Notification";

/// A translatable validation message.
///
/// `key` is the English message and doubles as the translation key;
/// `parameters` maps placeholders in the key to their values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormError {
    /// Message, also used as translation key.
    pub key: String,
    /// Placeholder substitutions.
    pub parameters: BTreeMap<String, String>,
    /// Translation domain.
    pub domain: String,
}

impl FormError {
    /// Create an error without parameters.
    #[must_use]
    pub fn new(key: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            parameters: BTreeMap::new(),
            domain: domain.into(),
        }
    }

    /// Add a placeholder substitution.
    #[must_use]
    pub fn with_parameter(
        mut self,
        placeholder: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.parameters.insert(placeholder.into(), value.into());
        self
    }
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = self
            .parameters
            .iter()
            .fold(self.key.clone(), |message, (placeholder, value)| {
                message.replace(placeholder.as_str(), value)
            });
        f.write_str(&message)
    }
}

/// Loads and saves the data of one form.
pub trait FormDataProvider {
    /// The form's data.
    type Data;

    /// Current data to show in the form.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be read.
    fn get_data(&self) -> Result<Self::Data>;

    /// Validate and save submitted data.
    ///
    /// Returns the validation errors; nothing is saved unless the list is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be written.
    fn set_data(&self, data: Self::Data) -> Result<Vec<FormError>>;
}
