//! CLI command definitions.

use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

use crate::geolocation::{GeolocationBehaviour, NaBehaviour};

/// Database commands.
#[derive(Debug, Subcommand)]
pub enum DbCommand {
    /// Create the database and apply migrations
    Init,

    /// Show database statistics
    Stats {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

/// Language commands.
#[derive(Debug, Subcommand)]
pub enum LanguageCommand {
    /// Add a language
    Add {
        /// Locale tag, e.g. "fr-FR"
        locale: String,

        /// Display name
        name: String,
    },

    /// List languages
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "plain")]
        format: OutputFormat,
    },
}

/// Currency commands.
#[derive(Debug, Subcommand)]
pub enum CurrencyCommand {
    /// Add or update a currency
    Add {
        /// ISO 4217 alphabetic code, e.g. "EUR"
        code: String,

        /// ISO 4217 numeric code, e.g. "978"
        numeric_code: String,

        /// Number of decimal digits
        #[arg(short, long, default_value = "2")]
        precision: u32,
    },

    /// Set the localized name and symbol of a currency
    Localize {
        /// ISO 4217 alphabetic code
        code: String,

        /// Locale of an existing language
        locale: String,

        /// Localized name
        #[arg(long)]
        name: String,

        /// Localized symbol
        #[arg(long)]
        symbol: String,

        /// Localized number pattern
        #[arg(long)]
        pattern: Option<String>,
    },

    /// Resolve localized currency data
    Show {
        /// ISO 4217 alphabetic code
        code: String,

        /// Locale (defaults to the configured default locale)
        locale: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "plain")]
        format: OutputFormat,
    },

    /// List shop currencies
    List {
        /// List the built-in reference currencies instead
        #[arg(long)]
        reference: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "plain")]
        format: OutputFormat,
    },

    /// Delete a currency
    Delete {
        /// ISO 4217 alphabetic code
        code: String,
    },
}

/// Geolocation commands.
#[derive(Debug, Subcommand)]
pub enum GeolocationCommand {
    /// Show geolocation options
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value = "plain")]
        format: OutputFormat,
    },

    /// Save geolocation options
    Set {
        /// What visitors from other countries may do
        #[arg(long, value_enum, default_value = "no-catalog")]
        behaviour: GeolocationBehaviourArg,

        /// What visitors from unknown countries may do
        #[arg(long, value_enum, default_value = "allowed")]
        na_behaviour: NaBehaviourArg,

        /// Allowed country (ISO 3166-1 alpha-2), repeatable
        #[arg(long = "country", value_name = "CODE")]
        countries: Vec<String>,
    },

    /// Turn geolocation by IP address on or off
    ByIp {
        /// Enable geolocation by IP address
        #[arg(long, conflicts_with = "disable")]
        enable: bool,

        /// Disable geolocation by IP address
        #[arg(long)]
        disable: bool,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Geolocation behaviour argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GeolocationBehaviourArg {
    /// Hide the catalog
    NoCatalog,
    /// Show the catalog but refuse orders
    NoOrder,
}

impl From<GeolocationBehaviourArg> for GeolocationBehaviour {
    fn from(arg: GeolocationBehaviourArg) -> Self {
        match arg {
            GeolocationBehaviourArg::NoCatalog => Self::NoCatalog,
            GeolocationBehaviourArg::NoOrder => Self::NoOrder,
        }
    }
}

/// Unknown-country behaviour argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NaBehaviourArg {
    /// Allow browsing and ordering
    Allowed,
    /// Hide the catalog
    NoCatalog,
    /// Show the catalog but refuse orders
    NoOrder,
}

impl From<NaBehaviourArg> for NaBehaviour {
    fn from(arg: NaBehaviourArg) -> Self {
        match arg {
            NaBehaviourArg::Allowed => Self::Allowed,
            NaBehaviourArg::NoCatalog => Self::NoCatalog,
            NaBehaviourArg::NoOrder => Self::NoOrder,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_behaviour_arg_conversion() {
        assert_eq!(
            GeolocationBehaviour::from(GeolocationBehaviourArg::NoCatalog),
            GeolocationBehaviour::NoCatalog
        );
        assert_eq!(
            GeolocationBehaviour::from(GeolocationBehaviourArg::NoOrder),
            GeolocationBehaviour::NoOrder
        );
    }

    #[test]
    fn test_na_behaviour_arg_conversion() {
        assert_eq!(NaBehaviour::from(NaBehaviourArg::Allowed), NaBehaviour::Allowed);
        assert_eq!(NaBehaviour::from(NaBehaviourArg::NoCatalog), NaBehaviour::NoCatalog);
        assert_eq!(NaBehaviour::from(NaBehaviourArg::NoOrder), NaBehaviour::NoOrder);
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_currency_command_debug() {
        let cmd = CurrencyCommand::Delete {
            code: "EUR".to_string(),
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Delete"));
        assert!(debug_str.contains("EUR"));
    }
}
