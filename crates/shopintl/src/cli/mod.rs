//! Command-line interface for shopintl.
//!
//! This module provides the CLI structure for the `shopintl` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, CurrencyCommand, DbCommand, GeolocationBehaviourArg, GeolocationCommand,
    LanguageCommand, NaBehaviourArg, OutputFormat,
};

/// shopintl - Currency localization and geolocation settings
///
/// Manages the shop's languages and currencies, resolves localized currency
/// data, and edits geolocation options.
#[derive(Debug, Parser)]
#[command(name = "shopintl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the shop database
    #[command(subcommand)]
    Db(DbCommand),

    /// Manage languages
    #[command(subcommand)]
    Language(LanguageCommand),

    /// Manage and look up currencies
    #[command(subcommand)]
    Currency(CurrencyCommand),

    /// View or modify geolocation options
    #[command(subcommand)]
    Geolocation(GeolocationCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
