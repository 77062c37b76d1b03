//! `shopintl` - CLI for shop currency localization and geolocation settings
//!
//! This binary manages the shop database and exposes the currency data chain
//! and the geolocation form data providers from the command line.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;

use shopintl::cli::{
    Cli, Command, ConfigCommand, CurrencyCommand, DbCommand, GeolocationCommand, LanguageCommand,
    OutputFormat,
};
use shopintl::configuration::{
    GeolocationByIpAddressConfiguration, GeolocationOptionsConfiguration, ALLOWED_COUNTRIES,
};
use shopintl::forms::{
    FormDataProvider, FormError, GeolocationByIpAddressFormDataProvider,
    GeolocationOptionsFormDataProvider,
};
use shopintl::geolocation::{
    FileGeoLiteCityChecker, GeoLiteCityChecker, GeolocationByIpAddress, GeolocationOptions,
};
use shopintl::localization::{self, CurrencyDataProvider, CurrencyReference, LocalizedCurrencyId};
use shopintl::{init_logging, Config, Storage};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    match cli.command {
        Command::Db(cmd) => handle_db(&config, &cmd),
        Command::Language(cmd) => handle_language(&config, cmd),
        Command::Currency(cmd) => handle_currency(&config, cmd),
        Command::Geolocation(cmd) => handle_geolocation(&config, cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_storage(config: &Config) -> anyhow::Result<Storage> {
    let path = config.database_path();
    Storage::open(&path).with_context(|| format!("failed to open database {}", path.display()))
}

fn handle_db(config: &Config, cmd: &DbCommand) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    match cmd {
        DbCommand::Init => {
            println!("Database ready: {}", storage.path().display());
        }
        DbCommand::Stats { json } => {
            let stats = storage.stats()?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("shopintl database");
                println!("-----------------");
                println!("Path:          {}", storage.path().display());
                println!("Languages:     {}", stats.languages);
                println!("Currencies:    {}", stats.currencies);
                println!("Translations:  {}", stats.currency_translations);
                println!("Settings:      {}", stats.configuration_entries);
                println!("Size (bytes):  {}", stats.db_size_bytes);
            }
        }
    }
    Ok(())
}

fn handle_language(config: &Config, cmd: LanguageCommand) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    match cmd {
        LanguageCommand::Add { locale, name } => {
            let id = storage.add_language(&locale, &name)?;
            println!("Added language {locale} (id {id})");
        }
        LanguageCommand::List { format } => {
            let languages = storage.languages()?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&languages)?),
                OutputFormat::Plain => {
                    for language in languages {
                        println!(
                            "{:>4}  {:<12} {}{}",
                            language.id,
                            language.locale,
                            language.name,
                            if language.active { "" } else { " (inactive)" }
                        );
                    }
                }
            }
        }
    }
    Ok(())
}

fn handle_currency(config: &Config, cmd: CurrencyCommand) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    match cmd {
        CurrencyCommand::Add {
            code,
            numeric_code,
            precision,
        } => {
            let id = storage.upsert_currency(&code, &numeric_code, precision)?;
            println!("Saved currency {code} (id {id})");
        }
        CurrencyCommand::Localize {
            code,
            locale,
            name,
            symbol,
            pattern,
        } => {
            let Some(currency) = storage
                .currencies()?
                .into_iter()
                .find(|currency| currency.iso_code == code)
            else {
                bail!("unknown currency '{code}'");
            };
            let Some(lang_id) = storage.language_id_by_locale(&locale)? else {
                bail!("unknown language '{locale}'");
            };
            storage.localize_currency(currency.id, lang_id, &name, &symbol, pattern.as_deref())?;
            println!("Localized {code} for {locale}");
        }
        CurrencyCommand::Show {
            code,
            locale,
            format,
        } => {
            let locale = locale.unwrap_or_else(|| config.localization.default_locale.clone());
            let id = LocalizedCurrencyId::new(code, locale)?;
            let chain = localization::default_chain(&storage, &config.localization)?;
            let Some(data) = chain.read(&id)? else {
                bail!("no currency data for {id}");
            };
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&data)?),
                OutputFormat::Plain => {
                    let locale = id.locale_code();
                    println!("Currency {id}");
                    println!("  ISO code:      {}", data.iso_code.as_deref().unwrap_or("-"));
                    println!(
                        "  Numeric code:  {}",
                        data.numeric_iso_code.as_deref().unwrap_or("-")
                    );
                    println!(
                        "  Precision:     {}",
                        data.precision.map_or_else(|| "-".to_string(), |p| p.to_string())
                    );
                    println!("  Name:          {}", data.name_for(locale).unwrap_or("-"));
                    println!("  Symbol:        {}", data.symbol_for(locale).unwrap_or("-"));
                    println!("  Pattern:       {}", data.pattern_for(locale).unwrap_or("-"));
                }
            }
        }
        CurrencyCommand::List {
            reference: true,
            format,
        } => {
            let reference = CurrencyReference::builtin()?;
            let codes = reference.currency_codes();
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&codes)?),
                OutputFormat::Plain => {
                    for code in codes {
                        println!("{code}");
                    }
                }
            }
        }
        CurrencyCommand::List {
            reference: false,
            format,
        } => {
            let currencies = storage.currencies()?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&currencies)?),
                OutputFormat::Plain => {
                    for currency in currencies {
                        println!(
                            "{}  {}  precision {}",
                            currency.iso_code, currency.numeric_iso_code, currency.precision
                        );
                    }
                }
            }
        }
        CurrencyCommand::Delete { code } => {
            if storage.delete_currency(&code)? {
                println!("Deleted currency {code}");
            } else {
                println!("No currency {code}");
            }
        }
    }
    Ok(())
}

fn handle_geolocation(config: &Config, cmd: GeolocationCommand) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    let checker = FileGeoLiteCityChecker::new(config.geolite_city_path());

    match cmd {
        GeolocationCommand::Show { format } => {
            let options = GeolocationOptionsFormDataProvider::new(
                GeolocationOptionsConfiguration::new(&storage),
                checker.clone(),
            );
            let by_ip = GeolocationByIpAddressFormDataProvider::new(
                GeolocationByIpAddressConfiguration::new(&storage),
                checker,
            );
            let data = options.get_data()?;
            let enabled = by_ip.get_data()?.geolocation_enabled;
            let available = options.checker().is_available();
            let updated_at = storage.configuration_updated_at(ALLOWED_COUNTRIES)?;
            match format {
                OutputFormat::Json => {
                    let status = serde_json::json!({
                        "options": data,
                        "geolocation_enabled": enabled,
                        "geolite_city_available": available,
                        "options_updated_at": updated_at,
                    });
                    println!("{}", serde_json::to_string_pretty(&status)?);
                }
                OutputFormat::Plain => {
                    print_geolocation(&data, enabled, available);
                    println!(
                        "  Last saved:           {}",
                        updated_at.map_or_else(|| "never".to_string(), |at| at.to_rfc3339())
                    );
                }
            }
        }
        GeolocationCommand::Set {
            behaviour,
            na_behaviour,
            countries,
        } => {
            let provider = GeolocationOptionsFormDataProvider::new(
                GeolocationOptionsConfiguration::new(&storage),
                checker,
            );
            let errors = provider.set_data(GeolocationOptions {
                geolocation_behaviour: behaviour.into(),
                geolocation_na_behaviour: na_behaviour.into(),
                geolocation_countries: countries,
            })?;
            report(&errors, "Geolocation options saved.")?;
        }
        GeolocationCommand::ByIp { enable, disable } => {
            let provider = GeolocationByIpAddressFormDataProvider::new(
                GeolocationByIpAddressConfiguration::new(&storage),
                checker,
            );
            if enable || disable {
                let errors = provider.set_data(GeolocationByIpAddress {
                    geolocation_enabled: enable,
                })?;
                report(&errors, "Geolocation by IP address saved.")?;
            } else {
                let enabled = provider.get_data()?.geolocation_enabled;
                println!(
                    "Geolocation by IP address is {}",
                    if enabled { "enabled" } else { "disabled" }
                );
            }
        }
    }
    Ok(())
}

fn print_geolocation(options: &GeolocationOptions, enabled: bool, available: bool) {
    println!("Geolocation");
    println!("===========");
    println!("  By IP address:        {}", if enabled { "enabled" } else { "disabled" });
    println!("  GeoLite city data:    {}", if available { "available" } else { "missing" });
    println!("  Behaviour:            {:?}", options.geolocation_behaviour);
    println!("  Unknown countries:    {:?}", options.geolocation_na_behaviour);
    println!(
        "  Allowed countries:    {}",
        if options.geolocation_countries.is_empty() {
            "-".to_string()
        } else {
            options.geolocation_countries.join(", ")
        }
    );
}

fn report(errors: &[FormError], success: &str) -> anyhow::Result<()> {
    if errors.is_empty() {
        println!("{success}");
        return Ok(());
    }
    for error in errors {
        eprintln!("error: {error}");
    }
    bail!("{} validation error(s)", errors.len())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Localization]");
                println!("  Default locale:     {}", config.localization.default_locale);
                println!("  Cache layer:        {}", config.localization.cache_enabled);
                println!("  Reference layer:    {}", config.localization.reference_enabled);
                println!();
                println!("[Geolocation]");
                println!("  GeoLite city path:  {}", config.geolite_city_path().display());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            validate_config(path)?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}

/// Fails when the configuration at `path` cannot be loaded or is invalid.
fn validate_config(path: PathBuf) -> anyhow::Result<()> {
    if let Err(e) = Config::load_from(Some(path)) {
        bail!("configuration error: {e}");
    }
    Ok(())
}
