//! Storage layer for shopintl.
//!
//! This module provides `SQLite`-based persistent storage for languages,
//! currencies with their localized strings, and key/value shop configuration.

pub mod migrations;
pub mod schema;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use tracing::{debug, info};

use crate::configuration::ConfigurationStore;
use crate::error::{Error, Result};
use crate::localization::{
    is_valid_currency_code, is_valid_locale_code, is_valid_numeric_currency_code,
    CurrencyDataProvider, CurrencyEntity,
};

/// Storage engine for shop localization data.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

/// A language known to the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Language {
    /// Database identifier.
    pub id: i64,
    /// Locale code (`fr-FR`).
    pub locale: String,
    /// Display name.
    pub name: String,
    /// Whether the language is enabled in the shop.
    pub active: bool,
}

/// A currency row, without localized strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrencyRecord {
    /// Database identifier.
    pub id: i64,
    /// ISO 4217 alphabetic code.
    pub iso_code: String,
    /// ISO 4217 numeric code.
    pub numeric_iso_code: String,
    /// Number of decimal digits.
    pub precision: u32,
}

/// Statistics about the storage database.
#[derive(Debug, Clone, Serialize)]
pub struct StorageStats {
    /// Number of languages.
    pub languages: i64,
    /// Number of non-deleted currencies.
    pub currencies: i64,
    /// Number of localized currency rows.
    pub currency_translations: i64,
    /// Number of configuration entries.
    pub configuration_entries: i64,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch(
            "PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL; PRAGMA foreign_keys=ON;",
        )?;
        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    // === Languages ===

    /// Add a language and return its id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Localization`] if `locale` is malformed, or a
    /// database error if the locale already exists.
    pub fn add_language(&self, locale: &str, name: &str) -> Result<i64> {
        if !is_valid_locale_code(locale) {
            return Err(Error::localization(format!(
                "invalid locale code '{locale}'"
            )));
        }

        self.conn.execute(
            "INSERT INTO language (locale, name) VALUES (?1, ?2)",
            params![locale, name],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("Added language {} with id {}", locale, id);
        Ok(id)
    }

    /// List all languages ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn languages(&self) -> Result<Vec<Language>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id_lang, locale, name, active FROM language ORDER BY id_lang")?;
        let languages = stmt
            .query_map([], |row| {
                Ok(Language {
                    id: row.get(0)?,
                    locale: row.get(1)?,
                    name: row.get(2)?,
                    active: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(languages)
    }

    // === Currencies ===

    /// Insert a currency, or update it and restore it if soft-deleted.
    ///
    /// Returns the currency id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Localization`] if either ISO code is malformed, or a
    /// database error if the operation fails.
    pub fn upsert_currency(
        &self,
        iso_code: &str,
        numeric_iso_code: &str,
        precision: u32,
    ) -> Result<i64> {
        if !is_valid_currency_code(iso_code) {
            return Err(Error::localization(format!(
                "invalid currency code '{iso_code}'"
            )));
        }
        if !is_valid_numeric_currency_code(numeric_iso_code) {
            return Err(Error::localization(format!(
                "invalid numeric currency code '{numeric_iso_code}'"
            )));
        }

        let id: i64 = self.conn.query_row(
            r"
            INSERT INTO currency (iso_code, numeric_iso_code, precision, deleted)
            VALUES (?1, ?2, ?3, 0)
            ON CONFLICT(iso_code) DO UPDATE SET
                numeric_iso_code = excluded.numeric_iso_code,
                precision = excluded.precision,
                deleted = 0
            RETURNING id_currency
            ",
            params![iso_code, numeric_iso_code, precision],
            |row| row.get(0),
        )?;
        debug!("Upserted currency {} with id {}", iso_code, id);
        Ok(id)
    }

    /// Set the localized name, symbol and optional pattern of a currency.
    ///
    /// # Errors
    ///
    /// Returns an error if the currency or language does not exist, or if
    /// the database operation fails.
    pub fn localize_currency(
        &self,
        currency_id: i64,
        lang_id: i64,
        name: &str,
        symbol: &str,
        pattern: Option<&str>,
    ) -> Result<()> {
        self.conn.execute(
            r"
            INSERT OR REPLACE INTO currency_lang (id_currency, id_lang, name, symbol, pattern)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
            params![currency_id, lang_id, name, symbol, pattern],
        )?;
        Ok(())
    }

    /// Soft-delete a currency.
    ///
    /// Returns `true` if a currency was deleted, `false` if not found or
    /// already deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_currency(&self, iso_code: &str) -> Result<bool> {
        let affected = self.conn.execute(
            "UPDATE currency SET deleted = 1 WHERE iso_code = ?1 AND deleted = 0",
            [iso_code],
        )?;
        if affected > 0 {
            info!("Deleted currency {}", iso_code);
        }
        Ok(affected > 0)
    }

    /// List non-deleted currencies ordered by ISO code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn currencies(&self) -> Result<Vec<CurrencyRecord>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT id_currency, iso_code, numeric_iso_code, precision
            FROM currency WHERE deleted = 0 ORDER BY iso_code
            ",
        )?;
        let currencies = stmt
            .query_map([], |row| {
                Ok(CurrencyRecord {
                    id: row.get(0)?,
                    iso_code: row.get(1)?,
                    numeric_iso_code: row.get(2)?,
                    precision: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(currencies)
    }

    /// Patterns of a currency in every language that defines one.
    fn currency_patterns(&self, currency_id: i64) -> Result<BTreeMap<i64, String>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT id_lang, pattern FROM currency_lang
            WHERE id_currency = ?1 AND pattern IS NOT NULL
            ",
        )?;
        let patterns: BTreeMap<i64, String> = stmt
            .query_map([currency_id], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<_, _>>()?;
        Ok(patterns)
    }

    // === Configuration ===

    /// When a configuration key was last written.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn configuration_updated_at(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let updated: Option<String> = self
            .conn
            .query_row(
                "SELECT date_upd FROM configuration WHERE name = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(updated
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc)))
    }

    // === Statistics ===

    fn count(&self, sql: &str) -> Result<i64> {
        Ok(self.conn.query_row(sql, [], |row| row.get(0))?)
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails or the database
    /// file cannot be inspected.
    pub fn stats(&self) -> Result<StorageStats> {
        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path)?.len()
        };

        Ok(StorageStats {
            languages: self.count("SELECT COUNT(*) FROM language")?,
            currencies: self.count("SELECT COUNT(*) FROM currency WHERE deleted = 0")?,
            currency_translations: self.count("SELECT COUNT(*) FROM currency_lang")?,
            configuration_entries: self.count("SELECT COUNT(*) FROM configuration")?,
            db_size_bytes,
        })
    }
}

impl CurrencyDataProvider for Storage {
    fn currency_by_iso_code_and_locale(
        &self,
        iso_code: &str,
        locale: &str,
    ) -> Result<Option<CurrencyEntity>> {
        let row = self
            .conn
            .query_row(
                r"
                SELECT c.id_currency, c.iso_code, c.numeric_iso_code, c.precision,
                       cl.name, cl.symbol
                FROM currency c
                JOIN currency_lang cl ON cl.id_currency = c.id_currency
                JOIN language l ON l.id_lang = cl.id_lang
                WHERE c.iso_code = ?1 AND c.deleted = 0 AND l.locale = ?2
                ",
                params![iso_code, locale],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, u32>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                    ))
                },
            )
            .optional()?;

        let Some((id, iso_code, numeric_iso_code, precision, name, symbol)) = row else {
            return Ok(None);
        };

        Ok(Some(CurrencyEntity {
            id,
            iso_code,
            numeric_iso_code,
            precision,
            name,
            symbol,
            patterns: self.currency_patterns(id)?,
        }))
    }

    fn language_id_by_locale(&self, locale: &str) -> Result<Option<i64>> {
        let id = self
            .conn
            .query_row(
                "SELECT id_lang FROM language WHERE locale = ?1",
                [locale],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }
}

impl ConfigurationStore for Storage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT value FROM configuration WHERE name = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.flatten())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_many(&[(key, value)])
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                r"
                INSERT INTO configuration (name, value, date_upd) VALUES (?1, ?2, ?3)
                ON CONFLICT(name) DO UPDATE SET value = excluded.value, date_upd = excluded.date_upd
                ",
            )?;
            let now = Utc::now().to_rfc3339();
            for (key, value) in entries {
                stmt.execute(params![key, value, now])?;
            }
        }
        tx.commit()?;
        debug!(count = entries.len(), "Configuration updated");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM configuration WHERE name = ?1", [key])?;
        Ok(affected > 0)
    }
}
