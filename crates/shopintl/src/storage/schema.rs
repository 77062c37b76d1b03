//! `SQLite` schema definitions for shopintl.

/// SQL statement to create the language table.
pub const CREATE_LANGUAGE_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS language (
    id_lang INTEGER PRIMARY KEY AUTOINCREMENT,
    locale TEXT NOT NULL UNIQUE COLLATE NOCASE,
    name TEXT NOT NULL,
    active INTEGER NOT NULL DEFAULT 1
)
";

/// SQL statement to create the currency table.
pub const CREATE_CURRENCY_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS currency (
    id_currency INTEGER PRIMARY KEY AUTOINCREMENT,
    iso_code TEXT NOT NULL UNIQUE,
    numeric_iso_code TEXT NOT NULL,
    precision INTEGER NOT NULL DEFAULT 2,
    deleted INTEGER NOT NULL DEFAULT 0
)
";

/// SQL statement to create the localized currency strings table.
pub const CREATE_CURRENCY_LANG_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS currency_lang (
    id_currency INTEGER NOT NULL REFERENCES currency(id_currency) ON DELETE CASCADE,
    id_lang INTEGER NOT NULL REFERENCES language(id_lang) ON DELETE CASCADE,
    name TEXT NOT NULL,
    symbol TEXT NOT NULL,
    pattern TEXT,
    PRIMARY KEY (id_currency, id_lang)
)
";

/// SQL statement to create the key/value configuration table.
pub const CREATE_CONFIGURATION_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS configuration (
    name TEXT PRIMARY KEY,
    value TEXT,
    date_upd TEXT NOT NULL
)
";

/// SQL statement to create an index on `currency_lang.id_lang` for locale lookups.
pub const CREATE_CURRENCY_LANG_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_currency_lang_lang ON currency_lang(id_lang)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_LANGUAGE_TABLE,
    CREATE_CURRENCY_TABLE,
    CREATE_CURRENCY_LANG_TABLE,
    CREATE_CURRENCY_LANG_INDEX,
    CREATE_CONFIGURATION_TABLE,
    CREATE_METADATA_TABLE,
];
