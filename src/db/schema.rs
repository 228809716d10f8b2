//! SQL DDL for initializing storage.

/// SQLite schema with:
/// - `credentials`: login accounts. `username` is deliberately NOT unique, so
///   seeding the same name twice yields two rows.
/// - `payers`: payment-intake submissions; every column is nullable.
/// - `payments`: completed payments. `payer_id` is a soft reference with no
///   foreign key, a receipt can name a payer that does not exist.
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS credentials (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL,
    password_hash TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_credentials_username ON credentials(username);

CREATE TABLE IF NOT EXISTS payers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NULL,
    vin TEXT NULL,
    email TEXT NULL,
    contact TEXT NULL,
    payment_method TEXT NULL,
    amount REAL NULL
);

CREATE TABLE IF NOT EXISTS payments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    transaction_id TEXT NOT NULL,
    date TEXT NOT NULL, -- RFC3339
    payer_id INTEGER NOT NULL
);
"#;
