//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database
//! - `sqlite.rs`: the `Storage` handle with every query the service runs

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{DbCredential, DbPayer, DbPayment, NewPayer, NewPayment};
pub use schema::SQLITE_INIT;
pub use sqlite::{SqlitePool, Storage};
