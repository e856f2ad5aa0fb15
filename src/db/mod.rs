//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `store.rs`: the deduplicating store over a SQLite pool

pub mod models;
pub mod schema;
pub mod store;

pub use models::PatchRow;
pub use schema::SQLITE_INIT;
pub use store::{DEFAULT_RECENT_COUNT, InsertOutcome, PatchStore, recent_count};
