//! SQL DDL for initializing the database schema.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema: one `patches` table, one row per observed patch,
/// deduplicated through the UNIQUE constraint on `name`.
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS patches (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL UNIQUE,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL -- RFC3339
);

CREATE INDEX IF NOT EXISTS idx_patches_created_at ON patches(created_at);
"#;
