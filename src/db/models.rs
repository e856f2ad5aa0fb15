use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Persisted patch record. Immutable once inserted; `name` is the natural key
/// and carries the uniqueness constraint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct PatchRow {
    pub id: i64,
    pub name: String,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}
