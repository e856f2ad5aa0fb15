use crate::db::models::PatchRow;
use crate::db::schema::SQLITE_INIT;
use crate::error::PatchwatchError;
use crate::scrape::Candidate;
use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::{str::FromStr, time::Duration};

/// Fallback row limit for recent-patch queries.
pub const DEFAULT_RECENT_COUNT: u32 = 10;

/// Outcome of an insertion attempt. A duplicate natural key is an expected
/// result, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyExists,
}

/// Deduplicating store over a SQLite pool.
#[derive(Clone)]
pub struct PatchStore {
    pool: SqlitePool,
}

impl PatchStore {
    pub async fn connect(database_url: &str) -> Result<Self, PatchwatchError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5))
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;

        Ok(Self { pool })
    }

    /// Applies the DDL statement by statement. Idempotent; callers may treat a
    /// failure as non-fatal and log it.
    pub async fn init_schema(&self) -> Result<(), PatchwatchError> {
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Insert-if-absent under one scoped transaction: begin, insert, commit.
    /// A uniqueness violation on `name` rolls back and reports
    /// `AlreadyExists`; any other failure rolls back and propagates.
    ///
    /// Duplicates are detected through the constraint itself, never through a
    /// check-then-insert read.
    pub async fn insert_if_absent(
        &self,
        candidate: &Candidate,
    ) -> Result<InsertOutcome, PatchwatchError> {
        let mut tx = self.pool.begin().await?;

        let res = sqlx::query(
            r#"
        INSERT INTO patches (name, title, description, created_at)
        VALUES (?, ?, ?, ?)
        "#,
        )
        .bind(&candidate.name)
        .bind(&candidate.title)
        .bind(&candidate.description)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await;

        match res {
            Ok(_) => {
                tx.commit().await?;
                Ok(InsertOutcome::Inserted)
            }
            Err(e) if is_unique_violation(&e) => {
                tx.rollback().await?;
                Ok(InsertOutcome::AlreadyExists)
            }
            Err(e) => {
                tx.rollback().await?;
                Err(e.into())
            }
        }
    }

    /// Most recent `n` patches, newest first. Ties on `created_at` are broken
    /// by `name` descending so a batch inserted within one timestamp keeps a
    /// stable order.
    pub async fn list_recent(&self, n: u32) -> Result<Vec<PatchRow>, PatchwatchError> {
        let rows = sqlx::query_as::<_, PatchRow>(
            r#"
        SELECT id, name, title, description, created_at
        FROM patches
        ORDER BY created_at DESC, name DESC
        LIMIT ?
        "#,
        )
        .bind(i64::from(n))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

/// Normalize a caller-supplied count: absent, unparsable, or non-positive
/// values fall back to `DEFAULT_RECENT_COUNT`.
pub fn recent_count(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
        .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
        .unwrap_or(DEFAULT_RECENT_COUNT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_count_defaults_when_absent_or_invalid() {
        assert_eq!(recent_count(None), 10);
        assert_eq!(recent_count(Some("")), 10);
        assert_eq!(recent_count(Some("abc")), 10);
        assert_eq!(recent_count(Some("0")), 10);
        assert_eq!(recent_count(Some("-3")), 10);
    }

    #[test]
    fn recent_count_accepts_positive_values() {
        assert_eq!(recent_count(Some("1")), 1);
        assert_eq!(recent_count(Some(" 25 ")), 25);
    }
}
