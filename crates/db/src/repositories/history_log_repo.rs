//! Repository for the `history_log_requests` table.

use sqlx::PgPool;

use crate::models::history_log::{CreateHistoryLog, HistoryLogRequest};

/// Column list for `history_log_requests` queries.
const COLUMNS: &str = "id, request_method, request_url, request_timestamp";

/// Append and read operations for outbound request history.
pub struct HistoryLogRepo;

impl HistoryLogRepo {
    /// Append a single entry.
    pub async fn create(
        pool: &PgPool,
        entry: &CreateHistoryLog,
    ) -> Result<HistoryLogRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO history_log_requests (request_method, request_url, request_timestamp) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HistoryLogRequest>(&query)
            .bind(&entry.request_method)
            .bind(&entry.request_url)
            .bind(entry.request_timestamp)
            .fetch_one(pool)
            .await
    }

    /// All entries, oldest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<HistoryLogRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM history_log_requests ORDER BY id");
        sqlx::query_as::<_, HistoryLogRequest>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*)::BIGINT FROM history_log_requests")
            .fetch_one(pool)
            .await
    }
}
