//! PostgreSQL-backed [`RequestLogSink`].

use std::sync::Arc;

use async_trait::async_trait;
use syncbridge_core::request_log::{
    LoggedRequest, NoopRequestLog, RequestLogMode, RequestLogSink,
};

use crate::models::history_log::CreateHistoryLog;
use crate::repositories::HistoryLogRepo;
use crate::DbPool;

/// Writes successful outbound calls to `history_log_requests`.
///
/// Insert failures are logged and dropped; they never reach the caller.
pub struct PgRequestLog {
    pool: DbPool,
    background: bool,
}

impl PgRequestLog {
    /// Sink that awaits each insert.
    pub fn inline(pool: DbPool) -> Self {
        Self {
            pool,
            background: false,
        }
    }

    /// Sink that spawns each insert as a detached task.
    pub fn background(pool: DbPool) -> Self {
        Self {
            pool,
            background: true,
        }
    }
}

#[async_trait]
impl RequestLogSink for PgRequestLog {
    async fn record(&self, request: LoggedRequest) {
        let entry = CreateHistoryLog::from(request);
        if self.background {
            let pool = self.pool.clone();
            tokio::spawn(async move {
                insert(&pool, &entry).await;
            });
        } else {
            insert(&self.pool, &entry).await;
        }
    }
}

async fn insert(pool: &DbPool, entry: &CreateHistoryLog) {
    match HistoryLogRepo::create(pool, entry).await {
        Ok(row) => {
            tracing::debug!(
                id = row.id,
                method = %row.request_method,
                url = %row.request_url,
                "Request history entry stored"
            );
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                method = %entry.request_method,
                url = %entry.request_url,
                "Failed to store request history entry"
            );
        }
    }
}

/// Build the sink for the configured logging mode.
pub fn build_request_log(pool: &DbPool, mode: RequestLogMode) -> Arc<dyn RequestLogSink> {
    match mode {
        RequestLogMode::Inline => Arc::new(PgRequestLog::inline(pool.clone())),
        RequestLogMode::Background => Arc::new(PgRequestLog::background(pool.clone())),
        RequestLogMode::Disabled => Arc::new(NoopRequestLog),
    }
}
