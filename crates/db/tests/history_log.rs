use chrono::{TimeZone, Utc};
use sqlx::PgPool;
use syncbridge_core::request_log::{LoggedRequest, RequestLogMode, RequestLogSink, RequestMethod};
use syncbridge_db::models::history_log::CreateHistoryLog;
use syncbridge_db::repositories::HistoryLogRepo;
use syncbridge_db::request_log::{build_request_log, PgRequestLog};

fn entry(method: &str, url: &str) -> CreateHistoryLog {
    CreateHistoryLog {
        request_method: method.to_string(),
        request_url: url.to_string(),
        request_timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    }
}

/// Connect, migrate, verify the schema is usable.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bootstrap(pool: PgPool) {
    syncbridge_db::health_check(&pool).await.unwrap();

    // Migrations are idempotent.
    syncbridge_db::run_migrations(&pool).await.unwrap();

    let tables = syncbridge_db::list_tables(&pool).await.unwrap();
    assert!(
        tables.iter().any(|t| t == "history_log_requests"),
        "history_log_requests missing from {tables:?}"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_returns_row(pool: PgPool) {
    let row = HistoryLogRepo::create(&pool, &entry("POST", "http://hub.test/contacts/"))
        .await
        .unwrap();

    assert!(row.id > 0);
    assert_eq!(row.request_method, "POST");
    assert_eq!(row.request_url, "http://hub.test/contacts/");
    assert_eq!(
        row.request_timestamp,
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_all_is_ordered_by_id(pool: PgPool) {
    for url in ["http://a", "http://b", "http://c"] {
        HistoryLogRepo::create(&pool, &entry("GET", url)).await.unwrap();
    }

    let rows = HistoryLogRepo::list_all(&pool).await.unwrap();
    let urls: Vec<_> = rows.iter().map(|r| r.request_url.as_str()).collect();
    assert_eq!(urls, ["http://a", "http://b", "http://c"]);
    assert!(rows.windows(2).all(|w| w[0].id < w[1].id));
    assert_eq!(HistoryLogRepo::count(&pool).await.unwrap(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_inline_sink_writes_entry(pool: PgPool) {
    let sink = PgRequestLog::inline(pool.clone());
    sink.record(LoggedRequest::now(RequestMethod::Get, "http://hub.test/list"))
        .await;

    let rows = HistoryLogRepo::list_all(&pool).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].request_method, "GET");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_disabled_sink_writes_nothing(pool: PgPool) {
    let sink = build_request_log(&pool, RequestLogMode::Disabled);
    sink.record(LoggedRequest::now(RequestMethod::Post, "http://x"))
        .await;

    assert_eq!(HistoryLogRepo::count(&pool).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_background_sink_eventually_writes(pool: PgPool) {
    let sink = build_request_log(&pool, RequestLogMode::Background);
    sink.record(LoggedRequest::now(RequestMethod::Post, "http://x"))
        .await;

    let mut count = 0;
    for _ in 0..50 {
        count = HistoryLogRepo::count(&pool).await.unwrap();
        if count == 1 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    assert_eq!(count, 1);
}
