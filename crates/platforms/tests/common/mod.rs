//! In-process stand-ins for the upstream platforms.
//!
//! Each test binds an axum router to `127.0.0.1:0` and points the real
//! client at it, so the reqwest code paths run unmodified.

use std::sync::Arc;

use axum::Router;
use syncbridge_core::request_log::MemoryRequestLog;
use syncbridge_core::urls::UrlResolver;

/// Serve `router` on an ephemeral port and return its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Resolver pointing both platforms at `base`.
pub fn resolver(base: &str) -> Arc<UrlResolver> {
    Arc::new(UrlResolver::new(base, base, "901"))
}

pub fn memory_log() -> Arc<MemoryRequestLog> {
    Arc::new(MemoryRequestLog::new())
}
