//! Local HTTP upstreams for client tests.

use std::time::Duration;

use axum::{http::StatusCode, Json, Router};
use serde_json::Value;

/// Serve `app` on an ephemeral local port and return its base URL
pub(crate) async fn spawn_upstream(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Answers every request with `status`
pub(crate) fn status_upstream(status: StatusCode) -> Router {
    Router::new().fallback(move || async move { status })
}

/// Answers every request with `body` after `delay`
pub(crate) fn slow_upstream(delay: Duration, body: Value) -> Router {
    Router::new().fallback(move || {
        let body = body.clone();
        async move {
            tokio::time::sleep(delay).await;
            Json(body)
        }
    })
}

/// Answers every request with `body` immediately
pub(crate) fn json_upstream(body: Value) -> Router {
    slow_upstream(Duration::ZERO, body)
}
