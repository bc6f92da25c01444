//! In-process mock of the Open Platform for integration tests.

#![allow(dead_code)]

use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};
use pan123_api::{Pan123Client, Settings};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::net::TcpListener;

pub const CLIENT_ID: &str = "test_id";
pub const CLIENT_SECRET: &str = "test_secret";
pub const EXPIRES_AT: &str = "2999-01-01T00:00:00+08:00";

/// Successful envelope around `data`.
pub fn ok(data: Value) -> Json<Value> {
    Json(json!({ "code": 0, "message": "ok", "data": data, "x-traceID": "trace-ok" }))
}

/// Failed envelope with HTTP 200.
pub fn fail(code: i64, message: &str) -> Json<Value> {
    Json(json!({ "code": code, "message": message, "x-traceID": "trace-fail" }))
}

/// Value of the bearer token in `headers`, if any.
pub fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_owned)
}

pub fn platform(headers: &HeaderMap) -> Option<&str> {
    headers.get("platform")?.to_str().ok()
}

/// Add the token endpoint, issuing `tok-1`, `tok-2`, ... and counting calls.
pub fn token_route(router: Router, issued: Arc<AtomicUsize>) -> Router {
    router.route(
        "/api/v1/access_token",
        post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let issued = issued.clone();
            async move {
                assert!(bearer(&headers).is_none(), "token request must be unauthenticated");
                if body["clientID"] != CLIENT_ID || body["clientSecret"] != CLIENT_SECRET {
                    return fail(401, "invalid client credentials");
                }
                let n = issued.fetch_add(1, Ordering::SeqCst) + 1;
                ok(json!({ "accessToken": format!("tok-{n}"), "expiredAt": EXPIRES_AT }))
            }
        }),
    )
}

/// Serve `router` on an ephemeral port and return its base URL.
pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Client pointed at `base_url` with test credentials and fast polling.
pub fn client(base_url: &str) -> Pan123Client {
    builder(base_url).build().unwrap()
}

pub fn builder(base_url: &str) -> pan123_api::ClientBuilder {
    Pan123Client::builder()
        .settings(Settings::default())
        .client_id(CLIENT_ID)
        .client_secret(CLIENT_SECRET)
        .base_url(base_url)
        .upload_poll_interval(Duration::from_millis(10))
}
