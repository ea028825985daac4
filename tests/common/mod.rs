// Each integration test file is a separate binary; helpers not used in every
// binary would otherwise trigger dead_code warnings from clippy.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use futures::future::{BoxFuture, FutureExt};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use url::Url;

use seo_meta_analyzer::{api_router, fetch::FetchError, fetch::PageFetcher, state::AppState};

/// What the stub "server" answers with.
#[derive(Clone)]
pub enum StubResponse {
    Html(String),
    Status(u16, &'static str),
    Timeout,
}

/// `PageFetcher` that never touches the network and records requested URLs.
#[derive(Clone)]
pub struct StubFetcher {
    response: StubResponse,
    pub requested: Arc<Mutex<Vec<String>>>,
}

impl StubFetcher {
    pub fn new(response: StubResponse) -> Self {
        Self {
            response,
            requested: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn html(html: &str) -> Self {
        Self::new(StubResponse::Html(html.to_string()))
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl PageFetcher for StubFetcher {
    fn fetch<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<String, FetchError>> {
        async move {
            self.requested.lock().unwrap().push(url.to_string());
            match &self.response {
                StubResponse::Html(html) => Ok(html.clone()),
                StubResponse::Status(status, reason) => Err(FetchError::Status {
                    status: *status,
                    reason: reason.to_string(),
                }),
                StubResponse::Timeout => Err(FetchError::Timeout),
            }
        }
        .boxed()
    }
}

/// Build the application router wired to a stub fetcher.
pub fn create_test_app(fetcher: StubFetcher) -> Router {
    api_router(AppState::new(fetcher))
}

/// A page with every tag the analyzer looks for, all within bounds.
pub fn complete_page() -> String {
    let title = "A".repeat(45);
    let description = "D".repeat(100);
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <meta name="description" content="{description}">
  <meta name="keywords" content="seo, meta, tags">
  <meta name="robots" content="index, follow">
  <link rel="canonical" href="https://example.com/">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <meta property="og:title" content="Example">
  <meta property="og:description" content="Open Graph description">
  <meta property="og:image" content="https://example.com/og.png">
  <meta property="og:url" content="https://example.com/">
  <meta property="og:type" content="website">
  <meta name="twitter:card" content="summary_large_image">
  <meta name="twitter:title" content="Example on Twitter">
  <meta name="twitter:description" content="Twitter description">
  <meta name="twitter:image" content="https://example.com/tw.png">
  <link rel="icon" href="/favicon.ico">
</head>
<body><h1>Hello</h1></body>
</html>"#
    )
}

// ── Request helpers ──────────────────────────────────────────────────────────

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, json_request(uri, body)).await
}

/// POST and return the raw response text plus headers.
pub async fn post_json_text(
    app: Router,
    uri: &str,
    body: Value,
) -> (StatusCode, HeaderMap, String) {
    let response = app.oneshot(json_request(uri, body)).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, String::from_utf8_lossy(&bytes).into_owned())
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
