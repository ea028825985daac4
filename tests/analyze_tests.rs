mod common;

use axum::http::{header, StatusCode};
use serde_json::json;

use common::{StubFetcher, StubResponse};

// ── POST /api/analyze ────────────────────────────────────────────────────────

#[tokio::test]
async fn analyze_returns_report() {
    let fetcher = StubFetcher::html(&common::complete_page());
    let app = common::create_test_app(fetcher);

    let (status, body) =
        common::post_json(app, "/api/analyze", json!({ "url": "https://example.com/" })).await;

    assert_eq!(status, StatusCode::OK, "unexpected body: {body}");
    assert_eq!(body["url"], "https://example.com/");
    assert_eq!(body["seoScore"], 100);
    assert_eq!(body["issuesCount"], 0);
    assert_eq!(body["metaTagsCount"], 18);
    assert_eq!(body["basicMetaTags"].as_array().unwrap().len(), 5);
    assert_eq!(body["socialMetaTags"].as_array().unwrap().len(), 9);
    assert_eq!(body["technicalMetaTags"].as_array().unwrap().len(), 4);
    assert!(body["recommendations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn analyze_prepends_https_to_bare_domain() {
    let fetcher = StubFetcher::html("<html></html>");
    let app = common::create_test_app(fetcher.clone());

    let (status, body) =
        common::post_json(app, "/api/analyze", json!({ "url": "example.com" })).await;

    assert_eq!(status, StatusCode::OK, "unexpected body: {body}");
    assert_eq!(body["url"], "https://example.com/");
    assert_eq!(fetcher.requested_urls(), ["https://example.com/"]);
}

#[tokio::test]
async fn analyze_empty_page_reports_missing_tags() {
    let app = common::create_test_app(StubFetcher::html(""));

    let (status, body) =
        common::post_json(app, "/api/analyze", json!({ "url": "https://example.com" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["seoScore"], 25);
    let title = &body["basicMetaTags"][0];
    assert_eq!(title["name"], "title");
    assert_eq!(title["missing"], true);
    assert_eq!(title["status"], "error");
    assert!(body.get("pageTitle").is_none());
}

#[tokio::test]
async fn analyze_rejects_empty_url_without_fetching() {
    let fetcher = StubFetcher::html("<html></html>");
    let app = common::create_test_app(fetcher.clone());

    let (status, body) = common::post_json(app, "/api/analyze", json!({ "url": "" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "unexpected body: {body}");
    assert_eq!(body["error"], "Please enter a valid website address");
    assert!(fetcher.requested_urls().is_empty());
}

#[tokio::test]
async fn analyze_rejects_non_http_scheme() {
    let fetcher = StubFetcher::html("<html></html>");
    let app = common::create_test_app(fetcher.clone());

    let (status, body) =
        common::post_json(app, "/api/analyze", json!({ "url": "ftp://example.com" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "unexpected body: {body}");
    assert!(fetcher.requested_urls().is_empty());
}

#[tokio::test]
async fn analyze_rejects_malformed_url() {
    let app = common::create_test_app(StubFetcher::html("<html></html>"));

    let (status, body) =
        common::post_json(app, "/api/analyze", json!({ "url": "http://exa mple.com" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "unexpected body: {body}");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn analyze_rejects_missing_body_field() {
    let app = common::create_test_app(StubFetcher::html("<html></html>"));

    let (status, _) = common::post_json(app, "/api/analyze", json!({ "link": "x" })).await;

    assert!(status.is_client_error(), "expected 4xx, got {status}");
}

#[tokio::test]
async fn analyze_surfaces_upstream_status() {
    let fetcher = StubFetcher::new(StubResponse::Status(404, "Not Found"));
    let app = common::create_test_app(fetcher);

    let (status, body) =
        common::post_json(app, "/api/analyze", json!({ "url": "https://example.com/gone" })).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Failed to fetch URL (404): Not Found");
}

#[tokio::test]
async fn analyze_surfaces_timeout() {
    let app = common::create_test_app(StubFetcher::new(StubResponse::Timeout));

    let (status, body) =
        common::post_json(app, "/api/analyze", json!({ "url": "https://slow.example.com" })).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert!(body["error"].as_str().unwrap().contains("Timed out"));
}

// ── POST /api/export ─────────────────────────────────────────────────────────

#[tokio::test]
async fn export_returns_printable_attachment() {
    let app = common::create_test_app(StubFetcher::html(&common::complete_page()));

    let (status, headers, text) =
        common::post_json_text(app, "/api/export", json!({ "url": "https://example.com/" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"seo-analysis-https---example-com-.txt\""
    );
    assert!(text.starts_with("SEO Analysis Report"));
    assert!(text.contains("SEO Score:        100/100 (Good)"));
    assert!(text.contains("Page 1 of "));
    assert!(text.trim_end().ends_with("| SEO Analyzer | https://example.com/"));
}

#[tokio::test]
async fn export_propagates_fetch_errors() {
    let fetcher = StubFetcher::new(StubResponse::Status(500, "Internal Server Error"));
    let app = common::create_test_app(fetcher);

    let (status, body) =
        common::post_json(app, "/api/export", json!({ "url": "https://example.com/" })).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("500"));
}

// ── Misc routes ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_check_ok() {
    let app = common::create_test_app(StubFetcher::html(""));
    let (status, body) = common::get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn debug_route_reports_working() {
    let app = common::create_test_app(StubFetcher::html(""));
    let (status, body) = common::get(app, "/api/debug").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "API is working correctly");
    assert!(body["timestamp"].is_string());
}
