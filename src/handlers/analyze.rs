use axum::extract::State;
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::info;
use validator::Validate;

use crate::analyzer;
use crate::error::{AppError, AppResult};
use crate::export;
use crate::fetch::normalize_url;
use crate::models::{AnalysisReport, AnalyzeRequest};
use crate::state::AppState;

// ── Shared pipeline ────────────────────────────────────────────────────────

fn validation_error(e: validator::ValidationErrors) -> AppError {
    AppError::Validation(
        e.field_errors()
            .values()
            .flat_map(|v| v.iter())
            .filter_map(|e| e.message.as_ref())
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(", "),
    )
}

/// Validate, fetch once, analyse. Either a full report or an error.
async fn run_analysis(state: &AppState, req: AnalyzeRequest) -> AppResult<AnalysisReport> {
    req.validate().map_err(validation_error)?;

    let url = normalize_url(&req.url)?;
    let html = state.fetcher.fetch(&url).await?;
    let report = analyzer::analyze(&html, url.as_str())?;

    info!(
        url = %report.url,
        score = report.seo_score,
        tags = report.meta_tags_count,
        issues = report.issues_count,
        "Analyzed page"
    );
    Ok(report)
}

// ── Handlers ───────────────────────────────────────────────────────────────

/// POST /api/analyze
///
/// Body `{ "url": "example.com" }`. A missing scheme defaults to `https://`.
pub async fn analyze_url(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> AppResult<Json<AnalysisReport>> {
    run_analysis(&state, req).await.map(Json)
}

/// POST /api/export
///
/// Same input as `/api/analyze`; responds with a printable text report
/// as an attachment.
pub async fn export_report(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> AppResult<Response> {
    let report = run_analysis(&state, req).await?;
    let body = export::render_report(&report, chrono::Utc::now());

    let disposition = format!(
        "attachment; filename=\"{}\"",
        export::report_filename(&report.url)
    );
    let disposition = HeaderValue::from_str(&disposition).map_err(|_| AppError::Internal)?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; charset=utf-8"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
