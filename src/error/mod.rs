use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analyzer::AnalyzeError;
use crate::fetch::FetchError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalyzeError),

    #[error("Internal server error")]
    Internal,
}

impl AppError {
    fn status_and_message(self) -> (StatusCode, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Fetch(e) => {
                let status = match e {
                    FetchError::InvalidUrl
                    | FetchError::UnsupportedScheme
                    | FetchError::MissingHost
                    | FetchError::PrivateAddress => StatusCode::BAD_REQUEST,
                    FetchError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                    FetchError::Unresolvable
                    | FetchError::Network(_)
                    | FetchError::Status { .. }
                    | FetchError::TooLarge { .. }
                    | FetchError::Body
                    | FetchError::TooManyRedirects => StatusCode::UNPROCESSABLE_ENTITY,
                };
                (status, e.to_string())
            }
            AppError::Analysis(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            AppError::Internal => {
                tracing::error!("Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
