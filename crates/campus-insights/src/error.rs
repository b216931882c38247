use crate::config::ConfigError;
use crate::records::dataset::DatasetError;
use crate::records::search::SearchError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Everything the service and CLI can fail with. Bad input maps to 400.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("dataset error: {0}")]
    Dataset(#[from] DatasetError),
    #[error("search error: {0}")]
    Search(#[from] SearchError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Dataset(_) | AppError::Search(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn client_errors_map_to_bad_request() {
        let response = AppError::from(SearchError::EmptyQuery).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::from(DatasetError::NotAnArray).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::from(ConfigError::InvalidPort).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn startup_failures_keep_their_source() {
        let err = AppError::from(std::io::Error::new(
            std::io::ErrorKind::AddrInUse,
            "port 3000 taken",
        ));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "io error: port 3000 taken");
        assert!(err.source().is_some());
    }
}
