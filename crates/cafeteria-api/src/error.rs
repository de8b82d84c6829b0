use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::dates::DateError;
use crate::query::QueryError;
use crate::service::ServiceError;
use crate::validation::PayloadError;

/// Application error type that converts to HTTP responses
#[derive(Debug)]
pub enum AppError {
    InvalidQuery {
        message: String,
        details: Vec<String>,
    },
    NotFound(String),
    Unauthorized,
    InvalidToken(String),
    ScrapeFailed(String),
    Internal(String),
}

impl AppError {
    pub fn invalid_query(message: impl Into<String>) -> Self {
        AppError::InvalidQuery {
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn meal_not_found() -> Self {
        AppError::NotFound("Meal not found.".into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            AppError::InvalidQuery { message, details } => {
                (StatusCode::BAD_REQUEST, "INVALID_QUERY", message, details)
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, Vec::new()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required.".into(),
                Vec::new(),
            ),
            AppError::InvalidToken(msg) => {
                (StatusCode::UNAUTHORIZED, "INVALID_TOKEN", msg, Vec::new())
            }
            AppError::ScrapeFailed(msg) => {
                tracing::error!(error = %msg, "Scrape failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SCRAPE_FAILED",
                    msg,
                    Vec::new(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error.".into(),
                    Vec::new(),
                )
            }
        };

        let body = if details.is_empty() {
            json!({ "error": code, "message": message })
        } else {
            json!({ "error": code, "message": message, "details": details })
        };
        (status, axum::Json(body)).into_response()
    }
}

impl From<QueryError> for AppError {
    fn from(e: QueryError) -> Self {
        AppError::invalid_query(e.message)
    }
}

impl From<PayloadError> for AppError {
    fn from(e: PayloadError) -> Self {
        AppError::InvalidQuery {
            message: e.message,
            details: e.details,
        }
    }
}

impl From<DateError> for AppError {
    fn from(e: DateError) -> Self {
        AppError::invalid_query(e.to_string())
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::InvalidDate(e) => e.into(),
            ServiceError::MenuSource(e) => AppError::ScrapeFailed(e.to_string()),
            ServiceError::Store(e) => AppError::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_payload_error_keeps_details() {
        let (status, json) = body_json(AppError::InvalidQuery {
            message: "Invalid payload.".into(),
            details: vec!["name: name is required.".into()],
        })
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "INVALID_QUERY");
        assert_eq!(json["message"], "Invalid payload.");
        assert_eq!(json["details"][0], "name: name is required.");
    }

    #[tokio::test]
    async fn test_details_omitted_when_empty() {
        let (_, json) = body_json(AppError::meal_not_found()).await;
        assert_eq!(json, json!({ "error": "NOT_FOUND", "message": "Meal not found." }));
    }

    #[tokio::test]
    async fn test_internal_error_hides_cause() {
        let (status, json) = body_json(AppError::Internal("connection reset".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "INTERNAL_ERROR");
        assert_eq!(json["message"], "Internal server error.");
    }

    #[tokio::test]
    async fn test_scrape_failure_exposes_message() {
        let (status, json) = body_json(AppError::ScrapeFailed("upstream down".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "SCRAPE_FAILED");
        assert_eq!(json["message"], "upstream down");
    }
}
