//! API error types with IntoResponse
//!
//! Every handler failure ends up here. The body is always
//! `{"error": {"message": ..., "status": ...}}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;
use crate::models::ValidationError;

const INTERNAL_MESSAGE: &str = "an internal error occurred";

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Client sent something unusable (400)
    BadRequest { message: String },

    /// Unique key already taken (409)
    Conflict { message: String },

    /// Database error (500, logged)
    Database(DbError),

    /// Internal error (500)
    Internal { message: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the client; internal details stay in the log
    fn public_message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::NotFound { resource, id } => format!("No such {}: {}", resource, id),
            Self::BadRequest { message } | Self::Conflict { message } => message.clone(),
            Self::Database(_) | Self::Internal { .. } => INTERNAL_MESSAGE.to_owned(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Database(e) => tracing::error!("Database error: {}", e),
            Self::Internal { message } => tracing::error!("Internal error: {}", message),
            other => tracing::debug!(status = %other.status(), "request rejected"),
        }

        let status = self.status();
        let body = json!({
            "error": {
                "message": self.public_message(),
                "status": status.as_u16()
            }
        });

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::Duplicate { .. } => Self::Conflict {
                message: e.to_string(),
            },
            DbError::MissingReference { .. } | DbError::OutOfRange { .. } => Self::BadRequest {
                message: e.to_string(),
            },
            DbError::Sqlx(_) => Self::Database(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_error_is_400() {
        let err = ApiError::Validation(ValidationError::Missing { field: "name" });
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "name is required");
        assert_eq!(body["error"]["status"], 400);
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let err = ApiError::NotFound {
            resource: "company",
            id: "apple".into(),
        };
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], "No such company: apple");
        assert_eq!(body["error"]["status"], 404);
    }

    #[tokio::test]
    async fn database_error_hides_details() {
        let err = ApiError::from(DbError::Sqlx(sqlx::Error::PoolTimedOut));
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], INTERNAL_MESSAGE);
        assert_eq!(body["error"]["status"], 500);
    }

    #[test]
    fn db_errors_map_to_statuses() {
        let duplicate = ApiError::from(DbError::Duplicate {
            resource: "company",
            id: "IB".into(),
        });
        assert_eq!(duplicate.status(), StatusCode::CONFLICT);

        let missing = ApiError::from(DbError::MissingReference {
            resource: "company",
            id: "nope".into(),
        });
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

        let overflow = ApiError::from(DbError::OutOfRange {
            message: "numeric field overflow".into(),
        });
        assert_eq!(overflow.status(), StatusCode::BAD_REQUEST);

        let not_found = ApiError::from(DbError::not_found("invoice", 3));
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
    }
}
