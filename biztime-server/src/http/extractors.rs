//! Custom Axum extractors
//!
//! Both turn axum's own rejections into `ApiError` so malformed input gets
//! the same JSON error body as everything else.

use axum::extract::{FromRequest, FromRequestParts, Json, Path, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::models::ValidationError;

/// JSON request body; syntax and type errors become 400
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest {
                message: rejection.body_text(),
            })?;

        Ok(Self(value))
    }
}

/// Integer invoice id from the path; ids beyond `i32` are 404
pub struct InvoiceId(pub i32);

impl<S> FromRequestParts<S> for InvoiceId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Missing { field: "id" }))?;

        let wide = id.parse::<i64>().map_err(|_| {
            ApiError::Validation(ValidationError::InvalidFormat {
                field: "id",
                reason: "must be an integer",
            })
        })?;

        // A well-formed id past the SERIAL range names no row
        let id = i32::try_from(wide).map_err(|_| ApiError::NotFound {
            resource: "invoice",
            id,
        })?;

        Ok(Self(id))
    }
}
