//! Company endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::Deleted;
use crate::http::error::ApiError;
use crate::http::extractors::JsonBody;
use crate::http::server::AppState;
use crate::models::{Company, CompanyChanges, CompanyName, NewCompany};

/// Create/update company request
#[derive(Debug, Deserialize)]
pub struct CompanyRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Single company response
#[derive(Debug, Serialize)]
pub struct CompanyResponse {
    pub company: Company,
}

/// GET /companies - list all companies
async fn list_companies(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Company>>, ApiError> {
    let companies = state.ledger.list_companies().await?;
    Ok(Json(companies))
}

/// GET /companies/{code} - a one-element array
async fn get_company(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<Vec<Company>>, ApiError> {
    let company = state.ledger.get_company(&code).await?;
    Ok(Json(vec![company]))
}

/// POST /companies - code derived from the first two characters of the name
async fn create_company(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CompanyRequest>,
) -> Result<(StatusCode, Json<CompanyResponse>), ApiError> {
    let name = CompanyName::new(req.name)?;
    let company = state
        .ledger
        .create_company(NewCompany::from_name(name, req.description))
        .await?;

    tracing::info!(code = %company.code, "company created");
    Ok((StatusCode::CREATED, Json(CompanyResponse { company })))
}

/// PUT /companies/{code} - overwrite name and description
async fn update_company(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    JsonBody(req): JsonBody<CompanyRequest>,
) -> Result<Json<CompanyResponse>, ApiError> {
    let name = CompanyName::new(req.name)?;
    let changes = CompanyChanges {
        name: name.into_string(),
        description: req.description,
    };
    let company = state.ledger.update_company(&code, changes).await?;

    Ok(Json(CompanyResponse { company }))
}

/// DELETE /companies/{code} - cascades to the company's invoices
async fn delete_company(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<Deleted>, ApiError> {
    state.ledger.delete_company(&code).await?;

    tracing::info!(code = %code, "company deleted");
    Ok(Json(Deleted::default()))
}

/// Company routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/companies", get(list_companies).post(create_company))
        .route(
            "/companies/{code}",
            get(get_company).put(update_company).delete(delete_company),
        )
}
