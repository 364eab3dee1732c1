//! Invoice endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Deleted;
use crate::http::error::ApiError;
use crate::http::extractors::{InvoiceId, JsonBody};
use crate::http::server::AppState;
use crate::models::{
    normalize_amount, required, InvoiceDetail, InvoiceSummary, NewInvoice, PaymentUpdate,
};

/// Create invoice request
#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    pub comp_code: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amt: Option<Decimal>,
    pub add_date: Option<NaiveDate>,
    pub paid: Option<bool>,
    pub paid_date: Option<NaiveDate>,
}

/// Update invoice request
#[derive(Debug, Deserialize)]
pub struct UpdateInvoiceRequest {
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amt: Option<Decimal>,
    pub paid: Option<bool>,
}

/// Invoice listing response
#[derive(Debug, Serialize)]
pub struct InvoiceListResponse {
    pub invoices: Vec<InvoiceSummary>,
}

/// Single invoice response
#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    pub invoice: InvoiceDetail,
}

/// GET /invoices - every invoice as `{id, comp_code}`
async fn list_invoices(
    State(state): State<Arc<AppState>>,
) -> Result<Json<InvoiceListResponse>, ApiError> {
    let invoices = state.ledger.list_invoices().await?;
    Ok(Json(InvoiceListResponse { invoices }))
}

/// GET /invoices/{id} - invoice with its company
async fn get_invoice(
    State(state): State<Arc<AppState>>,
    InvoiceId(id): InvoiceId,
) -> Result<Json<InvoiceResponse>, ApiError> {
    let invoice = state.ledger.get_invoice(id).await?;
    Ok(Json(InvoiceResponse { invoice }))
}

/// POST /invoices - unknown comp_code is a client error
async fn create_invoice(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateInvoiceRequest>,
) -> Result<(StatusCode, Json<InvoiceResponse>), ApiError> {
    let new_invoice = NewInvoice {
        comp_code: required(req.comp_code, "comp_code")?,
        amt: normalize_amount(required(req.amt, "amt")?)?,
        add_date: req.add_date,
        paid: req.paid,
        paid_date: req.paid_date,
    };
    let invoice = state.ledger.create_invoice(new_invoice).await?;

    tracing::info!(id = invoice.id, comp_code = %invoice.company.code, "invoice created");
    Ok((StatusCode::CREATED, Json(InvoiceResponse { invoice })))
}

/// PUT /invoices/{id} - new amount plus paid/unpaid transition
async fn update_invoice(
    State(state): State<Arc<AppState>>,
    InvoiceId(id): InvoiceId,
    JsonBody(req): JsonBody<UpdateInvoiceRequest>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    let update = PaymentUpdate {
        amt: normalize_amount(required(req.amt, "amt")?)?,
        paid: req.paid,
    };
    let invoice = state.ledger.update_invoice(id, update).await?;

    Ok(Json(InvoiceResponse { invoice }))
}

/// DELETE /invoices/{id}
async fn delete_invoice(
    State(state): State<Arc<AppState>>,
    InvoiceId(id): InvoiceId,
) -> Result<Json<Deleted>, ApiError> {
    state.ledger.delete_invoice(id).await?;

    tracing::info!(id, "invoice deleted");
    Ok(Json(Deleted::default()))
}

/// Invoice routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/invoices", get(list_invoices).post(create_invoice))
        .route(
            "/invoices/{id}",
            get(get_invoice).put(update_invoice).delete(delete_invoice),
        )
}
