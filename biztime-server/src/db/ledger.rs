//! The data-access capability handed to every route handler

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::repos::{CompanyRepo, InvoiceRepo};
use super::DbError;
use crate::models::{
    Company, CompanyChanges, InvoiceDetail, InvoiceSummary, NewCompany, NewInvoice,
    PaymentUpdate,
};

/// Storage operations behind the companies and invoices routes.
///
/// Implementations must enforce the relational constraints themselves:
/// unique company codes (`Duplicate`), invoice `comp_code` referencing an
/// existing company (`MissingReference`), and cascading company deletes.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Short backend name for health output
    fn backend(&self) -> &'static str;

    /// Cheap round-trip proving the store is reachable
    async fn ping(&self) -> Result<(), DbError>;

    async fn list_companies(&self) -> Result<Vec<Company>, DbError>;

    async fn get_company(&self, code: &str) -> Result<Company, DbError>;

    async fn create_company(&self, company: NewCompany) -> Result<Company, DbError>;

    async fn update_company(&self, code: &str, changes: CompanyChanges)
        -> Result<Company, DbError>;

    /// Remove a company and every invoice referencing it
    async fn delete_company(&self, code: &str) -> Result<(), DbError>;

    async fn list_invoices(&self) -> Result<Vec<InvoiceSummary>, DbError>;

    async fn get_invoice(&self, id: i32) -> Result<InvoiceDetail, DbError>;

    async fn create_invoice(&self, invoice: NewInvoice) -> Result<InvoiceDetail, DbError>;

    async fn update_invoice(&self, id: i32, update: PaymentUpdate)
        -> Result<InvoiceDetail, DbError>;

    async fn delete_invoice(&self, id: i32) -> Result<(), DbError>;
}

/// Default pool size for [`PgLedger::connect`]
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Postgres-backed ledger
#[derive(Clone, Debug)]
pub struct PgLedger {
    pool: PgPool,
}

impl PgLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool of at most `max_connections` to `database_url`.
    ///
    /// Tables are not created here; callers run [`super::migrations::run`]
    /// on [`PgLedger::pool`] when they need them.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, DbError> {
        tracing::debug!(max_connections, "connecting to database");
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Ledger for PgLedger {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_companies(&self) -> Result<Vec<Company>, DbError> {
        CompanyRepo::new(&self.pool).list().await
    }

    async fn get_company(&self, code: &str) -> Result<Company, DbError> {
        CompanyRepo::new(&self.pool).get(code).await
    }

    async fn create_company(&self, company: NewCompany) -> Result<Company, DbError> {
        tracing::debug!(code = %company.code, "inserting company");
        CompanyRepo::new(&self.pool).create(company).await
    }

    async fn update_company(
        &self,
        code: &str,
        changes: CompanyChanges,
    ) -> Result<Company, DbError> {
        CompanyRepo::new(&self.pool).update(code, changes).await
    }

    async fn delete_company(&self, code: &str) -> Result<(), DbError> {
        tracing::debug!(code, "deleting company");
        CompanyRepo::new(&self.pool).delete(code).await
    }

    async fn list_invoices(&self) -> Result<Vec<InvoiceSummary>, DbError> {
        InvoiceRepo::new(&self.pool).list().await
    }

    async fn get_invoice(&self, id: i32) -> Result<InvoiceDetail, DbError> {
        InvoiceRepo::new(&self.pool).get(id).await
    }

    async fn create_invoice(&self, invoice: NewInvoice) -> Result<InvoiceDetail, DbError> {
        tracing::debug!(comp_code = %invoice.comp_code, "inserting invoice");
        InvoiceRepo::new(&self.pool).create(invoice).await
    }

    async fn update_invoice(
        &self,
        id: i32,
        update: PaymentUpdate,
    ) -> Result<InvoiceDetail, DbError> {
        InvoiceRepo::new(&self.pool).update(id, update).await
    }

    async fn delete_invoice(&self, id: i32) -> Result<(), DbError> {
        tracing::debug!(id, "deleting invoice");
        InvoiceRepo::new(&self.pool).delete(id).await
    }
}
