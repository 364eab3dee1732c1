//! Invoice repository
//!
//! Reads of a single invoice JOIN the owning company in the same query.
//! Create and update run in a transaction so the row returned is the row
//! that was written.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{Executor, PgPool, Postgres, Row};

use crate::db::DbError;
use crate::models::{
    Company, InvoiceDetail, InvoiceSummary, NewInvoice, PaymentState, PaymentUpdate,
};

const SELECT_DETAIL: &str = r#"
    SELECT i.id, i.amt, i.add_date, i.paid, i.paid_date,
           c.code, c.name, c.description
    FROM invoices i
    JOIN companies c ON c.code = i.comp_code
    WHERE i.id = $1
"#;

/// Invoice repository
pub struct InvoiceRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> InvoiceRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every invoice as `{id, comp_code}`.
    pub async fn list(&self) -> Result<Vec<InvoiceSummary>, DbError> {
        let invoices = sqlx::query_as::<_, InvoiceSummary>(
            "SELECT id, comp_code FROM invoices ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(invoices)
    }

    pub async fn get(&self, id: i32) -> Result<InvoiceDetail, DbError> {
        fetch_detail(self.pool, id)
            .await?
            .ok_or_else(|| DbError::not_found("invoice", id))
    }

    /// Insert an invoice; an unknown `comp_code` becomes `MissingReference`,
    /// an amount too large for the column `OutOfRange`.
    pub async fn create(&self, invoice: NewInvoice) -> Result<InvoiceDetail, DbError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            INSERT INTO invoices (comp_code, amt, add_date, paid, paid_date)
            VALUES ($1, $2, COALESCE($3, CURRENT_DATE), COALESCE($4, FALSE), $5)
            RETURNING id
            "#,
        )
        .bind(&invoice.comp_code)
        .bind(invoice.amt)
        .bind(invoice.add_date)
        .bind(invoice.paid)
        .bind(invoice.paid_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| DbError::from_constraint(e, "company", &invoice.comp_code))?;

        let id: i32 = row.get("id");
        let detail = fetch_detail(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("invoice", id))?;

        tx.commit().await?;
        Ok(detail)
    }

    /// Apply an amount/payment update.
    ///
    /// The row is locked while the new payment state is computed, and "today"
    /// comes from `CURRENT_DATE` so it matches the `add_date` default.
    pub async fn update(&self, id: i32, update: PaymentUpdate) -> Result<InvoiceDetail, DbError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            SELECT paid, paid_date, CURRENT_DATE AS today
            FROM invoices
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("invoice", id))?;

        let current = PaymentState {
            paid: row.get("paid"),
            paid_date: row.get("paid_date"),
        };
        let today: NaiveDate = row.get("today");
        let next = update.resolve(current, today);

        sqlx::query(
            r#"
            UPDATE invoices
            SET amt = $1, paid = $2, paid_date = $3
            WHERE id = $4
            "#,
        )
        .bind(update.amt)
        .bind(next.paid)
        .bind(next.paid_date)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| DbError::from_constraint(e, "invoice", &id.to_string()))?;

        let detail = fetch_detail(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("invoice", id))?;

        tx.commit().await?;
        Ok(detail)
    }

    pub async fn delete(&self, id: i32) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("invoice", id));
        }
        Ok(())
    }
}

/// Fetch one invoice with its company on any executor (pool or transaction).
async fn fetch_detail<'e, E>(executor: E, id: i32) -> Result<Option<InvoiceDetail>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query(SELECT_DETAIL)
        .bind(id)
        .fetch_optional(executor)
        .await?;

    Ok(row.map(|r| detail_from_row(&r)))
}

fn detail_from_row(r: &PgRow) -> InvoiceDetail {
    InvoiceDetail {
        id: r.get("id"),
        amt: r.get::<Decimal, _>("amt"),
        add_date: r.get("add_date"),
        paid: r.get("paid"),
        paid_date: r.get("paid_date"),
        company: Company {
            code: r.get("code"),
            name: r.get("name"),
            description: r.get("description"),
        },
    }
}
