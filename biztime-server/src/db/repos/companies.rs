//! Company repository
//!
//! - create: plain INSERT, unique violation on `code` becomes `Duplicate`
//! - update/delete: `RETURNING` decides NotFound (no check-then-write)

use sqlx::PgPool;

use crate::db::DbError;
use crate::models::{Company, CompanyChanges, NewCompany};

/// Company repository
pub struct CompanyRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CompanyRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all companies in storage order.
    pub async fn list(&self) -> Result<Vec<Company>, DbError> {
        let companies = sqlx::query_as::<_, Company>(
            "SELECT code, name, description FROM companies",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(companies)
    }

    pub async fn get(&self, code: &str) -> Result<Company, DbError> {
        sqlx::query_as::<_, Company>(
            "SELECT code, name, description FROM companies WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("company", code))
    }

    pub async fn create(&self, company: NewCompany) -> Result<Company, DbError> {
        sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (code, name, description)
            VALUES ($1, $2, $3)
            RETURNING code, name, description
            "#,
        )
        .bind(&company.code)
        .bind(&company.name)
        .bind(company.description.as_deref())
        .fetch_one(self.pool)
        .await
        .map_err(|e| DbError::from_constraint(e, "company", &company.code))
    }

    /// Overwrite name and description.
    pub async fn update(&self, code: &str, changes: CompanyChanges) -> Result<Company, DbError> {
        sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies
            SET name = $1, description = $2
            WHERE code = $3
            RETURNING code, name, description
            "#,
        )
        .bind(&changes.name)
        .bind(changes.description.as_deref())
        .bind(code)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("company", code))
    }

    /// Delete a company; its invoices go with it (ON DELETE CASCADE).
    pub async fn delete(&self, code: &str) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM companies WHERE code = $1")
            .bind(code)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("company", code));
        }
        Ok(())
    }
}
