//! Schema setup for the companies and invoices tables
//!
//! Idempotent: every statement is `IF NOT EXISTS`, so running on every
//! startup is safe. There is no versioning.

use sqlx::PgPool;

/// Create tables and indexes if they are missing
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running BizTime migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS companies (
            code TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS invoices (
            id SERIAL PRIMARY KEY,
            comp_code TEXT NOT NULL REFERENCES companies(code) ON DELETE CASCADE,
            amt NUMERIC(10, 2) NOT NULL,
            add_date DATE NOT NULL DEFAULT CURRENT_DATE,
            paid BOOLEAN NOT NULL DEFAULT FALSE,
            paid_date DATE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_invoices_comp_code ON invoices(comp_code)")
        .execute(pool)
        .await?;

    tracing::info!("BizTime migrations complete");
    Ok(())
}

/// Drop both tables. Used to reset test databases.
pub async fn drop_all(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::warn!("Dropping BizTime tables");
    sqlx::query("DROP TABLE IF EXISTS invoices, companies")
        .execute(pool)
        .await?;
    Ok(())
}
