//! Sample data: two companies and four invoices

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{DbError, Ledger};
use crate::models::{NewCompany, NewInvoice};

/// What a seed run inserted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub companies: usize,
    pub invoices: usize,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        self.companies == 0 && self.invoices == 0
    }
}

fn companies() -> Vec<NewCompany> {
    vec![
        NewCompany {
            code: "apple".into(),
            name: "Apple Computer".into(),
            description: Some("Maker of OSX.".into()),
        },
        NewCompany {
            code: "ibm".into(),
            name: "IBM".into(),
            description: Some("Big blue.".into()),
        },
    ]
}

fn invoices() -> Vec<NewInvoice> {
    let unpaid = |comp_code: &str, amt: i64| NewInvoice {
        comp_code: comp_code.into(),
        amt: Decimal::from(amt),
        add_date: None,
        paid: Some(false),
        paid_date: None,
    };

    vec![
        unpaid("apple", 100),
        unpaid("apple", 200),
        NewInvoice {
            comp_code: "apple".into(),
            amt: Decimal::from(300),
            add_date: None,
            paid: Some(true),
            paid_date: NaiveDate::from_ymd_opt(2018, 1, 1),
        },
        unpaid("ibm", 400),
    ]
}

/// Insert the sample data unless the ledger already holds companies.
pub async fn run(ledger: &dyn Ledger) -> Result<SeedReport, DbError> {
    if !ledger.list_companies().await?.is_empty() {
        tracing::warn!("Ledger already has companies, skipping seed");
        return Ok(SeedReport::default());
    }

    let mut report = SeedReport::default();
    for company in companies() {
        ledger.create_company(company).await?;
        report.companies += 1;
    }
    for invoice in invoices() {
        ledger.create_invoice(invoice).await?;
        report.invoices += 1;
    }

    tracing::info!(
        companies = report.companies,
        invoices = report.invoices,
        "Seed data inserted"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryLedger;

    #[tokio::test]
    async fn seeds_empty_ledger() {
        let ledger = MemoryLedger::new();
        let report = run(&ledger).await.unwrap();
        assert_eq!(
            report,
            SeedReport {
                companies: 2,
                invoices: 4
            }
        );

        let paid = ledger.get_invoice(3).await.unwrap();
        assert!(paid.paid);
        assert_eq!(paid.paid_date, NaiveDate::from_ymd_opt(2018, 1, 1));
    }

    #[tokio::test]
    async fn second_run_is_skipped() {
        let ledger = MemoryLedger::new();
        run(&ledger).await.unwrap();

        let report = run(&ledger).await.unwrap();
        assert!(report.is_empty());
        assert_eq!(ledger.list_invoices().await.unwrap().len(), 4);
    }
}
