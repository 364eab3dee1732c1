//! In-memory ledger for tests and database-less runs
//!
//! Mirrors the Postgres schema's constraints: primary key on company code,
//! foreign key from invoices, cascade on company delete, serial invoice ids.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use super::{DbError, Ledger};
use crate::models::{
    normalize_amount, Company, CompanyChanges, Invoice, InvoiceDetail, InvoiceSummary, NewCompany, NewInvoice,
    PaymentUpdate,
};

#[derive(Debug)]
struct Tables {
    // Vec keeps insertion order, like an unordered SELECT on a fresh heap table
    companies: Vec<Company>,
    invoices: BTreeMap<i32, Invoice>,
    next_invoice_id: i32,
}

impl Tables {
    fn company(&self, code: &str) -> Option<&Company> {
        self.companies.iter().find(|c| c.code == code)
    }

    fn detail(&self, invoice: &Invoice) -> Result<InvoiceDetail, DbError> {
        // The FK guarantees the company exists; a miss means the tables diverged
        let company = self
            .company(&invoice.comp_code)
            .cloned()
            .ok_or_else(|| DbError::not_found("company", &invoice.comp_code))?;
        Ok(invoice.clone().with_company(company))
    }
}

/// Ledger kept in process memory
#[derive(Debug)]
pub struct MemoryLedger {
    tables: RwLock<Tables>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables {
                companies: Vec::new(),
                invoices: BTreeMap::new(),
                next_invoice_id: 1,
            }),
        }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    /// Store an amount as the `NUMERIC(10, 2)` column would.
    fn cents(amt: Decimal) -> Result<Decimal, DbError> {
        normalize_amount(amt).map_err(|e| DbError::OutOfRange {
            message: format!("{} (got {})", e, amt),
        })
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }

    async fn list_companies(&self) -> Result<Vec<Company>, DbError> {
        Ok(self.tables.read().await.companies.clone())
    }

    async fn get_company(&self, code: &str) -> Result<Company, DbError> {
        self.tables
            .read()
            .await
            .company(code)
            .cloned()
            .ok_or_else(|| DbError::not_found("company", code))
    }

    async fn create_company(&self, company: NewCompany) -> Result<Company, DbError> {
        let mut tables = self.tables.write().await;
        if tables.company(&company.code).is_some() {
            return Err(DbError::Duplicate {
                resource: "company",
                id: company.code,
            });
        }

        let company = Company {
            code: company.code,
            name: company.name,
            description: company.description,
        };
        tables.companies.push(company.clone());
        Ok(company)
    }

    async fn update_company(
        &self,
        code: &str,
        changes: CompanyChanges,
    ) -> Result<Company, DbError> {
        let mut tables = self.tables.write().await;
        let company = tables
            .companies
            .iter_mut()
            .find(|c| c.code == code)
            .ok_or_else(|| DbError::not_found("company", code))?;

        company.name = changes.name;
        company.description = changes.description;
        Ok(company.clone())
    }

    async fn delete_company(&self, code: &str) -> Result<(), DbError> {
        let mut tables = self.tables.write().await;
        let before = tables.companies.len();
        tables.companies.retain(|c| c.code != code);
        if tables.companies.len() == before {
            return Err(DbError::not_found("company", code));
        }

        tables.invoices.retain(|_, inv| inv.comp_code != code);
        Ok(())
    }

    async fn list_invoices(&self) -> Result<Vec<InvoiceSummary>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables
            .invoices
            .values()
            .map(|inv| InvoiceSummary {
                id: inv.id,
                comp_code: inv.comp_code.clone(),
            })
            .collect())
    }

    async fn get_invoice(&self, id: i32) -> Result<InvoiceDetail, DbError> {
        let tables = self.tables.read().await;
        let invoice = tables
            .invoices
            .get(&id)
            .ok_or_else(|| DbError::not_found("invoice", id))?;
        tables.detail(invoice)
    }

    async fn create_invoice(&self, invoice: NewInvoice) -> Result<InvoiceDetail, DbError> {
        let mut tables = self.tables.write().await;
        if tables.company(&invoice.comp_code).is_none() {
            return Err(DbError::MissingReference {
                resource: "company",
                id: invoice.comp_code,
            });
        }

        let amt = Self::cents(invoice.amt)?;
        let id = tables.next_invoice_id;
        tables.next_invoice_id += 1;

        let row = Invoice {
            id,
            comp_code: invoice.comp_code,
            amt,
            add_date: invoice.add_date.unwrap_or_else(Self::today),
            paid: invoice.paid.unwrap_or(false),
            paid_date: invoice.paid_date,
        };
        let detail = tables.detail(&row)?;
        tables.invoices.insert(id, row);
        Ok(detail)
    }

    async fn update_invoice(
        &self,
        id: i32,
        update: PaymentUpdate,
    ) -> Result<InvoiceDetail, DbError> {
        let mut tables = self.tables.write().await;
        let invoice = tables
            .invoices
            .get_mut(&id)
            .ok_or_else(|| DbError::not_found("invoice", id))?;

        let amt = Self::cents(update.amt)?;
        let next = update.resolve(invoice.payment_state(), Self::today());
        invoice.amt = amt;
        invoice.paid = next.paid;
        invoice.paid_date = next.paid_date;

        let invoice = invoice.clone();
        tables.detail(&invoice)
    }

    async fn delete_invoice(&self, id: i32) -> Result<(), DbError> {
        self.tables
            .write()
            .await
            .invoices
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DbError::not_found("invoice", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn company(code: &str, name: &str) -> NewCompany {
        NewCompany {
            code: code.into(),
            name: name.into(),
            description: None,
        }
    }

    fn invoice(comp_code: &str) -> NewInvoice {
        NewInvoice {
            comp_code: comp_code.into(),
            amt: dec!(100),
            add_date: None,
            paid: None,
            paid_date: None,
        }
    }

    #[tokio::test]
    async fn duplicate_code_conflicts() {
        let ledger = MemoryLedger::new();
        ledger.create_company(company("IB", "IBM")).await.unwrap();

        let err = ledger.create_company(company("IB", "Ibex")).await.unwrap_err();
        assert!(matches!(err, DbError::Duplicate { .. }));
        assert_eq!(ledger.list_companies().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn companies_keep_insertion_order() {
        let ledger = MemoryLedger::new();
        ledger.create_company(company("zz", "Zed")).await.unwrap();
        ledger.create_company(company("aa", "Aardvark")).await.unwrap();

        let codes: Vec<_> = ledger
            .list_companies()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.code)
            .collect();
        assert_eq!(codes, ["zz", "aa"]);
    }

    #[tokio::test]
    async fn invoice_requires_company() {
        let ledger = MemoryLedger::new();
        let err = ledger.create_invoice(invoice("nope")).await.unwrap_err();
        assert!(matches!(err, DbError::MissingReference { .. }));
        assert!(ledger.list_invoices().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invoice_defaults() {
        let ledger = MemoryLedger::new();
        ledger.create_company(company("apple", "Apple")).await.unwrap();

        let created = ledger.create_invoice(invoice("apple")).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.add_date, MemoryLedger::today());
        assert!(!created.paid);
        assert_eq!(created.paid_date, None);
        assert_eq!(created.company.code, "apple");
    }

    #[tokio::test]
    async fn amounts_stored_like_numeric_column() {
        let ledger = MemoryLedger::new();
        ledger.create_company(company("apple", "Apple")).await.unwrap();

        let created = ledger
            .create_invoice(NewInvoice {
                amt: dec!(0.125),
                ..invoice("apple")
            })
            .await
            .unwrap();
        assert_eq!(created.amt, dec!(0.13));

        let updated = ledger
            .update_invoice(
                created.id,
                PaymentUpdate {
                    amt: dec!(2.345),
                    paid: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.amt, dec!(2.35));
    }

    #[tokio::test]
    async fn oversized_amount_rejected() {
        let ledger = MemoryLedger::new();
        ledger.create_company(company("apple", "Apple")).await.unwrap();

        let err = ledger
            .create_invoice(NewInvoice {
                amt: dec!(1000000000000),
                ..invoice("apple")
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::OutOfRange { .. }));
        assert!(ledger.list_invoices().await.unwrap().is_empty());

        // a failed create doesn't burn an id
        let next = ledger.create_invoice(invoice("apple")).await.unwrap();
        assert_eq!(next.id, 1);
    }

    #[tokio::test]
    async fn ids_are_not_reused() {
        let ledger = MemoryLedger::new();
        ledger.create_company(company("apple", "Apple")).await.unwrap();
        ledger.create_invoice(invoice("apple")).await.unwrap();
        ledger.delete_invoice(1).await.unwrap();

        let next = ledger.create_invoice(invoice("apple")).await.unwrap();
        assert_eq!(next.id, 2);
    }

    #[tokio::test]
    async fn delete_company_cascades_to_invoices() {
        let ledger = MemoryLedger::new();
        ledger.create_company(company("apple", "Apple")).await.unwrap();
        ledger.create_company(company("IB", "IBM")).await.unwrap();
        ledger.create_invoice(invoice("apple")).await.unwrap();
        ledger.create_invoice(invoice("IB")).await.unwrap();

        ledger.delete_company("apple").await.unwrap();

        let remaining = ledger.list_invoices().await.unwrap();
        assert_eq!(
            remaining,
            vec![InvoiceSummary {
                id: 2,
                comp_code: "IB".into()
            }]
        );
    }

    #[tokio::test]
    async fn missing_rows_are_not_found() {
        let ledger = MemoryLedger::new();
        assert!(matches!(
            ledger.delete_company("ghost").await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            ledger.delete_invoice(9).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            ledger
                .update_invoice(
                    9,
                    PaymentUpdate {
                        amt: dec!(1),
                        paid: None
                    }
                )
                .await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn update_applies_payment_transition() {
        let ledger = MemoryLedger::new();
        ledger.create_company(company("apple", "Apple")).await.unwrap();
        ledger.create_invoice(invoice("apple")).await.unwrap();

        let paid = ledger
            .update_invoice(
                1,
                PaymentUpdate {
                    amt: dec!(150),
                    paid: Some(true),
                },
            )
            .await
            .unwrap();
        assert_eq!(paid.amt, dec!(150));
        assert_eq!(paid.paid_date, Some(MemoryLedger::today()));

        let unpaid = ledger
            .update_invoice(
                1,
                PaymentUpdate {
                    amt: dec!(150),
                    paid: Some(false),
                },
            )
            .await
            .unwrap();
        assert!(!unpaid.paid);
        assert_eq!(unpaid.paid_date, None);
    }
}
