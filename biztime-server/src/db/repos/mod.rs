//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Single-invoice reads JOIN the company (no N+1)
//! - Rely on DB constraints and classify violations (no check-then-insert)
//! - Transactions for multi-step operations

pub mod companies;
pub mod invoices;

pub use companies::CompanyRepo;
pub use invoices::InvoiceRepo;
