//! Domain models with validation at construction
//!
//! Request input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod company;
pub mod invoice;

pub use validation::{required, ValidationError};
pub use company::{Company, CompanyChanges, CompanyName, NewCompany};
pub use invoice::{normalize_amount, Invoice, InvoiceDetail, InvoiceSummary, NewInvoice, PaymentState, PaymentUpdate};
