//! biztime-server: companies and invoices over HTTP
//!
//! A small bookkeeping API. Route handlers translate REST calls into
//! parameterized SQL through the [`db::Ledger`] capability and shape the
//! results as JSON.

pub mod db;
pub mod http;
pub mod models;

pub use db::{DbError, Ledger, MemoryLedger, PgLedger};
pub use http::{build_router, run_server, ApiError, AppState, ServerConfig};
