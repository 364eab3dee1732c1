//! Database layer - connection pool, schema, and the ledger capability
//!
//! Handlers never touch a pool directly. They receive an `Arc<dyn Ledger>`
//! through application state; `PgLedger` backs it with Postgres and
//! `MemoryLedger` with in-process tables carrying the same constraints.

pub mod error;
pub mod ledger;
pub mod memory;
pub mod migrations;
pub mod repos;
pub mod seed;

pub use error::DbError;
pub use ledger::{Ledger, PgLedger, DEFAULT_MAX_CONNECTIONS};
pub use memory::MemoryLedger;
