//! Route handlers organized by resource

use serde::Serialize;

pub mod companies;
pub mod health;
pub mod invoices;

/// Confirmation body for DELETE endpoints: `{"status": "deleted"}`
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub status: &'static str,
}

impl Default for Deleted {
    fn default() -> Self {
        Self { status: "deleted" }
    }
}
