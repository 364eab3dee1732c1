//! Command implementations for the biztime CLI

pub mod migrate;
pub mod seed;
pub mod serve;

pub use migrate::run_migrate;
pub use seed::run_seed;
pub use serve::run_serve;
