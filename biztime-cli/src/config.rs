//! Database selection for the biztime binary
//!
//! `--env test` (or `BIZTIME_ENV=test`) points every command at the test
//! database so test runs never touch development data.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use biztime_server::db::DEFAULT_MAX_CONNECTIONS;
use biztime_server::PgLedger;

const DEFAULT_DEV_URL: &str = "postgres://localhost/biztime";
const DEFAULT_TEST_URL: &str = "postgres://localhost/biztime_test";
const TEST_SUFFIX: &str = "_test";

/// Which database a command runs against
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Test,
}

/// Connection options shared by every database command
#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// Development database URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Test database URL (default: DATABASE_URL with `_test` appended to the name)
    #[arg(long, env = "TEST_DATABASE_URL")]
    pub test_database_url: Option<String>,

    /// Maximum pooled connections
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,
}

impl DatabaseArgs {
    /// Pick the connection string for `env`.
    pub fn resolve_url(&self, env: Environment) -> String {
        match env {
            Environment::Development => self
                .database_url
                .clone()
                .unwrap_or_else(|| DEFAULT_DEV_URL.to_owned()),
            Environment::Test => match (&self.test_database_url, &self.database_url) {
                (Some(url), _) => url.clone(),
                (None, Some(dev)) => with_test_suffix(dev),
                (None, None) => DEFAULT_TEST_URL.to_owned(),
            },
        }
    }

    /// Open a pool for `env` and wrap it as a ledger.
    pub async fn connect(&self, env: Environment) -> Result<PgLedger> {
        let url = self.resolve_url(env);
        tracing::info!(?env, max_connections = self.max_connections, "Connecting to database");

        PgLedger::connect(&url, self.max_connections)
            .await
            .context("Failed to connect to database")
    }
}

/// Append `_test` to the database name, keeping any query string.
fn with_test_suffix(url: &str) -> String {
    let (base, query) = match url.find('?') {
        Some(idx) => url.split_at(idx),
        None => (url, ""),
    };

    if base.ends_with(TEST_SUFFIX) {
        return url.to_owned();
    }
    format!("{}{}{}", base, TEST_SUFFIX, query)
}
