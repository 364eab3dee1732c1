//! HTTP server command
//!
//! Runs the BizTime API against Postgres, or fully in memory with
//! `--in-memory`.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use biztime_server::db::{migrations, seed};
use biztime_server::{run_server, Ledger, MemoryLedger, ServerConfig};

use crate::config::{DatabaseArgs, Environment};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Keep companies and invoices in process memory instead of Postgres
    #[arg(long)]
    pub in_memory: bool,

    /// Don't create missing tables on startup
    #[arg(long, conflicts_with = "in_memory")]
    pub skip_migrations: bool,

    /// Insert sample companies and invoices before serving
    #[arg(long)]
    pub seed: bool,

    #[command(flatten)]
    pub db: DatabaseArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, env: Environment) -> Result<()> {
    let ledger: Arc<dyn Ledger> = if args.in_memory {
        tracing::warn!("Running with in-memory storage; data is lost on exit");
        Arc::new(MemoryLedger::new())
    } else {
        let ledger = args.db.connect(env).await?;
        if !args.skip_migrations {
            migrations::run(ledger.pool())
                .await
                .context("Failed to run migrations")?;
        }
        Arc::new(ledger)
    };

    if args.seed {
        seed::run(ledger.as_ref())
            .await
            .context("Failed to seed sample data")?;
    }

    tracing::info!("Starting BizTime server on {}", args.bind);

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
    };

    // Blocks until shutdown
    run_server(ledger, config).await.context("Server error")?;

    Ok(())
}
