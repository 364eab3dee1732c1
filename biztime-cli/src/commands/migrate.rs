//! Schema command: create (or recreate) the companies and invoices tables

use anyhow::{Context, Result};
use clap::Parser;

use biztime_server::db::migrations;

use crate::config::{DatabaseArgs, Environment};

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Drop both tables first (all data is lost)
    #[arg(long)]
    pub reset: bool,

    #[command(flatten)]
    pub db: DatabaseArgs,
}

pub async fn run_migrate(args: MigrateArgs, env: Environment) -> Result<()> {
    let ledger = args.db.connect(env).await?;

    if args.reset {
        migrations::drop_all(ledger.pool())
            .await
            .context("Failed to drop tables")?;
    }
    migrations::run(ledger.pool())
        .await
        .context("Failed to run migrations")?;

    println!("Schema ready ({:?})", env);
    Ok(())
}
