//! Sample data command

use anyhow::{Context, Result};
use clap::Parser;

use biztime_server::db::{migrations, seed};

use crate::config::{DatabaseArgs, Environment};

/// Arguments for the seed command
#[derive(Parser, Debug)]
pub struct SeedArgs {
    #[command(flatten)]
    pub db: DatabaseArgs,
}

pub async fn run_seed(args: SeedArgs, env: Environment) -> Result<()> {
    let ledger = args.db.connect(env).await?;
    migrations::run(ledger.pool())
        .await
        .context("Failed to run migrations")?;

    let report = seed::run(&ledger).await.context("Failed to seed sample data")?;
    if report.is_empty() {
        println!("Companies already present; nothing seeded");
    } else {
        println!(
            "Seeded {} companies and {} invoices",
            report.companies, report.invoices
        );
    }
    Ok(())
}
