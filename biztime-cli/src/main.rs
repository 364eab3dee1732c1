//! biztime CLI - company and invoice ledger over HTTP
//!
//! Subcommands:
//! - `serve`: run the JSON API (Postgres, or in memory with `--in-memory`)
//! - `migrate`: create the companies and invoices tables
//! - `seed`: insert the sample companies and invoices

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

use commands::migrate::MigrateArgs;
use commands::seed::SeedArgs;
use commands::serve::ServeArgs;
use config::Environment;
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "biztime",
    author,
    version,
    about = "Track companies and the invoices billed to them",
    long_about = "A small JSON API over two related tables: companies, keyed by a short code, \
                  and the invoices issued against them."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces over OTLP (requires the `telemetry` feature)
    #[arg(long, global = true)]
    otel: bool,

    /// Database environment to use
    #[arg(long, global = true, value_enum, env = "BIZTIME_ENV", default_value = "development")]
    env: Environment,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(ServeArgs),
    /// Create the database schema
    Migrate(MigrateArgs),
    /// Insert sample companies and invoices
    Seed(SeedArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init(&TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
    })?;

    let result = match cli.command {
        Commands::Serve(args) => commands::run_serve(args, cli.env).await,
        Commands::Migrate(args) => commands::run_migrate(args, cli.env).await,
        Commands::Seed(args) => commands::run_seed(args, cli.env).await,
    };

    tracing_setup::shutdown_otel();
    result
}
