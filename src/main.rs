//! nav-audit CLI
//!
//! Audits a site's navigation links and reports over a webhook.

use anyhow::Result;
use clap::{Parser, Subcommand};

use nav_audit::audit::{run_audit, AuditArgs};
use nav_audit::check::{run_check, CheckArgs};

#[derive(Parser)]
#[command(name = "nav-audit")]
#[command(version)]
#[command(about = "Audit a site's navigation links and report over a webhook")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect menu links from a page, check them, deliver a summary
    Audit(AuditArgs),
    /// Check links from a file, URL, or stdin
    Check(CheckArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Audit(args) => run_audit(args).await,
        Commands::Check(args) => run_check(args).await,
    }
}
