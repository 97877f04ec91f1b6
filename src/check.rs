//! check command: Check links supplied directly
//!
//! Accepts a YAML links file, free text with bare URLs, stdin, or a single
//! URL. Compact JSON report on stdout.

use crate::collect::{self, UNTITLED_LABEL};
use crate::schema::{CheckResult, LinkRecord};
use crate::validate::{check_links, dedupe_links, CheckConfig};
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Args)]
pub struct CheckArgs {
    /// Links file (YAML list of {label, url} entries, or free text)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Check a single URL
    #[arg(long)]
    pub url: Option<String>,

    /// Read URLs from stdin (one per line)
    #[arg(long)]
    pub stdin: bool,

    /// Parallel link checks
    #[arg(short, long, default_value = "30", value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: u16,

    /// Timeout per request in milliseconds
    #[arg(long, default_value = "25000")]
    pub timeout: u64,
}

/// Compact report (stdout)
#[derive(Debug, Serialize)]
pub struct CheckOutput {
    pub checked: usize,
    pub ok: usize,
    pub failed: usize,
    pub results: Vec<CheckResult>,
}

/// Run the check command
pub async fn run_check(args: CheckArgs) -> Result<()> {
    let links = dedupe_links(get_links(&args).await?);

    if links.is_empty() {
        eprintln!("No links found.");
        std::process::exit(1);
    }

    eprintln!(
        "Checking {} links ({} parallel)...",
        links.len(),
        args.concurrency
    );

    let config = CheckConfig {
        concurrency: args.concurrency as usize,
        timeout: Duration::from_millis(args.timeout),
    };
    let results = check_links(&links, &config).await?;

    let failed = results.iter().filter(|r| r.is_problematic()).count();
    let output = CheckOutput {
        checked: results.len(),
        ok: results.len() - failed,
        failed,
        results,
    };
    println!("{}", serde_json::to_string(&output)?);

    eprintln!("Done: {}/{} OK", output.ok, output.checked);

    Ok(())
}

/// Get links from --url, stdin, or a file
async fn get_links(args: &CheckArgs) -> Result<Vec<LinkRecord>> {
    if let Some(url) = &args.url {
        return Ok(vec![LinkRecord {
            label: UNTITLED_LABEL.to_string(),
            url: url.clone(),
        }]);
    }

    if args.stdin {
        let stdin = io::stdin();
        let links = stdin
            .lock()
            .lines()
            .map_while(Result::ok)
            .filter(|line| line.starts_with("http"))
            .map(|url| LinkRecord {
                label: UNTITLED_LABEL.to_string(),
                url,
            })
            .collect();
        return Ok(links);
    }

    if let Some(file) = &args.file {
        return collect::load_links_file(file).await;
    }

    eprintln!("Usage:");
    eprintln!("  nav-audit check <links.yaml>   Check links from a file");
    eprintln!("  nav-audit check --url <URL>    Check a single URL");
    eprintln!("  nav-audit check --stdin        Read URLs from stdin");
    std::process::exit(1);
}
