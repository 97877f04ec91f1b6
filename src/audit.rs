//! audit command: Collect menu links, check them, deliver a summary
//!
//! The report goes to the webhook when one is configured; stdout carries
//! the report text, or structured JSON with `--json`.

use crate::collect;
use crate::notify;
use crate::report::build_report;
use crate::schema::CheckResult;
use crate::validate::{build_client, check_links, dedupe_links, problematic_results, tally_results, CheckConfig};
use anyhow::Result;
use chrono::Utc;
use clap::Args;
use serde::Serialize;
use std::time::Duration;

#[derive(Args)]
pub struct AuditArgs {
    /// Page whose navigation menu is audited
    #[arg(value_name = "URL")]
    pub site: String,

    /// CSS selector for the menu container
    #[arg(long, default_value = "nav")]
    pub menu: String,

    /// Webhook endpoint for the report
    #[arg(long, env = "NAV_AUDIT_WEBHOOK")]
    pub webhook: Option<String>,

    /// Parallel link checks
    #[arg(short, long, default_value = "30", value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: u16,

    /// Timeout per request in milliseconds
    #[arg(long, default_value = "25000")]
    pub timeout: u64,

    /// Maximum problematic links listed in the report
    #[arg(long, default_value = "20")]
    pub max_listed: usize,

    /// Build the report but do not deliver it
    #[arg(long)]
    pub dry_run: bool,

    /// Output structured JSON instead of the text report
    #[arg(long)]
    pub json: bool,
}

/// One tally line of the JSON output
#[derive(Debug, Serialize)]
pub struct TallyEntry {
    pub key: String,
    pub count: usize,
}

/// Structured output for --json
#[derive(Debug, Serialize)]
pub struct AuditOutput {
    pub menu_items: usize,
    pub checked: usize,
    pub tally: Vec<TallyEntry>,
    pub problematic: Vec<CheckResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered: Option<bool>,
    pub timestamp: String,
}

/// Run the audit command
pub async fn run_audit(args: AuditArgs) -> Result<()> {
    let timeout = Duration::from_millis(args.timeout);
    let client = build_client(timeout)?;

    eprintln!("Collecting menu links from {}", args.site);
    let menu = collect::fetch_menu_links(&client, &args.site, &args.menu).await?;
    let links = dedupe_links(menu.links);

    eprintln!(
        "Found {} menu items, checking {} unique links ({} parallel)...",
        menu.item_count,
        links.len(),
        args.concurrency
    );

    let config = CheckConfig {
        concurrency: args.concurrency as usize,
        timeout,
    };
    let results = check_links(&links, &config).await?;

    let tally = tally_results(&results);
    let problematic = problematic_results(&results);
    let report = build_report(
        menu.item_count,
        results.len(),
        &tally,
        &problematic,
        args.max_listed,
    );

    let delivered = deliver(&args, &report).await;
    let ok_count = results.len() - problematic.len();

    if args.json {
        let output = AuditOutput {
            menu_items: menu.item_count,
            checked: results.len(),
            tally: tally
                .iter()
                .map(|(key, count)| TallyEntry {
                    key: key.to_string(),
                    count: *count,
                })
                .collect(),
            problematic,
            delivered,
            timestamp: Utc::now().to_rfc3339(),
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{}", report);
    }

    eprintln!("Done: {}/{} OK", ok_count, results.len());

    Ok(())
}

/// Deliver the report if a webhook is configured; failures are logged and
/// never fail the run
async fn deliver(args: &AuditArgs, report: &str) -> Option<bool> {
    let webhook = match args.webhook.as_deref() {
        Some(url) => url,
        None => {
            eprintln!("No webhook configured - report not delivered");
            return None;
        }
    };

    if args.dry_run {
        eprintln!("Dry run - report not delivered");
        return None;
    }

    match notify::post_report(webhook, report).await {
        Ok(()) => {
            eprintln!("Report delivered to webhook");
            Some(true)
        }
        Err(e) => {
            eprintln!("Webhook delivery failed: {}", e);
            Some(false)
        }
    }
}
