//! nav-audit: site navigation link auditing
//!
//! Collects the links under a page's navigation menu, checks each one's
//! HTTP reachability with bounded concurrency, and delivers a summary
//! report to a webhook.

pub mod audit;
pub mod check;
pub mod collect;
pub mod notify;
pub mod report;
pub mod schema;
pub mod validate;

pub use report::build_report;
pub use schema::{CheckResult, LinkRecord, Outcome, OutcomeKey, Tally};
pub use validate::{check_links, dedupe_links, problematic_results, tally_results, CheckConfig};
