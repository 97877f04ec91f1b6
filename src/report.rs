//! Deterministic text report over a finished checking run

use crate::schema::{CheckResult, Tally};

/// Assemble the summary delivered to the webhook.
///
/// Lines: menu item count, total links checked, one line per tally entry
/// (numeric codes ascending, then sentinels), then the problematic section.
/// At most `max_listed` problematic entries are listed, in the order given,
/// with an overflow line for the rest.
pub fn build_report(
    menu_count: usize,
    total_checked: usize,
    tally: &Tally,
    problematic: &[CheckResult],
    max_listed: usize,
) -> String {
    let mut lines = Vec::new();

    lines.push(format!("Menu items: {}", menu_count));
    lines.push(format!("Links checked: {}", total_checked));

    for (key, count) in tally {
        lines.push(format!("{}: {}", key, count));
    }

    lines.push(String::new());
    if problematic.is_empty() {
        lines.push("No problematic links.".to_string());
    } else {
        lines.push("Problematic links:".to_string());
        for result in problematic.iter().take(max_listed) {
            lines.push(format!("- {} ({})", result.url, result.outcome));
        }
        if problematic.len() > max_listed {
            lines.push(format!("...and {} more", problematic.len() - max_listed));
        }
    }

    lines.join("\n")
}
