//! Link collection: menu scraping and link files
//!
//! The pipeline only needs a set of (label, URL) pairs with non-empty URLs;
//! where they come from is interchangeable. A bad menu item is logged and
//! skipped, it never aborts the run.

use crate::schema::LinkRecord;
use anyhow::{anyhow, bail, Context, Result};
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::path::Path;
use url::Url;

/// Label used when an anchor has no text
pub const UNTITLED_LABEL: &str = "(untitled)";

/// Links harvested from a page's navigation menu
#[derive(Debug, Clone)]
pub struct MenuLinks {
    /// Number of `li` items under the menu container
    pub item_count: usize,
    /// Deduplicated (label, URL) pairs
    pub links: Vec<LinkRecord>,
}

/// Fetch a page and harvest the links under its menu container
pub async fn fetch_menu_links(
    client: &Client,
    page_url: &str,
    menu_selector: &str,
) -> Result<MenuLinks> {
    let response = client
        .get(page_url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch {}", page_url))?;

    let status = response.status();
    if !status.is_success() {
        bail!("Page returned HTTP {}: {}", status.as_u16(), page_url);
    }

    let html = response
        .text()
        .await
        .with_context(|| format!("Failed to read page body: {}", page_url))?;

    parse_menu_links(&html, page_url, menu_selector)
}

/// Harvest (label, URL) pairs from the first element matching `menu_selector`.
///
/// Relative hrefs are resolved against `page_url`; non-http(s) targets are
/// dropped; an empty anchor text becomes `(untitled)`.
pub fn parse_menu_links(html: &str, page_url: &str, menu_selector: &str) -> Result<MenuLinks> {
    let container_sel = Selector::parse(menu_selector)
        .map_err(|e| anyhow!("Invalid menu selector {:?}: {}", menu_selector, e))?;
    let item_sel = Selector::parse("li").unwrap();
    let anchor_sel = Selector::parse("a[href]").unwrap();

    let base = Url::parse(page_url).with_context(|| format!("Invalid page URL: {}", page_url))?;

    let doc = Html::parse_document(html);
    let container = doc
        .select(&container_sel)
        .next()
        .ok_or_else(|| anyhow!("Menu container not found: {}", menu_selector))?;

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    let mut item_count = 0;

    for item in container.select(&item_sel) {
        item_count += 1;
        for anchor in item.select(&anchor_sel) {
            let href = match anchor.value().attr("href") {
                Some(href) => href,
                None => continue,
            };
            let target = match base.join(href) {
                Ok(url) => url,
                Err(e) => {
                    eprintln!("Skipping unresolvable href {:?}: {}", href, e);
                    continue;
                }
            };
            if target.scheme() != "http" && target.scheme() != "https" {
                continue;
            }

            let label = anchor.text().collect::<String>().trim().to_string();
            let record = LinkRecord {
                label: if label.is_empty() {
                    UNTITLED_LABEL.to_string()
                } else {
                    label
                },
                url: target.to_string(),
            };
            if seen.insert(record.clone()) {
                links.push(record);
            }
        }
    }

    Ok(MenuLinks { item_count, links })
}

/// Load link records from a YAML links file, or scan any other file for
/// bare URLs
pub async fn load_links_file(path: &Path) -> Result<Vec<LinkRecord>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if !is_yaml {
        return Ok(links_from_text(&content));
    }

    let records: Vec<LinkRecord> = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse links file: {}", path.display()))?;

    let total = records.len();
    let records: Vec<LinkRecord> = records.into_iter().filter(|r| !r.url.is_empty()).collect();
    if records.len() < total {
        eprintln!("Skipped {} record(s) with an empty URL", total - records.len());
    }

    Ok(records)
}

/// Extract bare URLs from text content, first occurrence wins
pub fn links_from_text(content: &str) -> Vec<LinkRecord> {
    let re = Regex::new(r#"https?://[^\s\)>\]"'`]+"#).unwrap();

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for mat in re.find_iter(content) {
        let url = mat.as_str();
        // Clean trailing punctuation
        let url = url.trim_end_matches(|c| matches!(c, ',' | '.' | ')' | ']' | ';' | ':'));

        if seen.insert(url.to_string()) {
            links.push(LinkRecord {
                label: UNTITLED_LABEL.to_string(),
                url: url.to_string(),
            });
        }
    }

    links
}
