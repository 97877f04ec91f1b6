//! Bounded-concurrency link checking and result aggregation
//!
//! One GET per unique link, no retries. Results come back in completion
//! order and are drained by a single consumer; the tally is a summation
//! pass over the full result set after the join point.

use crate::schema::{CheckResult, LinkRecord, Outcome, Tally};
use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use reqwest::redirect::Policy;
use reqwest::Client;
use std::collections::HashSet;
use std::time::Duration;

pub(crate) const USER_AGENT: &str = concat!("nav-audit/", env!("CARGO_PKG_VERSION"));

const MAX_REDIRECTS: usize = 10;

/// Configuration for a checking run
pub struct CheckConfig {
    /// Parallel checks in flight (default 30)
    pub concurrency: usize,
    /// Per-request timeout (default 25s)
    pub timeout: Duration,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            concurrency: 30,
            timeout: Duration::from_secs(25),
        }
    }
}

/// Build the HTTP client used for link checks
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")
}

/// Drop repeated (label, URL) pairs, first occurrence wins
pub fn dedupe_links(links: Vec<LinkRecord>) -> Vec<LinkRecord> {
    let mut seen = HashSet::new();
    links
        .into_iter()
        .filter(|link| seen.insert(link.clone()))
        .collect()
}

/// Check every link and return one result per link.
///
/// `links` is expected to be deduplicated. Completion order across links is
/// unspecified; the call returns only after the last check finishes.
pub async fn check_links(links: &[LinkRecord], config: &CheckConfig) -> Result<Vec<CheckResult>> {
    let client = build_client(config.timeout)?;
    let concurrency = config.concurrency.max(1);

    let mut checks = stream::iter(links.to_vec())
        .map(|link| {
            let client = client.clone();
            async move { check_one(&client, link).await }
        })
        .buffer_unordered(concurrency);

    let mut results = Vec::with_capacity(links.len());
    while let Some(result) = checks.next().await {
        eprintln!("  {}: {}", result.outcome, truncate(&result.url, 60));
        results.push(result);
    }

    Ok(results)
}

async fn check_one(client: &Client, link: LinkRecord) -> CheckResult {
    let outcome = classify(client.get(&link.url).send().await);
    CheckResult {
        label: link.label,
        url: link.url,
        outcome,
    }
}

/// Map a request result to an outcome: timeout, then any other transport
/// failure, then the status code
fn classify(response: Result<reqwest::Response, reqwest::Error>) -> Outcome {
    match response {
        Ok(resp) => classify_status(resp.status().as_u16()),
        Err(err) if err.is_timeout() => Outcome::Timeout,
        Err(err) => Outcome::Error {
            message: err.to_string(),
        },
    }
}

fn classify_status(code: u16) -> Outcome {
    if code == 404 {
        Outcome::NotFound { code }
    } else if code >= 500 {
        Outcome::ServerError { code }
    } else {
        Outcome::Ok { code }
    }
}

/// Count results per outcome key
pub fn tally_results(results: &[CheckResult]) -> Tally {
    let mut tally = Tally::new();
    for result in results {
        *tally.entry(result.outcome.key()).or_insert(0) += 1;
    }
    tally
}

/// Problematic results (everything but `Ok`), sorted by URL then label so
/// the report order does not depend on completion order
pub fn problematic_results(results: &[CheckResult]) -> Vec<CheckResult> {
    let mut problematic: Vec<CheckResult> = results
        .iter()
        .filter(|r| r.is_problematic())
        .cloned()
        .collect();
    problematic.sort_by(|a, b| a.url.cmp(&b.url).then_with(|| a.label.cmp(&b.label)));
    problematic
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}...", &s[..max - 3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::OutcomeKey;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn record(label: &str, url: String) -> LinkRecord {
        LinkRecord {
            label: label.to_string(),
            url,
        }
    }

    fn result(url: &str, outcome: Outcome) -> CheckResult {
        CheckResult {
            label: "x".to_string(),
            url: url.to_string(),
            outcome,
        }
    }

    async fn serve_status(server: &MockServer, route: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status))
            .mount(server)
            .await;
    }

    #[test]
    fn test_classify_status_boundaries() {
        assert_eq!(classify_status(200), Outcome::Ok { code: 200 });
        assert_eq!(classify_status(301), Outcome::Ok { code: 301 });
        assert_eq!(classify_status(403), Outcome::Ok { code: 403 });
        assert_eq!(classify_status(404), Outcome::NotFound { code: 404 });
        assert_eq!(classify_status(500), Outcome::ServerError { code: 500 });
        assert_eq!(classify_status(503), Outcome::ServerError { code: 503 });
    }

    #[test]
    fn test_dedupe_links() {
        let links = vec![
            record("Home", "http://x/a".to_string()),
            record("Home", "http://x/a".to_string()),
            record("Catalog", "http://x/a".to_string()),
            record("Home", "http://x/b".to_string()),
        ];
        let unique = dedupe_links(links);
        assert_eq!(unique.len(), 3);
        assert_eq!(unique[0].label, "Home");
        assert_eq!(unique[0].url, "http://x/a");
    }

    #[test]
    fn test_tally_sums_to_result_count() {
        let results = vec![
            result("http://x/a", Outcome::Ok { code: 200 }),
            result("http://x/b", Outcome::Ok { code: 200 }),
            result("http://x/c", Outcome::NotFound { code: 404 }),
            result("http://x/d", Outcome::Timeout),
            result(
                "http://x/e",
                Outcome::Error {
                    message: "dns".to_string(),
                },
            ),
        ];
        let tally = tally_results(&results);
        assert_eq!(tally.values().sum::<usize>(), results.len());
        assert_eq!(tally[&OutcomeKey::Code(200)], 2);
        assert_eq!(tally[&OutcomeKey::Code(404)], 1);
        assert_eq!(tally[&OutcomeKey::Timeout], 1);
        assert_eq!(tally[&OutcomeKey::Error], 1);
    }

    #[test]
    fn test_problematic_sorted_by_url() {
        let results = vec![
            result("http://x/c", Outcome::ServerError { code: 500 }),
            result("http://x/a", Outcome::Ok { code: 200 }),
            result("http://x/b", Outcome::NotFound { code: 404 }),
            result("http://x/d", Outcome::Timeout),
        ];
        let problematic = problematic_results(&results);
        let urls: Vec<&str> = problematic.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["http://x/b", "http://x/c", "http://x/d"]);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a very long string", 10), "this is...");
    }

    #[tokio::test]
    async fn test_status_code_classification() {
        let server = MockServer::start().await;
        serve_status(&server, "/ok", 200).await;
        serve_status(&server, "/moved", 301).await;
        serve_status(&server, "/forbidden", 403).await;
        serve_status(&server, "/missing", 404).await;
        serve_status(&server, "/boom", 500).await;
        serve_status(&server, "/unavailable", 503).await;

        let links: Vec<LinkRecord> = ["/ok", "/moved", "/forbidden", "/missing", "/boom", "/unavailable"]
            .iter()
            .map(|route| record(route, format!("{}{}", server.uri(), route)))
            .collect();

        let config = CheckConfig {
            concurrency: 4,
            timeout: Duration::from_secs(5),
        };
        let results = check_links(&links, &config).await.unwrap();
        assert_eq!(results.len(), links.len());

        let outcome = |route: &str| {
            results
                .iter()
                .find(|r| r.url.ends_with(route))
                .unwrap()
                .outcome
                .clone()
        };
        assert_eq!(outcome("/ok"), Outcome::Ok { code: 200 });
        assert_eq!(outcome("/moved"), Outcome::Ok { code: 301 });
        assert_eq!(outcome("/forbidden"), Outcome::Ok { code: 403 });
        assert_eq!(outcome("/missing"), Outcome::NotFound { code: 404 });
        assert_eq!(outcome("/boom"), Outcome::ServerError { code: 500 });
        assert_eq!(outcome("/unavailable"), Outcome::ServerError { code: 503 });
    }

    #[tokio::test]
    async fn test_timeout_classified() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let config = CheckConfig {
            concurrency: 1,
            timeout: Duration::from_millis(100),
        };
        let links = vec![record("Slow", format!("{}/slow", server.uri()))];
        let results = check_links(&links, &config).await.unwrap();
        assert_eq!(results[0].outcome, Outcome::Timeout);
    }

    #[tokio::test]
    async fn test_connection_failure_classified() {
        // port 1 is unassigned, the connection is refused without any network
        let config = CheckConfig {
            concurrency: 1,
            timeout: Duration::from_secs(2),
        };
        let links = vec![record("Dead", "http://127.0.0.1:1/".to_string())];
        let results = check_links(&links, &config).await.unwrap();
        assert!(matches!(results[0].outcome, Outcome::Error { .. }));
    }

    #[tokio::test]
    async fn test_one_result_per_unique_link() {
        let server = MockServer::start().await;
        serve_status(&server, "/page", 200).await;

        let links: Vec<LinkRecord> = (0..6)
            .map(|i| record(&format!("Item {}", i), format!("{}/page?n={}", server.uri(), i)))
            .collect();

        let config = CheckConfig {
            concurrency: 3,
            timeout: Duration::from_secs(5),
        };
        let results = check_links(&links, &config).await.unwrap();
        assert_eq!(results.len(), 6);

        let tally = tally_results(&results);
        assert_eq!(tally.values().sum::<usize>(), 6);
    }
}
