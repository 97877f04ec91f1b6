//! Webhook delivery of the finished report

use crate::validate::USER_AGENT;
use serde_json::json;
use thiserror::Error;

/// Why a report failed to reach the webhook
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("webhook returned HTTP {0}")]
    Status(u16),
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// POST the report to the webhook as `{"text": ...}`.
///
/// Only a 200 response counts as delivered. Callers log the error and move
/// on; delivery is single-shot and never affects the run's outcome.
pub async fn post_report(webhook_url: &str, text: &str) -> Result<(), NotifyError> {
    let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

    let response = client
        .post(webhook_url)
        .json(&json!({ "text": text }))
        .send()
        .await?;

    match response.status().as_u16() {
        200 => Ok(()),
        code => Err(NotifyError::Status(code)),
    }
}
