//! Page fetching

use std::time::Duration;

use reqwest::StatusCode;
use tracing::{debug, instrument};

use crate::config::ExtractorConfig;
use crate::error::{ExtractError, Result};

/// Fetch `url` and return its body.
///
/// Only `200 OK` counts as success; any other status is reported as
/// [`ExtractError::HttpStatus`].
#[instrument(skip(config), fields(timeout = config.fetch_timeout))]
pub async fn fetch(url: &str, config: &ExtractorConfig) -> Result<String> {
    let client = reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(u64::from(config.fetch_timeout)))
        .build()?;

    let response = client.get(url).send().await?;
    let status = response.status();
    if status != StatusCode::OK {
        return Err(ExtractError::HttpStatus(status.as_u16()));
    }

    let body = response.text().await?;
    debug!("fetched {} bytes", body.len());
    Ok(body)
}
