// SPDX-License-Identifier: GPL-3.0-only
// SPDX-FileCopyrightText: 2025 OpenOversight contributors

//! Fetching department-dependent choices from the OpenOversight server.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use log::{debug, info};
use url::Url;

use crate::models::choices::{Choice, parse_choices};

/// Parameters of one choices request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChoicesRequest {
    pub endpoint: Url,
    pub department_id: u32,
    pub sworn_only: bool,
    pub timeout: Option<Duration>,
}

impl ChoicesRequest {
    /// Endpoint with the `department_id` (and optional sworn filter) query.
    pub fn url(&self) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("department_id", &self.department_id.to_string());
            if self.sworn_only {
                query.append_pair("is_sworn_officer", "true");
            }
        }
        url
    }
}

/// Perform the request and parse the `[id, label]` pairs.
pub fn fetch_choices(request: &ChoicesRequest) -> Result<Vec<Choice>> {
    let url = request.url();
    debug!("Requesting choices from {url}");

    let client = reqwest::blocking::Client::builder()
        .timeout(request.timeout)
        .build()
        .context("Failed to build HTTP client")?;
    let response = client
        .get(url.clone())
        .send()
        .with_context(|| format!("Request failed: {url}"))?;

    let status = response.status();
    let body = response
        .text()
        .with_context(|| format!("Failed to read response body from {url}"))?;
    if !status.is_success() {
        bail!("{url} returned {status}: {}", body.trim());
    }

    let choices = parse_choices(&body)?;
    info!(
        "Fetched {} choice(s) for department {}",
        choices.len(),
        request.department_id
    );
    Ok(choices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(sworn_only: bool) -> ChoicesRequest {
        ChoicesRequest {
            endpoint: Url::parse("http://localhost:3000/ranks").unwrap(),
            department_id: 7,
            sworn_only,
            timeout: None,
        }
    }

    #[test]
    fn url_carries_department_id() {
        assert_eq!(
            request(false).url().as_str(),
            "http://localhost:3000/ranks?department_id=7"
        );
    }

    #[test]
    fn url_adds_sworn_filter() {
        assert_eq!(
            request(true).url().as_str(),
            "http://localhost:3000/ranks?department_id=7&is_sworn_officer=true"
        );
    }

    #[test]
    fn unreachable_server_is_an_error() {
        let req = ChoicesRequest {
            endpoint: Url::parse("http://127.0.0.1:9/ranks").unwrap(),
            department_id: 1,
            sworn_only: false,
            timeout: Some(Duration::from_secs(2)),
        };
        assert!(fetch_choices(&req).is_err());
    }
}
