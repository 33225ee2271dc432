// SPDX-License-Identifier: GPL-3.0-only
// SPDX-FileCopyrightText: 2025 OpenOversight contributors

//! Uploading officer and department photos to the OpenOversight server.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};
use reqwest::header::ACCEPT;
use url::Url;

/// File extensions the server accepts as images.
pub const ACCEPTED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];
/// Shown when the server answers with something other than a JSON error.
pub const GENERIC_FAILURE: &str = "Upload failed.";
/// Header carrying the anti-forgery token.
pub const CSRF_HEADER: &str = "X-CSRF-TOKEN";

/// Server path receiving uploads for a department, optionally tagged to one officer.
pub fn upload_path(department_id: u32, officer_id: Option<u32>) -> String {
    match officer_id {
        Some(officer_id) => format!("/upload/department/{department_id}/officer/{officer_id}"),
        None => format!("/upload/department/{department_id}"),
    }
}

/// Whether `path` has one of the accepted image extensions.
pub fn is_accepted(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .is_some_and(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()))
}

/// Text shown next to a file whose upload was rejected.
///
/// JSON bodies contribute their `error` field; HTML error pages and bodies
/// without usable text collapse to [`GENERIC_FAILURE`].
pub fn upload_error_text(body: &str) -> String {
    let text = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => map
            .get("error")
            .and_then(|e| e.as_str())
            .unwrap_or_default()
            .to_string(),
        Ok(serde_json::Value::String(text)) => text,
        _ => body.to_string(),
    };
    let text = text.trim();
    if text.is_empty() || text.starts_with("<!DOCTYPE") {
        GENERIC_FAILURE.to_string()
    } else {
        text.to_string()
    }
}

/// Parameters of one upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadRequest {
    pub endpoint: Url,
    pub file: PathBuf,
    pub csrf_token: String,
    pub timeout: Option<Duration>,
}

/// How the server answered an upload that reached it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadOutcome {
    Accepted(String),
    Rejected(String),
}

/// POST `request.file` as the multipart `file` field.
///
/// Transport failures are errors; answers from the server, successful or not,
/// are an [`UploadOutcome`].
pub fn upload_image(request: &UploadRequest) -> Result<UploadOutcome> {
    let url = &request.endpoint;
    let form = reqwest::blocking::multipart::Form::new()
        .file("file", &request.file)
        .with_context(|| format!("Failed to read {}", request.file.display()))?;

    let client = reqwest::blocking::Client::builder()
        .timeout(request.timeout)
        .build()
        .context("Failed to build HTTP client")?;
    let response = client
        .post(url.clone())
        .header(ACCEPT, "application/json")
        .header(CSRF_HEADER, request.csrf_token.as_str())
        .multipart(form)
        .send()
        .with_context(|| format!("Upload request failed: {url}"))?;

    let status = response.status();
    let body = response
        .text()
        .with_context(|| format!("Failed to read response body from {url}"))?;
    if !status.is_success() {
        let text = upload_error_text(&body);
        warn!(
            "Upload of {} rejected with {status}: {text}",
            request.file.display()
        );
        return Ok(UploadOutcome::Rejected(text));
    }

    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("success").and_then(|s| s.as_str()).map(str::to_string))
        .unwrap_or_else(|| "Success!".to_string());
    info!("Uploaded {} to {url}", request.file.display());
    Ok(UploadOutcome::Accepted(message))
}
