// SPDX-License-Identifier: GPL-3.0-only
// SPDX-FileCopyrightText: 2025 OpenOversight contributors

//! Application settings: server endpoints, display limits, and known departments.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use url::Url;

/// Environment variable naming a settings file.
pub const CONFIG_ENV: &str = "OVERSIGHT_FORMS_CONFIG";
/// Environment variable overriding `base_url`.
pub const BASE_URL_ENV: &str = "OPENOVERSIGHT_URL";
/// Settings file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "oversight-forms.json";

/// Department known to the editor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: u32,
    pub name: String,
    /// Label for the department's unique internal identifier (e.g. "Star #"), if any.
    #[serde(default)]
    pub unique_internal_identifier_label: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub ranks_path: String,
    pub jobs_path: String,
    /// No timeout when absent.
    pub request_timeout_secs: Option<u64>,
    /// Characters shown of an incident description before "show more".
    pub description_limit: usize,
    /// Byte budget for rendered description previews.
    pub html_budget: usize,
    /// Anti-forgery token placed in every field group.
    pub csrf_token: String,
    pub departments: Vec<Department>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            ranks_path: "/ranks".to_string(),
            jobs_path: "/ranks".to_string(),
            request_timeout_secs: None,
            description_limit: 300,
            html_budget: 700,
            csrf_token: String::new(),
            departments: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load settings from the environment-selected file, the default file, or defaults.
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(|| {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.exists().then_some(default)
            });
        let base_url = std::env::var(BASE_URL_ENV).ok();
        Self::load_from(path.as_deref(), base_url)
    }

    /// Load settings from `path` (defaults when `None`) and apply a base URL override.
    pub fn load_from(path: Option<&Path>, base_url: Option<String>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
                let config: Self = serde_json::from_str(&content)
                    .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;
                info!("Loaded settings from {}", path.display());
                config
            }
            None => Self::default(),
        };

        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }
        Url::parse(&config.base_url)
            .with_context(|| format!("Invalid base URL: {}", config.base_url))?;

        Ok(config)
    }

    /// Full URL of an endpoint path below `base_url`.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        url_below(&self.base_url, path)
    }
}

/// Join `path` under `base_url`, keeping any path prefix the base carries.
///
/// `https://host/oo` and `/ranks` give `https://host/oo/ranks`.
pub fn url_below(base_url: &str, path: &str) -> Result<Url> {
    let mut base =
        Url::parse(base_url).with_context(|| format!("Invalid base URL: {base_url}"))?;
    if !base.path().ends_with('/') {
        let prefixed = format!("{}/", base.path());
        base.set_path(&prefixed);
    }
    base.join(path.trim_start_matches('/'))
        .with_context(|| format!("Invalid endpoint path: {path}"))
}
