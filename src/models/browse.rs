// SPDX-License-Identifier: GPL-3.0-only
// SPDX-FileCopyrightText: 2025 OpenOversight contributors

//! Department roster URLs carrying the current browse filters.

use anyhow::Result;
use url::Url;

use crate::config::url_below;
use crate::models::choices::NOT_SURE;

/// Filters applied when browsing a department's officers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrowseFilters {
    pub race: String,
    pub gender: String,
    pub rank: String,
    pub min_age: u8,
    pub max_age: u8,
}

impl Default for BrowseFilters {
    fn default() -> Self {
        Self {
            race: NOT_SURE.to_string(),
            gender: NOT_SURE.to_string(),
            rank: NOT_SURE.to_string(),
            min_age: 16,
            max_age: 100,
        }
    }
}

/// Roster page URL for `department_id`, e.g.
/// `/department/3?page=2&from_search=true&race=…&gender=…&rank=…&min_age=16&max_age=100`.
pub fn roster_url(
    base_url: &str,
    department_id: u32,
    page: u32,
    from_search: bool,
    filters: &BrowseFilters,
) -> Result<Url> {
    let mut url = url_below(base_url, &format!("department/{department_id}"))?;
    url.query_pairs_mut()
        .append_pair("page", &page.to_string())
        .append_pair("from_search", if from_search { "True" } else { "False" })
        .append_pair("race", &filters.race)
        .append_pair("gender", &filters.gender)
        .append_pair("rank", &filters.rank)
        .append_pair("min_age", &filters.min_age.to_string())
        .append_pair("max_age", &filters.max_age.to_string());
    Ok(url)
}
