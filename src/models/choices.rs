// SPDX-License-Identifier: GPL-3.0-only
// SPDX-FileCopyrightText: 2025 OpenOversight contributors

//! Department-dependent select options (ranks, jobs).
//! Parsing is kept pure so it can be tested without a server.

use anyhow::{Context, Result, anyhow};
use serde_json::Value;

/// Label of the synthetic first option.
pub const NOT_SURE: &str = "Not Sure";

/// One `[id, label]` pair as returned by the ranks endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Choice {
    pub id: String,
    pub label: String,
}

/// Which pair element becomes the option value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ValueFrom {
    /// Value and text are both the label (rank filters).
    #[default]
    Label,
    /// Value is the id (job assignment).
    Id,
}

/// A rendered `<option>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub text: String,
}

/// Parse a JSON array of `[id, label]` pairs.
///
/// Ids may be numbers or strings. Any other shape is an error.
pub fn parse_choices(json: &str) -> Result<Vec<Choice>> {
    let raw: Vec<Value> = serde_json::from_str(json).context("Failed to parse choices JSON")?;
    raw.iter()
        .enumerate()
        .map(|(idx, entry)| {
            let pair = entry
                .as_array()
                .filter(|pair| pair.len() == 2)
                .ok_or_else(|| anyhow!("Choice {idx} is not an [id, label] pair"))?;
            let id = scalar_to_string(&pair[0])
                .ok_or_else(|| anyhow!("Choice {idx} has a non-scalar id"))?;
            let label = pair[1]
                .as_str()
                .ok_or_else(|| anyhow!("Choice {idx} has a non-string label"))?
                .to_string();
            Ok(Choice { id, label })
        })
        .collect()
}

fn scalar_to_string(val: &Value) -> Option<String> {
    match val {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Rebuild the option list: `Not Sure` first, then one option per choice.
pub fn build_options(choices: &[Choice], value_from: ValueFrom) -> Vec<SelectOption> {
    let mut options = Vec::with_capacity(choices.len() + 1);
    options.push(SelectOption {
        value: NOT_SURE.to_string(),
        text: NOT_SURE.to_string(),
    });
    options.extend(choices.iter().map(|choice| SelectOption {
        value: match value_from {
            ValueFrom::Label => choice.label.clone(),
            ValueFrom::Id => choice.id.clone(),
        },
        text: choice.label.clone(),
    }));
    options
}
