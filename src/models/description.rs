// SPDX-License-Identifier: GPL-3.0-only
// SPDX-FileCopyrightText: 2025 OpenOversight contributors

//! Incident description rendering and truncation helpers.

use pulldown_cmark::{Options, Parser, html};

/// Appended to truncated HTML.
pub const ELLIPSIS: &str = "&hellip;";

/// Outcome of a truncation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Truncated {
    pub content: String,
    pub truncated: bool,
}

/// Render Markdown to sanitized HTML.
pub fn markdown_to_html(body: &str) -> String {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(body, opts);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    ammonia::Builder::default().clean(&html_output).to_string()
}

/// Cut `html` near `budget` bytes without breaking markup.
///
/// The cut lands right after the last closing tag that ends at or before
/// `budget`. Without such a tag it falls back to the last character boundary
/// outside of a tag. Strings within budget are returned unchanged.
pub fn truncate_html(html: &str, budget: usize) -> Truncated {
    if html.len() <= budget {
        return Truncated {
            content: html.to_string(),
            truncated: false,
        };
    }

    let cut = last_closing_tag_end(html, budget).unwrap_or_else(|| safe_text_cut(html, budget));
    let mut content = html[..cut].to_string();
    content.push_str(ELLIPSIS);
    Truncated {
        content,
        truncated: true,
    }
}

/// Byte offset just past the last `</...>` ending at or before `budget`.
fn last_closing_tag_end(html: &str, budget: usize) -> Option<usize> {
    let mut best = None;
    let mut search_from = 0;
    while let Some(rel) = html[search_from..].find("</") {
        let start = search_from + rel;
        if start >= budget {
            break;
        }
        let Some(close_rel) = html[start..].find('>') else {
            break;
        };
        let end = start + close_rel + 1;
        if end > budget {
            break;
        }
        best = Some(end);
        search_from = end;
    }
    best
}

/// Largest char boundary `<= budget` that does not sit inside a tag.
fn safe_text_cut(html: &str, budget: usize) -> usize {
    let mut cut = budget.min(html.len());
    while !html.is_char_boundary(cut) {
        cut -= 1;
    }
    // Step back before an unterminated `<` in the kept part.
    if let Some(open) = html[..cut].rfind('<')
        && !html[open..cut].contains('>')
    {
        cut = open;
    }
    cut
}

/// Cut plain text to `limit` characters.
pub fn truncate_text(text: &str, limit: usize) -> Truncated {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => Truncated {
            content: text[..byte_idx].to_string(),
            truncated: true,
        },
        None => Truncated {
            content: text.to_string(),
            truncated: false,
        },
    }
}

/// Whether the "show more" row is offered for a description of this length.
pub fn offers_overflow(text: &str, limit: usize) -> bool {
    text.chars().count() >= limit
}
