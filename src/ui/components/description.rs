// SPDX-License-Identifier: GPL-3.0-only
// SPDX-FileCopyrightText: 2025 OpenOversight contributors

//! Incident description editor with a collapsible preview.

use eframe::egui;
use egui_phosphor::regular;

use crate::models::description::{
    Truncated, markdown_to_html, offers_overflow, truncate_html, truncate_text,
};

/// Description text plus preview state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DescriptionModel {
    text: String,
    expanded: bool,
    limit: usize,
    html_budget: usize,
}

impl DescriptionModel {
    pub fn new(limit: usize, html_budget: usize) -> Self {
        Self {
            text: String::new(),
            expanded: false,
            limit,
            html_budget,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Whether the show-more / show-less row is displayed.
    pub fn has_overflow(&self) -> bool {
        offers_overflow(&self.text, self.limit)
    }

    /// Plain-text preview honouring the collapsed state.
    pub fn preview(&self) -> Truncated {
        if self.expanded {
            Truncated {
                content: self.text.clone(),
                truncated: false,
            }
        } else {
            truncate_text(&self.text, self.limit)
        }
    }

    /// Rendered HTML, cut to the configured budget.
    pub fn html_excerpt(&self) -> Truncated {
        truncate_html(&markdown_to_html(&self.text), self.html_budget)
    }
}

impl Default for DescriptionModel {
    fn default() -> Self {
        Self::new(300, 700)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DescriptionMsg {
    TextChanged(String),
    ShowMore,
    ShowLess,
}

pub fn update(model: &mut DescriptionModel, msg: DescriptionMsg) {
    match msg {
        DescriptionMsg::TextChanged(text) => model.text = text,
        DescriptionMsg::ShowMore => model.expanded = true,
        DescriptionMsg::ShowLess => model.expanded = false,
    }
}

pub fn view(ui: &mut egui::Ui, model: &DescriptionModel) -> Vec<DescriptionMsg> {
    let mut msgs = Vec::new();

    let mut text = model.text.clone();
    if ui
        .add(
            egui::TextEdit::multiline(&mut text)
                .desired_rows(6)
                .desired_width(f32::INFINITY)
                .hint_text("Describe the incident (Markdown supported)"),
        )
        .changed()
    {
        msgs.push(DescriptionMsg::TextChanged(text));
    }

    if model.text.trim().is_empty() {
        return msgs;
    }

    ui.add_space(6.0);
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        let preview = model.preview();
        let mut shown = preview.content;
        if preview.truncated {
            shown.push('…');
        }
        ui.label(shown);

        if model.has_overflow() {
            ui.add_space(4.0);
            let (label, msg) = if model.expanded {
                (format!("{} Show less", regular::CARET_UP), DescriptionMsg::ShowLess)
            } else {
                (format!("{} Show more", regular::CARET_DOWN), DescriptionMsg::ShowMore)
            };
            if ui.link(label).clicked() {
                msgs.push(msg);
            }
        }
    });

    egui::CollapsingHeader::new("Rendered HTML")
        .default_open(false)
        .show(ui, |ui| {
            let excerpt = model.html_excerpt();
            ui.label(egui::RichText::new(excerpt.content).monospace().small());
            if excerpt.truncated {
                ui.label(
                    egui::RichText::new(format!(
                        "Excerpt limited to {} bytes of markup.",
                        model.html_budget
                    ))
                    .small()
                    .color(egui::Color32::from_gray(110)),
                );
            }
        });

    msgs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_description_has_no_overflow_row() {
        let mut model = DescriptionModel::new(300, 700);
        update(&mut model, DescriptionMsg::TextChanged("a".repeat(299)));

        assert!(!model.has_overflow());
        assert!(!model.preview().truncated);
    }

    #[test]
    fn long_description_collapses_until_show_more() {
        let mut model = DescriptionModel::new(300, 700);
        update(&mut model, DescriptionMsg::TextChanged("é".repeat(450)));

        assert!(model.has_overflow());
        let collapsed = model.preview();
        assert!(collapsed.truncated);
        assert_eq!(collapsed.content.chars().count(), 300);

        update(&mut model, DescriptionMsg::ShowMore);
        assert!(model.is_expanded());
        assert_eq!(model.preview().content.chars().count(), 450);

        update(&mut model, DescriptionMsg::ShowLess);
        assert!(model.preview().truncated);
    }

    #[test]
    fn html_excerpt_is_sanitized_and_cut() {
        let mut model = DescriptionModel::new(300, 40);
        let text = "First paragraph.\n\nSecond paragraph that runs long.\n\n<script>x</script>";
        update(&mut model, DescriptionMsg::TextChanged(text.into()));

        let excerpt = model.html_excerpt();

        assert!(excerpt.truncated);
        assert!(excerpt.content.starts_with("<p>First paragraph.</p>"));
        assert!(!excerpt.content.contains("<script>"));
    }
}
