// SPDX-License-Identifier: GPL-3.0-only
// SPDX-FileCopyrightText: 2025 OpenOversight contributors

//! Repeatable field-group editor (ranks, links, license plates, officers).

use eframe::egui;
use log::{debug, warn};

use crate::models::field_group::{
    AddOutcome, FieldGroup, FieldGroupError, FieldGroupList, FieldInput, InputKind, OrdinalPolicy,
    RemoveOutcome,
};

/// UI state for one repeatable fieldset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldGroupsModel {
    legend: String,
    list: FieldGroupList,
}

impl FieldGroupsModel {
    pub fn new(legend: impl Into<String>, list: FieldGroupList) -> Self {
        Self {
            legend: legend.into(),
            list,
        }
    }

    pub fn list(&self) -> &FieldGroupList {
        &self.list
    }
}

/// Messages emitted by the field-group view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldGroupsMsg {
    Add,
    AddAfter(usize),
    Remove(usize),
    EditValue {
        position: usize,
        input: usize,
        value: String,
    },
    MoveUp(usize),
    MoveDown(usize),
    OpenLink(usize),
}

/// Commands that require side effects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldGroupsCommand {
    OpenUrl(String),
}

/// Feedback surfaced to the status bar/modal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldGroupsEvent {
    pub message: String,
    pub is_error: bool,
}

impl FieldGroupsEvent {
    fn info(message: String) -> Option<Self> {
        Some(Self {
            message,
            is_error: false,
        })
    }

    fn error(message: String) -> Option<Self> {
        Some(Self {
            message,
            is_error: true,
        })
    }
}

/// Apply a message to the model. Returns a feedback event when relevant.
pub fn update(
    model: &mut FieldGroupsModel,
    msg: FieldGroupsMsg,
    cmds: &mut Vec<FieldGroupsCommand>,
) -> Option<FieldGroupsEvent> {
    debug!("{}: {:?}", model.list.prefix(), msg);
    match msg {
        FieldGroupsMsg::Add => {
            let outcome = model.list.add();
            added(model, outcome)
        }
        FieldGroupsMsg::AddAfter(position) => match model.list.add_after(position) {
            Ok(outcome) => added(model, outcome),
            Err(err) => rejected(model, err),
        },
        FieldGroupsMsg::Remove(position) => match model.list.remove(position) {
            Ok(RemoveOutcome::Deleted(ordinal)) => {
                FieldGroupsEvent::info(format!("Removed {} #{}", model.legend, ordinal + 1))
            }
            Ok(RemoveOutcome::ResetAndHidden(_)) => {
                FieldGroupsEvent::info(format!("Cleared {}", model.legend))
            }
            Err(err) => rejected(model, err),
        },
        FieldGroupsMsg::EditValue {
            position,
            input,
            value,
        } => match model.list.set_value(position, input, value) {
            Ok(()) => None,
            Err(err) => rejected(model, err),
        },
        FieldGroupsMsg::MoveUp(position) => {
            if position == 0 {
                return None;
            }
            match model.list.move_group(position, position - 1) {
                Ok(()) => None,
                Err(err) => rejected(model, err),
            }
        }
        FieldGroupsMsg::MoveDown(position) => {
            if position + 1 >= model.list.groups().len() {
                return None;
            }
            match model.list.move_group(position, position + 1) {
                Ok(()) => None,
                Err(err) => rejected(model, err),
            }
        }
        FieldGroupsMsg::OpenLink(position) => {
            let url = model
                .list
                .groups()
                .get(position)
                .and_then(|g| g.value_of("url"))
                .map(|url| url.trim().to_string())
                .filter(|v| !v.is_empty());
            match url {
                Some(url) if is_http_url(&url) => {
                    cmds.push(FieldGroupsCommand::OpenUrl(url));
                    None
                }
                Some(url) => FieldGroupsEvent::error(format!(
                    "'{url}' is not a valid http/https URL."
                )),
                None => None,
            }
        }
    }
}

fn added(model: &FieldGroupsModel, outcome: AddOutcome) -> Option<FieldGroupsEvent> {
    match outcome {
        AddOutcome::Revealed(_) => None,
        AddOutcome::Cloned(ordinal) => {
            FieldGroupsEvent::info(format!("Added {} #{}", model.legend, ordinal + 1))
        }
    }
}

fn rejected(model: &FieldGroupsModel, err: FieldGroupError) -> Option<FieldGroupsEvent> {
    warn!("{}: {err}", model.list.prefix());
    FieldGroupsEvent::error(err.to_string())
}

fn is_http_url(value: &str) -> bool {
    url::Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false)
}

/// Render the fieldset and return triggered messages.
pub fn view(ui: &mut egui::Ui, model: &FieldGroupsModel) -> Vec<FieldGroupsMsg> {
    let mut msgs = Vec::new();
    let reorderable = model.list.policy() == OrdinalPolicy::DenseOnReorder;
    let prefix = model.list.prefix();
    let visible_total = model.list.visible_count();

    egui::CollapsingHeader::new(model.legend.as_str())
        .id_salt(prefix)
        .default_open(true)
        .show(ui, |ui| {
            if visible_total == 0 {
                ui.label(
                    egui::RichText::new("Nothing added yet.")
                        .italics()
                        .color(egui::Color32::from_gray(110)),
                );
            }

            for (position, group) in model.list.groups().iter().enumerate() {
                if group.is_hidden() {
                    continue;
                }
                ui.push_id(group.key, |ui| {
                    ui.group(|ui| {
                        ui.horizontal(|ui| {
                            ui.label(
                                egui::RichText::new(format!("#{}", group.ordinal + 1))
                                    .small()
                                    .color(egui::Color32::from_gray(120)),
                            );
                            for (idx, input) in group.inputs.iter().enumerate() {
                                render_input(ui, position, idx, input, &mut msgs);
                            }
                            render_group_actions(ui, position, group, reorderable, &mut msgs);
                        });
                    });
                });
                ui.add_space(4.0);
            }

            ui.add_space(4.0);
            if ui
                .button(format!(
                    "{} {}",
                    egui_phosphor::regular::PLUS,
                    model.list.add_label()
                ))
                .clicked()
            {
                msgs.push(FieldGroupsMsg::Add);
            }
        });

    msgs
}

fn render_input(
    ui: &mut egui::Ui,
    position: usize,
    idx: usize,
    input: &FieldInput,
    msgs: &mut Vec<FieldGroupsMsg>,
) {
    match &input.kind {
        InputKind::Token => {}
        InputKind::Text => {
            ui.label(input.label.as_str());
            let mut value = input.value.clone();
            if ui
                .add(egui::TextEdit::singleline(&mut value).desired_width(160.0))
                .changed()
            {
                msgs.push(FieldGroupsMsg::EditValue {
                    position,
                    input: idx,
                    value,
                });
            }
        }
        InputKind::Select(options) => {
            ui.label(input.label.as_str());
            let mut current = input.value.clone();
            egui::ComboBox::from_id_salt(("select", idx))
                .width(120.0)
                .selected_text(if current.is_empty() { "Select" } else { &current })
                .show_ui(ui, |ui| {
                    for opt in options {
                        if ui
                            .selectable_value(&mut current, opt.clone(), opt)
                            .clicked()
                        {
                            msgs.push(FieldGroupsMsg::EditValue {
                                position,
                                input: idx,
                                value: opt.clone(),
                            });
                        }
                    }
                });
        }
    }
}

fn render_group_actions(
    ui: &mut egui::Ui,
    position: usize,
    group: &FieldGroup,
    reorderable: bool,
    msgs: &mut Vec<FieldGroupsMsg>,
) {
    if group
        .inputs
        .iter()
        .any(|i| i.suffix.as_deref() == Some("url"))
        && ui
            .button(egui_phosphor::regular::ARROW_SQUARE_OUT)
            .on_hover_text("Open link")
            .clicked()
    {
        msgs.push(FieldGroupsMsg::OpenLink(position));
    }

    if ui
        .button(egui_phosphor::regular::PLUS_CIRCLE)
        .on_hover_text("Insert below")
        .clicked()
    {
        msgs.push(FieldGroupsMsg::AddAfter(position));
    }

    if reorderable {
        if ui
            .button(egui_phosphor::regular::ARROW_UP)
            .on_hover_text("Move up")
            .clicked()
        {
            msgs.push(FieldGroupsMsg::MoveUp(position));
        }
        if ui
            .button(egui_phosphor::regular::ARROW_DOWN)
            .on_hover_text("Move down")
            .clicked()
        {
            msgs.push(FieldGroupsMsg::MoveDown(position));
        }
    }

    if ui
        .button(
            egui::RichText::new(egui_phosphor::regular::TRASH_SIMPLE)
                .color(egui::Color32::from_gray(140)),
        )
        .on_hover_text("Remove")
        .clicked()
    {
        msgs.push(FieldGroupsMsg::Remove(position));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links() -> FieldGroupsModel {
        FieldGroupsModel::new(
            "Link",
            FieldGroupList::new(
                "links",
                vec![
                    FieldInput::text(Some("url"), "URL"),
                    FieldInput::token("tok"),
                ],
            )
            .with_noun("link"),
        )
    }

    fn ranks() -> FieldGroupsModel {
        FieldGroupsModel::new(
            "Ranks",
            FieldGroupList::new("jobs", vec![FieldInput::text(None, "Rank")])
                .with_policy(OrdinalPolicy::DenseOnReorder),
        )
    }

    #[test]
    fn add_reports_new_ordinal() {
        let mut model = links();
        let mut cmds = Vec::new();

        let event = update(&mut model, FieldGroupsMsg::Add, &mut cmds).unwrap();

        assert_eq!(event.message, "Added Link #2");
        assert_eq!(model.list().groups().len(), 2);
        assert!(cmds.is_empty());
    }

    #[test]
    fn remove_last_clears_instead_of_deleting() {
        let mut model = links();
        let mut cmds = Vec::new();

        let event = update(&mut model, FieldGroupsMsg::Remove(0), &mut cmds).unwrap();

        assert_eq!(event.message, "Cleared Link");
        assert_eq!(model.list().groups().len(), 1);
        assert_eq!(model.list().visible_count(), 0);

        // add control reveals the hidden group silently
        assert!(update(&mut model, FieldGroupsMsg::Add, &mut cmds).is_none());
        assert_eq!(model.list().visible_count(), 1);
    }

    #[test]
    fn out_of_range_edit_is_an_error_event() {
        let mut model = links();
        let event = update(
            &mut model,
            FieldGroupsMsg::EditValue {
                position: 4,
                input: 0,
                value: "x".into(),
            },
            &mut Vec::new(),
        )
        .unwrap();
        assert!(event.is_error);
    }

    #[test]
    fn open_link_enqueues_command_for_valid_url() {
        let mut model = links();
        let mut cmds = Vec::new();
        update(
            &mut model,
            FieldGroupsMsg::EditValue {
                position: 0,
                input: 0,
                value: "https://example.com/video".into(),
            },
            &mut cmds,
        );

        update(&mut model, FieldGroupsMsg::OpenLink(0), &mut cmds);

        assert_eq!(
            cmds,
            vec![FieldGroupsCommand::OpenUrl(
                "https://example.com/video".into()
            )]
        );
    }

    #[test]
    fn open_link_rejects_non_http_url() {
        let mut model = links();
        let mut cmds = Vec::new();
        update(
            &mut model,
            FieldGroupsMsg::EditValue {
                position: 0,
                input: 0,
                value: "ftp://example.com".into(),
            },
            &mut cmds,
        );

        let event = update(&mut model, FieldGroupsMsg::OpenLink(0), &mut cmds).unwrap();

        assert!(event.is_error);
        assert!(cmds.is_empty());
    }

    #[test]
    fn insert_below_on_ranks_reports_display_position() {
        let mut model = ranks();
        let mut cmds = Vec::new();
        update(&mut model, FieldGroupsMsg::Add, &mut cmds);

        let event = update(&mut model, FieldGroupsMsg::AddAfter(0), &mut cmds).unwrap();

        assert_eq!(event.message, "Added Ranks #2");
        let ordinals: Vec<usize> = model.list().groups().iter().map(|g| g.ordinal).collect();
        assert_eq!(ordinals, vec![0, 1, 2]);
    }

    #[test]
    fn move_up_on_first_row_is_ignored() {
        let mut model = ranks();
        assert!(update(&mut model, FieldGroupsMsg::MoveUp(0), &mut Vec::new()).is_none());
    }

    #[test]
    fn move_down_renumbers_ranks() {
        let mut model = ranks();
        let mut cmds = Vec::new();
        update(
            &mut model,
            FieldGroupsMsg::EditValue {
                position: 0,
                input: 0,
                value: "Officer".into(),
            },
            &mut cmds,
        );
        update(&mut model, FieldGroupsMsg::Add, &mut cmds);
        update(
            &mut model,
            FieldGroupsMsg::EditValue {
                position: 1,
                input: 0,
                value: "Sergeant".into(),
            },
            &mut cmds,
        );

        update(&mut model, FieldGroupsMsg::MoveDown(0), &mut cmds);

        assert_eq!(
            model.list().form_data(),
            vec![
                ("jobs-0".to_string(), "Sergeant".to_string()),
                ("jobs-1".to_string(), "Officer".to_string()),
            ]
        );
    }
}
