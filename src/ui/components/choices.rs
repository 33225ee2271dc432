// SPDX-License-Identifier: GPL-3.0-only
// SPDX-FileCopyrightText: 2025 OpenOversight contributors

//! Department-dependent select (ranks or jobs) refreshed from the server.

use eframe::egui;
use log::{debug, info, warn};

use crate::config::Department;
use crate::models::choices::{Choice, NOT_SURE, SelectOption, ValueFrom, build_options};
use crate::ui::components::toggle_switch;

/// UI state for a select whose options depend on the chosen department.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChoicesModel {
    department_id: Option<u32>,
    options: Vec<SelectOption>,
    selected: String,
    value_from: ValueFrom,
    sworn_only: bool,
    requests_issued: u64,
}

impl ChoicesModel {
    pub fn new(value_from: ValueFrom) -> Self {
        Self {
            department_id: None,
            options: build_options(&[], value_from),
            selected: NOT_SURE.to_string(),
            value_from,
            sworn_only: false,
            requests_issued: 0,
        }
    }

    pub fn department_id(&self) -> Option<u32> {
        self.department_id
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    /// Value of the selected option.
    pub fn selected(&self) -> &str {
        &self.selected
    }

    #[cfg(test)]
    pub fn requests_issued(&self) -> u64 {
        self.requests_issued
    }
}

impl Default for ChoicesModel {
    fn default() -> Self {
        Self::new(ValueFrom::Label)
    }
}

/// Messages emitted by the view or produced by fetch results.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChoicesMsg {
    DepartmentChanged(u32),
    SwornOnlyToggled(bool),
    Loaded {
        department_id: u32,
        choices: Vec<Choice>,
    },
    Failed {
        department_id: u32,
        error: String,
    },
    Select(String),
}

/// Commands that require side effects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChoicesCommand {
    Fetch { department_id: u32, sworn_only: bool },
}

/// Apply a message to the model.
///
/// Every department change issues a request; responses are applied in the
/// order they arrive, so the last one wins. Failures keep the old options.
pub fn update(model: &mut ChoicesModel, msg: ChoicesMsg, cmds: &mut Vec<ChoicesCommand>) {
    match msg {
        ChoicesMsg::DepartmentChanged(id) => {
            model.department_id = Some(id);
            request(model, id, cmds);
        }
        ChoicesMsg::SwornOnlyToggled(enabled) => {
            model.sworn_only = enabled;
            if let Some(id) = model.department_id {
                request(model, id, cmds);
            }
        }
        ChoicesMsg::Loaded {
            department_id,
            choices,
        } => {
            if model.department_id != Some(department_id) {
                debug!(
                    "Applying choices for department {department_id} while {:?} is selected",
                    model.department_id
                );
            }
            model.options = build_options(&choices, model.value_from);
            model.selected = NOT_SURE.to_string();
            info!(
                "Rebuilt select with {} option(s) for department {department_id}",
                model.options.len()
            );
        }
        ChoicesMsg::Failed {
            department_id,
            error,
        } => {
            warn!("Choices for department {department_id} unavailable: {error}");
        }
        ChoicesMsg::Select(value) => {
            if model.options.iter().any(|o| o.value == value) {
                model.selected = value;
            }
        }
    }
}

fn request(model: &mut ChoicesModel, department_id: u32, cmds: &mut Vec<ChoicesCommand>) {
    model.requests_issued += 1;
    debug!(
        "Requesting choices for department {department_id} (request #{})",
        model.requests_issued
    );
    cmds.push(ChoicesCommand::Fetch {
        department_id,
        sworn_only: model.sworn_only,
    });
}

/// Render the department picker (when `departments` is non-empty) and the dependent select.
pub fn view(
    ui: &mut egui::Ui,
    model: &ChoicesModel,
    departments: &[Department],
    label: &str,
) -> Vec<ChoicesMsg> {
    let mut msgs = Vec::new();

    egui::Grid::new(("choices_grid", label))
        .num_columns(2)
        .spacing(egui::vec2(8.0, 8.0))
        .min_col_width(120.0)
        .show(ui, |ui| {
            if !departments.is_empty() {
                ui.label("Department");
                department_picker(ui, label, model.department_id, departments, &mut msgs);
                ui.end_row();
            }

            ui.label(label);
            let selected_text = model
                .options
                .iter()
                .find(|o| o.value == model.selected)
                .map(|o| o.text.as_str())
                .unwrap_or(NOT_SURE);
            egui::ComboBox::from_id_salt(("choices", label))
                .width(200.0)
                .selected_text(selected_text)
                .show_ui(ui, |ui| {
                    for option in &model.options {
                        if ui
                            .selectable_label(option.value == model.selected, option.text.as_str())
                            .clicked()
                        {
                            msgs.push(ChoicesMsg::Select(option.value.clone()));
                        }
                    }
                });
            ui.end_row();

            ui.label("");
            ui.horizontal(|ui| {
                let mut sworn = model.sworn_only;
                if toggle_switch(ui, &mut sworn).clicked() {
                    msgs.push(ChoicesMsg::SwornOnlyToggled(sworn));
                }
                ui.label(
                    egui::RichText::new("Sworn ranks only")
                        .small()
                        .color(egui::Color32::from_gray(140)),
                );
            });
            ui.end_row();
        });

    msgs
}

/// Combo box listing known departments; emits `DepartmentChanged` on a new pick.
pub fn department_picker(
    ui: &mut egui::Ui,
    salt: &str,
    current: Option<u32>,
    departments: &[Department],
    msgs: &mut Vec<ChoicesMsg>,
) {
    let current_name = current
        .and_then(|id| departments.iter().find(|d| d.id == id))
        .map(|d| d.name.as_str())
        .unwrap_or("Select a department");
    egui::ComboBox::from_id_salt(("department", salt))
        .width(200.0)
        .selected_text(current_name)
        .show_ui(ui, |ui| {
            for dept in departments {
                if ui
                    .selectable_label(current == Some(dept.id), dept.name.as_str())
                    .clicked()
                    && current != Some(dept.id)
                {
                    msgs.push(ChoicesMsg::DepartmentChanged(dept.id));
                }
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<Choice> {
        raw.iter()
            .map(|(id, label)| Choice {
                id: id.to_string(),
                label: label.to_string(),
            })
            .collect()
    }

    #[test]
    fn department_change_requests_choices() {
        let mut model = ChoicesModel::new(ValueFrom::Label);
        let mut cmds = Vec::new();

        update(&mut model, ChoicesMsg::DepartmentChanged(3), &mut cmds);
        update(&mut model, ChoicesMsg::DepartmentChanged(7), &mut cmds);

        assert_eq!(
            cmds,
            vec![
                ChoicesCommand::Fetch {
                    department_id: 3,
                    sworn_only: false
                },
                ChoicesCommand::Fetch {
                    department_id: 7,
                    sworn_only: false
                },
            ]
        );
        assert_eq!(model.requests_issued(), 2);
    }

    #[test]
    fn loaded_rebuilds_options_with_not_sure_first() {
        let mut model = ChoicesModel::new(ValueFrom::Label);
        let mut cmds = Vec::new();
        update(&mut model, ChoicesMsg::DepartmentChanged(7), &mut cmds);

        update(
            &mut model,
            ChoicesMsg::Loaded {
                department_id: 7,
                choices: pairs(&[("1", "Officer"), ("2", "Sergeant")]),
            },
            &mut cmds,
        );

        let values: Vec<(&str, &str)> = model
            .options()
            .iter()
            .map(|o| (o.value.as_str(), o.text.as_str()))
            .collect();
        assert_eq!(
            values,
            vec![
                ("Not Sure", "Not Sure"),
                ("Officer", "Officer"),
                ("Sergeant", "Sergeant")
            ]
        );
        assert_eq!(model.selected(), NOT_SURE);
    }

    #[test]
    fn last_arriving_response_wins() {
        let mut model = ChoicesModel::new(ValueFrom::Id);
        let mut cmds = Vec::new();
        update(&mut model, ChoicesMsg::DepartmentChanged(3), &mut cmds);
        update(&mut model, ChoicesMsg::DepartmentChanged(7), &mut cmds);

        update(
            &mut model,
            ChoicesMsg::Loaded {
                department_id: 7,
                choices: pairs(&[("70", "Detective")]),
            },
            &mut cmds,
        );
        update(
            &mut model,
            ChoicesMsg::Loaded {
                department_id: 3,
                choices: pairs(&[("30", "Commander")]),
            },
            &mut cmds,
        );

        assert_eq!(model.options()[1].value, "30");
        assert_eq!(model.options()[1].text, "Commander");
    }

    #[test]
    fn failure_keeps_previous_options() {
        let mut model = ChoicesModel::new(ValueFrom::Label);
        let mut cmds = Vec::new();
        update(
            &mut model,
            ChoicesMsg::Loaded {
                department_id: 1,
                choices: pairs(&[("1", "Officer")]),
            },
            &mut cmds,
        );
        let before = model.options().to_vec();

        update(
            &mut model,
            ChoicesMsg::Failed {
                department_id: 1,
                error: "connection refused".into(),
            },
            &mut cmds,
        );

        assert_eq!(model.options(), before.as_slice());
    }

    #[test]
    fn sworn_toggle_refetches_for_current_department() {
        let mut model = ChoicesModel::new(ValueFrom::Label);
        let mut cmds = Vec::new();
        update(&mut model, ChoicesMsg::SwornOnlyToggled(true), &mut cmds);
        assert!(cmds.is_empty());

        update(&mut model, ChoicesMsg::DepartmentChanged(2), &mut cmds);
        update(&mut model, ChoicesMsg::SwornOnlyToggled(false), &mut cmds);

        assert_eq!(
            cmds,
            vec![
                ChoicesCommand::Fetch {
                    department_id: 2,
                    sworn_only: true
                },
                ChoicesCommand::Fetch {
                    department_id: 2,
                    sworn_only: false
                },
            ]
        );
    }

    #[test]
    fn selecting_unknown_value_is_ignored() {
        let mut model = ChoicesModel::new(ValueFrom::Label);
        update(&mut model, ChoicesMsg::Select("Chief".into()), &mut Vec::new());
        assert_eq!(model.selected(), NOT_SURE);
    }
}
