// SPDX-License-Identifier: GPL-3.0-only
// SPDX-FileCopyrightText: 2025 OpenOversight contributors

//! Find-officer wizard: department, rank, identifying details, results.

use eframe::egui;
use log::info;

use crate::config::Department;
use crate::models::browse::BrowseFilters;
use crate::models::choices::ValueFrom;
use crate::models::wizard::{STEP_COUNT, Wizard};
use crate::ui::components::choices::{self, ChoicesCommand, ChoicesModel, ChoicesMsg};

const STEP_TITLES: [&str; STEP_COUNT] = ["Department", "Rank", "Details", "Results"];

/// UI state for the wizard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WizardModel {
    wizard: Wizard,
    department_id: Option<u32>,
    ranks: ChoicesModel,
    uii_label: Option<String>,
    show_uii_question: bool,
    name: String,
    badge: String,
    unique_internal_identifier: String,
    min_age: u8,
    max_age: u8,
}

impl Default for WizardModel {
    fn default() -> Self {
        let filters = BrowseFilters::default();
        Self {
            wizard: Wizard::default(),
            department_id: None,
            ranks: ChoicesModel::new(ValueFrom::Label),
            uii_label: None,
            show_uii_question: true,
            name: String::new(),
            badge: String::new(),
            unique_internal_identifier: String::new(),
            min_age: filters.min_age,
            max_age: filters.max_age,
        }
    }
}

impl WizardModel {
    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    pub fn ranks(&self) -> &ChoicesModel {
        &self.ranks
    }

    pub fn uii_label(&self) -> Option<&str> {
        self.uii_label.as_deref()
    }

    pub fn shows_uii_question(&self) -> bool {
        self.show_uii_question
    }

    /// Filters for the roster search built from the wizard answers.
    pub fn filters(&self) -> BrowseFilters {
        BrowseFilters {
            rank: self.ranks.selected().to_string(),
            min_age: self.min_age,
            max_age: self.max_age,
            ..Default::default()
        }
    }
}

/// Messages emitted by the wizard view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WizardMsg {
    SelectStep(usize),
    ActivateStep(usize),
    DepartmentChanged(u32),
    Ranks(ChoicesMsg),
    NameChanged(String),
    BadgeChanged(String),
    UiiChanged(String),
    AgeRangeChanged { min: u8, max: u8 },
    OpenResults,
}

/// Commands that require side effects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WizardCommand {
    Ranks(ChoicesCommand),
    OpenRoster {
        department_id: u32,
        filters: BrowseFilters,
    },
}

/// User-facing feedback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WizardEvent {
    pub message: String,
    pub is_error: bool,
}

/// Apply a message to the model.
pub fn update(
    model: &mut WizardModel,
    msg: WizardMsg,
    departments: &[Department],
    cmds: &mut Vec<WizardCommand>,
) -> Option<WizardEvent> {
    match msg {
        WizardMsg::SelectStep(step) => {
            model.wizard.select(step);
            None
        }
        WizardMsg::DepartmentChanged(id) => {
            model.department_id = Some(id);
            None
        }
        WizardMsg::ActivateStep(2) => {
            let Some(department_id) = model.department_id else {
                return Some(WizardEvent {
                    message: "Please select a department first.".into(),
                    is_error: true,
                });
            };
            if !model.wizard.activate(2) {
                return None;
            }
            let mut rank_cmds = Vec::new();
            choices::update(
                &mut model.ranks,
                ChoicesMsg::DepartmentChanged(department_id),
                &mut rank_cmds,
            );
            cmds.extend(rank_cmds.into_iter().map(WizardCommand::Ranks));

            model.uii_label = departments
                .iter()
                .find(|d| d.id == department_id)
                .and_then(|d| d.unique_internal_identifier_label.clone())
                .filter(|label| !label.trim().is_empty());
            model.show_uii_question = model.uii_label.is_some();
            info!("Wizard unlocked rank step for department {department_id}");
            None
        }
        WizardMsg::ActivateStep(step) => {
            model.wizard.activate(step);
            None
        }
        WizardMsg::Ranks(m) => {
            let mut rank_cmds = Vec::new();
            choices::update(&mut model.ranks, m, &mut rank_cmds);
            cmds.extend(rank_cmds.into_iter().map(WizardCommand::Ranks));
            None
        }
        WizardMsg::NameChanged(text) => {
            model.name = text;
            None
        }
        WizardMsg::BadgeChanged(text) => {
            model.badge = text;
            None
        }
        WizardMsg::UiiChanged(text) => {
            model.unique_internal_identifier = text;
            None
        }
        WizardMsg::AgeRangeChanged { min, max } => {
            model.min_age = min.min(max);
            model.max_age = max.max(min);
            None
        }
        WizardMsg::OpenResults => match model.department_id {
            Some(department_id) => {
                cmds.push(WizardCommand::OpenRoster {
                    department_id,
                    filters: model.filters(),
                });
                None
            }
            None => Some(WizardEvent {
                message: "Please select a department first.".into(),
                is_error: true,
            }),
        },
    }
}

/// Render the wizard and return triggered messages.
pub fn view(ui: &mut egui::Ui, model: &WizardModel, departments: &[Department]) -> Vec<WizardMsg> {
    let mut msgs = Vec::new();

    ui.horizontal(|ui| {
        for (i, title) in STEP_TITLES.iter().enumerate() {
            let step = i + 1;
            let button = egui::Button::new(format!("{step}. {title}"))
                .selected(model.wizard.active() == step);
            if ui
                .add_enabled(model.wizard.is_enabled(step), button)
                .clicked()
            {
                msgs.push(WizardMsg::SelectStep(step));
            }
        }
    });
    ui.separator();

    match model.wizard.active() {
        1 => {
            let mut dept_msgs = Vec::new();
            ui.horizontal(|ui| {
                ui.label("Department");
                choices::department_picker(
                    ui,
                    "wizard",
                    model.department_id,
                    departments,
                    &mut dept_msgs,
                );
            });
            msgs.extend(dept_msgs.into_iter().filter_map(|m| match m {
                ChoicesMsg::DepartmentChanged(id) => Some(WizardMsg::DepartmentChanged(id)),
                _ => None,
            }));
        }
        2 => {
            let rank_msgs = choices::view(ui, &model.ranks, &[], "Rank");
            msgs.extend(rank_msgs.into_iter().map(WizardMsg::Ranks));
            if model.show_uii_question {
                let label = model.uii_label.as_deref().unwrap_or("Unique identifier");
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    ui.label(format!("Do you know the officer's {label}?"));
                    let mut text = model.unique_internal_identifier.clone();
                    if ui.text_edit_singleline(&mut text).changed() {
                        msgs.push(WizardMsg::UiiChanged(text));
                    }
                });
            }
        }
        3 => {
            egui::Grid::new("wizard_details")
                .num_columns(2)
                .spacing(egui::vec2(8.0, 8.0))
                .show(ui, |ui| {
                    ui.label("Name");
                    let mut name = model.name.clone();
                    if ui.text_edit_singleline(&mut name).changed() {
                        msgs.push(WizardMsg::NameChanged(name));
                    }
                    ui.end_row();

                    ui.label("Badge");
                    let mut badge = model.badge.clone();
                    if ui.text_edit_singleline(&mut badge).changed() {
                        msgs.push(WizardMsg::BadgeChanged(badge));
                    }
                    ui.end_row();

                    ui.label("Age range");
                    ui.horizontal(|ui| {
                        let mut min = model.min_age;
                        let mut max = model.max_age;
                        let min_changed = ui.add(egui::DragValue::new(&mut min).range(16..=100)).changed();
                        ui.label("to");
                        let max_changed = ui.add(egui::DragValue::new(&mut max).range(16..=100)).changed();
                        if min_changed || max_changed {
                            msgs.push(WizardMsg::AgeRangeChanged { min, max });
                        }
                    });
                    ui.end_row();
                });
        }
        _ => {
            let filters = model.filters();
            ui.label(format!(
                "Rank: {}  ·  Ages {}–{}",
                filters.rank, filters.min_age, filters.max_age
            ));
            ui.add_space(6.0);
            if ui
                .button(format!(
                    "{} Browse matching officers",
                    egui_phosphor::regular::MAGNIFYING_GLASS
                ))
                .clicked()
            {
                msgs.push(WizardMsg::OpenResults);
            }
        }
    }

    let next = model.wizard.active() + 1;
    if model.wizard.can_activate(next) {
        ui.add_space(8.0);
        if ui.button("Next").clicked() {
            msgs.push(WizardMsg::ActivateStep(next));
        }
    }

    msgs
}
