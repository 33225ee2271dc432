// SPDX-License-Identifier: GPL-3.0-only
// SPDX-FileCopyrightText: 2025 OpenOversight contributors

//! Photo upload queue. Each file shows its own progress and server answer.

use std::path::PathBuf;

use eframe::egui;
use egui_phosphor::regular;
use log::debug;
use uuid::Uuid;

use crate::config::Department;
use crate::logic::upload::{ACCEPTED_EXTENSIONS, is_accepted};
use crate::ui::components::choices::{ChoicesMsg, department_picker};

/// Most files kept in one queue.
pub const MAX_FILES: usize = 50;
/// Shown next to files that are not accepted images.
pub const WRONG_TYPE: &str = "You can't upload files of this type.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadStatus {
    Uploading,
    Done(String),
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadItem {
    pub key: Uuid,
    pub path: PathBuf,
    pub status: UploadStatus,
}

/// Target of the uploads and the files queued so far.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadModel {
    department_id: Option<u32>,
    officer_id: String,
    items: Vec<UploadItem>,
}

impl UploadModel {
    pub fn items(&self) -> &[UploadItem] {
        &self.items
    }

    /// Officer to tag uploads with, when a valid id was entered.
    fn officer(&self) -> Option<u32> {
        self.officer_id.trim().parse().ok()
    }

    fn in_flight(&self) -> usize {
        self.items
            .iter()
            .filter(|i| i.status == UploadStatus::Uploading)
            .count()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadMsg {
    DepartmentChanged(u32),
    OfficerIdChanged(String),
    PickFiles,
    FilesPicked(Vec<PathBuf>),
    Finished {
        key: Uuid,
        result: Result<String, String>,
    },
    ClearFinished,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadCommand {
    PickFiles,
    Upload {
        key: Uuid,
        path: PathBuf,
        department_id: u32,
        officer_id: Option<u32>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadEvent {
    pub message: String,
    pub is_error: bool,
}

pub fn update(
    model: &mut UploadModel,
    msg: UploadMsg,
    cmds: &mut Vec<UploadCommand>,
) -> Option<UploadEvent> {
    match msg {
        UploadMsg::DepartmentChanged(id) => {
            model.department_id = Some(id);
            None
        }
        UploadMsg::OfficerIdChanged(value) => {
            model.officer_id = value;
            None
        }
        UploadMsg::PickFiles => {
            if model.department_id.is_none() {
                return Some(UploadEvent {
                    message: "Select a department before uploading photos.".into(),
                    is_error: true,
                });
            }
            cmds.push(UploadCommand::PickFiles);
            None
        }
        UploadMsg::FilesPicked(paths) => {
            let department_id = model.department_id?;
            let officer_id = model.officer();
            let room = MAX_FILES.saturating_sub(model.items.len());
            let skipped = paths.len().saturating_sub(room);
            let mut queued = 0;
            for path in paths.into_iter().take(room) {
                let key = Uuid::new_v4();
                let status = if is_accepted(&path) {
                    cmds.push(UploadCommand::Upload {
                        key,
                        path: path.clone(),
                        department_id,
                        officer_id,
                    });
                    queued += 1;
                    UploadStatus::Uploading
                } else {
                    UploadStatus::Failed(WRONG_TYPE.to_string())
                };
                model.items.push(UploadItem { key, path, status });
            }
            let mut message = format!("Uploading {queued} photo(s)");
            if skipped > 0 {
                message.push_str(&format!("; {skipped} over the limit of {MAX_FILES} skipped"));
            }
            Some(UploadEvent {
                message,
                is_error: false,
            })
        }
        UploadMsg::Finished { key, result } => {
            let Some(item) = model.items.iter_mut().find(|i| i.key == key) else {
                debug!("Upload {key} finished after its entry was cleared");
                return None;
            };
            item.status = match result {
                Ok(message) => UploadStatus::Done(message),
                Err(error) => UploadStatus::Failed(error),
            };
            if model.in_flight() == 0 {
                let failed = model
                    .items
                    .iter()
                    .filter(|i| matches!(i.status, UploadStatus::Failed(_)))
                    .count();
                return Some(UploadEvent {
                    message: format!("Uploads finished, {failed} failed"),
                    is_error: false,
                });
            }
            None
        }
        UploadMsg::ClearFinished => {
            model
                .items
                .retain(|i| i.status == UploadStatus::Uploading);
            None
        }
    }
}

pub fn view(
    ui: &mut egui::Ui,
    model: &UploadModel,
    departments: &[Department],
) -> Vec<UploadMsg> {
    let mut msgs = Vec::new();

    egui::Grid::new("upload_grid")
        .num_columns(2)
        .spacing(egui::vec2(8.0, 8.0))
        .min_col_width(120.0)
        .show(ui, |ui| {
            ui.label("Department");
            let mut picked = Vec::new();
            department_picker(ui, "upload", model.department_id, departments, &mut picked);
            msgs.extend(picked.into_iter().filter_map(|m| match m {
                ChoicesMsg::DepartmentChanged(id) => Some(UploadMsg::DepartmentChanged(id)),
                _ => None,
            }));
            ui.end_row();

            ui.label("Officer ID");
            let mut officer_id = model.officer_id.clone();
            let response = ui.add(
                egui::TextEdit::singleline(&mut officer_id)
                    .hint_text("optional")
                    .desired_width(120.0),
            );
            if response.changed() {
                msgs.push(UploadMsg::OfficerIdChanged(officer_id));
            }
            ui.end_row();
        });

    ui.add_space(4.0);
    ui.horizontal(|ui| {
        let label = format!("{} Choose photos", regular::UPLOAD_SIMPLE);
        if ui
            .button(label)
            .on_hover_text(format!("Accepted: {}", ACCEPTED_EXTENSIONS.join(", ")))
            .clicked()
        {
            msgs.push(UploadMsg::PickFiles);
        }
        let finished = model.items.len() - model.in_flight();
        if finished > 0 && ui.button("Clear finished").clicked() {
            msgs.push(UploadMsg::ClearFinished);
        }
    });

    for item in &model.items {
        ui.push_id(item.key, |ui| {
            ui.horizontal(|ui| {
                let name = item
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| item.path.display().to_string());
                match &item.status {
                    UploadStatus::Uploading => {
                        ui.add(egui::Spinner::new().size(14.0));
                        ui.label(name);
                    }
                    UploadStatus::Done(message) => {
                        ui.label(
                            egui::RichText::new(regular::CHECK_CIRCLE)
                                .color(egui::Color32::from_rgb(47, 158, 68)),
                        );
                        ui.label(name);
                        ui.label(
                            egui::RichText::new(message.as_str())
                                .small()
                                .color(egui::Color32::from_gray(110)),
                        );
                    }
                    UploadStatus::Failed(error) => {
                        let red = egui::Color32::from_rgb(224, 49, 49);
                        ui.label(egui::RichText::new(regular::X_CIRCLE).color(red));
                        ui.label(name);
                        ui.label(egui::RichText::new(error.as_str()).small().color(red));
                    }
                }
            });
        });
    }

    msgs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_department() -> UploadModel {
        let mut model = UploadModel::default();
        update(&mut model, UploadMsg::DepartmentChanged(3), &mut Vec::new());
        model
    }

    #[test]
    fn picking_requires_a_department() {
        let mut model = UploadModel::default();
        let mut cmds = Vec::new();

        let event = update(&mut model, UploadMsg::PickFiles, &mut cmds).unwrap();

        assert!(event.is_error);
        assert!(cmds.is_empty());

        let mut model = with_department();
        assert!(update(&mut model, UploadMsg::PickFiles, &mut cmds).is_none());
        assert_eq!(cmds, vec![UploadCommand::PickFiles]);
    }

    #[test]
    fn picked_images_upload_and_others_fail_in_place() {
        let mut model = with_department();
        update(
            &mut model,
            UploadMsg::OfficerIdChanged(" 41 ".into()),
            &mut Vec::new(),
        );
        let mut cmds = Vec::new();

        update(
            &mut model,
            UploadMsg::FilesPicked(vec![PathBuf::from("a.jpg"), PathBuf::from("b.pdf")]),
            &mut cmds,
        );

        assert_eq!(cmds.len(), 1);
        match &cmds[0] {
            UploadCommand::Upload {
                path,
                department_id,
                officer_id,
                ..
            } => {
                assert_eq!(path, &PathBuf::from("a.jpg"));
                assert_eq!(*department_id, 3);
                assert_eq!(*officer_id, Some(41));
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(model.items()[0].status, UploadStatus::Uploading);
        assert_eq!(
            model.items()[1].status,
            UploadStatus::Failed(WRONG_TYPE.to_string())
        );
    }

    #[test]
    fn server_error_is_shown_next_to_its_file() {
        let mut model = with_department();
        let mut cmds = Vec::new();
        update(
            &mut model,
            UploadMsg::FilesPicked(vec![PathBuf::from("a.png"), PathBuf::from("b.png")]),
            &mut cmds,
        );
        let first = model.items()[0].key;
        let second = model.items()[1].key;

        let pending = update(
            &mut model,
            UploadMsg::Finished {
                key: first,
                result: Err("Upload failed.".into()),
            },
            &mut cmds,
        );
        assert!(pending.is_none());
        let done = update(
            &mut model,
            UploadMsg::Finished {
                key: second,
                result: Ok("Success!".into()),
            },
            &mut cmds,
        )
        .unwrap();

        assert_eq!(
            model.items()[0].status,
            UploadStatus::Failed("Upload failed.".into())
        );
        assert_eq!(model.items()[1].status, UploadStatus::Done("Success!".into()));
        assert_eq!(done.message, "Uploads finished, 1 failed");
        assert!(!done.is_error);
    }

    #[test]
    fn queue_is_capped() {
        let mut model = with_department();
        let mut cmds = Vec::new();
        let paths: Vec<PathBuf> = (0..MAX_FILES + 3)
            .map(|n| PathBuf::from(format!("{n}.png")))
            .collect();

        let event = update(&mut model, UploadMsg::FilesPicked(paths), &mut cmds).unwrap();

        assert_eq!(model.items().len(), MAX_FILES);
        assert_eq!(cmds.len(), MAX_FILES);
        assert!(event.message.contains("3 over the limit"));
    }

    #[test]
    fn clear_finished_keeps_running_uploads() {
        let mut model = with_department();
        let mut cmds = Vec::new();
        update(
            &mut model,
            UploadMsg::FilesPicked(vec![PathBuf::from("a.png"), PathBuf::from("b.txt")]),
            &mut cmds,
        );

        update(&mut model, UploadMsg::ClearFinished, &mut cmds);

        assert_eq!(model.items().len(), 1);
        assert_eq!(model.items()[0].status, UploadStatus::Uploading);
    }
}
