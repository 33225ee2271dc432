// SPDX-License-Identifier: GPL-3.0-only
// SPDX-FileCopyrightText: 2025 OpenOversight contributors

//! Top-level egui application shell for editing OpenOversight records.
//! Handles layout, page navigation, and the background worker pool.

pub mod components;

use eframe::egui;
use egui_extras::{Column, TableBuilder};
use egui_phosphor::regular;

use crate::config::AppConfig;
use crate::mvu::{self, AppModel, Command, FieldSet, Msg};
use crate::ui::components::content_warning::media_items;
use crate::ui::components::face_tag::FaceTagMsg;
use crate::ui::components::{
    choices, content_warning, description, face_tag, field_groups, password, upload, wizard,
};

/// Pages shown in the navigation bar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Page {
    #[default]
    Officer,
    Incident,
    Department,
    FindOfficer,
    Photos,
    Account,
}

impl Page {
    const ALL: [Page; 6] = [
        Page::Officer,
        Page::Incident,
        Page::Department,
        Page::FindOfficer,
        Page::Photos,
        Page::Account,
    ];

    fn title(self) -> String {
        let (icon, label) = match self {
            Page::Officer => (regular::USER, "Officer"),
            Page::Incident => (regular::NOTE_PENCIL, "Incident"),
            Page::Department => (regular::BUILDINGS, "Department"),
            Page::FindOfficer => (regular::MAGNIFYING_GLASS, "Find officer"),
            Page::Photos => (regular::IMAGES, "Photos"),
            Page::Account => (regular::KEY, "Account"),
        };
        format!("{icon} {label}")
    }
}

/// Stateful egui application for editing record forms.
pub struct OversightFormsApp {
    model: AppModel,
    page: Page,
    inbox: Vec<Msg>,
    cmd_tx: crossbeam_channel::Sender<Command>,
    msg_rx: crossbeam_channel::Receiver<Msg>,
}

impl OversightFormsApp {
    pub fn new(config: AppConfig) -> Self {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded::<Command>();
        let (msg_tx, msg_rx) = crossbeam_channel::unbounded::<Msg>();

        let threads = std::thread::available_parallelism()
            .map(|n| n.get().max(2))
            .unwrap_or(2);
        for _ in 0..threads {
            let cmd_rx = cmd_rx.clone();
            let msg_tx = msg_tx.clone();
            std::thread::spawn(move || {
                for cmd in cmd_rx.iter() {
                    let msg = mvu::run_command(cmd);
                    if msg_tx.send(msg).is_err() {
                        break;
                    }
                }
            });
        }
        log::debug!("Started {threads} command worker(s)");

        Self {
            model: AppModel::new(config),
            page: Page::default(),
            inbox: Vec::new(),
            cmd_tx,
            msg_rx,
        }
    }
}

impl eframe::App for OversightFormsApp {
    // eframe 0.34 requires `ui`; it still calls `update` first, where the app renders.
    fn ui(&mut self, _ui: &mut egui::Ui, _frame: &mut eframe::Frame) {}

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.style_mut(|style| {
            style.spacing.item_spacing = egui::vec2(6.0, 6.0);
        });

        // Worker results arrive in completion order.
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.model.pending_commands = self.model.pending_commands.saturating_sub(1);
            self.inbox.push(msg);
        }
        if self.model.pending_commands > 0 {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        let mut msgs = std::mem::take(&mut self.inbox);
        msgs.reverse();
        while let Some(msg) = msgs.pop() {
            match msg {
                Msg::FaceImageDecoded {
                    path,
                    natural,
                    image,
                } => {
                    let texture = ctx.load_texture(
                        format!("face-{}", path.display()),
                        image,
                        egui::TextureOptions::LINEAR,
                    );
                    msgs.push(Msg::FaceTag(FaceTagMsg::ImageReady {
                        path,
                        natural,
                        texture,
                    }));
                }
                other => {
                    let mut commands = Vec::new();
                    mvu::update(&mut self.model, other, &mut commands);
                    for cmd in commands {
                        if self.cmd_tx.send(cmd).is_ok() {
                            self.model.pending_commands += 1;
                        }
                    }
                }
            }
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                for page in Page::ALL {
                    if ui
                        .add(egui::Button::new(page.title()).selected(self.page == page))
                        .clicked()
                    {
                        self.page = page;
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    egui::widgets::global_theme_preference_switch(ui);
                    ui.label(
                        egui::RichText::new(self.model.config.base_url.as_str())
                            .small()
                            .color(egui::Color32::from_gray(110)),
                    );
                });
            });
            ui.add_space(4.0);
        });

        self.render_error_modal(ctx);

        egui::TopBottomPanel::bottom("status_panel")
            .resizable(false)
            .show(ctx, |ui| {
                self.render_status(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);
            egui::ScrollArea::vertical().show(ui, |ui| match self.page {
                Page::Officer => self.render_officer_page(ui),
                Page::Incident => self.render_incident_page(ui),
                Page::Department => self.render_department_page(ui),
                Page::FindOfficer => {
                    let msgs = wizard::view(ui, &self.model.wizard, &self.model.config.departments);
                    self.inbox.extend(msgs.into_iter().map(Msg::Wizard));
                }
                Page::Photos => self.render_photos_page(ui),
                Page::Account => self.render_account_page(ui),
            });
        });
    }
}

impl OversightFormsApp {
    fn render_fieldset(&mut self, ui: &mut egui::Ui, which: FieldSet) {
        let msgs = field_groups::view(ui, self.model.fieldset(which));
        self.inbox
            .extend(msgs.into_iter().map(|m| Msg::FieldGroups(which, m)));
        ui.add_space(10.0);
    }

    fn render_officer_page(&mut self, ui: &mut egui::Ui) {
        ui.heading("Add officer");
        ui.add_space(6.0);
        let msgs = choices::view(
            ui,
            &self.model.officer_job,
            &self.model.config.departments,
            "Job",
        );
        self.inbox.extend(msgs.into_iter().map(Msg::OfficerJob));
        ui.add_space(10.0);

        self.render_fieldset(ui, FieldSet::Links);
        self.render_submission_preview(ui);
    }

    fn render_incident_page(&mut self, ui: &mut egui::Ui) {
        ui.heading("Incident");
        ui.add_space(6.0);
        ui.label("Description");
        let msgs = description::view(ui, &self.model.description);
        self.inbox.extend(msgs.into_iter().map(Msg::Description));
        ui.add_space(10.0);

        self.render_fieldset(ui, FieldSet::LicensePlates);
        self.render_fieldset(ui, FieldSet::Links);
        self.render_fieldset(ui, FieldSet::Officers);

        egui::CollapsingHeader::new("Media")
            .default_open(true)
            .show(ui, |ui| {
                let items = media_items(self.model.links.list());
                let msgs = content_warning::view(ui, &self.model.content_warning, &items);
                self.inbox.extend(msgs.into_iter().map(Msg::ContentWarning));
            });
        self.render_submission_preview(ui);
    }

    fn render_department_page(&mut self, ui: &mut egui::Ui) {
        ui.heading("Department ranks");
        ui.label(
            egui::RichText::new("Order ranks from lowest to highest; numbering follows the order.")
                .small()
                .color(egui::Color32::from_gray(110)),
        );
        ui.add_space(6.0);
        self.render_fieldset(ui, FieldSet::Ranks);
        self.render_submission_preview(ui);
    }

    fn render_photos_page(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Upload")
            .default_open(true)
            .show(ui, |ui| {
                let msgs = upload::view(ui, &self.model.upload, &self.model.config.departments);
                self.inbox.extend(msgs.into_iter().map(Msg::Upload));
            });
        ui.add_space(10.0);
        egui::CollapsingHeader::new("Face tag")
            .default_open(true)
            .show(ui, |ui| {
                let msgs = face_tag::view(ui, &self.model.face_tag);
                self.inbox.extend(msgs.into_iter().map(Msg::FaceTag));
            });
    }

    fn render_account_page(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Register")
            .default_open(true)
            .show(ui, |ui| {
                let msgs = password::view(ui, &self.model.registration);
                self.inbox.extend(msgs.into_iter().map(Msg::Registration));
            });
        ui.add_space(10.0);
        ui.push_id("change_password", |ui| {
            egui::CollapsingHeader::new("Change password")
                .default_open(false)
                .show(ui, |ui| {
                    let msgs = password::view(ui, &self.model.change_password);
                    self.inbox.extend(msgs.into_iter().map(Msg::ChangePassword));
                });
        });
    }

    /// Read-only table of the pairs a submission would carry.
    fn render_submission_preview(&self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Submission preview")
            .default_open(false)
            .show(ui, |ui| {
                let rows = self.model.form_data();
                TableBuilder::new(ui)
                    .striped(true)
                    .vscroll(false)
                    .column(Column::auto().at_least(220.0))
                    .column(Column::remainder())
                    .header(20.0, |mut header| {
                        header.col(|ui| {
                            ui.strong("Field");
                        });
                        header.col(|ui| {
                            ui.strong("Value");
                        });
                    })
                    .body(|mut body| {
                        for (name, value) in rows {
                            body.row(18.0, |mut row| {
                                row.col(|ui| {
                                    ui.monospace(name);
                                });
                                row.col(|ui| {
                                    ui.label(value);
                                });
                            });
                        }
                    });
            });
    }

    /// Render a simple modal window for error messages.
    fn render_error_modal(&mut self, ctx: &egui::Context) {
        if let Some(message) = self.model.error.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        self.inbox.push(Msg::DismissError);
                    }
                });
        }
    }

    fn render_status(&self, ui: &mut egui::Ui) {
        let pending = self.model.pending_commands;
        ui.horizontal(|ui| {
            if let Some(text) = &self.model.status {
                ui.label(egui::RichText::new(text.as_str()).color(egui::Color32::from_gray(68)));
            }
            if pending > 0 {
                ui.add(egui::Spinner::new().size(14.0))
                    .on_hover_text(format!("{pending} task(s) running in background"));
            }
        });
    }
}
