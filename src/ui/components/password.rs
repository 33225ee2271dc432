// SPDX-License-Identifier: GPL-3.0-only
// SPDX-FileCopyrightText: 2025 OpenOversight contributors

//! Password form with strength and confirmation meters.

use eframe::egui;

use crate::models::password::{
    Confirmation, MIN_METER, PasswordForm, StrengthScorer, strength_label, strength_meter,
};

const METER_MAX: u8 = 5;

/// UI state for the password form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PasswordModel {
    form: PasswordForm,
    meter: u8,
}

impl PasswordModel {
    pub fn new(form: PasswordForm) -> Self {
        Self { form, meter: 0 }
    }

    pub fn meter(&self) -> u8 {
        self.meter
    }

    pub fn strength_text(&self) -> &'static str {
        strength_label(&self.form.password, self.meter)
    }

    pub fn confirmation(&self) -> Confirmation {
        Confirmation::of(&self.form.password, &self.form.confirmation)
    }

    pub fn can_submit(&self) -> bool {
        self.form.is_valid(self.meter)
    }
}

/// Messages emitted by the password view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PasswordMsg {
    EmailChanged(String),
    UsernameChanged(String),
    OldPasswordChanged(String),
    PasswordChanged(String),
    ConfirmationChanged(String),
}

/// Apply a message; the password is rescored on every change to it.
pub fn update(model: &mut PasswordModel, msg: PasswordMsg, scorer: &dyn StrengthScorer) {
    match msg {
        PasswordMsg::EmailChanged(text) => {
            if let Some(email) = model.form.email.as_mut() {
                *email = text;
            }
        }
        PasswordMsg::UsernameChanged(text) => {
            if let Some(username) = model.form.username.as_mut() {
                *username = text;
            }
        }
        PasswordMsg::OldPasswordChanged(text) => {
            if let Some(old) = model.form.old_password.as_mut() {
                *old = text;
            }
        }
        PasswordMsg::PasswordChanged(text) => {
            model.form.password = text;
            let score = if model.form.password.is_empty() {
                0
            } else {
                scorer.score(&model.form.password, &model.form.user_inputs())
            };
            model.meter = strength_meter(&model.form.password, score);
        }
        PasswordMsg::ConfirmationChanged(text) => model.form.confirmation = text,
    }
}

/// Render the form; `Submit` is enabled only for a valid form.
pub fn view(ui: &mut egui::Ui, model: &PasswordModel) -> Vec<PasswordMsg> {
    let mut msgs = Vec::new();
    let form = &model.form;

    egui::Grid::new("password_grid")
        .num_columns(2)
        .spacing(egui::vec2(8.0, 8.0))
        .min_col_width(140.0)
        .show(ui, |ui| {
            if let Some(email) = &form.email {
                ui.label("Email");
                let mut text = email.clone();
                if ui.text_edit_singleline(&mut text).changed() {
                    msgs.push(PasswordMsg::EmailChanged(text));
                }
                ui.end_row();
            }
            if let Some(username) = &form.username {
                ui.label("Username");
                let mut text = username.clone();
                if ui.text_edit_singleline(&mut text).changed() {
                    msgs.push(PasswordMsg::UsernameChanged(text));
                }
                ui.end_row();
            }
            if let Some(old) = &form.old_password {
                ui.label("Old password");
                let mut text = old.clone();
                if ui
                    .add(egui::TextEdit::singleline(&mut text).password(true))
                    .changed()
                {
                    msgs.push(PasswordMsg::OldPasswordChanged(text));
                }
                ui.end_row();
            }

            ui.label("Password");
            let mut password = form.password.clone();
            if ui
                .add(egui::TextEdit::singleline(&mut password).password(true))
                .changed()
            {
                msgs.push(PasswordMsg::PasswordChanged(password));
            }
            ui.end_row();

            ui.label("");
            ui.horizontal(|ui| {
                meter_bar(ui, model.meter, model.meter >= MIN_METER);
                ui.label(model.strength_text());
            });
            ui.end_row();

            ui.label("Confirm password");
            let mut confirmation = form.confirmation.clone();
            if ui
                .add(egui::TextEdit::singleline(&mut confirmation).password(true))
                .changed()
            {
                msgs.push(PasswordMsg::ConfirmationChanged(confirmation));
            }
            ui.end_row();

            ui.label("");
            let confirmation = model.confirmation();
            meter_bar(ui, confirmation.meter(), confirmation == Confirmation::Matches);
            ui.end_row();
        });

    ui.add_space(8.0);
    let problems = form.problems(model.meter);
    ui.add_enabled(model.can_submit(), egui::Button::new("Submit"))
        .on_disabled_hover_text(problems.join("\n"));

    msgs
}

fn meter_bar(ui: &mut egui::Ui, value: u8, good: bool) {
    let fill = if good {
        egui::Color32::from_rgb(60, 160, 80)
    } else {
        egui::Color32::from_rgb(200, 70, 60)
    };
    let fraction = f32::from(value.min(METER_MAX)) / f32::from(METER_MAX);
    ui.add(
        egui::ProgressBar::new(fraction)
            .desired_width(160.0)
            .fill(fill),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedScorer(u8);

    impl StrengthScorer for FixedScorer {
        fn score(&self, _password: &str, _user_inputs: &[&str]) -> u8 {
            self.0
        }
    }

    #[test]
    fn password_change_updates_meter_and_label() {
        let mut model = PasswordModel::new(PasswordForm::change_password());

        update(&mut model, PasswordMsg::PasswordChanged("abc".into()), &FixedScorer(1));
        assert_eq!(model.meter(), 2);
        assert_eq!(model.strength_text(), "Password not strong enough");

        update(&mut model, PasswordMsg::PasswordChanged("abcdef".into()), &FixedScorer(3));
        assert_eq!(model.meter(), 4);
        assert_eq!(model.strength_text(), "OK");

        update(&mut model, PasswordMsg::PasswordChanged(String::new()), &FixedScorer(4));
        assert_eq!(model.meter(), 0);
        assert_eq!(model.strength_text(), "");
    }

    #[test]
    fn submit_enabled_once_everything_checks_out() {
        let scorer = FixedScorer(4);
        let mut model = PasswordModel::new(PasswordForm::change_password());
        update(&mut model, PasswordMsg::PasswordChanged("s3cure!".into()), &scorer);
        update(&mut model, PasswordMsg::ConfirmationChanged("s3cure!".into()), &scorer);
        assert!(!model.can_submit(), "old password still missing");

        update(&mut model, PasswordMsg::OldPasswordChanged("old".into()), &scorer);
        assert!(model.can_submit());

        update(&mut model, PasswordMsg::ConfirmationChanged("s3cure".into()), &scorer);
        assert_eq!(model.confirmation(), Confirmation::Differs);
        assert!(!model.can_submit());
    }

    #[test]
    fn absent_fields_ignore_their_messages() {
        let mut model = PasswordModel::new(PasswordForm::change_password());
        update(&mut model, PasswordMsg::EmailChanged("a@b.org".into()), &FixedScorer(0));
        assert_eq!(model.form.email, None);
    }
}
