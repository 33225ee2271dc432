// SPDX-License-Identifier: GPL-3.0-only
// SPDX-FileCopyrightText: 2025 OpenOversight contributors

//! Root Model-View-Update kernel wiring component state, messages, and commands.

use std::path::PathBuf;
use std::time::Duration;

use log::{debug, info, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::logic::choices::{ChoicesRequest, fetch_choices};
use crate::logic::upload::{
    ACCEPTED_EXTENSIONS, UploadOutcome, UploadRequest, upload_image, upload_path,
};
use crate::models::browse::roster_url;
use crate::models::choices::ValueFrom;
use crate::models::field_group::{FieldGroupList, FieldInput, OrdinalPolicy, noun_for_legend};
use crate::models::password::{PasswordForm, ZxcvbnScorer};
use crate::ui::components::choices::{self, ChoicesCommand, ChoicesModel, ChoicesMsg};
use crate::ui::components::content_warning::{
    self, ContentWarningCommand, ContentWarningModel, ContentWarningMsg,
};
use crate::ui::components::description::{self, DescriptionModel, DescriptionMsg};
use crate::ui::components::face_tag::{self, FaceTagCommand, FaceTagModel, FaceTagMsg};
use crate::ui::components::field_groups::{
    self, FieldGroupsCommand, FieldGroupsModel, FieldGroupsMsg,
};
use crate::ui::components::password::{self, PasswordModel, PasswordMsg};
use crate::ui::components::upload::{self, UploadCommand, UploadModel, UploadMsg};
use crate::ui::components::wizard::{self, WizardCommand, WizardModel, WizardMsg};

/// Which select a choices fetch belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChoicesTarget {
    OfficerJob,
    WizardRank,
}

/// Repeatable fieldsets of the editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldSet {
    Ranks,
    Links,
    LicensePlates,
    Officers,
}

/// Top-level application state.
pub struct AppModel {
    pub config: AppConfig,
    /// Department rank names, reorderable.
    pub ranks: FieldGroupsModel,
    pub links: FieldGroupsModel,
    pub license_plates: FieldGroupsModel,
    pub officers: FieldGroupsModel,
    /// Job select of the add-officer form.
    pub officer_job: ChoicesModel,
    pub wizard: WizardModel,
    pub registration: PasswordModel,
    pub change_password: PasswordModel,
    pub description: DescriptionModel,
    pub face_tag: FaceTagModel,
    pub content_warning: ContentWarningModel,
    pub upload: UploadModel,
    /// Latest status message to display.
    pub status: Option<String>,
    /// Latest error message to display in modal.
    pub error: Option<String>,
    /// Count of queued background commands.
    pub pending_commands: usize,
}

impl AppModel {
    pub fn new(config: AppConfig) -> Self {
        let token = config.csrf_token.clone();
        Self {
            ranks: FieldGroupsModel::new(
                "Ranks",
                FieldGroupList::new("jobs", vec![FieldInput::text(None, "Rank")])
                    .with_noun("rank")
                    .with_policy(OrdinalPolicy::DenseOnReorder)
                    .starting_hidden(),
            ),
            links: fieldset(
                "Link",
                FieldGroupList::new(
                    "links",
                    vec![
                        FieldInput::text(Some("url"), "URL"),
                        FieldInput::select("link_type", "Type", &["link", "video", "other_video"]),
                        FieldInput::text(Some("title"), "Title"),
                        FieldInput::text(Some("author"), "Author"),
                        FieldInput::select("has_content_warning", "Content warning", &["No", "Yes"]),
                        FieldInput::token(&token),
                    ],
                ),
            ),
            license_plates: fieldset(
                "Plate Number",
                FieldGroupList::new(
                    "license_plates",
                    vec![
                        FieldInput::text(Some("number"), "Plate number"),
                        FieldInput::text(Some("state"), "State"),
                        FieldInput::token(&token),
                    ],
                ),
            ),
            officers: fieldset(
                "OO Officer ID",
                FieldGroupList::new(
                    "officers",
                    vec![
                        FieldInput::text(Some("oo_id"), "OpenOversight ID"),
                        FieldInput::token(&token),
                    ],
                ),
            ),
            officer_job: ChoicesModel::new(ValueFrom::Id),
            wizard: WizardModel::default(),
            registration: PasswordModel::new(PasswordForm::registration()),
            change_password: PasswordModel::new(PasswordForm::change_password()),
            description: DescriptionModel::new(config.description_limit, config.html_budget),
            face_tag: FaceTagModel::default(),
            content_warning: ContentWarningModel::default(),
            upload: UploadModel::default(),
            status: None,
            error: None,
            pending_commands: 0,
            config,
        }
    }

    pub fn fieldset(&self, which: FieldSet) -> &FieldGroupsModel {
        match which {
            FieldSet::Ranks => &self.ranks,
            FieldSet::Links => &self.links,
            FieldSet::LicensePlates => &self.license_plates,
            FieldSet::Officers => &self.officers,
        }
    }

    fn fieldset_mut(&mut self, which: FieldSet) -> &mut FieldGroupsModel {
        match which {
            FieldSet::Ranks => &mut self.ranks,
            FieldSet::Links => &mut self.links,
            FieldSet::LicensePlates => &mut self.license_plates,
            FieldSet::Officers => &mut self.officers,
        }
    }

    /// `(name, value)` pairs a server-side form parser would receive.
    pub fn form_data(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for which in [
            FieldSet::Ranks,
            FieldSet::Links,
            FieldSet::LicensePlates,
            FieldSet::Officers,
        ] {
            pairs.extend(self.fieldset(which).list().form_data());
        }
        if let Some(id) = self.officer_job.department_id() {
            pairs.push(("department".into(), id.to_string()));
        }
        pairs.push(("job_id".into(), self.officer_job.selected().to_string()));
        pairs.push(("description".into(), self.description.text().to_string()));
        pairs
    }
}

impl Default for AppModel {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

fn fieldset(legend: &str, list: FieldGroupList) -> FieldGroupsModel {
    FieldGroupsModel::new(legend, list.with_noun(noun_for_legend(legend)))
}

/// Application messages routed through the update function.
pub enum Msg {
    DismissError,
    FieldGroups(FieldSet, FieldGroupsMsg),
    OfficerJob(ChoicesMsg),
    Wizard(WizardMsg),
    Registration(PasswordMsg),
    ChangePassword(PasswordMsg),
    Description(DescriptionMsg),
    FaceTag(FaceTagMsg),
    /// Decoded off-thread; the UI turns it into a texture before `update`.
    FaceImageDecoded {
        path: PathBuf,
        natural: (u32, u32),
        image: eframe::egui::ColorImage,
    },
    ContentWarning(ContentWarningMsg),
    Upload(UploadMsg),
    UrlOpened(Result<String, String>),
}

/// Commands represent side-effects executed between frames.
#[derive(Debug)]
pub enum Command {
    FetchChoices {
        target: ChoicesTarget,
        request: ChoicesRequest,
    },
    OpenUrl(String),
    PickFaceImage,
    LoadFaceImage(PathBuf),
    PickUploadFiles,
    UploadImage { key: Uuid, request: UploadRequest },
}

/// Update the application model and enqueue commands.
pub fn update(model: &mut AppModel, msg: Msg, cmds: &mut Vec<Command>) {
    match msg {
        Msg::DismissError => model.error = None,
        Msg::FieldGroups(which, m) => {
            let mut fg_cmds = Vec::new();
            if let Some(event) = field_groups::update(model.fieldset_mut(which), m, &mut fg_cmds) {
                surface_event(model, event.message, event.is_error);
            }
            if which == FieldSet::Links {
                model.content_warning.retain_groups(model.links.list());
            }
            for c in fg_cmds {
                match c {
                    FieldGroupsCommand::OpenUrl(url) => cmds.push(Command::OpenUrl(url)),
                }
            }
        }
        Msg::OfficerJob(m) => {
            let mut choice_cmds = Vec::new();
            choices::update(&mut model.officer_job, m, &mut choice_cmds);
            for c in choice_cmds {
                let path = model.config.jobs_path.clone();
                queue_fetch(model, ChoicesTarget::OfficerJob, &path, c, cmds);
            }
        }
        Msg::Wizard(m) => {
            let mut wiz_cmds = Vec::new();
            if let Some(event) = wizard::update(
                &mut model.wizard,
                m,
                &model.config.departments,
                &mut wiz_cmds,
            ) {
                surface_event(model, event.message, event.is_error);
            }
            for c in wiz_cmds {
                match c {
                    WizardCommand::Ranks(fetch) => {
                        let path = model.config.ranks_path.clone();
                        queue_fetch(model, ChoicesTarget::WizardRank, &path, fetch, cmds);
                    }
                    WizardCommand::OpenRoster {
                        department_id,
                        filters,
                    } => match roster_url(&model.config.base_url, department_id, 1, true, &filters)
                    {
                        Ok(url) => cmds.push(Command::OpenUrl(url.to_string())),
                        Err(err) => surface_event(model, format!("{err:#}"), true),
                    },
                }
            }
        }
        Msg::Registration(m) => password::update(&mut model.registration, m, &ZxcvbnScorer),
        Msg::ChangePassword(m) => password::update(&mut model.change_password, m, &ZxcvbnScorer),
        Msg::Description(m) => description::update(&mut model.description, m),
        Msg::FaceTag(m) => {
            let mut tag_cmds = Vec::new();
            if let Some(event) = face_tag::update(&mut model.face_tag, m, &mut tag_cmds) {
                surface_event(model, event.message, event.is_error);
            }
            for c in tag_cmds {
                match c {
                    FaceTagCommand::PickImage => cmds.push(Command::PickFaceImage),
                    FaceTagCommand::LoadImage { path } => cmds.push(Command::LoadFaceImage(path)),
                }
            }
        }
        Msg::FaceImageDecoded { path, .. } => {
            // Texture creation needs the egui context; the UI shell converts this first.
            debug!("Decoded face image {} reached update", path.display());
        }
        Msg::ContentWarning(m) => {
            let mut cw_cmds = Vec::new();
            content_warning::update(&mut model.content_warning, m, &mut cw_cmds);
            for c in cw_cmds {
                match c {
                    ContentWarningCommand::OpenUrl(url) => cmds.push(Command::OpenUrl(url)),
                }
            }
        }
        Msg::Upload(m) => {
            let mut upload_cmds = Vec::new();
            if let Some(event) = upload::update(&mut model.upload, m, &mut upload_cmds) {
                surface_event(model, event.message, event.is_error);
            }
            for c in upload_cmds {
                match c {
                    UploadCommand::PickFiles => cmds.push(Command::PickUploadFiles),
                    UploadCommand::Upload {
                        key,
                        path,
                        department_id,
                        officer_id,
                    } => match model.config.endpoint(&upload_path(department_id, officer_id)) {
                        Ok(endpoint) => cmds.push(Command::UploadImage {
                            key,
                            request: UploadRequest {
                                endpoint,
                                file: path,
                                csrf_token: model.config.csrf_token.clone(),
                                timeout: model.config.request_timeout_secs.map(Duration::from_secs),
                            },
                        }),
                        Err(err) => {
                            warn!("Cannot upload {}: {err:#}", path.display());
                            upload::update(
                                &mut model.upload,
                                UploadMsg::Finished {
                                    key,
                                    result: Err(format!("{err:#}")),
                                },
                                &mut Vec::new(),
                            );
                        }
                    },
                }
            }
        }
        Msg::UrlOpened(Ok(url)) => surface_event(model, format!("Opened {url}"), false),
        Msg::UrlOpened(Err(err)) => {
            surface_event(model, format!("Failed to open link:\n\n{err}"), true)
        }
    }
}

/// Turn a component fetch into a request against the configured server.
fn queue_fetch(
    model: &mut AppModel,
    target: ChoicesTarget,
    path: &str,
    fetch: ChoicesCommand,
    cmds: &mut Vec<Command>,
) {
    let ChoicesCommand::Fetch {
        department_id,
        sworn_only,
    } = fetch;
    match model.config.endpoint(path) {
        Ok(endpoint) => cmds.push(Command::FetchChoices {
            target,
            request: ChoicesRequest {
                endpoint,
                department_id,
                sworn_only,
                timeout: model.config.request_timeout_secs.map(Duration::from_secs),
            },
        }),
        Err(err) => {
            warn!("Cannot request choices for department {department_id}: {err:#}");
            surface_event(model, format!("{err:#}"), true);
        }
    }
}

/// Execute a command on a worker thread and return a resulting message.
pub fn run_command(cmd: Command) -> Msg {
    debug!("Running {cmd:?}");
    match cmd {
        Command::FetchChoices { target, request } => {
            let department_id = request.department_id;
            let msg = match fetch_choices(&request) {
                Ok(choices) => ChoicesMsg::Loaded {
                    department_id,
                    choices,
                },
                Err(err) => ChoicesMsg::Failed {
                    department_id,
                    error: format!("{err:#}"),
                },
            };
            match target {
                ChoicesTarget::OfficerJob => Msg::OfficerJob(msg),
                ChoicesTarget::WizardRank => Msg::Wizard(WizardMsg::Ranks(msg)),
            }
        }
        Command::OpenUrl(url) => match open::that(&url) {
            Ok(()) => {
                info!("Opened {url} in the system browser");
                Msg::UrlOpened(Ok(url))
            }
            Err(err) => Msg::UrlOpened(Err(format!("{url}: {err}"))),
        },
        Command::PickFaceImage => {
            let file = rfd::FileDialog::new()
                .set_title("Select officer photo")
                .add_filter("Images", &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tiff"])
                .pick_file();
            Msg::FaceTag(FaceTagMsg::ImagePicked(file))
        }
        Command::LoadFaceImage(path) => match face_tag::load_preview(&path) {
            Ok((natural, image)) => Msg::FaceImageDecoded {
                path,
                natural,
                image,
            },
            Err(err) => Msg::FaceTag(FaceTagMsg::ImageFailed {
                path,
                error: format!("{err:#}"),
            }),
        },
        Command::PickUploadFiles => {
            let files = rfd::FileDialog::new()
                .set_title("Select photos to upload")
                .add_filter("Images", &ACCEPTED_EXTENSIONS)
                .pick_files()
                .unwrap_or_default();
            Msg::Upload(UploadMsg::FilesPicked(files))
        }
        Command::UploadImage { key, request } => {
            let result = match upload_image(&request) {
                Ok(UploadOutcome::Accepted(message)) => Ok(message),
                Ok(UploadOutcome::Rejected(error)) => Err(error),
                Err(err) => {
                    warn!("{err:#}");
                    Err(format!("{err:#}"))
                }
            };
            Msg::Upload(UploadMsg::Finished { key, result })
        }
    }
}

/// Update status/error fields consistently for user feedback.
fn surface_event(model: &mut AppModel, message: String, is_error: bool) {
    if is_error {
        model.error = Some(message.clone());
    }
    model.status = Some(message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Department;
    use crate::models::choices::Choice;

    fn config() -> AppConfig {
        AppConfig {
            csrf_token: "tok".into(),
            request_timeout_secs: Some(5),
            departments: vec![Department {
                id: 4,
                name: "Springfield PD".into(),
                unique_internal_identifier_label: None,
            }],
            ..AppConfig::default()
        }
    }

    fn edit(model: &mut AppModel, which: FieldSet, position: usize, input: usize, value: &str) {
        update(
            model,
            Msg::FieldGroups(
                which,
                FieldGroupsMsg::EditValue {
                    position,
                    input,
                    value: value.into(),
                },
            ),
            &mut Vec::new(),
        );
    }

    #[test]
    fn add_buttons_use_legend_nouns() {
        let model = AppModel::new(config());

        assert_eq!(model.links.list().add_label(), "Add another link");
        assert_eq!(
            model.license_plates.list().add_label(),
            "Add another license plate"
        );
        assert_eq!(model.officers.list().add_label(), "Add another officer");
        assert_eq!(model.ranks.list().add_label(), "Add another rank");
    }

    #[test]
    fn removing_last_plate_keeps_token_in_form_data() {
        let mut model = AppModel::new(config());
        edit(&mut model, FieldSet::LicensePlates, 0, 0, "ABC123");

        update(
            &mut model,
            Msg::FieldGroups(FieldSet::LicensePlates, FieldGroupsMsg::Remove(0)),
            &mut Vec::new(),
        );

        let data = model.form_data();
        let plates: Vec<(&str, &str)> = data
            .iter()
            .filter(|(name, _)| name.starts_with("license_plates-"))
            .map(|(n, v)| (n.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            plates,
            vec![
                ("license_plates-0-number", ""),
                ("license_plates-0-state", ""),
                ("license_plates-0-csrf_token", "tok"),
            ]
        );
        assert_eq!(model.status.as_deref(), Some("Cleared Plate Number"));
    }

    #[test]
    fn job_department_change_fetches_from_jobs_endpoint() {
        let mut model = AppModel::new(config());
        let mut cmds = Vec::new();

        update(
            &mut model,
            Msg::OfficerJob(ChoicesMsg::DepartmentChanged(4)),
            &mut cmds,
        );

        assert_eq!(cmds.len(), 1);
        match &cmds[0] {
            Command::FetchChoices { target, request } => {
                assert_eq!(*target, ChoicesTarget::OfficerJob);
                assert_eq!(
                    request.url().as_str(),
                    "http://localhost:3000/ranks?department_id=4"
                );
                assert_eq!(request.timeout, Some(Duration::from_secs(5)));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn job_select_uses_ids_as_values() {
        let mut model = AppModel::new(config());
        update(
            &mut model,
            Msg::OfficerJob(ChoicesMsg::Loaded {
                department_id: 4,
                choices: vec![Choice {
                    id: "12".into(),
                    label: "Sergeant".into(),
                }],
            }),
            &mut Vec::new(),
        );
        update(
            &mut model,
            Msg::OfficerJob(ChoicesMsg::Select("12".into())),
            &mut Vec::new(),
        );

        assert!(
            model
                .form_data()
                .contains(&("job_id".to_string(), "12".to_string()))
        );
    }

    #[test]
    fn wizard_rank_step_fetches_ranks() {
        let mut model = AppModel::new(config());
        let mut cmds = Vec::new();
        update(
            &mut model,
            Msg::Wizard(WizardMsg::DepartmentChanged(4)),
            &mut cmds,
        );
        update(&mut model, Msg::Wizard(WizardMsg::ActivateStep(2)), &mut cmds);

        assert!(matches!(
            cmds.as_slice(),
            [Command::FetchChoices {
                target: ChoicesTarget::WizardRank,
                ..
            }]
        ));
    }

    #[test]
    fn wizard_results_open_roster_url() {
        let mut model = AppModel::new(config());
        let mut cmds = Vec::new();
        update(
            &mut model,
            Msg::Wizard(WizardMsg::DepartmentChanged(4)),
            &mut cmds,
        );
        update(&mut model, Msg::Wizard(WizardMsg::OpenResults), &mut cmds);

        match cmds.pop() {
            Some(Command::OpenUrl(url)) => {
                assert!(url.starts_with("http://localhost:3000/department/4?page=1&from_search=True"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unreachable_server_yields_failed_message() {
        let mut cfg = config();
        cfg.base_url = "http://127.0.0.1:9".into();
        let mut model = AppModel::new(cfg);
        let mut cmds = Vec::new();
        update(
            &mut model,
            Msg::OfficerJob(ChoicesMsg::DepartmentChanged(4)),
            &mut cmds,
        );
        let before = model.officer_job.options().to_vec();

        let msg = run_command(cmds.remove(0));
        assert!(matches!(msg, Msg::OfficerJob(ChoicesMsg::Failed { .. })));
        update(&mut model, msg, &mut cmds);

        assert_eq!(model.officer_job.options(), before.as_slice());
        assert!(model.error.is_none());
    }

    #[test]
    fn failed_url_open_surfaces_error() {
        let mut model = AppModel::default();
        update(
            &mut model,
            Msg::UrlOpened(Err("no browser".into())),
            &mut Vec::new(),
        );

        assert!(model.error.as_deref().unwrap().contains("no browser"));
        update(&mut model, Msg::DismissError, &mut Vec::new());
        assert!(model.error.is_none());
    }

    #[test]
    fn invalid_link_url_is_rejected_before_opening() {
        let mut model = AppModel::default();
        let mut cmds = Vec::new();
        edit(&mut model, FieldSet::Links, 0, 0, "ftp://example.org");

        update(
            &mut model,
            Msg::FieldGroups(FieldSet::Links, FieldGroupsMsg::OpenLink(0)),
            &mut cmds,
        );

        assert!(cmds.is_empty());
        assert!(model.error.is_some());
    }

    #[test]
    fn face_image_pick_enqueues_dialog_then_load() {
        let mut model = AppModel::default();
        let mut cmds = Vec::new();

        update(&mut model, Msg::FaceTag(FaceTagMsg::PickImage), &mut cmds);
        update(
            &mut model,
            Msg::FaceTag(FaceTagMsg::ImagePicked(Some(PathBuf::from("face.png")))),
            &mut cmds,
        );

        assert!(matches!(
            cmds.as_slice(),
            [Command::PickFaceImage, Command::LoadFaceImage(p)] if p == &PathBuf::from("face.png")
        ));
    }

    #[test]
    fn missing_face_image_fails_in_worker() {
        let msg = run_command(Command::LoadFaceImage(PathBuf::from(
            "/nonexistent/face.png",
        )));
        assert!(matches!(msg, Msg::FaceTag(FaceTagMsg::ImageFailed { .. })));
    }

    #[test]
    fn picked_photos_become_upload_requests() {
        let mut model = AppModel::new(config());
        let mut cmds = Vec::new();
        update(&mut model, Msg::Upload(UploadMsg::DepartmentChanged(4)), &mut cmds);
        update(
            &mut model,
            Msg::Upload(UploadMsg::OfficerIdChanged("17".into())),
            &mut cmds,
        );
        update(
            &mut model,
            Msg::Upload(UploadMsg::FilesPicked(vec![PathBuf::from("face.jpg")])),
            &mut cmds,
        );

        match cmds.as_slice() {
            [Command::UploadImage { key, request }] => {
                assert_eq!(*key, model.upload.items()[0].key);
                assert_eq!(
                    request.endpoint.as_str(),
                    "http://localhost:3000/upload/department/4/officer/17"
                );
                assert_eq!(request.csrf_token, "tok");
                assert_eq!(request.file, PathBuf::from("face.jpg"));
            }
            other => panic!("unexpected commands: {other:?}"),
        }
    }

    #[test]
    fn failed_upload_stays_next_to_the_file() {
        let mut model = AppModel::new(config());
        let mut cmds = Vec::new();
        update(&mut model, Msg::Upload(UploadMsg::DepartmentChanged(4)), &mut cmds);
        update(
            &mut model,
            Msg::Upload(UploadMsg::FilesPicked(vec![PathBuf::from("/nonexistent/face.png")])),
            &mut cmds,
        );

        let msg = run_command(cmds.remove(0));
        update(&mut model, msg, &mut cmds);

        assert!(matches!(
            model.upload.items()[0].status,
            upload::UploadStatus::Failed(_)
        ));
        assert!(model.error.is_none());
    }

    #[test]
    fn password_messages_reach_the_right_form() {
        let mut model = AppModel::default();
        update(
            &mut model,
            Msg::ChangePassword(PasswordMsg::PasswordChanged("correct horse battery staple".into())),
            &mut Vec::new(),
        );

        assert!(model.change_password.meter() >= 3);
        assert_eq!(model.registration.meter(), 0);
    }
}
