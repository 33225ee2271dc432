// SPDX-License-Identifier: GPL-3.0-only
// SPDX-FileCopyrightText: 2025 OpenOversight contributors

//! Video links behind a content-warning overlay until revealed.

use std::collections::HashSet;

use eframe::egui;
use egui_phosphor::regular;
use uuid::Uuid;

use crate::models::field_group::FieldGroupList;

pub const WARNING_TITLE: &str = "Content Warning";
pub const WARNING_TEXT: &str = "This video may be disturbing for some viewers";

/// Link types rendered as media.
const VIDEO_TYPES: [&str; 2] = ["video", "other_video"];

/// A video link taken from the links editor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaItem {
    pub key: Uuid,
    pub title: String,
    pub url: String,
    pub warned: bool,
}

/// Collect the video links of `links`, skipping hidden and empty groups.
pub fn media_items(links: &FieldGroupList) -> Vec<MediaItem> {
    links
        .groups()
        .iter()
        .filter(|g| !g.is_hidden())
        .filter(|g| {
            g.value_of("link_type")
                .is_some_and(|kind| VIDEO_TYPES.contains(&kind))
        })
        .filter_map(|g| {
            let url = g.value_of("url")?.trim();
            if url.is_empty() {
                return None;
            }
            let title = g
                .value_of("title")
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or(url);
            Some(MediaItem {
                key: g.key,
                title: title.to_string(),
                url: url.to_string(),
                warned: g.value_of("has_content_warning") == Some("Yes"),
            })
        })
        .collect()
}

/// Items revealed during this session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentWarningModel {
    revealed: HashSet<Uuid>,
}

impl ContentWarningModel {
    pub fn is_covered(&self, item: &MediaItem) -> bool {
        item.warned && !self.revealed.contains(&item.key)
    }

    /// Forget reveals of link groups that no longer exist.
    pub fn retain_groups(&mut self, links: &FieldGroupList) {
        self.revealed
            .retain(|key| links.groups().iter().any(|g| g.key == *key));
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentWarningMsg {
    Reveal(Uuid),
    Open(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentWarningCommand {
    OpenUrl(String),
}

pub fn update(
    model: &mut ContentWarningModel,
    msg: ContentWarningMsg,
    cmds: &mut Vec<ContentWarningCommand>,
) {
    match msg {
        ContentWarningMsg::Reveal(key) => {
            model.revealed.insert(key);
        }
        ContentWarningMsg::Open(url) => cmds.push(ContentWarningCommand::OpenUrl(url)),
    }
}

pub fn view(
    ui: &mut egui::Ui,
    model: &ContentWarningModel,
    items: &[MediaItem],
) -> Vec<ContentWarningMsg> {
    let mut msgs = Vec::new();

    if items.is_empty() {
        ui.label(
            egui::RichText::new("Add a link of type video to preview it here.")
                .small()
                .color(egui::Color32::from_gray(110)),
        );
        return msgs;
    }

    for item in items {
        ui.push_id(item.key, |ui| {
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.set_min_height(90.0);
                if model.is_covered(item) {
                    ui.vertical_centered(|ui| {
                        ui.label(
                            egui::RichText::new(format!("{} {WARNING_TITLE}", regular::WARNING))
                                .strong()
                                .color(egui::Color32::from_rgb(232, 89, 12)),
                        );
                        ui.label(WARNING_TEXT);
                        if ui.button("Show video").clicked() {
                            msgs.push(ContentWarningMsg::Reveal(item.key));
                        }
                    });
                } else {
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new(regular::VIDEO).size(28.0));
                        ui.vertical(|ui| {
                            ui.strong(item.title.as_str());
                            if ui.link(item.url.as_str()).clicked() {
                                msgs.push(ContentWarningMsg::Open(item.url.clone()));
                            }
                        });
                    });
                }
            });
        });
        ui.add_space(4.0);
    }

    msgs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::field_group::FieldInput;

    fn links() -> FieldGroupList {
        FieldGroupList::new(
            "links",
            vec![
                FieldInput::text(Some("url"), "URL"),
                FieldInput::select("link_type", "Type", &["link", "video", "other_video"]),
                FieldInput::text(Some("title"), "Title"),
                FieldInput::select("has_content_warning", "Content warning", &["No", "Yes"]),
            ],
        )
    }

    #[test]
    fn only_video_links_become_media() {
        let mut list = links();
        list.set_value(0, 0, "https://example.org/a".into()).unwrap();
        list.set_value(0, 1, "link".into()).unwrap();
        list.add();
        list.set_value(1, 0, "https://example.org/b".into()).unwrap();
        list.set_value(1, 1, "video".into()).unwrap();
        list.set_value(1, 3, "Yes".into()).unwrap();

        let items = media_items(&list);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].url, "https://example.org/b");
        assert_eq!(items[0].title, "https://example.org/b");
        assert!(items[0].warned);
    }

    #[test]
    fn reveal_uncovers_for_the_session() {
        let mut list = links();
        list.set_value(0, 0, "https://example.org/v".into()).unwrap();
        list.set_value(0, 1, "other_video".into()).unwrap();
        list.set_value(0, 3, "Yes".into()).unwrap();
        let item = media_items(&list).remove(0);

        let mut model = ContentWarningModel::default();
        assert!(model.is_covered(&item));

        update(&mut model, ContentWarningMsg::Reveal(item.key), &mut Vec::new());

        assert!(!model.is_covered(&item));
    }

    #[test]
    fn reveals_of_removed_groups_are_forgotten() {
        let mut list = links();
        list.add();
        let kept = list.groups()[0].key;
        let removed = list.groups()[1].key;
        let mut model = ContentWarningModel::default();
        update(&mut model, ContentWarningMsg::Reveal(kept), &mut Vec::new());
        update(&mut model, ContentWarningMsg::Reveal(removed), &mut Vec::new());

        list.remove(1).unwrap();
        model.retain_groups(&list);

        assert_eq!(model.revealed, HashSet::from([kept]));
    }

    #[test]
    fn open_requests_browser() {
        let mut model = ContentWarningModel::default();
        let mut cmds = Vec::new();

        update(
            &mut model,
            ContentWarningMsg::Open("https://example.org/v".into()),
            &mut cmds,
        );

        assert_eq!(
            cmds,
            vec![ContentWarningCommand::OpenUrl("https://example.org/v".into())]
        );
    }
}
