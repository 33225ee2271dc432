// SPDX-License-Identifier: GPL-3.0-only
// SPDX-FileCopyrightText: 2025 OpenOversight contributors

//! Face tag editor: pick an image, place a frame, preview it scaled.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use eframe::egui;
use egui_phosphor::regular;
use log::warn;

use crate::models::tag_frame::{PercentBox, PixelBox, natural_size, to_percent};

/// Longest edge of the decoded preview texture.
const PREVIEW_MAX: u32 = 1024;

/// Loaded image and the tag placed on it.
#[derive(Clone, Default)]
pub struct FaceTagModel {
    image_path: Option<PathBuf>,
    natural: Option<(u32, u32)>,
    texture: Option<egui::TextureHandle>,
    tag: PixelBox,
    loading: bool,
}

impl FaceTagModel {
    pub fn natural(&self) -> Option<(u32, u32)> {
        self.natural
    }

    pub fn tag(&self) -> PixelBox {
        self.tag
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Frame as percentages of the natural size, once an image is loaded.
    pub fn percent(&self) -> Option<PercentBox> {
        self.natural.and_then(|natural| to_percent(self.tag, natural).ok())
    }
}

pub enum FaceTagMsg {
    PickImage,
    ImagePicked(Option<PathBuf>),
    ImageReady {
        path: PathBuf,
        natural: (u32, u32),
        texture: egui::TextureHandle,
    },
    ImageFailed {
        path: PathBuf,
        error: String,
    },
    TagChanged(PixelBox),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FaceTagCommand {
    PickImage,
    LoadImage { path: PathBuf },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaceTagEvent {
    pub message: String,
    pub is_error: bool,
}

pub fn update(
    model: &mut FaceTagModel,
    msg: FaceTagMsg,
    cmds: &mut Vec<FaceTagCommand>,
) -> Option<FaceTagEvent> {
    match msg {
        FaceTagMsg::PickImage => {
            cmds.push(FaceTagCommand::PickImage);
            None
        }
        FaceTagMsg::ImagePicked(None) => Some(FaceTagEvent {
            message: "No image selected.".into(),
            is_error: false,
        }),
        FaceTagMsg::ImagePicked(Some(path)) => {
            model.loading = true;
            cmds.push(FaceTagCommand::LoadImage { path });
            None
        }
        FaceTagMsg::ImageReady {
            path,
            natural,
            texture,
        } => {
            model.loading = false;
            model.tag = model.tag.clamped(natural);
            model.natural = Some(natural);
            model.texture = Some(texture);
            let message = format!(
                "Loaded {} ({}x{})",
                path.display(),
                natural.0,
                natural.1
            );
            model.image_path = Some(path);
            Some(FaceTagEvent {
                message,
                is_error: false,
            })
        }
        FaceTagMsg::ImageFailed { path, error } => {
            model.loading = false;
            warn!("Failed to load face image {}: {error}", path.display());
            Some(FaceTagEvent {
                message: format!("Could not open image:\n\n{error}"),
                is_error: true,
            })
        }
        FaceTagMsg::TagChanged(tag) => {
            model.tag = match model.natural {
                Some(natural) => tag.clamped(natural),
                None => tag,
            };
            None
        }
    }
}

/// Decode `path` for preview, returning its natural size and a downscaled image.
pub fn load_preview(path: &Path) -> Result<((u32, u32), egui::ColorImage)> {
    let natural = natural_size(path)?;
    let decoded =
        image::open(path).with_context(|| format!("Failed to decode {}", path.display()))?;
    let preview = decoded.thumbnail(PREVIEW_MAX, PREVIEW_MAX).to_rgba8();
    let size = [preview.width() as usize, preview.height() as usize];
    let pixels = preview.into_raw();
    Ok((
        natural,
        egui::ColorImage::from_rgba_unmultiplied(size, &pixels),
    ))
}

pub fn view(ui: &mut egui::Ui, model: &FaceTagModel) -> Vec<FaceTagMsg> {
    let mut msgs = Vec::new();

    ui.horizontal(|ui| {
        let label = format!("{} Choose image", regular::IMAGE);
        if ui.add_enabled(!model.loading, egui::Button::new(label)).clicked() {
            msgs.push(FaceTagMsg::PickImage);
        }
        if model.loading {
            ui.add(egui::Spinner::new().size(14.0));
        } else if let Some(path) = &model.image_path {
            ui.label(
                egui::RichText::new(path.display().to_string())
                    .small()
                    .color(egui::Color32::from_gray(110)),
            );
        }
    });

    let (Some(natural), Some(texture)) = (model.natural, &model.texture) else {
        return msgs;
    };

    ui.add_space(6.0);
    render_tag_inputs(ui, model.tag, natural, &mut msgs);

    if let Some(pct) = model.percent() {
        ui.label(format!(
            "left {:.1}%  top {:.1}%  width {:.1}%  height {:.1}%",
            pct.left, pct.top, pct.width, pct.height
        ));

        // Never upscale past the natural width.
        let width = ui.available_width().min(natural.0 as f32);
        let height = width * natural.1 as f32 / natural.0 as f32;
        let rect = ui
            .add(egui::Image::new((texture.id(), egui::vec2(width, height))))
            .rect;
        let (x, y, w, h) = pct.scaled(rect.width(), rect.height());
        let frame = egui::Rect::from_min_size(rect.min + egui::vec2(x, y), egui::vec2(w, h));
        ui.painter().rect_stroke(
            frame,
            0.0,
            egui::Stroke::new(2.0, egui::Color32::from_rgb(255, 200, 0)),
            egui::StrokeKind::Outside,
        );
    }

    msgs
}

fn render_tag_inputs(
    ui: &mut egui::Ui,
    tag: PixelBox,
    natural: (u32, u32),
    msgs: &mut Vec<FaceTagMsg>,
) {
    let mut edited = tag;
    let mut changed = false;
    egui::Grid::new("face_tag_grid")
        .num_columns(4)
        .spacing(egui::vec2(8.0, 6.0))
        .show(ui, |ui| {
            ui.label("Left");
            changed |= ui
                .add(egui::DragValue::new(&mut edited.left).range(0..=natural.0))
                .changed();
            ui.label("Top");
            changed |= ui
                .add(egui::DragValue::new(&mut edited.top).range(0..=natural.1))
                .changed();
            ui.end_row();

            ui.label("Width");
            changed |= ui
                .add(egui::DragValue::new(&mut edited.width).range(0..=natural.0))
                .changed();
            ui.label("Height");
            changed |= ui
                .add(egui::DragValue::new(&mut edited.height).range(0..=natural.1))
                .changed();
            ui.end_row();
        });
    if changed {
        msgs.push(FaceTagMsg::TagChanged(edited));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};
    use tempfile::TempDir;

    fn texture() -> egui::TextureHandle {
        let ctx = egui::Context::default();
        let image = egui::ColorImage::from_rgba_unmultiplied([1, 1], &[255, 255, 255, 255]);
        ctx.load_texture("face-test", image, egui::TextureOptions::default())
    }

    #[test]
    fn picking_an_image_requests_a_load() {
        let mut model = FaceTagModel::default();
        let mut cmds = Vec::new();

        update(&mut model, FaceTagMsg::PickImage, &mut cmds);
        update(
            &mut model,
            FaceTagMsg::ImagePicked(Some(PathBuf::from("face.png"))),
            &mut cmds,
        );

        assert_eq!(
            cmds,
            vec![
                FaceTagCommand::PickImage,
                FaceTagCommand::LoadImage {
                    path: PathBuf::from("face.png")
                }
            ]
        );
        assert!(model.is_loading());
    }

    #[test]
    fn ready_image_enables_percentages() {
        let mut model = FaceTagModel::default();
        let mut cmds = Vec::new();
        assert!(model.percent().is_none());

        update(
            &mut model,
            FaceTagMsg::ImageReady {
                path: PathBuf::from("face.png"),
                natural: (800, 400),
                texture: texture(),
            },
            &mut cmds,
        );
        update(
            &mut model,
            FaceTagMsg::TagChanged(PixelBox {
                left: 100,
                top: 50,
                width: 200,
                height: 900,
            }),
            &mut cmds,
        );

        assert_eq!(model.tag().height, 350);
        let pct = model.percent().unwrap();
        assert_eq!((pct.left, pct.width), (12.5, 25.0));
        assert!(!model.is_loading());
    }

    #[test]
    fn failed_load_surfaces_error() {
        let mut model = FaceTagModel::default();
        let event = update(
            &mut model,
            FaceTagMsg::ImageFailed {
                path: PathBuf::from("broken.png"),
                error: "bad header".into(),
            },
            &mut Vec::new(),
        )
        .unwrap();

        assert!(event.is_error);
        assert!(model.natural().is_none());
    }

    #[test]
    fn preview_keeps_natural_size_and_aspect() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("wide.png");
        let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_pixel(2048, 512, Rgba([10, 20, 30, 255]));
        img.save(&path).unwrap();

        let (natural, preview) = load_preview(&path).unwrap();

        assert_eq!(natural, (2048, 512));
        assert_eq!(preview.size, [1024, 256]);
    }
}
