// SPDX-License-Identifier: GPL-3.0-only
// SPDX-FileCopyrightText: 2025 OpenOversight contributors

//! Face tag frames positioned relative to an image's natural size.
//!
//! Tags are stored in source-image pixels; the preview scales with the
//! viewport, so the frame is expressed as percentages of the natural size.

use std::path::Path;

use anyhow::{Context, Result, bail};

/// Tag box in source-image pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelBox {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelBox {
    /// Keep the box inside an image of `natural` `(width, height)`.
    pub fn clamped(self, natural: (u32, u32)) -> Self {
        let (nat_w, nat_h) = natural;
        let left = self.left.min(nat_w);
        let top = self.top.min(nat_h);
        Self {
            left,
            top,
            width: self.width.min(nat_w - left),
            height: self.height.min(nat_h - top),
        }
    }
}

/// Tag box as percentages of the natural image size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PercentBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl PercentBox {
    /// Map onto a rectangle of the given on-screen size, returning `(x, y, w, h)`.
    pub fn scaled(&self, width: f32, height: f32) -> (f32, f32, f32, f32) {
        (
            self.left / 100.0 * width,
            self.top / 100.0 * height,
            self.width / 100.0 * width,
            self.height / 100.0 * height,
        )
    }
}

/// Convert a pixel box into percentages of `natural` `(width, height)`.
pub fn to_percent(tag: PixelBox, natural: (u32, u32)) -> Result<PercentBox> {
    let (nat_w, nat_h) = natural;
    if nat_w == 0 || nat_h == 0 {
        bail!("Image has no natural size ({nat_w}x{nat_h})");
    }
    let (nat_w, nat_h) = (nat_w as f32, nat_h as f32);
    Ok(PercentBox {
        left: tag.left as f32 / nat_w * 100.0,
        top: tag.top as f32 / nat_h * 100.0,
        width: tag.width as f32 / nat_w * 100.0,
        height: tag.height as f32 / nat_h * 100.0,
    })
}

/// Read the natural `(width, height)` of an image file without decoding pixels.
pub fn natural_size(path: &Path) -> Result<(u32, u32)> {
    image::image_dimensions(path)
        .with_context(|| format!("Failed to read image dimensions: {}", path.display()))
}
