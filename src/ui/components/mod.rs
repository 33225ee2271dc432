// SPDX-License-Identifier: GPL-3.0-only
// SPDX-FileCopyrightText: 2025 OpenOversight contributors

//! Form widgets structured for MVU-style updates.

pub mod choices;
pub mod content_warning;
pub mod description;
pub mod face_tag;
pub mod field_groups;
pub mod password;
pub mod toggle;
pub mod upload;
pub mod wizard;

pub use toggle::toggle_switch;
