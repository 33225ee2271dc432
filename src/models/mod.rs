// SPDX-License-Identifier: GPL-3.0-only
// SPDX-FileCopyrightText: 2025 OpenOversight contributors

//! Domain layer: pure data types and rules shared between the UI and side-effect runners.

pub mod browse;
pub mod choices;
pub mod description;
pub mod field_group;
pub mod password;
pub mod tag_frame;
pub mod wizard;
