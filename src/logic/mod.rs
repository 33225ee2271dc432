// SPDX-License-Identifier: GPL-3.0-only
// SPDX-FileCopyrightText: 2025 OpenOversight contributors

//! Side-effecting business logic run by command workers.

pub mod choices;
pub mod upload;
