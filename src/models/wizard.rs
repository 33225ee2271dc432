// SPDX-License-Identifier: GPL-3.0-only
// SPDX-FileCopyrightText: 2025 OpenOversight contributors

//! Step navigation for the find-officer wizard.

/// Number of steps in the wizard.
pub const STEP_COUNT: usize = 4;

/// Steps are 1-based to match the page labels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Wizard {
    enabled: [bool; STEP_COUNT],
    /// Activation controls still on the page (index 0 is unused; step 1 starts enabled).
    activators: [bool; STEP_COUNT],
    active: usize,
}

impl Default for Wizard {
    fn default() -> Self {
        Self {
            enabled: [true, false, false, false],
            activators: [false, true, true, true],
            active: 1,
        }
    }
}

impl Wizard {
    pub fn active(&self) -> usize {
        self.active
    }

    pub fn is_enabled(&self, step: usize) -> bool {
        step_index(step).is_some_and(|i| self.enabled[i])
    }

    /// Whether the "next" control that unlocks `step` is still offered.
    pub fn can_activate(&self, step: usize) -> bool {
        step_index(step).is_some_and(|i| self.activators[i])
    }

    /// Show `step` if it is enabled. Returns whether the active step changed.
    pub fn select(&mut self, step: usize) -> bool {
        if !self.is_enabled(step) || self.active == step {
            return false;
        }
        self.active = step;
        true
    }

    /// Enable and show `step`, consuming its activation control.
    /// Returns `false` when the control was already used.
    pub fn activate(&mut self, step: usize) -> bool {
        let Some(i) = step_index(step) else {
            return false;
        };
        if !self.activators[i] {
            return false;
        }
        self.activators[i] = false;
        self.enabled[i] = true;
        self.active = step;
        true
    }
}

fn step_index(step: usize) -> Option<usize> {
    (1..=STEP_COUNT).contains(&step).then(|| step - 1)
}
