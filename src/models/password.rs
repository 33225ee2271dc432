// SPDX-License-Identifier: GPL-3.0-only
// SPDX-FileCopyrightText: 2025 OpenOversight contributors

//! Password strength and confirmation rules for the account forms.

use email_address::EmailAddress;

/// Lowest meter value accepted for submission.
pub const MIN_METER: u8 = 3;
/// Confirmation meter value once something has been typed.
pub const CONFIRMATION_FULL: u8 = 5;

/// Scores a password from 0 (weakest) to 4 (strongest).
pub trait StrengthScorer {
    fn score(&self, password: &str, user_inputs: &[&str]) -> u8;
}

/// Scorer backed by the zxcvbn estimator.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZxcvbnScorer;

impl StrengthScorer for ZxcvbnScorer {
    fn score(&self, password: &str, user_inputs: &[&str]) -> u8 {
        zxcvbn::zxcvbn(password, user_inputs)
            .map(|entropy| entropy.score())
            .unwrap_or(0)
    }
}

/// Meter fill level: `score + 1` for a non-empty password, `0` otherwise.
pub fn strength_meter(password: &str, score: u8) -> u8 {
    if password.is_empty() { 0 } else { score.min(4) + 1 }
}

/// Text shown next to the strength meter.
pub fn strength_label(password: &str, meter: u8) -> &'static str {
    if password.is_empty() {
        ""
    } else if meter < MIN_METER {
        "Password not strong enough"
    } else {
        "OK"
    }
}

/// State of the confirmation meter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Confirmation {
    Empty,
    Matches,
    Differs,
}

impl Confirmation {
    pub fn of(password: &str, confirmation: &str) -> Self {
        if confirmation.is_empty() {
            Self::Empty
        } else if password == confirmation {
            Self::Matches
        } else {
            Self::Differs
        }
    }

    pub fn meter(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Matches | Self::Differs => CONFIRMATION_FULL,
        }
    }
}

/// Field values of a password form. Identity fields are `None` when the page
/// does not show them (e.g. the change-password page has no email field).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PasswordForm {
    pub email: Option<String>,
    pub username: Option<String>,
    pub old_password: Option<String>,
    pub password: String,
    pub confirmation: String,
}

impl PasswordForm {
    /// Registration page: email, username, password, confirmation.
    pub fn registration() -> Self {
        Self {
            email: Some(String::new()),
            username: Some(String::new()),
            ..Default::default()
        }
    }

    /// Change-password page: old password, password, confirmation.
    pub fn change_password() -> Self {
        Self {
            old_password: Some(String::new()),
            ..Default::default()
        }
    }

    /// Dictionary hints passed to the scorer.
    pub fn user_inputs(&self) -> Vec<&str> {
        [self.email.as_deref(), self.username.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Reasons the form cannot be submitted yet; empty when valid.
    pub fn problems(&self, meter: u8) -> Vec<&'static str> {
        let mut problems = Vec::new();
        if let Some(email) = &self.email {
            if email.trim().is_empty() {
                problems.push("Email is required.");
            } else if !EmailAddress::is_valid(email.trim()) {
                problems.push("Email is not a valid address.");
            }
        }
        if self.username.as_deref().is_some_and(str::is_empty) {
            problems.push("Username is required.");
        }
        if self.old_password.as_deref().is_some_and(str::is_empty) {
            problems.push("Old password is required.");
        }
        if meter < MIN_METER {
            problems.push("Password is not strong enough.");
        }
        if Confirmation::of(&self.password, &self.confirmation) != Confirmation::Matches {
            problems.push("Passwords do not match.");
        }
        problems
    }

    pub fn is_valid(&self, meter: u8) -> bool {
        self.problems(meter).is_empty()
    }
}
