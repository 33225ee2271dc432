// SPDX-License-Identifier: GPL-3.0-only
// SPDX-FileCopyrightText: 2025 OpenOversight contributors

//! Repeatable field groups ("add another link", rank lists, license plates).
//!
//! A [`FieldGroupList`] owns the ordinals of its groups explicitly; submitted
//! names such as `links-3-url` are rendered from a typed [`FieldName`] rather
//! than rewritten with string patterns.

use std::fmt;

use uuid::Uuid;

/// Identifier of one submitted input: `<prefix>-<ordinal>` or `<prefix>-<ordinal>-<suffix>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldName {
    pub prefix: String,
    pub ordinal: usize,
    pub suffix: Option<String>,
}

impl FieldName {
    pub fn new(prefix: impl Into<String>, ordinal: usize, suffix: Option<&str>) -> Self {
        Self {
            prefix: prefix.into(),
            ordinal,
            suffix: suffix.map(str::to_string),
        }
    }

    /// Parse a rendered identifier back into its parts.
    ///
    /// The ordinal is the first all-digit `-` separated segment after a
    /// non-empty prefix; everything after it is the suffix.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let name = FieldName::parse("license_plates-2-number").unwrap();
    /// assert_eq!(name.prefix, "license_plates");
    /// assert_eq!(name.ordinal, 2);
    /// assert_eq!(name.suffix.as_deref(), Some("number"));
    /// ```
    pub fn parse(raw: &str) -> Result<Self, FieldGroupError> {
        let segments: Vec<&str> = raw.split('-').collect();
        let split_at = segments
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, seg)| !seg.is_empty() && seg.chars().all(|c| c.is_ascii_digit()))
            .map(|(idx, _)| idx)
            .ok_or_else(|| FieldGroupError::MalformedName(raw.to_string()))?;

        let prefix = segments[..split_at].join("-");
        if prefix.is_empty() {
            return Err(FieldGroupError::MalformedName(raw.to_string()));
        }
        let ordinal = segments[split_at]
            .parse::<usize>()
            .map_err(|_| FieldGroupError::MalformedName(raw.to_string()))?;
        let rest = segments[split_at + 1..].join("-");
        let suffix = if rest.is_empty() { None } else { Some(rest) };

        Ok(Self {
            prefix,
            ordinal,
            suffix,
        })
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.suffix {
            Some(suffix) => write!(f, "{}-{}-{}", self.prefix, self.ordinal, suffix),
            None => write!(f, "{}-{}", self.prefix, self.ordinal),
        }
    }
}

/// Errors raised by the field-group controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldGroupError {
    /// No group exists at the given list position.
    UnknownPosition(usize),
    /// No input exists at the given index inside a group.
    UnknownInput { position: usize, input: usize },
    /// A rendered identifier did not match `<prefix>-<ordinal>[-<suffix>]`.
    MalformedName(String),
    /// The list keeps clone-time ordinals and does not support reordering.
    ReorderDisabled,
}

impl fmt::Display for FieldGroupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPosition(pos) => write!(f, "No field group at position {pos}"),
            Self::UnknownInput { position, input } => {
                write!(f, "No input {input} in field group at position {position}")
            }
            Self::MalformedName(raw) => write!(f, "Malformed field identifier: {raw:?}"),
            Self::ReorderDisabled => write!(f, "This list does not support reordering"),
        }
    }
}

impl std::error::Error for FieldGroupError {}

/// How an input is edited and whether it survives clearing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Select(Vec<String>),
    /// Anti-forgery token; never cleared.
    Token,
}

/// One input inside a field group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldInput {
    pub suffix: Option<String>,
    pub label: String,
    pub kind: InputKind,
    pub value: String,
}

impl FieldInput {
    pub fn text(suffix: Option<&str>, label: &str) -> Self {
        Self {
            suffix: suffix.map(str::to_string),
            label: label.to_string(),
            kind: InputKind::Text,
            value: String::new(),
        }
    }

    pub fn select(suffix: &str, label: &str, options: &[&str]) -> Self {
        Self {
            suffix: Some(suffix.to_string()),
            label: label.to_string(),
            kind: InputKind::Select(options.iter().map(|o| o.to_string()).collect()),
            value: String::new(),
        }
    }

    pub fn token(value: &str) -> Self {
        Self {
            suffix: Some("csrf_token".to_string()),
            label: String::new(),
            kind: InputKind::Token,
            value: value.to_string(),
        }
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self.kind, InputKind::Token)
    }
}

/// Visibility state of a group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupState {
    /// Kept only so the server-side parser has one group to bind against.
    Hidden,
    Populated,
}

/// One repeatable unit of inputs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldGroup {
    /// Stable identity for widgets; unaffected by renumbering.
    pub key: Uuid,
    pub ordinal: usize,
    pub state: GroupState,
    pub inputs: Vec<FieldInput>,
}

impl FieldGroup {
    fn new(ordinal: usize, state: GroupState, inputs: Vec<FieldInput>) -> Self {
        Self {
            key: Uuid::new_v4(),
            ordinal,
            state,
            inputs,
        }
    }

    /// Rendered name of the input at `index`, if present.
    pub fn name_of(&self, prefix: &str, index: usize) -> Option<FieldName> {
        self.inputs
            .get(index)
            .map(|input| FieldName::new(prefix, self.ordinal, input.suffix.as_deref()))
    }

    pub fn is_hidden(&self) -> bool {
        self.state == GroupState::Hidden
    }

    /// Value of the input with the given suffix.
    pub fn value_of(&self, suffix: &str) -> Option<&str> {
        self.inputs
            .iter()
            .find(|input| input.suffix.as_deref() == Some(suffix))
            .map(|input| input.value.as_str())
    }

    fn clear_values(&mut self, prefix: &str) {
        let ordinal = self.ordinal;
        for input in &mut self.inputs {
            if !is_exempt(prefix, ordinal, input) {
                input.value.clear();
            }
        }
    }
}

/// Whether `input` keeps its value through clone and remove.
fn is_exempt(prefix: &str, ordinal: usize, input: &FieldInput) -> bool {
    matches!(input.kind, InputKind::Token)
        || FieldName::new(prefix, ordinal, input.suffix.as_deref())
            .to_string()
            .contains("csrf")
}

/// Ordinal policy for a list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrdinalPolicy {
    /// Clone takes `max + 1`; removal leaves gaps; no reordering.
    #[default]
    Preserve,
    /// Reorderable; ordinals are renumbered densely after every structural change.
    DenseOnReorder,
}

/// Result of an add request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    /// A hidden group was shown instead of cloning.
    Revealed(usize),
    /// A new group with this ordinal was inserted.
    Cloned(usize),
}

/// Result of a remove request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoveOutcome {
    Deleted(usize),
    /// The last group was cleared and hidden instead of deleted.
    ResetAndHidden(usize),
}

/// Controller for an ordered list of field groups. Never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldGroupList {
    prefix: String,
    noun: String,
    policy: OrdinalPolicy,
    groups: Vec<FieldGroup>,
}

impl FieldGroupList {
    /// Create a list with a single populated group built from `template`.
    pub fn new(prefix: impl Into<String>, template: Vec<FieldInput>) -> Self {
        let prefix = prefix.into();
        let noun = prefix.replace('_', " ");
        Self {
            prefix,
            noun,
            policy: OrdinalPolicy::Preserve,
            groups: vec![FieldGroup::new(0, GroupState::Populated, template)],
        }
    }

    pub fn with_noun(mut self, noun: impl Into<String>) -> Self {
        self.noun = noun.into();
        self
    }

    pub fn with_policy(mut self, policy: OrdinalPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Start with the single group hidden (an empty server-rendered template).
    pub fn starting_hidden(mut self) -> Self {
        if let [only] = self.groups.as_mut_slice() {
            only.state = GroupState::Hidden;
        }
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn policy(&self) -> OrdinalPolicy {
        self.policy
    }

    pub fn groups(&self) -> &[FieldGroup] {
        &self.groups
    }

    pub fn visible_count(&self) -> usize {
        self.groups.iter().filter(|g| !g.is_hidden()).count()
    }

    pub fn max_ordinal(&self) -> usize {
        self.groups.iter().map(|g| g.ordinal).max().unwrap_or(0)
    }

    /// Label for the list's add control.
    pub fn add_label(&self) -> String {
        format!("Add another {}", self.noun)
    }

    /// Add after the last group, the way the page's add button works.
    pub fn add(&mut self) -> AddOutcome {
        let last = self.groups.len() - 1;
        self.insert_after(last)
    }

    /// Add relative to the group at `position`.
    ///
    /// A hidden reference is revealed; a populated one is cloned with the next
    /// unused ordinal and inserted right after it.
    pub fn add_after(&mut self, position: usize) -> Result<AddOutcome, FieldGroupError> {
        if position >= self.groups.len() {
            return Err(FieldGroupError::UnknownPosition(position));
        }
        Ok(self.insert_after(position))
    }

    fn insert_after(&mut self, position: usize) -> AddOutcome {
        let reference = &mut self.groups[position];
        if reference.is_hidden() {
            reference.state = GroupState::Populated;
            return AddOutcome::Revealed(reference.ordinal);
        }

        let ordinal = self.max_ordinal() + 1;
        let mut clone = FieldGroup::new(
            ordinal,
            GroupState::Populated,
            self.groups[position].inputs.clone(),
        );
        clone.clear_values(&self.prefix);
        self.groups.insert(position + 1, clone);
        if self.renumbers_densely() {
            self.renumber();
            return AddOutcome::Cloned(self.groups[position + 1].ordinal);
        }
        AddOutcome::Cloned(ordinal)
    }

    /// Remove the group at `position`, or clear and hide it when it is the last one.
    pub fn remove(&mut self, position: usize) -> Result<RemoveOutcome, FieldGroupError> {
        if position >= self.groups.len() {
            return Err(FieldGroupError::UnknownPosition(position));
        }

        if self.groups.len() > 1 {
            let removed = self.groups.remove(position);
            if self.renumbers_densely() {
                self.renumber();
            }
            return Ok(RemoveOutcome::Deleted(removed.ordinal));
        }

        let prefix = self.prefix.clone();
        let only = &mut self.groups[position];
        only.clear_values(&prefix);
        only.state = GroupState::Hidden;
        let ordinal = only.ordinal;
        if self.renumbers_densely() {
            self.renumber();
        }
        Ok(RemoveOutcome::ResetAndHidden(ordinal))
    }

    fn renumbers_densely(&self) -> bool {
        self.policy == OrdinalPolicy::DenseOnReorder
    }

    pub fn set_value(
        &mut self,
        position: usize,
        input: usize,
        value: String,
    ) -> Result<(), FieldGroupError> {
        let slot = self
            .groups
            .get_mut(position)
            .ok_or(FieldGroupError::UnknownPosition(position))?
            .inputs
            .get_mut(input)
            .ok_or(FieldGroupError::UnknownInput { position, input })?;
        slot.value = value;
        Ok(())
    }

    /// Move a group to a new position and renumber.
    pub fn move_group(&mut self, from: usize, to: usize) -> Result<(), FieldGroupError> {
        if self.policy != OrdinalPolicy::DenseOnReorder {
            return Err(FieldGroupError::ReorderDisabled);
        }
        if from >= self.groups.len() {
            return Err(FieldGroupError::UnknownPosition(from));
        }
        if to >= self.groups.len() {
            return Err(FieldGroupError::UnknownPosition(to));
        }
        let group = self.groups.remove(from);
        self.groups.insert(to, group);
        self.renumber();
        Ok(())
    }

    /// Assign dense ordinals `0..n` to populated groups in order; hidden groups follow.
    pub fn renumber(&mut self) {
        let mut next = 0;
        for group in self.groups.iter_mut().filter(|g| !g.is_hidden()) {
            group.ordinal = next;
            next += 1;
        }
        for group in self.groups.iter_mut().filter(|g| g.is_hidden()) {
            group.ordinal = next;
            next += 1;
        }
    }

    /// `(name, value)` pairs for submission, in list order.
    pub fn form_data(&self) -> Vec<(String, String)> {
        self.groups
            .iter()
            .flat_map(|group| {
                group.inputs.iter().enumerate().filter_map(move |(index, input)| {
                    group
                        .name_of(&self.prefix, index)
                        .map(|name| (name.to_string(), input.value.clone()))
                })
            })
            .collect()
    }
}

/// Noun shown on an add button for a fieldset legend such as `"Plate Number:"`.
pub fn noun_for_legend(legend: &str) -> String {
    const KNOWN: [(&str, &str); 3] = [
        ("Plate Number", "license plate"),
        ("Link", "link"),
        ("OO Officer ID", "officer"),
    ];

    let trimmed = legend.trim().trim_end_matches(':').trim();
    KNOWN
        .iter()
        .find(|(key, _)| trimmed.contains(key))
        .map(|(_, noun)| noun.to_string())
        .unwrap_or_else(|| trimmed.to_lowercase())
}
