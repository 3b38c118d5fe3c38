//! Checklist State Manager — per-skill check/comment state for one evaluation.

use std::collections::BTreeMap;

use crate::checklist::extractor::SkillList;

/// Check/comment state keyed by skill position.
///
/// Absent `checked` entries mean unchecked, absent `comments` entries mean "".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecklistState {
    pub checked: BTreeMap<usize, bool>,
    pub comments: BTreeMap<usize, String>,
    pub global_notes: String,
}

impl ChecklistState {
    pub fn is_checked(&self, index: usize) -> bool {
        self.checked.get(&index).copied().unwrap_or(false)
    }

    pub fn comment(&self, index: usize) -> &str {
        self.comments.get(&index).map(String::as_str).unwrap_or("")
    }

    /// True when nothing has been recorded: all unchecked, no comments, no notes.
    pub fn is_fresh(&self) -> bool {
        !self.checked.values().any(|&c| c)
            && self.comments.values().all(String::is_empty)
            && self.global_notes.is_empty()
    }
}

/// A checklist bound to the skill list it was opened against.
#[derive(Debug, Clone)]
pub struct Checklist {
    skills: SkillList,
    state: ChecklistState,
}

impl Checklist {
    /// Opens a checklist over `skills`.
    ///
    /// Without previous state every skill starts unchecked. With previous
    /// state, entries are re-keyed by position and anything at or beyond
    /// `skills.len()` is dropped.
    pub fn initialize(skills: SkillList, previous: Option<ChecklistState>) -> Self {
        let len = skills.len();
        let state = match previous {
            None => ChecklistState {
                checked: (0..len).map(|i| (i, false)).collect(),
                ..Default::default()
            },
            Some(prev) => ChecklistState {
                checked: (0..len).map(|i| (i, prev.is_checked(i))).collect(),
                comments: prev
                    .comments
                    .into_iter()
                    .filter(|(i, _)| *i < len)
                    .collect(),
                global_notes: prev.global_notes,
            },
        };
        Self { skills, state }
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    pub fn state(&self) -> &ChecklistState {
        &self.state
    }

    /// Flips the check at `index`. A missing entry counts as unchecked.
    pub fn toggle(&mut self, index: usize) {
        let entry = self.state.checked.entry(index).or_insert(false);
        *entry = !*entry;
    }

    pub fn set_comment(&mut self, index: usize, text: impl Into<String>) {
        self.state.comments.insert(index, text.into());
    }

    pub fn set_global_notes(&mut self, text: impl Into<String>) {
        self.state.global_notes = text.into();
    }

    /// Percentage of checked skills, rounded half up. Zero for an empty list.
    pub fn progress(&self) -> u32 {
        let total = self.skills.len();
        if total == 0 {
            return 0;
        }
        let done = self
            .state
            .checked
            .iter()
            .filter(|(i, c)| **c && **i < total)
            .count();
        ((200 * done + total) / (2 * total)) as u32
    }
}
