use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::checklist::nested::serialize_timestamp;
use crate::checklist::state::Checklist;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillItemView {
    pub index: usize,
    pub label: String,
    pub checked: bool,
    pub comment: String,
}

/// A checklist as displayed: skills re-extracted from the current
/// requirements text, joined with the decoded state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistView {
    pub skills: Vec<SkillItemView>,
    pub global_notes: String,
    pub progress: u32,
    #[serde(serialize_with = "serialize_timestamp")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl ChecklistView {
    pub fn build(checklist: &Checklist, last_updated: Option<DateTime<Utc>>) -> Self {
        let state = checklist.state();
        let skills = checklist
            .skills()
            .iter()
            .enumerate()
            .map(|(index, label)| SkillItemView {
                index,
                label: label.clone(),
                checked: state.is_checked(index),
                comment: state.comment(index).to_string(),
            })
            .collect();

        Self {
            skills,
            global_notes: state.global_notes.clone(),
            progress: checklist.progress(),
            last_updated,
        }
    }
}
