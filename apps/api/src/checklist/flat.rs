//! Legacy flat checklist format, kept as a compatibility adapter.
//!
//! `checklistResults` keys on skill *labels* (`"Java:true;SQL:false"`), while
//! `skillComments` is a JSON string keyed on *positions*. Re-associating
//! labels with positions is a first-match lookup, so a skill list with
//! repeated labels does not survive a round trip: every repeat takes the
//! value recorded for the first occurrence.

#![allow(dead_code)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::checklist::nested::{coerce_string, parse_index};
use crate::checklist::state::ChecklistState;

/// Flat interview notation as submitted for a candidature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatChecklist {
    #[serde(default)]
    pub checklist_results: Option<String>,
    #[serde(default)]
    pub skill_comments: Option<String>,
    #[serde(default)]
    pub commentaire: Option<String>,
}

/// Encodes `state` against `skills`. Every position in `skills` is written.
pub fn encode(state: &ChecklistState, skills: &[String]) -> FlatChecklist {
    let checklist_results = skills
        .iter()
        .enumerate()
        .map(|(i, label)| format!("{label}:{}", state.is_checked(i)))
        .collect::<Vec<_>>()
        .join(";");

    let comments: BTreeMap<String, &str> = state
        .comments
        .iter()
        .map(|(i, c)| (i.to_string(), c.as_str()))
        .collect();

    FlatChecklist {
        checklist_results: Some(checklist_results),
        skill_comments: Some(serde_json::to_string(&comments).unwrap_or_else(|_| "{}".into())),
        commentaire: Some(state.global_notes.clone()),
    }
}

/// Parses `"label:bool;label:bool"` into ordered `(label, checked)` pairs.
///
/// Entries are split on their last `:` so labels may contain colons.
/// Entries without a `:` or with an empty label are skipped. Only the
/// literal `true` parses as checked.
pub fn decode_results(raw: &str) -> Vec<(String, bool)> {
    raw.split(';')
        .filter_map(|entry| {
            let (label, value) = entry.rsplit_once(':')?;
            let label = label.trim();
            if label.is_empty() {
                return None;
            }
            Some((label.to_string(), value.trim() == "true"))
        })
        .collect()
}

/// Parses the `skillComments` JSON string. Anything unparseable yields no comments.
pub fn decode_comments(raw: &str) -> BTreeMap<usize, String> {
    if raw.trim().is_empty() {
        return BTreeMap::new();
    }
    match serde_json::from_str::<BTreeMap<String, serde_json::Value>>(raw) {
        Ok(map) => map
            .into_iter()
            .filter_map(|(k, v)| Some((parse_index(&k)?, coerce_string(&v)?)))
            .collect(),
        Err(e) => {
            warn!("Discarding unparseable skill comments: {e}");
            BTreeMap::new()
        }
    }
}

/// Decodes a flat notation against the current skill list.
///
/// Each position takes the value of the first decoded entry with the same
/// label, defaulting to unchecked.
pub fn decode(flat: &FlatChecklist, skills: &[String]) -> ChecklistState {
    let results = flat
        .checklist_results
        .as_deref()
        .map(decode_results)
        .unwrap_or_default();

    let checked = skills
        .iter()
        .enumerate()
        .map(|(i, skill)| {
            let value = results
                .iter()
                .find(|(label, _)| label == skill)
                .map(|(_, c)| *c)
                .unwrap_or(false);
            (i, value)
        })
        .collect();

    ChecklistState {
        checked,
        comments: flat
            .skill_comments
            .as_deref()
            .map(decode_comments)
            .unwrap_or_default(),
        global_notes: flat.commentaire.clone().unwrap_or_default(),
    }
}
