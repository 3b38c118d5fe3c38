//! Nested JSON checklist codec — the canonical wire format.
//!
//! ```json
//! { "checkedItems": {"0": true}, "comments": {"1": "..."},
//!   "globalNotes": "...", "lastUpdated": "2024-05-01T10:00:00.000Z" }
//! ```
//!
//! Keys are stringified skill positions. Decoding never fails: anything
//! malformed degrades to the fresh state.

#![allow(dead_code)]

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::checklist::state::ChecklistState;

/// Persisted checklist as exchanged with clients and stored on the offer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedChecklist {
    pub checked_items: BTreeMap<String, bool>,
    pub comments: BTreeMap<String, String>,
    pub global_notes: String,
    pub last_updated: String,
}

/// Result of decoding a persisted blob.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedChecklist {
    pub state: ChecklistState,
    /// Informational only; never compared.
    pub last_updated: Option<DateTime<Utc>>,
}

pub fn encode(state: &ChecklistState) -> PersistedChecklist {
    encode_at(state, Utc::now())
}

/// Encodes with an explicit timestamp. Only present entries are written.
pub fn encode_at(state: &ChecklistState, timestamp: DateTime<Utc>) -> PersistedChecklist {
    PersistedChecklist {
        checked_items: state
            .checked
            .iter()
            .map(|(i, c)| (i.to_string(), *c))
            .collect(),
        comments: state
            .comments
            .iter()
            .map(|(i, c)| (i.to_string(), c.clone()))
            .collect(),
        global_notes: state.global_notes.clone(),
        last_updated: format_timestamp(&timestamp),
    }
}

impl PersistedChecklist {
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Decodes a persisted blob. `None`, `null` and non-objects yield the fresh state.
pub fn decode(blob: Option<&Value>) -> DecodedChecklist {
    let Some(Value::Object(obj)) = blob else {
        if let Some(other) = blob.filter(|v| !v.is_null()) {
            warn!("Ignoring persisted checklist that is not an object: {other}");
        }
        return DecodedChecklist::default();
    };

    let checked = entries(obj, "checkedItems")
        .filter_map(|(i, v)| coerce_bool(v).map(|b| (i, b)))
        .collect();
    let comments = entries(obj, "comments")
        .filter_map(|(i, v)| coerce_string(v).map(|s| (i, s)))
        .collect();
    let global_notes = obj.get("globalNotes").and_then(coerce_string).unwrap_or_default();
    let last_updated = obj
        .get("lastUpdated")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc));

    DecodedChecklist {
        state: ChecklistState {
            checked,
            comments,
            global_notes,
        },
        last_updated,
    }
}

/// Decodes a JSON string. Unparseable input yields the fresh state.
pub fn decode_str(raw: &str) -> DecodedChecklist {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => decode(Some(&value)),
        Err(e) => {
            warn!("Discarding unparseable checklist JSON: {e}");
            DecodedChecklist::default()
        }
    }
}

/// Index-keyed entries of a nested map; non-numeric keys are skipped.
fn entries<'a>(
    obj: &'a Map<String, Value>,
    field: &str,
) -> impl Iterator<Item = (usize, &'a Value)> {
    obj.get(field)
        .and_then(Value::as_object)
        .into_iter()
        .flat_map(|m| m.iter())
        .filter_map(|(k, v)| match parse_index(k) {
            Some(i) => Some((i, v)),
            None => {
                debug!("Skipping checklist key {k:?}");
                None
            }
        })
}

/// Parses a position key. Only canonical decimal keys are accepted (`"0"`,
/// `"12"`), so `"01"`, `"+1"` or `" 1"` cannot alias another entry.
pub(crate) fn parse_index(key: &str) -> Option<usize> {
    let canonical = !key.is_empty()
        && key.bytes().all(|b| b.is_ascii_digit())
        && (key == "0" || !key.starts_with('0'));
    if !canonical {
        return None;
    }
    key.parse().ok()
}

/// RFC 3339 UTC with milliseconds, e.g. `2024-05-01T10:00:00.000Z`.
pub(crate) fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `serialize_with` adapter writing optional timestamps via `format_timestamp`.
pub(crate) fn serialize_timestamp<S: Serializer>(
    timestamp: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match timestamp {
        Some(ts) => serializer.serialize_str(&format_timestamp(ts)),
        None => serializer.serialize_none(),
    }
}

fn coerce_bool(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        _ => None,
    }
}

/// Comment coercion shared by both wire formats.
pub(crate) fn coerce_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
