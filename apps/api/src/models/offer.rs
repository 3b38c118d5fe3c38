use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// A job offer as far as the checklist is concerned.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OfferRow {
    pub id: i64,
    pub titre: String,
    pub entreprise: Option<String>,
    pub localisation: Option<String>,
    pub competences_requises: Option<String>,
    /// Nested checklist blob, stored as JSONB.
    pub interview_checklist: Option<Value>,
    pub updated_at: Option<DateTime<Utc>>,
}
