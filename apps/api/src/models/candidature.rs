use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const STATUT_INTERVIEW: &str = "INTERVIEW";

/// A candidature with its legacy flat interview notation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CandidatureRow {
    pub id: i64,
    pub offre_id: i64,
    pub statut: String,
    pub date_reponse: Option<DateTime<Utc>>,
    /// `"Skill1:true;Skill2:false;..."`
    pub interview_checklist_results: Option<String>,
    /// JSON string: `{"0": "comment"}`
    pub interview_skill_comments: Option<String>,
    pub interview_commentaire: Option<String>,
}
