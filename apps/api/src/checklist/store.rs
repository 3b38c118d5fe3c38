//! Persistence seam for checklists.
//!
//! Offers carry the nested checklist in a JSONB column; candidatures carry the
//! legacy flat notation in three text columns. `AppState` holds an
//! `Arc<dyn ChecklistStore>`.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::info;

use crate::checklist::flat::FlatChecklist;
use crate::errors::AppError;
use crate::models::candidature::{CandidatureRow, STATUT_INTERVIEW};
use crate::models::offer::OfferRow;

#[async_trait]
pub trait ChecklistStore: Send + Sync {
    async fn find_offer(&self, offer_id: i64) -> Result<Option<OfferRow>, AppError>;

    /// Replaces the offer's checklist (`None` clears it). Returns `None` for an unknown offer.
    async fn save_offer_checklist(
        &self,
        offer_id: i64,
        checklist: Option<Value>,
    ) -> Result<Option<OfferRow>, AppError>;

    async fn find_candidature(&self, candidature_id: i64)
        -> Result<Option<CandidatureRow>, AppError>;

    /// Stores the flat notation verbatim and moves the candidature to `INTERVIEW`.
    async fn record_interview(
        &self,
        candidature_id: i64,
        notation: &FlatChecklist,
    ) -> Result<Option<CandidatureRow>, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL
// ────────────────────────────────────────────────────────────────────────────

const OFFER_COLUMNS: &str = "id, titre, entreprise, localisation, competences_requises, interview_checklist, updated_at";

pub struct PgChecklistStore {
    pool: PgPool,
}

impl PgChecklistStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChecklistStore for PgChecklistStore {
    async fn find_offer(&self, offer_id: i64) -> Result<Option<OfferRow>, AppError> {
        let sql = format!("SELECT {OFFER_COLUMNS} FROM offres WHERE id = $1");
        Ok(sqlx::query_as::<_, OfferRow>(&sql)
            .bind(offer_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn save_offer_checklist(
        &self,
        offer_id: i64,
        checklist: Option<Value>,
    ) -> Result<Option<OfferRow>, AppError> {
        let sql = format!(
            "UPDATE offres SET interview_checklist = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {OFFER_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, OfferRow>(&sql)
            .bind(offer_id)
            .bind(checklist)
            .fetch_optional(&self.pool)
            .await?;

        if updated.is_some() {
            info!("Stored interview checklist for offer {offer_id}");
        }
        Ok(updated)
    }

    async fn find_candidature(
        &self,
        candidature_id: i64,
    ) -> Result<Option<CandidatureRow>, AppError> {
        Ok(
            sqlx::query_as::<_, CandidatureRow>("SELECT * FROM candidatures WHERE id = $1")
                .bind(candidature_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn record_interview(
        &self,
        candidature_id: i64,
        notation: &FlatChecklist,
    ) -> Result<Option<CandidatureRow>, AppError> {
        // SET expressions read the pre-update row, so the CASE sees the old statut.
        let updated = sqlx::query_as::<_, CandidatureRow>(
            r#"
            UPDATE candidatures
            SET interview_checklist_results = $2,
                interview_skill_comments = $3,
                interview_commentaire = $4,
                date_reponse = CASE WHEN statut <> $5 THEN NOW() ELSE date_reponse END,
                statut = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(candidature_id)
        .bind(notation.checklist_results.as_deref())
        .bind(notation.skill_comments.as_deref())
        .bind(notation.commentaire.as_deref().unwrap_or(""))
        .bind(STATUT_INTERVIEW)
        .fetch_optional(&self.pool)
        .await?;

        if updated.is_some() {
            info!("Recorded interview notation for candidature {candidature_id}");
        }
        Ok(updated)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory (tests)
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub use memory::MemoryChecklistStore;

#[cfg(test)]
mod memory {
    use std::collections::HashMap;

    use chrono::Utc;
    use tokio::sync::RwLock;

    use super::*;

    #[derive(Default)]
    pub struct MemoryChecklistStore {
        offers: RwLock<HashMap<i64, OfferRow>>,
        candidatures: RwLock<HashMap<i64, CandidatureRow>>,
    }

    impl MemoryChecklistStore {
        pub async fn insert_offer(&self, id: i64, titre: &str, competences: Option<&str>) {
            self.offers.write().await.insert(
                id,
                OfferRow {
                    id,
                    titre: titre.to_string(),
                    entreprise: None,
                    localisation: None,
                    competences_requises: competences.map(str::to_string),
                    interview_checklist: None,
                    updated_at: None,
                },
            );
        }

        pub async fn set_requirements(&self, id: i64, competences: &str) {
            if let Some(offer) = self.offers.write().await.get_mut(&id) {
                offer.competences_requises = Some(competences.to_string());
            }
        }

        pub async fn insert_candidature(&self, id: i64, offre_id: i64, statut: &str) {
            self.candidatures.write().await.insert(
                id,
                CandidatureRow {
                    id,
                    offre_id,
                    statut: statut.to_string(),
                    date_reponse: None,
                    interview_checklist_results: None,
                    interview_skill_comments: None,
                    interview_commentaire: None,
                },
            );
        }
    }

    #[async_trait]
    impl ChecklistStore for MemoryChecklistStore {
        async fn find_offer(&self, offer_id: i64) -> Result<Option<OfferRow>, AppError> {
            Ok(self.offers.read().await.get(&offer_id).cloned())
        }

        async fn save_offer_checklist(
            &self,
            offer_id: i64,
            checklist: Option<Value>,
        ) -> Result<Option<OfferRow>, AppError> {
            let mut offers = self.offers.write().await;
            Ok(offers.get_mut(&offer_id).map(|offer| {
                offer.interview_checklist = checklist;
                offer.updated_at = Some(Utc::now());
                offer.clone()
            }))
        }

        async fn find_candidature(
            &self,
            candidature_id: i64,
        ) -> Result<Option<CandidatureRow>, AppError> {
            Ok(self.candidatures.read().await.get(&candidature_id).cloned())
        }

        async fn record_interview(
            &self,
            candidature_id: i64,
            notation: &FlatChecklist,
        ) -> Result<Option<CandidatureRow>, AppError> {
            let mut candidatures = self.candidatures.write().await;
            Ok(candidatures.get_mut(&candidature_id).map(|cand| {
                cand.interview_checklist_results = notation.checklist_results.clone();
                cand.interview_skill_comments = notation.skill_comments.clone();
                cand.interview_commentaire =
                    Some(notation.commentaire.clone().unwrap_or_default());
                if cand.statut != STATUT_INTERVIEW {
                    cand.statut = STATUT_INTERVIEW.to_string();
                    cand.date_reponse = Some(Utc::now());
                }
                cand.clone()
            }))
        }
    }
}
