//! Axum route handlers for the interview checklist API.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::checklist::extractor::extract_skills;
use crate::checklist::flat::{self, FlatChecklist};
use crate::checklist::nested::{self, PersistedChecklist};
use crate::checklist::state::Checklist;
use crate::checklist::view::ChecklistView;
use crate::errors::AppError;
use crate::models::candidature::CandidatureRow;
use crate::models::offer::OfferRow;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistEnvelope {
    pub interview_checklist: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveChecklistResponse {
    pub message: String,
    pub interview_checklist: PersistedChecklist,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferChecklistView {
    pub offre_id: i64,
    pub titre: String,
    #[serde(flatten)]
    pub checklist: ChecklistView,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewView {
    pub candidature_id: i64,
    pub offre_id: i64,
    pub statut: String,
    #[serde(flatten)]
    pub checklist: ChecklistView,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

async fn load_offer(state: &AppState, offer_id: i64) -> Result<OfferRow, AppError> {
    state
        .store
        .find_offer(offer_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No job offer found with ID: {offer_id}")))
}

/// GET /api/recruteur/offres/:id/checklist
pub async fn handle_get_checklist(
    State(state): State<AppState>,
    Path(offer_id): Path<i64>,
) -> Result<Json<ChecklistEnvelope>, AppError> {
    let offer = load_offer(&state, offer_id).await?;
    Ok(Json(ChecklistEnvelope {
        interview_checklist: offer.interview_checklist,
    }))
}

/// PATCH /api/recruteur/offres/:id/checklist
///
/// The blob is passed through the codec before storage, so malformed
/// entries are dropped rather than persisted.
pub async fn handle_save_checklist(
    State(state): State<AppState>,
    Path(offer_id): Path<i64>,
    payload: Result<Json<ChecklistEnvelope>, JsonRejection>,
) -> Result<Json<SaveChecklistResponse>, AppError> {
    let Json(request) = payload?;
    let blob = match request.interview_checklist {
        Some(blob @ Value::Object(_)) => blob,
        _ => {
            return Err(AppError::Validation(
                "interviewChecklist must be a JSON object".to_string(),
            ))
        }
    };

    let decoded = nested::decode(Some(&blob));
    let normalized =
        nested::encode_at(&decoded.state, decoded.last_updated.unwrap_or_else(Utc::now));

    state
        .store
        .save_offer_checklist(offer_id, Some(normalized.to_value()))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No job offer found with ID: {offer_id}")))?;

    Ok(Json(SaveChecklistResponse {
        message: "Checklist saved successfully".to_string(),
        interview_checklist: normalized,
    }))
}

/// DELETE /api/recruteur/offres/:id/checklist
pub async fn handle_delete_checklist(
    State(state): State<AppState>,
    Path(offer_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    state
        .store
        .save_offer_checklist(offer_id, None)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No job offer found with ID: {offer_id}")))?;

    Ok(Json(json!({ "message": "Checklist deleted successfully" })))
}

/// GET /api/recruteur/offres/:id/checklist/view
///
/// Skills are re-extracted from the offer's current requirements on every call.
pub async fn handle_view_checklist(
    State(state): State<AppState>,
    Path(offer_id): Path<i64>,
) -> Result<Json<OfferChecklistView>, AppError> {
    let offer = load_offer(&state, offer_id).await?;
    let skills = extract_skills(offer.competences_requises.as_deref());
    let decoded = nested::decode(offer.interview_checklist.as_ref());
    debug!(
        "Offer {offer_id}: {} skills, checklist stored: {}",
        skills.len(),
        offer.interview_checklist.is_some()
    );

    let checklist = Checklist::initialize(skills, Some(decoded.state));
    Ok(Json(OfferChecklistView {
        offre_id: offer.id,
        titre: offer.titre,
        checklist: ChecklistView::build(&checklist, decoded.last_updated),
    }))
}

/// POST /api/candidatures/:id/noter-interview
pub async fn handle_record_interview(
    State(state): State<AppState>,
    Path(candidature_id): Path<i64>,
    payload: Result<Json<FlatChecklist>, JsonRejection>,
) -> Result<Json<CandidatureRow>, AppError> {
    let Json(notation) = payload?;
    let updated = state
        .store
        .record_interview(candidature_id, &notation)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Candidature not found with ID: {candidature_id}"))
        })?;
    Ok(Json(updated))
}

/// GET /api/candidatures/:id/interview
pub async fn handle_view_interview(
    State(state): State<AppState>,
    Path(candidature_id): Path<i64>,
) -> Result<Json<InterviewView>, AppError> {
    let candidature = state
        .store
        .find_candidature(candidature_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Candidature not found with ID: {candidature_id}"))
        })?;
    let offer = load_offer(&state, candidature.offre_id).await?;

    let skills = extract_skills(offer.competences_requises.as_deref());
    let notation = FlatChecklist {
        checklist_results: candidature.interview_checklist_results.clone(),
        skill_comments: candidature.interview_skill_comments.clone(),
        commentaire: candidature.interview_commentaire.clone(),
    };
    let decoded = flat::decode(&notation, &skills);
    let checklist = Checklist::initialize(skills, Some(decoded));

    Ok(Json(InterviewView {
        candidature_id: candidature.id,
        offre_id: candidature.offre_id,
        statut: candidature.statut,
        checklist: ChecklistView::build(&checklist, candidature.date_reponse),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
        Router,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::checklist::store::{ChecklistStore, MemoryChecklistStore};
    use crate::routes::build_router;
    use crate::state::test_state;

    async fn router_with(store: Arc<MemoryChecklistStore>) -> Router {
        build_router(test_state(store))
    }

    async fn send(
        app: Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                builder = builder.header("content-type", "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn seeded() -> Arc<MemoryChecklistStore> {
        let store = Arc::new(MemoryChecklistStore::default());
        store
            .insert_offer(1, "Développeur Full Stack", Some("React, Node.js, REST, Git"))
            .await;
        store.insert_candidature(10, 1, "EN_ATTENTE").await;
        store
    }

    #[tokio::test]
    async fn test_get_checklist_unknown_offer_is_404() {
        let app = router_with(seeded().await).await;
        let (status, body) = send(app, Method::GET, "/api/recruteur/offres/99/checklist", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_get_checklist_without_saved_data_is_null() {
        let app = router_with(seeded().await).await;
        let (status, body) = send(app, Method::GET, "/api/recruteur/offres/1/checklist", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "interviewChecklist": null }));
    }

    #[tokio::test]
    async fn test_save_then_get_returns_normalized_blob() {
        let store = seeded().await;
        let payload = json!({
            "interviewChecklist": {
                "checkedItems": {"0": true, "2": "true", "bogus": true},
                "comments": {"1": "needs review"},
                "globalNotes": "Strong candidate",
                "lastUpdated": "2024-05-01T10:00:00.000Z"
            }
        });
        let (status, body) = send(
            router_with(store.clone()).await,
            Method::PATCH,
            "/api/recruteur/offres/1/checklist",
            Some(payload),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Checklist saved successfully");

        let (_, body) = send(
            router_with(store).await,
            Method::GET,
            "/api/recruteur/offres/1/checklist",
            None,
        )
        .await;
        assert_eq!(
            body["interviewChecklist"],
            json!({
                "checkedItems": {"0": true, "2": true},
                "comments": {"1": "needs review"},
                "globalNotes": "Strong candidate",
                "lastUpdated": "2024-05-01T10:00:00.000Z"
            })
        );
    }

    #[tokio::test]
    async fn test_save_rejects_missing_or_non_object_payload() {
        let store = seeded().await;
        let (status, _) = send(
            router_with(store.clone()).await,
            Method::PATCH,
            "/api/recruteur/offres/1/checklist",
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            router_with(store).await,
            Method::PATCH,
            "/api/recruteur/offres/1/checklist",
            Some(json!({ "interviewChecklist": "checked" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_save_rejects_non_object_body_with_error_envelope() {
        let store = seeded().await;
        for payload in [json!([]), Value::Null, json!("x"), json!(3)] {
            let (status, body) = send(
                router_with(store.clone()).await,
                Method::PATCH,
                "/api/recruteur/offres/1/checklist",
                Some(payload.clone()),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload}");
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        }
        let offer = store.find_offer(1).await.unwrap().unwrap();
        assert!(offer.interview_checklist.is_none());
    }

    #[tokio::test]
    async fn test_record_interview_rejects_non_object_body() {
        let store = seeded().await;
        for payload in [json!([]), Value::Null] {
            let (status, body) = send(
                router_with(store.clone()).await,
                Method::POST,
                "/api/candidatures/10/noter-interview",
                Some(payload),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        }
        let candidature = store.find_candidature(10).await.unwrap().unwrap();
        assert_eq!(candidature.statut, "EN_ATTENTE");
    }

    #[tokio::test]
    async fn test_save_unknown_offer_is_404() {
        let (status, _) = send(
            router_with(seeded().await).await,
            Method::PATCH,
            "/api/recruteur/offres/7/checklist",
            Some(json!({ "interviewChecklist": {} })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_clears_checklist() {
        let store = seeded().await;
        store
            .save_offer_checklist(1, Some(json!({"globalNotes": "x"})))
            .await
            .unwrap();

        let (status, body) = send(
            router_with(store.clone()).await,
            Method::DELETE,
            "/api/recruteur/offres/1/checklist",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Checklist deleted successfully");
        assert!(store.find_offer(1).await.unwrap().unwrap().interview_checklist.is_none());
    }

    #[tokio::test]
    async fn test_view_rekeys_against_current_requirements() {
        let store = seeded().await;
        store
            .save_offer_checklist(
                1,
                Some(json!({
                    "checkedItems": {"0": true, "2": true, "3": true},
                    "comments": {"1": "needs review", "3": "gone soon"},
                    "globalNotes": "Strong candidate"
                })),
            )
            .await
            .unwrap();
        // Requirements shrink to three skills; index 3 becomes stale.
        store.set_requirements(1, "React\nNode.js\nREST").await;

        let (status, body) = send(
            router_with(store).await,
            Method::GET,
            "/api/recruteur/offres/1/checklist/view",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["offreId"], 1);
        assert_eq!(body["skills"].as_array().unwrap().len(), 3);
        assert_eq!(body["skills"][0]["checked"], true);
        assert_eq!(body["skills"][1]["comment"], "needs review");
        assert_eq!(body["skills"][2]["label"], "REST");
        assert_eq!(body["progress"], 67);
        assert_eq!(body["globalNotes"], "Strong candidate");
    }

    #[tokio::test]
    async fn test_view_with_corrupt_blob_degrades_to_fresh() {
        let store = seeded().await;
        store
            .save_offer_checklist(1, Some(json!("not an object")))
            .await
            .unwrap();
        let (status, body) = send(
            router_with(store).await,
            Method::GET,
            "/api/recruteur/offres/1/checklist/view",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["progress"], 0);
        assert_eq!(body["skills"].as_array().unwrap().len(), 4);
        assert_eq!(body["globalNotes"], "");
    }

    #[tokio::test]
    async fn test_record_interview_moves_status_and_view_decodes_flat() {
        let store = seeded().await;
        let notation = json!({
            "checklistResults": "React:true;Node.js:false;REST:true;Git:false",
            "skillComments": "{\"1\":\"needs review\"}",
            "commentaire": "Strong candidate"
        });
        let (status, body) = send(
            router_with(store.clone()).await,
            Method::POST,
            "/api/candidatures/10/noter-interview",
            Some(notation),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["statut"], "INTERVIEW");
        assert!(body["dateReponse"].is_string());

        let (status, body) = send(
            router_with(store).await,
            Method::GET,
            "/api/candidatures/10/interview",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["progress"], 50);
        assert_eq!(body["skills"][0]["checked"], true);
        assert_eq!(body["skills"][1]["comment"], "needs review");
        assert_eq!(body["globalNotes"], "Strong candidate");
    }

    #[tokio::test]
    async fn test_record_interview_defaults_commentaire() {
        let store = seeded().await;
        let (status, body) = send(
            router_with(store).await,
            Method::POST,
            "/api/candidatures/10/noter-interview",
            Some(json!({ "checklistResults": "React:true" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["interviewCommentaire"], "");
        assert!(body["interviewSkillComments"].is_null());
    }

    #[tokio::test]
    async fn test_record_interview_unknown_candidature_is_404() {
        let (status, _) = send(
            router_with(seeded().await).await,
            Method::POST,
            "/api/candidatures/404/noter-interview",
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_view_interview_with_bad_comments_json() {
        let store = seeded().await;
        store
            .record_interview(
                10,
                &FlatChecklist {
                    checklist_results: Some("Git:true".to_string()),
                    skill_comments: Some("{oops".to_string()),
                    commentaire: None,
                },
            )
            .await
            .unwrap();
        let (status, body) = send(
            router_with(store).await,
            Method::GET,
            "/api/candidatures/10/interview",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["skills"][3]["checked"], true);
        assert_eq!(body["progress"], 25);
        assert!(body["skills"]
            .as_array()
            .unwrap()
            .iter()
            .all(|s| s["comment"] == ""));
    }
}
