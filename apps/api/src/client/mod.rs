//! Checklist Client — typed HTTP access to the checklist endpoints, plus the
//! editing session that brackets the in-memory checklist with one load and
//! one explicit save.
//!
//! Saves are never retried automatically. A failed save is returned to the
//! caller with the in-memory state intact so the user can retry.
//!
//! Nothing in the server binary calls this module; it is exercised by its
//! own tests against a live router.

#![allow(dead_code)]

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::checklist::flat::FlatChecklist;
use crate::checklist::nested::{self, PersistedChecklist};

pub mod session;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Server error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChecklistEnvelope {
    #[serde(default)]
    interview_checklist: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveResponse {
    interview_checklist: Value,
}

#[derive(Clone)]
pub struct ChecklistClient {
    client: Client,
    base_url: String,
}

impl ChecklistClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn offer_checklist_url(&self, offer_id: i64) -> String {
        format!("{}/api/recruteur/offres/{offer_id}/checklist", self.base_url)
    }

    /// Fetches the stored nested blob, `None` when the offer has none yet.
    pub async fn load_checklist(&self, offer_id: i64) -> Result<Option<Value>, ClientError> {
        let response = self
            .client
            .get(self.offer_checklist_url(offer_id))
            .send()
            .await?;
        let response = check_status(response).await?;
        let envelope: ChecklistEnvelope = response.json().await?;
        debug!(
            "Loaded checklist for offer {offer_id} (present: {})",
            envelope.interview_checklist.is_some()
        );
        Ok(envelope.interview_checklist.filter(|v| !v.is_null()))
    }

    /// Stores `checklist` and returns the blob the server kept.
    pub async fn save_checklist(
        &self,
        offer_id: i64,
        checklist: &PersistedChecklist,
    ) -> Result<PersistedChecklist, ClientError> {
        let body = serde_json::json!({ "interviewChecklist": checklist });
        let response = self
            .client
            .patch(self.offer_checklist_url(offer_id))
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;
        let saved: SaveResponse = response.json().await?;
        info!("Saved checklist for offer {offer_id}");
        Ok(serde_json::from_value(saved.interview_checklist)?)
    }

    /// Submits a candidature's flat interview notation.
    pub async fn submit_interview(
        &self,
        candidature_id: i64,
        notation: &FlatChecklist,
    ) -> Result<(), ClientError> {
        let url = format!(
            "{}/api/candidatures/{candidature_id}/noter-interview",
            self.base_url
        );
        let response = self.client.post(url).json(notation).send().await?;
        check_status(response).await?;
        info!("Submitted interview notation for candidature {candidature_id}");
        Ok(())
    }

    /// Loads and decodes, treating every failure as "no prior data".
    pub async fn load_state_or_fresh(&self, offer_id: i64) -> nested::DecodedChecklist {
        match self.load_checklist(offer_id).await {
            Ok(blob) => nested::decode(blob.as_ref()),
            Err(e) => {
                warn!("No existing checklist for offer {offer_id}, starting fresh: {e}");
                nested::DecodedChecklist::default()
            }
        }
    }
}

async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);

    if status == StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound(message));
    }
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
