use tracing::info;

use crate::checklist::extractor::extract_skills;
use crate::checklist::nested::{self, PersistedChecklist};
use crate::checklist::state::{Checklist, ChecklistState};
use crate::client::{ChecklistClient, ClientError};

/// One user editing one offer's checklist.
///
/// Nothing is persisted until `save`; dropping or `discard`ing the session
/// throws the edits away.
pub struct ChecklistSession {
    offer_id: i64,
    checklist: Checklist,
}

impl ChecklistSession {
    /// Extracts skills from `requirements`, then loads and re-keys any saved state.
    /// A failed load opens a fresh checklist.
    pub async fn open(client: &ChecklistClient, offer_id: i64, requirements: Option<&str>) -> Self {
        let skills = extract_skills(requirements);
        let decoded = client.load_state_or_fresh(offer_id).await;
        Self::with_state(offer_id, skills, Some(decoded.state))
    }

    pub fn with_state(offer_id: i64, skills: Vec<String>, previous: Option<ChecklistState>) -> Self {
        Self {
            offer_id,
            checklist: Checklist::initialize(skills, previous),
        }
    }

    pub fn offer_id(&self) -> i64 {
        self.offer_id
    }

    pub fn checklist(&self) -> &Checklist {
        &self.checklist
    }

    pub fn toggle(&mut self, index: usize) {
        self.checklist.toggle(index);
    }

    pub fn set_comment(&mut self, index: usize, text: impl Into<String>) {
        self.checklist.set_comment(index, text);
    }

    pub fn set_global_notes(&mut self, text: impl Into<String>) {
        self.checklist.set_global_notes(text);
    }

    pub fn progress(&self) -> u32 {
        self.checklist.progress()
    }

    pub async fn save(&self, client: &ChecklistClient) -> Result<PersistedChecklist, ClientError> {
        let encoded = nested::encode(self.checklist.state());
        let saved = client.save_checklist(self.offer_id, &encoded).await?;
        info!(
            "Checklist for offer {} saved at {}% progress",
            self.offer_id,
            self.progress()
        );
        Ok(saved)
    }

    pub fn discard(self) {
        info!("Discarding unsaved checklist for offer {}", self.offer_id);
    }
}
