//! Persona creation request model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Persona;

/// Request to create the persona for a new interview simulation.
///
/// This is the intake contract: `validate()` implements the accept/reject
/// decision, `into_persona()` mints the immutable domain value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePersonaRequest {
    /// Job duties (required)
    pub job: String,

    /// Form of address / rank (required)
    pub title: String,

    /// Self-evaluation summary (required)
    pub self_evaluation: String,

    /// Behavioral disposition description (required)
    pub disposition: String,

    /// Current performance issue description (required)
    pub current_issue: String,
}

impl CreatePersonaRequest {
    /// Validate the request and return an error message if any field is
    /// empty or whitespace-only.
    pub fn validate(&self) -> Result<(), String> {
        if self.job.trim().is_empty() {
            return Err("Job duties are required and cannot be empty".to_string());
        }

        if self.title.trim().is_empty() {
            return Err("Title is required and cannot be empty".to_string());
        }

        if self.self_evaluation.trim().is_empty() {
            return Err("Self-evaluation is required and cannot be empty".to_string());
        }

        if self.disposition.trim().is_empty() {
            return Err("Disposition is required and cannot be empty".to_string());
        }

        if self.current_issue.trim().is_empty() {
            return Err("Current issue is required and cannot be empty".to_string());
        }

        Ok(())
    }

    /// Convert this request into a Persona, always generating a new UUID.
    pub fn into_persona(self) -> Persona {
        Persona {
            id: Uuid::new_v4().to_string(),
            job: self.job,
            title: self.title,
            self_evaluation: self.self_evaluation,
            disposition: self.disposition,
            current_issue: self.current_issue,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Create a request pre-filled from an existing persona (for editing).
    pub fn from_persona(persona: &Persona) -> Self {
        Self {
            job: persona.job.clone(),
            title: persona.title.clone(),
            self_evaluation: persona.self_evaluation.clone(),
            disposition: persona.disposition.clone(),
            current_issue: persona.current_issue.clone(),
        }
    }

    /// Request counterpart of [`Persona::sample`].
    pub fn sample() -> Self {
        Self::from_persona(&Persona::sample())
    }
}
