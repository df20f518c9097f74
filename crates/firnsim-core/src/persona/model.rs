//! Persona domain model.
//!
//! Represents the simulated employee (the appraisee) in a performance
//! interview. The five text attributes steer the model's role-play and are
//! embedded verbatim in the system instruction.

use serde::{Deserialize, Serialize};

/// The configured profile of the simulated employee.
///
/// A persona is immutable once a simulation starts: it is created by intake,
/// owned by the orchestrator for the duration of one session, and discarded
/// on restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    /// Unique identifier (UUID format)
    pub id: String,
    /// Job duties the employee is responsible for
    pub job: String,
    /// Form of address / rank (e.g. "Associate", "Senior Manager")
    pub title: String,
    /// The employee's own summary of their performance
    pub self_evaluation: String,
    /// Behavioral disposition (tone, attitude, motivations)
    pub disposition: String,
    /// The current performance issue that needs feedback
    pub current_issue: String,
    /// Timestamp when the persona was created (ISO 8601 format)
    pub created_at: String,
}

impl Persona {
    /// Returns the example persona the original trainer ships for demos.
    ///
    /// Intake defaults are blank; this preset exists for the CLI's
    /// `--sample` flag and for tests.
    pub fn sample() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            job: "IT service planning and operations".to_string(),
            title: "Associate".to_string(),
            self_evaluation: "Met most targets overall, though the second-half project slipped. \
                              Contributed significantly to stabilizing operations."
                .to_string(),
            disposition: "Cool-headed and logical, with strong pride in their own results. \
                          Values concrete data and rewards over emotional appeals."
                .to_string(),
            current_issue: "Frequently skips the weekly report, and a recent unilateral decision \
                            caused friction with a partner team."
                .to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
