//! Session domain model.

use serde::{Deserialize, Serialize};

use crate::persona::Persona;

/// The transient binding of one persona to one live provider conversation.
///
/// A session exists only between orchestrator start and report generation.
/// Exactly one session is active at a time; the invariant is enforced by
/// ownership: the workflow controller holds at most one simulation, and the
/// session value is threaded through it rather than living in a global.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier (UUID format)
    pub id: String,
    /// The persona being simulated for this session
    pub persona: Persona,
    /// Timestamp when the session was created (ISO 8601 format)
    pub created_at: String,
}

impl Session {
    /// Creates a new session bound to `persona`.
    pub fn new(persona: Persona) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            persona,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_binds_persona() {
        let persona = Persona::sample();
        let job = persona.job.clone();
        let session = Session::new(persona);
        assert!(uuid::Uuid::parse_str(&session.id).is_ok());
        assert_eq!(session.persona.job, job);
    }
}
