//! Transcript types.
//!
//! A transcript is the chronological record of one interview simulation.
//! It is append-only: turns can be pushed while the simulation is active,
//! and the finished sequence is handed by value to the report generator.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// The human manager conducting the interview.
    Manager,
    /// The simulated employee.
    Employee,
}

/// A single labeled utterance in the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who spoke.
    pub speaker: Speaker,
    /// What was said.
    pub text: String,
    /// Timestamp when the turn was recorded (ISO 8601 format).
    pub timestamp: String,
}

impl Turn {
    fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// An ordered, append-only sequence of turns.
///
/// Insertion order is chronological and significant; existing turns are
/// never mutated or removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a manager turn.
    pub fn push_manager(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::new(Speaker::Manager, text));
    }

    /// Appends an employee turn.
    pub fn push_employee(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::new(Speaker::Employee, text));
    }

    /// The recorded turns, in insertion order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Number of recorded turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether no turn has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
