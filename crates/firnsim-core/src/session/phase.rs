//! Application phase and simulation state machines.

use serde::{Deserialize, Serialize};
use strum::Display;

/// The three screens of the trainer, exactly one active at a time.
///
/// Control flow: Setup → Chat → Report → (restart) → Setup. A failed report
/// generation falls back from Chat to Setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum AppPhase {
    /// Persona intake form.
    Setup,
    /// Live interview simulation.
    Chat,
    /// Finished coaching report.
    Report,
}

impl AppPhase {
    /// Whether the workflow may move from this phase to `next`.
    pub fn can_transition_to(self, next: AppPhase) -> bool {
        matches!(
            (self, next),
            (AppPhase::Setup, AppPhase::Chat)
                | (AppPhase::Chat, AppPhase::Report)
                | (AppPhase::Chat, AppPhase::Setup)
                | (AppPhase::Report, AppPhase::Setup)
        )
    }
}

/// Lifecycle of one conversation orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum SimulationState {
    /// No provider session has been opened yet.
    Uninitialized,
    /// The simulation is relaying turns.
    Active,
    /// The interview ended; the transcript is final.
    Ended,
}
