//! Session domain module.
//!
//! Everything that describes one live interview simulation: the transcript
//! and its turns, the application phase machine, the end-signal predicate,
//! and the `Session` value binding a persona to a conversation.
//!
//! # Module Structure
//!
//! - `message`: transcript types (`Speaker`, `Turn`, `Transcript`)
//! - `phase`: application phases and the simulation state machine
//! - `end_signal`: the literal trigger-phrase predicate
//! - `model`: the `Session` value

pub mod end_signal;
mod message;
mod model;
mod phase;

// Re-export public API
pub use message::{Speaker, Transcript, Turn};
pub use model::Session;
pub use phase::{AppPhase, SimulationState};
