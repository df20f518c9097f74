//! Provider integrations for FIRNSIM.
//!
//! Implements the `firnsim-core` agent seams on top of the Gemini REST API:
//! a one-shot structured-generation agent for report scoring and a stateful
//! chat session for the interview simulation.

pub mod config;

mod chat_session;
mod gemini_api_agent;

pub use chat_session::{GeminiChatSession, GeminiSessionFactory};
pub use gemini_api_agent::GeminiApiAgent;
