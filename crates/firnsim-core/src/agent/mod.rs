//! Provider seam for the external large-language-model collaborator.
//!
//! The rest of the workspace programs against these traits; concrete
//! implementations (the Gemini REST agents) live in `firnsim-interaction`.
//! Keeping the seam here lets the orchestration and report services be
//! exercised with scripted in-memory agents in tests.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by provider agents.
#[derive(Error, Debug, Clone)]
pub enum AgentError {
    /// The agent could not carry out the request at all.
    #[error("Agent execution failed: {0}")]
    ExecutionFailed(String),

    /// The provider answered with a transport- or HTTP-level failure.
    #[error("Provider call failed: {message}")]
    ProcessError {
        /// HTTP status code, when the failure came from an HTTP response.
        status_code: Option<u16>,
        message: String,
        /// Whether retrying the same request may succeed.
        is_retryable: bool,
        /// Server-suggested wait before retrying, from a `retry-after` header.
        retry_after: Option<Duration>,
    },

    /// Anything else (response decoding, unexpected payloads).
    #[error("{0}")]
    Other(String),
}

impl AgentError {
    /// Creates a ProcessError carrying a server-suggested retry delay.
    pub fn process_error_with_retry_after(
        status_code: u16,
        message: impl Into<String>,
        is_retryable: bool,
        retry_after: Duration,
    ) -> Self {
        Self::ProcessError {
            status_code: Some(status_code),
            message: message.into(),
            is_retryable,
            retry_after: Some(retry_after),
        }
    }

    /// Whether this failure signals an exhausted quota or rate limit.
    ///
    /// Recognizes HTTP 429 as well as the quota markers Gemini embeds in
    /// error bodies (`RESOURCE_EXHAUSTED`, "quota").
    pub fn is_quota_exhausted(&self) -> bool {
        let message = match self {
            Self::ProcessError {
                status_code: Some(429),
                ..
            } => return true,
            Self::ProcessError { message, .. } => message,
            Self::ExecutionFailed(message) | Self::Other(message) => message,
        };
        let lower = message.to_lowercase();
        lower.contains("quota") || lower.contains("resource_exhausted")
    }

    /// Server-suggested retry delay, if the provider sent one.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::ProcessError { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// A live, stateful conversation with the provider.
///
/// The session carries its own accumulated context; callers send bare turn
/// text and never resend history.
#[async_trait]
pub trait ChatSession: Send {
    /// Relays one user turn and returns the model's reply.
    async fn send(&mut self, text: &str) -> Result<String, AgentError>;
}

/// Opens provider chat sessions bound to a fixed system instruction.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    type Session: ChatSession + Send;

    /// Opens a new session with the given system instruction and sampling
    /// temperature.
    async fn open_session(
        &self,
        system_instruction: &str,
        temperature: f32,
    ) -> Result<Self::Session, AgentError>;
}

/// One-shot content generation with schema-constrained JSON decoding.
#[async_trait]
pub trait GenerationAgent: Send + Sync {
    /// Sends `prompt` and asks the provider to answer with JSON matching
    /// `schema`. Returns the raw response text.
    async fn generate_json(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<String, AgentError>;
}
