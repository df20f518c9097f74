//! Conversation orchestrator.
//!
//! Drives one interview simulation: opens the provider session bound to the
//! persona-derived system instruction, obtains the opening greeting, relays
//! manager turns, and detects the end signal. The transcript is the
//! orchestrator's own record; the provider session carries its context
//! separately.

use std::time::Duration;

use firnsim_core::agent::{AgentError, ChatSession, SessionFactory};
use firnsim_core::persona::Persona;
use firnsim_core::session::{Session, SimulationState, Transcript, end_signal};
use thiserror::Error;
use tracing::{debug, warn};

use crate::prompts;

/// Greeting-equivalent notice when the session could not start due to quota.
pub const INIT_QUOTA_NOTICE: &str = "The AI service is currently over capacity, so the interview \
     cannot start right now. Please try again in about a minute.";

/// Greeting-equivalent notice when the session could not start at all.
pub const INIT_GENERIC_NOTICE: &str = "An error occurred while starting the simulation.";

/// Advisory shown when a turn fails on an exhausted quota.
pub const RELAY_QUOTA_ADVISORY: &str = "Sorry, the request quota has been exhausted. Please say \
     that again in about a minute.";

/// Advisory shown when a turn fails for any other reason.
pub const RELAY_GENERIC_ADVISORY: &str = "An error occurred. Please try again.";

/// Errors raised while orchestrating the simulation.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// The simulation has ended (or was never started).
    #[error("simulation is not active")]
    NotActive,

    /// Relaying an empty or whitespace-only message is not allowed.
    #[error("cannot relay an empty message")]
    EmptyMessage,

    /// The provider rejected the turn because the quota is exhausted.
    #[error("provider quota exhausted: {message}")]
    QuotaExhausted {
        message: String,
        retry_after: Option<Duration>,
    },

    /// The provider failed for any other reason.
    #[error("turn relay failed: {0}")]
    RelayFailed(String),
}

impl SimulationError {
    fn from_agent_error(err: AgentError) -> Self {
        if err.is_quota_exhausted() {
            Self::QuotaExhausted {
                retry_after: err.retry_after(),
                message: err.to_string(),
            }
        } else {
            Self::RelayFailed(err.to_string())
        }
    }

    /// The advisory to show the user for this failure: wait-and-retry for
    /// quota exhaustion, plain retry otherwise.
    pub fn user_advisory(&self) -> &'static str {
        match self {
            Self::QuotaExhausted { .. } => RELAY_QUOTA_ADVISORY,
            _ => RELAY_GENERIC_ADVISORY,
        }
    }
}

/// Result of relaying one manager input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The employee replied with this text.
    Replied(String),
    /// The input was an end signal; the interview is over.
    Ended,
}

/// One live interview simulation.
///
/// Owns the [`Session`] value, the provider chat handle, and the transcript.
/// Exactly one simulation exists at a time because the workflow controller
/// holds at most one.
pub struct SimulationService<S: ChatSession> {
    session: Session,
    chat: Option<S>,
    state: SimulationState,
    transcript: Transcript,
}

impl<S: ChatSession + Send> SimulationService<S> {
    /// Starts a simulation for `persona`.
    ///
    /// Opens the provider session and obtains the opening greeting. Failures
    /// do not block entering the chat: a greeting-equivalent notice is
    /// recorded as the first employee turn instead, and the simulation is
    /// Active either way.
    pub async fn start<F>(factory: &F, persona: Persona) -> Self
    where
        F: SessionFactory<Session = S>,
    {
        let session = Session::new(persona);
        let mut transcript = Transcript::new();
        let mut chat = None;

        match prompts::render_system_instruction(&session.persona) {
            Err(err) => {
                warn!(error = %err, "failed to render system instruction");
                transcript.push_employee(INIT_GENERIC_NOTICE);
            }
            Ok(instruction) => {
                match factory
                    .open_session(&instruction, prompts::CHAT_TEMPERATURE)
                    .await
                {
                    Err(err) => {
                        warn!(error = %err, "failed to open provider session");
                        transcript.push_employee(init_notice_for(&err));
                    }
                    Ok(mut opened) => {
                        match opened.send(prompts::OPENING_CUE).await {
                            Ok(greeting) => transcript.push_employee(greeting),
                            Err(err) => {
                                warn!(error = %err, "opening greeting failed");
                                transcript.push_employee(init_notice_for(&err));
                            }
                        }
                        chat = Some(opened);
                    }
                }
            }
        }

        debug!(session_id = %session.id, "simulation started");

        Self {
            session,
            chat,
            state: SimulationState::Active,
            transcript,
        }
    }

    /// Relays one manager input.
    ///
    /// End-signal inputs are recorded but never relayed; they end the
    /// interview. On provider failure the manager turn stays recorded, no
    /// employee turn is appended, and the simulation remains Active so the
    /// input can be resent.
    pub async fn send(&mut self, text: &str) -> Result<SendOutcome, SimulationError> {
        if self.state != SimulationState::Active {
            return Err(SimulationError::NotActive);
        }
        if text.trim().is_empty() {
            return Err(SimulationError::EmptyMessage);
        }

        if end_signal::is_end_signal(text) {
            self.transcript.push_manager(text);
            self.state = SimulationState::Ended;
            debug!(turns = self.transcript.len(), "end signal received");
            return Ok(SendOutcome::Ended);
        }

        self.transcript.push_manager(text);

        let Some(chat) = self.chat.as_mut() else {
            return Err(SimulationError::RelayFailed(
                "chat session was not initialized".to_string(),
            ));
        };

        match chat.send(text).await {
            Ok(reply) => {
                self.transcript.push_employee(&reply);
                Ok(SendOutcome::Replied(reply))
            }
            Err(err) => {
                warn!(error = %err, "turn relay failed");
                Err(SimulationError::from_agent_error(err))
            }
        }
    }

    /// Ends the interview immediately with whatever transcript exists so
    /// far (the manual "end session" action).
    pub fn terminate(&mut self) {
        if self.state != SimulationState::Ended {
            debug!(turns = self.transcript.len(), "simulation terminated");
            self.state = SimulationState::Ended;
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SimulationState {
        self.state
    }

    /// The session value this simulation is bound to.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The transcript recorded so far.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Consumes the simulation, yielding the session and the final
    /// transcript for report generation.
    pub fn finish(self) -> (Session, Transcript) {
        (self.session, self.transcript)
    }
}

fn init_notice_for(err: &AgentError) -> &'static str {
    if err.is_quota_exhausted() {
        INIT_QUOTA_NOTICE
    } else {
        INIT_GENERIC_NOTICE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedFactory, ScriptedReply};
    use firnsim_core::session::Speaker;

    fn persona() -> Persona {
        Persona::sample()
    }

    #[tokio::test]
    async fn test_start_appends_greeting_as_first_employee_turn() {
        let factory = ScriptedFactory::new(vec![ScriptedReply::ok("Hello, I'm ready.")]);

        let simulation = SimulationService::start(&factory, persona()).await;

        assert_eq!(simulation.state(), SimulationState::Active);
        assert_eq!(simulation.transcript().len(), 1);
        let first = &simulation.transcript().turns()[0];
        assert_eq!(first.speaker, Speaker::Employee);
        assert_eq!(first.text, "Hello, I'm ready.");
        // The opening cue itself is relayed but never recorded.
        assert_eq!(factory.sent().await, vec![prompts::OPENING_CUE.to_string()]);
    }

    #[tokio::test]
    async fn test_start_records_notice_when_greeting_fails() {
        let factory = ScriptedFactory::new(vec![ScriptedReply::quota_error()]);

        let simulation = SimulationService::start(&factory, persona()).await;

        assert_eq!(simulation.state(), SimulationState::Active);
        assert_eq!(simulation.transcript().turns()[0].text, INIT_QUOTA_NOTICE);
    }

    #[tokio::test]
    async fn test_send_appends_ordered_turns() {
        let factory = ScriptedFactory::new(vec![
            ScriptedReply::ok("Hello, I'm ready."),
            ScriptedReply::ok("I understand."),
        ]);
        let mut simulation = SimulationService::start(&factory, persona()).await;

        let outcome = simulation.send("Let's talk about last week's report.").await;
        assert_eq!(
            outcome.unwrap(),
            SendOutcome::Replied("I understand.".to_string())
        );

        let speakers: Vec<Speaker> = simulation
            .transcript()
            .turns()
            .iter()
            .map(|t| t.speaker)
            .collect();
        assert_eq!(
            speakers,
            vec![Speaker::Employee, Speaker::Manager, Speaker::Employee]
        );
    }

    #[tokio::test]
    async fn test_end_signal_ends_without_relaying() {
        let factory = ScriptedFactory::new(vec![ScriptedReply::ok("Hello, I'm ready.")]);
        let mut simulation = SimulationService::start(&factory, persona()).await;

        let outcome = simulation.send("end conversation").await.unwrap();

        assert_eq!(outcome, SendOutcome::Ended);
        assert_eq!(simulation.state(), SimulationState::Ended);
        // Only the opening cue ever reached the provider.
        assert_eq!(factory.sent().await.len(), 1);
        // The final manager turn is part of the transcript.
        let last = simulation.transcript().turns().last().unwrap();
        assert_eq!(last.speaker, Speaker::Manager);
        assert_eq!(last.text, "end conversation");
    }

    #[tokio::test]
    async fn test_failed_relay_keeps_manager_turn_and_stays_active() {
        let factory = ScriptedFactory::new(vec![
            ScriptedReply::ok("Hello, I'm ready."),
            ScriptedReply::generic_error(),
            ScriptedReply::ok("Noted, I'll fix it."),
        ]);
        let mut simulation = SimulationService::start(&factory, persona()).await;

        let err = simulation.send("You are lazy.").await.unwrap_err();
        assert_eq!(err.user_advisory(), RELAY_GENERIC_ADVISORY);
        assert_eq!(simulation.state(), SimulationState::Active);

        // Prior turns untouched, manager turn recorded, no employee reply.
        let texts: Vec<&str> = simulation
            .transcript()
            .turns()
            .iter()
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(texts, vec!["Hello, I'm ready.", "You are lazy."]);

        // A subsequent send appends in order after the failed attempt.
        simulation.send("Sorry, let me rephrase.").await.unwrap();
        let texts: Vec<&str> = simulation
            .transcript()
            .turns()
            .iter()
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(
            texts,
            vec![
                "Hello, I'm ready.",
                "You are lazy.",
                "Sorry, let me rephrase.",
                "Noted, I'll fix it.",
            ]
        );
    }

    #[tokio::test]
    async fn test_quota_failure_maps_to_wait_advisory() {
        let factory = ScriptedFactory::new(vec![
            ScriptedReply::ok("Hello, I'm ready."),
            ScriptedReply::quota_error(),
        ]);
        let mut simulation = SimulationService::start(&factory, persona()).await;

        let err = simulation.send("Tell me more.").await.unwrap_err();
        assert!(matches!(err, SimulationError::QuotaExhausted { .. }));
        assert_eq!(err.user_advisory(), RELAY_QUOTA_ADVISORY);
    }

    #[tokio::test]
    async fn test_send_rejects_empty_input_and_ended_state() {
        let factory = ScriptedFactory::new(vec![ScriptedReply::ok("Hello, I'm ready.")]);
        let mut simulation = SimulationService::start(&factory, persona()).await;

        assert!(matches!(
            simulation.send("   ").await,
            Err(SimulationError::EmptyMessage)
        ));

        simulation.terminate();
        assert!(matches!(
            simulation.send("hello?").await,
            Err(SimulationError::NotActive)
        ));
    }

    #[tokio::test]
    async fn test_open_failure_records_notice_and_sends_fail_generically() {
        let factory = ScriptedFactory::failing_open();
        let mut simulation = SimulationService::start(&factory, persona()).await;

        assert_eq!(simulation.state(), SimulationState::Active);
        assert_eq!(simulation.transcript().turns()[0].text, INIT_GENERIC_NOTICE);

        let err = simulation.send("Hello?").await.unwrap_err();
        assert!(matches!(err, SimulationError::RelayFailed(_)));
        // The manager turn is still recorded.
        let last = simulation.transcript().turns().last().unwrap();
        assert_eq!(last.text, "Hello?");
    }

    #[tokio::test]
    async fn test_terminate_with_empty_transcript() {
        let factory = ScriptedFactory::new(vec![ScriptedReply::generic_error()]);
        let mut simulation = SimulationService::start(&factory, persona()).await;

        simulation.terminate();
        let (_session, transcript) = simulation.finish();
        // Only the fallback notice is present.
        assert_eq!(transcript.len(), 1);
    }
}
