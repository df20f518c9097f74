//! Phase workflow controller.
//!
//! Owns the three-screen control flow: Setup → Chat → Report → (restart) →
//! Setup. Holds at most one simulation and one report; a failed report
//! generation drops the simulation and falls back to Setup.

use firnsim_core::agent::{GenerationAgent, SessionFactory};
use firnsim_core::persona::CreatePersonaRequest;
use firnsim_core::report::EvaluationReport;
use firnsim_core::session::{AppPhase, SimulationState, Transcript};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::report_service::{ReportError, ReportService};
use crate::simulation_service::{SendOutcome, SimulationError, SimulationService};

/// Errors raised by workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The operation is not available in the current phase.
    #[error("operation requires the {expected} phase, but the current phase is {actual}")]
    WrongPhase {
        expected: AppPhase,
        actual: AppPhase,
    },

    /// Intake rejected the persona fields.
    #[error("invalid persona: {0}")]
    InvalidPersona(String),

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error(transparent)]
    Report(#[from] ReportError),

    /// Broken internal invariant (should not happen in normal operation).
    #[error("internal state error: {0}")]
    Internal(String),
}

/// The trainer's top-level state machine.
pub struct TrainerWorkflow<F: SessionFactory, G: GenerationAgent> {
    factory: F,
    reports: ReportService<G>,
    phase: AppPhase,
    simulation: Option<SimulationService<F::Session>>,
    report: Option<EvaluationReport>,
}

impl<F: SessionFactory, G: GenerationAgent> TrainerWorkflow<F, G> {
    /// Creates a workflow in the Setup phase.
    pub fn new(factory: F, generation_agent: G) -> Self {
        Self {
            factory,
            reports: ReportService::new(generation_agent),
            phase: AppPhase::Setup,
            simulation: None,
            report: None,
        }
    }

    /// The currently active phase.
    pub fn phase(&self) -> AppPhase {
        self.phase
    }

    /// The finished report, available in the Report phase.
    pub fn report(&self) -> Option<&EvaluationReport> {
        self.report.as_ref()
    }

    /// The transcript of the running simulation, if one exists.
    pub fn transcript(&self) -> Option<&Transcript> {
        self.simulation.as_ref().map(|s| s.transcript())
    }

    /// Intake: validates the persona fields and starts the simulation.
    ///
    /// Rejection keeps the workflow in Setup with no side effects.
    pub async fn submit_persona(
        &mut self,
        request: CreatePersonaRequest,
    ) -> Result<(), WorkflowError> {
        self.expect_phase(AppPhase::Setup)?;
        request.validate().map_err(WorkflowError::InvalidPersona)?;

        let persona = request.into_persona();
        info!(persona_id = %persona.id, "persona accepted, starting simulation");

        let simulation = SimulationService::start(&self.factory, persona).await;
        self.simulation = Some(simulation);
        self.transition(AppPhase::Chat);
        Ok(())
    }

    /// Relays one manager input to the running simulation.
    pub async fn send(&mut self, text: &str) -> Result<SendOutcome, WorkflowError> {
        self.expect_phase(AppPhase::Chat)?;
        let simulation = self.active_simulation_mut()?;
        Ok(simulation.send(text).await?)
    }

    /// Manual end action: ends the interview with the transcript so far.
    pub fn end_interview(&mut self) -> Result<(), WorkflowError> {
        self.expect_phase(AppPhase::Chat)?;
        self.active_simulation_mut()?.terminate();
        Ok(())
    }

    /// Generates the coaching report for the ended (or manually ended)
    /// interview.
    ///
    /// On success the workflow moves to Report. On any failure the
    /// simulation and its transcript are discarded and the workflow returns
    /// to Setup; there is no resume-and-retry path.
    pub async fn generate_report(&mut self) -> Result<&EvaluationReport, WorkflowError> {
        self.expect_phase(AppPhase::Chat)?;
        let mut simulation = self
            .simulation
            .take()
            .ok_or_else(|| WorkflowError::Internal("chat phase without a simulation".to_string()))?;

        if simulation.state() != SimulationState::Ended {
            simulation.terminate();
        }
        let (session, transcript) = simulation.finish();

        let generated = self.reports.generate(&transcript).await;
        match generated {
            Ok(report) => {
                info!(
                    session_id = %session.id,
                    total = report.total_score,
                    "evaluation report generated"
                );
                self.transition(AppPhase::Report);
                Ok(self.report.insert(report))
            }
            Err(err) => {
                warn!(session_id = %session.id, error = %err, "report generation failed");
                self.transition(AppPhase::Setup);
                Err(err.into())
            }
        }
    }

    /// Clears persona, report, and session state and returns to Setup.
    pub fn restart(&mut self) -> Result<(), WorkflowError> {
        self.expect_phase(AppPhase::Report)?;
        self.simulation = None;
        self.report = None;
        self.transition(AppPhase::Setup);
        Ok(())
    }

    fn expect_phase(&self, expected: AppPhase) -> Result<(), WorkflowError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(WorkflowError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    fn transition(&mut self, next: AppPhase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "illegal phase transition {} -> {}",
            self.phase,
            next
        );
        debug!(from = %self.phase, to = %next, "phase transition");
        self.phase = next;
    }

    fn active_simulation_mut(
        &mut self,
    ) -> Result<&mut SimulationService<F::Session>, WorkflowError> {
        self.simulation
            .as_mut()
            .ok_or_else(|| WorkflowError::Internal("chat phase without a simulation".to_string()))
    }
}
