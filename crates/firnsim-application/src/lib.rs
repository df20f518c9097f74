//! FIRNSIM application services.
//!
//! Orchestrates the three-phase trainer workflow on top of the domain core:
//! persona intake, the interview simulation, report generation, and report
//! presentation/export.

pub mod presenter;
pub mod prompts;
pub mod report_service;
pub mod simulation_service;
pub mod workflow;

#[cfg(test)]
mod testing;

pub use report_service::{ReportError, ReportService};
pub use simulation_service::{SendOutcome, SimulationError, SimulationService};
pub use workflow::{TrainerWorkflow, WorkflowError};
