//! Evaluation report domain module.

mod model;

pub use model::{EvaluationReport, FirnScore, ReportPayload, MAX_AXIS_SCORE};
