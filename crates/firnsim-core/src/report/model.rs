//! Evaluation report domain model.
//!
//! The report is scored against the FIRN rubric: Fact, Impact, Request,
//! New-impact, and Manner, each on a 0-20 scale. The wire field names
//! (`F`, `I`, `R`, `N`, `Manner`) are part of the model contract: the
//! response schema sent to the provider names them exactly.

use serde::{Deserialize, Serialize};

/// Fixed per-dimension maximum.
pub const MAX_AXIS_SCORE: u8 = 20;

/// The five FIRN sub-scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirnScore {
    /// Fact: did the feedback describe specific observed behavior?
    #[serde(rename = "F")]
    pub fact: u8,
    /// Impact: was the behavior's effect on the organization explained?
    #[serde(rename = "I")]
    pub impact: u8,
    /// Request: was a concrete behavioral change proposed?
    #[serde(rename = "R")]
    pub request: u8,
    /// New impact: was the positive future after the change described?
    #[serde(rename = "N")]
    pub new_impact: u8,
    /// Manner: behavior-focused, I-messages, two-way communication.
    #[serde(rename = "Manner")]
    pub manner: u8,
}

impl FirnScore {
    /// Sum of the five sub-scores, in `[0, 100]` for a valid score.
    pub fn total(&self) -> u16 {
        u16::from(self.fact)
            + u16::from(self.impact)
            + u16::from(self.request)
            + u16::from(self.new_impact)
            + u16::from(self.manner)
    }

    /// Validate that every sub-score lies in `[0, MAX_AXIS_SCORE]`.
    pub fn validate(&self) -> Result<(), String> {
        for (label, value) in self.axes() {
            if value > MAX_AXIS_SCORE {
                return Err(format!(
                    "{label} score {value} exceeds the maximum of {MAX_AXIS_SCORE}"
                ));
            }
        }
        Ok(())
    }

    /// The five (label, value) axes, in rubric order. Used by chart
    /// rendering together with [`MAX_AXIS_SCORE`].
    pub fn axes(&self) -> [(&'static str, u8); 5] {
        [
            ("Fact", self.fact),
            ("Impact", self.impact),
            ("Request", self.request),
            ("New Impact", self.new_impact),
            ("Manner", self.manner),
        ]
    }
}

/// The raw report shape the provider answers with.
///
/// Deliberately has no total: the total is derived locally and never trusted
/// from the external response.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportPayload {
    pub summary: String,
    pub firn_score: FirnScore,
    pub good_points: Vec<String>,
    pub improvement_points: Vec<String>,
    pub overall_comment: String,
}

/// The finished, validated coaching report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationReport {
    /// Free-text interview summary.
    pub summary: String,
    /// The five FIRN sub-scores.
    pub firn_score: FirnScore,
    /// What the manager did well.
    pub good_points: Vec<String>,
    /// What to improve, including suggested rewordings.
    pub improvement_points: Vec<String>,
    /// Final coaching advice.
    pub overall_comment: String,
    /// Sum of the five sub-scores, recomputed locally.
    pub total_score: u16,
}

impl EvaluationReport {
    /// Builds a report from a provider payload, validating the sub-score
    /// range and computing the total.
    pub fn from_payload(payload: ReportPayload) -> Result<Self, String> {
        payload.firn_score.validate()?;
        let total_score = payload.firn_score.total();
        Ok(Self {
            summary: payload.summary,
            firn_score: payload.firn_score,
            good_points: payload.good_points,
            improvement_points: payload.improvement_points,
            overall_comment: payload.overall_comment,
            total_score,
        })
    }
}
