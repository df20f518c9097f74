//! Report generator.
//!
//! Renders the finished transcript into a speaker-labeled block, asks the
//! provider for a schema-constrained JSON evaluation against the FIRN
//! rubric, validates the answer, and derives the total score locally.

use std::time::Duration;

use firnsim_core::agent::{AgentError, GenerationAgent};
use firnsim_core::report::{EvaluationReport, ReportPayload};
use firnsim_core::session::{Speaker, Transcript};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

use crate::prompts;

/// Errors raised while generating the evaluation report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The provider rejected the request because the quota is exhausted.
    #[error("provider quota exhausted: {message}")]
    QuotaExhausted {
        message: String,
        retry_after: Option<Duration>,
    },

    /// Transport or model failure.
    #[error("report generation failed: {0}")]
    Generation(String),

    /// The provider's answer was not valid JSON for the expected shape.
    #[error("report payload was not valid JSON: {0}")]
    Parse(String),

    /// The payload parsed but violated the score contract.
    #[error("report payload violated the expected shape: {0}")]
    Schema(String),
}

impl ReportError {
    fn from_agent_error(err: AgentError) -> Self {
        if err.is_quota_exhausted() {
            Self::QuotaExhausted {
                retry_after: err.retry_after(),
                message: err.to_string(),
            }
        } else {
            Self::Generation(err.to_string())
        }
    }
}

/// Generates coaching reports from finished transcripts.
pub struct ReportService<G: GenerationAgent> {
    agent: G,
}

impl<G: GenerationAgent> ReportService<G> {
    pub fn new(agent: G) -> Self {
        Self { agent }
    }

    /// Scores `transcript` against the FIRN rubric.
    pub async fn generate(&self, transcript: &Transcript) -> Result<EvaluationReport, ReportError> {
        let block = render_transcript(transcript);
        let prompt = prompts::render_rubric_prompt(&block)
            .map_err(|err| ReportError::Generation(err.to_string()))?;
        let schema = response_schema();

        debug!(turns = transcript.len(), "requesting evaluation report");

        let raw = self
            .agent
            .generate_json(&prompt, &schema)
            .await
            .map_err(|err| {
                warn!(error = %err, "report generation call failed");
                ReportError::from_agent_error(err)
            })?;

        let payload: ReportPayload = serde_json::from_str(strip_code_fences(&raw))
            .map_err(|err| ReportError::Parse(err.to_string()))?;

        let report = EvaluationReport::from_payload(payload).map_err(ReportError::Schema)?;
        debug!(total = report.total_score, "evaluation report generated");
        Ok(report)
    }
}

/// Renders the transcript as a speaker-labeled block in chronological order,
/// labeling the human as the evaluating authority and the simulated party as
/// the subordinate.
pub fn render_transcript(transcript: &Transcript) -> String {
    transcript
        .turns()
        .iter()
        .map(|turn| format!("{}: {}", speaker_label(turn.speaker), turn.text))
        .collect::<Vec<_>>()
        .join("\n")
}

fn speaker_label(speaker: Speaker) -> &'static str {
    match speaker {
        Speaker::Manager => "Manager",
        Speaker::Employee => "Team member",
    }
}

/// The response schema sent alongside the rubric prompt so the provider
/// decodes straight into the expected shape.
fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": { "type": "STRING" },
            "firn_score": {
                "type": "OBJECT",
                "properties": {
                    "F": { "type": "INTEGER" },
                    "I": { "type": "INTEGER" },
                    "R": { "type": "INTEGER" },
                    "N": { "type": "INTEGER" },
                    "Manner": { "type": "INTEGER" }
                },
                "required": ["F", "I", "R", "N", "Manner"]
            },
            "good_points": { "type": "ARRAY", "items": { "type": "STRING" } },
            "improvement_points": { "type": "ARRAY", "items": { "type": "STRING" } },
            "overall_comment": { "type": "STRING" }
        },
        "required": [
            "summary",
            "firn_score",
            "good_points",
            "improvement_points",
            "overall_comment"
        ]
    })
}

/// Tolerates a fenced answer from providers that wrap JSON in a code block.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.trim_start_matches(['\r', '\n']);
    rest.strip_suffix("```").map(str::trim_end).unwrap_or(rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedGenerator, ScriptedReply, valid_report_json};

    fn two_turn_transcript() -> Transcript {
        let mut transcript = Transcript::new();
        transcript.push_employee("Hello, I'm ready.");
        transcript.push_manager("Let's talk about last week's report.");
        transcript
    }

    #[test]
    fn test_render_transcript_labels_and_order() {
        let block = render_transcript(&two_turn_transcript());
        assert_eq!(
            block,
            "Team member: Hello, I'm ready.\nManager: Let's talk about last week's report."
        );
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[tokio::test]
    async fn test_generate_parses_and_recomputes_total() {
        let generator = ScriptedGenerator::new(vec![ScriptedReply::ok(&valid_report_json())]);
        let service = ReportService::new(generator);

        let report = service.generate(&two_turn_transcript()).await.unwrap();

        assert_eq!(report.total_score, 70);
        assert_eq!(report.firn_score.fact, 16);
        assert_eq!(report.good_points.len(), 1);
    }

    #[tokio::test]
    async fn test_generate_embeds_transcript_in_prompt() {
        let generator = ScriptedGenerator::new(vec![ScriptedReply::ok(&valid_report_json())]);
        let service = ReportService::new(generator);

        service.generate(&two_turn_transcript()).await.unwrap();

        let prompts = service.agent.prompts().await;
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Manager: Let's talk about last week's report."));
        assert!(prompts[0].contains("Team member: Hello, I'm ready."));
    }

    #[tokio::test]
    async fn test_generate_surfaces_parse_error() {
        let generator = ScriptedGenerator::new(vec![ScriptedReply::ok("I'd rather not answer.")]);
        let service = ReportService::new(generator);

        let err = service.generate(&two_turn_transcript()).await.unwrap_err();
        assert!(matches!(err, ReportError::Parse(_)));
    }

    #[tokio::test]
    async fn test_generate_rejects_out_of_range_scores() {
        let payload = valid_report_json().replace("\"F\": 16", "\"F\": 25");
        let generator = ScriptedGenerator::new(vec![ScriptedReply::ok(&payload)]);
        let service = ReportService::new(generator);

        let err = service.generate(&two_turn_transcript()).await.unwrap_err();
        assert!(matches!(err, ReportError::Schema(_)));
    }

    #[tokio::test]
    async fn test_generate_distinguishes_quota_failures() {
        let generator = ScriptedGenerator::new(vec![ScriptedReply::quota_error()]);
        let service = ReportService::new(generator);

        let err = service.generate(&two_turn_transcript()).await.unwrap_err();
        assert!(matches!(err, ReportError::QuotaExhausted { .. }));

        let generator = ScriptedGenerator::new(vec![ScriptedReply::generic_error()]);
        let service = ReportService::new(generator);
        let err = service.generate(&two_turn_transcript()).await.unwrap_err();
        assert!(matches!(err, ReportError::Generation(_)));
    }

    #[tokio::test]
    async fn test_generate_accepts_fenced_json() {
        let fenced = format!("```json\n{}\n```", valid_report_json());
        let generator = ScriptedGenerator::new(vec![ScriptedReply::ok(&fenced)]);
        let service = ReportService::new(generator);

        let report = service.generate(&two_turn_transcript()).await.unwrap();
        assert_eq!(report.total_score, 70);
    }
}
