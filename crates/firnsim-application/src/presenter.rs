//! Report presenter.
//!
//! Pure layout plus file export. The markdown rendering is the single
//! source of the report's visual layout; the exporter writes the same
//! layout to disk. Producing a typeset/PDF artifact is an external concern
//! behind the [`ReportExporter`] trait.

use std::fs;
use std::path::{Path, PathBuf};

use firnsim_core::report::{EvaluationReport, MAX_AXIS_SCORE};
use thiserror::Error;

/// Errors raised while exporting a report.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write report file: {0}")]
    Io(String),
}

/// Serializes the currently displayed report to a portable file.
pub trait ReportExporter {
    /// Writes the report and returns the path of the produced file.
    fn export(&self, report: &EvaluationReport) -> Result<PathBuf, ExportError>;
}

/// Renders the report as a single markdown document: total score, the
/// five-axis score chart, and the text sections.
pub fn render_markdown(report: &EvaluationReport) -> String {
    let mut out = String::new();

    out.push_str("# Performance Interview Coaching Report\n\n");
    out.push_str(&format!("**Total score: {} / 100**\n\n", report.total_score));

    out.push_str("## FIRN scores\n\n```text\n");
    out.push_str(&render_score_chart(report));
    out.push_str("```\n\n");

    out.push_str("## Summary\n\n");
    out.push_str(&report.summary);
    out.push_str("\n\n");

    out.push_str("## What went well\n\n");
    for point in &report.good_points {
        out.push_str(&format!("- {point}\n"));
    }

    out.push_str("\n## What to improve\n\n");
    for point in &report.improvement_points {
        out.push_str(&format!("- {point}\n"));
    }

    out.push_str("\n## Coach's comment\n\n");
    out.push_str(&report.overall_comment);
    out.push('\n');

    out
}

/// Fixed-width bars for the five sub-scores, one cell per point against the
/// fixed per-axis maximum.
fn render_score_chart(report: &EvaluationReport) -> String {
    let mut chart = String::new();
    for (label, value) in report.firn_score.axes() {
        let filled = usize::from(value.min(MAX_AXIS_SCORE));
        let empty = usize::from(MAX_AXIS_SCORE) - filled;
        chart.push_str(&format!(
            "{label:<11} {}{}  {value:>2}/{MAX_AXIS_SCORE}\n",
            "█".repeat(filled),
            "░".repeat(empty),
        ));
    }
    chart
}

/// Writes the rendered report to a date-stamped markdown file.
pub struct MarkdownFileExporter {
    output_dir: PathBuf,
}

impl MarkdownFileExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    fn file_name() -> String {
        format!(
            "Performance_Review_Report_{}.md",
            chrono::Local::now().format("%Y-%m-%d")
        )
    }
}

impl ReportExporter for MarkdownFileExporter {
    fn export(&self, report: &EvaluationReport) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(&self.output_dir).map_err(|err| ExportError::Io(err.to_string()))?;
        let path = self.output_dir.join(Self::file_name());
        write_report(&path, report)?;
        Ok(path)
    }
}

fn write_report(path: &Path, report: &EvaluationReport) -> Result<(), ExportError> {
    fs::write(path, render_markdown(report)).map_err(|err| ExportError::Io(err.to_string()))
}
