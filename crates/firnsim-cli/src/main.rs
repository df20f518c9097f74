//! FIRNSIM terminal driver.
//!
//! Thin presentation layer over the application workflow: an intake form,
//! the interview chat loop, and the report screen with export/restart.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use firnsim_application::presenter::{MarkdownFileExporter, ReportExporter, render_markdown};
use firnsim_application::{SendOutcome, TrainerWorkflow, WorkflowError};
use firnsim_core::persona::CreatePersonaRequest;
use firnsim_core::session::{AppPhase, Speaker};
use firnsim_interaction::{GeminiApiAgent, GeminiSessionFactory};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

#[derive(Parser)]
#[command(name = "firnsim")]
#[command(about = "FIRNSIM - FIRN-based performance interview role-play trainer", long_about = None)]
struct Cli {
    /// Pre-fill the intake form with the built-in example persona
    #[arg(long)]
    sample: bool,

    /// Override the Gemini model name
    #[arg(long)]
    model: Option<String>,

    /// Directory exported reports are written to
    #[arg(long, default_value = ".")]
    export_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut agent = GeminiApiAgent::try_from_env()
        .context("Gemini is not configured; set GEMINI_API_KEY or ~/.config/firnsim/secret.json")?;
    if let Some(model) = &cli.model {
        agent = agent.with_model(model.clone());
    }

    let factory = GeminiSessionFactory::new(agent.clone());
    let mut workflow = TrainerWorkflow::new(factory, agent);
    let mut editor = DefaultEditor::new()?;

    println!("{}", "FIRNSIM - Performance Interview Trainer".bold());
    println!("Interview the simulated employee, then receive a FIRN coaching report.\n");

    loop {
        match workflow.phase() {
            AppPhase::Setup => {
                if !run_setup(&mut workflow, &mut editor, cli.sample).await? {
                    break;
                }
            }
            AppPhase::Chat => run_chat(&mut workflow, &mut editor).await?,
            AppPhase::Report => {
                if !run_report(&mut workflow, &mut editor, &cli.export_dir)? {
                    break;
                }
            }
        }
    }

    println!("Goodbye.");
    Ok(())
}

/// Intake screen. Returns false when the user aborts the program.
async fn run_setup(
    workflow: &mut TrainerWorkflow<GeminiSessionFactory, GeminiApiAgent>,
    editor: &mut DefaultEditor,
    sample: bool,
) -> Result<bool> {
    let request = if sample {
        println!("{}", "Using the built-in example persona.".dimmed());
        CreatePersonaRequest::sample()
    } else {
        println!("{}", "Describe the employee you want to interview.".bold());
        let Some(request) = read_persona_form(editor)? else {
            return Ok(false);
        };
        request
    };

    match workflow.submit_persona(request).await {
        Ok(()) => {
            // Show the opening greeting (or the fallback notice).
            if let Some(transcript) = workflow.transcript() {
                for turn in transcript.turns() {
                    print_turn(turn.speaker, &turn.text);
                }
            }
            Ok(true)
        }
        Err(WorkflowError::InvalidPersona(message)) => {
            println!("{}", message.red());
            Ok(true)
        }
        Err(err) => Err(err.into()),
    }
}

fn read_persona_form(editor: &mut DefaultEditor) -> Result<Option<CreatePersonaRequest>> {
    let fields = [
        "Job duties",
        "Title / form of address",
        "Self-evaluation summary",
        "Disposition (tone, attitude, motivations)",
        "Current issue needing feedback",
    ];

    let mut answers = Vec::with_capacity(fields.len());
    for label in fields {
        match editor.readline(&format!("{label}: ")) {
            Ok(line) => answers.push(line),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(None),
            Err(err) => return Err(err.into()),
        }
    }

    let mut iter = answers.into_iter();
    Ok(Some(CreatePersonaRequest {
        job: iter.next().unwrap_or_default(),
        title: iter.next().unwrap_or_default(),
        self_evaluation: iter.next().unwrap_or_default(),
        disposition: iter.next().unwrap_or_default(),
        current_issue: iter.next().unwrap_or_default(),
    }))
}

/// Chat screen: relays lines until the interview ends, then generates the
/// report (falling back to Setup on failure).
async fn run_chat(
    workflow: &mut TrainerWorkflow<GeminiSessionFactory, GeminiApiAgent>,
    editor: &mut DefaultEditor,
) -> Result<()> {
    println!(
        "{}",
        "Type your feedback. Say \"end conversation\" or \"evaluate now\" (or press Ctrl-D) to end."
            .dimmed()
    );

    loop {
        let line = match editor.readline(&"You: ".bold().to_string()) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                workflow.end_interview()?;
                break;
            }
            Err(err) => return Err(err.into()),
        };

        if line.trim().is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(&line);

        match workflow.send(&line).await {
            Ok(SendOutcome::Replied(reply)) => print_turn(Speaker::Employee, &reply),
            Ok(SendOutcome::Ended) => break,
            Err(WorkflowError::Simulation(err)) => {
                debug!(error = %err, "relay failed");
                println!("{}", err.user_advisory().yellow());
            }
            Err(err) => return Err(err.into()),
        }
    }

    println!("{}", "Analyzing the interview...".dimmed());
    match workflow.generate_report().await {
        Ok(_) => Ok(()),
        Err(WorkflowError::Report(err)) => {
            // The workflow already fell back to Setup.
            println!(
                "{}",
                format!("Could not generate the evaluation report: {err}").red()
            );
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

/// Report screen. Returns false when the user quits.
fn run_report(
    workflow: &mut TrainerWorkflow<GeminiSessionFactory, GeminiApiAgent>,
    editor: &mut DefaultEditor,
    export_dir: &Path,
) -> Result<bool> {
    if let Some(report) = workflow.report() {
        println!("\n{}", render_markdown(report));
    }

    loop {
        let answer = match editor.readline("[e]xport, [r]estart or [q]uit: ") {
            Ok(line) => line.trim().to_lowercase(),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(false),
            Err(err) => return Err(err.into()),
        };

        match answer.as_str() {
            "e" | "export" => {
                let Some(report) = workflow.report() else {
                    continue;
                };
                let exporter = MarkdownFileExporter::new(export_dir.to_path_buf());
                match exporter.export(report) {
                    Ok(path) => println!("Report written to {}", path.display()),
                    Err(err) => println!("{}", format!("Export failed: {err}").red()),
                }
            }
            "r" | "restart" => {
                workflow.restart()?;
                return Ok(true);
            }
            "q" | "quit" => return Ok(false),
            _ => {}
        }
    }
}

fn print_turn(speaker: Speaker, text: &str) {
    match speaker {
        Speaker::Employee => println!("{} {}", "Employee:".cyan().bold(), text),
        Speaker::Manager => println!("{} {}", "You:".bold(), text),
    }
}
