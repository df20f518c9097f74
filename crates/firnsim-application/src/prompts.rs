//! Prompt templates for the interview simulation and the rubric evaluation.
//!
//! Templates are Jinja2, compiled once. The persona fields are embedded
//! verbatim; the behavioral rules and the rubric wording are fixed.

use firnsim_core::persona::Persona;
use firnsim_core::{FirnsimError, Result};
use minijinja::{Environment, context};
use once_cell::sync::Lazy;

/// Sampling temperature for the interview chat session.
pub const CHAT_TEMPERATURE: f32 = 0.7;

/// The synthetic first turn sent right after the session opens. Its reply
/// becomes the employee's greeting; the cue itself is never shown.
pub const OPENING_CUE: &str = "Do not list your accomplishments. Give your manager a short \
     greeting and briefly say that you are ready for the interview.";

const SYSTEM_INSTRUCTION_TEMPLATE: &str = r#"# Role
You are a team member (the appraisee) taking part in a corporate performance-interview simulation.
Stay fully in this role until the user says "end conversation" or "evaluate now".

# Persona Context
- Job duties: {{ persona.job }}
- Form of address: {{ persona.title }}
- Self-evaluation: {{ persona.self_evaluation }}
- Disposition and traits: {{ persona.disposition }}
- Current issue (the area needing feedback): {{ persona.current_issue }}

# Behavior Guidelines
1. Always address the user respectfully as your manager.
2. **Mirror the disposition**: keep your tone and attitude consistent with "{{ persona.disposition }}".
3. **Feedback response style (important)**:
   - If the manager criticizes your character or attitude, immediately respond defensively and show displeasure.
   - If the manager talks in terms of concrete behavior (facts) and its impact, acknowledge it and listen.
   - If the manager asks open questions inviting your view instead of lecturing one-sidedly, answer honestly and in detail.
4. **First greeting rule**: when the conversation starts, do not recite your results at length. Open with a light greeting to the manager and say only that you are ready for the interview.
5. Never mention specific company names; use generic business language.
6. Follow the manager's lead through the stages of the interview.

You may wait for the user to open the conversation, or offer a light greeting first."#;

const RUBRIC_PROMPT_TEMPLATE: &str = r#"Analyze the performance-interview conversation below against the FIRN model and good-feedback principles, and write a JSON report.

# Evaluation Framework: FIRN + Good Feedback Principles
1. FIRN model compliance (20 points each):
   - Fact: did the manager objectively convey specific observed behavior?
   - Impact: did the manager explain the real effect of that behavior on the organization or colleagues?
   - Request: did the manager propose the concrete behavior change they want?
   - New Impact: did the manager present the positive future expected from the change?
2. Feedback manner and attitude (20 points):
   - Did the manager focus on behavior rather than the person? (any personal attacks?)
   - Did the manager consider the other person's feelings and use I-messages?
   - Was there two-way communication through questions?

# Conversation
{{ transcript }}

Respond with exactly this JSON structure:
{
  "summary": "interview summary",
  "firn_score": { "F": 0-20, "I": 0-20, "R": 0-20, "N": 0-20, "Manner": 0-20 },
  "good_points": ["list of things done well"],
  "improvement_points": ["list of improvements and suggested rewordings"],
  "overall_comment": "final advice"
}"#;

static PROMPT_ENV: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.add_template("system_instruction", SYSTEM_INSTRUCTION_TEMPLATE)
        .expect("system instruction template is valid");
    env.add_template("rubric_prompt", RUBRIC_PROMPT_TEMPLATE)
        .expect("rubric prompt template is valid");
    env
});

/// Renders the system instruction steering the employee role-play.
pub fn render_system_instruction(persona: &Persona) -> Result<String> {
    let template = PROMPT_ENV
        .get_template("system_instruction")
        .map_err(|e| FirnsimError::internal(e.to_string()))?;
    template
        .render(context! { persona => persona })
        .map_err(|e| FirnsimError::internal(format!("Failed to render system instruction: {e}")))
}

/// Renders the rubric prompt around a speaker-labeled transcript block.
pub fn render_rubric_prompt(transcript: &str) -> Result<String> {
    let template = PROMPT_ENV
        .get_template("rubric_prompt")
        .map_err(|e| FirnsimError::internal(e.to_string()))?;
    template
        .render(context! { transcript => transcript })
        .map_err(|e| FirnsimError::internal(format!("Failed to render rubric prompt: {e}")))
}
