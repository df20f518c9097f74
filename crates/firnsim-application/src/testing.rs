//! Scripted provider doubles shared by the service tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use firnsim_core::agent::{AgentError, ChatSession, GenerationAgent, SessionFactory};
use tokio::sync::Mutex;

/// One scripted provider answer.
#[derive(Clone)]
pub struct ScriptedReply(Result<String, AgentError>);

impl ScriptedReply {
    pub fn ok(text: &str) -> Self {
        Self(Ok(text.to_string()))
    }

    pub fn quota_error() -> Self {
        Self(Err(AgentError::ProcessError {
            status_code: Some(429),
            message: "RESOURCE_EXHAUSTED: Quota exceeded".to_string(),
            is_retryable: true,
            retry_after: None,
        }))
    }

    pub fn generic_error() -> Self {
        Self(Err(AgentError::ProcessError {
            status_code: Some(500),
            message: "Internal error".to_string(),
            is_retryable: true,
            retry_after: None,
        }))
    }
}

/// Factory handing out [`ScriptedChat`] sessions that replay a fixed list of
/// replies and record every text they were sent.
pub struct ScriptedFactory {
    replies: Arc<Mutex<VecDeque<ScriptedReply>>>,
    sent: Arc<Mutex<Vec<String>>>,
    fail_open: bool,
}

impl ScriptedFactory {
    pub fn new(replies: Vec<ScriptedReply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into())),
            sent: Arc::new(Mutex::new(Vec::new())),
            fail_open: false,
        }
    }

    /// A factory whose `open_session` always fails.
    pub fn failing_open() -> Self {
        let mut factory = Self::new(Vec::new());
        factory.fail_open = true;
        factory
    }

    /// Every text sent through any session opened by this factory.
    pub async fn sent(&self) -> Vec<String> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl SessionFactory for ScriptedFactory {
    type Session = ScriptedChat;

    async fn open_session(
        &self,
        _system_instruction: &str,
        _temperature: f32,
    ) -> Result<Self::Session, AgentError> {
        if self.fail_open {
            return Err(AgentError::ExecutionFailed(
                "scripted open failure".to_string(),
            ));
        }
        Ok(ScriptedChat {
            replies: self.replies.clone(),
            sent: self.sent.clone(),
        })
    }
}

pub struct ScriptedChat {
    replies: Arc<Mutex<VecDeque<ScriptedReply>>>,
    sent: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl ChatSession for ScriptedChat {
    async fn send(&mut self, text: &str) -> Result<String, AgentError> {
        self.sent.lock().await.push(text.to_string());
        match self.replies.lock().await.pop_front() {
            Some(ScriptedReply(result)) => result,
            None => Err(AgentError::ExecutionFailed(
                "scripted replies exhausted".to_string(),
            )),
        }
    }
}

/// Generation double replaying a fixed list of one-shot answers and
/// recording the prompts it received.
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<ScriptedReply>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(replies: Vec<ScriptedReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }
}

#[async_trait]
impl GenerationAgent for ScriptedGenerator {
    async fn generate_json(
        &self,
        prompt: &str,
        _schema: &serde_json::Value,
    ) -> Result<String, AgentError> {
        self.prompts.lock().await.push(prompt.to_string());
        match self.replies.lock().await.pop_front() {
            Some(ScriptedReply(result)) => result,
            None => Err(AgentError::ExecutionFailed(
                "scripted replies exhausted".to_string(),
            )),
        }
    }
}

/// A syntactically valid report payload whose sub-scores sum to 70.
pub fn valid_report_json() -> String {
    r#"{
        "summary": "A constructive interview anchored in concrete facts.",
        "firn_score": { "F": 16, "I": 12, "R": 18, "N": 10, "Manner": 14 },
        "good_points": ["Opened with a specific observed behavior."],
        "improvement_points": ["Ask more open questions before proposing changes."],
        "overall_comment": "Solid structure; keep the focus on behavior."
    }"#
    .to_string()
}
