//! Stateful Gemini chat sessions.
//!
//! A session owns the provider-side context: the fixed system instruction,
//! the sampling temperature, and the accumulated turn history. Callers send
//! bare turn text; the session resends its own history on every request,
//! which is how the stateless `generateContent` endpoint models a chat.

use async_trait::async_trait;
use firnsim_core::agent::{AgentError, ChatSession, SessionFactory};
use tracing::debug;

use crate::gemini_api_agent::{Content, GeminiApiAgent, GenerateContentRequest, GenerationConfig};

/// One live Gemini conversation.
pub struct GeminiChatSession {
    agent: GeminiApiAgent,
    system_instruction: Content,
    temperature: f32,
    history: Vec<Content>,
}

impl GeminiChatSession {
    fn new(agent: GeminiApiAgent, system_instruction: &str, temperature: f32) -> Self {
        Self {
            agent,
            system_instruction: Content::system(system_instruction),
            temperature,
            history: Vec::new(),
        }
    }

    /// Number of turns (user and model) accumulated provider-side.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

#[async_trait]
impl ChatSession for GeminiChatSession {
    async fn send(&mut self, text: &str) -> Result<String, AgentError> {
        self.history.push(Content::user(text));

        let request = GenerateContentRequest {
            contents: self.history.clone(),
            system_instruction: Some(self.system_instruction.clone()),
            generation_config: Some(GenerationConfig {
                temperature: Some(self.temperature),
                ..GenerationConfig::default()
            }),
        };

        match self.agent.send_request(&request).await {
            Ok(reply) => {
                self.history.push(Content::model(&reply));
                debug!(history = self.history.len(), "chat turn completed");
                Ok(reply)
            }
            Err(err) => {
                // Drop the failed turn so a resend does not duplicate it.
                self.history.pop();
                Err(err)
            }
        }
    }
}

/// Opens [`GeminiChatSession`]s from a shared agent configuration.
#[derive(Clone)]
pub struct GeminiSessionFactory {
    agent: GeminiApiAgent,
}

impl GeminiSessionFactory {
    /// Creates a factory reusing an already configured agent.
    pub fn new(agent: GeminiApiAgent) -> Self {
        Self { agent }
    }

    /// Creates a factory from secret.json / environment configuration.
    pub fn try_from_env() -> Result<Self, AgentError> {
        Ok(Self::new(GeminiApiAgent::try_from_env()?))
    }
}

#[async_trait]
impl SessionFactory for GeminiSessionFactory {
    type Session = GeminiChatSession;

    async fn open_session(
        &self,
        system_instruction: &str,
        temperature: f32,
    ) -> Result<Self::Session, AgentError> {
        Ok(GeminiChatSession::new(
            self.agent.clone(),
            system_instruction,
            temperature,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_session_starts_with_empty_history() {
        let factory = GeminiSessionFactory::new(GeminiApiAgent::new("test-key", "test-model"));
        let session = factory
            .open_session("You are a team member.", 0.7)
            .await
            .unwrap();
        assert_eq!(session.history_len(), 0);
    }
}
