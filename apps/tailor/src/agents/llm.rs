//! Agent invoker backed by the Claude API.

use async_trait::async_trait;
use tracing::debug;

use crate::agents::prompts::{build_prompt, system_prompt};
use crate::agents::{AgentError, AgentInvoker, AgentRole};
use crate::llm_client::{LlmClient, LlmError};

/// Sends each role's prompt through the shared `LlmClient` and returns the raw answer.
#[derive(Clone)]
pub struct LlmAgentInvoker {
    llm: LlmClient,
}

impl LlmAgentInvoker {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl AgentInvoker for LlmAgentInvoker {
    async fn invoke(&self, role: AgentRole, input: &str) -> Result<String, AgentError> {
        let system = system_prompt(role);
        let prompt = build_prompt(role, input);
        debug!("{} prompt: {} chars", role, prompt.len());

        let response = self.llm.call(&prompt, &system).await?;

        // A cut-off answer cannot parse as JSON.
        if response.stop_reason.as_deref() == Some("max_tokens") {
            return Err(AgentError::Failed(format!(
                "{role} answer truncated after {} output tokens",
                response.usage.output_tokens
            )));
        }

        response
            .text()
            .map(str::to_string)
            .ok_or(AgentError::Llm(LlmError::EmptyContent))
    }
}
