use std::sync::Arc;

use crate::agents::AgentInvoker;
use crate::config::Config;
use crate::pipeline::StageContext;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable agent invoker. Default: `LlmAgentInvoker` over the Claude API.
    pub agent: Arc<dyn AgentInvoker>,
    pub config: Config,
}

impl AppState {
    /// A fresh context for one run.
    pub fn stage_context(&self) -> StageContext {
        StageContext::new(self.agent.clone(), self.config.agent_timeout)
    }
}
