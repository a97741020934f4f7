//! Generative agents: the abstract invocation contract the pipeline depends on.
//!
//! An agent takes a role plus a serialized input and answers with text that should be
//! JSON matching the role's output schema. `invoke_typed` owns everything between the
//! raw answer and a validated value: timeout, fence stripping, deserialization and
//! schema validation. The raw answer is kept on every failure path for diagnostics.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::errors::AppError;
use crate::llm_client::{strip_json_fences, LlmError};
use crate::models::{JobProfile, ResumeProfile, TailoringPlan, Validate};

pub mod llm;
pub mod prompts;
#[cfg(test)]
pub mod testing;

/// The five agent roles a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    ResumeExtraction,
    JobExtraction,
    Scoring,
    PlanGeneration,
    PlanApplication,
}

impl AgentRole {
    pub fn as_str(self) -> &'static str {
        match self {
            AgentRole::ResumeExtraction => "resume_extraction",
            AgentRole::JobExtraction => "job_extraction",
            AgentRole::Scoring => "scoring",
            AgentRole::PlanGeneration => "plan_generation",
            AgentRole::PlanApplication => "plan_application",
        }
    }

    pub fn is_extraction(self) -> bool {
        matches!(self, AgentRole::ResumeExtraction | AgentRole::JobExtraction)
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("agent failed: {0}")]
    Failed(String),
}

/// The generative agent invoker. Implement this to swap providers without touching
/// the pipeline.
///
/// Implementations must be stateless with respect to a run: the scoring role is invoked
/// twice per run with different resumes and must not remember the first call.
#[async_trait]
pub trait AgentInvoker: Send + Sync {
    async fn invoke(&self, role: AgentRole, input: &str) -> Result<String, AgentError>;
}

/// Input for the scoring and plan-generation roles.
#[derive(Debug, Serialize)]
pub struct JobAndResume<'a> {
    pub job_profile: &'a JobProfile,
    pub resume_profile: &'a ResumeProfile,
}

/// Input for the plan-application role.
#[derive(Debug, Serialize)]
pub struct ExecutionInput<'a> {
    pub tailoring_plan: &'a TailoringPlan,
    pub resume: &'a ResumeProfile,
}

/// Serializes a stage input for an agent.
pub fn to_payload<T: Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string(value)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize agent input: {e}")))
}

/// Invokes `role` and parses the answer into a validated `T`, bounded by `timeout`.
pub async fn invoke_typed<T>(
    agent: &dyn AgentInvoker,
    role: AgentRole,
    input: &str,
    timeout: Duration,
) -> Result<T, AppError>
where
    T: DeserializeOwned + Validate,
{
    debug!("Invoking {} agent ({} input bytes)", role, input.len());

    let raw = match tokio::time::timeout(timeout, agent.invoke(role, input)).await {
        Err(_) => {
            return Err(AppError::Timeout {
                role,
                after: timeout,
            })
        }
        Ok(Err(e)) => {
            return Err(AppError::Agent {
                role,
                message: e.to_string(),
            })
        }
        Ok(Ok(raw)) => raw,
    };

    debug!("{} agent answered ({} bytes)", role, raw.len());
    parse_output(role, raw)
}

fn parse_output<T>(role: AgentRole, raw: String) -> Result<T, AppError>
where
    T: DeserializeOwned + Validate,
{
    let parsed = serde_json::from_str::<T>(strip_json_fences(&raw))
        .map_err(|e| e.to_string())
        .and_then(|value| value.validate().map(|_| value).map_err(|e| e.to_string()));

    parsed.map_err(|reason| {
        if role.is_extraction() {
            AppError::Extraction { role, reason, raw }
        } else {
            AppError::SchemaViolation { role, reason, raw }
        }
    })
}
