use std::path::PathBuf;
use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::agents::AgentRole;
use crate::pipeline::driver::PipelineState;

/// Failures reading the source resume or job description. Raised before any stage runs.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Input not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Unreadable document {}: {reason}", .path.display())]
    UnreadableDocument { path: PathBuf, reason: String },

    #[error("{0} is empty")]
    Empty(String),

    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// An extraction agent returned something that is not a valid profile.
    #[error("Extraction failed ({role}): {reason}")]
    Extraction {
        role: AgentRole,
        reason: String,
        raw: String,
    },

    /// A scoring, planning or application agent returned output that does not fit its schema.
    #[error("Schema violation ({role}): {reason}")]
    SchemaViolation {
        role: AgentRole,
        reason: String,
        raw: String,
    },

    #[error("Missing upstream output: {0}")]
    Dependency(&'static str),

    #[error("Agent call timed out ({role}) after {after:?}")]
    Timeout { role: AgentRole, after: Duration },

    #[error("Agent error ({role}): {message}")]
    Agent { role: AgentRole, message: String },

    #[error("Output error: {0}")]
    Output(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// The raw agent response attached to parse/validation failures, if any.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            AppError::Extraction { raw, .. } | AppError::SchemaViolation { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

/// A run that stopped at `stage`. No stage after it executed and no artifact was written.
#[derive(Debug, Error)]
#[error("Pipeline failed while {stage}: {source}")]
pub struct PipelineError {
    pub stage: PipelineState,
    #[source]
    pub source: AppError,
}

impl PipelineError {
    /// A failure before the run's first stage.
    pub fn before_start(source: impl Into<AppError>) -> Self {
        Self {
            stage: PipelineState::Pending,
            source: source.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Input(e) => (StatusCode::BAD_REQUEST, "INPUT_ERROR", e.to_string()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Extraction { role, reason, raw } => {
                tracing::error!("Extraction error ({role}): {reason}; raw response: {raw}");
                (
                    StatusCode::BAD_GATEWAY,
                    "EXTRACTION_ERROR",
                    format!("The {role} agent returned an unusable profile"),
                )
            }
            AppError::SchemaViolation { role, reason, raw } => {
                tracing::error!("Schema violation ({role}): {reason}; raw response: {raw}");
                (
                    StatusCode::BAD_GATEWAY,
                    "SCHEMA_VIOLATION",
                    format!("The {role} agent returned output that does not match its schema"),
                )
            }
            AppError::Agent { role, message } => {
                tracing::error!("Agent error ({role}): {message}");
                (
                    StatusCode::BAD_GATEWAY,
                    "AGENT_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Timeout { role, after } => (
                StatusCode::GATEWAY_TIMEOUT,
                "AGENT_TIMEOUT",
                format!("The {role} agent did not answer within {after:?}"),
            ),
            AppError::Dependency(what) => {
                tracing::error!("Dependency error: missing {what}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DEPENDENCY_ERROR",
                    "A pipeline stage ran without its inputs".to_string(),
                )
            }
            AppError::Output(msg) => {
                tracing::error!("Output error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "OUTPUT_ERROR",
                    "Failed to write the run artifacts".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        tracing::error!("Run failed while {}", self.stage);
        self.source.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_response_exposed_for_schema_failures() {
        let err = AppError::SchemaViolation {
            role: AgentRole::Scoring,
            reason: "missing field".to_string(),
            raw: "{\"oops\": 1}".to_string(),
        };
        assert_eq!(err.raw_response(), Some("{\"oops\": 1}"));
        assert!(AppError::Dependency("plan").raw_response().is_none());
    }

    #[test]
    fn test_status_codes() {
        let timeout = AppError::Timeout {
            role: AgentRole::PlanGeneration,
            after: Duration::from_secs(5),
        };
        assert_eq!(timeout.into_response().status(), StatusCode::GATEWAY_TIMEOUT);

        let input = AppError::Input(InputError::Empty("job description".to_string()));
        assert_eq!(input.into_response().status(), StatusCode::BAD_REQUEST);

        let extraction = AppError::Extraction {
            role: AgentRole::JobExtraction,
            reason: "bad json".to_string(),
            raw: "nope".to_string(),
        };
        assert_eq!(extraction.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_timeout_message_keeps_sub_second_bound() {
        let err = AppError::Timeout {
            role: AgentRole::Scoring,
            after: Duration::from_millis(250),
        };
        assert!(err.to_string().ends_with("after 250ms"), "{err}");
    }

    #[test]
    fn test_pipeline_error_message_names_stage() {
        let err = PipelineError {
            stage: PipelineState::Assessing,
            source: AppError::Dependency("job profile"),
        };
        let msg = err.to_string();
        assert!(msg.contains("assessing"), "{msg}");
        assert!(msg.contains("job profile"));
    }
}
