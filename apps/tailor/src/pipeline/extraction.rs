//! Extraction stage: raw resume text and raw job text into profiles, concurrently.

use tracing::info;

use crate::agents::{invoke_typed, AgentRole};
use crate::errors::{AppError, InputError};
use crate::models::{JobProfile, ResumeProfile};
use crate::pipeline::StageContext;

/// Both profiles, available only once both extractions succeeded.
#[derive(Debug, Clone)]
pub struct Extracted {
    pub resume: ResumeProfile,
    pub job: JobProfile,
}

pub(crate) fn ensure_non_empty(what: &str, text: &str) -> Result<(), AppError> {
    if text.trim().is_empty() {
        return Err(InputError::Empty(what.to_string()).into());
    }
    Ok(())
}

pub async fn extract_resume(ctx: &StageContext, raw_text: &str) -> Result<ResumeProfile, AppError> {
    ensure_non_empty("resume text", raw_text)?;
    invoke_typed(
        ctx.agent.as_ref(),
        AgentRole::ResumeExtraction,
        raw_text,
        ctx.timeout,
    )
    .await
}

pub async fn extract_job(ctx: &StageContext, raw_text: &str) -> Result<JobProfile, AppError> {
    ensure_non_empty("job description", raw_text)?;
    invoke_typed(
        ctx.agent.as_ref(),
        AgentRole::JobExtraction,
        raw_text,
        ctx.timeout,
    )
    .await
}

/// Runs both extractions concurrently. The first failure cancels the sibling call and
/// fails the whole stage; a lone successful profile is dropped.
pub async fn run_extraction(
    ctx: &StageContext,
    resume_text: &str,
    job_text: &str,
) -> Result<Extracted, AppError> {
    let (resume, job) = tokio::try_join!(
        extract_resume(ctx, resume_text),
        extract_job(ctx, job_text)
    )?;

    info!(
        "Extracted resume ({} experiences, {} bullets) and job '{}' at {} ({} requirement terms)",
        resume.experiences.len(),
        resume.bullet_count(),
        job.title,
        job.company,
        job.requirement_terms().len()
    );

    Ok(Extracted { resume, job })
}
