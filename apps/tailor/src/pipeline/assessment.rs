//! Assessment stage: score and plan against the same (job, resume) pair, concurrently.
//! Re-assessment reuses `score` against the tailored resume.

use tracing::{debug, info};

use crate::agents::{invoke_typed, to_payload, AgentRole, JobAndResume};
use crate::errors::AppError;
use crate::models::plan::BulletAction;
use crate::models::{JobProfile, MatchResult, ResumeProfile, TailoringPlan};
use crate::pipeline::StageContext;

/// Baseline score plus the plan, available only once both succeeded.
#[derive(Debug, Clone)]
pub struct Assessment {
    pub baseline: MatchResult,
    pub plan: TailoringPlan,
}

/// Scores a resume against a job. Pure with respect to the run: calling it again with
/// another resume does not depend on earlier calls.
pub async fn score(
    ctx: &StageContext,
    job: &JobProfile,
    resume: &ResumeProfile,
) -> Result<MatchResult, AppError> {
    let payload = to_payload(&JobAndResume {
        job_profile: job,
        resume_profile: resume,
    })?;
    invoke_typed(ctx.agent.as_ref(), AgentRole::Scoring, &payload, ctx.timeout).await
}

pub async fn plan(
    ctx: &StageContext,
    job: &JobProfile,
    resume: &ResumeProfile,
) -> Result<TailoringPlan, AppError> {
    let payload = to_payload(&JobAndResume {
        job_profile: job,
        resume_profile: resume,
    })?;
    invoke_typed(
        ctx.agent.as_ref(),
        AgentRole::PlanGeneration,
        &payload,
        ctx.timeout,
    )
    .await
}

/// Runs `score` and `plan` concurrently; the first failure cancels the other.
pub async fn run_assessment(
    ctx: &StageContext,
    job: &JobProfile,
    resume: &ResumeProfile,
) -> Result<Assessment, AppError> {
    let (baseline, plan) = tokio::try_join!(score(ctx, job, resume), plan(ctx, job, resume))?;

    info!(
        "Baseline fit: {}/100 ({} missing keywords); plan has {} instructions at {:?} aggressiveness",
        baseline.fit_score_overall,
        baseline.missing_keywords.len(),
        plan.instructions.len(),
        plan.aggressiveness
    );
    debug!(
        "Plan actions: {} rewrite, {} emphasize, {} de-emphasize, {} remove, {} keep",
        plan.count_action(BulletAction::Rewrite),
        plan.count_action(BulletAction::Emphasize),
        plan.count_action(BulletAction::DeEmphasize),
        plan.count_action(BulletAction::Remove),
        plan.count_action(BulletAction::Keep)
    );

    Ok(Assessment { baseline, plan })
}

/// Scores the tailored resume against the original job profile.
pub async fn reassess(
    ctx: &StageContext,
    job: &JobProfile,
    tailored: &ResumeProfile,
) -> Result<MatchResult, AppError> {
    let final_result = score(ctx, job, tailored).await?;
    info!(
        "Final fit: {}/100 ({} missing keywords)",
        final_result.fit_score_overall,
        final_result.missing_keywords.len()
    );
    Ok(final_result)
}
