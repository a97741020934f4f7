//! Pipeline driver: sequences the stages as a forward-only state machine.
//!
//! Pending → Extracting → Assessing → Applying → ReAssessing → Reporting → Done,
//! with any stage able to drop straight to Failed. A failed run publishes nothing.

use std::fmt;
use std::future::Future;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::{AppError, PipelineError};
use crate::models::{JobProfile, MatchResult, OutputReport, ResumeProfile, TailoringPlan};
use crate::pipeline::application::{apply, Application, PlanApplicationWarning};
use crate::pipeline::assessment::{reassess, run_assessment, Assessment};
use crate::pipeline::extraction::{ensure_non_empty, run_extraction, Extracted};
use crate::pipeline::StageContext;
use crate::render::sink::PublishedArtifacts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Pending,
    Extracting,
    Assessing,
    Applying,
    ReAssessing,
    Reporting,
    Done,
    Failed,
}

impl PipelineState {
    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed)
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PipelineState::Pending => "starting",
            PipelineState::Extracting => "extracting",
            PipelineState::Assessing => "assessing",
            PipelineState::Applying => "applying",
            PipelineState::ReAssessing => "re-assessing",
            PipelineState::Reporting => "reporting",
            PipelineState::Done => "done",
            PipelineState::Failed => "failed",
        })
    }
}

/// Raw source text for one run.
#[derive(Debug, Clone)]
pub struct PipelineInputs {
    pub resume_text: String,
    pub job_text: String,
}

/// Receives the finished report and tailored resume during `Reporting`.
///
/// Either both artifacts are published or the call fails and neither is.
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn publish(
        &self,
        report: &OutputReport,
        tailored: &ResumeProfile,
    ) -> Result<PublishedArtifacts, AppError>;
}

/// Everything a successful run produced.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutcome {
    pub run_id: Uuid,
    pub job: JobProfile,
    pub original_resume: ResumeProfile,
    pub plan: TailoringPlan,
    pub tailored_resume: ResumeProfile,
    pub report: OutputReport,
    #[serde(skip)]
    pub published: PublishedArtifacts,
    pub warnings: Vec<PlanApplicationWarning>,
    pub history: Vec<PipelineState>,
}

/// Stage results as they become available.
#[derive(Default)]
struct StageOutputs {
    extracted: Option<Extracted>,
    assessment: Option<Assessment>,
    application: Option<Application>,
    final_result: Option<MatchResult>,
}

fn require<'a, T>(slot: &'a Option<T>, what: &'static str) -> Result<&'a T, AppError> {
    slot.as_ref().ok_or(AppError::Dependency(what))
}

pub struct PipelineDriver {
    ctx: StageContext,
    run_id: Uuid,
    state: PipelineState,
    history: Vec<PipelineState>,
    failed_at: Option<PipelineState>,
}

impl PipelineDriver {
    pub fn new(ctx: StageContext) -> Self {
        Self {
            ctx,
            run_id: Uuid::new_v4(),
            state: PipelineState::Pending,
            history: vec![PipelineState::Pending],
            failed_at: None,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// States visited so far, in order.
    pub fn history(&self) -> &[PipelineState] {
        &self.history
    }

    /// The state the run was in when it failed.
    pub fn failed_at(&self) -> Option<PipelineState> {
        self.failed_at
    }

    fn enter(&mut self, next: PipelineState) -> Result<(), PipelineError> {
        if self.state.is_terminal() || next <= self.state {
            return Err(PipelineError {
                stage: self.state,
                source: AppError::Internal(anyhow::anyhow!(
                    "illegal transition {} -> {}",
                    self.state,
                    next
                )),
            });
        }
        info!("Run {}: {}", self.run_id, next);
        self.state = next;
        self.history.push(next);
        Ok(())
    }

    fn fail(&mut self, source: AppError) -> PipelineError {
        let stage = self.state;
        error!("Run {} failed while {}: {}", self.run_id, stage, source);
        self.failed_at = Some(stage);
        self.state = PipelineState::Failed;
        self.history.push(PipelineState::Failed);
        PipelineError { stage, source }
    }

    /// Enters `next`, then drives `stage` to completion or fails the run with its error.
    async fn step<T, F>(&mut self, next: PipelineState, stage: F) -> Result<T, PipelineError>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        self.enter(next)?;
        stage.await.map_err(|e| self.fail(e))
    }

    /// Runs the pipeline once. A driver cannot be reused.
    pub async fn run(
        &mut self,
        inputs: &PipelineInputs,
        sink: &dyn ReportSink,
    ) -> Result<PipelineOutcome, PipelineError> {
        let span = info_span!("tailor_run", run_id = %self.run_id);
        self.run_stages(inputs, sink).instrument(span).await
    }

    async fn run_stages(
        &mut self,
        inputs: &PipelineInputs,
        sink: &dyn ReportSink,
    ) -> Result<PipelineOutcome, PipelineError> {
        if self.state != PipelineState::Pending {
            return Err(PipelineError {
                stage: self.state,
                source: AppError::Internal(anyhow::anyhow!("driver has already run")),
            });
        }

        let checked = ensure_non_empty("resume text", &inputs.resume_text)
            .and_then(|_| ensure_non_empty("job description", &inputs.job_text));
        if let Err(e) = checked {
            return Err(self.fail(e));
        }

        let ctx = self.ctx.clone();
        let run_id = self.run_id;
        let mut outputs = StageOutputs::default();

        let extracted = self
            .step(
                PipelineState::Extracting,
                run_extraction(&ctx, &inputs.resume_text, &inputs.job_text),
            )
            .await?;
        outputs.extracted = Some(extracted);

        let assessment = self
            .step(PipelineState::Assessing, async {
                let extracted = require(&outputs.extracted, "extracted profiles")?;
                run_assessment(&ctx, &extracted.job, &extracted.resume).await
            })
            .await?;
        outputs.assessment = Some(assessment);

        let application = self
            .step(PipelineState::Applying, async {
                let extracted = require(&outputs.extracted, "original resume")?;
                let assessment = require(&outputs.assessment, "tailoring plan")?;
                apply(&ctx, &assessment.plan, &extracted.resume).await
            })
            .await?;
        outputs.application = Some(application);

        let final_result = self
            .step(PipelineState::ReAssessing, async {
                let extracted = require(&outputs.extracted, "job profile")?;
                let application = require(&outputs.application, "tailored resume")?;
                reassess(&ctx, &extracted.job, &application.resume).await
            })
            .await?;
        outputs.final_result = Some(final_result);

        let mut outcome = self
            .step(PipelineState::Reporting, async move {
                let StageOutputs {
                    extracted,
                    assessment,
                    application,
                    final_result,
                } = outputs;
                let Extracted { resume, job } =
                    extracted.ok_or(AppError::Dependency("extracted profiles"))?;
                let Assessment { baseline, plan } =
                    assessment.ok_or(AppError::Dependency("baseline match result"))?;
                let Application {
                    resume: tailored_resume,
                    warnings,
                } = application.ok_or(AppError::Dependency("tailored resume"))?;
                let final_result =
                    final_result.ok_or(AppError::Dependency("final match result"))?;

                let report = OutputReport::new(baseline, final_result);
                let published = sink.publish(&report, &tailored_resume).await?;

                Ok(PipelineOutcome {
                    run_id,
                    job,
                    original_resume: resume,
                    plan,
                    tailored_resume,
                    report,
                    published,
                    warnings,
                    history: Vec::new(),
                })
            })
            .await?;

        self.enter(PipelineState::Done)?;
        outcome.history = self.history.clone();

        info!(
            "Run {} done: fit {} -> {} ({:+})",
            self.run_id,
            outcome.report.base_match_result.fit_score_overall,
            outcome.report.final_match_result.fit_score_overall,
            outcome.report.score_delta()
        );
        Ok(outcome)
    }
}
