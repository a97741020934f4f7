//! Deterministic agent doubles for tests.
//!
//! `ScriptedAgent` answers each role from a script and records what happened, so tests can
//! assert on ordering, overlap, and cancellation. `keyword_agent()` builds a script whose
//! scoring role is a pure keyword matcher: same input, same answer.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::agents::{AgentError, AgentInvoker, AgentRole};
use crate::models::job::JobProfile;
use crate::models::plan::{Aggressiveness, BulletAction, BulletInstruction, Priority, TailoringPlan};
use crate::models::report::{CategoryScore, MatchResult};
use crate::models::resume::ResumeProfile;

type Handler = Arc<dyn Fn(&str) -> Result<String, AgentError> + Send + Sync>;

#[derive(Default)]
pub struct ScriptedAgent {
    handlers: HashMap<AgentRole, Handler>,
    delays: HashMap<AgentRole, Duration>,
    started: Mutex<Vec<AgentRole>>,
    completed: Mutex<Vec<AgentRole>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedAgent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `role` with `value` serialized as JSON.
    pub fn respond<T: Serialize>(self, role: AgentRole, value: &T) -> Self {
        let body = serde_json::to_string(value).expect("fixture serializes");
        self.respond_raw(role, body)
    }

    /// Answers `role` with exactly `body`.
    pub fn respond_raw(self, role: AgentRole, body: impl Into<String>) -> Self {
        let body = body.into();
        self.respond_with(role, move |_| Ok(body.clone()))
    }

    pub fn respond_with<F>(mut self, role: AgentRole, handler: F) -> Self
    where
        F: Fn(&str) -> Result<String, AgentError> + Send + Sync + 'static,
    {
        self.handlers.insert(role, Arc::new(handler));
        self
    }

    pub fn fail(self, role: AgentRole, message: &str) -> Self {
        let message = message.to_string();
        self.respond_with(role, move |_| Err(AgentError::Failed(message.clone())))
    }

    pub fn delay(mut self, role: AgentRole, delay: Duration) -> Self {
        self.delays.insert(role, delay);
        self
    }

    /// Roles in the order their calls began.
    pub fn started(&self) -> Vec<AgentRole> {
        self.started.lock().unwrap().clone()
    }

    /// Roles in the order their calls finished. A cancelled call never appears.
    pub fn completed(&self) -> Vec<AgentRole> {
        self.completed.lock().unwrap().clone()
    }

    pub fn calls_for(&self, role: AgentRole) -> usize {
        self.started().iter().filter(|r| **r == role).count()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

/// Decrements the in-flight counter even when the call future is dropped mid-await.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl AgentInvoker for ScriptedAgent {
    async fn invoke(&self, role: AgentRole, input: &str) -> Result<String, AgentError> {
        self.started.lock().unwrap().push(role);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        if let Some(delay) = self.delays.get(&role) {
            tokio::time::sleep(*delay).await;
        }

        let handler = self
            .handlers
            .get(&role)
            .cloned()
            .ok_or_else(|| AgentError::Failed(format!("no script for {role}")))?;
        let answer = handler(input);
        self.completed.lock().unwrap().push(role);
        answer
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Keyword-matching agent
// ────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct OwnedJobAndResume {
    job_profile: JobProfile,
    resume_profile: ResumeProfile,
}

#[derive(Deserialize)]
struct OwnedExecutionInput {
    tailoring_plan: TailoringPlan,
    resume: ResumeProfile,
}

/// Every piece of free text on the resume, lowercased and joined.
fn searchable_text(resume: &ResumeProfile) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if let Some(summary) = &resume.summary {
        parts.push(summary);
    }
    parts.extend(resume.skills.iter().map(String::as_str));
    for exp in &resume.experiences {
        parts.push(&exp.role);
        parts.extend(exp.technologies.iter().map(String::as_str));
        parts.extend(exp.bullets.iter().map(|b| b.content.as_str()));
    }
    for project in &resume.projects {
        parts.push(&project.description);
        parts.extend(project.technologies.iter().map(String::as_str));
    }
    parts.join("\n").to_lowercase()
}

/// Scores a resume by keyword coverage, weighted by skill rank.
///
/// - term in the resume skill list → strength 1.0
/// - term anywhere in resume text → strength 0.6
/// - otherwise → 0.0 and reported missing
///
/// overall = Σ(strength × weight) / Σ(weight) × 100; zero requirements score 0.
pub fn keyword_score(job: &JobProfile, resume: &ResumeProfile) -> MatchResult {
    let text = searchable_text(resume);
    let skills: Vec<String> = resume.skills.iter().map(|s| s.to_lowercase()).collect();
    let weight_of = |term: &str| -> f32 {
        job.must_haves
            .iter()
            .chain(job.nice_to_haves.iter())
            .find(|s| s.name.eq_ignore_ascii_case(term))
            .map(|s| s.rank as f32)
            .unwrap_or(1.0)
    };

    let mut total_weight = 0.0_f32;
    let mut total_score = 0.0_f32;
    let mut missing = Vec::new();
    let mut matched = Vec::new();

    for term in job.requirement_terms() {
        let lower = term.to_lowercase();
        let weight = weight_of(&term);
        total_weight += weight;

        let strength = if skills.contains(&lower) {
            1.0
        } else if text.contains(&lower) {
            0.6
        } else {
            0.0
        };
        total_score += strength * weight;

        if strength > 0.0 {
            matched.push(term);
        } else {
            missing.push(term);
        }
    }

    let overall = if total_weight > 0.0 {
        ((total_score / total_weight) * 100.0).round() as u32
    } else {
        0
    };

    MatchResult {
        fit_score_overall: overall.min(100),
        fit_score_by_category: vec![CategoryScore {
            name: "Keywords".to_string(),
            score: overall.min(100),
        }],
        missing_keywords: missing,
        evidence: format!("Matched: {}", matched.join(", ")),
    }
}

/// A plan that rewrites the first bullet of every experience to mention the missing terms.
pub fn keyword_plan(job: &JobProfile, resume: &ResumeProfile) -> TailoringPlan {
    let missing = keyword_score(job, resume).missing_keywords;
    let instructions = resume
        .experiences
        .iter()
        .filter_map(|e| e.bullets.first())
        .map(|b| BulletInstruction {
            bullet_id: b.id.clone(),
            action: BulletAction::Rewrite,
            reason: "surface missing keywords".to_string(),
            focus_tags: missing.clone(),
            priority: Priority::High,
        })
        .collect();
    TailoringPlan {
        target_role: job.title.clone(),
        company: job.company.clone(),
        instructions,
        aggressiveness: Aggressiveness::Medium,
        constraints: vec!["no invented employers".to_string()],
    }
}

/// Appends each rewrite instruction's focus tags to the targeted bullet.
pub fn keyword_apply(plan: &TailoringPlan, resume: &ResumeProfile) -> ResumeProfile {
    let mut out = resume.clone();
    for exp in &mut out.experiences {
        for bullet in &mut exp.bullets {
            if let Some(instr) = plan
                .instructions
                .iter()
                .find(|i| i.bullet_id == bullet.id && i.action == BulletAction::Rewrite)
            {
                if !instr.focus_tags.is_empty() {
                    bullet.content = format!("{} using {}", bullet.content, instr.focus_tags.join(", "));
                }
            }
        }
    }
    out
}

/// A full agent: fixed extraction answers plus keyword scoring, planning and application.
pub fn keyword_agent(resume: &ResumeProfile, job: &JobProfile) -> ScriptedAgent {
    ScriptedAgent::new()
        .respond(AgentRole::ResumeExtraction, resume)
        .respond(AgentRole::JobExtraction, job)
        .respond_with(AgentRole::Scoring, |input| {
            let pair: OwnedJobAndResume = serde_json::from_str(input)
                .map_err(|e| AgentError::Failed(e.to_string()))?;
            let result = keyword_score(&pair.job_profile, &pair.resume_profile);
            Ok(serde_json::to_string(&result).expect("serializes"))
        })
        .respond_with(AgentRole::PlanGeneration, |input| {
            let pair: OwnedJobAndResume = serde_json::from_str(input)
                .map_err(|e| AgentError::Failed(e.to_string()))?;
            let plan = keyword_plan(&pair.job_profile, &pair.resume_profile);
            Ok(serde_json::to_string(&plan).expect("serializes"))
        })
        .respond_with(AgentRole::PlanApplication, |input| {
            let exec: OwnedExecutionInput = serde_json::from_str(input)
                .map_err(|e| AgentError::Failed(e.to_string()))?;
            let tailored = keyword_apply(&exec.tailoring_plan, &exec.resume);
            Ok(serde_json::to_string(&tailored).expect("serializes"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::fixtures::python_job;
    use crate::models::resume::fixtures::sample_resume;

    #[test]
    fn test_searchable_text_is_lowercase_and_covers_bullets() {
        let text = searchable_text(&sample_resume());
        assert!(text.contains("billing services in java"));
        assert!(text.contains("rust"));
    }

    #[test]
    fn test_keyword_score_reports_missing_terms() {
        let result = keyword_score(&python_job(), &sample_resume());
        assert_eq!(result.missing_keywords, vec!["Python"]);
        assert!(result.fit_score_overall <= 100);
    }

    #[test]
    fn test_keyword_score_empty_requirements_is_zero() {
        let mut job = python_job();
        job.must_haves.clear();
        job.keywords.clear();
        let result = keyword_score(&job, &sample_resume());
        assert_eq!(result.fit_score_overall, 0);
        assert!(result.missing_keywords.is_empty());
    }

    #[test]
    fn test_keyword_apply_closes_missing_terms() {
        let job = python_job();
        let resume = sample_resume();
        let plan = keyword_plan(&job, &resume);
        let tailored = keyword_apply(&plan, &resume);
        assert!(keyword_score(&job, &tailored).missing_keywords.is_empty());
        assert_eq!(tailored.bullet_ids(), resume.bullet_ids());
    }
}
