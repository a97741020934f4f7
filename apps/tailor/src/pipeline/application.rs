//! Application stage: fold a tailoring plan over the original resume.
//!
//! The plan-application agent is only a source of rewritten text. Which bullets survive,
//! their order, and every structural field are decided here, so the result keeps the
//! original's ids no matter what the agent answers.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::agents::{invoke_typed, to_payload, AgentRole, ExecutionInput};
use crate::errors::AppError;
use crate::models::plan::{Aggressiveness, BulletAction, BulletInstruction};
use crate::models::resume::{Bullet, JobExperience};
use crate::models::{ResumeProfile, TailoringPlan, Validate};
use crate::pipeline::StageContext;

/// Non-fatal problems found while applying a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanApplicationWarning {
    /// The plan names a bullet the resume does not have.
    UnknownBullet { bullet_id: String },
    /// A later instruction for an already targeted bullet; it was ignored.
    DuplicateInstruction { bullet_id: String },
    /// The agent returned no text for a bullet it was asked to rewrite.
    MissingRewrite { bullet_id: String },
}

impl fmt::Display for PlanApplicationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownBullet { bullet_id } => {
                write!(f, "instruction for unknown bullet '{bullet_id}' ignored")
            }
            Self::DuplicateInstruction { bullet_id } => {
                write!(f, "duplicate instruction for bullet '{bullet_id}' ignored")
            }
            Self::MissingRewrite { bullet_id } => {
                write!(f, "no rewrite returned for bullet '{bullet_id}', original kept")
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Application {
    pub resume: ResumeProfile,
    pub warnings: Vec<PlanApplicationWarning>,
}

/// Instructions keyed by the bullet they target, one per bullet.
type Targeted<'p> = HashMap<&'p str, &'p BulletInstruction>;

/// Matches plan instructions against the resume's bullets, in plan order.
pub(crate) fn resolve<'p>(
    plan: &'p TailoringPlan,
    original: &ResumeProfile,
) -> (Targeted<'p>, Vec<PlanApplicationWarning>) {
    let index: HashMap<&str, (usize, usize)> = original
        .experiences
        .iter()
        .enumerate()
        .flat_map(|(e, exp)| {
            exp.bullets
                .iter()
                .enumerate()
                .map(move |(b, bullet)| (bullet.id.as_str(), (e, b)))
        })
        .collect();

    let mut targeted = Targeted::new();
    let mut warnings = Vec::new();

    for instruction in &plan.instructions {
        let id = instruction.bullet_id.as_str();
        let Some((e, b)) = index.get(id) else {
            warnings.push(PlanApplicationWarning::UnknownBullet {
                bullet_id: id.to_string(),
            });
            continue;
        };
        if targeted.contains_key(id) {
            warnings.push(PlanApplicationWarning::DuplicateInstruction {
                bullet_id: id.to_string(),
            });
            continue;
        }
        debug!(
            "{:?} bullet '{}' (experience {}, position {})",
            instruction.action, id, e, b
        );
        targeted.insert(id, instruction);
    }

    (targeted, warnings)
}

/// Builds the tailored resume from the original plus the resolved instructions.
///
/// `candidate` is the agent's rewritten resume, consulted only for bullet text (by id),
/// the summary, and the skill list.
pub(crate) fn fold_plan(
    aggressiveness: Aggressiveness,
    original: &ResumeProfile,
    targeted: &Targeted<'_>,
    candidate: Option<&ResumeProfile>,
) -> (ResumeProfile, Vec<PlanApplicationWarning>) {
    let rewrites: HashMap<&str, &str> = candidate
        .map(|c| {
            c.experiences
                .iter()
                .flat_map(|e| e.bullets.iter())
                .filter(|b| !b.content.trim().is_empty())
                .map(|b| (b.id.as_str(), b.content.as_str()))
                .collect()
        })
        .unwrap_or_default();

    let mut warnings = Vec::new();
    let mut rewrite = |bullet: &Bullet, wanted: bool| -> Bullet {
        if !wanted {
            return bullet.clone();
        }
        match rewrites.get(bullet.id.as_str()) {
            Some(text) => Bullet {
                id: bullet.id.clone(),
                content: text.trim().to_string(),
            },
            None => {
                warnings.push(PlanApplicationWarning::MissingRewrite {
                    bullet_id: bullet.id.clone(),
                });
                bullet.clone()
            }
        }
    };

    let experiences = original
        .experiences
        .iter()
        .map(|exp| {
            let mut front = Vec::new();
            let mut middle = Vec::new();
            let mut back = Vec::new();

            for bullet in &exp.bullets {
                let Some(action) = targeted.get(bullet.id.as_str()).map(|i| i.action) else {
                    middle.push(bullet.clone());
                    continue;
                };
                let tailored = rewrite(bullet, action.takes_rewrite(aggressiveness));
                match action {
                    BulletAction::Remove => {}
                    BulletAction::Keep | BulletAction::Rewrite => middle.push(tailored),
                    BulletAction::Emphasize => front.push(tailored),
                    BulletAction::DeEmphasize => back.push(tailored),
                }
            }

            front.append(&mut middle);
            front.append(&mut back);
            JobExperience {
                bullets: front,
                ..exp.clone()
            }
        })
        .collect();

    let summary = match (aggressiveness, candidate.and_then(|c| c.summary.as_deref())) {
        (Aggressiveness::Light, _) => original.summary.clone(),
        (_, Some(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => original.summary.clone(),
    };

    let skills = match candidate {
        Some(c) if aggressiveness == Aggressiveness::Heavy && !c.skills.is_empty() => {
            c.skills.clone()
        }
        _ => original.skills.clone(),
    };

    let tailored = ResumeProfile {
        contact: original.contact.clone(),
        summary,
        skills,
        experiences,
        projects: original.projects.clone(),
        education: original.education.clone(),
    };

    (tailored, warnings)
}

/// Applies `plan` to the original `resume`.
///
/// The plan-application agent is called once, and only when some instruction takes
/// rewritten bullet text at the plan's aggressiveness.
pub async fn apply(
    ctx: &StageContext,
    plan: &TailoringPlan,
    resume: &ResumeProfile,
) -> Result<Application, AppError> {
    let (targeted, mut warnings) = resolve(plan, resume);

    let candidate = if targeted
        .values()
        .any(|i| i.action.takes_rewrite(plan.aggressiveness))
    {
        let payload = to_payload(&ExecutionInput {
            tailoring_plan: plan,
            resume,
        })?;
        let rewritten: ResumeProfile = invoke_typed(
            ctx.agent.as_ref(),
            AgentRole::PlanApplication,
            &payload,
            ctx.timeout,
        )
        .await?;
        Some(rewritten)
    } else {
        debug!("Plan has no rewrites; skipping plan-application agent");
        None
    };

    let (tailored, fold_warnings) =
        fold_plan(plan.aggressiveness, resume, &targeted, candidate.as_ref());
    warnings.extend(fold_warnings);

    tailored.validate().map_err(|e| {
        AppError::Internal(anyhow::anyhow!("Tailored resume failed validation: {e}"))
    })?;

    for warning in &warnings {
        warn!("Plan application: {}", warning);
    }
    info!(
        "Applied {} instructions: {} -> {} bullets, {} warnings",
        targeted.len(),
        resume.bullet_count(),
        tailored.bullet_count(),
        warnings.len()
    );

    Ok(Application {
        resume: tailored,
        warnings,
    })
}
