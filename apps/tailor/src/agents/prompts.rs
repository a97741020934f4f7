// Role prompts for the LLM-backed agents.
// Each template has a single `{input}` placeholder for the serialized stage input.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::agents::AgentRole;
use crate::llm_client::prompts::{
    GROUNDING_INSTRUCTION, ID_PRESERVATION_INSTRUCTION, JSON_ONLY_SYSTEM,
};

pub const RESUME_EXTRACTION_SYSTEM: &str =
    "You are an expert resume parser. You turn raw resume text into a structured profile.";

pub const RESUME_EXTRACTION_TEMPLATE: &str = r#"Extract a structured resume profile from the resume text below.

Return a JSON object with this EXACT schema (no extra fields):
{
  "contact": "Full name, email, phone, links on one line",
  "summary": "Professional summary, or null if the resume has none",
  "skills": ["Python", "PostgreSQL"],
  "experiences": [
    {
      "id": "exp1",
      "company": "Acme Corp",
      "role": "Software Engineer",
      "start_date": "2021-03-01",
      "end_date": null,
      "bullets": [
        {"id": "exp1-b1", "content": "Built the billing pipeline processing 2M events/day"}
      ],
      "technologies": ["Python", "Kafka"]
    }
  ],
  "projects": [
    {"name": "ledger", "technologies": ["Rust"], "description": "Double-entry ledger library"}
  ],
  "education": {"school_name": "State University", "degree": "BSc Computer Science"}
}

Rules:
- Assign every experience a unique id ("exp1", "exp2", ...) in resume order.
- Assign every bullet an id unique across the WHOLE resume ("exp1-b1", "exp1-b2", "exp2-b1", ...).
- Copy bullet text verbatim. Do not improve, shorten or merge bullets.
- Dates are YYYY-MM-DD; use the first of the month when only month and year are given.
- end_date is null for a current position.

RESUME TEXT:
{input}"#;

pub const JOB_EXTRACTION_SYSTEM: &str =
    "You are an expert job description analyst. You turn a raw job posting into a structured job profile.";

pub const JOB_EXTRACTION_TEMPLATE: &str = r#"Extract a structured job profile from the job description below.

Return a JSON object with this EXACT schema (no extra fields):
{
  "title": "Senior Data Engineer",
  "company": "Acme Corp",
  "location": "Remote (US)",
  "responsibilities": [{"name": "Own the batch ingestion platform", "rank": 9}],
  "must_haves": [{"name": "Python", "rank": 10}],
  "nice_to_haves": [{"name": "Kafka", "rank": 5}],
  "keywords": ["ETL", "data modeling"],
  "seniority_signals": ["5+ years", "mentor junior engineers"],
  "domain_signals": ["fintech", "payments"]
}

Rules:
- rank is an integer from 1 to 10; 10 = most important.
- must_haves are explicit requirements ("required", "must have", minimum years).
- nice_to_haves are preferences ("preferred", "bonus", "a plus").
- Lists may be empty when the posting says nothing relevant. Never invent requirements.
- Use "unknown" for title, company or location when the posting does not state them.

JOB DESCRIPTION:
{input}"#;

pub const SCORING_SYSTEM: &str = "You are a strict, consistent recruiter. \
    You score how well a resume profile matches a job profile.";

pub const SCORING_TEMPLATE: &str = r#"Score how well the resume matches the job. The input is a JSON object with "job_profile" and "resume_profile".

Return a JSON object with this EXACT schema:
{
  "fit_score_overall": 68,
  "fit_score_by_category": [
    {"category_name": "Must-have skills", "score": 70},
    {"category_name": "Responsibilities", "score": 60},
    {"category_name": "Seniority", "score": 75},
    {"category_name": "Domain", "score": 50}
  ],
  "missing_keywords": ["Kafka"],
  "evidence": "exp1-b1 demonstrates Python at scale; no bullet shows streaming experience."
}

Rules:
- All scores are integers from 0 to 100.
- missing_keywords lists job skills and keywords that no part of the resume supports.
- evidence cites bullet ids for each requirement it considers covered.
- A job with no must-have skills is still scored; judge the remaining signals.

INPUT:
{input}"#;

pub const PLAN_GENERATION_SYSTEM: &str = "You are an expert resume strategist. \
    You plan bullet-level edits that make a resume fit a specific job without misrepresenting the candidate.";

pub const PLAN_GENERATION_TEMPLATE: &str = r#"Create a tailoring plan for the resume against the job. The input is a JSON object with "job_profile" and "resume_profile".

Return a JSON object with this EXACT schema:
{
  "target_role": "Senior Data Engineer",
  "company": "Acme Corp",
  "per_experience": [
    {
      "bullet_id": "exp1-b1",
      "action": "rewrite",
      "reason": "Lead with the Python pipeline work the job asks for",
      "focus_tags": ["Python", "ETL"],
      "priority": "high"
    }
  ],
  "tailoring_aggressiveness": "medium",
  "constraints": ["Do not claim Kafka experience"]
}

Rules:
- action is one of: "keep", "rewrite", "emphasize", "de-emphasize", "remove".
- priority is one of: "high", "medium", "low".
- tailoring_aggressiveness is one of: "light", "medium", "heavy".
- bullet_id MUST be one of the bullet ids in resume_profile. At most one instruction per bullet.
- Use "remove" only for bullets that are irrelevant AND crowd out relevant ones.

INPUT:
{input}"#;

pub const PLAN_APPLICATION_SYSTEM: &str = "You are an expert resume writer. \
    You apply a tailoring plan to a resume profile and return the updated profile.";

pub const PLAN_APPLICATION_TEMPLATE: &str = r#"Apply the tailoring plan to the resume. The input is a JSON object with "tailoring_plan" and "resume".

Return the FULL updated resume profile as a JSON object with the same schema as "resume" in the input.

Rules:
- "rewrite": rewrite the bullet text toward its focus_tags and reason.
- "emphasize": make the bullet stronger and more specific toward its focus_tags.
- "de-emphasize": make the bullet shorter and plainer.
- "keep" and bullets without an instruction: copy the text unchanged.
- "remove": you may omit the bullet; it will be dropped regardless.
- Follow tailoring_aggressiveness: "light" = minimal wording changes, "medium" = reword freely,
  "heavy" = restructure bullets and the summary fully.
- Honour every entry in the plan's constraints.
- You may update "summary" and "skills" to reflect the plan; never add skills the resume does not support.

INPUT:
{input}"#;

/// Returns (system prompt, prompt template) for a role.
pub fn for_role(role: AgentRole) -> (&'static str, &'static str) {
    match role {
        AgentRole::ResumeExtraction => (RESUME_EXTRACTION_SYSTEM, RESUME_EXTRACTION_TEMPLATE),
        AgentRole::JobExtraction => (JOB_EXTRACTION_SYSTEM, JOB_EXTRACTION_TEMPLATE),
        AgentRole::Scoring => (SCORING_SYSTEM, SCORING_TEMPLATE),
        AgentRole::PlanGeneration => (PLAN_GENERATION_SYSTEM, PLAN_GENERATION_TEMPLATE),
        AgentRole::PlanApplication => (PLAN_APPLICATION_SYSTEM, PLAN_APPLICATION_TEMPLATE),
    }
}

/// Full system prompt for a role: role persona, JSON-only rule, and the fragments the role needs.
pub fn system_prompt(role: AgentRole) -> String {
    let (persona, _) = for_role(role);
    let mut system = format!("{persona} {JSON_ONLY_SYSTEM}");
    if matches!(
        role,
        AgentRole::ResumeExtraction | AgentRole::PlanGeneration | AgentRole::PlanApplication
    ) {
        system.push(' ');
        system.push_str(ID_PRESERVATION_INSTRUCTION);
    }
    if matches!(role, AgentRole::Scoring | AgentRole::PlanApplication) {
        system.push(' ');
        system.push_str(GROUNDING_INSTRUCTION);
    }
    system
}

/// Fills a role's template with the serialized input.
pub fn build_prompt(role: AgentRole, input: &str) -> String {
    let (_, template) = for_role(role);
    template.replace("{input}", input)
}
