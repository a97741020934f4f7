// Shared prompt fragments.
// Each agent role defines its own prompts in agents/prompts.rs; this file holds the
// cross-cutting pieces appended to every role.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every prompt that rewrites or judges resume content.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Every claim must be traceable to the resume content provided. \
    Do NOT invent employers, dates, metrics, technologies, or outcomes. \
    If the resume does not support a claim, leave it out.";

/// Appended to every prompt that receives or returns resume bullets.
pub const ID_PRESERVATION_INSTRUCTION: &str = "\
    CRITICAL: Bullet ids and experience ids are stable identifiers. \
    Copy them exactly as given. Never renumber, merge, or invent ids.";
