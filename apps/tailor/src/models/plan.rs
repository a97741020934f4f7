//! Tailoring Plan: per-bullet instructions for adapting a resume to a job.

use serde::{Deserialize, Serialize};

use crate::models::{SchemaError, Validate};

/// What to do with a single resume bullet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BulletAction {
    Keep,
    Rewrite,
    Emphasize,
    #[serde(alias = "deemphasize", alias = "de_emphasize")]
    DeEmphasize,
    Remove,
}

impl BulletAction {
    /// Whether the bullet takes rewritten text from the application agent at this
    /// aggressiveness. Emphasized bullets are rewritten above `light`, de-emphasized
    /// ones only at `heavy`.
    pub fn takes_rewrite(self, aggressiveness: Aggressiveness) -> bool {
        match self {
            BulletAction::Rewrite => true,
            BulletAction::Emphasize => aggressiveness > Aggressiveness::Light,
            BulletAction::DeEmphasize => aggressiveness == Aggressiveness::Heavy,
            BulletAction::Keep | BulletAction::Remove => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// How far the rewrite is allowed to move away from the original wording.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggressiveness {
    Light,
    #[default]
    Medium,
    Heavy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletInstruction {
    pub bullet_id: String,
    pub action: BulletAction,
    pub reason: String,
    pub focus_tags: Vec<String>,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailoringPlan {
    pub target_role: String,
    pub company: String,
    #[serde(rename = "per_experience", alias = "instructions")]
    pub instructions: Vec<BulletInstruction>,
    #[serde(rename = "tailoring_aggressiveness", alias = "aggressiveness")]
    pub aggressiveness: Aggressiveness,
    #[serde(rename = "constraints", alias = "constrains", default)]
    pub constraints: Vec<String>,
}

impl TailoringPlan {
    pub fn count_action(&self, action: BulletAction) -> usize {
        self.instructions
            .iter()
            .filter(|i| i.action == action)
            .count()
    }
}

impl Validate for TailoringPlan {
    // Unknown or repeated bullet ids are tolerated here and surface as warnings when
    // the plan is applied; nothing in a structurally parsed plan is fatal.
    fn validate(&self) -> Result<(), SchemaError> {
        Ok(())
    }
}
