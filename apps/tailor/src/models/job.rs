//! Job Profile: the structured form of a job description.

use serde::{Deserialize, Serialize};

use crate::models::{check_range, SchemaError, Validate};

/// A responsibility named in the job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Responsibility {
    pub name: String,
    /// Importance 1–10, 10 = most important.
    pub rank: u8,
}

/// A skill requirement, either must-have or nice-to-have.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    /// Importance 1–10, 10 = most important.
    pub rank: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobProfile {
    pub title: String,
    pub company: String,
    pub location: String,
    pub responsibilities: Vec<Responsibility>,
    pub must_haves: Vec<Skill>,
    pub nice_to_haves: Vec<Skill>,
    pub keywords: Vec<String>,
    pub seniority_signals: Vec<String>,
    pub domain_signals: Vec<String>,
}

impl JobProfile {
    /// Every term a resume could be checked against: skills (both tiers) then keywords,
    /// de-duplicated case-insensitively, first spelling kept.
    pub fn requirement_terms(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.must_haves
            .iter()
            .chain(self.nice_to_haves.iter())
            .map(|s| s.name.clone())
            .chain(self.keywords.iter().cloned())
            .filter(|term| !term.trim().is_empty())
            .filter(|term| seen.insert(term.to_lowercase()))
            .collect()
    }
}

impl Validate for JobProfile {
    fn validate(&self) -> Result<(), SchemaError> {
        for r in &self.responsibilities {
            check_range(
                &format!("responsibility '{}' rank", r.name),
                r.rank as i64,
                1,
                10,
            )?;
        }
        for s in self.must_haves.iter().chain(self.nice_to_haves.iter()) {
            check_range(&format!("skill '{}' rank", s.name), s.rank as i64, 1, 10)?;
        }
        Ok(())
    }
}
