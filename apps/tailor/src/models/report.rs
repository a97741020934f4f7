//! Match Result and Output Report.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::{check_range, SchemaError, Validate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    #[serde(rename = "category_name", alias = "name")]
    pub name: String,
    /// 0 – 100
    pub score: u32,
}

/// The scoring agent's verdict on one (job, resume) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// 0 – 100
    pub fit_score_overall: u32,
    pub fit_score_by_category: Vec<CategoryScore>,
    pub missing_keywords: Vec<String>,
    /// Which bullets support which requirements.
    pub evidence: String,
}

impl Validate for MatchResult {
    fn validate(&self) -> Result<(), SchemaError> {
        check_range("fit_score_overall", self.fit_score_overall as i64, 0, 100)?;
        for category in &self.fit_score_by_category {
            check_range(
                &format!("category '{}' score", category.name),
                category.score as i64,
                0,
                100,
            )?;
        }
        Ok(())
    }
}

/// Baseline and final match results for one run. Built once, during reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputReport {
    pub base_match_result: MatchResult,
    pub final_match_result: MatchResult,
}

impl OutputReport {
    pub fn new(base_match_result: MatchResult, final_match_result: MatchResult) -> Self {
        Self {
            base_match_result,
            final_match_result,
        }
    }

    /// Signed change in overall fit from baseline to final.
    pub fn score_delta(&self) -> i64 {
        self.final_match_result.fit_score_overall as i64
            - self.base_match_result.fit_score_overall as i64
    }

    /// Baseline missing keywords that are no longer missing after tailoring.
    pub fn closed_keywords(&self) -> Vec<&str> {
        let still_missing: HashSet<String> = self
            .final_match_result
            .missing_keywords
            .iter()
            .map(|k| k.to_lowercase())
            .collect();
        self.base_match_result
            .missing_keywords
            .iter()
            .filter(|k| !still_missing.contains(&k.to_lowercase()))
            .map(String::as_str)
            .collect()
    }
}
