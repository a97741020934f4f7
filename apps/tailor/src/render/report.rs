//! Markdown job-fit report.

use chrono::{DateTime, TimeZone};

use crate::models::{MatchResult, OutputReport};

fn render_match_result(title: &str, result: &MatchResult) -> String {
    let mut lines = vec![
        format!("## {title}"),
        String::new(),
        format!("- Overall fit score: **{}/100**", result.fit_score_overall),
        String::new(),
    ];

    if !result.fit_score_by_category.is_empty() {
        lines.push("### Fit score by category".to_string());
        lines.push(String::new());
        lines.push("| Category | Score |".to_string());
        lines.push("|---|---|".to_string());
        for category in &result.fit_score_by_category {
            lines.push(format!("| {} | {} |", category.name, category.score));
        }
        lines.push(String::new());
    }

    if !result.missing_keywords.is_empty() {
        lines.push("### Missing keywords".to_string());
        lines.push(String::new());
        lines.push(result.missing_keywords.join(", "));
        lines.push(String::new());
    }

    let evidence = result.evidence.trim();
    if !evidence.is_empty() {
        lines.push("### Evidence".to_string());
        lines.push(String::new());
        lines.push(evidence.to_string());
        lines.push(String::new());
    }

    lines.join("\n")
}

fn render_summary(report: &OutputReport) -> String {
    let closed = report.closed_keywords();
    let mut lines = vec![
        "## Summary".to_string(),
        String::new(),
        format!(
            "- Fit score: {} -> {} ({:+})",
            report.base_match_result.fit_score_overall,
            report.final_match_result.fit_score_overall,
            report.score_delta()
        ),
    ];
    if !closed.is_empty() {
        lines.push(format!("- Keywords now covered: {}", closed.join(", ")));
    }
    lines.push(String::new());
    lines.join("\n")
}

/// Renders the report. Pure formatting; the caller supplies the timestamp.
pub fn render_report<Tz>(report: &OutputReport, generated_at: DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let parts = [
        "# Job Fit Report".to_string(),
        String::new(),
        format!("_Generated at: {}_", generated_at.format("%Y-%m-%d %H:%M:%S")),
        String::new(),
        render_summary(report),
        render_match_result("Base Match Results", &report.base_match_result),
        render_match_result("Final Match Results", &report.final_match_result),
    ];

    format!("{}\n", parts.join("\n").trim_end())
}
