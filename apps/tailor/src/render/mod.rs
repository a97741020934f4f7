// Output rendering: the Markdown fit report, the tailored resume document, and the sink
// that publishes both.

pub mod font_metrics;
pub mod report;
pub mod resume_markdown;
pub mod resume_pdf;
pub mod sink;

use std::path::Path;

use chrono::NaiveDate;

use crate::errors::AppError;
use crate::models::resume::JobExperience;
use crate::models::ResumeProfile;

pub use resume_markdown::MarkdownResumeWriter;
pub use resume_pdf::PdfResumeWriter;

/// Turns a resume into document bytes. Pure: writing the bytes is the sink's job.
pub trait ResumeWriter: Send + Sync {
    fn render(&self, resume: &ResumeProfile) -> Result<Vec<u8>, AppError>;
}

/// `.md` / `.markdown` targets get Markdown; everything else gets PDF.
pub fn writer_for_path(path: &Path) -> Box<dyn ResumeWriter> {
    let is_markdown = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("md") || e.eq_ignore_ascii_case("markdown"))
        .unwrap_or(false);

    if is_markdown {
        Box::new(MarkdownResumeWriter)
    } else {
        Box::new(PdfResumeWriter::default())
    }
}

fn month_year(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

/// "Jan 2020 - Present" style date range.
pub(crate) fn date_range(exp: &JobExperience) -> String {
    let end = exp
        .end_date
        .map(month_year)
        .unwrap_or_else(|| "Present".to_string());
    format!("{} - {}", month_year(exp.start_date), end)
}
