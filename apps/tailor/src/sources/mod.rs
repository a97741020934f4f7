// Source documents: plain-text job descriptions and PDF (or text) resumes.

pub mod pdf;
pub mod text;

use std::path::Path;

use tracing::info;

use crate::errors::InputError;
use crate::pipeline::driver::PipelineInputs;

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Reads `path` as PDF or text depending on its extension. Empty text is an error.
pub async fn read_source(path: &Path) -> Result<String, InputError> {
    let text = if is_pdf(path) {
        pdf::extract_text(path).await?
    } else {
        text::read_text(path).await?
    };
    if text.trim().is_empty() {
        return Err(InputError::Empty(path.display().to_string()));
    }
    Ok(text)
}

/// Loads both run inputs concurrently.
pub async fn load_inputs(resume_path: &Path, job_path: &Path) -> Result<PipelineInputs, InputError> {
    let (resume_text, job_text) = tokio::try_join!(read_source(resume_path), read_source(job_path))?;
    info!(
        "Loaded resume {} ({} chars) and job {} ({} chars)",
        resume_path.display(),
        resume_text.len(),
        job_path.display(),
        job_text.len()
    );
    Ok(PipelineInputs {
        resume_text,
        job_text,
    })
}
