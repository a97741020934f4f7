//! File-backed report sink. Both artifacts are rendered in memory, staged as temp files
//! next to their targets, then moved into place; a failure on the second move removes
//! the first, so a run leaves both files or neither.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Local;
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{OutputReport, ResumeProfile};
use crate::pipeline::driver::ReportSink;
use crate::render::report::render_report;
use crate::render::writer_for_path;

/// Where a published run's artifacts ended up.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedArtifacts {
    pub report_markdown: String,
    pub report_path: PathBuf,
    pub resume_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct FileArtifactSink {
    pub report_path: PathBuf,
    pub resume_path: PathBuf,
}

impl FileArtifactSink {
    pub fn new(report_path: impl Into<PathBuf>, resume_path: impl Into<PathBuf>) -> Self {
        Self {
            report_path: report_path.into(),
            resume_path: resume_path.into(),
        }
    }

    /// Artifacts under `dir` with the default file names.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join("job_fit_report.md"), dir.join("tailored_resume.pdf"))
    }
}

fn output_error(path: &Path, e: impl std::fmt::Display) -> AppError {
    AppError::Output(format!("{}: {e}", path.display()))
}

fn stage(target: &Path, bytes: &[u8]) -> Result<NamedTempFile, AppError> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| output_error(dir, e))?;
    let mut file = NamedTempFile::new_in(dir).map_err(|e| output_error(target, e))?;
    file.write_all(bytes).map_err(|e| output_error(target, e))?;
    file.as_file().sync_all().map_err(|e| output_error(target, e))?;
    Ok(file)
}

/// Writes both files or neither.
fn write_pair(first: (&Path, &[u8]), second: (&Path, &[u8])) -> Result<(), AppError> {
    let staged_first = stage(first.0, first.1)?;
    let staged_second = stage(second.0, second.1)?;

    staged_first
        .persist(first.0)
        .map_err(|e| output_error(first.0, e.error))?;

    if let Err(e) = staged_second.persist(second.0) {
        if let Err(cleanup) = std::fs::remove_file(first.0) {
            warn!("Could not roll back {}: {}", first.0.display(), cleanup);
        }
        return Err(output_error(second.0, e.error));
    }
    Ok(())
}

#[async_trait]
impl ReportSink for FileArtifactSink {
    async fn publish(
        &self,
        report: &OutputReport,
        tailored: &ResumeProfile,
    ) -> Result<PublishedArtifacts, AppError> {
        let report_markdown = render_report(report, Local::now());

        let writer = writer_for_path(&self.resume_path);
        let resume = tailored.clone();
        let resume_bytes = tokio::task::spawn_blocking(move || writer.render(&resume))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Resume rendering task failed: {e}")))??;

        let report_path = self.report_path.clone();
        let resume_path = self.resume_path.clone();
        let markdown = report_markdown.clone();
        tokio::task::spawn_blocking(move || {
            write_pair(
                (&report_path, markdown.as_bytes()),
                (&resume_path, &resume_bytes),
            )
        })
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Artifact write task failed: {e}")))??;

        info!(
            "Wrote {} and {}",
            self.report_path.display(),
            self.resume_path.display()
        );

        Ok(PublishedArtifacts {
            report_markdown,
            report_path: self.report_path.clone(),
            resume_path: self.resume_path.clone(),
        })
    }
}
