use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tailor", version)]
#[command(about = "Tailor a resume to a job description and report the change in fit")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the pipeline once over local files
    Run(RunArgs),
    /// Serve the pipeline over HTTP
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Resume to tailor (.pdf, or any text file)
    #[arg(long, default_value = "assets/input/resume_file.pdf")]
    pub resume: PathBuf,

    /// Job description (.txt, or .pdf)
    #[arg(long, default_value = "assets/input/job_file.txt")]
    pub job: PathBuf,

    /// Report path [default: <OUTPUT_DIR>/job_fit_report.md]
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Tailored resume path; `.md` writes Markdown, anything else PDF
    /// [default: <OUTPUT_DIR>/tailored_resume.pdf]
    #[arg(long)]
    pub tailored: Option<PathBuf>,

    /// Per-call agent timeout, overriding AGENT_TIMEOUT_SECS
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl RunArgs {
    pub fn report_path(&self, output_dir: &Path) -> PathBuf {
        self.report
            .clone()
            .unwrap_or_else(|| output_dir.join("job_fit_report.md"))
    }

    pub fn tailored_path(&self, output_dir: &Path) -> PathBuf {
        self.tailored
            .clone()
            .unwrap_or_else(|| output_dir.join("tailored_resume.pdf"))
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Listen port, overriding PORT
    #[arg(long)]
    pub port: Option<u16>,
}
