use crate::errors::AppError;
use crate::models::ResumeProfile;
use crate::render::{date_range, ResumeWriter};

/// Plain Markdown resume, for `.md` output paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownResumeWriter;

impl MarkdownResumeWriter {
    pub fn to_markdown(&self, resume: &ResumeProfile) -> String {
        let mut out = Vec::new();
        out.push(format!("# {}", resume.contact.trim()));
        out.push(String::new());

        if let Some(summary) = resume.summary.as_deref().filter(|s| !s.trim().is_empty()) {
            out.push("## Summary".to_string());
            out.push(String::new());
            out.push(summary.trim().to_string());
            out.push(String::new());
        }

        if !resume.skills.is_empty() {
            out.push("## Skills".to_string());
            out.push(String::new());
            out.push(resume.skills.join(", "));
            out.push(String::new());
        }

        if !resume.experiences.is_empty() {
            out.push("## Experience".to_string());
            out.push(String::new());
            for exp in &resume.experiences {
                out.push(format!("### {}, {}", exp.role, exp.company));
                out.push(format!("_{}_", date_range(exp)));
                out.push(String::new());
                for bullet in &exp.bullets {
                    out.push(format!("- {}", bullet.content.trim()));
                }
                if !exp.technologies.is_empty() {
                    out.push(String::new());
                    out.push(format!("Technologies: {}", exp.technologies.join(", ")));
                }
                out.push(String::new());
            }
        }

        if !resume.projects.is_empty() {
            out.push("## Projects".to_string());
            out.push(String::new());
            for project in &resume.projects {
                if project.technologies.is_empty() {
                    out.push(format!("- **{}**: {}", project.name, project.description));
                } else {
                    out.push(format!(
                        "- **{}** ({}): {}",
                        project.name,
                        project.technologies.join(", "),
                        project.description
                    ));
                }
            }
            out.push(String::new());
        }

        out.push("## Education".to_string());
        out.push(String::new());
        out.push(format!("{}, {}", resume.education.degree, resume.education.school));

        format!("{}\n", out.join("\n").trim_end())
    }
}

impl ResumeWriter for MarkdownResumeWriter {
    fn render(&self, resume: &ResumeProfile) -> Result<Vec<u8>, AppError> {
        Ok(self.to_markdown(resume).into_bytes())
    }
}
