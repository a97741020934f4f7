//! PDF resume writer.
//!
//! Layout is computed first as plain data (pages of positioned text runs), then painted
//! with printpdf's built-in Helvetica faces. US letter, 1" margins, greedy word wrap
//! driven by the static metric tables, page breaks when a line would cross the bottom
//! margin.

use std::io::BufWriter;

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument};

use crate::errors::AppError;
use crate::models::ResumeProfile;
use crate::render::font_metrics::{sanitize, table_for, Face};
use crate::render::{date_range, ResumeWriter};

const PT_TO_MM: f32 = 25.4 / 72.0;
const LINE_SPACING: f32 = 1.25;

/// Page geometry and type sizes, all in points.
#[derive(Debug, Clone)]
pub struct PageConfig {
    pub width_pt: f32,
    pub height_pt: f32,
    pub margin_pt: f32,
    pub name_size: f32,
    pub heading_size: f32,
    pub entry_size: f32,
    pub body_size: f32,
    pub meta_size: f32,
}

impl Default for PageConfig {
    /// US letter, 1" margins.
    fn default() -> Self {
        Self {
            width_pt: 612.0,
            height_pt: 792.0,
            margin_pt: 72.0,
            name_size: 16.0,
            heading_size: 12.0,
            entry_size: 11.0,
            body_size: 10.0,
            meta_size: 9.0,
        }
    }
}

impl PageConfig {
    pub fn text_width_pt(&self) -> f32 {
        self.width_pt - 2.0 * self.margin_pt
    }
}

/// One line of text at a fixed position. `y_pt` is the baseline, measured from the
/// bottom of the page as PDF expects.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub face: Face,
    pub size_pt: f32,
    pub x_pt: f32,
    pub y_pt: f32,
}

#[derive(Debug)]
struct LayoutCursor {
    pages: Vec<Vec<TextRun>>,
    /// Distance of the last baseline from the top edge.
    y_from_top: f32,
}

impl LayoutCursor {
    fn new(config: &PageConfig) -> Self {
        Self {
            pages: vec![Vec::new()],
            y_from_top: config.margin_pt,
        }
    }

    fn line(&mut self, config: &PageConfig, text: String, face: Face, size_pt: f32, indent_pt: f32) {
        let advance = size_pt * LINE_SPACING;
        if self.y_from_top + advance > config.height_pt - config.margin_pt {
            self.pages.push(Vec::new());
            self.y_from_top = config.margin_pt;
        }
        self.y_from_top += advance;
        let run = TextRun {
            text,
            face,
            size_pt,
            x_pt: config.margin_pt + indent_pt,
            y_pt: config.height_pt - self.y_from_top,
        };
        if let Some(page) = self.pages.last_mut() {
            page.push(run);
        }
    }

    /// Wrapped paragraph. `marker` is drawn on the first line only; continuation lines
    /// hang under the text.
    fn paragraph(
        &mut self,
        config: &PageConfig,
        text: &str,
        face: Face,
        size_pt: f32,
        marker: Option<&str>,
    ) {
        let table = table_for(face);
        let hang = marker
            .map(|m| table.measure_str(&format!("{m} "), size_pt))
            .unwrap_or(0.0);
        let lines = table.wrap(&sanitize(text), size_pt, config.text_width_pt() - hang);

        for (i, line) in lines.into_iter().enumerate() {
            match marker {
                Some(m) if i == 0 => self.line(config, format!("{m} {line}"), face, size_pt, 0.0),
                _ => self.line(config, line, face, size_pt, hang),
            }
        }
    }

    fn gap(&mut self, pt: f32) {
        self.y_from_top += pt;
    }

    fn heading(&mut self, config: &PageConfig, title: &str) {
        self.gap(config.body_size * 0.6);
        self.line(config, title.to_uppercase(), Face::Bold, config.heading_size, 0.0);
        self.gap(config.body_size * 0.2);
    }
}

/// Lays out the resume. Pure, so pagination and wrapping are testable without a PDF.
pub fn layout_resume(resume: &ResumeProfile, config: &PageConfig) -> Vec<Vec<TextRun>> {
    let mut cursor = LayoutCursor::new(config);

    cursor.paragraph(config, &resume.contact, Face::Bold, config.name_size, None);

    if let Some(summary) = resume.summary.as_deref().filter(|s| !s.trim().is_empty()) {
        cursor.heading(config, "Summary");
        cursor.paragraph(config, summary, Face::Regular, config.body_size, None);
    }

    if !resume.skills.is_empty() {
        cursor.heading(config, "Skills");
        cursor.paragraph(config, &resume.skills.join(", "), Face::Regular, config.body_size, None);
    }

    if !resume.experiences.is_empty() {
        cursor.heading(config, "Experience");
        for (i, exp) in resume.experiences.iter().enumerate() {
            if i > 0 {
                cursor.gap(config.body_size * 0.5);
            }
            let title = format!("{}, {}", exp.role, exp.company);
            cursor.paragraph(config, &title, Face::Bold, config.entry_size, None);
            cursor.paragraph(config, &date_range(exp), Face::Regular, config.meta_size, None);
            for bullet in &exp.bullets {
                cursor.paragraph(config, &bullet.content, Face::Regular, config.body_size, Some("-"));
            }
            if !exp.technologies.is_empty() {
                let tech = format!("Technologies: {}", exp.technologies.join(", "));
                cursor.paragraph(config, &tech, Face::Regular, config.meta_size, None);
            }
        }
    }

    if !resume.projects.is_empty() {
        cursor.heading(config, "Projects");
        for project in &resume.projects {
            let title = if project.technologies.is_empty() {
                project.name.clone()
            } else {
                format!("{} ({})", project.name, project.technologies.join(", "))
            };
            cursor.paragraph(config, &title, Face::Bold, config.body_size, None);
            cursor.paragraph(config, &project.description, Face::Regular, config.body_size, None);
        }
    }

    cursor.heading(config, "Education");
    let education = format!("{}, {}", resume.education.degree, resume.education.school);
    cursor.paragraph(config, &education, Face::Regular, config.body_size, None);

    cursor.pages
}

#[derive(Debug, Clone, Default)]
pub struct PdfResumeWriter {
    pub config: PageConfig,
}

fn pdf_error(e: impl std::fmt::Display) -> AppError {
    AppError::Output(format!("PDF rendering failed: {e}"))
}

impl ResumeWriter for PdfResumeWriter {
    fn render(&self, resume: &ResumeProfile) -> Result<Vec<u8>, AppError> {
        let config = &self.config;
        let pages = layout_resume(resume, config);
        let (page_w, page_h) = (Mm(config.width_pt * PT_TO_MM), Mm(config.height_pt * PT_TO_MM));

        let (doc, first_page, first_layer) = PdfDocument::new("Resume", page_w, page_h, "Layer 1");
        let regular: IndirectFontRef = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
        let bold: IndirectFontRef = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;

        for (index, runs) in pages.iter().enumerate() {
            let layer = if index == 0 {
                doc.get_page(first_page).get_layer(first_layer)
            } else {
                let (page, layer) = doc.add_page(page_w, page_h, format!("Layer {}", index + 1));
                doc.get_page(page).get_layer(layer)
            };
            for run in runs {
                let font = match run.face {
                    Face::Regular => &regular,
                    Face::Bold => &bold,
                };
                layer.use_text(
                    run.text.as_str(),
                    run.size_pt,
                    Mm(run.x_pt * PT_TO_MM),
                    Mm(run.y_pt * PT_TO_MM),
                    font,
                );
            }
        }

        let mut writer = BufWriter::new(Vec::new());
        doc.save(&mut writer).map_err(pdf_error)?;
        writer.into_inner().map_err(pdf_error)
    }
}
