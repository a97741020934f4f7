//! Resume Profile: the structured form of a candidate's resume.
//!
//! Two instances exist per run: the original (from extraction) and the tailored one
//! (from plan application). Bullet ids are the join key between a resume and a
//! tailoring plan, so they must be unique across the whole resume, not just per job.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{check_non_empty, dates, SchemaError, Validate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobExperience {
    pub id: String,
    pub company: String,
    pub role: String,
    #[serde(with = "dates::required")]
    pub start_date: NaiveDate,
    /// `None` for a current position.
    #[serde(with = "dates::optional", default)]
    pub end_date: Option<NaiveDate>,
    pub bullets: Vec<Bullet>,
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub technologies: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(rename = "school_name", alias = "school")]
    pub school: String,
    pub degree: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeProfile {
    pub contact: String,
    #[serde(default)]
    pub summary: Option<String>,
    pub skills: Vec<String>,
    pub experiences: Vec<JobExperience>,
    pub projects: Vec<Project>,
    pub education: Education,
}

impl ResumeProfile {
    pub fn bullet_count(&self) -> usize {
        self.experiences.iter().map(|e| e.bullets.len()).sum()
    }
}

#[cfg(test)]
impl ResumeProfile {
    /// All bullet ids in document order.
    pub fn bullet_ids(&self) -> Vec<&str> {
        self.experiences
            .iter()
            .flat_map(|e| e.bullets.iter().map(|b| b.id.as_str()))
            .collect()
    }

    pub fn find_bullet(&self, bullet_id: &str) -> Option<&Bullet> {
        self.experiences
            .iter()
            .flat_map(|e| e.bullets.iter())
            .find(|b| b.id == bullet_id)
    }
}

impl Validate for ResumeProfile {
    fn validate(&self) -> Result<(), SchemaError> {
        let mut experience_ids = HashSet::new();
        let mut bullet_ids = HashSet::new();

        for exp in &self.experiences {
            check_non_empty("experience id", &exp.id)?;
            if !experience_ids.insert(exp.id.as_str()) {
                return Err(SchemaError::DuplicateId {
                    kind: "experience",
                    id: exp.id.clone(),
                });
            }
            for bullet in &exp.bullets {
                check_non_empty(&format!("bullet id in experience '{}'", exp.id), &bullet.id)?;
                if !bullet_ids.insert(bullet.id.as_str()) {
                    return Err(SchemaError::DuplicateId {
                        kind: "bullet",
                        id: bullet.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_sample_resume_is_valid() {
        assert!(sample_resume().validate().is_ok());
    }

    #[test]
    fn test_duplicate_bullet_id_across_experiences_rejected() {
        let mut resume = sample_resume();
        resume.experiences[1].bullets.push(bullet("b1", "dup"));
        assert_eq!(
            resume.validate().unwrap_err(),
            SchemaError::DuplicateId {
                kind: "bullet",
                id: "b1".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_experience_id_rejected() {
        let mut resume = sample_resume();
        resume.experiences[1].id = "exp1".to_string();
        assert!(matches!(
            resume.validate(),
            Err(SchemaError::DuplicateId {
                kind: "experience",
                ..
            })
        ));
    }

    #[test]
    fn test_empty_bullet_id_rejected() {
        let mut resume = sample_resume();
        resume.experiences[0].bullets[0].id = "  ".to_string();
        assert!(matches!(resume.validate(), Err(SchemaError::Empty { .. })));
    }

    #[test]
    fn test_bullet_ids_in_document_order() {
        assert_eq!(sample_resume().bullet_ids(), vec!["b1", "b2", "b3"]);
    }

    #[test]
    fn test_deserializes_original_wire_shape() {
        let json = r#"{
            "contact": "jane@example.com",
            "summary": null,
            "skills": ["Python"],
            "experiences": [{
                "id": "e1",
                "company": "Acme",
                "role": "Engineer",
                "start_date": "2021-02-01T00:00:00",
                "end_date": "Present",
                "bullets": [{"id": "b1", "content": "Shipped things"}],
                "technologies": ["Python"]
            }],
            "projects": [],
            "education": {"school_name": "MIT", "degree": "BSc"}
        }"#;
        let resume: ResumeProfile = serde_json::from_str(json).unwrap();
        assert_eq!(resume.education.school, "MIT");
        assert!(resume.experiences[0].end_date.is_none());
        assert_eq!(
            resume.experiences[0].start_date,
            NaiveDate::from_ymd_opt(2021, 2, 1).unwrap()
        );

        let back = serde_json::to_value(&resume).unwrap();
        assert_eq!(back["education"]["school_name"], "MIT");
        assert_eq!(back["experiences"][0]["start_date"], "2021-02-01");
    }
}
