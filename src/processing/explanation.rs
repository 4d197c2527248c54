//! Keyword-overlap explanation of a resume/job pair

use crate::processing::skills::{SkillExtractor, SkillSet};
use serde::{Deserialize, Serialize};

/// Skills the resume covers and the job skills it lacks, both sorted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchExplanation {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub resume_skills: SkillSet,
    pub job_skills: SkillSet,
}

impl MatchExplanation {
    pub fn from_skill_sets(resume_skills: SkillSet, job_skills: SkillSet) -> Self {
        let matched = resume_skills.intersection(&job_skills).to_vec();
        let missing = job_skills.difference(&resume_skills).to_vec();

        Self {
            matched,
            missing,
            resume_skills,
            job_skills,
        }
    }

    /// Fraction of job skills present in the resume
    pub fn coverage(&self) -> f32 {
        coverage_ratio(self.matched.len(), self.job_skills.len())
    }
}

/// Extract skills from both texts independently and compare them
pub fn explain_match(extractor: &SkillExtractor, resume_text: &str, job_text: &str) -> MatchExplanation {
    let resume_skills = extractor.extract(resume_text);
    let job_skills = extractor.extract(job_text);
    MatchExplanation::from_skill_sets(resume_skills, job_skills)
}

/// `matched / job_skills`, or 0.0 when the job names no known skills
pub fn coverage_ratio(matched: usize, job_skills: usize) -> f32 {
    if job_skills == 0 {
        0.0
    } else {
        matched as f32 / job_skills as f32
    }
}
