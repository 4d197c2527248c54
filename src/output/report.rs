//! Report structure wrapping a fit assessment with run metadata

use crate::input::InputSource;
use crate::processing::analyzer::FitAssessment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitReport {
    pub assessment: FitAssessment,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
    pub resume_source: String,
    pub job_source: String,
}

impl FitReport {
    pub fn new(assessment: FitAssessment, resume: &InputSource, job: &InputSource) -> Self {
        Self {
            assessment,
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                tool_version: env!("CARGO_PKG_VERSION").to_string(),
                resume_source: resume.to_string(),
                job_source: job.to_string(),
            },
        }
    }

    /// Final label as shown to the user, including any downgrade note
    pub fn verdict(&self) -> String {
        self.assessment.reconciliation.to_string()
    }

    pub fn coverage_display(&self) -> String {
        format!("{:.1}%", self.assessment.coverage_percentage())
    }
}
