//! Fit labels and the coverage-based downgrade rule

use crate::error::{Result, ResumeFitError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse resume-to-job suitability, ordered worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FitLabel {
    PoorFit = 0,
    AverageFit = 1,
    GoodFit = 2,
}

impl FitLabel {
    pub const ALL: [FitLabel; 3] = [FitLabel::PoorFit, FitLabel::AverageFit, FitLabel::GoodFit];

    pub fn display_name(self) -> &'static str {
        match self {
            FitLabel::PoorFit => "Poor Fit",
            FitLabel::AverageFit => "Average Fit",
            FitLabel::GoodFit => "Good Fit",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for FitLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for FitLabel {
    type Err = ResumeFitError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        FitLabel::ALL
            .into_iter()
            .find(|label| label.display_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                ResumeFitError::InvalidInput(format!(
                    "Unknown fit label: '{}'. Expected one of: Poor Fit, Average Fit, Good Fit",
                    s
                ))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DowngradeReason {
    LowSkillCoverage,
    VeryLowSkillCoverage,
}

impl fmt::Display for DowngradeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DowngradeReason::LowSkillCoverage => f.write_str("low skill coverage"),
            DowngradeReason::VeryLowSkillCoverage => f.write_str("very low skill coverage"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub predicted: FitLabel,
    pub label: FitLabel,
    pub downgrade: Option<DowngradeReason>,
}

impl Reconciliation {
    pub fn is_downgraded(&self) -> bool {
        self.downgrade.is_some()
    }
}

impl fmt::Display for Reconciliation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.downgrade {
            Some(reason) => write!(f, "{} (downgraded due to {})", self.label, reason),
            None => write!(f, "{}", self.label),
        }
    }
}

/// Guardrail that lowers a model prediction when skill coverage is thin.
///
/// Good Fit below the threshold becomes Average Fit; Average Fit below half
/// the threshold becomes Poor Fit. One step at most, never an upgrade.
#[derive(Debug, Clone, Copy)]
pub struct FitReconciler {
    coverage_threshold: f32,
}

impl Default for FitReconciler {
    fn default() -> Self {
        Self::new(Self::DEFAULT_COVERAGE_THRESHOLD)
    }
}

impl FitReconciler {
    pub const DEFAULT_COVERAGE_THRESHOLD: f32 = 0.30;

    pub fn new(coverage_threshold: f32) -> Self {
        Self { coverage_threshold }
    }

    pub fn coverage_threshold(&self) -> f32 {
        self.coverage_threshold
    }

    pub fn very_low_threshold(&self) -> f32 {
        self.coverage_threshold / 2.0
    }

    pub fn reconcile(&self, predicted: FitLabel, coverage: f32) -> Reconciliation {
        let (label, downgrade) = match predicted {
            FitLabel::GoodFit if coverage < self.coverage_threshold => {
                (FitLabel::AverageFit, Some(DowngradeReason::LowSkillCoverage))
            }
            FitLabel::AverageFit if coverage < self.very_low_threshold() => {
                (FitLabel::PoorFit, Some(DowngradeReason::VeryLowSkillCoverage))
            }
            other => (other, None),
        };

        Reconciliation { predicted, label, downgrade }
    }

    /// Reconcile a label given by its display string
    pub fn reconcile_display(&self, predicted: &str, coverage: f32) -> Result<Reconciliation> {
        Ok(self.reconcile(predicted.parse()?, coverage))
    }
}
