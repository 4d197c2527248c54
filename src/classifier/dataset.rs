//! Resume dataset loading and training pair construction

use crate::error::{Result, ResumeFitError};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct ResumeRecord {
    pub resume: String,
    pub category: String,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Resume")]
    resume: Option<String>,
    #[serde(rename = "Category")]
    category: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairKind {
    SameCategory,
    CrossCategory,
}

/// A resume paired with another resume standing in for a job description
#[derive(Debug, Clone)]
pub struct TrainingPair {
    pub resume: String,
    pub job: String,
    pub kind: PairKind,
}

impl TrainingPair {
    /// Text the classifier sees for this pair
    pub fn combined_text(&self) -> String {
        format!("{} {}", self.resume, self.job)
    }
}

/// Read a CSV with `Resume` and `Category` columns, skipping incomplete rows
pub fn load_dataset(path: &Path) -> Result<Vec<ResumeRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| ResumeFitError::Dataset(format!("Failed to open {}: {}", path.display(), e)))?;

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for row in reader.deserialize::<CsvRow>() {
        let row = row?;
        match (row.resume, row.category) {
            (Some(resume), Some(category)) if !resume.trim().is_empty() && !category.trim().is_empty() => {
                records.push(ResumeRecord {
                    resume,
                    category: category.trim().to_string(),
                });
            }
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!("Skipped {} incomplete dataset rows", skipped);
    }
    info!("Loaded {} resumes from {}", records.len(), path.display());

    if records.is_empty() {
        return Err(ResumeFitError::Dataset(format!(
            "No usable rows in {}",
            path.display()
        )));
    }

    Ok(records)
}

/// Build same-category and cross-category pairs.
///
/// Each resume is paired with a shuffled resume from its own category. A
/// `negative_fraction` sample of resumes is then paired with a random resume
/// from the next category in sorted order.
pub fn build_pairs(records: &[ResumeRecord], negative_fraction: f32, rng: &mut StdRng) -> Vec<TrainingPair> {
    let mut by_category: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (index, record) in records.iter().enumerate() {
        by_category.entry(record.category.as_str()).or_default().push(index);
    }

    let mut pairs = Vec::with_capacity(records.len());

    for members in by_category.values() {
        let mut partners = members.clone();
        partners.shuffle(rng);
        for (&resume_idx, &job_idx) in members.iter().zip(partners.iter()) {
            pairs.push(TrainingPair {
                resume: records[resume_idx].resume.clone(),
                job: records[job_idx].resume.clone(),
                kind: PairKind::SameCategory,
            });
        }
    }

    let categories: Vec<&str> = by_category.keys().copied().collect();
    if categories.len() < 2 {
        warn!("Only one category present; no cross-category pairs generated");
        return pairs;
    }

    let negative_count = ((records.len() as f32) * negative_fraction).round() as usize;
    let mut sampled: Vec<usize> = (0..records.len()).collect();
    sampled.shuffle(rng);
    sampled.truncate(negative_count);

    for resume_idx in sampled {
        let category = records[resume_idx].category.as_str();
        let position = categories.iter().position(|c| *c == category).unwrap_or(0);
        let other = categories[(position + 1) % categories.len()];
        let candidates = &by_category[other];
        let job_idx = candidates[rng.random_range(0..candidates.len())];

        pairs.push(TrainingPair {
            resume: records[resume_idx].resume.clone(),
            job: records[job_idx].resume.clone(),
            kind: PairKind::CrossCategory,
        });
    }

    pairs
}

/// Per-class shuffled split returning `(train, test)` indices.
///
/// Classes with a single sample stay in the training set.
pub fn stratified_split(labels: &[usize], test_fraction: f32, rng: &mut StdRng) -> (Vec<usize>, Vec<usize>) {
    let mut by_label: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (index, &label) in labels.iter().enumerate() {
        by_label.entry(label).or_default().push(index);
    }

    let mut train = Vec::new();
    let mut test = Vec::new();

    for mut members in by_label.into_values() {
        members.shuffle(rng);
        let n = members.len();
        let n_test = if n < 2 {
            0
        } else {
            ((n as f32 * test_fraction).round() as usize).clamp(1, n - 1)
        };
        test.extend_from_slice(&members[..n_test]);
        train.extend_from_slice(&members[n_test..]);
    }

    train.shuffle(rng);
    test.shuffle(rng);
    (train, test)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn records() -> Vec<ResumeRecord> {
        let mut records = Vec::new();
        for (category, count) in [("Data Science", 4), ("HR", 3), ("Java Developer", 3)] {
            for i in 0..count {
                records.push(ResumeRecord {
                    resume: format!("{} resume {}", category, i),
                    category: category.to_string(),
                });
            }
        }
        records
    }

    #[test]
    fn test_load_dataset_skips_incomplete_rows() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Category,Resume").unwrap();
        writeln!(file, "HR,\"Recruiting, onboarding\"").unwrap();
        writeln!(file, "Data Science,").unwrap();
        writeln!(file, ",Orphan resume").unwrap();
        writeln!(file, "Data Science,Python and pandas").unwrap();

        let records = load_dataset(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].resume, "Recruiting, onboarding");
        assert_eq!(records[1].category, "Data Science");
    }

    #[test]
    fn test_load_dataset_empty() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Category,Resume").unwrap();
        assert!(matches!(load_dataset(file.path()), Err(ResumeFitError::Dataset(_))));
    }

    #[test]
    fn test_build_pairs_counts_and_categories() {
        let records = records();
        let mut rng = StdRng::seed_from_u64(42);
        let pairs = build_pairs(&records, 0.6, &mut rng);

        let same: Vec<_> = pairs.iter().filter(|p| p.kind == PairKind::SameCategory).collect();
        let cross: Vec<_> = pairs.iter().filter(|p| p.kind == PairKind::CrossCategory).collect();
        assert_eq!(same.len(), 10);
        assert_eq!(cross.len(), 6);

        let category_of = |text: &str| records.iter().find(|r| r.resume == text).unwrap().category.clone();
        for pair in same {
            assert_eq!(category_of(pair.resume.as_str()), category_of(pair.job.as_str()));
        }
        for pair in cross {
            assert_ne!(category_of(pair.resume.as_str()), category_of(pair.job.as_str()));
        }
    }

    #[test]
    fn test_build_pairs_is_deterministic() {
        let records = records();
        let first = build_pairs(&records, 0.6, &mut StdRng::seed_from_u64(7));
        let second = build_pairs(&records, 0.6, &mut StdRng::seed_from_u64(7));

        let jobs = |pairs: &[TrainingPair]| pairs.iter().map(|p| p.job.clone()).collect::<Vec<_>>();
        assert_eq!(jobs(&first), jobs(&second));
    }

    #[test]
    fn test_single_category_has_no_cross_pairs() {
        let records: Vec<ResumeRecord> = records().into_iter().filter(|r| r.category == "HR").collect();
        let pairs = build_pairs(&records, 0.6, &mut StdRng::seed_from_u64(42));
        assert_eq!(pairs.len(), 3);
        assert!(pairs.iter().all(|p| p.kind == PairKind::SameCategory));
    }

    #[test]
    fn test_stratified_split() {
        let labels = vec![0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 2];
        let (train, test) = stratified_split(&labels, 0.2, &mut StdRng::seed_from_u64(42));

        assert_eq!(train.len() + test.len(), labels.len());
        assert_eq!(test.iter().filter(|&&i| labels[i] == 0).count(), 1);
        assert_eq!(test.iter().filter(|&&i| labels[i] == 1).count(), 1);
        assert_eq!(test.iter().filter(|&&i| labels[i] == 2).count(), 0);
        assert!(train.iter().all(|i| !test.contains(i)));
    }

    #[test]
    fn test_combined_text() {
        let pair = TrainingPair {
            resume: "python".to_string(),
            job: "kafka".to_string(),
            kind: PairKind::SameCategory,
        };
        assert_eq!(pair.combined_text(), "python kafka");
    }
}
