//! Skill extraction against a fixed vocabulary

use crate::error::{Result, ResumeFitError};
use crate::processing::text_processor::TextProcessor;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Set of recognized skills, iterated in lexicographic order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillSet(BTreeSet<String>);

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, skill: impl Into<String>) -> bool {
        self.0.insert(skill.into())
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.0.contains(skill)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn intersection(&self, other: &SkillSet) -> SkillSet {
        SkillSet(self.0.intersection(&other.0).cloned().collect())
    }

    pub fn difference(&self, other: &SkillSet) -> SkillSet {
        SkillSet(self.0.difference(&other.0).cloned().collect())
    }

    pub fn is_disjoint(&self, other: &SkillSet) -> bool {
        self.0.is_disjoint(&other.0)
    }

    pub fn is_subset(&self, other: &SkillSet) -> bool {
        self.0.is_subset(&other.0)
    }

    /// Sorted skills
    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl FromIterator<String> for SkillSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        SkillSet(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a SkillSet {
    type Item = &'a String;
    type IntoIter = std::collections::btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

struct SkillPattern {
    skill: String,
    regex: Regex,
}

/// Boundary-delimited, case-insensitive matcher for each vocabulary entry
pub struct SkillExtractor {
    patterns: Vec<SkillPattern>,
    text_processor: TextProcessor,
}

impl SkillExtractor {
    /// Build an extractor from an ordered vocabulary.
    ///
    /// Entries are normalized like input text; blanks are skipped and later
    /// duplicates dropped so the first occurrence keeps its position.
    pub fn new<S: AsRef<str>>(vocabulary: &[S]) -> Result<Self> {
        let text_processor = TextProcessor::new();
        let mut seen = BTreeSet::new();
        let mut patterns = Vec::with_capacity(vocabulary.len());

        for entry in vocabulary {
            let skill = text_processor.normalize(entry.as_ref());
            if skill.is_empty() || !seen.insert(skill.clone()) {
                continue;
            }

            // A Unicode word character on either side would make this a fragment of a longer token
            let pattern = format!(r"(?:^|\W){}(?:$|\W)", regex::escape(&skill));
            let regex = Regex::new(&pattern).map_err(|e| {
                ResumeFitError::Configuration(format!("Invalid skill entry '{}': {}", skill, e))
            })?;

            patterns.push(SkillPattern { skill, regex });
        }

        debug!("Skill extractor built with {} vocabulary entries", patterns.len());

        Ok(Self { patterns, text_processor })
    }

    /// Extract the vocabulary skills present in `text`
    pub fn extract(&self, text: &str) -> SkillSet {
        let normalized = self.text_processor.normalize(text);
        if normalized.is_empty() {
            return SkillSet::new();
        }

        self.patterns
            .iter()
            .filter(|p| p.regex.is_match(&normalized))
            .map(|p| p.skill.clone())
            .collect()
    }

    /// Vocabulary in configured order
    pub fn vocabulary(&self) -> Vec<&str> {
        self.patterns.iter().map(|p| p.skill.as_str()).collect()
    }

    pub fn skill_count(&self) -> usize {
        self.patterns.len()
    }
}
