//! Lexical match score from a two-document TF-IDF model

use crate::processing::text_processor::TextProcessor;
use std::collections::{HashMap, HashSet};

/// TF-IDF cosine similarity fitted on exactly the pair being compared
pub struct TfidfScorer {
    text_processor: TextProcessor,
}

impl Default for TfidfScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl TfidfScorer {
    pub fn new() -> Self {
        Self {
            text_processor: TextProcessor::new(),
        }
    }

    /// Cosine similarity in [0, 1]
    pub fn similarity(&self, text1: &str, text2: &str) -> f32 {
        let docs = [
            self.text_processor.tokenize(text1),
            self.text_processor.tokenize(text2),
        ];

        if docs.iter().any(|d| d.is_empty()) {
            return 0.0;
        }

        let n_docs = docs.len() as f64;
        let mut document_frequency: HashMap<&str, usize> = HashMap::new();
        for doc in &docs {
            let unique: HashSet<&str> = doc.iter().map(|t| t.as_str()).collect();
            for term in unique {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        // Smoothed idf: ln((1 + n) / (1 + df)) + 1
        let idf: HashMap<&str, f64> = document_frequency
            .iter()
            .map(|(term, df)| (*term, ((1.0 + n_docs) / (1.0 + *df as f64)).ln() + 1.0))
            .collect();

        let vectors: Vec<HashMap<&str, f64>> = docs
            .iter()
            .map(|doc| {
                let mut tf: HashMap<&str, f64> = HashMap::new();
                for term in doc {
                    *tf.entry(term.as_str()).or_insert(0.0) += 1.0;
                }
                for (term, weight) in tf.iter_mut() {
                    *weight *= idf[term];
                }
                tf
            })
            .collect();

        let dot: f64 = vectors[0]
            .iter()
            .filter_map(|(term, w)| vectors[1].get(term).map(|v| w * v))
            .sum();
        let norm = |v: &HashMap<&str, f64>| v.values().map(|w| w * w).sum::<f64>().sqrt();
        let denominator = norm(&vectors[0]) * norm(&vectors[1]);

        if denominator == 0.0 {
            0.0
        } else {
            (dot / denominator).clamp(0.0, 1.0) as f32
        }
    }

    /// Similarity as a percentage rounded to two decimals
    pub fn match_percentage(&self, text1: &str, text2: &str) -> f32 {
        let percentage = self.similarity(text1, text2) as f64 * 100.0;
        ((percentage * 100.0).round() / 100.0) as f32
    }
}
