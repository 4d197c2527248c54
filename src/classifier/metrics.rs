//! Classification report and confusion matrix

use crate::classifier::logistic::NUM_CLASSES;
use crate::processing::reconciler::FitLabel;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub label: FitLabel,
    pub precision: f32,
    pub recall: f32,
    pub f1: f32,
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f32,
    pub macro_f1: f32,
    pub weighted_f1: f32,
    /// Rows are true labels, columns predicted labels
    pub confusion_matrix: [[usize; NUM_CLASSES]; NUM_CLASSES],
}

impl ClassificationReport {
    /// Undefined ratios count as zero
    pub fn new(y_true: &[usize], y_pred: &[usize]) -> Self {
        let mut confusion_matrix = [[0usize; NUM_CLASSES]; NUM_CLASSES];
        for (&truth, &predicted) in y_true.iter().zip(y_pred.iter()) {
            if truth < NUM_CLASSES && predicted < NUM_CLASSES {
                confusion_matrix[truth][predicted] += 1;
            }
        }

        let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f32 / den as f32 };

        let classes: Vec<ClassMetrics> = FitLabel::ALL
            .iter()
            .map(|&label| {
                let k = label.index();
                let true_positive = confusion_matrix[k][k];
                let predicted_total: usize = (0..NUM_CLASSES).map(|row| confusion_matrix[row][k]).sum();
                let support: usize = confusion_matrix[k].iter().sum();

                let precision = ratio(true_positive, predicted_total);
                let recall = ratio(true_positive, support);
                let f1 = if precision + recall == 0.0 {
                    0.0
                } else {
                    2.0 * precision * recall / (precision + recall)
                };

                ClassMetrics {
                    label,
                    precision,
                    recall,
                    f1,
                    support,
                }
            })
            .collect();

        let total: usize = classes.iter().map(|c| c.support).sum();
        let correct: usize = (0..NUM_CLASSES).map(|k| confusion_matrix[k][k]).sum();

        let macro_f1 = classes.iter().map(|c| c.f1).sum::<f32>() / NUM_CLASSES as f32;
        let weighted_f1 = if total == 0 {
            0.0
        } else {
            classes.iter().map(|c| c.f1 * c.support as f32).sum::<f32>() / total as f32
        };

        Self {
            classes,
            accuracy: ratio(correct, total),
            macro_f1,
            weighted_f1,
            confusion_matrix,
        }
    }

    pub fn support(&self) -> usize {
        self.classes.iter().map(|c| c.support).sum()
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>14} {:>10} {:>10} {:>10} {:>10}", "", "precision", "recall", "f1-score", "support")?;
        for class in &self.classes {
            writeln!(
                f,
                "{:>14} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                class.label.display_name(),
                class.precision,
                class.recall,
                class.f1,
                class.support
            )?;
        }
        writeln!(f)?;
        writeln!(f, "{:>14} {:>32.2} {:>10}", "accuracy", self.accuracy, self.support())?;
        writeln!(f, "{:>14} {:>32.2} {:>10}", "macro f1", self.macro_f1, self.support())?;
        writeln!(f, "{:>14} {:>32.2} {:>10}", "weighted f1", self.weighted_f1, self.support())?;
        writeln!(f)?;
        writeln!(f, "Confusion matrix (rows: true, columns: predicted)")?;
        for row in &self.confusion_matrix {
            writeln!(f, "  [{:>5} {:>5} {:>5}]", row[0], row[1], row[2])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_predictions() {
        let report = ClassificationReport::new(&[0, 1, 2, 2], &[0, 1, 2, 2]);
        assert_eq!(report.accuracy, 1.0);
        assert_eq!(report.macro_f1, 1.0);
        assert_eq!(report.confusion_matrix, [[1, 0, 0], [0, 1, 0], [0, 0, 2]]);
    }

    #[test]
    fn test_mixed_predictions() {
        let report = ClassificationReport::new(&[0, 0, 1, 2], &[0, 1, 1, 1]);

        let poor = report.classes[0];
        assert_eq!(poor.precision, 1.0);
        assert_eq!(poor.recall, 0.5);
        assert_eq!(poor.support, 2);

        let average = report.classes[1];
        assert!((average.precision - 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(average.recall, 1.0);

        let good = report.classes[2];
        assert_eq!(good.precision, 0.0);
        assert_eq!(good.recall, 0.0);
        assert_eq!(good.f1, 0.0);

        assert_eq!(report.accuracy, 0.5);
        assert_eq!(report.confusion_matrix[2][1], 1);
    }

    #[test]
    fn test_empty_report() {
        let report = ClassificationReport::new(&[], &[]);
        assert_eq!(report.accuracy, 0.0);
        assert_eq!(report.weighted_f1, 0.0);
        assert_eq!(report.support(), 0);
        assert!(report.to_string().contains("Confusion matrix"));
    }
}
