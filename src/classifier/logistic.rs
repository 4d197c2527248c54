//! Multinomial logistic regression trained with full-batch gradient descent

use crate::error::{Result, ResumeFitError};
use log::debug;
use ndarray::{Array1, Array2, ArrayView1, Axis};

pub const NUM_CLASSES: usize = 3;

#[derive(Debug, Clone)]
pub struct LogisticOptions {
    pub max_iter: usize,
    pub learning_rate: f64,
    /// Inverse of sklearn's `C`
    pub l2_penalty: f64,
    pub balanced_class_weights: bool,
    pub tolerance: f64,
}

impl Default for LogisticOptions {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            learning_rate: 0.5,
            l2_penalty: 1.0,
            balanced_class_weights: true,
            tolerance: 1e-6,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogisticRegression {
    /// `NUM_CLASSES x n_features`
    weights: Array2<f64>,
    intercepts: Array1<f64>,
}

impl LogisticRegression {
    pub fn from_parts(weights: Array2<f64>, intercepts: Array1<f64>) -> Result<Self> {
        if weights.nrows() != NUM_CLASSES || intercepts.len() != NUM_CLASSES {
            return Err(ResumeFitError::ModelError(format!(
                "Classifier must have {} classes, found {} weight rows and {} intercepts",
                NUM_CLASSES,
                weights.nrows(),
                intercepts.len()
            )));
        }
        Ok(Self { weights, intercepts })
    }

    /// Fit on `x` (`n_samples x n_features`) with labels in `0..NUM_CLASSES`
    pub fn fit(x: &Array2<f64>, y: &[usize], options: &LogisticOptions) -> Result<Self> {
        let (n_samples, n_features) = x.dim();
        if n_samples == 0 {
            return Err(ResumeFitError::Training("No training samples".to_string()));
        }
        if y.len() != n_samples {
            return Err(ResumeFitError::Training(format!(
                "{} samples but {} labels",
                n_samples,
                y.len()
            )));
        }
        if let Some(bad) = y.iter().find(|&&label| label >= NUM_CLASSES) {
            return Err(ResumeFitError::Training(format!("Label {} out of range", bad)));
        }

        let class_weights = class_weights(y, options.balanced_class_weights);
        let sample_weights: Array1<f64> = y.iter().map(|&label| class_weights[label]).collect();
        let total_weight = sample_weights.sum();

        let mut targets = Array2::<f64>::zeros((n_samples, NUM_CLASSES));
        for (row, &label) in y.iter().enumerate() {
            targets[[row, label]] = 1.0;
        }

        let mut model = Self {
            weights: Array2::zeros((NUM_CLASSES, n_features)),
            intercepts: Array1::zeros(NUM_CLASSES),
        };

        for iteration in 0..options.max_iter {
            let probabilities = model.predict_proba(x);

            // Weighted residuals, one row per sample
            let mut residuals = probabilities - &targets;
            for (mut row, weight) in residuals.axis_iter_mut(Axis(0)).zip(sample_weights.iter()) {
                row *= *weight;
            }

            let weight_gradient =
                (residuals.t().dot(x) + &model.weights * options.l2_penalty) / total_weight;
            let intercept_gradient = residuals.sum_axis(Axis(0)) / total_weight;

            model.weights.scaled_add(-options.learning_rate, &weight_gradient);
            model.intercepts.scaled_add(-options.learning_rate, &intercept_gradient);

            let max_gradient = weight_gradient
                .iter()
                .chain(intercept_gradient.iter())
                .fold(0.0f64, |acc, g| acc.max(g.abs()));

            if max_gradient < options.tolerance {
                debug!("Logistic regression converged after {} iterations", iteration + 1);
                break;
            }
        }

        Ok(model)
    }

    /// Class probabilities, one row per sample
    pub fn predict_proba(&self, x: &Array2<f64>) -> Array2<f64> {
        let mut scores = x.dot(&self.weights.t()) + &self.intercepts;
        for mut row in scores.axis_iter_mut(Axis(0)) {
            softmax_in_place(&mut row);
        }
        scores
    }

    pub fn predict_proba_one(&self, features: ArrayView1<f64>) -> Result<[f64; NUM_CLASSES]> {
        if features.len() != self.n_features() {
            return Err(ResumeFitError::Prediction(format!(
                "Classifier expects {} features, got {}",
                self.n_features(),
                features.len()
            )));
        }

        let mut scores = self.weights.dot(&features) + &self.intercepts;
        softmax_in_place(&mut scores.view_mut());

        let mut probabilities = [0.0; NUM_CLASSES];
        for (slot, value) in probabilities.iter_mut().zip(scores.iter()) {
            *slot = *value;
        }
        Ok(probabilities)
    }

    pub fn predict(&self, x: &Array2<f64>) -> Vec<usize> {
        self.predict_proba(x)
            .axis_iter(Axis(0))
            .map(|row| argmax(row.iter().copied()))
            .collect()
    }

    pub fn n_features(&self) -> usize {
        self.weights.ncols()
    }

    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    pub fn intercepts(&self) -> &Array1<f64> {
        &self.intercepts
    }
}

/// `n / (k * n_c)` over the classes present, or all ones when unbalanced
pub fn class_weights(y: &[usize], balanced: bool) -> [f64; NUM_CLASSES] {
    if !balanced {
        return [1.0; NUM_CLASSES];
    }

    let mut counts = [0usize; NUM_CLASSES];
    for &label in y {
        if label < NUM_CLASSES {
            counts[label] += 1;
        }
    }

    let present = counts.iter().filter(|&&c| c > 0).count().max(1) as f64;
    let total = y.len() as f64;

    let mut weights = [1.0; NUM_CLASSES];
    for (weight, &count) in weights.iter_mut().zip(counts.iter()) {
        if count > 0 {
            *weight = total / (present * count as f64);
        }
    }
    weights
}

/// Index of the largest value; the first one wins ties
pub fn argmax<I: IntoIterator<Item = f64>>(values: I) -> usize {
    let mut best = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (index, value) in values.into_iter().enumerate() {
        if value > best_value {
            best = index;
            best_value = value;
        }
    }
    best
}

fn softmax_in_place(row: &mut ndarray::ArrayViewMut1<f64>) {
    let max = row.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
    row.mapv_inplace(|v| (v - max).exp());
    let sum = row.sum();
    if sum > 0.0 {
        row.mapv_inplace(|v| v / sum);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn separable_data() -> (Array2<f64>, Vec<usize>) {
        let x = array![
            [1.0, 0.0],
            [0.9, 0.1],
            [0.8, 0.0],
            [0.0, 1.0],
            [0.1, 0.9],
            [0.0, 0.8],
            [-1.0, -1.0],
            [-0.9, -0.8],
            [-0.8, -1.0],
        ];
        let y = vec![2, 2, 2, 1, 1, 1, 0, 0, 0];
        (x, y)
    }

    #[test]
    fn test_fit_separable_data() {
        let (x, y) = separable_data();
        let model = LogisticRegression::fit(&x, &y, &LogisticOptions::default()).unwrap();

        assert_eq!(model.predict(&x), y);
        assert_eq!(model.n_features(), 2);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let (x, y) = separable_data();
        let model = LogisticRegression::fit(&x, &y, &LogisticOptions::default()).unwrap();

        for row in model.predict_proba(&x).axis_iter(Axis(0)) {
            assert!((row.sum() - 1.0).abs() < 1e-9);
        }

        let single = model.predict_proba_one(array![0.95, 0.05].view()).unwrap();
        assert!((single.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert_eq!(argmax(single), 2);
    }

    #[test]
    fn test_feature_count_mismatch() {
        let (x, y) = separable_data();
        let model = LogisticRegression::fit(&x, &y, &LogisticOptions::default()).unwrap();
        assert!(matches!(
            model.predict_proba_one(array![1.0, 2.0, 3.0].view()),
            Err(ResumeFitError::Prediction(_))
        ));
    }

    #[test]
    fn test_balanced_class_weights() {
        let weights = class_weights(&[0, 0, 0, 1], true);
        assert!((weights[0] - 4.0 / 6.0).abs() < 1e-12);
        assert!((weights[1] - 2.0).abs() < 1e-12);
        assert_eq!(weights[2], 1.0);

        assert_eq!(class_weights(&[0, 1], false), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_rejects_bad_input() {
        let x = Array2::<f64>::zeros((0, 2));
        assert!(LogisticRegression::fit(&x, &[], &LogisticOptions::default()).is_err());

        let x = array![[1.0, 2.0]];
        assert!(LogisticRegression::fit(&x, &[5], &LogisticOptions::default()).is_err());
        assert!(LogisticRegression::fit(&x, &[0, 1], &LogisticOptions::default()).is_err());
    }

    #[test]
    fn test_argmax_tie_prefers_first() {
        assert_eq!(argmax([0.4, 0.4, 0.2]), 0);
        assert_eq!(argmax([0.1, 0.3, 0.6]), 2);
    }
}
