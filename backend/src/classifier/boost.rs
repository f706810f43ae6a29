//! Multiclass gradient boosting with a softmax objective.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use super::tree::{GrowParams, Tree};

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("feature/label length mismatch: {features} rows vs {labels} labels")]
    LengthMismatch { features: usize, labels: usize },

    #[error("feature row {row} has width {got}, expected {expected}")]
    RaggedFeatures {
        row: usize,
        got: usize,
        expected: usize,
    },
}

/// Fitting hyperparameters. Both prediction targets train with an identical
/// set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainParams {
    pub rounds: usize,
    pub learning_rate: f64,
    pub max_depth: usize,
    pub min_samples_leaf: usize,
    /// Stop once held-out log-loss has not improved for this many rounds;
    /// 0 disables early stopping.
    pub early_stopping_rounds: usize,
}

impl Default for TrainParams {
    fn default() -> Self {
        Self {
            rounds: 300,
            learning_rate: 0.05,
            max_depth: 3,
            min_samples_leaf: 20,
            early_stopping_rounds: 50,
        }
    }
}

/// Gradient-boosted multiclass classifier.
///
/// One regression tree per class per boosting round, stored round-major.
/// Leaf values already carry the learning rate, so prediction is a plain
/// sum over trees followed by a softmax. Fitting is fully deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GbdtClassifier {
    /// Sorted distinct labels seen at fit time; probability output order.
    pub classes: Vec<String>,
    trees: Vec<Tree>,
}

impl GbdtClassifier {
    /// Fit on a feature matrix and string labels.
    ///
    /// When `eval` is given, held-out log-loss is tracked per round and the
    /// model is truncated to its best round (early stopping).
    pub fn fit(
        x: &[Vec<f64>],
        y: &[&str],
        eval: Option<(&[Vec<f64>], &[&str])>,
        params: &TrainParams,
    ) -> Result<Self, ClassifierError> {
        if x.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }
        if x.len() != y.len() {
            return Err(ClassifierError::LengthMismatch {
                features: x.len(),
                labels: y.len(),
            });
        }
        let width = x[0].len();
        for (row, features) in x.iter().enumerate() {
            if features.len() != width {
                return Err(ClassifierError::RaggedFeatures {
                    row,
                    got: features.len(),
                    expected: width,
                });
            }
        }

        let mut classes: Vec<String> = y.iter().map(|s| s.to_string()).collect();
        classes.sort();
        classes.dedup();
        let k = classes.len();
        let class_idx: BTreeMap<String, usize> = classes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        let targets: Vec<usize> = y.iter().map(|s| class_idx[*s]).collect();
        let n = x.len();

        // eval labels outside the training classes are skipped in the loss
        let eval_targets: Option<Vec<Option<usize>>> = eval.map(|(_, ey)| {
            ey.iter()
                .map(|s| class_idx.get(*s).copied())
                .collect()
        });

        let grow = GrowParams {
            max_depth: params.max_depth,
            min_samples_leaf: params.min_samples_leaf,
        };
        let rows: Vec<usize> = (0..n).collect();
        let newton_scale = if k > 1 { (k - 1) as f64 / k as f64 } else { 1.0 };

        let mut scores = vec![vec![0.0f64; k]; n];
        let mut eval_scores = eval.map(|(ex, _)| vec![vec![0.0f64; k]; ex.len()]);
        let mut trees: Vec<Tree> = Vec::new();
        let mut best_loss = f64::INFINITY;
        let mut best_len = 0usize;
        let mut stale = 0usize;

        for _round in 0..params.rounds {
            let probs: Vec<Vec<f64>> = scores.iter().map(|s| softmax(s)).collect();
            for c in 0..k {
                let grad: Vec<f64> = (0..n)
                    .map(|i| (if targets[i] == c { 1.0 } else { 0.0 }) - probs[i][c])
                    .collect();
                let hess: Vec<f64> = (0..n)
                    .map(|i| (probs[i][c] * (1.0 - probs[i][c])).max(1e-12))
                    .collect();
                let mut tree = Tree::grow(x, &grad, &hess, &rows, newton_scale, &grow);
                tree.scale_leaves(params.learning_rate);
                for i in 0..n {
                    scores[i][c] += tree.predict(&x[i]);
                }
                trees.push(tree);
            }

            if let (Some(eval_scores), Some((ex, _)), Some(eval_targets)) =
                (eval_scores.as_mut(), eval, eval_targets.as_ref())
            {
                let round_trees = &trees[trees.len() - k..];
                for (j, row) in ex.iter().enumerate() {
                    for (c, tree) in round_trees.iter().enumerate() {
                        eval_scores[j][c] += tree.predict(row);
                    }
                }
                let loss = log_loss(eval_scores, eval_targets);
                if loss + 1e-9 < best_loss {
                    best_loss = loss;
                    best_len = trees.len();
                    stale = 0;
                } else {
                    stale += 1;
                    if params.early_stopping_rounds > 0 && stale >= params.early_stopping_rounds {
                        break;
                    }
                }
            }
        }

        if eval.is_some() && best_len > 0 {
            trees.truncate(best_len);
        }

        Ok(GbdtClassifier { classes, trees })
    }

    /// Class probabilities for one feature row, aligned with `classes`.
    pub fn predict_proba(&self, x: &[f64]) -> Vec<f64> {
        let k = self.classes.len();
        let mut scores = vec![0.0f64; k];
        for (t, tree) in self.trees.iter().enumerate() {
            scores[t % k] += tree.predict(x);
        }
        softmax(&scores)
    }

    /// The most probable class for one feature row.
    pub fn predict(&self, x: &[f64]) -> &str {
        let probs = self.predict_proba(x);
        let mut best = 0;
        for i in 1..probs.len() {
            if probs[i] > probs[best] {
                best = i;
            }
        }
        &self.classes[best]
    }

    /// Fraction of rows whose most probable class matches the label.
    pub fn accuracy(&self, x: &[Vec<f64>], y: &[&str]) -> f64 {
        if x.is_empty() {
            return 0.0;
        }
        let correct = x
            .iter()
            .zip(y)
            .filter(|(row, label)| self.predict(row) == **label)
            .count();
        correct as f64 / x.len() as f64
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.iter().map(|e| e / sum).collect()
}

fn log_loss(scores: &[Vec<f64>], targets: &[Option<usize>]) -> f64 {
    let mut total = 0.0;
    let mut count = 0usize;
    for (row, target) in scores.iter().zip(targets) {
        if let Some(c) = target {
            let probs = softmax(row);
            total -= probs[*c].max(1e-12).ln();
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_params() -> TrainParams {
        TrainParams {
            rounds: 30,
            learning_rate: 0.3,
            max_depth: 2,
            min_samples_leaf: 1,
            early_stopping_rounds: 0,
        }
    }

    fn separable_two_class() -> (Vec<Vec<f64>>, Vec<&'static str>) {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..50 {
            x.push(vec![i as f64 / 50.0, 1.0]);
            y.push("low");
            x.push(vec![2.0 + i as f64 / 50.0, 1.0]);
            y.push("high");
        }
        (x, y)
    }

    #[test]
    fn learns_a_separable_boundary() {
        let (x, y) = separable_two_class();
        let model = GbdtClassifier::fit(&x, &y, None, &test_params()).unwrap();

        assert_eq!(model.classes, vec!["high", "low"]);
        assert_eq!(model.predict(&[0.2, 1.0]), "low");
        assert_eq!(model.predict(&[2.8, 1.0]), "high");

        let probs = model.predict_proba(&[2.8, 1.0]);
        assert!(probs[0] > 0.8, "high probability was {}", probs[0]);
    }

    #[test]
    fn probabilities_sum_to_one() {
        let (x, y) = separable_two_class();
        let model = GbdtClassifier::fit(&x, &y, None, &test_params()).unwrap();
        for row in &x {
            let sum: f64 = model.predict_proba(row).iter().sum();
            assert!((sum - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn three_class_fit_covers_all_classes() {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..30 {
            let offset = i as f64 / 30.0;
            x.push(vec![offset]);
            y.push("a");
            x.push(vec![5.0 + offset]);
            y.push("b");
            x.push(vec![10.0 + offset]);
            y.push("c");
        }
        let model = GbdtClassifier::fit(&x, &y, None, &test_params()).unwrap();
        assert_eq!(model.classes.len(), 3);
        assert_eq!(model.predict(&[0.5]), "a");
        assert_eq!(model.predict(&[5.5]), "b");
        assert_eq!(model.predict(&[10.5]), "c");
        assert!(model.accuracy(&x, &y) > 0.95);
    }

    #[test]
    fn empty_training_set_is_an_error() {
        let err = GbdtClassifier::fit(&[], &[], None, &test_params()).unwrap_err();
        assert!(matches!(err, ClassifierError::EmptyTrainingSet));
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let x = vec![vec![1.0], vec![2.0]];
        let err = GbdtClassifier::fit(&x, &["a"], None, &test_params()).unwrap_err();
        assert!(matches!(err, ClassifierError::LengthMismatch { .. }));
    }

    #[test]
    fn early_stopping_truncates_to_best_round() {
        let (x, y) = separable_two_class();
        let mut params = test_params();
        params.rounds = 50;
        params.early_stopping_rounds = 3;
        // an eval set with inverted labels degrades every round, so the
        // model must stop early and keep only its first round of trees
        let flipped: Vec<&str> = y
            .iter()
            .map(|label| if *label == "low" { "high" } else { "low" })
            .collect();
        let model = GbdtClassifier::fit(&x, &y, Some((&x, &flipped)), &params).unwrap();
        assert_eq!(model.n_trees(), 2);
    }

    #[test]
    fn eval_set_with_matching_labels_keeps_a_usable_model() {
        let (x, y) = separable_two_class();
        let mut params = test_params();
        params.rounds = 40;
        params.early_stopping_rounds = 10;
        let model = GbdtClassifier::fit(&x, &y, Some((&x, &y)), &params).unwrap();
        assert!(model.accuracy(&x, &y) > 0.95);
    }

    #[test]
    fn serde_round_trip_preserves_probabilities() {
        let (x, y) = separable_two_class();
        let model = GbdtClassifier::fit(&x, &y, None, &test_params()).unwrap();
        let json = serde_json::to_string(&model).unwrap();
        let restored: GbdtClassifier = serde_json::from_str(&json).unwrap();
        assert_eq!(model.classes, restored.classes);
        assert_eq!(model.predict_proba(&x[0]), restored.predict_proba(&x[0]));
    }
}
