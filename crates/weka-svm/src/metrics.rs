//! Lightweight scoring helpers for CLI outputs and test checks.

use crate::confusion::ConfusionMatrix;

/// Compute classification accuracy in `[0, 100]` as percent.
pub fn accuracy_percentage(matrix: &ConfusionMatrix) -> f64 {
    let total = matrix.total();
    if total == 0 {
        return 0.0;
    }
    100.0 * matrix.correct() as f64 / total as f64
}

/// Mean per-class recall over the actual classes, in `[0, 1]`.
///
/// Every actual class weighs the same regardless of its size, so a model
/// that always predicts the majority class scores `1 / n_classes`.
pub fn balanced_classification_rate(matrix: &ConfusionMatrix) -> f64 {
    let recalls: Vec<f64> = matrix
        .iter()
        .filter_map(|(actual, row)| {
            let support: usize = row.values().sum();
            if support == 0 {
                return None;
            }
            let hits = row.get(actual).copied().unwrap_or(0);
            Some(hits as f64 / support as f64)
        })
        .collect();

    if recalls.is_empty() {
        return 0.0;
    }
    recalls.iter().sum::<f64>() / recalls.len() as f64
}
