//! Confusion matrix keyed by class label.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::WekaError;

/// Counts of `(actual, predicted)` label pairs.
///
/// Stored sparsely as `actual → predicted → count`; pairs that never occur
/// are absent rather than zero. Serialises to the same nested map.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ConfusionMatrix {
    counts: BTreeMap<String, BTreeMap<String, usize>>,
}

impl ConfusionMatrix {
    /// Empty matrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair up actual and predicted labels in order.
    pub fn from_pairs<A, P>(actuals: &[A], predictions: &[P]) -> Result<Self, WekaError>
    where
        A: AsRef<str>,
        P: AsRef<str>,
    {
        if actuals.len() != predictions.len() {
            return Err(WekaError::PredictionCount {
                expected: actuals.len(),
                actual: predictions.len(),
            });
        }
        let mut matrix = Self::new();
        for (actual, predicted) in actuals.iter().zip(predictions) {
            matrix.record(actual.as_ref(), predicted.as_ref());
        }
        Ok(matrix)
    }

    /// Count one prediction.
    pub fn record(&mut self, actual: &str, predicted: &str) {
        *self
            .counts
            .entry(actual.to_string())
            .or_default()
            .entry(predicted.to_string())
            .or_insert(0) += 1;
    }

    /// Number of rows of class `actual` predicted as `predicted`.
    pub fn get(&self, actual: &str, predicted: &str) -> usize {
        self.counts
            .get(actual)
            .and_then(|row| row.get(predicted))
            .copied()
            .unwrap_or(0)
    }

    /// Predicted-label counts for one actual class.
    pub fn row(&self, actual: &str) -> Option<&BTreeMap<String, usize>> {
        self.counts.get(actual)
    }

    /// Iterate `(actual, predicted → count)` in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeMap<String, usize>)> {
        self.counts.iter()
    }

    /// Total number of predictions.
    pub fn total(&self) -> usize {
        self.counts.values().flat_map(|row| row.values()).sum()
    }

    /// Number of predictions equal to the actual label.
    pub fn correct(&self) -> usize {
        self.counts
            .iter()
            .map(|(actual, row)| row.get(actual).copied().unwrap_or(0))
            .sum()
    }

    /// Every label seen as actual or predicted, sorted.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self
            .counts
            .iter()
            .flat_map(|(actual, row)| {
                std::iter::once(actual.as_str()).chain(row.keys().map(String::as_str))
            })
            .collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl fmt::Display for ConfusionMatrix {
    /// Rows are actual classes, columns predicted classes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels = self.labels();
        let corner = "actual\\predicted";
        let first = labels
            .iter()
            .map(|l| l.len())
            .chain(std::iter::once(corner.len()))
            .max()
            .unwrap_or(0);
        let widths: Vec<usize> = labels
            .iter()
            .map(|predicted| {
                labels
                    .iter()
                    .map(|actual| self.get(actual, predicted).to_string().len())
                    .chain(std::iter::once(predicted.len()))
                    .max()
                    .unwrap_or(1)
            })
            .collect();

        write!(f, "{:<first$}", corner, first = first)?;
        for (label, width) in labels.iter().zip(&widths) {
            write!(f, "  {:>width$}", label, width = *width)?;
        }
        writeln!(f)?;

        for actual in &labels {
            write!(f, "{:<first$}", actual, first = first)?;
            for (predicted, width) in labels.iter().zip(&widths) {
                write!(f, "  {:>width$}", self.get(actual, predicted), width = *width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_pairs_sparsely() {
        let actual = ["A", "A", "C", "C"];
        let predicted = ["A", "A", "B", "B"];
        let matrix = ConfusionMatrix::from_pairs(&actual, &predicted).unwrap();
        assert_eq!(matrix.get("A", "A"), 2);
        assert_eq!(matrix.get("C", "B"), 2);
        assert_eq!(matrix.get("C", "C"), 0);
        assert_eq!(matrix.row("B"), None);
        assert_eq!(matrix.total(), 4);
        assert_eq!(matrix.correct(), 2);
        assert_eq!(matrix.labels(), vec!["A", "B", "C"]);
    }

    #[test]
    fn length_mismatch_rejected() {
        let err = ConfusionMatrix::from_pairs(&["A", "B"], &["A"]).unwrap_err();
        match err {
            WekaError::PredictionCount { expected, actual } => {
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn serialises_as_nested_map() {
        let matrix = ConfusionMatrix::from_pairs(&["A", "C"], &["A", "B"]).unwrap();
        let json = serde_json::to_string(&matrix).unwrap();
        assert_eq!(json, r#"{"A":{"A":1},"C":{"B":1}}"#);
    }

    #[test]
    fn display_aligns_columns() {
        let mut matrix = ConfusionMatrix::new();
        for _ in 0..12 {
            matrix.record("yes", "yes");
        }
        matrix.record("no", "yes");
        let text = matrix.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "actual\\predicted  no  yes");
        assert_eq!(lines[1], "no                 0    1");
        assert_eq!(lines[2], "yes                0   12");
    }

    #[test]
    fn empty_matrix() {
        let matrix = ConfusionMatrix::new();
        assert!(matrix.is_empty());
        assert_eq!(matrix.total(), 0);
        assert_eq!(matrix.correct(), 0);
    }
}
