//! Binary classification metrics.
//!
//! Support-weighted averages across both classes, matching the evaluation
//! convention used for the persisted `model_metrics` rows.

/// Accuracy plus support-weighted precision/recall/F1 for a binary task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl BinaryMetrics {
    /// Compute metrics from aligned truth/prediction slices.
    ///
    /// Returns `None` for empty or length-mismatched input.
    pub fn compute(y_true: &[u8], y_pred: &[u8]) -> Option<Self> {
        if y_true.is_empty() || y_true.len() != y_pred.len() {
            return None;
        }

        let n = y_true.len() as f64;
        let correct = y_true
            .iter()
            .zip(y_pred)
            .filter(|(t, p)| t == p)
            .count() as f64;

        let mut weighted_precision = 0.0;
        let mut weighted_recall = 0.0;
        let mut weighted_f1 = 0.0;

        for class in [0u8, 1u8] {
            let support = y_true.iter().filter(|&&t| t == class).count() as f64;
            if support == 0.0 {
                continue;
            }

            let tp = y_true
                .iter()
                .zip(y_pred)
                .filter(|(&t, &p)| t == class && p == class)
                .count() as f64;
            let predicted = y_pred.iter().filter(|&&p| p == class).count() as f64;

            let precision = if predicted > 0.0 { tp / predicted } else { 0.0 };
            let recall = tp / support;
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };

            let weight = support / n;
            weighted_precision += weight * precision;
            weighted_recall += weight * recall;
            weighted_f1 += weight * f1;
        }

        Some(Self {
            accuracy: correct / n,
            precision: weighted_precision,
            recall: weighted_recall,
            f1: weighted_f1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_prediction() {
        let y = [0, 1, 1, 0, 1];
        let m = BinaryMetrics::compute(&y, &y).unwrap();

        assert_eq!(m.accuracy, 1.0);
        assert_eq!(m.precision, 1.0);
        assert_eq!(m.recall, 1.0);
        assert_eq!(m.f1, 1.0);
    }

    #[test]
    fn test_known_confusion() {
        // truth:   1 1 1 1 0 0
        // pred:    1 1 0 0 0 1
        let y_true = [1, 1, 1, 1, 0, 0];
        let y_pred = [1, 1, 0, 0, 0, 1];
        let m = BinaryMetrics::compute(&y_true, &y_pred).unwrap();

        assert!((m.accuracy - 0.5).abs() < 1e-10);

        // class 1: precision 2/3, recall 2/4; class 0: precision 1/3, recall 1/2
        // weights: 4/6 and 2/6
        let expected_precision = (4.0 / 6.0) * (2.0 / 3.0) + (2.0 / 6.0) * (1.0 / 3.0);
        let expected_recall = (4.0 / 6.0) * 0.5 + (2.0 / 6.0) * 0.5;
        assert!((m.precision - expected_precision).abs() < 1e-10);
        assert!((m.recall - expected_recall).abs() < 1e-10);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(BinaryMetrics::compute(&[], &[]), None);
        assert_eq!(BinaryMetrics::compute(&[1], &[]), None);
    }
}
