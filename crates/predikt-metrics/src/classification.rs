use std::fmt;

use predikt_core::PrediktResult;
use serde::{Deserialize, Serialize};

use crate::check_lengths;

/// Compute accuracy: fraction of correct predictions.
pub fn accuracy(y_true: &[usize], y_pred: &[usize]) -> PrediktResult<f64> {
    check_lengths(y_true.len(), y_pred.len())?;
    let correct = y_true.iter().zip(y_pred).filter(|(a, b)| a == b).count();
    Ok(correct as f64 / y_true.len() as f64)
}

/// Confusion matrix of shape `[n_classes, n_classes]`, rows = truth.
pub fn confusion_matrix(y_true: &[usize], y_pred: &[usize], n_classes: usize) -> Vec<Vec<usize>> {
    let mut matrix = vec![vec![0usize; n_classes]; n_classes];
    for (&t, &p) in y_true.iter().zip(y_pred) {
        if t < n_classes && p < n_classes {
            matrix[t][p] += 1;
        }
    }
    matrix
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Precision, recall, F1 and support of one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassScores {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-class breakdown plus accuracy and macro / weighted averages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassScores>,
    pub accuracy: f64,
    pub macro_f1: f64,
    pub weighted_f1: f64,
}

impl ClassificationReport {
    /// `labels[c]` names class code `c`.
    pub fn new<S: AsRef<str>>(y_true: &[usize], y_pred: &[usize], labels: &[S]) -> PrediktResult<Self> {
        check_lengths(y_true.len(), y_pred.len())?;
        let cm = confusion_matrix(y_true, y_pred, labels.len());

        let classes: Vec<ClassScores> = labels
            .iter()
            .enumerate()
            .map(|(c, label)| {
                let tp = cm[c][c];
                let support: usize = cm[c].iter().sum();
                let predicted: usize = cm.iter().map(|row| row[c]).sum();
                let precision = ratio(tp, predicted);
                let recall = ratio(tp, support);
                let f1 = if precision + recall == 0.0 {
                    0.0
                } else {
                    2.0 * precision * recall / (precision + recall)
                };
                ClassScores {
                    label: label.as_ref().to_string(),
                    precision,
                    recall,
                    f1,
                    support,
                }
            })
            .collect();

        let total: usize = classes.iter().map(|c| c.support).sum();
        let macro_f1 = classes.iter().map(|c| c.f1).sum::<f64>() / classes.len().max(1) as f64;
        let weighted_f1 = if total == 0 {
            0.0
        } else {
            classes.iter().map(|c| c.f1 * c.support as f64).sum::<f64>() / total as f64
        };

        Ok(ClassificationReport {
            classes,
            accuracy: accuracy(y_true, y_pred)?,
            macro_f1,
            weighted_f1,
        })
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>12} {:>9} {:>9} {:>9} {:>9}", "", "precision", "recall", "f1-score", "support")?;
        for c in &self.classes {
            writeln!(
                f,
                "{:>12} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                c.label, c.precision, c.recall, c.f1, c.support
            )?;
        }
        let total: usize = self.classes.iter().map(|c| c.support).sum();
        writeln!(f, "{:>12} {:>9} {:>9} {:>9.2} {:>9}", "accuracy", "", "", self.accuracy, total)?;
        writeln!(f, "{:>12} {:>9} {:>9} {:>9.2} {:>9}", "macro avg", "", "", self.macro_f1, total)?;
        write!(f, "{:>12} {:>9} {:>9} {:>9.2} {:>9}", "weighted avg", "", "", self.weighted_f1, total)
    }
}
