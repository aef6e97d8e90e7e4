//! Classifier evaluation (offline)
//!
//! Accuracy, per-class precision/recall/F1, and the confusion matrix,
//! rendered as the text report the trainer prints after fitting.

use std::fmt::Write;

/// Per-class precision/recall metrics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Evaluation of binary predictions against ground truth
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub accuracy: f64,
    /// `confusion[actual][predicted]`
    pub confusion: [[usize; 2]; 2],
    pub per_class: [ClassMetrics; 2],
}

/// Compare predictions to ground truth labels
///
/// Both slices must be the same length and nonempty.
pub fn evaluate(truth: &[u8], predicted: &[u8]) -> Evaluation {
    let mut confusion = [[0usize; 2]; 2];
    for (&actual, &guess) in truth.iter().zip(predicted) {
        confusion[usize::from(actual == 1)][usize::from(guess == 1)] += 1;
    }

    let correct = confusion[0][0] + confusion[1][1];
    let accuracy = correct as f64 / truth.len() as f64;

    let per_class = [class_metrics(&confusion, 0), class_metrics(&confusion, 1)];

    Evaluation {
        accuracy,
        confusion,
        per_class,
    }
}

fn class_metrics(confusion: &[[usize; 2]; 2], class: usize) -> ClassMetrics {
    let tp = confusion[class][class];
    let fp = confusion[1 - class][class];
    let fnc = confusion[class][1 - class];

    let precision = ratio(tp, tp + fp);
    let recall = ratio(tp, tp + fnc);
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    ClassMetrics {
        precision,
        recall,
        f1,
        support: tp + fnc,
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Render the evaluation as a classification report
pub fn report(eval: &Evaluation) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Model Accuracy: {:.2}", eval.accuracy);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:>18} {:>10} {:>10} {:>10} {:>10}",
        "", "precision", "recall", "f1-score", "support"
    );
    for (name, metrics) in [
        ("No Bleaching (0)", eval.per_class[0]),
        ("Bleaching (1)", eval.per_class[1]),
    ] {
        let _ = writeln!(
            out,
            "{:>18} {:>10.2} {:>10.2} {:>10.2} {:>10}",
            name, metrics.precision, metrics.recall, metrics.f1, metrics.support
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Confusion matrix (rows actual, columns predicted):");
    let _ = writeln!(
        out,
        "{:>14} {:>12} {:>12}",
        "", "no bleaching", "bleaching"
    );
    let _ = writeln!(
        out,
        "{:>14} {:>12} {:>12}",
        "no bleaching", eval.confusion[0][0], eval.confusion[0][1]
    );
    let _ = writeln!(
        out,
        "{:>14} {:>12} {:>12}",
        "bleaching", eval.confusion[1][0], eval.confusion[1][1]
    );
    out
}
