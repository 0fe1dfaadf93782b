//! Evaluation Metrics
//!
//! Accuracy, confusion matrix và classification report cho validation split.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Classifier;
use crate::logic::dataset::LabeledSample;
use crate::logic::labeling::Label;

/// Binary confusion matrix (positive = attack)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_negative: usize,
    pub false_positive: usize,
    pub false_negative: usize,
    pub true_positive: usize,
}

impl ConfusionMatrix {
    pub fn record(&mut self, truth: Label, predicted: Label) {
        match (truth, predicted) {
            (Label::Benign, Label::Benign) => self.true_negative += 1,
            (Label::Benign, Label::Attack) => self.false_positive += 1,
            (Label::Attack, Label::Benign) => self.false_negative += 1,
            (Label::Attack, Label::Attack) => self.true_positive += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.true_negative + self.false_positive + self.false_negative + self.true_positive
    }
}

/// Precision / recall / F1 for one class
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassReport {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

impl ClassReport {
    fn new(hits: usize, predicted: usize, support: usize) -> Self {
        let precision = ratio(hits, predicted);
        let recall = ratio(hits, support);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        Self { precision, recall, f1, support }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub model: String,
    pub accuracy: f64,
    pub confusion: ConfusionMatrix,
    pub benign: ClassReport,
    pub attack: ClassReport,
}

impl Evaluation {
    pub fn from_labels<I>(model: &str, pairs: I) -> Self
    where
        I: IntoIterator<Item = (Label, Label)>,
    {
        let mut confusion = ConfusionMatrix::default();
        for (truth, predicted) in pairs {
            confusion.record(truth, predicted);
        }

        let c = confusion;
        Self {
            model: model.to_string(),
            accuracy: ratio(c.true_negative + c.true_positive, c.total()),
            benign: ClassReport::new(
                c.true_negative,
                c.true_negative + c.false_negative,
                c.true_negative + c.false_positive,
            ),
            attack: ClassReport::new(
                c.true_positive,
                c.true_positive + c.false_positive,
                c.true_positive + c.false_negative,
            ),
            confusion,
        }
    }
}

/// Score a classifier on labeled samples
pub fn evaluate(model: &dyn Classifier, samples: &[LabeledSample]) -> Evaluation {
    Evaluation::from_labels(
        model.name(),
        samples.iter().map(|s| (s.label, model.predict(&s.features))),
    )
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.confusion;
        writeln!(f, "{} evaluation:", self.model)?;
        writeln!(f, "Accuracy: {:.4}", self.accuracy)?;
        writeln!(f, "[[{} {}]", c.true_negative, c.false_positive)?;
        writeln!(f, " [{} {}]]", c.false_negative, c.true_positive)?;
        writeln!(f, "{:>10} {:>9} {:>9} {:>9} {:>9}", "", "precision", "recall", "f1-score", "support")?;
        for (name, r) in [("0", &self.benign), ("1", &self.attack)] {
            writeln!(
                f,
                "{:>10} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                name, r.precision, r.recall, r.f1, r.support
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Label::{Attack, Benign};

    #[test]
    fn test_counts_and_scores() {
        let pairs = vec![
            (Benign, Benign),
            (Benign, Benign),
            (Benign, Attack),
            (Attack, Attack),
            (Attack, Attack),
            (Attack, Benign),
        ];
        let eval = Evaluation::from_labels("test", pairs);
        assert_eq!(
            eval.confusion,
            ConfusionMatrix { true_negative: 2, false_positive: 1, false_negative: 1, true_positive: 2 }
        );
        assert!((eval.accuracy - 4.0 / 6.0).abs() < 1e-12);
        assert!((eval.attack.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((eval.attack.recall - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(eval.benign.support, 3);
    }

    #[test]
    fn test_empty_is_zero_not_nan() {
        let eval = Evaluation::from_labels("empty", Vec::new());
        assert_eq!(eval.accuracy, 0.0);
        assert_eq!(eval.attack.f1, 0.0);
    }

    #[test]
    fn test_report_renders() {
        let eval = Evaluation::from_labels("voting", vec![(Attack, Attack)]);
        let text = eval.to_string();
        assert!(text.contains("voting evaluation:"));
        assert!(text.contains("Accuracy: 1.0000"));
    }
}
