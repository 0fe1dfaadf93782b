use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::sample::LabeledSample;
use crate::logic::labeling::Label;

/// Train / validation partitions
#[derive(Debug, Clone, Default)]
pub struct Split {
    pub train: Vec<LabeledSample>,
    pub validation: Vec<LabeledSample>,
}

/// Number of validation rows for a class of `n` rows.
///
/// Both partitions keep at least one row of every class with 2+ rows.
fn validation_share(n: usize, fraction: f64) -> usize {
    if n < 2 {
        return 0;
    }
    ((n as f64 * fraction).round() as usize).clamp(1, n - 1)
}

/// Stratified split: each class contributes the same fraction to validation
pub fn stratified_split(samples: &[LabeledSample], fraction: f64, seed: u64) -> Split {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut split = Split::default();

    for class in [Label::Benign, Label::Attack] {
        let mut rows: Vec<LabeledSample> =
            samples.iter().filter(|s| s.label == class).copied().collect();
        rows.shuffle(&mut rng);

        let n_val = validation_share(rows.len(), fraction);
        let train = rows.split_off(n_val);
        split.validation.extend(rows);
        split.train.extend(train);
    }

    split.train.shuffle(&mut rng);
    split.validation.shuffle(&mut rng);
    split
}
