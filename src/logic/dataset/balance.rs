//! Class Balancer
//!
//! Undersample lớp đa số về đúng số lượng lớp thiểu số, rồi shuffle một lần.

use rand::seq::{index, SliceRandom};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::sample::{ClassCounts, LabeledSample};
use crate::logic::labeling::Label;

/// Downsample the majority label to the minority count.
///
/// Sampling is uniform without replacement; the concatenation (benign
/// first, then attack) is shuffled once. Same seed, same output.
pub fn balance(samples: &[LabeledSample], seed: u64) -> Vec<LabeledSample> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let (attack, benign): (Vec<LabeledSample>, Vec<LabeledSample>) =
        samples.iter().partition(|s| s.label == Label::Attack);

    let target = attack.len().min(benign.len());

    let keep = |class: Vec<LabeledSample>, rng: &mut ChaCha8Rng| -> Vec<LabeledSample> {
        if class.len() == target {
            return class;
        }
        index::sample(rng, class.len(), target)
            .into_iter()
            .map(|i| class[i])
            .collect()
    };

    let mut balanced = keep(benign, &mut rng);
    balanced.extend(keep(attack, &mut rng));
    balanced.shuffle(&mut rng);

    let counts = ClassCounts::of(&balanced);
    log::info!(
        "Balanced {} samples down to {} ({} benign / {} attack)",
        samples.len(),
        balanced.len(),
        counts.benign,
        counts.attack
    );

    balanced
}
