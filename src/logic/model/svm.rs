//! Kernel SVM Classifier
//!
//! RBF-kernel C-SVC trained with SMO, probability đầu ra qua Platt sigmoid.

use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::{Classifier, TrainingError};
use crate::logic::dataset::LabeledSample;
use crate::logic::features::{FeatureVector, FEATURE_COUNT};

/// Alphas below this are not support vectors
const ALPHA_EPS: f64 = 1e-8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SvmParams {
    /// Soft-margin penalty
    pub c: f64,
    /// Kernel width; `None` = 1 / (n_features * var(X))
    pub gamma: Option<f64>,
    /// KKT tolerance
    pub tol: f64,
    /// Consecutive sweeps without alpha change before stopping
    pub max_passes: usize,
    /// Hard cap on sweeps
    pub max_sweeps: usize,
    /// Row cap; larger training sets are subsampled
    pub max_samples: usize,
    pub seed: u64,
}

impl Default for SvmParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            gamma: None,
            tol: 1e-3,
            max_passes: 5,
            max_sweeps: 200,
            max_samples: crate::constants::DEFAULT_SVM_MAX_SAMPLES,
            seed: crate::constants::DEFAULT_SEED,
        }
    }
}

/// Trained RBF SVM: support vectors, dual coefficients, Platt sigmoid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SvmClassifier {
    pub gamma: f64,
    pub support_vectors: Vec<[f64; FEATURE_COUNT]>,
    /// alpha_i * y_i per support vector
    pub dual_coef: Vec<f64>,
    pub intercept: f64,
    pub platt_a: f64,
    pub platt_b: f64,
}

fn rbf(gamma: f64, a: &[f64; FEATURE_COUNT], b: &[f64; FEATURE_COUNT]) -> f64 {
    let dist: f64 = a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum();
    (-gamma * dist).exp()
}

/// "scale" heuristic: 1 / (n_features * var(X))
fn scale_gamma(rows: &[[f64; FEATURE_COUNT]]) -> f64 {
    let values: Vec<f64> = rows.iter().flat_map(|r| r.iter().copied()).collect();
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    if var > f64::EPSILON {
        1.0 / (FEATURE_COUNT as f64 * var)
    } else {
        1.0
    }
}

impl SvmClassifier {
    pub fn fit(samples: &[LabeledSample], params: &SvmParams) -> Result<Self, TrainingError> {
        if samples.is_empty() {
            return Err(TrainingError::EmptyInput("svm"));
        }
        if params.max_samples == 0 {
            return Err(TrainingError::EmptyInput("svm subsample (max_samples = 0)"));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);

        let chosen: Vec<&LabeledSample> = if samples.len() > params.max_samples {
            log::info!(
                "SVM: subsampling {} rows to {}",
                samples.len(),
                params.max_samples
            );
            let mut picked: Vec<usize> =
                index::sample(&mut rng, samples.len(), params.max_samples).into_vec();
            picked.sort_unstable();
            picked.into_iter().map(|i| &samples[i]).collect()
        } else {
            samples.iter().collect()
        };

        let x: Vec<[f64; FEATURE_COUNT]> = chosen.iter().map(|s| s.features.values).collect();
        let y: Vec<f64> = chosen
            .iter()
            .map(|s| if s.label.is_attack() { 1.0 } else { -1.0 })
            .collect();
        let n = x.len();
        let gamma = params.gamma.unwrap_or_else(|| scale_gamma(&x));

        let mut kernel = vec![0.0; n * n];
        for i in 0..n {
            for j in i..n {
                let k = rbf(gamma, &x[i], &x[j]);
                kernel[i * n + j] = k;
                kernel[j * n + i] = k;
            }
        }
        let k = |i: usize, j: usize| kernel[i * n + j];

        // decision[i] = sum_k alpha_k y_k K(k, i) + b, kept up to date
        let mut alpha = vec![0.0; n];
        let mut b = 0.0;
        let mut decision = vec![0.0; n];

        let mut passes = 0;
        let mut sweeps = 0;
        while passes < params.max_passes && sweeps < params.max_sweeps && n > 1 {
            sweeps += 1;
            let mut changed = 0;

            for i in 0..n {
                let e_i = decision[i] - y[i];
                let violates = (y[i] * e_i < -params.tol && alpha[i] < params.c)
                    || (y[i] * e_i > params.tol && alpha[i] > 0.0);
                if !violates {
                    continue;
                }

                let mut j = rng.gen_range(0..n - 1);
                if j >= i {
                    j += 1;
                }
                let e_j = decision[j] - y[j];

                let (ai_old, aj_old) = (alpha[i], alpha[j]);
                let (lo, hi) = if y[i] != y[j] {
                    ((aj_old - ai_old).max(0.0), (params.c + aj_old - ai_old).min(params.c))
                } else {
                    ((ai_old + aj_old - params.c).max(0.0), (ai_old + aj_old).min(params.c))
                };
                if lo >= hi {
                    continue;
                }

                let eta = 2.0 * k(i, j) - k(i, i) - k(j, j);
                if eta >= 0.0 {
                    continue;
                }

                let aj = (aj_old - y[j] * (e_i - e_j) / eta).clamp(lo, hi);
                if (aj - aj_old).abs() < 1e-5 {
                    continue;
                }
                let ai = ai_old + y[i] * y[j] * (aj_old - aj);

                let b1 = b - e_i - y[i] * (ai - ai_old) * k(i, i) - y[j] * (aj - aj_old) * k(i, j);
                let b2 = b - e_j - y[i] * (ai - ai_old) * k(i, j) - y[j] * (aj - aj_old) * k(j, j);
                let b_new = if ai > 0.0 && ai < params.c {
                    b1
                } else if aj > 0.0 && aj < params.c {
                    b2
                } else {
                    (b1 + b2) / 2.0
                };

                let (di, dj, db) = ((ai - ai_old) * y[i], (aj - aj_old) * y[j], b_new - b);
                for (m, d) in decision.iter_mut().enumerate() {
                    *d += di * k(i, m) + dj * k(j, m) + db;
                }

                alpha[i] = ai;
                alpha[j] = aj;
                b = b_new;
                changed += 1;
            }

            passes = if changed == 0 { passes + 1 } else { 0 };
        }

        let (platt_a, platt_b) = fit_platt(&decision, &y);

        let mut support_vectors = Vec::new();
        let mut dual_coef = Vec::new();
        for i in 0..n {
            if alpha[i] > ALPHA_EPS {
                support_vectors.push(x[i]);
                dual_coef.push(alpha[i] * y[i]);
            }
        }

        log::info!(
            "SVM trained: {} rows, {} support vectors, gamma {:.4}, {} sweeps",
            n,
            support_vectors.len(),
            gamma,
            sweeps
        );

        Ok(Self {
            gamma,
            support_vectors,
            dual_coef,
            intercept: b,
            platt_a,
            platt_b,
        })
    }

    /// Signed distance from the margin (positive = attack side)
    pub fn decision_function(&self, x: &FeatureVector) -> f64 {
        self.support_vectors
            .iter()
            .zip(self.dual_coef.iter())
            .map(|(sv, coef)| coef * rbf(self.gamma, sv, &x.values))
            .sum::<f64>()
            + self.intercept
    }
}

impl Classifier for SvmClassifier {
    fn name(&self) -> &'static str {
        "svm"
    }

    fn predict_proba(&self, x: &FeatureVector) -> f64 {
        let f_apb = self.decision_function(x) * self.platt_a + self.platt_b;
        // numerically stable 1 / (1 + exp(fApB))
        if f_apb >= 0.0 {
            (-f_apb).exp() / (1.0 + (-f_apb).exp())
        } else {
            1.0 / (1.0 + f_apb.exp())
        }
    }
}

/// Fit P(y=1|f) = 1 / (1 + exp(A f + B)) by Newton's method with
/// backtracking (Lin, Lin & Weng's formulation of Platt scaling).
fn fit_platt(decision: &[f64], y: &[f64]) -> (f64, f64) {
    const MAX_ITER: usize = 100;
    const MIN_STEP: f64 = 1e-10;
    const SIGMA: f64 = 1e-12;

    let prior1 = y.iter().filter(|&&v| v > 0.0).count() as f64;
    let prior0 = y.len() as f64 - prior1;
    let hi_target = (prior1 + 1.0) / (prior1 + 2.0);
    let lo_target = 1.0 / (prior0 + 2.0);
    let t: Vec<f64> = y.iter().map(|&v| if v > 0.0 { hi_target } else { lo_target }).collect();

    let objective = |a: f64, b: f64| -> f64 {
        decision
            .iter()
            .zip(t.iter())
            .map(|(&f, &ti)| {
                let f_apb = f * a + b;
                if f_apb >= 0.0 {
                    ti * f_apb + (1.0 + (-f_apb).exp()).ln()
                } else {
                    (ti - 1.0) * f_apb + (1.0 + f_apb.exp()).ln()
                }
            })
            .sum()
    };

    let mut a = 0.0;
    let mut b = ((prior0 + 1.0) / (prior1 + 1.0)).ln();
    let mut fval = objective(a, b);

    for _ in 0..MAX_ITER {
        let (mut h11, mut h22, mut h21) = (SIGMA, SIGMA, 0.0);
        let (mut g1, mut g2) = (0.0, 0.0);

        for (&f, &ti) in decision.iter().zip(t.iter()) {
            let f_apb = f * a + b;
            let (p, q) = if f_apb >= 0.0 {
                let e = (-f_apb).exp();
                (e / (1.0 + e), 1.0 / (1.0 + e))
            } else {
                let e = f_apb.exp();
                (1.0 / (1.0 + e), e / (1.0 + e))
            };
            let d2 = p * q;
            h11 += f * f * d2;
            h22 += d2;
            h21 += f * d2;
            let d1 = ti - p;
            g1 += f * d1;
            g2 += d1;
        }

        if g1.abs() < 1e-5 && g2.abs() < 1e-5 {
            break;
        }

        let det = h11 * h22 - h21 * h21;
        let da = -(h22 * g1 - h21 * g2) / det;
        let db = -(-h21 * g1 + h11 * g2) / det;
        let gd = g1 * da + g2 * db;

        let mut step = 1.0;
        while step >= MIN_STEP {
            let (new_a, new_b) = (a + step * da, b + step * db);
            let new_f = objective(new_a, new_b);
            if new_f < fval + 1e-4 * step * gd {
                a = new_a;
                b = new_b;
                fval = new_f;
                break;
            }
            step /= 2.0;
        }

        if step < MIN_STEP {
            log::debug!("Platt scaling: line search failed");
            break;
        }
    }

    (a, b)
}
