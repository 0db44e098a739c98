use crate::interface::model::DetectionModel;

/// Law of the mixing count `K` behind a detection statistic.
///
/// Conditional on `K = k` the noise-normalised square-law statistic is
/// `Gamma(M + k, 1)`, `M` being the number of detector samples. A steady
/// target gives a Poisson count (the series form of the generalized Marcum
/// Q-function); averaging it over a chi-square target power gives a negative
/// binomial count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mixture {
    Poisson { mean: f64 },
    NegativeBinomial { shape: f64, scale: f64 },
}

impl Mixture {
    /// Mixing law for `pulses` pulses at linear single-pulse SNR `snr`.
    pub fn for_model(model: DetectionModel, pulses: usize, snr: f64) -> Self {
        let n = pulses as f64;
        match model {
            DetectionModel::Swerling0 | DetectionModel::Coherent => {
                Mixture::Poisson { mean: n * snr }
            }
            DetectionModel::Swerling1 => Mixture::NegativeBinomial {
                shape: 1.0,
                scale: n * snr,
            },
            DetectionModel::Swerling2 => Mixture::NegativeBinomial {
                shape: n,
                scale: snr,
            },
            DetectionModel::Swerling3 => Mixture::NegativeBinomial {
                shape: 2.0,
                scale: n * snr / 2.0,
            },
            DetectionModel::Swerling4 => Mixture::NegativeBinomial {
                shape: 2.0 * n,
                scale: snr / 2.0,
            },
        }
    }

    /// Expected count; equal to the total integrated SNR for every model.
    pub fn mean(&self) -> f64 {
        match *self {
            Mixture::Poisson { mean } => mean,
            Mixture::NegativeBinomial { shape, scale } => shape * scale,
        }
    }

    /// `ln P[K = k]` for `k = 0, 1, 2, ...`.
    pub fn ln_weights(&self) -> LnWeights {
        match *self {
            Mixture::Poisson { mean } => LnWeights {
                k: 0,
                current: -mean,
                ln_ratio: mean.ln(),
                shape: None,
            },
            Mixture::NegativeBinomial { shape, scale } => {
                let ln_one_plus = scale.ln_1p();
                LnWeights {
                    k: 0,
                    current: -shape * ln_one_plus,
                    ln_ratio: scale.ln() - ln_one_plus,
                    shape: Some(shape),
                }
            }
        }
    }
}

/// Log-probabilities of a [`Mixture`], produced by the ratio recurrence
/// `w(k+1) / w(k)`.
#[derive(Debug, Clone)]
pub struct LnWeights {
    k: usize,
    current: f64,
    ln_ratio: f64,
    shape: Option<f64>,
}

impl Iterator for LnWeights {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        let value = self.current;
        let next_k = (self.k + 1) as f64;
        let step = match self.shape {
            None => self.ln_ratio - next_k.ln(),
            Some(shape) => self.ln_ratio + (shape + self.k as f64).ln() - next_k.ln(),
        };
        self.current += step;
        self.k += 1;
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::gamma::GammaHelper;

    #[test]
    fn poisson_weights_follow_pmf() {
        let mixture = Mixture::Poisson { mean: 12.5 };
        for (k, ln_w) in mixture.ln_weights().take(60).enumerate() {
            let expected = GammaHelper::ln_poisson_pmf(k, 12.5);
            assert!((ln_w - expected).abs() < 1e-11, "k = {}", k);
        }
    }

    #[test]
    fn negative_binomial_weights_sum_to_one() {
        let mixture = Mixture::NegativeBinomial {
            shape: 2.0,
            scale: 3.0,
        };
        let total: f64 = mixture.ln_weights().take(400).map(f64::exp).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn shape_one_is_geometric() {
        let mixture = Mixture::NegativeBinomial {
            shape: 1.0,
            scale: 4.0,
        };
        let q: f64 = 4.0 / 5.0;
        for (k, ln_w) in mixture.ln_weights().take(10).enumerate() {
            let expected = (0.2 * q.powi(k as i32)).ln();
            assert!((ln_w - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn zero_snr_puts_all_mass_at_zero() {
        for model in DetectionModel::ALL {
            let weights: Vec<f64> = Mixture::for_model(model, 8, 0.0)
                .ln_weights()
                .take(3)
                .map(f64::exp)
                .collect();
            assert_eq!(weights, vec![1.0, 0.0, 0.0], "{}", model);
        }
    }

    #[test]
    fn every_model_integrates_the_same_mean_snr() {
        for model in DetectionModel::ALL {
            let mean = Mixture::for_model(model, 16, 0.5).mean();
            assert!((mean - 8.0).abs() < 1e-12, "{}", model);
        }
    }
}
