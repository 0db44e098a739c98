use crate::math::gamma::GammaHelper;
use crate::prelude::{check_probability, check_pulses, RocResult};
use crate::processing::mixture::Mixture;

const MAX_THRESHOLD_ITERATIONS: usize = 300;
const THRESHOLD_RELATIVE_TOLERANCE: f64 = 1e-13;
/// Tail table reaches `T + TAIL_SPREAD * sqrt(T) + TAIL_MARGIN`; the noise
/// tail beyond that point is below double precision.
const TAIL_SPREAD: f64 = 40.0;
const TAIL_MARGIN: f64 = 50.0;

/// Square-law detection threshold for a fixed false-alarm probability.
///
/// Holds the threshold `T` solving `Q(M, T) = pfa` for `M` detector samples
/// together with the table `P(M + k, T)`, k = 0, 1, ..., that every Pd
/// evaluation at this (pfa, M) shares.
#[derive(Debug, Clone)]
pub struct NoiseThreshold {
    pfa: f64,
    samples: usize,
    threshold: f64,
    lower_tail: Vec<f64>,
}

impl NoiseThreshold {
    pub fn new(pfa: f64, samples: usize) -> RocResult<Self> {
        check_probability("pfa", pfa)?;
        check_pulses(samples)?;

        let threshold = solve_threshold(pfa, samples);
        let lower_tail = lower_tail_table(samples, threshold);

        Ok(Self {
            pfa,
            samples,
            threshold,
            lower_tail,
        })
    }

    pub fn pfa(&self) -> f64 {
        self.pfa
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Threshold on the noise-normalised statistic `sum |x_i|^2`.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Probability that the statistic exceeds the threshold.
    pub fn detection_probability(&self, mixture: &Mixture) -> f64 {
        // An SNR past f64 range leaves no mass below the threshold.
        if !mixture.mean().is_finite() {
            return 1.0;
        }
        let miss: f64 = mixture
            .ln_weights()
            .zip(self.lower_tail.iter())
            .map(|(ln_weight, &tail)| ln_weight.exp() * tail)
            .sum();
        // Only rounding can push the sum outside [0, 1].
        (1.0 - miss).clamp(0.0, 1.0)
    }
}

/// `Q(samples, threshold)`: noise-only exceedance probability.
pub(crate) fn false_alarm_probability(samples: usize, threshold: f64) -> f64 {
    GammaHelper::poisson_cdf(samples - 1, threshold)
}

fn solve_threshold(pfa: f64, samples: usize) -> f64 {
    let mut lower = 0.0;
    let mut upper = (samples as f64).max(1.0);
    while false_alarm_probability(samples, upper) > pfa {
        lower = upper;
        upper *= 2.0;
    }

    for _ in 0..MAX_THRESHOLD_ITERATIONS {
        let mid = 0.5 * (lower + upper);
        if false_alarm_probability(samples, mid) > pfa {
            lower = mid;
        } else {
            upper = mid;
        }
        if upper - lower <= THRESHOLD_RELATIVE_TOLERANCE * upper {
            break;
        }
    }
    0.5 * (lower + upper)
}

/// `P(samples + k, threshold)` as upper Poisson tails, summed from the far
/// end so no term is formed by cancellation.
fn lower_tail_table(samples: usize, threshold: f64) -> Vec<f64> {
    let reach = (threshold + TAIL_SPREAD * threshold.sqrt() + TAIL_MARGIN).ceil() as usize;
    let last = reach.max(samples);

    let mut table = vec![0.0; last - samples + 1];
    let mut running = 0.0;
    for j in (samples..=last).rev() {
        running += GammaHelper::ln_poisson_pmf(j, threshold).exp();
        table[j - samples] = running;
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_sample_threshold_is_closed_form() {
        let threshold = NoiseThreshold::new(1e-4, 1).unwrap();
        assert!((threshold.threshold() - 1e4f64.ln()).abs() < 1e-10);
    }

    #[test]
    fn threshold_reproduces_false_alarm_rate() {
        for &samples in &[1usize, 2, 10, 128, 1024] {
            for &pfa in &[1e-8, 1e-4, 0.1] {
                let threshold = NoiseThreshold::new(pfa, samples).unwrap();
                let achieved = false_alarm_probability(samples, threshold.threshold());
                assert!(
                    ((achieved - pfa) / pfa).abs() < 1e-9,
                    "samples {} pfa {} achieved {}",
                    samples,
                    pfa,
                    achieved
                );
            }
        }
    }

    #[test]
    fn zero_signal_detects_at_false_alarm_rate() {
        let threshold = NoiseThreshold::new(1e-3, 16).unwrap();
        let pd = threshold.detection_probability(&Mixture::Poisson { mean: 0.0 });
        assert!((pd - 1e-3).abs() < 1e-12);
    }

    #[test]
    fn unbounded_signal_detects_with_certainty() {
        let threshold = NoiseThreshold::new(1e-4, 4).unwrap();
        let poisson = Mixture::Poisson {
            mean: f64::INFINITY,
        };
        let fluctuating = Mixture::NegativeBinomial {
            shape: 2.0,
            scale: f64::INFINITY,
        };
        assert_eq!(threshold.detection_probability(&poisson), 1.0);
        assert_eq!(threshold.detection_probability(&fluctuating), 1.0);
    }

    #[test]
    fn tail_table_is_decreasing() {
        let threshold = NoiseThreshold::new(1e-6, 32).unwrap();
        let table = &threshold.lower_tail;
        assert!(table.windows(2).all(|pair| pair[0] >= pair[1]));
        assert!(*table.last().unwrap() < 1e-100);
    }

    #[test]
    fn rejects_invalid_inputs() {
        assert!(NoiseThreshold::new(0.0, 4).is_err());
        assert!(NoiseThreshold::new(1.5, 4).is_err());
        assert!(NoiseThreshold::new(1e-4, 0).is_err());
    }
}
