use anyhow::Context;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, Exp1, Gamma, Normal};
use roccore::{DetectionCurve, DetectionModel};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// Settings for the Monte-Carlo cross-check of the analytic Pd.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonteCarloConfig {
    pub trials: usize,
    pub seed: u64,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            trials: 20_000,
            seed: 0,
        }
    }
}

/// Empirical detection rate next to the analytic value it should match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloEstimate {
    pub model: DetectionModel,
    pub pulses: usize,
    pub snr_db: f64,
    pub trials: usize,
    pub detections: usize,
    pub pd: f64,
    pub analytic_pd: f64,
    /// Binomial standard error of `pd` around `analytic_pd`.
    pub standard_error: f64,
}

impl MonteCarloEstimate {
    /// Deviation from the analytic Pd in standard errors.
    pub fn z_score(&self) -> f64 {
        if self.standard_error > 0.0 {
            (self.pd - self.analytic_pd) / self.standard_error
        } else {
            0.0
        }
    }
}

/// Draws target power for one pulse given the model's fluctuation law.
struct TargetPower {
    model: DetectionModel,
    mean: f64,
    chi4: Gamma<f64>,
    scan: f64,
}

impl TargetPower {
    fn new(model: DetectionModel, mean: f64) -> anyhow::Result<Self> {
        let chi4 = Gamma::new(2.0, 0.5).context("building chi-square(4) power law")?;
        Ok(Self {
            model,
            mean,
            chi4,
            scan: mean,
        })
    }

    fn exponential<R: Rng>(&self, rng: &mut R) -> f64 {
        let draw: f64 = Exp1.sample(rng);
        self.mean * draw
    }

    /// Redraws the per-scan power; called once per trial.
    fn start_scan<R: Rng>(&mut self, rng: &mut R) {
        self.scan = match self.model {
            DetectionModel::Swerling1 => self.exponential(rng),
            DetectionModel::Swerling3 => self.mean * self.chi4.sample(rng),
            DetectionModel::Swerling0
            | DetectionModel::Swerling2
            | DetectionModel::Swerling4
            | DetectionModel::Coherent => self.mean,
        };
    }

    fn pulse<R: Rng>(&self, rng: &mut R) -> f64 {
        match self.model {
            DetectionModel::Swerling2 => self.exponential(rng),
            DetectionModel::Swerling4 => self.mean * self.chi4.sample(rng),
            DetectionModel::Swerling0
            | DetectionModel::Swerling1
            | DetectionModel::Swerling3
            | DetectionModel::Coherent => self.scan,
        }
    }
}

/// Simulates complex baseband pulses in unit-power noise and counts
/// threshold crossings of the same detector the analytic curve describes.
pub fn estimate_pd(
    config: &MonteCarloConfig,
    pfa: f64,
    snr_db: f64,
    pulses: usize,
    model: DetectionModel,
) -> anyhow::Result<MonteCarloEstimate> {
    anyhow::ensure!(config.trials > 0, "monte carlo needs at least one trial");
    let curve = DetectionCurve::new(pfa, pulses, model)
        .with_context(|| format!("building {} detection curve", model))?;
    let analytic_pd = curve
        .pd(snr_db)
        .with_context(|| format!("evaluating {} at {} dB", model, snr_db))?;
    let threshold = curve.threshold();

    let mut rng = StdRng::seed_from_u64(config.seed);
    let noise = Normal::new(0.0, FRAC_1_SQRT_2).context("building noise distribution")?;
    let mut power = TargetPower::new(model, 10f64.powf(snr_db / 10.0))?;

    let mut detections = 0usize;
    for _ in 0..config.trials {
        power.start_scan(&mut rng);
        let phase = rng.gen_range(0.0..2.0 * PI);
        let statistic: f64 = match model {
            DetectionModel::Coherent => {
                let (mut re, mut im) = (0.0, 0.0);
                for _ in 0..pulses {
                    let amplitude = power.pulse(&mut rng).sqrt();
                    re += amplitude * phase.cos() + noise.sample(&mut rng);
                    im += amplitude * phase.sin() + noise.sample(&mut rng);
                }
                (re * re + im * im) / pulses as f64
            }
            _ => (0..pulses)
                .map(|_| {
                    let amplitude = power.pulse(&mut rng).sqrt();
                    let re = amplitude * phase.cos() + noise.sample(&mut rng);
                    let im = amplitude * phase.sin() + noise.sample(&mut rng);
                    re * re + im * im
                })
                .sum(),
        };
        if statistic > threshold {
            detections += 1;
        }
    }

    let trials = config.trials;
    let pd = detections as f64 / trials as f64;
    let standard_error = (analytic_pd * (1.0 - analytic_pd) / trials as f64).sqrt();
    log::debug!(
        "monte carlo {} n={} snr={:.3} dB: {} / {} detections (analytic {:.4})",
        model,
        pulses,
        snr_db,
        detections,
        trials,
        analytic_pd
    );

    Ok(MonteCarloEstimate {
        model,
        pulses,
        snr_db,
        trials,
        detections,
        pd,
        analytic_pd,
        standard_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use roccore::solve_snr;

    fn assert_agrees(estimate: &MonteCarloEstimate) {
        let allowed = 6.0 * estimate.standard_error + 2e-3;
        assert!(
            (estimate.pd - estimate.analytic_pd).abs() < allowed,
            "{} simulated {} analytic {}",
            estimate.model,
            estimate.pd,
            estimate.analytic_pd
        );
    }

    #[test]
    fn simulation_matches_analytic_pd_for_every_model() {
        let config = MonteCarloConfig {
            trials: 20_000,
            seed: 7,
        };
        for model in DetectionModel::ALL {
            let snr_db = solve_snr(1e-2, 0.5, 4, model).unwrap().snr_db;
            let estimate = estimate_pd(&config, 1e-2, snr_db, 4, model).unwrap();
            assert_eq!(estimate.trials, 20_000);
            assert_agrees(&estimate);
        }
    }

    #[test]
    fn noise_only_crossings_follow_false_alarm_rate() {
        let config = MonteCarloConfig {
            trials: 20_000,
            seed: 11,
        };
        let estimate = estimate_pd(&config, 0.05, -300.0, 3, DetectionModel::Swerling0).unwrap();
        assert!((estimate.analytic_pd - 0.05).abs() < 1e-9);
        assert_agrees(&estimate);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let config = MonteCarloConfig {
            trials: 500,
            seed: 3,
        };
        let first = estimate_pd(&config, 1e-3, 8.0, 2, DetectionModel::Swerling3).unwrap();
        let second = estimate_pd(&config, 1e-3, 8.0, 2, DetectionModel::Swerling3).unwrap();
        assert_eq!(first.detections, second.detections);
    }

    #[test]
    fn zero_trials_is_an_error() {
        let config = MonteCarloConfig { trials: 0, seed: 0 };
        assert!(estimate_pd(&config, 1e-3, 8.0, 2, DetectionModel::Swerling3).is_err());
    }
}
