use crate::interface::model::DetectionModel;
use crate::interface::query::{ConvergenceStatus, Inversion};
use crate::prelude::{
    check_probability, check_pulses, DetectionError, DetectionResponse, RocResult,
};
use crate::processing::evaluator::DetectionCurve;
use crate::telemetry::log::LogManager;
use serde::{Deserialize, Serialize};

/// Search settings for the SNR inversion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SolverConfig {
    /// Lower end of the initial SNR bracket, dB.
    pub lower_db: f64,
    /// Upper end of the initial SNR bracket, dB.
    pub upper_db: f64,
    /// Accepted `|Pd(snr) - target|`.
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            lower_db: -50.0,
            upper_db: 100.0,
            tolerance: 1e-6,
            max_iterations: 200,
        }
    }
}

impl SolverConfig {
    fn validate(&self) -> RocResult<()> {
        if !(self.lower_db.is_finite() && self.upper_db.is_finite()) {
            return Err(DetectionError::Domain("bracket ends must be finite".into()));
        }
        if self.lower_db >= self.upper_db {
            return Err(DetectionError::Domain(format!(
                "bracket lower end {} dB must be below upper end {} dB",
                self.lower_db, self.upper_db
            )));
        }
        if !(self.tolerance > 0.0) {
            return Err(DetectionError::Domain(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Bisection search for the single-pulse SNR that reaches a target Pd.
#[derive(Debug, Clone)]
pub struct SnrSolver {
    config: SolverConfig,
    logger: LogManager,
}

impl SnrSolver {
    pub fn new() -> Self {
        Self::with_config(SolverConfig::default())
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self {
            config,
            logger: LogManager::new("snr-solver"),
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// SNR (dB) such that `evaluate(pfa, snr, pulses, model)` is within
    /// tolerance of `pd`.
    pub fn solve(
        &self,
        pfa: f64,
        pd: f64,
        pulses: usize,
        model: DetectionModel,
    ) -> RocResult<Inversion> {
        check_probability("pfa", pfa)?;
        check_probability("pd", pd)?;
        check_pulses(pulses)?;
        if pd <= pfa {
            return Err(DetectionError::Domain(format!(
                "target pd {} is unreachable at pfa {}",
                pd, pfa
            )));
        }

        let curve = DetectionCurve::new(pfa, pulses, model)?;
        let inversion = self.invert(&curve, pd)?;
        self.logger.detail(&format!(
            "{} n={} pfa={:e} pd={} -> {:.4} dB in {} iterations",
            model, pulses, pfa, pd, inversion.snr_db, inversion.status.iterations
        ));
        Ok(inversion)
    }

    /// Inverts any non-decreasing Pd curve at `target`.
    pub fn invert<R>(&self, response: &R, target: f64) -> RocResult<Inversion>
    where
        R: DetectionResponse + ?Sized,
    {
        self.config.validate()?;
        let tolerance = self.config.tolerance;
        let mut lower = self.config.lower_db;
        let mut upper = self.config.upper_db;

        let pd_lower = response.probability(lower);
        let pd_upper = response.probability(upper);
        for (snr_db, pd) in [(lower, pd_lower), (upper, pd_upper)] {
            let residual = (pd - target).abs();
            if residual < tolerance {
                return Ok(Inversion {
                    snr_db,
                    status: ConvergenceStatus {
                        iterations: 0,
                        residual,
                    },
                });
            }
        }
        if !(pd_lower < target && target < pd_upper) {
            return Err(DetectionError::Bracket {
                lower_db: lower,
                upper_db: upper,
                pd_lower,
                pd_upper,
                target,
            });
        }

        let mut best_snr_db = lower;
        let mut best_residual = (pd_lower - target).abs();
        for iteration in 1..=self.config.max_iterations {
            let mid = 0.5 * (lower + upper);
            let error = response.probability(mid) - target;
            let residual = error.abs();
            if residual < tolerance {
                return Ok(Inversion {
                    snr_db: mid,
                    status: ConvergenceStatus {
                        iterations: iteration,
                        residual,
                    },
                });
            }
            if residual < best_residual {
                best_snr_db = mid;
                best_residual = residual;
            }
            if error < 0.0 {
                lower = mid;
            } else {
                upper = mid;
            }
        }

        self.logger.warning(&format!(
            "bisection stopped after {} iterations at {:.6} dB (residual {:e})",
            self.config.max_iterations, best_snr_db, best_residual
        ));
        Err(DetectionError::Convergence {
            iterations: self.config.max_iterations,
            best_snr_db,
            residual: best_residual,
        })
    }
}

impl Default for SnrSolver {
    fn default() -> Self {
        Self::new()
    }
}

/// SNR inversion with the default search settings.
pub fn solve_snr(pfa: f64, pd: f64, pulses: usize, model: DetectionModel) -> RocResult<Inversion> {
    SnrSolver::default().solve(pfa, pd, pulses, model)
}

/// Same as [`solve_snr`] with the model given by its label, e.g. `"Swerling 3"`.
pub fn roc_snr(pfa: f64, pd: f64, pulses: usize, model: &str) -> RocResult<Inversion> {
    solve_snr(pfa, pd, pulses, model.parse()?)
}
