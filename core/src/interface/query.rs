use crate::interface::model::DetectionModel;
use crate::prelude::RocResult;
use crate::processing::evaluator::evaluate;
use crate::processing::solver::SnrSolver;
use serde::{Deserialize, Serialize};

/// Forward query: Pd for a given single-pulse SNR.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DetectionQuery {
    pub pfa: f64,
    pub snr_db: f64,
    pub pulses: usize,
    pub model: DetectionModel,
}

impl DetectionQuery {
    pub fn new(pfa: f64, snr_db: f64, pulses: usize, model: DetectionModel) -> Self {
        Self {
            pfa,
            snr_db,
            pulses,
            model,
        }
    }

    pub fn evaluate(&self) -> RocResult<f64> {
        evaluate(self.pfa, self.snr_db, self.pulses, self.model)
    }
}

/// Inverse query: the single-pulse SNR reaching a target Pd.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct InversionQuery {
    pub pfa: f64,
    pub pd: f64,
    pub pulses: usize,
    pub model: DetectionModel,
}

impl InversionQuery {
    pub fn new(pfa: f64, pd: f64, pulses: usize, model: DetectionModel) -> Self {
        Self {
            pfa,
            pd,
            pulses,
            model,
        }
    }

    pub fn solve(&self, solver: &SnrSolver) -> RocResult<Inversion> {
        solver.solve(self.pfa, self.pd, self.pulses, self.model)
    }
}

/// How a successful inversion terminated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ConvergenceStatus {
    /// Curve evaluations spent after the bracket check.
    pub iterations: usize,
    /// `|Pd(snr_db) - target|` at the returned SNR.
    pub residual: f64,
}

/// Single-pulse SNR in dB that reaches the requested Pd.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Inversion {
    pub snr_db: f64,
    pub status: ConvergenceStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queries_round_trip_through_solver() {
        let inverse = InversionQuery::new(1e-4, 0.5, 4, DetectionModel::Swerling2);
        let inversion = inverse.solve(&SnrSolver::default()).unwrap();
        let forward = DetectionQuery::new(1e-4, inversion.snr_db, 4, DetectionModel::Swerling2);
        let pd = forward.evaluate().unwrap();
        assert!((pd - 0.5).abs() < 1e-6);
        assert!(inversion.status.residual < 1e-6);
    }

    #[test]
    fn query_serializes_model_label() {
        let query = DetectionQuery::new(1e-4, 10.0, 1, DetectionModel::Coherent);
        let json = serde_json::to_value(query).unwrap();
        assert_eq!(json["model"], "Coherent");
        assert_eq!(json["pulses"], 1);
    }
}
