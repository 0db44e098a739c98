pub mod evaluator;
pub mod mixture;
pub mod solver;
pub mod sweep;
pub mod threshold;

pub use evaluator::{
    evaluate, evaluate_broadcast, evaluate_over_pfa, evaluate_over_snr, roc_pd, DetectionCurve,
};
pub use mixture::Mixture;
pub use solver::{roc_snr, solve_snr, SnrSolver, SolverConfig};
pub use sweep::{GainTable, IntegrationGainSweep};
pub use threshold::NoiseThreshold;
