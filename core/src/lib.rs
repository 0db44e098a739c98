//! Detection-theory core for radar ROC analysis.
//!
//! Computes the probability of detection of a square-law detector for the
//! Swerling 0-4 target models and for coherent integration, and inverts it
//! for the single-pulse SNR needed to reach a given Pd. SNR is always the
//! single-pulse signal-to-noise ratio in dB.

pub mod interface;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use interface::{ConvergenceStatus, DetectionModel, DetectionQuery, Inversion, InversionQuery};
pub use prelude::{DetectionError, DetectionResponse, Operand, RocResult};
pub use processing::{
    evaluate, evaluate_broadcast, evaluate_over_pfa, evaluate_over_snr, roc_pd, roc_snr,
    solve_snr, DetectionCurve, GainTable, IntegrationGainSweep, SnrSolver, SolverConfig,
};
