use crate::interface::model::DetectionModel;
use crate::prelude::{check_pulses, RocResult};
use crate::processing::solver::SnrSolver;
use crate::telemetry::log::LogManager;
use crate::telemetry::metrics::{MetricsRecorder, MetricsSnapshot};
use ndarray::{Array2, ArrayView1};
use rayon::prelude::*;

/// Non-coherent integration gain per model over pulse counts `1..=N`.
#[derive(Debug, Clone)]
pub struct GainTable {
    pub pfa: f64,
    pub pd: f64,
    pub models: Vec<DetectionModel>,
    pub pulses: Vec<usize>,
    /// Single-pulse SNR (dB) reaching `pd`, one entry per model.
    pub minimum_snr_db: Vec<f64>,
    /// `minimum_snr_db[m] - required_snr(pulses[j])`; rows follow `models`.
    pub gain_db: Array2<f64>,
}

impl GainTable {
    fn row_of(&self, model: DetectionModel) -> Option<usize> {
        self.models.iter().position(|&m| m == model)
    }

    pub fn gain_curve(&self, model: DetectionModel) -> Option<ArrayView1<'_, f64>> {
        self.row_of(model).map(|row| self.gain_db.row(row))
    }

    pub fn minimum_snr(&self, model: DetectionModel) -> Option<f64> {
        self.row_of(model).map(|row| self.minimum_snr_db[row])
    }
}

/// Solves the required SNR for every (model, pulse count) pair in parallel
/// and reports it as gain over the single-pulse requirement.
pub struct IntegrationGainSweep {
    pfa: f64,
    pd: f64,
    max_pulses: usize,
    models: Vec<DetectionModel>,
    solver: SnrSolver,
    metrics: MetricsRecorder,
    logger: LogManager,
}

impl IntegrationGainSweep {
    pub fn new(pfa: f64, pd: f64, max_pulses: usize, models: Vec<DetectionModel>) -> Self {
        Self {
            pfa,
            pd,
            max_pulses,
            models,
            solver: SnrSolver::default(),
            metrics: MetricsRecorder::new(),
            logger: LogManager::new("gain-sweep"),
        }
    }

    pub fn with_solver(mut self, solver: SnrSolver) -> Self {
        self.solver = solver;
        self
    }

    /// Counters of the most recent `run`.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn run(&self) -> RocResult<GainTable> {
        self.metrics.reset();
        check_pulses(self.max_pulses)?;
        let rows = self.models.len();
        let columns = self.max_pulses;

        let points: Vec<(usize, usize)> = (0..rows)
            .flat_map(|row| (1..=columns).map(move |pulses| (row, pulses)))
            .collect();
        let solved: Vec<RocResult<f64>> = points
            .par_iter()
            .map(|&(row, pulses)| self.solve_point(self.models[row], pulses))
            .collect();

        let mut required = Array2::<f64>::zeros((rows, columns));
        for (&(row, pulses), snr_db) in points.iter().zip(solved) {
            required[[row, pulses - 1]] = snr_db?;
        }

        let minimum_snr_db = required.column(0).to_vec();
        let gain_db = Array2::from_shape_fn((rows, columns), |(row, col)| {
            minimum_snr_db[row] - required[[row, col]]
        });

        let snapshot = self.metrics.snapshot();
        self.logger.record(&format!(
            "swept {} models x {} pulse counts: {} solves, {} iterations",
            rows, columns, snapshot.solved, snapshot.iterations
        ));

        Ok(GainTable {
            pfa: self.pfa,
            pd: self.pd,
            models: self.models.clone(),
            pulses: (1..=columns).collect(),
            minimum_snr_db,
            gain_db,
        })
    }

    fn solve_point(&self, model: DetectionModel, pulses: usize) -> RocResult<f64> {
        match self.solver.solve(self.pfa, self.pd, pulses, model) {
            Ok(inversion) => {
                self.metrics.record_solved(inversion.status.iterations);
                Ok(inversion.snr_db)
            }
            Err(err) => {
                self.metrics.record_error();
                Err(err)
            }
        }
    }
}
