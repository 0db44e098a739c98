use crate::generator::grid::log_spaced;
use crate::generator::montecarlo::{estimate_pd, MonteCarloEstimate};
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use roccore::telemetry::MetricsSnapshot;
use roccore::{evaluate_over_pfa, DetectionModel, GainTable, IntegrationGainSweep, SnrSolver};

/// Pd against Pfa at the SNR that meets the target with all channels.
#[derive(Debug, Clone)]
pub struct RocCurve {
    pub model: DetectionModel,
    pub snr_db: f64,
    pub pfa: Vec<f64>,
    pub pd: Vec<f64>,
}

pub struct WorkflowResult {
    pub table: GainTable,
    pub roc_curves: Vec<RocCurve>,
    pub monte_carlo: Vec<MonteCarloEstimate>,
    pub metrics: MetricsSnapshot,
}

impl WorkflowResult {
    /// Required single-pulse SNR (dB) for `model` with every channel integrated.
    pub fn required_snr(&self, model: DetectionModel) -> Option<f64> {
        let minimum = self.table.minimum_snr(model)?;
        let gain = self.table.gain_curve(model)?;
        gain.iter().next_back().map(|&g| minimum - g)
    }
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn execute(&self) -> anyhow::Result<WorkflowResult> {
        let config = &self.config;
        config.validate().context("validating workflow inputs")?;

        let sweep = IntegrationGainSweep::new(
            config.pfa,
            config.pd,
            config.channels,
            config.models.clone(),
        )
        .with_solver(SnrSolver::with_config(config.solver));
        let table = sweep.run().context("running integration gain sweep")?;
        log::info!(
            "gain sweep finished: {} models x {} channels",
            config.models.len(),
            config.channels
        );

        let mut result = WorkflowResult {
            table,
            roc_curves: Vec::with_capacity(config.models.len()),
            monte_carlo: Vec::new(),
            metrics: sweep.metrics(),
        };

        let pfa_axis = log_spaced(config.limits.min_pfa, config.limits.max_pfa, config.roc_points);
        for &model in &config.models {
            let snr_db = result
                .required_snr(model)
                .context("model missing from gain table")?;
            let pd = evaluate_over_pfa(&pfa_axis, snr_db, config.channels, model)
                .with_context(|| format!("evaluating {} ROC curve", model))?;
            result.roc_curves.push(RocCurve {
                model,
                snr_db,
                pfa: pfa_axis.clone(),
                pd,
            });
        }

        if let Some(mc_config) = &config.monte_carlo {
            for &model in &config.models {
                let snr_db = result
                    .required_snr(model)
                    .context("model missing from gain table")?;
                let estimate = estimate_pd(mc_config, config.pfa, snr_db, config.channels, model)
                    .with_context(|| format!("simulating {}", model))?;
                result.monte_carlo.push(estimate);
            }
        }

        Ok(result)
    }
}
