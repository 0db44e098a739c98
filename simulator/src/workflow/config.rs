use crate::generator::montecarlo::MonteCarloConfig;
use anyhow::{ensure, Context};
use roccore::{DetectionModel, SolverConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Accepted input ranges; anything outside is rejected before solving.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputLimits {
    pub min_pd: f64,
    pub max_pd: f64,
    pub min_pfa: f64,
    pub max_pfa: f64,
    pub max_channels: usize,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            min_pd: 0.01,
            max_pd: 0.9999,
            min_pfa: 1e-8,
            max_pfa: 0.1,
            max_channels: 1024,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub pd: f64,
    pub pfa: f64,
    pub channels: usize,
    pub models: Vec<DetectionModel>,
    /// Points on the log-spaced Pfa axis of the ROC curves.
    pub roc_points: usize,
    pub limits: InputLimits,
    pub solver: SolverConfig,
    pub monte_carlo: Option<MonteCarloConfig>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            pd: 0.5,
            pfa: 1e-4,
            channels: 128,
            models: vec![DetectionModel::Swerling1, DetectionModel::Swerling3],
            roc_points: 50,
            limits: InputLimits::default(),
            solver: SolverConfig::default(),
            monte_carlo: None,
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Empty `models` keeps the default selection.
    pub fn from_args(pd: f64, pfa: f64, channels: usize, models: Vec<DetectionModel>) -> Self {
        let defaults = Self::default();
        Self {
            pd,
            pfa,
            channels,
            models: if models.is_empty() {
                defaults.models.clone()
            } else {
                models
            },
            ..defaults
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let limits = &self.limits;
        ensure!(
            self.pd >= limits.min_pd && self.pd <= limits.max_pd,
            "pd {} outside [{}, {}]",
            self.pd,
            limits.min_pd,
            limits.max_pd
        );
        ensure!(
            self.pfa >= limits.min_pfa && self.pfa <= limits.max_pfa,
            "pfa {} outside [{}, {}]",
            self.pfa,
            limits.min_pfa,
            limits.max_pfa
        );
        ensure!(
            self.pd > self.pfa,
            "pd {} must exceed pfa {}",
            self.pd,
            self.pfa
        );
        ensure!(
            self.channels >= 1 && self.channels <= limits.max_channels,
            "channels {} outside [1, {}]",
            self.channels,
            limits.max_channels
        );
        ensure!(self.roc_points >= 2, "roc_points must be at least 2");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_keeps_default_models() {
        let cfg = WorkflowConfig::from_args(0.9, 1e-6, 64, Vec::new());
        assert_eq!(
            cfg.models,
            vec![DetectionModel::Swerling1, DetectionModel::Swerling3]
        );
        assert_eq!(cfg.channels, 64);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"pd: 0.9\npfa: 0.000001\nchannels: 32\nmodels: [\"Swerling 0\", \"Coherent\"]\nsolver:\n  tolerance: 0.0000001\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.channels, 32);
        assert_eq!(
            cfg.models,
            vec![DetectionModel::Swerling0, DetectionModel::Coherent]
        );
        assert_eq!(cfg.solver.tolerance, 1e-7);
        assert_eq!(cfg.solver.max_iterations, 200);
        assert_eq!(cfg.limits, InputLimits::default());
        assert!(cfg.monte_carlo.is_none());
    }

    #[test]
    fn config_load_rejects_unknown_model() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"models: [\"Swerling 7\"]\n").unwrap();
        let path = temp.into_temp_path();
        assert!(WorkflowConfig::load(&path).is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_inputs() {
        let mut cfg = WorkflowConfig::default();
        cfg.pd = 0.99999;
        assert!(cfg.validate().is_err());

        let mut cfg = WorkflowConfig::default();
        cfg.pfa = 0.2;
        assert!(cfg.validate().is_err());

        let mut cfg = WorkflowConfig::default();
        cfg.channels = 0;
        assert!(cfg.validate().is_err());
        cfg.channels = 2048;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_pd_at_or_below_pfa() {
        let cfg = WorkflowConfig::from_args(0.01, 0.1, 16, Vec::new());
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("must exceed pfa"));

        let cfg = WorkflowConfig::from_args(0.1, 0.1, 16, Vec::new());
        assert!(cfg.validate().is_err());
    }
}
