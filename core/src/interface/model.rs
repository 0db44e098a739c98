use crate::prelude::DetectionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Statistical target model selecting the Pd formula family.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DetectionModel {
    /// Non-fluctuating target.
    #[serde(rename = "Swerling 0")]
    Swerling0,
    /// Scan-to-scan fluctuation, chi-square with 2 degrees of freedom.
    #[serde(rename = "Swerling 1")]
    Swerling1,
    /// Pulse-to-pulse fluctuation, chi-square with 2 degrees of freedom.
    #[serde(rename = "Swerling 2")]
    Swerling2,
    /// Scan-to-scan fluctuation, chi-square with 4 degrees of freedom.
    #[serde(rename = "Swerling 3")]
    Swerling3,
    /// Pulse-to-pulse fluctuation, chi-square with 4 degrees of freedom.
    #[serde(rename = "Swerling 4")]
    Swerling4,
    /// Non-fluctuating target with the pulses summed before detection.
    Coherent,
}

impl DetectionModel {
    pub const ALL: [DetectionModel; 6] = [
        DetectionModel::Swerling0,
        DetectionModel::Swerling1,
        DetectionModel::Swerling2,
        DetectionModel::Swerling3,
        DetectionModel::Swerling4,
        DetectionModel::Coherent,
    ];

    pub const FLUCTUATING: [DetectionModel; 4] = [
        DetectionModel::Swerling1,
        DetectionModel::Swerling2,
        DetectionModel::Swerling3,
        DetectionModel::Swerling4,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DetectionModel::Swerling0 => "Swerling 0",
            DetectionModel::Swerling1 => "Swerling 1",
            DetectionModel::Swerling2 => "Swerling 2",
            DetectionModel::Swerling3 => "Swerling 3",
            DetectionModel::Swerling4 => "Swerling 4",
            DetectionModel::Coherent => "Coherent",
        }
    }

    /// Number of samples reaching the square-law detector for `pulses` pulses.
    pub fn detector_samples(&self, pulses: usize) -> usize {
        match self {
            DetectionModel::Coherent => 1,
            DetectionModel::Swerling0
            | DetectionModel::Swerling1
            | DetectionModel::Swerling2
            | DetectionModel::Swerling3
            | DetectionModel::Swerling4 => pulses,
        }
    }
}

impl fmt::Display for DetectionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DetectionModel {
    type Err = DetectionError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        DetectionModel::ALL
            .iter()
            .copied()
            .find(|model| model.label() == tag)
            .ok_or_else(|| DetectionError::UnsupportedModel(tag.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_back_to_models() {
        for model in DetectionModel::ALL {
            assert_eq!(model.label().parse::<DetectionModel>(), Ok(model));
        }
    }

    #[test]
    fn unknown_label_is_unsupported() {
        let err = "Unknown".parse::<DetectionModel>().unwrap_err();
        assert_eq!(err, DetectionError::UnsupportedModel("Unknown".into()));
        assert!("swerling 1".parse::<DetectionModel>().is_err());
    }

    #[test]
    fn serde_uses_dashboard_labels() {
        let json = serde_json::to_string(&DetectionModel::Swerling3).unwrap();
        assert_eq!(json, "\"Swerling 3\"");
        let model: DetectionModel = serde_json::from_str("\"Coherent\"").unwrap();
        assert_eq!(model, DetectionModel::Coherent);
    }

    #[test]
    fn only_coherent_collapses_pulses() {
        assert_eq!(DetectionModel::Coherent.detector_samples(64), 1);
        assert_eq!(DetectionModel::Swerling2.detector_samples(64), 64);
    }
}
