use crate::generator::montecarlo::MonteCarloEstimate;
use crate::workflow::runner::WorkflowResult;
use roccore::DetectionModel;
use serde::{Deserialize, Serialize};

/// One plotted line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlotSeries {
    pub mode: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub name: String,
}

impl PlotSeries {
    pub fn line(name: &str, x: Vec<f64>, y: Vec<f64>) -> Self {
        Self {
            mode: "lines".into(),
            kind: "scatter".into(),
            x,
            y,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Axis {
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FigureLayout {
    pub title: String,
    pub xaxis: Axis,
    pub yaxis: Axis,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Figure {
    pub data: Vec<PlotSeries>,
    pub layout: FigureLayout,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MinimumSnrEntry {
    pub model: DetectionModel,
    pub snr_db: f64,
}

impl MinimumSnrEntry {
    pub fn label(&self) -> String {
        format!("{}: {} dB", self.model, round_to(self.snr_db, 3))
    }
}

/// Everything an offline run produces, ready to be serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RocReport {
    pub pd: f64,
    pub pfa: f64,
    pub channels: usize,
    pub gain_figure: Figure,
    pub roc_figure: Figure,
    pub minimum_snr: Vec<MinimumSnrEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub monte_carlo: Vec<MonteCarloEstimate>,
}

impl RocReport {
    pub fn from_result(result: &WorkflowResult) -> Self {
        let table = &result.table;
        let pulses: Vec<f64> = table.pulses.iter().map(|&n| n as f64).collect();
        let title = format!("Pd = {}, Pfa = {}", table.pd, table.pfa);

        let gain_series = table
            .models
            .iter()
            .zip(table.gain_db.rows())
            .map(|(model, gains)| PlotSeries::line(model.label(), pulses.clone(), gains.to_vec()))
            .collect();

        let roc_series = result
            .roc_curves
            .iter()
            .map(|curve| PlotSeries::line(curve.model.label(), curve.pfa.clone(), curve.pd.clone()))
            .collect();

        let minimum_snr = table
            .models
            .iter()
            .zip(table.minimum_snr_db.iter())
            .map(|(&model, &snr_db)| MinimumSnrEntry { model, snr_db })
            .collect();

        Self {
            pd: table.pd,
            pfa: table.pfa,
            channels: table.pulses.len(),
            gain_figure: Figure {
                data: gain_series,
                layout: FigureLayout {
                    title: title.clone(),
                    xaxis: Axis {
                        title: "Number of Channels".into(),
                    },
                    yaxis: Axis {
                        title: "Integration Gain (dB)".into(),
                    },
                },
            },
            roc_figure: Figure {
                data: roc_series,
                layout: FigureLayout {
                    title,
                    xaxis: Axis {
                        title: "Probability of False Alarm".into(),
                    },
                    yaxis: Axis {
                        title: "Probability of Detection".into(),
                    },
                },
            },
            minimum_snr,
            monte_carlo: result.monte_carlo.clone(),
        }
    }
}

fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::config::WorkflowConfig;
    use crate::workflow::runner::Runner;

    #[test]
    fn minimum_snr_label_is_rounded() {
        let entry = MinimumSnrEntry {
            model: DetectionModel::Swerling1,
            snr_db: 10.894_709_8,
        };
        assert_eq!(entry.label(), "Swerling 1: 10.895 dB");
    }

    #[test]
    fn report_mirrors_gain_table() {
        let cfg = WorkflowConfig::from_args(0.5, 1e-4, 8, Vec::new());
        let result = Runner::new(cfg).execute().unwrap();
        let report = RocReport::from_result(&result);

        assert_eq!(report.gain_figure.layout.title, "Pd = 0.5, Pfa = 0.0001");
        assert_eq!(report.gain_figure.data.len(), 2);
        assert_eq!(report.gain_figure.data[0].name, "Swerling 1");
        assert_eq!(report.gain_figure.data[1].x, (1..=8).map(f64::from).collect::<Vec<_>>());
        assert_eq!(report.roc_figure.data.len(), 2);
        assert_eq!(report.minimum_snr.len(), 2);
        assert_eq!(report.channels, 8);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["gain_figure"]["data"][0]["type"], "scatter");
        assert!(json.get("monte_carlo").is_none());
    }
}
