use clap::Parser;
use generator::montecarlo::MonteCarloConfig;
use report::model::RocReport;
use report::writer::write_report;
use roccore::{DetectionError, DetectionModel};
use std::path::PathBuf;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod report;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Offline ROC integration-gain driver")]
struct Args {
    /// Load a workflow config from YAML (overrides --pd/--pfa/--channels/--model)
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Target probability of detection
    #[arg(long, default_value_t = 0.5)]
    pd: f64,
    /// Probability of false alarm
    #[arg(long, default_value_t = 1e-4)]
    pfa: f64,
    /// Number of integrated channels
    #[arg(long, default_value_t = 128)]
    channels: usize,
    /// Target model label, e.g. "Swerling 1"; repeat for several
    #[arg(long = "model", value_parser = parse_model)]
    models: Vec<DetectionModel>,
    /// Where to write the JSON report
    #[arg(long, default_value = "tools/data/roc_report.json")]
    report: PathBuf,
    /// Cross-check every model with a Monte-Carlo simulation
    #[arg(long, default_value_t = false)]
    monte_carlo: bool,
    #[arg(long, default_value_t = 20_000)]
    trials: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn parse_model(tag: &str) -> Result<DetectionModel, String> {
    tag.parse()
        .map_err(|err: DetectionError| err.to_string())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut workflow_config = if let Some(path) = &args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(args.pd, args.pfa, args.channels, args.models.clone())
    };
    if args.monte_carlo {
        workflow_config.monte_carlo = Some(MonteCarloConfig {
            trials: args.trials,
            seed: args.seed,
        });
    }

    let runner = Runner::new(workflow_config);
    let result = runner.execute()?;
    let report = RocReport::from_result(&result);
    let channels = runner.config().channels;

    println!("Single Channel Minimal SNR");
    for entry in &report.minimum_snr {
        println!("  {}", entry.label());
    }
    for series in &report.gain_figure.data {
        if let Some(gain) = series.y.last() {
            println!(
                "Integration gain {} at N = {}: {:.3} dB",
                series.name, channels, gain
            );
        }
    }
    for estimate in &report.monte_carlo {
        println!(
            "Monte Carlo {} at {:.3} dB: Pd {:.4} (analytic {:.4}, z = {:.2})",
            estimate.model,
            estimate.snr_db,
            estimate.pd,
            estimate.analytic_pd,
            estimate.z_score()
        );
    }
    println!(
        "{} solves, {} bisection steps",
        result.metrics.solved, result.metrics.iterations
    );

    write_report(&args.report, &report)?;
    println!("Report written to {}", args.report.display());

    Ok(())
}
