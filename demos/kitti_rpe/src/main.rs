use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use rpe_dataset_reader::KittiPoseReader;
use rpe_metrics::{evaluate, write_pair_errors_csv, RelativePoseErrorCfg};
use serde::Deserialize;

/// Translational Relative Pose Error between a ground truth and an estimated KITTI trajectory.
///
/// A frame pair counts only if the ground truth moved at least `--delta` meters in that
/// single step; distance is not accumulated across frames.
#[derive(Parser, Debug)]
#[command(name = "kitti_rpe", version)]
struct Args {
    /// Ground truth poses in KITTI format.
    #[arg(long, value_name = "PATH")]
    ground_truth: Option<PathBuf>,

    /// Estimated poses in KITTI format.
    #[arg(long, value_name = "PATH")]
    estimate: Option<PathBuf>,

    /// Minimum ground truth step length in meters.
    #[arg(long, value_name = "METERS")]
    delta: Option<f64>,

    /// YAML file providing defaults for the options above.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the per-pair errors as CSV.
    #[arg(long, value_name = "FILE")]
    errors_csv: Option<PathBuf>,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
struct EvaluationCfg {
    ground_truth: PathBuf,
    estimate: PathBuf,
    delta: f64,
    errors_csv: Option<PathBuf>,
}

impl Default for EvaluationCfg {
    fn default() -> Self {
        EvaluationCfg {
            ground_truth: PathBuf::from("datasets/KITTI/poses/00.txt"),
            estimate: PathBuf::from("CameraTrajectory.txt"),
            delta: RelativePoseErrorCfg::default().delta,
            errors_csv: None,
        }
    }
}

impl EvaluationCfg {
    fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Command line flags take precedence over the config file, which takes precedence over
    /// the defaults.
    fn resolve(args: Args) -> Result<Self> {
        let mut cfg = match &args.config {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };

        if let Some(ground_truth) = args.ground_truth {
            cfg.ground_truth = ground_truth;
        }
        if let Some(estimate) = args.estimate {
            cfg.estimate = estimate;
        }
        if let Some(delta) = args.delta {
            cfg.delta = delta;
        }
        if args.errors_csv.is_some() {
            cfg.errors_csv = args.errors_csv;
        }
        Ok(cfg)
    }
}

fn run(cfg: EvaluationCfg) -> Result<()> {
    log::debug!("evaluation config: {cfg:?}");

    let rpe = RelativePoseErrorCfg { delta: cfg.delta }.finalize()?;

    let ground_truth = KittiPoseReader::new(&cfg.ground_truth).load_poses()?;
    let estimate = KittiPoseReader::new(&cfg.estimate).load_poses()?;

    let report = evaluate(ground_truth, estimate, &rpe).with_context(|| {
        format!(
            "cannot evaluate {} against {} with delta {} m",
            cfg.estimate.display(),
            cfg.ground_truth.display(),
            cfg.delta
        )
    })?;

    if let Some(path) = &cfg.errors_csv {
        write_pair_errors_csv(path, &report.pairs)?;
    }

    println!("{report}");
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cfg = EvaluationCfg::resolve(Args::parse())?;
    run(cfg)
}
