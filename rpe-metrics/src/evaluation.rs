use std::{fmt, path::Path};

use rpe_core::{truncate_to_common_length, Real, Trajectory};

use crate::{
    relative_pose_error::{PairError, RelativePoseError},
    statistics::ErrorStatistics,
    MetricsError,
};

#[derive(Debug, Clone)]
pub struct RpeReport {
    pub delta: Real,
    /// Frames compared after truncating both trajectories to a common length.
    pub frames: usize,
    pub pairs: Vec<PairError>,
    pub statistics: ErrorStatistics,
}

/// Compares `estimate` against `ground_truth` frame by frame.
///
/// Both trajectories are truncated to the shorter length first, so frame `i` of
/// one is always compared with frame `i` of the other.
pub fn evaluate(
    mut ground_truth: Trajectory,
    mut estimate: Trajectory,
    rpe: &RelativePoseError,
) -> Result<RpeReport, MetricsError> {
    let (gt_len, est_len) = (ground_truth.len(), estimate.len());
    let frames = truncate_to_common_length(&mut ground_truth, &mut estimate);
    if gt_len != est_len {
        log::warn!(
            "trajectory lengths differ (ground truth {gt_len}, estimate {est_len}), comparing the first {frames} frames"
        );
    }

    let pairs = rpe.compute_pairs(&ground_truth, &estimate);
    log::info!(
        "{} of {} frame pairs passed the {} m gate",
        pairs.len(),
        frames.saturating_sub(1),
        rpe.delta()
    );

    let errors: Vec<Real> = pairs.iter().map(|pair| pair.error).collect();
    let statistics = ErrorStatistics::from_errors(&errors)?;
    log::info!(
        "median error {:.6} m over {} pairs",
        statistics.median,
        statistics.count
    );

    Ok(RpeReport {
        delta: rpe.delta(),
        frames,
        pairs,
        statistics,
    })
}

impl fmt::Display for RpeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = &self.statistics;
        writeln!(f, "RPE Statistics (delta={}m):", self.delta)?;
        writeln!(f, "RMSE: {:.6} m", stats.rmse)?;
        writeln!(f, "Mean: {:.6} m", stats.mean)?;
        writeln!(f, "Std:  {:.6} m", stats.std)?;
        writeln!(f, "Max:  {:.6} m", stats.max)?;
        write!(f, "Min:  {:.6} m", stats.min)
    }
}

/// Writes one `index,gt_distance,error` row per evaluated frame pair.
pub fn write_pair_errors_csv<P: AsRef<Path>>(
    path: P,
    pairs: &[PairError],
) -> Result<(), MetricsError> {
    let path = path.as_ref();
    let export_err = |source| MetricsError::Export {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(export_err)?;
    for pair in pairs {
        writer.serialize(pair).map_err(export_err)?;
    }
    writer.flush().map_err(|e| export_err(e.into()))?;

    log::info!("wrote {} pair errors to {}", pairs.len(), path.display());
    Ok(())
}
