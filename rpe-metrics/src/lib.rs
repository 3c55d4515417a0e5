use std::path::PathBuf;

use rpe_core::Real;

pub mod evaluation;
pub mod relative_pose_error;
pub mod statistics;

pub use evaluation::{evaluate, write_pair_errors_csv, RpeReport};
pub use relative_pose_error::{PairError, RelativePoseError, RelativePoseErrorCfg};
pub use statistics::ErrorStatistics;

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("distance threshold must be a positive finite number, got {0}")]
    InvalidDelta(Real),

    #[error("no frame pair passed the distance gate, error statistics are undefined")]
    EmptyErrorSequence,

    #[error("failed to write pair errors to {}: {source}", .path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
