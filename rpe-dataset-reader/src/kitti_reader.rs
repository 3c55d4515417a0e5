use rpe_core::{Position, Real, Trajectory};
use std::{
    io::BufRead,
    num::ParseFloatError,
    path::{Path, PathBuf},
};

/// Number of values in a KITTI pose line: a row-major 3x4 `[R | t]` matrix.
pub const POSE_FIELDS: usize = 12;

/// Flattened positions of the translation column.
const TRANSLATION_INDICES: [usize; 3] = [3, 7, 11];

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("failed to read pose file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: invalid number {token:?}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        token: String,
        #[source]
        source: ParseFloatError,
    },
}

/// Reads a KITTI odometry pose file (`poses/XX.txt`, or an estimate written in the same format)
/// into the sequence of camera positions.
///
/// Lines that are blank or start with `#` are ignored. Lines with fewer than twelve
/// fields are skipped without error. A line with twelve or more fields must be fully
/// numeric, otherwise reading fails.
pub struct KittiPoseReader {
    poses_path: PathBuf,
}

impl KittiPoseReader {
    pub fn new<P: AsRef<Path>>(poses_path: P) -> Self {
        KittiPoseReader {
            poses_path: poses_path.as_ref().to_path_buf(),
        }
    }

    pub fn load_poses(&self) -> Result<Trajectory, ReadError> {
        let file = std::fs::File::open(&self.poses_path).map_err(|source| ReadError::Io {
            path: self.poses_path.clone(),
            source,
        })?;
        let file = std::io::BufReader::new(file);

        let trajectory = parse_poses(file, &self.poses_path)?;
        log::info!(
            "loaded {} poses from {}",
            trajectory.len(),
            self.poses_path.display()
        );
        Ok(trajectory)
    }
}

/// Parses KITTI pose lines from any buffered source. `path` is only used in error messages.
pub fn parse_poses<R: BufRead>(reader: R, path: &Path) -> Result<Trajectory, ReadError> {
    let mut trajectory = Trajectory::default();
    let mut skipped = 0usize;

    for (number, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| ReadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < POSE_FIELDS {
            skipped += 1;
            continue;
        }

        let values = tokens
            .iter()
            .map(|token| {
                token.parse::<Real>().map_err(|source| ReadError::Parse {
                    path: path.to_path_buf(),
                    line: number + 1,
                    token: token.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<Real>, _>>()?;

        let [x, y, z] = TRANSLATION_INDICES.map(|i| values[i]);
        trajectory.push(Position::new(x, y, z));
    }

    if skipped > 0 {
        log::debug!(
            "{}: skipped {skipped} lines with fewer than {POSE_FIELDS} fields",
            path.display()
        );
    }
    Ok(trajectory)
}
