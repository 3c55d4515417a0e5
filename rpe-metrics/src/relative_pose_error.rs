//! Translational Relative Pose Error over single frame steps.
//!
//! A frame pair `(i - 1, i)` is evaluated only if the ground truth moved at least
//! `delta` meters in that one step. This is a per-step gate: the distance is not
//! accumulated since the last evaluated frame, so results are not directly
//! comparable with tools (evo, the KITTI devkit) that pair frames by accumulated
//! path length. Slow segments where every step is shorter than `delta` produce no
//! samples at all.

use rpe_core::{Real, Trajectory};
use serde::Serialize;

use crate::MetricsError;

#[derive(Debug, Clone)]
pub struct RelativePoseErrorCfg {
    /// Minimum ground truth step length in meters for a pair to be evaluated.
    pub delta: Real,
}

impl Default for RelativePoseErrorCfg {
    fn default() -> Self {
        Self { delta: 1.0 }
    }
}

impl RelativePoseErrorCfg {
    pub fn finalize(self) -> Result<RelativePoseError, MetricsError> {
        if !self.delta.is_finite() || self.delta <= 0.0 {
            return Err(MetricsError::InvalidDelta(self.delta));
        }
        Ok(RelativePoseError { delta: self.delta })
    }
}

/// Error sample for one gated-in frame pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PairError {
    /// Index of the later frame of the pair.
    pub index: usize,
    /// Ground truth displacement between the two frames.
    pub gt_distance: Real,
    /// Norm of the difference between ground truth and estimated displacement.
    pub error: Real,
}

#[derive(Debug, Clone)]
pub struct RelativePoseError {
    delta: Real,
}

impl RelativePoseError {
    pub fn delta(&self) -> Real {
        self.delta
    }

    /// Per-pair errors in ascending frame order.
    ///
    /// Both trajectories must have the same length; callers truncate them first
    /// (see [`rpe_core::truncate_to_common_length`]).
    ///
    /// # Panics
    ///
    /// Panics if the trajectories differ in length.
    pub fn compute_pairs(
        &self,
        ground_truth: &Trajectory,
        estimate: &Trajectory,
    ) -> Vec<PairError> {
        assert_eq!(
            ground_truth.len(),
            estimate.len(),
            "trajectories must be truncated to a common length before computing RPE"
        );

        ground_truth
            .steps()
            .zip(estimate.steps())
            .filter_map(|((index, gt_previous, gt_current), (_, est_previous, est_current))| {
                let gt_relative = gt_current - gt_previous;
                let gt_distance = gt_relative.norm();
                if gt_distance.is_nan() || gt_distance < self.delta {
                    return None;
                }

                let est_relative = est_current - est_previous;
                Some(PairError {
                    index,
                    gt_distance,
                    error: (gt_relative - est_relative).norm(),
                })
            })
            .collect()
    }

    /// The error sequence: one value per gated-in pair.
    pub fn compute(&self, ground_truth: &Trajectory, estimate: &Trajectory) -> Vec<Real> {
        self.compute_pairs(ground_truth, estimate)
            .into_iter()
            .map(|pair| pair.error)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpe_core::Position;

    fn trajectory(points: &[[Real; 3]]) -> Trajectory {
        points
            .iter()
            .map(|p| Position::new(p[0], p[1], p[2]))
            .collect()
    }

    fn calculator(delta: Real) -> RelativePoseError {
        RelativePoseErrorCfg { delta }.finalize().unwrap()
    }

    fn wobbly(n: usize) -> (Trajectory, Trajectory) {
        let gt = (0..n)
            .map(|i| {
                let t = i as Real;
                Position::new(1.3 * t, (0.7 * t).sin() * 2.0, 0.25 * t)
            })
            .collect();
        let est = (0..n)
            .map(|i| {
                let t = i as Real;
                Position::new(1.3 * t + 0.01 * t * t, (0.7 * t).sin() * 2.1, 0.2 * t)
            })
            .collect();
        (gt, est)
    }

    #[test]
    fn test_default_delta_is_one_meter() {
        let rpe = RelativePoseErrorCfg::default().finalize().unwrap();
        assert_eq!(rpe.delta(), 1.0);
    }

    #[test]
    fn test_invalid_delta_is_rejected() {
        for delta in [0.0, -1.0, Real::NAN, Real::INFINITY] {
            let result = RelativePoseErrorCfg { delta }.finalize();
            assert!(
                matches!(result, Err(MetricsError::InvalidDelta(_))),
                "delta {delta} should be rejected"
            );
        }
    }

    #[test]
    fn test_straight_line_scenario() {
        let gt = trajectory(&[[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [4.0, 0.0, 0.0]]);
        let est = trajectory(&[[0.0, 0.0, 0.0], [2.0, 0.0, 0.5], [4.0, 0.0, 1.0]]);

        let pairs = calculator(1.0).compute_pairs(&gt, &est);
        assert_eq!(
            pairs,
            vec![
                PairError {
                    index: 1,
                    gt_distance: 2.0,
                    error: 0.5,
                },
                PairError {
                    index: 2,
                    gt_distance: 2.0,
                    error: 0.5,
                },
            ]
        );
        assert_eq!(calculator(1.0).compute(&gt, &est), vec![0.5, 0.5]);
    }

    #[test]
    fn test_identical_trajectories_have_zero_error() {
        let (gt, _) = wobbly(40);
        for delta in [0.1, 1.0, 1.4] {
            let errors = calculator(delta).compute(&gt, &gt);
            assert!(!errors.is_empty());
            assert!(errors.iter().all(|&e| e == 0.0), "delta {delta}: {errors:?}");
        }
    }

    #[test]
    fn test_steps_shorter_than_delta_are_skipped() {
        let delta = 1.0;
        let step = delta - 1e-9;
        let gt: Trajectory = (0..10)
            .map(|i| Position::new(i as Real * step, 0.0, 0.0))
            .collect();
        let est = gt.clone();

        assert!(calculator(delta).compute(&gt, &est).is_empty());
    }

    #[test]
    fn test_gate_is_inclusive() {
        let gt = trajectory(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [1.0, 1.0, 1.0],
        ]);
        let est = gt.clone();

        let pairs = calculator(1.0).compute_pairs(&gt, &est);
        let indices: Vec<_> = pairs.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn test_nan_ground_truth_steps_are_skipped() {
        let gt = trajectory(&[
            [0.0, 0.0, 0.0],
            [Real::NAN, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [4.0, 0.0, 0.0],
        ]);
        let est = gt.clone();

        let pairs = calculator(1.0).compute_pairs(&gt, &est);
        let indices: Vec<_> = pairs.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![3]);
        assert_eq!(pairs[0].error, 0.0);
    }

    #[test]
    fn test_infinite_ground_truth_never_yields_nan() {
        let gt = trajectory(&[
            [Real::INFINITY, 0.0, 0.0],
            [Real::INFINITY, 0.0, 0.0],
            [0.0, 0.0, 0.0],
        ]);
        let est = trajectory(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);

        // inf - inf is NaN and gated out, 0 - inf is an infinite step and gated in.
        let errors = calculator(1.0).compute(&gt, &est);
        assert_eq!(errors, vec![Real::INFINITY]);
    }

    #[test]
    fn test_gate_is_per_step_not_accumulated() {
        // Ten 0.5 m steps cover 5 m, yet no single step reaches 1 m.
        let gt: Trajectory = (0..11)
            .map(|i| Position::new(0.5 * i as Real, 0.0, 0.0))
            .collect();
        let est: Trajectory = (0..11)
            .map(|i| Position::new(0.6 * i as Real, 0.0, 0.0))
            .collect();

        assert!(calculator(1.0).compute(&gt, &est).is_empty());
        assert_eq!(calculator(0.5).compute(&gt, &est).len(), 10);
    }

    #[test]
    fn test_errors_are_translation_invariant() {
        let (gt, est) = wobbly(30);
        let offset = Position::new(1234.5, -87.25, 3.0);
        let shifted_gt: Trajectory = gt.positions().iter().map(|p| p + offset).collect();
        let shifted_est: Trajectory = est.positions().iter().map(|p| p + offset).collect();

        let rpe = calculator(1.0);
        let errors = rpe.compute(&gt, &est);
        let shifted = rpe.compute(&shifted_gt, &shifted_est);

        assert_eq!(errors.len(), shifted.len());
        for (a, b) in errors.iter().zip(&shifted) {
            assert!((a - b).abs() < 1e-9, "{a} != {b}");
        }
    }

    #[test]
    fn test_output_length_is_bounded() {
        for n in 0..12 {
            let (gt, est) = wobbly(n);
            let errors = calculator(0.01).compute(&gt, &est);
            assert!(errors.len() <= n.saturating_sub(1));
            if n <= 1 {
                assert!(errors.is_empty());
            }
            assert!(errors.iter().all(|&e| e >= 0.0));
        }
    }

    #[test]
    #[should_panic(expected = "common length")]
    fn test_length_mismatch_panics() {
        let (gt, est) = wobbly(5);
        let mut est = est;
        est.truncate(4);
        calculator(1.0).compute(&gt, &est);
    }
}
