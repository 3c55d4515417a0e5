use rpe_core::Real;

use crate::MetricsError;

/// Summary of an error sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorStatistics {
    pub rmse: Real,
    pub mean: Real,
    /// Population standard deviation (divides by `count`).
    pub std: Real,
    pub max: Real,
    pub min: Real,
    pub median: Real,
    pub count: usize,
}

impl ErrorStatistics {
    /// Reduces `errors` to summary statistics.
    ///
    /// An empty sequence has no meaningful statistics and is reported as
    /// [`MetricsError::EmptyErrorSequence`] instead of producing NaN or zeros.
    pub fn from_errors(errors: &[Real]) -> Result<Self, MetricsError> {
        if errors.is_empty() {
            return Err(MetricsError::EmptyErrorSequence);
        }

        let count = errors.len();
        let n = count as Real;

        let mean = errors.iter().sum::<Real>() / n;
        let rmse = (errors.iter().map(|e| e * e).sum::<Real>() / n).sqrt();
        let std = (errors.iter().map(|e| (e - mean).powi(2)).sum::<Real>() / n).sqrt();

        // A NaN sample poisons every statistic, not only the sums.
        if errors.iter().any(|e| e.is_nan()) {
            return Ok(Self {
                rmse,
                mean,
                std,
                max: Real::NAN,
                min: Real::NAN,
                median: Real::NAN,
                count,
            });
        }

        let min = errors.iter().copied().fold(Real::INFINITY, Real::min);
        let max = errors.iter().copied().fold(Real::NEG_INFINITY, Real::max);

        let mut sorted = errors.to_vec();
        sorted.sort_by(Real::total_cmp);
        let median = if count % 2 == 0 {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        };

        Ok(Self {
            rmse,
            mean,
            std,
            max,
            min,
            median,
            count,
        })
    }
}
