//! Empirical cumulative distribution function.
//!
//! Maps a column's raw values to their percentile rank within a reference
//! dataset. Built once during `fit`, read-only afterwards.

/// A fitted per-column empirical CDF.
///
/// Right-continuous step function: `percentile(x)` is the fraction of fitted
/// values less than or equal to `x`, in `[0, 1]`. Non-finite values are
/// dropped at fit time.
#[derive(Debug, Clone)]
pub struct EmpiricalCdf {
    sorted: Vec<f64>,
}

impl EmpiricalCdf {
    /// Fit a CDF from raw column values.
    #[must_use]
    pub fn fit(values: &[f64]) -> Self {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
        sorted.sort_by(f64::total_cmp);
        Self { sorted }
    }

    /// Number of values the CDF was fitted on.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    /// Whether the CDF has no support (empty or all-NaN column).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// Percentile rank of `x` within the fitted values.
    ///
    /// Returns `None` when the rank is undefined: `x` is not finite, or the
    /// CDF has no support. Callers decide the policy for undefined ranks.
    #[must_use]
    pub fn percentile(&self, x: f64) -> Option<f64> {
        if self.sorted.is_empty() || !x.is_finite() {
            return None;
        }
        let below_or_equal = self.sorted.partition_point(|v| *v <= x);
        Some(below_or_equal as f64 / self.sorted.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_steps() {
        let cdf = EmpiricalCdf::fit(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(cdf.percentile(0.5), Some(0.0));
        assert_eq!(cdf.percentile(1.0), Some(0.25));
        assert_eq!(cdf.percentile(2.5), Some(0.5));
        assert_eq!(cdf.percentile(4.0), Some(1.0));
        assert_eq!(cdf.percentile(100.0), Some(1.0));
    }

    #[test]
    fn test_unsorted_input() {
        let cdf = EmpiricalCdf::fit(&[3.0, 1.0, 2.0]);
        assert_eq!(cdf.percentile(1.0), Some(1.0 / 3.0));
        assert_eq!(cdf.percentile(3.0), Some(1.0));
    }

    #[test]
    fn test_undefined_ranks() {
        let cdf = EmpiricalCdf::fit(&[1.0, 2.0]);
        assert_eq!(cdf.percentile(f64::NAN), None);

        let empty = EmpiricalCdf::fit(&[]);
        assert!(empty.is_empty());
        assert_eq!(empty.percentile(1.0), None);

        let all_nan = EmpiricalCdf::fit(&[f64::NAN, f64::INFINITY]);
        assert!(all_nan.is_empty());
    }

    #[test]
    fn test_ties() {
        let cdf = EmpiricalCdf::fit(&[5.0, 5.0, 5.0, 9.0]);
        assert_eq!(cdf.percentile(5.0), Some(0.75));
        assert_eq!(cdf.percentile(9.0), Some(1.0));
    }
}
