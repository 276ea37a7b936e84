//! Inverse-CDF distance and cutoff kernel.
//!
//! Both kernels first normalize raw numeric values into percentile space
//! using per-column empirical CDFs fitted on a reference dataset, so columns
//! with wildly different scales become comparable.

use serde::{Deserialize, Serialize};

use crate::domain::{EmpiricalCdf, Table};
use crate::ports::{LossError, LossFunction};

/// Default exponent for the Lᵖ percentile distance.
pub const DEFAULT_P: f64 = 2.0;

/// Default cutoff radius for the indicator kernel.
pub const DEFAULT_CUTOFF: f64 = 0.3;

/// Parameters for the cutoff kernel (and the distance it wraps).
///
/// The privacy evaluation constructs kernels from this struct rather than
/// receiving pre-built kernel instances.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CutoffKernelConfig {
    /// Exponent of the percentile-space distance
    pub p: f64,

    /// Neighbor-inclusion radius in per-column percentile units
    pub cutoff: f64,
}

impl Default for CutoffKernelConfig {
    fn default() -> Self {
        Self {
            p: DEFAULT_P,
            cutoff: DEFAULT_CUTOFF,
        }
    }
}

/// Distance between numeric tuples in percentile space.
///
/// `measure` maps each coordinate of both points through its column's fitted
/// CDF and returns the sum of per-coordinate absolute percentile differences
/// raised to the `p`-th power (summed, not averaged, and without the p-th
/// root). Larger means more dissimilar.
///
/// Undefined percentile ranks (NaN coordinate, or a CDF fitted on an empty
/// or all-NaN column) contribute the maximal per-coordinate distance of 1.0
/// instead of failing. This is a deliberate policy: a value the reference
/// data cannot place is treated as maximally far away.
#[derive(Debug, Clone)]
pub struct InverseCdfDistance {
    p: f64,
    cdfs: Vec<EmpiricalCdf>,
}

impl InverseCdfDistance {
    /// Create an unfitted distance with exponent `p`.
    #[must_use]
    pub fn new(p: f64) -> Self {
        Self { p, cdfs: Vec::new() }
    }
}

impl Default for InverseCdfDistance {
    fn default() -> Self {
        Self::new(DEFAULT_P)
    }
}

impl LossFunction for InverseCdfDistance {
    fn fit(&mut self, data: &Table, columns: &[String]) -> Result<(), LossError> {
        let mut cdfs = Vec::with_capacity(columns.len());
        for col in columns {
            cdfs.push(EmpiricalCdf::fit(data.numeric(col)?));
        }
        self.cdfs = cdfs;
        Ok(())
    }

    fn measure(&self, a: &[f64], b: &[f64]) -> Result<f64, LossError> {
        if self.cdfs.is_empty() {
            return Err(LossError::Unfitted);
        }
        if a.len() != self.cdfs.len() {
            return Err(LossError::ArityMismatch {
                expected: self.cdfs.len(),
                got: a.len(),
            });
        }
        if b.len() != self.cdfs.len() {
            return Err(LossError::ArityMismatch {
                expected: self.cdfs.len(),
                got: b.len(),
            });
        }

        let mut dist = 0.0;
        for (idx, cdf) in self.cdfs.iter().enumerate() {
            dist += match (cdf.percentile(a[idx]), cdf.percentile(b[idx])) {
                (Some(pa), Some(pb)) => (pa - pb).abs().powf(self.p),
                // Undefined rank: maximal per-coordinate distance.
                _ => 1.0,
            };
        }
        Ok(dist)
    }
}

/// Hard-radius indicator kernel over [`InverseCdfDistance`].
///
/// `measure` returns weight 1.0 when the underlying distance is strictly
/// below the scaled cutoff, else 0.0. The configured `cutoff` is a
/// per-column percentile radius; at fit time the threshold becomes
/// `cutoff^p * num_columns` so it is comparable to the summed (not averaged)
/// distance.
///
/// This turns a continuous closeness measure into a neighbor-inclusion test,
/// letting an attacker average over all reference rows within a fixed radius
/// rather than a fixed count of nearest rows.
#[derive(Debug, Clone)]
pub struct InverseCdfCutoff {
    distance: InverseCdfDistance,
    cutoff_pow: f64,
    scaled_cutoff: Option<f64>,
}

impl InverseCdfCutoff {
    /// Create an unfitted cutoff kernel from its configuration.
    #[must_use]
    pub fn new(config: CutoffKernelConfig) -> Self {
        Self {
            distance: InverseCdfDistance::new(config.p),
            cutoff_pow: config.cutoff.powf(config.p),
            scaled_cutoff: None,
        }
    }
}

impl Default for InverseCdfCutoff {
    fn default() -> Self {
        Self::new(CutoffKernelConfig::default())
    }
}

impl LossFunction for InverseCdfCutoff {
    fn fit(&mut self, data: &Table, columns: &[String]) -> Result<(), LossError> {
        self.distance.fit(data, columns)?;
        self.scaled_cutoff = Some(self.cutoff_pow * columns.len() as f64);
        Ok(())
    }

    fn measure(&self, a: &[f64], b: &[f64]) -> Result<f64, LossError> {
        let cutoff = self.scaled_cutoff.ok_or(LossError::Unfitted)?;
        let dist = self.distance.measure(a, b)?;
        Ok(if dist < cutoff { 1.0 } else { 0.0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Column;

    fn reference_table() -> Table {
        Table::new(vec![
            Column::numeric("a", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
            Column::numeric("b", vec![10.0, 20.0, 30.0, 40.0, 50.0]),
        ])
        .expect("table should build")
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_distance_zero_for_identical_points() {
        let mut dist = InverseCdfDistance::default();
        dist.fit(&reference_table(), &cols(&["a", "b"])).expect("fit");

        let d = dist.measure(&[3.0, 30.0], &[3.0, 30.0]).expect("measure");
        assert_eq!(d, 0.0);
    }

    #[test]
    fn test_distance_symmetric_and_monotone() {
        let mut dist = InverseCdfDistance::default();
        dist.fit(&reference_table(), &cols(&["a", "b"])).expect("fit");

        let ab = dist.measure(&[1.0, 10.0], &[3.0, 30.0]).expect("measure");
        let ba = dist.measure(&[3.0, 30.0], &[1.0, 10.0]).expect("measure");
        assert_eq!(ab, ba);

        let near = dist.measure(&[1.0, 10.0], &[2.0, 20.0]).expect("measure");
        let far = dist.measure(&[1.0, 10.0], &[5.0, 50.0]).expect("measure");
        assert!(far > near);
    }

    #[test]
    fn test_nan_coordinate_is_maximal_distance() {
        let mut dist = InverseCdfDistance::default();
        dist.fit(&reference_table(), &cols(&["a"])).expect("fit");

        let d = dist.measure(&[f64::NAN], &[3.0]).expect("measure");
        assert_eq!(d, 1.0);
    }

    #[test]
    fn test_fit_rejects_missing_column() {
        let mut dist = InverseCdfDistance::default();
        let result = dist.fit(&reference_table(), &cols(&["a", "nope"]));
        assert!(matches!(result, Err(LossError::Table(_))));
    }

    #[test]
    fn test_measure_rejects_wrong_arity() {
        let mut dist = InverseCdfDistance::default();
        dist.fit(&reference_table(), &cols(&["a", "b"])).expect("fit");

        let result = dist.measure(&[1.0], &[1.0, 2.0]);
        assert!(matches!(
            result,
            Err(LossError::ArityMismatch { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn test_unfitted_measure_fails() {
        let dist = InverseCdfDistance::default();
        assert!(matches!(dist.measure(&[1.0], &[1.0]), Err(LossError::Unfitted)));

        let cutoff = InverseCdfCutoff::default();
        assert!(matches!(
            cutoff.measure(&[1.0], &[1.0]),
            Err(LossError::Unfitted)
        ));
    }

    #[test]
    fn test_identical_keys_always_within_radius() {
        // Distance 0 must get weight 1 for any cutoff > 0.
        for cutoff in [0.01, 0.1, 0.5] {
            let mut kernel = InverseCdfCutoff::new(CutoffKernelConfig { p: 2.0, cutoff });
            kernel.fit(&reference_table(), &cols(&["a", "b"])).expect("fit");

            let w = kernel.measure(&[2.0, 20.0], &[2.0, 20.0]).expect("measure");
            assert_eq!(w, 1.0);
        }
    }

    #[test]
    fn test_neighbor_count_monotone_in_cutoff() {
        let table = reference_table();
        let columns = cols(&["a", "b"]);
        let query = [1.0, 10.0];
        let rows = [
            [1.0, 10.0],
            [2.0, 20.0],
            [3.0, 30.0],
            [4.0, 40.0],
            [5.0, 50.0],
        ];

        let mut previous = 0usize;
        for cutoff in [0.05, 0.2, 0.5, 0.9, 2.0] {
            let mut kernel = InverseCdfCutoff::new(CutoffKernelConfig { p: 2.0, cutoff });
            kernel.fit(&table, &columns).expect("fit");

            let neighbors = rows
                .iter()
                .filter(|row| kernel.measure(&query, *row).expect("measure") > 0.0)
                .count();
            assert!(
                neighbors >= previous,
                "cutoff {cutoff} shrank the neighbor set: {neighbors} < {previous}"
            );
            previous = neighbors;
        }
        // A radius of 2.0 percentile units covers everything.
        assert_eq!(previous, rows.len());
    }
}
