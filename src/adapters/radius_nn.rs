//! Radius nearest neighbor attacker for numeric sensitive fields.

use crate::adapters::inverse_cdf::{CutoffKernelConfig, InverseCdfCutoff};
use crate::domain::{ColumnKind, Table, Value};
use crate::ports::{AttackerError, AttackerModel, LossFunction};

/// The radius nearest neighbor attacker.
///
/// Predicts the sensitive values of a queried key as the weighted mean of
/// the sensitive values in the synthetic table, where the weight of each
/// synthetic row is the [`InverseCdfCutoff`] indicator between the queried
/// key and that row's key tuple: every synthetic row within the cutoff
/// radius contributes equally, every other row not at all.
pub struct RadiusNearestNeighborAttacker<'a> {
    weight: InverseCdfCutoff,
    fitted: Option<FittedState<'a>>,
}

/// State captured by `fit`: the synthetic table is borrowed, never copied.
struct FittedState<'a> {
    synthetic: &'a Table,
    key_fields: Vec<String>,
    sensitive_fields: Vec<String>,
}

impl<'a> RadiusNearestNeighborAttacker<'a> {
    /// Create an unfitted attacker with the given kernel parameters.
    #[must_use]
    pub fn new(kernel: CutoffKernelConfig) -> Self {
        Self {
            weight: InverseCdfCutoff::new(kernel),
            fitted: None,
        }
    }
}

impl<'a> AttackerModel<'a> for RadiusNearestNeighborAttacker<'a> {
    fn fit(
        &mut self,
        synthetic: &'a Table,
        key_fields: &[String],
        sensitive_fields: &[String],
    ) -> Result<(), AttackerError> {
        // Surface mistyped sensitive columns now rather than at predict time.
        for col in sensitive_fields {
            synthetic.numeric(col)?;
        }
        self.weight.fit(synthetic, key_fields)?;
        self.fitted = Some(FittedState {
            synthetic,
            key_fields: key_fields.to_vec(),
            sensitive_fields: sensitive_fields.to_vec(),
        });

        tracing::debug!(
            rows = synthetic.num_rows(),
            keys = key_fields.len(),
            sensitive = sensitive_fields.len(),
            "fitted radius nearest neighbor attacker"
        );
        Ok(())
    }

    /// Predict the weighted-mean sensitive vector for one key tuple.
    ///
    /// # Zero-weight fallback
    ///
    /// When no synthetic row falls within the cutoff radius, the prediction
    /// is the zero vector of sensitive arity, not an error. This is a known
    /// sharp edge: it can silently bias downstream scores toward a
    /// degenerate baseline instead of signaling "no prediction possible".
    /// Metric semantics depend on it, so it is preserved as-is.
    fn predict(&self, key: &[Value]) -> Result<Vec<Value>, AttackerError> {
        let state = self.fitted.as_ref().ok_or(AttackerError::Unfitted)?;
        if key.len() != state.key_fields.len() {
            return Err(AttackerError::KeyArityMismatch {
                expected: state.key_fields.len(),
                got: key.len(),
            });
        }

        let query: Vec<f64> = key
            .iter()
            .zip(&state.key_fields)
            .map(|(value, col)| {
                value.as_number().ok_or_else(|| AttackerError::TypeMismatch {
                    column: col.clone(),
                    expected: ColumnKind::Numeric,
                })
            })
            .collect::<Result<_, _>>()?;

        let key_cols: Vec<&[f64]> = state
            .key_fields
            .iter()
            .map(|col| state.synthetic.numeric(col))
            .collect::<Result<_, _>>()?;
        let sensitive_cols: Vec<&[f64]> = state
            .sensitive_fields
            .iter()
            .map(|col| state.synthetic.numeric(col))
            .collect::<Result<_, _>>()?;

        let mut total_weight = 0.0;
        let mut sums = vec![0.0; sensitive_cols.len()];
        let mut ref_key = vec![0.0; key_cols.len()];

        for idx in 0..state.synthetic.num_rows() {
            for (j, col) in key_cols.iter().enumerate() {
                ref_key[j] = col[idx];
            }
            let weight = self.weight.measure(&query, &ref_key)?;
            if weight > 0.0 {
                total_weight += weight;
                for (j, col) in sensitive_cols.iter().enumerate() {
                    sums[j] += weight * col[idx];
                }
            }
        }

        if total_weight == 0.0 {
            return Ok(vec![Value::Number(0.0); sensitive_cols.len()]);
        }

        Ok(sums
            .into_iter()
            .map(|sum| Value::Number(sum / total_weight))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Column;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    fn numbers(prediction: &[Value]) -> Vec<f64> {
        prediction
            .iter()
            .map(|v| v.as_number().expect("numeric prediction"))
            .collect()
    }

    #[test]
    fn test_trivial_averaging() {
        // All synthetic keys identical to the query: the prediction is the
        // plain mean of the sensitive values.
        let synthetic = Table::new(vec![
            Column::numeric("key", vec![0.0, 0.0, 0.0]),
            Column::numeric("secret", vec![10.0, 10.0, 10.0]),
        ])
        .expect("table");

        let mut attacker = RadiusNearestNeighborAttacker::new(CutoffKernelConfig {
            p: 2.0,
            cutoff: 10.0,
        });
        attacker
            .fit(&synthetic, &cols(&["key"]), &cols(&["secret"]))
            .expect("fit");

        let prediction = attacker.predict(&[Value::Number(0.0)]).expect("predict");
        assert_eq!(numbers(&prediction), vec![10.0]);
    }

    #[test]
    fn test_zero_weight_fallback() {
        // The single synthetic key sits far outside the cutoff radius of the
        // query, so the prediction must be the zero vector, not a division
        // error.
        let synthetic = Table::new(vec![
            Column::numeric("key", vec![1_000_000.0]),
            Column::numeric("secret", vec![42.0]),
        ])
        .expect("table");

        let mut attacker = RadiusNearestNeighborAttacker::new(CutoffKernelConfig {
            p: 2.0,
            cutoff: 0.1,
        });
        attacker
            .fit(&synthetic, &cols(&["key"]), &cols(&["secret"]))
            .expect("fit");

        let prediction = attacker.predict(&[Value::Number(0.0)]).expect("predict");
        assert_eq!(numbers(&prediction), vec![0.0]);
    }

    #[test]
    fn test_prediction_within_convex_hull() {
        let secrets = vec![5.0, 9.0, 13.0, 20.0, 31.0];
        let synthetic = Table::new(vec![
            Column::numeric("key", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
            Column::numeric("secret", secrets.clone()),
        ])
        .expect("table");

        let min = 5.0;
        let max = 31.0;
        for cutoff in [0.05, 0.3, 0.6, 1.5] {
            let mut attacker =
                RadiusNearestNeighborAttacker::new(CutoffKernelConfig { p: 2.0, cutoff });
            attacker
                .fit(&synthetic, &cols(&["key"]), &cols(&["secret"]))
                .expect("fit");

            for query in [0.0, 1.5, 3.0, 7.0] {
                let prediction = attacker.predict(&[Value::Number(query)]).expect("predict");
                let predicted = numbers(&prediction)[0];
                let in_hull = predicted >= min && predicted <= max;
                assert!(
                    in_hull || predicted == 0.0,
                    "prediction {predicted} outside hull and not the zero fallback"
                );
            }
        }
    }

    #[test]
    fn test_partial_neighborhood_excludes_far_rows() {
        // With a tight radius only the exact-match row is a neighbor, so the
        // far row's sensitive value must not leak into the prediction.
        let synthetic = Table::new(vec![
            Column::numeric("key", vec![1.0, 100.0]),
            Column::numeric("secret", vec![10.0, 90.0]),
        ])
        .expect("table");

        let mut attacker = RadiusNearestNeighborAttacker::new(CutoffKernelConfig {
            p: 2.0,
            cutoff: 0.2,
        });
        attacker
            .fit(&synthetic, &cols(&["key"]), &cols(&["secret"]))
            .expect("fit");

        let prediction = attacker.predict(&[Value::Number(1.0)]).expect("predict");
        assert_eq!(numbers(&prediction), vec![10.0]);
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let attacker = RadiusNearestNeighborAttacker::new(CutoffKernelConfig::default());
        assert!(matches!(
            attacker.predict(&[Value::Number(0.0)]),
            Err(AttackerError::Unfitted)
        ));
    }

    #[test]
    fn test_categorical_key_rejected() {
        let synthetic = Table::new(vec![
            Column::numeric("key", vec![1.0]),
            Column::numeric("secret", vec![2.0]),
        ])
        .expect("table");

        let mut attacker = RadiusNearestNeighborAttacker::new(CutoffKernelConfig::default());
        attacker
            .fit(&synthetic, &cols(&["key"]), &cols(&["secret"]))
            .expect("fit");

        let result = attacker.predict(&[Value::Category("oops".to_string())]);
        assert!(matches!(result, Err(AttackerError::TypeMismatch { .. })));
    }

    #[test]
    fn test_fit_rejects_categorical_sensitive() {
        let synthetic = Table::new(vec![
            Column::numeric("key", vec![1.0]),
            Column::categorical("secret", vec!["a"]),
        ])
        .expect("table");

        let mut attacker = RadiusNearestNeighborAttacker::new(CutoffKernelConfig::default());
        let result = attacker.fit(&synthetic, &cols(&["key"]), &cols(&["secret"]));
        assert!(matches!(result, Err(AttackerError::Table(_))));
    }
}
