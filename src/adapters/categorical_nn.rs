//! Nearest neighbor attacker for categorical sensitive fields.

use crate::adapters::hamming::mismatch_count;
use crate::domain::{ColumnKind, Table, Value};
use crate::ports::{AttackerError, AttackerModel};

/// 1-nearest-neighbor attacker over categorical keys.
///
/// Predicts the sensitive categories of the synthetic row whose key tuple
/// has minimal hamming distance to the query. Ties go to the first minimal
/// row in table order, so predictions are deterministic.
pub struct CategoricalNearestNeighborAttacker<'a> {
    fitted: Option<FittedState<'a>>,
}

struct FittedState<'a> {
    synthetic: &'a Table,
    key_fields: Vec<String>,
    sensitive_fields: Vec<String>,
}

impl<'a> CategoricalNearestNeighborAttacker<'a> {
    /// Create an unfitted attacker.
    #[must_use]
    pub fn new() -> Self {
        Self { fitted: None }
    }
}

impl<'a> Default for CategoricalNearestNeighborAttacker<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> AttackerModel<'a> for CategoricalNearestNeighborAttacker<'a> {
    fn fit(
        &mut self,
        synthetic: &'a Table,
        key_fields: &[String],
        sensitive_fields: &[String],
    ) -> Result<(), AttackerError> {
        if synthetic.num_rows() == 0 {
            return Err(AttackerError::EmptyTrainingData);
        }
        for col in key_fields.iter().chain(sensitive_fields) {
            synthetic.categorical(col)?;
        }
        self.fitted = Some(FittedState {
            synthetic,
            key_fields: key_fields.to_vec(),
            sensitive_fields: sensitive_fields.to_vec(),
        });

        tracing::debug!(
            rows = synthetic.num_rows(),
            keys = key_fields.len(),
            sensitive = sensitive_fields.len(),
            "fitted categorical nearest neighbor attacker"
        );
        Ok(())
    }

    fn predict(&self, key: &[Value]) -> Result<Vec<Value>, AttackerError> {
        let state = self.fitted.as_ref().ok_or(AttackerError::Unfitted)?;
        if key.len() != state.key_fields.len() {
            return Err(AttackerError::KeyArityMismatch {
                expected: state.key_fields.len(),
                got: key.len(),
            });
        }

        let query: Vec<&str> = key
            .iter()
            .zip(&state.key_fields)
            .map(|(value, col)| {
                value
                    .as_category()
                    .ok_or_else(|| AttackerError::TypeMismatch {
                        column: col.clone(),
                        expected: ColumnKind::Categorical,
                    })
            })
            .collect::<Result<_, _>>()?;

        let key_cols: Vec<&[String]> = state
            .key_fields
            .iter()
            .map(|col| state.synthetic.categorical(col))
            .collect::<Result<_, _>>()?;
        let sensitive_cols: Vec<&[String]> = state
            .sensitive_fields
            .iter()
            .map(|col| state.synthetic.categorical(col))
            .collect::<Result<_, _>>()?;

        let mut best_idx = 0;
        let mut best_dist = usize::MAX;
        let mut ref_key: Vec<&str> = vec![""; key_cols.len()];

        for idx in 0..state.synthetic.num_rows() {
            for (j, col) in key_cols.iter().enumerate() {
                ref_key[j] = col[idx].as_str();
            }
            let dist = mismatch_count(&query, &ref_key);
            if dist < best_dist {
                best_dist = dist;
                best_idx = idx;
                if dist == 0 {
                    break;
                }
            }
        }

        Ok(sensitive_cols
            .iter()
            .map(|col| Value::Category(col[best_idx].clone()))
            .collect())
    }
}
