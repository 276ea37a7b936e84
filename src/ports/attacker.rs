//! Attacker model port: Trait and variant registry for attack simulations.
//!
//! An attacker model is fitted on synthetic data only, then predicts the
//! sensitive values of real rows from their key values. How well it predicts
//! is the privacy-risk signal.

use serde::{Deserialize, Serialize};

use crate::domain::{ColumnKind, Table, TableError, Value};
use crate::ports::LossError;

/// Errors that can occur while fitting or querying an attacker model.
#[derive(Debug, thiserror::Error)]
pub enum AttackerError {
    #[error(transparent)]
    Loss(#[from] LossError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("Attacker model used before fit")]
    Unfitted,

    #[error("Expected {expected} key values, got {got}")]
    KeyArityMismatch { expected: usize, got: usize },

    #[error("Expected a {expected} value for column '{column}'")]
    TypeMismatch {
        column: String,
        expected: ColumnKind,
    },

    #[error("Synthetic table has no rows")]
    EmptyTrainingData,
}

/// Trait for attacker models.
///
/// Lifecycle: `unfitted -> fitted -> predicting`. `predict` may be called
/// repeatedly while fitted; one instance serves exactly one field split and
/// is discarded afterwards.
///
/// The lifetime ties a fitted model to the synthetic table it borrowed
/// during `fit`; the table is referenced, never copied.
pub trait AttackerModel<'a> {
    /// Fit the model on synthetic data for one key/sensitive field split.
    ///
    /// # Errors
    /// Returns error if referenced columns are missing or mistyped.
    fn fit(
        &mut self,
        synthetic: &'a Table,
        key_fields: &[String],
        sensitive_fields: &[String],
    ) -> Result<(), AttackerError>;

    /// Predict the sensitive values for one key tuple.
    ///
    /// # Errors
    /// Returns error if called before `fit` or if the key tuple does not
    /// match the fitted key fields in arity or type.
    fn predict(&self, key: &[Value]) -> Result<Vec<Value>, AttackerError>;
}

/// The closed set of attacker model variants.
///
/// Variants are selected by the privacy evaluation based on the declared
/// sensitive-field type; see [`AttackerKind::compatible_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackerKind {
    /// 1-nearest-neighbor over categorical keys, predicting the closest
    /// synthetic row's sensitive categories.
    CategoricalNearestNeighbor,
    /// Weighted mean over all synthetic rows within an inverse-CDF cutoff
    /// radius of the queried numeric key.
    NumericalRadiusNearestNeighbor,
}

impl AttackerKind {
    /// The column kind this variant requires for key fields.
    #[must_use]
    pub fn key_kind(self) -> ColumnKind {
        match self {
            Self::CategoricalNearestNeighbor => ColumnKind::Categorical,
            Self::NumericalRadiusNearestNeighbor => ColumnKind::Numeric,
        }
    }

    /// The column kind this variant requires for sensitive fields.
    #[must_use]
    pub fn sensitive_kind(self) -> ColumnKind {
        match self {
            Self::CategoricalNearestNeighbor => ColumnKind::Categorical,
            Self::NumericalRadiusNearestNeighbor => ColumnKind::Numeric,
        }
    }

    /// Registry: the variants able to attack sensitive fields of `kind`.
    #[must_use]
    pub fn compatible_with(kind: ColumnKind) -> &'static [AttackerKind] {
        match kind {
            ColumnKind::Categorical => &[Self::CategoricalNearestNeighbor],
            ColumnKind::Numeric => &[Self::NumericalRadiusNearestNeighbor],
        }
    }
}

impl std::fmt::Display for AttackerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CategoricalNearestNeighbor => write!(f, "CategoricalNearestNeighbor"),
            Self::NumericalRadiusNearestNeighbor => write!(f, "NumericalRadiusNearestNeighbor"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_matches_declared_kinds() {
        for kind in [ColumnKind::Numeric, ColumnKind::Categorical] {
            for attacker in AttackerKind::compatible_with(kind) {
                assert_eq!(attacker.sensitive_kind(), kind);
            }
        }
    }

    #[test]
    fn test_registry_covers_radius_nn() {
        assert!(AttackerKind::compatible_with(ColumnKind::Numeric)
            .contains(&AttackerKind::NumericalRadiusNearestNeighbor));
    }
}
