//! Loss function port: Trait for dissimilarity measures.
//!
//! A loss function is fitted on a reference dataset's columns, then measures
//! how dissimilar two points are in the fitted normalization space. Weight
//! functions reuse the same contract, returning a similarity weight instead
//! of a distance.

use crate::domain::{Table, TableError};

/// Errors that can occur during loss computation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LossError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error("Loss function used before fit")]
    Unfitted,

    #[error("Expected {expected} coordinates, got {got}")]
    ArityMismatch { expected: usize, got: usize },
}

/// Trait for pluggable dissimilarity (or weight) measures.
pub trait LossFunction {
    /// Fit the internal normalization context from `data`'s `columns`.
    ///
    /// # Errors
    /// Returns error if `data` lacks a column or a column has the wrong type.
    fn fit(&mut self, data: &Table, columns: &[String]) -> Result<(), LossError>;

    /// Measure dissimilarity (or weight) between two points.
    ///
    /// Points are coordinate tuples aligned with the fitted columns.
    ///
    /// # Errors
    /// Returns error if called before `fit` or if either point's arity does
    /// not match the fitted columns.
    fn measure(&self, a: &[f64], b: &[f64]) -> Result<f64, LossError>;
}
