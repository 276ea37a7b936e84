//! # Synthguard
//!
//! Privacy-risk metrics for synthetic tabular data.
//!
//! Given a real dataset and a synthetic dataset generated to imitate it, this
//! crate simulates attacker models that try to infer "sensitive" column values
//! from "key" column values using only the synthetic data, and turns the
//! strength of those attackers into a quantitative privacy-risk score.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core tabular types (Table, FieldSplit, EmpiricalCdf)
//! - `ports`: Trait definitions for loss functions and attacker models
//! - `adapters`: Concrete implementations (inverse-CDF kernels, attackers)
//! - `application`: The privacy evaluation orchestrating splits and scoring
//!
//! Report generation, plotting, and dataset ingestion are external
//! collaborators: they consume the `compute`/`compute_breakdown` output of
//! [`PrivacyEvaluation`] and are not part of this crate.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

pub use application::{EvaluationConfig, PrivacyEvaluation, SplitScore};
pub use domain::{Column, FieldSplit, Table, Value};

/// Result type for Synthguard operations
pub type Result<T> = std::result::Result<T, SynthguardError>;

/// Main error type for Synthguard
#[derive(Debug, thiserror::Error)]
pub enum SynthguardError {
    #[error("Invalid table: {0}")]
    Table(#[from] domain::TableError),

    #[error("Invalid field split: {0}")]
    Split(#[from] domain::SplitError),

    #[error("Loss function failed: {0}")]
    Loss(#[from] ports::LossError),

    #[error("Attacker model failed: {0}")]
    Attacker(#[from] ports::AttackerError),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
