//! Application layer: Use cases orchestrating domain, ports and adapters.

mod privacy;

pub use privacy::{EvaluationConfig, PrivacyEvaluation, SplitScore};
