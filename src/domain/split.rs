//! Key/sensitive field splits.

use serde::{Deserialize, Serialize};

/// Errors raised by field split construction.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SplitError {
    #[error("Key and sensitive fields overlap: {0}")]
    Overlap(String),

    #[error("Key fields must not be empty")]
    EmptyKey,

    #[error("Sensitive fields must not be empty")]
    EmptySensitive,
}

/// One trial's partition of columns into key fields (known to the attacker)
/// and sensitive fields (the attacker's inference target).
///
/// Field lists are kept sorted so that equal splits sampled in different
/// orders compare equal, which makes the split usable as a breakdown key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FieldSplit {
    key_fields: Vec<String>,
    sensitive_fields: Vec<String>,
}

impl FieldSplit {
    /// Create a split from key and sensitive field names.
    ///
    /// # Errors
    /// Returns error if either list is empty or the lists overlap.
    pub fn new(
        mut key_fields: Vec<String>,
        mut sensitive_fields: Vec<String>,
    ) -> Result<Self, SplitError> {
        if key_fields.is_empty() {
            return Err(SplitError::EmptyKey);
        }
        if sensitive_fields.is_empty() {
            return Err(SplitError::EmptySensitive);
        }
        if let Some(shared) = key_fields.iter().find(|k| sensitive_fields.contains(k)) {
            return Err(SplitError::Overlap(shared.clone()));
        }
        key_fields.sort();
        sensitive_fields.sort();
        Ok(Self {
            key_fields,
            sensitive_fields,
        })
    }

    /// Columns assumed known to the attacker.
    #[must_use]
    pub fn key_fields(&self) -> &[String] {
        &self.key_fields
    }

    /// Columns the attacker tries to infer.
    #[must_use]
    pub fn sensitive_fields(&self) -> &[String] {
        &self.sensitive_fields
    }
}

impl std::fmt::Display for FieldSplit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "keys=[{}] sensitive=[{}]",
            self.key_fields.join(", "),
            self.sensitive_fields.join(", ")
        )
    }
}
