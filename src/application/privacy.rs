//! Privacy evaluation service: Attack simulation across field splits.
//!
//! The evaluation repeatedly samples key/sensitive field splits, fits a
//! fresh attacker model on the synthetic table for each split, predicts the
//! sensitive values of every real row from its key values, and scores how
//! close the predictions come to the truth. The aggregate over splits is the
//! privacy-risk score.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::adapters::{
    CategoricalNearestNeighborAttacker, CutoffKernelConfig, InverseCdfDistance,
    RadiusNearestNeighborAttacker,
};
use crate::domain::{ColumnKind, FieldSplit, Table, Value};
use crate::ports::{AttackerError, AttackerKind, AttackerModel, LossFunction};
use crate::SynthguardError;

/// Configuration for a privacy evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Attacker model variant to simulate
    pub attacker: AttackerKind,

    /// Number of random field splits to score
    pub trials: usize,

    /// Key fields per split
    pub key_field_count: usize,

    /// Sensitive fields per split
    pub sensitive_field_count: usize,

    /// Parameters of the attacker's distance/cutoff kernel
    pub kernel: CutoffKernelConfig,

    /// Fixed RNG seed for reproducible split sampling
    pub seed: Option<u64>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            attacker: AttackerKind::NumericalRadiusNearestNeighbor,
            trials: 10,
            key_field_count: 1,
            sensitive_field_count: 1,
            kernel: CutoffKernelConfig::default(),
            seed: None,
        }
    }
}

impl EvaluationConfig {
    fn validate(&self) -> Result<(), SynthguardError> {
        if self.trials == 0 {
            return Err(SynthguardError::Config("Trials must be positive".into()));
        }
        if self.key_field_count == 0 || self.sensitive_field_count == 0 {
            return Err(SynthguardError::Config(
                "Key and sensitive field counts must be positive".into(),
            ));
        }
        if !self.kernel.p.is_finite() || self.kernel.p < 1.0 {
            return Err(SynthguardError::Config(format!(
                "Kernel exponent p must be finite and >= 1, got {}",
                self.kernel.p
            )));
        }
        if !self.kernel.cutoff.is_finite() || self.kernel.cutoff <= 0.0 {
            return Err(SynthguardError::Config(format!(
                "Kernel cutoff must be finite and positive, got {}",
                self.kernel.cutoff
            )));
        }
        Ok(())
    }
}

/// Raw result for one field split. The score is NaN when the split could
/// not be scored; such splits are excluded from the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitScore {
    pub score: f64,
}

/// Closed dispatcher over the attacker variants.
enum Attacker<'a> {
    Categorical(CategoricalNearestNeighborAttacker<'a>),
    RadiusNn(RadiusNearestNeighborAttacker<'a>),
}

impl<'a> Attacker<'a> {
    fn build(kind: AttackerKind, kernel: CutoffKernelConfig) -> Self {
        match kind {
            AttackerKind::CategoricalNearestNeighbor => {
                Self::Categorical(CategoricalNearestNeighborAttacker::new())
            }
            AttackerKind::NumericalRadiusNearestNeighbor => {
                Self::RadiusNn(RadiusNearestNeighborAttacker::new(kernel))
            }
        }
    }
}

impl<'a> AttackerModel<'a> for Attacker<'a> {
    fn fit(
        &mut self,
        synthetic: &'a Table,
        key_fields: &[String],
        sensitive_fields: &[String],
    ) -> Result<(), AttackerError> {
        match self {
            Self::Categorical(inner) => inner.fit(synthetic, key_fields, sensitive_fields),
            Self::RadiusNn(inner) => inner.fit(synthetic, key_fields, sensitive_fields),
        }
    }

    fn predict(&self, key: &[Value]) -> Result<Vec<Value>, AttackerError> {
        match self {
            Self::Categorical(inner) => inner.predict(key),
            Self::RadiusNn(inner) => inner.predict(key),
        }
    }
}

/// Columns eligible for sampling, restricted to those present in both
/// tables with the kind the attacker variant requires.
struct Candidates {
    key: Vec<String>,
    sensitive: Vec<String>,
}

/// A privacy evaluation of one synthetic table against the real table it
/// imitates.
pub struct PrivacyEvaluation<'a> {
    real: &'a Table,
    synthetic: &'a Table,
    config: EvaluationConfig,
    candidates: Candidates,
}

impl<'a> PrivacyEvaluation<'a> {
    /// Create an evaluation, validating configuration and schemas.
    ///
    /// # Errors
    /// Returns a configuration error if the config is invalid or if no valid
    /// key/sensitive field split exists for the requested attacker variant.
    pub fn new(
        real: &'a Table,
        synthetic: &'a Table,
        config: EvaluationConfig,
    ) -> crate::Result<Self> {
        config.validate()?;

        let candidates = Self::collect_candidates(real, synthetic, config.attacker);
        Self::check_feasible(&config, &candidates)?;

        Ok(Self {
            real,
            synthetic,
            config,
            candidates,
        })
    }

    /// Columns shared by both tables with matching kinds, bucketed by the
    /// attacker's key and sensitive requirements.
    fn collect_candidates(real: &Table, synthetic: &Table, attacker: AttackerKind) -> Candidates {
        let shared: Vec<(&str, ColumnKind)> = real
            .column_names()
            .filter_map(|name| {
                let kind = real.kind_of(name)?;
                (synthetic.kind_of(name) == Some(kind)).then_some((name, kind))
            })
            .collect();

        let of_kind = |kind: ColumnKind| -> Vec<String> {
            shared
                .iter()
                .filter(|(_, k)| *k == kind)
                .map(|(name, _)| (*name).to_string())
                .collect()
        };

        Candidates {
            key: of_kind(attacker.key_kind()),
            sensitive: of_kind(attacker.sensitive_kind()),
        }
    }

    fn check_feasible(config: &EvaluationConfig, candidates: &Candidates) -> crate::Result<()> {
        let needed_keys = config.key_field_count;
        let needed_sensitive = config.sensitive_field_count;
        let attacker = config.attacker;

        // The registry is the source of truth for which variants may attack
        // which sensitive-field kind.
        if !AttackerKind::compatible_with(attacker.sensitive_kind()).contains(&attacker) {
            return Err(SynthguardError::Config(format!(
                "Attacker {attacker} is not registered for {} sensitive fields",
                attacker.sensitive_kind()
            )));
        }

        // Both current variants use one kind for keys and sensitive fields;
        // the mixed-kind arm covers variants that do not.
        let feasible = if attacker.key_kind() == attacker.sensitive_kind() {
            candidates.key.len() >= needed_keys + needed_sensitive
        } else {
            candidates.key.len() >= needed_keys && candidates.sensitive.len() >= needed_sensitive
        };

        if !feasible {
            return Err(SynthguardError::Config(format!(
                "no valid field split for {attacker}: need {needed_keys} {} key column(s) and \
                 {needed_sensitive} {} sensitive column(s), shared schema has {} and {}",
                attacker.key_kind(),
                attacker.sensitive_kind(),
                candidates.key.len(),
                candidates.sensitive.len(),
            )));
        }
        Ok(())
    }

    /// Sample one type-compatible disjoint field split.
    fn sample_split(&self, rng: &mut ChaCha20Rng) -> crate::Result<FieldSplit> {
        let key_count = self.config.key_field_count;
        let sensitive_count = self.config.sensitive_field_count;

        // Same-kind variants draw both lists from one shuffled pool so the
        // lists stay disjoint; the mixed-kind arm samples each pool
        // independently for variants whose key and sensitive kinds differ.
        let (key_fields, sensitive_fields) =
            if self.config.attacker.key_kind() == self.config.attacker.sensitive_kind() {
                let mut pool = self.candidates.key.clone();
                pool.shuffle(rng);
                let sensitive = pool.split_off(pool.len() - sensitive_count);
                pool.truncate(key_count);
                (pool, sensitive)
            } else {
                let keys: Vec<String> = self
                    .candidates
                    .key
                    .choose_multiple(rng, key_count)
                    .cloned()
                    .collect();
                let sensitive: Vec<String> = self
                    .candidates
                    .sensitive
                    .choose_multiple(rng, sensitive_count)
                    .cloned()
                    .collect();
                (keys, sensitive)
            };

        Ok(FieldSplit::new(key_fields, sensitive_fields)?)
    }

    /// Run the evaluation and return the aggregate privacy-risk score.
    ///
    /// The aggregate is the arithmetic mean of the non-NaN per-split scores,
    /// or NaN when no split could be scored.
    ///
    /// # Errors
    /// Returns error on configuration or attacker failures; unscorable
    /// splits are not errors.
    pub fn compute(&self) -> crate::Result<f64> {
        let breakdown = self.compute_breakdown()?;
        let aggregate = mean_ignoring_nan(breakdown.values().map(|s| s.score));

        tracing::info!(
            attacker = %self.config.attacker,
            splits = breakdown.len(),
            aggregate,
            "privacy evaluation complete"
        );
        Ok(aggregate)
    }

    /// Run the evaluation and return per-split raw scores.
    ///
    /// Trials that sample an already-scored split re-score it and keep a
    /// single breakdown entry, so the map may hold fewer entries than
    /// `trials` when few splits exist.
    ///
    /// # Errors
    /// Returns error on configuration or attacker failures.
    pub fn compute_breakdown(&self) -> crate::Result<BTreeMap<FieldSplit, SplitScore>> {
        let mut rng = match self.config.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };

        tracing::info!(
            attacker = %self.config.attacker,
            trials = self.config.trials,
            rows = self.real.num_rows(),
            "starting privacy evaluation"
        );

        let mut breakdown = BTreeMap::new();
        for _ in 0..self.config.trials {
            let split = self.sample_split(&mut rng)?;
            let score = self.score_split(&split)?;
            if score.is_nan() {
                tracing::warn!(%split, "split could not be scored; excluded from aggregate");
            } else {
                tracing::debug!(%split, score, "scored split");
            }
            breakdown.insert(split, SplitScore { score });
        }
        Ok(breakdown)
    }

    /// Fit an attacker for one split and score its predictions against the
    /// real table. Returns NaN when the split cannot be scored.
    fn score_split(&self, split: &FieldSplit) -> crate::Result<f64> {
        let mut attacker = Attacker::build(self.config.attacker, self.config.kernel);
        attacker.fit(self.synthetic, split.key_fields(), split.sensitive_fields())?;

        let key_rows = self.real.rows(split.key_fields())?;
        if key_rows.is_empty() {
            return Ok(f64::NAN);
        }

        match self.config.attacker.sensitive_kind() {
            ColumnKind::Numeric => self.score_numerical(&attacker, split, &key_rows),
            ColumnKind::Categorical => self.score_categorical(&attacker, split, &key_rows),
        }
    }

    /// Numeric scoring: mean inverse-CDF loss between predictions and truth,
    /// with the loss fitted on the REAL table's sensitive columns, mapped to
    /// the bounded similarity `1 / (1 + mean_loss)`.
    fn score_numerical(
        &self,
        attacker: &Attacker<'_>,
        split: &FieldSplit,
        key_rows: &[Vec<Value>],
    ) -> crate::Result<f64> {
        let mut loss = InverseCdfDistance::new(self.config.kernel.p);
        loss.fit(self.real, split.sensitive_fields())?;

        let truth_cols: Vec<&[f64]> = split
            .sensitive_fields()
            .iter()
            .map(|col| self.real.numeric(col))
            .collect::<Result<_, _>>()?;

        let mut total_loss = 0.0;
        let mut truth = vec![0.0; truth_cols.len()];
        for (idx, key_row) in key_rows.iter().enumerate() {
            let prediction = attacker.predict(key_row)?;
            let predicted: Vec<f64> = prediction
                .iter()
                .map(|v| {
                    v.as_number().ok_or_else(|| {
                        SynthguardError::Config(format!(
                            "attacker {} returned a non-numeric prediction",
                            self.config.attacker
                        ))
                    })
                })
                .collect::<Result<_, _>>()?;

            for (j, col) in truth_cols.iter().enumerate() {
                truth[j] = col[idx];
            }
            total_loss += loss.measure(&predicted, &truth)?;
        }

        let mean_loss = total_loss / key_rows.len() as f64;
        // NaN propagates as the unscorable signal.
        Ok(1.0 / (1.0 + mean_loss))
    }

    /// Categorical scoring: exact-match accuracy of the predicted sensitive
    /// tuples.
    fn score_categorical(
        &self,
        attacker: &Attacker<'_>,
        split: &FieldSplit,
        key_rows: &[Vec<Value>],
    ) -> crate::Result<f64> {
        let truth_rows = self.real.rows(split.sensitive_fields())?;

        let mut matches = 0usize;
        for (key_row, truth) in key_rows.iter().zip(&truth_rows) {
            let prediction = attacker.predict(key_row)?;
            if prediction == *truth {
                matches += 1;
            }
        }
        Ok(matches as f64 / key_rows.len() as f64)
    }
}

/// Arithmetic mean over the non-NaN scores; NaN when none remain.
fn mean_ignoring_nan(scores: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for score in scores {
        if !score.is_nan() {
            sum += score;
            count += 1;
        }
    }
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}
