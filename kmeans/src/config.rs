use qmeans_seq::SequenceKind;
use serde::{Deserialize, Serialize};

use crate::KMeansError;

/// Controls a clustering run.
///
/// Deserializes from partial documents: missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of clusters. Must be between 1 and the number of observations.
    pub k: usize,

    /// Refinement stops once no centroid coordinate moves by this much or
    /// more between iterations. Must be positive.
    /// Default: 1e-6.
    pub tolerance: f64,

    /// Upper bound on refinement iterations per restart.
    /// Default: 100.
    pub max_iterations: usize,

    /// Number of independently seeded runs; the lowest-dispersion run wins.
    /// Default: 1.
    pub restarts: usize,

    /// Low-discrepancy sequence used for seeding and empty-cluster recovery.
    /// Default: sobol.
    pub sequence: SequenceKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            k: 2,
            tolerance: 1e-6,
            max_iterations: 100,
            restarts: 1,
            sequence: SequenceKind::Sobol,
        }
    }
}

impl Config {
    /// Creates a configuration for `k` clusters with default settings.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Default::default()
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts;
        self
    }

    pub fn with_sequence(mut self, sequence: SequenceKind) -> Self {
        self.sequence = sequence;
        self
    }

    /// Checks the configuration against a dataset of `n` observations.
    pub fn validate(&self, n: usize) -> Result<(), KMeansError> {
        let invalid = |msg: String| Err(KMeansError::InvalidConfiguration(msg));
        if self.k == 0 {
            return invalid("k must be at least 1".into());
        }
        if self.k > n {
            return invalid(format!("k = {} exceeds the {n} observations", self.k));
        }
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return invalid(format!(
                "tolerance must be positive and finite, got {}",
                self.tolerance
            ));
        }
        if self.max_iterations == 0 {
            return invalid("max_iterations must be at least 1".into());
        }
        if self.restarts == 0 {
            return invalid("restarts must be at least 1".into());
        }
        Ok(())
    }
}
