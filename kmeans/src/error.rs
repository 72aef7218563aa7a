use qmeans_seq::SeqError;
use thiserror::Error;

/// Errors returned by clustering operations.
///
/// All of them are reported before any refinement work starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KMeansError {
    #[error("kmeans: invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("kmeans: {0}")]
    InvalidDimension(#[from] SeqError),

    #[error("kmeans: degenerate dataset: all {n} observations are identical")]
    DegenerateDataset { n: usize },

    #[error("kmeans: invalid dataset: {0}")]
    InvalidDataset(String),
}
