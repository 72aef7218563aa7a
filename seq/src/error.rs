use thiserror::Error;

/// Errors returned when configuring a sequence generator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeqError {
    #[error("seq: invalid dimension {dim} (supported: 1..={max})")]
    InvalidDimension { dim: usize, max: usize },
}
