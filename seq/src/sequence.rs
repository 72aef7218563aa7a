use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Halton, SeqError, Sobol};

/// A deterministic, restartable sequence of points in `[0, 1)^d`.
///
/// Implementations must be pure functions of the draw index: the n-th point
/// after [`reset`](LowDiscrepancy::reset) is always the same.
pub trait LowDiscrepancy: Send {
    /// Number of coordinates in each point.
    fn dimension(&self) -> usize;

    /// Number of points drawn since the last reset.
    fn index(&self) -> u64;

    /// Advances the sequence by one and returns the new point.
    fn next_point(&mut self) -> &[f64];

    /// Rewinds to the start; the next draw reproduces the first point.
    fn reset(&mut self);

    /// Advances the sequence by `n` points without returning them.
    fn skip(&mut self, n: u64);
}

/// Selects which low-discrepancy sequence to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequenceKind {
    /// Sobol sequence with Joe-Kuo direction numbers.
    #[default]
    Sobol,
    /// Halton sequence over the first primes.
    Halton,
}

impl SequenceKind {
    /// Largest dimension this kind supports.
    pub fn max_dimension(self) -> usize {
        match self {
            SequenceKind::Sobol => Sobol::MAX_DIMENSION,
            SequenceKind::Halton => Halton::MAX_DIMENSION,
        }
    }

    /// Creates a fresh generator of this kind.
    pub fn build(self, dim: usize) -> Result<Box<dyn LowDiscrepancy>, SeqError> {
        Ok(match self {
            SequenceKind::Sobol => Box::new(Sobol::new(dim)?),
            SequenceKind::Halton => Box::new(Halton::new(dim)?),
        })
    }
}

impl fmt::Display for SequenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceKind::Sobol => f.write_str("sobol"),
            SequenceKind::Halton => f.write_str("halton"),
        }
    }
}

impl FromStr for SequenceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sobol" => Ok(SequenceKind::Sobol),
            "halton" => Ok(SequenceKind::Halton),
            other => Err(format!("unknown sequence kind: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parse_and_display() {
        assert_eq!("sobol".parse::<SequenceKind>().unwrap(), SequenceKind::Sobol);
        assert_eq!(" Halton ".parse::<SequenceKind>().unwrap(), SequenceKind::Halton);
        assert!("random".parse::<SequenceKind>().is_err());
        assert_eq!(SequenceKind::Halton.to_string(), "halton");
    }

    #[test]
    fn kind_serde_lowercase() {
        let k: SequenceKind = serde_json::from_str("\"halton\"").unwrap();
        assert_eq!(k, SequenceKind::Halton);
        assert_eq!(serde_json::to_string(&SequenceKind::Sobol).unwrap(), "\"sobol\"");
    }

    #[test]
    fn build_respects_limits() {
        for kind in [SequenceKind::Sobol, SequenceKind::Halton] {
            let max = kind.max_dimension();
            let g = kind.build(max).unwrap();
            assert_eq!(g.dimension(), max);
            assert_eq!(
                kind.build(max + 1).err(),
                Some(SeqError::InvalidDimension { dim: max + 1, max })
            );
            assert!(kind.build(0).is_err());
        }
    }

    #[test]
    fn boxed_generator_is_usable() {
        let mut g = SequenceKind::Sobol.build(3).unwrap();
        let p = g.next_point().to_vec();
        assert_eq!(p, vec![0.5, 0.5, 0.5]);
        assert_eq!(g.index(), 1);
    }
}
