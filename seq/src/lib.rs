//! Deterministic low-discrepancy point sequences in the unit hypercube `[0, 1)^d`.
//!
//! Unlike pseudo-random sampling, the same generator configured with the same
//! dimension always yields the same points, on every platform, and the points
//! cover the hypercube evenly even for small sample counts.
//!
//! # Usage
//!
//! ```
//! use qmeans_seq::{LowDiscrepancy, Sobol};
//!
//! let mut sobol = Sobol::new(2).unwrap();
//! assert_eq!(sobol.next_point(), &[0.5, 0.5]);
//! assert_eq!(sobol.next_point(), &[0.75, 0.25]);
//!
//! // Rewind and replay the same points.
//! sobol.reset();
//! assert_eq!(sobol.next_point(), &[0.5, 0.5]);
//! ```
//!
//! # Design
//!
//! Generators are plain owned values: there is no global state, so two
//! generators never interfere with each other. The all-zero point at index 0
//! is never returned; the first draw is index 1.

mod error;
mod halton;
mod sequence;
mod sobol;

pub use error::SeqError;
pub use halton::Halton;
pub use sequence::{LowDiscrepancy, SequenceKind};
pub use sobol::Sobol;
