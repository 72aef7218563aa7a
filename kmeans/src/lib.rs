//! Lloyd k-means clustering seeded from deterministic low-discrepancy
//! sequences.
//!
//! Initial centroids are Sobol (or Halton) points mapped into the data's
//! per-feature bounding box instead of random samples, so a run is fully
//! reproducible from its inputs and the seeds spread evenly over the data.
//!
//! # Usage
//!
//! ```
//! use qmeans_kmeans::{Config, Dataset, KMeans};
//!
//! let data = Dataset::new(vec![
//!     vec![0.0, 0.0],
//!     vec![0.0, 1.0],
//!     vec![10.0, 0.0],
//!     vec![10.0, 1.0],
//! ])
//! .unwrap();
//!
//! let engine = KMeans::new(Config::new(2).with_restarts(3));
//! let res = engine.cluster(&data).unwrap();
//! assert!(res.converged);
//! assert_eq!(res.cluster_sizes(), vec![2, 2]);
//! ```
//!
//! # Design
//!
//! Each [`KMeans::cluster`] call owns one sequence generator. Restarts keep
//! drawing from it, and so does empty-cluster re-seeding, so no seed point is
//! ever reused within a call while the whole call stays deterministic.

mod config;
mod dataset;
mod distance;
mod error;
mod kmeans;

pub use config::Config;
pub use dataset::Dataset;
pub use distance::{Distance, SquaredEuclidean};
pub use error::KMeansError;
pub use kmeans::{ClusterResult, KMeans, Outcome, cluster};
pub use qmeans_seq::SequenceKind;
