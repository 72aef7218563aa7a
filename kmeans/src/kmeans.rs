use std::borrow::Cow;
use std::fmt;

use qmeans_seq::LowDiscrepancy;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::dataset::accumulate_mean;
use crate::{Config, Dataset, Distance, KMeansError, SquaredEuclidean};

/// Magnitude (as a power of two) up to which squared differences of data
/// values stay finite, with headroom for summing them.
const SAFE_EXPONENT: i32 = 480;

/// How a single restart ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Centroid movement dropped below the tolerance.
    Converged,
    /// The iteration budget ran out first.
    IterationLimitReached,
}

/// The winning run of a [`KMeans::cluster`] call.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterResult {
    /// Final centroids, one `dim`-wide row per cluster.
    pub centroids: Vec<Vec<f64>>,

    /// Cluster index of every observation, in dataset order.
    pub assignment: Vec<usize>,

    /// Refinement iterations performed.
    pub iterations: usize,

    /// True if centroid movement fell below the tolerance.
    pub converged: bool,

    /// Sum over observations of the engine's [`Distance`] to the assigned
    /// centroid; the sum of squared Euclidean distances by default. `inf`
    /// when that sum exceeds the `f64` range.
    pub dispersion: f64,

    /// Zero-based index of the restart that produced this result.
    pub restart: usize,

    /// Dispersion after every assignment step of the winning restart.
    /// The last entry equals `dispersion`.
    pub history: Vec<f64>,
}

impl ClusterResult {
    /// Number of clusters.
    pub fn k(&self) -> usize {
        self.centroids.len()
    }

    pub fn outcome(&self) -> Outcome {
        if self.converged {
            Outcome::Converged
        } else {
            Outcome::IterationLimitReached
        }
    }

    /// Number of observations in each cluster. Assignments naming a cluster
    /// past `k` (possible only in hand-built results) are not counted.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.k()];
        for &c in &self.assignment {
            if let Some(n) = sizes.get_mut(c) {
                *n += 1;
            }
        }
        sizes
    }

    /// Observation indices assigned to cluster `c`, ascending.
    pub fn members(&self, c: usize) -> Vec<usize> {
        self.assignment
            .iter()
            .enumerate()
            .filter(|&(_, &a)| a == c)
            .map(|(i, _)| i)
            .collect()
    }
}

impl fmt::Debug for ClusterResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterResult")
            .field("k", &self.k())
            .field("n", &self.assignment.len())
            .field("iterations", &self.iterations)
            .field("converged", &self.converged)
            .field("dispersion", &self.dispersion)
            .field("restart", &self.restart)
            .finish()
    }
}

/// Lloyd k-means seeded from a low-discrepancy sequence.
///
/// Holds no per-run state: every [`cluster`](KMeans::cluster) call builds its
/// own sequence generator, so one engine can be shared across threads and
/// repeated calls return identical results.
pub struct KMeans {
    cfg: Config,
    distance: Box<dyn Distance>,
}

impl KMeans {
    /// Creates an engine using squared Euclidean distance.
    pub fn new(cfg: Config) -> Self {
        Self::with_distance(cfg, Box::new(SquaredEuclidean))
    }

    /// Creates an engine with a custom assignment metric.
    pub fn with_distance(cfg: Config, distance: Box<dyn Distance>) -> Self {
        Self { cfg, distance }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Partitions `data` into `cfg.k` clusters.
    ///
    /// Runs `cfg.restarts` seeded refinements that continue one shared
    /// sequence, so no restart reuses another's seed points, and returns the
    /// one with the lowest dispersion (earliest restart on ties).
    ///
    /// Fails only on invalid input, before any iteration. Running out of
    /// iterations is reported through [`ClusterResult::converged`].
    pub fn cluster(&self, data: &Dataset) -> Result<ClusterResult, KMeansError> {
        self.cfg.validate(data.len())?;
        let mut seq = self.cfg.sequence.build(data.dim())?;
        if data.is_degenerate() {
            return Err(KMeansError::DegenerateDataset { n: data.len() });
        }

        let scale = self.working_scale(data);
        let work = if scale == Scale::IDENTITY {
            Cow::Borrowed(data)
        } else {
            debug!(factor = scale.down, "clustering rescaled copy of dataset");
            Cow::Owned(data.scaled(scale.down))
        };

        let mut best: Option<ClusterResult> = None;
        for restart in 0..self.cfg.restarts {
            let run = self.refine(&work, seq.as_mut(), restart, scale);
            debug!(
                restart,
                iterations = run.iterations,
                outcome = ?run.outcome(),
                dispersion = run.dispersion,
                "kmeans restart finished"
            );
            if best.as_ref().is_none_or(|b| run.dispersion < b.dispersion) {
                best = Some(run);
            }
        }
        best.ok_or_else(|| KMeansError::InvalidConfiguration("restarts must be at least 1".into()))
    }

    /// Picks a power of two that keeps the metric finite on `data`.
    fn working_scale(&self, data: &Dataset) -> Scale {
        let Some(degree) = self.distance.homogeneity() else {
            return Scale::IDENTITY;
        };
        let max_abs = data.max_abs();
        if max_abs <= 2f64.powi(SAFE_EXPONENT) {
            return Scale::IDENTITY;
        }
        let shift = max_abs.log2().ceil() as i32 - SAFE_EXPONENT;
        Scale {
            down: 2f64.powi(-shift),
            up: 2f64.powi(shift),
            degree,
        }
    }

    /// One restart: seed, then iterate assignment/update until converged or
    /// out of budget. `data` is already in working units; the result is
    /// mapped back through `scale`.
    fn refine(
        &self,
        data: &Dataset,
        seq: &mut dyn LowDiscrepancy,
        restart: usize,
        scale: Scale,
    ) -> ClusterResult {
        let k = self.cfg.k;
        let dim = data.dim();

        let mut centroids = vec![0.0; k * dim];
        for slot in centroids.chunks_exact_mut(dim) {
            data.scale_unit_point(seq.next_point(), slot);
        }

        let mut assignment = vec![0usize; data.len()];
        let mut next = vec![0.0; k * dim];
        let mut counts = vec![0usize; k];
        let mut history = Vec::new();
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.cfg.max_iterations {
            iterations += 1;
            let dispersion = self.assign(data, &centroids, &mut assignment);
            history.push(dispersion);

            next.fill(0.0);
            counts.fill(0);
            for (row, &c) in data.rows().zip(&assignment) {
                counts[c] += 1;
                accumulate_mean(&mut next[c * dim..(c + 1) * dim], row, counts[c]);
            }
            for (c, slot) in next.chunks_exact_mut(dim).enumerate() {
                if counts[c] == 0 {
                    data.scale_unit_point(seq.next_point(), slot);
                    debug!(restart, iteration = iterations, cluster = c, "re-seeded empty cluster");
                }
            }

            let shift = max_shift(&centroids, &next) * scale.up;
            std::mem::swap(&mut centroids, &mut next);
            trace!(restart, iteration = iterations, dispersion, shift, "kmeans iteration");

            if shift < self.cfg.tolerance {
                converged = true;
                break;
            }
        }

        // Final assignment against the final centroids.
        let dispersion = self.assign(data, &centroids, &mut assignment);
        history.push(dispersion);

        ClusterResult {
            centroids: centroids
                .chunks_exact(dim)
                .map(|c| c.iter().map(|x| x * scale.up).collect())
                .collect(),
            assignment,
            iterations,
            converged,
            dispersion: scale.restore_distance(dispersion),
            restart,
            history: history.into_iter().map(|d| scale.restore_distance(d)).collect(),
        }
    }

    /// Assigns every observation to its nearest centroid, lowest index on
    /// ties, and returns the total distance.
    fn assign(&self, data: &Dataset, centroids: &[f64], assignment: &mut [usize]) -> f64 {
        let mut total = 0.0;
        for (row, slot) in data.rows().zip(assignment.iter_mut()) {
            let mut best = 0;
            let mut best_dist = f64::INFINITY;
            for (c, centroid) in centroids.chunks_exact(data.dim()).enumerate() {
                let d = self.distance.distance(row, centroid);
                if d < best_dist {
                    best_dist = d;
                    best = c;
                }
            }
            *slot = best;
            total += best_dist;
        }
        total
    }
}

/// Exact power-of-two mapping between caller units and working units.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Scale {
    down: f64,
    up: f64,
    degree: u32,
}

impl Scale {
    const IDENTITY: Scale = Scale {
        down: 1.0,
        up: 1.0,
        degree: 0,
    };

    /// Converts a working-unit distance back to caller units. Multiplies one
    /// factor at a time so a zero distance stays zero.
    fn restore_distance(&self, d: f64) -> f64 {
        (0..self.degree).fold(d, |d, _| d * self.up)
    }
}

/// Largest absolute coordinate change between two centroid sets. NaN if any
/// change is undefined, so the convergence test fails.
fn max_shift(prev: &[f64], next: &[f64]) -> f64 {
    prev.iter()
        .zip(next)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, |m, d| if d.is_nan() || d > m { d } else { m })
}

/// Clusters `data` with squared Euclidean distance and Sobol seeding.
pub fn cluster(
    data: &Dataset,
    k: usize,
    tolerance: f64,
    max_iterations: usize,
    restarts: usize,
) -> Result<ClusterResult, KMeansError> {
    let cfg = Config::new(k)
        .with_tolerance(tolerance)
        .with_max_iterations(max_iterations)
        .with_restarts(restarts);
    KMeans::new(cfg).cluster(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qmeans_seq::SequenceKind;

    fn four_points() -> Dataset {
        Dataset::new(vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![10.0, 0.0],
            vec![10.0, 1.0],
        ])
        .unwrap()
    }

    #[test]
    fn two_columns_scenario() {
        let res = cluster(&four_points(), 2, 1e-6, 100, 1).unwrap();
        assert!(res.converged);
        assert_eq!(res.outcome(), Outcome::Converged);
        assert_eq!(res.assignment, vec![0, 0, 1, 1]);
        assert_eq!(res.centroids, vec![vec![0.0, 0.5], vec![10.0, 0.5]]);
        assert_eq!(res.dispersion, 1.0);
        assert_eq!(res.iterations, 2);
        assert_eq!(res.restart, 0);
        assert_eq!(res.history, vec![63.625, 1.0, 1.0]);
    }

    #[test]
    fn assign_breaks_ties_to_lowest_index() {
        let data = Dataset::new(vec![vec![0.0], vec![2.0]]).unwrap();
        let engine = KMeans::new(Config::new(2));
        // Both observations are equidistant from the two centroids.
        let centroids = [1.0, 1.0];
        let mut assignment = vec![9, 9];
        let total = engine.assign(&data, &centroids, &mut assignment);
        assert_eq!(assignment, vec![0, 0]);
        assert_eq!(total, 2.0);
    }

    #[test]
    fn empty_cluster_is_reseeded() {
        // Both observations start nearest the first seed; the second cluster
        // stays empty through two re-seeds before it captures (0, 0).
        let data = Dataset::new(vec![vec![0.0, 0.0], vec![10.0, 10.0]]).unwrap();
        let res = cluster(&data, 2, 1e-6, 100, 1).unwrap();
        assert!(res.converged);
        assert_eq!(res.iterations, 4);
        assert_eq!(res.assignment, vec![1, 0]);
        assert_eq!(res.centroids, vec![vec![10.0, 10.0], vec![0.0, 0.0]]);
        assert_eq!(res.dispersion, 0.0);
        assert_eq!(res.history, vec![100.0, 100.0, 78.125, 0.0, 0.0]);
    }

    #[test]
    fn iteration_limit_is_not_an_error() {
        let res = cluster(&four_points(), 2, 1e-6, 1, 1).unwrap();
        assert!(!res.converged);
        assert_eq!(res.outcome(), Outcome::IterationLimitReached);
        assert_eq!(res.iterations, 1);
        assert_eq!(res.assignment.len(), 4);
    }

    #[test]
    fn degenerate_dataset() {
        let data = Dataset::new(vec![vec![3.0, 3.0]; 5]).unwrap();
        assert_eq!(
            cluster(&data, 2, 1e-6, 10, 1).unwrap_err(),
            KMeansError::DegenerateDataset { n: 5 }
        );
    }

    #[test]
    fn configuration_checked_before_dataset() {
        let data = Dataset::new(vec![vec![3.0, 3.0]; 5]).unwrap();
        assert!(matches!(
            cluster(&data, 0, 1e-6, 10, 1),
            Err(KMeansError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn unsupported_dimension() {
        let rows: Vec<Vec<f64>> = (0..3).map(|i| vec![i as f64; 22]).collect();
        let data = Dataset::new(rows).unwrap();
        assert!(matches!(
            cluster(&data, 2, 1e-6, 10, 1),
            Err(KMeansError::InvalidDimension(_))
        ));

        // Halton reaches further.
        let engine = KMeans::new(Config::new(2).with_sequence(SequenceKind::Halton));
        assert!(engine.cluster(&data).is_ok());
    }

    #[test]
    fn cluster_sizes_and_members() {
        let res = cluster(&four_points(), 2, 1e-6, 100, 1).unwrap();
        assert_eq!(res.cluster_sizes(), vec![2, 2]);
        assert_eq!(res.members(1), vec![2, 3]);
        assert_eq!(res.k(), 2);
    }

    #[test]
    fn max_shift_is_chebyshev() {
        assert_eq!(max_shift(&[0.0, 1.0, 2.0], &[0.5, -1.0, 2.0]), 2.0);
        assert_eq!(max_shift(&[1.0], &[1.0]), 0.0);
    }

    #[test]
    fn max_shift_keeps_nan() {
        assert!(max_shift(&[f64::INFINITY, 0.0], &[f64::INFINITY, 1.0]).is_nan());
        assert!(max_shift(&[0.0, f64::NAN], &[5.0, 0.0]).is_nan());
    }

    #[test]
    fn restarts_continue_the_sequence() {
        let data = four_points();
        let engine = KMeans::new(Config::new(2));
        let mut seq = SequenceKind::Sobol.build(2).unwrap();

        let first = engine.refine(&data, seq.as_mut(), 0, Scale::IDENTITY);
        assert_eq!(seq.index(), 2);
        let second = engine.refine(&data, seq.as_mut(), 1, Scale::IDENTITY);
        assert_eq!(seq.index(), 4);

        // Seeded from draws 3 and 4: (2.5, 0.75) and (3.75, 0.375).
        assert_eq!(second.history, vec![91.78125, 1.0, 1.0]);
        assert_eq!(first.history, vec![63.625, 1.0, 1.0]);
        assert_eq!(second.dispersion, first.dispersion);
    }

    #[test]
    fn equal_dispersion_keeps_earliest_restart() {
        let res = cluster(&four_points(), 2, 1e-6, 100, 2).unwrap();
        assert_eq!(res.restart, 0);
        assert_eq!(res.history, vec![63.625, 1.0, 1.0]);
    }

    #[test]
    fn later_restart_wins_when_strictly_better() {
        // Draws 1 and 2 (0.5, 0.75) settle on {0, 0.6} | {1}, dispersion 0.18.
        // Draws 3 and 4 (0.25, 0.375) settle on {0} | {0.6, 1}, dispersion 0.08.
        let data = Dataset::new(vec![vec![0.0], vec![0.6], vec![1.0]]).unwrap();

        let one = cluster(&data, 2, 1e-6, 100, 1).unwrap();
        assert_eq!(one.assignment, vec![0, 0, 1]);

        let two = cluster(&data, 2, 1e-6, 100, 2).unwrap();
        assert_eq!(two.restart, 1);
        assert_eq!(two.assignment, vec![0, 1, 1]);
        assert!(two.dispersion < one.dispersion);
        assert!((two.dispersion - 0.08).abs() < 1e-12);
        assert!((two.centroids[1][0] - 0.8).abs() < 1e-12);
    }

    #[test]
    fn extreme_range_one_observation_per_cluster() {
        let data = Dataset::new(vec![vec![-1e308], vec![1e308]]).unwrap();
        let res = cluster(&data, 2, 1e-6, 100, 1).unwrap();
        assert!(res.converged);
        assert_eq!(res.assignment, vec![0, 1]);
        assert_eq!(res.centroids, vec![vec![-1e308], vec![1e308]]);
        assert_eq!(res.dispersion, 0.0);
    }

    #[test]
    fn extreme_values_keep_finite_centroids() {
        let data = Dataset::new(vec![vec![1e308], vec![1.5e308], vec![1.7e308], vec![0.0]]).unwrap();
        let res = cluster(&data, 2, 1e-6, 100, 1).unwrap();
        assert!(res.converged);
        assert_eq!(res.assignment, vec![0, 1, 1, 0]);
        assert!(res.centroids.iter().flatten().all(|x| x.is_finite()));
        assert!((res.centroids[0][0] - 5e307).abs() < 1e294);
        assert!((res.centroids[1][0] - 1.6e308).abs() < 1e295);
        // The true sum of squares exceeds the f64 range.
        assert_eq!(res.dispersion, f64::INFINITY);
    }

    #[test]
    fn cluster_sizes_ignores_foreign_labels() {
        let mut res = cluster(&four_points(), 2, 1e-6, 100, 1).unwrap();
        res.assignment[3] = 7;
        assert_eq!(res.cluster_sizes(), vec![2, 1]);
    }
}
