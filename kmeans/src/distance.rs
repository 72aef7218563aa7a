/// Dissimilarity used by the assignment step.
///
/// The update step always recomputes centroids as arithmetic means, which is
/// the exact minimizer only for [`SquaredEuclidean`]. Other metrics plug in
/// here but turn the engine into a heuristic for them.
pub trait Distance: Send + Sync {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64;

    /// Degree `p` with `distance(s * a, s * b) == s^p * distance(a, b)`.
    ///
    /// When known, data too large for the metric to evaluate without
    /// overflowing is clustered in a power-of-two rescaled copy. `None`
    /// disables the rescaling.
    fn homogeneity(&self) -> Option<u32> {
        None
    }
}

/// Sum of squared coordinate differences.
#[derive(Debug, Clone, Copy, Default)]
pub struct SquaredEuclidean;

impl Distance for SquaredEuclidean {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        let mut s = 0.0;
        for (x, y) in a.iter().zip(b) {
            let d = x - y;
            s += d * d;
        }
        s
    }

    fn homogeneity(&self) -> Option<u32> {
        Some(2)
    }
}
