/// Halton low-discrepancy sequence generator.
///
/// Coordinate `d` is the radical inverse of the draw index in the `d`-th
/// prime base. Cheap to evaluate at any index, but coordinates in large
/// prime bases correlate for short prefixes, so prefer [`Sobol`](crate::Sobol)
/// above a handful of dimensions.
pub struct Halton {
    dim: usize,
    index: u64,
    point: Vec<f64>,
}

const PRIMES: [u64; 32] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
    97, 101, 103, 107, 109, 113, 127, 131,
];

impl Halton {
    /// Largest supported dimension.
    pub const MAX_DIMENSION: usize = PRIMES.len();

    /// Creates a generator for `dim`-dimensional points.
    pub fn new(dim: usize) -> Result<Self, crate::SeqError> {
        if dim == 0 || dim > Self::MAX_DIMENSION {
            return Err(crate::SeqError::InvalidDimension {
                dim,
                max: Self::MAX_DIMENSION,
            });
        }
        Ok(Self {
            dim,
            index: 0,
            point: vec![0.0; dim],
        })
    }
}

impl crate::LowDiscrepancy for Halton {
    fn dimension(&self) -> usize {
        self.dim
    }

    fn index(&self) -> u64 {
        self.index
    }

    fn next_point(&mut self) -> &[f64] {
        self.index = self.index.wrapping_add(1).max(1);
        for (p, &base) in self.point.iter_mut().zip(PRIMES.iter()) {
            *p = radical_inverse(self.index, base);
        }
        &self.point
    }

    fn reset(&mut self) {
        self.index = 0;
        self.point.fill(0.0);
    }

    fn skip(&mut self, n: u64) {
        self.index = self.index.wrapping_add(n);
        for (p, &base) in self.point.iter_mut().zip(PRIMES.iter()) {
            *p = radical_inverse(self.index, base);
        }
    }
}

/// Mirrors the base-`base` digits of `n` around the radix point.
fn radical_inverse(mut n: u64, base: u64) -> f64 {
    let inv = 1.0 / base as f64;
    let mut scale = inv;
    let mut x = 0.0;
    while n > 0 {
        x += (n % base) as f64 * scale;
        n /= base;
        scale *= inv;
    }
    x
}
