/// Sobol low-discrepancy sequence generator.
///
/// Points are produced in Gray-code order (Antonov-Saleev), so each draw
/// costs one XOR per coordinate. Coordinates carry [`Sobol::BITS`] bits of
/// precision and are exact `f64` values.
///
/// # Direction Numbers
///
/// The first coordinate is the base-2 van der Corput sequence. The remaining
/// coordinates use the Joe-Kuo "new-joe-kuo-6" primitive polynomials and
/// initial direction numbers, which bounds the supported dimension at
/// [`Sobol::MAX_DIMENSION`].
pub struct Sobol {
    dim: usize,
    index: u64,
    /// `dim x BITS` direction numbers, row per coordinate.
    directions: Vec<[u64; BITS]>,
    /// Current integer state, one per coordinate.
    state: Vec<u64>,
    point: Vec<f64>,
}

const BITS: usize = 52;

/// (degree s, polynomial coefficients a, initial m_1..m_s) for coordinates 2..
const JOE_KUO: &[(u32, u32, &[u64])] = &[
    (1, 0, &[1]),
    (2, 1, &[1, 3]),
    (3, 1, &[1, 3, 1]),
    (3, 2, &[1, 1, 1]),
    (4, 1, &[1, 1, 3, 3]),
    (4, 4, &[1, 3, 5, 13]),
    (5, 2, &[1, 1, 5, 5, 17]),
    (5, 4, &[1, 1, 5, 5, 5]),
    (5, 7, &[1, 1, 7, 11, 19]),
    (5, 11, &[1, 1, 5, 1, 1]),
    (5, 13, &[1, 1, 1, 3, 11]),
    (5, 14, &[1, 3, 5, 5, 31]),
    (6, 1, &[1, 3, 3, 9, 7, 49]),
    (6, 13, &[1, 1, 1, 15, 21, 21]),
    (6, 16, &[1, 3, 1, 13, 27, 49]),
    (6, 19, &[1, 1, 1, 15, 7, 5]),
    (6, 22, &[1, 3, 1, 15, 13, 25]),
    (6, 25, &[1, 1, 5, 5, 19, 61]),
    (7, 1, &[1, 3, 7, 11, 23, 15, 103]),
    (7, 4, &[1, 3, 7, 13, 13, 15, 69]),
];

/// Draws before the Gray-code walk runs out of direction numbers.
const PERIOD: u64 = (1 << BITS) - 1;

impl Sobol {
    /// Bits of precision per coordinate.
    pub const BITS: usize = BITS;

    /// Largest supported dimension.
    pub const MAX_DIMENSION: usize = JOE_KUO.len() + 1;

    const SCALE: f64 = 1.0 / (1u64 << BITS) as f64;

    /// Creates a generator for `dim`-dimensional points.
    pub fn new(dim: usize) -> Result<Self, crate::SeqError> {
        if dim == 0 || dim > Self::MAX_DIMENSION {
            return Err(crate::SeqError::InvalidDimension {
                dim,
                max: Self::MAX_DIMENSION,
            });
        }

        let mut directions = Vec::with_capacity(dim);
        directions.push(van_der_corput_directions());
        for &(s, a, m) in &JOE_KUO[..dim - 1] {
            directions.push(joe_kuo_directions(s, a, m));
        }

        Ok(Self {
            dim,
            index: 0,
            directions,
            state: vec![0; dim],
            point: vec![0.0; dim],
        })
    }

    fn refresh_point(&mut self) {
        for (p, &x) in self.point.iter_mut().zip(&self.state) {
            *p = x as f64 * Self::SCALE;
        }
    }
}

impl crate::LowDiscrepancy for Sobol {
    fn dimension(&self) -> usize {
        self.dim
    }

    fn index(&self) -> u64 {
        self.index
    }

    fn next_point(&mut self) -> &[f64] {
        if self.index >= PERIOD {
            self.reset();
        }
        // Gray code: draw n flips the direction at the lowest zero bit of n-1.
        let c = self.index.trailing_ones() as usize;
        for (x, v) in self.state.iter_mut().zip(&self.directions) {
            *x ^= v[c];
        }
        self.index += 1;
        self.refresh_point();
        &self.point
    }

    fn reset(&mut self) {
        self.index = 0;
        self.state.fill(0);
        self.point.fill(0.0);
    }

    fn skip(&mut self, n: u64) {
        let target = ((self.index as u128 + n as u128) % PERIOD as u128) as u64;
        let gray = target ^ (target >> 1);
        for (x, v) in self.state.iter_mut().zip(&self.directions) {
            *x = 0;
            for (bit, dir) in v.iter().enumerate() {
                if gray >> bit & 1 == 1 {
                    *x ^= dir;
                }
            }
        }
        self.index = target;
        self.refresh_point();
    }
}

fn van_der_corput_directions() -> [u64; BITS] {
    let mut v = [0u64; BITS];
    for (i, d) in v.iter_mut().enumerate() {
        *d = 1 << (BITS - 1 - i);
    }
    v
}

fn joe_kuo_directions(s: u32, a: u32, m: &[u64]) -> [u64; BITS] {
    let s = s as usize;
    let mut v = [0u64; BITS];
    for i in 0..s {
        v[i] = m[i] << (BITS - 1 - i);
    }
    for i in s..BITS {
        v[i] = v[i - s] ^ (v[i - s] >> s);
        for k in 1..s {
            if (a >> (s - 1 - k)) & 1 == 1 {
                v[i] ^= v[i - k];
            }
        }
    }
    v
}
