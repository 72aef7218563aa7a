use crate::KMeansError;

/// An immutable `n x dim` matrix of observations, stored row-major.
///
/// Per-feature bounds are computed once on construction and used to map
/// unit-hypercube seed points into the data's coordinate range.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    dim: usize,
    values: Vec<f64>,
    min: Vec<f64>,
    max: Vec<f64>,
}

impl Dataset {
    /// Builds a dataset from rows of equal, non-zero length.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, KMeansError> {
        let dim = rows.first().map(Vec::len).unwrap_or(0);
        let mut values = Vec::with_capacity(rows.len() * dim);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != dim {
                return Err(KMeansError::InvalidDataset(format!(
                    "row {i} has {} values, expected {dim}",
                    row.len()
                )));
            }
            values.extend_from_slice(row);
        }
        Self::from_flat(dim, values)
    }

    /// Builds a dataset from a row-major buffer of `dim`-wide rows.
    pub fn from_flat(dim: usize, values: Vec<f64>) -> Result<Self, KMeansError> {
        if dim == 0 {
            return Err(KMeansError::InvalidDataset(
                "observations must have at least one feature".into(),
            ));
        }
        if values.is_empty() {
            return Err(KMeansError::InvalidDataset("no observations".into()));
        }
        if values.len() % dim != 0 {
            return Err(KMeansError::InvalidDataset(format!(
                "{} values do not fill rows of {dim}",
                values.len()
            )));
        }
        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(KMeansError::InvalidDataset(format!(
                "non-finite value at row {}, column {}",
                pos / dim,
                pos % dim
            )));
        }

        let mut min = values[..dim].to_vec();
        let mut max = values[..dim].to_vec();
        for row in values.chunks_exact(dim).skip(1) {
            for (d, &x) in row.iter().enumerate() {
                if x < min[d] {
                    min[d] = x;
                }
                if x > max[d] {
                    max[d] = x;
                }
            }
        }

        Ok(Self {
            dim,
            values,
            min,
            max,
        })
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.values.len() / self.dim
    }

    /// Always false: construction rejects empty input.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of features per observation.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns observation `i`. Panics if out of range.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.dim..(i + 1) * self.dim]
    }

    /// Iterates observations in order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.values.chunks_exact(self.dim)
    }

    /// Per-feature minimum.
    pub fn min(&self) -> &[f64] {
        &self.min
    }

    /// Per-feature maximum.
    pub fn max(&self) -> &[f64] {
        &self.max
    }

    /// True when every observation is identical.
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    /// Largest absolute value over all observations.
    pub fn max_abs(&self) -> f64 {
        self.min
            .iter()
            .chain(&self.max)
            .fold(0.0, |m, v| v.abs().max(m))
    }

    /// Maps a point of `[0, 1)^dim` into the per-feature `[min, max]` box.
    ///
    /// Interpolates without forming `max - min`, which overflows for
    /// ranges wider than `f64::MAX`.
    pub fn scale_unit_point(&self, unit: &[f64], out: &mut [f64]) {
        for (d, (o, &u)) in out.iter_mut().zip(unit).enumerate() {
            let (lo, hi) = (self.min[d], self.max[d]);
            *o = if lo == hi { lo } else { lo * (1.0 - u) + hi * u };
        }
    }

    /// Coordinate-wise mean of all observations.
    pub fn mean(&self) -> Vec<f64> {
        let mut m = vec![0.0; self.dim];
        for (i, row) in self.rows().enumerate() {
            accumulate_mean(&mut m, row, i + 1);
        }
        m
    }

    /// Copy with every value multiplied by `factor`.
    pub(crate) fn scaled(&self, factor: f64) -> Self {
        let mul = |v: &[f64]| v.iter().map(|x| x * factor).collect::<Vec<_>>();
        Self {
            dim: self.dim,
            values: mul(&self.values),
            min: mul(&self.min),
            max: mul(&self.max),
        }
    }
}

/// Folds the `count`-th row into a running mean. Never forms the plain sum,
/// so large same-sign values cannot overflow.
pub(crate) fn accumulate_mean(mean: &mut [f64], row: &[f64], count: usize) {
    let n = count as f64;
    for (m, &x) in mean.iter_mut().zip(row) {
        *m += x / n - *m / n;
    }
}
