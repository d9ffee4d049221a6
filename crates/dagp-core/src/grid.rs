//! Domain bounds and candidate grids for uncertainty sampling.

use serde::{Deserialize, Serialize};

use crate::error::GpError;
use crate::types::Matrix;

/// Component-wise closed domain `[lower, upper]`.
///
/// Constructed from observed inputs and only ever widened, so
/// `lower[d] <= upper[d]` holds for every component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl Bounds {
    /// Tightest bounds enclosing every row of `x`.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::EmptyTrainingSet`] if `x` has no rows.
    pub fn from_rows(x: &Matrix) -> Result<Self, GpError> {
        if x.nrows() == 0 {
            return Err(GpError::EmptyTrainingSet);
        }
        let lower = x.column_iter().map(|c| c.min()).collect();
        let upper = x.column_iter().map(|c| c.max()).collect();
        Ok(Self { lower, upper })
    }

    /// Widen each component independently to include every row of `x`.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::DimensionMismatch`] if `x` has a different width.
    pub fn widen(&mut self, x: &Matrix) -> Result<(), GpError> {
        if x.ncols() != self.dim() {
            return Err(GpError::DimensionMismatch {
                expected: self.dim(),
                found: x.ncols(),
            });
        }
        for (d, column) in x.column_iter().enumerate() {
            if column.is_empty() {
                continue;
            }
            self.lower[d] = self.lower[d].min(column.min());
            self.upper[d] = self.upper[d].max(column.max());
        }
        Ok(())
    }

    /// Number of components.
    pub fn dim(&self) -> usize {
        self.lower.len()
    }

    /// Lower corner `a`.
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Upper corner `b`.
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Whether `point` lies inside the closed box.
    pub fn contains(&self, point: &[f64]) -> bool {
        point.len() == self.dim()
            && point
                .iter()
                .zip(self.lower.iter().zip(&self.upper))
                .all(|(p, (lo, hi))| lo <= p && p <= hi)
    }
}

/// How candidate points are laid out over [`Bounds`].
///
/// Both layouts reduce to an ordinary linspace for one input dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CandidateGrid {
    /// `points` equally spaced vectors on the segment from `lower` to `upper`.
    ///
    /// Only the main diagonal of the box is searched when `d > 1`.
    Diagonal,

    /// Full tensor product with `ceil(points^(1/d))` values per axis, so at
    /// least `points` rows covering the whole box.
    #[default]
    Tensor,
}

impl CandidateGrid {
    /// Generate candidate rows over `bounds`.
    ///
    /// Points are ordered deterministically (axis 0 varies slowest for
    /// [`CandidateGrid::Tensor`]), which makes first-occurrence tie breaking
    /// reproducible.
    pub fn points(self, bounds: &Bounds, points: usize) -> Matrix {
        match self {
            CandidateGrid::Diagonal => diagonal(bounds, points),
            CandidateGrid::Tensor => tensor(bounds, points),
        }
    }
}

/// `points` values from `lo` to `hi` inclusive.
pub fn linspace(lo: f64, hi: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (points - 1) as f64;
            (0..points)
                .map(|i| if i == points - 1 { hi } else { lo + step * i as f64 })
                .collect()
        }
    }
}

fn diagonal(bounds: &Bounds, points: usize) -> Matrix {
    let axes: Vec<Vec<f64>> = (0..bounds.dim())
        .map(|d| linspace(bounds.lower[d], bounds.upper[d], points))
        .collect();
    Matrix::from_fn(points, bounds.dim(), |i, d| axes[d][i])
}

fn tensor(bounds: &Bounds, points: usize) -> Matrix {
    let dim = bounds.dim();
    if dim == 0 || points == 0 {
        return Matrix::zeros(0, dim);
    }
    let per_axis = per_axis_count(points, dim);
    let axes: Vec<Vec<f64>> = (0..dim)
        .map(|d| linspace(bounds.lower[d], bounds.upper[d], per_axis))
        .collect();
    let total = per_axis.pow(dim as u32);
    Matrix::from_fn(total, dim, |i, d| {
        // Mixed-radix decode with axis 0 as the most significant digit.
        let stride = per_axis.pow((dim - 1 - d) as u32);
        axes[d][(i / stride) % per_axis]
    })
}

fn per_axis_count(points: usize, dim: usize) -> usize {
    let mut k = (points as f64).powf(1.0 / dim as f64).floor() as usize;
    while k.pow(dim as u32) < points {
        k += 1;
    }
    k.max(1)
}
