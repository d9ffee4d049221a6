//! Derivative-free minimization (Nelder–Mead simplex).
//!
//! Used to minimize the negative log marginal likelihood over log-space
//! hyperparameters. The optimizer always returns the best vertex it has seen,
//! whether or not a tolerance was met; non-convergence is reported through
//! [`Minimum::converged`] and never as an error.

use serde::{Deserialize, Serialize};

/// Stopping criteria and initial simplex size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Maximum simplex iterations.
    ///
    /// Default: 400
    pub max_iterations: usize,

    /// Stop when the spread of objective values across the simplex is below this.
    ///
    /// Default: 1e-8
    pub f_tolerance: f64,

    /// Stop when every vertex is within this distance of the best, per coordinate.
    ///
    /// Default: 1e-6
    pub x_tolerance: f64,

    /// Offset applied to each coordinate to build the initial simplex.
    ///
    /// Default: 0.5 (in log space, roughly a factor of 1.65).
    pub initial_step: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_iterations: 400,
            f_tolerance: 1e-8,
            x_tolerance: 1e-6,
            initial_step: 0.5,
        }
    }
}

impl OptimizerConfig {
    /// Set the iteration limit.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Result of a minimization run.
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    /// Best point found.
    pub x: Vec<f64>,
    /// Objective at `x`.
    pub value: f64,
    /// Iterations performed.
    pub iterations: usize,
    /// Whether a tolerance was met before the iteration limit.
    pub converged: bool,
}

const ALPHA: f64 = 1.0;
const GAMMA: f64 = 2.0;
const RHO: f64 = 0.5;
const SIGMA: f64 = 0.5;

/// Minimize `f` starting from `x0`.
///
/// Non-finite objective values are treated as `+∞`, so the simplex simply
/// moves away from infeasible regions.
pub fn nelder_mead<F>(mut f: F, x0: &[f64], config: &OptimizerConfig) -> Minimum
where
    F: FnMut(&[f64]) -> f64,
{
    let n = x0.len();
    let mut eval = |x: &[f64]| {
        let v = f(x);
        if v.is_finite() {
            v
        } else {
            f64::INFINITY
        }
    };

    if n == 0 {
        let value = eval(x0);
        return Minimum {
            x: Vec::new(),
            value,
            iterations: 0,
            converged: true,
        };
    }

    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    simplex.push(x0.to_vec());
    for i in 0..n {
        let mut vertex = x0.to_vec();
        vertex[i] += config.initial_step;
        simplex.push(vertex);
    }
    let mut values: Vec<f64> = simplex.iter().map(|v| eval(v)).collect();

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iterations {
        sort_simplex(&mut simplex, &mut values);

        if has_converged(&simplex, &values, config) {
            converged = true;
            break;
        }
        iterations += 1;

        let centroid = centroid(&simplex[..n]);
        let worst = &simplex[n];

        let reflected = affine(&centroid, worst, ALPHA);
        let f_reflected = eval(&reflected);

        if f_reflected < values[0] {
            let expanded = affine(&centroid, worst, GAMMA);
            let f_expanded = eval(&expanded);
            if f_expanded < f_reflected {
                simplex[n] = expanded;
                values[n] = f_expanded;
            } else {
                simplex[n] = reflected;
                values[n] = f_reflected;
            }
            continue;
        }

        if f_reflected < values[n - 1] {
            simplex[n] = reflected;
            values[n] = f_reflected;
            continue;
        }

        // Contraction: outside if the reflection improved on the worst vertex.
        let (contracted, f_contracted) = if f_reflected < values[n] {
            let c = affine(&centroid, worst, RHO);
            let fc = eval(&c);
            (c, fc)
        } else {
            let c = affine(&centroid, worst, -RHO);
            let fc = eval(&c);
            (c, fc)
        };

        if f_contracted < values[n].min(f_reflected) {
            simplex[n] = contracted;
            values[n] = f_contracted;
            continue;
        }

        // Shrink towards the best vertex.
        let best = simplex[0].clone();
        for (vertex, value) in simplex.iter_mut().zip(values.iter_mut()).skip(1) {
            for (x, b) in vertex.iter_mut().zip(&best) {
                *x = b + SIGMA * (*x - b);
            }
            *value = eval(vertex);
        }
    }

    sort_simplex(&mut simplex, &mut values);
    Minimum {
        x: simplex.swap_remove(0),
        value: values[0],
        iterations,
        converged,
    }
}

/// `c + t (c - w)`: reflection (t = 1), expansion (t = 2), contractions (t = ±½).
fn affine(c: &[f64], w: &[f64], t: f64) -> Vec<f64> {
    c.iter().zip(w).map(|(ci, wi)| ci + t * (ci - wi)).collect()
}

fn centroid(vertices: &[Vec<f64>]) -> Vec<f64> {
    let n = vertices.len() as f64;
    let dim = vertices[0].len();
    (0..dim)
        .map(|j| vertices.iter().map(|v| v[j]).sum::<f64>() / n)
        .collect()
}

fn sort_simplex(simplex: &mut [Vec<f64>], values: &mut [f64]) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    let sorted_vertices: Vec<Vec<f64>> = order.iter().map(|&i| simplex[i].clone()).collect();
    let sorted_values: Vec<f64> = order.iter().map(|&i| values[i]).collect();
    simplex.clone_from_slice(&sorted_vertices);
    values.copy_from_slice(&sorted_values);
}

fn has_converged(simplex: &[Vec<f64>], values: &[f64], config: &OptimizerConfig) -> bool {
    let best = values[0];
    let worst = values[values.len() - 1];
    if !best.is_finite() {
        return false;
    }
    let f_spread = if worst.is_finite() {
        worst - best
    } else {
        f64::INFINITY
    };
    let x_spread = simplex[1..]
        .iter()
        .flat_map(|v| v.iter().zip(&simplex[0]).map(|(a, b)| (a - b).abs()))
        .fold(0.0_f64, f64::max);
    f_spread <= config.f_tolerance && x_spread <= config.x_tolerance
}
