//! A module for computing eigenvector centrality by power iteration.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Configuration for eigenvector centrality.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EigenvectorConfig {
    /// Iteration cap, the computation fails past it.
    pub max_iterations: usize,
    /// Convergence threshold per vertex, the iteration stops once the summed absolute change
    /// falls below `n * tolerance`.
    pub tolerance: f64,
}

impl Default for EigenvectorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-6,
        }
    }
}

impl EigenvectorConfig {
    pub const fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Computes the dominant eigenvector of the supplied adjacency matrix, scores unit-normalised.
///
/// A vertex's score accumulates from the vertices pointing at it. The iteration runs on
/// `Aᵀ + I` rather than `Aᵀ`: the shift leaves the eigenvectors unchanged but keeps bipartite
/// graphs, whose spectrum is symmetric, from oscillating forever.
pub(crate) fn compute_eigenvector(
    adjacency_matrix: DMatrix<f64>,
    config: &EigenvectorConfig,
) -> Result<DVector<f64>> {
    let n = adjacency_matrix.nrows();

    // Early return if the matrix is empty, there is nothing to iterate on.
    if n == 0 {
        return Ok(DVector::zeros(0));
    }

    let shifted = adjacency_matrix.transpose() + DMatrix::<f64>::identity(n, n);
    let threshold = n as f64 * config.tolerance;

    let mut scores = DVector::<f64>::from_element(n, 1.0 / n as f64);

    for iteration in 1..=config.max_iterations {
        let mut next = &shifted * &scores;

        let norm = next.norm();
        if norm == 0.0 {
            break;
        }
        next.unscale_mut(norm);

        let change = (&next - &scores).abs().sum();
        scores = next;

        if change < threshold {
            debug!(iteration, "eigenvector centrality converged");
            return Ok(scores);
        }
    }

    warn!(
        iterations = config.max_iterations,
        "eigenvector centrality did not converge"
    );

    Err(Error::NoConvergence {
        iterations: config.max_iterations,
    })
}
