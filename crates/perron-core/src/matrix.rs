//! Transition matrix construction and row-stochastic validation.
//!
//! # Overview
//!
//! Builds the dense transition matrix of a chain in the caller's state
//! ordering, either from explicit edge weights (missing edges are 0) or by
//! splitting each state's outgoing mass uniformly across its distinct
//! children (childless states become absorbing). Validation checks every
//! row sum against 1 and reports the offending state ids — an invalid
//! chain is a finding, not an error, because structural analysis is still
//! meaningful for it. The steady-state solver must not run on an invalid
//! matrix; the orchestrator enforces that.

#![allow(clippy::module_name_repetitions)]

use std::collections::BTreeSet;

use nalgebra::{DMatrix, RowDVector};

use crate::error::AnalysisError;
use crate::graph::build::StateGraph;

/// Tolerance for a row sum to count as 1. Part of the validity definition,
/// not a tuning knob.
pub const ROW_SUM_TOLERANCE: f64 = 1e-9;

// ---------------------------------------------------------------------------
// TransitionMatrix
// ---------------------------------------------------------------------------

/// A row-indexed transition matrix over a fixed state ordering.
///
/// Row `i` holds the transition probabilities out of `order[i]`. Built once
/// from a [`StateGraph`] and immutable thereafter.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix {
    matrix: DMatrix<f64>,
    order: Vec<String>,
}

/// Outcome of row-stochastic validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validity {
    /// `true` when every row sums to 1 within [`ROW_SUM_TOLERANCE`].
    pub valid: bool,
    /// Ids of states whose rows do not sum to 1, in state order.
    pub invalid_states: Vec<String>,
}

impl TransitionMatrix {
    /// Build from explicit edge weights; absent edges contribute 0.
    #[must_use]
    pub fn explicit(g: &StateGraph) -> Self {
        use petgraph::visit::EdgeRef;

        let n = g.node_count();
        let mut matrix = DMatrix::<f64>::zeros(n, n);

        // Node index → row in the caller's state ordering.
        let mut row_of = vec![0usize; n];
        for (row, id) in g.order.iter().enumerate() {
            row_of[g.node_map[id].index()] = row;
        }

        for edge in g.graph.edge_references() {
            let row = row_of[edge.source().index()];
            let col = row_of[edge.target().index()];
            matrix[(row, col)] += *edge.weight();
        }

        Self {
            matrix,
            order: g.order.clone(),
        }
    }

    /// Build by splitting each state's mass evenly over its distinct
    /// children; a childless state self-transitions with probability 1.
    #[must_use]
    pub fn uniform(g: &StateGraph) -> Self {
        let n = g.node_count();
        let mut matrix = DMatrix::<f64>::zeros(n, n);

        let mut row_of = vec![0usize; n];
        for (row, id) in g.order.iter().enumerate() {
            row_of[g.node_map[id].index()] = row;
        }

        for (row, id) in g.order.iter().enumerate() {
            let idx = g.node_map[id];
            let children: BTreeSet<usize> = g
                .children(idx)
                .into_iter()
                .map(|c| row_of[c.index()])
                .collect();

            if children.is_empty() {
                matrix[(row, row)] = 1.0;
            } else {
                #[allow(clippy::cast_precision_loss)]
                let share = 1.0 / children.len() as f64;
                for col in children {
                    matrix[(row, col)] = share;
                }
            }
        }

        Self {
            matrix,
            order: g.order.clone(),
        }
    }

    /// Number of states.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// `true` when the chain has no states.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The state ordering the rows and columns are indexed by.
    #[must_use]
    pub fn state_order(&self) -> &[String] {
        &self.order
    }

    /// The underlying dense matrix.
    #[must_use]
    pub fn inner(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Transition probability from `order[from]` to `order[to]`.
    #[must_use]
    pub fn prob(&self, from: usize, to: usize) -> f64 {
        self.matrix[(from, to)]
    }

    /// Row-major copy, e.g. for serialization into the analysis record.
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<f64>> {
        (0..self.len())
            .map(|i| self.matrix.row(i).iter().copied().collect())
            .collect()
    }

    /// Check that every row sums to 1 within [`ROW_SUM_TOLERANCE`].
    #[must_use]
    pub fn validate(&self) -> Validity {
        let invalid_states: Vec<String> = self
            .order
            .iter()
            .enumerate()
            .filter_map(|(i, id)| {
                let sum: f64 = self.matrix.row(i).sum();
                ((sum - 1.0).abs() > ROW_SUM_TOLERANCE).then(|| id.clone())
            })
            .collect();

        Validity {
            valid: invalid_states.is_empty(),
            invalid_states,
        }
    }

    /// Push a distribution through the chain `steps` times.
    ///
    /// Plain `f64` arithmetic: n-step propagation is not precision-critical
    /// the way the steady-state elimination is.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::DistributionLength`] if `initial` does not
    /// have one entry per state.
    pub fn propagate(&self, initial: &[f64], steps: usize) -> Result<Vec<f64>, AnalysisError> {
        if initial.len() != self.len() {
            return Err(AnalysisError::DistributionLength {
                expected: self.len(),
                got: initial.len(),
            });
        }

        let mut vector = RowDVector::<f64>::from_row_slice(initial);
        for _ in 0..steps {
            vector = &vector * &self.matrix;
        }
        Ok(vector.iter().copied().collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
