//! State graph construction from declared states and weighted edges.
//!
//! # Overview
//!
//! This module turns the caller-supplied state list and weighted edge list
//! into a [`petgraph`] directed graph that every later analysis stage reads.
//!
//! ## Input Contract
//!
//! Every state id referenced by an edge must appear in the declared state
//! list — an undeclared reference is a contract violation and fails fast
//! with [`AnalysisError::MissingState`] before any analysis runs. Duplicate
//! declarations and non-finite or negative weights are rejected the same
//! way. A well-formed but non-stochastic chain is *not* an error here; row
//! validation lives in [`crate::matrix`].
//!
//! ## Cache Invalidation
//!
//! [`StateGraph::content_hash`] is a BLAKE3 hash of the state ordering and
//! the weighted edge list. The core never caches; an embedding host can key
//! its own cache on this hash plus the analysis options.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeMap, HashMap};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::AnalysisError;

// ---------------------------------------------------------------------------
// Edge
// ---------------------------------------------------------------------------

/// A weighted directed transition between two states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Source state id.
    pub from: String,
    /// Target state id.
    pub to: String,
    /// Transition weight (a probability in a well-formed chain).
    pub weight: f64,
}

impl Edge {
    /// Convenience constructor.
    pub fn new(from: impl Into<String>, to: impl Into<String>, weight: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            weight,
        }
    }
}

// ---------------------------------------------------------------------------
// StateGraph
// ---------------------------------------------------------------------------

/// The immutable transition graph of one Markov chain.
///
/// Nodes are state ids (strings). An edge `a → b` carries the transition
/// weight from `a` to `b`. Edges repeated in the input accumulate their
/// weights into a single graph edge, so the graph never holds parallel
/// edges.
#[derive(Debug, Clone)]
pub struct StateGraph {
    /// Directed graph: nodes = state ids, edge weights = transition weights.
    pub graph: DiGraph<String, f64>,
    /// Mapping from state id to petgraph `NodeIndex`.
    pub node_map: HashMap<String, NodeIndex>,
    /// Declared state ids in input order. Fixes the matrix and steady-state
    /// vector ordering.
    pub order: Vec<String>,
    /// BLAKE3 content hash of states + weighted edges for cache invalidation.
    pub content_hash: String,
}

impl StateGraph {
    /// Build a [`StateGraph`] from declared states and weighted edges.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::DuplicateState`] for a repeated declaration,
    /// [`AnalysisError::MissingState`] for an edge endpoint that was never
    /// declared, and [`AnalysisError::InvalidWeight`] for a weight that is
    /// negative, NaN, or infinite.
    #[instrument(skip(states, edges))]
    pub fn from_parts(states: &[String], edges: &[Edge]) -> Result<Self, AnalysisError> {
        let mut graph = DiGraph::<String, f64>::new();
        let mut node_map: HashMap<String, NodeIndex> = HashMap::with_capacity(states.len());

        for id in states {
            if node_map.contains_key(id) {
                return Err(AnalysisError::DuplicateState { id: id.clone() });
            }
            let idx = graph.add_node(id.clone());
            node_map.insert(id.clone(), idx);
        }

        let content_hash = compute_content_hash(states, edges);

        for edge in edges {
            if !edge.weight.is_finite() || edge.weight < 0.0 {
                return Err(AnalysisError::InvalidWeight {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    weight: edge.weight,
                });
            }

            let from_idx = resolve(&node_map, edge, &edge.from)?;
            let to_idx = resolve(&node_map, edge, &edge.to)?;

            // Accumulate repeated (from, to) pairs into one edge.
            if let Some(existing) = graph.find_edge(from_idx, to_idx) {
                if let Some(w) = graph.edge_weight_mut(existing) {
                    *w += edge.weight;
                }
            } else {
                graph.add_edge(from_idx, to_idx, edge.weight);
            }
        }

        Ok(Self {
            graph,
            node_map,
            order: states.to_vec(),
            content_hash,
        })
    }

    /// Return the number of states in the chain.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of distinct transitions in the chain.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Look up the `NodeIndex` for a state id.
    #[must_use]
    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    /// Return the state id label for a node.
    #[must_use]
    pub fn state_id(&self, idx: NodeIndex) -> Option<&str> {
        self.graph.node_weight(idx).map(String::as_str)
    }

    /// Children of a node in edge insertion order.
    ///
    /// petgraph iterates edges most-recent-first; the reversal restores the
    /// order the caller supplied.
    #[must_use]
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut out: Vec<NodeIndex> = self.graph.edges(idx).map(|e| e.target()).collect();
        out.reverse();
        out
    }

    /// The full adjacency relation: every declared state maps to its
    /// children in edge insertion order (empty for childless states).
    #[must_use]
    pub fn adjacency(&self) -> BTreeMap<String, Vec<String>> {
        self.order
            .iter()
            .map(|id| {
                let idx = self.node_map[id];
                let children = self
                    .children(idx)
                    .into_iter()
                    .filter_map(|c| self.state_id(c).map(str::to_string))
                    .collect();
                (id.clone(), children)
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn resolve(
    node_map: &HashMap<String, NodeIndex>,
    edge: &Edge,
    id: &str,
) -> Result<NodeIndex, AnalysisError> {
    node_map
        .get(id)
        .copied()
        .ok_or_else(|| AnalysisError::MissingState {
            from: edge.from.clone(),
            to: edge.to.clone(),
            missing: id.to_string(),
        })
}

/// Compute a BLAKE3 hash of the state ordering and weighted edge list.
fn compute_content_hash(states: &[String], edges: &[Edge]) -> String {
    let mut hasher = blake3::Hasher::new();
    for id in states {
        hasher.update(id.as_bytes());
        hasher.update(b"\x00");
    }
    hasher.update(b"\x01");
    for edge in edges {
        hasher.update(edge.from.as_bytes());
        hasher.update(b"\x00");
        hasher.update(edge.to.as_bytes());
        hasher.update(b"\x00");
        hasher.update(&edge.weight.to_le_bytes());
    }
    format!("blake3:{}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
