//! Whole-chain analysis: options, result record, and the orchestrator.
//!
//! # Pipeline
//!
//! ```text
//! states + edges
//!       ↓  StateGraph::from_parts()        (contract checks, content hash)
//!       ↓  TransitionMatrix + validate()   (explicit or uniform-successor)
//!       ↓  Condensation::from_graph()      (communicating classes)
//!       ↓  Classification                  (transient / recurrent)
//!       ↓  class_period() per recurrent class
//!       ↓  steady_state()                  only for a valid chain with
//!                                          exactly one aperiodic
//!                                          recurrent class
//! ChainAnalysis
//! ```
//!
//! `analyze` is pure: the host re-invokes it whenever the input graph
//! changes and diffs the records itself. Nothing is cached here — the
//! record's `content_hash` is the key a host-side cache would use.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::AnalysisError;
use crate::graph::build::{Edge, StateGraph};
use crate::graph::classify::Classification;
use crate::graph::condense::Condensation;
use crate::graph::period::{class_period, Periodicity, DEFAULT_REVISIT_CAP};
use crate::matrix::TransitionMatrix;
use crate::solve::{steady_state, DEFAULT_PIVOT_TOLERANCE};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Tunable parameters for one analysis pass.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Ignore edge weights and split each state's mass uniformly over its
    /// distinct children (childless states become absorbing).
    /// Default: `false`.
    pub uniform_successors: bool,
    /// Decimal places for the steady-state vector, applied only at
    /// extraction. Default: 4.
    pub decimal_places: u32,
    /// Magnitude at or below which an elimination pivot counts as zero.
    /// Default: 1e-9.
    pub pivot_tolerance: f64,
    /// Per-node revisit cap for periodicity cycle sampling. Default: 100.
    pub revisit_cap: u32,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            uniform_successors: false,
            decimal_places: 4,
            pivot_tolerance: DEFAULT_PIVOT_TOLERANCE,
            revisit_cap: DEFAULT_REVISIT_CAP,
        }
    }
}

// ---------------------------------------------------------------------------
// Result record
// ---------------------------------------------------------------------------

/// Period of one recurrent class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassPeriod {
    /// Index into `communicating_classes`.
    pub class: usize,
    /// GCD of sampled cycle lengths through the class representative.
    pub period: u64,
    /// `APERIODIC` iff `period == 1`.
    pub label: Periodicity,
}

/// Everything one analysis pass derives from a chain.
///
/// All fields are plain data so a rendering layer can consume the record
/// without touching the engine again. Collections are either input-ordered
/// or `BTreeMap`s, so serializing the record twice for the same input gives
/// byte-identical output.
#[derive(Debug, Clone, Serialize)]
pub struct ChainAnalysis {
    /// `true` when every matrix row sums to 1.
    pub valid: bool,
    /// States whose rows do not sum to 1, in state order.
    pub invalid_states: Vec<String>,
    /// Total number of states.
    pub state_count: usize,
    /// All transient states, flattened in class order.
    pub transient_states: Vec<String>,
    /// Number of transient states.
    pub transient_count: usize,
    /// Member lists of recurrent classes, in class order.
    pub recurrent_classes: Vec<Vec<String>>,
    /// All recurrent states, flattened in class order.
    pub recurrent_states: Vec<String>,
    /// Number of recurrent states.
    pub recurrent_count: usize,
    /// Member lists of every communicating class, in class order.
    pub communicating_classes: Vec<Vec<String>>,
    /// State id → index into `communicating_classes`.
    pub class_of_state: BTreeMap<String, usize>,
    /// Period and label per recurrent class.
    pub periods: Vec<ClassPeriod>,
    /// The built transition matrix, row-major in `state_order`.
    pub transition_matrix: Vec<Vec<f64>>,
    /// The state ordering the matrix and steady-state vector use.
    pub state_order: Vec<String>,
    /// The original adjacency relation (every state is a key).
    pub adjacency: BTreeMap<String, Vec<String>>,
    /// `true` when the chain is valid and has exactly one recurrent class
    /// with period 1.
    pub unique_steady_state: bool,
    /// Stationary distribution aligned to `state_order`; present only when
    /// `unique_steady_state` is `true`.
    pub steady_state: Option<Vec<f64>>,
    /// BLAKE3 hash of the input graph, for host-side caching.
    pub content_hash: String,
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Run the full analysis pass over one chain.
///
/// # Errors
///
/// Only input contract violations (see [`AnalysisError`]); every structural
/// finding about a well-formed chain lands in the returned record.
#[instrument(skip(states, edges, options), fields(states = states.len(), edges = edges.len()))]
pub fn analyze(
    states: &[String],
    edges: &[Edge],
    options: &AnalyzeOptions,
) -> Result<ChainAnalysis, AnalysisError> {
    let graph = StateGraph::from_parts(states, edges)?;

    let matrix = if options.uniform_successors {
        TransitionMatrix::uniform(&graph)
    } else {
        TransitionMatrix::explicit(&graph)
    };
    let validity = matrix.validate();

    let condensation = Condensation::from_graph(&graph);
    let classification = Classification::from_condensation(&condensation);

    let periods: Vec<ClassPeriod> = classification
        .recurrent
        .iter()
        .map(|&class| {
            let period = class_period(&graph, &condensation.classes[class], options.revisit_cap);
            ClassPeriod {
                class,
                period,
                label: Periodicity::of(period),
            }
        })
        .collect();

    let unique_steady_state = validity.valid
        && classification.recurrent.len() == 1
        && periods.first().is_some_and(|p| p.period == 1);

    let steady = unique_steady_state.then(|| {
        steady_state(&matrix, options.pivot_tolerance, options.decimal_places)
    });

    debug!(
        classes = condensation.class_count(),
        recurrent = classification.recurrent.len(),
        valid = validity.valid,
        unique_steady_state,
        "analysis complete"
    );

    let recurrent_classes: Vec<Vec<String>> = classification
        .recurrent
        .iter()
        .map(|&class| condensation.classes[class].members.clone())
        .collect();
    let recurrent_states: Vec<String> = recurrent_classes.iter().flatten().cloned().collect();

    Ok(ChainAnalysis {
        valid: validity.valid,
        invalid_states: validity.invalid_states,
        state_count: graph.node_count(),
        transient_count: classification.transient_states.len(),
        transient_states: classification.transient_states,
        recurrent_count: recurrent_states.len(),
        recurrent_classes,
        recurrent_states,
        communicating_classes: condensation
            .classes
            .iter()
            .map(|class| class.members.clone())
            .collect(),
        class_of_state: condensation.class_of.iter().map(|(k, v)| (k.clone(), *v)).collect(),
        periods,
        transition_matrix: matrix.rows(),
        state_order: matrix.state_order().to_vec(),
        adjacency: graph.adjacency(),
        unique_steady_state,
        steady_state: steady,
        content_hash: graph.content_hash,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
