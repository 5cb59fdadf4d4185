//! Communicating classes and condensation of the state graph.
//!
//! # Overview
//!
//! Two states communicate when each is reachable from the other, so the
//! communicating classes of a chain are exactly the strongly connected
//! components of its transition graph. Collapsing each class to one node
//! and keeping only inter-class edges yields the condensation, which is
//! always acyclic — a cycle between two condensed nodes would contradict
//! class maximality.
//!
//! # Ordering
//!
//! Classes are emitted in Tarjan postorder (reverse topological): every
//! class appears before the classes that can reach it, so terminal
//! (recurrent) classes come first. Members within a class are sorted
//! lexicographically. Both orderings are pinned by tests because callers
//! rely on reproducible output.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeSet, HashMap};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use tracing::instrument;

use crate::graph::build::StateGraph;

// ---------------------------------------------------------------------------
// CommunicatingClass
// ---------------------------------------------------------------------------

/// A maximal set of mutually reachable states.
///
/// Most chains condense to several singleton classes; classes with more
/// than one member are genuine communication cycles. A singleton with no
/// self-loop is still a valid (trivial) class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunicatingClass {
    /// State ids in this class (sorted for deterministic output).
    pub members: Vec<String>,
}

impl CommunicatingClass {
    /// Return `true` if this class contains exactly one state.
    #[must_use]
    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }

    /// Return the class representative: the lexicographically smallest
    /// member (deterministic).
    #[must_use]
    pub fn representative(&self) -> &str {
        self.members.first().map(String::as_str).unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Condensation
// ---------------------------------------------------------------------------

/// The state graph collapsed to its communicating classes.
///
/// Node `i` of `dag` corresponds to `classes[i]`; its weight is the class
/// index itself. Edges connect distinct classes only — intra-class edges
/// (self-loops included) are discarded during construction.
#[derive(Debug, Clone)]
pub struct Condensation {
    /// Communicating classes in Tarjan postorder.
    pub classes: Vec<CommunicatingClass>,
    /// Acyclic condensed graph over class indices.
    pub dag: DiGraph<usize, ()>,
    /// Mapping from state id to class index.
    pub class_of: HashMap<String, usize>,
}

impl Condensation {
    /// Partition `g` into communicating classes and build the condensation.
    ///
    /// Runs in `O(states + edges)` via Tarjan's one-pass SCC algorithm,
    /// then unions each class's member children, drops references back
    /// into the same class, and deduplicates the rest down to class ids.
    #[must_use]
    #[instrument(skip(g))]
    pub fn from_graph(g: &StateGraph) -> Self {
        let sccs = tarjan_scc(&g.graph);

        let mut classes: Vec<CommunicatingClass> = Vec::with_capacity(sccs.len());
        let mut class_of_node: Vec<usize> = vec![0; g.graph.node_count()];
        let mut class_of: HashMap<String, usize> = HashMap::with_capacity(g.graph.node_count());

        for (class_idx, component) in sccs.iter().enumerate() {
            let mut members: Vec<String> = component
                .iter()
                .filter_map(|&idx| g.state_id(idx).map(str::to_string))
                .collect();
            members.sort_unstable();

            for &idx in component {
                class_of_node[idx.index()] = class_idx;
            }
            for id in &members {
                class_of.insert(id.clone(), class_idx);
            }
            classes.push(CommunicatingClass { members });
        }

        let mut dag = DiGraph::<usize, ()>::with_capacity(classes.len(), classes.len());
        for class_idx in 0..classes.len() {
            dag.add_node(class_idx);
        }

        for (class_idx, component) in sccs.iter().enumerate() {
            // Union of member children, reduced to class ids; BTreeSet gives
            // deduplication and a deterministic edge order in one step.
            let targets: BTreeSet<usize> = component
                .iter()
                .flat_map(|&idx| g.children(idx))
                .map(|child| class_of_node[child.index()])
                .filter(|&target| target != class_idx)
                .collect();

            for target in targets {
                dag.add_edge(NodeIndex::new(class_idx), NodeIndex::new(target), ());
            }
        }

        Self {
            classes,
            dag,
            class_of,
        }
    }

    /// Return the number of communicating classes.
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Return the condensation out-degree of a class.
    #[must_use]
    pub fn out_degree(&self, class: usize) -> usize {
        self.dag
            .neighbors_directed(NodeIndex::new(class), Direction::Outgoing)
            .count()
    }

    /// Return the class index for a state id.
    #[must_use]
    pub fn class_of(&self, id: &str) -> Option<usize> {
        self.class_of.get(id).copied()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
