//! Transient/recurrent classification of communicating classes.
//!
//! A class is recurrent exactly when its condensation node has out-degree
//! zero: once the chain enters it, no inter-class edge can carry it out.
//! Every other class is transient. The split is exhaustive and exclusive,
//! so transient and recurrent states together partition the state set.

#![allow(clippy::module_name_repetitions)]

use crate::graph::condense::Condensation;

/// Whether a communicating class can be left once entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    /// The class has at least one outgoing inter-class edge.
    Transient,
    /// The class has no outgoing inter-class edges.
    Recurrent,
}

/// The transient/recurrent split of a condensation.
#[derive(Debug, Clone)]
pub struct Classification {
    /// Kind of each class, indexed like `Condensation::classes`.
    pub kinds: Vec<ClassKind>,
    /// Indices of recurrent classes, in class order.
    pub recurrent: Vec<usize>,
    /// Indices of transient classes, in class order.
    pub transient: Vec<usize>,
    /// All transient states flattened, in class order with members sorted.
    ///
    /// Exposed separately because callers usually gray out "all transient
    /// states" without caring about class structure.
    pub transient_states: Vec<String>,
}

impl Classification {
    /// Classify every class of `c` by its condensation out-degree.
    #[must_use]
    pub fn from_condensation(c: &Condensation) -> Self {
        let kinds: Vec<ClassKind> = (0..c.class_count())
            .map(|idx| {
                if c.out_degree(idx) == 0 {
                    ClassKind::Recurrent
                } else {
                    ClassKind::Transient
                }
            })
            .collect();

        let recurrent: Vec<usize> = kinds
            .iter()
            .enumerate()
            .filter_map(|(idx, kind)| (*kind == ClassKind::Recurrent).then_some(idx))
            .collect();
        let transient: Vec<usize> = kinds
            .iter()
            .enumerate()
            .filter_map(|(idx, kind)| (*kind == ClassKind::Transient).then_some(idx))
            .collect();

        let transient_states: Vec<String> = transient
            .iter()
            .flat_map(|&idx| c.classes[idx].members.iter().cloned())
            .collect();

        Self {
            kinds,
            recurrent,
            transient,
            transient_states,
        }
    }

    /// Return `true` if the class at `idx` is recurrent.
    #[must_use]
    pub fn is_recurrent(&self, idx: usize) -> bool {
        self.kinds.get(idx) == Some(&ClassKind::Recurrent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build::{Edge, StateGraph};
    use crate::graph::condense::Condensation;

    fn classify(states: &[&str], edges: &[(&str, &str)]) -> (Condensation, Classification) {
        let ids: Vec<String> = states.iter().map(|s| (*s).to_string()).collect();
        let weighted: Vec<Edge> = edges
            .iter()
            .map(|(from, to)| Edge::new(*from, *to, 1.0))
            .collect();
        let g = StateGraph::from_parts(&ids, &weighted).expect("build graph");
        let c = Condensation::from_graph(&g);
        let cls = Classification::from_condensation(&c);
        (c, cls)
    }

    #[test]
    fn feeder_into_two_absorbing_states() {
        // t feeds two absorbing states: each absorber is a singleton
        // recurrent class, t is transient.
        let (c, cls) = classify(
            &["t", "x", "y"],
            &[("t", "x"), ("t", "y"), ("x", "x"), ("y", "y")],
        );

        assert_eq!(cls.recurrent.len(), 2);
        assert_eq!(cls.transient.len(), 1);
        assert_eq!(cls.transient_states, vec!["t".to_string()]);

        for &idx in &cls.recurrent {
            assert!(c.classes[idx].is_singleton());
            assert_eq!(c.out_degree(idx), 0);
        }
    }

    #[test]
    fn full_cycle_is_single_recurrent_class() {
        let (_, cls) = classify(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);

        assert_eq!(cls.recurrent.len(), 1);
        assert!(cls.transient.is_empty());
        assert!(cls.transient_states.is_empty());
        assert!(cls.is_recurrent(0));
    }

    #[test]
    fn chain_has_one_terminal_recurrent_class() {
        // a → b → c: only c (no way out) is recurrent.
        let (c, cls) = classify(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);

        assert_eq!(cls.recurrent.len(), 1);
        assert_eq!(c.classes[cls.recurrent[0]].members, vec!["c".to_string()]);

        let mut transient = cls.transient_states.clone();
        transient.sort_unstable();
        assert_eq!(transient, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn transient_and_recurrent_partition_states() {
        let (c, cls) = classify(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("b", "a"), ("b", "c"), ("c", "d"), ("d", "c")],
        );

        let recurrent_states: Vec<String> = cls
            .recurrent
            .iter()
            .flat_map(|&idx| c.classes[idx].members.iter().cloned())
            .collect();

        let mut all: Vec<String> = recurrent_states
            .iter()
            .chain(cls.transient_states.iter())
            .cloned()
            .collect();
        all.sort_unstable();
        assert_eq!(all, vec!["a", "b", "c", "d"], "no overlap, no gap");
    }

    #[test]
    fn kinds_are_exhaustive() {
        let (_, cls) = classify(&["a", "b"], &[("a", "b")]);
        assert_eq!(cls.kinds.len(), 2);
        assert_eq!(cls.recurrent.len() + cls.transient.len(), 2);
    }
}
