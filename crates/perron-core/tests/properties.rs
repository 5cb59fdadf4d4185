//! Property-based invariants over arbitrary small chains.
//!
//! These hold for *every* input the contract admits, so they are checked
//! with proptest-generated graphs rather than fixtures: the communicating
//! classes partition the state set, the condensation is acyclic, and
//! uniform-successor matrices are row-stochastic by construction.

use proptest::prelude::*;

use perron_core::{
    analyze, AnalyzeOptions, Condensation, Edge, StateGraph, TransitionMatrix,
};

/// Arbitrary chain: up to 8 states, up to 3n directed unit edges.
fn chain_strategy() -> impl Strategy<Value = (Vec<String>, Vec<Edge>)> {
    (1usize..8).prop_flat_map(|n| {
        let states: Vec<String> = (0..n).map(|i| format!("s{i}")).collect();
        prop::collection::vec((0..n, 0..n), 0..=3 * n).prop_map(move |pairs| {
            let edges: Vec<Edge> = pairs
                .iter()
                .map(|&(from, to)| Edge::new(states[from].clone(), states[to].clone(), 1.0))
                .collect();
            (states.clone(), edges)
        })
    })
}

proptest! {
    #[test]
    fn classes_partition_the_state_set((states, edges) in chain_strategy()) {
        let g = StateGraph::from_parts(&states, &edges).expect("build graph");
        let c = Condensation::from_graph(&g);

        let mut seen: Vec<String> = c
            .classes
            .iter()
            .flat_map(|class| class.members.iter().cloned())
            .collect();
        seen.sort_unstable();

        let mut expected = states.clone();
        expected.sort_unstable();
        prop_assert_eq!(seen, expected);

        // Each state maps to the class that actually contains it.
        for (idx, class) in c.classes.iter().enumerate() {
            for member in &class.members {
                prop_assert_eq!(c.class_of(member), Some(idx));
            }
        }
    }

    #[test]
    fn condensation_is_acyclic((states, edges) in chain_strategy()) {
        let g = StateGraph::from_parts(&states, &edges).expect("build graph");
        let c = Condensation::from_graph(&g);
        prop_assert!(!petgraph::algo::is_cyclic_directed(&c.dag));
    }

    #[test]
    fn uniform_matrices_always_validate((states, edges) in chain_strategy()) {
        let g = StateGraph::from_parts(&states, &edges).expect("build graph");
        let v = TransitionMatrix::uniform(&g).validate();
        prop_assert!(v.valid, "invalid rows: {:?}", v.invalid_states);
    }

    #[test]
    fn transient_and_recurrent_states_never_overlap((states, edges) in chain_strategy()) {
        let options = AnalyzeOptions {
            uniform_successors: true,
            ..AnalyzeOptions::default()
        };
        let record = analyze(&states, &edges, &options).expect("analyze");

        for id in &record.transient_states {
            prop_assert!(
                !record.recurrent_states.contains(id),
                "state {} classified both ways",
                id
            );
        }
        prop_assert_eq!(
            record.transient_count + record.recurrent_count,
            record.state_count
        );

        // At least one recurrent class exists in any finite chain.
        prop_assert!(!record.recurrent_classes.is_empty());
    }

    #[test]
    fn steady_state_present_exactly_when_flagged((states, edges) in chain_strategy()) {
        let options = AnalyzeOptions {
            uniform_successors: true,
            ..AnalyzeOptions::default()
        };
        let record = analyze(&states, &edges, &options).expect("analyze");
        prop_assert_eq!(record.unique_steady_state, record.steady_state.is_some());

        if let Some(pi) = record.steady_state {
            prop_assert_eq!(pi.len(), record.state_count);
            let sum: f64 = pi.iter().sum();
            prop_assert!((sum - 1.0).abs() < 1e-2, "Σπ = {}", sum);
        }
    }
}
