//! Periodicity detection for recurrent classes.
//!
//! # Overview
//!
//! The period of a recurrent class is the greatest common divisor of the
//! lengths of all directed cycles through any one of its states — every
//! state in a communicating class shares the same period, so one
//! representative suffices. Period 1 means the class is aperiodic and a
//! steady state can exist.
//!
//! # Algorithm
//!
//! Breadth-first traversal from the class representative over the original
//! adjacency relation (not the condensation). Every time the traversal
//! rediscovers the representative, the path length at that point is a cycle
//! length; the period is the GCD of all recorded lengths. A direct
//! self-loop short-circuits to period 1 without traversal.
//!
//! # Bounded Work
//!
//! Each node is expanded at most `revisit_cap` times, so the traversal does
//! at most `revisit_cap × edges` work and always terminates. Hitting the
//! cap under-samples cycle lengths on adversarial graphs: the result is
//! then a best-effort approximation (a multiple of the true period), never
//! an error. The GCD can only shrink as lengths accumulate, so the
//! traversal also stops as soon as it reaches 1.

use std::collections::VecDeque;

use serde::Serialize;
use tracing::instrument;

use crate::graph::build::StateGraph;
use crate::graph::condense::CommunicatingClass;

/// Default per-node revisit cap for the cycle-sampling traversal.
pub const DEFAULT_REVISIT_CAP: u32 = 100;

/// Aperiodic/periodic label for a recurrent class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Periodicity {
    /// Period 1.
    Aperiodic,
    /// Period greater than 1.
    Periodic,
}

impl Periodicity {
    /// Label for a computed period.
    #[must_use]
    pub const fn of(period: u64) -> Self {
        if period == 1 {
            Self::Aperiodic
        } else {
            Self::Periodic
        }
    }
}

/// Compute the period of a recurrent class.
///
/// Samples cycle lengths through the class representative (its
/// lexicographically smallest member) and returns their GCD. States with
/// no cycle at all (a childless singleton) degrade to period 1, matching
/// the convention that an absorbing state is aperiodic.
#[must_use]
#[instrument(skip(g, class), fields(representative = class.representative()))]
pub fn class_period(g: &StateGraph, class: &CommunicatingClass, revisit_cap: u32) -> u64 {
    let Some(start) = g.node_index(class.representative()) else {
        return 1;
    };

    // Direct self-loop: shortest possible cycle, period is 1 regardless of
    // anything else.
    if g.graph.find_edge(start, start).is_some() {
        return 1;
    }

    let mut expansions = vec![0u32; g.graph.node_count()];
    let mut queue: VecDeque<(petgraph::graph::NodeIndex, u64)> =
        g.children(start).into_iter().map(|c| (c, 1)).collect();
    let mut period = 0u64;

    while let Some((node, depth)) = queue.pop_front() {
        if node == start {
            // Cycle closed: fold its length into the running GCD. Paths
            // continuing through the start only repeat cycles already
            // accounted for, so the walk is not extended here.
            period = gcd(period, depth);
            if period == 1 {
                break;
            }
            continue;
        }

        let count = &mut expansions[node.index()];
        if *count >= revisit_cap {
            continue;
        }
        *count += 1;

        for child in g.children(node) {
            queue.push_back((child, depth + 1));
        }
    }

    period.max(1)
}

/// Greatest common divisor; `gcd(0, n) == n` so 0 seeds a fold.
#[must_use]
pub const fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build::{Edge, StateGraph};
    use crate::graph::condense::Condensation;

    fn graph(states: &[&str], edges: &[(&str, &str)]) -> StateGraph {
        let ids: Vec<String> = states.iter().map(|s| (*s).to_string()).collect();
        let weighted: Vec<Edge> = edges
            .iter()
            .map(|(from, to)| Edge::new(*from, *to, 1.0))
            .collect();
        StateGraph::from_parts(&ids, &weighted).expect("build graph")
    }

    fn period_of(states: &[&str], edges: &[(&str, &str)], member: &str) -> u64 {
        let g = graph(states, edges);
        let c = Condensation::from_graph(&g);
        let idx = c.class_of(member).expect("state classified");
        class_period(&g, &c.classes[idx], DEFAULT_REVISIT_CAP)
    }

    #[test]
    fn gcd_basics() {
        assert_eq!(gcd(0, 5), 5);
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(7, 13), 1);
        assert_eq!(gcd(9, 9), 9);
    }

    #[test]
    fn self_loop_is_aperiodic() {
        assert_eq!(period_of(&["a"], &[("a", "a")], "a"), 1);
    }

    #[test]
    fn two_cycle_has_period_two() {
        assert_eq!(period_of(&["a", "b"], &[("a", "b"), ("b", "a")], "a"), 2);
    }

    #[test]
    fn three_cycle_has_period_three() {
        assert_eq!(
            period_of(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")], "a"),
            3
        );
    }

    #[test]
    fn four_cycle_reports_four_not_two() {
        // A chordless cycle must report its full length even though 4 is
        // composite.
        assert_eq!(
            period_of(
                &["a", "b", "c", "d"],
                &[("a", "b"), ("b", "c"), ("c", "d"), ("d", "a")],
                "a"
            ),
            4
        );
    }

    #[test]
    fn mixed_cycle_lengths_reduce_by_gcd() {
        // Cycles of length 2 (a-b) and 3 (a-b-c): gcd is 1.
        assert_eq!(
            period_of(
                &["a", "b", "c"],
                &[("a", "b"), ("b", "a"), ("b", "c"), ("c", "a")],
                "a"
            ),
            1
        );
    }

    #[test]
    fn nested_even_cycles_share_period_two() {
        // Cycles of length 2 and 4 through a: period 2.
        assert_eq!(
            period_of(
                &["a", "b", "c", "d"],
                &[
                    ("a", "b"),
                    ("b", "a"),
                    ("b", "c"),
                    ("c", "d"),
                    ("d", "a"),
                ],
                "a"
            ),
            2
        );
    }

    #[test]
    fn inner_self_loop_makes_class_aperiodic() {
        // a-b two-cycle plus b self-loop: lengths 2 and 3 observed from a.
        assert_eq!(
            period_of(&["a", "b"], &[("a", "b"), ("b", "a"), ("b", "b")], "a"),
            1
        );
    }

    #[test]
    fn childless_singleton_degrades_to_one() {
        assert_eq!(period_of(&["a"], &[], "a"), 1);
    }

    #[test]
    fn tight_cap_still_terminates_with_best_effort() {
        // With the smallest possible cap the traversal still closes the
        // first cycle (three expansions, one per node) and terminates.
        let g = graph(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
        let c = Condensation::from_graph(&g);
        let idx = c.class_of("a").expect("classified");
        assert_eq!(class_period(&g, &c.classes[idx], 1), 3);
    }

    #[test]
    fn representative_is_smallest_member() {
        // Period must not depend on which member the caller thinks of
        // first: the class picks its own representative.
        assert_eq!(period_of(&["z", "m", "a"], &[("z", "m"), ("m", "a"), ("a", "z")], "m"), 3);
    }
}
