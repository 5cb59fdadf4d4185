//! Error types for the perron-core crate.
//!
//! Only *contract violations* — malformed input that makes analysis
//! meaningless — surface as errors, and they are rejected before any
//! computation begins. Structural findings about a well-formed chain
//! (non-stochastic rows, no unique steady state) are data in the
//! [`ChainAnalysis`](crate::analyze::ChainAnalysis) record, never errors.

/// Error type for all fallible operations in the perron-core crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    /// Returned when an edge references a state that was never declared.
    #[error("edge {from} -> {to} references undeclared state `{missing}`")]
    MissingState {
        /// Source state id of the offending edge.
        from: String,
        /// Target state id of the offending edge.
        to: String,
        /// The undeclared state id.
        missing: String,
    },

    /// Returned when the same state id is declared more than once.
    #[error("state `{id}` is declared more than once")]
    DuplicateState {
        /// The repeated state id.
        id: String,
    },

    /// Returned when an edge weight is negative, NaN, or infinite.
    #[error("edge {from} -> {to} has invalid weight {weight} (must be finite and >= 0)")]
    InvalidWeight {
        /// Source state id.
        from: String,
        /// Target state id.
        to: String,
        /// The rejected weight.
        weight: f64,
    },

    /// Returned when a distribution vector does not match the state count.
    #[error("distribution length mismatch: expected {expected}, got {got}")]
    DistributionLength {
        /// Number of states in the chain.
        expected: usize,
        /// Length of the supplied distribution.
        got: usize,
    },
}
