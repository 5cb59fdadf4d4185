//! Structural analysis of the state graph.
//!
//! # Overview
//!
//! This module owns every graph-shaped stage of the pipeline, from the raw
//! petgraph construction through classification and periodicity:
//!
//! ```text
//! states + weighted edges
//!        ↓  build::StateGraph::from_parts()
//! StateGraph (DiGraph, may contain cycles)
//!        ↓  condense::Condensation::from_graph()
//! Condensation
//!   ├─ classes: communicating classes (Tarjan postorder)
//!   └─ dag:     inter-class edges only (acyclic)
//!        ↓  classify::Classification::from_condensation()
//! Classification (transient vs recurrent)
//!        ↓  period::class_period() per recurrent class
//! Period per recurrent class
//! ```
//!
//! The numeric stages (transition matrix, steady-state solve) live in
//! [`crate::matrix`] and [`crate::solve`] and only consume what this
//! module produces.

pub mod build;
pub mod classify;
pub mod condense;
pub mod period;

// Re-export primary types at module level for convenience.
pub use build::{Edge, StateGraph};
pub use classify::{ClassKind, Classification};
pub use condense::{CommunicatingClass, Condensation};
pub use period::{class_period, Periodicity, DEFAULT_REVISIT_CAP};
