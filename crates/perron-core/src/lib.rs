#![forbid(unsafe_code)]
//! perron-core: analysis engine for finite discrete-time Markov chains.
//!
//! Given a chain as states plus weighted directed edges, one call to
//! [`analyze`] derives its structure and, when one exists, its stationary
//! distribution:
//!
//! - communicating classes (strongly connected components) and the acyclic
//!   condensation of the state graph;
//! - transient/recurrent classification by condensation out-degree;
//! - the period of every recurrent class;
//! - the row-stochastic transition matrix with validity findings;
//! - the steady-state vector, solved by arbitrary-precision Gauss-Jordan
//!   elimination, when the chain is valid with exactly one aperiodic
//!   recurrent class.
//!
//! The engine is a single synchronous pass over immutable inputs: no I/O,
//! no interior state, no caching. Re-running on the same input reproduces
//! the same record byte for byte.
//!
//! # Quick start
//!
//! ```rust
//! use perron_core::{analyze, AnalyzeOptions, Edge};
//!
//! let states: Vec<String> = ["sun", "rain"].iter().map(ToString::to_string).collect();
//! let edges = vec![
//!     Edge::new("sun", "sun", 0.6),
//!     Edge::new("sun", "rain", 0.4),
//!     Edge::new("rain", "sun", 0.4),
//!     Edge::new("rain", "rain", 0.6),
//! ];
//!
//! let record = analyze(&states, &edges, &AnalyzeOptions::default())?;
//! assert!(record.unique_steady_state);
//! assert_eq!(record.steady_state, Some(vec![0.5, 0.5]));
//! # Ok::<(), perron_core::AnalysisError>(())
//! ```
//!
//! # Conventions
//!
//! - **Errors**: [`AnalysisError`] for input contract violations only;
//!   structural findings are data in [`ChainAnalysis`].
//! - **Logging**: `tracing` macros (`debug!`, `warn!`), instrumented at
//!   the orchestrator and graph build.

pub mod analyze;
pub mod error;
pub mod graph;
pub mod matrix;
pub mod solve;

pub use analyze::{analyze, AnalyzeOptions, ChainAnalysis, ClassPeriod};
pub use error::AnalysisError;
pub use graph::{
    class_period, ClassKind, Classification, CommunicatingClass, Condensation, Edge, Periodicity,
    StateGraph, DEFAULT_REVISIT_CAP,
};
pub use matrix::{TransitionMatrix, Validity, ROW_SUM_TOLERANCE};
pub use solve::{steady_state, DEFAULT_PIVOT_TOLERANCE};
