//! Crossing-detection engine for the circuit verifier
//!
//! This crate implements the sweep-line algorithm that decides which wires
//! on a layer cross each other, built on the following components:
//!
//! - **[`OrderedIndex`]**: a balanced, order-statistic AVL tree over the
//!   wires active on the current sweep line
//! - **[`CrossVerifier`]**: drives the sweep, turning each wire into `Add`,
//!   `Query`, or `Delete` events and replaying them through the index
//! - **[`ResultSink`]**: collects the crossing pairs a verifier run finds
//! - **[`tracer`]**: optional decorators recording a structured transcript
//!   of a run, for the visualizer
//!
//! # Example
//!
//! ```no_run
//! use circuit_core::WireLayer;
//! use circuit_engine::CrossVerifier;
//!
//! let mut layer = WireLayer::new();
//! layer.add("a", 0.0, 0.0, 10.0, 0.0).unwrap();
//! layer.add("b", 5.0, -5.0, 5.0, 5.0).unwrap();
//!
//! let mut verifier = CrossVerifier::new(&layer);
//! assert_eq!(verifier.count_crossings().unwrap(), 1);
//! ```

pub mod ordered_index;
pub mod result_sink;
pub mod tracer;
pub mod verifier;

pub use ordered_index::OrderedIndex;
pub use result_sink::{Crossing, ResultSink};
pub use tracer::{SharedTrace, Trace, TraceRecord, TracedIndex, TracedSink};
pub use verifier::CrossVerifier;
