//! Textual I/O adapters around the circuit crossing verifier
//!
//! Everything in [`circuit_core`] and [`circuit_engine`] is I/O-free; this
//! crate is the narrow adapter layer spec.md §1 calls out as "external
//! collaborators" — a line-oriented reader, a count/list/JSONP writer, and
//! the binary entry point that wires them to standard input and output.

pub mod input;
pub mod output;

pub use circuit_core::{Error, Result};
