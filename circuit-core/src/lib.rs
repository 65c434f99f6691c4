//! Core types and error handling for the circuit crossing verifier
//!
//! This crate contains the fundamental, I/O-free data model shared by the
//! rest of the workspace:
//!
//! - Common error types with [`Error`] and [`Result`]
//! - [`Wire`] and [`WireId`], an immutable wire segment and its identity
//! - [`WireLayer`], the keyed collection of wires making up one chip layer
//! - [`OrderKey`], the comparison key used by `circuit-engine`'s ordered
//!   index
//!
//! # Example
//!
//! ```
//! use circuit_core::WireLayer;
//!
//! let mut layer = WireLayer::new();
//! layer.add("a", 0.0, 0.0, 10.0, 0.0).unwrap();
//! layer.add("b", 5.0, -5.0, 5.0, 5.0).unwrap();
//! assert_eq!(layer.len(), 2);
//! ```

pub mod error;
pub mod layer;
pub mod order_key;
pub mod wire;

pub use error::{Error, Result};
pub use layer::WireLayer;
pub use order_key::OrderKey;
pub use wire::{Wire, WireId};
