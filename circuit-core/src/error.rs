//! Error types for the circuit crossing verifier
//!
//! Input-derived errors ([`Error::InvalidGeometry`], [`Error::DuplicateName`],
//! [`Error::InputSyntax`]) are expected whenever a layer description is
//! malformed. The remaining variants indicate a verifier bug — an invariant
//! of the ordered index or the sweep was violated — and are fatal; they
//! should never occur in a correct run.

use thiserror::Error;

/// The main error type for circuit verification operations
#[derive(Error, Debug)]
pub enum Error {
    /// An I/O error occurred while reading the layer description
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The JSONP trace payload could not be serialized
    #[error("failed to serialize trace payload: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A wire's endpoints are neither perfectly horizontal nor vertical
    #[error("wire {name:?} is neither horizontal nor vertical: ({x1}, {y1})-({x2}, {y2})")]
    InvalidGeometry {
        name: String,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },

    /// Two wires in the same layer share a name
    #[error("wire name {0:?} is not unique within the layer")]
    DuplicateName(String),

    /// An equal key already exists in the ordered index
    #[error("duplicate key inserted into ordered index")]
    DuplicateKey,

    /// The key to remove is absent from the ordered index
    #[error("key to remove is missing from ordered index")]
    MissingKey,

    /// `count_crossings` or `wire_crossings` was invoked a second time
    #[error("verifier has already been run")]
    AlreadyRun,

    /// A line of the textual input could not be parsed
    #[error("malformed input at line {line}: {reason}")]
    InputSyntax { line: usize, reason: String },
}

/// A specialized Result type for circuit verification operations
pub type Result<T> = std::result::Result<T, Error>;
