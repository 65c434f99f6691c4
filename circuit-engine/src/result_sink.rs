//! Collector of crossing pairs produced by the sweep

use circuit_core::wire::Wire;

/// A single crossing between two wires, normalized by name
///
/// `low` is lexicographically less than or equal to `high`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crossing {
    pub low: String,
    pub high: String,
}

/// Append-only collector of crossing pairs
///
/// Duplicates are never suppressed: the sweep is responsible for never
/// emitting the same pair twice (see [`crate::verifier::CrossVerifier`]).
#[derive(Debug, Default)]
pub struct ResultSink {
    crossings: Vec<Crossing>,
}

impl ResultSink {
    /// Creates an empty sink
    pub fn new() -> Self {
        Self {
            crossings: Vec::new(),
        }
    }

    /// Records a crossing between `a` and `b`, normalizing name order
    pub fn add(&mut self, a: &Wire, b: &Wire) {
        let (low, high) = if a.name() <= b.name() {
            (a.name().to_string(), b.name().to_string())
        } else {
            (b.name().to_string(), a.name().to_string())
        };
        self.crossings.push(Crossing { low, high });
    }

    /// The crossings recorded so far, in the order they were added
    pub fn enumerate(&self) -> &[Crossing] {
        &self.crossings
    }

    /// The number of crossings recorded so far
    pub fn len(&self) -> usize {
        self.crossings.len()
    }

    /// True if no crossing has been recorded
    pub fn is_empty(&self) -> bool {
        self.crossings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_name_order() {
        let mut sink = ResultSink::new();
        let a = Wire::new("zebra", 0.0, 0.0, 1.0, 0.0).unwrap();
        let b = Wire::new("apple", 0.0, 0.0, 1.0, 0.0).unwrap();

        sink.add(&a, &b);
        assert_eq!(
            sink.enumerate()[0],
            Crossing {
                low: "apple".to_string(),
                high: "zebra".to_string(),
            }
        );
    }

    #[test]
    fn duplicates_are_not_suppressed() {
        let mut sink = ResultSink::new();
        let a = Wire::new("a", 0.0, 0.0, 1.0, 0.0).unwrap();
        let b = Wire::new("b", 0.0, 0.0, 1.0, 0.0).unwrap();

        sink.add(&a, &b);
        sink.add(&a, &b);
        assert_eq!(sink.len(), 2);
    }
}
