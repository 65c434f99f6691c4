//! A single axis-aligned wire segment
//!
//! This module contains [`Wire`], the immutable record of one horizontal or
//! vertical segment, and [`WireId`], the process-wide identity assigned to
//! each wire at construction time.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Error, Result};

/// A unique, monotonically assigned identity for a [`Wire`]
///
/// Identities are used only to break ties between wires that share a
/// coordinate; they carry no persistence meaning and are never reused
/// within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WireId(u64);

impl WireId {
    /// Process-wide counter backing [`WireId::next`]
    ///
    /// Accessed with `Relaxed` ordering: nothing here synchronizes
    /// cross-thread state, it only needs to hand out distinct values.
    fn counter() -> &'static AtomicU64 {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        &COUNTER
    }

    /// Allocates a fresh identity, unique for the life of the process
    pub fn next() -> Self {
        Self(Self::counter().fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric value, useful only for tie-breaking and debugging
    pub fn value(self) -> u64 {
        self.0
    }
}

/// An axis-aligned wire segment on one layer of a chip
///
/// Wires are immutable once constructed: [`Wire::new`] normalizes the
/// endpoints so the lower coordinate is stored first, and rejects any
/// segment that is neither perfectly horizontal nor perfectly vertical.
#[derive(Debug, Clone)]
pub struct Wire {
    name: String,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    id: WireId,
}

impl Wire {
    /// Creates a wire, normalizing endpoints so `x1 <= x2` and `y1 <= y2`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGeometry`] if the segment is neither
    /// horizontal (`y1 == y2`) nor vertical (`x1 == x2`) after
    /// normalization — this includes single-point and diagonal segments.
    pub fn new(name: impl Into<String>, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Self> {
        let name = name.into();
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let (y1, y2) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };

        let horizontal = y1 == y2;
        let vertical = x1 == x2;
        if horizontal == vertical {
            // Either both hold (a degenerate point) or neither does
            // (a diagonal segment) — both are invalid geometry.
            return Err(Error::InvalidGeometry {
                name,
                x1,
                y1,
                x2,
                y2,
            });
        }

        Ok(Self {
            name,
            x1,
            y1,
            x2,
            y2,
            id: WireId::next(),
        })
    }

    /// The wire's user-visible name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The normalized low X endpoint
    pub fn x1(&self) -> f64 {
        self.x1
    }

    /// The normalized low Y endpoint
    pub fn y1(&self) -> f64 {
        self.y1
    }

    /// The normalized high X endpoint
    pub fn x2(&self) -> f64 {
        self.x2
    }

    /// The normalized high Y endpoint
    pub fn y2(&self) -> f64 {
        self.y2
    }

    /// This wire's process-wide identity, used only for tie-breaking
    pub fn id(&self) -> WireId {
        self.id
    }

    /// True if the wire's endpoints share a Y coordinate
    pub fn is_horizontal(&self) -> bool {
        self.y1 == self.y2
    }

    /// True if the wire's endpoints share an X coordinate
    pub fn is_vertical(&self) -> bool {
        self.x1 == self.x2
    }

    /// True if this wire crosses `other`
    ///
    /// Unused by the sweep verifier, which computes crossings through the
    /// ordered index instead; kept for API parity with the original
    /// reference implementation. Two wires of the same orientation never
    /// intersect under this model (collinear overlap is not supported).
    pub fn intersects(&self, other: &Wire) -> bool {
        if self.is_horizontal() == other.is_horizontal() {
            return false;
        }
        let (h, v) = if self.is_horizontal() {
            (self, other)
        } else {
            (other, self)
        };
        h.x1 <= v.x1 && v.x1 <= h.x2 && v.y1 <= h.y1 && h.y1 <= v.y2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_endpoints() {
        let w = Wire::new("a", 10.0, 0.0, 0.0, 0.0).unwrap();
        assert_eq!((w.x1(), w.x2()), (0.0, 10.0));
        assert!(w.is_horizontal());
        assert!(!w.is_vertical());
    }

    #[test]
    fn rejects_diagonal() {
        let result = Wire::new("a", 0.0, 0.0, 10.0, 10.0);
        assert!(matches!(result, Err(Error::InvalidGeometry { .. })));
    }

    #[test]
    fn rejects_point() {
        let result = Wire::new("a", 5.0, 5.0, 5.0, 5.0);
        assert!(matches!(result, Err(Error::InvalidGeometry { .. })));
    }

    #[test]
    fn ids_are_distinct_and_monotonic() {
        let a = Wire::new("a", 0.0, 0.0, 1.0, 0.0).unwrap();
        let b = Wire::new("b", 0.0, 0.0, 1.0, 0.0).unwrap();
        assert!(b.id().value() > a.id().value());
    }

    #[test]
    fn intersects_corrected_condition() {
        let h = Wire::new("h", 0.0, 0.0, 10.0, 0.0).unwrap();
        let v = Wire::new("v", 5.0, -5.0, 5.0, 5.0).unwrap();
        assert!(h.intersects(&v));
        assert!(v.intersects(&h));

        let v_above = Wire::new("v2", 5.0, 1.0, 5.0, 5.0).unwrap();
        assert!(!h.intersects(&v_above));
    }
}
