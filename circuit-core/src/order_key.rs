//! The composite comparison key used by the ordered index
//!
//! [`OrderKey`] is a closed, three-variant sum type rather than a
//! subtype-polymorphic hierarchy: the variant set is fixed and comparisons
//! are on the hot path of every tree operation, so a `match` dispatches
//! faster than a vtable and is easier to prove total.

use std::cmp::Ordering;

use crate::wire::WireId;

/// A comparison key pairing a sweep coordinate with a wire identity
///
/// `Exact` keys are the keys of concrete wires active on the sweep line.
/// `LowSentinel`/`HighSentinel` are comparison-only bounds used to form
/// closed range queries: `LowSentinel(c)` compares less than every
/// `Exact(c, _)` and `HighSentinel(c)` compares greater than every
/// `Exact(c, _)`, while both still sort strictly between the buckets for
/// coordinates below and above `c`.
#[derive(Debug, Clone, Copy)]
pub enum OrderKey {
    /// The key of a concrete wire active on the sweep line
    Exact(f64, WireId),
    /// Compares less than every `Exact(coord, _)` at the same coordinate
    LowSentinel(f64),
    /// Compares greater than every `Exact(coord, _)` at the same coordinate
    HighSentinel(f64),
}

impl OrderKey {
    /// The coordinate this key compares by, ignoring the wire-id tiebreak
    pub fn coord(&self) -> f64 {
        match self {
            OrderKey::Exact(c, _) => *c,
            OrderKey::LowSentinel(c) => *c,
            OrderKey::HighSentinel(c) => *c,
        }
    }

    /// Orders two keys that share a coordinate bucket
    fn tie_break(&self, other: &Self) -> Ordering {
        use OrderKey::*;
        match (self, other) {
            (LowSentinel(_), LowSentinel(_)) => Ordering::Equal,
            (LowSentinel(_), _) => Ordering::Less,
            (_, LowSentinel(_)) => Ordering::Greater,
            (HighSentinel(_), HighSentinel(_)) => Ordering::Equal,
            (HighSentinel(_), _) => Ordering::Greater,
            (_, HighSentinel(_)) => Ordering::Less,
            (Exact(_, a), Exact(_, b)) => a.cmp(b),
        }
    }
}

impl PartialEq for OrderKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrderKey {}

impl PartialOrd for OrderKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.coord().total_cmp(&other.coord()) {
            Ordering::Equal => self.tie_break(other),
            ordering => ordering,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_bound_exact_at_same_coord() {
        let low = OrderKey::LowSentinel(5.0);
        let high = OrderKey::HighSentinel(5.0);
        let exact = OrderKey::Exact(5.0, WireId::next());
        assert!(low < exact);
        assert!(exact < high);
        assert!(low < high);
    }

    #[test]
    fn sentinels_respect_coordinate_bucket() {
        let high_at_4 = OrderKey::HighSentinel(4.0);
        let exact_at_5 = OrderKey::Exact(5.0, WireId::next());
        let low_at_5 = OrderKey::LowSentinel(5.0);
        assert!(high_at_4 < low_at_5);
        assert!(high_at_4 < exact_at_5);
    }

    #[test]
    fn exact_ties_break_on_wire_id() {
        let a = WireId::next();
        let b = WireId::next();
        let ka = OrderKey::Exact(1.0, a);
        let kb = OrderKey::Exact(1.0, b);
        assert!(ka < kb);
        assert_ne!(ka, kb);
    }

    #[test]
    fn total_order_is_transitive_on_a_sample() {
        let a = WireId::next();
        let b = WireId::next();
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let keys = [
            OrderKey::LowSentinel(1.0),
            OrderKey::Exact(1.0, lo),
            OrderKey::Exact(1.0, hi),
            OrderKey::HighSentinel(1.0),
            OrderKey::LowSentinel(2.0),
        ];
        for w in keys.windows(2) {
            assert!(w[0] <= w[1]);
        }
    }
}
