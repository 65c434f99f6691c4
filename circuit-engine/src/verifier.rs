//! The sweep-line driver that reduces geometric intersection to a sequence
//! of ordered-index operations
//!
//! [`CrossVerifier`] builds an event list from a [`WireLayer`], sorts it
//! once, and consumes it in a single pass: each horizontal wire generates
//! an `Add` event at its low X and a `Delete` event at its high X, and each
//! vertical wire generates one `Query` event at its X. Processing the
//! events in sorted order maintains, at every `Query`, an index containing
//! exactly the horizontals whose X-extent covers the sweep line's current
//! position — turning the O(N^2) all-pairs scan into a sequence of
//! `O(log N)` index operations.

use std::collections::HashMap;
use std::rc::Rc;
use std::cell::RefCell;

use circuit_core::error::{Error, Result};
use circuit_core::layer::WireLayer;
use circuit_core::order_key::OrderKey;
use circuit_core::wire::{Wire, WireId};

use crate::ordered_index::OrderedIndex;
use crate::result_sink::{Crossing, ResultSink};
use crate::tracer::{SharedTrace, Trace, TraceRecord, TracedIndex, TracedSink};

/// Sort key used to break ties at equal X: a horizontal's `Add` must sort
/// before any `Query` at the same X, which must sort before any `Delete`,
/// so that a vertical coincident with a horizontal's endpoint always sees
/// it (inclusive bounds at both ends).
const ADD_PHASE: u8 = 0;
const QUERY_PHASE: u8 = 1;
const DELETE_PHASE: u8 = 2;

#[derive(Clone, Copy)]
enum EventKind {
    Add,
    Query,
    Delete,
}

struct Event<'a> {
    x: f64,
    phase: u8,
    wire_id: WireId,
    kind: EventKind,
    wire: &'a Wire,
}

fn build_events(layer: &WireLayer) -> Vec<Event<'_>> {
    let mut events = Vec::new();
    for wire in layer.iter() {
        if wire.is_horizontal() {
            events.push(Event {
                x: wire.x1(),
                phase: ADD_PHASE,
                wire_id: wire.id(),
                kind: EventKind::Add,
                wire,
            });
            events.push(Event {
                x: wire.x2(),
                phase: DELETE_PHASE,
                wire_id: wire.id(),
                kind: EventKind::Delete,
                wire,
            });
        } else {
            events.push(Event {
                x: wire.x1(),
                phase: QUERY_PHASE,
                wire_id: wire.id(),
                kind: EventKind::Query,
                wire,
            });
        }
    }
    events.sort_by(|a, b| {
        a.x.total_cmp(&b.x)
            .then(a.phase.cmp(&b.phase))
            .then(a.wire_id.cmp(&b.wire_id))
    });
    events
}

/// Checks whether a wire network has any crossing wires
///
/// Construct with [`CrossVerifier::new`] (or [`CrossVerifier::new_traced`]
/// for a visualizer transcript), then call exactly one of
/// [`CrossVerifier::count_crossings`] or [`CrossVerifier::wire_crossings`].
/// A second call to either fails with [`Error::AlreadyRun`].
pub struct CrossVerifier<'a> {
    events: Vec<Event<'a>>,
    wires: HashMap<WireId, &'a Wire>,
    performed: bool,
    trace: Option<SharedTrace>,
}

impl<'a> CrossVerifier<'a> {
    /// Builds a verifier for `layer`, without tracing
    pub fn new(layer: &'a WireLayer) -> Self {
        let events = build_events(layer);
        let wires = layer.iter().map(|w| (w.id(), w)).collect();
        log::debug!(
            "built {} events from {} wires",
            events.len(),
            layer.len()
        );
        Self {
            events,
            wires,
            performed: false,
            trace: None,
        }
    }

    /// Builds a verifier for `layer` that also records a structured trace
    /// of every sweep-line advance, index operation, and crossing emission
    ///
    /// Returns the verifier and a handle to the (initially empty) trace;
    /// the trace fills in as `count_crossings`/`wire_crossings` runs.
    pub fn new_traced(layer: &'a WireLayer) -> (Self, SharedTrace) {
        let mut verifier = Self::new(layer);
        let trace: SharedTrace = Rc::new(RefCell::new(Trace::new()));
        verifier.trace = Some(trace.clone());
        (verifier, trace)
    }

    fn names(&self) -> HashMap<WireId, String> {
        self.wires
            .iter()
            .map(|(id, wire)| (*id, wire.name().to_string()))
            .collect()
    }

    fn wire_of(&self, key: &OrderKey) -> &'a Wire {
        match key {
            OrderKey::Exact(_, id) => self.wires[id],
            OrderKey::LowSentinel(_) | OrderKey::HighSentinel(_) => {
                unreachable!("sentinel keys are never returned from list()")
            }
        }
    }

    fn mark_run(&mut self) -> Result<()> {
        if self.performed {
            return Err(Error::AlreadyRun);
        }
        self.performed = true;
        Ok(())
    }

    fn sweep_to(&self, x: f64) {
        if let Some(trace) = &self.trace {
            trace.borrow_mut().push(TraceRecord::Sweep { x });
        }
        log::trace!("sweep line at x = {x}");
    }

    /// Returns the number of pairs of wires that cross each other
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyRun`] if this verifier has already computed
    /// a result.
    pub fn count_crossings(&mut self) -> Result<usize> {
        self.mark_run()?;
        if let Some(trace) = self.trace.clone() {
            let names = Rc::new(self.names());
            let mut index = TracedIndex::new(trace, names);
            Ok(self.run_count(&mut index))
        } else {
            let mut index = OrderedIndex::new();
            Ok(self.run_count(&mut index))
        }
    }

    /// Returns the pairs of wires that cross each other, in sweep order
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyRun`] if this verifier has already computed
    /// a result.
    pub fn wire_crossings(&mut self) -> Result<Vec<Crossing>> {
        self.mark_run()?;
        if let Some(trace) = self.trace.clone() {
            let names = Rc::new(self.names());
            let mut index = TracedIndex::new(trace.clone(), names);
            let mut sink = TracedSink::new(trace);
            self.run_list(&mut index, &mut sink);
            Ok(sink.into_inner().enumerate().to_vec())
        } else {
            let mut index = OrderedIndex::new();
            let mut sink = ResultSink::new();
            self.run_list(&mut index, &mut sink);
            Ok(sink.enumerate().to_vec())
        }
    }

    fn run_count(&self, index: &mut dyn IndexOps) -> usize {
        let mut count = 0;
        for event in &self.events {
            self.sweep_to(event.x);
            match event.kind {
                EventKind::Add => {
                    index
                        .insert(OrderKey::Exact(event.wire.y1(), event.wire_id))
                        .expect("sweep events never insert a duplicate key");
                }
                EventKind::Delete => {
                    index
                        .remove(&OrderKey::Exact(event.wire.y1(), event.wire_id))
                        .expect("sweep events never remove a missing key");
                }
                EventKind::Query => {
                    let lo = OrderKey::LowSentinel(event.wire.y1());
                    let hi = OrderKey::HighSentinel(event.wire.y2());
                    count += index.count(&lo, &hi);
                }
            }
        }
        count
    }

    fn run_list(&self, index: &mut dyn IndexOps, sink: &mut dyn SinkOps) {
        for event in &self.events {
            self.sweep_to(event.x);
            match event.kind {
                EventKind::Add => {
                    index
                        .insert(OrderKey::Exact(event.wire.y1(), event.wire_id))
                        .expect("sweep events never insert a duplicate key");
                }
                EventKind::Delete => {
                    index
                        .remove(&OrderKey::Exact(event.wire.y1(), event.wire_id))
                        .expect("sweep events never remove a missing key");
                }
                EventKind::Query => {
                    let lo = OrderKey::LowSentinel(event.wire.y1());
                    let hi = OrderKey::HighSentinel(event.wire.y2());
                    for key in index.list(&lo, &hi) {
                        sink.add(event.wire, self.wire_of(&key));
                    }
                }
            }
        }
    }
}

/// Backend abstraction letting the sweep loop run against either a plain
/// [`OrderedIndex`] or a [`TracedIndex`] without duplicating the loop body.
trait IndexOps {
    fn insert(&mut self, key: OrderKey) -> Result<()>;
    fn remove(&mut self, key: &OrderKey) -> Result<()>;
    fn list(&mut self, lo: &OrderKey, hi: &OrderKey) -> Vec<OrderKey>;
    fn count(&mut self, lo: &OrderKey, hi: &OrderKey) -> usize;
}

impl IndexOps for OrderedIndex {
    fn insert(&mut self, key: OrderKey) -> Result<()> {
        OrderedIndex::insert(self, key)
    }
    fn remove(&mut self, key: &OrderKey) -> Result<()> {
        OrderedIndex::remove(self, key)
    }
    fn list(&mut self, lo: &OrderKey, hi: &OrderKey) -> Vec<OrderKey> {
        OrderedIndex::list(self, lo, hi)
    }
    fn count(&mut self, lo: &OrderKey, hi: &OrderKey) -> usize {
        OrderedIndex::count(self, lo, hi)
    }
}

impl IndexOps for TracedIndex {
    fn insert(&mut self, key: OrderKey) -> Result<()> {
        TracedIndex::insert(self, key)
    }
    fn remove(&mut self, key: &OrderKey) -> Result<()> {
        TracedIndex::remove(self, key)
    }
    fn list(&mut self, lo: &OrderKey, hi: &OrderKey) -> Vec<OrderKey> {
        TracedIndex::list(self, lo, hi)
    }
    fn count(&mut self, lo: &OrderKey, hi: &OrderKey) -> usize {
        TracedIndex::count(self, lo, hi)
    }
}

trait SinkOps {
    fn add(&mut self, a: &Wire, b: &Wire);
}

impl SinkOps for ResultSink {
    fn add(&mut self, a: &Wire, b: &Wire) {
        ResultSink::add(self, a, b)
    }
}

impl SinkOps for TracedSink {
    fn add(&mut self, a: &Wire, b: &Wire) {
        TracedSink::add(self, a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer_from(wires: &[(&str, f64, f64, f64, f64)]) -> WireLayer {
        let mut layer = WireLayer::new();
        for (name, x1, y1, x2, y2) in wires {
            layer.add(*name, *x1, *y1, *x2, *y2).unwrap();
        }
        layer
    }

    fn reference_count(layer: &WireLayer) -> usize {
        let wires: Vec<&Wire> = layer.iter().collect();
        let mut count = 0;
        for i in 0..wires.len() {
            for j in (i + 1)..wires.len() {
                if wires[i].is_horizontal() == wires[j].is_horizontal() {
                    continue;
                }
                let (h, v) = if wires[i].is_horizontal() {
                    (wires[i], wires[j])
                } else {
                    (wires[j], wires[i])
                };
                if h.x1() <= v.x1() && v.x1() <= h.x2() && v.y1() <= h.y1() && h.y1() <= v.y2() {
                    count += 1;
                }
            }
        }
        count
    }

    // Scenario A: simple single crossing in the middle of the horizontal.
    #[test]
    fn scenario_a_single_crossing() {
        let layer = layer_from(&[("a", 0.0, 0.0, 10.0, 0.0), ("b", 5.0, -5.0, 5.0, 5.0)]);
        let mut verifier = CrossVerifier::new(&layer);
        assert_eq!(verifier.count_crossings().unwrap(), 1);

        let mut verifier = CrossVerifier::new(&layer);
        let crossings = verifier.wire_crossings().unwrap();
        assert_eq!(crossings, vec![Crossing { low: "a".into(), high: "b".into() }]);
    }

    // Scenario B: vertical entirely above the horizontal.
    #[test]
    fn scenario_b_no_crossing_above() {
        let layer = layer_from(&[("a", 0.0, 0.0, 10.0, 0.0), ("b", 5.0, 1.0, 5.0, 5.0)]);
        let mut verifier = CrossVerifier::new(&layer);
        assert_eq!(verifier.count_crossings().unwrap(), 0);
    }

    // Scenario C: vertical touching the horizontal's left endpoint.
    #[test]
    fn scenario_c_touches_left_endpoint() {
        let layer = layer_from(&[("a", 0.0, 0.0, 10.0, 0.0), ("b", 0.0, -5.0, 0.0, 5.0)]);
        let mut verifier = CrossVerifier::new(&layer);
        assert_eq!(verifier.count_crossings().unwrap(), 1);
    }

    // Scenario D: vertical touching the horizontal's right endpoint.
    #[test]
    fn scenario_d_touches_right_endpoint() {
        let layer = layer_from(&[("a", 0.0, 0.0, 10.0, 0.0), ("b", 10.0, -5.0, 10.0, 5.0)]);
        let mut verifier = CrossVerifier::new(&layer);
        assert_eq!(verifier.count_crossings().unwrap(), 1);
    }

    // Scenario E: one vertical crosses two horizontals.
    #[test]
    fn scenario_e_two_horizontals_one_vertical() {
        let layer = layer_from(&[
            ("h1", 0.0, 0.0, 10.0, 0.0),
            ("h2", 0.0, 5.0, 10.0, 5.0),
            ("v", 5.0, -1.0, 5.0, 6.0),
        ]);
        let mut verifier = CrossVerifier::new(&layer);
        assert_eq!(verifier.count_crossings().unwrap(), 2);

        let mut verifier = CrossVerifier::new(&layer);
        let crossings = verifier.wire_crossings().unwrap();
        assert_eq!(
            crossings,
            vec![
                Crossing { low: "h1".into(), high: "v".into() },
                Crossing { low: "h2".into(), high: "v".into() },
            ]
        );
    }

    // Scenario F: only one orientation present.
    #[test]
    fn scenario_f_single_orientation_has_no_crossings() {
        let horizontals_only = layer_from(&[("a", 0.0, 0.0, 10.0, 0.0), ("b", 0.0, 5.0, 10.0, 5.0)]);
        let mut verifier = CrossVerifier::new(&horizontals_only);
        assert_eq!(verifier.count_crossings().unwrap(), 0);

        let verticals_only = layer_from(&[("a", 0.0, 0.0, 0.0, 10.0), ("b", 5.0, 0.0, 5.0, 10.0)]);
        let mut verifier = CrossVerifier::new(&verticals_only);
        assert_eq!(verifier.count_crossings().unwrap(), 0);
    }

    #[test]
    fn second_run_fails_with_already_run() {
        let layer = layer_from(&[("a", 0.0, 0.0, 10.0, 0.0), ("b", 5.0, -5.0, 5.0, 5.0)]);
        let mut verifier = CrossVerifier::new(&layer);
        verifier.count_crossings().unwrap();
        assert!(matches!(verifier.count_crossings(), Err(Error::AlreadyRun)));
        assert!(matches!(verifier.wire_crossings(), Err(Error::AlreadyRun)));
    }

    proptest::proptest! {
        #[test]
        fn matches_reference_checker_on_random_layers(
            specs in proptest::collection::vec(
                (proptest::bool::ANY, -20i32..20, -20i32..20, -20i32..20),
                0..30,
            )
        ) {
            let mut layer = WireLayer::new();
            for (i, (horizontal, a, b, c)) in specs.into_iter().enumerate() {
                if a == b {
                    continue;
                }
                let (lo, hi) = if a < b { (a, b) } else { (b, a) };
                let (lo, hi, c) = (lo as f64, hi as f64, c as f64);
                let name = format!("w{i}");
                let _ = if horizontal {
                    layer.add(name.as_str(), lo, c, hi, c)
                } else {
                    layer.add(name.as_str(), c, lo, c, hi)
                };
            }
            let expected = reference_count(&layer);
            let mut verifier = CrossVerifier::new(&layer);
            proptest::prop_assert_eq!(verifier.count_crossings().unwrap(), expected);
        }
    }

    #[test]
    fn traced_run_produces_sweep_records() {
        let layer = layer_from(&[("a", 0.0, 0.0, 10.0, 0.0), ("b", 5.0, -5.0, 5.0, 5.0)]);
        let (mut verifier, trace) = CrossVerifier::new_traced(&layer);
        assert_eq!(verifier.count_crossings().unwrap(), 1);
        assert!(!trace.borrow().records().is_empty());
    }
}
