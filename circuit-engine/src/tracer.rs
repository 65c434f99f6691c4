//! Decorators that record a structured transcript for the JSONP visualizer
//!
//! [`TracedIndex`] and [`TracedSink`] wrap [`OrderedIndex`] and
//! [`ResultSink`] respectively, forwarding every call unchanged and
//! appending one [`TraceRecord`] to a shared [`Trace`] per mutation, query,
//! or crossing emission. Neither the index nor the sink itself is aware of
//! tracing; the decorators sit entirely outside the core data structure, so
//! enabling or disabling tracing cannot alter observable results.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use circuit_core::error::Result;
use circuit_core::order_key::OrderKey;
use circuit_core::wire::{Wire, WireId};
use serde::Serialize;

use crate::ordered_index::OrderedIndex;
use crate::result_sink::ResultSink;

/// One structured record of an observed step
///
/// Serializes to the shapes the JSONP trace payload expects: `sweep`,
/// `add`, `delete`, `list` (with either an `ids` array or a `count`), and
/// `crossing`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum TraceRecord {
    #[serde(rename = "sweep")]
    Sweep { x: f64 },
    #[serde(rename = "add")]
    Add { id: String },
    #[serde(rename = "delete")]
    Delete { id: String },
    #[serde(rename = "list")]
    ListIds { from: f64, to: f64, ids: Vec<String> },
    #[serde(rename = "list")]
    ListCount { from: f64, to: f64, count: usize },
    #[serde(rename = "crossing")]
    Crossing { id1: String, id2: String },
}

/// An ordered transcript of a verifier run
#[derive(Debug, Default, Serialize)]
pub struct Trace(Vec<TraceRecord>);

impl Trace {
    /// Creates an empty trace
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub(crate) fn push(&mut self, record: TraceRecord) {
        self.0.push(record);
    }

    /// The records appended so far, in order
    pub fn records(&self) -> &[TraceRecord] {
        &self.0
    }
}

/// A trace shared between the verifier and its traced index/sink
pub type SharedTrace = Rc<RefCell<Trace>>;

/// Thin decorator around [`OrderedIndex`]
///
/// Every call forwards unchanged to the wrapped index; a record is
/// appended to the shared trace first (mutations) or alongside the result
/// (queries).
pub struct TracedIndex {
    inner: OrderedIndex,
    trace: SharedTrace,
    names: Rc<HashMap<WireId, String>>,
}

impl TracedIndex {
    /// Wraps a fresh, empty index
    ///
    /// `names` maps each wire's identity to its display name, used to
    /// render `add`/`delete`/`list` records in terms of wire names rather
    /// than opaque identities.
    pub fn new(trace: SharedTrace, names: Rc<HashMap<WireId, String>>) -> Self {
        Self {
            inner: OrderedIndex::new(),
            trace,
            names,
        }
    }

    fn name_of(&self, key: &OrderKey) -> String {
        match key {
            OrderKey::Exact(_, id) => self.names.get(id).cloned().unwrap_or_default(),
            OrderKey::LowSentinel(_) | OrderKey::HighSentinel(_) => String::new(),
        }
    }

    pub fn insert(&mut self, key: OrderKey) -> Result<()> {
        let id = self.name_of(&key);
        self.trace.borrow_mut().push(TraceRecord::Add { id });
        self.inner.insert(key)
    }

    pub fn remove(&mut self, key: &OrderKey) -> Result<()> {
        let id = self.name_of(key);
        self.trace.borrow_mut().push(TraceRecord::Delete { id });
        self.inner.remove(key)
    }

    pub fn list(&mut self, lo: &OrderKey, hi: &OrderKey) -> Vec<OrderKey> {
        let result = self.inner.list(lo, hi);
        let ids = result.iter().map(|k| self.name_of(k)).collect();
        self.trace.borrow_mut().push(TraceRecord::ListIds {
            from: lo.coord(),
            to: hi.coord(),
            ids,
        });
        result
    }

    pub fn count(&mut self, lo: &OrderKey, hi: &OrderKey) -> usize {
        let count = self.inner.count(lo, hi);
        self.trace.borrow_mut().push(TraceRecord::ListCount {
            from: lo.coord(),
            to: hi.coord(),
            count,
        });
        count
    }
}

/// Thin decorator around [`ResultSink`]
pub struct TracedSink {
    inner: ResultSink,
    trace: SharedTrace,
}

impl TracedSink {
    /// Wraps a fresh, empty sink
    pub fn new(trace: SharedTrace) -> Self {
        Self {
            inner: ResultSink::new(),
            trace,
        }
    }

    pub fn add(&mut self, a: &Wire, b: &Wire) {
        self.trace.borrow_mut().push(TraceRecord::Crossing {
            id1: a.name().to_string(),
            id2: b.name().to_string(),
        });
        self.inner.add(a, b);
    }

    /// Unwraps the sink, discarding the trace handle
    pub fn into_inner(self) -> ResultSink {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traced_index_forwards_and_records() {
        let trace: SharedTrace = Rc::new(RefCell::new(Trace::new()));
        let mut names = HashMap::new();
        let id = WireId::next();
        names.insert(id, "h1".to_string());

        let mut index = TracedIndex::new(trace.clone(), Rc::new(names));
        index.insert(OrderKey::Exact(3.0, id)).unwrap();

        assert_eq!(trace.borrow().records().len(), 1);
        assert!(matches!(
            trace.borrow().records()[0],
            TraceRecord::Add { ref id } if id == "h1"
        ));

        let lo = OrderKey::LowSentinel(0.0);
        let hi = OrderKey::HighSentinel(10.0);
        let listed = index.list(&lo, &hi);
        assert_eq!(listed.len(), 1);
        assert_eq!(trace.borrow().records().len(), 2);
    }

    #[test]
    fn traced_sink_forwards_and_records() {
        let trace: SharedTrace = Rc::new(RefCell::new(Trace::new()));
        let mut sink = TracedSink::new(trace.clone());
        let a = Wire::new("a", 0.0, 0.0, 1.0, 0.0).unwrap();
        let b = Wire::new("b", 0.0, 0.0, 1.0, 0.0).unwrap();

        sink.add(&a, &b);
        assert_eq!(trace.borrow().records().len(), 1);
        assert_eq!(sink.into_inner().len(), 1);
    }
}
