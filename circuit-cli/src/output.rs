//! Writers for the three output modes selected by the `TRACE` environment
//! variable: the default crossing count, `list` (one pair per line), and
//! `jsonp` (a structured transcript for the visualizer).

use std::io::Write;

use circuit_core::error::Result;
use circuit_core::layer::WireLayer;
use circuit_engine::CrossVerifier;
use serde::Serialize;

/// Which of the three output modes to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Count,
    List,
    Jsonp,
}

impl Mode {
    /// Reads the mode from the `TRACE` environment variable
    ///
    /// Unset or any value other than `list`/`jsonp` selects [`Mode::Count`].
    pub fn from_env() -> Self {
        match std::env::var("TRACE").as_deref() {
            Ok("list") => Mode::List,
            Ok("jsonp") => Mode::Jsonp,
            _ => Mode::Count,
        }
    }
}

#[derive(Serialize)]
struct WireJson<'a> {
    id: &'a str,
    x: [f64; 2],
    y: [f64; 2],
}

#[derive(Serialize)]
struct LayerJson<'a> {
    wires: Vec<WireJson<'a>>,
}

#[derive(Serialize)]
struct JsonpPayload<'a> {
    layer: LayerJson<'a>,
    trace: &'a [circuit_engine::TraceRecord],
}

/// Runs a verifier over `layer` and writes the selected mode's output
pub fn run(layer: &WireLayer, mode: Mode, out: &mut impl Write) -> Result<()> {
    match mode {
        Mode::Count => {
            let mut verifier = CrossVerifier::new(layer);
            let count = verifier.count_crossings()?;
            writeln!(out, "{count}")?;
        }
        Mode::List => {
            let mut verifier = CrossVerifier::new(layer);
            for crossing in verifier.wire_crossings()? {
                writeln!(out, "{} {}", crossing.low, crossing.high)?;
            }
        }
        Mode::Jsonp => {
            let (mut verifier, trace) = CrossVerifier::new_traced(layer);
            verifier.wire_crossings()?;

            let wires = layer
                .iter()
                .map(|w| WireJson {
                    id: w.name(),
                    x: [w.x1(), w.x2()],
                    y: [w.y1(), w.y2()],
                })
                .collect();
            let recorded = trace.borrow();
            let payload = JsonpPayload {
                layer: LayerJson { wires },
                trace: recorded.records(),
            };
            let json = serde_json::to_string(&payload)?;
            writeln!(out, "onJsonp({json});")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer_with_one_crossing() -> WireLayer {
        let mut layer = WireLayer::new();
        layer.add("a", 0.0, 0.0, 10.0, 0.0).unwrap();
        layer.add("b", 5.0, -5.0, 5.0, 5.0).unwrap();
        layer
    }

    #[test]
    fn count_mode_writes_a_single_number() {
        let layer = layer_with_one_crossing();
        let mut out = Vec::new();
        run(&layer, Mode::Count, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1\n");
    }

    #[test]
    fn list_mode_writes_one_pair_per_line() {
        let layer = layer_with_one_crossing();
        let mut out = Vec::new();
        run(&layer, Mode::List, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a b\n");
    }

    #[test]
    fn jsonp_mode_wraps_a_single_line_call() {
        let layer = layer_with_one_crossing();
        let mut out = Vec::new();
        run(&layer, Mode::Jsonp, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("onJsonp("));
        assert!(text.trim_end().ends_with(");"));
        assert!(text.contains("\"crossing\""));
    }
}
