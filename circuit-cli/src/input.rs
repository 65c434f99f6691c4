//! The line-oriented `wire`/`done` input reader
//!
//! Reads from any [`BufRead`] (not just stdin), so the format can be
//! exercised directly against in-memory buffers and `tempfile`-backed files
//! in tests without going through a subprocess.

use std::io::BufRead;

use circuit_core::error::{Error, Result};
use circuit_core::layer::WireLayer;

/// Parses a `wire ...` / `done` stream into a [`WireLayer`]
///
/// Blank lines are skipped. Every other line must be either
/// `wire <name> <x1> <y1> <x2> <y2>` or `done`; `done` ends the stream and
/// any lines after it are ignored. Reaching EOF without a `done` line, a
/// line with the wrong token count, a non-numeric coordinate, or an
/// unrecognized command word are all reported as [`Error::InputSyntax`]
/// with the offending 1-based line number.
pub fn read_layer(reader: impl BufRead) -> Result<WireLayer> {
    let mut layer = WireLayer::new();
    let mut saw_done = false;
    let mut last_line = 0;

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        last_line = line_no;
        let line = line?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }

        match tokens[0] {
            "done" => {
                if tokens.len() != 1 {
                    return Err(syntax(line_no, "`done` takes no arguments"));
                }
                saw_done = true;
                break;
            }
            "wire" => {
                if tokens.len() != 6 {
                    return Err(syntax(
                        line_no,
                        "expected `wire <name> <x1> <y1> <x2> <y2>`",
                    ));
                }
                let name = tokens[1];
                let x1 = parse_coord(line_no, tokens[2])?;
                let y1 = parse_coord(line_no, tokens[3])?;
                let x2 = parse_coord(line_no, tokens[4])?;
                let y2 = parse_coord(line_no, tokens[5])?;
                layer.add(name, x1, y1, x2, y2)?;
            }
            other => {
                return Err(syntax(
                    line_no,
                    format!("unrecognized command {other:?}"),
                ));
            }
        }
    }

    if !saw_done {
        return Err(syntax(
            last_line + 1,
            "reached end of input without a `done` line",
        ));
    }

    Ok(layer)
}

fn parse_coord(line_no: usize, token: &str) -> Result<f64> {
    let value: f64 = token
        .parse()
        .map_err(|_| syntax(line_no, format!("{token:?} is not a number")))?;
    if !value.is_finite() {
        return Err(syntax(line_no, format!("{token:?} is not a finite number")));
    }
    Ok(value)
}

fn syntax(line: usize, reason: impl Into<String>) -> Error {
    Error::InputSyntax {
        line,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_scenario_a() {
        let input = "wire a 0 0 10 0\nwire b 5 -5 5 5\ndone\n";
        let layer = read_layer(input.as_bytes()).unwrap();
        assert_eq!(layer.len(), 2);
    }

    #[test]
    fn skips_blank_lines() {
        let input = "wire a 0 0 10 0\n\n\ndone\n";
        let layer = read_layer(input.as_bytes()).unwrap();
        assert_eq!(layer.len(), 1);
    }

    #[test]
    fn ignores_lines_after_done() {
        let input = "wire a 0 0 10 0\ndone\nwire b 0 0 1 0\n";
        let layer = read_layer(input.as_bytes()).unwrap();
        assert_eq!(layer.len(), 1);
    }

    #[test]
    fn rejects_missing_done() {
        let input = "wire a 0 0 10 0\n";
        let result = read_layer(input.as_bytes());
        assert!(matches!(result, Err(Error::InputSyntax { .. })));
    }

    #[test]
    fn rejects_wrong_token_count() {
        let input = "wire a 0 0 10\ndone\n";
        let result = read_layer(input.as_bytes());
        assert!(matches!(result, Err(Error::InputSyntax { line: 1, .. })));
    }

    #[test]
    fn rejects_non_numeric_coordinate() {
        let input = "wire a 0 0 ten 0\ndone\n";
        let result = read_layer(input.as_bytes());
        assert!(matches!(result, Err(Error::InputSyntax { line: 1, .. })));
    }

    #[test]
    fn rejects_unrecognized_command() {
        let input = "erase a\ndone\n";
        let result = read_layer(input.as_bytes());
        assert!(matches!(result, Err(Error::InputSyntax { line: 1, .. })));
    }

    #[test]
    fn reads_from_a_tempfile() {
        use std::io::{BufReader, Write};

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "wire a 0 0 10 0").unwrap();
        writeln!(file, "wire b 5 -5 5 5").unwrap();
        writeln!(file, "done").unwrap();

        let reader = BufReader::new(file.reopen().unwrap());
        let layer = read_layer(reader).unwrap();
        assert_eq!(layer.len(), 2);
    }
}
