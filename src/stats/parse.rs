//! Parser for the profiler's plain-text statistics listing.
//!
//! Expected table, preceded by an arbitrary preamble:
//!
//!    ncalls  tottime  percall  cumtime  percall filename:lineno(function)
//!        2    0.001    0.000    0.002    0.001 a.py:10(f)
//!      3/1    0.000    0.000    0.002    0.002 {built-in method builtins.exec}
//!
//! `ncalls` may be `total/primitive` when the function recursed. The two
//! `percall` columns are derived values and are not stored. A blank line ends
//! the table (caller/callee sections may follow it).

use crate::error::StatsError;
use crate::stats::{BUILTIN_FILE, FuncEntry, FuncKey, StatsIndex};
use regex::Regex;

// Capture:
// 1) calls: integer
// 2) primitive calls: optional, after '/'
// 3) tottime, 4) percall, 5) cumtime, 6) percall: float/integer
// 7) location: rest of line
const ENTRY_RE: &str = r"^\s*(\d+)(?:/(\d+))?\s+([0-9]+(?:\.[0-9]+)?)\s+([0-9]+(?:\.[0-9]+)?)\s+([0-9]+(?:\.[0-9]+)?)\s+([0-9]+(?:\.[0-9]+)?)\s+(\S.*?)\s*$";

const LOCATION_RE: &str = r"^(.*):(\d+)\((.*)\)$";

/// Parse a text listing into the keyed index. `source` is used in messages.
pub fn parse_text(text: &str, source: &str) -> Result<StatsIndex, StatsError> {
    let entry_re = Regex::new(ENTRY_RE).expect("entry regex");
    let location_re = Regex::new(LOCATION_RE).expect("location regex");

    let mut out = StatsIndex::new();
    let mut in_table = false;

    for (lineno, line) in text.lines().enumerate() {
        let lno = lineno + 1;

        if !in_table {
            // Skip the preamble until the column header.
            if line.contains("ncalls") && line.contains("filename:lineno(function)") {
                in_table = true;
            }
            continue;
        }

        if line.trim().is_empty() {
            break;
        }

        let caps = entry_re.captures(line).ok_or_else(|| {
            StatsError::InvalidInput(format!(
                "listing parse error at {}:{}: cannot parse line: {:?}",
                source, lno, line
            ))
        })?;

        let calls = parse_count(caps.get(1).unwrap().as_str(), source, lno)?;
        let primitive_calls = match caps.get(2) {
            Some(m) => parse_count(m.as_str(), source, lno)?,
            None => calls,
        };
        let self_time = parse_seconds(caps.get(3).unwrap().as_str(), source, lno)?;
        let cumulative_time = parse_seconds(caps.get(5).unwrap().as_str(), source, lno)?;
        let location = caps.get(7).unwrap().as_str();

        let key = parse_location(&location_re, location);

        let entry = FuncEntry {
            primitive_calls,
            calls,
            self_time,
            cumulative_time,
            callers: serde_json::Value::Null,
        };

        if out.insert(key.clone(), entry).is_some() {
            return Err(StatsError::InvalidInput(format!(
                "duplicate entry in listing at {}:{}: {}",
                source, lno, key
            )));
        }
    }

    if !in_table {
        return Err(StatsError::InvalidInput(format!(
            "no statistics table found in {}",
            source
        )));
    }

    Ok(out)
}

/// `path:line(function)` locations split into the key triple; anything else
/// (built-in methods are printed as `{...}`) maps to the `~` pseudo file.
fn parse_location(location_re: &Regex, location: &str) -> FuncKey {
    match location_re.captures(location) {
        Some(caps) => {
            let file = caps.get(1).unwrap().as_str();
            let line: u32 = caps.get(2).unwrap().as_str().parse().unwrap_or(0);
            let name = caps.get(3).unwrap().as_str();
            FuncKey::new(file, line, name)
        }
        None => FuncKey::new(BUILTIN_FILE, 0, location),
    }
}

fn parse_count(text: &str, source: &str, lno: usize) -> Result<u64, StatsError> {
    text.parse().map_err(|_| {
        StatsError::InvalidInput(format!(
            "bad call count at {}:{}: {}",
            source, lno, text
        ))
    })
}

fn parse_seconds(text: &str, source: &str, lno: usize) -> Result<f64, StatsError> {
    text.parse().map_err(|_| {
        StatsError::InvalidInput(format!("bad time at {}:{}: {}", source, lno, text))
    })
}
