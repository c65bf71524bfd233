//! JSON stats dump: a serialized copy of the profiler's stats dictionary.
//!
//! JSON shape:
//! {
//!   "functions": [
//!     {
//!       "file": "pkg/a.py",
//!       "line": 10,
//!       "function": "f",
//!       "primitive_calls": 1,
//!       "calls": 2,
//!       "self_time": 0.10,
//!       "cumulative_time": 0.30,
//!       "callers": { ... }          // optional, kept opaque
//!     },
//!     ...
//!   ]
//! }
//!
//! We validate the shape here, at the boundary: duplicate locations and
//! negative times are rejected before anything replaces existing state.

use crate::error::StatsError;
use crate::stats::{FuncEntry, FuncKey, StatsIndex};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct RawStats {
    #[serde(default)]
    pub functions: Vec<RawFunction>,
}

/// Raw record shape as it appears in the dump.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFunction {
    pub file: String,
    pub line: u32,
    pub function: String,

    #[serde(default)]
    pub primitive_calls: u64,

    #[serde(default)]
    pub calls: u64,

    #[serde(default)]
    pub self_time: f64,

    #[serde(default)]
    pub cumulative_time: f64,

    #[serde(default)]
    pub callers: serde_json::Value,
}

impl RawStats {
    /// Turn the flat record list into the keyed index, checking uniqueness.
    pub fn validate_and_build(self) -> Result<StatsIndex, StatsError> {
        let mut index = StatsIndex::new();

        for raw in self.functions {
            if raw.self_time < 0.0 || raw.cumulative_time < 0.0 {
                return Err(StatsError::InvalidInput(format!(
                    "negative time for {}:{}({})",
                    raw.file, raw.line, raw.function
                )));
            }

            let key = FuncKey::new(raw.file, raw.line, raw.function);
            let entry = FuncEntry {
                primitive_calls: raw.primitive_calls,
                calls: raw.calls,
                self_time: raw.self_time,
                cumulative_time: raw.cumulative_time,
                callers: raw.callers,
            };

            if index.insert(key.clone(), entry).is_some() {
                return Err(StatsError::InvalidInput(format!(
                    "duplicate entry for {}",
                    key
                )));
            }
        }

        Ok(index)
    }
}

/// Parse and validate a JSON stats dump.
pub fn parse_json(text: &str) -> Result<StatsIndex, StatsError> {
    let raw: RawStats = serde_json::from_str(text)
        .map_err(|err| StatsError::InvalidInput(format!("stats dump is not valid JSON: {}", err)))?;
    raw.validate_and_build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_a_minimal_dump() {
        let index = parse_json(
            r#"{
                "functions": [
                    {"file": "a.py", "line": 10, "function": "f",
                     "primitive_calls": 1, "calls": 2,
                     "self_time": 0.1, "cumulative_time": 0.3,
                     "callers": {"b.py:5(g)": 2}},
                    {"file": "~", "line": 0, "function": "{built-in method builtins.len}",
                     "primitive_calls": 4, "calls": 4,
                     "self_time": 0.0, "cumulative_time": 0.0}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(index.len(), 2);
        let entry = &index[&FuncKey::new("a.py", 10, "f")];
        assert_eq!(entry.calls, 2);
        assert_eq!(entry.primitive_calls, 1);
        assert_eq!(entry.self_time, 0.1);
        assert_eq!(entry.cumulative_time, 0.3);
    }

    #[test]
    fn missing_counts_default_to_zero() {
        let index = parse_json(
            r#"{"functions": [{"file": "a.py", "line": 1, "function": "f"}]}"#,
        )
        .unwrap();
        let entry = &index[&FuncKey::new("a.py", 1, "f")];
        assert_eq!(entry.calls, 0);
        assert_eq!(entry.self_time, 0.0);
    }

    #[test]
    fn rejects_non_json_input() {
        let err = parse_json("ncalls tottime").unwrap_err();
        assert!(matches!(err, StatsError::InvalidInput(_)));
    }

    #[test]
    fn rejects_duplicate_locations() {
        let err = parse_json(
            r#"{"functions": [
                {"file": "a.py", "line": 1, "function": "f"},
                {"file": "a.py", "line": 1, "function": "f"}
            ]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate entry for a.py:1(f)"));
    }

    #[test]
    fn rejects_negative_times() {
        let err = parse_json(
            r#"{"functions": [
                {"file": "a.py", "line": 1, "function": "f", "self_time": -1.0}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, StatsError::InvalidInput(_)));
    }
}
