//! One derived, immutable row per profiling record.

use crate::stats::{FuncEntry, FuncKey};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct StatRow {
    pub file_path: String,
    pub line: u32,
    pub function: String,
    /// Basename of `file_path`.
    pub file_name: String,

    pub primitive_calls: u64,
    pub calls: u64,
    pub self_time: f64,
    pub cumulative_time: f64,

    /// `self_time / calls`; NaN when the function was never called.
    pub time_per_call: f64,
    /// `cumulative_time / primitive_calls`; NaN when there are none.
    pub cum_time_per_call: f64,

    // Lowercase copies, cached for case-insensitive sorting and filtering.
    pub(crate) lc_file_path: String,
    pub(crate) lc_file_name: String,
    pub(crate) lc_function: String,
}

impl StatRow {
    pub fn new(key: &FuncKey, entry: &FuncEntry) -> Self {
        let file_name = Path::new(&key.file)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&key.file)
            .to_string();

        Self {
            lc_file_path: key.file.to_lowercase(),
            lc_file_name: file_name.to_lowercase(),
            lc_function: key.name.to_lowercase(),
            file_path: key.file.clone(),
            line: key.line,
            function: key.name.clone(),
            file_name,
            primitive_calls: entry.primitive_calls,
            calls: entry.calls,
            self_time: entry.self_time,
            cumulative_time: entry.cumulative_time,
            time_per_call: per_call(entry.self_time, entry.calls),
            cum_time_per_call: per_call(entry.cumulative_time, entry.primitive_calls),
        }
    }

    pub fn key(&self) -> FuncKey {
        FuncKey::new(self.file_path.clone(), self.line, self.function.clone())
    }
}

/// Zero-call entries exist legitimately (recursive bookkeeping records); the
/// ratio is undefined for them rather than a fault.
fn per_call(total: f64, count: u64) -> f64 {
    if count == 0 {
        f64::NAN
    } else {
        total / count as f64
    }
}
