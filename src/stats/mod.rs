//! Input layer: raw profiling statistics as read from disk.
//!
//! Two on-disk representations of the same mapping are accepted:
//! - a JSON dump of the stats dictionary (`raw.rs`), and
//! - the profiler's plain-text listing (`parse.rs`).
//!
//! Both produce a [`StatsIndex`]; everything downstream only sees that.

pub mod key;
pub mod parse;
pub mod raw;

pub use key::{BUILTIN_FILE, FuncKey};
pub use raw::RawStats;

use crate::Result;
use anyhow::Context;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Value tuple of one profiling record.
#[derive(Debug, Clone)]
pub struct FuncEntry {
    /// Calls not induced via recursion.
    pub primitive_calls: u64,
    pub calls: u64,
    /// Time spent in the function body, excluding callees.
    pub self_time: f64,
    /// Time in the function and everything it calls, accurate under recursion.
    pub cumulative_time: f64,
    /// Caller records are carried opaquely; the table does not interpret them.
    pub callers: serde_json::Value,
}

/// The raw mapping: one entry per distinct code location.
pub type StatsIndex = BTreeMap<FuncKey, FuncEntry>;

/// Load a statistics file from disk. `.json` files are read as the JSON dump
/// format, anything else as the profiler's text listing.
pub fn load_stats_file(path: &str) -> Result<StatsIndex> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read stats file {}", path))?;

    let is_json = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let index = if is_json {
        raw::parse_json(&text).with_context(|| format!("load JSON stats dump {}", path))?
    } else {
        parse::parse_text(&text, path)
            .with_context(|| format!("load stats listing {}", path))?
    };

    log::info!("loaded {} entries from {}", index.len(), path);
    Ok(index)
}
