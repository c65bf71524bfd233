//! Browser for function-level call-profiling statistics.
//!
//! The input is the classic profiler dump: one record per distinct
//! `(file, line, function)` code location, carrying primitive/total call
//! counts, self time and cumulative time. The `stats` module loads it, the
//! `table` module turns it into a sortable, filterable row model, and the
//! `tui`/`render` modules present it.

pub mod error;
pub mod render;
pub mod stats;
pub mod table;
pub mod tui;

pub use error::StatsError;

pub type Result<T> = anyhow::Result<T>;
