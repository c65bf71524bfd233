//! Stats table adapter: owns the master and visible row sequences and
//! implements sorting, filtering and cell queries over them.
//!
//! The adapter is a plain single-owner structure polled by the presentation
//! layers; it persists nothing and spawns nothing. `visible` is a permutation
//! or subset of `master_rows`, rebuilt synchronously whenever the stats, the
//! sort parameters or the filter text change.

pub mod column;
pub mod row;

pub use column::{COLUMNS, CellValue, Column};
pub use row::StatRow;

use crate::error::StatsError;
use crate::stats::{FuncKey, StatsIndex};
use log::debug;

#[derive(Debug)]
pub struct StatsTableModel {
    /// Full row sequence, rebuilt once per load. Rows are never mutated.
    master_rows: Vec<StatRow>,
    /// Indices into `master_rows`, in display order.
    visible: Vec<usize>,
    sort_column: Column,
    sort_ascending: bool,
    filter_text: String,
}

impl Default for StatsTableModel {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsTableModel {
    pub fn new() -> Self {
        Self {
            master_rows: Vec::new(),
            visible: Vec::new(),
            sort_column: Column::PathLine,
            sort_ascending: true,
            filter_text: String::new(),
        }
    }

    /// Load or clear the statistics. Replaces the master rows wholesale and
    /// reapplies the active sort and filter. `None` clears to the empty
    /// state.
    pub fn set_stats(&mut self, stats: Option<&StatsIndex>) {
        match stats {
            None => self.master_rows.clear(),
            Some(index) => {
                self.master_rows = index
                    .iter()
                    .map(|(key, entry)| StatRow::new(key, entry))
                    .collect();
            }
        }
        debug!("loaded {} stat rows", self.master_rows.len());
        self.sort_and_filter();
    }

    /// Number of rows currently visible (after filtering).
    pub fn row_count(&self) -> usize {
        self.visible.len()
    }

    pub fn column_count(&self) -> usize {
        COLUMNS.len()
    }

    /// Total row count, ignoring the filter. Shown as "n of m rows".
    pub fn total_count(&self) -> usize {
        self.master_rows.len()
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// Formatted cell text. Out-of-range probes return `None`, never an
    /// error: presentation layers poll speculative indices during updates.
    pub fn display_value(&self, row: usize, col: usize) -> Option<String> {
        let column = COLUMNS.get(col)?;
        self.row_at(row).map(|r| column.display_value(r))
    }

    /// Raw typed cell value, for collaborators that must compare cells
    /// instead of displaying them. Bounds-checked like `display_value`.
    pub fn raw_value(&self, row: usize, col: usize) -> Option<CellValue> {
        let column = COLUMNS.get(col)?;
        self.row_at(row).map(|r| column.raw_value(r))
    }

    /// Sort by column index. Unlike cell probes, an out-of-range column here
    /// is a programming error and fails loudly.
    pub fn set_sort(&mut self, col_index: usize, ascending: bool) -> Result<(), StatsError> {
        let column = Column::from_index(col_index)?;
        self.set_sort_column(column, ascending);
        Ok(())
    }

    pub fn set_sort_column(&mut self, column: Column, ascending: bool) {
        debug!("sort column: {:?}, ascending: {}", column, ascending);
        self.sort_column = column;
        self.sort_ascending = ascending;
        self.sort_and_filter();
    }

    /// Keep only rows whose file path or function name contains `text`,
    /// case-insensitively. The empty string clears the filter.
    pub fn set_filter(&mut self, text: &str) {
        debug!("filtering by: {:?}", text);
        self.filter_text = text.to_string();
        self.sort_and_filter();
    }

    pub fn sort_column(&self) -> Column {
        self.sort_column
    }

    pub fn sort_ascending(&self) -> bool {
        self.sort_ascending
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn row_at(&self, index: usize) -> Option<&StatRow> {
        self.visible.get(index).map(|&i| &self.master_rows[i])
    }

    /// Position of the row with this key in the visible sequence. Used by
    /// the presentation layer to keep the selection across a rebuild; `None`
    /// means the row was filtered out and the selection should be cleared.
    pub fn index_of(&self, key: &FuncKey) -> Option<usize> {
        self.visible.iter().position(|&i| {
            let row = &self.master_rows[i];
            row.file_path == key.file && row.line == key.line && row.function == key.name
        })
    }

    /// Rebuild `visible` from scratch: filter, then a full stable sort.
    /// Direction flips the overall comparison result, not the tie break.
    fn sort_and_filter(&mut self) {
        let filter = self.filter_text.to_lowercase();
        self.visible = (0..self.master_rows.len())
            .filter(|&i| {
                if filter.is_empty() {
                    return true;
                }
                let row = &self.master_rows[i];
                row.lc_file_path.contains(&filter) || row.lc_function.contains(&filter)
            })
            .collect();

        let column = self.sort_column;
        let ascending = self.sort_ascending;
        let rows = &self.master_rows;
        self.visible.sort_by(|&a, &b| {
            let ord = column.compare(&rows[a], &rows[b]);
            if ascending { ord } else { ord.reverse() }
        });

        debug!(
            "showing {} of {} rows",
            self.visible.len(),
            self.master_rows.len()
        );
    }
}
