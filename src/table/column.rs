//! Column schema for the stats table.
//!
//! The canonical nine columns, their header labels, tooltips, display
//! formatting and sort comparison live here; the model and both front ends
//! consume this enumeration instead of hard-coding indices.

use crate::error::StatsError;
use crate::table::StatRow;
use std::cmp::Ordering;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    PathLine,
    FileLine,
    Function,
    Calls,
    Time,
    TimePerCall,
    PrimitiveCalls,
    CumTime,
    CumTimePerCall,
}

/// Declared column order; indices into this array are the public column ids.
pub const COLUMNS: [Column; 9] = [
    Column::PathLine,
    Column::FileLine,
    Column::Function,
    Column::Calls,
    Column::Time,
    Column::TimePerCall,
    Column::PrimitiveCalls,
    Column::CumTime,
    Column::CumTimePerCall,
];

/// Raw typed cell content, exposed so collaborators can compare values
/// numerically instead of comparing formatted text.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Count(u64),
    Seconds(f64),
}

impl Column {
    pub fn from_index(index: usize) -> Result<Column, StatsError> {
        COLUMNS
            .get(index)
            .copied()
            .ok_or(StatsError::InvalidColumn(index))
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Column::PathLine => "path:line",
            Column::FileLine => "file:line",
            Column::Function => "function",
            Column::Calls => "calls",
            Column::Time => "time",
            Column::TimePerCall => "time per call",
            Column::PrimitiveCalls => "primitive calls",
            Column::CumTime => "Σ time",
            Column::CumTimePerCall => "Σ time per call",
        }
    }

    pub fn tooltip(self) -> &'static str {
        match self {
            Column::PathLine => "Path to file plus line number",
            Column::FileLine => "Base file name plus line number",
            Column::Function => "Function name",
            Column::Calls => "Number of calls of this function",
            Column::Time => {
                "The total time spent in the given function \
                 (excluding time made in calls to sub-functions)"
            }
            Column::TimePerCall => "Time divided by the number of calls",
            Column::PrimitiveCalls => "Number of non-recursive calls of this function",
            Column::CumTime => {
                "The cumulative time spent in this and all subfunctions \
                 (from invocation till exit). This figure is accurate even for \
                 recursive functions."
            }
            Column::CumTimePerCall => {
                "Cumulative (Σ) time divided by the number of primitive calls"
            }
        }
    }

    /// Numeric columns are right-aligned by the presentation layers.
    pub fn is_numeric(self) -> bool {
        !matches!(self, Column::PathLine | Column::FileLine | Column::Function)
    }

    /// Formatted cell text: 3 decimals for absolute times, 7 for per-call
    /// times, `-` for undefined per-call values, text verbatim.
    pub fn display_value(self, row: &StatRow) -> String {
        match self {
            Column::PathLine => format!("{}:{}", row.file_path, row.line),
            Column::FileLine => format!("{}:{}", row.file_name, row.line),
            Column::Function => row.function.clone(),
            Column::Calls => row.calls.to_string(),
            Column::Time => format!("{:.3}", row.self_time),
            Column::TimePerCall => fmt_per_call(row.time_per_call),
            Column::PrimitiveCalls => row.primitive_calls.to_string(),
            Column::CumTime => format!("{:.3}", row.cumulative_time),
            Column::CumTimePerCall => fmt_per_call(row.cum_time_per_call),
        }
    }

    /// The raw typed cell value backing [`Column::display_value`].
    pub fn raw_value(self, row: &StatRow) -> CellValue {
        match self {
            Column::PathLine => CellValue::Text(row.file_path.clone()),
            Column::FileLine => CellValue::Text(row.file_name.clone()),
            Column::Function => CellValue::Text(row.function.clone()),
            Column::Calls => CellValue::Count(row.calls),
            Column::Time => CellValue::Seconds(row.self_time),
            Column::TimePerCall => CellValue::Seconds(row.time_per_call),
            Column::PrimitiveCalls => CellValue::Count(row.primitive_calls),
            Column::CumTime => CellValue::Seconds(row.cumulative_time),
            Column::CumTimePerCall => CellValue::Seconds(row.cum_time_per_call),
        }
    }

    /// Ascending comparison by this column's natural key, always tie-broken
    /// by (file path, line, function name), case-insensitively. The path can
    /// be `~` for built-in methods, which is why the function name stays in
    /// the tie break.
    pub fn compare(self, a: &StatRow, b: &StatRow) -> Ordering {
        let primary = match self {
            // The tie break alone is exactly the (path, line, function) key.
            Column::PathLine => Ordering::Equal,
            Column::FileLine => a
                .lc_file_name
                .cmp(&b.lc_file_name)
                .then_with(|| a.line.cmp(&b.line)),
            Column::Function => a.lc_function.cmp(&b.lc_function),
            Column::Calls => a.calls.cmp(&b.calls),
            Column::Time => a.self_time.total_cmp(&b.self_time),
            Column::TimePerCall => a.time_per_call.total_cmp(&b.time_per_call),
            Column::PrimitiveCalls => a.primitive_calls.cmp(&b.primitive_calls),
            Column::CumTime => a.cumulative_time.total_cmp(&b.cumulative_time),
            Column::CumTimePerCall => {
                a.cum_time_per_call.total_cmp(&b.cum_time_per_call)
            }
        };
        primary.then_with(|| tie_break(a, b))
    }
}

fn tie_break(a: &StatRow, b: &StatRow) -> Ordering {
    a.lc_file_path
        .cmp(&b.lc_file_path)
        .then_with(|| a.line.cmp(&b.line))
        .then_with(|| a.lc_function.cmp(&b.lc_function))
}

/// Undefined per-call values (zero-call entries) display as a dash.
fn fmt_per_call(value: f64) -> String {
    if value.is_nan() {
        "-".to_string()
    } else {
        format!("{:.7}", value)
    }
}

impl FromStr for Column {
    type Err = String;

    /// Column names accepted on the command line, with the profiler's
    /// traditional spellings as aliases.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_lowercase().as_str() {
            "path" | "path:line" => Ok(Column::PathLine),
            "file" | "file:line" => Ok(Column::FileLine),
            "function" | "func" | "name" => Ok(Column::Function),
            "calls" | "ncalls" => Ok(Column::Calls),
            "time" | "tottime" => Ok(Column::Time),
            "percall" | "time-per-call" => Ok(Column::TimePerCall),
            "primcalls" | "primitive-calls" => Ok(Column::PrimitiveCalls),
            "cumtime" | "cumulative" => Ok(Column::CumTime),
            "cumpercall" | "cumtime-per-call" => Ok(Column::CumTimePerCall),
            other => Err(format!(
                "unknown column {:?} (try: path, file, function, calls, time, \
                 percall, primcalls, cumtime, cumpercall)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{FuncEntry, FuncKey};
    use pretty_assertions::assert_eq;

    fn row(file: &str, line: u32, name: &str, calls: u64, tt: f64) -> StatRow {
        StatRow::new(
            &FuncKey::new(file, line, name),
            &FuncEntry {
                primitive_calls: calls,
                calls,
                self_time: tt,
                cumulative_time: tt,
                callers: serde_json::Value::Null,
            },
        )
    }

    #[test]
    fn indices_round_trip_through_the_declared_order() {
        for (index, column) in COLUMNS.iter().enumerate() {
            assert_eq!(column.index(), index);
            assert_eq!(Column::from_index(index).unwrap(), *column);
        }
        assert!(matches!(
            Column::from_index(COLUMNS.len()),
            Err(StatsError::InvalidColumn(_))
        ));
    }

    #[test]
    fn numeric_columns_format_with_fixed_precision() {
        let r = row("a.py", 10, "f", 4, 2.0);
        assert_eq!(Column::PathLine.display_value(&r), "a.py:10");
        assert_eq!(Column::Time.display_value(&r), "2.000");
        assert_eq!(Column::TimePerCall.display_value(&r), "0.5000000");
    }

    #[test]
    fn undefined_per_call_values_display_as_dash() {
        let r = row("a.py", 10, "f", 0, 0.0);
        assert_eq!(Column::TimePerCall.display_value(&r), "-");
        assert_eq!(Column::CumTimePerCall.display_value(&r), "-");
    }

    #[test]
    fn raw_values_are_typed_not_formatted() {
        let r = row("a.py", 10, "f", 4, 2.0);
        assert_eq!(Column::Calls.raw_value(&r), CellValue::Count(4));
        assert_eq!(Column::Time.raw_value(&r), CellValue::Seconds(2.0));
        assert_eq!(
            Column::Function.raw_value(&r),
            CellValue::Text("f".to_string())
        );
    }

    #[test]
    fn comparison_is_numeric_for_count_columns() {
        // Lexicographic comparison would put "10" before "9".
        let small = row("a.py", 1, "f", 9, 0.0);
        let large = row("b.py", 1, "g", 10, 0.0);
        assert_eq!(Column::Calls.compare(&small, &large), Ordering::Less);
    }

    #[test]
    fn equal_primary_values_fall_back_to_the_location_key() {
        let first = row("a.py", 1, "f", 5, 0.0);
        let second = row("b.py", 1, "g", 5, 0.0);
        assert_eq!(Column::Calls.compare(&first, &second), Ordering::Less);
        assert_eq!(Column::Calls.compare(&second, &first), Ordering::Greater);
    }

    #[test]
    fn text_comparison_ignores_case() {
        let upper = row("A.PY", 1, "F", 1, 0.0);
        let lower = row("a.py", 1, "f", 1, 0.0);
        assert_eq!(Column::Function.compare(&upper, &lower), Ordering::Equal);
    }

    #[test]
    fn column_names_parse_from_cli_spellings() {
        assert_eq!("cumtime".parse::<Column>().unwrap(), Column::CumTime);
        assert_eq!("ncalls".parse::<Column>().unwrap(), Column::Calls);
        assert!("bogus".parse::<Column>().is_err());
    }
}
