//! Plain-text rendering of the stats table for the `dump` subcommand.

use crate::table::{COLUMNS, StatsTableModel};

/// Render the visible rows as an aligned text table. `limit` caps the number
/// of body rows; the trailer always reports visible vs total counts.
pub fn render_text_table(model: &StatsTableModel, limit: Option<usize>) -> String {
    let count = model.row_count().min(limit.unwrap_or(usize::MAX));

    // Width per column: widest of the header label and the shown cells.
    let mut widths: Vec<usize> = COLUMNS
        .iter()
        .map(|column| column.label().chars().count())
        .collect();

    let mut body: Vec<Vec<String>> = Vec::with_capacity(count);
    for row in 0..count {
        let mut cells = Vec::with_capacity(COLUMNS.len());
        for col in 0..COLUMNS.len() {
            let value = model.display_value(row, col).unwrap_or_default();
            widths[col] = widths[col].max(value.chars().count());
            cells.push(value);
        }
        body.push(cells);
    }

    let mut out = String::new();
    render_line(
        &mut out,
        &widths,
        &COLUMNS
            .iter()
            .map(|column| column.label().to_string())
            .collect::<Vec<_>>(),
    );
    for cells in &body {
        render_line(&mut out, &widths, cells);
    }
    out.push_str(&format!(
        "\n{} of {} rows\n",
        model.visible_count(),
        model.total_count()
    ));
    out
}

fn render_line(out: &mut String, widths: &[usize], cells: &[String]) {
    for (col, (cell, column)) in cells.iter().zip(COLUMNS.iter()).enumerate() {
        if col > 0 {
            out.push_str("  ");
        }
        let pad = widths[col].saturating_sub(cell.chars().count());
        if column.is_numeric() {
            // Right-align numbers, like the table view does.
            out.extend(std::iter::repeat_n(' ', pad));
            out.push_str(cell);
        } else {
            out.push_str(cell);
            if col + 1 < cells.len() {
                out.extend(std::iter::repeat_n(' ', pad));
            }
        }
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{FuncEntry, FuncKey, StatsIndex};
    use crate::table::Column;
    use pretty_assertions::assert_eq;

    fn model() -> StatsTableModel {
        let mut index = StatsIndex::new();
        index.insert(
            FuncKey::new("a.py", 10, "f"),
            FuncEntry {
                primitive_calls: 1,
                calls: 2,
                self_time: 0.1,
                cumulative_time: 0.3,
                callers: serde_json::Value::Null,
            },
        );
        index.insert(
            FuncKey::new("b.py", 5, "g"),
            FuncEntry {
                primitive_calls: 1,
                calls: 1,
                self_time: 0.2,
                cumulative_time: 0.2,
                callers: serde_json::Value::Null,
            },
        );
        let mut model = StatsTableModel::new();
        model.set_stats(Some(&index));
        model
    }

    #[test]
    fn renders_header_rows_and_trailer() {
        let mut m = model();
        m.set_sort_column(Column::CumTime, false);
        let text = render_text_table(&m, None);

        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("path:line"));
        assert!(lines[1].contains("a.py:10"));
        assert!(lines[2].contains("b.py:5"));
        assert_eq!(lines.last().copied(), Some("2 of 2 rows"));
    }

    #[test]
    fn limit_caps_the_body_but_not_the_counts() {
        let text = render_text_table(&model(), Some(1));
        // Header + one body row + blank + trailer.
        assert_eq!(text.lines().count(), 4);
        assert!(text.ends_with("2 of 2 rows\n"));
    }
}
