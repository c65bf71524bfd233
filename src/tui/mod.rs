//! Interactive terminal browser for the stats table.
//!
//! One full-screen table over the [`StatsTableModel`], with a filter overlay
//! and a help overlay. The selection is remembered by function key, so it
//! survives resorting and refiltering as long as the row stays visible.
//!
//! Keys: ↑/↓/PgUp/PgDn/Home/End select, ←/→ move the sort column, `1`-`9`
//! jump to a column, `r` reverse the direction, `/` filter, `c` clear the
//! filter, `?` help, `q` quit.

mod theme;

use crate::Result;
use crate::stats::FuncKey;
use crate::table::{COLUMNS, Column, StatRow, StatsTableModel};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
};
use std::io;
use std::time::Duration;

use theme::{ACCENT, DIM, FRAME, TEXT};

const STYLE_HEADING: Style = Style::new().fg(FRAME).add_modifier(Modifier::BOLD);
const STYLE_KEY: Style = Style::new().fg(ACCENT);
const STYLE_DIM: Style = Style::new().fg(DIM);

/// Rows jumped by PgUp/PgDn.
const PAGE_JUMP: isize = 20;

/// Current view mode determines what's displayed and how keys are handled.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ViewMode {
    /// Main view: the stats table.
    Table,
    /// Text input for the substring filter.
    Filter,
    /// Help overlay with keys and column descriptions.
    Help,
}

pub struct App {
    model: StatsTableModel,
    /// File name shown in the header.
    title: String,

    table_state: TableState,
    /// Key of the selected row, re-resolved after every model rebuild.
    selected_key: Option<FuncKey>,

    view_mode: ViewMode,
    filter_input: String,
    should_quit: bool,
}

impl App {
    pub fn new(model: StatsTableModel, title: impl Into<String>) -> Self {
        let mut app = Self {
            model,
            title: title.into(),
            table_state: TableState::default(),
            selected_key: None,
            view_mode: ViewMode::Table,
            filter_input: String::new(),
            should_quit: false,
        };
        if app.model.row_count() > 0 {
            app.select(0);
        }
        app
    }

    fn select(&mut self, index: usize) {
        self.table_state.select(Some(index));
        self.selected_key = self.model.row_at(index).map(StatRow::key);
    }

    fn clear_selection(&mut self) {
        self.table_state.select(None);
        self.selected_key = None;
    }

    fn select_clamped(&mut self, index: usize) {
        let count = self.model.row_count();
        if count == 0 {
            self.clear_selection();
        } else {
            self.select(index.min(count - 1));
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let count = self.model.row_count();
        if count == 0 {
            self.clear_selection();
            return;
        }
        let current = self
            .table_state
            .selected()
            .map_or(-1, |index| index as isize);
        let next = (current + delta).clamp(0, count as isize - 1) as usize;
        self.select(next);
    }

    /// Re-resolve the remembered key after a resort or refilter. A row that
    /// dropped out of the visible set loses the selection.
    fn restore_selection(&mut self) {
        match self
            .selected_key
            .as_ref()
            .and_then(|key| self.model.index_of(key))
        {
            Some(index) => self.table_state.select(Some(index)),
            None => self.clear_selection(),
        }
    }

    fn set_sort(&mut self, column: Column) {
        let ascending = self.model.sort_ascending();
        self.model.set_sort_column(column, ascending);
        self.restore_selection();
    }

    fn handle_key(&mut self, key: KeyCode) {
        match self.view_mode {
            ViewMode::Table => match key {
                KeyCode::Char('q' | 'Q') | KeyCode::Esc => self.should_quit = true,
                KeyCode::Up => self.move_selection(-1),
                KeyCode::Down => self.move_selection(1),
                KeyCode::PageUp => self.move_selection(-PAGE_JUMP),
                KeyCode::PageDown => self.move_selection(PAGE_JUMP),
                KeyCode::Home => self.select_clamped(0),
                KeyCode::End => self.select_clamped(usize::MAX),
                KeyCode::Left => {
                    let index = self.model.sort_column().index();
                    self.set_sort(Column::from_index(index.saturating_sub(1)).unwrap_or(Column::PathLine));
                }
                KeyCode::Right => {
                    let index = (self.model.sort_column().index() + 1).min(COLUMNS.len() - 1);
                    self.set_sort(COLUMNS[index]);
                }
                KeyCode::Char('r' | 'R') => {
                    let column = self.model.sort_column();
                    let ascending = !self.model.sort_ascending();
                    self.model.set_sort_column(column, ascending);
                    self.restore_selection();
                }
                KeyCode::Char(digit @ '1'..='9') => {
                    let index = digit as usize - '1' as usize;
                    self.set_sort(COLUMNS[index]);
                }
                KeyCode::Char('/') => {
                    self.filter_input = self.model.filter_text().to_string();
                    self.view_mode = ViewMode::Filter;
                }
                KeyCode::Char('c' | 'C') => {
                    self.model.set_filter("");
                    self.restore_selection();
                }
                KeyCode::Char('?') => self.view_mode = ViewMode::Help,
                _ => {}
            },
            ViewMode::Filter => match key {
                KeyCode::Esc => self.view_mode = ViewMode::Table,
                KeyCode::Enter => {
                    let text = std::mem::take(&mut self.filter_input);
                    self.model.set_filter(&text);
                    self.restore_selection();
                    self.view_mode = ViewMode::Table;
                }
                KeyCode::Backspace => {
                    self.filter_input.pop();
                }
                KeyCode::Char(c) => self.filter_input.push(c),
                _ => {}
            },
            // Any key closes help.
            ViewMode::Help => self.view_mode = ViewMode::Table,
        }
    }

    /// Run the event loop until the user quits.
    pub fn run(mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        loop {
            terminal.draw(|frame| self.draw(frame))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Table
                Constraint::Length(3), // Status bar
            ])
            .split(frame.area());

        self.draw_header(frame, outer[0]);
        self.draw_table(frame, outer[1]);
        self.draw_status(frame, outer[2]);

        match self.view_mode {
            ViewMode::Filter => self.draw_filter_overlay(frame, frame.area()),
            ViewMode::Help => draw_help_overlay(frame, frame.area()),
            ViewMode::Table => {}
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let header = Paragraph::new(vec![Line::from(vec![
            Span::styled("pstats-browser", STYLE_HEADING),
            Span::styled(" | ", STYLE_DIM),
            Span::styled(self.title.as_str(), Style::new().fg(TEXT)),
            Span::styled(" | ", STYLE_DIM),
            Span::styled(
                format!("{} entries", self.model.total_count()),
                Style::new().fg(FRAME),
            ),
        ])])
        .block(Block::default().borders(Borders::ALL).border_style(Style::new().fg(FRAME)));
        frame.render_widget(header, area);
    }

    fn draw_table(&mut self, frame: &mut Frame, area: Rect) {
        let sort_column = self.model.sort_column();
        let sort_marker = if self.model.sort_ascending() { "▲" } else { "▼" };

        let header_cells: Vec<Cell> = COLUMNS
            .iter()
            .map(|&column| {
                let label = if column == sort_column {
                    format!("{} {}", column.label(), sort_marker)
                } else {
                    column.label().to_string()
                };
                let style = if column == sort_column {
                    Style::new().fg(ACCENT).add_modifier(Modifier::BOLD)
                } else {
                    Style::new().fg(FRAME).add_modifier(Modifier::BOLD)
                };
                let mut text = Text::from(label).style(style);
                if column.is_numeric() {
                    text = text.alignment(Alignment::Right);
                }
                Cell::from(text)
            })
            .collect();

        let rows: Vec<Row> = (0..self.model.row_count())
            .map(|row| {
                let cells: Vec<Cell> = COLUMNS
                    .iter()
                    .enumerate()
                    .map(|(col, column)| {
                        let value = self.model.display_value(row, col).unwrap_or_default();
                        let mut text = Text::from(value);
                        if column.is_numeric() {
                            text = text.alignment(Alignment::Right);
                        }
                        Cell::from(text)
                    })
                    .collect();
                Row::new(cells)
            })
            .collect();

        let widths = [
            Constraint::Fill(3),    // path:line
            Constraint::Fill(2),    // file:line
            Constraint::Fill(2),    // function
            Constraint::Length(8),  // calls
            Constraint::Length(8),  // time
            Constraint::Length(15), // time per call
            Constraint::Length(15), // primitive calls
            Constraint::Length(9),  // Σ time
            Constraint::Length(17), // Σ time per call
        ];

        let table = Table::new(rows, widths)
            .header(Row::new(header_cells).height(1))
            .row_highlight_style(Style::new().add_modifier(Modifier::REVERSED))
            .column_spacing(1)
            .block(Block::default().borders(Borders::ALL).border_style(Style::new().fg(FRAME)));

        frame.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(
                format!(
                    "{} of {} rows",
                    self.model.visible_count(),
                    self.model.total_count()
                ),
                Style::new().fg(TEXT),
            ),
            Span::styled(" | ", STYLE_DIM),
        ];
        if !self.model.filter_text().is_empty() {
            spans.push(Span::styled(
                format!("filter: {:?} ", self.model.filter_text()),
                Style::new().fg(ACCENT),
            ));
            spans.push(Span::styled("| ", STYLE_DIM));
        }
        spans.extend([
            Span::styled("↑↓", STYLE_KEY),
            Span::styled(":Select ", STYLE_DIM),
            Span::styled("←→", STYLE_KEY),
            Span::styled(":Sort ", STYLE_DIM),
            Span::styled("r", STYLE_KEY),
            Span::styled(":Reverse ", STYLE_DIM),
            Span::styled("/", STYLE_KEY),
            Span::styled(":Filter ", STYLE_DIM),
            Span::styled("c", STYLE_KEY),
            Span::styled(":Clear ", STYLE_DIM),
            Span::styled("?", STYLE_KEY),
            Span::styled(":Help ", STYLE_DIM),
            Span::styled("q", STYLE_KEY),
            Span::styled(":Quit", STYLE_DIM),
        ]);

        let status = Paragraph::new(vec![Line::from(spans)]).block(
            Block::default().borders(Borders::ALL).border_style(Style::new().fg(FRAME)),
        );
        frame.render_widget(status, area);
    }

    fn draw_filter_overlay(&self, frame: &mut Frame, area: Rect) {
        let popup = centered_popup(area, 60, 3);
        let input = Paragraph::new(format!("Filter: {}_", self.filter_input))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Filter by path or function (Enter to apply, Esc to cancel)")
                    .border_style(Style::new().fg(FRAME)),
            )
            .style(Style::new().fg(ACCENT));
        frame.render_widget(Clear, popup);
        frame.render_widget(input, popup);
    }
}

/// Render the help overlay: keys plus the column descriptions.
fn draw_help_overlay(frame: &mut Frame, area: Rect) {
    let popup = centered_popup(area, 80, 11 + COLUMNS.len() as u16);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("  Keys", STYLE_HEADING)),
        Line::from(vec![
            Span::styled("  ↑↓ PgUp PgDn Home End", STYLE_KEY),
            Span::styled("  move the selection", STYLE_DIM),
        ]),
        Line::from(vec![
            Span::styled("  ←→ 1-9", STYLE_KEY),
            Span::styled("  choose the sort column   ", STYLE_DIM),
            Span::styled("r", STYLE_KEY),
            Span::styled("  reverse the direction", STYLE_DIM),
        ]),
        Line::from(vec![
            Span::styled("  /", STYLE_KEY),
            Span::styled("  filter   ", STYLE_DIM),
            Span::styled("c", STYLE_KEY),
            Span::styled("  clear filter   ", STYLE_DIM),
            Span::styled("q", STYLE_KEY),
            Span::styled("  quit", STYLE_DIM),
        ]),
        Line::from(""),
        Line::from(Span::styled("  Columns", STYLE_HEADING)),
    ];
    for (index, column) in COLUMNS.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("  {} {:<16}", index + 1, column.label()), STYLE_KEY),
            Span::styled(column.tooltip(), STYLE_DIM),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("  Press any key to close", STYLE_DIM)));

    let help = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .border_style(Style::new().fg(FRAME)),
    );
    frame.render_widget(Clear, popup);
    frame.render_widget(help, popup);
}

/// Centered popup area with the given width percentage and height in lines.
fn centered_popup(area: Rect, width_percent: u16, height_lines: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height_lines),
            Constraint::Fill(1),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - width_percent) / 2),
            Constraint::Percentage(width_percent),
            Constraint::Percentage((100 - width_percent) / 2),
        ])
        .split(vertical[1])[1]
}

/// Open the browser on a loaded model. Blocks until the user quits.
pub fn run(model: StatsTableModel, title: &str) -> Result<()> {
    App::new(model, title).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{FuncEntry, StatsIndex};
    use pretty_assertions::assert_eq;

    fn app() -> App {
        let mut index = StatsIndex::new();
        for (file, line, name, ct) in [
            ("a.py", 10, "f", 0.3),
            ("b.py", 5, "g", 0.2),
            ("c.py", 7, "h", 0.1),
        ] {
            index.insert(
                FuncKey::new(file, line, name),
                FuncEntry {
                    primitive_calls: 1,
                    calls: 1,
                    self_time: ct,
                    cumulative_time: ct,
                    callers: serde_json::Value::Null,
                },
            );
        }
        let mut model = StatsTableModel::new();
        model.set_stats(Some(&index));
        model.set_sort_column(Column::CumTime, false);
        App::new(model, "test.prof")
    }

    #[test]
    fn selection_follows_the_row_across_a_resort() {
        let mut app = app();
        // Σ time descending: f, g, h. Select g.
        app.move_selection(1);
        assert_eq!(app.selected_key, Some(FuncKey::new("b.py", 5, "g")));

        // Reverse: h, g, f. g is now in the middle, still selected.
        app.handle_key(KeyCode::Char('r'));
        assert_eq!(app.table_state.selected(), Some(1));
        assert_eq!(app.selected_key, Some(FuncKey::new("b.py", 5, "g")));
    }

    #[test]
    fn filtering_out_the_selected_row_clears_the_selection() {
        let mut app = app();
        app.move_selection(2); // h
        app.handle_key(KeyCode::Char('/'));
        for c in "a.py".chars() {
            app.handle_key(KeyCode::Char(c));
        }
        app.handle_key(KeyCode::Enter);

        assert_eq!(app.model.row_count(), 1);
        assert_eq!(app.table_state.selected(), None);
        assert_eq!(app.selected_key, None);
    }

    #[test]
    fn digit_keys_pick_the_sort_column() {
        let mut app = app();
        app.handle_key(KeyCode::Char('4'));
        assert_eq!(app.model.sort_column(), Column::Calls);
        // Direction carries over from the previous sort.
        assert!(!app.model.sort_ascending());
    }

    #[test]
    fn selection_is_clamped_to_the_visible_rows() {
        let mut app = app();
        app.move_selection(100);
        assert_eq!(app.table_state.selected(), Some(2));
        app.move_selection(-100);
        assert_eq!(app.table_state.selected(), Some(0));
    }
}
