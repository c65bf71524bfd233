//! Color scheme for the browser.

use ratatui::style::Color;

pub const ACCENT: Color = Color::Yellow;
pub const FRAME: Color = Color::Green;
pub const DIM: Color = Color::DarkGray;
pub const TEXT: Color = Color::White;
