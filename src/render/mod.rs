//! Rendering of the table for non-interactive output.

pub mod text;

pub use text::render_text_table;
