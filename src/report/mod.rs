//! Report rendering.

pub mod columns;
pub mod generator;

pub use columns::ColumnSet;
pub use generator::{generate_json_report, generate_markdown_report, write_report};
