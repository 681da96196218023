//! Report generation and parsing.

pub mod generator;
pub mod parser;

pub use generator::*;
pub use parser::{parse_lines, parse_report};
