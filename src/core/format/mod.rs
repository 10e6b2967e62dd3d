//! Output formatting
//!
//! The export writes one `;`-delimited line per consent record under a fixed
//! header.

pub mod row;

pub use row::{format_row, header_row, Column, ColumnRule, COLUMNS, DELIMITER};
