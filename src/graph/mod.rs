//! Property graph tables in the bulk graph load format.

pub mod export;
pub mod ids;
pub mod table;

pub use export::{write_table, write_tables};
pub use table::{Column, GraphTable, PropertyType, TableKind, Value};
