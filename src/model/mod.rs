// File: ./src/model/mod.rs
pub mod display;
pub mod item;
pub mod links;
pub mod matcher;
pub mod parser;
pub mod recurrence;

pub use display::EntryDisplay;
pub use item::{DateEntry, DateType, RecurrenceRule, Shape, TIMEZONE};
pub use parser::{
    ParsedPage, ParsedRow, Token, flatten, parse_page, parse_table, parse_table_ordered,
    tokenize_page,
};
pub use recurrence::{Recurrence, RecurrenceEngine};
