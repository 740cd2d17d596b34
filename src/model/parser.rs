// File: ./src/model/parser.rs
//! Line tokenizer for the event page.
//!
//! The page is a MediaWiki table split into `== Category ==` sections. Each
//! event row has three cells: name, date expression and (for weekly rows)
//! the validity window:
//!
//! ```text
//! == Vorträge ==
//! {| class="prettytable"
//! ! Event !! Termin !! Im Zeitraum
//! |-
//! | [[Plenum]] || 20.08.2014 19:00 ||
//! |-
//! | Nähkränzchen || Di/2, 19:00 - 22:00 || 02.09.2014 - 16.12.2014
//! |}
//! ```
//!
//! Every line becomes a token so the page can be written back unchanged.
use crate::error::EntryError;
use crate::model::display::EntryDisplay;
use crate::model::item::DateEntry;
use crate::model::matcher::{DateExpr, match_date_expr};
use crate::model::recurrence::{Recurrence, RecurrenceEngine};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\|\s*(.*?)\s*\|\|\s*(.*?)\s*\|\|\s*(.*?)\s*$").expect("row pattern")
});
static CATEGORY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^==([^=]+)==$").expect("category pattern"));
const DIVIDER: &str = "|-";

/// A successfully parsed table row: one entry, or a weekly batch kept whole.
#[derive(Debug, Clone)]
pub enum ParsedRow {
    Single(DateEntry),
    Batch(Recurrence),
}

impl ParsedRow {
    pub fn name(&self) -> &str {
        match self {
            ParsedRow::Single(e) => &e.name,
            ParsedRow::Batch(r) => &r.name,
        }
    }

    pub fn category(&self) -> Option<&str> {
        match self {
            ParsedRow::Single(e) => e.category.as_deref(),
            ParsedRow::Batch(r) => r.category.as_deref(),
        }
    }

    /// The entry that ends last: the row itself, or the final occurrence of a
    /// batch. `None` for a batch without occurrences.
    pub fn last_entry(&self) -> Option<&DateEntry> {
        match self {
            ParsedRow::Single(e) => Some(e),
            ParsedRow::Batch(r) => r.last(),
        }
    }

    /// Canonical table row. Empty batches have none.
    pub fn wiki_row(&self) -> Option<String> {
        match self {
            ParsedRow::Single(e) => Some(e.wiki_row()),
            ParsedRow::Batch(r) => r.wiki_row(),
        }
    }
}

/// A parsed row together with the (trimmed) source line it came from.
#[derive(Debug, Clone)]
pub struct TableRow {
    pub row: ParsedRow,
    pub line: String,
}

#[derive(Debug, Clone)]
pub enum Token {
    Category(String),
    Divider,
    Rest(String),
    Entry(TableRow),
    /// A table row whose date could not be understood, kept verbatim.
    Invalid(String),
}

/// Rows grouped by the section they appeared in, sections in page order.
/// Rows above the first heading live under `None`.
#[derive(Debug, Clone, Default)]
pub struct CategorizedPage {
    pub categories: Vec<Option<String>>,
    pub rows: HashMap<Option<String>, Vec<TableRow>>,
}

impl CategorizedPage {
    fn touch(&mut self, category: &Option<String>) {
        if !self.categories.contains(category) {
            self.categories.push(category.clone());
            self.rows.insert(category.clone(), Vec::new());
        }
    }

    pub fn rows_in(&self, category: Option<&str>) -> &[TableRow] {
        self.rows
            .get(&category.map(str::to_string))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

fn build_row(
    name: &str,
    category: Option<&str>,
    expr: DateExpr,
    window: &str,
) -> Result<ParsedRow, EntryError> {
    let bad_value = || EntryError::InvalidCalendarValue(format!("{:?}", expr));
    let single = match &expr {
        DateExpr::SingleDate(day) => {
            DateEntry::single_date(name, category, day.to_date().ok_or_else(bad_value)?)?
        }
        DateExpr::SingleDateTime(day, time) => {
            DateEntry::single_date_time(name, category, time.on(*day).ok_or_else(bad_value)?)?
        }
        DateExpr::SingleDateTimeRange(day, from, to) => DateEntry::single_date_time_range(
            name,
            category,
            day.to_date().ok_or_else(bad_value)?,
            from.to_time().ok_or_else(bad_value)?,
            to.to_time().ok_or_else(bad_value)?,
        )?,
        DateExpr::DateRange(first, last) => DateEntry::date_range(
            name,
            category,
            first.to_date().ok_or_else(bad_value)?,
            last.to_date().ok_or_else(bad_value)?,
        )?,
        DateExpr::DateTimeRange(day, from, last_day, to) => DateEntry::date_time_range(
            name,
            category,
            from.on(*day).ok_or_else(bad_value)?,
            to.on(*last_day).ok_or_else(bad_value)?,
        )?,
        DateExpr::Weekly { token, from, to } => {
            return RecurrenceEngine::expand(name, category, token, *from, *to, window)
                .map(ParsedRow::Batch);
        }
    };
    Ok(ParsedRow::Single(single))
}

/// Classifies the date cell and builds the row. Unknown shapes and rows that
/// fail validation both yield `None`; the latter are logged.
pub fn analyze_row(
    name: &str,
    category: Option<&str>,
    date: &str,
    window: &str,
) -> Option<ParsedRow> {
    let Some(expr) = match_date_expr(date) else {
        log::debug!("Unrecognized date expression '{}' for '{}'", date, name);
        return None;
    };
    match build_row(name, category, expr, window) {
        Ok(row) => Some(row),
        Err(e) => {
            log::warn!(
                "InvalidDate: {} {} {} {} ({})",
                name,
                category.unwrap_or_default(),
                date,
                window,
                e
            );
            None
        }
    }
}

pub fn tokenize_page(content: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut category: Option<String> = None;

    for line in content.lines() {
        let line = line.trim();
        if let Some(caps) = ROW.captures(line) {
            let token = match analyze_row(&caps[1], category.as_deref(), &caps[2], &caps[3]) {
                Some(row) => Token::Entry(TableRow {
                    row,
                    line: line.to_string(),
                }),
                None => Token::Invalid(line.to_string()),
            };
            tokens.push(token);
        } else if let Some(caps) = CATEGORY.captures(line) {
            let label = caps[1].trim().to_string();
            category = Some(label.clone());
            tokens.push(Token::Category(label));
        } else if line == DIVIDER {
            tokens.push(Token::Divider);
        } else {
            tokens.push(Token::Rest(line.to_string()));
        }
    }

    log::debug!(
        "Tokenized page: {} lines, {} rows, {} invalid",
        tokens.len(),
        tokens.iter().filter(|t| matches!(t, Token::Entry(_))).count(),
        tokens.iter().filter(|t| matches!(t, Token::Invalid(_))).count()
    );
    tokens
}

/// Parsed rows and the verbatim lines of rows that failed, both in page order.
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    pub rows: Vec<ParsedRow>,
    pub invalid: Vec<String>,
}

pub fn parse_page(content: &str) -> ParsedPage {
    let mut page = ParsedPage::default();
    for token in tokenize_page(content) {
        match token {
            Token::Entry(table_row) => page.rows.push(table_row.row),
            Token::Invalid(line) => page.invalid.push(line),
            _ => {}
        }
    }
    page
}

/// All parsed rows of a page, in page order.
pub fn parse_table(content: &str) -> Vec<ParsedRow> {
    parse_page(content).rows
}

pub fn parse_table_ordered(content: &str) -> CategorizedPage {
    let mut page = CategorizedPage::default();
    let mut category: Option<String> = None;

    for token in tokenize_page(content) {
        match token {
            Token::Category(label) => {
                category = Some(label);
                page.touch(&category);
            }
            Token::Entry(table_row) => {
                page.touch(&category);
                if let Some(rows) = page.rows.get_mut(&category) {
                    rows.push(table_row);
                }
            }
            _ => {}
        }
    }
    page
}

/// Breaks weekly batches into their occurrences.
pub fn flatten(rows: &[ParsedRow]) -> Vec<DateEntry> {
    let mut entries = Vec::new();
    for row in rows {
        match row {
            ParsedRow::Single(e) => entries.push(e.clone()),
            ParsedRow::Batch(r) => entries.extend(r.entries().iter().cloned()),
        }
    }
    entries
}
