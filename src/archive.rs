// File: ./src/archive.rs
//! Moves finished rows from the live event page to the archive page.
use crate::model::parser::{CategorizedPage, TableRow, Token, parse_table_ordered, tokenize_page};
use chrono::DateTime;
use chrono_tz::Tz;
use std::collections::HashMap;

const ARCHIVE_TITLE: &str = "= Termine Archiv =";
const TABLE_OPEN: &str = "{| class=\"prettytable\"";
const TABLE_HEADER: &str = "! Event !! Termin !! Im Zeitraum";
const TABLE_CLOSE: &str = "|}\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveOutcome {
    pub live_text: String,
    pub archive_text: String,
    pub moved: usize,
}

impl ArchiveOutcome {
    /// Edit comment for saving both pages.
    pub fn summary(&self) -> String {
        if self.moved == 0 {
            "Termine cleanup".to_string()
        } else {
            format!("{} Termine ins Archiv verschoben", self.moved)
        }
    }

    /// A pass that only reformats is saved as a minor edit.
    pub fn is_minor(&self) -> bool {
        self.moved == 0
    }
}

/// Writes a token stream back as page text.
pub fn render_page(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            Token::Category(label) => out.push_str(&format!("== {} ==", label)),
            Token::Divider => out.push_str("|-"),
            Token::Rest(line) | Token::Invalid(line) => out.push_str(line),
            Token::Entry(table_row) => out.push_str(&table_row.line),
        }
        out.push('\n');
    }
    out.trim().to_string()
}

/// A row ending exactly at the threshold stays for one more run.
fn is_finished(table_row: &TableRow, threshold: DateTime<Tz>) -> bool {
    table_row
        .row
        .last_entry()
        .is_some_and(|entry| entry.end_instant() < threshold)
}

/// Moves every row of `live` that ended before `threshold` into `archive`.
///
/// The live page keeps its layout, minus the moved rows and the divider
/// right after each of them. The archive page is rebuilt from scratch with
/// one table per category, ordered like the live page.
pub fn archive(live: &str, archive: &str, threshold: DateTime<Tz>) -> ArchiveOutcome {
    let CategorizedPage {
        categories: archive_categories,
        rows: mut buckets,
    } = parse_table_ordered(archive);

    let mut categories = parse_table_ordered(live).categories;
    for category in archive_categories {
        if !categories.contains(&category) {
            categories.push(category);
        }
    }

    let mut moved = 0;
    let mut skip_divider = false;
    let mut kept = Vec::new();
    for token in tokenize_page(live) {
        match token {
            Token::Entry(table_row) if is_finished(&table_row, threshold) => {
                let category = table_row.row.category().map(str::to_string);
                if !categories.contains(&category) {
                    categories.push(category.clone());
                }
                buckets.entry(category).or_default().push(table_row);
                moved += 1;
                skip_divider = true;
                continue;
            }
            Token::Divider if skip_divider => {
                skip_divider = false;
                continue;
            }
            Token::Category(_) | Token::Rest(_) | Token::Invalid(_) => skip_divider = false,
            Token::Entry(_) | Token::Divider => {}
        }
        kept.push(token);
    }

    if moved > 0 {
        log::info!("Moving {} rows to the archive (threshold {})", moved, threshold);
    }

    ArchiveOutcome {
        live_text: render_page(&kept),
        archive_text: render_page(&archive_tokens(&categories, buckets)),
        moved,
    }
}

fn archive_tokens(
    categories: &[Option<String>],
    mut buckets: HashMap<Option<String>, Vec<TableRow>>,
) -> Vec<Token> {
    let mut tokens = vec![Token::Rest(ARCHIVE_TITLE.to_string())];
    for category in categories {
        let Some(mut rows) = buckets.remove(category) else {
            continue;
        };
        if rows.is_empty() {
            continue;
        }
        rows.sort_by(|a, b| a.row.last_entry().cmp(&b.row.last_entry()));

        if let Some(label) = category {
            tokens.push(Token::Category(label.clone()));
        }
        tokens.push(Token::Rest(TABLE_OPEN.to_string()));
        tokens.push(Token::Rest(TABLE_HEADER.to_string()));
        for row in rows {
            tokens.push(Token::Divider);
            tokens.push(Token::Entry(row));
        }
        tokens.push(Token::Rest(TABLE_CLOSE.to_string()));
    }
    tokens
}
