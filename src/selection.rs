// File: ./src/selection.rs
//! Picks the entries shown in the "upcoming" and "recently" lists.
//!
//! Repeating series are detected by their plain display name: every entry
//! sharing a name counts as one series, whether it came from a weekly rule
//! or from separate rows.
use crate::locale::Language;
use crate::model::display::EntryDisplay;
use crate::model::item::DateEntry;
use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_grace_hours() -> i64 {
    1
}
fn default_max_repeated() -> usize {
    3
}
fn default_repeated_horizon_days() -> i64 {
    28
}
fn default_horizon_days() -> i64 {
    93
}
fn default_max_past_repeated() -> usize {
    1
}
fn default_past_horizon_days() -> i64 {
    31
}

/// German section used when no template file is configured.
pub const DEFAULT_SECTION_TEMPLATE: &str = "=== '''Aktuelles''' ===
<!-- Automatisch generierter Inhalt -->
----
''siehe auch [[Kalender]] und [[:Kategorie:Termine]]''
{next_dates}
----

==== Neulich: ====
''siehe auch [[Timeline]]''
{prev_dates}
";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionLimits {
    /// Entries stay "upcoming" until this long after their end.
    #[serde(default = "default_grace_hours")]
    pub grace_hours: i64,
    /// Upcoming occurrences shown per series.
    #[serde(default = "default_max_repeated")]
    pub max_repeated: usize,
    /// Beyond this, only the first occurrence of a series is shown.
    #[serde(default = "default_repeated_horizon_days")]
    pub repeated_horizon_days: i64,
    #[serde(default = "default_horizon_days")]
    pub horizon_days: i64,
    #[serde(default = "default_max_past_repeated")]
    pub max_past_repeated: usize,
    #[serde(default = "default_past_horizon_days")]
    pub past_horizon_days: i64,
}

impl Default for SelectionLimits {
    fn default() -> Self {
        Self {
            grace_hours: default_grace_hours(),
            max_repeated: default_max_repeated(),
            repeated_horizon_days: default_repeated_horizon_days(),
            horizon_days: default_horizon_days(),
            max_past_repeated: default_max_past_repeated(),
            past_horizon_days: default_past_horizon_days(),
        }
    }
}

/// Counts how often each series has been seen so far.
#[derive(Default)]
struct SeriesCounter(HashMap<String, usize>);

impl SeriesCounter {
    fn bump(&mut self, entry: &DateEntry) -> usize {
        let count = self.0.entry(entry.plain_name()).or_insert(0);
        *count += 1;
        *count
    }
}

pub fn select_upcoming(entries: &[DateEntry], now: DateTime<Tz>) -> Vec<DateEntry> {
    select_upcoming_with(entries, now, &SelectionLimits::default())
}

/// Entries that have not ended (allowing for the grace period), ascending.
///
/// A series contributes at most `max_repeated` occurrences, and only its
/// first one when it starts past the repeated horizon. Nothing starting
/// past `horizon_days` is shown.
pub fn select_upcoming_with(
    entries: &[DateEntry],
    now: DateTime<Tz>,
    limits: &SelectionLimits,
) -> Vec<DateEntry> {
    let cutoff = now - Duration::hours(limits.grace_hours);
    let repeated_horizon = now + Duration::days(limits.repeated_horizon_days);
    let horizon = now + Duration::days(limits.horizon_days);

    let mut sorted = entries.to_vec();
    sorted.sort();

    let mut series = SeriesCounter::default();
    let mut result = Vec::new();
    for entry in sorted {
        if entry.has_ended_by(cutoff) {
            continue;
        }
        let count = series.bump(&entry);
        if count > limits.max_repeated {
            continue;
        }
        if count > 1 && entry.start_instant() > repeated_horizon {
            continue;
        }
        if entry.start_instant() > horizon {
            continue;
        }
        result.push(entry);
    }

    log::debug!("Selected {} of {} upcoming entries", result.len(), entries.len());
    result
}

pub fn select_recently_past(entries: &[DateEntry], now: DateTime<Tz>) -> Vec<DateEntry> {
    select_recently_past_with(entries, now, &SelectionLimits::default())
}

/// Entries that ended within the past horizon, most recent first.
pub fn select_recently_past_with(
    entries: &[DateEntry],
    now: DateTime<Tz>,
    limits: &SelectionLimits,
) -> Vec<DateEntry> {
    let cutoff = now - Duration::hours(limits.grace_hours);
    let lowest = now - Duration::days(limits.past_horizon_days);

    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| b.cmp(a));

    let mut series = SeriesCounter::default();
    let mut result = Vec::new();
    for entry in sorted {
        let end = entry.end_instant();
        if end >= cutoff || end <= lowest {
            continue;
        }
        if series.bump(&entry) > limits.max_past_repeated {
            continue;
        }
        result.push(entry);
    }

    log::debug!("Selected {} of {} past entries", result.len(), entries.len());
    result
}

/// Fills `{next_dates}` and `{prev_dates}` in `template` with wiki list items.
pub fn render_wiki_section(
    template: &str,
    entries: &[DateEntry],
    lang: Language,
    now: DateTime<Tz>,
    limits: &SelectionLimits,
) -> String {
    let list = |selected: Vec<DateEntry>| {
        selected
            .iter()
            .map(|e| e.wiki_entry(lang))
            .collect::<Vec<_>>()
            .join("\n")
    };
    let next_dates = list(select_upcoming_with(entries, now, limits));
    let prev_dates = list(select_recently_past_with(entries, now, limits));

    template
        .replace("{next_dates}", &next_dates)
        .replace("{prev_dates}", &prev_dates)
        .trim()
        .to_string()
}
