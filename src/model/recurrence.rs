// File: ./src/model/recurrence.rs
use crate::error::EntryError;
use crate::model::item::{DEFAULT_DURATION_HOURS, DateEntry, RecurrenceRule, TIMEZONE, localize};
use crate::model::matcher::{TimeFields, parse_weekday_token, parse_window};
use chrono::{Datelike, Duration, Utc, Weekday};
use rrule::RRuleSet;
use std::str::FromStr;

/// All occurrences generated from one weekly table row.
///
/// A row whose weekday or validity window cannot be read still yields a
/// batch, just an empty one.
#[derive(Debug, Clone)]
pub struct Recurrence {
    pub name: String,
    pub category: Option<String>,
    rule: Option<RecurrenceRule>,
    entries: Vec<DateEntry>,
}

impl Recurrence {
    fn empty(name: &str, category: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            category: category.map(str::to_string),
            rule: None,
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[DateEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn rule(&self) -> Option<&RecurrenceRule> {
        self.rule.as_ref()
    }

    pub fn first(&self) -> Option<&DateEntry> {
        self.entries.first()
    }

    pub fn last(&self) -> Option<&DateEntry> {
        self.entries.last()
    }
}

fn byday_code(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

pub struct RecurrenceEngine;

impl RecurrenceEngine {
    /// Expands `token` (`Mo`, `Di/2`, ...) at `from`[-`to`] over the days named
    /// in `window` (`DD.MM.YYYY - DD.MM.YYYY`, both inclusive).
    ///
    /// Each occurrence becomes a plain entry tagged with the shared rule:
    /// a start-only entry when no end time is given, a same-day range, or a
    /// full date-time range when the end falls on the next day.
    ///
    /// Fails only when an occurrence itself cannot be built, e.g. identical
    /// start and end times.
    pub fn expand(
        name: &str,
        category: Option<&str>,
        token: &str,
        from: TimeFields,
        to: Option<TimeFields>,
        window: &str,
    ) -> Result<Recurrence, EntryError> {
        let window_days =
            parse_window(window).and_then(|(a, b)| Some((a.to_date()?, b.to_date()?)));
        let (Some((first_day, last_day)), Some(weekly), Some(start_time)) =
            (window_days, parse_weekday_token(token), from.to_time())
        else {
            log::debug!(
                "Empty recurrence for '{}': weekday '{}' or window '{}' not understood",
                name,
                token,
                window
            );
            return Ok(Recurrence::empty(name, category));
        };

        let end_time = match to {
            Some(t) => match t.to_time() {
                Some(time) => Some(time),
                None => return Ok(Recurrence::empty(name, category)),
            },
            None => None,
        };

        // Wall-clock offset between start and end, computed once on the
        // first day and re-applied to every occurrence.
        let first_start = first_day.and_time(start_time);
        let delta = match end_time {
            Some(end) => {
                let mut first_end = first_day.and_time(end);
                if first_end < first_start {
                    first_end += Duration::days(1);
                }
                first_end - first_start
            }
            None => Duration::hours(DEFAULT_DURATION_HOURS),
        };

        let Some(window_end) = last_day.and_hms_opt(23, 59, 0) else {
            return Ok(Recurrence::empty(name, category));
        };
        let until = localize(window_end);
        let rule = RecurrenceRule {
            interval: weekly.interval,
            weekday: weekly.weekday,
            until,
        };

        let rrule_string = format!(
            "DTSTART;TZID={}:{}\nRRULE:FREQ=WEEKLY;INTERVAL={};BYDAY={};UNTIL={}\n",
            TIMEZONE.name(),
            first_start.format("%Y%m%dT%H%M%S"),
            weekly.interval,
            byday_code(weekly.weekday),
            until.with_timezone(&Utc).format("%Y%m%dT%H%M%SZ"),
        );

        let rrule_set = match RRuleSet::from_str(&rrule_string) {
            Ok(set) => set,
            Err(e) => {
                log::warn!("Could not build recurrence for '{}': {}", name, e);
                return Ok(Recurrence::empty(name, category));
            }
        };

        let mut entries = Vec::new();
        for occurrence in rrule_set.into_iter() {
            let occurrence = occurrence.with_timezone(&TIMEZONE);
            if occurrence > until {
                break;
            }
            // DTSTART itself only counts when it falls on the rule's weekday.
            if occurrence.weekday() != weekly.weekday {
                continue;
            }

            let start = occurrence.naive_local();
            let end = start + delta;
            let entry = if end_time.is_none() {
                DateEntry::single_date_time(name, category, start)?
            } else if end.date() != start.date() {
                DateEntry::date_time_range(name, category, start, end)?
            } else {
                DateEntry::single_date_time_range(
                    name,
                    category,
                    start.date(),
                    start.time(),
                    end.time(),
                )?
            };
            entries.push(entry.with_rule(rule));
        }

        log::debug!(
            "Expanded '{}' ({}/{}) into {} occurrences",
            name,
            byday_code(weekly.weekday),
            weekly.interval,
            entries.len()
        );

        Ok(Recurrence {
            name: name.to_string(),
            category: category.map(str::to_string),
            rule: Some(rule),
            entries,
        })
    }
}
