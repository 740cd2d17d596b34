// File: ./src/model/matcher.rs
//! Classifies the free-text date column of a table row.
//!
//! The patterns are anchored on both ends, so at most one of them can match
//! a given string. The numeric forms are still tried before the weekday forms,
//! mirroring the order in which people write them.
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("date expression pattern must compile")
}

const DAY: &str = r"([0-9]+)\.([0-9]+)\.([0-9]+)";
const TIME: &str = r"([0-9]+)[:.]([0-9]+)";

static SINGLE_DATE: Lazy<Regex> = Lazy::new(|| pattern(&format!("^{DAY}$")));
static SINGLE_DATE_TIME: Lazy<Regex> = Lazy::new(|| pattern(&format!(r"^{DAY}\s+{TIME}$")));
static SINGLE_DATE_TIME_RANGE: Lazy<Regex> =
    Lazy::new(|| pattern(&format!(r"^{DAY}\s+{TIME}\s*-\s*{TIME}$")));
static DATE_RANGE: Lazy<Regex> = Lazy::new(|| pattern(&format!(r"^{DAY}\s*-\s*{DAY}$")));
static DATE_RANGE_TIME: Lazy<Regex> =
    Lazy::new(|| pattern(&format!(r"^{DAY}\s+{TIME}\s*-\s*{DAY}\s+{TIME}$")));
static WEEKDAY_TIME: Lazy<Regex> = Lazy::new(|| pattern(&format!(r"^([a-zA-Z0-9/]+),?\s*{TIME}$")));
static WEEKDAY_TIME_RANGE: Lazy<Regex> =
    Lazy::new(|| pattern(&format!(r"^([a-zA-Z0-9/]+),?\s*{TIME}\s*-\s*{TIME}$")));
static WEEKDAY_TOKEN: Lazy<Regex> = Lazy::new(|| pattern(r"^([a-zA-Z0-9_]+)(?:/([0-9]+))?$"));

/// German and English abbreviations, matched case-insensitively.
const WEEKDAY_NAMES: [(&str, Weekday); 14] = [
    ("mo", Weekday::Mon),
    ("mon", Weekday::Mon),
    ("di", Weekday::Tue),
    ("tue", Weekday::Tue),
    ("mi", Weekday::Wed),
    ("wed", Weekday::Wed),
    ("do", Weekday::Thu),
    ("thu", Weekday::Thu),
    ("fr", Weekday::Fri),
    ("fri", Weekday::Fri),
    ("sa", Weekday::Sat),
    ("sat", Weekday::Sat),
    ("so", Weekday::Sun),
    ("sun", Weekday::Sun),
];

/// `DD.MM.YYYY` as written; not yet checked against the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayFields {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl DayFields {
    pub fn to_date(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

/// `HH:MM` (or `HH.MM`) as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeFields {
    pub hour: u32,
    pub minute: u32,
}

impl TimeFields {
    pub fn to_time(self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0)
    }

    pub fn on(self, day: DayFields) -> Option<NaiveDateTime> {
        Some(day.to_date()?.and_time(self.to_time()?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateExpr {
    SingleDate(DayFields),
    SingleDateTime(DayFields, TimeFields),
    SingleDateTimeRange(DayFields, TimeFields, TimeFields),
    DateRange(DayFields, DayFields),
    DateTimeRange(DayFields, TimeFields, DayFields, TimeFields),
    /// `Mo/2, 19:00 - 21:00`; the weekday token is resolved by the expander.
    Weekly {
        token: String,
        from: TimeFields,
        to: Option<TimeFields>,
    },
}

/// A resolved weekday token such as `Di` or `Tue/2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekdaySpec {
    pub weekday: Weekday,
    pub interval: u32,
}

fn day_at(caps: &Captures, i: usize) -> Option<DayFields> {
    Some(DayFields {
        day: caps.get(i)?.as_str().parse().ok()?,
        month: caps.get(i + 1)?.as_str().parse().ok()?,
        year: caps.get(i + 2)?.as_str().parse().ok()?,
    })
}

fn time_at(caps: &Captures, i: usize) -> Option<TimeFields> {
    Some(TimeFields {
        hour: caps.get(i)?.as_str().parse().ok()?,
        minute: caps.get(i + 1)?.as_str().parse().ok()?,
    })
}

/// Returns `None` for anything that is not one of the known shapes.
pub fn match_date_expr(input: &str) -> Option<DateExpr> {
    let input = input.trim();

    if let Some(c) = SINGLE_DATE.captures(input) {
        return Some(DateExpr::SingleDate(day_at(&c, 1)?));
    }
    if let Some(c) = SINGLE_DATE_TIME.captures(input) {
        return Some(DateExpr::SingleDateTime(day_at(&c, 1)?, time_at(&c, 4)?));
    }
    if let Some(c) = SINGLE_DATE_TIME_RANGE.captures(input) {
        return Some(DateExpr::SingleDateTimeRange(
            day_at(&c, 1)?,
            time_at(&c, 4)?,
            time_at(&c, 6)?,
        ));
    }
    if let Some(c) = DATE_RANGE.captures(input) {
        return Some(DateExpr::DateRange(day_at(&c, 1)?, day_at(&c, 4)?));
    }
    if let Some(c) = DATE_RANGE_TIME.captures(input) {
        return Some(DateExpr::DateTimeRange(
            day_at(&c, 1)?,
            time_at(&c, 4)?,
            day_at(&c, 6)?,
            time_at(&c, 9)?,
        ));
    }
    if let Some(c) = WEEKDAY_TIME.captures(input) {
        return Some(DateExpr::Weekly {
            token: c[1].to_string(),
            from: time_at(&c, 2)?,
            to: None,
        });
    }
    if let Some(c) = WEEKDAY_TIME_RANGE.captures(input) {
        return Some(DateExpr::Weekly {
            token: c[1].to_string(),
            from: time_at(&c, 2)?,
            to: Some(time_at(&c, 4)?),
        });
    }
    None
}

/// Resolves `Mo`, `mon`, `Di/2`, ... An interval of zero is rejected.
pub fn parse_weekday_token(token: &str) -> Option<WeekdaySpec> {
    let caps = WEEKDAY_TOKEN.captures(token.trim())?;
    let name = caps[1].to_lowercase();
    let weekday = WEEKDAY_NAMES
        .iter()
        .find(|(abbr, _)| *abbr == name)
        .map(|(_, wd)| *wd)?;
    let interval = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 1,
    };
    if interval == 0 {
        return None;
    }
    Some(WeekdaySpec { weekday, interval })
}

/// The validity column of a weekly row: `DD.MM.YYYY - DD.MM.YYYY`.
pub fn parse_window(input: &str) -> Option<(DayFields, DayFields)> {
    let caps = DATE_RANGE.captures(input.trim())?;
    Some((day_at(&caps, 1)?, day_at(&caps, 4)?))
}
