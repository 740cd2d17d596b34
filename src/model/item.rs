// File: ./src/model/item.rs
use crate::error::EntryError;
use chrono::{
    DateTime, Datelike, Days, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeZone, Weekday,
};
use chrono_tz::Tz;
use std::cmp::Ordering;

/// Every wall-clock time in the table is read in this zone.
pub const TIMEZONE: Tz = chrono_tz::Europe::Berlin;

/// Length of an event that only names its start time.
pub const DEFAULT_DURATION_HOURS: i64 = 3;

/// Pins a local wall-clock time to an instant in [`TIMEZONE`].
///
/// Ambiguous times (autumn fall-back) resolve to standard time, times in the
/// spring-forward gap are read with the offset in force before the gap.
pub fn localize(naive: NaiveDateTime) -> DateTime<Tz> {
    match TIMEZONE.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(_, standard) => standard,
        LocalResult::None => {
            let before = TIMEZONE.offset_from_utc_datetime(&(naive - Duration::days(1)));
            let shift = Duration::seconds(i64::from(before.fix().local_minus_utc()));
            TIMEZONE.from_utc_datetime(&(naive - shift))
        }
    }
}

// --- DATE TYPES ---

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DateType {
    AllDay(NaiveDate),
    Specific(DateTime<Tz>),
}

impl DateType {
    /// Whole days become local midnight so they compare against zoned instants.
    pub fn to_zoned(&self) -> DateTime<Tz> {
        match self {
            DateType::AllDay(d) => localize(d.and_time(NaiveTime::MIN)),
            DateType::Specific(dt) => *dt,
        }
    }

    pub fn date_naive(&self) -> NaiveDate {
        match self {
            DateType::AllDay(d) => *d,
            DateType::Specific(dt) => dt.date_naive(),
        }
    }

    pub fn weekday(&self) -> Weekday {
        self.date_naive().weekday()
    }
}

impl PartialOrd for DateType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DateType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_zoned().cmp(&other.to_zoned())
    }
}

/// The five concrete forms a table date column can take.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Shape {
    /// `20.08.2014`
    SingleDate,
    /// `20.08.2014 19:00`
    SingleDateTime,
    /// `20.08.2014 19:00 - 22:00`
    SingleDateTimeRange,
    /// `20.08.2014 - 24.08.2014`
    DateRange,
    /// `20.08.2014 19:00 - 21.08.2014 03:00`
    DateTimeRange,
}

/// The weekly rule an occurrence was generated from.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct RecurrenceRule {
    /// Weeks between two occurrences.
    pub interval: u32,
    pub weekday: Weekday,
    /// Last instant of the validity window (23:59 on its final day).
    pub until: DateTime<Tz>,
}

// --- ENTRIES ---

#[derive(Debug, Clone)]
pub struct DateEntry {
    /// Raw name column, markup included.
    pub name: String,
    pub category: Option<String>,
    shape: Shape,
    start: DateType,
    end: DateType,
    rule: Option<RecurrenceRule>,
}

fn next_day(day: NaiveDate) -> Result<NaiveDate, EntryError> {
    day.checked_add_days(Days::new(1))
        .ok_or_else(|| EntryError::InvalidCalendarValue(day.to_string()))
}

impl DateEntry {
    fn new(
        name: &str,
        category: Option<&str>,
        shape: Shape,
        start: DateType,
        end: DateType,
    ) -> Result<Self, EntryError> {
        let (start_dt, end_dt) = (start.to_zoned(), end.to_zoned());
        if end_dt <= start_dt {
            return Err(EntryError::InvalidRange {
                start: start_dt,
                end: end_dt,
            });
        }
        Ok(Self {
            name: name.to_string(),
            category: category.map(str::to_string),
            shape,
            start,
            end,
            rule: None,
        })
    }

    /// A whole day, ending at the following midnight.
    pub fn single_date(
        name: &str,
        category: Option<&str>,
        day: NaiveDate,
    ) -> Result<Self, EntryError> {
        let end = next_day(day)?;
        Self::new(
            name,
            category,
            Shape::SingleDate,
            DateType::AllDay(day),
            DateType::AllDay(end),
        )
    }

    /// A start time with the default duration.
    pub fn single_date_time(
        name: &str,
        category: Option<&str>,
        start: NaiveDateTime,
    ) -> Result<Self, EntryError> {
        let start = localize(start);
        let end = start + Duration::hours(DEFAULT_DURATION_HOURS);
        Self::new(
            name,
            category,
            Shape::SingleDateTime,
            DateType::Specific(start),
            DateType::Specific(end),
        )
    }

    /// Start and end time on one day. An end time earlier than the start
    /// time means the event runs past midnight.
    pub fn single_date_time_range(
        name: &str,
        category: Option<&str>,
        day: NaiveDate,
        from: NaiveTime,
        to: NaiveTime,
    ) -> Result<Self, EntryError> {
        let end_day = if to < from { next_day(day)? } else { day };
        Self::new(
            name,
            category,
            Shape::SingleDateTimeRange,
            DateType::Specific(localize(day.and_time(from))),
            DateType::Specific(localize(end_day.and_time(to))),
        )
    }

    /// Whole days from `first` through `last`, both inclusive.
    pub fn date_range(
        name: &str,
        category: Option<&str>,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Result<Self, EntryError> {
        let end = next_day(last)?;
        Self::new(
            name,
            category,
            Shape::DateRange,
            DateType::AllDay(first),
            DateType::AllDay(end),
        )
    }

    pub fn date_time_range(
        name: &str,
        category: Option<&str>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Self, EntryError> {
        Self::new(
            name,
            category,
            Shape::DateTimeRange,
            DateType::Specific(localize(start)),
            DateType::Specific(localize(end)),
        )
    }

    pub(crate) fn with_rule(mut self, rule: RecurrenceRule) -> Self {
        self.rule = Some(rule);
        self
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn start(&self) -> DateType {
        self.start
    }

    pub fn end(&self) -> DateType {
        self.end
    }

    pub fn start_instant(&self) -> DateTime<Tz> {
        self.start.to_zoned()
    }

    pub fn end_instant(&self) -> DateTime<Tz> {
        self.end.to_zoned()
    }

    /// The last calendar day the entry covers. For whole-day shapes this is
    /// the day before the exclusive end.
    pub fn last_day(&self) -> NaiveDate {
        match self.end {
            DateType::AllDay(d) => d.pred_opt().unwrap_or(d),
            DateType::Specific(dt) => dt.date_naive(),
        }
    }

    /// Set only on occurrences produced by the recurrence expander.
    pub fn rule(&self) -> Option<&RecurrenceRule> {
        self.rule.as_ref()
    }

    pub fn has_started_by(&self, instant: DateTime<Tz>) -> bool {
        self.start_instant() < instant
    }

    pub fn has_ended_by(&self, instant: DateTime<Tz>) -> bool {
        self.end_instant() <= instant
    }
}

impl PartialEq for DateEntry {
    fn eq(&self, other: &Self) -> bool {
        self.start_instant() == other.start_instant()
            && self.end_instant() == other.end_instant()
            && self.name == other.name
    }
}

impl Eq for DateEntry {}

impl PartialOrd for DateEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DateEntry {
    /// An entry nested inside another sorts before it; otherwise the earlier
    /// start wins, and equal starts fall back to end then raw name.
    ///
    /// Taken together these rules order by end instant first, which keeps the
    /// relation total.
    fn cmp(&self, other: &Self) -> Ordering {
        self.end_instant()
            .cmp(&other.end_instant())
            .then_with(|| self.start_instant().cmp(&other.start_instant()))
            .then_with(|| self.name.cmp(&other.name))
    }
}
