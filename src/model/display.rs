// File: ./src/model/display.rs
use crate::locale::{Language, table_weekday};
use crate::model::item::{DateEntry, DateType, Shape};
use crate::model::links;
use crate::model::recurrence::Recurrence;
use chrono::{DateTime, Datelike, NaiveDate, Timelike};
use chrono_tz::Tz;

pub trait EntryDisplay {
    fn plain_name(&self) -> String;
    fn url(&self) -> Option<String>;
    fn detail_plain(&self, lang: Language) -> String;
    fn wiki_entry(&self, lang: Language) -> String;
    fn date_string(&self) -> String;
    fn wiki_row(&self) -> String;
}

fn day_month(lang: Language, day: NaiveDate) -> String {
    format!(
        "{}, {:02}.{:02}.",
        lang.weekday_abbr(day.weekday()),
        day.day(),
        day.month()
    )
}

fn hm(dt: &DateTime<Tz>) -> String {
    format!("{:02}:{:02}", dt.hour(), dt.minute())
}

fn full_date(day: NaiveDate) -> String {
    format!("{:02}.{:02}.{:02}", day.day(), day.month(), day.year())
}

impl DateEntry {
    /// Date part of the human readable line, without the trailing name.
    fn when(&self, lang: Language) -> String {
        let first = day_month(lang, self.start().date_naive());
        match (self.shape(), self.start(), self.end()) {
            (Shape::SingleDate, _, _) => first,
            (Shape::DateRange, _, _) => format!(
                "{} {} {}",
                first,
                lang.range_word(),
                day_month(lang, self.last_day())
            ),
            (Shape::SingleDateTime, DateType::Specific(s), _) => format!("{} {}", first, hm(&s)),
            (Shape::SingleDateTimeRange, DateType::Specific(s), DateType::Specific(e)) => {
                format!("{} {} - {}", first, hm(&s), hm(&e))
            }
            (Shape::DateTimeRange, DateType::Specific(s), DateType::Specific(e)) => format!(
                "{} {} {} {} {}",
                first,
                hm(&s),
                lang.range_word(),
                day_month(lang, e.date_naive()),
                hm(&e)
            ),
            // Timed shapes are always built from zoned instants.
            _ => first,
        }
    }
}

impl EntryDisplay for DateEntry {
    fn plain_name(&self) -> String {
        links::plain_name(&self.name)
    }

    fn url(&self) -> Option<String> {
        links::extract_url(&self.name)
    }

    fn detail_plain(&self, lang: Language) -> String {
        format!("{}: {}", self.when(lang), self.plain_name())
    }

    fn wiki_entry(&self, lang: Language) -> String {
        format!("* {}: {}", self.when(lang), self.name)
    }

    /// The date column as it is written in the table.
    ///
    /// Occurrences of a weekly rule only show their times, even when they
    /// run past midnight; the date lives in the rule's validity column.
    fn date_string(&self) -> String {
        let start_day = full_date(self.start().date_naive());
        match (self.shape(), self.start(), self.end()) {
            (Shape::SingleDate, _, _) => start_day,
            (Shape::DateRange, _, _) => format!("{} - {}", start_day, full_date(self.last_day())),
            (Shape::SingleDateTime, DateType::Specific(s), _) => {
                if self.rule().is_some() {
                    hm(&s)
                } else {
                    format!("{} {}", start_day, hm(&s))
                }
            }
            (Shape::SingleDateTimeRange, DateType::Specific(s), DateType::Specific(e)) => {
                if self.rule().is_some() {
                    format!("{} - {}", hm(&s), hm(&e))
                } else {
                    format!("{} {} - {}", start_day, hm(&s), hm(&e))
                }
            }
            (Shape::DateTimeRange, DateType::Specific(s), DateType::Specific(e)) => {
                if self.rule().is_some() {
                    format!("{} - {}", hm(&s), hm(&e))
                } else {
                    format!(
                        "{} {} - {} {}",
                        start_day,
                        hm(&s),
                        full_date(e.date_naive()),
                        hm(&e)
                    )
                }
            }
            _ => start_day,
        }
    }

    fn wiki_row(&self) -> String {
        format!("| {} || {} ||", self.name, self.date_string())
    }
}

impl Recurrence {
    /// `Mo/2, 19:00 - 21:00`: weekday, interval when above one, then the
    /// times of the first occurrence.
    pub fn date_string(&self) -> Option<String> {
        let first = self.first()?;
        let rule = self.rule()?;
        let interval = if rule.interval > 1 {
            format!("/{}", rule.interval)
        } else {
            String::new()
        };
        Some(format!(
            "{}{}, {}",
            table_weekday(first.start().weekday()),
            interval,
            first.date_string()
        ))
    }

    /// First occurrence day through the rule's last day.
    pub fn date_range_string(&self) -> Option<String> {
        let first = self.first()?.start().date_naive();
        let until = self.rule()?.until.date_naive();
        Some(format!(
            "{:02}.{:02}.{:04} - {:02}.{:02}.{:04}",
            first.day(),
            first.month(),
            first.year(),
            until.day(),
            until.month(),
            until.year()
        ))
    }

    /// The collapsed table row; `None` for a batch without occurrences.
    pub fn wiki_row(&self) -> Option<String> {
        let first = self.first()?;
        Some(
            format!(
                "| {} || {} || {}",
                first.name,
                self.date_string()?,
                self.date_range_string()?
            )
            .trim()
            .to_string(),
        )
    }
}
