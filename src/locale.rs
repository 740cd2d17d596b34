// File: ./src/locale.rs
//! Static weekday and connector tables for the supported output languages.
//!
//! These are plain data rather than system locale lookups so rendering is
//! identical on every machine.
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString};

const WEEKDAYS_DE: [&str; 7] = ["Mo", "Di", "Mi", "Do", "Fr", "Sa", "So"];
const WEEKDAYS_EN: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const WEEKDAYS_FR: [&str; 7] = ["Lun", "Mar", "Mer", "Jeu", "Ven", "Sam", "Dim"];

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Language {
    #[default]
    De,
    En,
    Fr,
}

impl Language {
    /// Accepts both short codes (`en`) and POSIX locale names (`en_US.UTF-8`).
    pub fn from_locale(locale: &str) -> Option<Self> {
        let short = locale.split(['_', '-', '.']).next().unwrap_or_default();
        Self::from_str(short).ok()
    }

    pub fn weekday_abbr(self, weekday: Weekday) -> &'static str {
        let idx = weekday.num_days_from_monday() as usize;
        match self {
            Language::De => WEEKDAYS_DE[idx],
            Language::En => WEEKDAYS_EN[idx],
            Language::Fr => WEEKDAYS_FR[idx],
        }
    }

    /// Word joining the two ends of a range ("Mo, 01.02. bis Di, 02.02.").
    pub fn range_word(self) -> &'static str {
        match self {
            Language::De => "bis",
            Language::En => "to",
            Language::Fr => "à",
        }
    }
}

/// Weekday abbreviation used inside the table's own date column, which is
/// always written in German regardless of the output language.
pub fn table_weekday(weekday: Weekday) -> &'static str {
    Language::De.weekday_abbr(weekday)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn weekday_tables() {
        assert_eq!(Language::De.weekday_abbr(Weekday::Tue), "Di");
        assert_eq!(Language::En.weekday_abbr(Weekday::Tue), "Tue");
        assert_eq!(Language::Fr.weekday_abbr(Weekday::Tue), "Mar");
        assert_eq!(table_weekday(Weekday::Sun), "So");
    }

    #[test]
    fn range_words() {
        assert_eq!(Language::De.range_word(), "bis");
        assert_eq!(Language::En.range_word(), "to");
        assert_eq!(Language::Fr.range_word(), "à");
    }

    #[test]
    fn locale_names() {
        assert_eq!(Language::from_locale("de_DE.UTF-8"), Some(Language::De));
        assert_eq!(Language::from_locale("en_US.UTF-8"), Some(Language::En));
        assert_eq!(Language::from_locale("fr_CA.UTF-8"), Some(Language::Fr));
        assert_eq!(Language::from_locale("EN"), Some(Language::En));
        assert_eq!(Language::from_locale("wrong string"), None);
        for lang in Language::iter() {
            assert_eq!(Language::from_locale(&lang.to_string()), Some(lang));
        }
    }
}
