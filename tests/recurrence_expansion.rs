// Tests for weekly recurrence expansion and the collapsed row rendering.
use chrono::{Datelike, NaiveDate, Timelike, Weekday};
use wikical::model::matcher::TimeFields;
use wikical::model::{EntryDisplay, RecurrenceEngine, Shape, flatten, parse_table};

fn t(hour: u32, minute: u32) -> TimeFields {
    TimeFields { hour, minute }
}

#[test]
fn test_occurrence_count_matches_window() {
    // 05.01.2015 is a Monday; the window ends on a Monday too.
    let batch = RecurrenceEngine::expand(
        "Plenum",
        None,
        "Mo",
        t(19, 0),
        None,
        "05.01.2015 - 30.03.2015",
    )
    .unwrap();

    let first = NaiveDate::from_ymd_opt(2015, 1, 5).unwrap();
    let last = NaiveDate::from_ymd_opt(2015, 3, 30).unwrap();
    let expected = (last - first).num_days() / 7 + 1;
    assert_eq!(batch.len() as i64, expected);
    assert_eq!(batch.last().unwrap().start().date_naive(), last);
}

#[test]
fn test_interval_skips_weeks() {
    let batch =
        RecurrenceEngine::expand("X", None, "Mo/3", t(10, 0), None, "05.01.2015 - 30.03.2015")
            .unwrap();
    let days: Vec<u32> = batch.entries().iter().map(|e| e.start().date_naive().ordinal()).collect();
    assert_eq!(days.len(), 5);
    for pair in days.windows(2) {
        assert_eq!(pair[1] - pair[0], 21);
    }
}

#[test]
fn test_window_not_starting_on_weekday() {
    // 12.12.2014 is a Friday; the first Monday is 15.12.
    let batch = RecurrenceEngine::expand(
        "Event 6b",
        Some("cat5e"),
        "Mo",
        t(13, 15),
        Some(t(15, 45)),
        "12.12.2014 - 4.2.2015",
    )
    .unwrap();
    assert_eq!(batch.len(), 8);
    assert!(batch.entries().iter().all(|e| e.start().weekday() == Weekday::Mon));
    assert_eq!(
        batch.first().unwrap().start().date_naive(),
        NaiveDate::from_ymd_opt(2014, 12, 15).unwrap()
    );

    let short = RecurrenceEngine::expand("Event 6", None, "Mo", t(13, 15), None, "12.12.2014 - 13.12.2014")
        .unwrap();
    assert!(short.is_empty());
}

#[test]
fn test_occurrence_shapes() {
    let start_only =
        RecurrenceEngine::expand("A", None, "Mi", t(19, 0), None, "01.10.2014 - 31.10.2014").unwrap();
    assert!(start_only.entries().iter().all(|e| e.shape() == Shape::SingleDateTime));

    let same_day = RecurrenceEngine::expand(
        "B",
        None,
        "Mi",
        t(19, 0),
        Some(t(22, 0)),
        "01.10.2014 - 31.10.2014",
    )
    .unwrap();
    assert!(same_day.entries().iter().all(|e| e.shape() == Shape::SingleDateTimeRange));

    let overnight = RecurrenceEngine::expand(
        "C",
        None,
        "Fr",
        t(22, 0),
        Some(t(2, 0)),
        "01.10.2014 - 31.10.2014",
    )
    .unwrap();
    assert_eq!(overnight.len(), 5);
    for e in overnight.entries() {
        assert_eq!(e.shape(), Shape::DateTimeRange);
        assert_eq!(e.last_day(), e.start().date_naive().succ_opt().unwrap());
    }
}

#[test]
fn test_wall_clock_kept_across_dst() {
    // Clocks go back on 26.10.2014.
    let batch =
        RecurrenceEngine::expand("D", None, "So", t(18, 0), Some(t(20, 0)), "19.10.2014 - 02.11.2014")
            .unwrap();
    assert_eq!(batch.len(), 3);
    for e in batch.entries() {
        assert_eq!(e.start_instant().hour(), 18);
        assert_eq!(e.end_instant().hour(), 20);
    }
}

#[test]
fn test_zero_length_occurrence_is_an_error() {
    let result =
        RecurrenceEngine::expand("E", None, "Mo", t(19, 0), Some(t(19, 0)), "05.01.2015 - 30.03.2015");
    assert!(result.is_err());
}

#[test]
fn test_malformed_input_gives_empty_batch() {
    for (token, window) in [
        ("Xy", "05.01.2015 - 30.03.2015"),
        ("Mo/0", "05.01.2015 - 30.03.2015"),
        ("Mo", "irgendwann"),
        ("Mo", "31.02.2015 - 30.03.2015"),
    ] {
        let batch = RecurrenceEngine::expand("F", None, token, t(19, 0), None, window).unwrap();
        assert!(batch.is_empty(), "{} / {} should expand to nothing", token, window);
        assert!(batch.wiki_row().is_none());
    }
}

#[test]
fn test_collapsed_rendering() {
    let batch = RecurrenceEngine::expand(
        "Event 6b",
        None,
        "Mo",
        t(13, 15),
        Some(t(15, 45)),
        "12.12.2014 - 4.2.2015",
    )
    .unwrap();
    assert_eq!(batch.date_string().as_deref(), Some("Mo, 13:15 - 15:45"));
    assert_eq!(
        batch.date_range_string().as_deref(),
        Some("15.12.2014 - 04.02.2015")
    );
    assert_eq!(
        batch.wiki_row().as_deref(),
        Some("| Event 6b || Mo, 13:15 - 15:45 || 15.12.2014 - 04.02.2015")
    );

    let first = batch.first().unwrap();
    assert!(first.rule().is_some());
    assert_eq!(first.date_string(), "13:15 - 15:45");
}

#[test]
fn test_collapsed_rendering_with_interval() {
    let batch =
        RecurrenceEngine::expand("G", None, "tue/2", t(19, 0), None, "02.09.2014 - 16.12.2014")
            .unwrap();
    assert_eq!(batch.date_string().as_deref(), Some("Di/2, 19:00"));
    assert_eq!(batch.rule().unwrap().interval, 2);
}

#[test]
fn test_overnight_collapsed_row_reparses() {
    let rows = parse_table("| C || Fr, 22:00 - 02:00 || 01.10.2014 - 31.10.2014");
    let original = flatten(&rows);
    assert!(original.len() >= 4);
    assert_eq!(original[0].shape(), Shape::DateTimeRange);
    assert_eq!(original[0].date_string(), "22:00 - 02:00");

    let row = rows[0].wiki_row().unwrap();
    assert_eq!(row, "| C || Fr, 22:00 - 02:00 || 03.10.2014 - 31.10.2014");

    let reparsed = flatten(&parse_table(&row));
    assert_eq!(reparsed.len(), original.len());
    assert_eq!(reparsed[0].start(), original[0].start());
    assert_eq!(reparsed[0].end(), original[0].end());
}
