// Tests for entry construction and ordering.
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use wikical::error::EntryError;
use wikical::model::item::localize;
use wikical::model::{DateEntry, Shape};

fn day(d: u32, m: u32, y: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(d: u32, m: u32, y: i32, h: u32, min: u32) -> NaiveDateTime {
    day(d, m, y).and_hms_opt(h, min, 0).unwrap()
}

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn single_date(d: u32, m: u32, y: i32) -> DateEntry {
    DateEntry::single_date("name", Some("cat"), day(d, m, y)).unwrap()
}

fn single_date_time(d: u32, m: u32, y: i32, h: u32, min: u32) -> DateEntry {
    DateEntry::single_date_time("name", Some("cat"), at(d, m, y, h, min)).unwrap()
}

fn time_range(d: u32, m: u32, y: i32, from: NaiveTime, to: NaiveTime) -> DateEntry {
    DateEntry::single_date_time_range("name", Some("cat"), day(d, m, y), from, to).unwrap()
}

#[test]
fn test_single_dates_order_by_day() {
    let first = single_date(20, 8, 2014);
    let second = single_date(21, 8, 2014);
    let same = single_date(21, 8, 2014);

    assert!(first < second);
    assert!(second > first);
    assert!(first <= second);
    assert!(!(first >= second));
    assert_ne!(first, second);

    assert_eq!(second, same);
    assert!(second <= same && second >= same);
}

#[test]
fn test_contained_entry_sorts_first() {
    // 12:00 - 15:00 lies within the whole day and ends earlier.
    let whole_day = single_date(20, 8, 2014);
    let noon = single_date_time(20, 8, 2014, 12, 0);
    assert!(noon < whole_day);
    assert!(whole_day > noon);
}

#[test]
fn test_same_start_orders_by_end() {
    let short = time_range(24, 8, 2014, hm(12, 0), hm(14, 0));
    let long = time_range(24, 8, 2014, hm(12, 0), hm(15, 0));
    assert!(short < long);

    let early = single_date_time(20, 8, 2014, 12, 0);
    let late = single_date_time(20, 8, 2014, 15, 0);
    assert!(early < late);
}

#[test]
fn test_identical_times_order_by_name() {
    let a = DateEntry::single_date("Alpha", None, day(1, 3, 2015)).unwrap();
    let b = DateEntry::single_date("Beta", None, day(1, 3, 2015)).unwrap();
    assert!(a < b);
    assert_ne!(a, b);
}

#[test]
fn test_sorting_is_deterministic() {
    let entries = vec![
        DateEntry::date_range("Camp", None, day(20, 8, 2014), day(24, 8, 2014)).unwrap(),
        single_date(21, 8, 2014),
        single_date_time(21, 8, 2014, 19, 0),
        DateEntry::single_date("Other", None, day(21, 8, 2014)).unwrap(),
        time_range(20, 8, 2014, hm(20, 0), hm(3, 0)),
    ];

    let mut forward = entries.clone();
    forward.sort();
    let mut backward: Vec<_> = entries.into_iter().rev().collect();
    backward.sort();

    assert_eq!(forward, backward);
    for pair in forward.windows(2) {
        assert!(pair[0] <= pair[1], "{:?} should not sort after {:?}", pair[0], pair[1]);
    }
}

#[test]
fn test_started_and_ended_predicates() {
    let entry = time_range(24, 8, 2014, hm(12, 0), hm(14, 0));

    assert!(!entry.has_started_by(localize(at(24, 8, 2014, 12, 0))));
    assert!(entry.has_started_by(localize(at(24, 8, 2014, 12, 1))));

    assert!(!entry.has_ended_by(localize(at(24, 8, 2014, 13, 59))));
    assert!(entry.has_ended_by(localize(at(24, 8, 2014, 14, 0))));
}

#[test]
fn test_end_must_follow_start() {
    let backwards = DateEntry::date_range("x", None, day(22, 5, 2015), day(20, 5, 2015));
    assert!(matches!(backwards, Err(EntryError::InvalidRange { .. })));

    let zero = DateEntry::date_time_range("x", None, at(22, 5, 2015, 20, 0), at(22, 5, 2015, 20, 0));
    assert!(matches!(zero, Err(EntryError::InvalidRange { .. })));

    let same_time = DateEntry::single_date_time_range("x", None, day(22, 5, 2015), hm(19, 0), hm(19, 0));
    assert!(same_time.is_err());
}

#[test]
fn test_time_range_rolls_past_midnight() {
    let party = time_range(22, 5, 2015, hm(20, 0), hm(3, 0));
    assert_eq!(party.shape(), Shape::SingleDateTimeRange);
    assert_eq!(party.end_instant(), localize(at(23, 5, 2015, 3, 0)));
    assert!(party.end_instant() > party.start_instant());
}

#[test]
fn test_default_duration_is_three_hours() {
    let talk = single_date_time(22, 8, 2014, 12, 0);
    assert_eq!(talk.end_instant(), localize(at(22, 8, 2014, 15, 0)));
}

#[test]
fn test_date_range_includes_last_day() {
    let camp = DateEntry::date_range("Camp", None, day(20, 8, 2014), day(21, 8, 2014)).unwrap();
    assert_eq!(camp.last_day(), day(21, 8, 2014));
    assert_eq!(camp.end_instant(), localize(at(22, 8, 2014, 0, 0)));
}
