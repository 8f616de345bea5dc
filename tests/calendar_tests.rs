use cadet_roster::{CalendarError, Schedule, WorkCalendar};
use chrono::{Datelike, NaiveDate, Weekday};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn default_calendar_weekends_unavailable() {
    let cal = WorkCalendar::default();
    // 2025-01-04 is a Saturday, 2025-01-05 is a Sunday
    assert!(!cal.is_available(d(2025, 1, 4)));
    assert!(!cal.is_available(d(2025, 1, 5)));
    assert!(cal.is_available(d(2025, 1, 6)));
}

#[test]
fn excluded_weekday_is_unavailable() {
    let mut cal = WorkCalendar::default();
    let wed = d(2025, 1, 8);
    assert!(cal.is_available(wed));
    cal.exclude(wed);
    assert!(cal.is_excluded(wed));
    assert!(!cal.is_available(wed));
}

#[test]
fn working_days_span_two_weeks_in_order() {
    let cal = WorkCalendar::default();
    // Friday 2025-01-03 through Monday 2025-01-13
    let days = cal
        .working_days_in_range(d(2025, 1, 3), d(2025, 1, 13))
        .unwrap();
    assert_eq!(days.len(), 7);
    assert_eq!(days.first().copied(), Some(d(2025, 1, 3)));
    assert_eq!(days.last().copied(), Some(d(2025, 1, 13)));
    assert!(days.windows(2).all(|w| w[0] < w[1]));
    assert!(
        days.iter()
            .all(|day| !matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
    );
}

#[test]
fn schedule_exclusions_drop_out_of_working_days() {
    let schedule = Schedule::new("s1", "January", d(2025, 1, 6), d(2025, 1, 10))
        .with_excluded_dates([d(2025, 1, 7), d(2025, 1, 9)]);
    let cal = WorkCalendar::for_schedule(&schedule);
    let days = cal
        .working_days_in_range(schedule.start_date, schedule.end_date)
        .unwrap();
    assert_eq!(days, vec![d(2025, 1, 6), d(2025, 1, 8), d(2025, 1, 10)]);
    assert_eq!(cal.count_working_days(schedule.start_date, schedule.end_date), 3);
}

#[test]
fn single_day_and_weekend_only_ranges() {
    let cal = WorkCalendar::default();
    assert_eq!(
        cal.working_days_in_range(d(2025, 1, 6), d(2025, 1, 6)).unwrap(),
        vec![d(2025, 1, 6)]
    );
    assert!(
        cal.working_days_in_range(d(2025, 1, 4), d(2025, 1, 5))
            .unwrap()
            .is_empty()
    );
}

#[test]
fn reversed_range_is_rejected() {
    let cal = WorkCalendar::default();
    let err = cal
        .working_days_in_range(d(2025, 1, 10), d(2025, 1, 6))
        .unwrap_err();
    assert_eq!(
        err,
        CalendarError::InvalidRange {
            start: d(2025, 1, 10),
            end: d(2025, 1, 6)
        }
    );
    assert_eq!(cal.count_working_days(d(2025, 1, 10), d(2025, 1, 6)), 0);
}

#[test]
fn schedule_day_validity_ignores_exclusions() {
    let schedule = Schedule::new("s1", "January", d(2025, 1, 6), d(2025, 1, 10))
        .with_excluded_dates([d(2025, 1, 7)]);
    assert!(schedule.is_day_valid(d(2025, 1, 7)));
    assert!(!schedule.is_day_valid(d(2025, 1, 4)));
    assert!(!schedule.is_day_valid(d(2025, 1, 13)));
}
