#![cfg(feature = "sqlite")]

use cadet_roster::{
    AvailabilityRecord, BuilderConfig, Cadet, DayAssignment, Gender, PersistenceError, Schedule,
    ScheduleBuilder, ScheduleError, ScheduleStore, SqliteScheduleStore,
};
use chrono::NaiveDate;
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn built_schedule(id: &str) -> Schedule {
    let schedule = Schedule::new(id, "SQLite rotation", d(2025, 1, 6), d(2025, 1, 17))
        .with_excluded_dates([d(2025, 1, 8)]);
    let roster = vec![
        Cadet::new("c1", "Avery").chief().certified().with_gender(Gender::Male),
        Cadet::new("c2", "Blair").certified().with_gender(Gender::Female),
        Cadet::new("c3", "Casey").with_gender(Gender::Female),
        Cadet::new("c4", "Dana").with_gender(Gender::Male),
    ];
    let days = [
        d(2025, 1, 6),
        d(2025, 1, 7),
        d(2025, 1, 9),
        d(2025, 1, 13),
        d(2025, 1, 16),
    ];
    let availability: Vec<AvailabilityRecord> = roster
        .iter()
        .map(|c| AvailabilityRecord::new(c.id.clone(), id, days))
        .collect();
    ScheduleBuilder::new(BuilderConfig::default().with_seed(5))
        .build(&schedule, &roster, &availability)
        .unwrap()
        .schedule
}

#[test]
fn sqlite_store_round_trip_schedule() {
    let file = NamedTempFile::new().unwrap();
    let store = SqliteScheduleStore::new(file.path()).unwrap();
    let schedule = built_schedule("winter");

    store.save_schedule(&schedule).expect("save schedule");

    let loaded = store
        .load_schedule("winter")
        .expect("load schedule")
        .expect("schedule exists");
    assert_eq!(loaded, schedule);
    assert_eq!(loaded.assignments.len(), 9);
}

#[test]
fn sqlite_store_survives_reopen() {
    let file = NamedTempFile::new().unwrap();
    let schedule = built_schedule("winter");
    {
        let store = SqliteScheduleStore::new(file.path()).unwrap();
        store.save_schedule(&schedule).unwrap();
    }
    let store = SqliteScheduleStore::new(file.path()).unwrap();
    assert_eq!(store.load_schedule("winter").unwrap(), Some(schedule));
}

#[test]
fn sqlite_store_overwrites_by_id() {
    let store = SqliteScheduleStore::in_memory().unwrap();
    let mut schedule = built_schedule("winter");
    store.save_schedule(&schedule).unwrap();

    schedule.name = "Winter (revised)".into();
    schedule.assignments.truncate(2);
    store.save_schedule(&schedule).unwrap();

    let loaded = store.load_schedule("winter").unwrap().unwrap();
    assert_eq!(loaded.name, "Winter (revised)");
    assert_eq!(loaded.assignments.len(), 2);
    assert_eq!(store.list_schedules().unwrap(), vec!["winter".to_string()]);
}

#[test]
fn sqlite_store_lists_and_deletes() {
    let store = SqliteScheduleStore::in_memory().unwrap();
    store.save_schedule(&built_schedule("b-term")).unwrap();
    store.save_schedule(&built_schedule("a-term")).unwrap();

    assert_eq!(
        store.list_schedules().unwrap(),
        vec!["a-term".to_string(), "b-term".to_string()]
    );
    assert!(store.delete_schedule("a-term").unwrap());
    assert!(!store.delete_schedule("a-term").unwrap());
    assert_eq!(store.load_schedule("a-term").unwrap(), None);
    assert_eq!(store.list_schedules().unwrap(), vec!["b-term".to_string()]);
}

#[test]
fn sqlite_store_rejects_invalid_schedule() {
    let store = SqliteScheduleStore::in_memory().unwrap();
    let mut schedule = Schedule::new("bad", "Bad", d(2025, 1, 6), d(2025, 1, 10));
    schedule.assignments = vec![
        DayAssignment::new(d(2025, 1, 7), vec!["c1".into()]),
        DayAssignment::new(d(2025, 1, 7), vec!["c2".into()]),
    ];

    let err = store.save_schedule(&schedule).unwrap_err();
    assert!(matches!(
        err,
        PersistenceError::Schedule(ScheduleError::DuplicateDate(_))
    ));
    assert!(store.list_schedules().unwrap().is_empty());
}
