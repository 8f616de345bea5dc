use cadet_roster::{
    AvailabilityRecord, BuilderConfig, Cadet, DayAssignment, Gender, PersistenceError,
    RosterBundle, Schedule, ScheduleBuilder, ScheduleError, load_bundle_from_json,
    load_schedule_from_csv, load_schedule_from_json, save_bundle_to_json, save_schedule_to_csv,
    save_schedule_to_json,
};
use chrono::NaiveDate;
use std::io::Write;
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_bundle() -> RosterBundle {
    let schedule = Schedule::new("spring", "Spring rotation", d(2025, 3, 3), d(2025, 3, 14))
        .with_excluded_dates([d(2025, 3, 7)]);
    let roster = vec![
        Cadet::new("c1", "Avery").chief().certified().with_gender(Gender::Male),
        Cadet::new("c2", "Blair").chief().with_gender(Gender::Female),
        Cadet::new("c3", "Casey").certified().with_gender(Gender::Female),
        Cadet::new("c4", "Dana").with_gender(Gender::Male),
        Cadet::new("c5", "Emery, Jr.").with_gender(Gender::Other),
    ];
    let availability = roster
        .iter()
        .map(|c| {
            AvailabilityRecord::new(
                c.id.clone(),
                "spring",
                [d(2025, 3, 3), d(2025, 3, 4), d(2025, 3, 5), d(2025, 3, 10)],
            )
        })
        .collect();
    RosterBundle::new(schedule, roster, availability)
}

fn built_schedule() -> Schedule {
    let bundle = sample_bundle();
    ScheduleBuilder::new(BuilderConfig::default().with_seed(11))
        .build(&bundle.schedule, &bundle.roster, &bundle.availability)
        .unwrap()
        .schedule
}

#[test]
fn json_round_trip_preserves_schedule() {
    let schedule = built_schedule();
    let tmp = NamedTempFile::new().expect("temp file");

    save_schedule_to_json(&schedule, tmp.path()).expect("save json");
    let loaded = load_schedule_from_json(tmp.path()).expect("load json");

    assert_eq!(loaded, schedule);
    assert_eq!(loaded.excluded_dates, vec![d(2025, 3, 7)]);
}

#[test]
fn json_uses_camel_case_field_names() {
    let schedule = built_schedule();
    let tmp = NamedTempFile::new().expect("temp file");
    save_schedule_to_json(&schedule, tmp.path()).expect("save json");

    let text = std::fs::read_to_string(tmp.path()).unwrap();
    assert!(text.contains("\"startDate\""));
    assert!(text.contains("\"excludedDates\""));
    assert!(text.contains("\"cadetIds\""));
}

#[test]
fn csv_round_trip_preserves_schedule() {
    let mut schedule = built_schedule();
    // An empty day must survive the trip as an empty list.
    if let Some(first) = schedule.assignments.first_mut() {
        first.cadet_ids.clear();
    }
    let tmp = NamedTempFile::new().expect("temp file");

    save_schedule_to_csv(&schedule, tmp.path()).expect("save csv");
    let loaded = load_schedule_from_csv(tmp.path()).expect("load csv");

    assert_eq!(loaded, schedule);
    assert!(loaded.assignments[0].is_empty());
}

#[test]
fn csv_without_metadata_row_is_rejected() {
    let mut tmp = NamedTempFile::new().expect("temp file");
    writeln!(tmp, "date,cadet_ids,schedule_json").unwrap();
    writeln!(tmp, "2025-03-03,\"c1,c2\",").unwrap();
    tmp.flush().unwrap();

    let err = load_schedule_from_csv(tmp.path()).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidData(_)), "{err}");
}

#[test]
fn csv_with_bad_date_is_rejected() {
    let schedule = Schedule::new("s", "S", d(2025, 3, 3), d(2025, 3, 7));
    let tmp = NamedTempFile::new().expect("temp file");
    save_schedule_to_csv(&schedule, tmp.path()).expect("save csv");

    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .open(tmp.path())
        .unwrap();
    writeln!(file, "03/04/2025,c1,").unwrap();
    drop(file);

    let err = load_schedule_from_csv(tmp.path()).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidData(_)), "{err}");
}

#[test]
fn bundle_round_trip_preserves_roster_and_availability() {
    let bundle = sample_bundle();
    let tmp = NamedTempFile::new().expect("temp file");

    save_bundle_to_json(&bundle, tmp.path()).expect("save bundle");
    let loaded = load_bundle_from_json(tmp.path()).expect("load bundle");

    assert_eq!(loaded, bundle);
    assert_eq!(loaded.find_cadet("c5").map(|c| c.name.as_str()), Some("Emery, Jr."));
}

#[test]
fn bundle_fields_default_when_missing() {
    let mut tmp = NamedTempFile::new().expect("temp file");
    write!(
        tmp,
        r#"{{
            "schedule": {{"id": "s", "name": "S", "startDate": "2025-03-03", "endDate": "2025-03-07"}},
            "roster": [{{"id": "c1", "name": "Avery", "eligible": true}}]
        }}"#
    )
    .unwrap();
    tmp.flush().unwrap();

    let bundle = load_bundle_from_json(tmp.path()).expect("load bundle");
    assert!(bundle.schedule.editable);
    assert!(bundle.schedule.assignments.is_empty());
    assert!(bundle.availability.is_empty());
    let cadet = &bundle.roster[0];
    assert_eq!(cadet.gender, None);
    assert!(!cadet.certified && !cadet.chief);
}

#[test]
fn bundle_with_duplicate_cadet_ids_is_rejected() {
    let mut bundle = sample_bundle();
    bundle.roster.push(Cadet::new("c1", "Impostor"));
    let tmp = NamedTempFile::new().expect("temp file");

    let err = save_bundle_to_json(&bundle, tmp.path()).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidData(_)), "{err}");
}

#[test]
fn invalid_schedules_are_not_written() {
    let mut schedule = Schedule::new("s", "S", d(2025, 3, 3), d(2025, 3, 7))
        .with_excluded_dates([d(2025, 3, 5)]);
    schedule.assignments = vec![DayAssignment::new(d(2025, 3, 5), vec!["c1".into()])];
    let tmp = NamedTempFile::new().expect("temp file");

    let err = save_schedule_to_json(&schedule, tmp.path()).unwrap_err();
    assert!(matches!(
        err,
        PersistenceError::Schedule(ScheduleError::ExcludedDate(date)) if date == d(2025, 3, 5)
    ));

    schedule.assignments = vec![DayAssignment::new(
        d(2025, 3, 4),
        vec!["c1".into(), "c1".into()],
    )];
    let err = save_schedule_to_csv(&schedule, tmp.path()).unwrap_err();
    assert!(matches!(
        err,
        PersistenceError::Schedule(ScheduleError::DuplicateCadet { .. })
    ));
}

#[test]
fn missing_file_reports_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_schedule_from_json(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, PersistenceError::Io(_)));
}

#[test]
fn cadet_ids_with_commas_are_rejected() {
    let mut schedule = Schedule::new("s", "S", d(2025, 3, 3), d(2025, 3, 7));
    schedule.assignments = vec![DayAssignment::new(
        d(2025, 3, 4),
        vec!["c1".into(), "c2,c3".into()],
    )];
    let tmp = NamedTempFile::new().expect("temp file");

    let err = save_schedule_to_csv(&schedule, tmp.path()).unwrap_err();
    assert!(matches!(
        err,
        PersistenceError::Schedule(ScheduleError::InvalidCadetId { ref cadet_id, .. })
            if cadet_id == "c2,c3"
    ));

    let mut bundle = sample_bundle();
    bundle.roster.push(Cadet::new("c6,c7", "Comma"));
    let err = save_bundle_to_json(&bundle, tmp.path()).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidData(_)), "{err}");
}
