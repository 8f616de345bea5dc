use super::{PersistenceError, PersistenceResult};
use crate::schedule::{DayAssignment, RosterBundle, Schedule};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

pub fn save_bundle_to_json<P: AsRef<Path>>(bundle: &RosterBundle, path: P) -> PersistenceResult<()> {
    super::validate_bundle(bundle)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, bundle)?;
    Ok(())
}

pub fn load_bundle_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<RosterBundle> {
    let file = File::open(path)?;
    let bundle: RosterBundle = serde_json::from_reader(file)?;
    super::validate_bundle(&bundle)?;
    Ok(bundle)
}

pub fn save_schedule_to_json<P: AsRef<Path>>(schedule: &Schedule, path: P) -> PersistenceResult<()> {
    schedule.validate()?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, schedule)?;
    Ok(())
}

pub fn load_schedule_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Schedule> {
    let file = File::open(path)?;
    let schedule: Schedule = serde_json::from_reader(file)?;
    schedule.validate()?;
    Ok(schedule)
}

/// One CSV row: either the leading metadata row carrying the schedule header
/// as JSON, or a day with its comma-joined cadet ids.
#[derive(Default, Serialize, Deserialize)]
struct AssignmentCsvRecord {
    date: String,
    cadet_ids: String,
    #[serde(default)]
    schedule_json: String,
}

impl AssignmentCsvRecord {
    fn metadata_row(schedule: &Schedule) -> PersistenceResult<Self> {
        let header = Schedule {
            assignments: Vec::new(),
            ..schedule.clone()
        };
        Ok(Self {
            schedule_json: serde_json::to_string(&header)?,
            ..Self::default()
        })
    }

    fn is_metadata_row(&self) -> bool {
        !self.schedule_json.trim().is_empty()
    }

    fn into_assignment(self) -> PersistenceResult<DayAssignment> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").map_err(|err| {
            PersistenceError::InvalidData(format!("invalid date '{}': {err}", self.date))
        })?;
        Ok(DayAssignment::new(date, split_ids(&self.cadet_ids)))
    }
}

impl From<&DayAssignment> for AssignmentCsvRecord {
    fn from(assignment: &DayAssignment) -> Self {
        Self {
            date: assignment.date.format("%Y-%m-%d").to_string(),
            cadet_ids: assignment.cadet_ids.join(","),
            schedule_json: String::new(),
        }
    }
}

pub fn save_schedule_to_csv<P: AsRef<Path>>(schedule: &Schedule, path: P) -> PersistenceResult<()> {
    schedule.validate()?;
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    writer.serialize(AssignmentCsvRecord::metadata_row(schedule)?)?;
    for assignment in &schedule.assignments {
        writer.serialize(AssignmentCsvRecord::from(assignment))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_schedule_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Schedule> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut header: Option<Schedule> = None;
    let mut assignments = Vec::new();
    for record in reader.deserialize::<AssignmentCsvRecord>() {
        let record = record?;
        if record.is_metadata_row() {
            if header.is_some() {
                return Err(PersistenceError::InvalidData(
                    "CSV file contained multiple metadata rows".into(),
                ));
            }
            header = Some(serde_json::from_str(&record.schedule_json).map_err(|err| {
                PersistenceError::InvalidData(format!("invalid schedule json: {err}"))
            })?);
            continue;
        }
        assignments.push(record.into_assignment()?);
    }

    let mut schedule = header.ok_or_else(|| {
        PersistenceError::InvalidData("CSV file is missing the schedule metadata row".into())
    })?;
    schedule.assignments = assignments;
    schedule.validate()?;
    Ok(schedule)
}

fn split_ids(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
