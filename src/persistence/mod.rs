use crate::cadet::is_valid_cadet_id;
use crate::schedule::{RosterBundle, Schedule, ScheduleError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid schedule: {0}")]
    Schedule(#[from] ScheduleError),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("schedule {0} not found")]
    NotFound(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Caller-side storage for built schedules, keyed by schedule id.
pub trait ScheduleStore {
    fn save_schedule(&self, schedule: &Schedule) -> PersistenceResult<()>;
    fn load_schedule(&self, id: &str) -> PersistenceResult<Option<Schedule>>;
    fn list_schedules(&self) -> PersistenceResult<Vec<String>>;
    /// Returns `false` when nothing was stored under `id`.
    fn delete_schedule(&self, id: &str) -> PersistenceResult<bool>;
}

pub fn validate_bundle(bundle: &RosterBundle) -> PersistenceResult<()> {
    bundle.schedule.validate()?;
    let mut seen = std::collections::HashSet::with_capacity(bundle.roster.len());
    for cadet in &bundle.roster {
        if !is_valid_cadet_id(&cadet.id) {
            return Err(PersistenceError::InvalidData(format!(
                "cadet id '{}' is empty, padded or contains a comma",
                cadet.id
            )));
        }
        if !seen.insert(cadet.id.as_str()) {
            return Err(PersistenceError::InvalidData(format!(
                "duplicate cadet id {}",
                cadet.id
            )));
        }
    }
    Ok(())
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    load_bundle_from_json, load_schedule_from_csv, load_schedule_from_json, save_bundle_to_json,
    save_schedule_to_csv, save_schedule_to_json,
};
