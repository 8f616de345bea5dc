pub mod availability;
pub mod builder;
pub mod cadet;
pub mod calendar;
pub mod config;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod logging;
pub mod persistence;
pub mod schedule;

pub use availability::{AvailabilityIndex, AvailabilityRecord};
pub use builder::{
    BalanceReport, BuildError, BuildOutcome, BuildReport, CadetGroup, CoverageGap, DayBalance,
    ScheduleBuilder, WorkingState, build_schedule, check_balance, is_schedule_balanced,
};
pub use cadet::{Cadet, CadetId, CadetRole, Gender, RosterPartition};
pub use calendar::{CalendarError, WorkCalendar};
pub use config::{BuilderConfig, ConfigError};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteScheduleStore;
pub use persistence::{
    PersistenceError, ScheduleStore, load_bundle_from_json, load_schedule_from_csv,
    load_schedule_from_json, save_bundle_to_json, save_schedule_to_csv, save_schedule_to_json,
};
pub use schedule::{DayAssignment, RosterBundle, Schedule, ScheduleError};
