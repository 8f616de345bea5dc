use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::availability::AvailabilityRecord;
use crate::cadet::{Cadet, CadetId, is_valid_cadet_id};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("schedule start date {start} must be on or before end date {end}")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },
    #[error("assignment date {date} is outside the schedule range {start}..={end}")]
    OutOfRange {
        date: NaiveDate,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error("assignment date {0} is an excluded date")]
    ExcludedDate(NaiveDate),
    #[error("assignment date {0} appears more than once")]
    DuplicateDate(NaiveDate),
    #[error("cadet id '{cadet_id}' on {date} is empty, padded or contains a comma")]
    InvalidCadetId { date: NaiveDate, cadet_id: CadetId },
    #[error("cadet {cadet_id} is listed twice on {date}")]
    DuplicateCadet { date: NaiveDate, cadet_id: CadetId },
}

/// One day's on-call roster, chiefs first, then certified cadets, then the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAssignment {
    pub date: NaiveDate,
    #[serde(default)]
    pub cadet_ids: Vec<CadetId>,
}

impl DayAssignment {
    pub fn new(date: NaiveDate, cadet_ids: Vec<CadetId>) -> Self {
        Self { date, cadet_ids }
    }

    pub fn is_empty(&self) -> bool {
        self.cadet_ids.is_empty()
    }
}

fn default_editable() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: String,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default = "default_editable")]
    pub editable: bool,
    #[serde(default)]
    pub excluded_dates: Vec<NaiveDate>,
    #[serde(default)]
    pub assignments: Vec<DayAssignment>,
}

impl Schedule {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start_date,
            end_date,
            editable: true,
            excluded_dates: Vec::new(),
            assignments: Vec::new(),
        }
    }

    pub fn with_excluded_dates<I>(mut self, dates: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        self.excluded_dates.extend(dates);
        self
    }

    /// Inside the range and on a weekday.
    /// Excluded dates still count as valid here; they are filtered by the
    /// [`WorkCalendar`](crate::calendar::WorkCalendar).
    pub fn is_day_valid(&self, date: NaiveDate) -> bool {
        date >= self.start_date
            && date <= self.end_date
            && !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    pub fn assignment_for(&self, date: NaiveDate) -> Option<&DayAssignment> {
        self.assignments.iter().find(|a| a.date == date)
    }

    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.start_date > self.end_date {
            return Err(ScheduleError::StartAfterEnd {
                start: self.start_date,
                end: self.end_date,
            });
        }
        let excluded: HashSet<NaiveDate> = self.excluded_dates.iter().copied().collect();
        let mut seen_dates = HashSet::with_capacity(self.assignments.len());
        for assignment in &self.assignments {
            let date = assignment.date;
            if date < self.start_date || date > self.end_date {
                return Err(ScheduleError::OutOfRange {
                    date,
                    start: self.start_date,
                    end: self.end_date,
                });
            }
            if excluded.contains(&date) {
                return Err(ScheduleError::ExcludedDate(date));
            }
            if !seen_dates.insert(date) {
                return Err(ScheduleError::DuplicateDate(date));
            }
            let mut seen_cadets = HashSet::with_capacity(assignment.cadet_ids.len());
            for cadet_id in &assignment.cadet_ids {
                if !is_valid_cadet_id(cadet_id) {
                    return Err(ScheduleError::InvalidCadetId {
                        date,
                        cadet_id: cadet_id.clone(),
                    });
                }
                if !seen_cadets.insert(cadet_id.as_str()) {
                    return Err(ScheduleError::DuplicateCadet {
                        date,
                        cadet_id: cadet_id.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Everything the builder needs for one schedule, as exchanged by the file
/// layer, the CLI and the HTTP service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterBundle {
    pub schedule: Schedule,
    #[serde(default)]
    pub roster: Vec<Cadet>,
    #[serde(default)]
    pub availability: Vec<AvailabilityRecord>,
}

impl RosterBundle {
    pub fn new(schedule: Schedule, roster: Vec<Cadet>, availability: Vec<AvailabilityRecord>) -> Self {
        Self {
            schedule,
            roster,
            availability,
        }
    }

    pub fn find_cadet(&self, cadet_id: &str) -> Option<&Cadet> {
        self.roster.iter().find(|c| c.id == cadet_id)
    }
}
