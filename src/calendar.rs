use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::schedule::Schedule;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("start date {start} must be on or before end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

/// Working-day calendar for an on-call schedule: Monday through Friday minus
/// any explicitly excluded dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkCalendar {
    excluded: HashSet<NaiveDate>,
    non_working_days: HashSet<Weekday>,
}

impl Default for WorkCalendar {
    fn default() -> Self {
        Self {
            excluded: HashSet::new(),
            non_working_days: HashSet::from([Weekday::Sat, Weekday::Sun]),
        }
    }
}

impl WorkCalendar {
    pub fn with_excluded<I>(excluded: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let mut calendar = Self::default();
        calendar.exclude_all(excluded);
        calendar
    }

    pub fn for_schedule(schedule: &Schedule) -> Self {
        Self::with_excluded(schedule.excluded_dates.iter().copied())
    }

    /// Add a single excluded date
    pub fn exclude(&mut self, date: NaiveDate) {
        self.excluded.insert(date);
    }

    pub fn exclude_all<I>(&mut self, dates: I)
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        self.excluded.extend(dates);
    }

    pub fn is_excluded(&self, date: NaiveDate) -> bool {
        self.excluded.contains(&date)
    }

    /// Check if a date is a working day (weekday and not excluded)
    pub fn is_available(&self, date: NaiveDate) -> bool {
        !self.excluded.contains(&date) && !self.non_working_days.contains(&date.weekday())
    }

    /// Get all working days in a date range, inclusive on both ends
    pub fn working_days_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<NaiveDate>, CalendarError> {
        if start > end {
            return Err(CalendarError::InvalidRange { start, end });
        }
        let mut days = Vec::new();
        let mut current = start;

        while current <= end {
            if self.is_available(current) {
                days.push(current);
            }
            current = current + Duration::days(1);
        }
        Ok(days)
    }

    /// Count working days in a date range without materializing them
    pub fn count_working_days(&self, start: NaiveDate, end: NaiveDate) -> usize {
        let mut count = 0;
        let mut current = start;

        while current <= end {
            if self.is_available(current) {
                count += 1;
            }
            current = current + Duration::days(1);
        }
        count
    }
}
