use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::cadet::CadetId;

/// Days a cadet marked themselves available for within one schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRecord {
    pub cadet_id: CadetId,
    pub schedule_id: String,
    #[serde(default)]
    pub days: Vec<NaiveDate>,
}

impl AvailabilityRecord {
    pub fn new<I>(cadet_id: impl Into<String>, schedule_id: impl Into<String>, days: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        Self {
            cadet_id: cadet_id.into(),
            schedule_id: schedule_id.into(),
            days: days.into_iter().collect(),
        }
    }
}

/// Availability restricted to one schedule and to its working days.
///
/// Records for other schedules and dates outside `valid_days` are dropped.
/// When a cadet has more than one record for the schedule, their days are
/// merged.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityIndex {
    by_cadet: HashMap<CadetId, BTreeSet<NaiveDate>>,
}

impl AvailabilityIndex {
    pub fn build(
        schedule_id: &str,
        records: &[AvailabilityRecord],
        valid_days: &[NaiveDate],
    ) -> Self {
        let valid: HashSet<NaiveDate> = valid_days.iter().copied().collect();
        let mut index = Self::default();
        for record in records.iter().filter(|r| r.schedule_id == schedule_id) {
            for day in record.days.iter().filter(|d| valid.contains(d)) {
                index
                    .by_cadet
                    .entry(record.cadet_id.clone())
                    .or_default()
                    .insert(*day);
            }
        }
        index
    }

    pub fn is_available(&self, cadet_id: &str, day: NaiveDate) -> bool {
        self.by_cadet
            .get(cadet_id)
            .is_some_and(|days| days.contains(&day))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    #[test]
    fn index_filters_schedule_and_invalid_days() {
        let records = vec![
            AvailabilityRecord::new("a", "s1", [d(6), d(7), d(11)]),
            AvailabilityRecord::new("a", "s1", [d(8)]),
            AvailabilityRecord::new("b", "s2", [d(6)]),
        ];
        let valid = [d(6), d(7), d(8), d(9), d(10)];
        let index = AvailabilityIndex::build("s1", &records, &valid);

        assert!(index.is_available("a", d(6)));
        assert!(index.is_available("a", d(8)));
        // Saturday is not a working day
        assert!(!index.is_available("a", d(11)));
        assert!(!index.is_available("b", d(6)));
        assert!(!index.is_available("a", d(9)));
    }
}
