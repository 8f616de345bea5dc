use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

use crate::cadet::CadetId;
use crate::schedule::DayAssignment;

/// Day→cadets and cadet→days views of one build, mutated only through
/// [`assign`](Self::assign) and [`replace`](Self::replace) so the two maps
/// always agree.
#[derive(Debug, Clone, Default)]
pub struct WorkingState {
    by_day: HashMap<NaiveDate, Vec<CadetId>>,
    by_cadet: HashMap<CadetId, BTreeSet<NaiveDate>>,
}

impl WorkingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the state from stored assignments. Duplicate ids on a day are
    /// collapsed.
    pub fn from_assignments(assignments: &[DayAssignment]) -> Self {
        let mut state = Self::new();
        for assignment in assignments {
            for cadet_id in &assignment.cadet_ids {
                state.assign(assignment.date, cadet_id);
            }
        }
        state
    }

    /// Put `cadet_id` on `day`. Returns `false` if they were already there.
    pub fn assign(&mut self, day: NaiveDate, cadet_id: &str) -> bool {
        if self.is_assigned(day, cadet_id) {
            return false;
        }
        self.by_day
            .entry(day)
            .or_default()
            .push(cadet_id.to_string());
        self.by_cadet
            .entry(cadet_id.to_string())
            .or_default()
            .insert(day);
        true
    }

    /// Swap `old` for `new` on `day`, keeping `new` in `old`'s position.
    ///
    /// Nothing changes (and `false` is returned) unless `old` is on the day
    /// and `new` is not.
    pub fn replace(&mut self, day: NaiveDate, old: &str, new: &str) -> bool {
        if old == new || self.is_assigned(day, new) {
            return false;
        }
        let Some(slot) = self
            .by_day
            .get_mut(&day)
            .and_then(|ids| ids.iter_mut().find(|id| id.as_str() == old))
        else {
            return false;
        };
        *slot = new.to_string();

        if let Some(days) = self.by_cadet.get_mut(old) {
            days.remove(&day);
            if days.is_empty() {
                self.by_cadet.remove(old);
            }
        }
        self.by_cadet
            .entry(new.to_string())
            .or_default()
            .insert(day);
        true
    }

    pub fn cadets_on(&self, day: NaiveDate) -> &[CadetId] {
        self.by_day.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_assigned(&self, day: NaiveDate, cadet_id: &str) -> bool {
        self.by_cadet
            .get(cadet_id)
            .is_some_and(|days| days.contains(&day))
    }

    /// Number of on-call days currently held by the cadet.
    pub fn load(&self, cadet_id: &str) -> usize {
        self.by_cadet.get(cadet_id).map_or(0, BTreeSet::len)
    }

    pub fn is_consistent(&self) -> bool {
        let forward = self.by_day.iter().all(|(day, ids)| {
            ids.iter()
                .all(|id| self.by_cadet.get(id).is_some_and(|days| days.contains(day)))
        });
        let backward = self.by_cadet.iter().all(|(id, days)| {
            days.iter().all(|day| {
                self.by_day
                    .get(day)
                    .is_some_and(|ids| ids.iter().filter(|other| *other == id).count() == 1)
            })
        });
        forward && backward
    }
}
