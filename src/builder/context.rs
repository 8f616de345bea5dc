use chrono::NaiveDate;
use std::collections::HashMap;

use super::working_state::WorkingState;
use crate::availability::AvailabilityIndex;
use crate::cadet::Cadet;
use crate::config::BuilderConfig;

/// Read-only inputs shared by every step of one build.
pub(crate) struct BuildContext<'a> {
    pub days: Vec<NaiveDate>,
    /// Eligible cadets in the order the greedy passes see them.
    pub roster: Vec<&'a Cadet>,
    lookup: HashMap<&'a str, &'a Cadet>,
    availability: AvailabilityIndex,
    pub config: &'a BuilderConfig,
}

impl<'a> BuildContext<'a> {
    pub fn new(
        days: Vec<NaiveDate>,
        ordered: Vec<&'a Cadet>,
        availability: AvailabilityIndex,
        config: &'a BuilderConfig,
    ) -> Self {
        let lookup = ordered.iter().copied().map(|c| (c.id.as_str(), c)).collect();
        let roster = ordered.into_iter().filter(|c| c.eligible).collect();
        Self {
            days,
            roster,
            lookup,
            availability,
            config,
        }
    }

    pub fn cadet(&self, cadet_id: &str) -> Option<&'a Cadet> {
        self.lookup.get(cadet_id).copied()
    }

    pub fn is_available(&self, cadet_id: &str, day: NaiveDate) -> bool {
        self.availability.is_available(cadet_id, day)
    }

    /// Eligible cadets who reported availability for `day`, in roster order.
    pub fn available_on(&self, day: NaiveDate) -> impl Iterator<Item = &'a Cadet> + '_ {
        self.roster
            .iter()
            .copied()
            .filter(move |c| self.availability.is_available(&c.id, day))
    }

    pub fn has_availability(&self, day: NaiveDate) -> bool {
        self.available_on(day).next().is_some()
    }

    pub fn assigned_on(&self, state: &WorkingState, day: NaiveDate) -> Vec<&'a Cadet> {
        state
            .cadets_on(day)
            .iter()
            .filter_map(|id| self.cadet(id))
            .collect()
    }

    /// Load used for fairness comparisons: certified cadets are expected to
    /// carry more days, so their count is offset downwards.
    pub fn weighted_load(&self, state: &WorkingState, cadet: &Cadet) -> i64 {
        let load = state.load(&cadet.id) as i64;
        if cadet.certified {
            load - self.config.certified_load_offset
        } else {
            load
        }
    }

    pub fn certified_count(&self, state: &WorkingState, day: NaiveDate) -> usize {
        self.assigned_on(state, day)
            .iter()
            .filter(|c| c.certified)
            .count()
    }

    /// A swap may never leave a day that had certified coverage without any.
    pub fn keeps_certified_coverage(
        &self,
        state: &WorkingState,
        day: NaiveDate,
        outgoing: &Cadet,
        incoming: &Cadet,
    ) -> bool {
        if !outgoing.certified || incoming.certified {
            return true;
        }
        self.certified_count(state, day) > 1
    }
}
