//! Day-by-day on-call assignment for one schedule.
//!
//! The build runs in fixed stages over a [`WorkingState`]: a greedy pass for
//! chiefs, chief balancing, a greedy pass for certified non-chiefs, greedy
//! passes over the general pool, then bounded rebalancing sweeps for load and
//! gender fairness. The result is a new [`Schedule`] plus a [`BuildReport`].

mod balance;
mod chiefs;
mod context;
mod greedy;
mod rebalance;
mod report;
mod working_state;

pub use balance::{BalanceReport, DayBalance};
pub use report::{BuildReport, CadetGroup, CoverageGap};
pub use working_state::WorkingState;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

use crate::availability::{AvailabilityIndex, AvailabilityRecord};
use crate::cadet::{Cadet, CadetId, RosterPartition};
use crate::calendar::{CalendarError, WorkCalendar};
use crate::config::{BuilderConfig, ConfigError};
use crate::schedule::{DayAssignment, Schedule, ScheduleError};
use context::BuildContext;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("schedule start date {start} must be on or before end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("cadet {cadet_id} assigned on {date} is not on the roster")]
    UnknownCadet { date: NaiveDate, cadet_id: CadetId },
    #[error("invalid schedule: {0}")]
    InvalidSchedule(#[from] ScheduleError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<CalendarError> for BuildError {
    fn from(value: CalendarError) -> Self {
        match value {
            CalendarError::InvalidRange { start, end } => BuildError::InvalidRange { start, end },
        }
    }
}

/// A freshly built schedule and the diagnostics of the run that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildOutcome {
    pub schedule: Schedule,
    pub report: BuildReport,
}

#[derive(Debug, Clone, Default)]
pub struct ScheduleBuilder {
    config: BuilderConfig,
}

impl ScheduleBuilder {
    pub fn new(config: BuilderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Build with the roster shuffled by an RNG seeded from `config.seed`, or
    /// from entropy when no seed is set.
    pub fn build(
        &self,
        schedule: &Schedule,
        roster: &[Cadet],
        availability: &[AvailabilityRecord],
    ) -> Result<BuildOutcome, BuildError> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.build_with_rng(schedule, roster, availability, &mut rng)
    }

    pub fn build_with_rng<R: Rng + ?Sized>(
        &self,
        schedule: &Schedule,
        roster: &[Cadet],
        availability: &[AvailabilityRecord],
        rng: &mut R,
    ) -> Result<BuildOutcome, BuildError> {
        let mut ordered: Vec<&Cadet> = roster.iter().collect();
        ordered.shuffle(rng);
        self.run(schedule, ordered, availability)
    }

    /// Build without shuffling: the roster order decides round-robin turns.
    pub fn build_in_order(
        &self,
        schedule: &Schedule,
        roster: &[Cadet],
        availability: &[AvailabilityRecord],
    ) -> Result<BuildOutcome, BuildError> {
        self.run(schedule, roster.iter().collect(), availability)
    }

    #[instrument(skip_all, fields(schedule_id = %schedule.id, roster = ordered.len()))]
    fn run(
        &self,
        schedule: &Schedule,
        ordered: Vec<&Cadet>,
        availability: &[AvailabilityRecord],
    ) -> Result<BuildOutcome, BuildError> {
        self.config.validate()?;
        let days = WorkCalendar::for_schedule(schedule)
            .working_days_in_range(schedule.start_date, schedule.end_date)?;
        let index = AvailabilityIndex::build(&schedule.id, availability, &days);
        let ctx = BuildContext::new(days, ordered, index, &self.config);
        let partition = RosterPartition::from_roster(ctx.roster.iter().copied());
        info!(
            days = ctx.days.len(),
            chiefs = partition.chiefs.len(),
            certified = partition.certified_non_chiefs.len(),
            pool = partition.non_chiefs.len(),
            eligible = partition.eligible_count(),
            "building schedule"
        );

        let mut state = WorkingState::new();
        let mut report = BuildReport {
            working_days: ctx.days.len(),
            ..BuildReport::default()
        };

        greedy::assign_group(
            &ctx,
            &mut state,
            CadetGroup::Chiefs,
            &partition.chiefs,
            &mut report.coverage_gaps,
        );
        for _ in 0..self.config.chief_balance_passes {
            report.chief_swaps += chiefs::balance_chiefs(&ctx, &mut state, &partition.chiefs);
        }
        greedy::assign_group(
            &ctx,
            &mut state,
            CadetGroup::CertifiedNonChiefs,
            &partition.certified_non_chiefs,
            &mut report.coverage_gaps,
        );
        for _ in 0..self.config.general_pool_passes {
            greedy::assign_group(
                &ctx,
                &mut state,
                CadetGroup::GeneralPool,
                &partition.non_chiefs,
                &mut report.coverage_gaps,
            );
        }

        let outcome = rebalance::rebalance(&ctx, &mut state);
        report.rebalance_sweeps = outcome.sweeps;
        report.rebalance_swaps = outcome.swaps;

        let balance = balance::check(&ctx, &state);
        report.balanced = balance.balanced;
        report.unbalanced_days = balance.violations;

        let assignments = assemble(&ctx, &state);
        for assignment in &assignments {
            let members: Vec<&Cadet> = assignment
                .cadet_ids
                .iter()
                .filter_map(|id| ctx.cadet(id))
                .collect();
            if members.is_empty() {
                report.uncovered_days.push(assignment.date);
            }
            if !partition.chiefs.is_empty() && !members.iter().any(|c| c.chief) {
                report.days_without_chief.push(assignment.date);
            }
            if !members.iter().any(|c| c.certified) {
                report.days_without_certified.push(assignment.date);
            }
        }
        report.cadet_loads = ctx
            .roster
            .iter()
            .map(|c| (c.id.clone(), state.load(&c.id)))
            .collect();

        info!(summary = %report.to_cli_summary(), "schedule built");
        Ok(BuildOutcome {
            schedule: Schedule {
                assignments,
                ..schedule.clone()
            },
            report,
        })
    }
}

/// Emit one entry per working day with chiefs first, then certified
/// non-chiefs, then everyone else. Order inside a tier is assignment order.
fn assemble(ctx: &BuildContext<'_>, state: &WorkingState) -> Vec<DayAssignment> {
    ctx.days
        .iter()
        .map(|&day| {
            let mut ids: Vec<CadetId> = state.cadets_on(day).to_vec();
            ids.sort_by_key(|id| ctx.cadet(id).map(Cadet::role));
            DayAssignment::new(day, ids)
        })
        .collect()
}

/// Build with the default configuration and an entropy-seeded shuffle.
pub fn build_schedule(
    schedule: &Schedule,
    roster: &[Cadet],
    availability: &[AvailabilityRecord],
) -> Result<BuildOutcome, BuildError> {
    ScheduleBuilder::default().build(schedule, roster, availability)
}

/// Judge an existing (possibly hand-edited) schedule against the same
/// fairness rules the builder aims for.
pub fn check_balance(
    schedule: &Schedule,
    roster: &[Cadet],
    availability: &[AvailabilityRecord],
    config: &BuilderConfig,
) -> Result<BalanceReport, BuildError> {
    schedule.validate()?;
    let days = WorkCalendar::for_schedule(schedule)
        .working_days_in_range(schedule.start_date, schedule.end_date)?;
    let index = AvailabilityIndex::build(&schedule.id, availability, &days);
    let ctx = BuildContext::new(days, roster.iter().collect(), index, config);

    for assignment in &schedule.assignments {
        if let Some(unknown) = assignment.cadet_ids.iter().find(|id| ctx.cadet(id).is_none()) {
            return Err(BuildError::UnknownCadet {
                date: assignment.date,
                cadet_id: unknown.clone(),
            });
        }
    }
    let state = WorkingState::from_assignments(&schedule.assignments);
    Ok(balance::check(&ctx, &state))
}

pub fn is_schedule_balanced(
    schedule: &Schedule,
    roster: &[Cadet],
    availability: &[AvailabilityRecord],
    config: &BuilderConfig,
) -> Result<bool, BuildError> {
    check_balance(schedule, roster, availability, config).map(|report| report.balanced)
}
