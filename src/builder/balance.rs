use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::context::BuildContext;
use super::working_state::WorkingState;
use crate::cadet::Gender;

/// Fairness verdict for a single working day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBalance {
    pub date: NaiveDate,
    /// Weighted load of the busiest assigned non-chief minus that of the least
    /// busy available non-chief left off the day, when both exist.
    pub load_spread: Option<i64>,
    /// Set when the day has at most one certified cadet, which exempts it from
    /// the load check.
    pub load_check_skipped: bool,
    pub load_balanced: bool,
    pub gender_balanced: bool,
}

impl DayBalance {
    pub fn is_balanced(&self) -> bool {
        self.load_balanced && self.gender_balanced
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceReport {
    pub balanced: bool,
    pub days_checked: usize,
    pub violations: Vec<DayBalance>,
}

/// Judge one day. `None` when no eligible cadet reported availability for it:
/// nothing can be fixed there, so it never counts against the schedule.
pub(crate) fn evaluate_day(
    ctx: &BuildContext<'_>,
    state: &WorkingState,
    day: NaiveDate,
) -> Option<DayBalance> {
    if !ctx.has_availability(day) {
        return None;
    }
    let assigned = ctx.assigned_on(state, day);

    let load_check_skipped = assigned.iter().filter(|c| c.certified).count() <= 1;
    let busiest = assigned
        .iter()
        .filter(|c| !c.chief)
        .map(|c| ctx.weighted_load(state, c))
        .max();
    let idlest = ctx
        .available_on(day)
        .filter(|c| !c.chief && !state.is_assigned(day, &c.id))
        .map(|c| ctx.weighted_load(state, c))
        .min();
    let load_spread = match (busiest, idlest) {
        (Some(high), Some(low)) => Some(high - low),
        _ => None,
    };
    let load_balanced = load_check_skipped
        || load_spread.is_none_or(|spread| spread < ctx.config.load_tolerance);

    let gender_balanced = Gender::BALANCED_PAIR
        .iter()
        .all(|g| assigned.iter().any(|c| c.gender == Some(*g)));

    Some(DayBalance {
        date: day,
        load_spread,
        load_check_skipped,
        load_balanced,
        gender_balanced,
    })
}

pub(crate) fn check(ctx: &BuildContext<'_>, state: &WorkingState) -> BalanceReport {
    let mut report = BalanceReport {
        balanced: true,
        ..BalanceReport::default()
    };
    for &day in &ctx.days {
        let Some(verdict) = evaluate_day(ctx, state, day) else {
            continue;
        };
        report.days_checked += 1;
        if !verdict.is_balanced() {
            report.balanced = false;
            report.violations.push(verdict);
        }
    }
    report
}
