use chrono::NaiveDate;
use tracing::{debug, warn};

use super::balance;
use super::context::BuildContext;
use super::working_state::WorkingState;
use crate::cadet::{Cadet, Gender};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RebalanceOutcome {
    pub sweeps: usize,
    pub swaps: usize,
    pub balanced: bool,
}

/// Sweep every day with a load repair then a gender repair, re-checking
/// balance after each sweep. Gives up after `max_rebalance_iterations`
/// sweeps and leaves the state as it is.
pub(crate) fn rebalance(ctx: &BuildContext<'_>, state: &mut WorkingState) -> RebalanceOutcome {
    let mut outcome = RebalanceOutcome {
        sweeps: 0,
        swaps: 0,
        balanced: balance::check(ctx, state).balanced,
    };
    if outcome.balanced {
        return outcome;
    }

    let limit = ctx.config.max_rebalance_iterations;
    for sweep in 1..=limit {
        for &day in &ctx.days {
            if repair_load(ctx, state, day) {
                outcome.swaps += 1;
            }
            if repair_gender(ctx, state, day) {
                outcome.swaps += 1;
            }
        }
        outcome.sweeps = sweep;
        if balance::check(ctx, state).balanced {
            outcome.balanced = true;
            debug!(sweeps = sweep, swaps = outcome.swaps, "schedule balanced");
            return outcome;
        }
    }

    warn!(
        sweeps = limit,
        swaps = outcome.swaps,
        "rebalance limit reached, returning best effort"
    );
    outcome
}

/// Swap the busiest assigned non-chief for the idlest available one left off
/// the day when their weighted loads are too far apart.
fn repair_load(ctx: &BuildContext<'_>, state: &mut WorkingState, day: NaiveDate) -> bool {
    if !ctx.has_availability(day) {
        return false;
    }
    let Some(incoming) = ctx
        .available_on(day)
        .filter(|c| !c.chief && !state.is_assigned(day, &c.id))
        .min_by_key(|c| ctx.weighted_load(state, c))
    else {
        return false;
    };
    let Some(outgoing) = ctx
        .assigned_on(state, day)
        .into_iter()
        .filter(|c| !c.chief && ctx.keeps_certified_coverage(state, day, c, incoming))
        .max_by_key(|c| ctx.weighted_load(state, c))
    else {
        return false;
    };

    let spread = ctx.weighted_load(state, outgoing) - ctx.weighted_load(state, incoming);
    if spread < ctx.config.load_tolerance {
        return false;
    }
    swap(ctx, state, day, outgoing, incoming, "load")
}

/// Bring in a cadet of the gender the day lacks, sending home the busiest
/// assigned non-chief of the best represented gender.
fn repair_gender(ctx: &BuildContext<'_>, state: &mut WorkingState, day: NaiveDate) -> bool {
    if !ctx.has_availability(day) {
        return false;
    }
    let assigned = ctx.assigned_on(state, day);
    if assigned.is_empty() {
        return false;
    }
    let represented = |gender: Gender| assigned.iter().filter(|c| c.gender == Some(gender)).count();

    let missing: Vec<Gender> = Gender::BALANCED_PAIR
        .into_iter()
        .filter(|g| represented(*g) == 0)
        .collect();
    // With both genders absent, start with the scarcer one among the cadets
    // available that day that can still be brought in.
    let Some((_, incoming)) = missing
        .into_iter()
        .filter_map(|gender| {
            let incoming = ctx
                .available_on(day)
                .filter(|c| {
                    !c.chief && c.gender == Some(gender) && !state.is_assigned(day, &c.id)
                })
                .min_by_key(|c| ctx.weighted_load(state, c))?;
            let supply = ctx
                .available_on(day)
                .filter(|c| c.gender == Some(gender))
                .count();
            Some((supply, incoming))
        })
        .min_by_key(|(supply, _)| *supply)
    else {
        return false;
    };
    let target = incoming.gender;

    // Never remove the last representative of a balanced-pair gender.
    let group_size = |cadet: &Cadet| {
        assigned
            .iter()
            .filter(|other| other.gender == cadet.gender)
            .count()
    };
    let Some(outgoing) = assigned
        .iter()
        .copied()
        .filter(|c| !c.chief && c.gender != target)
        .filter(|c| ctx.keeps_certified_coverage(state, day, c, incoming))
        .filter(|c| match c.gender {
            Some(g) if Gender::BALANCED_PAIR.contains(&g) => represented(g) > 1,
            _ => true,
        })
        .max_by_key(|c| (group_size(*c), ctx.weighted_load(state, c)))
    else {
        return false;
    };

    swap(ctx, state, day, outgoing, incoming, "gender")
}

fn swap(
    ctx: &BuildContext<'_>,
    state: &mut WorkingState,
    day: NaiveDate,
    outgoing: &Cadet,
    incoming: &Cadet,
    reason: &'static str,
) -> bool {
    if !ctx.keeps_certified_coverage(state, day, outgoing, incoming) {
        debug!(%day, from = %outgoing.id, to = %incoming.id, reason, "swap would drop certified coverage");
        return false;
    }
    let swapped = state.replace(day, &outgoing.id, &incoming.id);
    if swapped {
        debug!(%day, from = %outgoing.id, to = %incoming.id, reason, "swap");
    }
    swapped
}
