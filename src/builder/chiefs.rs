use tracing::debug;

use super::context::BuildContext;
use super::working_state::WorkingState;
use crate::cadet::Cadet;

/// Hand a day from an overloaded chief to the least-loaded other chief who is
/// free that day. Returns the number of swaps.
pub(crate) fn balance_chiefs(
    ctx: &BuildContext<'_>,
    state: &mut WorkingState,
    chiefs: &[&Cadet],
) -> usize {
    if chiefs.len() < 2 {
        return 0;
    }
    let mut swaps = 0;

    for &day in &ctx.days {
        let Some(current) = ctx.assigned_on(state, day).into_iter().find(|c| c.chief) else {
            continue;
        };
        let current_load = state.load(&current.id);

        let Some(replacement) = chiefs
            .iter()
            .copied()
            .filter(|c| {
                c.id != current.id && ctx.is_available(&c.id, day) && !state.is_assigned(day, &c.id)
            })
            .min_by_key(|c| state.load(&c.id))
        else {
            continue;
        };
        let replacement_load = state.load(&replacement.id);

        if (current_load as i64) - (replacement_load as i64) < ctx.config.load_tolerance {
            continue;
        }
        // Certified non-chiefs are placed after this pass, so the guard only
        // matters on days none of them can cover.
        let covered_later = ctx.available_on(day).any(|c| c.certified && !c.chief);
        if !covered_later && !ctx.keeps_certified_coverage(state, day, current, replacement) {
            continue;
        }
        if state.replace(day, &current.id, &replacement.id) {
            debug!(
                %day,
                from = %current.id,
                to = %replacement.id,
                current_load,
                replacement_load,
                "chief swap"
            );
            swaps += 1;
        }
    }
    swaps
}
