use std::collections::HashSet;
use tracing::debug;

use super::context::BuildContext;
use super::report::{CadetGroup, CoverageGap};
use super::working_state::WorkingState;
use crate::cadet::Cadet;

/// Walk the day list once and place one member of `candidates` on each day.
///
/// Round-robin: a cadet used in the current cycle is skipped while an unused
/// assignable one exists, and the cycle restarts once everybody has been
/// placed. When only used cadets are assignable the first of them is taken.
pub(crate) fn assign_group(
    ctx: &BuildContext<'_>,
    state: &mut WorkingState,
    group: CadetGroup,
    candidates: &[&Cadet],
    gaps: &mut Vec<CoverageGap>,
) {
    if candidates.is_empty() {
        return;
    }
    let mut used: HashSet<&str> = HashSet::with_capacity(candidates.len());

    for &day in &ctx.days {
        if used.len() >= candidates.len() {
            used.clear();
        }

        let mut assignable = candidates
            .iter()
            .filter(|c| ctx.is_available(&c.id, day) && !state.is_assigned(day, &c.id))
            .peekable();
        let Some(&&first) = assignable.peek() else {
            debug!(%day, group = group.as_str(), "no assignable cadet");
            gaps.push(CoverageGap { date: day, group });
            continue;
        };
        let chosen = assignable
            .find(|c| !used.contains(c.id.as_str()))
            .copied()
            .unwrap_or(first);

        state.assign(day, &chosen.id);
        used.insert(chosen.id.as_str());
    }
}
