use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::balance::DayBalance;
use crate::cadet::CadetId;

/// Which greedy pass a coverage gap came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CadetGroup {
    Chiefs,
    CertifiedNonChiefs,
    GeneralPool,
}

impl CadetGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            CadetGroup::Chiefs => "chiefs",
            CadetGroup::CertifiedNonChiefs => "certified_non_chiefs",
            CadetGroup::GeneralPool => "general_pool",
        }
    }
}

/// A day on which a greedy pass found nobody assignable from its group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageGap {
    pub date: NaiveDate,
    pub group: CadetGroup,
}

/// Diagnostics returned next to every built schedule. None of these are
/// errors; they describe how far the heuristic got.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildReport {
    pub working_days: usize,
    pub uncovered_days: Vec<NaiveDate>,
    pub days_without_chief: Vec<NaiveDate>,
    pub days_without_certified: Vec<NaiveDate>,
    pub coverage_gaps: Vec<CoverageGap>,
    pub chief_swaps: usize,
    pub rebalance_sweeps: usize,
    pub rebalance_swaps: usize,
    pub balanced: bool,
    pub unbalanced_days: Vec<DayBalance>,
    pub cadet_loads: BTreeMap<CadetId, usize>,
}

impl BuildReport {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("days={}", self.working_days));
        parts.push(format!("balanced={}", self.balanced));
        parts.push(format!("sweeps={}", self.rebalance_sweeps));
        if self.rebalance_swaps + self.chief_swaps > 0 {
            parts.push(format!("swaps={}", self.rebalance_swaps + self.chief_swaps));
        }
        if !self.uncovered_days.is_empty() {
            parts.push(format!("uncovered={}", self.uncovered_days.len()));
        }
        if !self.days_without_chief.is_empty() {
            parts.push(format!("no_chief={}", self.days_without_chief.len()));
        }
        if !self.days_without_certified.is_empty() {
            parts.push(format!("no_certified={}", self.days_without_certified.len()));
        }
        if !self.unbalanced_days.is_empty() {
            parts.push(format!("unbalanced={}", self.unbalanced_days.len()));
        }
        if let (Some(min), Some(max)) = (
            self.cadet_loads.values().min(),
            self.cadet_loads.values().max(),
        ) {
            parts.push(format!("load={min}..{max}"));
        }
        parts.join(", ")
    }
}
