use crate::backend_api::MyTeamTransfers;
use crate::model::{ChipKind, GameweekHistory, ManagerEntry};
use crate::squad::SquadEntry;

/// Upstream authoritative total next to our own recomputation. Informational
/// only: the authoritative figure is what gets displayed as GW points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciliation {
    pub authoritative: i32,
    pub manual: i32,
    /// manual − authoritative
    pub difference: i32,
}

impl Reconciliation {
    pub fn has_discrepancy(&self) -> bool {
        self.difference != 0
    }

    pub fn difference_label(&self) -> String {
        if self.difference > 0 {
            format!("+{}", self.difference)
        } else {
            self.difference.to_string()
        }
    }
}

pub fn reconcile(authoritative: i32, manual: i32) -> Reconciliation {
    Reconciliation {
        authoritative,
        manual,
        difference: manual - authoritative,
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GwStats {
    pub gameweek: u32,
    pub points: i32,
    pub reconciliation: Option<Reconciliation>,
    pub total_points: Option<i32>,
    pub rank: Option<u64>,
    pub overall_rank: Option<u64>,
    pub bench_points: Option<i32>,
    pub transfers: u32,
    pub transfer_cost: i32,
    /// Millions.
    pub team_value: Option<f64>,
    /// Millions.
    pub bank: Option<f64>,
    pub free_transfers: Option<u32>,
    pub active_chip: Option<ChipKind>,
}

/// Starters score raw × multiplier; reserves add raw × 1 only under bench boost.
pub fn manual_points(squad: &[SquadEntry], bench_boost: bool) -> i32 {
    squad
        .iter()
        .map(|p| {
            if !p.is_bench {
                p.raw_points * i32::from(p.multiplier)
            } else if bench_boost {
                p.raw_points
            } else {
                0
            }
        })
        .sum()
}

pub fn tenths_to_millions(tenths: i64) -> f64 {
    tenths as f64 / 10.0
}

/// Stats for a gameweek that has started. `record` is the upstream
/// per-gameweek history row when one was returned.
pub fn historical_stats(
    gameweek: u32,
    record: Option<&GameweekHistory>,
    squad: &[SquadEntry],
    active_chip: Option<ChipKind>,
) -> GwStats {
    let manual = manual_points(squad, active_chip == Some(ChipKind::BenchBoost));

    let Some(record) = record else {
        let derived: f64 = squad.iter().filter(|p| !p.is_bench).map(|p| p.points).sum();
        return GwStats {
            gameweek,
            points: derived.round() as i32,
            active_chip,
            ..GwStats::default()
        };
    };

    GwStats {
        gameweek,
        points: record.points,
        reconciliation: Some(reconcile(record.points, manual)),
        total_points: Some(record.total_points),
        rank: record.rank,
        overall_rank: record.overall_rank,
        bench_points: Some(record.points_on_bench),
        transfers: record.event_transfers,
        transfer_cost: record.event_transfers_cost,
        team_value: Some(tenths_to_millions(record.value)),
        bank: Some(tenths_to_millions(record.bank)),
        free_transfers: None,
        active_chip,
    }
}

/// Stats for the upcoming gameweek: nothing has been scored yet.
pub fn planning_stats(
    gameweek: u32,
    transfers: Option<&MyTeamTransfers>,
    entry: Option<&ManagerEntry>,
) -> GwStats {
    let fallback_value = entry.and_then(|e| e.last_deadline_value);
    let fallback_bank = entry.and_then(|e| e.last_deadline_bank);

    GwStats {
        gameweek,
        total_points: entry.and_then(|e| e.summary_overall_points).map(|p| p as i32),
        overall_rank: entry.and_then(|e| e.summary_overall_rank),
        transfers: transfers.map(|t| t.made).unwrap_or(0),
        transfer_cost: transfers.map(|t| t.cost).unwrap_or(0),
        team_value: transfers
            .map(|t| t.value)
            .filter(|v| *v > 0)
            .or(fallback_value)
            .map(tenths_to_millions),
        bank: transfers.map(|t| t.bank).or(fallback_bank).map(tenths_to_millions),
        free_transfers: transfers.and_then(MyTeamTransfers::free_transfers),
        ..GwStats::default()
    }
}
