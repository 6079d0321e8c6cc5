use chrono::{DateTime, FixedOffset, Utc};

use crate::backend_api::MyTeamChip;
use crate::gw_stats::GwStats;
use crate::model::{ChipKind, EntryHistory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipState {
    pub kind: ChipKind,
    pub available: bool,
    /// Gameweek the chip was last played in.
    pub used_in: Option<u32>,
    /// Queued for the upcoming deadline.
    pub pending: bool,
}

impl ChipState {
    pub fn describe(&self) -> String {
        match (self.pending, self.used_in, self.available) {
            (true, _, _) => "Active".to_string(),
            (false, Some(gw), _) => format!("Used in GW{gw}"),
            (false, None, true) => "Available".to_string(),
            (false, None, false) => "Not available".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamStatus {
    pub gameweek: u32,
    pub chips: Vec<ChipState>,
    pub free_transfers: Option<u32>,
    pub bank: Option<f64>,
    pub team_value: Option<f64>,
    pub deadline: Option<DateTime<FixedOffset>>,
}

impl TeamStatus {
    pub fn from_parts(
        stats: &GwStats,
        chips: Vec<ChipState>,
        deadline: Option<DateTime<FixedOffset>>,
    ) -> Self {
        Self {
            gameweek: stats.gameweek,
            chips,
            free_transfers: stats.free_transfers,
            bank: stats.bank,
            team_value: stats.team_value,
            deadline,
        }
    }

    pub fn deadline_label(&self, now: DateTime<Utc>) -> String {
        match self.deadline {
            Some(deadline) => deadline_countdown(deadline, now),
            None => "-".to_string(),
        }
    }
}

/// Chip availability from the backend draft when it lists chips, otherwise
/// inferred from the entry's usage history.
pub fn chip_states(backend: &[MyTeamChip], history: &EntryHistory) -> Vec<ChipState> {
    if backend.is_empty() {
        return ChipKind::ALL
            .iter()
            .map(|&kind| {
                let used_in = history
                    .chips
                    .iter()
                    .filter(|c| ChipKind::from_api_name(&c.name) == Some(kind))
                    .map(|c| c.event)
                    .max();
                ChipState {
                    kind,
                    available: used_in.is_none(),
                    used_in,
                    pending: false,
                }
            })
            .collect();
    }

    ChipKind::ALL
        .iter()
        .map(|&kind| {
            let chip = backend
                .iter()
                .find(|c| ChipKind::from_api_name(&c.name) == Some(kind));
            match chip {
                Some(c) => ChipState {
                    kind,
                    available: c.status_for_entry == "available",
                    used_in: c.played_by_entry.iter().copied().max(),
                    pending: c.is_pending || c.status_for_entry == "active",
                },
                None => ChipState {
                    kind,
                    available: false,
                    used_in: None,
                    pending: false,
                },
            }
        })
        .collect()
}

/// `2d 5h`, `7h`, or `Passed` once the deadline is behind `now`.
pub fn deadline_countdown(deadline: DateTime<FixedOffset>, now: DateTime<Utc>) -> String {
    let remaining = deadline.with_timezone(&Utc) - now;
    if remaining <= chrono::Duration::zero() {
        return "Passed".to_string();
    }
    let hours = remaining.num_hours();
    let days = hours / 24;
    if days > 0 {
        format!("{days}d {}h", hours % 24)
    } else {
        format!("{hours}h")
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::model::ChipUsage;

    fn at(raw: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(raw).expect("valid timestamp")
    }

    #[test]
    fn countdown_formats() {
        let now = Utc.with_ymd_and_hms(2024, 2, 22, 6, 0, 0).single().expect("valid");
        assert_eq!(deadline_countdown(at("2024-02-24T11:30:00Z"), now), "2d 5h");
        assert_eq!(deadline_countdown(at("2024-02-22T13:10:00Z"), now), "7h");
        assert_eq!(deadline_countdown(at("2024-02-22T05:00:00Z"), now), "Passed");
    }

    #[test]
    fn history_fallback_marks_used_chips() {
        let history = EntryHistory {
            chips: vec![ChipUsage {
                name: "wildcard".to_string(),
                time: String::new(),
                event: 8,
            }],
            ..EntryHistory::default()
        };
        let states = chip_states(&[], &history);
        assert_eq!(states.len(), 4);
        assert_eq!(states[0].kind, ChipKind::Wildcard);
        assert!(!states[0].available);
        assert_eq!(states[0].describe(), "Used in GW8");
        assert!(states[2].available);
    }

    #[test]
    fn backend_chips_take_priority() {
        let backend = vec![
            MyTeamChip {
                name: "bboost".to_string(),
                status_for_entry: "available".to_string(),
                played_by_entry: Vec::new(),
                start_event: Some(1),
                stop_event: Some(19),
                is_pending: false,
            },
            MyTeamChip {
                name: "3xc".to_string(),
                status_for_entry: "active".to_string(),
                played_by_entry: Vec::new(),
                start_event: Some(1),
                stop_event: Some(19),
                is_pending: true,
            },
        ];
        let history = EntryHistory::default();
        let states = chip_states(&backend, &history);
        assert!(!states[0].available);
        assert!(states[2].available);
        assert_eq!(states[3].describe(), "Active");
    }
}
