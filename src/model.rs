use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Squad slots above this are reserves.
pub const STARTING_SLOTS: u8 = 11;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bootstrap {
    #[serde(default)]
    pub events: Vec<Gameweek>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub elements: Vec<Player>,
    #[serde(default)]
    pub element_types: Vec<ElementType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: u32,
    #[serde(default)]
    pub code: u32,
    pub name: String,
    pub short_name: String,
    #[serde(default)]
    pub strength: Option<u8>,
}

/// Catalog entry for one player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    #[serde(default)]
    pub code: u32,
    pub web_name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub second_name: String,
    pub team: u32,
    pub element_type: u8,
    #[serde(default)]
    pub now_cost: u32,
    #[serde(default)]
    pub total_points: i32,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub news: String,
    #[serde(default)]
    pub chance_of_playing_next_round: Option<u8>,
    #[serde(default)]
    pub chance_of_playing_this_round: Option<u8>,
}

impl Player {
    pub fn position(&self) -> Position {
        Position::from_element_type(self.element_type)
    }

    pub fn status(&self) -> PlayerStatus {
        PlayerStatus::from_code(&self.status)
    }

    /// Next-round chance when published, otherwise this round's.
    pub fn chance_of_playing(&self) -> Option<u8> {
        self.chance_of_playing_next_round
            .or(self.chance_of_playing_this_round)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementType {
    pub id: u8,
    #[serde(default)]
    pub singular_name: String,
    #[serde(default)]
    pub singular_name_short: String,
    #[serde(default)]
    pub plural_name: String,
    #[serde(default)]
    pub plural_name_short: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gameweek {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub deadline_time: Option<String>,
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub is_next: bool,
    #[serde(default)]
    pub average_entry_score: Option<i32>,
    #[serde(default)]
    pub highest_score: Option<i32>,
    #[serde(default)]
    pub chip_plays: Vec<ChipPlay>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChipPlay {
    pub chip_name: String,
    pub num_played: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerEntry {
    pub id: u64,
    /// Squad display name.
    pub name: String,
    #[serde(default)]
    pub player_first_name: String,
    #[serde(default)]
    pub player_last_name: String,
    #[serde(default)]
    pub summary_overall_points: Option<i64>,
    #[serde(default)]
    pub summary_overall_rank: Option<u64>,
    #[serde(default)]
    pub summary_event_points: Option<i64>,
    #[serde(default)]
    pub summary_event_rank: Option<u64>,
    #[serde(default)]
    pub current_event: Option<u32>,
    #[serde(default)]
    pub last_deadline_bank: Option<i64>,
    #[serde(default)]
    pub last_deadline_value: Option<i64>,
}

impl ManagerEntry {
    pub fn manager_name(&self) -> String {
        format!("{} {}", self.player_first_name, self.player_last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryHistory {
    #[serde(default)]
    pub current: Vec<GameweekHistory>,
    #[serde(default)]
    pub past: Vec<PastSeason>,
    #[serde(default)]
    pub chips: Vec<ChipUsage>,
}

impl EntryHistory {
    pub fn for_gameweek(&self, gameweek: u32) -> Option<&GameweekHistory> {
        self.current.iter().find(|h| h.event == gameweek)
    }
}

/// Authoritative per-gameweek record for one manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameweekHistory {
    pub event: u32,
    pub points: i32,
    #[serde(default)]
    pub total_points: i32,
    #[serde(default)]
    pub rank: Option<u64>,
    #[serde(default)]
    pub overall_rank: Option<u64>,
    /// Tenths of a million.
    #[serde(default)]
    pub bank: i64,
    /// Tenths of a million.
    #[serde(default)]
    pub value: i64,
    #[serde(default)]
    pub event_transfers: u32,
    #[serde(default)]
    pub event_transfers_cost: i32,
    #[serde(default)]
    pub points_on_bench: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PastSeason {
    pub season_name: String,
    pub total_points: i32,
    #[serde(default)]
    pub rank: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChipUsage {
    pub name: String,
    #[serde(default)]
    pub time: String,
    pub event: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PicksResponse {
    #[serde(default)]
    pub active_chip: Option<String>,
    #[serde(default)]
    pub automatic_subs: Vec<AutomaticSub>,
    #[serde(default)]
    pub entry_history: Option<GameweekHistory>,
    #[serde(default)]
    pub picks: Vec<Pick>,
}

impl PicksResponse {
    pub fn active_chip(&self) -> Option<ChipKind> {
        self.active_chip.as_deref().and_then(ChipKind::from_api_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomaticSub {
    pub entry: u64,
    pub element_in: u32,
    pub element_out: u32,
    pub event: u32,
}

/// A manager's selection of one player for one gameweek.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    pub element: u32,
    /// Squad slot, 1–15.
    pub position: u8,
    /// 0 not scoring, 1 normal, 2 captain, 3 triple captain.
    pub multiplier: u8,
    #[serde(default)]
    pub is_captain: bool,
    #[serde(default)]
    pub is_vice_captain: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LiveResponse {
    #[serde(default)]
    pub elements: Vec<LiveElement>,
}

impl LiveResponse {
    /// Raw gameweek points per player id, before any manager multiplier.
    pub fn scores(&self) -> HashMap<u32, i32> {
        self.elements
            .iter()
            .map(|e| (e.id, e.stats.total_points))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveElement {
    pub id: u32,
    pub stats: LiveStats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LiveStats {
    #[serde(default)]
    pub minutes: u32,
    #[serde(default)]
    pub goals_scored: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub bonus: u32,
    #[serde(default)]
    pub total_points: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    pub id: u32,
    #[serde(default)]
    pub event: Option<u32>,
    pub team_h: u32,
    pub team_a: u32,
    #[serde(default)]
    pub team_h_score: Option<u8>,
    #[serde(default)]
    pub team_a_score: Option<u8>,
    #[serde(default)]
    pub kickoff_time: Option<String>,
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub started: Option<bool>,
    #[serde(default)]
    pub team_h_difficulty: Option<u8>,
    #[serde(default)]
    pub team_a_difficulty: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
    Unknown,
}

impl Position {
    pub fn from_element_type(element_type: u8) -> Self {
        match element_type {
            1 => Position::Goalkeeper,
            2 => Position::Defender,
            3 => Position::Midfielder,
            4 => Position::Forward,
            _ => Position::Unknown,
        }
    }

    pub fn short_label(self) -> &'static str {
        match self {
            Position::Goalkeeper => "GKP",
            Position::Defender => "DEF",
            Position::Midfielder => "MID",
            Position::Forward => "FWD",
            Position::Unknown => "UNK",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerStatus {
    Available,
    Doubtful,
    Injured,
    Suspended,
    Unavailable,
    Unknown,
}

impl PlayerStatus {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "a" => PlayerStatus::Available,
            "d" => PlayerStatus::Doubtful,
            "i" => PlayerStatus::Injured,
            "s" => PlayerStatus::Suspended,
            "u" => PlayerStatus::Unavailable,
            _ => PlayerStatus::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlayerStatus::Available => "Available",
            PlayerStatus::Doubtful => "Doubtful",
            PlayerStatus::Injured => "Injured",
            PlayerStatus::Suspended => "Suspended",
            PlayerStatus::Unavailable => "Unavailable",
            PlayerStatus::Unknown => "Unknown",
        }
    }
}

/// The four one-time levers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChipKind {
    Wildcard,
    FreeHit,
    BenchBoost,
    TripleCaptain,
}

impl ChipKind {
    pub const ALL: [ChipKind; 4] = [
        ChipKind::Wildcard,
        ChipKind::FreeHit,
        ChipKind::BenchBoost,
        ChipKind::TripleCaptain,
    ];

    pub fn from_api_name(name: &str) -> Option<Self> {
        match name.trim() {
            "wildcard" => Some(ChipKind::Wildcard),
            "freehit" => Some(ChipKind::FreeHit),
            "bboost" => Some(ChipKind::BenchBoost),
            "3xc" => Some(ChipKind::TripleCaptain),
            _ => None,
        }
    }

    pub fn short_label(self) -> &'static str {
        match self {
            ChipKind::Wildcard => "WC",
            ChipKind::FreeHit => "FH",
            ChipKind::BenchBoost => "BB",
            ChipKind::TripleCaptain => "TC",
        }
    }
}

/// Lookup maps over one bootstrap response. Rebuilt on every fetch.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub players: HashMap<u32, Player>,
    pub teams: HashMap<u32, Team>,
    pub events: Vec<Gameweek>,
}

impl Catalog {
    pub fn from_bootstrap(bootstrap: &Bootstrap) -> Self {
        Self {
            players: bootstrap
                .elements
                .iter()
                .map(|p| (p.id, p.clone()))
                .collect(),
            teams: bootstrap.teams.iter().map(|t| (t.id, t.clone())).collect(),
            events: bootstrap.events.clone(),
        }
    }

    pub fn player(&self, id: u32) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn team(&self, id: u32) -> Option<&Team> {
        self.teams.get(&id)
    }

    pub fn team_abbr(&self, id: u32) -> &str {
        self.team(id).map(|t| t.short_name.as_str()).unwrap_or("???")
    }

    pub fn gameweek(&self, id: u32) -> Option<&Gameweek> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn current_gameweek(&self) -> Option<&Gameweek> {
        self.events.iter().find(|e| e.is_current)
    }

    pub fn next_gameweek(&self) -> Option<&Gameweek> {
        self.events.iter().find(|e| e.is_next)
    }

    /// The most recent gameweek that has begun: current, else the last finished one.
    pub fn latest_started_gameweek(&self) -> Option<&Gameweek> {
        self.current_gameweek()
            .or_else(|| self.events.iter().rev().find(|e| e.finished))
    }

    /// The gameweek a manager is planning for: the next one, or the one after
    /// the latest started gameweek at the end of a season.
    pub fn planning_gameweek(&self) -> u32 {
        if let Some(next) = self.next_gameweek() {
            return next.id;
        }
        self.latest_started_gameweek()
            .map(|gw| gw.id + 1)
            .unwrap_or(1)
    }
}
