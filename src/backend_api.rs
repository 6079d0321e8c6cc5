use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::resource::{FetchError, JsonSource, fetch_json};

/// Client for the first-party analytics backend.
#[derive(Clone)]
pub struct BackendClient {
    source: Arc<dyn JsonSource>,
    base: String,
    debug: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MyTeam {
    #[serde(default)]
    pub picks: Vec<MyTeamPick>,
    #[serde(default)]
    pub picks_last_updated: Option<String>,
    #[serde(default)]
    pub chips: Vec<MyTeamChip>,
    #[serde(default)]
    pub transfers: Option<MyTeamTransfers>,
}

/// Draft pick with the player's type and prices attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MyTeamPick {
    pub element: u32,
    pub position: u8,
    #[serde(default)]
    pub multiplier: u8,
    #[serde(default)]
    pub is_captain: bool,
    #[serde(default)]
    pub is_vice_captain: bool,
    #[serde(default)]
    pub element_type: u8,
    /// Tenths of a million.
    #[serde(default)]
    pub selling_price: u32,
    #[serde(default)]
    pub purchase_price: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MyTeamChip {
    pub name: String,
    #[serde(default)]
    pub status_for_entry: String,
    #[serde(default)]
    pub played_by_entry: Vec<u32>,
    #[serde(default)]
    pub start_event: Option<u32>,
    #[serde(default)]
    pub stop_event: Option<u32>,
    #[serde(default)]
    pub is_pending: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MyTeamTransfers {
    #[serde(default)]
    pub cost: i32,
    #[serde(default)]
    pub status: String,
    /// Free-transfer cap this gameweek; absent under unlimited-transfer chips.
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub made: u32,
    #[serde(default)]
    pub bank: i64,
    #[serde(default)]
    pub value: i64,
}

impl MyTeamTransfers {
    pub fn free_transfers(&self) -> Option<u32> {
        self.limit.map(|limit| limit.saturating_sub(self.made))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionPlayer {
    pub player_id: u32,
    #[serde(default)]
    pub player_name: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub position: String,
    /// Expected points.
    pub xp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormPlayer {
    pub player_id: u32,
    pub player_name: String,
    #[serde(default)]
    pub team: String,
    pub last4_points: i32,
    #[serde(default)]
    pub last4_minutes: u32,
    #[serde(default, rename = "xG")]
    pub xg: Option<f64>,
    #[serde(default, rename = "xA")]
    pub xa: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandwagonPlayer {
    pub player_id: u32,
    pub player_name: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub transfers_in: i64,
    #[serde(default)]
    pub transfers_out: i64,
    #[serde(default)]
    pub transfers_balance: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerFixtures {
    pub player_id: u32,
    #[serde(default)]
    pub player_name: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub fixtures: Vec<PlayerFixture>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerFixture {
    #[serde(default)]
    pub opponent: String,
    pub opponent_short: String,
    pub is_home: bool,
    #[serde(default)]
    pub difficulty: Option<u8>,
    #[serde(default)]
    pub kickoff_time: Option<String>,
}

impl BackendClient {
    pub fn new(source: Arc<dyn JsonSource>, base: impl Into<String>, debug: bool) -> Self {
        Self {
            source,
            base: base.into().trim_end_matches('/').to_string(),
            debug,
        }
    }

    pub fn my_team(&self) -> Result<MyTeam, FetchError> {
        self.get("/api/files/my_team")
    }

    pub fn predictions(&self, gameweek: u32) -> Result<Vec<PredictionPlayer>, FetchError> {
        self.get(&format!("/api/airsenal/gw/{gameweek}/predictions"))
    }

    pub fn form_last4(&self) -> Result<Vec<FormPlayer>, FetchError> {
        self.get("/api/airsenal/form_last4")
    }

    pub fn bandwagons(&self) -> Result<Vec<BandwagonPlayer>, FetchError> {
        self.get("/api/files/bandwagons")
    }

    pub fn fixtures_by_player(&self, gameweek: u32) -> Result<Vec<PlayerFixtures>, FetchError> {
        self.get(&format!("/api/airsenal/gw/{gameweek}/fixtures_by_player"))
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        fetch_json(self.source.as_ref(), &self.url(path), self.debug)
    }
}
