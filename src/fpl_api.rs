use std::sync::Arc;

use crate::model::{Bootstrap, EntryHistory, Fixture, LiveResponse, ManagerEntry, PicksResponse};
use crate::resource::{FetchError, JsonSource, fetch_json};

const RESOURCES_BASE: &str = "https://resources.premierleague.com/premierleague";

pub const DEFAULT_PHOTO_SIZE: &str = "110x140";
pub const DEFAULT_BADGE_SIZE: &str = "70";

/// Client for the public fantasy API. Every method is one GET.
#[derive(Clone)]
pub struct FplClient {
    source: Arc<dyn JsonSource>,
    base: String,
    debug: bool,
}

impl FplClient {
    pub fn new(source: Arc<dyn JsonSource>, base: impl Into<String>, debug: bool) -> Self {
        Self {
            source,
            base: base.into().trim_end_matches('/').to_string(),
            debug,
        }
    }

    pub fn bootstrap_url(&self) -> String {
        format!("{}/bootstrap-static/", self.base)
    }

    pub fn entry_url(&self, team_id: u64) -> String {
        format!("{}/entry/{team_id}/", self.base)
    }

    pub fn entry_history_url(&self, team_id: u64) -> String {
        format!("{}/entry/{team_id}/history/", self.base)
    }

    pub fn picks_url(&self, team_id: u64, gameweek: u32) -> String {
        format!("{}/entry/{team_id}/event/{gameweek}/picks/", self.base)
    }

    pub fn live_url(&self, gameweek: u32) -> String {
        format!("{}/event/{gameweek}/live/", self.base)
    }

    pub fn fixtures_url(&self, gameweek: Option<u32>) -> String {
        match gameweek {
            Some(gw) => format!("{}/fixtures/?event={gw}", self.base),
            None => format!("{}/fixtures/", self.base),
        }
    }

    pub fn bootstrap(&self) -> Result<Bootstrap, FetchError> {
        self.get(&self.bootstrap_url())
    }

    pub fn entry(&self, team_id: u64) -> Result<ManagerEntry, FetchError> {
        self.get(&self.entry_url(team_id))
    }

    pub fn entry_history(&self, team_id: u64) -> Result<EntryHistory, FetchError> {
        self.get(&self.entry_history_url(team_id))
    }

    pub fn picks(&self, team_id: u64, gameweek: u32) -> Result<PicksResponse, FetchError> {
        self.get(&self.picks_url(team_id, gameweek))
    }

    pub fn live(&self, gameweek: u32) -> Result<LiveResponse, FetchError> {
        self.get(&self.live_url(gameweek))
    }

    pub fn fixtures(&self, gameweek: Option<u32>) -> Result<Vec<Fixture>, FetchError> {
        self.get(&self.fixtures_url(gameweek))
    }

    fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        fetch_json(self.source.as_ref(), url, self.debug)
    }
}

/// Headshot URL keyed by the player's stable `code`, not the row id.
pub fn player_photo_url(code: u32, size: &str) -> Option<String> {
    if code == 0 {
        return None;
    }
    Some(format!("{RESOURCES_BASE}/photos/players/{size}/p{code}.png"))
}

/// Crest URL keyed by the team's stable `code`.
pub fn team_badge_url(code: u32, size: &str) -> Option<String> {
    if code == 0 {
        return None;
    }
    Some(format!("{RESOURCES_BASE}/badges/{size}/t{code}.png"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::resource::{FetchError, JsonSource};

    struct Unreachable;

    impl JsonSource for Unreachable {
        fn get_text(&self, url: &str) -> Result<String, FetchError> {
            Err(FetchError::Transport(url.to_string()))
        }
    }

    fn client() -> FplClient {
        FplClient::new(Arc::new(Unreachable), "https://example.test/api/", false)
    }

    #[test]
    fn endpoint_paths_match_upstream() {
        let c = client();
        assert_eq!(c.bootstrap_url(), "https://example.test/api/bootstrap-static/");
        assert_eq!(c.entry_url(42), "https://example.test/api/entry/42/");
        assert_eq!(
            c.entry_history_url(42),
            "https://example.test/api/entry/42/history/"
        );
        assert_eq!(
            c.picks_url(42, 25),
            "https://example.test/api/entry/42/event/25/picks/"
        );
        assert_eq!(c.live_url(25), "https://example.test/api/event/25/live/");
        assert_eq!(c.fixtures_url(None), "https://example.test/api/fixtures/");
        assert_eq!(
            c.fixtures_url(Some(26)),
            "https://example.test/api/fixtures/?event=26"
        );
    }

    #[test]
    fn image_urls_use_code_and_skip_zero() {
        assert_eq!(
            player_photo_url(118748, DEFAULT_PHOTO_SIZE).as_deref(),
            Some(
                "https://resources.premierleague.com/premierleague/photos/players/110x140/p118748.png"
            )
        );
        assert_eq!(
            team_badge_url(43, DEFAULT_BADGE_SIZE).as_deref(),
            Some("https://resources.premierleague.com/premierleague/badges/70/t43.png")
        );
        assert!(player_photo_url(0, DEFAULT_PHOTO_SIZE).is_none());
    }

    #[test]
    fn transport_errors_propagate() {
        let err = client().bootstrap().expect_err("unreachable");
        assert!(matches!(err, FetchError::Transport(_)));
    }
}
