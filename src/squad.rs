use std::collections::HashMap;

use crate::backend_api::MyTeamPick;
use crate::difficulty::{DifficultyBand, Precedence, classify_opponent};
use crate::fpl_api::{DEFAULT_PHOTO_SIZE, player_photo_url};
use crate::model::{Catalog, Fixture, Pick, PlayerStatus, Position, STARTING_SLOTS};

/// Pick shape shared by the historical picks endpoint and the backend draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquadPick {
    pub element: u32,
    pub slot: u8,
    pub multiplier: u8,
    pub is_captain: bool,
    pub is_vice_captain: bool,
    pub element_type: Option<u8>,
    pub selling_price: Option<u32>,
    pub purchase_price: Option<u32>,
}

impl SquadPick {
    pub fn is_reserve(&self) -> bool {
        self.slot > STARTING_SLOTS
    }
}

impl From<&Pick> for SquadPick {
    fn from(pick: &Pick) -> Self {
        Self {
            element: pick.element,
            slot: pick.position,
            multiplier: pick.multiplier,
            is_captain: pick.is_captain,
            is_vice_captain: pick.is_vice_captain,
            element_type: None,
            selling_price: None,
            purchase_price: None,
        }
    }
}

impl From<&MyTeamPick> for SquadPick {
    fn from(pick: &MyTeamPick) -> Self {
        Self {
            element: pick.element,
            slot: pick.position,
            multiplier: pick.multiplier,
            is_captain: pick.is_captain,
            is_vice_captain: pick.is_vice_captain,
            element_type: Some(pick.element_type).filter(|t| *t > 0),
            selling_price: Some(pick.selling_price),
            purchase_price: Some(pick.purchase_price),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SquadMode {
    /// A gameweek that has started: points are live score times multiplier.
    Historical,
    /// The upcoming gameweek: points are expectations, or zero.
    Planning,
}

pub struct SquadContext<'a> {
    pub catalog: &'a Catalog,
    pub gameweek: u32,
    pub mode: SquadMode,
    pub live: Option<&'a HashMap<u32, i32>>,
    pub fixtures: &'a [Fixture],
    pub predictions: Option<&'a HashMap<u32, f64>>,
    pub precedence: Precedence,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Opponent {
    pub team_id: u32,
    pub abbr: String,
    pub is_home: bool,
    /// Upstream 1–5 rating for the squad member's side of the fixture.
    pub difficulty: Option<u8>,
    pub band: DifficultyBand,
    pub kickoff: Option<String>,
}

impl Opponent {
    pub fn label(&self) -> String {
        let venue = if self.is_home { "H" } else { "A" };
        format!("{} ({venue})", self.abbr)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SquadEntry {
    pub player_id: u32,
    pub name: String,
    pub position: Position,
    pub team_id: Option<u32>,
    pub team_abbr: String,
    pub photo_url: Option<String>,
    pub slot: u8,
    pub multiplier: u8,
    pub is_captain: bool,
    pub is_vice_captain: bool,
    pub is_bench: bool,
    /// Live score before the multiplier.
    pub raw_points: i32,
    /// What the pitch shows: multiplied live score, or expected points when planning.
    pub points: f64,
    pub expected_points: Option<f64>,
    pub opponents: Vec<Opponent>,
    pub status: PlayerStatus,
    pub news: String,
    pub chance_of_playing: Option<u8>,
    pub selling_price: Option<u32>,
    pub purchase_price: Option<u32>,
}

impl SquadEntry {
    pub fn opponents_label(&self) -> String {
        if self.opponents.is_empty() {
            return self.team_abbr.clone();
        }
        self.opponents
            .iter()
            .map(Opponent::label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub fn build_squad(picks: &[SquadPick], ctx: &SquadContext<'_>) -> Vec<SquadEntry> {
    let mut ordered: Vec<&SquadPick> = picks.iter().collect();
    // Stable: equal slots keep their upstream order.
    ordered.sort_by_key(|p| p.slot);

    let opponents = opponents_by_team(ctx.fixtures, ctx.catalog, ctx.gameweek, ctx.precedence);
    ordered
        .into_iter()
        .map(|pick| build_entry(pick, ctx, &opponents))
        .collect()
}

fn build_entry(
    pick: &SquadPick,
    ctx: &SquadContext<'_>,
    opponents: &HashMap<u32, Vec<Opponent>>,
) -> SquadEntry {
    let player = ctx.catalog.player(pick.element);
    let team_id = player.map(|p| p.team);
    let team_abbr = team_id
        .map(|id| ctx.catalog.team_abbr(id).to_string())
        .unwrap_or_else(|| "???".to_string());

    let position = match (player, pick.element_type) {
        (Some(p), _) => p.position(),
        (None, Some(element_type)) => Position::from_element_type(element_type),
        (None, None) => Position::Unknown,
    };

    let raw_points = ctx
        .live
        .and_then(|live| live.get(&pick.element).copied())
        .unwrap_or(0);
    let expected_points = ctx
        .predictions
        .and_then(|xp| xp.get(&pick.element).copied());
    let points = match ctx.mode {
        SquadMode::Historical => f64::from(raw_points * i32::from(pick.multiplier)),
        SquadMode::Planning => expected_points.unwrap_or(0.0),
    };

    SquadEntry {
        player_id: pick.element,
        name: player
            .map(|p| p.web_name.clone())
            .unwrap_or_else(|| format!("#{}", pick.element)),
        position,
        team_id,
        team_abbr,
        photo_url: player.and_then(|p| player_photo_url(p.code, DEFAULT_PHOTO_SIZE)),
        slot: pick.slot,
        multiplier: pick.multiplier,
        is_captain: pick.is_captain,
        is_vice_captain: pick.is_vice_captain,
        is_bench: pick.is_reserve(),
        raw_points,
        points,
        expected_points,
        opponents: team_id
            .and_then(|id| opponents.get(&id).cloned())
            .unwrap_or_default(),
        status: player.map(|p| p.status()).unwrap_or(PlayerStatus::Unknown),
        news: player.map(|p| p.news.clone()).unwrap_or_default(),
        chance_of_playing: player.and_then(|p| p.chance_of_playing()),
        selling_price: pick.selling_price,
        purchase_price: pick.purchase_price,
    }
}

/// Team id to every opponent it faces in `gameweek`; double gameweeks yield
/// several entries in kickoff order.
pub fn opponents_by_team(
    fixtures: &[Fixture],
    catalog: &Catalog,
    gameweek: u32,
    precedence: Precedence,
) -> HashMap<u32, Vec<Opponent>> {
    let mut in_gameweek: Vec<&Fixture> = fixtures
        .iter()
        .filter(|f| f.event == Some(gameweek))
        .collect();
    in_gameweek.sort_by(|a, b| a.kickoff_time.cmp(&b.kickoff_time).then(a.id.cmp(&b.id)));

    let opponent = |team_id: u32, is_home: bool, difficulty: Option<u8>, f: &Fixture| {
        let abbr = catalog.team_abbr(team_id).to_string();
        Opponent {
            team_id,
            band: classify_opponent(&abbr, difficulty, precedence),
            abbr,
            is_home,
            difficulty,
            kickoff: f.kickoff_time.clone(),
        }
    };

    let mut out: HashMap<u32, Vec<Opponent>> = HashMap::new();
    for f in in_gameweek {
        out.entry(f.team_h)
            .or_default()
            .push(opponent(f.team_a, true, f.team_h_difficulty, f));
        out.entry(f.team_a)
            .or_default()
            .push(opponent(f.team_h, false, f.team_a_difficulty, f));
    }
    out
}

pub fn starters(squad: &[SquadEntry]) -> impl Iterator<Item = &SquadEntry> {
    squad.iter().filter(|p| !p.is_bench)
}

pub fn bench(squad: &[SquadEntry]) -> impl Iterator<Item = &SquadEntry> {
    squad.iter().filter(|p| p.is_bench)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::model::{Player, Team};

    fn player(id: u32, team: u32, element_type: u8, name: &str) -> Player {
        Player {
            id,
            code: id * 10,
            web_name: name.to_string(),
            first_name: String::new(),
            second_name: String::new(),
            team,
            element_type,
            now_cost: 50,
            total_points: 0,
            status: "a".to_string(),
            news: String::new(),
            chance_of_playing_next_round: None,
            chance_of_playing_this_round: None,
        }
    }

    fn team(id: u32, short: &str) -> Team {
        Team {
            id,
            code: id + 100,
            name: short.to_string(),
            short_name: short.to_string(),
            strength: None,
        }
    }

    fn pick(element: u32, slot: u8, multiplier: u8) -> SquadPick {
        SquadPick {
            element,
            slot,
            multiplier,
            is_captain: multiplier >= 2,
            is_vice_captain: false,
            element_type: None,
            selling_price: None,
            purchase_price: None,
        }
    }

    fn catalog() -> Catalog {
        let mut c = Catalog::default();
        for p in [player(1, 1, 3, "Salah"), player(2, 2, 4, "Haaland")] {
            c.players.insert(p.id, p);
        }
        for t in [team(1, "LIV"), team(2, "MCI"), team(3, "SOU")] {
            c.teams.insert(t.id, t);
        }
        c
    }

    fn fixture(id: u32, event: u32, h: u32, a: u32, kickoff: &str) -> Fixture {
        Fixture {
            id,
            event: Some(event),
            team_h: h,
            team_a: a,
            team_h_score: None,
            team_a_score: None,
            kickoff_time: Some(kickoff.to_string()),
            finished: false,
            started: Some(false),
            team_h_difficulty: Some(2),
            team_a_difficulty: Some(4),
        }
    }

    fn ctx<'a>(
        catalog: &'a Catalog,
        mode: SquadMode,
        live: Option<&'a HashMap<u32, i32>>,
        fixtures: &'a [Fixture],
        predictions: Option<&'a HashMap<u32, f64>>,
    ) -> SquadContext<'a> {
        SquadContext {
            catalog,
            gameweek: 25,
            mode,
            live,
            fixtures,
            predictions,
            precedence: Precedence::Upstream,
        }
    }

    #[test]
    fn starters_precede_reserves_and_ties_keep_input_order() {
        let catalog = catalog();
        let picks = vec![pick(2, 12, 0), pick(1, 6, 1), pick(9, 6, 1), pick(7, 1, 1)];
        let squad = build_squad(&picks, &ctx(&catalog, SquadMode::Historical, None, &[], None));
        let order: Vec<(u8, u32)> = squad.iter().map(|e| (e.slot, e.player_id)).collect();
        assert_eq!(order, vec![(1, 7), (6, 1), (6, 9), (12, 2)]);
        assert!(squad[3].is_bench);
        assert_eq!(starters(&squad).count(), 3);
        assert_eq!(bench(&squad).count(), 1);
    }

    #[test]
    fn captain_points_are_multiplied() {
        let catalog = catalog();
        let live = HashMap::from([(1, 9)]);
        let squad = build_squad(
            &[pick(1, 6, 2)],
            &ctx(&catalog, SquadMode::Historical, Some(&live), &[], None),
        );
        assert_eq!(squad[0].raw_points, 9);
        assert_eq!(squad[0].points, 18.0);
        assert!(squad[0].is_captain);
    }

    #[test]
    fn planning_points_use_expectations_or_zero() {
        let catalog = catalog();
        let xp = HashMap::from([(1, 6.5)]);
        let squad = build_squad(
            &[pick(1, 1, 2), pick(2, 2, 1)],
            &ctx(&catalog, SquadMode::Planning, None, &[], Some(&xp)),
        );
        assert_eq!(squad[0].points, 6.5);
        assert_eq!(squad[1].points, 0.0);
        assert_eq!(squad[1].expected_points, None);
    }

    #[test]
    fn unknown_player_gets_placeholder() {
        let catalog = catalog();
        let mut draft = pick(404, 3, 1);
        draft.element_type = Some(2);
        let squad = build_squad(
            &[pick(405, 4, 1), draft],
            &ctx(&catalog, SquadMode::Historical, None, &[], None),
        );
        assert_eq!(squad[0].name, "#404");
        assert_eq!(squad[0].position, Position::Defender);
        assert_eq!(squad[1].name, "#405");
        assert_eq!(squad[1].position, Position::Unknown);
        assert_eq!(squad[1].team_abbr, "???");
        assert!(squad[1].photo_url.is_none());
    }

    #[test]
    fn double_gameweek_lists_both_opponents() {
        let catalog = catalog();
        let fixtures = vec![
            fixture(11, 25, 3, 1, "2024-02-27T19:45:00Z"),
            fixture(10, 25, 1, 2, "2024-02-24T15:00:00Z"),
            fixture(12, 26, 1, 3, "2024-03-02T15:00:00Z"),
        ];
        let squad = build_squad(
            &[pick(1, 1, 1)],
            &ctx(&catalog, SquadMode::Planning, None, &fixtures, None),
        );
        let opponents = &squad[0].opponents;
        assert_eq!(opponents.len(), 2);
        assert_eq!(opponents[0].label(), "MCI (H)");
        assert_eq!(opponents[0].difficulty, Some(2));
        assert_eq!(opponents[1].label(), "SOU (A)");
        assert_eq!(opponents[1].band, DifficultyBand::Hard);
        assert_eq!(squad[0].opponents_label(), "MCI (H), SOU (A)");
    }
}
