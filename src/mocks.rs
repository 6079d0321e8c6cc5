//! Deterministic stand-in data shown while loading and after a failed load.

use std::collections::HashMap;

use chrono::FixedOffset;

use crate::backend_api::{BandwagonPlayer, FormPlayer};
use crate::chips::{ChipState, TeamStatus};
use crate::difficulty::Precedence;
use crate::fixtures_view::{FixtureOrder, build_fixture_rows, parse_kickoff};
use crate::gw_stats::{GwStats, historical_stats};
use crate::injuries::squad_injuries;
use crate::loader::{CommandCenterData, GameweekInfo, ManagerInfo, OverviewData, SquadSource};
use crate::model::{Catalog, ChipKind, Fixture, GameweekHistory, Player, Team};
use crate::squad::{SquadContext, SquadMode, SquadPick, build_squad};

pub const MOCK_GAMEWEEK: u32 = 25;
const MOCK_DEADLINE: &str = "2024-02-24T11:30:00Z";
const MOCK_NEXT_DEADLINE: &str = "2024-03-02T11:30:00Z";

const TEAMS: &[(u32, &str, &str)] = &[
    (1, "Arsenal", "ARS"),
    (2, "Liverpool", "LIV"),
    (3, "Man Utd", "MUN"),
    (4, "Chelsea", "CHE"),
    (5, "West Ham", "WHU"),
    (6, "Man City", "MCI"),
    (7, "Aston Villa", "AVL"),
    (8, "Spurs", "TOT"),
    (9, "Everton", "EVE"),
    (10, "Newcastle", "NEW"),
    (11, "Nott'm Forest", "NFO"),
    (12, "Brentford", "BRE"),
    (13, "Bournemouth", "BOU"),
];

// id, name, team, element type, price, raw GW points, expected next GW
const PLAYERS: &[(u32, &str, u32, u8, u32, i32, f64)] = &[
    (1, "Raya", 1, 1, 55, 6, 4.2),
    (2, "Alexander-Arnold", 2, 2, 70, 12, 5.8),
    (3, "Gabriel", 1, 2, 60, 8, 4.9),
    (4, "Dalot", 3, 2, 50, 2, 3.1),
    (5, "Saka", 1, 3, 100, 3, 6.4),
    (6, "Salah", 2, 3, 130, 9, 7.9),
    (7, "Palmer", 4, 3, 105, 7, 6.1),
    (8, "Bowen", 5, 3, 75, 1, 4.4),
    (9, "Haaland", 6, 4, 150, 1, 7.2),
    (10, "Watkins", 7, 4, 90, 2, 5.0),
    (11, "Solanke", 8, 4, 75, 2, 4.3),
    (12, "Fabianski", 5, 1, 40, 2, 2.5),
    (13, "Branthwaite", 9, 2, 45, 3, 3.0),
    (14, "Gordon", 10, 3, 75, 1, 4.6),
    (15, "Wood", 11, 4, 60, 2, 3.9),
    (16, "Mbeumo", 12, 3, 78, 0, 5.6),
    (17, "Semenyo", 13, 3, 57, 0, 4.8),
];

fn catalog() -> Catalog {
    let mut catalog = Catalog::default();
    for &(id, name, short) in TEAMS {
        catalog.teams.insert(
            id,
            Team {
                id,
                code: 0,
                name: name.to_string(),
                short_name: short.to_string(),
                strength: None,
            },
        );
    }
    for &(id, name, team, element_type, price, _, _) in PLAYERS {
        let (status, news, chance) = match id {
            2 => ("d", "Knee injury", Some(50)),
            9 => ("d", "Ankle knock", Some(75)),
            _ => ("a", "", None),
        };
        catalog.players.insert(
            id,
            Player {
                id,
                code: 0,
                web_name: name.to_string(),
                first_name: String::new(),
                second_name: String::new(),
                team,
                element_type,
                now_cost: price,
                total_points: 0,
                status: status.to_string(),
                news: news.to_string(),
                chance_of_playing_next_round: chance,
                chance_of_playing_this_round: chance,
            },
        );
    }
    catalog
}

fn picks() -> Vec<SquadPick> {
    (1..=15u32)
        .map(|id| {
            let slot = id as u8;
            let price = PLAYERS.iter().find(|p| p.0 == id).map(|p| p.4);
            SquadPick {
                element: id,
                slot,
                multiplier: match slot {
                    6 => 2,
                    12.. => 0,
                    _ => 1,
                },
                is_captain: slot == 6,
                is_vice_captain: slot == 2,
                element_type: None,
                selling_price: price,
                purchase_price: price,
            }
        })
        .collect()
}

fn fixture(
    id: u32,
    event: u32,
    home: u32,
    away: u32,
    kickoff: &str,
    score: Option<(u8, u8)>,
) -> Fixture {
    Fixture {
        id,
        event: Some(event),
        team_h: home,
        team_a: away,
        team_h_score: score.map(|s| s.0),
        team_a_score: score.map(|s| s.1),
        kickoff_time: Some(kickoff.to_string()),
        finished: score.is_some(),
        started: Some(score.is_some()),
        team_h_difficulty: Some(3),
        team_a_difficulty: Some(3),
    }
}

fn manager() -> ManagerInfo {
    ManagerInfo {
        team_id: 0,
        team_name: "Demo XI".to_string(),
        manager_name: "Demo Manager".to_string(),
        overall_points: Some(1456),
        overall_rank: Some(1_234_567),
    }
}

/// GW25: upstream reports 58, the squad recomputes to 62.
pub fn mock_overview(offset: FixedOffset) -> OverviewData {
    let catalog = catalog();
    let scores: HashMap<u32, i32> = PLAYERS.iter().map(|p| (p.0, p.5)).collect();
    let fixtures = vec![
        fixture(1, MOCK_GAMEWEEK, 1, 2, "2024-02-24T15:00:00Z", Some((2, 1))),
        fixture(2, MOCK_GAMEWEEK, 4, 3, "2024-02-24T17:30:00Z", None),
        fixture(3, MOCK_GAMEWEEK, 6, 9, "2024-02-25T14:00:00Z", None),
    ];
    let squad = build_squad(
        &picks(),
        &SquadContext {
            catalog: &catalog,
            gameweek: MOCK_GAMEWEEK,
            mode: SquadMode::Historical,
            live: Some(&scores),
            fixtures: &fixtures,
            predictions: None,
            precedence: Precedence::Upstream,
        },
    );
    let record = GameweekHistory {
        event: MOCK_GAMEWEEK,
        points: 58,
        total_points: 1456,
        rank: Some(2_456_789),
        overall_rank: Some(1_234_567),
        bank: 5,
        value: 1023,
        event_transfers: 1,
        event_transfers_cost: 4,
        points_on_bench: 8,
    };
    let stats = historical_stats(MOCK_GAMEWEEK, Some(&record), &squad, None);

    OverviewData {
        manager: manager(),
        gameweek: GameweekInfo {
            gameweek: MOCK_GAMEWEEK,
            name: format!("Gameweek {MOCK_GAMEWEEK}"),
            deadline: parse_kickoff(MOCK_DEADLINE, offset),
            finished: false,
            is_current: true,
            average_score: Some(51),
            highest_score: Some(121),
        },
        current_gameweek: Some(MOCK_GAMEWEEK),
        injuries: squad_injuries(&squad),
        squad,
        stats,
        fixtures: build_fixture_rows(&fixtures, &catalog, offset),
        default_order: FixtureOrder::NewestFirst,
        active_chip: None,
        warnings: Vec::new(),
    }
}

/// Planning view for the gameweek after the mock overview.
pub fn mock_command_center(offset: FixedOffset, precedence: Precedence) -> CommandCenterData {
    let gameweek = MOCK_GAMEWEEK + 1;
    let catalog = catalog();
    let expected: HashMap<u32, f64> = PLAYERS.iter().map(|p| (p.0, p.6)).collect();
    let fixtures = vec![
        fixture(11, gameweek, 2, 11, "2024-03-02T12:30:00Z", None),
        fixture(12, gameweek, 10, 1, "2024-03-02T15:00:00Z", None),
        fixture(13, gameweek, 6, 3, "2024-03-03T15:30:00Z", None),
        fixture(14, gameweek, 5, 4, "2024-03-02T17:30:00Z", None),
        fixture(15, gameweek, 8, 7, "2024-03-03T14:00:00Z", None),
        fixture(16, gameweek, 9, 12, "2024-03-02T15:00:00Z", None),
        fixture(17, gameweek, 13, 5, "2024-03-04T20:00:00Z", None),
    ];
    let ctx = SquadContext {
        catalog: &catalog,
        gameweek,
        mode: SquadMode::Planning,
        live: None,
        fixtures: &fixtures,
        predictions: Some(&expected),
        precedence,
    };
    let squad = build_squad(&picks(), &ctx);
    let candidate_picks: Vec<SquadPick> = [16u32, 17]
        .iter()
        .map(|&id| {
            let price = catalog.player(id).map(|p| p.now_cost);
            SquadPick {
                element: id,
                slot: 0,
                multiplier: 1,
                is_captain: false,
                is_vice_captain: false,
                element_type: None,
                selling_price: price,
                purchase_price: price,
            }
        })
        .collect();
    let candidates = build_squad(&candidate_picks, &ctx);

    let stats = GwStats {
        gameweek,
        team_value: Some(102.3),
        bank: Some(0.5),
        free_transfers: Some(1),
        ..GwStats::default()
    };
    let chips = ChipKind::ALL
        .iter()
        .map(|&kind| ChipState {
            kind,
            available: kind != ChipKind::Wildcard,
            used_in: (kind == ChipKind::Wildcard).then_some(8),
            pending: false,
        })
        .collect();
    let deadline = parse_kickoff(MOCK_NEXT_DEADLINE, offset);

    CommandCenterData {
        manager: manager(),
        gameweek: GameweekInfo {
            gameweek,
            name: format!("Gameweek {gameweek}"),
            deadline,
            finished: false,
            is_current: false,
            average_score: None,
            highest_score: None,
        },
        injuries: squad_injuries(&squad),
        squad,
        squad_source: SquadSource::Backend,
        status: TeamStatus::from_parts(&stats, chips, deadline),
        stats,
        bank_tenths: 5,
        fixtures: build_fixture_rows(&fixtures, &catalog, offset),
        bandwagons: vec![
            bandwagon(16, "Mbeumo", "BRE", 412_300, 35_100),
            bandwagon(17, "Semenyo", "BOU", 198_700, 22_400),
        ],
        in_form: vec![
            form(16, "Mbeumo", "BRE", 38, 2.1, 1.2),
            form(6, "Salah", "LIV", 35, 2.8, 1.5),
        ],
        candidates,
        warnings: Vec::new(),
    }
}

fn bandwagon(
    id: u32,
    name: &str,
    team: &str,
    transfers_in: i64,
    transfers_out: i64,
) -> BandwagonPlayer {
    BandwagonPlayer {
        player_id: id,
        player_name: name.to_string(),
        team: team.to_string(),
        transfers_in,
        transfers_out,
        transfers_balance: transfers_in - transfers_out,
    }
}

fn form(id: u32, name: &str, team: &str, points: i32, xg: f64, xa: f64) -> FormPlayer {
    FormPlayer {
        player_id: id,
        player_name: name.to_string(),
        team: team.to_string(),
        last4_points: points,
        last4_minutes: 360,
        xg: Some(xg),
        xa: Some(xa),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures_view::display_offset;

    #[test]
    fn overview_mock_shows_the_discrepancy() {
        let data = mock_overview(display_offset(0));
        assert_eq!(data.squad.len(), 15);
        assert_eq!(data.stats.points, 58);
        let rec = data.stats.reconciliation.expect("reconciled");
        assert_eq!(rec.manual, 62);
        assert_eq!(rec.difference, 4);

        let captain = data.squad.iter().find(|p| p.is_captain).expect("captain");
        assert_eq!((captain.name.as_str(), captain.slot), ("Salah", 6));
        assert_eq!(captain.points, 18.0);
        assert_eq!(data.injuries.len(), 2);
    }

    #[test]
    fn command_center_mock_is_a_planning_view() {
        let data = mock_command_center(display_offset(0), Precedence::Upstream);
        assert_eq!(data.gameweek.gameweek, 26);
        assert!(data.squad.iter().all(|p| p.raw_points == 0));
        assert_eq!(data.squad[5].points, 7.9);
        assert_eq!(data.status.chips.len(), 4);
        assert_eq!(data.candidates.len(), 2);
        assert_eq!(data.squad[0].opponents_label(), "NEW (A)");
    }
}
