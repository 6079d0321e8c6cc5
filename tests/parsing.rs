use std::fs;
use std::path::PathBuf;

use fpl_terminal::backend_api::{BandwagonPlayer, FormPlayer, MyTeam, PredictionPlayer};
use fpl_terminal::model::{
    Bootstrap, Catalog, ChipKind, EntryHistory, Fixture, LiveResponse, ManagerEntry,
    PicksResponse, PlayerStatus, Position,
};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_bootstrap_into_catalog() {
    let bootstrap: Bootstrap =
        serde_json::from_str(&read_fixture("bootstrap.json")).expect("bootstrap should parse");
    let catalog = Catalog::from_bootstrap(&bootstrap);

    assert_eq!(catalog.teams.len(), 6);
    assert_eq!(catalog.players.len(), 17);
    assert_eq!(catalog.team_abbr(5), "MCI");
    assert_eq!(catalog.team_abbr(99), "???");

    let salah = catalog.player(6).expect("salah in catalog");
    assert_eq!(salah.web_name, "M.Salah");
    assert_eq!(salah.position(), Position::Midfielder);

    let solanke = catalog.player(15).expect("solanke in catalog");
    assert_eq!(solanke.status(), PlayerStatus::Injured);
    assert_eq!(solanke.chance_of_playing(), Some(0));

    assert_eq!(catalog.latest_started_gameweek().map(|g| g.id), Some(25));
    assert_eq!(catalog.planning_gameweek(), 26);
}

#[test]
fn parses_entry_and_history() {
    let entry: ManagerEntry =
        serde_json::from_str(&read_fixture("entry.json")).expect("entry should parse");
    assert_eq!(entry.name, "Moneyball XI");
    assert_eq!(entry.manager_name(), "Sam Taylor");
    assert_eq!(entry.last_deadline_bank, Some(5));

    let history: EntryHistory =
        serde_json::from_str(&read_fixture("entry_history.json")).expect("history should parse");
    let gw25 = history.for_gameweek(25).expect("gw25 row");
    assert_eq!(gw25.points, 58);
    assert_eq!(gw25.event_transfers_cost, 4);
    assert!(history.for_gameweek(26).is_none());
    assert_eq!(history.chips.len(), 1);
    assert_eq!(ChipKind::from_api_name(&history.chips[0].name), Some(ChipKind::Wildcard));
}

#[test]
fn parses_picks_and_live_scores() {
    let picks: PicksResponse =
        serde_json::from_str(&read_fixture("picks_gw25.json")).expect("picks should parse");
    assert_eq!(picks.picks.len(), 15);
    assert_eq!(picks.active_chip(), None);
    let captain = picks.picks.iter().find(|p| p.is_captain).expect("a captain");
    assert_eq!((captain.element, captain.position, captain.multiplier), (6, 6, 2));
    assert_eq!(picks.entry_history.as_ref().map(|h| h.points), Some(58));

    let live: LiveResponse =
        serde_json::from_str(&read_fixture("live_gw25.json")).expect("live should parse");
    let scores = live.scores();
    assert_eq!(scores.get(&6), Some(&9));
    assert_eq!(scores.get(&10), Some(&13));
}

#[test]
fn parses_fixtures_with_difficulty() {
    let fixtures: Vec<Fixture> =
        serde_json::from_str(&read_fixture("fixtures_gw26.json")).expect("fixtures should parse");
    assert_eq!(fixtures.len(), 3);
    let city_liverpool = &fixtures[0];
    assert_eq!((city_liverpool.team_h, city_liverpool.team_a), (5, 4));
    assert_eq!(city_liverpool.team_h_score, None);
    assert_eq!(city_liverpool.team_a_difficulty, Some(4));
}

#[test]
fn parses_backend_payloads() {
    let my_team: MyTeam =
        serde_json::from_str(&read_fixture("my_team.json")).expect("my team should parse");
    assert_eq!(my_team.picks.len(), 15);
    assert_eq!(my_team.chips.len(), 4);
    let transfers = my_team.transfers.as_ref().expect("transfers block");
    assert_eq!(transfers.free_transfers(), Some(1));

    let predictions: Vec<PredictionPlayer> =
        serde_json::from_str(&read_fixture("predictions_gw26.json"))
            .expect("predictions should parse");
    assert!(predictions.iter().any(|p| p.player_id == 10 && p.xp > 8.0));

    let form: Vec<FormPlayer> =
        serde_json::from_str(&read_fixture("form_last4.json")).expect("form should parse");
    assert_eq!(form[0].xg, Some(2.9));

    let bandwagons: Vec<BandwagonPlayer> =
        serde_json::from_str(&read_fixture("bandwagons.json")).expect("bandwagons should parse");
    assert_eq!(bandwagons[2].transfers_balance, -187_518);
}
