use std::fs;
use std::path::PathBuf;

use fpl_terminal::difficulty::{DifficultyBand, Precedence};
use fpl_terminal::fixtures_view::{
    FixtureOrder, FixtureRow, build_fixture_rows, display_offset, group_fixtures,
};
use fpl_terminal::gw_stats::{historical_stats, manual_points};
use fpl_terminal::injuries::squad_injuries;
use fpl_terminal::model::{Bootstrap, Catalog, Fixture, LiveResponse, PicksResponse};
use fpl_terminal::squad::{
    SquadContext, SquadEntry, SquadMode, SquadPick, bench, build_squad, starters,
};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn catalog() -> Catalog {
    let bootstrap: Bootstrap =
        serde_json::from_str(&read_fixture("bootstrap.json")).expect("bootstrap should parse");
    Catalog::from_bootstrap(&bootstrap)
}

fn gw25_fixtures() -> Vec<Fixture> {
    serde_json::from_str(&read_fixture("fixtures_gw25.json")).expect("fixtures should parse")
}

fn gw25_picks() -> PicksResponse {
    serde_json::from_str(&read_fixture("picks_gw25.json")).expect("picks should parse")
}

fn gw25_squad(catalog: &Catalog, fixtures: &[Fixture]) -> Vec<SquadEntry> {
    let live: LiveResponse =
        serde_json::from_str(&read_fixture("live_gw25.json")).expect("live should parse");
    let scores = live.scores();
    let picks: Vec<SquadPick> = gw25_picks().picks.iter().map(SquadPick::from).collect();
    build_squad(
        &picks,
        &SquadContext {
            catalog,
            gameweek: 25,
            mode: SquadMode::Historical,
            live: Some(&scores),
            fixtures,
            predictions: None,
            precedence: Precedence::Upstream,
        },
    )
}

fn ids(rows: &[FixtureRow]) -> Vec<u32> {
    rows.iter().map(|r| r.id).collect()
}

#[test]
fn squad_is_ordered_by_slot_with_reserves_last() {
    let catalog = catalog();
    let squad = gw25_squad(&catalog, &gw25_fixtures());

    let slots: Vec<u8> = squad.iter().map(|p| p.slot).collect();
    assert_eq!(slots, (1..=15).collect::<Vec<u8>>());
    assert_eq!(starters(&squad).count(), 11);
    assert!(bench(&squad).all(|p| p.slot > 11));
}

#[test]
fn captain_contributes_double_points() {
    let catalog = catalog();
    let squad = gw25_squad(&catalog, &gw25_fixtures());

    let salah = squad.iter().find(|p| p.player_id == 6).expect("salah picked");
    assert!(salah.is_captain);
    assert_eq!(salah.slot, 6);
    assert_eq!(salah.raw_points, 9);
    assert_eq!(salah.points, 18.0);
    assert!(squad.iter().find(|p| p.player_id == 7).is_some_and(|p| p.is_vice_captain));
}

#[test]
fn upstream_total_is_kept_when_picks_disagree() {
    let catalog = catalog();
    let squad = gw25_squad(&catalog, &gw25_fixtures());

    assert_eq!(manual_points(&squad, false), 62);
    assert_eq!(manual_points(&squad, true), 68);

    let picks = gw25_picks();
    let stats = historical_stats(25, picks.entry_history.as_ref(), &squad, picks.active_chip());
    assert_eq!(stats.points, 58);
    let rec = stats.reconciliation.expect("record present");
    assert_eq!((rec.authoritative, rec.manual, rec.difference), (58, 62, 4));
    assert!(rec.has_discrepancy());
    assert_eq!(rec.difference_label(), "+4");
    assert_eq!(stats.bench_points, Some(6));
    assert_eq!(stats.transfer_cost, 4);
    assert_eq!(stats.bank, Some(0.5));
    assert_eq!(stats.team_value, Some(101.2));
}

#[test]
fn opponents_carry_side_and_band() {
    let catalog = catalog();
    let squad = gw25_squad(&catalog, &gw25_fixtures());

    let salah = squad.iter().find(|p| p.player_id == 6).expect("salah picked");
    assert_eq!(salah.opponents_label(), "BOU (H)");
    assert_eq!(salah.opponents[0].band, DifficultyBand::Easy);

    let haaland = squad.iter().find(|p| p.player_id == 10).expect("haaland picked");
    assert_eq!(haaland.opponents_label(), "ARS (A)");
    assert_eq!(haaland.opponents[0].band, DifficultyBand::Hard);
}

#[test]
fn injuries_list_most_doubtful_first() {
    let catalog = catalog();
    let squad = gw25_squad(&catalog, &gw25_fixtures());

    let injuries = squad_injuries(&squad);
    let names: Vec<&str> = injuries.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Solanke", "Alexander-Arnold", "Haaland"]);
    assert_eq!(injuries[0].chance, Some(0));
    assert!(injuries[0].news.contains("Knee"));
}

#[test]
fn fixtures_group_by_day_in_both_orders() {
    let catalog = catalog();
    let rows = build_fixture_rows(&gw25_fixtures(), &catalog, display_offset(0));

    let oldest = group_fixtures(&rows, FixtureOrder::OldestFirst);
    let labels: Vec<&str> = oldest.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, ["Sat 1 Feb", "Sun 2 Feb"]);
    assert_eq!(ids(&oldest[0].fixtures), [252]);
    assert_eq!(ids(&oldest[1].fixtures), [253, 251]);

    let newest = group_fixtures(&rows, FixtureOrder::NewestFirst);
    let labels: Vec<&str> = newest.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, ["Sun 2 Feb", "Sat 1 Feb"]);
    assert_eq!(ids(&newest[0].fixtures), [251, 253]);

    let twice = FixtureOrder::NewestFirst.toggle().toggle();
    assert_eq!(group_fixtures(&rows, twice), newest);
}

#[test]
fn display_offset_moves_late_kickoffs_to_the_next_day() {
    let catalog = catalog();
    let rows = build_fixture_rows(&gw25_fixtures(), &catalog, display_offset(10));

    let groups = group_fixtures(&rows, FixtureOrder::OldestFirst);
    let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, ["Sun 2 Feb", "Mon 3 Feb"]);
    assert_eq!(ids(&groups[1].fixtures), [253, 251]);

    let arsenal_city = rows.iter().find(|r| r.id == 251).expect("fixture 251");
    assert_eq!(arsenal_city.centre_label(), "5 - 1");
    assert_eq!(arsenal_city.home_abbr, "ARS");
}
