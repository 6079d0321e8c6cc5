use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use fpl_terminal::difficulty::Precedence;
use fpl_terminal::fixtures_view::{
    FixtureOrder, build_fixture_rows, display_offset, group_fixtures,
};
use fpl_terminal::gw_stats::manual_points;
use fpl_terminal::mocks::{mock_command_center, mock_overview};
use fpl_terminal::model::{Bootstrap, Catalog, Fixture, LiveResponse, PicksResponse};
use fpl_terminal::sandbox::Sandbox;
use fpl_terminal::squad::{SquadContext, SquadMode, SquadPick, build_squad};

fn bench_bootstrap_parse(c: &mut Criterion) {
    c.bench_function("bootstrap_parse", |b| {
        b.iter(|| {
            let bootstrap: Bootstrap = serde_json::from_str(black_box(BOOTSTRAP_JSON)).unwrap();
            black_box(Catalog::from_bootstrap(&bootstrap).players.len());
        })
    });
}

fn bench_squad_build(c: &mut Criterion) {
    let bootstrap: Bootstrap = serde_json::from_str(BOOTSTRAP_JSON).unwrap();
    let catalog = Catalog::from_bootstrap(&bootstrap);
    let picks: PicksResponse = serde_json::from_str(PICKS_JSON).unwrap();
    let picks: Vec<SquadPick> = picks.picks.iter().map(SquadPick::from).collect();
    let live: LiveResponse = serde_json::from_str(LIVE_JSON).unwrap();
    let scores = live.scores();
    let fixtures: Vec<Fixture> = serde_json::from_str(FIXTURES_JSON).unwrap();

    c.bench_function("squad_build", |b| {
        b.iter(|| {
            let squad = build_squad(
                black_box(&picks),
                &SquadContext {
                    catalog: &catalog,
                    gameweek: 25,
                    mode: SquadMode::Historical,
                    live: Some(&scores),
                    fixtures: &fixtures,
                    predictions: None,
                    precedence: Precedence::Upstream,
                },
            );
            black_box(manual_points(&squad, false));
        })
    });
}

fn bench_fixture_grouping(c: &mut Criterion) {
    let bootstrap: Bootstrap = serde_json::from_str(BOOTSTRAP_JSON).unwrap();
    let catalog = Catalog::from_bootstrap(&bootstrap);
    let base: Vec<Fixture> = serde_json::from_str(FIXTURES_JSON).unwrap();
    // A full season's worth of rows spread over many matchdays.
    let mut fixtures = Vec::new();
    for round in 0..38u32 {
        for (i, f) in base.iter().enumerate() {
            let mut f = f.clone();
            f.id = round * 10 + i as u32;
            f.kickoff_time = Some(format!("2025-{:02}-{:02}T15:00:00Z", 1 + round % 12, 1 + round % 28));
            fixtures.push(f);
        }
    }
    let rows = build_fixture_rows(&fixtures, &catalog, display_offset(1));

    c.bench_function("fixture_grouping", |b| {
        b.iter(|| {
            let groups = group_fixtures(black_box(&rows), FixtureOrder::NewestFirst);
            black_box(groups.len());
        })
    });
}

fn bench_mock_views(c: &mut Criterion) {
    c.bench_function("mock_views", |b| {
        b.iter(|| {
            let overview = mock_overview(display_offset(0));
            let plan = mock_command_center(display_offset(0), Precedence::Upstream);
            black_box((overview.squad.len(), plan.candidates.len()));
        })
    });
}

fn bench_sandbox_undo(c: &mut Criterion) {
    let plan = mock_command_center(display_offset(0), Precedence::Upstream);
    let incoming = plan.candidates.clone();

    c.bench_function("sandbox_undo", |b| {
        b.iter(|| {
            let mut sandbox = Sandbox::new(plan.squad.clone(), plan.bank_tenths + 100);
            for (out, candidate) in [8u32, 14].iter().zip(incoming.iter()) {
                let _ = sandbox.transfer(*out, candidate.clone());
            }
            let _ = sandbox.auto_captain();
            while sandbox.undo() {}
            black_box(sandbox.delta());
        })
    });
}

criterion_group!(
    perf,
    bench_bootstrap_parse,
    bench_squad_build,
    bench_fixture_grouping,
    bench_mock_views,
    bench_sandbox_undo
);
criterion_main!(perf);

static BOOTSTRAP_JSON: &str = include_str!("../tests/fixtures/bootstrap.json");
static PICKS_JSON: &str = include_str!("../tests/fixtures/picks_gw25.json");
static LIVE_JSON: &str = include_str!("../tests/fixtures/live_gw25.json");
static FIXTURES_JSON: &str = include_str!("../tests/fixtures/fixtures_gw25.json");
