use anyhow::{Context, Result};

use fpl_terminal::config::AppConfig;
use fpl_terminal::fixtures_view::group_fixtures;
use fpl_terminal::loader::{Apis, GameweekTarget, LoadOptions, load_command_center, load_overview};
use fpl_terminal::session::parse_team_id;
use fpl_terminal::squad::{bench, starters};

fn main() -> Result<()> {
    let config = AppConfig::load();
    let raw_id = std::env::args()
        .nth(1)
        .or_else(|| config.preset_team_id.clone())
        .context("usage: gw_snapshot <team id> [gameweek] (or set FPL_TEAM_ID)")?;
    let team_id = parse_team_id(&raw_id)?;
    let target = match std::env::args().nth(2) {
        Some(gw) => GameweekTarget::Specific(
            gw.trim()
                .parse::<u32>()
                .with_context(|| format!("bad gameweek {gw:?}"))?,
        ),
        None => GameweekTarget::Current,
    };
    let with_plan = std::env::var("SNAPSHOT_PLAN")
        .ok()
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);

    let apis = Apis::http(&config)?;
    let opts = LoadOptions::from_config(&config);

    let overview = load_overview(&apis, team_id, target, &opts)
        .with_context(|| format!("load overview for team {team_id}"))?;
    println!(
        "{} ({}) GW{}",
        overview.manager.team_name, overview.manager.manager_name, overview.gameweek.gameweek
    );
    let stats = &overview.stats;
    match &stats.reconciliation {
        Some(rec) if rec.has_discrepancy() => println!(
            "points={} picks_sum={} diff={}",
            stats.points,
            rec.manual,
            rec.difference_label()
        ),
        _ => println!("points={}", stats.points),
    }

    println!("Starting XI:");
    for p in starters(&overview.squad) {
        let armband = if p.is_captain { " (C)" } else { "" };
        println!(
            "  {:>2} {} {}{armband} {} x{} = {}",
            p.slot,
            p.position.short_label(),
            p.name,
            p.raw_points,
            p.multiplier,
            p.points
        );
    }
    println!("Bench:");
    for p in bench(&overview.squad) {
        println!("  {:>2} {} {} {}", p.slot, p.position.short_label(), p.name, p.raw_points);
    }

    println!("Fixtures ({}):", overview.default_order.label());
    for group in group_fixtures(&overview.fixtures, overview.default_order) {
        println!("  {}", group.label);
        for f in &group.fixtures {
            println!("    {} {} {}", f.home_abbr, f.centre_label(), f.away_abbr);
        }
    }
    for warning in &overview.warnings {
        eprintln!("warning: {warning}");
    }

    if with_plan {
        let plan = load_command_center(&apis, team_id, &opts)
            .with_context(|| format!("load planning view for team {team_id}"))?;
        println!("Planning GW{} ({:?})", plan.gameweek.gameweek, plan.squad_source);
        for p in &plan.squad {
            let xp = p
                .expected_points
                .map(|x| format!("{x:.1}"))
                .unwrap_or_else(|| "-".to_string());
            println!("  {} {} xP {xp} vs {}", p.position.short_label(), p.name, p.opponents_label());
        }
        for warning in &plan.warnings {
            eprintln!("warning: {warning}");
        }
    }
    Ok(())
}
