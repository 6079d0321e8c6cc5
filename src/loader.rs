//! Joins upstream responses into the data each screen renders.
//!
//! Independent requests fan out with `rayon::join`. Resources a screen cannot
//! do without fail the whole load; optional ones degrade to empty and leave a
//! warning behind.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, FixedOffset};

use crate::backend_api::{BackendClient, BandwagonPlayer, FormPlayer, MyTeam, PlayerFixtures};
use crate::chips::{TeamStatus, chip_states};
use crate::config::AppConfig;
use crate::difficulty::{Precedence, classify_opponent};
use crate::fixtures_view::{
    FixtureOrder, FixtureRow, build_fixture_rows, default_order, display_offset, parse_kickoff,
};
use crate::fpl_api::FplClient;
use crate::gw_stats::{GwStats, historical_stats, planning_stats};
use crate::injuries::{InjuryRow, squad_injuries};
use crate::market::{MARKET_LIST_LEN, in_form, top_bandwagons};
use crate::model::{Catalog, ChipKind, EntryHistory, Fixture, Gameweek, ManagerEntry};
use crate::resource::{FetchError, HttpSource, JsonSource};
use crate::squad::{Opponent, SquadContext, SquadEntry, SquadMode, SquadPick, build_squad};

#[derive(Clone)]
pub struct Apis {
    pub fpl: FplClient,
    pub backend: BackendClient,
}

impl Apis {
    pub fn new(source: Arc<dyn JsonSource>, config: &AppConfig) -> Self {
        Self {
            fpl: FplClient::new(source.clone(), config.fpl_base.clone(), config.debug),
            backend: BackendClient::new(source, config.backend_base.clone(), config.debug),
        }
    }

    pub fn http(config: &AppConfig) -> Result<Self> {
        let source = HttpSource::new(config.http_timeout)?;
        Ok(Self::new(Arc::new(source), config))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameweekTarget {
    Current,
    Specific(u32),
}

#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub offset: FixedOffset,
    pub precedence: Precedence,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            offset: display_offset(0),
            precedence: Precedence::Upstream,
        }
    }
}

impl LoadOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            offset: display_offset(config.utc_offset_hours),
            precedence: config.difficulty_precedence,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ManagerInfo {
    pub team_id: u64,
    pub team_name: String,
    pub manager_name: String,
    pub overall_points: Option<i64>,
    pub overall_rank: Option<u64>,
}

impl ManagerInfo {
    fn from_entry(team_id: u64, entry: &ManagerEntry) -> Self {
        Self {
            team_id,
            team_name: entry.name.clone(),
            manager_name: entry.manager_name(),
            overall_points: entry.summary_overall_points,
            overall_rank: entry.summary_overall_rank,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameweekInfo {
    pub gameweek: u32,
    pub name: String,
    pub deadline: Option<DateTime<FixedOffset>>,
    pub finished: bool,
    pub is_current: bool,
    pub average_score: Option<i32>,
    pub highest_score: Option<i32>,
}

impl GameweekInfo {
    fn new(gameweek: u32, event: Option<&Gameweek>, offset: FixedOffset) -> Self {
        Self {
            gameweek,
            name: event
                .map(|e| e.name.clone())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| format!("Gameweek {gameweek}")),
            deadline: event
                .and_then(|e| e.deadline_time.as_deref())
                .and_then(|raw| parse_kickoff(raw, offset)),
            finished: event.is_some_and(|e| e.finished),
            is_current: event.is_some_and(|e| e.is_current),
            average_score: event.and_then(|e| e.average_entry_score),
            highest_score: event.and_then(|e| e.highest_score),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverviewData {
    pub manager: ManagerInfo,
    pub gameweek: GameweekInfo,
    pub current_gameweek: Option<u32>,
    pub squad: Vec<SquadEntry>,
    pub stats: GwStats,
    pub fixtures: Vec<FixtureRow>,
    pub injuries: Vec<InjuryRow>,
    pub default_order: FixtureOrder,
    pub active_chip: Option<ChipKind>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SquadSource {
    /// Draft from the analytics backend.
    Backend,
    /// Backend unavailable: picks of this started gameweek instead.
    SportsApi(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommandCenterData {
    pub manager: ManagerInfo,
    pub gameweek: GameweekInfo,
    pub squad: Vec<SquadEntry>,
    pub squad_source: SquadSource,
    pub stats: GwStats,
    pub status: TeamStatus,
    /// Tenths of a million, the unit the sandbox works in.
    pub bank_tenths: i64,
    pub fixtures: Vec<FixtureRow>,
    pub injuries: Vec<InjuryRow>,
    pub bandwagons: Vec<BandwagonPlayer>,
    pub in_form: Vec<FormPlayer>,
    /// Transfer targets from the market lists, built like squad members.
    pub candidates: Vec<SquadEntry>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predictions {
    pub expected: HashMap<u32, f64>,
    pub fixtures_by_player: Vec<PlayerFixtures>,
    pub warnings: Vec<String>,
}

pub fn load_overview(
    apis: &Apis,
    team_id: u64,
    target: GameweekTarget,
    opts: &LoadOptions,
) -> Result<OverviewData> {
    let fpl = &apis.fpl;
    let (bootstrap, (entry, history)) = rayon::join(
        || fpl.bootstrap(),
        || rayon::join(|| fpl.entry(team_id), || fpl.entry_history(team_id)),
    );
    let bootstrap = bootstrap.context("load bootstrap-static")?;
    let entry = entry.with_context(|| format!("load entry {team_id}"))?;
    let mut warnings = Vec::new();
    let history = optional(history, "entry history", &mut warnings);

    let catalog = Catalog::from_bootstrap(&bootstrap);
    let current = catalog.latest_started_gameweek().map(|gw| gw.id);
    let gameweek = resolve_target(target, current)?;

    let (picks, (live, fixtures)) = rayon::join(
        || fpl.picks(team_id, gameweek),
        || rayon::join(|| fpl.live(gameweek), || fpl.fixtures(Some(gameweek))),
    );
    let picks = picks.with_context(|| format!("load picks for gameweek {gameweek}"))?;
    let live = optional(live, "live scores", &mut warnings);
    let fixtures: Vec<Fixture> = optional(fixtures, "fixtures", &mut warnings);

    let scores = live.scores();
    let squad_picks: Vec<SquadPick> = picks.picks.iter().map(SquadPick::from).collect();
    let squad = build_squad(
        &squad_picks,
        &SquadContext {
            catalog: &catalog,
            gameweek,
            mode: SquadMode::Historical,
            live: Some(&scores),
            fixtures: &fixtures,
            predictions: None,
            precedence: opts.precedence,
        },
    );

    let active_chip = picks.active_chip();
    let record = picks
        .entry_history
        .as_ref()
        .or_else(|| history.for_gameweek(gameweek));
    let stats = historical_stats(gameweek, record, &squad, active_chip);

    Ok(OverviewData {
        manager: ManagerInfo::from_entry(team_id, &entry),
        gameweek: GameweekInfo::new(gameweek, catalog.gameweek(gameweek), opts.offset),
        current_gameweek: current,
        injuries: squad_injuries(&squad),
        squad,
        stats,
        fixtures: build_fixture_rows(&fixtures, &catalog, opts.offset),
        default_order: default_order(gameweek, current),
        active_chip,
        warnings,
    })
}

pub fn load_command_center(
    apis: &Apis,
    team_id: u64,
    opts: &LoadOptions,
) -> Result<CommandCenterData> {
    let fpl = &apis.fpl;
    let backend = &apis.backend;
    let ((bootstrap, entry), (history, my_team)) = rayon::join(
        || rayon::join(|| fpl.bootstrap(), || fpl.entry(team_id)),
        || rayon::join(|| fpl.entry_history(team_id), || backend.my_team()),
    );
    let bootstrap = bootstrap.context("load bootstrap-static")?;
    let entry = entry.with_context(|| format!("load entry {team_id}"))?;
    let mut warnings = Vec::new();
    let history: EntryHistory = optional(history, "entry history", &mut warnings);
    let my_team: Option<MyTeam> = match my_team {
        Ok(team) if !team.picks.is_empty() => Some(team),
        Ok(_) => {
            warnings.push("backend my-team returned no picks".to_string());
            None
        }
        Err(err) => {
            warnings.push(format!("backend my-team unavailable: {err}"));
            None
        }
    };

    let catalog = Catalog::from_bootstrap(&bootstrap);
    let gameweek = catalog.planning_gameweek();

    let (squad_picks, squad_source) = match &my_team {
        Some(team) => (
            team.picks.iter().map(SquadPick::from).collect::<Vec<_>>(),
            SquadSource::Backend,
        ),
        None => {
            let latest = catalog
                .latest_started_gameweek()
                .map(|gw| gw.id)
                .ok_or_else(|| anyhow!("no squad: backend unavailable and no gameweek started"))?;
            let picks = fpl
                .picks(team_id, latest)
                .with_context(|| format!("load fallback picks for gameweek {latest}"))?;
            (
                picks.picks.iter().map(SquadPick::from).collect(),
                SquadSource::SportsApi(latest),
            )
        }
    };

    let ((fixtures, predictions), (form, bandwagons)) = rayon::join(
        || rayon::join(|| fpl.fixtures(Some(gameweek)), || load_predictions(backend, gameweek)),
        || rayon::join(|| backend.form_last4(), || backend.bandwagons()),
    );
    let fixtures: Vec<Fixture> = optional(fixtures, "fixtures", &mut warnings);
    let form: Vec<FormPlayer> = optional(form, "form", &mut warnings);
    let bandwagons: Vec<BandwagonPlayer> = optional(bandwagons, "bandwagons", &mut warnings);
    warnings.extend(predictions.warnings.iter().cloned());

    let ctx = SquadContext {
        catalog: &catalog,
        gameweek,
        mode: SquadMode::Planning,
        live: None,
        fixtures: &fixtures,
        predictions: Some(&predictions.expected),
        precedence: opts.precedence,
    };
    let mut squad = build_squad(&squad_picks, &ctx);
    fill_missing_opponents(&mut squad, &predictions.fixtures_by_player, opts.precedence);

    let bandwagons = top_bandwagons(&bandwagons, MARKET_LIST_LEN);
    let in_form = in_form(&form, MARKET_LIST_LEN);
    let candidates = market_candidates(&squad, &bandwagons, &in_form, &ctx);

    let transfers = my_team.as_ref().and_then(|t| t.transfers.as_ref());
    let stats = planning_stats(gameweek, transfers, Some(&entry));
    let bank_tenths = transfers
        .map(|t| t.bank)
        .or(entry.last_deadline_bank)
        .unwrap_or(0);
    let gameweek_info = GameweekInfo::new(gameweek, catalog.gameweek(gameweek), opts.offset);
    let chips = chip_states(
        my_team.as_ref().map(|t| t.chips.as_slice()).unwrap_or(&[]),
        &history,
    );

    Ok(CommandCenterData {
        manager: ManagerInfo::from_entry(team_id, &entry),
        status: TeamStatus::from_parts(&stats, chips, gameweek_info.deadline),
        gameweek: gameweek_info,
        injuries: squad_injuries(&squad),
        squad,
        squad_source,
        stats,
        bank_tenths,
        fixtures: build_fixture_rows(&fixtures, &catalog, opts.offset),
        bandwagons,
        in_form,
        candidates,
        warnings,
    })
}

/// Expected points and per-player fixtures for `gameweek`. Either half may
/// fail independently; gameweek 0 means nothing to predict.
pub fn load_predictions(backend: &BackendClient, gameweek: u32) -> Predictions {
    if gameweek == 0 {
        return Predictions::default();
    }
    let (predictions, fixtures_by_player) = rayon::join(
        || backend.predictions(gameweek),
        || backend.fixtures_by_player(gameweek),
    );
    let mut warnings = Vec::new();
    let expected = optional(predictions, "predictions", &mut warnings)
        .into_iter()
        .map(|p| (p.player_id, p.xp))
        .collect();
    let fixtures_by_player = optional(fixtures_by_player, "fixtures by player", &mut warnings);
    Predictions {
        expected,
        fixtures_by_player,
        warnings,
    }
}

fn resolve_target(target: GameweekTarget, current: Option<u32>) -> Result<u32> {
    let Some(current) = current else {
        bail!("no gameweek has started yet");
    };
    match target {
        GameweekTarget::Current => Ok(current),
        GameweekTarget::Specific(gw) if gw >= 1 && gw <= current => Ok(gw),
        GameweekTarget::Specific(gw) => {
            bail!("gameweek {gw} has not started (latest is {current})")
        }
    }
}

fn optional<T: Default>(
    result: std::result::Result<T, FetchError>,
    what: &str,
    warnings: &mut Vec<String>,
) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            warnings.push(format!("{what} unavailable: {err}"));
            T::default()
        }
    }
}

/// Backend fixture lists stand in when the sports API gave no fixtures for a player.
fn fill_missing_opponents(
    squad: &mut [SquadEntry],
    by_player: &[PlayerFixtures],
    precedence: Precedence,
) {
    for entry in squad.iter_mut().filter(|e| e.opponents.is_empty()) {
        let Some(listed) = by_player.iter().find(|p| p.player_id == entry.player_id) else {
            continue;
        };
        entry.opponents = listed
            .fixtures
            .iter()
            .map(|f| Opponent {
                team_id: 0,
                abbr: f.opponent_short.clone(),
                is_home: f.is_home,
                difficulty: f.difficulty,
                band: classify_opponent(&f.opponent_short, f.difficulty, precedence),
                kickoff: f.kickoff_time.clone(),
            })
            .collect();
    }
}

fn market_candidates(
    squad: &[SquadEntry],
    bandwagons: &[BandwagonPlayer],
    in_form: &[FormPlayer],
    ctx: &SquadContext<'_>,
) -> Vec<SquadEntry> {
    let mut ids: Vec<u32> = Vec::new();
    for id in bandwagons
        .iter()
        .map(|b| b.player_id)
        .chain(in_form.iter().map(|f| f.player_id))
    {
        let owned = squad.iter().any(|e| e.player_id == id);
        if !owned && !ids.contains(&id) && ctx.catalog.player(id).is_some() {
            ids.push(id);
        }
    }
    let picks: Vec<SquadPick> = ids
        .into_iter()
        .map(|element| {
            let player = ctx.catalog.player(element);
            SquadPick {
                element,
                slot: 0,
                multiplier: 1,
                is_captain: false,
                is_vice_captain: false,
                element_type: None,
                selling_price: player.map(|p| p.now_cost),
                purchase_price: player.map(|p| p.now_cost),
            }
        })
        .collect();
    build_squad(&picks, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_resolution() {
        assert_eq!(resolve_target(GameweekTarget::Current, Some(25)).ok(), Some(25));
        assert_eq!(resolve_target(GameweekTarget::Specific(3), Some(25)).ok(), Some(3));
        assert!(resolve_target(GameweekTarget::Specific(26), Some(25)).is_err());
        assert!(resolve_target(GameweekTarget::Specific(0), Some(25)).is_err());
        assert!(resolve_target(GameweekTarget::Current, None).is_err());
    }
}
