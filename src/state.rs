use std::collections::VecDeque;

use chrono::FixedOffset;

use crate::difficulty::Precedence;
use crate::fixtures_view::FixtureOrder;
use crate::loader::{CommandCenterData, GameweekTarget, LoadOptions, OverviewData};
use crate::mocks::{mock_command_center, mock_overview};
use crate::sandbox::Sandbox;
use crate::squad::SquadEntry;

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Overview,
    CommandCenter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

impl LoadStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadStatus::Loading)
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            LoadStatus::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// One screen's data plus the bookkeeping needed to ignore late responses.
#[derive(Debug, Clone)]
pub struct Panel<T> {
    pub status: LoadStatus,
    pub data: Option<T>,
    /// True while `data` is the stand-in rather than a real load.
    pub using_mock: bool,
    generation: u64,
}

impl<T> Default for Panel<T> {
    fn default() -> Self {
        Self {
            status: LoadStatus::Idle,
            data: None,
            using_mock: false,
            generation: 0,
        }
    }
}

impl<T> Panel<T> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.status = LoadStatus::Loading;
        self.generation
    }

    fn reset(&mut self) {
        self.generation += 1;
        self.status = LoadStatus::Idle;
        self.data = None;
        self.using_mock = false;
    }
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    LoadOverview {
        team_id: u64,
        target: GameweekTarget,
        generation: u64,
    },
    LoadCommandCenter {
        team_id: u64,
        generation: u64,
    },
}

#[derive(Debug, Clone)]
pub enum Delta {
    OverviewLoaded {
        generation: u64,
        data: Box<OverviewData>,
    },
    OverviewFailed {
        generation: u64,
        message: String,
    },
    CommandCenterLoaded {
        generation: u64,
        data: Box<CommandCenterData>,
    },
    CommandCenterFailed {
        generation: u64,
        message: String,
    },
    Log(String),
}

#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub team_id: Option<u64>,
    pub login_input: String,
    pub login_error: Option<String>,
    pub overview: Panel<OverviewData>,
    pub command_center: Panel<CommandCenterData>,
    pub overview_target: GameweekTarget,
    /// Latest started gameweek from the last real overview. Survives a
    /// failed load so navigation can still step away from it.
    pub latest_gameweek: Option<u32>,
    pub fixture_order: FixtureOrder,
    pub sandbox: Sandbox,
    /// Row in the sandbox squad.
    pub selected: usize,
    /// Row in the transfer-candidate list.
    pub candidate_selected: usize,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
    offset: FixedOffset,
    precedence: Precedence,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(LoadOptions::default())
    }
}

impl AppState {
    pub fn new(opts: LoadOptions) -> Self {
        Self {
            screen: Screen::Login,
            team_id: None,
            login_input: String::new(),
            login_error: None,
            overview: Panel::default(),
            command_center: Panel::default(),
            overview_target: GameweekTarget::Current,
            latest_gameweek: None,
            fixture_order: FixtureOrder::NewestFirst,
            sandbox: Sandbox::default(),
            selected: 0,
            candidate_selected: 0,
            help_overlay: false,
            logs: VecDeque::new(),
            offset: opts.offset,
            precedence: opts.precedence,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    /// Enter the authenticated screens for `team_id`.
    pub fn sign_in(&mut self, team_id: u64) {
        self.team_id = Some(team_id);
        self.login_input.clear();
        self.login_error = None;
        self.screen = Screen::Overview;
        self.push_log(format!("[INFO] Signed in as team {team_id}"));
    }

    /// Back to the login screen. In-flight loads for the old team are
    /// orphaned by the generation bump.
    pub fn sign_out(&mut self) {
        self.team_id = None;
        self.screen = Screen::Login;
        self.overview.reset();
        self.command_center.reset();
        self.overview_target = GameweekTarget::Current;
        self.latest_gameweek = None;
        self.sandbox = Sandbox::default();
        self.selected = 0;
        self.candidate_selected = 0;
        self.push_log("[INFO] Signed out");
    }

    pub fn request_overview(&mut self, target: GameweekTarget) -> Option<ProviderCommand> {
        let team_id = self.team_id?;
        self.overview_target = target;
        let generation = self.overview.begin();
        if self.overview.data.is_none() {
            self.overview.data = Some(mock_overview(self.offset));
            self.overview.using_mock = true;
        }
        Some(ProviderCommand::LoadOverview {
            team_id,
            target,
            generation,
        })
    }

    pub fn request_command_center(&mut self) -> Option<ProviderCommand> {
        let team_id = self.team_id?;
        let generation = self.command_center.begin();
        if self.command_center.data.is_none() {
            let mock = mock_command_center(self.offset, self.precedence);
            self.sandbox = Sandbox::new(mock.squad.clone(), mock.bank_tenths);
            self.command_center.data = Some(mock);
            self.command_center.using_mock = true;
        }
        Some(ProviderCommand::LoadCommandCenter {
            team_id,
            generation,
        })
    }

    /// Step the overview one gameweek back or forward, never past the
    /// latest started one. Works from the requested target, so a failed
    /// load can be stepped away from.
    pub fn step_gameweek(&mut self, step: i32) -> Option<ProviderCommand> {
        let latest = i64::from(self.latest_gameweek?);
        let shown = match self.overview_target {
            GameweekTarget::Current => latest,
            GameweekTarget::Specific(gw) => i64::from(gw),
        };
        let wanted = (shown + i64::from(step)).clamp(1, latest.max(1));
        if wanted == shown {
            return None;
        }
        let target = if wanted == latest {
            GameweekTarget::Current
        } else {
            GameweekTarget::Specific(wanted as u32)
        };
        self.request_overview(target)
    }

    pub fn toggle_fixture_order(&mut self) {
        self.fixture_order = self.fixture_order.toggle();
    }

    pub fn select_next(&mut self) {
        let total = self.sandbox.squad().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % total;
    }

    pub fn select_prev(&mut self) {
        let total = self.sandbox.squad().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        if self.selected == 0 {
            self.selected = total - 1;
        } else {
            self.selected -= 1;
        }
    }

    pub fn cycle_candidate(&mut self) {
        let total = self.candidates().len();
        self.candidate_selected = if total == 0 {
            0
        } else {
            (self.candidate_selected + 1) % total
        };
    }

    pub fn candidates(&self) -> &[SquadEntry] {
        self.command_center
            .data
            .as_ref()
            .map(|d| d.candidates.as_slice())
            .unwrap_or(&[])
    }

    pub fn selected_player(&self) -> Option<&SquadEntry> {
        self.sandbox.squad().get(self.selected)
    }

    pub fn sandbox_captain_selected(&mut self) {
        let Some(id) = self.selected_player().map(|p| p.player_id) else {
            return;
        };
        let name = self.player_name(id);
        match self.sandbox.set_captain(id) {
            Ok(()) => self.push_log(format!("[INFO] Sandbox captain: {name}")),
            Err(err) => self.push_log(format!("[WARN] {err}")),
        }
    }

    pub fn sandbox_auto_captain(&mut self) {
        match self.sandbox.auto_captain() {
            Ok(Some(id)) => {
                let name = self.player_name(id);
                self.push_log(format!("[INFO] Auto-captain: {name}"));
            }
            Ok(None) => self.push_log("[WARN] No starter to captain"),
            Err(err) => self.push_log(format!("[WARN] {err}")),
        }
    }

    pub fn sandbox_transfer_selected(&mut self) {
        let Some(out) = self.selected_player().map(|p| p.player_id) else {
            return;
        };
        let Some(incoming) = self.candidates().get(self.candidate_selected).cloned() else {
            self.push_log("[WARN] No transfer candidates loaded");
            return;
        };
        let out_name = self.player_name(out);
        let in_name = incoming.name.clone();
        match self.sandbox.transfer(out, incoming) {
            Ok(()) => self.push_log(format!("[INFO] Sandbox transfer: {out_name} -> {in_name}")),
            Err(err) => self.push_log(format!("[WARN] {err}")),
        }
    }

    pub fn sandbox_undo(&mut self) {
        if self.sandbox.undo() {
            self.push_log("[INFO] Sandbox: undid last change");
        }
    }

    pub fn sandbox_reset(&mut self) {
        self.sandbox.reset();
        self.push_log("[INFO] Sandbox reset");
    }

    fn player_name(&self, id: u32) -> String {
        self.sandbox
            .squad()
            .iter()
            .find(|p| p.player_id == id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("#{id}"))
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::OverviewLoaded { generation, data } => {
            if generation != state.overview.generation() {
                state.push_log("[INFO] Dropped stale overview response");
                return;
            }
            for warning in &data.warnings {
                state.push_log(format!("[WARN] {warning}"));
            }
            state.push_log(format!(
                "[INFO] Loaded GW{} for {}",
                data.gameweek.gameweek, data.manager.team_name
            ));
            state.fixture_order = data.default_order;
            state.latest_gameweek = Some(data.current_gameweek.unwrap_or(data.gameweek.gameweek));
            state.overview.data = Some(*data);
            state.overview.using_mock = false;
            state.overview.status = LoadStatus::Ready;
        }
        Delta::OverviewFailed {
            generation,
            message,
        } => {
            if generation != state.overview.generation() {
                return;
            }
            state.push_log(format!("[WARN] Overview load failed: {message}"));
            let mock = mock_overview(state.offset);
            state.fixture_order = mock.default_order;
            state.overview.data = Some(mock);
            state.overview.using_mock = true;
            state.overview.status = LoadStatus::Failed(message);
        }
        Delta::CommandCenterLoaded { generation, data } => {
            if generation != state.command_center.generation() {
                state.push_log("[INFO] Dropped stale command center response");
                return;
            }
            for warning in &data.warnings {
                state.push_log(format!("[WARN] {warning}"));
            }
            state.sandbox = Sandbox::new(data.squad.clone(), data.bank_tenths);
            state.selected = 0;
            state.candidate_selected = 0;
            state.push_log(format!("[INFO] Planning for GW{}", data.gameweek.gameweek));
            state.command_center.data = Some(*data);
            state.command_center.using_mock = false;
            state.command_center.status = LoadStatus::Ready;
        }
        Delta::CommandCenterFailed {
            generation,
            message,
        } => {
            if generation != state.command_center.generation() {
                return;
            }
            state.push_log(format!("[WARN] Command center load failed: {message}"));
            let mock = mock_command_center(state.offset, state.precedence);
            state.sandbox = Sandbox::new(mock.squad.clone(), mock.bank_tenths);
            state.selected = 0;
            state.command_center.data = Some(mock);
            state.command_center.using_mock = true;
            state.command_center.status = LoadStatus::Failed(message);
        }
        Delta::Log(line) => state.push_log(line),
    }
}
