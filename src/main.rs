use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use fpl_terminal::backend_api::{BandwagonPlayer, FormPlayer};
use fpl_terminal::chips::TeamStatus;
use fpl_terminal::config::AppConfig;
use fpl_terminal::difficulty::DifficultyBand;
use fpl_terminal::fixtures_view::{FixtureOrder, FixtureRow, group_fixtures};
use fpl_terminal::injuries::InjuryRow;
use fpl_terminal::loader::{Apis, GameweekTarget, LoadOptions, OverviewData, SquadSource};
use fpl_terminal::market::format_balance;
use fpl_terminal::model::PlayerStatus;
use fpl_terminal::provider::spawn_provider;
use fpl_terminal::sandbox::starting_expectation;
use fpl_terminal::session::{FileSession, MemorySession, SessionStore, parse_team_id};
use fpl_terminal::squad::SquadEntry;
use fpl_terminal::state::{AppState, Delta, LoadStatus, ProviderCommand, Screen, apply_delta};
use fpl_terminal::telemetry;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];
const LOGIN_INPUT_MAX: usize = 12;
const NAME_WIDTH: usize = 18;

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
    session: Box<dyn SessionStore>,
    spinner: usize,
}

impl App {
    fn new(
        opts: LoadOptions,
        cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
        session: Box<dyn SessionStore>,
    ) -> Self {
        Self {
            state: AppState::new(opts),
            should_quit: false,
            cmd_tx,
            session,
            spinner: 0,
        }
    }

    /// Skip the login screen when the environment or a previous run already
    /// named a team.
    fn restore_session(&mut self, preset: Option<&str>) {
        let preset_id = match preset.map(parse_team_id) {
            Some(Ok(id)) => Some(id),
            Some(Err(err)) => {
                self.state
                    .push_log(format!("[WARN] FPL_TEAM_ID ignored: {err}"));
                None
            }
            None => None,
        };
        if let Some(team_id) = preset_id.or_else(|| self.session.get()) {
            self.state.sign_in(team_id);
            let cmd = self.state.request_overview(GameweekTarget::Current);
            self.send(cmd);
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.help_overlay {
            match key.code {
                KeyCode::Char('?') | KeyCode::Esc => self.state.help_overlay = false,
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            }
            return;
        }
        if self.state.screen == Screen::Login {
            self.on_login_key(key);
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = true,
            KeyCode::Char('1') => self.show_overview(),
            KeyCode::Char('2') => self.show_command_center(),
            KeyCode::Char('x') => self.sign_out(),
            _ => match self.state.screen {
                Screen::Overview => self.on_overview_key(key),
                Screen::CommandCenter => self.on_command_center_key(key),
                Screen::Login => {}
            },
        }
    }

    fn on_login_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') if self.state.login_input.is_empty() => self.should_quit = true,
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = true,
            KeyCode::Char(c) => {
                if self.state.login_input.chars().count() < LOGIN_INPUT_MAX {
                    self.state.login_input.push(c);
                }
                self.state.login_error = None;
            }
            KeyCode::Backspace => {
                self.state.login_input.pop();
                self.state.login_error = None;
            }
            KeyCode::Enter => self.submit_login(),
            _ => {}
        }
    }

    fn submit_login(&mut self) {
        match parse_team_id(&self.state.login_input) {
            Ok(team_id) => {
                if let Err(err) = self.session.set(team_id) {
                    self.state
                        .push_log(format!("[WARN] Session not saved: {err:#}"));
                }
                self.state.sign_in(team_id);
                let cmd = self.state.request_overview(GameweekTarget::Current);
                self.send(cmd);
            }
            Err(err) => self.state.login_error = Some(err.to_string()),
        }
    }

    fn on_overview_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('[') => {
                let cmd = self.state.step_gameweek(-1);
                self.send(cmd);
            }
            KeyCode::Char(']') => {
                let cmd = self.state.step_gameweek(1);
                self.send(cmd);
            }
            KeyCode::Char('o') | KeyCode::Char('O') => self.state.toggle_fixture_order(),
            KeyCode::Char('g') => {
                let target = self.state.overview_target;
                let cmd = self.state.request_overview(target);
                self.send(cmd);
            }
            _ => {}
        }
    }

    fn on_command_center_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Tab => self.state.cycle_candidate(),
            KeyCode::Char('t') => self.state.sandbox_transfer_selected(),
            KeyCode::Char('C') => self.state.sandbox_captain_selected(),
            KeyCode::Char('c') => self.state.sandbox_auto_captain(),
            KeyCode::Char('z') => self.state.sandbox_undo(),
            KeyCode::Char('r') => self.state.sandbox_reset(),
            KeyCode::Char('g') => {
                let cmd = self.state.request_command_center();
                self.send(cmd);
            }
            _ => {}
        }
    }

    fn show_overview(&mut self) {
        self.state.screen = Screen::Overview;
        if self.state.overview.status == LoadStatus::Idle {
            let cmd = self.state.request_overview(GameweekTarget::Current);
            self.send(cmd);
        }
    }

    fn show_command_center(&mut self) {
        self.state.screen = Screen::CommandCenter;
        if self.state.command_center.status == LoadStatus::Idle {
            let cmd = self.state.request_command_center();
            self.send(cmd);
        }
    }

    fn sign_out(&mut self) {
        if let Err(err) = self.session.clear() {
            self.state
                .push_log(format!("[WARN] Session not cleared: {err:#}"));
        }
        self.state.sign_out();
    }

    fn send(&mut self, cmd: Option<ProviderCommand>) {
        let Some(cmd) = cmd else {
            return;
        };
        let Some(tx) = &self.cmd_tx else {
            self.state
                .push_log("[INFO] Fetching unavailable, showing sample data");
            return;
        };
        if tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Fetch worker stopped");
        }
    }

    fn on_tick(&mut self) {
        if self.state.overview.status.is_loading() || self.state.command_center.status.is_loading()
        {
            self.spinner = self.spinner.wrapping_add(1);
        }
    }
}

fn main() -> io::Result<()> {
    let config = AppConfig::load();
    if config.debug {
        let installed = telemetry::get_subscriber("debug".into(), config.log_file.clone())
            .and_then(telemetry::init_subscriber);
        if let Err(err) = installed {
            eprintln!("warning: debug tracing disabled: {err:#}");
        }
    }

    let opts = LoadOptions::from_config(&config);
    let session: Box<dyn SessionStore> = match FileSession::locate(config.session_file.clone()) {
        Some(file) => Box::new(file),
        None => Box::new(MemorySession::default()),
    };

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let mut startup_warning = None;
    let cmd_tx = match Apis::http(&config) {
        Ok(apis) => {
            spawn_provider(tx, cmd_rx, apis, opts, config.fetch_parallelism);
            Some(cmd_tx)
        }
        Err(err) => {
            startup_warning = Some(format!("[WARN] HTTP client unavailable: {err:#}"));
            None
        }
    };

    let mut app = App::new(opts, cmd_tx, session);
    if let Some(warning) = startup_warning {
        app.state.push_log(warning);
    }
    app.restore_session(config.preset_team_id.as_deref());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let state = &app.state;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    frame.render_widget(status_banner(state, app.spinner), chunks[1]);

    match state.screen {
        Screen::Login => render_login(frame, chunks[2], state),
        Screen::Overview => render_overview(frame, chunks[2], state),
        Screen::CommandCenter => render_command_center(frame, chunks[2], state, Utc::now()),
    }

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[3]);

    let footer = Paragraph::new(footer_text(state));
    frame.render_widget(footer, chunks[4]);

    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let title = match state.screen {
        Screen::Login => "FPL TERMINAL | Sign in".to_string(),
        Screen::Overview => match &state.overview.data {
            Some(data) => format!(
                "FPL TERMINAL | Overview | {} | GW{} | Fixtures: {}",
                data.manager.team_name,
                data.gameweek.gameweek,
                state.fixture_order.label()
            ),
            None => "FPL TERMINAL | Overview".to_string(),
        },
        Screen::CommandCenter => match &state.command_center.data {
            Some(data) => format!(
                "FPL TERMINAL | Command Center | {} | Planning GW{}",
                data.manager.team_name, data.gameweek.gameweek
            ),
            None => "FPL TERMINAL | Command Center".to_string(),
        },
    };
    let who = match state.team_id {
        Some(id) => format!("Team {id}"),
        None => "Not signed in".to_string(),
    };
    format!("  ,-.  {title}\n ( o ) {who}\n  `-'")
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Login => "Type team id | Enter Sign in | Esc Quit | ? Help".to_string(),
        Screen::Overview => {
            "1 Overview | 2 Command | [/] Gameweek | o Fixture order | g Reload | x Log out | ? Help | q Quit"
                .to_string()
        }
        Screen::CommandCenter => {
            "1 Overview | 2 Command | j/k Select | Tab Candidate | t Transfer | C Captain | c Auto | z Undo | r Reset | ? Help | q Quit"
                .to_string()
        }
    }
}

fn status_banner(state: &AppState, spinner: usize) -> Paragraph<'static> {
    let (text, style) = banner_text(state, spinner);
    Paragraph::new(text).style(style)
}

fn banner_text(state: &AppState, spinner: usize) -> (String, Style) {
    let (status, using_mock) = match state.screen {
        Screen::Login => return (String::new(), Style::default()),
        Screen::Overview => (&state.overview.status, state.overview.using_mock),
        Screen::CommandCenter => (&state.command_center.status, state.command_center.using_mock),
    };
    let dim = Style::default().fg(Color::DarkGray);
    match status {
        LoadStatus::Loading => {
            let frame = SPINNER[spinner % SPINNER.len()];
            let text = if using_mock {
                format!("{frame} Loading, showing sample data until the response arrives")
            } else {
                format!("{frame} Loading")
            };
            (text, Style::default().fg(Color::Cyan))
        }
        LoadStatus::Failed(message) => (
            format!("! {message} (showing sample data)"),
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ),
        _ if using_mock => ("Sample data".to_string(), dim),
        LoadStatus::Idle => ("Press g to load".to_string(), dim),
        LoadStatus::Ready => ("Live data".to_string(), dim),
    }
}

fn render_login(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup = centered_rect(50, 50, area);
    let mut lines = vec![
        Line::from("Enter your FPL team id, the number in your points page address."),
        Line::from(""),
        Line::from(vec![
            Span::raw("Team id: "),
            Span::styled(
                format!("{}_", state.login_input),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
    ];
    if let Some(err) = &state.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(Color::Red),
        )));
    }
    let form = Paragraph::new(lines)
        .block(Block::default().title("Sign in").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    frame.render_widget(form, popup);
}

fn render_overview(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(data) = state.overview.data.as_ref() else {
        let empty = Paragraph::new("Press 1 to load your overview")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(1)])
        .split(columns[0]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(8)])
        .split(columns[1]);

    let stats = Paragraph::new(stats_lines(data)).block(
        Block::default()
            .title(format!("GW{} Stats", data.gameweek.gameweek))
            .borders(Borders::ALL),
    );
    frame.render_widget(stats, left[0]);

    let squad = Paragraph::new(squad_lines(&data.squad, None, false))
        .block(Block::default().title("Squad").borders(Borders::ALL));
    frame.render_widget(squad, left[1]);

    let fixtures = Paragraph::new(fixture_lines(&data.fixtures, state.fixture_order)).block(
        Block::default()
            .title(format!("Fixtures ({})", state.fixture_order.label()))
            .borders(Borders::ALL),
    );
    frame.render_widget(fixtures, right[0]);

    let injuries = Paragraph::new(injury_lines(&data.injuries))
        .block(Block::default().title("Injuries").borders(Borders::ALL));
    frame.render_widget(injuries, right[1]);
}

fn stats_lines(data: &OverviewData) -> Vec<Line<'static>> {
    let stats = &data.stats;
    let mut points = vec![Span::styled(
        format!("Points: {}", stats.points),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(rec) = stats.reconciliation.as_ref().filter(|r| r.has_discrepancy()) {
        points.push(Span::styled(
            format!("  picks sum {} ({})", rec.manual, rec.difference_label()),
            Style::default().fg(Color::Yellow),
        ));
    }
    if let Some(avg) = data.gameweek.average_score {
        points.push(Span::styled(
            format!("  avg {avg}"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let cost = if stats.transfer_cost > 0 {
        format!(" (-{})", stats.transfer_cost)
    } else {
        String::new()
    };
    let chip = stats
        .active_chip
        .map(|c| c.short_label())
        .unwrap_or("-");
    vec![
        Line::from(points),
        Line::from(format!(
            "Total: {} | GW rank: {} | Overall: {}",
            or_dash(stats.total_points),
            fmt_rank(stats.rank),
            fmt_rank(stats.overall_rank)
        )),
        Line::from(format!(
            "Bench: {} | Transfers: {}{cost} | Chip: {chip}",
            or_dash(stats.bench_points),
            stats.transfers
        )),
        Line::from(format!(
            "Value: {} | Bank: {}",
            money(stats.team_value),
            money(stats.bank)
        )),
    ]
}

/// Starters, a bench divider, then reserves. `selected` highlights a row by
/// squad index.
fn squad_lines(
    squad: &[SquadEntry],
    selected: Option<usize>,
    show_expected: bool,
) -> Vec<Line<'static>> {
    if squad.is_empty() {
        return vec![Line::from(Span::styled(
            "No picks",
            Style::default().fg(Color::DarkGray),
        ))];
    }
    let mut lines = Vec::with_capacity(squad.len() + 1);
    let mut bench_started = false;
    for (idx, p) in squad.iter().enumerate() {
        if p.is_bench && !bench_started {
            bench_started = true;
            lines.push(Line::from(Span::styled(
                "-- Bench --",
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines.push(squad_line(p, selected == Some(idx), show_expected));
    }
    lines
}

fn squad_line(p: &SquadEntry, selected: bool, show_expected: bool) -> Line<'static> {
    let armband = if p.is_captain {
        "(C)"
    } else if p.is_vice_captain {
        "(V)"
    } else {
        "   "
    };
    let value = if show_expected {
        p.expected_points
            .map(|x| format!("{x:>5.1}"))
            .unwrap_or_else(|| "    -".to_string())
    } else {
        format!("{:>5.0}", p.points)
    };
    let name_style = match p.status {
        PlayerStatus::Available | PlayerStatus::Unknown => Style::default(),
        PlayerStatus::Doubtful => Style::default().fg(Color::Yellow),
        _ => Style::default().fg(Color::Red),
    };

    let mut spans = vec![
        Span::raw(format!("{} ", p.position.short_label())),
        Span::styled(format!("{:<NAME_WIDTH$}", clip(&p.name, NAME_WIDTH)), name_style),
        Span::raw(format!(" {:<4}{armband}{value}  ", p.team_abbr)),
    ];
    if p.opponents.is_empty() {
        spans.push(Span::styled("-", Style::default().fg(Color::DarkGray)));
    }
    for (i, opp) in p.opponents.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(", "));
        }
        spans.push(Span::styled(opp.label(), band_style(opp.band)));
    }

    let line = Line::from(spans);
    if selected {
        line.patch_style(Style::default().bg(Color::DarkGray))
    } else {
        line
    }
}

fn band_style(band: DifficultyBand) -> Style {
    match band {
        DifficultyBand::Easy => Style::default().fg(Color::Green),
        DifficultyBand::Medium => Style::default().fg(Color::Yellow),
        DifficultyBand::Hard => Style::default().fg(Color::Red),
    }
}

fn fixture_lines(rows: &[FixtureRow], order: FixtureOrder) -> Vec<Line<'static>> {
    let groups = group_fixtures(rows, order);
    if groups.is_empty() {
        return vec![Line::from(Span::styled(
            "No fixtures",
            Style::default().fg(Color::DarkGray),
        ))];
    }
    let mut lines = Vec::new();
    for group in groups {
        lines.push(Line::from(Span::styled(
            group.label,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        for f in &group.fixtures {
            let centre_style = if f.started && !f.finished {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            lines.push(Line::from(vec![
                Span::raw(format!("  {:>4} ", f.home_abbr)),
                Span::styled(format!("{:^9}", f.centre_label()), centre_style),
                Span::raw(format!(" {:<4}", f.away_abbr)),
            ]));
        }
    }
    lines
}

fn injury_lines(rows: &[InjuryRow]) -> Vec<Line<'static>> {
    if rows.is_empty() {
        return vec![Line::from(Span::styled(
            "No flagged players",
            Style::default().fg(Color::Green),
        ))];
    }
    rows.iter()
        .map(|row| {
            let chance_style = match row.chance {
                Some(c) if c >= 50 => Style::default().fg(Color::Yellow),
                _ => Style::default().fg(Color::Red),
            };
            let mut spans = vec![
                Span::styled(format!("{:>4} ", row.chance_label()), chance_style),
                Span::raw(format!(
                    "{} ({}) {}",
                    row.name,
                    row.team_abbr,
                    row.status.label()
                )),
            ];
            if !row.news.is_empty() {
                spans.push(Span::styled(
                    format!(" - {}", row.news),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Line::from(spans)
        })
        .collect()
}

fn render_command_center(frame: &mut Frame, area: Rect, state: &AppState, now: DateTime<Utc>) {
    let Some(data) = state.command_center.data.as_ref() else {
        let empty = Paragraph::new("Press 2 to load the command center")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(1)])
        .split(area);

    let status = Paragraph::new(team_status_lines(&data.status, now))
        .block(Block::default().title("Team Status").borders(Borders::ALL));
    frame.render_widget(status, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(rows[1]);

    let mut squad_title = match data.squad_source {
        SquadSource::Backend => format!("Squad GW{}", data.gameweek.gameweek),
        SquadSource::SportsApi(gw) => format!("Squad (GW{gw} picks)"),
    };
    if state.sandbox.is_dirty() {
        squad_title.push_str(" [edited]");
    }
    let squad = Paragraph::new(squad_lines(state.sandbox.squad(), Some(state.selected), true))
        .block(Block::default().title(squad_title).borders(Borders::ALL));
    frame.render_widget(squad, columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(7),
            Constraint::Length(8),
            Constraint::Min(1),
        ])
        .split(columns[1]);

    let sandbox = Paragraph::new(sandbox_lines(state))
        .block(Block::default().title("Sandbox").borders(Borders::ALL));
    frame.render_widget(sandbox, right[0]);

    let candidates = Paragraph::new(candidate_lines(state))
        .block(Block::default().title("Transfer In").borders(Borders::ALL));
    frame.render_widget(candidates, right[1]);

    let bandwagons = Paragraph::new(bandwagon_lines(&data.bandwagons))
        .block(Block::default().title("Bandwagons").borders(Borders::ALL));
    frame.render_widget(bandwagons, right[2]);

    let form = Paragraph::new(form_lines(&data.in_form))
        .block(Block::default().title("In Form").borders(Borders::ALL));
    frame.render_widget(form, right[3]);
}

fn team_status_lines(status: &TeamStatus, now: DateTime<Utc>) -> Vec<Line<'static>> {
    let mut chips = vec![Span::raw("Chips: ")];
    for chip in &status.chips {
        let style = if chip.pending {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else if chip.available {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        chips.push(Span::styled(
            format!("{} {}", chip.kind.short_label(), chip.describe()),
            style,
        ));
        chips.push(Span::raw("  "));
    }
    vec![
        Line::from(chips),
        Line::from(format!(
            "Bank: {} | Value: {} | Free transfers: {} | Deadline: {}",
            money(status.bank),
            money(status.team_value),
            or_dash(status.free_transfers),
            status.deadline_label(now)
        )),
    ]
}

fn sandbox_lines(state: &AppState) -> Vec<Line<'static>> {
    let delta = state.sandbox.delta();
    let delta_style = if delta.expected_points >= 0.0 {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Red)
    };
    vec![
        Line::from(vec![
            Span::raw(format!(
                "XI xP: {:.1} ",
                starting_expectation(state.sandbox.squad())
            )),
            Span::styled(format!("({:+.1})", delta.expected_points), delta_style),
        ]),
        Line::from(format!(
            "Bank: £{:.1}m ({:+.1}) | Transfers: {}",
            state.sandbox.bank_millions(),
            delta.bank,
            delta.transfers
        )),
    ]
}

fn candidate_lines(state: &AppState) -> Vec<Line<'static>> {
    let candidates = state.candidates();
    if candidates.is_empty() {
        return vec![Line::from(Span::styled(
            "No candidates",
            Style::default().fg(Color::DarkGray),
        ))];
    }
    candidates
        .iter()
        .enumerate()
        .map(|(idx, p)| {
            let marker = if idx == state.candidate_selected { ">" } else { " " };
            let price = p
                .selling_price
                .map(|t| format!("£{:.1}m", f64::from(t) / 10.0))
                .unwrap_or_else(|| "-".to_string());
            let xp = p
                .expected_points
                .map(|x| format!("{x:.1}"))
                .unwrap_or_else(|| "-".to_string());
            let line = Line::from(format!(
                "{marker} {} {:<NAME_WIDTH$} {:<4} {price} xP {xp}",
                p.position.short_label(),
                clip(&p.name, NAME_WIDTH),
                p.team_abbr
            ));
            if state.sandbox.contains(p.player_id) {
                line.patch_style(Style::default().fg(Color::DarkGray))
            } else {
                line
            }
        })
        .collect()
}

fn bandwagon_lines(players: &[BandwagonPlayer]) -> Vec<Line<'static>> {
    if players.is_empty() {
        return vec![Line::from(Span::styled(
            "Backend offline",
            Style::default().fg(Color::DarkGray),
        ))];
    }
    players
        .iter()
        .map(|p| {
            let style = if p.transfers_balance >= 0 {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Red)
            };
            Line::from(vec![
                Span::raw(format!(
                    "{:<NAME_WIDTH$} {:<4} ",
                    clip(&p.player_name, NAME_WIDTH),
                    p.team
                )),
                Span::styled(format_balance(p.transfers_balance), style),
            ])
        })
        .collect()
}

fn form_lines(players: &[FormPlayer]) -> Vec<Line<'static>> {
    if players.is_empty() {
        return vec![Line::from(Span::styled(
            "Backend offline",
            Style::default().fg(Color::DarkGray),
        ))];
    }
    players
        .iter()
        .map(|p| {
            let xg = p
                .xg
                .map(|x| format!(" xG {x:.1}"))
                .unwrap_or_default();
            Line::from(format!(
                "{:<NAME_WIDTH$} {:<4} {:>3} pts{xg}",
                clip(&p.player_name, NAME_WIDTH),
                p.team,
                p.last4_points
            ))
        })
        .collect()
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    let skip = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(skip)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn money(millions: Option<f64>) -> String {
    millions
        .map(|m| format!("£{m:.1}m"))
        .unwrap_or_else(|| "-".to_string())
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn fmt_rank(rank: Option<u64>) -> String {
    let Some(rank) = rank else {
        return "-".to_string();
    };
    let digits = rank.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn clip(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "FPL Terminal - Help",
        "",
        "Global:",
        "  1            Overview",
        "  2            Command Center",
        "  x            Log out",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Overview:",
        "  [ / ]        Previous / next gameweek",
        "  o            Toggle fixture order",
        "  g            Reload",
        "",
        "Command Center:",
        "  j/k or ↑/↓   Select player",
        "  Tab          Next transfer candidate",
        "  t            Swap selected player for candidate",
        "  C            Captain selected player",
        "  c            Auto-captain",
        "  z            Undo",
        "  r            Reset sandbox",
        "  g            Reload",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
