use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};

use crate::fpl_api::{DEFAULT_BADGE_SIZE, team_badge_url};
use crate::model::{Catalog, Fixture};

const TBC_LABEL: &str = "TBC";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureOrder {
    NewestFirst,
    OldestFirst,
}

impl FixtureOrder {
    pub fn toggle(self) -> Self {
        match self {
            FixtureOrder::NewestFirst => FixtureOrder::OldestFirst,
            FixtureOrder::OldestFirst => FixtureOrder::NewestFirst,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FixtureOrder::NewestFirst => "newest first",
            FixtureOrder::OldestFirst => "oldest first",
        }
    }
}

/// Results read best newest-first; an upcoming slate reads best in kickoff order.
pub fn default_order(target: u32, current: Option<u32>) -> FixtureOrder {
    if current == Some(target) {
        FixtureOrder::NewestFirst
    } else {
        FixtureOrder::OldestFirst
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FixtureRow {
    pub id: u32,
    pub gameweek: Option<u32>,
    pub home_id: u32,
    pub away_id: u32,
    pub home_name: String,
    pub away_name: String,
    pub home_abbr: String,
    pub away_abbr: String,
    pub home_badge: Option<String>,
    pub away_badge: Option<String>,
    pub home_score: Option<u8>,
    pub away_score: Option<u8>,
    pub home_difficulty: Option<u8>,
    pub away_difficulty: Option<u8>,
    /// Kickoff in the configured display offset.
    pub kickoff: Option<DateTime<FixedOffset>>,
    pub finished: bool,
    pub started: bool,
}

impl FixtureRow {
    pub fn date(&self) -> Option<NaiveDate> {
        self.kickoff.map(|k| k.date_naive())
    }

    pub fn date_label(&self) -> String {
        self.kickoff
            .map(|k| k.format("%a %-d %b").to_string())
            .unwrap_or_else(|| TBC_LABEL.to_string())
    }

    /// Score once a match has started, kickoff time before that.
    pub fn centre_label(&self) -> String {
        match (self.home_score, self.away_score) {
            (Some(h), Some(a)) if self.started || self.finished => format!("{h} - {a}"),
            _ => self
                .kickoff
                .map(|k| k.format("%H:%M").to_string())
                .unwrap_or_else(|| "vs".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FixtureGroup {
    /// `None` for the trailing group of unscheduled fixtures.
    pub date: Option<NaiveDate>,
    pub label: String,
    pub fixtures: Vec<FixtureRow>,
}

pub fn display_offset(hours: i32) -> FixedOffset {
    FixedOffset::east_opt(hours.clamp(-12, 14) * 3600).unwrap_or_else(|| Utc.fix())
}

pub fn parse_kickoff(raw: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&offset));
    }
    // Offset-less timestamps are treated as UTC.
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(Utc.from_utc_datetime(&naive).with_timezone(&offset));
        }
    }
    None
}

pub fn build_fixture_rows(
    fixtures: &[Fixture],
    catalog: &Catalog,
    offset: FixedOffset,
) -> Vec<FixtureRow> {
    fixtures
        .iter()
        .map(|f| {
            let home = catalog.team(f.team_h);
            let away = catalog.team(f.team_a);
            FixtureRow {
                id: f.id,
                gameweek: f.event,
                home_id: f.team_h,
                away_id: f.team_a,
                home_name: home.map(|t| t.name.clone()).unwrap_or_else(|| "Unknown".into()),
                away_name: away.map(|t| t.name.clone()).unwrap_or_else(|| "Unknown".into()),
                home_abbr: catalog.team_abbr(f.team_h).to_string(),
                away_abbr: catalog.team_abbr(f.team_a).to_string(),
                home_badge: home.and_then(|t| team_badge_url(t.code, DEFAULT_BADGE_SIZE)),
                away_badge: away.and_then(|t| team_badge_url(t.code, DEFAULT_BADGE_SIZE)),
                home_score: f.team_h_score,
                away_score: f.team_a_score,
                home_difficulty: f.team_h_difficulty,
                away_difficulty: f.team_a_difficulty,
                kickoff: f
                    .kickoff_time
                    .as_deref()
                    .and_then(|raw| parse_kickoff(raw, offset)),
                finished: f.finished,
                started: f.started.unwrap_or(f.finished),
            }
        })
        .collect()
}

/// Groups rows by calendar date in the display offset. Oldest-first puts
/// unscheduled fixtures in a final `TBC` group; newest-first is its exact
/// reverse, groups and rows alike.
pub fn group_fixtures(rows: &[FixtureRow], order: FixtureOrder) -> Vec<FixtureGroup> {
    let mut sorted: Vec<&FixtureRow> = rows.iter().collect();
    sorted.sort_by(|a, b| {
        let key = |r: &FixtureRow| (r.kickoff.is_none(), r.kickoff, r.id);
        key(a).cmp(&key(b))
    });

    let mut groups: Vec<FixtureGroup> = Vec::new();
    for row in sorted {
        let date = row.date();
        match groups.last_mut() {
            Some(group) if group.date == date => group.fixtures.push(row.clone()),
            _ => groups.push(FixtureGroup {
                date,
                label: row.date_label(),
                fixtures: vec![row.clone()],
            }),
        }
    }

    if order == FixtureOrder::NewestFirst {
        groups.reverse();
        for group in &mut groups {
            group.fixtures.reverse();
        }
    }
    groups
}
