use crate::model::PlayerStatus;
use crate::squad::SquadEntry;

#[derive(Debug, Clone, PartialEq)]
pub struct InjuryRow {
    pub player_id: u32,
    pub name: String,
    pub team_abbr: String,
    pub status: PlayerStatus,
    pub news: String,
    /// Percent chance of playing next round, when published.
    pub chance: Option<u8>,
}

impl InjuryRow {
    pub fn chance_label(&self) -> String {
        match self.chance {
            Some(c) => format!("{c}%"),
            None => "-".to_string(),
        }
    }
}

/// Squad members flagged by the catalog, least likely to play first.
pub fn squad_injuries(squad: &[SquadEntry]) -> Vec<InjuryRow> {
    let mut rows: Vec<InjuryRow> = squad
        .iter()
        .filter(|p| is_flagged(p))
        .map(|p| InjuryRow {
            player_id: p.player_id,
            name: p.name.clone(),
            team_abbr: p.team_abbr.clone(),
            status: p.status,
            news: p.news.clone(),
            chance: p.chance_of_playing,
        })
        .collect();
    rows.sort_by(|a, b| {
        a.chance
            .unwrap_or(0)
            .cmp(&b.chance.unwrap_or(0))
            .then_with(|| a.name.cmp(&b.name))
    });
    rows
}

fn is_flagged(p: &SquadEntry) -> bool {
    match p.status {
        PlayerStatus::Available => p.chance_of_playing.is_some_and(|c| c < 100),
        // Placeholders carry no catalog data at all.
        PlayerStatus::Unknown => !p.news.is_empty(),
        _ => true,
    }
}
