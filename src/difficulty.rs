//! Opponent difficulty bands for colour-coded fixtures.
//!
//! Two sources exist: the upstream 1–5 rating attached to each fixture side,
//! and a hand-maintained strength table keyed by team abbreviation. Callers
//! choose which one wins through [`Precedence`].

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DifficultyBand {
    Easy,
    Medium,
    Hard,
}

impl DifficultyBand {
    pub fn label(self) -> &'static str {
        match self {
            DifficultyBand::Easy => "easy",
            DifficultyBand::Medium => "medium",
            DifficultyBand::Hard => "hard",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precedence {
    /// Upstream rating first, table as fallback.
    Upstream,
    /// Table first, upstream rating as fallback.
    Heuristic,
}

impl Precedence {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "upstream" | "api" | "numeric" => Some(Precedence::Upstream),
            "heuristic" | "table" | "manual" => Some(Precedence::Heuristic),
            _ => None,
        }
    }
}

// Perceived strength, 5 hardest. Not derived from live form.
const TEAM_DIFFICULTY: &[(&str, u8)] = &[
    ("MCI", 5),
    ("LIV", 5),
    ("ARS", 5),
    ("TOT", 4),
    ("CHE", 4),
    ("MUN", 4),
    ("NEW", 4),
    ("AVL", 3),
    ("WHU", 3),
    ("BHA", 3),
    ("FUL", 3),
    ("WOL", 3),
    ("BRE", 3),
    ("EVE", 3),
    ("CRY", 2),
    ("BOU", 2),
    ("NFO", 2),
    ("IPS", 2),
    ("SOU", 1),
    ("LEI", 1),
    ("SHU", 1),
];

pub fn band_for_rating(rating: u8) -> Option<DifficultyBand> {
    match rating {
        1 | 2 => Some(DifficultyBand::Easy),
        3 => Some(DifficultyBand::Medium),
        4 | 5 => Some(DifficultyBand::Hard),
        _ => None,
    }
}

pub fn heuristic_rating(abbr: &str) -> Option<u8> {
    let key = abbr.trim().to_ascii_uppercase();
    TEAM_DIFFICULTY
        .iter()
        .find(|(team, _)| *team == key)
        .map(|(_, rating)| *rating)
}

/// 1–5 rating for an opponent, or 3 when neither source knows it.
pub fn opponent_rating(abbr: &str, explicit: Option<u8>, precedence: Precedence) -> u8 {
    let explicit = explicit.filter(|r| (1..=5).contains(r));
    let table = heuristic_rating(abbr);
    let chosen = match precedence {
        Precedence::Upstream => explicit.or(table),
        Precedence::Heuristic => table.or(explicit),
    };
    chosen.unwrap_or(3)
}

pub fn classify_opponent(
    abbr: &str,
    explicit: Option<u8>,
    precedence: Precedence,
) -> DifficultyBand {
    band_for_rating(opponent_rating(abbr, explicit, precedence))
        .unwrap_or(DifficultyBand::Medium)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ratings_map_to_three_bands() {
        assert_eq!(band_for_rating(1), Some(DifficultyBand::Easy));
        assert_eq!(band_for_rating(2), Some(DifficultyBand::Easy));
        assert_eq!(band_for_rating(3), Some(DifficultyBand::Medium));
        assert_eq!(band_for_rating(4), Some(DifficultyBand::Hard));
        assert_eq!(band_for_rating(5), Some(DifficultyBand::Hard));
        assert_eq!(band_for_rating(0), None);
        assert_eq!(band_for_rating(6), None);
    }

    #[test]
    fn table_fallback_without_explicit_rating() {
        assert_eq!(
            classify_opponent("MCI", None, Precedence::Upstream),
            DifficultyBand::Hard
        );
        assert_eq!(
            classify_opponent("XXX", None, Precedence::Upstream),
            DifficultyBand::Medium
        );
        assert_eq!(
            classify_opponent("sou", None, Precedence::Upstream),
            DifficultyBand::Easy
        );
    }

    #[test]
    fn precedence_picks_the_winning_source() {
        // Upstream says 2, the table says MCI is a 5.
        assert_eq!(
            classify_opponent("MCI", Some(2), Precedence::Upstream),
            DifficultyBand::Easy
        );
        assert_eq!(
            classify_opponent("MCI", Some(2), Precedence::Heuristic),
            DifficultyBand::Hard
        );
        // Unknown to the table: heuristic precedence still uses the rating.
        assert_eq!(
            classify_opponent("XXX", Some(5), Precedence::Heuristic),
            DifficultyBand::Hard
        );
    }

    #[test]
    fn out_of_range_explicit_rating_is_ignored() {
        assert_eq!(opponent_rating("LEI", Some(9), Precedence::Upstream), 1);
        assert_eq!(opponent_rating("XXX", Some(0), Precedence::Upstream), 3);
    }
}
