use crate::backend_api::{BandwagonPlayer, FormPlayer};

pub const MARKET_LIST_LEN: usize = 5;

/// Most bought-in players first, by net transfer balance.
pub fn top_bandwagons(players: &[BandwagonPlayer], limit: usize) -> Vec<BandwagonPlayer> {
    let mut sorted = players.to_vec();
    sorted.sort_by(|a, b| {
        b.transfers_balance
            .cmp(&a.transfers_balance)
            .then_with(|| a.player_id.cmp(&b.player_id))
    });
    sorted.truncate(limit);
    sorted
}

/// Highest scorers over the last four gameweeks first.
pub fn in_form(players: &[FormPlayer], limit: usize) -> Vec<FormPlayer> {
    let mut sorted = players.to_vec();
    sorted.sort_by(|a, b| {
        b.last4_points
            .cmp(&a.last4_points)
            .then_with(|| a.player_id.cmp(&b.player_id))
    });
    sorted.truncate(limit);
    sorted
}

pub fn format_balance(balance: i64) -> String {
    let magnitude = balance.unsigned_abs();
    let body = if magnitude >= 1_000_000 {
        format!("{:.1}M", magnitude as f64 / 1_000_000.0)
    } else if magnitude >= 1_000 {
        format!("{:.0}k", magnitude as f64 / 1_000.0)
    } else {
        magnitude.to_string()
    };
    if balance < 0 {
        format!("-{body}")
    } else {
        format!("+{body}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wagon(id: u32, balance: i64) -> BandwagonPlayer {
        BandwagonPlayer {
            player_id: id,
            player_name: format!("P{id}"),
            team: "ARS".to_string(),
            transfers_in: balance.max(0),
            transfers_out: (-balance).max(0),
            transfers_balance: balance,
        }
    }

    #[test]
    fn bandwagons_sorted_by_balance() {
        let rows = top_bandwagons(&[wagon(1, -500), wagon(2, 90_000), wagon(3, 4_000)], 2);
        let ids: Vec<u32> = rows.iter().map(|r| r.player_id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn balance_labels() {
        assert_eq!(format_balance(1_240_000), "+1.2M");
        assert_eq!(format_balance(-43_210), "-43k");
        assert_eq!(format_balance(12), "+12");
    }
}
