//! What-if editing of the planning squad.
//!
//! The sandbox never mutates the real squad. Every edit is appended to an
//! action log and the working copy is rebuilt from the base by replaying it,
//! which is how undo works.

use thiserror::Error;

use crate::squad::SquadEntry;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SandboxError {
    #[error("player {0} is not in the squad")]
    NotInSquad(u32),
    #[error("player {0} is already in the squad")]
    AlreadyInSquad(u32),
    #[error("player {0} is on the bench and cannot captain")]
    BenchCaptain(u32),
    #[error("not enough funds: short by {short:.1}m")]
    InsufficientFunds { short: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SandboxAction {
    Transfer { out: u32, incoming: Box<SquadEntry> },
    SetCaptain(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SandboxDelta {
    /// Starting-XI expected points, sandbox minus real.
    pub expected_points: f64,
    /// Millions, sandbox minus real.
    pub bank: f64,
    pub transfers: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Sandbox {
    base: Vec<SquadEntry>,
    base_bank: i64,
    squad: Vec<SquadEntry>,
    bank: i64,
    actions: Vec<SandboxAction>,
}

impl Sandbox {
    /// `bank` is in tenths of a million, as upstream reports it.
    pub fn new(squad: Vec<SquadEntry>, bank: i64) -> Self {
        Self {
            base: squad.clone(),
            base_bank: bank,
            squad,
            bank,
            actions: Vec::new(),
        }
    }

    pub fn squad(&self) -> &[SquadEntry] {
        &self.squad
    }

    pub fn bank_millions(&self) -> f64 {
        self.bank as f64 / 10.0
    }

    pub fn actions(&self) -> &[SandboxAction] {
        &self.actions
    }

    pub fn is_dirty(&self) -> bool {
        !self.actions.is_empty()
    }

    pub fn contains(&self, player_id: u32) -> bool {
        self.squad.iter().any(|p| p.player_id == player_id)
    }

    /// Swap `out` for `incoming` in the same slot. Selling price of the
    /// outgoing player is credited, the incoming selling price debited.
    pub fn transfer(&mut self, out: u32, incoming: SquadEntry) -> Result<(), SandboxError> {
        let action = SandboxAction::Transfer {
            out,
            incoming: Box::new(incoming),
        };
        apply(&mut self.squad, &mut self.bank, &action)?;
        self.actions.push(action);
        Ok(())
    }

    pub fn set_captain(&mut self, player_id: u32) -> Result<(), SandboxError> {
        let action = SandboxAction::SetCaptain(player_id);
        apply(&mut self.squad, &mut self.bank, &action)?;
        self.actions.push(action);
        Ok(())
    }

    /// Captain the starter with the highest expectation; earlier slot wins ties.
    pub fn auto_captain(&mut self) -> Result<Option<u32>, SandboxError> {
        let best = self
            .squad
            .iter()
            .filter(|p| !p.is_bench)
            .fold(None::<&SquadEntry>, |best, p| match best {
                Some(b) if b.expected_points.unwrap_or(0.0) >= p.expected_points.unwrap_or(0.0) => {
                    Some(b)
                }
                _ => Some(p),
            })
            .map(|p| p.player_id);

        match best {
            Some(id) => {
                self.set_captain(id)?;
                Ok(Some(id))
            }
            None => Ok(None),
        }
    }

    /// Drop the last action. Returns false when there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        if self.actions.pop().is_none() {
            return false;
        }
        self.replay();
        true
    }

    pub fn reset(&mut self) {
        self.actions.clear();
        self.squad = self.base.clone();
        self.bank = self.base_bank;
    }

    pub fn delta(&self) -> SandboxDelta {
        SandboxDelta {
            expected_points: starting_expectation(&self.squad) - starting_expectation(&self.base),
            bank: (self.bank - self.base_bank) as f64 / 10.0,
            transfers: self
                .actions
                .iter()
                .filter(|a| matches!(a, SandboxAction::Transfer { .. }))
                .count(),
        }
    }

    fn replay(&mut self) {
        let mut squad = self.base.clone();
        let mut bank = self.base_bank;
        // Every logged action applied cleanly once, so replay cannot fail.
        self.actions
            .retain(|action| apply(&mut squad, &mut bank, action).is_ok());
        self.squad = squad;
        self.bank = bank;
    }
}

/// Σ expected points × captaincy over the starting XI.
pub fn starting_expectation(squad: &[SquadEntry]) -> f64 {
    squad
        .iter()
        .filter(|p| !p.is_bench)
        .map(|p| p.expected_points.unwrap_or(0.0) * f64::from(p.multiplier.max(1)))
        .sum()
}

fn apply(
    squad: &mut [SquadEntry],
    bank: &mut i64,
    action: &SandboxAction,
) -> Result<(), SandboxError> {
    match action {
        SandboxAction::Transfer { out, incoming } => {
            if squad.iter().any(|p| p.player_id == incoming.player_id) {
                return Err(SandboxError::AlreadyInSquad(incoming.player_id));
            }
            let idx = squad
                .iter()
                .position(|p| p.player_id == *out)
                .ok_or(SandboxError::NotInSquad(*out))?;

            let credit = i64::from(squad[idx].selling_price.unwrap_or(0));
            let debit = i64::from(incoming.selling_price.unwrap_or(0));
            let after = *bank + credit - debit;
            if after < 0 {
                return Err(SandboxError::InsufficientFunds {
                    short: -after as f64 / 10.0,
                });
            }

            let outgoing = &squad[idx];
            let (was_captain, was_vice) = (outgoing.is_captain, outgoing.is_vice_captain);
            let mut replacement = (**incoming).clone();
            replacement.slot = outgoing.slot;
            replacement.is_bench = outgoing.is_bench;
            replacement.multiplier = if outgoing.is_bench { 0 } else { 1 };
            replacement.is_captain = false;
            replacement.is_vice_captain = was_vice;
            replacement.points = replacement.expected_points.unwrap_or(0.0);
            squad[idx] = replacement;

            // The armband moves to the vice, who hands the vice role to the
            // incoming player. Without a starting vice the incoming player captains.
            if was_captain {
                let vice = squad
                    .iter()
                    .position(|p| p.is_vice_captain && !p.is_bench);
                let promoted = vice.unwrap_or(idx);
                squad[promoted].is_captain = true;
                squad[promoted].is_vice_captain = false;
                if !squad[promoted].is_bench {
                    squad[promoted].multiplier = 2;
                }
                if promoted != idx {
                    squad[idx].is_vice_captain = true;
                }
            }
            *bank = after;
            Ok(())
        }
        SandboxAction::SetCaptain(id) => {
            let target = squad
                .iter()
                .find(|p| p.player_id == *id)
                .ok_or(SandboxError::NotInSquad(*id))?;
            if target.is_bench {
                return Err(SandboxError::BenchCaptain(*id));
            }
            for p in squad.iter_mut() {
                if p.player_id == *id {
                    p.is_captain = true;
                    p.is_vice_captain = false;
                    p.multiplier = 2;
                } else if p.is_captain {
                    p.is_captain = false;
                    p.is_vice_captain = true;
                    p.multiplier = 1;
                } else {
                    p.is_vice_captain = false;
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PlayerStatus, Position};

    fn entry(id: u32, slot: u8, xp: f64, price: u32) -> SquadEntry {
        SquadEntry {
            player_id: id,
            name: format!("P{id}"),
            position: Position::Midfielder,
            team_id: Some(1),
            team_abbr: "ARS".to_string(),
            photo_url: None,
            slot,
            multiplier: if slot > 11 { 0 } else { 1 },
            is_captain: false,
            is_vice_captain: false,
            is_bench: slot > 11,
            raw_points: 0,
            points: xp,
            expected_points: Some(xp),
            opponents: Vec::new(),
            status: PlayerStatus::Available,
            news: String::new(),
            chance_of_playing: None,
            selling_price: Some(price),
            purchase_price: Some(price),
        }
    }

    fn sandbox() -> Sandbox {
        let mut squad = vec![entry(1, 1, 4.0, 55), entry(2, 2, 7.5, 130), entry(3, 12, 2.0, 45)];
        squad[0].is_captain = true;
        squad[0].multiplier = 2;
        squad[1].is_vice_captain = true;
        Sandbox::new(squad, 5)
    }

    #[test]
    fn set_captain_demotes_previous_captain() {
        let mut sb = sandbox();
        sb.set_captain(2).expect("starter");
        let squad = sb.squad();
        assert!(squad[1].is_captain && squad[1].multiplier == 2);
        assert!(squad[0].is_vice_captain && !squad[0].is_captain);
        assert_eq!(squad.iter().filter(|p| p.is_vice_captain).count(), 1);
        assert_eq!(sb.set_captain(3), Err(SandboxError::BenchCaptain(3)));
    }

    #[test]
    fn auto_captain_picks_best_starter() {
        let mut sb = sandbox();
        assert_eq!(sb.auto_captain().expect("captained"), Some(2));
        // 4.0 + 7.5 × 2 against 4.0 × 2 + 7.5
        assert!((sb.delta().expected_points - 3.5).abs() < 1e-9);
    }

    #[test]
    fn transfer_moves_money_and_undo_restores() {
        let mut sb = sandbox();
        sb.transfer(1, entry(9, 0, 6.0, 58)).expect("affordable");
        assert_eq!(sb.squad()[0].player_id, 9);
        assert_eq!(sb.squad()[0].slot, 1);
        assert!(!sb.squad()[0].is_captain);
        let delta = sb.delta();
        assert!((delta.bank - -0.3).abs() < 1e-9);
        assert_eq!(delta.transfers, 1);

        assert!(sb.undo());
        assert_eq!(sb.squad()[0].player_id, 1);
        assert!((sb.bank_millions() - 0.5).abs() < 1e-9);
        assert!(!sb.undo());
    }

    #[test]
    fn transferring_the_captain_promotes_the_vice() {
        let mut sb = sandbox();
        sb.transfer(1, entry(9, 0, 6.0, 58)).expect("affordable");
        let squad = sb.squad();
        assert!(squad[1].is_captain && squad[1].multiplier == 2);
        assert!(squad[0].is_vice_captain && squad[0].multiplier == 1);
        assert_eq!(squad.iter().filter(|p| p.is_captain).count(), 1);
        assert_eq!(squad.iter().filter(|p| p.is_vice_captain).count(), 1);
        // 6.0 + 7.5 × 2 against 4.0 × 2 + 7.5
        assert!((sb.delta().expected_points - 5.5).abs() < 1e-9);
    }

    #[test]
    fn transferring_the_vice_passes_the_role_on() {
        let mut sb = Sandbox::new(sandbox().squad().to_vec(), 100);
        sb.transfer(2, entry(9, 0, 6.0, 58)).expect("affordable");
        let squad = sb.squad();
        assert!(squad[0].is_captain && squad[0].multiplier == 2);
        assert!(squad[1].is_vice_captain && squad[1].player_id == 9);
        assert_eq!(squad.iter().filter(|p| p.is_vice_captain).count(), 1);
    }

    #[test]
    fn transfer_rejects_duplicates_and_overspend() {
        let mut sb = sandbox();
        assert_eq!(
            sb.transfer(1, entry(2, 0, 1.0, 50)),
            Err(SandboxError::AlreadyInSquad(2))
        );
        assert!(matches!(
            sb.transfer(3, entry(10, 0, 9.0, 60)),
            Err(SandboxError::InsufficientFunds { .. })
        ));
        assert_eq!(sb.transfer(77, entry(10, 0, 9.0, 10)), Err(SandboxError::NotInSquad(77)));
        assert!(!sb.is_dirty());
    }

    #[test]
    fn reset_discards_everything() {
        let mut sb = sandbox();
        sb.set_captain(2).expect("starter");
        sb.transfer(3, entry(11, 0, 3.0, 40)).expect("affordable");
        sb.reset();
        assert!(!sb.is_dirty());
        assert_eq!(sb.delta(), SandboxDelta::default());
        assert!(sb.squad()[0].is_captain);
    }
}
