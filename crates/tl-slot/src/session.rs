//! Session ledger and statistics

use serde::{Deserialize, Serialize};

use crate::error::SpinError;
use crate::free_spins::AwardKind;
use crate::spin::SpinResult;

/// How a spin was paid for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stake {
    /// Bet debited from the balance
    Paid { bet: u64 },
    /// One free spin consumed from the counter
    FreeSpin,
}

impl Stake {
    pub fn is_free_spin(&self) -> bool {
        matches!(self, Stake::FreeSpin)
    }

    /// Points debited from the balance
    pub fn bet(&self) -> u64 {
        match self {
            Stake::Paid { bet } => *bet,
            Stake::FreeSpin => 0,
        }
    }
}

/// Points ledger, owned by the engine
///
/// Only the engine's spin transitions mutate it, so the fields are read-only
/// from outside the crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    balance: u64,
    free_spins_remaining: u32,
    session_win_total: u64,
    spinning: bool,
}

impl SessionState {
    pub fn new(starting_balance: u64) -> Self {
        Self {
            balance: starting_balance,
            free_spins_remaining: 0,
            session_win_total: 0,
            spinning: false,
        }
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn free_spins_remaining(&self) -> u32 {
        self.free_spins_remaining
    }

    pub fn session_win_total(&self) -> u64 {
        self.session_win_total
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning
    }

    /// Whether a spin could start right now
    pub fn can_spin(&self, bet: u64) -> bool {
        !self.spinning && (self.free_spins_remaining > 0 || self.balance >= bet)
    }

    /// Take the stake for a new spin and mark the session as spinning
    ///
    /// A free spin is always consumed before the balance is touched. On error
    /// nothing changes.
    pub(crate) fn begin_spin(&mut self, bet: u64) -> Result<Stake, SpinError> {
        if self.spinning {
            return Err(SpinError::SpinAlreadyInProgress);
        }
        let stake = if self.free_spins_remaining > 0 {
            self.free_spins_remaining -= 1;
            Stake::FreeSpin
        } else if self.balance >= bet {
            self.balance -= bet;
            Stake::Paid { bet }
        } else {
            return Err(SpinError::InsufficientFunds {
                balance: self.balance,
                bet,
            });
        };
        self.spinning = true;
        Ok(stake)
    }

    pub(crate) fn award_free_spins(&mut self, spins: u32) {
        self.free_spins_remaining = self.free_spins_remaining.saturating_add(spins);
    }

    pub(crate) fn credit(&mut self, amount: u64) {
        self.balance = self.balance.saturating_add(amount);
        self.session_win_total = self.session_win_total.saturating_add(amount);
    }

    pub(crate) fn finish_spin(&mut self) {
        self.spinning = false;
    }

    /// Back to the starting balance with no free spins or session winnings
    pub(crate) fn reset(&mut self, starting_balance: u64) {
        self.balance = starting_balance;
        self.free_spins_remaining = 0;
        self.session_win_total = 0;
    }
}

/// Session statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_spins: u64,
    pub paid_spins: u64,
    pub free_spins_played: u64,
    pub total_bet: u64,
    pub total_win: u64,
    pub wins: u64,
    pub losses: u64,
    pub big_wins: u64,
    /// Tumbles across all spins
    pub cascades: u64,
    pub max_cascade_depth: u32,
    pub free_spins_awarded: u64,
    pub triggers: u64,
    pub retriggers: u64,
    pub max_win: u64,
    /// Largest bomb total actually applied to a win
    pub max_multiplier: u64,
}

impl SessionStats {
    /// Return to player, percent of points bet
    pub fn rtp(&self) -> f64 {
        if self.total_bet > 0 {
            (self.total_win as f64 / self.total_bet as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Percent of spins that paid anything
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins > 0 {
            (self.wins as f64 / self.total_spins as f64) * 100.0
        } else {
            0.0
        }
    }

    pub(crate) fn record(&mut self, result: &SpinResult) {
        self.total_spins += 1;
        if result.stake.is_free_spin() {
            self.free_spins_played += 1;
        } else {
            self.paid_spins += 1;
        }
        self.total_bet += result.stake.bet();
        self.total_win += result.total_win;

        if result.is_win() {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
        if result.big_win {
            self.big_wins += 1;
        }

        self.cascades += u64::from(result.cascade_count);
        self.max_cascade_depth = self.max_cascade_depth.max(result.cascade_count);
        self.max_win = self.max_win.max(result.total_win);
        if result.multiplier_applied > 1 {
            self.max_multiplier = self.max_multiplier.max(result.multiplier_applied);
        }

        self.free_spins_awarded += u64::from(result.free_spins_awarded);
        match result.scatter_award.kind {
            AwardKind::Trigger => self.triggers += 1,
            AwardKind::Retrigger => self.retriggers += 1,
            AwardKind::None => {}
        }
    }
}
