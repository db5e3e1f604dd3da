//! Phase events
//!
//! The engine reports what happened, never how long it takes to show. A
//! presentation layer consumes these in order and decides its own pacing (see
//! [`crate::timing`]).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::free_spins::ScatterAward;
use crate::grid::{Grid, Position};
use crate::paytable::WinGroup;
use crate::session::Stake;
use crate::spin::SpinResult;

/// One observable step of a spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PhaseEvent {
    // ═══════════════════════════════════════════════════════════════════════
    // SPIN LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════════
    /// Stake taken and the opening grid dealt
    SpinStarted {
        spin_index: u64,
        stake: Stake,
        /// Opening grid, bombs included on free spins
        grid: Grid,
        /// Ledger right after the stake was taken
        balance: u64,
        free_spins_remaining: u32,
    },

    /// Spin fully resolved and credited
    SpinSettled { result: SpinResult },

    // ═══════════════════════════════════════════════════════════════════════
    // TUMBLES
    // ═══════════════════════════════════════════════════════════════════════
    /// Winning groups found; their cells are about to explode
    CascadeWin {
        /// 1-based tumble index
        step: u32,
        positions: BTreeSet<Position>,
        /// Payout of this tumble alone
        amount: u64,
        /// Running total before any multiplier
        accumulated: u64,
        groups: Vec<WinGroup>,
    },

    /// Survivors settled and fresh cells dropped in
    CascadeRefill {
        step: u32,
        grid: Grid,
        /// Cells that were refilled from the top
        refilled: Vec<Position>,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // BONUS
    // ═══════════════════════════════════════════════════════════════════════
    /// Surviving bombs multiplied the spin's win
    MultiplierApplied {
        base_win: u64,
        multiplier: u64,
        total_win: u64,
    },

    /// Scatters added free spins to the counter
    FreeSpinsAwarded {
        award: ScatterAward,
        /// Counter after the award
        free_spins_remaining: u32,
    },

    /// Credited total reached the big-win threshold
    BigWin { amount: u64 },
}

impl PhaseEvent {
    /// Stable snake_case name
    pub fn type_name(&self) -> &'static str {
        match self {
            PhaseEvent::SpinStarted { .. } => "spin_started",
            PhaseEvent::SpinSettled { .. } => "spin_settled",
            PhaseEvent::CascadeWin { .. } => "cascade_win",
            PhaseEvent::CascadeRefill { .. } => "cascade_refill",
            PhaseEvent::MultiplierApplied { .. } => "multiplier_applied",
            PhaseEvent::FreeSpinsAwarded { .. } => "free_spins_awarded",
            PhaseEvent::BigWin { .. } => "big_win",
        }
    }

    /// The settled result, if this is the final event of a spin
    pub fn settled(&self) -> Option<&SpinResult> {
        match self {
            PhaseEvent::SpinSettled { result } => Some(result),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PhaseEvent::SpinSettled { .. })
    }
}
