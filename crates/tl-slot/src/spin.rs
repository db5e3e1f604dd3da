//! Spin result

use serde::{Deserialize, Serialize};

use crate::free_spins::ScatterAward;
use crate::grid::Grid;
use crate::session::Stake;

/// Complete outcome of one settled spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinResult {
    /// 1-based spin counter within the engine's lifetime
    pub spin_index: u64,
    /// How the spin was paid for
    pub stake: Stake,
    /// Points credited (after the bomb multiplier)
    pub total_win: u64,
    /// Sum of all tumble payouts before the multiplier
    pub base_win: u64,
    /// Grid once tumbling stopped
    pub final_grid: Grid,
    /// Number of winning tumbles
    pub cascade_count: u32,
    /// Free spins added to the counter
    pub free_spins_awarded: u32,
    /// Factor applied to `base_win` (1 when none)
    pub multiplier_applied: u64,
    /// Scatter evaluation on the final grid
    pub scatter_award: ScatterAward,
    /// Credited total reached the big-win threshold
    pub big_win: bool,
}

impl SpinResult {
    pub fn is_win(&self) -> bool {
        self.total_win > 0
    }

    pub fn is_free_spin(&self) -> bool {
        self.stake.is_free_spin()
    }

    pub fn scatter_count(&self) -> u32 {
        self.scatter_award.scatter_count
    }

    /// Balance change caused by this spin (credit minus bet)
    pub fn net(&self) -> i128 {
        i128::from(self.total_win) - i128::from(self.stake.bet())
    }
}
