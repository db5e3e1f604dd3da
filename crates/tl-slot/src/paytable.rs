//! Paytable and win detection
//!
//! Wins are counted anywhere on the board: every regular symbol is grouped
//! across the whole grid regardless of adjacency, and a group pays once it
//! reaches the smallest tier. Tiers are flat, every regular symbol pays the
//! same amount for the same count.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::grid::{Grid, Position};
use crate::symbols::Symbol;

/// Minimum group size and the points it pays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayTier {
    pub min_count: u32,
    pub payout: u64,
}

impl PayTier {
    pub const fn new(min_count: u32, payout: u64) -> Self {
        Self { min_count, payout }
    }
}

/// One paying symbol group in a grid snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinGroup {
    pub symbol: Symbol,
    /// Every cell holding the symbol, row-major
    pub positions: Vec<Position>,
    pub payout: u64,
}

impl WinGroup {
    pub fn count(&self) -> usize {
        self.positions.len()
    }
}

/// Outcome of scanning one grid snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinEvaluation {
    /// Winning groups, ordered by symbol
    pub groups: Vec<WinGroup>,
    /// Sum of group payouts
    pub total_win: u64,
    /// Union of all group positions
    pub winning_positions: BTreeSet<Position>,
}

impl WinEvaluation {
    pub fn is_win(&self) -> bool {
        !self.groups.is_empty()
    }
}

/// Flat count-anywhere paytable
///
/// Serializes as a plain list of tiers; tiers are re-sorted on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<PayTier>", into = "Vec<PayTier>")]
pub struct PayTable {
    tiers: Vec<PayTier>,
}

impl From<Vec<PayTier>> for PayTable {
    fn from(tiers: Vec<PayTier>) -> Self {
        Self::new(tiers)
    }
}

impl From<PayTable> for Vec<PayTier> {
    fn from(table: PayTable) -> Self {
        table.tiers
    }
}

impl Default for PayTable {
    /// 8–9 → 20, 10–11 → 50, 12+ → 100
    fn default() -> Self {
        Self::new(vec![
            PayTier::new(8, 20),
            PayTier::new(10, 50),
            PayTier::new(12, 100),
        ])
    }
}

impl PayTable {
    /// Build from tiers in any order
    pub fn new(mut tiers: Vec<PayTier>) -> Self {
        tiers.sort_by_key(|t| t.min_count);
        Self { tiers }
    }

    /// Tiers ordered by ascending `min_count`
    pub fn tiers(&self) -> &[PayTier] {
        &self.tiers
    }

    /// Smallest group size that pays anything
    pub fn min_winning_count(&self) -> Option<u32> {
        self.tiers.first().map(|t| t.min_count)
    }

    /// Payout for a group of `count` identical symbols. Symbol-independent.
    pub fn payout_for(&self, count: usize) -> u64 {
        self.tiers
            .iter()
            .rev()
            .find(|t| count >= t.min_count as usize)
            .map(|t| t.payout)
            .unwrap_or(0)
    }

    pub(crate) fn validate(&self) -> ConfigResult<()> {
        if self.tiers.is_empty() {
            return Err(ConfigError::invalid("paytable needs at least one tier"));
        }
        if self.tiers.iter().any(|t| t.min_count == 0) {
            return Err(ConfigError::invalid("pay tier min_count must be positive"));
        }
        if self
            .tiers
            .windows(2)
            .any(|w| w[0].min_count == w[1].min_count)
        {
            return Err(ConfigError::invalid("duplicate pay tier min_count"));
        }
        Ok(())
    }

    /// Scan a grid for winning groups. Scatters never count.
    pub fn evaluate(&self, grid: &Grid) -> WinEvaluation {
        let mut by_symbol: BTreeMap<Symbol, Vec<Position>> = BTreeMap::new();
        for (pos, cell) in grid.cells() {
            if cell.symbol.is_scatter() {
                continue;
            }
            by_symbol.entry(cell.symbol).or_default().push(pos);
        }

        let mut evaluation = WinEvaluation::default();
        for (symbol, positions) in by_symbol {
            let payout = self.payout_for(positions.len());
            if payout == 0 {
                continue;
            }
            evaluation.total_win += payout;
            evaluation.winning_positions.extend(positions.iter().copied());
            evaluation.groups.push(WinGroup {
                symbol,
                positions,
                payout,
            });
        }
        evaluation
    }
}
