//! Multiplier bombs
//!
//! Free spins seed bombs onto the opening grid. Bombs ride with their cell
//! through tumbles and are lost when their cell explodes. Whatever survives to
//! the final grid is summed and applied once to the spin's win.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::generator::SymbolGenerator;
use crate::grid::Grid;

/// Bomb seeding configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BombConfig {
    /// Per-cell probability of a bomb
    pub chance: f64,
    /// Bomb values, drawn uniformly
    pub values: Vec<u32>,
}

impl Default for BombConfig {
    fn default() -> Self {
        Self {
            chance: 0.10,
            values: vec![2, 3, 5, 10, 25, 50, 100],
        }
    }
}

impl BombConfig {
    pub(crate) fn validate(&self) -> ConfigResult<()> {
        if !(0.0..=1.0).contains(&self.chance) {
            return Err(ConfigError::invalid(format!(
                "bomb chance must be within [0, 1], got {}",
                self.chance
            )));
        }
        if self.values.is_empty() {
            return Err(ConfigError::invalid("bomb value pool is empty"));
        }
        if self.values.contains(&0) {
            return Err(ConfigError::invalid("bomb values must be positive"));
        }
        Ok(())
    }
}

/// Copy of `grid` with bombs rolled independently on every cell, row-major
///
/// Cells that miss their roll end up with no multiplier.
pub fn seed_multipliers<G: SymbolGenerator + ?Sized>(
    grid: &Grid,
    config: &BombConfig,
    generator: &mut G,
) -> Grid {
    let mut seeded = grid.clone();
    for cell in seeded.cells_mut() {
        cell.multiplier = generator.roll_bomb(config.chance, &config.values);
    }
    seeded
}

/// Sum of every bomb on the grid, or 1 when there are none
pub fn total_multiplier(grid: &Grid) -> u64 {
    let sum: u64 = grid.bombs().map(|(_, value)| u64::from(value)).sum();
    if sum == 0 { 1 } else { sum }
}
