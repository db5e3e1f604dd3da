//! Slot engine configuration
//!
//! Every tunable of the game lives in [`SlotConfig`], which loads from JSON or
//! YAML so tests and tools can change the rules without touching code.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::free_spins::ScatterRules;
use crate::multiplier::BombConfig;
use crate::paytable::PayTable;

/// Grid specification (rows × columns)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Visible rows per column
    pub rows: u8,
    /// Number of columns (reels)
    pub cols: u8,
}

impl GridSpec {
    pub const fn new(rows: u8, cols: u8) -> Self {
        Self { rows, cols }
    }

    /// Standard 5 rows × 6 columns tumble board
    pub const fn standard_5x6() -> Self {
        Self::new(5, 6)
    }

    /// Total grid positions
    pub fn total_positions(&self) -> usize {
        self.rows as usize * self.cols as usize
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::standard_5x6()
    }
}

/// Complete slot configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotConfig {
    /// Game name
    pub name: String,
    /// Grid specification
    pub grid: GridSpec,
    /// Points debited per paid spin
    pub bet_cost: u64,
    /// Balance after a reset
    pub starting_balance: u64,
    /// Count-anywhere payout tiers
    pub paytable: PayTable,
    /// Scatter thresholds and free-spin awards
    pub scatter: ScatterRules,
    /// Multiplier bombs seeded on free spins
    pub bombs: BombConfig,
    /// Spin total (after multiplier) that raises the big-win signal
    pub big_win_threshold: u64,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            name: "Tumble Lab".into(),
            grid: GridSpec::default(),
            bet_cost: 20,
            starting_balance: 5000,
            paytable: PayTable::default(),
            scatter: ScatterRules::default(),
            bombs: BombConfig::default(),
            big_win_threshold: 200,
        }
    }
}

impl SlotConfig {
    /// Reject configurations the engine cannot play
    pub fn validate(&self) -> ConfigResult<()> {
        if self.grid.rows == 0 || self.grid.cols == 0 {
            return Err(ConfigError::invalid(format!(
                "grid must have at least one row and column, got {}x{}",
                self.grid.rows, self.grid.cols
            )));
        }
        if self.bet_cost == 0 {
            return Err(ConfigError::invalid("bet_cost must be positive"));
        }
        self.paytable.validate()?;
        self.scatter.validate()?;
        self.bombs.validate()?;
        Ok(())
    }

    /// Whether a credited spin total earns the big-win signal
    pub fn is_big_win(&self, amount: u64) -> bool {
        amount >= self.big_win_threshold
    }

    /// Builder: replace the grid
    pub fn with_grid(mut self, grid: GridSpec) -> Self {
        self.grid = grid;
        self
    }

    /// Builder: replace the bet cost
    pub fn with_bet_cost(mut self, bet_cost: u64) -> Self {
        self.bet_cost = bet_cost;
        self
    }

    /// Builder: replace the starting balance
    pub fn with_starting_balance(mut self, balance: u64) -> Self {
        self.starting_balance = balance;
        self
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a YAML config
    pub fn from_yaml(yaml: &str) -> ConfigResult<Self> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yml::to_string(self)?)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Self::from_json(&text),
            "yaml" | "yml" => Self::from_yaml(&text),
            _ => Err(ConfigError::UnknownFormat(path.display().to_string())),
        }
    }
}
