//! Scatter evaluation and free-spin awards
//!
//! Scatters are counted on the final grid of a spin, after every tumble.
//! Rules are checked in priority order and only the first match pays:
//! - `trigger_count`+ scatters award `trigger_award` spins in any mode
//! - `retrigger_count`+ scatters award `retrigger_award` spins, but only while
//!   free spins remain after the current spin's own consumption

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::grid::Grid;

/// Scatter thresholds and awards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterRules {
    /// Scatters needed for a full trigger
    pub trigger_count: u32,
    /// Spins awarded by a full trigger
    pub trigger_award: u32,
    /// Scatters needed to extend a running free-spin round
    pub retrigger_count: u32,
    /// Spins awarded by a retrigger
    pub retrigger_award: u32,
}

impl Default for ScatterRules {
    fn default() -> Self {
        Self {
            trigger_count: 4,
            trigger_award: 10,
            retrigger_count: 3,
            retrigger_award: 5,
        }
    }
}

/// Which rule fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AwardKind {
    #[default]
    None,
    Trigger,
    Retrigger,
}

/// Outcome of a scatter evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ScatterAward {
    pub scatter_count: u32,
    pub kind: AwardKind,
    /// Free spins to add to the counter
    pub spins: u32,
}

impl ScatterAward {
    pub fn is_awarded(&self) -> bool {
        self.spins > 0
    }
}

impl ScatterRules {
    pub(crate) fn validate(&self) -> ConfigResult<()> {
        if self.trigger_count == 0 || self.retrigger_count == 0 {
            return Err(ConfigError::invalid("scatter thresholds must be positive"));
        }
        if self.retrigger_count > self.trigger_count {
            return Err(ConfigError::invalid(format!(
                "retrigger threshold {} exceeds trigger threshold {}",
                self.retrigger_count, self.trigger_count
            )));
        }
        Ok(())
    }

    /// Count scatters on `grid` and decide the award
    ///
    /// `free_spins_remaining` is the counter after this spin consumed its own
    /// free spin, if it used one.
    pub fn evaluate(&self, grid: &Grid, free_spins_remaining: u32) -> ScatterAward {
        let count = u32::try_from(grid.scatter_count()).unwrap_or(u32::MAX);
        self.evaluate_count(count, free_spins_remaining)
    }

    /// Decide the award for a known scatter count
    pub fn evaluate_count(&self, scatter_count: u32, free_spins_remaining: u32) -> ScatterAward {
        let (kind, spins) = if scatter_count >= self.trigger_count {
            (AwardKind::Trigger, self.trigger_award)
        } else if scatter_count >= self.retrigger_count && free_spins_remaining > 0 {
            (AwardKind::Retrigger, self.retrigger_award)
        } else {
            (AwardKind::None, 0)
        };

        ScatterAward {
            scatter_count,
            kind,
            spins,
        }
    }
}
