//! Timing profiles and phase scheduling
//!
//! The engine resolves a spin instantly; this module attaches presentation
//! timestamps to the resulting events. Scheduling is a pure function of the
//! events and the config, so changing the profile never changes an outcome.

use serde::{Deserialize, Serialize};

use crate::stage::PhaseEvent;

/// Timing profile for phase presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimingProfile {
    /// Regular gameplay pacing
    #[default]
    Normal,
    /// Fast play
    Turbo,
    /// Zero delays (simulation, tests)
    Instant,
    /// Derived with [`TimingConfig::scaled`]
    Custom,
}

impl TimingProfile {
    /// Parse a profile name, case-insensitive
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "normal" => Some(Self::Normal),
            "turbo" => Some(Self::Turbo),
            "instant" => Some(Self::Instant),
            _ => None,
        }
    }
}

/// Hold durations per phase, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    pub profile: TimingProfile,

    /// Pause between a grid landing and its evaluation
    pub evaluate_delay_ms: u64,

    /// Winning cells highlighted before they explode
    pub win_highlight_ms: u64,

    /// Survivors falling and fresh cells dropping in
    pub tumble_ms: u64,

    /// Bomb multiplier reveal
    pub multiplier_ms: u64,

    /// Free-spin award banner
    pub award_ms: u64,

    /// Big-win banner
    pub big_win_ms: u64,

    /// Hold after the spin settles before the next may start
    pub settle_ms: u64,
}

impl TimingConfig {
    /// Regular gameplay pacing
    pub fn normal() -> Self {
        Self {
            profile: TimingProfile::Normal,
            evaluate_delay_ms: 1000,
            win_highlight_ms: 2200,
            tumble_ms: 1200,
            multiplier_ms: 1500,
            award_ms: 2000,
            big_win_ms: 3000,
            settle_ms: 0,
        }
    }

    /// Fast play
    pub fn turbo() -> Self {
        Self {
            profile: TimingProfile::Turbo,
            evaluate_delay_ms: 300,
            win_highlight_ms: 800,
            tumble_ms: 500,
            multiplier_ms: 600,
            award_ms: 800,
            big_win_ms: 1500,
            settle_ms: 0,
        }
    }

    /// Everything at once
    pub fn instant() -> Self {
        Self {
            profile: TimingProfile::Instant,
            evaluate_delay_ms: 0,
            win_highlight_ms: 0,
            tumble_ms: 0,
            multiplier_ms: 0,
            award_ms: 0,
            big_win_ms: 0,
            settle_ms: 0,
        }
    }

    pub fn from_profile(profile: TimingProfile) -> Self {
        match profile {
            TimingProfile::Normal | TimingProfile::Custom => Self::normal(),
            TimingProfile::Turbo => Self::turbo(),
            TimingProfile::Instant => Self::instant(),
        }
    }

    /// Scale every hold by `factor` (< 1.0 = faster)
    ///
    /// Negative or NaN factors collapse to zero.
    pub fn scaled(&self, factor: f64) -> Self {
        let factor = if factor.is_nan() { 0.0 } else { factor.max(0.0) };
        let scale = |ms: u64| (ms as f64 * factor).round() as u64;
        Self {
            profile: TimingProfile::Custom,
            evaluate_delay_ms: scale(self.evaluate_delay_ms),
            win_highlight_ms: scale(self.win_highlight_ms),
            tumble_ms: scale(self.tumble_ms),
            multiplier_ms: scale(self.multiplier_ms),
            award_ms: scale(self.award_ms),
            big_win_ms: scale(self.big_win_ms),
            settle_ms: scale(self.settle_ms),
        }
    }

    /// How long the presentation rests on `event` before the next one
    pub fn hold_for(&self, event: &PhaseEvent) -> u64 {
        match event {
            PhaseEvent::SpinStarted { .. } => self.evaluate_delay_ms,
            PhaseEvent::CascadeWin { .. } => self.win_highlight_ms,
            // A refilled grid is evaluated again after the usual pause
            PhaseEvent::CascadeRefill { .. } => self.tumble_ms + self.evaluate_delay_ms,
            PhaseEvent::MultiplierApplied { .. } => self.multiplier_ms,
            PhaseEvent::FreeSpinsAwarded { .. } => self.award_ms,
            PhaseEvent::BigWin { .. } => self.big_win_ms,
            PhaseEvent::SpinSettled { .. } => self.settle_ms,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::normal()
    }
}

/// A phase event with its presentation slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedPhase {
    /// Offset from the start of the spin
    pub at_ms: u64,
    /// Time to rest on this event
    pub hold_ms: u64,
    pub event: PhaseEvent,
}

impl TimedPhase {
    pub fn end_ms(&self) -> u64 {
        self.at_ms + self.hold_ms
    }
}

/// Lays a spin's events out on a timeline
#[derive(Debug, Clone, Default)]
pub struct PhaseScheduler {
    config: TimingConfig,
}

impl PhaseScheduler {
    pub fn new(config: TimingConfig) -> Self {
        Self { config }
    }

    pub fn from_profile(profile: TimingProfile) -> Self {
        Self::new(TimingConfig::from_profile(profile))
    }

    pub fn config(&self) -> &TimingConfig {
        &self.config
    }

    /// Timestamp each event in order, starting at zero
    pub fn schedule(&self, events: &[PhaseEvent]) -> Vec<TimedPhase> {
        let mut now = 0;
        events
            .iter()
            .map(|event| {
                let hold_ms = self.config.hold_for(event);
                let phase = TimedPhase {
                    at_ms: now,
                    hold_ms,
                    event: event.clone(),
                };
                now += hold_ms;
                phase
            })
            .collect()
    }

    /// Wall-clock length of a spin's presentation
    pub fn total_duration_ms(&self, events: &[PhaseEvent]) -> u64 {
        events.iter().map(|e| self.config.hold_for(e)).sum()
    }
}
