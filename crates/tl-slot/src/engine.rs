//! Tumble engine: the spin orchestrator
//!
//! A spin is a small state machine:
//!
//! ```text
//! Idle → Spinning → (Cascading ⇄ SettlingTumble)* → Settled → Idle
//! ```
//!
//! Each call to [`TumbleEngine::step`] performs exactly one instantaneous
//! transition and returns the [`PhaseEvent`] it produced. Nothing here sleeps
//! or schedules; pacing belongs to whoever consumes the events.

use std::collections::{BTreeSet, VecDeque};

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::cascade::{apply_gravity, refilled_positions};
use crate::config::SlotConfig;
use crate::error::{ConfigResult, SpinError};
use crate::generator::{RngGenerator, SymbolGenerator};
use crate::grid::{Grid, Position};
use crate::multiplier::{seed_multipliers, total_multiplier};
use crate::session::{SessionState, SessionStats, Stake};
use crate::spin::SpinResult;
use crate::stage::PhaseEvent;

/// Where the current spin is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpinPhase {
    /// No spin in flight
    #[default]
    Idle,
    /// Stake taken, opening grid dealt, not yet evaluated
    Spinning,
    /// Next step evaluates the grid for wins
    Cascading,
    /// Next step explodes the last winning cells and refills
    SettlingTumble,
    /// Outcome credited; remaining events are being handed out
    Settled,
}

/// State of the spin in flight
#[derive(Debug, Clone)]
struct SpinContext {
    spin_index: u64,
    stake: Stake,
    phase: SpinPhase,
    grid: Grid,
    accumulated_win: u64,
    cascade_count: u32,
    pending_removal: BTreeSet<Position>,
    outbox: VecDeque<PhaseEvent>,
}

impl SpinContext {
    /// Apply the multiplier, award scatters, credit the ledger and queue the
    /// closing events
    fn settle(&mut self, config: &SlotConfig, session: &mut SessionState, stats: &mut SessionStats) {
        let base_win = self.accumulated_win;
        let mut total_win = base_win;
        let mut multiplier_applied = 1;

        // The only multiplication point of a spin
        if self.stake.is_free_spin() && base_win > 0 {
            multiplier_applied = total_multiplier(&self.grid);
            total_win = base_win.saturating_mul(multiplier_applied);
            if multiplier_applied > 1 {
                log::debug!(
                    "spin {}: {}x bombs turn {} into {}",
                    self.spin_index,
                    multiplier_applied,
                    base_win,
                    total_win
                );
                self.outbox.push_back(PhaseEvent::MultiplierApplied {
                    base_win,
                    multiplier: multiplier_applied,
                    total_win,
                });
            }
        }

        let award = config
            .scatter
            .evaluate(&self.grid, session.free_spins_remaining());
        if award.is_awarded() {
            session.award_free_spins(award.spins);
            log::info!(
                "spin {}: {} scatters award {} free spins ({:?})",
                self.spin_index,
                award.scatter_count,
                award.spins,
                award.kind
            );
            self.outbox.push_back(PhaseEvent::FreeSpinsAwarded {
                award,
                free_spins_remaining: session.free_spins_remaining(),
            });
        }

        session.credit(total_win);
        let big_win = total_win > 0 && config.is_big_win(total_win);
        if big_win {
            log::info!("spin {}: big win {}", self.spin_index, total_win);
            self.outbox
                .push_back(PhaseEvent::BigWin { amount: total_win });
        }

        let result = SpinResult {
            spin_index: self.spin_index,
            stake: self.stake,
            total_win,
            base_win,
            final_grid: self.grid.clone(),
            cascade_count: self.cascade_count,
            free_spins_awarded: award.spins,
            multiplier_applied,
            scatter_award: award,
            big_win,
        };
        stats.record(&result);
        log::debug!(
            "spin {} settled: win {} after {} tumbles, balance {}",
            self.spin_index,
            total_win,
            self.cascade_count,
            session.balance()
        );

        self.outbox.push_back(PhaseEvent::SpinSettled { result });
        self.phase = SpinPhase::Settled;
    }
}

/// Cascading slot engine
///
/// Owns the session ledger and the only spin that may be in flight. Drive it
/// either with [`spin`](Self::spin) / [`play`](Self::play) for a whole spin,
/// or with [`begin_spin`](Self::begin_spin) followed by
/// [`step`](Self::step) to pace phases one by one.
pub struct TumbleEngine<G = RngGenerator<ChaCha8Rng>> {
    config: SlotConfig,
    generator: G,
    session: SessionState,
    stats: SessionStats,
    spin_count: u64,
    active: Option<SpinContext>,
}

impl TumbleEngine<RngGenerator<ChaCha8Rng>> {
    /// Default rules, entropy-seeded RNG
    pub fn new() -> Self {
        Self::build(SlotConfig::default(), RngGenerator::from_entropy())
    }

    /// Default rules, reproducible RNG
    pub fn seeded(seed: u64) -> Self {
        Self::build(SlotConfig::default(), RngGenerator::seeded(seed))
    }

    /// Custom rules, entropy-seeded RNG
    pub fn with_config(config: SlotConfig) -> ConfigResult<Self> {
        Self::with_generator(config, RngGenerator::from_entropy())
    }

    /// Reseed the RNG for reproducible results
    pub fn seed(&mut self, seed: u64) {
        self.generator = RngGenerator::seeded(seed);
    }
}

impl Default for TumbleEngine<RngGenerator<ChaCha8Rng>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: SymbolGenerator> TumbleEngine<G> {
    /// Custom rules and symbol source
    pub fn with_generator(config: SlotConfig, generator: G) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::build(config, generator))
    }

    fn build(config: SlotConfig, generator: G) -> Self {
        Self {
            session: SessionState::new(config.starting_balance),
            config,
            generator,
            stats: SessionStats::default(),
            spin_count: 0,
            active: None,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // STATE ACCESS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn config(&self) -> &SlotConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn balance(&self) -> u64 {
        self.session.balance()
    }

    pub fn free_spins_remaining(&self) -> u32 {
        self.session.free_spins_remaining()
    }

    pub fn session_win_total(&self) -> u64 {
        self.session.session_win_total()
    }

    pub fn is_spinning(&self) -> bool {
        self.session.is_spinning()
    }

    pub fn in_free_spins(&self) -> bool {
        self.session.free_spins_remaining() > 0
    }

    /// Phase of the spin in flight, `Idle` when there is none
    pub fn phase(&self) -> SpinPhase {
        self.active.as_ref().map_or(SpinPhase::Idle, |ctx| ctx.phase)
    }

    /// Grid of the spin in flight
    pub fn current_grid(&self) -> Option<&Grid> {
        self.active.as_ref().map(|ctx| &ctx.grid)
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Spins started since construction
    pub fn spin_count(&self) -> u64 {
        self.spin_count
    }

    pub fn generator_mut(&mut self) -> &mut G {
        &mut self.generator
    }

    /// Whether `begin_spin` would be accepted right now
    pub fn can_spin(&self) -> bool {
        self.active.is_none() && self.session.can_spin(self.config.bet_cost)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // LEDGER
    // ═══════════════════════════════════════════════════════════════════════════

    /// Starting balance, no free spins, no session winnings
    ///
    /// Spins cannot be cancelled, so a spin still in flight is first resolved
    /// (its events are discarded) and the reset applies on top of it.
    pub fn reset_balance(&mut self) {
        if self.active.is_some() {
            log::debug!("reset requested mid-spin; resolving spin first");
            while self.step().is_some() {}
        }
        self.session.reset(self.config.starting_balance);
        log::debug!("balance reset to {}", self.config.starting_balance);
    }

    /// Clear session statistics
    pub fn reset_stats(&mut self) {
        self.stats = SessionStats::default();
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPIN EXECUTION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Take the stake, deal the opening grid and return `SpinStarted`
    ///
    /// Rejected without side effects while another spin is in flight or
    /// when there is neither a free spin nor enough balance.
    pub fn begin_spin(&mut self) -> Result<PhaseEvent, SpinError> {
        if self.active.is_some() {
            log::warn!("spin rejected: spin {} still in flight", self.spin_count);
            return Err(SpinError::SpinAlreadyInProgress);
        }
        let stake = match self.session.begin_spin(self.config.bet_cost) {
            Ok(stake) => stake,
            Err(err) => {
                log::warn!("spin rejected: {}", err);
                return Err(err);
            }
        };

        self.spin_count += 1;
        let mut grid = Grid::generate(self.config.grid, &mut self.generator);
        if stake.is_free_spin() {
            grid = seed_multipliers(&grid, &self.config.bombs, &mut self.generator);
        }
        log::debug!(
            "spin {} started ({:?}), {} bombs",
            self.spin_count,
            stake,
            grid.bombs().count()
        );

        let event = PhaseEvent::SpinStarted {
            spin_index: self.spin_count,
            stake,
            grid: grid.clone(),
            balance: self.session.balance(),
            free_spins_remaining: self.session.free_spins_remaining(),
        };

        self.active = Some(SpinContext {
            spin_index: self.spin_count,
            stake,
            phase: SpinPhase::Spinning,
            grid,
            accumulated_win: 0,
            cascade_count: 0,
            pending_removal: BTreeSet::new(),
            outbox: VecDeque::new(),
        });

        Ok(event)
    }

    /// Advance the spin in flight by one transition
    ///
    /// Returns `None` once the spin has settled (after handing out
    /// `SpinSettled`) or when no spin is in flight.
    pub fn step(&mut self) -> Option<PhaseEvent> {
        let ctx = self.active.as_mut()?;

        if let Some(event) = ctx.outbox.pop_front() {
            if ctx.outbox.is_empty() && ctx.phase == SpinPhase::Settled {
                self.active = None;
                self.session.finish_spin();
            }
            return Some(event);
        }

        let phase = ctx.phase;
        match phase {
            SpinPhase::Spinning | SpinPhase::Cascading => {
                let evaluation = self.config.paytable.evaluate(&ctx.grid);
                if !evaluation.is_win() {
                    ctx.settle(&self.config, &mut self.session, &mut self.stats);
                    return self.step();
                }

                ctx.cascade_count += 1;
                ctx.accumulated_win = ctx.accumulated_win.saturating_add(evaluation.total_win);
                ctx.pending_removal = evaluation.winning_positions.clone();
                ctx.phase = SpinPhase::SettlingTumble;
                log::debug!(
                    "spin {} tumble {}: {} cells pay {}",
                    ctx.spin_index,
                    ctx.cascade_count,
                    evaluation.winning_positions.len(),
                    evaluation.total_win
                );

                Some(PhaseEvent::CascadeWin {
                    step: ctx.cascade_count,
                    positions: evaluation.winning_positions,
                    amount: evaluation.total_win,
                    accumulated: ctx.accumulated_win,
                    groups: evaluation.groups,
                })
            }
            SpinPhase::SettlingTumble => {
                let removed = std::mem::take(&mut ctx.pending_removal);
                let refilled = refilled_positions(&ctx.grid, &removed);
                ctx.grid = apply_gravity(&ctx.grid, &removed, &mut self.generator);
                ctx.phase = SpinPhase::Cascading;

                Some(PhaseEvent::CascadeRefill {
                    step: ctx.cascade_count,
                    grid: ctx.grid.clone(),
                    refilled,
                })
            }
            SpinPhase::Settled | SpinPhase::Idle => {
                self.active = None;
                self.session.finish_spin();
                None
            }
        }
    }

    /// Run a whole spin and return its phase events in order
    ///
    /// The first event is `SpinStarted`, the last is `SpinSettled`.
    pub fn spin(&mut self) -> Result<Vec<PhaseEvent>, SpinError> {
        let started = self.begin_spin()?;
        let mut events = vec![started];
        while let Some(event) = self.step() {
            events.push(event);
        }
        Ok(events)
    }

    /// Lazily stream a spin's phase events
    pub fn spin_stream(&mut self) -> Result<SpinStream<'_, G>, SpinError> {
        let started = self.begin_spin()?;
        Ok(SpinStream {
            engine: self,
            started: Some(started),
        })
    }

    /// Run a whole spin and return only its result
    pub fn play(&mut self) -> Result<SpinResult, SpinError> {
        match self.spin()?.pop() {
            Some(PhaseEvent::SpinSettled { result }) => Ok(result),
            _ => unreachable!("a spin always ends with SpinSettled"),
        }
    }
}

/// Iterator over one spin's phase events
///
/// Dropping the stream early does not cancel the spin: the engine keeps it in
/// flight and [`TumbleEngine::step`] resumes it.
pub struct SpinStream<'a, G: SymbolGenerator> {
    engine: &'a mut TumbleEngine<G>,
    started: Option<PhaseEvent>,
}

impl<G: SymbolGenerator> Iterator for SpinStream<'_, G> {
    type Item = PhaseEvent;

    fn next(&mut self) -> Option<PhaseEvent> {
        if let Some(event) = self.started.take() {
            return Some(event);
        }
        self.engine.step()
    }
}
