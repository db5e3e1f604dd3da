//! Scripted spin scenarios for tl-slot
//!
//! Every board here is dealt by a ScriptedGenerator, so each test pins an
//! exact outcome:
//! - Paytable tiers and count-anywhere wins
//! - Free-spin trigger, retrigger and rule priority
//! - Multiplier bombs, including bombs lost in explosions and wins summed
//!   across several tumbles
//! - Ledger rejections and reset

use tl_slot::{
    AwardKind, GridSpec, PhaseEvent, ScatterRules, ScriptedGenerator, SlotConfig, SpinError,
    SpinPhase, Stake, Symbol, TumbleEngine,
};

use tl_slot::Symbol::{
    Banana as B, Cherry as C, Grape as G, GreenStar as S, Heart as H, Lollipop as L,
    PurpleSquare as P, Watermelon as W,
};

// ═══════════════════════════════════════════════════════════════════════════════
// BOARDS
// ═══════════════════════════════════════════════════════════════════════════════

fn flatten(rows: [[Symbol; 6]; 5]) -> Vec<Symbol> {
    rows.into_iter().flatten().collect()
}

/// `lead` in the top row, then regular symbols round-robin: no paying group
/// and no scatters outside `lead`
fn quiet_board(lead: &[Symbol]) -> Vec<Symbol> {
    let regular: Vec<Symbol> = Symbol::regular().collect();
    let mut cells = lead.to_vec();
    let mut i = 0;
    while cells.len() < 30 {
        cells.push(regular[i % regular.len()]);
        i += 1;
    }
    cells
}

/// Exactly eight cherries, everything else below eight of a kind
fn eight_cherries() -> Vec<Symbol> {
    flatten([
        [C, C, C, C, C, C],
        [C, C, B, G, W, H],
        [P, S, B, G, W, H],
        [P, S, B, G, W, H],
        [P, S, B, G, W, H],
    ])
}

/// Refill for the eight-cherry board (columns 0 and 1 take two cells, the
/// rest one) that leaves nothing paying
fn eight_cherry_refill() -> Vec<Symbol> {
    vec![B, G, W, H, P, S, B, G]
}

/// Bomb rolls for the eight-cherry board: 5 on (2,0), 10 on (2,5)
fn surviving_bombs() -> Vec<Option<u32>> {
    let mut rolls = vec![None; 18];
    rolls[12] = Some(5);
    rolls[17] = Some(10);
    rolls
}

fn engine(config: SlotConfig, script: Vec<Symbol>) -> TumbleEngine<ScriptedGenerator> {
    TumbleEngine::with_generator(config, ScriptedGenerator::new(script)).unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════════
// WINS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_eight_of_a_kind_pays_lowest_tier() {
    let mut script = eight_cherries();
    script.extend(eight_cherry_refill());
    let mut engine = engine(SlotConfig::default(), script);

    let events = engine.spin().unwrap();
    let win = events
        .iter()
        .find_map(|e| match e {
            PhaseEvent::CascadeWin {
                positions,
                amount,
                groups,
                ..
            } => Some((positions.clone(), *amount, groups.clone())),
            _ => None,
        })
        .unwrap();

    assert_eq!(win.0.len(), 8);
    assert_eq!(win.1, 20);
    assert_eq!(win.2.len(), 1);
    assert_eq!(win.2[0].symbol, Symbol::Cherry);

    let result = events.last().and_then(PhaseEvent::settled).unwrap();
    assert_eq!(result.total_win, 20);
    assert_eq!(result.cascade_count, 1);
    assert_eq!(result.multiplier_applied, 1);
    assert!(!result.big_win);
    assert_eq!(engine.balance(), 5000);
    assert_eq!(engine.session_win_total(), 20);
}

#[test]
fn test_refill_lands_where_the_cherries_were() {
    let mut script = eight_cherries();
    script.extend(eight_cherry_refill());
    let mut engine = engine(SlotConfig::default(), script);

    let events = engine.spin().unwrap();
    let (grid, refilled) = events
        .iter()
        .find_map(|e| match e {
            PhaseEvent::CascadeRefill { grid, refilled, .. } => Some((grid.clone(), refilled.clone())),
            _ => None,
        })
        .unwrap();

    assert_eq!(refilled.len(), 8);
    assert_eq!(grid.count(Symbol::Cherry), 0);
    // Column 0 drew Banana then Grape, top first
    assert_eq!(grid.column(0)[0].symbol, B);
    assert_eq!(grid.column(0)[1].symbol, G);
    assert_eq!(grid.column(0)[2].symbol, P);
}

#[test]
fn test_simultaneous_groups_pay_independently() {
    // 12 cherries and 10 bananas: 100 + 50
    let board = flatten([
        [C, C, C, C, C, C],
        [C, C, C, C, C, C],
        [B, B, B, B, B, B],
        [B, B, B, B, G, W],
        [H, P, S, G, W, H],
    ]);
    let mut script = board;
    // 22 refills, round-robin over the five non-winning symbols
    script.extend([G, W, H, P, S].iter().copied().cycle().take(22));
    let mut engine = engine(SlotConfig::default(), script);

    let result = engine.play().unwrap();
    assert_eq!(result.base_win, 150);
    assert_eq!(result.cascade_count, 1);
    assert_eq!(engine.balance(), 5000 - 20 + 150);
}

// ═══════════════════════════════════════════════════════════════════════════════
// FREE SPINS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_four_scatters_trigger_free_spins() {
    let mut engine = engine(SlotConfig::default(), quiet_board(&[L, L, L, L]));

    let events = engine.spin().unwrap();
    let award = events
        .iter()
        .find_map(|e| match e {
            PhaseEvent::FreeSpinsAwarded { award, free_spins_remaining } => {
                Some((*award, *free_spins_remaining))
            }
            _ => None,
        })
        .unwrap();

    assert_eq!(award.0.kind, AwardKind::Trigger);
    assert_eq!(award.0.spins, 10);
    assert_eq!(award.1, 10);
    assert_eq!(engine.free_spins_remaining(), 10);
    assert_eq!(engine.balance(), 4980);
    assert_eq!(engine.stats().triggers, 1);
}

#[test]
fn test_three_scatters_outside_free_spins_award_nothing() {
    let mut engine = engine(SlotConfig::default(), quiet_board(&[L, L, L]));
    let result = engine.play().unwrap();
    assert_eq!(result.scatter_count(), 3);
    assert_eq!(result.free_spins_awarded, 0);
    assert_eq!(engine.free_spins_remaining(), 0);
}

#[test]
fn test_retrigger_during_free_spins() {
    let mut script = quiet_board(&[L, L, L, L]);
    script.extend(quiet_board(&[L, L, L]));
    let mut engine = engine(SlotConfig::default(), script);

    engine.play().unwrap();
    let result = engine.play().unwrap();

    assert_eq!(result.stake, Stake::FreeSpin);
    assert_eq!(result.scatter_award.kind, AwardKind::Retrigger);
    assert_eq!(result.free_spins_awarded, 5);
    // 10 - 1 consumed + 5
    assert_eq!(engine.free_spins_remaining(), 14);
    assert_eq!(engine.balance(), 4980);
}

#[test]
fn test_four_scatters_during_free_spins_use_trigger_rule() {
    let mut script = quiet_board(&[L, L, L, L]);
    script.extend(quiet_board(&[L, L, L, L, L]));
    let mut engine = engine(SlotConfig::default(), script);

    engine.play().unwrap();
    let result = engine.play().unwrap();

    assert_eq!(result.scatter_award.kind, AwardKind::Trigger);
    assert_eq!(result.free_spins_awarded, 10);
    assert_eq!(engine.free_spins_remaining(), 19);
}

#[test]
fn test_last_free_spin_cannot_retrigger() {
    let config = SlotConfig {
        scatter: ScatterRules {
            trigger_award: 1,
            ..ScatterRules::default()
        },
        ..SlotConfig::default()
    };
    let mut script = quiet_board(&[L, L, L, L]);
    script.extend(quiet_board(&[L, L, L]));
    let mut engine = engine(config, script);

    engine.play().unwrap();
    assert_eq!(engine.free_spins_remaining(), 1);

    // The counter reads 0 once this spin consumed its free spin
    let result = engine.play().unwrap();
    assert!(result.is_free_spin());
    assert_eq!(result.scatter_award.kind, AwardKind::None);
    assert_eq!(engine.free_spins_remaining(), 0);
}

#[test]
fn test_free_spin_played_with_empty_balance() {
    let config = SlotConfig::default().with_starting_balance(20);
    let mut engine = engine(config, quiet_board(&[L, L, L, L]));

    engine.play().unwrap();
    assert_eq!(engine.balance(), 0);

    let result = engine.play().unwrap();
    assert_eq!(result.stake, Stake::FreeSpin);
    assert_eq!(engine.balance(), 0);
    assert_eq!(engine.free_spins_remaining(), 9);
}

// ═══════════════════════════════════════════════════════════════════════════════
// MULTIPLIER BOMBS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_surviving_bombs_multiply_free_spin_win() {
    let mut script = quiet_board(&[L, L, L, L]);
    script.extend(eight_cherries());
    script.extend(eight_cherry_refill());
    let generator = ScriptedGenerator::new(script).with_bombs(surviving_bombs());
    let mut engine = TumbleEngine::with_generator(SlotConfig::default(), generator).unwrap();

    engine.play().unwrap();
    let events = engine.spin().unwrap();

    let kinds: Vec<&str> = events.iter().map(PhaseEvent::type_name).collect();
    assert_eq!(
        kinds,
        [
            "spin_started",
            "cascade_win",
            "cascade_refill",
            "multiplier_applied",
            "big_win",
            "spin_settled"
        ]
    );
    assert!(events.contains(&PhaseEvent::MultiplierApplied {
        base_win: 20,
        multiplier: 15,
        total_win: 300,
    }));

    let result = events.last().and_then(PhaseEvent::settled).unwrap();
    assert_eq!(result.base_win, 20);
    assert_eq!(result.total_win, 300);
    assert_eq!(result.multiplier_applied, 15);
    assert!(result.big_win);
    assert_eq!(result.final_grid.bombs().count(), 2);

    assert_eq!(engine.balance(), 4980 + 300);
    assert_eq!(engine.free_spins_remaining(), 9);
    assert_eq!(engine.stats().big_wins, 1);
    assert_eq!(engine.stats().max_multiplier, 15);
}

#[test]
fn test_bomb_on_exploding_cell_is_lost() {
    let mut script = quiet_board(&[L, L, L, L]);
    script.extend(eight_cherries());
    script.extend(eight_cherry_refill());
    // 50 sits on a cherry at (0,0), only the 5 survives
    let mut rolls = vec![None; 13];
    rolls[0] = Some(50);
    rolls[12] = Some(5);
    let generator = ScriptedGenerator::new(script).with_bombs(rolls);
    let mut engine = TumbleEngine::with_generator(SlotConfig::default(), generator).unwrap();

    engine.play().unwrap();
    let result = engine.play().unwrap();
    assert_eq!(result.multiplier_applied, 5);
    assert_eq!(result.total_win, 100);
    assert!(!result.big_win);
}

#[test]
fn test_bombs_without_win_pay_nothing() {
    let mut script = quiet_board(&[L, L, L, L]);
    script.extend(quiet_board(&[]));
    let generator = ScriptedGenerator::new(script).with_bombs(vec![Some(100); 30]);
    let mut engine = TumbleEngine::with_generator(SlotConfig::default(), generator).unwrap();

    engine.play().unwrap();
    let events = engine.spin().unwrap();
    assert!(!events.iter().any(|e| matches!(e, PhaseEvent::MultiplierApplied { .. })));

    let result = events.last().and_then(PhaseEvent::settled).unwrap();
    assert_eq!(result.total_win, 0);
    assert_eq!(result.multiplier_applied, 1);
}

#[test]
fn test_paid_spin_never_rolls_bombs() {
    let mut script = eight_cherries();
    script.extend(eight_cherry_refill());
    let generator = ScriptedGenerator::new(script).with_bombs(surviving_bombs());
    let mut engine = TumbleEngine::with_generator(SlotConfig::default(), generator).unwrap();

    let result = engine.play().unwrap();
    assert_eq!(result.final_grid.bombs().count(), 0);
    assert_eq!(result.total_win, 20);
}

#[test]
fn test_multiplier_applies_once_to_summed_cascades() {
    let mut script = quiet_board(&[L, L, L, L]);
    script.extend(eight_cherries());
    // First refill: six bananas join the four in column 2 (10 pay 50)
    script.extend([B, B, B, B, B, B, G, W]);
    // Second refill: nothing reaches eight
    script.extend([H, H, P, P, S, S, C, C, C, H]);
    // 25 on a cherry (lost in tumble 1), 100 on the banana at (1,2)
    // (lost in tumble 2), 5 on (2,0) survives both
    let mut rolls = vec![None; 13];
    rolls[0] = Some(25);
    rolls[8] = Some(100);
    rolls[12] = Some(5);
    let generator = ScriptedGenerator::new(script).with_bombs(rolls);
    let mut engine = TumbleEngine::with_generator(SlotConfig::default(), generator).unwrap();

    engine.play().unwrap();
    let events = engine.spin().unwrap();

    let wins: Vec<(u64, u64)> = events
        .iter()
        .filter_map(|e| match e {
            PhaseEvent::CascadeWin {
                amount, accumulated, ..
            } => Some((*amount, *accumulated)),
            _ => None,
        })
        .collect();
    assert_eq!(wins, vec![(20, 20), (50, 70)]);

    let multiplied: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, PhaseEvent::MultiplierApplied { .. }))
        .collect();
    assert_eq!(
        multiplied,
        [&PhaseEvent::MultiplierApplied {
            base_win: 70,
            multiplier: 5,
            total_win: 350,
        }]
    );

    let result = events.last().and_then(PhaseEvent::settled).unwrap();
    assert_eq!(result.cascade_count, 2);
    assert_eq!(result.base_win, 70);
    assert_eq!(result.multiplier_applied, 5);
    assert_eq!(result.total_win, 350);
    assert!(result.big_win);
    let bombs: Vec<_> = result.final_grid.bombs().collect();
    assert_eq!(bombs, [(tl_slot::Position::new(2, 0), 5)]);
    assert_eq!(engine.balance(), 4980 + 350);
}

// ═══════════════════════════════════════════════════════════════════════════════
// LEDGER
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_insufficient_funds_after_balance_runs_out() {
    let config = SlotConfig::default().with_starting_balance(40);
    let mut engine = engine(config, Vec::new());

    engine.play().unwrap();
    engine.play().unwrap();
    assert_eq!(engine.balance(), 0);

    let err = engine.play().unwrap_err();
    assert_eq!(err, SpinError::InsufficientFunds { balance: 0, bet: 20 });
    assert_eq!(err.to_string(), "Insufficient funds: balance 0 is below bet cost 20");
    assert_eq!(engine.balance(), 0);
    assert_eq!(engine.phase(), SpinPhase::Idle);
}

#[test]
fn test_spin_rejected_while_in_flight() {
    let mut engine = engine(SlotConfig::default(), Vec::new());
    engine.begin_spin().unwrap();
    assert_eq!(engine.play().unwrap_err(), SpinError::SpinAlreadyInProgress);
    assert_eq!(engine.balance(), 4980);
    assert_eq!(engine.stats().total_spins, 0);
}

#[test]
fn test_reset_balance_restores_start() {
    let mut script = quiet_board(&[L, L, L, L]);
    script.extend(eight_cherries());
    script.extend(eight_cherry_refill());
    let generator = ScriptedGenerator::new(script).with_bombs(surviving_bombs());
    let mut engine = TumbleEngine::with_generator(SlotConfig::default(), generator).unwrap();

    engine.play().unwrap();
    engine.play().unwrap();
    assert_ne!(engine.balance(), 5000);

    engine.reset_balance();
    assert_eq!(engine.balance(), 5000);
    assert_eq!(engine.free_spins_remaining(), 0);
    assert_eq!(engine.session_win_total(), 0);
    // Statistics survive a balance reset
    assert_eq!(engine.stats().total_spins, 2);
}

#[test]
fn test_small_grid_config() {
    let config = SlotConfig::default().with_grid(GridSpec::new(3, 3));
    let mut engine = engine(config, Vec::new());
    let result = engine.play().unwrap();
    assert_eq!(result.final_grid.len(), 9);
    assert_eq!(result.total_win, 0);
}
