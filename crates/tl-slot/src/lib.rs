//! # tl-slot: Cascading-Reel Slot Engine
//!
//! Game logic for a 5×6 "tumble" slot played for points: symbols pay when
//! enough of a kind land anywhere on the board, winning cells explode, the
//! survivors fall and fresh symbols drop in until nothing pays. Free spins
//! carry multiplier bombs whose values add up and multiply the spin's win.
//!
//! ## Features
//!
//! - **Count-anywhere wins**: Flat payout tiers, adjacency ignored
//! - **Tumbles**: Gravity with order-preserving survivors and top refills
//! - **Multiplier bombs**: Free-spin only, summed once at settle
//! - **Scatters**: Trigger and retrigger awards from the final grid
//! - **Phase events**: Serializable event stream for a presentation layer
//! - **Timing profiles**: Normal, Turbo, Instant pacing, outcome-neutral
//!
//! ## Architecture
//!
//! ```text
//! TumbleEngine
//!     │
//!     ├── SlotConfig (grid, paytable, scatter rules, bombs, bet)
//!     ├── SymbolGenerator (seeded RNG or scripted)
//!     ├── SessionState (balance, free spins, session total)
//!     └── SessionStats
//!           │
//!           v
//!     begin_spin / step → PhaseEvent* → SpinSettled(SpinResult)
//!           │
//!           v
//!     PhaseScheduler → TimedPhase*
//! ```

pub mod cascade;
pub mod config;
pub mod engine;
pub mod error;
pub mod free_spins;
pub mod generator;
pub mod grid;
pub mod multiplier;
pub mod paytable;
pub mod session;
pub mod spin;
pub mod stage;
pub mod symbols;
pub mod timing;

pub use cascade::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use free_spins::*;
pub use generator::*;
pub use grid::*;
pub use multiplier::*;
pub use paytable::*;
pub use session::*;
pub use spin::*;
pub use stage::*;
pub use symbols::*;
pub use timing::*;
