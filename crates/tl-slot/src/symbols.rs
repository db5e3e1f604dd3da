//! Symbol alphabet

use std::fmt;

use serde::{Deserialize, Serialize};

/// Symbol type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SymbolType {
    /// Regular paying symbol, counted anywhere on the board
    Regular = 0,
    /// Scatter - never pays, only triggers free spins
    Scatter = 1,
}

/// One of the eight symbols that can land on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Symbol {
    Cherry = 0,
    Banana = 1,
    Grape = 2,
    Watermelon = 3,
    Heart = 4,
    PurpleSquare = 5,
    GreenStar = 6,
    /// Scatter
    Lollipop = 7,
}

impl Symbol {
    /// Full alphabet in id order. Generators draw uniformly from this.
    pub const ALL: [Symbol; 8] = [
        Symbol::Cherry,
        Symbol::Banana,
        Symbol::Grape,
        Symbol::Watermelon,
        Symbol::Heart,
        Symbol::PurpleSquare,
        Symbol::GreenStar,
        Symbol::Lollipop,
    ];

    /// Number of symbols in the alphabet
    pub const COUNT: usize = Self::ALL.len();

    /// The scatter symbol
    pub const SCATTER: Symbol = Symbol::Lollipop;

    /// Symbol from its numeric id (0..8)
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    /// Numeric id
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn symbol_type(self) -> SymbolType {
        match self {
            Symbol::Lollipop => SymbolType::Scatter,
            _ => SymbolType::Regular,
        }
    }

    pub fn is_scatter(self) -> bool {
        self.symbol_type() == SymbolType::Scatter
    }

    /// Short uppercase name (e.g. "CHERRY", "LOLLIPOP")
    pub fn name(self) -> &'static str {
        match self {
            Symbol::Cherry => "CHERRY",
            Symbol::Banana => "BANANA",
            Symbol::Grape => "GRAPE",
            Symbol::Watermelon => "WATERMELON",
            Symbol::Heart => "HEART",
            Symbol::PurpleSquare => "PURPLE_SQUARE",
            Symbol::GreenStar => "GREEN_STAR",
            Symbol::Lollipop => "LOLLIPOP",
        }
    }

    /// Regular (paying) symbols only
    pub fn regular() -> impl Iterator<Item = Symbol> {
        Self::ALL.into_iter().filter(|s| !s.is_scatter())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
