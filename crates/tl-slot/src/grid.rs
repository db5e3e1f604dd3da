//! Grid model
//!
//! A fixed `rows × cols` board stored row-major. Row 0 is the top row, so
//! gravity pulls cells toward `rows - 1`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::GridSpec;
use crate::generator::SymbolGenerator;
use crate::symbols::Symbol;

/// Cell coordinate. Orders row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.col)
    }
}

/// One board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub symbol: Symbol,
    /// Multiplier bomb value, only ever present during free spins
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<u32>,
}

impl Cell {
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            multiplier: None,
        }
    }

    pub fn with_multiplier(symbol: Symbol, multiplier: u32) -> Self {
        Self {
            symbol,
            multiplier: Some(multiplier),
        }
    }
}

/// Fully populated board
///
/// `Clone` is a deep copy: cells are plain values, so a cloned grid never
/// shares state with its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: u8,
    cols: u8,
    cells: Vec<Cell>,
}

impl Grid {
    /// Fill every cell with an independent draw, row by row
    pub fn generate<G: SymbolGenerator + ?Sized>(spec: GridSpec, generator: &mut G) -> Self {
        let cells = (0..spec.total_positions())
            .map(|_| Cell::new(generator.next_symbol()))
            .collect();
        Self {
            rows: spec.rows,
            cols: spec.cols,
            cells,
        }
    }

    /// Build from row-major symbol rows. Returns `None` for ragged or empty
    /// input.
    pub fn from_symbols(rows: &[Vec<Symbol>]) -> Option<Self> {
        let row_count = u8::try_from(rows.len()).ok()?;
        let col_count = u8::try_from(rows.first()?.len()).ok()?;
        if row_count == 0 || col_count == 0 {
            return None;
        }
        if rows.iter().any(|r| r.len() != col_count as usize) {
            return None;
        }
        let cells = rows.iter().flatten().copied().map(Cell::new).collect();
        Some(Self {
            rows: row_count,
            cols: col_count,
            cells,
        })
    }

    pub(crate) fn from_cells(spec: GridSpec, cells: Vec<Cell>) -> Self {
        debug_assert_eq!(cells.len(), spec.total_positions());
        Self {
            rows: spec.rows,
            cols: spec.cols,
            cells,
        }
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    pub fn spec(&self) -> GridSpec {
        GridSpec::new(self.rows, self.cols)
    }

    /// Number of cells (always `rows × cols`)
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn index(&self, pos: Position) -> Option<usize> {
        (pos.row < self.rows && pos.col < self.cols)
            .then(|| pos.row as usize * self.cols as usize + pos.col as usize)
    }

    fn position_of(&self, index: usize) -> Position {
        let cols = self.cols as usize;
        Position::new((index / cols) as u8, (index % cols) as u8)
    }

    pub fn get(&self, pos: Position) -> Option<&Cell> {
        self.index(pos).map(|i| &self.cells[i])
    }

    pub fn symbol_at(&self, pos: Position) -> Option<Symbol> {
        self.get(pos).map(|c| c.symbol)
    }

    /// Place or clear a multiplier bomb. Returns false when out of bounds.
    pub fn set_multiplier(&mut self, pos: Position, multiplier: Option<u32>) -> bool {
        match self.index(pos) {
            Some(i) => {
                self.cells[i].multiplier = multiplier;
                true
            }
            None => false,
        }
    }

    /// All positions, row-major
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cells.len()).map(|i| self.position_of(i))
    }

    /// All cells with their positions, row-major
    pub fn cells(&self) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, cell)| (self.position_of(i), cell))
    }

    pub(crate) fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> + '_ {
        self.cells.iter_mut()
    }

    /// Cells of one column, top to bottom
    pub fn column(&self, col: u8) -> Vec<Cell> {
        if col >= self.cols {
            return Vec::new();
        }
        (0..self.rows)
            .map(|row| self.cells[row as usize * self.cols as usize + col as usize])
            .collect()
    }

    /// How many cells hold `symbol`
    pub fn count(&self, symbol: Symbol) -> usize {
        self.cells.iter().filter(|c| c.symbol == symbol).count()
    }

    pub fn scatter_count(&self) -> usize {
        self.count(Symbol::SCATTER)
    }

    /// Multiplier bombs currently on the board
    pub fn bombs(&self) -> impl Iterator<Item = (Position, u32)> + '_ {
        self.cells()
            .filter_map(|(pos, cell)| cell.multiplier.map(|m| (pos, m)))
    }

    /// Symbols as row-major rows
    pub fn symbol_rows(&self) -> Vec<Vec<Symbol>> {
        self.cells
            .chunks(self.cols as usize)
            .map(|row| row.iter().map(|c| c.symbol).collect())
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols as usize) {
            let line: Vec<String> = row
                .iter()
                .map(|cell| match cell.multiplier {
                    Some(m) => format!("{}x{}", cell.symbol.id(), m),
                    None => cell.symbol.id().to_string(),
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
