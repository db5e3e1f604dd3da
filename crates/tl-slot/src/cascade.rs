//! Gravity and refill
//!
//! After a win, winning cells explode; what remains in each column falls to
//! the bottom in its original order and fresh cells drop in from the top.

use std::collections::BTreeSet;

use crate::generator::SymbolGenerator;
use crate::grid::{Cell, Grid, Position};
use crate::symbols::Symbol;

/// Remove `removed` from the grid, settle survivors and refill from the top
///
/// Survivors keep their relative vertical order and any multiplier they
/// carry. Fresh cells never carry a multiplier; they are drawn column by
/// column, top row first. Positions outside the grid are ignored.
pub fn apply_gravity<G: SymbolGenerator + ?Sized>(
    grid: &Grid,
    removed: &BTreeSet<Position>,
    generator: &mut G,
) -> Grid {
    let rows = grid.rows() as usize;
    let cols = grid.cols() as usize;
    // Every slot is overwritten below
    let mut cells = vec![Cell::new(Symbol::Cherry); rows * cols];

    for col in 0..grid.cols() {
        let survivors: Vec<Cell> = grid
            .column(col)
            .into_iter()
            .enumerate()
            .filter(|(row, _)| !removed.contains(&Position::new(*row as u8, col)))
            .map(|(_, cell)| cell)
            .collect();

        let fresh = rows - survivors.len();
        let column = (0..fresh)
            .map(|_| Cell::new(generator.next_symbol()))
            .chain(survivors);

        for (row, cell) in column.enumerate() {
            cells[row * cols + col as usize] = cell;
        }
    }

    Grid::from_cells(grid.spec(), cells)
}

/// Positions that receive fresh cells when `removed` explodes: the top
/// `n` rows of each column, where `n` is the number of removed cells in it
pub fn refilled_positions(grid: &Grid, removed: &BTreeSet<Position>) -> Vec<Position> {
    let mut per_column = vec![0u8; grid.cols() as usize];
    for pos in removed {
        if pos.row < grid.rows() && pos.col < grid.cols() {
            per_column[pos.col as usize] += 1;
        }
    }

    let mut refilled: Vec<Position> = per_column
        .iter()
        .enumerate()
        .flat_map(|(col, &count)| (0..count).map(move |row| Position::new(row, col as u8)))
        .collect();
    refilled.sort();
    refilled
}
