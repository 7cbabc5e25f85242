use super::error::GameError;
use super::types::{BOARD_SIZE, Mark, Position};

/// 3x3 grid. `Copy`, so every snapshot owns its cells and compares by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Mark; BOARD_SIZE]; BOARD_SIZE],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [[Mark::Empty; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    pub fn from_rows(cells: [[Mark; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        Self { cells }
    }

    pub fn get(&self, pos: Position) -> Result<Mark, GameError> {
        if !pos.in_bounds() {
            return Err(GameError::InvalidCoordinate {
                row: pos.row,
                col: pos.col,
            });
        }
        Ok(self.cells[pos.row][pos.col])
    }

    pub fn set(&mut self, pos: Position, mark: Mark) -> Result<(), GameError> {
        if !pos.in_bounds() {
            return Err(GameError::InvalidCoordinate {
                row: pos.row,
                col: pos.col,
            });
        }
        self.cells[pos.row][pos.col] = mark;
        Ok(())
    }

    /// Copy of this board with one cell rewritten.
    pub fn with_mark(&self, pos: Position, mark: Mark) -> Result<Board, GameError> {
        let mut next = *self;
        next.set(pos, mark)?;
        Ok(next)
    }

    pub fn rows(&self) -> &[[Mark; BOARD_SIZE]; BOARD_SIZE] {
        &self.cells
    }

    /// Cell lookup for positions already known to be in bounds.
    pub(crate) fn at(&self, pos: Position) -> Mark {
        self.cells[pos.row][pos.col]
    }

    pub fn is_full(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|&cell| cell != Mark::Empty))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&cell| cell != Mark::Empty)
            .count()
    }
}

/// Empty cells in row-major order.
pub fn get_available_moves(board: &Board) -> Vec<Position> {
    Position::all()
        .filter(|&pos| board.at(pos) == Mark::Empty)
        .collect()
}
