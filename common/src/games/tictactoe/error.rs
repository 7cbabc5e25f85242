use std::fmt;

use crate::identifiers::TokenId;
use super::tokens::TokenSize;
use super::types::Mark;

/// Why a candidate cannot go on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    CellOccupied,
    CellOccupiedByLargerOrEqual {
        occupant: TokenSize,
        candidate: TokenSize,
    },
    TokenAlreadyUsed(TokenId),
    UnknownToken(TokenId),
    TokenNotOwned(TokenId),
    WrongPieceKind,
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementError::CellOccupied => write!(f, "Cell is already marked"),
            PlacementError::CellOccupiedByLargerOrEqual { occupant, candidate } => write!(
                f,
                "Cell holds a {} token, a {} token cannot capture it",
                occupant, candidate
            ),
            PlacementError::TokenAlreadyUsed(id) => write!(f, "Token {} was already used", id),
            PlacementError::UnknownToken(id) => write!(f, "Token {} does not exist", id),
            PlacementError::TokenNotOwned(id) => write!(f, "Token {} belongs to the other side", id),
            PlacementError::WrongPieceKind => {
                write!(f, "Piece kind does not match the game variant")
            }
        }
    }
}

/// Rejection of a session operation. The session is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    InvalidCoordinate { row: usize, col: usize },
    NotYourTurn { expected: Mark, actual: Mark },
    GameOver,
    SideNotSelected,
    AlreadyStarted,
    IllegalPlacement(PlacementError),
    NothingToPass,
    SessionBusy,
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::InvalidCoordinate { row, col } => {
                write!(f, "Position ({}, {}) is out of bounds", row, col)
            }
            GameError::NotYourTurn { expected, actual } => {
                write!(f, "Not your turn: {} to move, got {}", expected, actual)
            }
            GameError::GameOver => write!(f, "Game is already over"),
            GameError::SideNotSelected => write!(f, "Sides have not been selected yet"),
            GameError::AlreadyStarted => write!(f, "Sides were already selected"),
            GameError::IllegalPlacement(e) => write!(f, "Illegal placement: {}", e),
            GameError::NothingToPass => write!(f, "A legal placement exists, passing is not allowed"),
            GameError::SessionBusy => write!(f, "Another move is being applied"),
        }
    }
}

impl std::error::Error for GameError {}

impl std::error::Error for PlacementError {}

impl From<PlacementError> for GameError {
    fn from(e: PlacementError) -> Self {
        GameError::IllegalPlacement(e)
    }
}
