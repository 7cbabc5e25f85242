use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::GameError;

pub const BOARD_SIZE: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    Empty,
    X,
    O,
}

impl Mark {
    pub fn opponent(&self) -> Option<Mark> {
        match self {
            Mark::X => Some(Mark::O),
            Mark::O => Some(Mark::X),
            Mark::Empty => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Mark::Empty => '.',
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Board coordinate, row-major, both components in `0..BOARD_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const CENTER: Position = Position::new(1, 1);
    pub const CORNERS: [Position; 4] = [
        Position::new(0, 0),
        Position::new(0, 2),
        Position::new(2, 0),
        Position::new(2, 2),
    ];

    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn checked(row: usize, col: usize) -> Result<Self, GameError> {
        let pos = Self::new(row, col);
        if pos.in_bounds() {
            Ok(pos)
        } else {
            Err(GameError::InvalidCoordinate { row, col })
        }
    }

    pub fn in_bounds(&self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    /// All cells in row-major order, (0,0) first.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Position::new(row, col)))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinningLine {
    pub mark: Mark,
    pub start: Position,
    pub end: Position,
}

impl WinningLine {
    pub fn new(mark: Mark, start: Position, end: Position) -> Self {
        Self { mark, start, end }
    }
}

/// Result of evaluating a board snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Undecided,
    Win(Mark),
    Draw,
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Undecided)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Participant {
    Human,
    Bot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Variant {
    /// Plain X/O markers, a cell is written once.
    #[default]
    Classic,
    /// Sized single-use tokens, larger tokens capture smaller ones.
    Tokens,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FirstMover {
    /// X always opens, so the chosen side decides who that is.
    #[default]
    X,
    Human,
    Bot,
    Random,
}

/// What a side puts on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate {
    Marker,
    Token(crate::identifiers::TokenId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    SideSelection,
    InProgress,
    Terminal,
}

/// Status classification shown to the human, derived from session fields only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    AwaitingSideSelection,
    YourTurn,
    OpponentTurn,
    YouWon,
    YouLost,
    Draw,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GameStatus::AwaitingSideSelection => "awaiting side selection",
            GameStatus::YourTurn => "your turn",
            GameStatus::OpponentTurn => "opponent turn",
            GameStatus::YouWon => "you won",
            GameStatus::YouLost => "you lost",
            GameStatus::Draw => "draw",
        };
        write!(f, "{}", text)
    }
}
