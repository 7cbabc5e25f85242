use super::board::Board;
use super::tokens::{Placements, TokenRegistry};
use super::types::{Mark, Outcome, Position, WinningLine};

const fn p(row: usize, col: usize) -> Position {
    Position::new(row, col)
}

/// Rows, columns, then both diagonals.
const LINES: [[Position; 3]; 8] = [
    [p(0, 0), p(0, 1), p(0, 2)],
    [p(1, 0), p(1, 1), p(1, 2)],
    [p(2, 0), p(2, 1), p(2, 2)],
    [p(0, 0), p(1, 0), p(2, 0)],
    [p(0, 1), p(1, 1), p(2, 1)],
    [p(0, 2), p(1, 2), p(2, 2)],
    [p(0, 0), p(1, 1), p(2, 2)],
    [p(0, 2), p(1, 1), p(2, 0)],
];

fn find_line(side_at: impl Fn(Position) -> Mark) -> Option<WinningLine> {
    LINES.iter().find_map(|line| {
        let mark = side_at(line[0]);
        if mark == Mark::Empty {
            return None;
        }
        if line[1..].iter().all(|&pos| side_at(pos) == mark) {
            Some(WinningLine::new(mark, line[0], line[2]))
        } else {
            None
        }
    })
}

fn outcome_of(line: Option<WinningLine>, full: bool) -> Outcome {
    match line {
        Some(line) => Outcome::Win(line.mark),
        None if full => Outcome::Draw,
        None => Outcome::Undecided,
    }
}

pub fn check_win_with_line(board: &Board) -> Option<WinningLine> {
    find_line(|pos| board.at(pos))
}

pub fn check_win(board: &Board) -> Option<Mark> {
    check_win_with_line(board).map(|line| line.mark)
}

/// Terminal evaluation of a plain marker board.
pub fn evaluate(board: &Board) -> Outcome {
    outcome_of(check_win_with_line(board), board.is_full())
}

/// Maps the token on `pos` to its owner. Unoccupied cells and unknown ids are `Empty`.
fn resolve_side(placements: &Placements, tokens: &TokenRegistry, pos: Position) -> Mark {
    placements
        .get(&pos)
        .and_then(|&id| tokens.owner_of(id))
        .unwrap_or(Mark::Empty)
}

/// Token ids on a line are all distinct, so lines are compared by resolved owner.
pub fn check_token_win_with_line(
    placements: &Placements,
    tokens: &TokenRegistry,
) -> Option<WinningLine> {
    find_line(|pos| resolve_side(placements, tokens, pos))
}

/// Terminal evaluation of a token game.
pub fn evaluate_tokens(placements: &Placements, tokens: &TokenRegistry) -> Outcome {
    let full = Position::all().all(|pos| placements.contains_key(&pos));
    outcome_of(check_token_win_with_line(placements, tokens), full)
}
