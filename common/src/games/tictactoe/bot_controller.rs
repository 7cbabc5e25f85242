use crate::games::SessionRng;
use crate::identifiers::TokenId;
use super::board::{Board, get_available_moves};
use super::game_state::GameState;
use super::tokens::{Placements, TokenRegistry};
use super::types::{Candidate, Difficulty, Mark, Position, Variant};
use super::win_detector::check_win;

pub struct BotInput {
    pub board: Board,
    pub current_mark: Mark,
}

impl BotInput {
    pub fn from_game_state(state: &GameState) -> Self {
        Self {
            board: state.board,
            current_mark: state.active,
        }
    }
}

/// What the bot does with its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotDecision {
    Place(Position, Candidate),
    Pass,
}

/// Target cell for `input.current_mark`, `None` only when the board is full.
pub fn calculate_move(
    difficulty: Difficulty,
    input: &BotInput,
    rng: &mut SessionRng,
) -> Option<Position> {
    let available_moves = get_available_moves(&input.board);
    if available_moves.is_empty() {
        return None;
    }

    match difficulty {
        Difficulty::Easy => calculate_random_move(&available_moves, rng),
        Difficulty::Medium => calculate_medium_move(input, &available_moves, rng),
        Difficulty::Hard => calculate_hard_move(input, &available_moves, rng),
    }
}

fn calculate_random_move(available_moves: &[Position], rng: &mut SessionRng) -> Option<Position> {
    rng.pick(available_moves)
}

fn calculate_medium_move(
    input: &BotInput,
    available_moves: &[Position],
    rng: &mut SessionRng,
) -> Option<Position> {
    if let Some(pos) = find_tactical_move(input, available_moves) {
        return Some(pos);
    }
    calculate_random_move(available_moves, rng)
}

fn calculate_hard_move(
    input: &BotInput,
    available_moves: &[Position],
    rng: &mut SessionRng,
) -> Option<Position> {
    if let Some(pos) = find_tactical_move(input, available_moves) {
        return Some(pos);
    }

    if available_moves.contains(&Position::CENTER) {
        return Some(Position::CENTER);
    }

    let free_corners: Vec<Position> = Position::CORNERS
        .into_iter()
        .filter(|corner| available_moves.contains(corner))
        .collect();
    if let Some(pos) = rng.pick(&free_corners) {
        return Some(pos);
    }

    calculate_random_move(available_moves, rng)
}

/// Own immediate win first, then a block of the opponent's.
fn find_tactical_move(input: &BotInput, available_moves: &[Position]) -> Option<Position> {
    let bot_mark = input.current_mark;

    if let Some(pos) = find_winning_move(&input.board, bot_mark, available_moves) {
        return Some(pos);
    }

    let opponent_mark = bot_mark.opponent()?;
    find_winning_move(&input.board, opponent_mark, available_moves)
}

/// First cell in row-major order where `mark` would complete a line.
pub fn find_winning_move(board: &Board, mark: Mark, moves: &[Position]) -> Option<Position> {
    moves.iter().copied().find(|&pos| {
        board
            .with_mark(pos, mark)
            .is_ok_and(|next| check_win(&next) == Some(mark))
    })
}

/// Cheapest unused bot token that may go on `pos`.
///
/// An empty cell takes the smallest token left. An occupied cell takes the
/// smallest token strictly larger than the occupant; `None` means the bot
/// cannot afford the capture.
pub fn select_bot_token(
    pos: Position,
    tokens: &TokenRegistry,
    placements: &Placements,
    bot_mark: Mark,
) -> Option<TokenId> {
    let occupant = placements.get(&pos).and_then(|&id| tokens.size_of(id));

    tokens
        .unused(bot_mark)
        .filter(|token| occupant.is_none_or(|size| token.size > size))
        .min_by_key(|token| token.size)
        .map(|token| token.id)
}

/// Full bot turn: target cell plus the piece to put there.
pub fn decide(
    variant: Variant,
    difficulty: Difficulty,
    state: &GameState,
    rng: &mut SessionRng,
) -> BotDecision {
    let input = BotInput::from_game_state(state);
    let Some(pos) = calculate_move(difficulty, &input, rng) else {
        return BotDecision::Pass;
    };

    match variant {
        Variant::Classic => BotDecision::Place(pos, Candidate::Marker),
        Variant::Tokens => {
            match select_bot_token(pos, &state.tokens, &state.placements, input.current_mark) {
                Some(id) => BotDecision::Place(pos, Candidate::Token(id)),
                None => BotDecision::Pass,
            }
        }
    }
}
