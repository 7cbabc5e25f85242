mod board;
mod bot_controller;
mod broadcaster;
mod error;
mod game_state;
mod rating;
mod session;
mod settings;
mod shared_session;
mod tokens;
mod types;
mod validate;
mod win_detector;

pub use board::{Board, get_available_moves};
pub use bot_controller::{BotDecision, BotInput, calculate_move, decide, find_winning_move, select_bot_token};
pub use broadcaster::{GameBroadcaster, NoopBroadcaster, RecordingBroadcaster, StateUpdate};
pub use error::{GameError, PlacementError};
pub use game_state::GameState;
pub use rating::{HumanResult, InMemoryRatingStore, RatingRules, RatingStore};
pub use session::{GameSession, classify_status};
pub use settings::{GameSettings, MAX_BOT_DELAY_MS};
pub use shared_session::SharedSession;
pub use tokens::{Placements, TOKENS_PER_SIDE, Token, TokenRegistry, TokenSize};
pub use types::{
    BOARD_SIZE, Candidate, Difficulty, FirstMover, GameStatus, Mark, Outcome, Participant,
    Position, SessionPhase, Variant, WinningLine,
};
pub use validate::{PlacementView, can_place, has_legal_placement, validate_move, validate_placement};
pub use win_detector::{check_token_win_with_line, check_win, check_win_with_line, evaluate, evaluate_tokens};
