use super::board::Board;
use super::error::GameError;
use super::tokens::{Placements, TokenRegistry};
use super::types::{Candidate, Mark, Outcome, Position, Variant, WinningLine};
use super::validate::{PlacementView, has_legal_placement, validate_move};
use super::win_detector::{check_token_win_with_line, check_win_with_line, evaluate, evaluate_tokens};

/// One game from the first move to the result. Cloning yields an independent snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub active: Mark,
    pub outcome: Outcome,
    pub turn: u32,
    pub placements: Placements,
    pub tokens: TokenRegistry,
    pub last_move: Option<Position>,
    pub winning_line: Option<WinningLine>,
}

impl GameState {
    pub fn new(first: Mark, human_mark: Mark, bot_mark: Mark) -> Self {
        Self {
            board: Board::new(),
            active: first,
            outcome: Outcome::Undecided,
            turn: 0,
            placements: Placements::new(),
            tokens: TokenRegistry::new(human_mark, bot_mark),
            last_move: None,
            winning_line: None,
        }
    }

    pub fn view(&self) -> PlacementView<'_> {
        PlacementView {
            board: &self.board,
            placements: &self.placements,
            tokens: &self.tokens,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }

    fn check_turn(&self, side: Mark) -> Result<(), GameError> {
        if self.is_terminal() {
            return Err(GameError::GameOver);
        }
        if side != self.active {
            return Err(GameError::NotYourTurn {
                expected: self.active,
                actual: side,
            });
        }
        Ok(())
    }

    /// Validates first and only then writes, so a rejected move changes nothing.
    pub fn place(
        &mut self,
        variant: Variant,
        side: Mark,
        pos: Position,
        candidate: Candidate,
    ) -> Result<(), GameError> {
        self.check_turn(side)?;
        validate_move(self.view(), variant, side, pos, candidate)?;

        if let Candidate::Token(id) = candidate {
            self.placements.insert(pos, id);
            self.tokens.mark_used(id);
        }
        self.board.set(pos, side)?;
        self.last_move = Some(pos);

        self.finish_turn(variant);
        Ok(())
    }

    /// Skips the turn of a side that has nothing it could place.
    pub fn pass(&mut self, variant: Variant, side: Mark) -> Result<(), GameError> {
        self.check_turn(side)?;
        if has_legal_placement(self.view(), variant, side) {
            return Err(GameError::NothingToPass);
        }
        self.finish_turn(variant);
        Ok(())
    }

    /// Forced skip of the active side, used when the bot cannot pay for its move.
    pub(crate) fn skip_turn(&mut self, variant: Variant) {
        if !self.is_terminal() {
            self.finish_turn(variant);
        }
    }

    fn finish_turn(&mut self, variant: Variant) {
        self.turn += 1;
        self.check_game_over(variant);

        if !self.is_terminal() {
            self.switch_turn();
        }
    }

    fn switch_turn(&mut self) {
        if let Some(next) = self.active.opponent() {
            self.active = next;
        }
    }

    fn check_game_over(&mut self, variant: Variant) {
        let (outcome, line) = match variant {
            Variant::Classic => (evaluate(&self.board), check_win_with_line(&self.board)),
            Variant::Tokens => (
                evaluate_tokens(&self.placements, &self.tokens),
                check_token_win_with_line(&self.placements, &self.tokens),
            ),
        };
        self.outcome = outcome;
        self.winning_line = line;

        if self.outcome == Outcome::Undecided && self.is_starved(variant) {
            self.outcome = Outcome::Draw;
        }
    }

    /// Neither side can put anything on the board.
    fn is_starved(&self, variant: Variant) -> bool {
        let Some(other) = self.active.opponent() else {
            return false;
        };
        !has_legal_placement(self.view(), variant, self.active)
            && !has_legal_placement(self.view(), variant, other)
    }

    pub fn winner(&self) -> Option<Mark> {
        match self.outcome {
            Outcome::Win(mark) => Some(mark),
            _ => None,
        }
    }
}
