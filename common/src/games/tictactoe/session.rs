use crate::games::SessionRng;
use crate::{debug_log, log};
use super::bot_controller::{BotDecision, decide};
use super::broadcaster::{GameBroadcaster, StateUpdate};
use super::error::GameError;
use super::game_state::GameState;
use super::rating::{HumanResult, RatingStore};
use super::settings::GameSettings;
use super::types::{Candidate, FirstMover, GameStatus, Mark, Outcome, Participant, Position, SessionPhase};

/// Derives the human-facing status from session fields alone.
pub fn classify_status(phase: SessionPhase, state: &GameState, human_mark: Mark) -> GameStatus {
    match phase {
        SessionPhase::SideSelection => GameStatus::AwaitingSideSelection,
        SessionPhase::InProgress | SessionPhase::Terminal => match state.outcome {
            Outcome::Win(mark) if mark == human_mark => GameStatus::YouWon,
            Outcome::Win(_) => GameStatus::YouLost,
            Outcome::Draw => GameStatus::Draw,
            Outcome::Undecided if state.board.is_full() => GameStatus::Draw,
            Outcome::Undecided if state.active == human_mark => GameStatus::YourTurn,
            Outcome::Undecided => GameStatus::OpponentTurn,
        },
    }
}

/// Human against bot, from side selection to the result and back.
pub struct GameSession<R: RatingStore, B: GameBroadcaster> {
    settings: GameSettings,
    phase: SessionPhase,
    state: GameState,
    human_mark: Mark,
    rng: SessionRng,
    rating_store: R,
    broadcaster: B,
}

impl<R: RatingStore, B: GameBroadcaster> GameSession<R, B> {
    pub fn new(settings: GameSettings, rating_store: R, broadcaster: B, rng: SessionRng) -> Self {
        let human_mark = settings.human_mark;
        let bot_mark = human_mark.opponent().unwrap_or(Mark::O);
        Self {
            settings,
            phase: SessionPhase::SideSelection,
            state: GameState::new(Mark::X, human_mark, bot_mark),
            human_mark,
            rng,
            rating_store,
            broadcaster,
        }
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Independent copy of the current state.
    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn human_mark(&self) -> Mark {
        self.human_mark
    }

    pub fn bot_mark(&self) -> Mark {
        self.human_mark.opponent().unwrap_or(Mark::O)
    }

    pub fn participant(&self, mark: Mark) -> Participant {
        if mark == self.human_mark {
            Participant::Human
        } else {
            Participant::Bot
        }
    }

    pub fn status(&self) -> GameStatus {
        classify_status(self.phase, &self.state, self.human_mark)
    }

    pub fn is_bot_turn(&self) -> bool {
        self.phase == SessionPhase::InProgress && self.state.active == self.bot_mark()
    }

    pub fn rating_store(&self) -> &R {
        &self.rating_store
    }

    pub fn rng_seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Assigns sides and starts the game with the configured first mover.
    pub fn select_side(&mut self, human_mark: Mark) -> Result<GameState, GameError> {
        if self.phase != SessionPhase::SideSelection {
            return Err(GameError::AlreadyStarted);
        }
        let Some(bot_mark) = human_mark.opponent() else {
            return Err(GameError::SideNotSelected);
        };

        let first = match self.settings.first_mover {
            FirstMover::X => Mark::X,
            FirstMover::Human => human_mark,
            FirstMover::Bot => bot_mark,
            FirstMover::Random => {
                if self.rng.random_bool() {
                    human_mark
                } else {
                    bot_mark
                }
            }
        };

        self.human_mark = human_mark;
        self.state = GameState::new(first, human_mark, bot_mark);
        self.phase = SessionPhase::InProgress;
        log!(
            "Game started: human {}, bot {}, {} moves first, {:?} {:?}",
            human_mark,
            bot_mark,
            first,
            self.settings.variant,
            self.settings.difficulty
        );

        self.publish(None);
        Ok(self.snapshot())
    }

    /// Starts with the side from the settings.
    pub fn start(&mut self) -> Result<GameState, GameError> {
        self.select_side(self.settings.human_mark)
    }

    fn check_in_progress(&self) -> Result<(), GameError> {
        match self.phase {
            SessionPhase::SideSelection => Err(GameError::SideNotSelected),
            SessionPhase::Terminal => Err(GameError::GameOver),
            SessionPhase::InProgress => Ok(()),
        }
    }

    pub fn apply_move(
        &mut self,
        side: Mark,
        pos: Position,
        candidate: Candidate,
    ) -> Result<GameState, GameError> {
        self.check_in_progress()?;

        if let Err(e) = self.state.place(self.settings.variant, side, pos, candidate) {
            debug_log!("Rejected move by {} at {}: {}", side, pos, e);
            return Err(e);
        }
        debug_log!("{} played {:?} at {}", side, candidate, pos);

        self.after_transition();
        Ok(self.snapshot())
    }

    /// Accepted only when `side` has nothing it could place.
    pub fn pass_turn(&mut self, side: Mark) -> Result<GameState, GameError> {
        self.check_in_progress()?;
        self.state.pass(self.settings.variant, side)?;
        debug_log!("{} passed", side);

        self.after_transition();
        Ok(self.snapshot())
    }

    /// Chooses and applies the bot's move. A bot without an affordable token passes.
    pub fn play_bot_turn(&mut self) -> Result<BotDecision, GameError> {
        self.check_in_progress()?;
        let bot_mark = self.bot_mark();
        if self.state.active != bot_mark {
            return Err(GameError::NotYourTurn {
                expected: self.state.active,
                actual: bot_mark,
            });
        }

        let decision = decide(
            self.settings.variant,
            self.settings.difficulty,
            &self.state,
            &mut self.rng,
        );

        match decision {
            BotDecision::Place(pos, candidate) => {
                self.state
                    .place(self.settings.variant, bot_mark, pos, candidate)?;
                debug_log!("Bot {} played {:?} at {}", bot_mark, candidate, pos);
            }
            BotDecision::Pass => {
                self.state.skip_turn(self.settings.variant);
                debug_log!("Bot {} passed", bot_mark);
            }
        }

        self.after_transition();
        Ok(decision)
    }

    /// Back to side selection with a brand new state. Allowed in any phase.
    pub fn reset(&mut self) {
        let bot_mark = self.bot_mark();
        self.state = GameState::new(Mark::X, self.human_mark, bot_mark);
        self.phase = SessionPhase::SideSelection;
        log!("Session reset");
        self.publish(None);
    }

    fn after_transition(&mut self) {
        let mut rating = None;
        if self.state.is_terminal() && self.phase == SessionPhase::InProgress {
            self.phase = SessionPhase::Terminal;
            rating = self.record_result();
        }
        self.publish(rating);
    }

    fn record_result(&mut self) -> Option<i64> {
        let result = match self.state.outcome {
            Outcome::Win(mark) if mark == self.human_mark => HumanResult::Won,
            Outcome::Win(_) => HumanResult::Lost,
            Outcome::Draw | Outcome::Undecided => HumanResult::Draw,
        };
        let rating = self.settings.rating.record(&mut self.rating_store, result);
        log!(
            "Game over after {} turns: {:?}, rating {:?}",
            self.state.turn,
            result,
            rating
        );
        rating
    }

    fn publish(&self, rating: Option<i64>) {
        let update = StateUpdate {
            phase: self.phase,
            status: self.status(),
            state: self.snapshot(),
            rating,
        };
        self.broadcaster.broadcast_state(&update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::broadcaster::{NoopBroadcaster, RecordingBroadcaster};
    use crate::games::tictactoe::error::PlacementError;
    use crate::games::tictactoe::rating::InMemoryRatingStore;
    use crate::games::tictactoe::tokens::TokenSize;
    use crate::games::tictactoe::types::{Difficulty, Variant};
    use crate::identifiers::TokenId;

    type TestSession = GameSession<InMemoryRatingStore, RecordingBroadcaster>;

    fn session_with(settings: GameSettings, rating: i64) -> (TestSession, RecordingBroadcaster) {
        let broadcaster = RecordingBroadcaster::new();
        let session = GameSession::new(
            settings,
            InMemoryRatingStore::new(rating),
            broadcaster.clone(),
            SessionRng::new(42),
        );
        (session, broadcaster)
    }

    fn classic(difficulty: Difficulty, first_mover: FirstMover) -> GameSettings {
        GameSettings {
            difficulty,
            first_mover,
            bot_delay_ms: 0,
            ..GameSettings::default()
        }
    }

    fn at(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn test_moves_rejected_before_side_selection() {
        let (mut session, _) = session_with(classic(Difficulty::Easy, FirstMover::Human), 0);
        assert_eq!(session.status(), GameStatus::AwaitingSideSelection);
        assert_eq!(
            session.apply_move(Mark::X, at(0, 0), Candidate::Marker),
            Err(GameError::SideNotSelected)
        );
        assert_eq!(session.play_bot_turn(), Err(GameError::SideNotSelected));
    }

    #[test]
    fn test_select_side_once() {
        let (mut session, broadcaster) = session_with(classic(Difficulty::Easy, FirstMover::Human), 0);
        let state = session.select_side(Mark::O).unwrap();
        assert_eq!(state.active, Mark::O);
        assert_eq!(session.bot_mark(), Mark::X);
        assert_eq!(session.status(), GameStatus::YourTurn);
        assert_eq!(session.select_side(Mark::X), Err(GameError::AlreadyStarted));
        assert_eq!(broadcaster.last().unwrap().status, GameStatus::YourTurn);
    }

    #[test]
    fn test_empty_mark_is_not_a_side() {
        let (mut session, _) = session_with(classic(Difficulty::Easy, FirstMover::Human), 0);
        assert_eq!(session.select_side(Mark::Empty), Err(GameError::SideNotSelected));
        assert_eq!(session.phase(), SessionPhase::SideSelection);
    }

    #[test]
    fn test_bot_first_mover() {
        let (mut session, _) = session_with(classic(Difficulty::Hard, FirstMover::Bot), 0);
        session.start().unwrap();
        assert!(session.is_bot_turn());
        assert_eq!(session.status(), GameStatus::OpponentTurn);
        assert_eq!(
            session.apply_move(Mark::X, at(0, 0), Candidate::Marker),
            Err(GameError::NotYourTurn { expected: Mark::O, actual: Mark::X })
        );
        assert_eq!(
            session.play_bot_turn(),
            Ok(BotDecision::Place(Position::CENTER, Candidate::Marker))
        );
        assert_eq!(session.status(), GameStatus::YourTurn);
    }

    #[test]
    fn test_x_always_opens_by_default() {
        let settings = GameSettings {
            bot_delay_ms: 0,
            ..GameSettings::default()
        };
        assert_eq!(settings.first_mover, FirstMover::X);

        let (mut session, _) = session_with(settings, 0);
        session.select_side(Mark::O).unwrap();
        assert_eq!(session.snapshot().active, Mark::X);
        assert!(session.is_bot_turn());
        assert_eq!(session.status(), GameStatus::OpponentTurn);
        assert!(session.play_bot_turn().is_ok());
        assert_eq!(session.status(), GameStatus::YourTurn);

        let (mut session, _) = session_with(settings, 0);
        session.select_side(Mark::X).unwrap();
        assert_eq!(session.snapshot().active, Mark::X);
        assert!(!session.is_bot_turn());
        assert_eq!(session.status(), GameStatus::YourTurn);
    }

    #[test]
    fn test_hard_bot_answers_corner_with_center() {
        let (mut session, _) = session_with(classic(Difficulty::Hard, FirstMover::Human), 0);
        session.start().unwrap();
        session.apply_move(Mark::X, at(0, 0), Candidate::Marker).unwrap();
        assert_eq!(
            session.play_bot_turn(),
            Ok(BotDecision::Place(at(1, 1), Candidate::Marker))
        );
    }

    #[test]
    fn test_bot_turn_rejected_on_human_turn() {
        let (mut session, _) = session_with(classic(Difficulty::Easy, FirstMover::Human), 0);
        session.start().unwrap();
        assert_eq!(
            session.play_bot_turn(),
            Err(GameError::NotYourTurn { expected: Mark::X, actual: Mark::O })
        );
    }

    #[test]
    fn test_rejected_move_keeps_state() {
        let (mut session, broadcaster) = session_with(classic(Difficulty::Easy, FirstMover::Human), 0);
        session.start().unwrap();
        session.apply_move(Mark::X, at(1, 1), Candidate::Marker).unwrap();
        session.play_bot_turn().unwrap();
        let before = session.snapshot();
        let published = broadcaster.updates().len();

        assert_eq!(
            session.apply_move(Mark::X, at(1, 1), Candidate::Marker),
            Err(GameError::IllegalPlacement(PlacementError::CellOccupied))
        );
        assert_eq!(
            session.apply_move(Mark::X, at(5, 1), Candidate::Marker),
            Err(GameError::InvalidCoordinate { row: 5, col: 1 })
        );
        assert_eq!(session.snapshot(), before);
        assert_eq!(broadcaster.updates().len(), published);
    }

    #[test]
    fn test_human_win_updates_rating_once() {
        let (mut session, broadcaster) = session_with(classic(Difficulty::Easy, FirstMover::Human), 100);
        session.start().unwrap();
        // bot forced into the cells the human does not need
        let human_moves = [at(0, 0), at(0, 1), at(0, 2)];
        let bot_cells = [at(2, 0), at(2, 1)];
        for i in 0..3 {
            session.apply_move(Mark::X, human_moves[i], Candidate::Marker).unwrap();
            if i < 2 {
                session.apply_move(Mark::O, bot_cells[i], Candidate::Marker).unwrap();
            }
        }
        assert_eq!(session.phase(), SessionPhase::Terminal);
        assert_eq!(session.status(), GameStatus::YouWon);
        assert_eq!(session.rating_store().get_rating(), 130);
        assert_eq!(session.rating_store().writes(), 1);
        assert_eq!(broadcaster.last().unwrap().rating, Some(130));

        assert_eq!(
            session.apply_move(Mark::O, at(1, 1), Candidate::Marker),
            Err(GameError::GameOver)
        );
        assert_eq!(session.play_bot_turn(), Err(GameError::GameOver));
        assert_eq!(session.rating_store().writes(), 1);
    }

    #[test]
    fn test_human_loss_floors_rating() {
        let (mut session, _) = session_with(classic(Difficulty::Medium, FirstMover::Bot), 10);
        session.start().unwrap();
        let moves = [
            (Mark::O, at(1, 1)),
            (Mark::X, at(0, 1)),
            (Mark::O, at(0, 0)),
            (Mark::X, at(2, 1)),
            (Mark::O, at(2, 2)),
        ];
        for (side, pos) in moves {
            session.apply_move(side, pos, Candidate::Marker).unwrap();
        }
        assert_eq!(session.state().outcome, Outcome::Win(Mark::O));
        assert_eq!(session.status(), GameStatus::YouLost);
        assert_eq!(session.rating_store().get_rating(), 0);
        assert_eq!(session.rating_store().writes(), 1);
    }

    #[test]
    fn test_human_loss_unfloored() {
        let mut settings = classic(Difficulty::Medium, FirstMover::Bot);
        settings.rating.floor = None;
        let (mut session, _) = session_with(settings, 10);
        session.start().unwrap();
        for (side, pos) in [
            (Mark::O, at(0, 0)),
            (Mark::X, at(1, 0)),
            (Mark::O, at(0, 1)),
            (Mark::X, at(1, 1)),
            (Mark::O, at(0, 2)),
        ] {
            session.apply_move(side, pos, Candidate::Marker).unwrap();
        }
        assert_eq!(session.rating_store().get_rating(), -15);
    }

    #[test]
    fn test_draw_leaves_rating_untouched() {
        let (mut session, broadcaster) = session_with(classic(Difficulty::Easy, FirstMover::Human), 55);
        session.start().unwrap();
        // X O X / X O O / O X X, both sides driven by hand
        let moves = [
            (Mark::X, at(0, 0)),
            (Mark::O, at(0, 1)),
            (Mark::X, at(0, 2)),
            (Mark::O, at(1, 1)),
            (Mark::X, at(1, 0)),
            (Mark::O, at(1, 2)),
            (Mark::X, at(2, 1)),
            (Mark::O, at(2, 0)),
        ];
        for (side, pos) in moves {
            session.apply_move(side, pos, Candidate::Marker).unwrap();
        }
        assert_eq!(session.phase(), SessionPhase::InProgress);

        let last = session.apply_move(Mark::X, at(2, 2), Candidate::Marker).unwrap();
        assert_eq!(last.outcome, Outcome::Draw);
        assert_eq!(session.phase(), SessionPhase::Terminal);
        assert_eq!(session.status(), GameStatus::Draw);
        assert_eq!(session.rating_store().writes(), 0);
        assert_eq!(session.rating_store().get_rating(), 55);
        assert_eq!(broadcaster.last().unwrap().rating, None);
    }

    #[test]
    fn test_reset_returns_fresh_state() {
        let settings = GameSettings {
            variant: Variant::Tokens,
            ..classic(Difficulty::Easy, FirstMover::Human)
        };
        let (mut session, _) = session_with(settings, 0);
        session.start().unwrap();
        session
            .apply_move(Mark::X, at(0, 0), Candidate::Token(TokenId::new(5)))
            .unwrap();
        session.play_bot_turn().unwrap();
        session.reset();

        assert_eq!(session.phase(), SessionPhase::SideSelection);
        assert_eq!(session.status(), GameStatus::AwaitingSideSelection);
        let state = session.snapshot();
        assert_eq!(state.board.occupied_count(), 0);
        assert!(state.placements.is_empty());
        assert!(state.tokens.all_unused());
        assert_eq!(state.turn, 0);
        assert_eq!(state.outcome, Outcome::Undecided);

        session.select_side(Mark::O).unwrap();
        assert_eq!(session.human_mark(), Mark::O);
        assert_eq!(session.state().tokens.owner_of(TokenId::new(1)), Some(Mark::O));
    }

    #[test]
    fn test_reset_from_terminal() {
        let (mut session, _) = session_with(classic(Difficulty::Hard, FirstMover::Bot), 0);
        session.start().unwrap();
        while session.phase() == SessionPhase::InProgress {
            if session.is_bot_turn() {
                session.play_bot_turn().unwrap();
            } else {
                let free = crate::games::tictactoe::board::get_available_moves(&session.state().board);
                session.apply_move(Mark::X, free[0], Candidate::Marker).unwrap();
            }
        }
        session.reset();
        assert_eq!(session.phase(), SessionPhase::SideSelection);
        assert_eq!(session.state().board.occupied_count(), 0);
        session.start().unwrap();
        assert_eq!(session.phase(), SessionPhase::InProgress);
    }

    #[test]
    fn test_token_bot_spends_smallest_token() {
        let settings = GameSettings {
            variant: Variant::Tokens,
            ..classic(Difficulty::Hard, FirstMover::Human)
        };
        let (mut session, _) = session_with(settings, 0);
        session.start().unwrap();
        session
            .apply_move(Mark::X, at(0, 0), Candidate::Token(TokenId::new(1)))
            .unwrap();
        let decision = session.play_bot_turn().unwrap();
        let BotDecision::Place(pos, Candidate::Token(id)) = decision else {
            panic!("expected a token placement, got {:?}", decision);
        };
        assert_eq!(pos, Position::CENTER);
        assert_eq!(session.state().tokens.size_of(id), Some(TokenSize::Tiny));
        assert_eq!(session.state().active, Mark::X);
    }

    #[test]
    fn test_marker_rejected_in_token_game() {
        let settings = GameSettings {
            variant: Variant::Tokens,
            ..classic(Difficulty::Easy, FirstMover::Human)
        };
        let (mut session, _) = session_with(settings, 0);
        session.start().unwrap();
        assert_eq!(
            session.apply_move(Mark::X, at(0, 0), Candidate::Marker),
            Err(GameError::IllegalPlacement(PlacementError::WrongPieceKind))
        );
    }

    #[test]
    fn test_starved_bot_passes_and_turn_flips() {
        let settings = GameSettings {
            variant: Variant::Tokens,
            ..classic(Difficulty::Hard, FirstMover::Human)
        };
        let (mut session, _) = session_with(settings, 0);
        session.start().unwrap();
        session
            .apply_move(Mark::X, at(0, 0), Candidate::Token(TokenId::new(5)))
            .unwrap();
        for id in 6..=10 {
            session.state.tokens.mark_used(TokenId::new(id));
        }
        let before = session.state().board;

        assert_eq!(session.play_bot_turn(), Ok(BotDecision::Pass));
        assert_eq!(session.state().board, before);
        assert_eq!(session.state().active, Mark::X);
        assert_eq!(session.phase(), SessionPhase::InProgress);
        assert_eq!(session.status(), GameStatus::YourTurn);
    }

    #[test]
    fn test_both_sides_starved_ends_in_draw() {
        let settings = GameSettings {
            variant: Variant::Tokens,
            ..classic(Difficulty::Hard, FirstMover::Human)
        };
        let (mut session, _) = session_with(settings, 20);
        session.start().unwrap();
        session
            .apply_move(Mark::X, at(0, 0), Candidate::Token(TokenId::new(5)))
            .unwrap();
        for id in (1..=4).chain(6..=10) {
            session.state.tokens.mark_used(TokenId::new(id));
        }

        session.play_bot_turn().unwrap();
        assert_eq!(session.phase(), SessionPhase::Terminal);
        assert_eq!(session.status(), GameStatus::Draw);
        assert_eq!(session.rating_store().writes(), 0);
    }

    #[test]
    fn test_human_pass_only_when_stuck() {
        let settings = GameSettings {
            variant: Variant::Tokens,
            ..classic(Difficulty::Easy, FirstMover::Human)
        };
        let (mut session, _) = session_with(settings, 0);
        session.start().unwrap();
        assert_eq!(session.pass_turn(Mark::X), Err(GameError::NothingToPass));
    }

    #[test]
    fn test_noop_broadcaster_session() {
        let mut session = GameSession::new(
            classic(Difficulty::Medium, FirstMover::Random),
            InMemoryRatingStore::default(),
            NoopBroadcaster,
            SessionRng::new(9),
        );
        session.start().unwrap();
        assert_eq!(session.phase(), SessionPhase::InProgress);
        assert_eq!(session.rng_seed(), 9);
    }
}
