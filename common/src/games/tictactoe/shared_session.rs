use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard, Notify, Semaphore, SemaphorePermit};

use crate::{debug_log, log};
use super::bot_controller::BotDecision;
use super::broadcaster::GameBroadcaster;
use super::error::GameError;
use super::game_state::GameState;
use super::rating::RatingStore;
use super::session::GameSession;
use super::types::{Candidate, GameStatus, Mark, Position, SessionPhase};

/// A session shared between a front-end and a bot task.
///
/// Moves are single-flight: a move arriving while another move is still
/// being applied is rejected with [`GameError::SessionBusy`]. Readers only
/// take the session lock and never cause a rejection. Bot turns wait out
/// the pacing delay without holding anything, queue behind a move in
/// flight, and are dropped if a reset happened in the meantime.
pub struct SharedSession<R: RatingStore, B: GameBroadcaster> {
    session: Arc<Mutex<GameSession<R, B>>>,
    in_flight: Arc<Semaphore>,
    generation: Arc<AtomicU64>,
    turn_notify: Arc<Notify>,
    bot_delay: Duration,
}

impl<R: RatingStore, B: GameBroadcaster> Clone for SharedSession<R, B> {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
            in_flight: self.in_flight.clone(),
            generation: self.generation.clone(),
            turn_notify: self.turn_notify.clone(),
            bot_delay: self.bot_delay,
        }
    }
}

impl<R, B> SharedSession<R, B>
where
    R: RatingStore + 'static,
    B: GameBroadcaster + 'static,
{
    pub fn new(session: GameSession<R, B>) -> Self {
        let bot_delay = Duration::from_millis(session.settings().bot_delay_ms);
        Self {
            session: Arc::new(Mutex::new(session)),
            in_flight: Arc::new(Semaphore::new(1)),
            generation: Arc::new(AtomicU64::new(0)),
            turn_notify: Arc::new(Notify::new()),
            bot_delay,
        }
    }

    pub fn bot_delay(&self) -> Duration {
        self.bot_delay
    }

    /// Number of resets so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Read access. Holding the guard delays moves but never rejects them.
    pub async fn lock(&self) -> MutexGuard<'_, GameSession<R, B>> {
        self.session.lock().await
    }

    pub async fn snapshot(&self) -> GameState {
        self.session.lock().await.snapshot()
    }

    pub async fn status(&self) -> GameStatus {
        self.session.lock().await.status()
    }

    fn begin_move(&self) -> Result<SemaphorePermit<'_>, GameError> {
        self.in_flight.try_acquire().map_err(|_| {
            debug_log!("Move already in flight, call rejected");
            GameError::SessionBusy
        })
    }

    pub async fn select_side(&self, human_mark: Mark) -> Result<GameState, GameError> {
        let permit = self.begin_move()?;
        let result = self.session.lock().await.select_side(human_mark);
        drop(permit);

        self.turn_notify.notify_one();
        result
    }

    pub async fn apply_move(
        &self,
        side: Mark,
        pos: Position,
        candidate: Candidate,
    ) -> Result<GameState, GameError> {
        let permit = self.begin_move()?;
        let result = self.session.lock().await.apply_move(side, pos, candidate);
        drop(permit);

        let state = result?;
        self.turn_notify.notify_one();
        Ok(state)
    }

    pub async fn pass_turn(&self, side: Mark) -> Result<GameState, GameError> {
        let permit = self.begin_move()?;
        let result = self.session.lock().await.pass_turn(side);
        drop(permit);

        let state = result?;
        self.turn_notify.notify_one();
        Ok(state)
    }

    /// Bot move after the pacing delay. `Ok(None)` when a reset made it stale.
    ///
    /// The reset generation is captured when this is called, not when the
    /// returned future is first polled.
    pub fn play_bot_turn(
        &self,
    ) -> impl Future<Output = Result<Option<BotDecision>, GameError>> + Send + 'static {
        let generation = self.generation();
        let this = self.clone();
        async move {
            if !this.bot_delay.is_zero() {
                tokio::time::sleep(this.bot_delay).await;
            }

            let permit = this
                .in_flight
                .acquire()
                .await
                .map_err(|_| GameError::SessionBusy)?;
            let mut session = this.session.lock().await;
            if this.generation() != generation {
                log!("Discarding bot move computed before a reset");
                return Ok(None);
            }
            let result = session.play_bot_turn();
            // The permit goes first so nobody sees the new turn while it is still held.
            drop(permit);
            drop(session);

            let decision = result?;
            this.turn_notify.notify_one();
            Ok(Some(decision))
        }
    }

    /// Back to side selection. Safe in any phase, pending bot moves are discarded.
    pub async fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let permit = self.in_flight.acquire().await.ok();
        self.session.lock().await.reset();
        drop(permit);
        self.turn_notify.notify_one();
    }

    /// Plays every bot turn until the game ends or the session is reset.
    pub async fn run_bot_loop(&self) {
        let generation = self.generation();
        loop {
            let (phase, is_bot_turn) = {
                let session = self.session.lock().await;
                (session.phase(), session.is_bot_turn())
            };

            if phase != SessionPhase::InProgress || self.generation() != generation {
                break;
            }

            if is_bot_turn {
                match self.play_bot_turn().await {
                    Ok(Some(_)) => {}
                    Ok(None) => break,
                    Err(e) => {
                        log!("Bot turn failed: {}", e);
                        break;
                    }
                }
            } else {
                self.turn_notify.notified().await;
            }
        }
    }
}
