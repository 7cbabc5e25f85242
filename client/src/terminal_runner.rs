use tactoken_common::games::tictactoe::{
    Candidate, GameError, GameState, GameStatus, Mark, Position, RatingStore, SessionPhase,
    SharedSession, StateUpdate, TokenSize, Variant, has_legal_placement,
};
use tactoken_common::{debug_log, log};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::broadcaster::TerminalBroadcaster;
use crate::input::{HELP, TerminalCommand, parse_command};
use crate::render::{render_tokens, render_update};

/// Plays one human against the bot over stdin/stdout until `quit` or end of input.
pub struct TerminalRunner<R: RatingStore> {
    shared: SharedSession<R, TerminalBroadcaster>,
    update_rx: mpsc::UnboundedReceiver<StateUpdate>,
    human_mark: Mark,
    variant: Variant,
    bot_task: Option<JoinHandle<()>>,
}

impl<R: RatingStore + 'static> TerminalRunner<R> {
    pub fn new(
        shared: SharedSession<R, TerminalBroadcaster>,
        update_rx: mpsc::UnboundedReceiver<StateUpdate>,
        human_mark: Mark,
        variant: Variant,
    ) -> Self {
        Self {
            shared,
            update_rx,
            human_mark,
            variant,
            bot_task: None,
        }
    }

    pub async fn run(mut self) -> Result<(), String> {
        println!("{}", HELP);
        let rating = self.shared.lock().await.rating_store().get_rating();
        println!("Rating: {}", rating);

        self.start_game().await?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            tokio::select! {
                Some(update) = self.update_rx.recv() => {
                    self.on_update(update).await;
                }
                line = lines.next_line() => {
                    let Some(line) = line.map_err(|e| format!("Failed to read input: {}", e))? else {
                        break;
                    };
                    if !self.on_line(&line).await {
                        break;
                    }
                }
            }
        }

        self.stop_bot();
        log!("Terminal session finished");
        Ok(())
    }

    async fn start_game(&mut self) -> Result<(), String> {
        self.stop_bot();
        self.shared
            .select_side(self.human_mark)
            .await
            .map_err(|e| format!("Failed to start game: {}", e))?;

        let shared = self.shared.clone();
        self.bot_task = Some(tokio::spawn(async move {
            shared.run_bot_loop().await;
        }));
        Ok(())
    }

    fn stop_bot(&mut self) {
        if let Some(task) = self.bot_task.take() {
            task.abort();
        }
    }

    async fn on_update(&mut self, update: StateUpdate) {
        print!("{}", render_update(&update));

        match update.phase {
            SessionPhase::Terminal => {
                println!("Type 'new' to play again or 'quit' to leave.");
            }
            SessionPhase::InProgress
                if update.status == GameStatus::YourTurn
                    && !has_legal_placement(update.state.view(), self.variant, self.human_mark) =>
            {
                println!("Nothing you can place, passing.");
                self.pass_when_free().await;
            }
            _ => {}
        }
    }

    /// Passes for the human, retrying while a bot move is still in flight.
    async fn pass_when_free(&self) {
        loop {
            match self.shared.pass_turn(self.human_mark).await {
                Err(GameError::SessionBusy) => tokio::task::yield_now().await,
                Err(e) => {
                    debug_log!("Automatic pass skipped: {}", e);
                    return;
                }
                Ok(_) => return,
            }
        }
    }

    /// Returns false when the player asked to leave.
    async fn on_line(&mut self, line: &str) -> bool {
        let command = match parse_command(line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", message);
                return true;
            }
        };

        match command {
            TerminalCommand::Quit => return false,
            TerminalCommand::Help => println!("{}", HELP),
            TerminalCommand::NewGame => {
                self.shared.reset().await;
                if let Err(e) = self.start_game().await {
                    println!("{}", e);
                }
            }
            TerminalCommand::ShowTokens => {
                if self.variant == Variant::Tokens {
                    let state = self.shared.snapshot().await;
                    println!("{}", render_tokens(&state, self.human_mark));
                } else {
                    println!("Tokens are only used in the Tokens variant.");
                }
            }
            TerminalCommand::Pass => {
                if let Err(e) = self.shared.pass_turn(self.human_mark).await {
                    println!("Can't pass: {}", e);
                }
            }
            TerminalCommand::Place { pos, size } => {
                let state = self.shared.snapshot().await;
                match self.candidate_for(&state, pos, size) {
                    Ok(candidate) => {
                        let result = self.shared.apply_move(self.human_mark, pos, candidate).await;
                        if let Err(e) = result {
                            println!("Move rejected: {}", e);
                        }
                    }
                    Err(message) => println!("{}", message),
                }
            }
        }
        true
    }

    fn candidate_for(
        &self,
        state: &GameState,
        pos: Position,
        size: Option<TokenSize>,
    ) -> Result<Candidate, String> {
        match (self.variant, size) {
            (Variant::Classic, None) => Ok(Candidate::Marker),
            (Variant::Classic, Some(_)) => Err("Classic games take no token size.".to_string()),
            (Variant::Tokens, None) => Err(format!(
                "Pick a token size, for example '{} {} large'.",
                pos.row, pos.col
            )),
            (Variant::Tokens, Some(size)) => state
                .tokens
                .find_unused(self.human_mark, size)
                .map(Candidate::Token)
                .ok_or_else(|| format!("No unused {} token left.", size)),
        }
    }
}
