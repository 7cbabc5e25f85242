mod broadcaster;
mod config;
mod input;
mod rating_file;
mod render;
mod terminal_runner;

use clap::{Parser, ValueEnum};
use tactoken_common::games::SessionRng;
use tactoken_common::games::tictactoe::{
    Difficulty, FirstMover, GameSession, GameSettings, Mark, SharedSession, Variant,
};
use tactoken_common::{log, logger};

use broadcaster::TerminalBroadcaster;
use config::{CONFIG_FILE, Validate, get_config_manager};
use rating_file::FileRatingStore;
use terminal_runner::TerminalRunner;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum VariantArg {
    Classic,
    Tokens,
}

impl From<VariantArg> for Variant {
    fn from(value: VariantArg) -> Self {
        match value {
            VariantArg::Classic => Variant::Classic,
            VariantArg::Tokens => Variant::Tokens,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(value: DifficultyArg) -> Self {
        match value {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Medium => Difficulty::Medium,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SideArg {
    X,
    O,
}

impl From<SideArg> for Mark {
    fn from(value: SideArg) -> Self {
        match value {
            SideArg::X => Mark::X,
            SideArg::O => Mark::O,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FirstArg {
    X,
    Human,
    Bot,
    Random,
}

impl From<FirstArg> for FirstMover {
    fn from(value: FirstArg) -> Self {
        match value {
            FirstArg::X => FirstMover::X,
            FirstArg::Human => FirstMover::Human,
            FirstArg::Bot => FirstMover::Bot,
            FirstArg::Random => FirstMover::Random,
        }
    }
}

#[derive(Parser)]
#[command(name = "tactoken", about = "Tic-tac-toe against a bot, with an optional sized-token variant")]
struct Args {
    /// YAML config file, defaults are used when it is missing
    #[arg(long, default_value = CONFIG_FILE)]
    config: String,
    #[arg(long, value_enum)]
    variant: Option<VariantArg>,
    #[arg(long, value_enum)]
    difficulty: Option<DifficultyArg>,
    #[arg(long, value_enum)]
    side: Option<SideArg>,
    #[arg(long, value_enum)]
    first: Option<FirstArg>,
    /// Bot randomness seed, for reproducible games
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    rating_file: Option<String>,
    #[arg(long)]
    verbose: bool,
    #[arg(long)]
    use_log_prefix: bool,
}

impl Args {
    fn apply(&self, mut settings: GameSettings) -> GameSettings {
        if let Some(variant) = self.variant {
            settings.variant = variant.into();
        }
        if let Some(difficulty) = self.difficulty {
            settings.difficulty = difficulty.into();
        }
        if let Some(side) = self.side {
            settings.human_mark = side.into();
        }
        if let Some(first) = self.first {
            settings.first_mover = first.into();
        }
        settings
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Client".to_string())
    } else {
        None
    };
    logger::init_logger(prefix, args.verbose);

    let config = get_config_manager(&args.config).get_config()?;
    let settings = args.apply(config.game);
    settings.validate()?;

    let rating_file = args.rating_file.clone().unwrap_or(config.rating_file);
    let rating_store = FileRatingStore::open(&rating_file)?;

    let rng = match args.seed {
        Some(seed) => SessionRng::new(seed),
        None => SessionRng::from_random(),
    };
    log!(
        "Starting {:?} game on {:?}, seed {}, rating file {}",
        settings.variant,
        settings.difficulty,
        rng.seed(),
        rating_file
    );

    let (broadcaster, update_rx) = TerminalBroadcaster::new();
    let session = GameSession::new(settings, rating_store, broadcaster, rng);
    let runner = TerminalRunner::new(
        SharedSession::new(session),
        update_rx,
        settings.human_mark,
        settings.variant,
    );
    runner.run().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_override_config() {
        let args = Args::parse_from([
            "tactoken",
            "--variant",
            "tokens",
            "--difficulty",
            "hard",
            "--side",
            "o",
            "--first",
            "bot",
            "--seed",
            "9",
        ]);
        let settings = args.apply(GameSettings::default());
        assert_eq!(settings.variant, Variant::Tokens);
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert_eq!(settings.human_mark, Mark::O);
        assert_eq!(settings.first_mover, FirstMover::Bot);
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.config, CONFIG_FILE);
    }

    #[test]
    fn test_missing_args_keep_config() {
        let args = Args::parse_from(["tactoken"]);
        let config_settings = GameSettings {
            variant: Variant::Tokens,
            bot_delay_ms: 0,
            ..GameSettings::default()
        };
        assert_eq!(args.apply(config_settings), config_settings);
    }
}
