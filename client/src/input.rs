use tactoken_common::games::tictactoe::{Position, TokenSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalCommand {
    Place {
        pos: Position,
        size: Option<TokenSize>,
    },
    Pass,
    NewGame,
    ShowTokens,
    Help,
    Quit,
}

pub const HELP: &str = "Commands:
  <row> <col>         place a marker, rows and columns are 0..2
  <row> <col> <size>  place a token, size is tiny/small/medium/large/huge or t/s/m/l/h
  pass                skip the turn when nothing can be placed
  tokens              list your unused tokens
  new                 start over
  quit                leave";

fn parse_size(text: &str) -> Result<TokenSize, String> {
    match text.to_ascii_lowercase().as_str() {
        "t" | "tiny" => Ok(TokenSize::Tiny),
        "s" | "small" => Ok(TokenSize::Small),
        "m" | "medium" => Ok(TokenSize::Medium),
        "l" | "large" => Ok(TokenSize::Large),
        "h" | "huge" => Ok(TokenSize::Huge),
        other => Err(format!("Unknown token size '{}'", other)),
    }
}

fn parse_index(text: &str) -> Result<usize, String> {
    text.parse::<usize>()
        .map_err(|_| format!("'{}' is not a row or column number", text))
}

pub fn parse_command(line: &str) -> Result<TerminalCommand, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        [] => Err("Empty input, type 'help' for commands".to_string()),
        ["pass"] => Ok(TerminalCommand::Pass),
        ["new"] => Ok(TerminalCommand::NewGame),
        ["tokens"] => Ok(TerminalCommand::ShowTokens),
        ["help"] | ["?"] => Ok(TerminalCommand::Help),
        ["quit"] | ["exit"] | ["q"] => Ok(TerminalCommand::Quit),
        [row, col] => Ok(TerminalCommand::Place {
            pos: Position::checked(parse_index(row)?, parse_index(col)?)
                .map_err(|e| e.to_string())?,
            size: None,
        }),
        [row, col, size] => Ok(TerminalCommand::Place {
            pos: Position::checked(parse_index(row)?, parse_index(col)?)
                .map_err(|e| e.to_string())?,
            size: Some(parse_size(size)?),
        }),
        _ => Err(format!("Unrecognized input '{}'", line.trim())),
    }
}
