use tactoken_common::games::tictactoe::{
    BOARD_SIZE, GameState, Mark, Position, SessionPhase, StateUpdate, TokenSize,
};

fn size_letter(size: TokenSize) -> char {
    match size {
        TokenSize::Tiny => 't',
        TokenSize::Small => 's',
        TokenSize::Medium => 'm',
        TokenSize::Large => 'l',
        TokenSize::Huge => 'h',
    }
}

/// Cell text, three characters wide. Token cells show side and size, `Xl` etc.
fn render_cell(state: &GameState, pos: Position) -> String {
    let mark = state.board.get(pos).unwrap_or(Mark::Empty);
    if mark == Mark::Empty {
        return " . ".to_string();
    }
    match state.placements.get(&pos).and_then(|id| state.tokens.size_of(*id)) {
        Some(size) => format!(" {}{}", mark.symbol(), size_letter(size)),
        None => format!(" {} ", mark.symbol()),
    }
}

pub fn render_board(state: &GameState) -> String {
    let mut out = String::from("    0   1   2\n");
    for row in 0..BOARD_SIZE {
        let cells: Vec<String> = (0..BOARD_SIZE)
            .map(|col| render_cell(state, Position::new(row, col)))
            .collect();
        out.push_str(&format!("{}  {}\n", row, cells.join("|")));
        if row + 1 < BOARD_SIZE {
            out.push_str("   ---+---+---\n");
        }
    }
    out
}

/// Unused tokens of `owner`, largest first.
pub fn render_tokens(state: &GameState, owner: Mark) -> String {
    let sizes: Vec<String> = state
        .tokens
        .unused(owner)
        .map(|token| format!("{} ({})", token.size, size_letter(token.size)))
        .collect();
    if sizes.is_empty() {
        format!("{} has no tokens left", owner)
    } else {
        format!("{} tokens: {}", owner, sizes.join(", "))
    }
}

pub fn render_update(update: &StateUpdate) -> String {
    if update.phase == SessionPhase::SideSelection {
        return format!("Status: {}\n", update.status);
    }

    let mut out = render_board(&update.state);
    if let Some(line) = update.state.winning_line {
        out.push_str(&format!("Line: {} from {} to {}\n", line.mark, line.start, line.end));
    }
    out.push_str(&format!("Status: {}\n", update.status));
    if let Some(rating) = update.rating {
        out.push_str(&format!("Rating: {}\n", rating));
    }
    out
}
