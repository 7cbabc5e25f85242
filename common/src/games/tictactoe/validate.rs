use super::board::Board;
use super::error::{GameError, PlacementError};
use super::tokens::{Placements, TokenRegistry};
use super::types::{Candidate, Mark, Position, Variant};

/// Occupancy and token usage a candidate is checked against.
#[derive(Debug, Clone, Copy)]
pub struct PlacementView<'a> {
    pub board: &'a Board,
    pub placements: &'a Placements,
    pub tokens: &'a TokenRegistry,
}

/// Checks a candidate against the cell it targets. Ownership is not checked here.
pub fn validate_placement(
    view: PlacementView<'_>,
    pos: Position,
    candidate: Candidate,
) -> Result<(), GameError> {
    let cell = view.board.get(pos)?;

    match candidate {
        Candidate::Marker => {
            if cell != Mark::Empty {
                return Err(PlacementError::CellOccupied.into());
            }
            Ok(())
        }
        Candidate::Token(id) => {
            let token = view.tokens.get(id).ok_or(PlacementError::UnknownToken(id))?;
            if token.used {
                return Err(PlacementError::TokenAlreadyUsed(id).into());
            }

            let Some(&occupant_id) = view.placements.get(&pos) else {
                return Ok(());
            };
            let occupant = view
                .tokens
                .size_of(occupant_id)
                .ok_or(PlacementError::UnknownToken(occupant_id))?;

            if token.size > occupant {
                Ok(())
            } else {
                Err(PlacementError::CellOccupiedByLargerOrEqual {
                    occupant,
                    candidate: token.size,
                }
                .into())
            }
        }
    }
}

pub fn can_place(view: PlacementView<'_>, pos: Position, candidate: Candidate) -> bool {
    validate_placement(view, pos, candidate).is_ok()
}

/// Full check for `side` moving in `variant`: piece kind, ownership, then the cell.
pub fn validate_move(
    view: PlacementView<'_>,
    variant: Variant,
    side: Mark,
    pos: Position,
    candidate: Candidate,
) -> Result<(), GameError> {
    match (variant, candidate) {
        (Variant::Classic, Candidate::Marker) => {}
        (Variant::Tokens, Candidate::Token(id)) => {
            let owner = view.tokens.owner_of(id).ok_or(PlacementError::UnknownToken(id))?;
            if owner != side {
                return Err(PlacementError::TokenNotOwned(id).into());
            }
        }
        _ => return Err(PlacementError::WrongPieceKind.into()),
    }
    validate_placement(view, pos, candidate)
}

/// Whether `side` can put anything on the board at all.
pub fn has_legal_placement(view: PlacementView<'_>, variant: Variant, side: Mark) -> bool {
    match variant {
        Variant::Classic => !view.board.is_full(),
        Variant::Tokens => view.tokens.unused(side).any(|token| {
            Position::all().any(|pos| can_place(view, pos, Candidate::Token(token.id)))
        }),
    }
}
