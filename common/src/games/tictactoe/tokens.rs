use std::collections::BTreeMap;
use std::fmt;

use crate::identifiers::TokenId;
use super::types::{Mark, Position};

pub const TOKENS_PER_SIDE: usize = 5;

/// Which token occupies which cell. Only occupied cells are present.
pub type Placements = BTreeMap<Position, TokenId>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenSize {
    Tiny,
    Small,
    Medium,
    Large,
    Huge,
}

impl TokenSize {
    pub const DESCENDING: [TokenSize; TOKENS_PER_SIDE] = [
        TokenSize::Huge,
        TokenSize::Large,
        TokenSize::Medium,
        TokenSize::Small,
        TokenSize::Tiny,
    ];

    /// 1 for the smallest token up to 5 for the largest.
    pub fn rank(&self) -> u8 {
        match self {
            TokenSize::Tiny => 1,
            TokenSize::Small => 2,
            TokenSize::Medium => 3,
            TokenSize::Large => 4,
            TokenSize::Huge => 5,
        }
    }

    pub fn from_rank(rank: u8) -> Option<Self> {
        match rank {
            1 => Some(TokenSize::Tiny),
            2 => Some(TokenSize::Small),
            3 => Some(TokenSize::Medium),
            4 => Some(TokenSize::Large),
            5 => Some(TokenSize::Huge),
            _ => None,
        }
    }

    pub fn diameter(&self) -> u32 {
        10 + 10 * self.rank() as u32
    }
}

impl fmt::Display for TokenSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenSize::Tiny => "tiny",
            TokenSize::Small => "small",
            TokenSize::Medium => "medium",
            TokenSize::Large => "large",
            TokenSize::Huge => "huge",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub id: TokenId,
    pub owner: Mark,
    pub size: TokenSize,
    pub used: bool,
}

/// Every token of one game, keyed by id. Resolves ids to owning side and size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRegistry {
    tokens: Vec<Token>,
}

impl TokenRegistry {
    /// Ids 1..=5 belong to the human, 6..=10 to the bot, largest first.
    pub fn new(human: Mark, bot: Mark) -> Self {
        let tokens = [human, bot]
            .into_iter()
            .enumerate()
            .flat_map(|(side_idx, owner)| {
                TokenSize::DESCENDING
                    .into_iter()
                    .enumerate()
                    .map(move |(i, size)| Token {
                        id: TokenId::new((side_idx * TOKENS_PER_SIDE + i + 1) as u8),
                        owner,
                        size,
                        used: false,
                    })
            })
            .collect();
        Self { tokens }
    }

    pub fn get(&self, id: TokenId) -> Option<&Token> {
        self.tokens.iter().find(|t| t.id == id)
    }

    pub fn owner_of(&self, id: TokenId) -> Option<Mark> {
        self.get(id).map(|t| t.owner)
    }

    pub fn size_of(&self, id: TokenId) -> Option<TokenSize> {
        self.get(id).map(|t| t.size)
    }

    /// Returns false if the token is unknown or was already used.
    pub fn mark_used(&mut self, id: TokenId) -> bool {
        match self.tokens.iter_mut().find(|t| t.id == id) {
            Some(token) if !token.used => {
                token.used = true;
                true
            }
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    pub fn unused(&self, owner: Mark) -> impl Iterator<Item = &Token> {
        self.tokens
            .iter()
            .filter(move |t| t.owner == owner && !t.used)
    }

    pub fn find_unused(&self, owner: Mark, size: TokenSize) -> Option<TokenId> {
        self.unused(owner).find(|t| t.size == size).map(|t| t.id)
    }

    pub fn all_unused(&self) -> bool {
        self.tokens.iter().all(|t| !t.used)
    }
}
