use std::fmt;

use crate::error::{ProtocolError, Result};

/// Card suit, numbered as on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Suit {
    Hearts = 0,
    Diamonds = 1,
    Clubs = 2,
    Spades = 3,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Suit::Hearts => "Hearts",
            Suit::Diamonds => "Diamonds",
            Suit::Clubs => "Clubs",
            Suit::Spades => "Spades",
        };
        f.write_str(name)
    }
}

/// A playing card. Rank 1 is the Ace, 11..=13 are Jack, Queen, King.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Card {
    rank: u8,
    suit: Suit,
}

impl Card {
    pub const ACE: u8 = 1;
    pub const KING: u8 = 13;

    /// Build a card, rejecting ranks outside `1..=13`.
    pub fn new(rank: u8, suit: Suit) -> Result<Self> {
        if !(Self::ACE..=Self::KING).contains(&rank) {
            return Err(ProtocolError::InvalidCard {
                rank: rank as u16,
                suit: suit.code(),
            });
        }
        Ok(Self { rank, suit })
    }

    /// Caller guarantees `rank` is within `1..=13`.
    pub(crate) const fn from_parts(rank: u8, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Build a card from its wire fields.
    pub fn from_wire(rank: u16, suit: u8) -> Result<Self> {
        let invalid = ProtocolError::InvalidCard { rank, suit };
        let suit = Suit::from_code(suit).ok_or(invalid)?;
        let rank = u8::try_from(rank).map_err(|_| ProtocolError::InvalidCard {
            rank,
            suit: suit.code(),
        })?;
        Self::new(rank, suit)
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }

    /// Points this card adds to a hand. Aces always count 11.
    pub fn value(&self) -> u8 {
        match self.rank {
            Self::ACE => 11,
            10..=13 => 10,
            r => r,
        }
    }
}

impl fmt::Display for Card {
    /// Renders as e.g. `Queen of Spades` or `7 of Hearts`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rank {
            1 => write!(f, "Ace of {}", self.suit),
            11 => write!(f, "Jack of {}", self.suit),
            12 => write!(f, "Queen of {}", self.suit),
            13 => write!(f, "King of {}", self.suit),
            r => write!(f, "{r} of {}", self.suit),
        }
    }
}
