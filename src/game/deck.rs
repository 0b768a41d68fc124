use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::game::card::{Card, Suit};

/// Cards in a standard deck.
pub const DECK_SIZE: usize = 52;

/// An ordered pile of cards; drawing takes from the front.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deck {
    cards: VecDeque<Card>,
}

impl Deck {
    /// The 52 distinct cards, suits in wire order, ranks ascending.
    pub fn standard_52() -> Self {
        let cards = Suit::ALL
            .iter()
            .flat_map(|&suit| (Card::ACE..=Card::KING).map(move |rank| Card::from_parts(rank, suit)))
            .collect();
        Deck { cards }
    }

    /// A freshly shuffled deck using the thread-local RNG.
    pub fn shuffled() -> Self {
        Self::shuffled_with(&mut rand::rng())
    }

    /// A freshly shuffled deck using `rng` (Fisher-Yates, every permutation equally likely).
    pub fn shuffled_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cards: Vec<Card> = Self::standard_52().cards.into();
        cards.shuffle(rng);
        Deck {
            cards: cards.into(),
        }
    }

    /// A deck that deals `cards` in the given order. Intended for scripted games and tests.
    pub fn stacked(cards: impl IntoIterator<Item = Card>) -> Self {
        Deck {
            cards: cards.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Remove and return the front card.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop_front()
    }
}
