use std::fmt;

use crate::config::BLACKJACK;
use crate::game::card::Card;

/// Cards held by one party during a round.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Sum of card values, recomputed from every card held. Aces are never reduced to 1.
    pub fn value(&self) -> u8 {
        hand_value(&self.cards)
    }

    pub fn is_bust(&self) -> bool {
        self.value() > BLACKJACK
    }
}

impl FromIterator<Card> for Hand {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Hand {
            cards: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, card) in self.cards.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{card}")?;
        }
        write!(f, " ({})", self.value())
    }
}

/// Value of a set of cards under the fixed ace-is-11 rule.
pub fn hand_value(cards: &[Card]) -> u8 {
    cards
        .iter()
        .fold(0u8, |total, card| total.saturating_add(card.value()))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::game::card::Suit;

    fn card(rank: u8) -> Card {
        Card::new(rank, Suit::Clubs).unwrap()
    }

    #[test]
    fn ace_king_is_twenty_one() {
        let hand: Hand = [card(1), card(13)].into_iter().collect();
        assert_eq!(hand.value(), 21);
        assert!(!hand.is_bust());
    }

    #[test]
    fn two_aces_bust() {
        let hand: Hand = [card(1), card(1)].into_iter().collect();
        assert_eq!(hand.value(), 22);
        assert!(hand.is_bust());
    }

    #[test]
    fn ace_is_not_reduced_after_hit() {
        let mut hand: Hand = [card(1), card(5)].into_iter().collect();
        assert_eq!(hand.value(), 16);
        hand.push(card(9));
        assert_eq!(hand.value(), 25);
        assert!(hand.is_bust());
    }

    #[test]
    fn empty_hand_is_zero() {
        assert_eq!(Hand::new().value(), 0);
    }
}
