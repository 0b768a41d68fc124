//! # Round Engine
//!
//! One hand of blackjack from the initial deal to a result, as a state machine
//! that consumes player decisions and produces the updates to send back.
//!
//! ```text
//! DealingInitial --deal--> PlayerTurn --Hit (bust)--> Done(Loss)
//!                              |  ^
//!                              |  +--Hit (no bust)
//!                              +--Stand--> DealerTurn --> Done(result)
//! ```
//!
//! The engine performs no I/O; the session driver sends whatever updates each
//! step returns, in order.

use crate::config::DEALER_STAND_THRESHOLD;
use crate::core::message::{Decision, RoundResult, ServerUpdate};
use crate::error::{ProtocolError, Result};
use crate::game::card::Card;
use crate::game::deck::Deck;
use crate::game::hand::Hand;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundState {
    DealingInitial,
    PlayerTurn,
    DealerTurn,
    Done(RoundResult),
}

#[derive(Debug)]
pub struct Round {
    deck: Deck,
    player: Hand,
    dealer: Hand,
    hole_card: Option<Card>,
    state: RoundState,
}

impl Round {
    /// A round over a freshly shuffled deck.
    pub fn new() -> Self {
        Self::with_deck(Deck::shuffled())
    }

    pub fn with_deck(deck: Deck) -> Self {
        Self {
            deck,
            player: Hand::new(),
            dealer: Hand::new(),
            hole_card: None,
            state: RoundState::DealingInitial,
        }
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn player_hand(&self) -> &Hand {
        &self.player
    }

    /// Dealer's cards, including the hole card even while it is hidden.
    pub fn dealer_hand(&self) -> &Hand {
        &self.dealer
    }

    /// Final result once the round is over.
    pub fn outcome(&self) -> Option<RoundResult> {
        match self.state {
            RoundState::Done(result) => Some(result),
            _ => None,
        }
    }

    fn draw(&mut self) -> Result<Card> {
        self.deck.draw().ok_or(ProtocolError::DeckExhausted)
    }

    /// Deal two cards each. Reveals both player cards and the dealer's first card.
    pub fn deal(&mut self) -> Result<Vec<ServerUpdate>> {
        if self.state != RoundState::DealingInitial {
            return Err(ProtocolError::OutOfTurn);
        }

        let first = self.draw()?;
        let second = self.draw()?;
        let up_card = self.draw()?;
        let hole_card = self.draw()?;

        self.player.push(first);
        self.player.push(second);
        self.dealer.push(up_card);
        self.dealer.push(hole_card);
        self.hole_card = Some(hole_card);
        self.state = RoundState::PlayerTurn;

        Ok(vec![
            ServerUpdate::active(first),
            ServerUpdate::active(second),
            ServerUpdate::active(up_card),
        ])
    }

    /// Apply one player decision.
    ///
    /// `Hit` yields the drawn card, carrying `Loss` if it busts the player.
    /// `Stand` plays out the dealer's turn and yields every dealer reveal, the
    /// last one carrying the result. Standing on a bust hand reveals the hole card
    /// with `Loss` and draws nothing.
    pub fn apply(&mut self, decision: Decision) -> Result<Vec<ServerUpdate>> {
        if self.state != RoundState::PlayerTurn {
            return Err(ProtocolError::OutOfTurn);
        }

        match decision {
            Decision::Hit => {
                let card = self.draw()?;
                self.player.push(card);
                if self.player.is_bust() {
                    self.state = RoundState::Done(RoundResult::Loss);
                    Ok(vec![ServerUpdate::new(RoundResult::Loss, card)])
                } else {
                    Ok(vec![ServerUpdate::active(card)])
                }
            }
            Decision::Stand if self.player.is_bust() => {
                // Only reachable with two aces; the dealer never plays against a bust hand.
                let hole_card = self.hole_card.take().ok_or(ProtocolError::OutOfTurn)?;
                self.state = RoundState::Done(RoundResult::Loss);
                Ok(vec![ServerUpdate::new(RoundResult::Loss, hole_card)])
            }
            Decision::Stand => {
                self.state = RoundState::DealerTurn;
                self.play_dealer()
            }
        }
    }

    fn play_dealer(&mut self) -> Result<Vec<ServerUpdate>> {
        let mut pending = self.hole_card.take().ok_or(ProtocolError::OutOfTurn)?;
        let mut updates = Vec::new();

        while self.dealer.value() < DEALER_STAND_THRESHOLD {
            updates.push(ServerUpdate::active(pending));
            pending = self.draw()?;
            self.dealer.push(pending);
        }

        let result = settle(&self.player, &self.dealer);
        self.state = RoundState::Done(result);
        updates.push(ServerUpdate::new(result, pending));
        Ok(updates)
    }
}

impl Default for Round {
    fn default() -> Self {
        Self::new()
    }
}

/// Result for the player once both hands are final.
pub fn settle(player: &Hand, dealer: &Hand) -> RoundResult {
    if player.is_bust() {
        return RoundResult::Loss;
    }
    if dealer.is_bust() {
        return RoundResult::Win;
    }
    match player.value().cmp(&dealer.value()) {
        std::cmp::Ordering::Greater => RoundResult::Win,
        std::cmp::Ordering::Less => RoundResult::Loss,
        std::cmp::Ordering::Equal => RoundResult::Tie,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::game::card::Suit;

    /// Deck dealing `ranks` in order: player, player, dealer up, dealer hole, then draws.
    fn stacked(ranks: &[u8]) -> Deck {
        Deck::stacked(
            ranks
                .iter()
                .enumerate()
                .map(|(i, &r)| Card::new(r, Suit::ALL[i % 4]).unwrap()),
        )
    }

    fn hand(ranks: &[u8]) -> Hand {
        ranks
            .iter()
            .map(|&r| Card::new(r, Suit::Hearts).unwrap())
            .collect()
    }

    fn ranks(updates: &[ServerUpdate]) -> Vec<(u8, RoundResult)> {
        updates.iter().map(|u| (u.card.rank(), u.result)).collect()
    }

    #[test]
    fn deal_reveals_player_cards_then_dealer_up_card() {
        let mut round = Round::with_deck(stacked(&[2, 3, 4, 5]));
        let updates = round.deal().unwrap();
        assert_eq!(
            ranks(&updates),
            vec![
                (2, RoundResult::Active),
                (3, RoundResult::Active),
                (4, RoundResult::Active)
            ]
        );
        assert_eq!(round.state(), RoundState::PlayerTurn);
        assert_eq!(round.dealer_hand().len(), 2);
    }

    #[test]
    fn natural_twenty_one_still_waits_for_a_decision() {
        let mut round = Round::with_deck(stacked(&[1, 13, 9, 8]));
        let updates = round.deal().unwrap();
        assert!(updates.iter().all(|u| u.result == RoundResult::Active));
        assert_eq!(round.player_hand().value(), 21);
        assert_eq!(round.state(), RoundState::PlayerTurn);
        assert_eq!(round.outcome(), None);

        let updates = round.apply(Decision::Stand).unwrap();
        assert_eq!(ranks(&updates), vec![(8, RoundResult::Win)]);
    }

    #[test]
    fn player_bust_ends_round_without_dealer_turn() {
        let mut round = Round::with_deck(stacked(&[10, 6, 5, 5, 9, 2, 2]));
        round.deal().unwrap();
        let updates = round.apply(Decision::Hit).unwrap();
        assert_eq!(ranks(&updates), vec![(9, RoundResult::Loss)]);
        assert_eq!(round.outcome(), Some(RoundResult::Loss));
        assert_eq!(round.dealer_hand().len(), 2);
        assert!(matches!(
            round.apply(Decision::Stand),
            Err(ProtocolError::OutOfTurn)
        ));
    }

    #[test]
    fn hit_without_bust_stays_in_player_turn() {
        let mut round = Round::with_deck(stacked(&[2, 3, 10, 7, 4]));
        round.deal().unwrap();
        let updates = round.apply(Decision::Hit).unwrap();
        assert_eq!(ranks(&updates), vec![(4, RoundResult::Active)]);
        assert_eq!(round.state(), RoundState::PlayerTurn);
        assert_eq!(round.player_hand().value(), 9);
    }

    #[test]
    fn dealer_on_seventeen_resolves_with_hole_card() {
        // player 20, dealer 10 + 7
        let mut round = Round::with_deck(stacked(&[10, 12, 10, 7]));
        round.deal().unwrap();
        let updates = round.apply(Decision::Stand).unwrap();
        assert_eq!(ranks(&updates), vec![(7, RoundResult::Win)]);
    }

    #[test]
    fn dealer_draws_until_reaching_seventeen() {
        // player 18; dealer 2 + 3, then 4, 5, 3 -> 17
        let mut round = Round::with_deck(stacked(&[10, 8, 2, 3, 4, 5, 3, 10]));
        round.deal().unwrap();
        let updates = round.apply(Decision::Stand).unwrap();
        assert_eq!(
            ranks(&updates),
            vec![
                (3, RoundResult::Active),
                (4, RoundResult::Active),
                (5, RoundResult::Active),
                (3, RoundResult::Win),
            ]
        );
        assert_eq!(round.dealer_hand().value(), 17);
    }

    #[test]
    fn dealer_bust_is_a_player_win() {
        // player 12; dealer 10 + 6, draws 9 -> 25
        let mut round = Round::with_deck(stacked(&[10, 2, 10, 6, 9]));
        round.deal().unwrap();
        let updates = round.apply(Decision::Stand).unwrap();
        assert_eq!(
            ranks(&updates),
            vec![(6, RoundResult::Active), (9, RoundResult::Win)]
        );
    }

    #[test]
    fn outcome_table() {
        assert_eq!(settle(&hand(&[10, 10]), &hand(&[10, 9])), RoundResult::Win);
        assert_eq!(settle(&hand(&[10, 7]), &hand(&[10, 9])), RoundResult::Loss);
        assert_eq!(settle(&hand(&[10, 8]), &hand(&[10, 8])), RoundResult::Tie);
        assert_eq!(settle(&hand(&[10, 2]), &hand(&[10, 6, 9])), RoundResult::Win);
    }

    #[test]
    fn standing_on_two_aces_loses() {
        // player A+A = 22 under the fixed ace rule; dealer 10 + 7
        let mut round = Round::with_deck(stacked(&[1, 1, 10, 7]));
        round.deal().unwrap();
        let updates = round.apply(Decision::Stand).unwrap();
        assert_eq!(ranks(&updates), vec![(7, RoundResult::Loss)]);
    }

    #[test]
    fn standing_bust_skips_the_dealer_draw() {
        // player A+A = 22; dealer 2 + 3 would have to draw 4, 5, 6
        let mut round = Round::with_deck(stacked(&[1, 1, 2, 3, 4, 5, 6]));
        round.deal().unwrap();
        let updates = round.apply(Decision::Stand).unwrap();
        assert_eq!(ranks(&updates), vec![(3, RoundResult::Loss)]);
        assert_eq!(round.dealer_hand().len(), 2);
        assert_eq!(round.outcome(), Some(RoundResult::Loss));
        assert!(matches!(
            round.apply(Decision::Hit),
            Err(ProtocolError::OutOfTurn)
        ));
    }

    #[test]
    fn decisions_before_deal_are_out_of_turn() {
        let mut round = Round::new();
        assert!(matches!(
            round.apply(Decision::Hit),
            Err(ProtocolError::OutOfTurn)
        ));
        round.deal().unwrap();
        assert!(matches!(round.deal(), Err(ProtocolError::OutOfTurn)));
    }

    #[test]
    fn short_deck_reports_exhaustion() {
        let mut round = Round::with_deck(stacked(&[2, 3, 4]));
        assert!(matches!(round.deal(), Err(ProtocolError::DeckExhausted)));
    }

    #[test]
    fn shuffled_rounds_always_terminate() {
        for _ in 0..200 {
            let mut round = Round::new();
            round.deal().unwrap();
            while round.outcome().is_none() {
                let decision = if round.player_hand().value() < 15 {
                    Decision::Hit
                } else {
                    Decision::Stand
                };
                round.apply(decision).unwrap();
            }
            assert!(round.dealer_hand().value() >= 17 || round.player_hand().is_bust());
        }
    }
}
