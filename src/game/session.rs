//! Per-connection session bookkeeping.
//!
//! A [`Session`] lives for one stream connection. It remembers what the player
//! asked for and tallies rounds as they complete; a round that is cut short never
//! reaches the tally.

use std::fmt;

use crate::core::message::{Request, RoundResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    party_name: String,
    rounds_requested: u8,
    rounds_played: u32,
    wins: u32,
    losses: u32,
    ties: u32,
}

impl Session {
    pub fn new(party_name: impl Into<String>, rounds_requested: u8) -> Self {
        Self {
            party_name: party_name.into(),
            rounds_requested,
            rounds_played: 0,
            wins: 0,
            losses: 0,
            ties: 0,
        }
    }

    pub fn from_request(request: &Request) -> Self {
        Self::new(request.party_name.clone(), request.rounds)
    }

    pub fn party_name(&self) -> &str {
        &self.party_name
    }

    pub fn rounds_requested(&self) -> u8 {
        self.rounds_requested
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn losses(&self) -> u32 {
        self.losses
    }

    pub fn ties(&self) -> u32 {
        self.ties
    }

    /// Whether every requested round has been played.
    pub fn is_complete(&self) -> bool {
        self.rounds_played >= u32::from(self.rounds_requested)
    }

    /// Count one finished round. `Active` is not a result and is ignored.
    pub fn record(&mut self, result: RoundResult) {
        match result {
            RoundResult::Win => self.wins += 1,
            RoundResult::Loss => self.losses += 1,
            RoundResult::Tie => self.ties += 1,
            RoundResult::Active => return,
        }
        self.rounds_played += 1;
    }

    /// Fraction of played rounds won, 0.0 before any round completes.
    pub fn win_rate(&self) -> f64 {
        if self.rounds_played == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.rounds_played)
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Finished playing {} rounds, win rate: {:.2}",
            self.rounds_played,
            self.win_rate()
        )
    }
}
