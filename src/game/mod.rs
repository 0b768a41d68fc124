//! # Game Model
//!
//! Cards, decks, hands, the round state machine and per-session tallies.
//!
//! Aces always count 11 and face cards count 10; there is no soft-ace reduction.
//! The dealer draws until reaching 17.

pub mod card;
pub mod deck;
pub mod hand;
pub mod round;
pub mod session;

pub use card::{Card, Suit};
pub use deck::Deck;
pub use hand::Hand;
pub use round::{Round, RoundState};
pub use session::Session;
