//! # Blackjack Protocol
//!
//! A game host that advertises itself on the local network and plays rounds of a
//! simplified Blackjack with remote players over a byte-exact binary protocol.
//!
//! ## Layers
//! - [`core`](crate::core): the four fixed-layout wire messages and stream frame reassembly
//! - [`game`]: cards, deck, hands, the round state machine and session tallies
//! - [`transport`]: UDP discovery, the TCP host and the TCP player
//! - [`config`], [`error`], [`utils`]: configuration, error taxonomy, logging, timeouts, metrics
//!
//! ## Rules
//! Aces always count 11, face cards 10. The player hits until standing or going
//! over 21; the dealer then reveals the hole card and draws while below 17.
//!
//! ## Example
//! ```rust,no_run
//! use blackjack_protocol::config::GameConfig;
//! use blackjack_protocol::transport::client::{Client, ThresholdPlayer};
//!
//! # async fn run() -> blackjack_protocol::error::Result<()> {
//! let client = Client::new(&GameConfig::default())?;
//! let host = client.discover().await?;
//! let session = client.play(&host, &mut ThresholdPlayer::default()).await?;
//! println!("{session}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod game;
pub mod transport;
pub mod utils;

pub use crate::core::message::{
    ClientDecision, Decision, Offer, Request, RoundResult, ServerUpdate, WireMessage,
};
pub use crate::error::{ProtocolError, Result};
