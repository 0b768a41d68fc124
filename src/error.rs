//! # Error Types
//!
//! Error handling for the blackjack wire protocol and game sessions.
//!
//! This module defines every failure a session can run into, from low-level
//! socket errors through wire decode failures to game-flow violations.
//!
//! ## Error Categories
//! - **I/O Errors**: socket failures
//! - **Wire Errors**: bad magic, wrong kind byte, wrong length, malformed text or fields
//! - **Game Errors**: unexpected decisions, out-of-turn input, exhausted deck
//! - **Disconnects**: peer closed the stream or went quiet past the inactivity timeout
//!
//! Only [`ProtocolError::PeerClosed`] and [`ProtocolError::Timeout`] are expected
//! ways for a session to end; see [`ProtocolError::is_disconnect`].
//!
//! ## Example Usage
//! ```rust
//! use blackjack_protocol::core::message::{Offer, WireMessage};
//! use blackjack_protocol::error::ProtocolError;
//!
//! let short = [0u8; 38];
//! match Offer::from_bytes(&short) {
//!     Err(ProtocolError::ByteLengthMismatch { expected, actual }) => {
//!         assert_eq!((expected, actual), (39, 38));
//!     }
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

use std::io;
use thiserror::Error;

// ProtocolError is the primary error type for all protocol operations
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid magic cookie: {0:#010x}")]
    InvalidMagic(u32),

    #[error("Invalid message kind: expected {expected:#04x}, found {found:#04x}")]
    InvalidKind { expected: u8, found: u8 },

    #[error("Byte length mismatch: expected {expected} bytes, got {actual}")]
    ByteLengthMismatch { expected: usize, actual: usize },

    #[error("Text field is not valid UTF-8")]
    InvalidEncoding,

    #[error("Unexpected decision: {0:?}")]
    UnexpectedDecision(String),

    #[error("Invalid card on the wire: rank {rank}, suit {suit}")]
    InvalidCard { rank: u16, suit: u8 },

    #[error("Invalid result code: {0}")]
    InvalidResult(u8),

    #[error("Connection closed by peer")]
    PeerClosed,

    #[error("Connection timed out (no activity)")]
    Timeout,

    #[error("Input received out of turn")]
    OutOfTurn,

    #[error("Deck exhausted")]
    DeckExhausted,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ProtocolError {
    /// Whether this error is a normal end of a session rather than a failure.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, ProtocolError::PeerClosed | ProtocolError::Timeout)
    }
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
