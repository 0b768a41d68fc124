//! # Wire Messages
//!
//! The four fixed-layout messages of the protocol. Every message starts with the
//! 4-byte big-endian magic cookie followed by a kind byte; each kind has a constant
//! total size, so no length field is carried.
//!
//! ```text
//! Offer          [Magic(4)] [0x2] [Port(2)] [ServerName(32)]          39 bytes
//! Request        [Magic(4)] [0x3] [Rounds(1)] [PartyName(32)]         38 bytes
//! ClientDecision [Magic(4)] [0x4] [Decision(5)]                       10 bytes
//! ServerUpdate   [Magic(4)] [0x4] [Result(1)] [Rank(2)] [Suit(1)]      9 bytes
//! ```
//!
//! `ClientDecision` and `ServerUpdate` share kind `0x4`; which one a buffer holds is
//! decided by who sent it, so each side only ever decodes one of the two.
//!
//! Name fields are NUL-padded on encode and NUL-stripped on decode. A name that is
//! not valid UTF-8 after stripping fails with [`ProtocolError::InvalidEncoding`].

use bytes::{Buf, BufMut, BytesMut};
use std::fmt;

use crate::config::{
    CLIENT_DECISION_SIZE, DECISION_FIELD_LEN, KIND_OFFER, KIND_PAYLOAD, KIND_REQUEST,
    MAGIC_COOKIE, NAME_FIELD_LEN, OFFER_SIZE, REQUEST_SIZE, SERVER_UPDATE_SIZE,
};
use crate::error::{ProtocolError, Result};
use crate::game::card::Card;

/// Magic cookie plus kind byte
pub const HEADER_SIZE: usize = 5;

/// A message with a fixed wire layout.
pub trait WireMessage: Sized {
    /// Kind byte following the magic cookie
    const KIND: u8;
    /// Total encoded size, header included
    const SIZE: usize;

    /// Write the fields that follow the header.
    fn encode_body(&self, dst: &mut BytesMut);

    /// Read the fields that follow the header. `body` is exactly `SIZE - HEADER_SIZE` bytes.
    fn decode_body(body: &[u8]) -> Result<Self>;

    /// Append the full message to `dst`.
    fn encode(&self, dst: &mut BytesMut) {
        dst.reserve(Self::SIZE);
        dst.put_u32(MAGIC_COOKIE);
        dst.put_u8(Self::KIND);
        self.encode_body(dst);
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut buf = BytesMut::with_capacity(Self::SIZE);
        self.encode(&mut buf);
        buf.to_vec()
    }

    /// Decode one message from exactly `Self::SIZE` bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::SIZE {
            return Err(ProtocolError::ByteLengthMismatch {
                expected: Self::SIZE,
                actual: bytes.len(),
            });
        }

        let mut header = &bytes[..HEADER_SIZE];
        let magic = header.get_u32();
        if magic != MAGIC_COOKIE {
            return Err(ProtocolError::InvalidMagic(magic));
        }

        let kind = header.get_u8();
        if kind != Self::KIND {
            return Err(ProtocolError::InvalidKind {
                expected: Self::KIND,
                found: kind,
            });
        }

        Self::decode_body(&bytes[HEADER_SIZE..])
    }
}

/// Discovery broadcast announcing a host's session port.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Offer {
    pub port: u16,
    pub server_name: String,
}

impl WireMessage for Offer {
    const KIND: u8 = KIND_OFFER;
    const SIZE: usize = OFFER_SIZE;

    fn encode_body(&self, dst: &mut BytesMut) {
        dst.put_u16(self.port);
        put_name(dst, &self.server_name);
    }

    fn decode_body(mut body: &[u8]) -> Result<Self> {
        let port = body.get_u16();
        let server_name = read_name(body)?;
        Ok(Offer { port, server_name })
    }
}

/// Session-open message from the player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    pub rounds: u8,
    pub party_name: String,
}

impl WireMessage for Request {
    const KIND: u8 = KIND_REQUEST;
    const SIZE: usize = REQUEST_SIZE;

    fn encode_body(&self, dst: &mut BytesMut) {
        dst.put_u8(self.rounds);
        put_name(dst, &self.party_name);
    }

    fn decode_body(mut body: &[u8]) -> Result<Self> {
        let rounds = body.get_u8();
        let party_name = read_name(body)?;
        Ok(Request { rounds, party_name })
    }
}

/// A player's choice during their turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Decision {
    Hit,
    Stand,
}

impl Decision {
    const HIT_WIRE: &'static [u8; DECISION_FIELD_LEN] = b"Hittt";
    const STAND_WIRE: &'static [u8; DECISION_FIELD_LEN] = b"Stand";

    pub fn wire_bytes(self) -> &'static [u8; DECISION_FIELD_LEN] {
        match self {
            Decision::Hit => Self::HIT_WIRE,
            Decision::Stand => Self::STAND_WIRE,
        }
    }

    /// Parse interactive input such as `"hit"`, `"Stand"` or `"h"`.
    pub fn from_input(input: &str) -> Result<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "hit" | "h" => Ok(Decision::Hit),
            "stand" | "s" => Ok(Decision::Stand),
            _ => Err(ProtocolError::UnexpectedDecision(input.trim().to_string())),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Hit => f.write_str("Hit"),
            Decision::Stand => f.write_str("Stand"),
        }
    }
}

/// Decision message from player to host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClientDecision {
    pub decision: Decision,
}

impl ClientDecision {
    pub fn new(decision: Decision) -> Self {
        Self { decision }
    }
}

impl WireMessage for ClientDecision {
    const KIND: u8 = KIND_PAYLOAD;
    const SIZE: usize = CLIENT_DECISION_SIZE;

    fn encode_body(&self, dst: &mut BytesMut) {
        dst.put_slice(self.decision.wire_bytes());
    }

    fn decode_body(body: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(strip_nul(body)).map_err(|_| ProtocolError::InvalidEncoding)?;
        let decision = match text {
            "Hittt" | "Hit" => Decision::Hit,
            "Stand" => Decision::Stand,
            other => return Err(ProtocolError::UnexpectedDecision(other.to_string())),
        };
        Ok(ClientDecision { decision })
    }
}

/// Round status carried by every server update, from the player's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoundResult {
    Active = 0,
    Tie = 1,
    Loss = 2,
    Win = 3,
}

impl RoundResult {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(RoundResult::Active),
            1 => Ok(RoundResult::Tie),
            2 => Ok(RoundResult::Loss),
            3 => Ok(RoundResult::Win),
            other => Err(ProtocolError::InvalidResult(other)),
        }
    }

    /// Whether the round is over.
    pub fn is_final(self) -> bool {
        self != RoundResult::Active
    }
}

impl fmt::Display for RoundResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RoundResult::Active => "in play",
            RoundResult::Tie => "tie",
            RoundResult::Loss => "loss",
            RoundResult::Win => "win",
        };
        f.write_str(text)
    }
}

/// One card reveal from host to player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ServerUpdate {
    pub result: RoundResult,
    pub card: Card,
}

impl ServerUpdate {
    pub fn new(result: RoundResult, card: Card) -> Self {
        Self { result, card }
    }

    pub fn active(card: Card) -> Self {
        Self::new(RoundResult::Active, card)
    }
}

impl WireMessage for ServerUpdate {
    const KIND: u8 = KIND_PAYLOAD;
    const SIZE: usize = SERVER_UPDATE_SIZE;

    fn encode_body(&self, dst: &mut BytesMut) {
        dst.put_u8(self.result.code());
        dst.put_u16(self.card.rank() as u16);
        dst.put_u8(self.card.suit().code());
    }

    fn decode_body(mut body: &[u8]) -> Result<Self> {
        let result = RoundResult::from_code(body.get_u8())?;
        let rank = body.get_u16();
        let suit = body.get_u8();
        let card = Card::from_wire(rank, suit)?;
        Ok(ServerUpdate { result, card })
    }
}

/// Write `name` as a NUL-padded field, cut at the last character boundary that fits.
fn put_name(dst: &mut BytesMut, name: &str) {
    let mut end = name.len().min(NAME_FIELD_LEN);
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    dst.put_slice(&name.as_bytes()[..end]);
    dst.put_bytes(0, NAME_FIELD_LEN - end);
}

fn read_name(field: &[u8]) -> Result<String> {
    std::str::from_utf8(strip_nul(field))
        .map(str::to_owned)
        .map_err(|_| ProtocolError::InvalidEncoding)
}

fn strip_nul(field: &[u8]) -> &[u8] {
    let end = field.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    &field[..end]
}
