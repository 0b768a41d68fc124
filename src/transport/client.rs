//! # Player Side
//!
//! Finds a host, opens a session and plays it. The choice of Hit or Stand is
//! delegated to a [`Player`], which may be an interactive console, a bot, or a
//! scripted test double.
//!
//! The client tracks which revealed card belongs to whom purely from the order of
//! updates: the first two of a round are the player's, the third is the dealer's
//! up card, a card after `Hit` is the player's, and every card after `Stand` is
//! the dealer's.

use std::net::SocketAddr;
use std::time::Duration;

use futures::SinkExt;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use tracing::{debug, info, instrument};

use crate::config::{ClientConfig, DiscoveryConfig, GameConfig};
use crate::core::codec::WireCodec;
use crate::core::message::{ClientDecision, Decision, Request, RoundResult, ServerUpdate};
use crate::error::{ProtocolError, Result};
use crate::game::card::Card;
use crate::game::hand::Hand;
use crate::game::session::Session;
use crate::transport::discovery::{bind_listener, listen_for_offer, DiscoveredHost};
use crate::transport::read_frame;
use crate::utils::timeout::with_timeout;

/// Cards visible to the player during a round.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableView {
    pub round: u32,
    pub player: Hand,
    pub dealer: Hand,
}

/// Something the player may want to narrate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableEvent {
    RoundStarted { round: u32, of: u8 },
    PlayerCard { card: Card, total: u8 },
    DealerCard { card: Card, total: u8 },
    RoundFinished { result: RoundResult, player_total: u8, dealer_total: u8 },
}

/// Source of decisions for one seat.
#[allow(async_fn_in_trait)]
pub trait Player {
    /// Choose the next move. May wait indefinitely.
    async fn decide(&mut self, table: &TableView) -> Result<Decision>;

    /// Called for every table event, in order.
    fn observe(&mut self, _event: &TableEvent) {}
}

/// Hits while the hand is below a fixed total, then stands.
#[derive(Clone, Copy, Debug)]
pub struct ThresholdPlayer {
    stand_on: u8,
}

impl ThresholdPlayer {
    pub fn new(stand_on: u8) -> Self {
        Self { stand_on }
    }
}

impl Default for ThresholdPlayer {
    fn default() -> Self {
        Self::new(17)
    }
}

impl Player for ThresholdPlayer {
    async fn decide(&mut self, table: &TableView) -> Result<Decision> {
        if table.player.value() < self.stand_on {
            Ok(Decision::Hit)
        } else {
            Ok(Decision::Stand)
        }
    }
}

#[derive(Clone, Copy)]
enum Seat {
    Player,
    Dealer,
}

/// Record one update on the view and tell the player. Returns the result if the round ended.
fn absorb<P: Player>(
    view: &mut TableView,
    update: ServerUpdate,
    seat: Seat,
    player: &mut P,
) -> Option<RoundResult> {
    let event = match seat {
        Seat::Player => {
            view.player.push(update.card);
            TableEvent::PlayerCard {
                card: update.card,
                total: view.player.value(),
            }
        }
        Seat::Dealer => {
            view.dealer.push(update.card);
            TableEvent::DealerCard {
                card: update.card,
                total: view.dealer.value(),
            }
        }
    };
    player.observe(&event);

    if update.result.is_final() {
        player.observe(&TableEvent::RoundFinished {
            result: update.result,
            player_total: view.player.value(),
            dealer_total: view.dealer.value(),
        });
        Some(update.result)
    } else {
        None
    }
}

async fn play_round<T, P>(
    framed: &mut Framed<T, WireCodec<ServerUpdate>>,
    view: &mut TableView,
    player: &mut P,
) -> Result<RoundResult>
where
    T: AsyncRead + AsyncWrite + Unpin,
    P: Player,
{
    for seat in [Seat::Player, Seat::Player, Seat::Dealer] {
        let update = read_frame(framed).await?;
        if let Some(result) = absorb(view, update, seat, player) {
            return Ok(result);
        }
    }

    loop {
        let decision = player.decide(view).await?;
        debug!(%decision, total = view.player.value(), "Sending decision");
        framed.send(ClientDecision::new(decision)).await?;

        match decision {
            Decision::Hit => {
                let update = read_frame(framed).await?;
                if let Some(result) = absorb(view, update, Seat::Player, player) {
                    return Ok(result);
                }
            }
            Decision::Stand => loop {
                let update = read_frame(framed).await?;
                if let Some(result) = absorb(view, update, Seat::Dealer, player) {
                    return Ok(result);
                }
            },
        }
    }
}

/// Play a whole session over `io`: send `request`, then play every round it asks for.
///
/// Only rounds that reach a result are counted; if the host goes away mid-round the
/// error is returned and the partial round is dropped.
#[instrument(skip(io, player), fields(party = %request.party_name, rounds = request.rounds))]
pub async fn play_session<T, P>(io: T, request: Request, player: &mut P) -> Result<Session>
where
    T: AsyncRead + AsyncWrite + Unpin,
    P: Player,
{
    let mut framed = Framed::new(io, WireCodec::<ServerUpdate>::new());
    framed.send(request.clone()).await?;

    let mut session = Session::from_request(&request);
    while !session.is_complete() {
        let mut view = TableView {
            round: session.rounds_played() + 1,
            ..TableView::default()
        };
        player.observe(&TableEvent::RoundStarted {
            round: view.round,
            of: session.rounds_requested(),
        });

        let result = play_round(&mut framed, &mut view, player).await?;
        session.record(result);
        info!(round = view.round, %result, "Round finished");
    }

    Ok(session)
}

/// Discovery plus session play with settings from [`GameConfig`].
pub struct Client {
    config: ClientConfig,
    discovery: DiscoveryConfig,
}

impl Client {
    /// Build a client. Fails on an invalid client or discovery section.
    pub fn new(config: &GameConfig) -> Result<Self> {
        let mut problems = config.client.validate();
        problems.extend(config.discovery.validate());
        if !problems.is_empty() {
            return Err(ProtocolError::ConfigError(problems.join("; ")));
        }

        Ok(Self {
            config: config.client.clone(),
            discovery: config.discovery.clone(),
        })
    }

    pub fn rounds(&self) -> u8 {
        self.config.rounds
    }

    pub fn set_rounds(&mut self, rounds: u8) -> Result<()> {
        if rounds == 0 {
            return Err(ProtocolError::ConfigError(
                "Rounds must be greater than 0".to_string(),
            ));
        }
        self.config.rounds = rounds;
        Ok(())
    }

    /// Listen on the discovery port until a host offers itself.
    pub async fn discover(&self) -> Result<DiscoveredHost> {
        info!(port = self.discovery.port, "Client started, listening for offer requests...");
        let socket = bind_listener(self.discovery.port).await?;
        listen_for_offer(&socket).await
    }

    pub async fn connect(&self, address: SocketAddr) -> Result<TcpStream> {
        connect_within(address, self.config.connect_timeout).await
    }

    /// Connect to `host` and play the configured number of rounds.
    pub async fn play<P: Player>(&self, host: &DiscoveredHost, player: &mut P) -> Result<Session> {
        let stream = self.connect(host.address).await?;
        info!(server = %host.server_name, address = %host.address, "Connected");
        let request = Request {
            rounds: self.config.rounds,
            party_name: self.config.party_name.clone(),
        };
        play_session(stream, request, player).await
    }
}

async fn connect_within(address: SocketAddr, limit: Duration) -> Result<TcpStream> {
    with_timeout(limit, async {
        TcpStream::connect(address)
            .await
            .map_err(ProtocolError::from)
    })
    .await
}
