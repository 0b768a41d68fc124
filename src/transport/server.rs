//! # Game Host
//!
//! Accepts player connections and runs one session per connection, each in its
//! own task. Sessions share nothing but read-only settings and the metrics counters.
//!
//! ## Session flow
//! 1. Read one [`Request`] (rounds wanted, party name)
//! 2. For each round: deal, then alternate decisions and updates until a result
//! 3. Close once the requested rounds are played
//!
//! A session ends early, without recording the round in progress, when the peer
//! closes the stream, stays silent past the inactivity timeout, or sends anything
//! that is not a valid decision.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures::SinkExt;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_util::codec::Framed;
use tracing::{debug, error, info, instrument, warn};

use crate::config::GameConfig;
use crate::core::codec::WireCodec;
use crate::core::message::{ClientDecision, Offer, Request, ServerUpdate};
use crate::error::{ProtocolError, Result};
use crate::game::deck::Deck;
use crate::game::round::Round;
use crate::game::session::Session;
use crate::transport::discovery::Announcer;
use crate::transport::read_frame_within;
use crate::utils::metrics::Metrics;

type DeckSource = dyn Fn() -> Deck + Send + Sync;

/// Runs sessions over established streams.
#[derive(Clone)]
pub struct TableHost {
    inactivity_timeout: Duration,
    deck_source: Arc<DeckSource>,
    metrics: Arc<Metrics>,
}

impl TableHost {
    pub fn new(inactivity_timeout: Duration) -> Self {
        Self {
            inactivity_timeout,
            deck_source: Arc::new(Deck::shuffled),
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Replace the per-round deck supplier, e.g. with stacked decks for scripted play.
    pub fn with_deck_source<F>(mut self, source: F) -> Self
    where
        F: Fn() -> Deck + Send + Sync + 'static,
    {
        self.deck_source = Arc::new(source);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Play one full session over `io` and return its tally.
    #[instrument(skip(self, io))]
    pub async fn serve<T>(&self, io: T) -> Result<Session>
    where
        T: AsyncRead + AsyncWrite + Unpin,
    {
        let mut framed = Framed::new(io, WireCodec::<Request>::new());
        let request = read_frame_within(&mut framed, self.inactivity_timeout).await?;
        info!(party = %request.party_name, rounds = request.rounds, "Session requested");

        let mut framed = framed.map_codec(|_| WireCodec::<ClientDecision>::new());
        let mut session = Session::from_request(&request);

        while !session.is_complete() {
            let mut round = Round::with_deck((self.deck_source)());
            for update in round.deal()? {
                framed.feed(update).await?;
            }
            SinkExt::<ServerUpdate>::flush(&mut framed).await?;

            let result = loop {
                if let Some(result) = round.outcome() {
                    break result;
                }
                let decision = read_frame_within(&mut framed, self.inactivity_timeout).await?;
                debug!(decision = %decision.decision, "Decision received");
                for update in round.apply(decision.decision)? {
                    framed.feed(update).await?;
                }
                SinkExt::<ServerUpdate>::flush(&mut framed).await?;
            };

            session.record(result);
            self.metrics.round_completed(result);
            info!(
                party = %session.party_name(),
                round = session.rounds_played(),
                player = round.player_hand().value(),
                dealer = round.dealer_hand().value(),
                %result,
                "Round finished"
            );
        }

        info!(
            party = %session.party_name(),
            rounds = session.rounds_played(),
            wins = session.wins(),
            "Session complete"
        );
        Ok(session)
    }
}

/// TCP game host with discovery.
pub struct Server {
    listener: TcpListener,
    config: GameConfig,
    host: TableHost,
}

impl Server {
    /// Bind the session listener. Fails on an invalid server or discovery section.
    pub async fn bind(config: GameConfig) -> Result<Self> {
        let mut problems = config.server.validate();
        problems.extend(config.discovery.validate());
        if !problems.is_empty() {
            return Err(ProtocolError::ConfigError(problems.join("; ")));
        }

        let listener = TcpListener::bind(&config.server.address).await?;
        let host = TableHost::new(config.server.inactivity_timeout);
        Ok(Self {
            listener,
            config,
            host,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        self.host.metrics().clone()
    }

    pub fn with_deck_source<F>(mut self, source: F) -> Self
    where
        F: Fn() -> Deck + Send + Sync + 'static,
    {
        self.host = self.host.with_deck_source(source);
        self
    }

    /// Serve until Ctrl-C.
    pub async fn run(self) -> Result<()> {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);

        tokio::spawn(async move {
            if let Ok(()) = tokio::signal::ctrl_c().await {
                info!("Received CTRL+C signal, shutting down");
                let _ = shutdown_tx.send(()).await;
            }
        });

        self.run_with_shutdown(shutdown_rx).await
    }

    /// Serve until `shutdown_rx` fires, then wait for active sessions up to the shutdown timeout.
    #[instrument(skip(self, shutdown_rx), fields(name = %self.config.server.display_name))]
    pub async fn run_with_shutdown(self, mut shutdown_rx: mpsc::Receiver<()>) -> Result<()> {
        let local = self.local_addr()?;
        let metrics = self.host.metrics().clone();
        info!(address = %local, "Server started, listening for players");

        let announcer = if self.config.discovery.enabled {
            let offer = Offer {
                port: local.port(),
                server_name: self.config.server.display_name.clone(),
            };
            let announcer = Announcer::bind(&self.config.discovery, &offer)
                .await?
                .with_metrics(metrics.clone());
            Some(tokio::spawn(announcer.run()))
        } else {
            None
        };

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("Shutting down server. Waiting for sessions to close...");
                    if let Some(task) = &announcer {
                        task.abort();
                    }

                    let deadline = tokio::time::sleep(self.config.server.shutdown_timeout);
                    tokio::pin!(deadline);

                    loop {
                        let active = metrics.snapshot().sessions_active;
                        if active == 0 {
                            info!("All sessions closed, shutting down");
                            break;
                        }
                        tokio::select! {
                            _ = &mut deadline => {
                                warn!(sessions = active, "Shutdown timeout reached, forcing exit");
                                break;
                            }
                            _ = tokio::time::sleep(Duration::from_millis(100)) => {
                                debug!(sessions = active, "Waiting for sessions to close");
                            }
                        }
                    }

                    metrics.log_metrics();
                    return Ok(());
                }

                accept_result = self.listener.accept() => {
                    match accept_result {
                        Ok((stream, peer)) => {
                            let active = metrics.snapshot().sessions_active;
                            if active >= self.config.server.max_connections as u64 {
                                warn!(peer = %peer, active, "Connection limit reached, refusing player");
                                metrics.session_rejected();
                                drop(stream);
                                continue;
                            }

                            info!(peer = %peer, "New connection established");
                            metrics.session_started();
                            let host = self.host.clone();
                            tokio::spawn(async move {
                                let outcome = host.serve(stream).await;
                                report_session_end(&host, peer, outcome);
                                host.metrics().session_ended();
                            });
                        }
                        Err(e) => {
                            error!(error = %e, "Error accepting connection");
                        }
                    }
                }
            }
        }
    }
}

fn report_session_end(host: &TableHost, peer: SocketAddr, outcome: Result<Session>) {
    match outcome {
        Ok(session) => info!(peer = %peer, summary = %session, "Connection closed"),
        Err(ProtocolError::Timeout) => {
            host.metrics().timeout();
            info!(peer = %peer, "Player inactive, connection closed");
        }
        Err(e) if e.is_disconnect() => info!(peer = %peer, "Player disconnected"),
        Err(e) => {
            host.metrics().protocol_error();
            warn!(peer = %peer, error = %e, "Session aborted");
        }
    }
}
