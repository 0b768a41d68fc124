//! Observability and Metrics
//!
//! Counters for sessions, rounds and their outcomes, shared by every
//! connection task of one server.
//!
//! Uses atomic counters for thread-safe metrics collection.

use crate::core::message::RoundResult;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Metrics collector for one server instance
#[derive(Debug)]
pub struct Metrics {
    /// Total sessions accepted
    pub sessions_total: AtomicU64,
    /// Currently active sessions
    pub sessions_active: AtomicU64,
    /// Connections turned away at the connection limit
    pub sessions_rejected: AtomicU64,
    /// Rounds played to completion
    pub rounds_completed: AtomicU64,
    /// Completed rounds the player won
    pub player_wins: AtomicU64,
    /// Completed rounds the player lost
    pub player_losses: AtomicU64,
    /// Completed rounds ending in a tie
    pub ties: AtomicU64,
    /// Sessions ended by a wire or game-flow violation
    pub protocol_errors: AtomicU64,
    /// Sessions ended by inactivity
    pub timeouts: AtomicU64,
    /// Discovery offers sent
    pub offers_sent: AtomicU64,
    start_time: Instant,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            sessions_total: AtomicU64::new(0),
            sessions_active: AtomicU64::new(0),
            sessions_rejected: AtomicU64::new(0),
            rounds_completed: AtomicU64::new(0),
            player_wins: AtomicU64::new(0),
            player_losses: AtomicU64::new(0),
            ties: AtomicU64::new(0),
            protocol_errors: AtomicU64::new(0),
            timeouts: AtomicU64::new(0),
            offers_sent: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a new session
    pub fn session_started(&self) {
        self.sessions_total.fetch_add(1, Ordering::Relaxed);
        self.sessions_active.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a session ending, for any reason
    pub fn session_ended(&self) {
        self.sessions_active.fetch_sub(1, Ordering::Relaxed);
    }

    /// Record a connection refused at the limit
    pub fn session_rejected(&self) {
        self.sessions_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the outcome of a completed round
    pub fn round_completed(&self, result: RoundResult) {
        self.rounds_completed.fetch_add(1, Ordering::Relaxed);
        match result {
            RoundResult::Win => self.player_wins.fetch_add(1, Ordering::Relaxed),
            RoundResult::Loss => self.player_losses.fetch_add(1, Ordering::Relaxed),
            RoundResult::Tie => self.ties.fetch_add(1, Ordering::Relaxed),
            RoundResult::Active => 0,
        };
    }

    /// Record a protocol error
    pub fn protocol_error(&self) {
        self.protocol_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an inactivity timeout
    pub fn timeout(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an offer broadcast
    pub fn offer_sent(&self) {
        self.offers_sent.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            sessions_total: self.sessions_total.load(Ordering::Relaxed),
            sessions_active: self.sessions_active.load(Ordering::Relaxed),
            sessions_rejected: self.sessions_rejected.load(Ordering::Relaxed),
            rounds_completed: self.rounds_completed.load(Ordering::Relaxed),
            player_wins: self.player_wins.load(Ordering::Relaxed),
            player_losses: self.player_losses.load(Ordering::Relaxed),
            ties: self.ties.load(Ordering::Relaxed),
            protocol_errors: self.protocol_errors.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            offers_sent: self.offers_sent.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            sessions_total = snapshot.sessions_total,
            sessions_active = snapshot.sessions_active,
            sessions_rejected = snapshot.sessions_rejected,
            rounds_completed = snapshot.rounds_completed,
            player_wins = snapshot.player_wins,
            player_losses = snapshot.player_losses,
            ties = snapshot.ties,
            protocol_errors = snapshot.protocol_errors,
            timeouts = snapshot.timeouts,
            offers_sent = snapshot.offers_sent,
            uptime_seconds = snapshot.uptime_seconds,
            "Table metrics snapshot"
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub sessions_total: u64,
    pub sessions_active: u64,
    pub sessions_rejected: u64,
    pub rounds_completed: u64,
    pub player_wins: u64,
    pub player_losses: u64,
    pub ties: u64,
    pub protocol_errors: u64,
    pub timeouts: u64,
    pub offers_sent: u64,
    pub uptime_seconds: u64,
}
