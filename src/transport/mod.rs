//! # Transport Layer
//!
//! Network plumbing around the game: UDP discovery, the TCP host and the TCP player.
//!
//! ## Components
//! - **Discovery**: periodic offers and first-offer listening over UDP
//! - **Server**: accept loop, one task per session, inactivity timeout, graceful shutdown
//! - **Client**: connect to a discovered host and play a session
//!
//! Sessions run over any `AsyncRead + AsyncWrite` stream, so the drivers are usable
//! with in-memory pipes as well as TCP.

pub mod client;
pub mod discovery;
pub mod server;

use futures::StreamExt;
use std::time::Duration;
use tokio::io::AsyncRead;
use tokio_util::codec::Framed;

use crate::core::codec::WireCodec;
use crate::core::message::WireMessage;
use crate::error::{ProtocolError, Result};
use crate::utils::timeout::with_timeout;

/// Next decoded message, or `PeerClosed` once the stream ends.
pub(crate) async fn read_frame<T, In>(framed: &mut Framed<T, WireCodec<In>>) -> Result<In>
where
    T: AsyncRead + Unpin,
    In: WireMessage,
{
    match framed.next().await {
        Some(frame) => frame,
        None => Err(ProtocolError::PeerClosed),
    }
}

/// [`read_frame`] bounded by an inactivity deadline.
pub(crate) async fn read_frame_within<T, In>(
    framed: &mut Framed<T, WireCodec<In>>,
    inactivity: Duration,
) -> Result<In>
where
    T: AsyncRead + Unpin,
    In: WireMessage,
{
    with_timeout(inactivity, read_frame(framed)).await
}
