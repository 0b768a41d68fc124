//! Timing constants and an async timeout wrapper.

use crate::error::{ProtocolError, Result};
use std::future::Future;
use std::time::Duration;

/// Server closes a session after this long without data from the peer
pub const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(600);

/// Delay between two discovery offers
pub const OFFER_INTERVAL: Duration = Duration::from_secs(1);

/// Upper bound on a TCP connect attempt
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Time granted to active sessions on shutdown
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Run `fut` with a deadline, mapping an elapsed deadline to [`ProtocolError::Timeout`].
pub async fn with_timeout<F, T>(duration: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(duration, fut).await {
        Ok(result) => result,
        Err(_) => Err(ProtocolError::Timeout),
    }
}
