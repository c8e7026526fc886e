//! Bounded confirmation polling.

use crate::errors::CoreError;
use crate::issue::client::StatusSource;
use crate::types::{Id, Status};
use std::time::Duration;
use tracing::{debug, warn};

/// Checks the status of `tx_id` up to `attempts` times, sleeping `delay`
/// between checks, and returns as soon as it is committed or aborted.
///
/// If the transaction is still undecided on the final attempt, the status
/// of that attempt is returned. A failed status query is returned as an
/// error immediately. This blocks the caller until it returns.
pub async fn confirm_tx<S: StatusSource + ?Sized>(
    client: &S,
    tx_id: &Id,
    attempts: usize,
    delay: Duration,
) -> Result<Status, CoreError> {
    for attempt in 1..attempts {
        let reply = client.get_tx_status(tx_id, true).await?;
        if reply.status.is_terminal() {
            if let Some(reason) = &reply.reason {
                debug!("Transaction {} {}: {}", tx_id, reply.status, reason);
            }
            return Ok(reply.status);
        }

        debug!(
            "Transaction {} is {} after attempt {}/{}",
            tx_id, reply.status, attempt, attempts
        );
        tokio::time::sleep(delay).await;
    }

    let reply = client.get_tx_status(tx_id, false).await?;
    if !reply.status.is_terminal() {
        warn!("Transaction {} still {} after {} attempts", tx_id, reply.status, attempts);
    }
    Ok(reply.status)
}
