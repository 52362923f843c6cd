/**
 * Real-time Event Broadcasting
 *
 * Entry-list snapshots are fanned out with `tokio::sync::broadcast`: every
 * open socket holds its own receiver and gets a copy of each event. A slow
 * receiver falls behind and skips events instead of blocking the writer.
 */

use crate::shared::RealtimeEvent;
use tokio::sync::broadcast;

/// Capacity of the snapshot channel
pub const BROADCAST_CAPACITY: usize = 64;

/// Sender half of the snapshot channel, cloned into every component that
/// publishes
///
/// # Usage
///
/// ```rust
/// use audiodiary::backend::realtime::{new_broadcast, RealtimeEventBroadcast};
///
/// let broadcast: RealtimeEventBroadcast = new_broadcast();
/// assert_eq!(broadcast.receiver_count(), 0);
/// ```
pub type RealtimeEventBroadcast = broadcast::Sender<RealtimeEvent>;

/// Create the snapshot channel with no subscribers yet
pub fn new_broadcast() -> RealtimeEventBroadcast {
    broadcast::channel(BROADCAST_CAPACITY).0
}

/// Broadcast an event to all subscribers
///
/// # Returns
///
/// Number of subscribers that received the event (0 if there are none)
pub async fn broadcast_event(
    broadcast_tx: &RealtimeEventBroadcast,
    event: RealtimeEvent,
) -> usize {
    let kind = event.kind();
    let entries = event.entries().len();
    match broadcast_tx.send(event) {
        Ok(subscriber_count) => {
            tracing::debug!(
                "[Realtime] {} of {} entries sent to {} subscribers",
                kind,
                entries,
                subscriber_count
            );
            subscriber_count
        }
        Err(_) => {
            tracing::debug!("[Realtime] No subscribers for {} event", kind);
            0
        }
    }
}
