use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;
use uppe_events::Event;

#[derive(Debug, Error)]
#[error("Dispatcher is gone, event {0} was not delivered")]
pub struct BusClosed(pub uppe_events::EventTag);

/// Bounded channel every producer publishes events on.
///
/// Publishing waits while the channel is full, so a slow dispatcher slows
/// its producers down instead of losing events. Events are shared as `Arc`
/// so the dispatcher reads the same immutable value.
#[derive(Debug, Clone)]
pub struct Bus {
    tx: mpsc::Sender<Arc<Event>>,
}

impl Bus {
    /// Bus and the receiving end handed to the dispatcher
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Arc<Event>>) {
        let (tx, rx) = mpsc::channel::<Arc<Event>>(capacity.max(1));
        (Self { tx }, rx)
    }

    pub async fn publish(&self, event: impl Into<Event>) -> Result<(), BusClosed> {
        let event = Arc::new(event.into());
        let tag = event.tag();
        debug!(tag = %tag, check_id = event.check_id().unwrap_or("-"), "Bus: publishing event");
        self.tx.send(event).await.map_err(|_| BusClosed(tag))
    }
}
