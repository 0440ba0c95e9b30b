use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};
use uppe_events::Ping;

use crate::bus::Bus;

/// Publish a ping on `bus` every `every`, until the task is aborted or the
/// dispatcher goes away
pub fn spawn(bus: Bus, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = interval(every);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            timer.tick().await;
            let ping = Ping::new();
            debug!(at = %ping.at(), "Liveness ping");
            if let Err(e) = bus.publish(ping).await {
                info!("Stopping ping ticker: {}", e);
                break;
            }
        }
    })
}
