use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};
use uppe_events::Event;

use crate::bus::Bus;

/// Decode newline-delimited event envelopes from `reader` and publish them.
///
/// Lines that fail to decode are logged and skipped. Reading waits while the
/// bus is full and stops early if the dispatcher is gone. Returns the number
/// of events published.
pub async fn forward_lines<R>(reader: R, bus: &Bus) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut published = 0;
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event = match Event::decode(line.as_bytes()) {
            Ok(event) => event,
            Err(e) => {
                warn!(line = line_no, "Skipping undecodable event: {}", e);
                continue;
            }
        };

        if let Err(e) = bus.publish(event).await {
            warn!(line = line_no, "Stopping input: {}", e);
            break;
        }
        published += 1;
    }

    info!(published, "Input closed");
    Ok(published)
}
