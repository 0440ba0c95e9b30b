use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uppe_events::{Event, ResultEvent};

use crate::config::Config;
use crate::registry::CheckRegistry;
use crate::sink::{MetricPoint, MetricSink, QueueMessage, QueueSink};

/// Which sinks receive result events
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub metrics_enabled: bool,
    pub measurement_prefix: String,
    pub queue_enabled: bool,
    pub topic: String,
}

impl From<&Config> for DispatchSettings {
    fn from(config: &Config) -> Self {
        Self {
            metrics_enabled: config.metrics.enabled,
            measurement_prefix: config.metrics.measurement_prefix.clone(),
            queue_enabled: config.queue.enabled,
            topic: config.queue.topic.clone(),
        }
    }
}

/// Counters kept by the dispatcher
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub lifecycle: u64,
    pub triggers: u64,
    pub results: u64,
    pub beats: u64,
    pub pings: u64,
    pub encode_failures: u64,
    pub sink_failures: u64,
}

/// Routes every event on the bus to the component that handles its tag
pub struct Dispatcher {
    settings: DispatchSettings,
    metrics: Arc<dyn MetricSink>,
    queue: Arc<dyn QueueSink>,
    registry: CheckRegistry,
    stats: DispatchStats,
}

impl Dispatcher {
    pub fn new(
        settings: DispatchSettings,
        metrics: Arc<dyn MetricSink>,
        queue: Arc<dyn QueueSink>,
    ) -> Self {
        Self {
            settings,
            metrics,
            queue,
            registry: CheckRegistry::default(),
            stats: DispatchStats::default(),
        }
    }

    pub fn registry(&self) -> &CheckRegistry {
        &self.registry
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    pub async fn handle(&mut self, event: &Event) {
        match event {
            Event::CheckInsert(insert) => {
                self.stats.lifecycle += 1;
                let check = insert.check();
                info!(check_id = %check.id, kind = %check.kind, "Check inserted");
                self.registry.insert(check.clone());
            }
            Event::CheckReplace(replace) => {
                self.stats.lifecycle += 1;
                let check = replace.check();
                info!(check_id = %check.id, kind = %check.kind, "Check replaced");
                self.registry.replace(check.clone());
            }
            Event::CheckDelete(delete) => {
                self.stats.lifecycle += 1;
                info!(check_id = %delete.check().id, "Check deleted");
                self.registry.remove(&delete.check().id);
            }
            Event::RunCheck(run) => {
                self.stats.triggers += 1;
                if self.registry.get(run.check_id()).is_none() {
                    warn!(check_id = %run.check_id(), "Run requested for an unknown check");
                } else {
                    debug!(check_id = %run.check_id(), "Run requested");
                }
            }
            Event::HttpResult(result) => self.handle_result(result).await,
            Event::TcpResult(result) => self.handle_result(result).await,
            Event::Beat(beat) => {
                self.stats.beats += 1;
                debug!(check_id = %beat.check_id(), action = %beat.action(), "Beat");
                self.registry.record_beat(beat);
            }
            Event::Ping(ping) => {
                self.stats.pings += 1;
                debug!(at = %ping.at(), "Ping");
                self.registry.record_ping(ping.at());
            }
        }
    }

    async fn handle_result(&mut self, result: &dyn ResultEvent) {
        self.stats.results += 1;

        if self.settings.metrics_enabled {
            let prefix = &self.settings.measurement_prefix;
            let point = MetricPoint::from_result(prefix, result, Utc::now());
            if let Err(e) = self.metrics.write(point).await {
                self.stats.sink_failures += 1;
                error!(check_id = %result.check_id(), "Failed to write metric point: {}", e);
            }
        }

        if self.settings.queue_enabled {
            let body = match result.queue_payload() {
                Ok(body) => body,
                Err(e) => {
                    self.stats.encode_failures += 1;
                    error!(check_id = %result.check_id(), "Dropping queue message: {}", e);
                    return;
                }
            };

            let message = QueueMessage {
                topic: self.settings.topic.clone(),
                routing: result.routing(),
                body,
            };
            if let Err(e) = self.queue.publish(message).await {
                self.stats.sink_failures += 1;
                error!(check_id = %result.check_id(), "Failed to publish queue message: {}", e);
            }
        }
    }

    /// Consume the bus until every sender is gone
    pub async fn run(mut self, mut receiver: mpsc::Receiver<Arc<Event>>) -> Self {
        info!("Dispatcher started");
        while let Some(event) = receiver.recv().await {
            self.handle(&event).await;
        }
        info!(stats = ?self.stats, "Dispatcher stopped");
        self
    }
}
