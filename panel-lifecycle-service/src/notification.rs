//! Post-commit lifecycle notifications.
//!
//! Publishing never blocks and never fails the operation that produced the
//! event: a full queue drops the event with a warning. A single dispatcher
//! task drains the queue and delivers each event with capped exponential
//! backoff.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use panel_lifecycle_api::domain::LifecycleEvent;
use rand::Rng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Transport for lifecycle events (push, websocket, message bus, ...).
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(
        &self,
        event: &LifecycleEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(10),
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based): doubles from the
    /// initial backoff and is capped at `max_backoff`. With jitter the delay
    /// is drawn from `[delay / 2, delay]`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        let delay = self
            .initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff);
        if !self.jitter || delay.is_zero() {
            return delay;
        }
        let millis = delay.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(millis / 2..=millis))
    }
}

/// Cheap, cloneable sending side of the notification queue.
#[derive(Debug, Clone)]
pub struct NotificationPublisher {
    tx: mpsc::Sender<LifecycleEvent>,
}

impl NotificationPublisher {
    /// Enqueues the events; returns how many were accepted.
    pub fn publish(&self, events: Vec<LifecycleEvent>) -> usize {
        let mut accepted = 0;
        for event in events {
            let panel_id = event.panel_id();
            match self.tx.try_send(event) {
                Ok(()) => accepted += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(%panel_id, "Notification queue full, event dropped");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    warn!(%panel_id, "Notification dispatcher stopped, event dropped");
                }
            }
        }
        accepted
    }
}

pub struct NotificationDispatcher {
    rx: mpsc::Receiver<LifecycleEvent>,
    sink: Arc<dyn NotificationSink>,
    policy: RetryPolicy,
}

impl NotificationDispatcher {
    /// Creates the bounded queue and its dispatcher.
    pub fn channel(
        capacity: usize,
        sink: Arc<dyn NotificationSink>,
        policy: RetryPolicy,
    ) -> (NotificationPublisher, NotificationDispatcher) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (
            NotificationPublisher { tx },
            NotificationDispatcher { rx, sink, policy },
        )
    }

    /// Runs until every publisher has been dropped and the queue is drained.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    pub async fn run(mut self) {
        while let Some(event) = self.rx.recv().await {
            self.deliver(&event).await;
        }
        debug!("Notification dispatcher stopped");
    }

    async fn deliver(&self, event: &LifecycleEvent) -> bool {
        let attempts = self.policy.max_attempts.max(1);
        for attempt in 1..=attempts {
            match self.sink.deliver(event).await {
                Ok(()) => {
                    debug!(panel_id = %event.panel_id(), attempt, "Notification delivered");
                    return true;
                }
                Err(e) if attempt < attempts => {
                    let delay = self.policy.backoff(attempt);
                    warn!(
                        panel_id = %event.panel_id(),
                        attempt,
                        ?delay,
                        error = %e,
                        "Notification delivery failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    error!(
                        panel_id = %event.panel_id(),
                        attempt,
                        error = %e,
                        "Notification delivery abandoned"
                    );
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use panel_lifecycle_api::domain::PanelStatus;
    use parking_lot::Mutex;
    use uuid::Uuid;

    struct FlakySink {
        failures_left: Mutex<u32>,
        delivered: Mutex<Vec<LifecycleEvent>>,
    }

    #[async_trait]
    impl NotificationSink for FlakySink {
        async fn deliver(
            &self,
            event: &LifecycleEvent,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            {
                let mut failures = self.failures_left.lock();
                if *failures > 0 {
                    *failures -= 1;
                    return Err("sink unavailable".into());
                }
            }
            self.delivered.lock().push(event.clone());
            Ok(())
        }
    }

    fn event() -> LifecycleEvent {
        LifecycleEvent::StatusOverridden {
            panel_id: Uuid::new_v4(),
            status: PanelStatus::InTransit,
            actor_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
        }
    }

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(2),
            jitter: false,
        }
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 10,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(500),
            jitter: false,
        };
        assert_eq!(policy.backoff(1), Duration::from_millis(100));
        assert_eq!(policy.backoff(2), Duration::from_millis(200));
        assert_eq!(policy.backoff(3), Duration::from_millis(400));
        assert_eq!(policy.backoff(4), Duration::from_millis(500));
        assert_eq!(policy.backoff(40), Duration::from_millis(500));

        let jittered = RetryPolicy { jitter: true, ..policy };
        let delay = jittered.backoff(2);
        assert!(delay >= Duration::from_millis(100) && delay <= Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_dispatcher_retries_until_delivered() {
        let sink = Arc::new(FlakySink {
            failures_left: Mutex::new(2),
            delivered: Mutex::new(Vec::new()),
        });
        let (publisher, dispatcher) =
            NotificationDispatcher::channel(8, sink.clone(), fast_policy(3));
        let handle = dispatcher.spawn();

        let sent = event();
        assert_eq!(publisher.publish(vec![sent.clone()]), 1);
        drop(publisher);
        handle.await.unwrap();

        assert_eq!(sink.delivered.lock().as_slice(), &[sent]);
    }

    #[tokio::test]
    async fn test_dispatcher_gives_up_after_max_attempts() {
        let sink = Arc::new(FlakySink {
            failures_left: Mutex::new(10),
            delivered: Mutex::new(Vec::new()),
        });
        let (publisher, dispatcher) =
            NotificationDispatcher::channel(8, sink.clone(), fast_policy(3));
        let handle = dispatcher.spawn();

        publisher.publish(vec![event()]);
        drop(publisher);
        handle.await.unwrap();

        assert!(sink.delivered.lock().is_empty());
        assert_eq!(*sink.failures_left.lock(), 7);
    }

    #[test]
    fn test_full_queue_drops_without_blocking() {
        let sink = Arc::new(FlakySink {
            failures_left: Mutex::new(0),
            delivered: Mutex::new(Vec::new()),
        });
        let (publisher, _dispatcher) = NotificationDispatcher::channel(2, sink, fast_policy(1));
        assert_eq!(publisher.publish(vec![event(), event(), event()]), 2);
    }
}
